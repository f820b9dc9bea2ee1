use ndarray as nd;
use num_complex::Complex64 as C64;
use super::{
    ChannelResult,
    Tolerance,
    matrix::{ self, Mat },
};

/// A linear operator on an *n*-qubit register.
#[derive(Clone, Debug, PartialEq)]
pub struct Operator {
    data: Mat,
    num_qubits: usize,
}

impl Operator {
    /// Create a new `Operator`, checking that `data` is square with a
    /// power-of-two dimension.
    pub fn new(data: nd::Array2<C64>) -> ChannelResult<Self> {
        let num_qubits = matrix::qubits_of(&data)?;
        Ok(Self { data, num_qubits })
    }

    /// The identity on `n` qubits.
    pub fn identity(n: usize) -> Self {
        Self { data: Mat::eye(1 << n), num_qubits: n }
    }

    pub fn num_qubits(&self) -> usize { self.num_qubits }

    pub fn data(&self) -> &nd::Array2<C64> { &self.data }

    pub fn into_data(self) -> nd::Array2<C64> { self.data }

    /// Return `true` if *U*†*U* = *I*.
    pub fn is_unitary(&self, tol: &Tolerance) -> bool {
        let prod = matrix::adjoint(&self.data).dot(&self.data);
        matrix::is_identity(&prod, false, tol)
    }

    /// Return `true` if `self` is the identity up to a global phase.
    pub fn is_identity(&self, tol: &Tolerance) -> bool {
        matrix::is_identity(&self.data, true, tol)
    }

    /// Return the operator `self ⊗ other`, with `other` acting on the low
    /// qubits.
    pub fn tensor(&self, other: &Self) -> Self {
        Self {
            data: matrix::kron(&self.data, &other.data),
            num_qubits: self.num_qubits + other.num_qubits,
        }
    }
}
