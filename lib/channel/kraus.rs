use ndarray as nd;
use num_complex::Complex64 as C64;
use super::{
    ChannelError,
    ChannelResult,
    Operator,
    Tolerance,
    matrix::{ self, Mat },
};

/// A channel in Kraus form, *ρ* ↦ Σ<sub>*i*</sub>
/// *K*<sub>*i*</sub>*ρK*<sub>*i*</sub>†.
///
/// Construction only checks shapes; use [`is_cptp`][Self::is_cptp] to test
/// physical validity.
#[derive(Clone, Debug, PartialEq)]
pub struct Kraus {
    ops: Vec<Mat>,
    num_qubits: usize,
}

impl Kraus {
    /// Create a new `Kraus` from a non-empty list of square, equally shaped
    /// matrices of power-of-two dimension.
    pub fn new<I>(ops: I) -> ChannelResult<Self>
    where I: IntoIterator<Item = nd::Array2<C64>>
    {
        let ops: Vec<Mat> = ops.into_iter().collect();
        let first = ops.first().ok_or(ChannelError::EmptyKraus)?;
        let num_qubits = matrix::qubits_of(first)?;
        if ops.iter().any(|k| k.dim() != first.dim()) {
            return Err(ChannelError::KrausShapeMismatch);
        }
        Ok(Self { ops, num_qubits })
    }

    pub fn num_qubits(&self) -> usize { self.num_qubits }

    /// Return the Kraus operators.
    pub fn ops(&self) -> &[nd::Array2<C64>] { &self.ops }

    /// Return the number of Kraus operators.
    pub fn len(&self) -> usize { self.ops.len() }

    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    /// Return `true` if Σ<sub>*i*</sub> *K*<sub>*i*</sub>†*K*<sub>*i*</sub> =
    /// *I*.
    pub fn is_tp(&self, tol: &Tolerance) -> bool {
        let dim = 1 << self.num_qubits;
        let sum =
            self.ops.iter()
            .fold(Mat::zeros((dim, dim)), |acc, k| {
                acc + matrix::adjoint(k).dot(k)
            });
        matrix::is_identity(&sum, false, tol)
    }

    /// Kraus maps are always completely positive, so this is equivalent to
    /// [`is_tp`][Self::is_tp].
    pub fn is_cptp(&self, tol: &Tolerance) -> bool { self.is_tp(tol) }

    /// Return a copy of `self` acting on the `qubits` of an `n`-qubit
    /// register.
    pub fn embed(&self, qubits: &[usize], n: usize) -> ChannelResult<Self> {
        if qubits.len() != self.num_qubits {
            return Err(ChannelError::WidthMismatch(qubits.len(), self.num_qubits));
        }
        matrix::check_targets(qubits, n)?;
        let ops =
            self.ops.iter()
            .map(|k| matrix::embed_operator(k, qubits, n))
            .collect();
        Ok(Self { ops, num_qubits: n })
    }
}

impl From<Operator> for Kraus {
    fn from(op: Operator) -> Self {
        let num_qubits = op.num_qubits();
        Self { ops: vec![op.into_data()], num_qubits }
    }
}
