//! Dense matrix representations of quantum channels.
//!
//! Three representations are provided, all over qubit registers of dimension
//! 2<sup>*n*</sup>:
//! - [`Operator`]: a single linear operator *U*, acting as *ρ* ↦ *UρU*†;
//! - [`Kraus`]: a set of operators {*K*<sub>*i*</sub>} acting as *ρ* ↦
//! Σ<sub>*i*</sub> *K*<sub>*i*</sub>*ρK*<sub>*i*</sub>†;
//! - [`SuperOp`]: the 4<sup>*n*</sup> × 4<sup>*n*</sup> matrix acting on
//! column-stacked density matrices, which is the canonical form used for
//! equality and validity testing.
//!
//! Qubits are little-endian throughout: qubit *k* of a register is bit *k* of a
//! basis-state index.

use serde::{ Deserialize, Serialize };
use thiserror::Error;
use crate::circuit::{ Instruction, UnitaryGate };

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("matrix must be square with power-of-two dimension, but has shape {0}×{1}")]
    InvalidDimensions(usize, usize),

    #[error("all Kraus operators must have equal shape")]
    KrausShapeMismatch,

    #[error("Kraus representation requires at least one operator")]
    EmptyKraus,

    #[error("operator is not unitary")]
    NotUnitary,

    #[error("channel is not completely positive")]
    NotCompletelyPositive,

    #[error("channel is not CPTP")]
    NotCptp,

    #[error("channel acts on {0} qubit(s), but {1} qubit(s) were expected")]
    WidthMismatch(usize, usize),

    #[error("target qubit {0} is out of range for a {1}-qubit register")]
    QubitOutOfRange(usize, usize),

    #[error("duplicate target qubit {0}")]
    DuplicateQubit(usize),
}
pub type ChannelResult<T> = Result<T, ChannelError>;

pub(crate) mod matrix;

pub(crate) mod operator;
pub use operator::*;

pub(crate) mod kraus;
pub use kraus::*;

pub(crate) mod superop;
pub use superop::*;

/// Absolute and relative tolerances for floating-point comparisons.
///
/// Two numbers *a* and *b* are considered equal if |*a* - *b*| ≤ `atol` +
/// `rtol` × |*b*|, following the usual `allclose` convention.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub atol: f64,
    pub rtol: f64,
}

impl Default for Tolerance {
    fn default() -> Self { Self { atol: Self::ATOL, rtol: Self::RTOL } }
}

impl Tolerance {
    /// Default absolute tolerance.
    pub const ATOL: f64 = 1e-8;

    /// Default relative tolerance.
    pub const RTOL: f64 = 1e-5;

    /// Create a new set of tolerances.
    pub fn new(atol: f64, rtol: f64) -> Self { Self { atol, rtol } }

    /// Return `true` if `a` is close to `b`.
    pub fn close<A, B>(&self, a: A, b: B) -> bool
    where
        A: Into<num_complex::Complex64>,
        B: Into<num_complex::Complex64>,
    {
        let a = a.into();
        let b = b.into();
        (a - b).norm() <= self.atol + self.rtol * b.norm()
    }
}

/// Any of the dense channel representations.
#[derive(Clone, Debug, PartialEq)]
pub enum DenseOperator {
    Operator(Operator),
    Kraus(Kraus),
    SuperOp(SuperOp),
}

impl From<Operator> for DenseOperator {
    fn from(op: Operator) -> Self { Self::Operator(op) }
}

impl From<Kraus> for DenseOperator {
    fn from(kraus: Kraus) -> Self { Self::Kraus(kraus) }
}

impl From<SuperOp> for DenseOperator {
    fn from(superop: SuperOp) -> Self { Self::SuperOp(superop) }
}

impl DenseOperator {
    /// Return the number of qubits acted on.
    pub fn num_qubits(&self) -> usize {
        match self {
            Self::Operator(op) => op.num_qubits(),
            Self::Kraus(kraus) => kraus.num_qubits(),
            Self::SuperOp(superop) => superop.num_qubits(),
        }
    }

    /// Convert directly to an [`Instruction`].
    ///
    /// An `Operator` must be unitary and becomes a [`UnitaryGate`]; a `Kraus`
    /// or `SuperOp` must be CPTP and becomes a Kraus instruction.
    pub fn to_instruction(&self, tol: &Tolerance) -> ChannelResult<Instruction>
    {
        match self {
            Self::Operator(op) => {
                if !op.is_unitary(tol) { return Err(ChannelError::NotUnitary); }
                Ok(Instruction::Unitary(UnitaryGate::new(op.clone())))
            },
            Self::Kraus(kraus) => {
                if !kraus.is_cptp(tol) { return Err(ChannelError::NotCptp); }
                Ok(Instruction::Kraus(kraus.clone()))
            },
            Self::SuperOp(superop) => superop.to_instruction(tol),
        }
    }

    /// Convert to a Kraus representation.
    ///
    /// This does not check that the result is trace-preserving.
    pub fn to_kraus(&self, tol: &Tolerance) -> ChannelResult<Kraus> {
        match self {
            Self::Operator(op) => Ok(Kraus::from(op.clone())),
            Self::Kraus(kraus) => Ok(kraus.clone()),
            Self::SuperOp(superop) => superop.to_kraus(tol),
        }
    }

    /// Convert to a super-operator.
    pub fn to_superop(&self) -> SuperOp {
        match self {
            Self::Operator(op) => SuperOp::from(op),
            Self::Kraus(kraus) => SuperOp::from(kraus),
            Self::SuperOp(superop) => superop.clone(),
        }
    }

    /// Return `true` if the represented map is completely positive and
    /// trace-preserving.
    pub fn is_cptp(&self, tol: &Tolerance) -> bool {
        match self {
            Self::Operator(op) => op.is_unitary(tol),
            Self::Kraus(kraus) => kraus.is_cptp(tol),
            Self::SuperOp(superop) => superop.is_cptp(tol),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray as nd;
    use crate::c;
    use super::*;

    #[test]
    fn tolerance() {
        let tol = Tolerance::default();
        assert!(tol.close(1.0, 1.0 + 1e-9));
        assert!(!tol.close(1.0, 1.0 + 1e-3));
        assert!(tol.close(c!(0.0, 1.0), c!(1e-10, 1.0)));
        let loose = Tolerance::new(1e-2, 0.0);
        assert!(loose.close(1.0, 1.005));
    }

    #[test]
    fn tolerance_from_config() {
        let tol: Tolerance = serde_json::from_str(r#"{ "atol": 1e-6 }"#)
            .unwrap();
        assert_eq!(tol, Tolerance::new(1e-6, Tolerance::RTOL));
    }

    #[test]
    fn dense_to_instruction() {
        let tol = Tolerance::default();
        let x = Operator::new(nd::array![
            [c!(0.0), c!(1.0)],
            [c!(1.0), c!(0.0)],
        ]).unwrap();
        let instr = DenseOperator::from(x).to_instruction(&tol).unwrap();
        assert!(matches!(instr, Instruction::Unitary(_)));

        let nonunitary = Operator::new(nd::array![
            [c!(1.0), c!(0.0)],
            [c!(0.0), c!(0.5)],
        ]).unwrap();
        let dense = DenseOperator::from(nonunitary);
        assert!(matches!(
            dense.to_instruction(&tol),
            Err(ChannelError::NotUnitary),
        ));
        let kraus = dense.to_kraus(&tol).unwrap();
        assert!(!kraus.is_cptp(&tol));
    }
}
