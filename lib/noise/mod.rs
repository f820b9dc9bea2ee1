//! Stochastic quantum noise channels.
//!
//! A [`StochasticChannel`] describes a physical error process as a
//! probability-weighted mixture of circuits: with probability *p*<sub>*k*</sub>
//! the circuit *C*<sub>*k*</sub> is applied. This form is compact and suitable
//! for simulation by sampling, while [`to_superop`][StochasticChannel::to_superop]
//! recovers the canonical dense super-operator Σ<sub>*k*</sub>
//! *p*<sub>*k*</sub> S(*C*<sub>*k*</sub>) that defines equality between
//! channels.
//!
//! Channels are immutable once built. All constructors route through the same
//! normalization step (see [`StochasticChannel::with_options`]), which validates
//! and rescales probabilities, converts every term to a [`Circuit`], and pads
//! all terms to a common register width.
//!
//! Converting to the dense form costs time and memory scaling as
//! 16<sup>*n*</sup> in the register width *n*, so equality tests and
//! [`to_superop`][StochasticChannel::to_superop] should be kept out of hot
//! loops for wide channels.

use std::fmt;
use num_complex::Complex64 as C64;
use thiserror::Error;
use tracing::debug;
use crate::{
    channel::{ ChannelError, SuperOp, Tolerance },
    circuit::{ Circuit, CircuitError, Instruction },
};

#[derive(Debug, Error)]
pub enum NoiseError {
    /// The input is not a valid (CPTP) channel.
    #[error("invalid channel: {0}")]
    InvalidChannel(String),

    /// A probability was complex, negative, or non-finite.
    #[error("probabilities are invalid: {0:?}")]
    InvalidProbability(Vec<C64>),

    /// Probabilities do not sum to 1 within tolerance.
    #[error("probabilities are not normalized: {0} != 1")]
    UnnormalizedProbability(f64),

    /// Unrecognized input or a disallowed algebraic operation.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Operands act on incompatible numbers of qubits.
    #[error("incompatible widths: {0} qubit(s) against {1}")]
    IncompatibleWidth(usize, usize),

    /// Error term position out of range.
    #[error("position {0} is out of range for an error with {1} term(s)")]
    IndexOutOfRange(usize, usize),

    #[error("circuit error: {0}")]
    CircuitError(#[from] CircuitError),
}
pub type NoiseResult<T> = Result<T, NoiseError>;
use NoiseError::*;

impl From<ChannelError> for NoiseError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::WidthMismatch(a, b) => IncompatibleWidth(a, b),
            err => InvalidChannel(err.to_string()),
        }
    }
}

pub(crate) mod input;
pub use input::*;

pub(crate) mod algebra;

pub(crate) mod export;
pub use export::*;

pub mod standard;

/// A quantum channel represented as a probabilistic mixture of circuits.
///
/// Every term circuit acts on exactly [`num_qubits`][Self::num_qubits]
/// qubits and contains no classical outputs, and the probabilities are
/// positive and sum to 1.
#[derive(Clone, Debug)]
pub struct StochasticChannel {
    num_qubits: usize,
    circuits: Vec<Circuit>,
    probabilities: Vec<f64>,
    tolerance: Tolerance,
}

impl StochasticChannel {
    /// Return the number of qubits acted on.
    pub fn num_qubits(&self) -> usize { self.num_qubits }

    /// Return the number of error terms.
    pub fn size(&self) -> usize { self.circuits.len() }

    /// Return the error term circuits.
    pub fn circuits(&self) -> &[Circuit] { &self.circuits }

    /// Return the error term probabilities.
    pub fn probabilities(&self) -> &[f64] { &self.probabilities }

    /// Return the tolerances used for validity, identity, and equality checks.
    pub fn tolerance(&self) -> Tolerance { self.tolerance }

    /// Iterate over `(circuit, probability)` pairs in term order.
    pub fn terms(&self)
        -> impl Iterator<Item = (&Circuit, f64)> + Clone + '_
    {
        self.circuits.iter().zip(self.probabilities.iter().copied())
    }

    /// Return the error term at `position`.
    pub fn error_term(&self, position: usize) -> NoiseResult<(&Circuit, f64)> {
        match (self.circuits.get(position), self.probabilities.get(position)) {
            (Some(circ), Some(prob)) => Ok((circ, *prob)),
            _ => Err(IndexOutOfRange(position, self.size())),
        }
    }

    /// Return an independent copy of `self`.
    pub fn copy(&self) -> Self { self.clone() }

    /// Return `true` if `self` is the identity channel, i.e. it has a single
    /// term with probability 1 consisting of a single identity instruction.
    ///
    /// A unitary instruction counts as the identity if its matrix is the
    /// identity up to a global phase.
    pub fn is_identity(&self) -> bool {
        let [circ] = self.circuits.as_slice() else { return false; };
        if self.probabilities[0] != 1.0 || circ.len() != 1 { return false; }
        let ideal =
            circ.get(0)
            .is_some_and(|instr| instr.op().is_identity(&self.tolerance));
        if ideal { debug!("error object is ideal"); }
        ideal
    }

    /// Compute the dense super-operator Σ<sub>*k*</sub> *p*<sub>*k*</sub>
    /// S(*C*<sub>*k*</sub>).
    pub fn to_superop(&self) -> NoiseResult<SuperOp> {
        self.terms()
            .try_fold(SuperOp::zeros(self.num_qubits), |mut acc, (circ, p)| {
                acc += &(circ.to_superop()? * p);
                Ok(acc)
            })
    }

    /// Convert to a single opaque [`Instruction`], discarding the mixture
    /// structure.
    pub fn to_instruction(&self) -> NoiseResult<Instruction> {
        Ok(self.to_superop()?.to_instruction(&self.tolerance)?)
    }
}

impl PartialEq for StochasticChannel {
    /// Two channels are equal if their super-operators are equal within the
    /// tolerance of the left operand, regardless of how their terms are
    /// phrased.
    fn eq(&self, other: &Self) -> bool {
        match (self.to_superop(), other.to_superop()) {
            (Ok(l), Ok(r)) => l.approx_eq(&r, &self.tolerance),
            _ => false,
        }
    }
}

impl fmt::Display for StochasticChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StochasticChannel on {} qubit(s). Noise circuits:",
            self.num_qubits,
        )?;
        for (j, (circ, p)) in self.terms().enumerate() {
            write!(f, "\n  P({j}) = {p}, {circ}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ndarray as nd;
    use crate::{
        channel::{ Kraus, Operator },
        circuit::Gate,
        phase::Phase,
    };
    use super::*;

    fn bit_flip(p: f64) -> StochasticChannel {
        StochasticChannel::new([(Gate::X, p), (Gate::I, 1.0 - p)]).unwrap()
    }

    #[test]
    fn accessors() {
        let chan = bit_flip(0.25);
        assert_eq!(chan.num_qubits(), 1);
        assert_eq!(chan.size(), 2);
        assert_eq!(chan.probabilities(), &[0.25, 0.75]);
        assert_eq!(chan.circuits().len(), 2);
        assert_eq!(chan.tolerance(), Tolerance::default());
    }

    #[test]
    fn error_term_bounds() {
        let chan = StochasticChannel::from_op(Gate::H).unwrap();
        let (circ, p) = chan.error_term(0).unwrap();
        assert_eq!(p, 1.0);
        assert_eq!(circ.len(), 1);
        assert_eq!(circ.get(0).unwrap().op(), &Instruction::Gate(Gate::H));
        assert!(matches!(chan.error_term(1), Err(IndexOutOfRange(1, 1))));
        let chan = bit_flip(0.1);
        assert!(chan.error_term(1).is_ok());
        assert!(matches!(chan.error_term(2), Err(IndexOutOfRange(2, 2))));
    }

    #[test]
    fn identity_detection() {
        assert!(StochasticChannel::from_op(Gate::I).unwrap().is_identity());
        assert!(!StochasticChannel::from_op(Gate::X).unwrap().is_identity());
        // two terms, even though one is the identity
        assert!(!bit_flip(0.1).is_identity());
        let phased =
            Operator::new(nd::Array2::eye(2).mapv(|x: C64| x * C64::cis(0.4)))
            .unwrap();
        assert!(StochasticChannel::from_op(phased).unwrap().is_identity());
        // identical action, but not a single identity instruction
        let rz0 = StochasticChannel::from_op(Gate::ZRot(Phase::zero())).unwrap();
        assert!(!rz0.is_identity());
    }

    #[test]
    fn superop_is_weighted_sum() {
        let tol = Tolerance::default();
        let chan = bit_flip(0.3);
        let x = SuperOp::from(&Operator::new(Gate::X.matrix()).unwrap());
        let expected = 0.3 * x + 0.7 * SuperOp::identity(1);
        assert!(chan.to_superop().unwrap().approx_eq(&expected, &tol));
        assert!(chan.to_superop().unwrap().is_cptp(&tol));
    }

    #[test]
    fn equality_is_semantic() {
        let mixture = bit_flip(0.5);
        let kraus = Kraus::new([
            nd::Array2::eye(2).mapv(|x: C64| x * 0.5_f64.sqrt()),
            Gate::X.matrix().mapv(|x| x * 0.5_f64.sqrt()),
        ]).unwrap();
        let single = StochasticChannel::from_op(kraus).unwrap();
        assert_eq!(single.size(), 1);
        assert_eq!(mixture, single);
        assert_ne!(bit_flip(0.3), bit_flip(0.5));
        // Z and Rz(π) differ by a global phase only
        let z = StochasticChannel::from_op(Gate::Z).unwrap();
        let rz = StochasticChannel::from_op(Gate::ZRot(Phase::pi())).unwrap();
        assert_eq!(z, rz);
    }

    #[test]
    fn to_instruction() {
        let tol = Tolerance::default();
        let chan = bit_flip(0.2);
        let instr = chan.to_instruction().unwrap();
        assert!(matches!(instr, Instruction::Kraus(_)));
        let back = StochasticChannel::from_op(instr).unwrap();
        assert!(back.to_superop().unwrap()
            .approx_eq(&chan.to_superop().unwrap(), &tol));
    }

    #[test]
    fn display() {
        let shown = bit_flip(0.5).to_string();
        assert!(shown.starts_with("StochasticChannel on 1 qubit(s)"));
        assert!(shown.contains("P(0) = 0.5"));
        assert!(shown.contains("x q[0]"));
        assert!(shown.contains("P(1) = 0.5"));
    }

    #[test]
    fn copy_is_independent() {
        let chan = bit_flip(0.4);
        let copied = chan.copy();
        drop(chan);
        assert_eq!(copied.size(), 2);
        assert_eq!(copied.probabilities(), &[0.4, 0.6]);
    }
}
