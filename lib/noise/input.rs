//! Construction and normalization of [`StochasticChannel`]s from the various
//! shapes of noise input.

use num_complex::Complex64 as C64;
use serde::{ Deserialize, Serialize };
use tracing::{ debug, warn };
use crate::{
    channel::{ DenseOperator, Kraus, Operator, SuperOp, Tolerance },
    circuit::{ Circuit, Gate, Instruction, UnitaryGate },
};
use super::{ NoiseError, NoiseResult, StochasticChannel };
use NoiseError::*;

/// A single noise operation in any of the accepted input shapes.
///
/// Every variant is converted to a [`Circuit`] during construction of a
/// [`StochasticChannel`]. `From` implementations are provided for the natural
/// Rust types of each shape, so that e.g. `(Gate::CX, [0, 2])` or a [`Kraus`]
/// can be passed directly.
#[derive(Clone, Debug, PartialEq)]
pub enum NoiseOp {
    /// A dense channel, converted to a unitary or Kraus instruction on its own
    /// qubits.
    Dense(DenseOperator),
    /// A bare instruction, placed on qubits `0..n` of an `n`-qubit register.
    Instruction(Instruction),
    /// An instruction placed on explicit qubits of a register just wide enough
    /// to contain them.
    Applied(Instruction, Vec<usize>),
    /// A ready-made circuit.
    Circuit(Circuit),
    /// A sequence of placed instructions sharing one register.
    Sequence(Vec<(Instruction, Vec<usize>)>),
}

impl From<DenseOperator> for NoiseOp {
    fn from(dense: DenseOperator) -> Self { Self::Dense(dense) }
}

impl From<Operator> for NoiseOp {
    fn from(op: Operator) -> Self { Self::Dense(op.into()) }
}

impl From<Kraus> for NoiseOp {
    fn from(kraus: Kraus) -> Self { Self::Dense(kraus.into()) }
}

impl From<SuperOp> for NoiseOp {
    fn from(superop: SuperOp) -> Self { Self::Dense(superop.into()) }
}

impl From<Instruction> for NoiseOp {
    fn from(instr: Instruction) -> Self { Self::Instruction(instr) }
}

impl From<Gate> for NoiseOp {
    fn from(gate: Gate) -> Self { Self::Instruction(gate.into()) }
}

impl From<UnitaryGate> for NoiseOp {
    fn from(unitary: UnitaryGate) -> Self { Self::Instruction(unitary.into()) }
}

impl From<Circuit> for NoiseOp {
    fn from(circ: Circuit) -> Self { Self::Circuit(circ) }
}

impl From<(Instruction, Vec<usize>)> for NoiseOp {
    fn from(applied: (Instruction, Vec<usize>)) -> Self {
        Self::Applied(applied.0, applied.1)
    }
}

impl From<(Gate, Vec<usize>)> for NoiseOp {
    fn from(applied: (Gate, Vec<usize>)) -> Self {
        Self::Applied(applied.0.into(), applied.1)
    }
}

impl<const N: usize> From<(Instruction, [usize; N])> for NoiseOp {
    fn from(applied: (Instruction, [usize; N])) -> Self {
        Self::Applied(applied.0, applied.1.to_vec())
    }
}

impl<const N: usize> From<(Gate, [usize; N])> for NoiseOp {
    fn from(applied: (Gate, [usize; N])) -> Self {
        Self::Applied(applied.0.into(), applied.1.to_vec())
    }
}

impl From<Vec<(Instruction, Vec<usize>)>> for NoiseOp {
    fn from(seq: Vec<(Instruction, Vec<usize>)>) -> Self { Self::Sequence(seq) }
}

impl From<Vec<(Gate, Vec<usize>)>> for NoiseOp {
    fn from(seq: Vec<(Gate, Vec<usize>)>) -> Self {
        Self::Sequence(
            seq.into_iter().map(|(g, qs)| (g.into(), qs)).collect())
    }
}

/// Options controlling construction of a [`StochasticChannel`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelOptions {
    /// Tolerances used during validation and kept by the constructed channel.
    pub tolerance: Tolerance,

    /// Explicit register width.
    ///
    /// Deprecated: the width is otherwise the largest width over all terms,
    /// which is almost always what is wanted. A width smaller than that of
    /// any term is an error.
    pub num_qubits: Option<usize>,
}

impl ChannelOptions {
    /// Create options with the given tolerances and no width override.
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance, num_qubits: None }
    }

    /// Set the (deprecated) explicit register width.
    pub fn with_num_qubits(mut self, num_qubits: usize) -> Self {
        self.num_qubits = Some(num_qubits);
        self
    }
}

// placed instructions must be quantum and physically valid
fn check_instruction(instr: &Instruction, tol: &Tolerance) -> NoiseResult<()> {
    match instr {
        _ if instr.has_classical_output() => Err(InvalidChannel(
            format!("'{}' has classical output and cannot be a channel", instr.name())
        )),
        Instruction::Unitary(unitary) if !unitary.operator().is_unitary(tol) =>
            Err(InvalidChannel(
                format!("'{}' is not unitary", instr.display_name())
            )),
        Instruction::Kraus(kraus) if !kraus.is_cptp(tol) =>
            Err(InvalidChannel("Kraus instruction is not CPTP".into())),
        _ => Ok(()),
    }
}

// direct conversion first, then through Kraus form
fn dense_to_instruction(dense: &DenseOperator, tol: &Tolerance)
    -> NoiseResult<Instruction>
{
    match dense.to_instruction(tol) {
        Ok(instr) => Ok(instr),
        Err(err) => {
            debug!(%err, "direct conversion to instruction failed; trying Kraus form");
            let kraus =
                dense.to_kraus(tol)
                .map_err(|e| InvalidChannel(format!("cannot convert to Kraus: {e}")))?;
            if !kraus.is_cptp(tol) {
                return Err(InvalidChannel("input quantum channel is not CPTP".into()));
            }
            Ok(Instruction::Kraus(kraus))
        },
    }
}

fn max_qubit<'a, I>(qubits: I) -> NoiseResult<usize>
where I: IntoIterator<Item = &'a usize>
{
    qubits.into_iter().copied().max()
        .ok_or_else(|| UnsupportedOperation("empty qubit list".into()))
}

impl NoiseOp {
    /// Convert to a circuit on the narrowest register that holds every qubit
    /// acted on.
    pub fn into_circuit(self, tol: &Tolerance) -> NoiseResult<Circuit> {
        match self {
            Self::Dense(dense) => {
                let instr = dense_to_instruction(&dense, tol)?;
                Self::Instruction(instr).into_circuit(tol)
            },
            Self::Instruction(instr) => {
                check_instruction(&instr, tol)?;
                let n = instr.num_qubits();
                let mut circ = Circuit::new(n);
                circ.append(instr, 0..n)?;
                Ok(circ)
            },
            Self::Applied(instr, qubits) => {
                check_instruction(&instr, tol)?;
                let mut circ = Circuit::new(max_qubit(&qubits)? + 1);
                circ.append(instr, qubits)?;
                Ok(circ)
            },
            Self::Circuit(circ) => {
                for instr in circ.iter() {
                    check_instruction(instr.op(), tol)?;
                }
                Ok(circ)
            },
            Self::Sequence(seq) => {
                let n = max_qubit(seq.iter().flat_map(|(_, qs)| qs))? + 1;
                let mut circ = Circuit::new(n);
                for (instr, qubits) in seq.into_iter() {
                    check_instruction(&instr, tol)?;
                    circ.append(instr, qubits)?;
                }
                Ok(circ)
            },
        }
    }
}

impl StochasticChannel {
    /// Create a new channel from `(operation, probability)` pairs using
    /// default options.
    ///
    /// See [`with_options`][Self::with_options] for details.
    ///
    /// ```
    /// use qnoise::{ circuit::Gate, noise::StochasticChannel };
    /// let bit_flip =
    ///     StochasticChannel::new([(Gate::X, 0.1), (Gate::I, 0.9)]).unwrap();
    /// assert_eq!(bit_flip.size(), 2);
    /// assert_eq!(bit_flip.num_qubits(), 1);
    /// ```
    pub fn new<I, O, P>(terms: I) -> NoiseResult<Self>
    where
        I: IntoIterator<Item = (O, P)>,
        O: Into<NoiseOp>,
        P: Into<C64>,
    {
        Self::with_options(terms, &ChannelOptions::default())
    }

    /// Create a new channel applying a single operation with probability 1.
    pub fn from_op<O>(op: O) -> NoiseResult<Self>
    where O: Into<NoiseOp>
    {
        Self::new([(op, 1.0)])
    }

    /// Create a new channel from `(operation, probability)` pairs.
    ///
    /// Probabilities must be real and no less than `-atol`, and must sum to 1
    /// within `atol`; terms with non-positive probability are dropped and the
    /// rest are divided by their sum to absorb rounding error. Each operation
    /// is converted to a [`Circuit`], dense operators first to a unitary or,
    /// failing that, to a CPTP Kraus instruction. The register width is the
    /// largest width over all terms, and narrower terms are padded with
    /// identity on the added qubits.
    ///
    /// Construction is all-or-nothing: any failure leaves nothing built.
    pub fn with_options<I, O, P>(terms: I, opts: &ChannelOptions)
        -> NoiseResult<Self>
    where
        I: IntoIterator<Item = (O, P)>,
        O: Into<NoiseOp>,
        P: Into<C64>,
    {
        let tol = opts.tolerance;
        let (ops, probs): (Vec<NoiseOp>, Vec<C64>) =
            terms.into_iter()
            .map(|(op, p)| (op.into(), p.into()))
            .unzip();

        let invalid =
            probs.iter()
            .any(|p| p.im != 0.0 || !p.re.is_finite() || p.re < -tol.atol);
        if invalid { return Err(InvalidProbability(probs)); }

        let given = ops.len();
        let kept: Vec<(NoiseOp, f64)> =
            ops.into_iter().zip(probs)
            .filter(|(_, p)| p.re > 0.0)
            .map(|(op, p)| (op, p.re))
            .collect();
        if kept.len() < given {
            debug!(dropped = given - kept.len(), "dropped zero-probability terms");
        }

        let total: f64 = kept.iter().map(|(_, p)| *p).sum();
        if (total - 1.0).abs() > tol.atol {
            return Err(UnnormalizedProbability(total));
        }

        let mut circuits: Vec<Circuit> = Vec::with_capacity(kept.len());
        let mut probabilities: Vec<f64> = Vec::with_capacity(kept.len());
        for (op, p) in kept.into_iter() {
            circuits.push(op.into_circuit(&tol)?);
            probabilities.push(p / total);
        }

        let natural =
            circuits.iter().map(Circuit::num_qubits).max().unwrap_or(0);
        let num_qubits =
            match opts.num_qubits {
                Some(n) => {
                    warn!(
                        "an explicit number of qubits is deprecated; \
                        the width is determined from the error terms"
                    );
                    n
                },
                None => natural,
            };

        let circuits: Vec<Circuit> =
            circuits.into_iter()
            .map(|circ| circ.enlarged(num_qubits))
            .collect();
        for circ in circuits.iter() {
            if circ.has_clbits() {
                return Err(InvalidChannel(
                    "circuit with classical register cannot be a channel".into()
                ));
            }
            if circ.num_qubits() != num_qubits {
                return Err(IncompatibleWidth(circ.num_qubits(), num_qubits));
            }
        }

        debug!(
            terms = circuits.len(),
            num_qubits,
            "constructed stochastic channel",
        );
        Ok(Self { num_qubits, circuits, probabilities, tolerance: tol })
    }
}
