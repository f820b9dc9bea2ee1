//! Quantum circuits as ordered sequences of instructions on a fixed-width
//! qubit register.
//!
//! A [`Circuit`] is the unit from which stochastic noise channels are built:
//! each error term of a [`StochasticChannel`][crate::noise::StochasticChannel]
//! is a circuit applied with some probability.

use std::fmt;
use thiserror::Error;
use crate::channel::{
    ChannelError,
    Kraus,
    Operator,
    SuperOp,
    Tolerance,
};

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("instruction '{0}' acts on {1} qubit(s), but {2} were given")]
    WrongArity(String, usize, usize),

    #[error("qubit {0} is out of range for a {1}-qubit register")]
    QubitOutOfRange(usize, usize),

    #[error("duplicate qubit {0} in instruction arguments")]
    DuplicateQubit(usize),

    #[error("classical bit {0} is out of range for a {1}-bit register")]
    ClbitOutOfRange(usize, usize),

    #[error("measurement must be appended with a classical bit")]
    MeasureWithoutClbit,

    #[error("cannot compose a {0}-qubit circuit onto a {1}-qubit circuit")]
    TooManyQubits(usize, usize),

    #[error("{0} qubit(s) given to place a {1}-qubit circuit")]
    QargsMismatch(usize, usize),

    #[error("instruction '{0}' has classical output and no channel representation")]
    ClassicalOutput(String),

    #[error("channel error: {0}")]
    ChannelError(#[from] ChannelError),
}
pub type CircuitResult<T> = Result<T, CircuitError>;
use CircuitError::*;

pub(crate) mod gate;
pub use gate::*;

/// A labeled unitary given by an explicit matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitaryGate {
    operator: Operator,
    label: Option<String>,
}

impl UnitaryGate {
    /// Create a new, unlabeled `UnitaryGate`.
    ///
    /// Unitarity is not checked here, but when a channel is built from it.
    pub fn new(operator: Operator) -> Self { Self { operator, label: None } }

    /// Attach a custom label, used in place of `"unitary"` when exporting.
    pub fn with_label<S>(mut self, label: S) -> Self
    where S: Into<String>
    {
        self.label = Some(label.into());
        self
    }

    pub fn operator(&self) -> &Operator { &self.operator }

    pub fn label(&self) -> Option<&str> { self.label.as_deref() }
}

/// A single operation that can be placed in a [`Circuit`].
#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    /// A standard gate.
    Gate(Gate),
    /// An arbitrary unitary matrix.
    Unitary(UnitaryGate),
    /// A general CPTP map in Kraus form.
    Kraus(Kraus),
    /// Reset a qubit to ∣0⟩.
    Reset,
    /// Measure a qubit into a classical bit.
    Measure,
}

impl From<Gate> for Instruction {
    fn from(gate: Gate) -> Self { Self::Gate(gate) }
}

impl From<UnitaryGate> for Instruction {
    fn from(unitary: UnitaryGate) -> Self { Self::Unitary(unitary) }
}

impl From<Kraus> for Instruction {
    fn from(kraus: Kraus) -> Self { Self::Kraus(kraus) }
}

impl Instruction {
    /// Return the number of qubits acted on.
    pub fn num_qubits(&self) -> usize {
        match self {
            Self::Gate(gate) => gate.num_qubits(),
            Self::Unitary(unitary) => unitary.operator.num_qubits(),
            Self::Kraus(kraus) => kraus.num_qubits(),
            Self::Reset | Self::Measure => 1,
        }
    }

    /// Return the canonical name.
    pub fn name(&self) -> &str {
        match self {
            Self::Gate(gate) => gate.name(),
            Self::Unitary(_) => "unitary",
            Self::Kraus(_) => "kraus",
            Self::Reset => "reset",
            Self::Measure => "measure",
        }
    }

    /// Return the custom label if one exists, otherwise the canonical name.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Unitary(unitary) =>
                unitary.label().unwrap_or_else(|| self.name()),
            _ => self.name(),
        }
    }

    /// Return `true` if `self` writes to a classical bit.
    pub fn has_classical_output(&self) -> bool { matches!(self, Self::Measure) }

    /// Return `true` if `self` is the identity: either [`Gate::I`] or a
    /// unitary matrix equal to the identity up to global phase.
    pub fn is_identity(&self, tol: &Tolerance) -> bool {
        match self {
            Self::Gate(gate) => gate.is_i(),
            Self::Unitary(unitary) => unitary.operator.is_identity(tol),
            _ => false,
        }
    }

    /// Return the super-operator of `self` on its own qubits.
    pub fn superop(&self) -> CircuitResult<SuperOp> {
        match self {
            Self::Gate(gate) => {
                let op = Operator::new(gate.matrix())?;
                Ok(SuperOp::from(&op))
            },
            Self::Unitary(unitary) => Ok(SuperOp::from(&unitary.operator)),
            Self::Kraus(kraus) => Ok(SuperOp::from(kraus)),
            Self::Reset => {
                let z = crate::c!(0.0);
                let o = crate::c!(1.0);
                let kraus = Kraus::new([
                    ndarray::array![[o, z], [z, z]],
                    ndarray::array![[z, o], [z, z]],
                ])?;
                Ok(SuperOp::from(&kraus))
            },
            Self::Measure => Err(ClassicalOutput(self.name().to_string())),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gate(gate) => write!(f, "{gate}"),
            _ => write!(f, "{}", self.display_name()),
        }
    }
}

/// An [`Instruction`] placed on specific qubits (and classical bits) of a
/// register.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitInstruction {
    op: Instruction,
    qubits: Vec<usize>,
    clbits: Vec<usize>,
}

impl CircuitInstruction {
    pub fn op(&self) -> &Instruction { &self.op }

    pub fn qubits(&self) -> &[usize] { &self.qubits }

    pub fn clbits(&self) -> &[usize] { &self.clbits }

    fn remapped<F, G>(&self, qmap: F, cmap: G) -> Self
    where
        F: Fn(usize) -> usize,
        G: Fn(usize) -> usize,
    {
        Self {
            op: self.op.clone(),
            qubits: self.qubits.iter().map(|q| qmap(*q)).collect(),
            clbits: self.clbits.iter().map(|c| cmap(*c)).collect(),
        }
    }
}

// check that `qubits` are distinct and fit in a register of width `n`
fn check_qubits(qubits: &[usize], n: usize) -> CircuitResult<()> {
    for (k, &q) in qubits.iter().enumerate() {
        if q >= n { return Err(QubitOutOfRange(q, n)); }
        if qubits[..k].contains(&q) { return Err(DuplicateQubit(q)); }
    }
    Ok(())
}

/// An ordered sequence of instructions on a register of fixed width.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    data: Vec<CircuitInstruction>,
}

impl Circuit {
    /// Create a new, empty circuit on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self { num_qubits, num_clbits: 0, data: Vec::new() }
    }

    /// Create a new, empty circuit with a classical register.
    pub fn with_clbits(num_qubits: usize, num_clbits: usize) -> Self {
        Self { num_qubits, num_clbits, data: Vec::new() }
    }

    pub fn num_qubits(&self) -> usize { self.num_qubits }

    pub fn num_clbits(&self) -> usize { self.num_clbits }

    /// Return `true` if `self` has a classical register.
    pub fn has_clbits(&self) -> bool { self.num_clbits > 0 }

    /// Return the number of instructions.
    pub fn len(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Return the instruction at index `k`, if it exists.
    pub fn get(&self, k: usize) -> Option<&CircuitInstruction> {
        self.data.get(k)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CircuitInstruction> {
        self.data.iter()
    }

    /// Append an instruction acting on `qubits`.
    ///
    /// Fails if the number of qubits does not match the instruction, if any
    /// qubit is out of range or repeated, or if the instruction is a
    /// measurement (use [`measure`][Self::measure] instead).
    pub fn append<I, Q>(&mut self, op: I, qubits: Q) -> CircuitResult<&mut Self>
    where
        I: Into<Instruction>,
        Q: IntoIterator<Item = usize>,
    {
        let op = op.into();
        let qubits: Vec<usize> = qubits.into_iter().collect();
        if op.has_classical_output() { return Err(MeasureWithoutClbit); }
        if qubits.len() != op.num_qubits() {
            return Err(
                WrongArity(op.name().to_string(), op.num_qubits(), qubits.len()));
        }
        check_qubits(&qubits, self.num_qubits)?;
        self.data.push(CircuitInstruction { op, qubits, clbits: Vec::new() });
        Ok(self)
    }

    /// Append a measurement of `qubit` into classical bit `clbit`.
    pub fn measure(&mut self, qubit: usize, clbit: usize)
        -> CircuitResult<&mut Self>
    {
        check_qubits(&[qubit], self.num_qubits)?;
        if clbit >= self.num_clbits {
            return Err(ClbitOutOfRange(clbit, self.num_clbits));
        }
        self.data.push(
            CircuitInstruction {
                op: Instruction::Measure,
                qubits: vec![qubit],
                clbits: vec![clbit],
            }
        );
        Ok(self)
    }

    /// Return a copy of `self` on a register widened to `num_qubits`, acting
    /// as the identity on the added qubits.
    ///
    /// A circuit is never truncated: if `num_qubits` is not larger than the
    /// current width, this returns an unchanged copy.
    pub fn enlarged(&self, num_qubits: usize) -> Self {
        let mut new = self.clone();
        new.num_qubits = new.num_qubits.max(num_qubits);
        new
    }

    /// Return the composition of `self` followed by `other`, or `other`
    /// followed by `self` if `front` is `true`.
    ///
    /// If `qubits` is given, qubit *k* of `other` is placed on `qubits[k]` of
    /// `self`; otherwise `other` acts on the first `other.num_qubits()`
    /// qubits. `other` can never be wider than `self`.
    pub fn compose(&self, other: &Self, qubits: Option<&[usize]>, front: bool)
        -> CircuitResult<Self>
    {
        if other.num_qubits > self.num_qubits {
            return Err(TooManyQubits(other.num_qubits, self.num_qubits));
        }
        let qmap: Vec<usize> =
            match qubits {
                Some(qs) => {
                    if qs.len() != other.num_qubits {
                        return Err(QargsMismatch(qs.len(), other.num_qubits));
                    }
                    check_qubits(qs, self.num_qubits)?;
                    qs.to_vec()
                },
                None => (0..other.num_qubits).collect(),
            };
        let placed =
            other.data.iter()
            .map(|instr| instr.remapped(|q| qmap[q], |c| c));
        let data: Vec<CircuitInstruction> =
            if front {
                placed.chain(self.data.iter().cloned()).collect()
            } else {
                self.data.iter().cloned().chain(placed).collect()
            };
        Ok(Self {
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits.max(other.num_clbits),
            data,
        })
    }

    /// Return the circuit `self ⊗ other` on the concatenated register, with
    /// `other` on the low qubits and `self` shifted above it.
    pub fn tensor(&self, other: &Self) -> Self {
        let qshift = other.num_qubits;
        let cshift = other.num_clbits;
        let data: Vec<CircuitInstruction> =
            other.data.iter().cloned()
            .chain(
                self.data.iter()
                .map(|instr| instr.remapped(|q| q + qshift, |c| c + cshift))
            )
            .collect();
        Self {
            num_qubits: self.num_qubits + other.num_qubits,
            num_clbits: self.num_clbits + other.num_clbits,
            data,
        }
    }

    /// Compute the super-operator of the whole circuit.
    ///
    /// Fails if the circuit contains a measurement.
    pub fn to_superop(&self) -> CircuitResult<SuperOp> {
        let n = self.num_qubits;
        self.data.iter()
            .try_fold(SuperOp::identity(n), |acc, instr| {
                let local = instr.op.superop()?;
                let full = local.embed(&instr.qubits, n)?;
                Ok(acc.compose(&full, None, false)?)
            })
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a CircuitInstruction;
    type IntoIter = std::slice::Iter<'a, CircuitInstruction>;

    fn into_iter(self) -> Self::IntoIter { self.data.iter() }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circuit({} qubit(s)", self.num_qubits)?;
        if self.num_clbits > 0 {
            write!(f, ", {} clbit(s)", self.num_clbits)?;
        }
        write!(f, ")")?;
        for instr in self.data.iter() {
            write!(f, "\n    {}", instr.op)?;
            let qubits: Vec<String> =
                instr.qubits.iter().map(|q| format!("q[{q}]")).collect();
            write!(f, " {}", qubits.join(", "))?;
            if !instr.clbits.is_empty() {
                let clbits: Vec<String> =
                    instr.clbits.iter().map(|c| format!("c[{c}]")).collect();
                write!(f, " -> {}", clbits.join(", "))?;
            }
        }
        Ok(())
    }
}
