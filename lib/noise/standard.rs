//! Constructors for common noise models.
//!
//! Every function here builds its channel through
//! [`StochasticChannel::with_options`], so the usual validation and
//! normalization rules apply.

use itertools::Itertools;
use crate::{
    channel::{ Kraus, Operator },
    circuit::{ Circuit, Gate, UnitaryGate },
};
use super::{
    ChannelOptions,
    NoiseError,
    NoiseOp,
    NoiseResult,
    StochasticChannel,
};
use NoiseError::*;

// rightmost character acts on qubit 0
fn pauli_circuit(label: &str) -> NoiseResult<Circuit> {
    let n = label.chars().count();
    let mut circ = Circuit::new(n);
    for (q, ch) in label.chars().rev().enumerate() {
        let gate =
            match ch.to_ascii_uppercase() {
                'I' => { continue; },
                'X' => Gate::X,
                'Y' => Gate::Y,
                'Z' => Gate::Z,
                _ => {
                    return Err(UnsupportedOperation(
                        format!("invalid Pauli label '{label}'")));
                },
            };
        circ.append(gate, [q])?;
    }
    if circ.is_empty() { circ.append(Gate::I, [0])?; }
    Ok(circ)
}

/// Return a mixture of Pauli errors.
///
/// Each label is a string over `{I, X, Y, Z}`, with the rightmost character
/// acting on qubit 0; all labels must have the same length. An all-identity
/// label is stored as a single identity gate on qubit 0.
///
/// ```
/// use qnoise::noise::standard::pauli_error;
/// let chan = pauli_error(&[("XX", 0.1), ("II", 0.9)]).unwrap();
/// assert_eq!(chan.num_qubits(), 2);
/// ```
pub fn pauli_error(terms: &[(&str, f64)]) -> NoiseResult<StochasticChannel> {
    let Some((first, _)) = terms.first() else {
        return Err(UnsupportedOperation("no Pauli terms given".into()));
    };
    let n = first.chars().count();
    if n == 0 {
        return Err(UnsupportedOperation("empty Pauli label".into()));
    }
    let circuits: Vec<(NoiseOp, f64)> =
        terms.iter()
        .map(|(label, p)| {
            let circ = pauli_circuit(label)?;
            if circ.num_qubits() != n {
                return Err(IncompatibleWidth(circ.num_qubits(), n));
            }
            Ok((NoiseOp::Circuit(circ), *p))
        })
        .collect::<NoiseResult<_>>()?;
    StochasticChannel::new(circuits)
}

/// Return an `n`-qubit depolarizing channel *ρ* ↦ (1 - *λ*) *ρ* + *λ* I /
/// 2<sup>*n*</sup>.
///
/// `param` (*λ*) must lie between 0 and 4<sup>*n*</sup> / (4<sup>*n*</sup> -
/// 1), the upper bound being the fully depolarizing Pauli channel. Terms are
/// the 4<sup>*n*</sup> Pauli strings, identity first.
pub fn depolarizing_error(param: f64, num_qubits: usize)
    -> NoiseResult<StochasticChannel>
{
    if num_qubits == 0 {
        return Err(UnsupportedOperation(
            "depolarizing error requires at least one qubit".into()));
    }
    let num_terms =
        u32::try_from(num_qubits).ok()
        .and_then(|n| 4_usize.checked_pow(n))
        .ok_or_else(|| {
            UnsupportedOperation(
                format!("too many qubits for a depolarizing error: {num_qubits}"))
        })?
        as f64;
    let max_param = num_terms / (num_terms - 1.0);
    if !(0.0..=max_param).contains(&param) {
        return Err(InvalidProbability(vec![param.into()]));
    }
    let prob_iden = 1.0 - param / max_param;
    let prob_pauli = param / num_terms;
    let labels: Vec<String> =
        (0..num_qubits)
        .map(|_| "IXYZ".chars())
        .multi_cartesian_product()
        .map(|chars| chars.into_iter().collect())
        .collect();
    let terms: Vec<(&str, f64)> =
        labels.iter()
        .enumerate()
        .map(|(k, label)| {
            (label.as_str(), if k == 0 { prob_iden } else { prob_pauli })
        })
        .collect();
    pauli_error(&terms)
}

/// Return a single-qubit reset error: reset to ∣0⟩ with probability `p0`, to
/// ∣1⟩ with probability `p1`, and do nothing otherwise.
pub fn reset_error(p0: f64, p1: f64) -> NoiseResult<StochasticChannel> {
    let mut to_zero = Circuit::new(1);
    to_zero.append(crate::circuit::Instruction::Reset, [0])?;
    let mut to_one = to_zero.clone();
    to_one.append(Gate::X, [0])?;
    StochasticChannel::new([
        (NoiseOp::from(Gate::I), 1.0 - p0 - p1),
        (NoiseOp::Circuit(to_zero), p0),
        (NoiseOp::Circuit(to_one), p1),
    ])
}

/// Return a coherent error applying the unitary `op` with certainty, using
/// default options.
pub fn coherent_unitary_error(op: Operator) -> NoiseResult<StochasticChannel> {
    coherent_unitary_error_with_options(op, &ChannelOptions::default())
}

/// Like [`coherent_unitary_error`], but checking unitarity with the
/// tolerances in `opts`, which are also kept by the returned channel.
pub fn coherent_unitary_error_with_options(op: Operator, opts: &ChannelOptions)
    -> NoiseResult<StochasticChannel>
{
    if !op.is_unitary(&opts.tolerance) {
        return Err(InvalidChannel("input matrix is not unitary".into()));
    }
    StochasticChannel::with_options([(UnitaryGate::new(op), 1.0)], opts)
}

/// Return the channel given by a set of Kraus operators, as a single term.
pub fn kraus_error(kraus: Kraus) -> NoiseResult<StochasticChannel> {
    StochasticChannel::from_op(kraus)
}

#[cfg(test)]
mod tests {
    use ndarray as nd;
    use crate::{
        c,
        channel::{ SuperOp, Tolerance },
        circuit::Instruction,
    };
    use super::*;

    fn dense(gate: Gate) -> SuperOp {
        SuperOp::from(&Operator::new(gate.matrix()).unwrap())
    }

    #[test]
    fn pauli_labels() {
        let chan = pauli_error(&[("XZ", 0.2), ("II", 0.8)]).unwrap();
        assert_eq!(chan.num_qubits(), 2);
        let (circ, p) = chan.error_term(0).unwrap();
        assert_eq!(p, 0.2);
        assert_eq!(circ.get(0).unwrap().op(), &Instruction::Gate(Gate::Z));
        assert_eq!(circ.get(0).unwrap().qubits(), &[0]);
        assert_eq!(circ.get(1).unwrap().op(), &Instruction::Gate(Gate::X));
        assert_eq!(circ.get(1).unwrap().qubits(), &[1]);
        let (iden, _) = chan.error_term(1).unwrap();
        assert_eq!(iden.len(), 1);
        assert_eq!(iden.get(0).unwrap().op(), &Instruction::Gate(Gate::I));

        let flip =
            StochasticChannel::new([(Gate::X, 0.3), (Gate::I, 0.7)]).unwrap();
        assert_eq!(pauli_error(&[("X", 0.3), ("I", 0.7)]).unwrap(), flip);

        assert!(matches!(
            pauli_error(&[("X", 0.5), ("IZ", 0.5)]),
            Err(IncompatibleWidth(2, 1)),
        ));
        assert!(matches!(
            pauli_error(&[("Q", 1.0)]),
            Err(UnsupportedOperation(_)),
        ));
        assert!(matches!(pauli_error(&[]), Err(UnsupportedOperation(_))));
    }

    #[test]
    fn depolarizing() {
        let tol = Tolerance::default();
        let full = depolarizing_error(1.0, 1).unwrap();
        assert_eq!(full.size(), 4);
        assert!((full.probabilities()[0] - 0.25).abs() < 1e-15);
        let rho0 = nd::array![[c!(1.0), c!(0.0)], [c!(0.0), c!(0.0)]];
        let out = full.to_superop().unwrap().apply(&rho0).unwrap();
        assert!(tol.close(out[[0, 0]], 0.5));
        assert!(tol.close(out[[1, 1]], 0.5));
        assert!(tol.close(out[[0, 1]], 0.0));

        let two = depolarizing_error(0.5, 2).unwrap();
        assert_eq!(two.size(), 16);
        assert_eq!(two.num_qubits(), 2);
        assert!(two.to_superop().unwrap().is_cptp(&tol));

        // maximal parameter drops the identity term
        let pauli = depolarizing_error(4.0 / 3.0, 1).unwrap();
        assert_eq!(pauli.size(), 3);

        assert!(depolarizing_error(0.0, 1).unwrap().is_identity());
        assert!(matches!(depolarizing_error(1.5, 1), Err(InvalidProbability(_))));
        assert!(matches!(depolarizing_error(-0.1, 1), Err(InvalidProbability(_))));
        assert!(matches!(depolarizing_error(0.1, 0), Err(UnsupportedOperation(_))));
        assert!(matches!(depolarizing_error(0.1, 40), Err(UnsupportedOperation(_))));
        assert!(matches!(
            depolarizing_error(0.1, usize::MAX),
            Err(UnsupportedOperation(_)),
        ));
    }

    #[test]
    fn reset() {
        let tol = Tolerance::default();
        let chan = reset_error(0.2, 0.1).unwrap();
        assert_eq!(chan.size(), 3);
        let reset = Instruction::Reset.superop().unwrap();
        let to_one = reset.compose(&dense(Gate::X), None, false).unwrap();
        let expected =
            0.7 * SuperOp::identity(1) + 0.2 * reset + 0.1 * to_one;
        assert!(chan.to_superop().unwrap().approx_eq(&expected, &tol));
        assert_eq!(reset_error(0.0, 0.0).unwrap().size(), 1);
        assert!(matches!(reset_error(0.6, 0.6), Err(InvalidProbability(_))));
    }

    #[test]
    fn coherent_and_kraus() {
        let tol = Tolerance::default();
        let h = Operator::new(Gate::H.matrix()).unwrap();
        let chan = coherent_unitary_error(h).unwrap();
        assert_eq!(chan.size(), 1);
        assert!(chan.to_superop().unwrap().approx_eq(&dense(Gate::H), &tol));

        let bad =
            Operator::new(nd::array![[c!(1.0), c!(1.0)], [c!(0.0), c!(1.0)]])
            .unwrap();
        assert!(matches!(coherent_unitary_error(bad), Err(InvalidChannel(_))));

        // slightly off unitary: rejected by default, accepted when loosened
        let rough = || {
            Operator::new(Gate::H.matrix().mapv(|x| x * (1.0 + 1e-4))).unwrap()
        };
        assert!(matches!(coherent_unitary_error(rough()), Err(InvalidChannel(_))));
        let loose = ChannelOptions::new(Tolerance::new(1e-3, 0.0));
        let chan = coherent_unitary_error_with_options(rough(), &loose).unwrap();
        assert_eq!(chan.tolerance(), loose.tolerance);
        let strict = ChannelOptions::new(Tolerance::new(1e-12, 0.0));
        assert!(matches!(
            coherent_unitary_error_with_options(rough(), &strict),
            Err(InvalidChannel(_)),
        ));

        let z = c!(0.0);
        let damp =
            Kraus::new([
                nd::array![[c!(1.0), z], [z, c!(0.6)]],
                nd::array![[z, c!(0.8)], [z, z]],
            ])
            .unwrap();
        let chan = kraus_error(damp.clone()).unwrap();
        assert_eq!(chan.size(), 1);
        assert!(chan.to_superop().unwrap().approx_eq(&SuperOp::from(&damp), &tol));
    }
}
