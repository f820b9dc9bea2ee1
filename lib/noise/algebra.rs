//! Sequential and parallel composition of [`StochasticChannel`]s.
//!
//! Every operation here takes the cross-product of the operands' terms,
//! multiplying probabilities, and rebuilds the result through the usual
//! normalization step with the left operand's tolerances.

use itertools::iproduct;
use tracing::debug;
use crate::{
    channel::SuperOp,
    circuit::Circuit,
};
use super::{
    ChannelOptions,
    NoiseError,
    NoiseOp,
    NoiseResult,
    StochasticChannel,
};
use NoiseError::*;

impl StochasticChannel {
    // build from already-aligned terms, keeping self's tolerances
    fn rebuild<I>(&self, terms: I) -> NoiseResult<Self>
    where I: IntoIterator<Item = (Circuit, f64)>
    {
        let opts = ChannelOptions::new(self.tolerance);
        Self::with_options(
            terms.into_iter().map(|(circ, p)| (NoiseOp::Circuit(circ), p)),
            &opts,
        )
    }

    /// Return the sequential composition of `self` and `other`.
    ///
    /// Each term of the result is a term of `self` followed by a term of
    /// `other` (or preceded by it if `front` is `true`), with probability
    /// equal to the product of the two. If `qargs` is given, qubit *k* of
    /// `other` acts on qubit `qargs[k]` of `self`; otherwise both must act on
    /// the same number of qubits. If `other` is wider than `self`, the terms
    /// of `self` are first padded to `other`'s width.
    pub fn compose(
        &self,
        other: &Self,
        qargs: Option<&[usize]>,
        front: bool,
    ) -> NoiseResult<Self>
    {
        match qargs {
            None if other.num_qubits != self.num_qubits => {
                return Err(IncompatibleWidth(other.num_qubits, self.num_qubits));
            },
            Some(qs) if qs.len() != other.num_qubits => {
                return Err(IncompatibleWidth(qs.len(), other.num_qubits));
            },
            _ => { },
        }
        let width = self.num_qubits.max(other.num_qubits);
        let terms: Vec<(Circuit, f64)> =
            iproduct!(self.terms(), other.terms())
            .map(|((lcirc, lp), (rcirc, rp))| {
                let circ =
                    lcirc.enlarged(width).compose(rcirc, qargs, front)?;
                Ok((circ, lp * rp))
            })
            .collect::<NoiseResult<_>>()?;
        debug!(
            left = self.size(),
            right = other.size(),
            front,
            "composed stochastic channels",
        );
        self.rebuild(terms)
    }

    /// Return the parallel composition `self ⊗ other`, with `other` acting on
    /// the low qubits and `self` on the qubits above it.
    pub fn tensor(&self, other: &Self) -> NoiseResult<Self> {
        let terms =
            iproduct!(self.terms(), other.terms())
            .map(|((lcirc, lp), (rcirc, rp))| (lcirc.tensor(rcirc), lp * rp));
        self.rebuild(terms)
    }

    /// Return the parallel composition `other ⊗ self`.
    pub fn expand(&self, other: &Self) -> NoiseResult<Self> {
        other.tensor(self)
    }

    /// Like [`compose`][Self::compose], but with a dense right operand. The
    /// result is a dense super-operator.
    pub fn compose_dense(
        &self,
        other: &SuperOp,
        qargs: Option<&[usize]>,
        front: bool,
    ) -> NoiseResult<SuperOp>
    {
        Ok(self.to_superop()?.compose(other, qargs, front)?)
    }

    /// Like [`tensor`][Self::tensor], but with a dense right operand.
    pub fn tensor_dense(&self, other: &SuperOp) -> NoiseResult<SuperOp> {
        Ok(self.to_superop()?.tensor(other))
    }

    /// Like [`expand`][Self::expand], but with a dense right operand.
    pub fn expand_dense(&self, other: &SuperOp) -> NoiseResult<SuperOp> {
        Ok(self.to_superop()?.expand(other))
    }
}

// mixtures of CPTP maps are not closed under linear arithmetic
macro_rules! unsupported_binop {
    ( $trait:ident, $method:ident, $rhs:ty, $lhs:ty, $op:literal ) => {
        impl std::ops::$trait<$rhs> for $lhs {
            type Output = NoiseResult<StochasticChannel>;

            fn $method(self, _rhs: $rhs) -> Self::Output {
                Err(UnsupportedOperation(
                    format!("'{}' is not supported for stochastic channels", $op)
                ))
            }
        }
    }
}

unsupported_binop!(Mul, mul, f64, StochasticChannel, "*");
unsupported_binop!(Mul, mul, f64, &StochasticChannel, "*");
unsupported_binop!(Mul, mul, StochasticChannel, f64, "*");
unsupported_binop!(Mul, mul, &StochasticChannel, f64, "*");
unsupported_binop!(Div, div, f64, StochasticChannel, "/");
unsupported_binop!(Div, div, f64, &StochasticChannel, "/");
unsupported_binop!(Add, add, StochasticChannel, StochasticChannel, "+");
unsupported_binop!(Add, add, &StochasticChannel, &StochasticChannel, "+");
unsupported_binop!(Sub, sub, StochasticChannel, StochasticChannel, "-");
unsupported_binop!(Sub, sub, &StochasticChannel, &StochasticChannel, "-");

impl std::ops::Neg for StochasticChannel {
    type Output = NoiseResult<StochasticChannel>;

    fn neg(self) -> Self::Output { -&self }
}

impl std::ops::Neg for &StochasticChannel {
    type Output = NoiseResult<StochasticChannel>;

    fn neg(self) -> Self::Output {
        Err(UnsupportedOperation(
            "'-' is not supported for stochastic channels".into()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        channel::{ Operator, Tolerance },
        circuit::Gate,
    };
    use super::*;

    fn bit_flip(p: f64) -> StochasticChannel {
        StochasticChannel::new([(Gate::X, p), (Gate::I, 1.0 - p)]).unwrap()
    }

    fn phase_flip(p: f64) -> StochasticChannel {
        StochasticChannel::new([(Gate::Z, p), (Gate::I, 1.0 - p)]).unwrap()
    }

    fn dense(gate: Gate) -> SuperOp {
        SuperOp::from(&Operator::new(gate.matrix()).unwrap())
    }

    #[test]
    fn term_count_law() {
        let a = bit_flip(0.1);
        let b = phase_flip(0.2);
        let expected = [0.1 * 0.2, 0.1 * 0.8, 0.9 * 0.2, 0.9 * 0.8];
        let results = [
            a.compose(&b, None, false).unwrap(),
            a.tensor(&b).unwrap(),
            a.expand(&b).unwrap(),
        ];
        for chan in results.iter().take(2) {
            assert_eq!(chan.size(), 4);
            for (p, q) in chan.probabilities().iter().zip(expected) {
                assert!((p - q).abs() < 1e-15);
            }
        }
        assert_eq!(results[2].size(), 4);
        let total: f64 = results[2].probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-15);
    }

    #[test]
    fn compose_matches_dense() {
        let tol = Tolerance::default();
        let a = bit_flip(0.1);
        let b = StochasticChannel::new([(Gate::H, 0.3), (Gate::S, 0.7)]).unwrap();
        let sa = a.to_superop().unwrap();
        let sb = b.to_superop().unwrap();
        for front in [false, true] {
            let composed = a.compose(&b, None, front).unwrap();
            let expected = sa.compose(&sb, None, front).unwrap();
            assert!(composed.to_superop().unwrap().approx_eq(&expected, &tol));
            let dense = a.compose_dense(&sb, None, front).unwrap();
            assert!(dense.approx_eq(&expected, &tol));
        }
        // H then S differs from S then H
        let back = a.compose(&b, None, false).unwrap();
        let front = a.compose(&b, None, true).unwrap();
        assert_ne!(back, front);
    }

    #[test]
    fn compose_widths() {
        let a = bit_flip(0.1);
        let wide = StochasticChannel::from_op((Gate::CX, [0, 1])).unwrap();
        assert!(matches!(a.compose(&wide, None, false), Err(IncompatibleWidth(2, 1))));
        assert!(matches!(
            wide.compose(&a, Some(&[0, 1]), false),
            Err(IncompatibleWidth(2, 1)),
        ));
        // narrower left operand is padded
        let padded = a.compose(&wide, Some(&[1, 0]), false).unwrap();
        assert_eq!(padded.num_qubits(), 2);
        assert_eq!(padded.size(), 2);
    }

    #[test]
    fn padding_is_lossless() {
        let tol = Tolerance::default();
        let a = bit_flip(0.3);
        let sa = a.to_superop().unwrap();

        let ctx = StochasticChannel::from_op((Gate::I, [2])).unwrap();
        assert_eq!(ctx.num_qubits(), 3);
        let placed = ctx.compose(&a, Some(&[1]), false).unwrap();
        let embedded = sa.embed(&[1], 3).unwrap();
        assert!(placed.to_superop().unwrap().approx_eq(&embedded, &tol));

        let id2 = StochasticChannel::from_op((Gate::I, [1])).unwrap();
        let expanded = a.expand(&id2).unwrap();
        assert_eq!(expanded.num_qubits(), 3);
        let embedded = sa.embed(&[0], 3).unwrap();
        assert!(expanded.to_superop().unwrap().approx_eq(&embedded, &tol));
    }

    #[test]
    fn tensor_matches_dense() {
        let tol = Tolerance::default();
        let a = bit_flip(0.25);
        let b = StochasticChannel::new([(Gate::CZ, 0.5), (Gate::Swap, 0.5)]).unwrap();
        let sa = a.to_superop().unwrap();
        let sb = b.to_superop().unwrap();

        let ab = a.tensor(&b).unwrap();
        assert_eq!(ab.num_qubits(), 3);
        assert!(ab.to_superop().unwrap().approx_eq(&sa.tensor(&sb), &tol));
        assert!(a.tensor_dense(&sb).unwrap().approx_eq(&sa.tensor(&sb), &tol));

        let ba = a.expand(&b).unwrap();
        assert!(ba.to_superop().unwrap().approx_eq(&sb.tensor(&sa), &tol));
        assert!(a.expand_dense(&sb).unwrap().approx_eq(&sb.tensor(&sa), &tol));

        // X on the high qubit, Z on the low one
        let xz = StochasticChannel::from_op(Gate::X).unwrap()
            .tensor(&StochasticChannel::from_op(Gate::Z).unwrap())
            .unwrap();
        assert!(xz.to_superop().unwrap()
            .approx_eq(&dense(Gate::X).tensor(&dense(Gate::Z)), &tol));
    }

    #[test]
    fn result_keeps_left_tolerance() {
        let opts = ChannelOptions::new(Tolerance::new(1e-3, 1e-4));
        let a = StochasticChannel::with_options([(Gate::X, 1.0)], &opts).unwrap();
        let b = bit_flip(0.5);
        assert_eq!(a.compose(&b, None, false).unwrap().tolerance(), a.tolerance());
        assert_eq!(b.tensor(&a).unwrap().tolerance(), b.tolerance());
    }

    #[test]
    fn arithmetic_is_unsupported() {
        let chan = bit_flip(0.1);
        assert!(matches!(&chan * 2.0, Err(UnsupportedOperation(_))));
        assert!(matches!(2.0 * &chan, Err(UnsupportedOperation(_))));
        assert!(matches!(&chan / 2.0, Err(UnsupportedOperation(_))));
        assert!(matches!(&chan + &chan, Err(UnsupportedOperation(_))));
        assert!(matches!(&chan - &chan, Err(UnsupportedOperation(_))));
        assert!(matches!(-&chan, Err(UnsupportedOperation(_))));
        assert!(matches!(-chan, Err(UnsupportedOperation(_))));
    }
}
