#![allow(non_snake_case, non_upper_case_globals)]

//! This package contains tools for describing noise in quantum circuits as
//! [stochastic mixtures][mixed-unitary] of ordinary circuit operations.
//!
//! - [`noise`] provides [`StochasticChannel`], a quantum channel stored as a
//! list of error circuits applied with given probabilities, along with its
//! composition algebra and a set of [standard noise models][noise::standard].
//! - [`circuit`] provides the circuits from which error terms are built, using
//! the conventional [circuit notation][qcircuits].
//! - [`channel`] provides dense matrix representations of [quantum
//! channels][channels] (unitary operators, Kraus sets, and
//! super-operators), used to check validity and to compare channels.
//!
//! Qubits are little-endian throughout: qubit *k* of a register corresponds to
//! bit *k* of a basis-state index.
//!
//! [mixed-unitary]: https://en.wikipedia.org/wiki/Quantum_channel
//! [qcircuits]: https://en.wikipedia.org/wiki/Quantum_circuit
//! [channels]: https://en.wikipedia.org/wiki/Quantum_operation
//!
//! # Further reading
//! - M. A. Nielsen and I. L. Chuang, *Quantum Computation and Quantum
//! Information*, ch. 8.
//! - J. Watrous, *The Theory of Quantum Information*, ch. 2.
//!

pub mod phase;
pub mod circuit;
pub mod channel;
pub mod noise;

pub use noise::{ NoiseError, NoiseResult, StochasticChannel };

pub extern crate num_complex;
/// Handy macro to create `num_complex::Complex64`s from more natural and
/// succinct syntax.
///
/// ```
/// use std::f64::consts::PI;
/// use num_complex::Complex64;
/// use qnoise::c;
///
/// assert_eq!( c!(i (-1.0)),    Complex64::new(0.0, -1.0)      );
/// assert_eq!( c!(e PI),        Complex64::cis(PI)             );
/// assert_eq!( c!(1.0),         Complex64::new(1.0, 0.0)       );
/// assert_eq!( c!(1.0 + i 1.0), Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0 - i 1.0), Complex64::new(1.0, -1.0)      );
/// assert_eq!( c!(1.0, 1.0),    Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0, e PI),   Complex64::from_polar(1.0, PI) );
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr )
        => { $crate::num_complex::Complex64::new(0.0, $im) };
    ( e $ph:expr )
        => { $crate::num_complex::Complex64::cis($ph) };
    ( $re:expr )
        => { $crate::num_complex::Complex64::new($re, 0.0) };
    ( $re:literal + i $im:literal )
        => { $crate::num_complex::Complex64::new($re, $im) };
    ( $re:literal - i $im:literal )
        => { $crate::num_complex::Complex64::new($re, -$im) };
    ( $r:expr, e $ph:expr )
        => { $crate::num_complex::Complex64::from_polar($r, $ph) };
    ( $re:expr, $im:expr )
        => { $crate::num_complex::Complex64::new($re, $im) };
}
