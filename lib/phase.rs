//! Exact rotation angles for parametrized gates.
//!
//! A [`Phase`] stores a rotation angle as a rational fraction of 2*π*, so that
//! angles built from simple fractions (π, π/2, π/4, ...) compare exactly.
//! Arithmetic is always reduced modulo 2*π*.

use std::f64::consts::TAU;
use num_complex::Complex64 as C64;
use num_rational::Rational64 as R64;
use num_traits::{ One, Zero };

// reduce `a` into the half-open interval [0, 1)
fn reduce(a: R64) -> R64 {
    let fl = a.floor();
    let r = a - fl;
    if r < R64::zero() { r + R64::one() } else { r }
}

/// A rotation angle, held as a fraction *φ* of a full turn so that the angle
/// itself is 2*π* × *φ*.
///
/// ```
/// # use qnoise::phase::Phase;
/// assert_eq!( Phase::new(5, 4),  Phase::new(1, 4) );
/// assert_eq!( -Phase::pi2(),     Phase::new(3, 4) );
/// assert_eq!( Phase::pi() + Phase::pi(), Phase::zero() );
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Phase(pub R64);

impl Phase {
    /// Construct `(numer / denom) × 2π`.
    pub fn new(numer: i64, denom: i64) -> Self {
        Self(reduce(R64::new(numer, denom)))
    }

    /// Return the angle in radians, in `[0, 2π)`.
    pub fn radians(self) -> f64 {
        TAU * (*self.0.numer() as f64 / *self.0.denom() as f64)
    }

    /// The zero angle.
    pub fn zero() -> Self { Self(R64::zero()) }

    /// π.
    pub fn pi() -> Self { Self(R64::new(1, 2)) }

    /// π/2.
    pub fn pi2() -> Self { Self(R64::new(1, 4)) }

    /// π/4.
    pub fn pi4() -> Self { Self(R64::new(1, 8)) }

    /// Return e^(*i* × `self`).
    pub fn cis(self) -> C64 { C64::cis(self.radians()) }

    /// Return e^(*i* × `self` / 2), the half-angle phase factor appearing in
    /// rotation gate matrices.
    pub fn half_cis(self) -> C64 { C64::cis(self.radians() / 2.0) }
}

impl PartialEq for Phase {
    fn eq(&self, other: &Self) -> bool { reduce(self.0 - other.0).is_zero() }
}

impl Eq for Phase { }

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let half = reduce(self.0) * 2;
        if half.is_zero() {
            write!(f, "0")
        } else if half.is_one() {
            write!(f, "π")
        } else if half.numer().is_one() {
            write!(f, "π/{}", half.denom())
        } else {
            write!(f, "({})π", half)
        }
    }
}

impl std::ops::Neg for Phase {
    type Output = Phase;

    fn neg(self) -> Self::Output { Self(reduce(-self.0)) }
}

impl std::ops::Add for Phase {
    type Output = Phase;

    fn add(self, rhs: Phase) -> Self::Output { Self(reduce(self.0 + rhs.0)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction() {
        assert_eq!(Phase::new(5, 3), Phase(R64::new(2, 3)));
        assert_eq!(Phase::new(-1, 3), Phase::new(2, 3));
        assert_eq!(Phase::new(1, -4), Phase::new(3, 4));
        assert_eq!(Phase::new(1, 2), Phase::pi());
        assert_eq!(Phase::new(3, 1), Phase::zero());
        assert_ne!(Phase::pi4(), Phase::zero());
    }

    #[test]
    fn radians() {
        fn approx_eq(a: f64, b: f64) -> bool { (a - b).abs() < 1e-12 }

        assert!(approx_eq(Phase::pi().radians(), TAU / 2.0));
        assert!(approx_eq(Phase::pi2().radians(), TAU / 4.0));
        assert!(approx_eq(Phase::new(-1, 4).radians(), 3.0 * TAU / 4.0));
    }

    #[test]
    fn arithmetic() {
        assert_eq!(Phase::pi2() + Phase::pi2(), Phase::pi());
        assert_eq!(Phase::pi4() + -Phase::pi2(), Phase::new(7, 8));
        assert_eq!(-Phase::pi(), Phase::pi());
    }

    #[test]
    fn display() {
        assert_eq!(Phase::zero().to_string(), "0");
        assert_eq!(Phase::pi().to_string(), "π");
        assert_eq!(Phase::pi4().to_string(), "π/4");
        assert_eq!(Phase::new(3, 8).to_string(), "(3/4)π");
    }
}
