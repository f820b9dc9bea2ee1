use std::f64::consts::FRAC_1_SQRT_2 as ONRT2;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ c, phase::Phase };

/// A standard unitary gate.
///
/// Gates carry no qubit indices; they are placed on a register by a
/// [`Circuit`][super::Circuit]. For multi-qubit gates the first target qubit is
/// the least significant bit of the matrix index, e.g. for `CX` the control is
/// the first target and the target the second.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Identity.
    I,
    /// π-rotation about *x*.
    X,
    /// π-rotation about *y*.
    Y,
    /// π-rotation about *z*.
    Z,
    /// Hadamard.
    H,
    /// π/2-rotation about *z*.
    S,
    /// Inverse of `S`.
    Sdg,
    /// π/4-rotation about *z*.
    T,
    /// Inverse of `T`.
    Tdg,
    /// Square root of `X`.
    SX,
    /// Rotation about *x*.
    XRot(Phase),
    /// Rotation about *y*.
    YRot(Phase),
    /// Rotation about *z*.
    ZRot(Phase),
    /// `X` on the second qubit, controlled by the first.
    CX,
    /// `Y` on the second qubit, controlled by the first.
    CY,
    /// `Z` on the second qubit, controlled by the first.
    CZ,
    /// Swap gate.
    Swap,
    /// Toffoli gate: `X` on the third qubit, controlled by the first and
    /// second.
    Toff,
}

impl Gate {
    /// Return `true` if `self` is `I`.
    pub fn is_i(&self) -> bool { matches!(self, Self::I) }

    /// Return `true` if `self` is one of the rotation gates.
    pub fn is_rot(&self) -> bool {
        matches!(self, Self::XRot(..) | Self::YRot(..) | Self::ZRot(..))
    }

    /// Return the number of qubits acted on.
    pub fn num_qubits(&self) -> usize {
        match self {
            Self::CX | Self::CY | Self::CZ | Self::Swap => 2,
            Self::Toff => 3,
            _ => 1,
        }
    }

    /// Return the canonical lower-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::I => "id",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::H => "h",
            Self::S => "s",
            Self::Sdg => "sdg",
            Self::T => "t",
            Self::Tdg => "tdg",
            Self::SX => "sx",
            Self::XRot(_) => "rx",
            Self::YRot(_) => "ry",
            Self::ZRot(_) => "rz",
            Self::CX => "cx",
            Self::CY => "cy",
            Self::CZ => "cz",
            Self::Swap => "swap",
            Self::Toff => "ccx",
        }
    }

    /// Return the rotation angle, if any.
    pub fn angle(&self) -> Option<Phase> {
        match self {
            Self::XRot(ang) | Self::YRot(ang) | Self::ZRot(ang) => Some(*ang),
            _ => None,
        }
    }

    /// Return the unitary matrix of `self`.
    pub fn matrix(&self) -> nd::Array2<C64> {
        let z = c!(0.0);
        let o = c!(1.0);
        match *self {
            Self::I => nd::Array2::eye(2),
            Self::X => nd::array![[z, o], [o, z]],
            Self::Y => nd::array![[z, c!(i -1.0)], [c!(i 1.0), z]],
            Self::Z => nd::array![[o, z], [z, -o]],
            Self::H => nd::array![[o, o], [o, -o]].mapv(|x| x * ONRT2),
            Self::S => nd::array![[o, z], [z, c!(i 1.0)]],
            Self::Sdg => nd::array![[o, z], [z, c!(i -1.0)]],
            Self::T => nd::array![[o, z], [z, Phase::pi4().cis()]],
            Self::Tdg => nd::array![[o, z], [z, (-Phase::pi4()).cis()]],
            Self::SX => {
                let p = c!(0.5, 0.5);
                let m = c!(0.5, -0.5);
                nd::array![[p, m], [m, p]]
            },
            Self::XRot(ang) => {
                let cs = c!(ang.half_cis().re);
                let sn = c!(i -ang.half_cis().im);
                nd::array![[cs, sn], [sn, cs]]
            },
            Self::YRot(ang) => {
                let cs = c!(ang.half_cis().re);
                let sn = c!(ang.half_cis().im);
                nd::array![[cs, -sn], [sn, cs]]
            },
            Self::ZRot(ang) => {
                let ph = ang.half_cis();
                nd::array![[ph.conj(), z], [z, ph]]
            },
            Self::CX => nd::array![
                [o, z, z, z],
                [z, z, z, o],
                [z, z, o, z],
                [z, o, z, z],
            ],
            Self::CY => nd::array![
                [o, z,          z, z          ],
                [z, z,          z, c!(i -1.0) ],
                [z, z,          o, z          ],
                [z, c!(i 1.0),  z, z          ],
            ],
            Self::CZ => nd::Array2::from_diag(&nd::array![o, o, o, -o]),
            Self::Swap => nd::array![
                [o, z, z, z],
                [z, z, o, z],
                [z, o, z, z],
                [z, z, z, o],
            ],
            Self::Toff => {
                let mut m: nd::Array2<C64> = nd::Array2::eye(8);
                m[[3, 3]] = z;
                m[[7, 7]] = z;
                m[[3, 7]] = o;
                m[[7, 3]] = o;
                m
            },
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.angle() {
            Some(ang) => write!(f, "{}({})", self.name(), ang),
            None => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::channel::{ Operator, SuperOp, Tolerance };
    use super::*;

    fn all_gates() -> [Gate; 18] {
        [
            Gate::I, Gate::X, Gate::Y, Gate::Z, Gate::H, Gate::S, Gate::Sdg,
            Gate::T, Gate::Tdg, Gate::SX,
            Gate::XRot(Phase::new(1, 8)),
            Gate::YRot(Phase::new(1, 3)),
            Gate::ZRot(Phase::new(3, 8)),
            Gate::CX, Gate::CY, Gate::CZ, Gate::Swap, Gate::Toff,
        ]
    }

    #[test]
    fn matrices_are_unitary() {
        let tol = Tolerance::default();
        for gate in all_gates() {
            let op = Operator::new(gate.matrix()).unwrap();
            assert_eq!(op.num_qubits(), gate.num_qubits(), "{gate}");
            assert!(op.is_unitary(&tol), "{gate}");
        }
    }

    #[test]
    fn rotations() {
        let tol = Tolerance::default();
        let channel = |gate: Gate| {
            SuperOp::from(&Operator::new(gate.matrix()).unwrap())
        };
        // equal up to global phase
        assert!(channel(Gate::XRot(Phase::pi())).approx_eq(&channel(Gate::X), &tol));
        assert!(channel(Gate::YRot(Phase::pi())).approx_eq(&channel(Gate::Y), &tol));
        assert!(channel(Gate::ZRot(Phase::pi2())).approx_eq(&channel(Gate::S), &tol));
        assert!(!channel(Gate::ZRot(Phase::pi4())).approx_eq(&channel(Gate::S), &tol));
        let sx2 = Gate::SX.matrix().dot(&Gate::SX.matrix());
        assert!(crate::channel::matrix::allclose(&sx2, &Gate::X.matrix(), &tol));
    }

    #[test]
    fn names() {
        assert_eq!(Gate::I.name(), "id");
        assert_eq!(Gate::Toff.name(), "ccx");
        assert_eq!(Gate::ZRot(Phase::pi2()).to_string(), "rz(π/2)");
        assert_eq!(Gate::CX.to_string(), "cx");
        assert_eq!(Gate::YRot(Phase::pi()).angle(), Some(Phase::pi()));
        assert_eq!(Gate::H.angle(), None);
    }
}
