use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::circuit::{ Instruction, UnitaryGate };
use super::{
    ChannelError,
    ChannelResult,
    Kraus,
    Operator,
    Tolerance,
    matrix::{ self, Mat },
};

/// A channel as a super-operator acting on column-stacked density matrices.
///
/// For an *n*-qubit channel with *d* = 2<sup>*n*</sup>, element *ρ*[*r*, *c*]
/// of a density matrix sits at vectorized index *r* + *d* *c*, so a single
/// operator *K* is represented by conj(*K*) ⊗ *K*.
///
/// Memory and time costs of most operations scale as 16<sup>*n*</sup>.
#[derive(Clone, Debug, PartialEq)]
pub struct SuperOp {
    data: Mat,
    num_qubits: usize,
}

impl SuperOp {
    /// Create a new `SuperOp` from a 4<sup>*n*</sup> × 4<sup>*n*</sup>
    /// matrix.
    pub fn new(data: nd::Array2<C64>) -> ChannelResult<Self> {
        let (r, c) = data.dim();
        let nn = matrix::qubits_of(&data)?;
        if nn % 2 != 0 { return Err(ChannelError::InvalidDimensions(r, c)); }
        Ok(Self { data, num_qubits: nn / 2 })
    }

    /// The zero map on `n` qubits.
    pub fn zeros(n: usize) -> Self {
        let dim = 1 << (2 * n);
        Self { data: Mat::zeros((dim, dim)), num_qubits: n }
    }

    /// The identity channel on `n` qubits.
    pub fn identity(n: usize) -> Self {
        Self { data: Mat::eye(1 << (2 * n)), num_qubits: n }
    }

    pub fn num_qubits(&self) -> usize { self.num_qubits }

    pub fn data(&self) -> &nd::Array2<C64> { &self.data }

    // register dimension 2^n
    fn dim(&self) -> usize { 1 << self.num_qubits }

    /// Return `true` if `self` and `other` act on the same number of qubits and
    /// are element-wise close.
    pub fn approx_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        self.num_qubits == other.num_qubits
            && matrix::allclose(&self.data, &other.data, tol)
    }

    /// Apply the channel to a density matrix.
    pub fn apply(&self, rho: &nd::Array2<C64>) -> ChannelResult<nd::Array2<C64>>
    {
        let d = self.dim();
        if rho.dim() != (d, d) {
            return Err(ChannelError::InvalidDimensions(rho.nrows(), rho.ncols()));
        }
        let vec: nd::Array1<C64> =
            (0..d * d).map(|k| rho[[k % d, k / d]]).collect();
        let out = self.data.dot(&vec);
        Ok(Mat::from_shape_fn((d, d), |(r, c)| out[r + d * c]))
    }

    /// Return the Choi matrix Σ<sub>*ij*</sub> |*i*⟩⟨*j*| ⊗ Φ(|*i*⟩⟨*j*|).
    pub fn choi(&self) -> nd::Array2<C64> {
        let d = self.dim();
        Mat::from_shape_fn((d * d, d * d), |(a, b)| {
            let (i, r) = (a / d, a % d);
            let (j, c) = (b / d, b % d);
            self.data[[r + d * c, i + d * j]]
        })
    }

    /// Return `true` if the Choi matrix is positive semidefinite.
    pub fn is_cp(&self, tol: &Tolerance) -> bool {
        let choi = self.choi();
        matrix::is_hermitian(&choi, tol)
            && matrix::hermitian_eigen(&choi).iter()
                .all(|(lam, _)| *lam >= -tol.atol)
    }

    /// Return `true` if Tr Φ(*ρ*) = Tr *ρ* for all *ρ*.
    pub fn is_tp(&self, tol: &Tolerance) -> bool {
        let d = self.dim();
        (0..d).all(|i| {
            (0..d).all(|j| {
                let tr: C64 =
                    (0..d).map(|r| self.data[[r + d * r, i + d * j]]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                tol.close(tr, expected)
            })
        })
    }

    pub fn is_cptp(&self, tol: &Tolerance) -> bool {
        self.is_tp(tol) && self.is_cp(tol)
    }

    /// Decompose into a minimal Kraus representation via the eigenvectors of
    /// the Choi matrix.
    ///
    /// Fails if the channel is not completely positive.
    pub fn to_kraus(&self, tol: &Tolerance) -> ChannelResult<Kraus> {
        let d = self.dim();
        let choi = self.choi();
        if !matrix::is_hermitian(&choi, tol) {
            return Err(ChannelError::NotCompletelyPositive);
        }
        let mut ops: Vec<Mat> = Vec::new();
        for (lam, v) in matrix::hermitian_eigen(&choi) {
            if lam < -tol.atol { return Err(ChannelError::NotCompletelyPositive); }
            if lam <= tol.atol { continue; }
            let s = lam.sqrt();
            ops.push(Mat::from_shape_fn((d, d), |(r, i)| v[i * d + r] * s));
        }
        if ops.is_empty() { ops.push(Mat::zeros((d, d))); }
        Kraus::new(ops)
    }

    /// Convert to a single [`Instruction`]: a unitary gate if the channel has
    /// Kraus rank one, otherwise a Kraus instruction.
    ///
    /// Fails if the channel is not CPTP.
    pub fn to_instruction(&self, tol: &Tolerance) -> ChannelResult<Instruction> {
        let kraus = self.to_kraus(tol)?;
        if !kraus.is_cptp(tol) { return Err(ChannelError::NotCptp); }
        if kraus.len() == 1 {
            let op = Operator::new(kraus.ops()[0].clone())?;
            Ok(Instruction::Unitary(UnitaryGate::new(op)))
        } else {
            Ok(Instruction::Kraus(kraus))
        }
    }

    /// Return a copy of `self` acting on the `qubits` of an `n`-qubit
    /// register and as the identity on the rest.
    pub fn embed(&self, qubits: &[usize], n: usize) -> ChannelResult<Self> {
        if qubits.len() != self.num_qubits {
            return Err(ChannelError::WidthMismatch(qubits.len(), self.num_qubits));
        }
        matrix::check_targets(qubits, n)?;
        let data = matrix::embed_superop(&self.data, qubits, n);
        Ok(Self { data, num_qubits: n })
    }

    /// Return the sequential composition of `self` and `other`.
    ///
    /// By default `other` is applied after `self`; pass `front = true` to apply
    /// it before. If `qargs` is given, `other` acts on those qubits of `self`;
    /// otherwise both must act on the same number of qubits.
    pub fn compose(&self, other: &Self, qargs: Option<&[usize]>, front: bool)
        -> ChannelResult<Self>
    {
        let other =
            match qargs {
                Some(qubits) => other.embed(qubits, self.num_qubits)?,
                None if other.num_qubits != self.num_qubits => {
                    return Err(
                        ChannelError::WidthMismatch(other.num_qubits, self.num_qubits));
                },
                None => other.clone(),
            };
        let data =
            if front {
                self.data.dot(&other.data)
            } else {
                other.data.dot(&self.data)
            };
        Ok(Self { data, num_qubits: self.num_qubits })
    }

    /// Return the channel `self ⊗ other`, with `other` acting on the low
    /// qubits.
    pub fn tensor(&self, other: &Self) -> Self {
        let da = self.dim();
        let db = other.dim();
        let dd = da * db;
        // split a composite vectorized index into its two factors'
        let split = |k: usize| -> (usize, usize) {
            let (r, c) = (k % dd, k / dd);
            let (ra, rb) = (r / db, r % db);
            let (ca, cb) = (c / db, c % db);
            (ra + da * ca, rb + db * cb)
        };
        let data =
            Mat::from_shape_fn((dd * dd, dd * dd), |(row, col)| {
                let (ar, br) = split(row);
                let (ac, bc) = split(col);
                self.data[[ar, ac]] * other.data[[br, bc]]
            });
        Self { data, num_qubits: self.num_qubits + other.num_qubits }
    }

    /// Return the channel `other ⊗ self`.
    pub fn expand(&self, other: &Self) -> Self { other.tensor(self) }
}

impl From<&Operator> for SuperOp {
    fn from(op: &Operator) -> Self {
        let u = op.data();
        Self {
            data: matrix::kron(&u.mapv(|x| x.conj()), u),
            num_qubits: op.num_qubits(),
        }
    }
}

impl From<&Kraus> for SuperOp {
    fn from(kraus: &Kraus) -> Self {
        let mut acc = Self::zeros(kraus.num_qubits());
        for k in kraus.ops() {
            acc.data += &matrix::kron(&k.mapv(|x| x.conj()), k);
        }
        acc
    }
}

impl std::ops::Add<SuperOp> for SuperOp {
    type Output = SuperOp;

    /// *Panics if the operands act on different numbers of qubits.*
    fn add(self, rhs: SuperOp) -> Self::Output {
        assert_eq!(
            self.num_qubits, rhs.num_qubits,
            "superoperators must act on equal numbers of qubits",
        );
        Self { data: self.data + rhs.data, num_qubits: self.num_qubits }
    }
}

impl std::ops::AddAssign<&SuperOp> for SuperOp {
    /// *Panics if the operands act on different numbers of qubits.*
    fn add_assign(&mut self, rhs: &SuperOp) {
        assert_eq!(
            self.num_qubits, rhs.num_qubits,
            "superoperators must act on equal numbers of qubits",
        );
        self.data += &rhs.data;
    }
}

impl std::ops::Mul<f64> for SuperOp {
    type Output = SuperOp;

    fn mul(mut self, rhs: f64) -> Self::Output {
        self.data.mapv_inplace(|x| x * rhs);
        self
    }
}

impl std::ops::Mul<SuperOp> for f64 {
    type Output = SuperOp;

    fn mul(self, rhs: SuperOp) -> Self::Output { rhs * self }
}
