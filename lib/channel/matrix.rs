//! Low-level complex matrix helpers shared by the channel representations.

use nalgebra as na;
use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::Zero;
use super::{ ChannelError, ChannelResult, Tolerance };

pub(crate) type Mat = nd::Array2<C64>;

// return log2 of a square matrix's dimension
pub(crate) fn qubits_of(mat: &Mat) -> ChannelResult<usize> {
    let (r, c) = mat.dim();
    if r != c || !r.is_power_of_two() {
        return Err(ChannelError::InvalidDimensions(r, c));
    }
    Ok(r.trailing_zeros() as usize)
}

pub(crate) fn adjoint(a: &Mat) -> Mat { a.t().mapv(|x| x.conj()) }

/// Kronecker product `a ⊗ b`, with `b` varying fastest.
pub(crate) fn kron(a: &Mat, b: &Mat) -> Mat {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    let mut out = Mat::zeros((ar * br, ac * bc));
    for ((i, j), &x) in a.indexed_iter() {
        if x.is_zero() { continue; }
        out.slice_mut(nd::s![i * br..(i + 1) * br, j * bc..(j + 1) * bc])
            .assign(&b.mapv(|y| x * y));
    }
    out
}

pub(crate) fn allclose(a: &Mat, b: &Mat, tol: &Tolerance) -> bool {
    a.dim() == b.dim()
        && nd::Zip::from(a).and(b).all(|&x, &y| tol.close(x, y))
}

/// Return `true` if `mat` is the identity, optionally up to a global phase.
pub(crate) fn is_identity(mat: &Mat, ignore_phase: bool, tol: &Tolerance)
    -> bool
{
    let (r, c) = mat.dim();
    if r != c || r == 0 { return false; }
    let scaled;
    let mat =
        if ignore_phase {
            let a = mat[[0, 0]];
            if a.norm() <= tol.atol { return false; }
            let ph = a.conj() / a.norm();
            scaled = mat.mapv(|x| x * ph);
            &scaled
        } else {
            mat
        };
    allclose(mat, &Mat::eye(r), tol)
}

pub(crate) fn is_hermitian(mat: &Mat, tol: &Tolerance) -> bool {
    allclose(mat, &adjoint(mat), tol)
}

// spread the bits of local index `r` over the register positions in `qubits`
fn scatter(r: usize, qubits: &[usize]) -> usize {
    qubits.iter().enumerate()
        .map(|(t, q)| ((r >> t) & 1) << q)
        .sum()
}

// inverse of `scatter`
fn gather(idx: usize, qubits: &[usize]) -> usize {
    qubits.iter().enumerate()
        .map(|(t, q)| ((idx >> q) & 1) << t)
        .sum()
}

pub(crate) fn check_targets(qubits: &[usize], n: usize) -> ChannelResult<()> {
    for (k, &q) in qubits.iter().enumerate() {
        if q >= n { return Err(ChannelError::QubitOutOfRange(q, n)); }
        if qubits[..k].contains(&q) {
            return Err(ChannelError::DuplicateQubit(q));
        }
    }
    Ok(())
}

/// Embed a *k*-qubit operator into an `n`-qubit register, acting on `qubits`
/// (local bit *t* ↦ register qubit `qubits[t]`) and as the identity
/// elsewhere.
pub(crate) fn embed_operator(op: &Mat, qubits: &[usize], n: usize) -> Mat {
    let dim = 1_usize << n;
    let d = op.nrows();
    let mask = scatter(d - 1, qubits);
    let table: Vec<usize> = (0..d).map(|r| scatter(r, qubits)).collect();
    let mut out = Mat::zeros((dim, dim));
    for row in 0..dim {
        let rest = row & !mask;
        let r = gather(row, qubits);
        for (c, &sc) in table.iter().enumerate() {
            out[[row, rest | sc]] = op[[r, c]];
        }
    }
    out
}

/// Embed a *k*-qubit super-operator (column-stacking convention) into an
/// `n`-qubit register, acting on `qubits` and as the identity channel
/// elsewhere.
pub(crate) fn embed_superop(sop: &Mat, qubits: &[usize], n: usize) -> Mat {
    let dim = 1_usize << n;
    let d = 1_usize << qubits.len();
    let mask = scatter(d - 1, qubits);
    let table: Vec<usize> = (0..d).map(|r| scatter(r, qubits)).collect();
    let mut out = Mat::zeros((dim * dim, dim * dim));
    for col_out in 0..dim {
        let rest_c = col_out & !mask;
        let lc = gather(col_out, qubits);
        for row_out in 0..dim {
            let rest_r = row_out & !mask;
            let lr = gather(row_out, qubits);
            let out_idx = row_out + dim * col_out;
            let loc_idx = lr + d * lc;
            for (c, &sc) in table.iter().enumerate() {
                for (r, &sr) in table.iter().enumerate() {
                    let x = sop[[loc_idx, r + d * c]];
                    if x.is_zero() { continue; }
                    out[[out_idx, (rest_r | sr) + dim * (rest_c | sc)]] = x;
                }
            }
        }
    }
    out
}

/// Eigendecomposition of a Hermitian matrix, returning (eigenvalue,
/// eigenvector) pairs.
pub(crate) fn hermitian_eigen(mat: &Mat) -> Vec<(f64, nd::Array1<C64>)> {
    let n = mat.nrows();
    let m = na::DMatrix::<C64>::from_fn(n, n, |i, j| {
        (mat[[i, j]] + mat[[j, i]].conj()) / 2.0
    });
    let eig = m.symmetric_eigen();
    eig.eigenvalues.iter().enumerate()
        .map(|(k, &lam)| {
            let col = eig.eigenvectors.column(k);
            let v: nd::Array1<C64> = col.iter().copied().collect();
            (lam, v)
        })
        .collect()
}
