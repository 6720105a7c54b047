//! Small dense linear-algebra helpers shared by PCA and spectral clustering.
//!
//! Everything here works on flat row-major `f64` buffers. Eigenpairs are
//! extracted by power iteration with Hotelling deflation, which is accurate
//! enough for the handful of leading components the rest of the crate needs
//! and keeps the crate free of a matrix-library dependency.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub(crate) fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Scale `v` to unit length. Returns `false` when the vector is too close
/// to zero to normalize; `v` is left untouched in that case.
pub(crate) fn normalize_in_place(v: &mut [f64]) -> bool {
    let n = norm(v);
    if n <= 1e-12 {
        return false;
    }
    for x in v.iter_mut() {
        *x /= n;
    }
    true
}

fn matvec(matrix: &[f64], n: usize, v: &[f64], out: &mut [f64]) {
    for (i, o) in out.iter_mut().enumerate() {
        *o = dot(&matrix[i * n..(i + 1) * n], v);
    }
}

/// Leading eigenpairs of a symmetric `n x n` matrix, in descending
/// eigenvalue order.
///
/// Each component is found by power iteration from a seeded random start,
/// re-orthogonalized against the components already found, then removed
/// from a working copy of the matrix by deflation. Callers whose spectra
/// may contain negative eigenvalues of large magnitude should shift the
/// matrix first so the wanted eigenvalues dominate in absolute value.
pub(crate) fn top_eigenpairs(matrix: &[f64], n: usize, k: usize, seed: u64) -> Vec<(f64, Vec<f64>)> {
    debug_assert_eq!(matrix.len(), n * n);
    let k = k.min(n);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut work = matrix.to_vec();
    let mut pairs: Vec<(f64, Vec<f64>)> = Vec::with_capacity(k);

    const MAX_ITER: usize = 300;
    const TOL: f64 = 1e-10;

    for _ in 0..k {
        let mut v: Vec<f64> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();
        if !normalize_in_place(&mut v) {
            v = vec![0.0; n];
            v[0] = 1.0;
        }

        let mut next = vec![0.0f64; n];
        let mut value = 0.0f64;
        for _ in 0..MAX_ITER {
            // keep the iterate out of the span of components already found
            for (_, u) in &pairs {
                let proj = dot(&v, u);
                for (x, y) in v.iter_mut().zip(u.iter()) {
                    *x -= proj * y;
                }
            }
            if !normalize_in_place(&mut v) {
                break;
            }

            matvec(&work, n, &v, &mut next);
            let new_value = dot(&v, &next);
            let n_next = norm(&next);
            if n_next <= 1e-12 {
                // matrix annihilates this direction; eigenvalue is zero
                value = 0.0;
                break;
            }
            for (x, y) in v.iter_mut().zip(next.iter()) {
                *x = y / n_next;
            }
            if (new_value - value).abs() <= TOL * new_value.abs().max(1.0) {
                value = new_value;
                break;
            }
            value = new_value;
        }

        // deflate: work -= value * v v^T
        for i in 0..n {
            for j in 0..n {
                work[i * n + j] -= value * v[i] * v[j];
            }
        }
        pairs.push((value, v));
    }

    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    pairs
}
