//! Dense symmetric eigendecomposition.
//!
//! [`symmetric_eigen`] runs the cyclic Jacobi method on a row-major `n × n`
//! symmetric matrix. Jacobi is slower than tridiagonal QR for large `n`, but
//! the matrices decomposed in this workspace are small (spectral windows of a
//! few dozen bins) and Jacobi gives accurate eigenvectors for clustered
//! eigenvalues, which matters once vectors are compared bin to bin.
//!
//! Eigenpairs are returned sorted by descending eigenvalue. Equal eigenvalues
//! keep the order of the diagonal positions they converged on, so the output
//! is deterministic for a given input.

use cyanea_core::{CyaneaError, Result};

/// Maximum number of full Jacobi sweeps before giving up on convergence.
const MAX_SWEEPS: usize = 100;

/// Relative off-diagonal norm at which the iteration is considered converged.
const REL_TOL: f64 = 1e-15;

/// Eigenvalues and eigenvectors of a symmetric matrix.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// Eigenvalues, descending.
    pub eigenvalues: Vec<f64>,
    /// `eigenvectors[k]` is the unit eigenvector for `eigenvalues[k]`.
    pub eigenvectors: Vec<Vec<f64>>,
    /// Number of Jacobi sweeps performed.
    pub sweeps: usize,
}

/// Full eigendecomposition of a symmetric row-major `n × n` matrix.
///
/// Only the upper triangle needs to be meaningful in spirit, but the matrix is
/// used as given; asymmetric input yields the decomposition of whatever the
/// rotations converge to. Non-finite entries do not error: they propagate into
/// NaN eigenpairs.
pub fn symmetric_eigen(matrix: &[f64], n: usize) -> Result<SymmetricEigen> {
    if n == 0 {
        return Err(CyaneaError::InvalidInput(
            "symmetric_eigen: matrix must not be empty".into(),
        ));
    }
    if matrix.len() != n * n {
        return Err(CyaneaError::InvalidInput(format!(
            "symmetric_eigen: expected {} elements ({n}×{n}), got {}",
            n * n,
            matrix.len()
        )));
    }

    let mut a = matrix.to_vec();
    let mut v = identity(n);

    let scale = frobenius(&a);
    let threshold = REL_TOL * scale;

    let mut sweeps = 0;
    while sweeps < MAX_SWEEPS {
        // NaN compares false here and ends the iteration.
        if !(off_diagonal(&a, n) > threshold) {
            break;
        }
        sweeps += 1;

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p * n + q];
                if apq == 0.0 {
                    continue;
                }
                let app = a[p * n + p];
                let aqq = a[q * n + q];

                // Below the precision of both diagonal entries: annihilate.
                let g = 100.0 * apq.abs();
                if app.abs() + g == app.abs() && aqq.abs() + g == aqq.abs() {
                    a[p * n + q] = 0.0;
                    a[q * n + p] = 0.0;
                    continue;
                }

                let theta = (aqq - app) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                rotate(&mut a, &mut v, n, p, q, c, s);
                a[p * n + q] = 0.0;
                a[q * n + p] = 0.0;
            }
        }
    }

    let diag: Vec<f64> = (0..n).map(|i| a[i * n + i]).collect();
    let mut order: Vec<usize> = (0..n).collect();
    // Stable: ties keep ascending diagonal position.
    order.sort_by(|&i, &j| diag[j].total_cmp(&diag[i]));

    let eigenvalues = order.iter().map(|&k| diag[k]).collect();
    let eigenvectors = order
        .iter()
        .map(|&k| (0..n).map(|row| v[row * n + k]).collect())
        .collect();

    Ok(SymmetricEigen {
        eigenvalues,
        eigenvectors,
        sweeps,
    })
}

/// The `k` eigenpairs with the largest eigenvalues, descending.
///
/// `k` is capped at `n`.
pub fn top_eigenpairs(matrix: &[f64], n: usize, k: usize) -> Result<SymmetricEigen> {
    let mut eig = symmetric_eigen(matrix, n)?;
    let k = k.min(n);
    eig.eigenvalues.truncate(k);
    eig.eigenvectors.truncate(k);
    Ok(eig)
}

// ── Internal ───────────────────────────────────────────────────────────────

fn identity(n: usize) -> Vec<f64> {
    let mut m = vec![0.0; n * n];
    for i in 0..n {
        m[i * n + i] = 1.0;
    }
    m
}

fn frobenius(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn off_diagonal(a: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += a[i * n + j] * a[i * n + j];
            }
        }
    }
    sum.sqrt()
}

/// Apply the Givens rotation A' = Pᵀ A P and accumulate V' = V P.
fn rotate(a: &mut [f64], v: &mut [f64], n: usize, p: usize, q: usize, c: f64, s: f64) {
    for k in 0..n {
        let akp = a[k * n + p];
        let akq = a[k * n + q];
        a[k * n + p] = c * akp - s * akq;
        a[k * n + q] = s * akp + c * akq;
    }
    for k in 0..n {
        let apk = a[p * n + k];
        let aqk = a[q * n + k];
        a[p * n + k] = c * apk - s * aqk;
        a[q * n + k] = s * apk + c * aqk;
    }
    for k in 0..n {
        let vkp = v[k * n + p];
        let vkq = v[k * n + q];
        v[k * n + p] = c * vkp - s * vkq;
        v[k * n + q] = s * vkp + c * vkq;
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
