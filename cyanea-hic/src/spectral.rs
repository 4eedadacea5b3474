//! Windowed spectral boundary scores.
//!
//! A contact matrix is cut into consecutive, non-overlapping windows along
//! the diagonal. Each window is treated as a weighted graph over its bins:
//! the symmetric-normalised operator `D^{-1/2} W D^{-1/2}` is decomposed, the
//! two leading eigenvectors embed every bin in the plane, and the embedding
//! is projected onto the unit circle. Bins inside one domain land close
//! together on the circle; a domain edge shows up as a jump between
//! neighbouring bins. That jump is the boundary score.
//!
//! The first bin of every window has no in-window predecessor and is never
//! scored, so each window boundary leaves a one-bin gap in the output.

use cyanea_core::{CyaneaError, GenomicAxis, Result};
use cyanea_stats::top_eigenpairs;
use tracing::debug;

use crate::matrix::ContactMatrix;

/// Stabiliser added to edge weights and degrees so isolated bins do not
/// divide by zero.
pub const LAPLACIAN_EPSILON: f64 = 1e-16;

/// Default window width in bins.
pub const DEFAULT_WINDOW_SIZE: usize = 15;

/// Default minimum fraction of non-zero contacts a bin needs in its window.
pub const DEFAULT_GAP_THRESHOLD: f64 = 0.2;

/// Parameters for [`boundary_scores`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectralConfig {
    /// Window width in bins.
    pub window_size: usize,
    /// Bins with a smaller fraction of non-zero in-window contacts are dropped.
    pub gap_threshold: f64,
    /// Added to every edge weight and degree of the window graph.
    pub epsilon: f64,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            gap_threshold: DEFAULT_GAP_THRESHOLD,
            epsilon: LAPLACIAN_EPSILON,
        }
    }
}

impl SpectralConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(CyaneaError::InvalidInput(
                "window_size must be at least 1".into(),
            ));
        }
        if !(self.gap_threshold > 0.0 && self.gap_threshold < 1.0) {
            return Err(CyaneaError::InvalidInput(format!(
                "gap_threshold must be in (0, 1), got {}",
                self.gap_threshold
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(CyaneaError::InvalidInput(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Boundary strength of one bin in one sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryScore {
    /// Sample the score was computed for.
    pub sample_id: String,
    /// Bin start coordinate.
    pub coordinate: u64,
    /// Bin index in the unfiltered input matrix.
    pub index: usize,
    /// Distance to the previous bin on the unit circle, in `[0, 2]`.
    /// `NaN` when the window's operator was numerically degenerate.
    pub score: f64,
}

/// Window `[start, end)` ranges over `n` bins.
///
/// Windows are `window_size` wide, except the last: once another full window
/// no longer fits after the current one, the current window runs to `n`.
/// The tail window is therefore between `window_size` and
/// `2 · window_size − 1` bins, or all of `n` when `n < window_size`.
pub fn window_bounds(n: usize, window_size: usize) -> Vec<(usize, usize)> {
    let mut bounds = Vec::new();
    if window_size == 0 {
        return bounds;
    }
    let mut start = 0;
    while start < n {
        let mut end = start + window_size;
        if end + window_size > n {
            end = n;
        }
        bounds.push((start, end));
        start = end;
    }
    bounds
}

/// Score every bin of `matrix` for the sample `sample_id`.
///
/// All-zero bins are removed before windowing. Within each window, bins below
/// the gap threshold are removed; a window left with fewer than two bins is
/// skipped and its coordinates get no score for this sample. Scores come out
/// in ascending coordinate order.
pub fn boundary_scores(
    sample_id: &str,
    matrix: &ContactMatrix,
    config: &SpectralConfig,
) -> Result<Vec<BoundaryScore>> {
    config.validate()?;
    if matrix.as_slice().len() != matrix.size() * matrix.size() {
        return Err(CyaneaError::InvalidInput(format!(
            "{sample_id}: contact matrix is not square"
        )));
    }

    let informative = matrix.nonzero_bins();
    let coordinates = matrix.coordinates();
    let mut scores = Vec::with_capacity(informative.len());

    for (start, end) in window_bounds(informative.len(), config.window_size) {
        let window = &informative[start..end];
        let retained = gap_filter(matrix, window, config.gap_threshold);
        if retained.len() < 2 {
            debug!(
                sample = sample_id,
                start = coordinates[window[0]],
                bins = window.len(),
                retained = retained.len(),
                "window skipped after gap filtering"
            );
            continue;
        }

        let distances = window_distances(matrix, &retained, config.epsilon)?;
        for (&bin, score) in retained[1..].iter().zip(distances) {
            scores.push(BoundaryScore {
                sample_id: sample_id.to_string(),
                coordinate: coordinates[bin],
                index: bin,
                score,
            });
        }
    }

    debug!(
        sample = sample_id,
        bins = matrix.size(),
        informative = informative.len(),
        scored = scores.len(),
        "boundary scores computed"
    );
    Ok(scores)
}

/// Bins of `window` whose fraction of non-zero in-window contacts reaches
/// `threshold`.
fn gap_filter(matrix: &ContactMatrix, window: &[usize], threshold: f64) -> Vec<usize> {
    let width = window.len() as f64;
    window
        .iter()
        .copied()
        .filter(|&i| {
            matrix.row(i).is_some_and(|row| {
                let nonzero = window.iter().filter(|&&j| row[j] != 0.0).count();
                nonzero as f64 / width >= threshold
            })
        })
        .collect()
}

/// Unit-circle distances between consecutive bins of one window.
///
/// Returns `bins.len() - 1` values; entry `k` belongs to `bins[k + 1]`.
fn window_distances(matrix: &ContactMatrix, bins: &[usize], epsilon: f64) -> Result<Vec<f64>> {
    let n = bins.len();
    let weights: Vec<f64> = matrix
        .submatrix(bins)
        .into_iter()
        .map(|w| w.abs() + epsilon)
        .collect();

    let inv_sqrt_degree: Vec<f64> = (0..n)
        .map(|i| 1.0 / (weights[i * n..(i + 1) * n].iter().sum::<f64>() + epsilon).sqrt())
        .collect();

    let mut operator = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            operator[i * n + j] = inv_sqrt_degree[i] * weights[i * n + j] * inv_sqrt_degree[j];
        }
    }

    let eig = top_eigenpairs(&operator, n, 2)?;
    let mut vectors = eig.eigenvectors;
    for v in vectors.iter_mut() {
        orient(v);
    }

    let embedding: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let (x, y) = (vectors[0][i], vectors[1][i]);
            let r = x.hypot(y);
            (x / r, y / r)
        })
        .collect();

    Ok(embedding
        .windows(2)
        .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
        .collect())
}

/// Scale to norm `sqrt(len)` and make the first entry non-negative.
fn orient(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    let scale = (v.len() as f64).sqrt() / norm;
    let sign = if v[0] < 0.0 { -1.0 } else { 1.0 };
    for x in v.iter_mut() {
        *x *= scale * sign;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn symmetric_counts(max_n: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
        (2..=max_n).prop_flat_map(|n| {
            proptest::collection::vec(prop_oneof![Just(0.0), 0.0f64..50.0], n * n).prop_map(move |raw| {
                let mut rows = vec![vec![0.0; n]; n];
                for i in 0..n {
                    for j in i..n {
                        rows[i][j] = raw[i * n + j];
                        rows[j][i] = raw[i * n + j];
                    }
                }
                rows
            })
        })
    }

    proptest! {
        #[test]
        fn never_scores_window_heads(rows in symmetric_counts(40), ws in 1usize..12) {
            let m = ContactMatrix::with_resolution(rows, 100).unwrap();
            let config = SpectralConfig { window_size: ws, ..SpectralConfig::default() };
            let scores = boundary_scores("s", &m, &config).unwrap();
            let informative = m.nonzero_bins().len();
            let windows = window_bounds(informative, ws).len();
            prop_assert!(scores.len() <= informative - windows.min(informative));
            for w in scores.windows(2) {
                prop_assert!(w[0].coordinate < w[1].coordinate);
            }
            for s in &scores {
                prop_assert!(s.score.is_nan() || (0.0..=2.0 + 1e-9).contains(&s.score));
            }
        }

        #[test]
        fn scoring_is_deterministic(rows in symmetric_counts(25)) {
            let m = ContactMatrix::with_resolution(rows, 10).unwrap();
            let a = boundary_scores("s", &m, &SpectralConfig::default()).unwrap();
            let b = boundary_scores("s", &m, &SpectralConfig::default()).unwrap();
            prop_assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(&b) {
                prop_assert_eq!(x.index, y.index);
                prop_assert!(x.score.to_bits() == y.score.to_bits());
            }
        }
    }
}
