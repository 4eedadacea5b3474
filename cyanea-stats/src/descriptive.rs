//! Descriptive statistics over score columns with missing values.
//!
//! `NaN` is treated as a missing value: it is skipped when computing the
//! statistic, and an all-missing input yields `NaN` rather than an error.

/// Mean of the non-NaN values, or `NaN` if there are none.
pub fn nan_mean(data: &[f64]) -> f64 {
    let (sum, count) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, c), &x| (s + x, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Median of the non-NaN values, or `NaN` if there are none.
pub fn nan_median(data: &[f64]) -> f64 {
    let mut defined: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    if defined.is_empty() {
        return f64::NAN;
    }
    defined.sort_by(|a, b| a.total_cmp(b));
    median_sorted(&defined)
}

/// Population mean and standard deviation (ddof = 0) of the non-NaN values.
///
/// Returns `(NaN, NaN)` when no value is defined.
pub fn nan_mean_std(data: &[f64]) -> (f64, f64) {
    let m = nan_mean(data);
    if m.is_nan() {
        return (f64::NAN, f64::NAN);
    }
    let (ss, count) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, c), &x| (s + (x - m).powi(2), c + 1));
    (m, (ss / count as f64).sqrt())
}

/// Z-score every value against the pooled non-NaN mean and population
/// standard deviation.
///
/// `NaN` inputs stay `NaN` in their own cells only. When the standard
/// deviation is zero every output is `NaN` (0/0): a constant signal has no
/// defined standard score.
pub fn standardize(data: &[f64]) -> Vec<f64> {
    let (m, sd) = nan_mean_std(data);
    data.iter().map(|&x| (x - m) / sd).collect()
}

// ── Internal ───────────────────────────────────────────────────────────────

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
