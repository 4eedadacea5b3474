//! Multi-sample boundary score tables.
//!
//! Every matrix in a series is scored independently, the per-sample outputs
//! are aligned on the coordinates they all share, and the raw scores are
//! turned into pooled standard scores ([`ScoreTable`]) and baseline-relative
//! differential calls ([`DifferentialTable`]).

use std::collections::BTreeSet;

use cyanea_core::{CyaneaError, GenomicAxis, Result, Summarizable};
use cyanea_stats::{nan_median, standardize};
use tracing::{debug, info, warn};

use crate::matrix::ContactMatrix;
use crate::spectral::{boundary_scores, BoundaryScore, SpectralConfig};

/// Default absolute z-score above which a boundary change is differential.
pub const DEFAULT_Z_THRESHOLD: f64 = 2.0;

/// Parameters for [`aggregate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateConfig {
    /// Per-matrix scoring parameters.
    pub spectral: SpectralConfig,
    /// Threshold on `|z(baseline − sample)|`.
    pub z_threshold: f64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            spectral: SpectralConfig::default(),
            z_threshold: DEFAULT_Z_THRESHOLD,
        }
    }
}

impl AggregateConfig {
    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        self.spectral.validate()?;
        if !(self.z_threshold >= 0.0) {
            return Err(CyaneaError::InvalidInput(format!(
                "z_threshold must be non-negative, got {}",
                self.z_threshold
            )));
        }
        Ok(())
    }
}

/// Identifier given to the `i`-th input matrix (0-based).
pub fn sample_label(i: usize) -> String {
    format!("Sample {}", i + 1)
}

/// Standardised boundary scores: one row per shared coordinate, one column
/// per sample (or group), plus the row-wise consensus.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreTable {
    coordinates: Vec<u64>,
    samples: Vec<String>,
    /// Row-major n_rows × n_samples.
    tad_scores: Vec<f64>,
    consensus: Vec<f64>,
}

impl ScoreTable {
    /// Build a table from row-major scores; consensus is the NaN-aware row median.
    pub fn new(coordinates: Vec<u64>, samples: Vec<String>, tad_scores: Vec<f64>) -> Result<Self> {
        if tad_scores.len() != coordinates.len() * samples.len() {
            return Err(CyaneaError::InvalidInput(format!(
                "score table expects {} values ({} rows \u{00d7} {} samples), got {}",
                coordinates.len() * samples.len(),
                coordinates.len(),
                samples.len(),
                tad_scores.len()
            )));
        }
        let width = samples.len();
        let consensus = if width == 0 {
            vec![f64::NAN; coordinates.len()]
        } else {
            tad_scores.chunks(width).map(nan_median).collect()
        };
        Ok(Self {
            coordinates,
            samples,
            tad_scores,
            consensus,
        })
    }

    /// Sample (or group) column names, in input order.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.coordinates.len()
    }

    /// Number of sample columns.
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// TAD score at `(row, sample)`.
    pub fn get(&self, row: usize, sample: usize) -> Option<f64> {
        if row < self.n_rows() && sample < self.n_samples() {
            Some(self.tad_scores[row * self.n_samples() + sample])
        } else {
            None
        }
    }

    /// TAD scores of all samples at one row.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let w = self.n_samples();
        if row < self.n_rows() {
            Some(&self.tad_scores[row * w..(row + 1) * w])
        } else {
            None
        }
    }

    /// Row index of a coordinate.
    pub fn row_of(&self, coordinate: u64) -> Option<usize> {
        self.coordinates.binary_search(&coordinate).ok()
    }

    /// One sample's TAD scores down all rows.
    pub fn column(&self, sample: usize) -> Option<Vec<f64>> {
        if sample >= self.n_samples() {
            return None;
        }
        Some(self.tad_scores.iter().skip(sample).step_by(self.n_samples()).copied().collect())
    }

    /// One sample's TAD scores, looked up by column name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.samples.iter().position(|s| s == name)?;
        self.column(idx)
    }

    /// `Consensus_Score`: row-wise median of the sample columns.
    pub fn consensus(&self) -> &[f64] {
        &self.consensus
    }

    /// A new table restricted to the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Result<ScoreTable> {
        let w = self.n_samples();
        let mut coordinates = Vec::with_capacity(rows.len());
        let mut tad_scores = Vec::with_capacity(rows.len() * w);
        let mut consensus = Vec::with_capacity(rows.len());
        for &r in rows {
            if r >= self.n_rows() {
                return Err(CyaneaError::InvalidInput(format!(
                    "row {r} out of bounds (n_rows={})",
                    self.n_rows()
                )));
            }
            coordinates.push(self.coordinates[r]);
            tad_scores.extend_from_slice(&self.tad_scores[r * w..(r + 1) * w]);
            consensus.push(self.consensus[r]);
        }
        Ok(ScoreTable {
            coordinates,
            samples: self.samples.clone(),
            tad_scores,
            consensus,
        })
    }
}

impl GenomicAxis for ScoreTable {
    fn coordinates(&self) -> &[u64] {
        &self.coordinates
    }
}

impl Summarizable for ScoreTable {
    fn summary(&self) -> String {
        format!(
            "ScoreTable: {} coordinates \u{00d7} {} samples",
            self.n_rows(),
            self.n_samples()
        )
    }
}

/// Whether a boundary differs significantly from the baseline sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DifferentialStatus {
    /// `|z(baseline − sample)|` above the threshold.
    Differential,
    /// At or below the threshold, or undefined.
    NonDifferential,
}

/// Differential call for one (sample, coordinate).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifferentialCall {
    /// Sample or group label.
    pub sample: String,
    /// Bin start coordinate.
    pub coordinate: u64,
    /// Standardised `baseline − sample` raw score difference; `NaN` when undefined.
    pub diff_z: f64,
    /// Call derived from `diff_z` and the z-score threshold.
    pub status: DifferentialStatus,
}

/// Long-form differential calls, coordinate-major then sample order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifferentialTable {
    calls: Vec<DifferentialCall>,
}

impl DifferentialTable {
    /// All calls.
    pub fn calls(&self) -> &[DifferentialCall] {
        &self.calls
    }

    /// Number of differential calls.
    pub fn n_differential(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| c.status == DifferentialStatus::Differential)
            .count()
    }

    /// Calls belonging to one sample.
    pub fn for_sample<'a>(&'a self, sample: &'a str) -> impl Iterator<Item = &'a DifferentialCall> + 'a {
        self.calls.iter().filter(move |c| c.sample == sample)
    }

    /// Status of a (sample, coordinate), if present.
    pub fn status(&self, sample: &str, coordinate: u64) -> Option<DifferentialStatus> {
        self.calls
            .iter()
            .find(|c| c.coordinate == coordinate && c.sample == sample)
            .map(|c| c.status)
    }
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aggregation {
    /// Pooled TAD scores, one column per sample or group.
    pub scores: ScoreTable,
    /// Calls against the first sample or group.
    pub differential: DifferentialTable,
}

/// Score every matrix, labelled `"Sample 1"`, `"Sample 2"`, … in input order.
///
/// With the `parallel` feature the matrices are scored on the rayon pool;
/// output order is input order either way.
pub fn score_samples(
    matrices: &[ContactMatrix],
    config: &SpectralConfig,
) -> Result<Vec<Vec<BoundaryScore>>> {
    #[cfg(feature = "parallel")]
    let scored: Vec<Result<Vec<BoundaryScore>>> = {
        use rayon::prelude::*;
        matrices
            .par_iter()
            .enumerate()
            .map(|(i, m)| score_sample(i, m, config))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let scored: Vec<Result<Vec<BoundaryScore>>> = matrices
        .iter()
        .enumerate()
        .map(|(i, m)| score_sample(i, m, config))
        .collect();

    scored.into_iter().collect()
}

fn score_sample(i: usize, matrix: &ContactMatrix, config: &SpectralConfig) -> Result<Vec<BoundaryScore>> {
    boundary_scores(&sample_label(i), matrix, config)
}

/// Coordinates scored in every sample, ascending.
pub fn shared_coordinates(per_sample: &[Vec<BoundaryScore>]) -> Vec<u64> {
    let mut iter = per_sample.iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    let mut shared: BTreeSet<u64> = first.iter().map(|s| s.coordinate).collect();
    for scores in iter {
        let present: BTreeSet<u64> = scores.iter().map(|s| s.coordinate).collect();
        shared.retain(|c| present.contains(c));
    }
    shared.into_iter().collect()
}

/// Score, align, group, standardise and call differential boundaries.
///
/// `groupings`, when given, holds one group label per matrix; samples sharing
/// a label are collapsed to their per-coordinate median raw score and the
/// groups become the columns, in first-occurrence order. The first column is
/// the baseline for differential calls.
pub fn aggregate(
    matrices: &[ContactMatrix],
    config: &AggregateConfig,
    groupings: Option<&[String]>,
) -> Result<Aggregation> {
    config.validate()?;
    if matrices.is_empty() {
        return Err(CyaneaError::InvalidInput(
            "aggregate: at least one contact matrix is required".into(),
        ));
    }
    if let Some(labels) = groupings {
        if labels.len() != matrices.len() {
            return Err(CyaneaError::InvalidGrouping(format!(
                "{} group labels for {} matrices",
                labels.len(),
                matrices.len()
            )));
        }
    }

    let per_sample = score_samples(matrices, &config.spectral)?;
    for (i, scores) in per_sample.iter().enumerate() {
        if scores.is_empty() {
            warn!(sample = %sample_label(i), "sample produced no boundary scores");
        }
    }

    let coordinates = shared_coordinates(&per_sample);
    if coordinates.is_empty() {
        return Err(CyaneaError::NoSharedRegions(format!(
            "no coordinate is scored in all {} samples",
            matrices.len()
        )));
    }
    debug!(shared = coordinates.len(), "coordinate intersection");

    let raw: Vec<Vec<f64>> = per_sample
        .iter()
        .map(|scores| aligned(scores, &coordinates))
        .collect();

    let (samples, columns) = match groupings {
        Some(labels) => collapse_groups(labels, raw),
        None => ((0..matrices.len()).map(sample_label).collect(), raw),
    };

    let n_rows = coordinates.len();
    let n_cols = samples.len();

    // Coordinate-major flattening: index r * n_cols + s.
    let flat_raw: Vec<f64> = (0..n_rows)
        .flat_map(|r| columns.iter().map(move |col| col[r]))
        .collect();
    let flat_diff: Vec<f64> = (0..n_rows)
        .flat_map(|r| {
            let baseline = columns[0][r];
            columns.iter().map(move |col| baseline - col[r])
        })
        .collect();

    let tad_scores = standardize(&flat_raw);
    let diff_z = standardize(&flat_diff);

    let mut calls = Vec::with_capacity(n_rows * n_cols);
    for (r, &coordinate) in coordinates.iter().enumerate() {
        for (s, sample) in samples.iter().enumerate() {
            // The baseline's difference to itself is not a test.
            let z = if s == 0 { f64::NAN } else { diff_z[r * n_cols + s] };
            let status = differential_status(z, config.z_threshold);
            calls.push(DifferentialCall {
                sample: sample.clone(),
                coordinate,
                diff_z: z,
                status,
            });
        }
    }

    let scores = ScoreTable::new(coordinates, samples, tad_scores)?;
    let differential = DifferentialTable { calls };
    info!(
        samples = scores.n_samples(),
        coordinates = scores.n_rows(),
        differential = differential.n_differential(),
        "aggregated boundary scores"
    );
    Ok(Aggregation {
        scores,
        differential,
    })
}

/// `Differential` only when `|z|` is strictly above `threshold`; `NaN` never is.
fn differential_status(z: f64, threshold: f64) -> DifferentialStatus {
    if z.abs() > threshold {
        DifferentialStatus::Differential
    } else {
        DifferentialStatus::NonDifferential
    }
}

/// Raw scores of one sample at the given (shared, ascending) coordinates.
fn aligned(scores: &[BoundaryScore], coordinates: &[u64]) -> Vec<f64> {
    coordinates
        .iter()
        .map(|c| {
            scores
                .binary_search_by_key(c, |s| s.coordinate)
                .map(|i| scores[i].score)
                .unwrap_or(f64::NAN)
        })
        .collect()
}

/// Median-collapse sample columns by group label, groups in first-occurrence order.
fn collapse_groups(labels: &[String], columns: Vec<Vec<f64>>) -> (Vec<String>, Vec<Vec<f64>>) {
    let mut groups: Vec<String> = Vec::new();
    for label in labels {
        if !groups.contains(label) {
            groups.push(label.clone());
        }
    }
    let n_rows = columns.first().map_or(0, Vec::len);
    let collapsed = groups
        .iter()
        .map(|g| {
            let members: Vec<&Vec<f64>> = labels
                .iter()
                .zip(&columns)
                .filter(|(l, _)| *l == g)
                .map(|(_, col)| col)
                .collect();
            (0..n_rows)
                .map(|r| {
                    let values: Vec<f64> = members.iter().map(|col| col[r]).collect();
                    nan_median(&values)
                })
                .collect()
        })
        .collect();
    (groups, collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::tests::{decay, two_domains};

    const TOL: f64 = 1e-9;

    fn config(window_size: usize) -> AggregateConfig {
        AggregateConfig {
            spectral: SpectralConfig {
                window_size,
                ..SpectralConfig::default()
            },
            ..AggregateConfig::default()
        }
    }

    fn domains(res: u64) -> ContactMatrix {
        ContactMatrix::with_resolution(two_domains(10), res).unwrap()
    }

    fn flat(res: u64) -> ContactMatrix {
        ContactMatrix::with_resolution(decay(20), res).unwrap()
    }

    #[test]
    fn identical_samples_never_differential() {
        let matrices = vec![domains(1_000); 4];
        let agg = aggregate(&matrices, &config(20), None).unwrap();
        assert_eq!(agg.scores.n_samples(), 4);
        assert_eq!(agg.scores.n_rows(), 19);
        assert_eq!(agg.differential.n_differential(), 0);
        assert_eq!(agg.differential.calls().len(), 19 * 4);
        assert_eq!(agg.scores.samples()[3], "Sample 4");
    }

    #[test]
    fn baseline_is_non_differential() {
        let matrices = vec![flat(1_000), domains(1_000), domains(1_000)];
        let agg = aggregate(&matrices, &config(20), None).unwrap();
        assert!(agg
            .differential
            .for_sample("Sample 1")
            .all(|c| c.status == DifferentialStatus::NonDifferential && c.diff_z.is_nan()));
        // The domain edge departs from a featureless baseline.
        assert_eq!(
            agg.differential.status("Sample 2", 10_000),
            Some(DifferentialStatus::Differential)
        );
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(differential_status(2.0, 2.0), DifferentialStatus::NonDifferential);
        assert_eq!(differential_status(-2.0, 2.0), DifferentialStatus::NonDifferential);
        assert_eq!(differential_status(2.0 + 1e-12, 2.0), DifferentialStatus::Differential);
        assert_eq!(differential_status(-2.5, 2.0), DifferentialStatus::Differential);
        assert_eq!(differential_status(f64::NAN, 0.0), DifferentialStatus::NonDifferential);
    }

    #[test]
    fn call_at_exact_threshold_is_non_differential() {
        let matrices = vec![flat(1_000), domains(1_000)];
        let agg = aggregate(&matrices, &config(20), None).unwrap();
        let strongest = agg
            .differential
            .for_sample("Sample 2")
            .max_by(|a, b| a.diff_z.abs().total_cmp(&b.diff_z.abs()))
            .unwrap()
            .clone();
        let edge = strongest.diff_z.abs();
        assert!(edge > 0.0);

        let at_edge = AggregateConfig {
            z_threshold: edge,
            ..config(20)
        };
        let agg = aggregate(&matrices, &at_edge, None).unwrap();
        assert_eq!(
            agg.differential.status("Sample 2", strongest.coordinate),
            Some(DifferentialStatus::NonDifferential)
        );
        assert_eq!(agg.differential.n_differential(), 0);

        let below_edge = AggregateConfig {
            z_threshold: edge * (1.0 - 1e-9),
            ..config(20)
        };
        let agg = aggregate(&matrices, &below_edge, None).unwrap();
        assert_eq!(
            agg.differential.status("Sample 2", strongest.coordinate),
            Some(DifferentialStatus::Differential)
        );
    }

    fn score_sequentially(
        matrices: &[ContactMatrix],
        config: &SpectralConfig,
    ) -> Result<Vec<Vec<BoundaryScore>>> {
        matrices
            .iter()
            .enumerate()
            .map(|(i, m)| score_sample(i, m, config))
            .collect()
    }

    #[test]
    fn parallel_and_sequential_scoring_agree() {
        let mut gapped = decay(20);
        for row in gapped.iter_mut() {
            row[7] = 0.0;
        }
        gapped[7] = vec![0.0; 20];
        let matrices = vec![
            flat(1_000),
            domains(1_000),
            ContactMatrix::with_resolution(gapped, 1_000).unwrap(),
            domains(1_000),
            flat(1_000),
        ];
        let config = SpectralConfig {
            window_size: 6,
            ..SpectralConfig::default()
        };
        let pooled = score_samples(&matrices, &config).unwrap();
        let serial = score_sequentially(&matrices, &config).unwrap();
        assert_eq!(pooled.len(), serial.len());
        for (a, b) in pooled.iter().zip(&serial) {
            assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(b) {
                assert_eq!(x.sample_id, y.sample_id);
                assert_eq!(x.coordinate, y.coordinate);
                assert_eq!(x.index, y.index);
                assert_eq!(x.score.to_bits(), y.score.to_bits());
            }
        }
        assert_eq!(pooled[2][0].sample_id, "Sample 3");
    }

    #[test]
    fn tad_scores_are_pooled_z_scores() {
        let matrices = vec![domains(1_000), domains(1_000)];
        let agg = aggregate(&matrices, &config(20), None).unwrap();
        let all: Vec<f64> = (0..agg.scores.n_rows())
            .flat_map(|r| agg.scores.row(r).unwrap().to_vec())
            .collect();
        let mean = all.iter().sum::<f64>() / all.len() as f64;
        let var = all.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / all.len() as f64;
        assert!(mean.abs() < TOL);
        assert!((var - 1.0).abs() < 1e-6);

        let row = agg.scores.row_of(10_000).unwrap();
        // One spike among 19 values: z = sqrt(18).
        assert!((agg.scores.get(row, 0).unwrap() - 18f64.sqrt()).abs() < 1e-6);
        assert!((agg.scores.consensus()[row] - 18f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn rows_follow_intersection() {
        // Shifting the second sample's coordinates by one bin leaves 18 shared rows.
        let a = domains(1_000);
        let coords: Vec<u64> = (1..=20).map(|i| i * 1_000).collect();
        let b = ContactMatrix::from_rows(two_domains(10), coords).unwrap();
        let agg = aggregate(&[a, b], &config(20), None).unwrap();
        assert_eq!(agg.scores.n_rows(), 18);
        assert_eq!(agg.scores.coordinates().first(), Some(&2_000));
        assert_eq!(agg.scores.coordinates().last(), Some(&19_000));
    }

    #[test]
    fn disjoint_samples_have_no_shared_regions() {
        let a = domains(1_000);
        let coords: Vec<u64> = (0..20).map(|i| 100_000 + i * 1_000).collect();
        let b = ContactMatrix::from_rows(two_domains(10), coords).unwrap();
        let err = aggregate(&[a, b], &config(20), None).unwrap_err();
        assert!(matches!(err, CyaneaError::NoSharedRegions(_)));
    }

    #[test]
    fn grouping_length_mismatch() {
        let matrices = vec![domains(1_000); 3];
        let labels = vec!["early".to_string(), "late".to_string()];
        let err = aggregate(&matrices, &config(20), Some(&labels)).unwrap_err();
        assert!(matches!(err, CyaneaError::InvalidGrouping(_)));
    }

    #[test]
    fn empty_input_rejected() {
        let err = aggregate(&[], &AggregateConfig::default(), None).unwrap_err();
        assert!(matches!(err, CyaneaError::InvalidInput(_)));
    }

    #[test]
    fn groups_collapse_in_first_occurrence_order() {
        let matrices = vec![flat(1_000), domains(1_000), flat(1_000), domains(1_000)];
        let labels: Vec<String> = ["b", "a", "b", "a"].iter().map(|s| s.to_string()).collect();
        let agg = aggregate(&matrices, &config(20), Some(&labels)).unwrap();
        assert_eq!(agg.scores.samples(), &["b".to_string(), "a".to_string()]);
        let row = agg.scores.row_of(10_000).unwrap();
        assert!(agg.scores.get(row, 1).unwrap() > agg.scores.get(row, 0).unwrap());
    }

    #[test]
    fn collapse_takes_median() {
        let labels: Vec<String> = ["x", "x", "y", "x"].iter().map(|s| s.to_string()).collect();
        let columns = vec![vec![1.0, 4.0], vec![3.0, 5.0], vec![9.0, 9.0], vec![2.0, f64::NAN]];
        let (groups, collapsed) = collapse_groups(&labels, columns);
        assert_eq!(groups, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(collapsed[0], vec![2.0, 4.5]);
        assert_eq!(collapsed[1], vec![9.0, 9.0]);
    }

    #[test]
    fn shared_coordinates_shrink_with_samples() {
        let mk = |coords: &[u64]| -> Vec<BoundaryScore> {
            coords
                .iter()
                .enumerate()
                .map(|(i, &c)| BoundaryScore {
                    sample_id: "s".into(),
                    coordinate: c,
                    index: i,
                    score: 0.0,
                })
                .collect()
        };
        let a = mk(&[10, 20, 30, 40]);
        let b = mk(&[20, 30, 40, 50]);
        let c = mk(&[30, 40]);
        assert_eq!(shared_coordinates(&[a.clone(), b.clone()]), vec![20, 30, 40]);
        assert_eq!(shared_coordinates(&[a, b, c]), vec![30, 40]);
        assert!(shared_coordinates(&[]).is_empty());
    }

    #[test]
    fn score_table_accessors() {
        let t = ScoreTable::new(
            vec![100, 200],
            vec!["A".into(), "B".into(), "C".into()],
            vec![1.0, 2.0, 3.0, 6.0, f64::NAN, 4.0],
        )
        .unwrap();
        assert_eq!(t.consensus(), &[2.0, 5.0]);
        assert_eq!(t.column(1).unwrap()[0], 2.0);
        assert_eq!(t.column_by_name("C"), Some(vec![3.0, 4.0]));
        assert_eq!(t.row_of(200), Some(1));
        assert_eq!(t.row_of(150), None);
        let sub = t.select_rows(&[1]).unwrap();
        assert_eq!(sub.coordinates(), &[200]);
        assert_eq!(sub.consensus(), &[5.0]);
        assert!(t.select_rows(&[2]).is_err());
        assert_eq!(t.summary(), "ScoreTable: 2 coordinates \u{00d7} 3 samples");
        assert!(ScoreTable::new(vec![1], vec!["A".into()], vec![]).is_err());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let matrices = vec![flat(500), domains(500), domains(500)];
        let a = aggregate(&matrices, &config(8), None).unwrap();
        let b = aggregate(&matrices, &config(8), None).unwrap();
        assert_eq!(a.scores.coordinates(), b.scores.coordinates());
        for r in 0..a.scores.n_rows() {
            for (x, y) in a.scores.row(r).unwrap().iter().zip(b.scores.row(r).unwrap()) {
                assert_eq!(x.to_bits(), y.to_bits());
            }
        }
        assert_eq!(a.differential.n_differential(), b.differential.n_differential());
    }
}
