//! End-to-end boundary comparison over a time series of contact matrices.
//!
//! [`time_compare`] chains [`aggregate`](crate::aggregate::aggregate) and
//! [`classify`](crate::temporal::classify) and packages the result in the
//! shape downstream reporting expects: the named boundaries, the full table,
//! per-category counts and the differential calls.

use cyanea_core::{CyaneaError, GenomicAxis, Result, Summarizable};
use tracing::info;

use crate::aggregate::{aggregate, AggregateConfig, DifferentialTable, ScoreTable, DEFAULT_Z_THRESHOLD};
use crate::matrix::{ContactMatrix, Resolution};
use crate::spectral::SpectralConfig;
use crate::temporal::{classify, CategoryCounts, TemporalCategory, DEFAULT_PRESENCE_CUTOFF};

/// Parameters for [`time_compare`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeCompareConfig {
    /// Bin size of the input matrices.
    pub resolution: Resolution,
    /// Per-matrix scoring parameters.
    pub spectral: SpectralConfig,
    /// Threshold on the standardised baseline difference.
    pub z_threshold: f64,
    /// TAD score above which a boundary is present in a sample.
    pub presence_cutoff: f64,
}

impl Default for TimeCompareConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Auto,
            spectral: SpectralConfig::default(),
            z_threshold: DEFAULT_Z_THRESHOLD,
            presence_cutoff: DEFAULT_PRESENCE_CUTOFF,
        }
    }
}

impl TimeCompareConfig {
    /// Set the bin size instead of inferring it.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the spectral window width in bins.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.spectral.window_size = window_size;
        self
    }

    /// Set the minimum in-window non-zero fraction a bin needs.
    pub fn with_gap_threshold(mut self, gap_threshold: f64) -> Self {
        self.spectral.gap_threshold = gap_threshold;
        self
    }

    /// Set the differential z-score threshold.
    pub fn with_z_threshold(mut self, z_threshold: f64) -> Self {
        self.z_threshold = z_threshold;
        self
    }

    /// Set the TAD score above which a boundary counts as present.
    pub fn with_presence_cutoff(mut self, presence_cutoff: f64) -> Self {
        self.presence_cutoff = presence_cutoff;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        self.aggregate_config().validate()?;
        if self.presence_cutoff.is_nan() {
            return Err(CyaneaError::InvalidInput(
                "presence_cutoff must be a number".into(),
            ));
        }
        Ok(())
    }

    fn aggregate_config(&self) -> AggregateConfig {
        AggregateConfig {
            spectral: self.spectral.clone(),
            z_threshold: self.z_threshold,
        }
    }
}

/// A score table with a temporal category per row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryTable {
    /// TAD scores and consensus per coordinate.
    pub scores: ScoreTable,
    /// Temporal category of each row, aligned with `scores`.
    pub categories: Vec<Option<TemporalCategory>>,
}

impl BoundaryTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category of the row at `coordinate`; `None` if the coordinate is
    /// absent or uncategorised.
    pub fn category_at(&self, coordinate: u64) -> Option<TemporalCategory> {
        self.scores.row_of(coordinate).and_then(|r| self.categories[r])
    }

    /// Coordinates assigned to `category`.
    pub fn coordinates_in(&self, category: TemporalCategory) -> Vec<u64> {
        self.scores
            .coordinates()
            .iter()
            .zip(&self.categories)
            .filter(|(_, c)| **c == Some(category))
            .map(|(&coord, _)| coord)
            .collect()
    }
}

/// Output of [`time_compare`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeCompareResult {
    /// Boundaries with a signal above the presence cutoff somewhere.
    pub tad_bounds: BoundaryTable,
    /// Every coordinate shared by all samples.
    pub all_bounds: BoundaryTable,
    /// Category counts over `tad_bounds`.
    pub counts: CategoryCounts,
    /// Differential calls against the first sample.
    pub differential: DifferentialTable,
    /// Resolution in bp, as given or inferred.
    pub resolution: u64,
}

impl Summarizable for TimeCompareResult {
    fn summary(&self) -> String {
        format!(
            "TimeCompare: {} boundaries ({} shared coordinates) at {} bp; {}",
            self.tad_bounds.len(),
            self.all_bounds.len(),
            self.resolution,
            self.counts.summary()
        )
    }
}

/// Score, compare and temporally classify TAD boundaries across `matrices`.
///
/// Matrices are taken in series order. `groupings` optionally assigns each
/// matrix a group label (e.g. replicate → time point); groups then replace
/// samples as columns.
pub fn time_compare(
    matrices: &[ContactMatrix],
    config: &TimeCompareConfig,
    groupings: Option<&[String]>,
) -> Result<TimeCompareResult> {
    config.validate()?;
    let first = matrices.first().ok_or_else(|| {
        CyaneaError::InvalidInput("time_compare: at least one contact matrix is required".into())
    })?;
    let resolution = config.resolution.resolve(first.coordinates())?;

    let aggregation = aggregate(matrices, &config.aggregate_config(), groupings)?;
    let classification = classify(&aggregation.scores, config.presence_cutoff);

    let all_bounds = BoundaryTable {
        scores: aggregation.scores,
        categories: classification.categories,
    };
    let tad_bounds = BoundaryTable {
        scores: all_bounds.scores.select_rows(&classification.named_rows)?,
        categories: classification
            .named_rows
            .iter()
            .map(|&r| all_bounds.categories[r])
            .collect(),
    };

    let result = TimeCompareResult {
        tad_bounds,
        all_bounds,
        counts: classification.counts,
        differential: aggregation.differential,
        resolution,
    };
    info!("{}", result.summary());
    Ok(result)
}
