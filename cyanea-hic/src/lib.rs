//! Chromatin domain boundary analysis for the Cyanea bioinformatics ecosystem.
//!
//! This crate scores and compares TAD boundaries in Hi-C contact matrices:
//!
//! - **Contact matrices** — [`ContactMatrix`] with coordinate-labelled bins and [`Resolution`] inference
//! - **Spectral scores** — [`boundary_scores`] over sliding windows of the normalised contact graph
//! - **Multi-sample tables** — [`aggregate`] into standardised [`ScoreTable`]s with differential calls
//! - **Temporal classes** — [`classify`] boundaries as appearing, disappearing, common or dynamic
//! - **Pipeline** — [`time_compare`] runs all of the above on an ordered series
//!
//! # Quick start
//!
//! ```
//! use cyanea_hic::{time_compare, ContactMatrix, TemporalCategory, TimeCompareConfig};
//!
//! // Two 10-bin domains at 5 kb resolution.
//! let rows: Vec<Vec<f64>> = (0..20)
//!     .map(|i| (0..20).map(|j| if (i < 10) == (j < 10) { 10.0 } else { 1.0 }).collect())
//!     .collect();
//! let matrix = ContactMatrix::with_resolution(rows, 5_000).unwrap();
//!
//! let config = TimeCompareConfig::default().with_window_size(20);
//! let result = time_compare(&vec![matrix; 4], &config, None).unwrap();
//!
//! assert_eq!(result.all_bounds.category_at(50_000), Some(TemporalCategory::HighlyCommon));
//! ```

pub mod aggregate;
pub mod matrix;
pub mod pipeline;
pub mod spectral;
pub mod temporal;

pub use aggregate::{
    aggregate, score_samples, shared_coordinates, AggregateConfig, Aggregation,
    DifferentialCall, DifferentialStatus, DifferentialTable, ScoreTable,
};
pub use matrix::{infer_resolution, ContactMatrix, Resolution};
pub use pipeline::{time_compare, BoundaryTable, TimeCompareConfig, TimeCompareResult};
pub use spectral::{boundary_scores, window_bounds, BoundaryScore, SpectralConfig, LAPLACIAN_EPSILON};
pub use temporal::{
    categorize, classify, quartile_groups, CategoryCounts, Classification, TemporalCategory,
    DEFAULT_PRESENCE_CUTOFF,
};
