//! Statistical methods for the Cyanea bioinformatics ecosystem.
//!
//! - **Descriptive statistics** — NaN-aware mean, median and standard scores
//! - **Eigendecomposition** — Dense symmetric eigenpairs via cyclic Jacobi

pub mod descriptive;
pub mod eigen;

pub use descriptive::{nan_mean, nan_mean_std, nan_median, standardize};
pub use eigen::{symmetric_eigen, top_eigenpairs, SymmetricEigen};
