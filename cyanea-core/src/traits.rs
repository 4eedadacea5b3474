//! Core trait definitions for the Cyanea ecosystem.
//!
//! These traits define the contracts that domain types implement across crates.

/// A type laid out along a genomic axis of bin start coordinates.
pub trait GenomicAxis {
    /// Bin start coordinates, ascending.
    fn coordinates(&self) -> &[u64];

    /// Number of bins on the axis.
    fn n_bins(&self) -> usize {
        self.coordinates().len()
    }
}

/// A type that can produce a summary of its contents.
pub trait Summarizable {
    /// A one-line summary suitable for display.
    fn summary(&self) -> String;
}
