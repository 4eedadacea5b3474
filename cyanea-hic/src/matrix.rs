//! Dense Hi-C contact matrices labelled by genomic bin coordinates.
//!
//! [`ContactMatrix`] is the hand-off point from whatever produced the
//! interaction counts (sparse triplets, cooler dumps, HiC-Pro matrices) to the
//! boundary analysis in this crate. It is square by construction, row-major,
//! and carries one ascending coordinate vector shared by both axes.

use cyanea_core::{CyaneaError, GenomicAxis, Result, Summarizable};

/// Bin size of a contact matrix, in base pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    /// Fixed bin size.
    Bp(u64),
    /// Infer from the spacing of the coordinate labels.
    #[default]
    Auto,
}

impl Resolution {
    /// Resolve to a concrete bin size, inferring from `coordinates` if needed.
    pub fn resolve(&self, coordinates: &[u64]) -> Result<u64> {
        match *self {
            Resolution::Bp(0) => Err(CyaneaError::InvalidInput(
                "resolution must be positive".into(),
            )),
            Resolution::Bp(bp) => Ok(bp),
            Resolution::Auto => infer_resolution(coordinates),
        }
    }
}

/// Most frequent positive gap between consecutive sorted coordinates.
///
/// Equal frequencies resolve to the smallest gap. Fails when fewer than two
/// distinct coordinates are given.
pub fn infer_resolution(coordinates: &[u64]) -> Result<u64> {
    let mut sorted = coordinates.to_vec();
    sorted.sort_unstable();

    let mut gaps: Vec<u64> = sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&d| d > 0)
        .collect();
    if gaps.is_empty() {
        return Err(CyaneaError::InvalidInput(
            "infer_resolution: need at least two distinct coordinates".into(),
        ));
    }
    gaps.sort_unstable();

    let mut best = (gaps[0], 0usize);
    let mut run = (gaps[0], 0usize);
    for &gap in &gaps {
        if gap == run.0 {
            run.1 += 1;
        } else {
            run = (gap, 1);
        }
        if run.1 > best.1 {
            best = run;
        }
    }
    Ok(best.0)
}

/// A dense, symmetric, row-major contact matrix (bins × bins).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactMatrix {
    data: Vec<f64>,
    size: usize,
    coordinates: Vec<u64>,
}

impl ContactMatrix {
    /// Create a matrix from flat row-major data and bin start coordinates.
    ///
    /// `data` must hold `coordinates.len()²` values; coordinates must be
    /// strictly increasing.
    pub fn new(data: Vec<f64>, coordinates: Vec<u64>) -> Result<Self> {
        let size = coordinates.len();
        if data.len() != size * size {
            return Err(CyaneaError::InvalidInput(format!(
                "contact matrix is not square: {} values for {size} coordinates",
                data.len()
            )));
        }
        check_ascending(&coordinates)?;
        Ok(Self {
            data,
            size,
            coordinates,
        })
    }

    /// Create a matrix from rows and bin start coordinates.
    pub fn from_rows(rows: Vec<Vec<f64>>, coordinates: Vec<u64>) -> Result<Self> {
        let size = rows.len();
        if coordinates.len() != size {
            return Err(CyaneaError::InvalidInput(format!(
                "contact matrix has {size} rows but {} coordinate labels",
                coordinates.len()
            )));
        }
        let mut flat = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(CyaneaError::InvalidInput(format!(
                    "contact matrix is not square: row {i} has {} columns, expected {size}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }
        Self::new(flat, coordinates)
    }

    /// Create a matrix whose bins start at `0, resolution, 2·resolution, …`.
    pub fn with_resolution(rows: Vec<Vec<f64>>, resolution: u64) -> Result<Self> {
        if resolution == 0 {
            return Err(CyaneaError::InvalidInput(
                "resolution must be positive".into(),
            ));
        }
        let coordinates = (0..rows.len() as u64).map(|i| i * resolution).collect();
        Self::from_rows(rows, coordinates)
    }

    /// Number of bins.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix has no bins.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Contact value between bins `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size && j < self.size {
            Some(self.data[i * self.size + j])
        } else {
            None
        }
    }

    /// All contacts of bin `i`.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.size {
            Some(&self.data[i * self.size..(i + 1) * self.size])
        } else {
            None
        }
    }

    /// The underlying flat data (row-major).
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Whether `|m[i][j] - m[j][i]| <= tol` everywhere.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.size;
        (0..n).all(|i| ((i + 1)..n).all(|j| (self.data[i * n + j] - self.data[j * n + i]).abs() <= tol))
    }

    /// Indices of bins with at least one non-zero contact.
    pub fn nonzero_bins(&self) -> Vec<usize> {
        (0..self.size)
            .filter(|&i| self.data[i * self.size..(i + 1) * self.size].iter().any(|&x| x != 0.0))
            .collect()
    }

    /// Row-major `k × k` sub-matrix over the given bin indices.
    ///
    /// Indices must be in bounds.
    pub fn submatrix(&self, indices: &[usize]) -> Vec<f64> {
        let mut sub = Vec::with_capacity(indices.len() * indices.len());
        for &i in indices {
            let row = &self.data[i * self.size..(i + 1) * self.size];
            sub.extend(indices.iter().map(|&j| row[j]));
        }
        sub
    }
}

impl GenomicAxis for ContactMatrix {
    fn coordinates(&self) -> &[u64] {
        &self.coordinates
    }
}

impl Summarizable for ContactMatrix {
    fn summary(&self) -> String {
        match (self.coordinates.first(), self.coordinates.last()) {
            (Some(first), Some(last)) => format!(
                "ContactMatrix: {} bins \u{00d7} {} bins ({first}..={last})",
                self.size, self.size
            ),
            _ => "ContactMatrix: empty".into(),
        }
    }
}

fn check_ascending(coordinates: &[u64]) -> Result<()> {
    if let Some(pos) = coordinates.windows(2).position(|w| w[1] <= w[0]) {
        return Err(CyaneaError::InvalidInput(format!(
            "coordinates must be strictly increasing (position {}: {} after {})",
            pos + 1,
            coordinates[pos + 1],
            coordinates[pos]
        )));
    }
    Ok(())
}
