//! Temporal classification of boundaries across an ordered sample series.
//!
//! Samples are split by position into four contiguous groups (early to late).
//! A boundary is "present" in a sample when its TAD score exceeds the
//! presence cutoff, and present in a group when at least half of the group's
//! samples have it. The presence pattern of the first, second and last group
//! then decides the category.

use std::fmt;
use std::ops::Range;

use cyanea_core::{GenomicAxis, Summarizable};
use tracing::debug;

use crate::aggregate::ScoreTable;

/// Default TAD score above which a boundary counts as present.
pub const DEFAULT_PRESENCE_CUTOFF: f64 = 3.0;

/// How a boundary behaves along the sample series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemporalCategory {
    /// Same presence in the first, second and last group.
    HighlyCommon,
    /// Absent in the first group, present from the second group on.
    EarlyAppearing,
    /// Absent in the first two groups, present in the last.
    LateAppearing,
    /// Present in the first group, gone from the second group on.
    EarlyDisappearing,
    /// Present in the first two groups, gone in the last.
    LateDisappearing,
    /// Changes after the first group and returns by the last.
    Dynamic,
}

impl TemporalCategory {
    /// Every category, in rule priority order.
    pub const ALL: [TemporalCategory; 6] = [
        TemporalCategory::HighlyCommon,
        TemporalCategory::EarlyAppearing,
        TemporalCategory::LateAppearing,
        TemporalCategory::EarlyDisappearing,
        TemporalCategory::LateDisappearing,
        TemporalCategory::Dynamic,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TemporalCategory::HighlyCommon => "Highly Common",
            TemporalCategory::EarlyAppearing => "Early Appearing",
            TemporalCategory::LateAppearing => "Late Appearing",
            TemporalCategory::EarlyDisappearing => "Early Disappearing",
            TemporalCategory::LateDisappearing => "Late Disappearing",
            TemporalCategory::Dynamic => "Dynamic",
        }
    }

    fn position(&self) -> usize {
        match self {
            TemporalCategory::HighlyCommon => 0,
            TemporalCategory::EarlyAppearing => 1,
            TemporalCategory::LateAppearing => 2,
            TemporalCategory::EarlyDisappearing => 3,
            TemporalCategory::LateDisappearing => 4,
            TemporalCategory::Dynamic => 5,
        }
    }
}

impl fmt::Display for TemporalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classification rule over group presence (first, second, last).
struct Rule {
    category: TemporalCategory,
    matches: fn(bool, bool, bool) -> bool,
}

/// Evaluated top to bottom; the first match wins.
///
/// `HighlyCommon` also matches a boundary absent from every group.
const RULES: [Rule; 6] = [
    Rule {
        category: TemporalCategory::HighlyCommon,
        matches: |g1, g2, g4| g1 == g2 && g1 == g4,
    },
    Rule {
        category: TemporalCategory::EarlyAppearing,
        matches: |g1, g2, g4| g1 != g2 && !g1 && g2 == g4,
    },
    Rule {
        category: TemporalCategory::LateAppearing,
        matches: |g1, g2, g4| g1 == g2 && !g1 && g1 != g4,
    },
    Rule {
        category: TemporalCategory::EarlyDisappearing,
        matches: |g1, g2, g4| g1 != g2 && g1 && g2 == g4,
    },
    Rule {
        category: TemporalCategory::LateDisappearing,
        matches: |g1, g2, g4| g1 == g2 && g1 && g1 != g4,
    },
    Rule {
        category: TemporalCategory::Dynamic,
        matches: |g1, g2, g4| g1 != g2 && g1 == g4,
    },
];

/// Category for the presence of a boundary in the first, second and last group.
pub fn categorize(first: bool, second: bool, last: bool) -> Option<TemporalCategory> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(first, second, last))
        .map(|rule| rule.category)
}

/// Split `n` ordered samples into four contiguous position groups.
///
/// Group `g` covers `⌊g·n/4⌋..⌊(g+1)·n/4⌋`. With fewer than four samples a
/// group can come out empty; it is then widened to the single sample at its
/// start (clamped to the last sample), so every group has a representative.
pub fn quartile_groups(n: usize) -> [Range<usize>; 4] {
    std::array::from_fn(|g| {
        let start = g * n / 4;
        let end = (g + 1) * n / 4;
        if end > start || n == 0 {
            start..end
        } else {
            let at = start.min(n - 1);
            at..at + 1
        }
    })
}

/// Whether at least half of the samples in `group` are present.
fn group_present(present: &[bool], group: &Range<usize>) -> bool {
    let hits = present[group.clone()].iter().filter(|&&p| p).count();
    !group.is_empty() && 2 * hits >= group.len()
}

/// Number of boundaries per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryCounts {
    counts: [usize; 6],
}

impl CategoryCounts {
    /// Count categories, ignoring uncategorised entries.
    pub fn from_categories<'a, I>(categories: I) -> Self
    where
        I: IntoIterator<Item = &'a Option<TemporalCategory>>,
    {
        let mut counts = [0; 6];
        for category in categories.into_iter().flatten() {
            counts[category.position()] += 1;
        }
        Self { counts }
    }

    /// Count for one category.
    pub fn get(&self, category: TemporalCategory) -> usize {
        self.counts[category.position()]
    }

    /// Total categorised boundaries.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(category, count)` in rule priority order.
    pub fn iter(&self) -> impl Iterator<Item = (TemporalCategory, usize)> + '_ {
        TemporalCategory::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

impl Summarizable for CategoryCounts {
    fn summary(&self) -> String {
        self.iter()
            .map(|(c, n)| format!("{}={n}", c.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Output of [`classify`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Classification {
    /// Category of every score-table row, in row order.
    pub categories: Vec<Option<TemporalCategory>>,
    /// Rows where some sample, or the consensus, exceeds the cutoff.
    pub named_rows: Vec<usize>,
    /// Category counts over the named rows.
    pub counts: CategoryCounts,
}

/// Assign a temporal category to every row of `table`.
pub fn classify(table: &ScoreTable, presence_cutoff: f64) -> Classification {
    let groups = quartile_groups(table.n_samples());
    let mut categories = Vec::with_capacity(table.n_rows());
    let mut named_rows = Vec::new();

    for r in 0..table.n_rows() {
        let row = table.row(r).unwrap_or(&[]);
        let present: Vec<bool> = row.iter().map(|&z| z > presence_cutoff).collect();

        let category = if present.is_empty() {
            None
        } else {
            categorize(
                group_present(&present, &groups[0]),
                group_present(&present, &groups[1]),
                group_present(&present, &groups[3]),
            )
        };
        categories.push(category);

        if present.iter().any(|&p| p) || table.consensus()[r] > presence_cutoff {
            named_rows.push(r);
        }
    }

    let counts = CategoryCounts::from_categories(named_rows.iter().map(|&r| &categories[r]));
    debug!(
        rows = table.n_rows(),
        named = named_rows.len(),
        first = ?table.coordinates().first(),
        "temporal classification"
    );
    Classification {
        categories,
        named_rows,
        counts,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn quartiles_partition_in_order(n in 4usize..500) {
            let groups = quartile_groups(n);
            prop_assert_eq!(groups[0].start, 0);
            prop_assert_eq!(groups[3].end, n);
            for w in groups.windows(2) {
                prop_assert_eq!(w[0].end, w[1].start);
            }
            let sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
            let max = *sizes.iter().max().unwrap();
            let min = *sizes.iter().min().unwrap();
            prop_assert!(max - min <= 1);
        }

        #[test]
        fn one_category_per_row(rows in proptest::collection::vec(
            proptest::collection::vec(-2.0f64..8.0, 6), 1..30)
        ) {
            let n = rows.len();
            let t = {
                let coords = (0..n as u64).collect();
                let names = (1..=6).map(|i| format!("Sample {i}")).collect();
                ScoreTable::new(coords, names, rows.concat()).unwrap()
            };
            let c = classify(&t, 3.0);
            prop_assert_eq!(c.categories.len(), n);
            prop_assert!(c.counts.total() <= c.named_rows.len());
        }
    }
}
