//! Mapping of relative segment boundaries to absolute site ranges.

use std::ops::Range;

/// Partition of the sites `0..total_sites` into one half-open range per
/// segment, in segment order.
///
/// Ranges are contiguous and exhaustive: the first starts at 0, each
/// following one starts where its predecessor ends, and the last ends at
/// `total_sites`. Ranges may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteAllocation {
    ranges: Vec<Range<usize>>,
    total_sites: usize,
}

impl SiteAllocation {
    /// Computes the allocation for the ordered `boundaries` (one more than
    /// the number of segments) over `total_sites` sites.
    ///
    /// The end of segment `i` is `round(boundaries[i + 1] * total_sites)`,
    /// clamped to `[start, total_sites]`, and its start is the end of
    /// segment `i - 1`. Carrying the start forward keeps the ranges
    /// contiguous; the end of the last segment is always `total_sites`,
    /// which absorbs any rounding drift.
    ///
    /// # Example
    /// ```
    /// use segsim::segments::SiteAllocation;
    ///
    /// let allocation = SiteAllocation::from_boundaries(&[0.0, 0.333, 0.667, 1.0], 10);
    /// assert_eq!(allocation.ranges(), &[0..3, 3..7, 7..10]);
    /// ```
    pub fn from_boundaries(boundaries: &[f64], total_sites: usize) -> Self {
        let num_segments = boundaries.len().saturating_sub(1);
        let mut ranges = Vec::with_capacity(num_segments);

        let mut start = 0;
        for (i, &boundary) in boundaries.iter().skip(1).enumerate() {
            let end = if i + 1 == num_segments {
                total_sites
            } else {
                // `as` saturates, so NaN and negative products map to 0
                let rounded = (boundary * total_sites as f64).round() as usize;
                rounded.clamp(start, total_sites)
            };
            ranges.push(start..end);
            start = end;
        }

        Self { ranges, total_sites }
    }

    /// Number of sites over all ranges.
    pub fn total_sites(&self) -> usize {
        self.total_sites
    }

    /// Number of ranges, i.e. segments.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Range of segment `index`, if it exists.
    pub fn range(&self, index: usize) -> Option<Range<usize>> {
        self.ranges.get(index).cloned()
    }

    /// Widths of the ranges, in segment order.
    pub fn widths(&self) -> Vec<usize> {
        self.ranges.iter().map(|r| r.len()).collect()
    }
}
