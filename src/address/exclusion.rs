//! Removal of addresses that already sit inside published ranges

use super::published::PUBLISHED_RANGES;
use super::{AddressRange, CandidateAddress, CandidateSet};
use crate::error::HuntError;

/// Fixed list of excluded CIDR blocks.
///
/// The blocks are kept as given (for reporting) and also folded into sorted,
/// merged, non-overlapping `[start, end]` intervals so a lookup is a binary
/// search instead of a scan over every block.
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    ranges: Vec<AddressRange>,
    intervals: Vec<(u32, u32)>,
}

impl ExclusionList {
    /// An empty list, excluding nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// The compiled-in CloudFlare blocks
    pub fn published() -> Self {
        let ranges = PUBLISHED_RANGES
            .iter()
            .filter_map(|cidr| match AddressRange::parse(cidr) {
                Ok(range) => Some(range),
                Err(e) => {
                    log::error!("Skipping bad published range {}: {}", cidr, e);
                    None
                }
            })
            .collect();
        Self::from_ranges(ranges)
    }

    pub fn from_ranges(ranges: Vec<AddressRange>) -> Self {
        let intervals = merge_intervals(&ranges);
        Self { ranges, intervals }
    }

    /// Parse CIDR strings; bare addresses are accepted as /32
    pub fn from_cidrs<I, S>(cidrs: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranges = Vec::new();
        for (idx, cidr) in cidrs.into_iter().enumerate() {
            let cidr = cidr.as_ref();
            let range = AddressRange::parse(cidr)
                .map_err(|e| HuntError::invalid_address(idx + 1, cidr, e))?;
            ranges.push(range);
        }
        Ok(Self::from_ranges(ranges))
    }

    /// Add more blocks to the list
    pub fn extend<I: IntoIterator<Item = AddressRange>>(&mut self, ranges: I) {
        self.ranges.extend(ranges);
        self.intervals = merge_intervals(&self.ranges);
    }

    /// Number of blocks as supplied
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[AddressRange] {
        &self.ranges
    }

    /// Number of disjoint intervals after merging adjacent/overlapping blocks
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// True when the address lies inside any block
    pub fn contains(&self, addr: CandidateAddress) -> bool {
        let value = addr.as_u32();
        // First interval whose end is >= value; it is the only candidate
        let idx = self.intervals.partition_point(|&(_, end)| end < value);
        match self.intervals.get(idx) {
            Some(&(start, _)) => start <= value,
            None => false,
        }
    }
}

fn merge_intervals(ranges: &[AddressRange]) -> Vec<(u32, u32)> {
    let mut spans: Vec<(u32, u32)> = ranges
        .iter()
        .map(|r| (r.first().as_u32(), r.last().as_u32()))
        .collect();
    spans.sort_unstable();

    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1.saturating_add(1) => {
                last.1 = last.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Outcome of filtering a candidate set
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub kept: CandidateSet,
    pub removed: usize,
}

/// Drops candidates that fall inside an [`ExclusionList`]
#[derive(Debug, Clone, Copy)]
pub struct RangeFilter<'a> {
    exclusions: &'a ExclusionList,
}

impl<'a> RangeFilter<'a> {
    pub fn new(exclusions: &'a ExclusionList) -> Self {
        Self { exclusions }
    }

    pub fn is_excluded(&self, addr: CandidateAddress) -> bool {
        self.exclusions.contains(addr)
    }

    /// Keep only candidates outside every excluded block; order is preserved
    pub fn filter(&self, candidates: CandidateSet) -> FilterOutcome {
        let before = candidates.len();
        let kept: Vec<CandidateAddress> = candidates
            .into_iter()
            .filter(|&addr| !self.exclusions.contains(addr))
            .collect();
        let removed = before - kept.len();

        if removed > 0 {
            log::info!(
                "Excluded {} of {} candidates inside {} published ranges",
                removed,
                before,
                self.exclusions.len()
            );
        }

        FilterOutcome {
            kept: CandidateSet::from_sorted_unique(kept),
            removed,
        }
    }

    /// Filter an unordered list in place, keeping its order
    pub fn retain_addresses(&self, addresses: &mut Vec<CandidateAddress>) -> usize {
        let before = addresses.len();
        addresses.retain(|&addr| !self.exclusions.contains(addr));
        before - addresses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::expand_lines;

    fn addr(s: &str) -> CandidateAddress {
        s.parse().unwrap()
    }

    #[test]
    fn test_published_list_loads_completely() {
        let list = ExclusionList::published();
        assert_eq!(list.len(), PUBLISHED_RANGES.len());
        assert!(list.interval_count() <= list.len());
        assert!(list.contains(addr("104.16.0.1")));
        assert!(list.contains(addr("162.159.255.255")));
        assert!(!list.contains(addr("1.1.1.1")));
    }

    #[test]
    fn test_boundaries_of_a_range() {
        let list = ExclusionList::from_cidrs(["198.41.128.0/17"]).unwrap();
        assert!(list.contains(addr("198.41.128.0")));
        assert!(list.contains(addr("198.41.255.255")));
        assert!(!list.contains(addr("198.41.127.255")));
        assert!(!list.contains(addr("198.42.0.0")));
    }

    #[test]
    fn test_overlapping_and_adjacent_blocks_merge() {
        let list = ExclusionList::from_cidrs([
            "10.0.0.0/24",
            "10.0.1.0/24",
            "10.0.0.128/25",
            "10.0.5.0/24",
        ])
        .unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.interval_count(), 2);
        assert!(list.contains(addr("10.0.1.255")));
        assert!(!list.contains(addr("10.0.2.0")));
        assert!(list.contains(addr("10.0.5.7")));
    }

    #[test]
    fn test_extremes_of_address_space() {
        let list = ExclusionList::from_cidrs(["0.0.0.0/8", "255.255.255.0/24"]).unwrap();
        assert!(list.contains(addr("0.0.0.0")));
        assert!(list.contains(addr("255.255.255.255")));
        assert!(!list.contains(addr("1.0.0.0")));
        assert!(!ExclusionList::empty().contains(addr("0.0.0.0")));
    }

    #[test]
    fn test_filter_keeps_order_and_counts_removed() {
        let candidates = expand_lines(["172.64.0.254/31", "172.63.255.255", "8.8.8.8"]).unwrap();
        let list = ExclusionList::from_cidrs(["172.64.0.0/17"]).unwrap();

        let outcome = RangeFilter::new(&list).filter(candidates);
        assert_eq!(outcome.removed, 2);
        let kept: Vec<String> = outcome.kept.iter().map(|a| a.to_string()).collect();
        assert_eq!(kept, vec!["8.8.8.8", "172.63.255.255"]);
    }

    #[test]
    fn test_bad_exclusion_entry_is_reported() {
        assert!(ExclusionList::from_cidrs(["104.16.0.0/12", "104.16.0.0/99"]).is_err());
    }
}
