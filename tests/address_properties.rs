//! Property tests for expansion and exclusion

use cfhunt::{expand_lines, AddressRange, CandidateAddress, ExclusionList, RangeFilter};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;

proptest! {
    #[test]
    fn cidr_expands_to_every_member(base in any::<u32>(), prefix in 20u8..=32) {
        let cidr = format!("{}/{}", Ipv4Addr::from(base), prefix);
        let range = AddressRange::parse(&cidr).unwrap();
        let set = expand_lines([cidr.as_str()]).unwrap();

        prop_assert_eq!(set.len() as u64, 1u64 << (32 - prefix));
        prop_assert_eq!(set.as_slice()[0], range.first());
        prop_assert_eq!(*set.as_slice().last().unwrap(), range.last());
        prop_assert!(set.iter().all(|&a| range.contains(a)));
        prop_assert!(range.contains(CandidateAddress::from_u32(base)));
    }

    #[test]
    fn output_is_sorted_and_unique(values in prop::collection::vec(any::<u32>(), 0..200)) {
        let lines: Vec<String> = values
            .iter()
            .chain(values.iter().take(20))
            .map(|&v| Ipv4Addr::from(v).to_string())
            .collect();
        let set = expand_lines(&lines).unwrap();

        let expected: BTreeSet<u32> = values.iter().copied().collect();
        let got: Vec<u32> = set.iter().map(|a| a.as_u32()).collect();
        prop_assert_eq!(got, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn exclusion_boundaries_are_exact(base in any::<u32>(), prefix in 1u8..=32) {
        let range = AddressRange::parse(&format!("{}/{}", Ipv4Addr::from(base), prefix)).unwrap();
        let list = ExclusionList::from_ranges(vec![range]);
        let filter = RangeFilter::new(&list);

        prop_assert!(filter.is_excluded(range.first()));
        prop_assert!(filter.is_excluded(range.last()));
        if let Some(before) = range.first().as_u32().checked_sub(1) {
            prop_assert!(!filter.is_excluded(CandidateAddress::from_u32(before)));
        }
        if let Some(after) = range.last().as_u32().checked_add(1) {
            prop_assert!(!filter.is_excluded(CandidateAddress::from_u32(after)));
        }
    }

    #[test]
    fn filter_matches_linear_scan(
        blocks in prop::collection::vec((any::<u32>(), 8u8..=28), 1..12),
        probes in prop::collection::vec(any::<u32>(), 1..100),
    ) {
        let ranges: Vec<AddressRange> = blocks
            .iter()
            .map(|&(base, prefix)| AddressRange::new(Ipv4Addr::from(base), prefix).unwrap())
            .collect();
        let list = ExclusionList::from_ranges(ranges.clone());

        for value in probes {
            let addr = CandidateAddress::from_u32(value);
            let linear = ranges.iter().any(|r| r.contains(addr));
            prop_assert_eq!(list.contains(addr), linear);
        }
    }
}
