//! Candidate set construction from mixed address/CIDR input

use super::{AddressRange, CandidateAddress};
use crate::error::HuntError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Deduplicated candidate addresses in ascending numeric order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    addresses: Vec<CandidateAddress>,
}

impl CandidateSet {
    /// Build a set from addresses in any order, with or without duplicates
    pub fn from_addresses<I: IntoIterator<Item = CandidateAddress>>(addresses: I) -> Self {
        let mut addresses: Vec<_> = addresses.into_iter().collect();
        addresses.sort_unstable();
        addresses.dedup();
        Self { addresses }
    }

    /// Wrap a vector already known to be strictly ascending
    pub(crate) fn from_sorted_unique(addresses: Vec<CandidateAddress>) -> Self {
        debug_assert!(addresses.windows(2).all(|w| w[0] < w[1]));
        Self { addresses }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn contains(&self, addr: CandidateAddress) -> bool {
        self.addresses.binary_search(&addr).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateAddress> {
        self.addresses.iter()
    }

    pub fn as_slice(&self) -> &[CandidateAddress] {
        &self.addresses
    }

    pub fn into_vec(self) -> Vec<CandidateAddress> {
        self.addresses
    }
}

impl IntoIterator for CandidateSet {
    type Item = CandidateAddress;
    type IntoIter = std::vec::IntoIter<CandidateAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a CandidateAddress;
    type IntoIter = std::slice::Iter<'a, CandidateAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.iter()
    }
}

/// Accumulates bare addresses and CIDR blocks, then produces a [`CandidateSet`].
///
/// CIDR blocks are expanded non-strictly. The first malformed line aborts
/// the build: a bad line usually means the source file is damaged.
#[derive(Debug, Default)]
pub struct AddressSetBuilder {
    pending: Vec<CandidateAddress>,
    lines: usize,
    blocks: usize,
}

impl AddressSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one input line. Blank lines are ignored.
    pub fn add_line(&mut self, line: &str) -> crate::Result<()> {
        self.lines += 1;
        let entry = line.trim();
        if entry.is_empty() {
            return Ok(());
        }

        if entry.contains('/') {
            let range = AddressRange::parse(entry)
                .map_err(|e| HuntError::invalid_address(self.lines, entry, e))?;
            self.pending.reserve(range.size().min(1 << 24) as usize);
            self.pending.extend(range.iter());
            self.blocks += 1;
            log::debug!("CIDR {} expanded to {} addresses", entry, range.size());
        } else {
            let addr = entry
                .parse::<CandidateAddress>()
                .map_err(|e| HuntError::invalid_address(self.lines, entry, e))?;
            self.pending.push(addr);
        }

        Ok(())
    }

    /// Add every line, stopping at the first malformed one
    pub fn extend_lines<I, S>(&mut self, lines: I) -> crate::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.add_line(line.as_ref())?;
        }
        Ok(())
    }

    /// Deduplicate and sort everything collected so far
    pub fn build(self) -> CandidateSet {
        let raw = self.pending.len();
        let set = CandidateSet::from_addresses(self.pending);
        log::info!(
            "Built {} unique candidates from {} lines ({} CIDR blocks, {} duplicates)",
            set.len(),
            self.lines,
            self.blocks,
            raw - set.len()
        );
        set
    }
}

/// Expand mixed address/CIDR lines into a candidate set
pub fn expand_lines<I, S>(lines: I) -> crate::Result<CandidateSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = AddressSetBuilder::new();
    builder.extend_lines(lines)?;
    Ok(builder.build())
}

/// Read a plain-text list, one entry per line.
///
/// Surrounding whitespace is trimmed; blank lines and `#` comments are skipped.
pub fn read_candidate_lines<P: AsRef<Path>>(path: P) -> crate::Result<Vec<String>> {
    let path = path.as_ref();
    let unreadable = |source: std::io::Error| HuntError::UnreadableInput {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HuntError::MissingInputFile(path.to_path_buf()),
        _ => unreadable(e),
    })?;

    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(unreadable)?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        lines.push(entry.to_string());
    }

    log::info!("Loaded {} entries from {}", lines.len(), path.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn rendered(set: &CandidateSet) -> Vec<String> {
        set.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_empty_input_is_empty_set() {
        let set = expand_lines(Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_mixed_input_dedup_and_sort() {
        let set = expand_lines([
            "10.0.0.10",
            "10.0.0.8/30",
            "10.0.0.9",
            "  ",
            "10.0.0.10/32",
            "9.9.9.9",
        ])
        .unwrap();

        assert_eq!(
            rendered(&set),
            vec!["9.9.9.9", "10.0.0.8", "10.0.0.9", "10.0.0.10", "10.0.0.11"]
        );
    }

    #[test]
    fn test_non_strict_cidr_expansion() {
        let set = expand_lines(["192.0.2.130/30"]).unwrap();
        assert_eq!(
            rendered(&set),
            vec!["192.0.2.128", "192.0.2.129", "192.0.2.130", "192.0.2.131"]
        );
    }

    #[test]
    fn test_malformed_line_aborts_with_line_number() {
        let err = expand_lines(["1.1.1.1", "1.1.1.300", "2.2.2.2"]).unwrap_err();
        match err {
            HuntError::InvalidAddressFormat { line, input, .. } => {
                assert_eq!(line, 2);
                assert_eq!(input, "1.1.1.300");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(expand_lines(["10.0.0.0/40"]).is_err());
        assert!(expand_lines(["example.com"]).is_err());
    }

    #[test]
    fn test_build_is_deterministic() {
        let input = ["172.16.0.0/29", "172.16.0.3", "8.8.8.8", "172.16.0.4/31"];
        assert_eq!(expand_lines(input).unwrap(), expand_lines(input).unwrap());
    }

    #[test]
    fn test_read_candidate_lines_skips_blanks_and_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# CloudFlare candidates").unwrap();
        writeln!(file, "1.0.0.1").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  1.0.0.0/31  ").unwrap();

        let lines = read_candidate_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["1.0.0.1", "1.0.0.0/31"]);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = read_candidate_lines("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, HuntError::MissingInputFile(_)));
    }

    #[test]
    fn test_undecodable_file_is_an_input_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"1.0.0.1\n\xff\xfe1.0.0.2\n").unwrap();

        let err = read_candidate_lines(file.path()).unwrap_err();
        assert!(matches!(err, HuntError::UnreadableInput { .. }));
        assert_eq!(err.exit_code(), crate::error::exit_codes::INPUT);
    }
}
