//! IPv4 candidate addresses, CIDR ranges and the sets built from them

pub mod builder;
pub mod exclusion;
pub mod published;

use ipnetwork::{IpNetworkError, Ipv4Network};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

pub use builder::{expand_lines, read_candidate_lines, AddressSetBuilder, CandidateSet};
pub use exclusion::{ExclusionList, FilterOutcome, RangeFilter};

/// A single IPv4 address under consideration for probing.
///
/// Ordering is the numeric order of the 32-bit value, so `10.0.0.9` sorts
/// before `10.0.0.10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Ipv4Addr", into = "Ipv4Addr")]
pub struct CandidateAddress(u32);

impl CandidateAddress {
    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub fn ip(self) -> Ipv4Addr {
        Ipv4Addr::from(self.0)
    }
}

impl From<Ipv4Addr> for CandidateAddress {
    fn from(ip: Ipv4Addr) -> Self {
        Self(u32::from(ip))
    }
}

impl From<CandidateAddress> for Ipv4Addr {
    fn from(addr: CandidateAddress) -> Self {
        addr.ip()
    }
}

impl FromStr for CandidateAddress {
    type Err = std::net::AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv4Addr::from_str(s.trim()).map(Self::from)
    }
}

impl fmt::Display for CandidateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ip().fmt(f)
    }
}

/// A CIDR block: network base plus prefix length.
///
/// Parsing is non-strict: host bits set in the given base are masked off,
/// so `10.1.2.3/24` is the same range as `10.1.2.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    network: u32,
    prefix: u8,
}

impl AddressRange {
    /// Build a range from any address inside it and a prefix length (0-32)
    pub fn new(base: Ipv4Addr, prefix: u8) -> Option<Self> {
        if prefix > 32 {
            return None;
        }
        let network = u32::from(base) & prefix_mask(prefix);
        Some(Self { network, prefix })
    }

    /// Parse `a.b.c.d/len` (or a bare address, which becomes a /32)
    pub fn parse(s: &str) -> Result<Self, IpNetworkError> {
        let s = s.trim();
        let (addr_str, prefix_str) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        // Full dotted quads only; shorthand like "10/8" is rejected
        let base = Ipv4Addr::from_str(addr_str)
            .map_err(|_| IpNetworkError::InvalidAddr(addr_str.to_string()))?;
        let prefix = match prefix_str {
            Some(p) => p
                .parse::<u8>()
                .map_err(|_| IpNetworkError::InvalidCidrFormat(s.to_string()))?,
            None => 32,
        };

        let net = Ipv4Network::new(base, prefix)?;
        Ok(Self {
            network: u32::from(net.ip()) & prefix_mask(net.prefix()),
            prefix: net.prefix(),
        })
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn mask(&self) -> u32 {
        prefix_mask(self.prefix)
    }

    /// Lowest address of the block
    pub fn first(&self) -> CandidateAddress {
        CandidateAddress(self.network)
    }

    /// Highest address of the block
    pub fn last(&self) -> CandidateAddress {
        CandidateAddress(self.network | !self.mask())
    }

    /// Number of addresses in the block
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix))
    }

    /// `(address & mask) == (network & mask)`
    pub fn contains(&self, addr: CandidateAddress) -> bool {
        let mask = self.mask();
        (addr.0 & mask) == (self.network & mask)
    }

    /// Every address of the block in ascending order
    pub fn iter(&self) -> impl Iterator<Item = CandidateAddress> {
        (self.first().0..=self.last().0).map(CandidateAddress)
    }
}

impl FromStr for AddressRange {
    type Err = IpNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first(), self.prefix)
    }
}

fn prefix_mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    }
}
