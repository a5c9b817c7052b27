//! cfhunt - find CloudFlare edge addresses outside the published ranges
//!
//! Candidate lists of addresses and CIDR blocks are expanded, stripped of
//! anything inside CloudFlare's published ranges, then probed over HTTP with
//! bounded concurrency. Confirmed edges are appended to a per-label file as
//! soon as they are found.

pub mod address;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod probe;
pub mod resolve;
pub mod scheduler;

// Re-export commonly used types
pub use address::{
    expand_lines, AddressRange, AddressSetBuilder, CandidateAddress, CandidateSet, ExclusionList,
    RangeFilter,
};
pub use config::HuntConfig;
pub use error::{exit_codes, HuntError, HuntResult, ProbeError};
pub use output::ResultArtifact;
pub use probe::{HttpProbe, ProbeClassifier, ProbeOutcome, ReqwestProbe, Signature};
pub use resolve::{DomainResolver, NameLookup};
pub use scheduler::{ProbeScheduler, ScanSummary};

pub type Result<T> = std::result::Result<T, HuntError>;
