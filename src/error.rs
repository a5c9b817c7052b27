//! Error handling for cfhunt
//!
//! Fatal errors (bad input, unusable output paths, invalid configuration)
//! surface as [`HuntError`] and stop a run before probing starts. Transport
//! failures during a probe are [`ProbeError`]s and never leave the
//! classifier: they only consume retry attempts.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for candidate building, filtering and artifact output
#[derive(Debug, Error)]
pub enum HuntError {
    #[error("Invalid address format on line {line}: {input:?} ({reason})")]
    InvalidAddressFormat {
        line: usize,
        input: String,
        reason: String,
    },

    #[error("Input file not found: {}", .0.display())]
    MissingInputFile(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output path is not usable: {}", .0.display())]
    MissingOutputPath(PathBuf),

    #[error("Failed to record confirmed address {address}: {source}")]
    ArtifactWrite {
        address: Ipv4Addr,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resolver error: {0}")]
    Resolve(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cfhunt operations
pub type HuntResult<T> = Result<T, HuntError>;

impl HuntError {
    /// Process exit status for a run that stopped on this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HuntError::InvalidAddressFormat { .. }
            | HuntError::MissingInputFile(_)
            | HuntError::UnreadableInput { .. }
            | HuntError::Resolve(_) => exit_codes::INPUT,
            HuntError::Config(_) => exit_codes::CONFIG,
            HuntError::MissingOutputPath(_)
            | HuntError::ArtifactWrite { .. }
            | HuntError::Io(_) => exit_codes::OUTPUT,
        }
    }

    /// Shorthand used by the address parsers
    pub(crate) fn invalid_address(line: usize, input: &str, reason: impl ToString) -> Self {
        HuntError::InvalidAddressFormat {
            line,
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Transport-level failure of a single probe attempt
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("probe timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout
        } else if e.is_connect() {
            ProbeError::Connect(e.to_string())
        } else {
            ProbeError::Request(e.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for ProbeError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        ProbeError::Timeout
    }
}

/// Process exit statuses
pub mod exit_codes {
    /// Every candidate visited, regardless of how many matched
    pub const COMPLETED: i32 = 0;
    /// Missing or malformed input
    pub const INPUT: i32 = 2;
    /// Rejected configuration
    pub const CONFIG: i32 = 3;
    /// Output path unusable before the run started
    pub const OUTPUT: i32 = 4;
    /// Run completed but at least one confirmed address could not be recorded
    pub const WRITE_FAILURES: i32 = 5;
    /// Run interrupted before every candidate was visited
    pub const CANCELLED: i32 = 130;
}
