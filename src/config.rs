//! Configuration module for cfhunt

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Well-known public resolvers queried one by one during domain harvesting
pub const DEFAULT_DNS_SERVERS: &[&str] = &[
    "114.114.114.114",
    "119.28.28.28",
    "223.5.5.5",
    "8.8.8.8",
    "208.67.222.222",
];

/// Main configuration structure for a hunt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HuntConfig {
    /// Attempts per candidate before it is given up as inconclusive
    pub retries: u32,

    /// Number of concurrent probe workers
    pub workers: usize,

    /// Timeout for each probe attempt in milliseconds
    pub timeout: u64,

    /// Target port
    pub port: u16,

    /// Virtual host sent with every probe
    pub host_header: String,

    /// Substring expected in the server header (case-insensitive)
    pub signature: String,

    /// Directory holding candidate lists, `<label>.txt`
    pub input_dir: PathBuf,

    /// Directory holding confirmed-match artifacts, `<label>.txt`
    pub output_dir: PathBuf,

    /// Resolvers queried individually by `cfhunt resolve`
    pub dns_servers: Vec<IpAddr>,

    /// Per-query resolver timeout in milliseconds
    pub dns_timeout: u64,

    /// Show a progress bar while probing
    pub progress: bool,
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            retries: 2,
            workers: 100,
            timeout: 1000,
            port: 443,
            host_header: "testcfip.ssrc.cf".to_string(),
            signature: "cloudflare".to_string(),
            input_dir: PathBuf::from("temp"),
            output_dir: PathBuf::from("CloudFlareIP"),
            dns_servers: DEFAULT_DNS_SERVERS
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect(),
            dns_timeout: 5000,
            progress: true,
        }
    }
}

impl HuntConfig {
    /// Set the retry budget
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the number of concurrent workers
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the probe timeout in milliseconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the target port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_host_header(mut self, host: impl Into<String>) -> Self {
        self.host_header = host.into();
        self
    }

    pub fn with_signature(mut self, token: impl Into<String>) -> Self {
        self.signature = token.into();
        self
    }

    pub fn with_dns_servers(mut self, servers: Vec<IpAddr>) -> Self {
        self.dns_servers = servers;
        self
    }

    /// Get probe timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Get resolver timeout as Duration
    pub fn dns_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.dns_timeout)
    }

    /// Candidate list for a label
    pub fn candidate_path(&self, label: &str) -> PathBuf {
        self.input_dir.join(format!("{}.txt", label))
    }

    /// Confirmed-match artifact for a label
    pub fn artifact_path(&self, label: &str) -> PathBuf {
        self.output_dir.join(format!("{}.txt", label))
    }

    /// Load configuration from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            crate::HuntError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::HuntError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from `~/.cfhunt.toml`, or defaults when absent
    pub fn load_default_config() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let config_path = home_dir.join(".cfhunt.toml");

        if config_path.exists() {
            match Self::from_toml_file(&config_path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring {}: {}", config_path.display(), e),
            }
        }

        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.retries == 0 {
            return Err(crate::HuntError::Config("Retry budget must be at least 1".to_string()));
        }

        if self.workers == 0 {
            return Err(crate::HuntError::Config("Worker count must be greater than 0".to_string()));
        }

        if self.timeout == 0 {
            return Err(crate::HuntError::Config("Timeout must be greater than 0".to_string()));
        }

        if self.port == 0 {
            return Err(crate::HuntError::Config("Port 0 is not valid".to_string()));
        }

        if self.host_header.trim().is_empty() {
            return Err(crate::HuntError::Config("Host header cannot be empty".to_string()));
        }

        if self.signature.trim().is_empty() {
            return Err(crate::HuntError::Config("Signature token cannot be empty".to_string()));
        }

        Ok(())
    }
}
