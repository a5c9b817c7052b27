//! HTTP probing and classification of a single candidate
//!
//! A candidate is probed with plain HTTP on the target port, carrying a fixed
//! `Host` header. CloudFlare answers a plain request on one of its HTTP
//! ports with a 301 to HTTPS; on any other port (443 and friends) it answers
//! plain HTTP with 400. Either way the `Server` header names CloudFlare.

pub mod http;

use crate::address::CandidateAddress;
use crate::error::ProbeError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub use http::ReqwestProbe;

/// Ports on which CloudFlare serves plain HTTP
pub const PLAIN_HTTP_PORTS: [u16; 7] = [80, 8080, 8880, 2052, 2082, 2086, 2095];

/// What came back from one probe attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub server: Option<String>,
}

impl ProbeResponse {
    pub fn new(status: u16, server: Option<&str>) -> Self {
        Self {
            status,
            server: server.map(str::to_string),
        }
    }
}

/// Final classification of one (address, port) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeOutcome {
    /// Response matched the signature
    Confirmed,
    /// Got an answer, but not CloudFlare's
    NotConfirmed,
    /// Every attempt failed at the transport level
    Inconclusive,
}

/// Transport used to issue a single probe attempt
#[async_trait]
pub trait HttpProbe: Send + Sync {
    /// Issue one HTTP GET against `addr:port`, redirects not followed
    async fn fetch(&self, addr: CandidateAddress, port: u16) -> Result<ProbeResponse, ProbeError>;
}

/// Response shape that identifies the provider
#[derive(Debug, Clone)]
pub struct Signature {
    token: String,
}

impl Default for Signature {
    fn default() -> Self {
        Self::new("cloudflare")
    }
}

impl Signature {
    /// `token` is matched case-insensitively against the `Server` header
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_ascii_lowercase(),
        }
    }

    pub fn is_plain_http_port(port: u16) -> bool {
        PLAIN_HTTP_PORTS.contains(&port)
    }

    pub fn matches(&self, port: u16, response: &ProbeResponse) -> bool {
        let status_ok = if Self::is_plain_http_port(port) {
            response.status == 301
        } else {
            response.status == 400 || response.status == 301
        };

        status_ok
            && response
                .server
                .as_deref()
                .map(|server| server.to_ascii_lowercase().contains(&self.token))
                .unwrap_or(false)
    }
}

/// Probes one candidate with a bounded number of sequential attempts.
///
/// Only transport failures consume another attempt. The first answered
/// request decides the outcome; there is no delay between attempts. Once the
/// cancel token fires no further attempt is started.
#[derive(Clone)]
pub struct ProbeClassifier {
    probe: Arc<dyn HttpProbe>,
    signature: Signature,
    port: u16,
    retries: u32,
    attempt_timeout: Duration,
    cancel: CancellationToken,
}

impl ProbeClassifier {
    pub fn new(probe: Arc<dyn HttpProbe>, port: u16, retries: u32, attempt_timeout: Duration) -> Self {
        Self {
            probe,
            signature: Signature::default(),
            port,
            retries: retries.max(1),
            attempt_timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Build the production classifier from a config
    pub fn from_config(config: &crate::HuntConfig) -> crate::Result<Self> {
        let probe = ReqwestProbe::new(&config.host_header, config.timeout_duration())?;
        Ok(Self::new(
            Arc::new(probe),
            config.port,
            config.retries,
            config.timeout_duration(),
        )
        .with_signature(Signature::new(&config.signature)))
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Stop retrying once `cancel` fires
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub async fn classify(&self, addr: CandidateAddress) -> ProbeOutcome {
        for attempt in 1..=self.retries {
            if attempt > 1 && self.cancel.is_cancelled() {
                log::trace!("{}:{} abandoned after {} attempts", addr, self.port, attempt - 1);
                break;
            }

            let result = tokio::time::timeout(self.attempt_timeout, self.probe.fetch(addr, self.port))
                .await
                .map_err(ProbeError::from)
                .and_then(|r| r);

            match result {
                Ok(response) if self.signature.matches(self.port, &response) => {
                    log::info!(
                        "{} IP {}:{} is a CloudFlare edge.",
                        chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                        addr,
                        self.port
                    );
                    return ProbeOutcome::Confirmed;
                }
                Ok(response) => {
                    log::trace!(
                        "{}:{} answered {} (server {:?})",
                        addr,
                        self.port,
                        response.status,
                        response.server
                    );
                    return ProbeOutcome::NotConfirmed;
                }
                Err(e) => {
                    log::trace!(
                        "{}:{} attempt {}/{} failed: {}",
                        addr,
                        self.port,
                        attempt,
                        self.retries,
                        e
                    );
                }
            }
        }

        ProbeOutcome::Inconclusive
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays scripted results in order, then repeats the last one
    pub struct ScriptedProbe {
        script: Mutex<VecDeque<Result<ProbeResponse, ProbeError>>>,
        last: Mutex<Option<Result<ProbeResponse, ProbeError>>>,
        pub calls: AtomicUsize,
    }

    impl ScriptedProbe {
        pub fn new(script: Vec<Result<ProbeResponse, ProbeError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HttpProbe for ScriptedProbe {
        async fn fetch(&self, _addr: CandidateAddress, _port: u16) -> Result<ProbeResponse, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            if let Some(result) = next {
                *last = Some(result);
            }
            last.clone().unwrap_or(Err(ProbeError::Timeout))
        }
    }
}
