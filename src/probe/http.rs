//! reqwest-backed probe transport

use super::{HttpProbe, ProbeResponse};
use crate::address::CandidateAddress;
use crate::error::{HuntError, ProbeError};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, HOST, SERVER};
use reqwest::redirect::Policy;
use std::time::Duration;

/// Plain-HTTP prober; one client is shared by every worker
#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    client: reqwest::Client,
    host: HeaderValue,
}

impl ReqwestProbe {
    pub fn new(host_header: &str, timeout: Duration) -> crate::Result<Self> {
        let host = HeaderValue::from_str(host_header)
            .map_err(|e| HuntError::Config(format!("Invalid host header {:?}: {}", host_header, e)))?;

        // Every candidate is a different peer; idle connections are never reused
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_max_idle_per_host(0)
            .user_agent(concat!("cfhunt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HuntError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, host })
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn fetch(&self, addr: CandidateAddress, port: u16) -> Result<ProbeResponse, ProbeError> {
        let url = format!("http://{}:{}/", addr, port);
        let response = self
            .client
            .get(&url)
            .header(HOST, self.host.clone())
            .send()
            .await?;

        let server = response
            .headers()
            .get(SERVER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            server,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unencodable_host() {
        assert!(ReqwestProbe::new("bad\nhost", Duration::from_secs(1)).is_err());
        assert!(ReqwestProbe::new("testcfip.ssrc.cf", Duration::from_secs(1)).is_ok());
    }
}
