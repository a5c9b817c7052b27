//! Harvesting candidate addresses from domain names
//!
//! Each domain is asked of every configured resolver separately. Public
//! resolvers in different networks steer clients to different edges, so the
//! union of their answers covers more of the fleet than any single one.

use crate::address::{CandidateAddress, CandidateSet, ExclusionList, RangeFilter};
use crate::error::HuntError;
use crate::output::append_address_list;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use hickory_resolver::config::{LookupIpStrategy, NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Domains resolved at the same time
const DOMAIN_CONCURRENCY: usize = 16;

/// A/IPv4 lookup against one specific name server
#[async_trait]
pub trait NameLookup: Send + Sync {
    async fn lookup_ipv4(&self, domain: &str, server: IpAddr) -> crate::Result<Vec<Ipv4Addr>>;
}

/// hickory-backed lookup with one uncached resolver per name server
pub struct HickoryLookup {
    resolvers: HashMap<IpAddr, TokioAsyncResolver>,
    timeout: Duration,
}

impl HickoryLookup {
    pub fn new(servers: &[IpAddr], timeout: Duration) -> Self {
        let resolvers = servers
            .iter()
            .map(|&server| (server, build_resolver(server, timeout)))
            .collect();
        Self { resolvers, timeout }
    }
}

fn build_resolver(server: IpAddr, timeout: Duration) -> TokioAsyncResolver {
    let group = NameServerConfigGroup::from_ips_clear(&[server], 53, true);
    let config = ResolverConfig::from_parts(None, vec![], group);

    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.cache_size = 0;
    opts.use_hosts_file = false;
    opts.ip_strategy = LookupIpStrategy::Ipv4Only;

    TokioAsyncResolver::tokio(config, opts)
}

#[async_trait]
impl NameLookup for HickoryLookup {
    async fn lookup_ipv4(&self, domain: &str, server: IpAddr) -> crate::Result<Vec<Ipv4Addr>> {
        let adhoc;
        let resolver = match self.resolvers.get(&server) {
            Some(resolver) => resolver,
            None => {
                adhoc = build_resolver(server, self.timeout);
                &adhoc
            }
        };

        let answer = resolver
            .lookup_ip(domain)
            .await
            .map_err(|e| HuntError::Resolve(format!("{} via {}: {}", domain, server, e)))?;

        Ok(answer
            .iter()
            .filter_map(|ip| match ip {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
            .collect())
    }
}

/// Fans every domain out over every configured name server
pub struct DomainResolver {
    lookup: Arc<dyn NameLookup>,
    servers: Vec<IpAddr>,
}

impl DomainResolver {
    pub fn new(lookup: Arc<dyn NameLookup>, servers: Vec<IpAddr>) -> Self {
        Self { lookup, servers }
    }

    /// Production resolver for the given servers
    pub fn hickory(servers: Vec<IpAddr>, timeout: Duration) -> Self {
        let lookup = HickoryLookup::new(&servers, timeout);
        Self::new(Arc::new(lookup), servers)
    }

    /// Every IPv4 address any server returned for `domain`.
    ///
    /// Entries that already are IPv4 literals are passed through.
    pub async fn resolve_domain(&self, domain: &str) -> Vec<CandidateAddress> {
        if let Ok(addr) = domain.parse::<CandidateAddress>() {
            return vec![addr];
        }

        let mut found = Vec::new();
        for &server in &self.servers {
            match self.lookup.lookup_ipv4(domain, server).await {
                Ok(addrs) => {
                    log::debug!("{} via {}: {} addresses", domain, server, addrs.len());
                    found.extend(addrs.into_iter().map(CandidateAddress::from));
                }
                Err(e) => log::warn!("{}", e),
            }
        }
        found
    }

    /// Resolve every domain; the union is deduplicated and sorted
    pub async fn resolve_all<S: AsRef<str>>(&self, domains: &[S]) -> CandidateSet {
        let batches: Vec<Vec<CandidateAddress>> = stream::iter(domains)
            .map(|domain| self.resolve_domain(domain.as_ref()))
            .buffer_unordered(DOMAIN_CONCURRENCY)
            .collect()
            .await;

        let set = CandidateSet::from_addresses(batches.into_iter().flatten());
        log::info!(
            "Resolved {} domains to {} unique addresses",
            domains.len(),
            set.len()
        );
        set
    }
}

/// Counts from one harvest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub domains: usize,
    pub resolved: usize,
    pub excluded: usize,
    pub written: usize,
}

/// Resolve `domains`, drop published addresses and append the rest to `output`
pub async fn harvest<S: AsRef<str>>(
    resolver: &DomainResolver,
    domains: &[S],
    exclusions: &ExclusionList,
    output: &Path,
) -> crate::Result<HarvestReport> {
    let resolved = resolver.resolve_all(domains).await;
    let total = resolved.len();
    let outcome = RangeFilter::new(exclusions).filter(resolved);
    let written = append_address_list(output, &outcome.kept)?;

    Ok(HarvestReport {
        domains: domains.len(),
        resolved: total,
        excluded: outcome.removed,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Canned answers keyed by (domain, server)
    struct FakeLookup {
        answers: HashMap<(String, IpAddr), Vec<Ipv4Addr>>,
        asked: Mutex<Vec<(String, IpAddr)>>,
    }

    impl FakeLookup {
        fn new(answers: Vec<(&str, &str, Vec<&str>)>) -> Self {
            Self {
                answers: answers
                    .iter()
                    .map(|(domain, server, ips)| {
                        (
                            (domain.to_string(), server.parse().unwrap()),
                            ips.iter().map(|ip| ip.parse().unwrap()).collect(),
                        )
                    })
                    .collect(),
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NameLookup for FakeLookup {
        async fn lookup_ipv4(&self, domain: &str, server: IpAddr) -> crate::Result<Vec<Ipv4Addr>> {
            self.asked.lock().unwrap().push((domain.to_string(), server));
            self.answers
                .get(&(domain.to_string(), server))
                .cloned()
                .ok_or_else(|| HuntError::Resolve(format!("{} via {}: NXDOMAIN", domain, server)))
        }
    }

    fn servers() -> Vec<IpAddr> {
        vec!["8.8.8.8".parse().unwrap(), "223.5.5.5".parse().unwrap()]
    }

    #[tokio::test]
    async fn test_every_server_is_asked_and_results_merge() {
        let lookup = Arc::new(FakeLookup::new(vec![
            ("example.org", "8.8.8.8", vec!["203.0.113.1", "203.0.113.2"]),
            ("example.org", "223.5.5.5", vec!["203.0.113.2", "198.51.100.7"]),
        ]));
        let resolver = DomainResolver::new(lookup.clone(), servers());

        let set = resolver.resolve_all(&["example.org"]).await;
        let rendered: Vec<String> = set.iter().map(|a| a.to_string()).collect();
        assert_eq!(rendered, vec!["198.51.100.7", "203.0.113.1", "203.0.113.2"]);
        assert_eq!(lookup.asked.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_server_does_not_abort() {
        let lookup = Arc::new(FakeLookup::new(vec![("a.example", "223.5.5.5", vec!["192.0.2.9"])]));
        let resolver = DomainResolver::new(lookup, servers());

        let set = resolver.resolve_all(&["a.example", "missing.example"]).await;
        assert_eq!(set.len(), 1);
    }

    #[tokio::test]
    async fn test_literal_addresses_skip_lookup() {
        let lookup = Arc::new(FakeLookup::new(vec![]));
        let resolver = DomainResolver::new(lookup.clone(), servers());

        let found = resolver.resolve_domain("192.0.2.44").await;
        assert_eq!(found, vec!["192.0.2.44".parse().unwrap()]);
        assert!(lookup.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_harvest_filters_published_and_appends() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("Domain2IP.txt");
        std::fs::write(&output, "192.0.2.1\n").unwrap();

        let lookup = Arc::new(FakeLookup::new(vec![
            ("cdn.example", "8.8.8.8", vec!["104.16.1.1", "203.0.113.50"]),
            ("cdn.example", "223.5.5.5", vec!["203.0.113.50"]),
        ]));
        let resolver = DomainResolver::new(lookup, servers());

        let report = harvest(&resolver, &["cdn.example"], &ExclusionList::published(), &output)
            .await
            .unwrap();

        assert_eq!(
            report,
            HarvestReport {
                domains: 1,
                resolved: 2,
                excluded: 1,
                written: 1
            }
        );
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "192.0.2.1\n203.0.113.50\n"
        );
    }
}
