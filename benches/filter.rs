//! Benchmarks for candidate expansion, exclusion and scheduling

use async_trait::async_trait;
use cfhunt::{
    expand_lines, CandidateAddress, CandidateSet, ExclusionList, HttpProbe, ProbeClassifier,
    ProbeError, ProbeScheduler, RangeFilter, ResultArtifact,
};
use cfhunt::probe::ProbeResponse;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Answers instantly; every tenth address looks like an edge
struct InstantProbe;

#[async_trait]
impl HttpProbe for InstantProbe {
    async fn fetch(&self, addr: CandidateAddress, _port: u16) -> Result<ProbeResponse, ProbeError> {
        if addr.as_u32() % 10 == 0 {
            Ok(ProbeResponse::new(400, Some("cloudflare")))
        } else {
            Ok(ProbeResponse::new(404, Some("nginx")))
        }
    }
}

fn bench_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("expansion");
    group.sample_size(10);

    for prefix in [24u8, 16, 12] {
        let cidr = format!("104.0.0.0/{}", prefix);
        group.bench_with_input(BenchmarkId::from_parameter(&cidr), &cidr, |b, cidr| {
            b.iter(|| black_box(expand_lines([cidr.as_str()]).unwrap()))
        });
    }

    group.finish();
}

fn bench_exclusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("exclusion");
    group.sample_size(10);

    let published = ExclusionList::published();
    let candidates = expand_lines(["104.0.0.0/12"]).unwrap();

    group.bench_function("filter_slash12_published", |b| {
        b.iter(|| black_box(RangeFilter::new(&published).filter(candidates.clone())))
    });

    group.bench_function("lookup_vs_linear_scan", |b| {
        let ranges = published.ranges().to_vec();
        b.iter(|| {
            let mut hits = 0usize;
            for addr in candidates.iter().step_by(4096) {
                let fast = published.contains(*addr);
                let slow = ranges.iter().any(|r| r.contains(*addr));
                hits += usize::from(fast && slow);
            }
            black_box(hits)
        })
    });

    group.finish();
}

fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler");
    group.sample_size(10);
    let rt = Runtime::new().unwrap();
    let candidates = CandidateSet::from_addresses((0..10_000u32).map(CandidateAddress::from_u32));

    for workers in [16usize, 128, 512] {
        group.bench_with_input(BenchmarkId::new("instant_probe_10k", workers), &workers, |b, &workers| {
            b.iter(|| {
                rt.block_on(async {
                    let dir = tempfile::TempDir::new().unwrap();
                    let artifact = Arc::new(ResultArtifact::open(dir.path().join("bench.txt")).await.unwrap());
                    let classifier =
                        ProbeClassifier::new(Arc::new(InstantProbe), 443, 1, Duration::from_secs(1));
                    let summary = ProbeScheduler::new(workers)
                        .run(&candidates, classifier, artifact)
                        .await;
                    black_box(summary)
                })
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_expansion, bench_exclusion, bench_scheduler);
criterion_main!(benches);
