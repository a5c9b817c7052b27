//! Bounded-concurrency probing of a whole candidate set

use crate::address::{CandidateAddress, CandidateSet};
use crate::error::exit_codes;
use crate::output::ResultArtifact;
use crate::probe::{ProbeClassifier, ProbeOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Totals for one scheduler run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Candidates handed to the scheduler
    pub total: usize,
    /// Candidates whose classification finished
    pub visited: usize,
    pub confirmed: usize,
    pub not_confirmed: usize,
    pub inconclusive: usize,
    /// Confirmed addresses that could not be appended to the artifact
    pub write_failures: usize,
    /// The run stopped before every candidate was started
    pub cancelled: bool,
    pub duration: Duration,
}

impl ScanSummary {
    pub fn exit_code(&self) -> i32 {
        if self.cancelled {
            exit_codes::CANCELLED
        } else if self.write_failures > 0 {
            exit_codes::WRITE_FAILURES
        } else {
            exit_codes::COMPLETED
        }
    }

    fn record(&mut self, report: TaskReport) {
        self.visited += 1;
        match report.outcome {
            ProbeOutcome::Confirmed => self.confirmed += 1,
            ProbeOutcome::NotConfirmed => self.not_confirmed += 1,
            ProbeOutcome::Inconclusive => self.inconclusive += 1,
        }
        if report.write_failed {
            self.write_failures += 1;
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TaskReport {
    outcome: ProbeOutcome,
    write_failed: bool,
}

/// Runs a [`ProbeClassifier`] over every candidate with at most `workers`
/// probes in flight, appending confirmed addresses as they are found.
pub struct ProbeScheduler {
    workers: usize,
    cancel: CancellationToken,
    progress: bool,
}

impl ProbeScheduler {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            cancel: CancellationToken::new(),
            progress: false,
        }
    }

    /// Draw a progress bar on stderr while running
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Token that stops the run from starting new candidates.
    ///
    /// Candidates already in flight finish (or time out) their current
    /// attempt and start no further ones.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(
        &self,
        candidates: &CandidateSet,
        classifier: ProbeClassifier,
        artifact: Arc<ResultArtifact>,
    ) -> ScanSummary {
        let started = Instant::now();
        let mut summary = ScanSummary {
            total: candidates.len(),
            ..Default::default()
        };

        log::info!(
            "Probing {} candidates on port {} with {} workers ({} attempts each)",
            candidates.len(),
            classifier.port(),
            self.workers,
            classifier.retries()
        );

        let classifier = classifier.with_cancel(self.cancel.clone());
        let bar = self.progress_bar(candidates.len());
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut tasks: JoinSet<TaskReport> = JoinSet::new();

        for &addr in candidates {
            // Waiting on a permit keeps at most `workers` tasks alive
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    summary.cancelled = true;
                    break;
                }
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            while let Some(done) = tasks.try_join_next() {
                reap(&mut summary, done, &bar);
            }

            let classifier = classifier.clone();
            let artifact = artifact.clone();
            tasks.spawn(async move {
                let _permit = permit;
                probe_one(addr, &classifier, &artifact).await
            });
        }

        if summary.cancelled {
            log::warn!(
                "Cancelled; waiting for {} in-flight probes to finish",
                tasks.len()
            );
        }

        while let Some(done) = tasks.join_next().await {
            reap(&mut summary, done, &bar);
        }

        bar.finish_and_clear();
        summary.duration = started.elapsed();

        log::info!(
            "Visited {}/{} candidates: {} confirmed, {} not confirmed, {} inconclusive",
            summary.visited,
            summary.total,
            summary.confirmed,
            summary.not_confirmed,
            summary.inconclusive
        );

        summary
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        bar
    }
}

async fn probe_one(
    addr: CandidateAddress,
    classifier: &ProbeClassifier,
    artifact: &ResultArtifact,
) -> TaskReport {
    let outcome = classifier.classify(addr).await;
    let mut write_failed = false;

    if outcome == ProbeOutcome::Confirmed {
        if let Err(e) = artifact.append(addr).await {
            log::error!("{}", e);
            write_failed = true;
        }
    }

    TaskReport {
        outcome,
        write_failed,
    }
}

fn reap(
    summary: &mut ScanSummary,
    done: Result<TaskReport, tokio::task::JoinError>,
    bar: &ProgressBar,
) {
    let report = done.unwrap_or_else(|e| {
        log::error!("Probe task failed: {}", e);
        TaskReport {
            outcome: ProbeOutcome::Inconclusive,
            write_failed: false,
        }
    });
    summary.record(report);
    bar.inc(1);
    if report.outcome == ProbeOutcome::Confirmed {
        bar.set_message(format!("{} confirmed", summary.confirmed));
    }
}
