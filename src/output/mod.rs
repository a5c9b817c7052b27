//! Output artifacts and operator-facing summaries

use crate::address::CandidateAddress;
use crate::error::HuntError;
use crate::scheduler::ScanSummary;
use colored::*;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only file of confirmed addresses, one per line.
///
/// All workers append through a single lock, so a line is always written
/// whole and never interleaved with another. Each address is written at most
/// once per run; lines from earlier runs are left untouched.
#[derive(Debug)]
pub struct ResultArtifact {
    path: PathBuf,
    state: Mutex<ArtifactState>,
    written: AtomicUsize,
    failures: AtomicUsize,
}

#[derive(Debug)]
struct ArtifactState {
    file: tokio::fs::File,
    recorded: HashSet<CandidateAddress>,
}

impl ResultArtifact {
    /// Open (or create) the artifact in append mode
    pub async fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_exists(&path)?;

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| output_error(&path, e))?;

        log::debug!("Recording confirmed addresses to {}", path.display());

        Ok(Self {
            path,
            state: Mutex::new(ArtifactState {
                file,
                recorded: HashSet::new(),
            }),
            written: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one confirmed address and flush it.
    ///
    /// Returns `Ok(false)` when the address was already recorded this run.
    pub async fn append(&self, addr: CandidateAddress) -> crate::Result<bool> {
        let mut state = self.state.lock().await;
        if state.recorded.contains(&addr) {
            return Ok(false);
        }

        let line = format!("{}\n", addr);
        let result = match state.file.write_all(line.as_bytes()).await {
            Ok(()) => state.file.flush().await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                state.recorded.insert(addr);
                self.written.fetch_add(1, Ordering::Relaxed);
                Ok(true)
            }
            Err(source) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                Err(HuntError::ArtifactWrite {
                    address: addr.ip(),
                    source,
                })
            }
        }
    }

    /// Lines written by this run
    pub fn written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }

    /// Appends that failed
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Flush and sync everything to disk
    pub async fn close(&self) -> crate::Result<()> {
        let mut state = self.state.lock().await;
        state.file.flush().await?;
        state.file.sync_all().await?;
        Ok(())
    }
}

/// Replace `path` with the addresses, one per line, in the given order.
///
/// Intermediate lists live in a working directory that is created on demand.
pub fn write_address_list<'a, P, I>(path: P, addresses: I) -> crate::Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a CandidateAddress>,
{
    let path = path.as_ref();
    create_parent(path)?;
    let file = File::create(path).map_err(|e| output_error(path, e))?;
    write_lines(file, addresses)
}

/// Append the addresses to `path`, creating it if needed
pub fn append_address_list<'a, P, I>(path: P, addresses: I) -> crate::Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a CandidateAddress>,
{
    let path = path.as_ref();
    create_parent(path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| output_error(path, e))?;
    write_lines(file, addresses)
}

fn write_lines<'a, I>(file: File, addresses: I) -> crate::Result<usize>
where
    I: IntoIterator<Item = &'a CandidateAddress>,
{
    let mut writer = BufWriter::new(file);
    let mut count = 0;
    for addr in addresses {
        writeln!(writer, "{}", addr)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

fn create_parent(path: &Path) -> crate::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|_| HuntError::MissingOutputPath(parent.to_path_buf())),
        _ => Ok(()),
    }
}

fn ensure_parent_exists(path: &Path) -> crate::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(HuntError::MissingOutputPath(parent.to_path_buf()))
        }
        _ => Ok(()),
    }
}

fn output_error(path: &Path, e: io::Error) -> HuntError {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            HuntError::MissingOutputPath(path.to_path_buf())
        }
        _ => HuntError::Io(e),
    }
}

/// Print the end-of-run summary
pub fn print_summary(summary: &ScanSummary, artifact: &Path) {
    println!();
    println!("{}", "------------------------------------------------------".bright_blue());
    println!(
        "{} {}/{} candidates probed in {:.1}s",
        "[~]".bright_blue(),
        summary.visited.to_string().bright_cyan(),
        summary.total,
        summary.duration.as_secs_f64()
    );
    println!(
        "{} {} confirmed, {} not confirmed, {} inconclusive",
        "[+]".bright_green(),
        summary.confirmed.to_string().bright_green().bold(),
        summary.not_confirmed,
        summary.inconclusive
    );
    if summary.confirmed > 0 {
        println!("{} Results appended to {}", "[+]".bright_green(), artifact.display());
    }
    if summary.write_failures > 0 {
        eprintln!(
            "{} {} confirmed addresses could not be written",
            "[!]".bright_red(),
            summary.write_failures
        );
    }
    if summary.cancelled {
        eprintln!("{} Scan interrupted before all candidates were probed", "[!]".bright_yellow());
    }
}

/// Render the summary as pretty JSON
pub fn summary_json(summary: &ScanSummary) -> crate::Result<String> {
    serde_json::to_string_pretty(summary)
        .map_err(|e| HuntError::Io(io::Error::new(io::ErrorKind::Other, e)))
}
