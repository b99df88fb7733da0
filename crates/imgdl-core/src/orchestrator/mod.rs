//! Download orchestrator: one transfer per URL, all driven concurrently on a
//! single curl multi handle so they share one connection pool.
//!
//! The run returns only after every transfer is terminal. A failing transfer
//! never cancels or short-circuits the others; each URL yields exactly one row.

mod refill;
mod run;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::report::Report;
use crate::transport::TransportConfig;

/// Knobs for one batch. The default is unbounded fan-out with no cancellation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// At most this many transfers in flight; `None` starts every URL at once.
    pub max_concurrent: Option<usize>,
    /// When set to true, unfinished transfers stop and are reported as errors.
    pub abort: Option<Arc<AtomicBool>>,
}

/// Downloads every URL in `urls` into `dest_dir` and returns the report in
/// submission order. URL `i` (1-based) is saved as `dest_dir/image_<i>.jpg`.
///
/// Blocks until all transfers finish; call from `spawn_blocking` (or use
/// [`download_all_async`]) from async code.
pub fn download_all(
    urls: &[String],
    dest_dir: &Path,
    transport: &TransportConfig,
    opts: &RunOptions,
) -> Report {
    if urls.is_empty() {
        tracing::debug!("no URLs to download");
        return Report::default();
    }
    let max = opts.max_concurrent.unwrap_or(urls.len()).max(1);
    tracing::info!(
        count = urls.len(),
        max_concurrent = max,
        dir = %dest_dir.display(),
        "starting batch"
    );
    if transport.is_insecure() {
        tracing::warn!("TLS certificate and host name verification are disabled for this batch");
    }

    let jobs = refill::plan_jobs(urls, dest_dir);
    let report = run::run_multi(jobs, transport, max, opts.abort.as_ref()).into_submission_order();

    tracing::info!(
        succeeded = report.success_count(),
        failed = report.error_count(),
        "batch finished"
    );
    report
}

/// Runs [`download_all`] on tokio's blocking pool.
pub async fn download_all_async(
    urls: Vec<String>,
    dest_dir: PathBuf,
    transport: Arc<TransportConfig>,
    opts: RunOptions,
) -> Result<Report> {
    tokio::task::spawn_blocking(move || download_all(&urls, &dest_dir, &transport, &opts))
        .await
        .context("download batch task failed")
}
