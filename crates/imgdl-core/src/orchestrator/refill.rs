//! Queue handling for the multi event loop: pending jobs and the active set.

use curl::multi::{Easy2Handle, Multi};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::naming;
use crate::report::{Report, StatusRow};
use crate::transfer::{self, ImageHandler, TransferError};
use crate::transport::TransportConfig;

/// One URL waiting to be handed to curl.
#[derive(Debug, Clone)]
pub(super) struct Job {
    pub(super) index: usize,
    pub(super) url: String,
    pub(super) dest: PathBuf,
}

/// Transfer currently attached to the multi handle.
pub(super) struct Active {
    pub(super) handle: Easy2Handle<ImageHandler>,
    pub(super) job: Job,
}

/// Jobs for `urls` in submission order, indexed from 1.
pub(super) fn plan_jobs(urls: &[String], dest_dir: &Path) -> VecDeque<Job> {
    urls.iter()
        .enumerate()
        .map(|(i, url)| {
            let index = i + 1;
            Job {
                index,
                url: url.clone(),
                dest: naming::destination_path(dest_dir, index),
            }
        })
        .collect()
}

/// Build an Easy2 for `job` and attach it to `multi`.
fn add_easy_to_multi(
    multi: &Multi,
    job: &Job,
    transport: &TransportConfig,
) -> Result<Easy2Handle<ImageHandler>, TransferError> {
    let easy = transfer::build_easy(job.index, &job.url, &job.dest, transport)?;
    let mut handle = multi.add2(easy)?;
    handle.get_mut().start();
    tracing::debug!(index = job.index, url = %job.url, "transfer started");
    Ok(handle)
}

/// Move pending jobs into the active set until `max_concurrent` transfers
/// are active or nothing is left. A job that cannot be started is recorded
/// as an Error row right away.
pub(super) fn refill_active(
    multi: &Multi,
    transport: &TransportConfig,
    max_concurrent: usize,
    active: &mut Vec<Active>,
    pending: &mut VecDeque<Job>,
    report: &mut Report,
) {
    while active.len() < max_concurrent {
        let job = match pending.pop_front() {
            Some(j) => j,
            None => break,
        };
        match add_easy_to_multi(multi, &job, transport) {
            Ok(handle) => active.push(Active { handle, job }),
            Err(e) => {
                let result = Err(e);
                transfer::log_result(job.index, &job.url, &result);
                report.push(StatusRow::from_result(job.index, &job.url, &result));
            }
        }
    }
}

/// Record every job that never reached curl as failed with `reason`.
pub(super) fn fail_pending(pending: &mut VecDeque<Job>, report: &mut Report, reason: &str) {
    for job in pending.drain(..) {
        tracing::warn!(index = job.index, url = %job.url, "not started: {}", reason);
        report.push(StatusRow::error(job.index, &job.url, reason));
    }
}
