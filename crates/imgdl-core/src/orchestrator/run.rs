//! Curl multi event loop: perform, wait, messages; settle completed handles.
//! Every transfer ends with exactly one row, whatever happens to the others.

use curl::multi::Multi;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::report::{Report, StatusRow};
use crate::transfer::{self, TransferError};
use crate::transport::TransportConfig;

use super::refill::{self, Active, Job};

const WAIT_TIMEOUT: Duration = Duration::from_millis(100);

/// Drive all `pending` jobs to a terminal state with at most `max_concurrent`
/// attached to one multi handle. Rows are appended in completion order.
pub(super) fn run_multi(
    mut pending: VecDeque<Job>,
    transport: &TransportConfig,
    max_concurrent: usize,
    abort: Option<&Arc<AtomicBool>>,
) -> Report {
    let mut report = Report::with_capacity(pending.len());
    let multi = Multi::new();
    let mut active: Vec<Active> = Vec::new();

    refill::refill_active(
        &multi,
        transport,
        max_concurrent,
        &mut active,
        &mut pending,
        &mut report,
    );

    while !active.is_empty() {
        if abort.map(|a| a.load(Ordering::Relaxed)).unwrap_or(false) {
            tracing::info!(in_flight = active.len(), queued = pending.len(), "batch aborted");
            fail_active(&multi, &mut active, &mut report, TransferError::Aborted.to_string());
            break;
        }
        let running = match multi.perform() {
            Ok(n) => n,
            Err(e) => {
                tracing::error!("curl multi perform: {}", e);
                fail_active(&multi, &mut active, &mut report, TransferError::Multi(e).to_string());
                break;
            }
        };

        let mut completed: Vec<(usize, Result<(), curl::Error>)> = Vec::new();
        multi.messages(|msg| {
            for (i, a) in active.iter().enumerate() {
                if let Some(res) = msg.result_for2(&a.handle) {
                    completed.push((i, res));
                    break;
                }
            }
        });
        completed.sort_by(|a, b| b.0.cmp(&a.0));
        for (i, performed) in completed {
            let Active { handle, job } = active.remove(i);
            let result = match multi.remove2(handle) {
                Ok(mut easy) => {
                    let code = easy.response_code().unwrap_or(0);
                    easy.get_mut().finish(code, performed)
                }
                Err(e) => Err(TransferError::Multi(e)),
            };
            transfer::log_result(job.index, &job.url, &result);
            report.push(StatusRow::from_result(job.index, &job.url, &result));
        }

        refill::refill_active(
            &multi,
            transport,
            max_concurrent,
            &mut active,
            &mut pending,
            &mut report,
        );

        if running > 0 && !active.is_empty() {
            if let Err(e) = multi.wait(&mut [], WAIT_TIMEOUT) {
                tracing::error!("curl multi wait: {}", e);
                fail_active(&multi, &mut active, &mut report, TransferError::Multi(e).to_string());
                break;
            }
        }
    }

    if !pending.is_empty() {
        let reason = if abort.map(|a| a.load(Ordering::Relaxed)).unwrap_or(false) {
            TransferError::Aborted.to_string()
        } else {
            "not started: transfer engine stopped".to_string()
        };
        refill::fail_pending(&mut pending, &mut report, &reason);
    }
    report
}

/// Detach every active transfer, remove its partial file, and record it as failed.
fn fail_active(multi: &Multi, active: &mut Vec<Active>, report: &mut Report, reason: String) {
    for Active { handle, job } in active.drain(..) {
        match multi.remove2(handle) {
            Ok(mut easy) => easy.get_mut().discard(),
            Err(e) => tracing::debug!(index = job.index, "curl multi remove: {}", e),
        }
        tracing::warn!(index = job.index, url = %job.url, "download failed: {}", reason);
        report.push(StatusRow::error(job.index, &job.url, reason.as_str()));
    }
}
