//! `imgdl fetch`: collect URLs and a destination, run the batch, print the report.

use anyhow::{bail, Context, Result};
use imgdl_core::config::ImgdlConfig;
use imgdl_core::orchestrator::{download_all_async, RunOptions};
use imgdl_core::transport::{TlsMode, TransportConfig};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::cli::input;
use crate::cli::table;
use crate::cli::FetchArgs;

/// Transport for this run: config file settings overridden by flags.
pub(crate) fn transport_for(cfg: &ImgdlConfig, insecure: bool, ca_file: Option<PathBuf>) -> TransportConfig {
    let mut transport = cfg.transport();
    if insecure {
        transport.tls = TlsMode::Insecure;
    }
    if ca_file.is_some() {
        transport.ca_file = ca_file;
    }
    transport
}

fn destination_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(d) => {
            if !input::check_directory_access(&d) {
                bail!("directory not available: {}", d.display());
            }
            Ok(d)
        }
        None => input::prompt_directory(&mut io::stdin().lock(), &mut io::stdout()),
    }
}

fn collect_urls(urls: Vec<String>, from_file: Option<PathBuf>) -> Result<Vec<String>> {
    if !urls.is_empty() {
        return Ok(urls);
    }
    match from_file {
        Some(path) => input::read_url_file(&path),
        None => input::prompt_urls(&mut io::stdin().lock(), &mut io::stdout()),
    }
}

pub async fn run_fetch(cfg: &ImgdlConfig, args: FetchArgs) -> Result<()> {
    // Prompts block on stdin, so gather input off the async workers.
    let (dir, from_file, urls) = (args.dir, args.from_file, args.urls);
    let (dest_dir, urls) = tokio::task::spawn_blocking(move || -> Result<(PathBuf, Vec<String>)> {
        let dest_dir = destination_dir(dir)?;
        let urls = collect_urls(urls, from_file)?;
        Ok((dest_dir, urls))
    })
    .await
    .context("input task failed")??;
    let transport = transport_for(cfg, args.insecure, args.ca_file);

    let abort = Arc::new(AtomicBool::new(false));
    let abort_on_signal = Arc::clone(&abort);
    let signal_handle = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping downloads");
            abort_on_signal.store(true, Ordering::Relaxed);
        }
    });

    let opts = RunOptions {
        max_concurrent: args.jobs.or(cfg.max_concurrent),
        abort: Some(abort),
    };
    let url_count = urls.len();
    let report = download_all_async(urls, dest_dir.clone(), Arc::new(transport), opts).await?;
    signal_handle.abort();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", table::render_grid(&report));
    }
    tracing::info!(
        urls = url_count,
        succeeded = report.success_count(),
        failed = report.error_count(),
        dir = %dest_dir.display(),
        "fetch finished"
    );
    Ok(())
}
