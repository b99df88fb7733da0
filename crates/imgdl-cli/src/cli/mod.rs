//! CLI for the imgdl image downloader.

mod commands;
mod input;
mod table;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use imgdl_core::config;
use std::path::PathBuf;

use commands::{run_config, run_fetch};

/// Top-level CLI for imgdl.
#[derive(Debug, Parser)]
#[command(name = "imgdl")]
#[command(about = "imgdl: download a list of images concurrently", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download image URLs into a directory as image_1.jpg, image_2.jpg, ...
    Fetch(FetchArgs),

    /// Show the config file path and the effective configuration.
    Config,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Direct HTTP/HTTPS image URLs. When none are given, URLs come from
    /// --from-file or are prompted for.
    pub urls: Vec<String>,

    /// Destination directory (must exist and be writable). Prompted for when omitted.
    #[arg(long, short = 'd', value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Read URLs from a file, one per line ('#' starts a comment).
    #[arg(long, value_name = "PATH", conflicts_with = "urls")]
    pub from_file: Option<PathBuf>,

    /// Skip TLS certificate and host name verification.
    #[arg(long)]
    pub insecure: bool,

    /// CA bundle to verify HTTPS servers against.
    #[arg(long, value_name = "PATH")]
    pub ca_file: Option<PathBuf>,

    /// Run at most N transfers at once (default: one per URL, no cap).
    #[arg(long, short = 'j', value_name = "N", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

fn parse_jobs(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch(args) => run_fetch(&cfg, args).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
