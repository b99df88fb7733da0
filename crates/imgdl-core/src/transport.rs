//! Shared transport settings applied to every transfer in a batch.
//!
//! A `TransportConfig` is built once per run and only read afterwards. The
//! connection pool itself is the curl multi handle owned by the orchestrator;
//! libcurl synchronizes its connection cache internally.

use curl::easy::{Easy2, Handler};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default streaming chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
/// libcurl rejects receive buffers outside this range.
const MIN_CHUNK_SIZE: usize = 1024;
const MAX_CHUNK_SIZE: usize = 512 * 1024;

/// Certificate policy for HTTPS transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Verify the peer certificate chain and the host name.
    #[default]
    Verify,
    /// Skip certificate and host name verification. Opt-in only.
    Insecure,
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    /// CA bundle used instead of the system store.
    pub ca_file: Option<PathBuf>,
    pub connect_timeout: Duration,
    /// Wall-clock limit for one whole transfer.
    pub timeout: Duration,
    /// Receive buffer size; the body reaches the file in chunks of at most this many bytes.
    pub chunk_size: usize,
    pub max_redirects: u32,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::Verify,
            ca_file: None,
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_redirects: 10,
            user_agent: default_user_agent(),
        }
    }
}

pub fn default_user_agent() -> String {
    format!("imgdl/{}", env!("CARGO_PKG_VERSION"))
}

impl TransportConfig {
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    pub fn is_insecure(&self) -> bool {
        self.tls == TlsMode::Insecure
    }

    /// Chunk size clamped to what libcurl accepts.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
    }

    /// Configure a GET on `easy` with these settings. The URL is set by the caller.
    pub(crate) fn apply<H: Handler>(&self, easy: &mut Easy2<H>) -> Result<(), curl::Error> {
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirects)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.buffer_size(self.effective_chunk_size())?;
        easy.useragent(&self.user_agent)?;
        match self.tls {
            TlsMode::Verify => {
                easy.ssl_verify_peer(true)?;
                easy.ssl_verify_host(true)?;
            }
            TlsMode::Insecure => {
                easy.ssl_verify_peer(false)?;
                easy.ssl_verify_host(false)?;
            }
        }
        if let Some(ref ca) = self.ca_file {
            easy.cainfo(ca)?;
        }
        Ok(())
    }
}
