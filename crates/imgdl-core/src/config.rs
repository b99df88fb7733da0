use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transport::{default_user_agent, TlsMode, TransportConfig, DEFAULT_CHUNK_SIZE};

/// Global configuration loaded from `~/.config/imgdl/config.toml`.
/// Missing keys fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgdlConfig {
    /// Certificate policy: "verify" (default) or "insecure".
    pub tls: TlsMode,
    /// Optional CA bundle used instead of the system store.
    pub ca_file: Option<PathBuf>,
    /// Seconds allowed for connecting (DNS + TCP + TLS).
    pub connect_timeout_secs: u64,
    /// Seconds allowed for one whole transfer.
    pub timeout_secs: u64,
    /// Streaming chunk size in bytes.
    pub chunk_size: usize,
    /// Maximum redirects followed per URL.
    pub max_redirects: u32,
    /// Optional cap on simultaneous transfers (None = one per URL, no cap).
    pub max_concurrent: Option<usize>,
    /// Optional User-Agent override.
    pub user_agent: Option<String>,
}

impl Default for ImgdlConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::Verify,
            ca_file: None,
            connect_timeout_secs: 30,
            timeout_secs: 300,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_redirects: 10,
            max_concurrent: None,
            user_agent: None,
        }
    }
}

impl ImgdlConfig {
    /// Transport settings for one run.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls,
            ca_file: self.ca_file.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            chunk_size: self.chunk_size,
            max_redirects: self.max_redirects,
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgdlConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ImgdlConfig> {
    if !path.exists() {
        let default_cfg = ImgdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: ImgdlConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}
