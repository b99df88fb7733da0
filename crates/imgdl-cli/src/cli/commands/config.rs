//! `imgdl config`: show where the config lives and what is in effect.

use anyhow::Result;
use imgdl_core::config::{self, ImgdlConfig};

pub fn run_config(cfg: &ImgdlConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", cfg.to_toml_string()?);
    Ok(())
}
