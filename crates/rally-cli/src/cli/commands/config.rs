//! `rally config` – show config path and effective values.

use anyhow::Result;
use rally_core::config::{self, RallyConfig};

pub fn run_config(cfg: &RallyConfig) -> Result<()> {
    let path = config::config_path()?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
