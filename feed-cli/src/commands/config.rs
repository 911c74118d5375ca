//! Show the effective configuration.

use anyhow::Result;

use crate::config::Config;

/// Run the config command.
pub fn run(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
