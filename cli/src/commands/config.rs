//! Config command - show the effective configuration.

use std::path::Path;

use anyhow::Result;
use psview_core::Config;

pub fn show(config: &Config, path: &Path, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!("Config file:        {}", path.display());
    println!("Default pattern:    {}", config.default_pattern);
    println!("Lookup concurrency: {}", config.concurrency());
    println!("Lookup timeout:     {} ms", config.lookup_timeout_ms);
    Ok(())
}
