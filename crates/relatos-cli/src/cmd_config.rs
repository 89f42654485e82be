use clap::Subcommand;
use relatos_store::config::{
    parse_value, read_config, resolve_segmentation_config, write_config, SEGMENTATION_KEYS,
};
use relatos_store::DataPaths;
use std::path::Path;

use crate::workspace;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. min_gap)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values and the effective segmentation settings
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, repo_root: &Path) -> anyhow::Result<()> {
    let paths = workspace::paths(repo_root);
    match cmd {
        ConfigCmd::Set { key, value } => {
            set(&paths, &key, &value)?;
            println!("{key} = {value}");
        }
        ConfigCmd::Get { key } => match get(&paths, &key)? {
            Some(val) => println!("{val}"),
            None => println!("(not set)"),
        },
        ConfigCmd::List => list(&paths)?,
    }
    Ok(())
}

// ── Command Implementations ──

/// `relatos config set <key> <value>`. Segmentation keys are checked
/// before anything is written.
fn set(paths: &DataPaths, key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = read_config(&paths.config_json)?;
    config.insert(key.to_string(), parse_value(value));
    if SEGMENTATION_KEYS.contains(&key) {
        resolve_segmentation_config(&config)?;
    }
    write_config(&paths.config_json, &config)
}

fn get(paths: &DataPaths, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let config = read_config(&paths.config_json)?;
    Ok(config.get(key).cloned())
}

fn list(paths: &DataPaths) -> anyhow::Result<()> {
    let config = read_config(&paths.config_json)?;
    if config.is_empty() {
        println!("(no config set)");
    } else {
        for (k, v) in &config {
            println!("{k} = {v}");
        }
    }
    let effective = resolve_segmentation_config(&config)?;
    println!("\nEffective segmentation settings:");
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}
