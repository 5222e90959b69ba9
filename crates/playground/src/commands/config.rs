//! Configuration and version display.

use super::context::resolve_data_dir;
use playground_core::PlaygroundConfig;
use std::path::{Path, PathBuf};

/// Show configuration sources, the merged configuration and the data directory.
pub fn show_config(
    config: &PlaygroundConfig,
    sources: &[PathBuf],
    data_dir: Option<&Path>,
) -> anyhow::Result<()> {
    println!("Configuration sources:");
    if sources.is_empty() {
        println!("  (none)");
    } else {
        for source in sources {
            println!("  {}", source.display());
        }
    }
    println!();

    println!("Data directory: {}", resolve_data_dir(config, data_dir)?.display());
    if let Some(dir) = PlaygroundConfig::global_config_dir() {
        println!("Global config directory: {}", dir.display());
    }
    println!();

    println!("Current configuration:");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// Print version information.
pub fn print_version() {
    println!("codeplayground {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("A code playground with a persisted file tree, previews and version history.");
}
