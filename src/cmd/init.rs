//! `storefront-edge init`: generate a starter configuration file.
//!
//! Writes the built-in defaults in the chosen format so every setting
//! is visible and can be edited in place.

use std::path::PathBuf;

use crate::cli::InitArgs;
use crate::config::model::Config;
use crate::config::sources::to_config_string;
use crate::error::EdgeError;

pub fn execute(args: &InitArgs) -> Result<(), EdgeError> {
    let ext = args.format.extension();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("storefront-edge.{ext}")));

    if output.exists() {
        return Err(EdgeError::FileExists { path: output });
    }

    let content = to_config_string(ext, &Config::default())?;
    std::fs::write(&output, content)?;
    println!("Created {}", output.display());
    Ok(())
}
