//! Configuration loading and validation.
//!
//! [`load`] resolves the config file (explicit path, or auto-detected
//! `storefront-edge.{yaml,yml,json,toml}` in the working directory),
//! parses it with the format matching its extension, and validates the
//! result. Without any file the built-in defaults are used, which point
//! at a gateway on `localhost:8000`.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::Path;

use crate::error::EdgeError;
use model::Config;

/// A validated config together with where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: String,
}

pub async fn load(explicit: Option<&Path>) -> Result<LoadedConfig, EdgeError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => sources::detect().await,
    };

    let Some(path) = path else {
        tracing::info!("no config file found, using built-in defaults");
        return Ok(LoadedConfig {
            config: Config::default(),
            source: "defaults".into(),
        });
    };

    let config = load_file(&path).await?;
    Ok(LoadedConfig {
        config,
        source: path.display().to_string(),
    })
}

pub async fn load_file(path: &Path) -> Result<Config, EdgeError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EdgeError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EdgeError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = sources::parse_config_str(ext, &content, &path.display().to_string())?;

    validation::validate(&config).map_err(|errors| EdgeError::ConfigValidation { errors })?;
    Ok(config)
}
