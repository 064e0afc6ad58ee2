//! Format-specific parsing and config file discovery.
//!
//! YAML, JSON and TOML are each gated behind a feature flag (`yaml` is
//! on by default). JSON support is always compiled since `serde_json`
//! is a hard dependency; the `json` feature only enables auto-detection
//! of `.json` files.

use std::path::PathBuf;

use crate::config::model::Config;
use crate::error::EdgeError;

const CANDIDATES: &[&str] = &[
    #[cfg(feature = "yaml")]
    "storefront-edge.yaml",
    #[cfg(feature = "yaml")]
    "storefront-edge.yml",
    #[cfg(feature = "json")]
    "storefront-edge.json",
    #[cfg(feature = "toml")]
    "storefront-edge.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, EdgeError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| EdgeError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        "json" => serde_json::from_str(content).map_err(|e| EdgeError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| EdgeError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(EdgeError::UnsupportedFormat(other.to_string())),
    }
}

/// Serialize a config in the format named by `ext`.
pub fn to_config_string(ext: &str, config: &Config) -> Result<String, EdgeError> {
    let to_io = |e: &dyn std::fmt::Display| EdgeError::Io(std::io::Error::other(e.to_string()));
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::to_string(config).map_err(|e| to_io(&e)),

        "json" => serde_json::to_string_pretty(config)
            .map(|s| s + "\n")
            .map_err(|e| to_io(&e)),

        #[cfg(feature = "toml")]
        "toml" => toml::to_string_pretty(config).map_err(|e| to_io(&e)),

        other => Err(EdgeError::UnsupportedFormat(other.to_string())),
    }
}

/// Look for a config file in the current directory.
pub async fn detect() -> Option<PathBuf> {
    for name in CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return Some(path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trips_defaults() {
        let text = to_config_string("json", &Config::default()).unwrap();
        let parsed = parse_config_str("json", &text, "test.json").unwrap();
        assert_eq!(parsed.gateway.url, Config::default().gateway.url);
        assert_eq!(parsed.endpoints.cart_add, "/cart/add");
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_partial_document() {
        let config = parse_config_str(
            "yaml",
            "gateway:\n  url: http://gateway:8000/api\n  timeout: 2500\nproxy:\n  prefix: /backend\n",
            "edge.yaml",
        )
        .unwrap();
        assert_eq!(config.gateway.url, "http://gateway:8000/api");
        assert_eq!(config.gateway.timeout, Some(2500));
        assert_eq!(config.proxy.prefix, "/backend");
        assert_eq!(config.session.cookie_name, "sid");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse_config_str("ini", "", "edge.ini").unwrap_err();
        assert!(matches!(err, EdgeError::UnsupportedFormat(ref f) if f == "ini"));
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse_config_str("json", "{", "edge.json").unwrap_err();
        assert!(err.to_string().contains("edge.json"));
    }
}
