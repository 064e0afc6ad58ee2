//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for problems
//! such as a non-HTTP gateway URL, a malformed proxy prefix, relative
//! endpoint paths, or a Redis session store without a connection URL.
//! Returns a list of [`ValidationError`] values with per-field
//! suggestions.

use url::Url;

use super::model::{Config, StoreKind};
use crate::error::ValidationError;

/// Upper bound on `session.ttl`, in seconds.
pub const MAX_SESSION_TTL: u64 = 10 * 365 * 86_400;

/// Validate the gateway base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_gateway_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.query().is_some() || parsed.fragment().is_some() {
                Err("gateway URL must not carry a query or fragment".into())
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Validate the proxy mount prefix. Returns `Ok(())` or a human-readable error.
pub fn validate_prefix(prefix: &str) -> Result<(), String> {
    if prefix.is_empty() || prefix == "/" {
        return Err("prefix must name a path segment, e.g. '/api'".into());
    }
    if !prefix.starts_with('/') {
        return Err("prefix must start with '/'".into());
    }
    if prefix.ends_with('/') {
        return Err("prefix must not end with '/'".into());
    }
    if prefix.contains(['?', '#', '*']) {
        return Err("prefix must be a plain path".into());
    }
    Ok(())
}

/// Validate a gateway endpoint path. Returns `Ok(())` or a human-readable error.
pub fn validate_endpoint(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err("endpoint path must start with '/'".into());
    }
    if path.contains(['?', '#']) {
        return Err("endpoint path must not carry a query or fragment".into());
    }
    Ok(())
}

/// Validate a cookie name against the RFC 6265 token grammar.
pub fn validate_cookie_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("cookie name cannot be empty".into());
    }
    let valid = name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if valid {
        Ok(())
    } else {
        Err(format!("'{name}' is not a valid cookie name"))
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_gateway_url(&config.gateway.url) {
        errors.push(ValidationError {
            field: "gateway.url".into(),
            message: msg,
            suggestion: Some("e.g. 'http://localhost:8000/api'".into()),
        });
    }

    if config.gateway.timeout == Some(0) {
        errors.push(ValidationError {
            field: "gateway.timeout".into(),
            message: "timeout must be greater than 0".into(),
            suggestion: Some("omit the field to wait indefinitely".into()),
        });
    }

    let prefix = &config.proxy.prefix;
    if let Err(msg) = validate_prefix(prefix) {
        let trimmed = prefix.trim_matches('/');
        errors.push(ValidationError {
            field: "proxy.prefix".into(),
            message: msg,
            suggestion: (!trimmed.is_empty() && format!("/{trimmed}") != *prefix)
                .then(|| format!("did you mean '/{trimmed}'?")),
        });
    }

    for (field, path) in config.endpoints.iter() {
        if let Err(msg) = validate_endpoint(path) {
            errors.push(ValidationError {
                field: field.into(),
                message: msg,
                suggestion: (!path.is_empty() && !path.starts_with('/'))
                    .then(|| format!("did you mean '/{path}'?")),
            });
        }
    }

    let session = &config.session;
    if let Err(msg) = validate_cookie_name(&session.cookie_name) {
        errors.push(ValidationError {
            field: "session.cookie_name".into(),
            message: msg,
            suggestion: None,
        });
    }

    if session.ttl == 0 {
        errors.push(ValidationError {
            field: "session.ttl".into(),
            message: "ttl must be greater than 0".into(),
            suggestion: None,
        });
    } else if session.ttl > MAX_SESSION_TTL {
        errors.push(ValidationError {
            field: "session.ttl".into(),
            message: format!("ttl must be at most {MAX_SESSION_TTL} seconds (10 years)"),
            suggestion: Some("use 86400 for one day".into()),
        });
    }

    if session.store == StoreKind::Redis {
        if session.redis_url.as_deref().map_or(true, str::is_empty) {
            errors.push(ValidationError {
                field: "session.redis_url".into(),
                message: "redis_url is required when store is 'redis'".into(),
                suggestion: Some("e.g. 'redis://localhost:6379'".into()),
            });
        }
        if !cfg!(feature = "redis") {
            errors.push(ValidationError {
                field: "session.store".into(),
                message: "this build does not include the redis session store".into(),
                suggestion: Some("rebuild with --features redis".into()),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let timeout = config
        .gateway
        .timeout
        .map_or_else(|| "none".to_string(), |t| format!("{t}ms"));
    let store = match config.session.store {
        StoreKind::Memory => "memory",
        StoreKind::Redis => "redis",
    };

    let mut lines = vec![
        format!("  gateway: {} (timeout: {timeout})", config.gateway.url),
        format!("  proxy:   {}/* -> {}/*", config.proxy.prefix, config.gateway.url),
        format!(
            "  session: cookie '{}', ttl {}s, {store} store",
            config.session.cookie_name, config.session.ttl
        ),
        "  endpoints:".to_string(),
    ];
    for (field, path) in config.endpoints.iter() {
        let name = field.trim_start_matches("endpoints.");
        lines.push(format!("    {name:<9} {path}"));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn non_http_gateway_fails() {
        let mut config = Config::default();
        config.gateway.url = "ftp://gateway/api".into();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unsupported scheme"));
    }

    #[test]
    fn invalid_gateway_url_fails() {
        let mut config = Config::default();
        config.gateway.url = "not a url".into();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("not a valid URL")));
    }

    #[test]
    fn prefix_without_slash_suggests_fix() {
        let mut config = Config::default();
        config.proxy.prefix = "api".into();
        let errors = validate(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean '/api'?")));
    }

    #[test]
    fn trailing_slash_prefix_fails() {
        let mut config = Config::default();
        config.proxy.prefix = "/api/".into();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors[0].field, "proxy.prefix");
        assert_eq!(errors[0].suggestion.as_deref(), Some("did you mean '/api'?"));
    }

    #[test]
    fn root_prefix_fails() {
        assert!(validate_prefix("/").is_err());
        assert!(validate_prefix("").is_err());
        assert!(validate_prefix("/api/v1").is_ok());
    }

    #[test]
    fn relative_endpoint_fails() {
        let mut config = Config::default();
        config.endpoints.cart_add = "cart/add".into();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors[0].field, "endpoints.cart_add");
        assert_eq!(
            errors[0].suggestion.as_deref(),
            Some("did you mean '/cart/add'?")
        );
    }

    #[test]
    fn cookie_name_with_separator_fails() {
        assert!(validate_cookie_name("my sid").is_err());
        assert!(validate_cookie_name("sid;").is_err());
        assert!(validate_cookie_name("__Host-sid").is_ok());
    }

    #[test]
    fn redis_store_requires_url() {
        let mut config = Config::default();
        config.session.store = StoreKind::Redis;
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "session.redis_url"));
    }

    #[test]
    fn zero_ttl_and_timeout_fail() {
        let mut config = Config::default();
        config.session.ttl = 0;
        config.gateway.timeout = Some(0);
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn ttl_is_bounded() {
        let mut config = Config::default();
        config.session.ttl = u64::MAX;
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "session.ttl");

        config.session.ttl = MAX_SESSION_TTL;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn report_lists_endpoints() {
        let report = format_validation_report("edge.yaml", &Config::default());
        assert!(report.starts_with("edge.yaml is valid"));
        assert!(report.contains("cart_add  /cart/add"));
        assert!(report.contains("/api/* -> http://localhost:8000/api/*"));
    }
}
