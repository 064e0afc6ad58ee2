//! Prefix matching for the passthrough mount point.
//!
//! A request belongs to the proxy when its path equals the prefix or
//! continues it with a `/`. The gateway-relative target is whatever
//! follows the prefix, with the raw query string appended untouched.

use axum::http::Uri;

/// The part of `path` after `prefix`, if `path` is under the mount point.
#[must_use]
pub fn strip_mount<'a>(prefix: &str, path: &'a str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

/// Gateway-relative path and query for a request under `prefix`.
#[must_use]
pub fn target_path(prefix: &str, uri: &Uri) -> Option<String> {
    let rest = strip_mount(prefix, uri.path())?;
    Some(match uri.query() {
        Some(query) => format!("{rest}?{query}"),
        None => rest.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn exact_prefix_matches() {
        assert_eq!(strip_mount("/api", "/api"), Some(""));
    }

    #[test]
    fn nested_path_matches() {
        assert_eq!(strip_mount("/api", "/api/cart/u1"), Some("/cart/u1"));
        assert_eq!(strip_mount("/api/v1", "/api/v1/x"), Some("/x"));
    }

    #[test]
    fn sibling_names_do_not_match() {
        assert_eq!(strip_mount("/api", "/apix"), None);
        assert_eq!(strip_mount("/api", "/ap"), None);
        assert_eq!(strip_mount("/api", "/login"), None);
    }

    #[test]
    fn query_is_preserved_verbatim() {
        assert_eq!(
            target_path("/api", &uri("/api/products?q=a%20b&sort=-price&x")),
            Some("/products?q=a%20b&sort=-price&x".into())
        );
    }

    #[test]
    fn trailing_slash_is_kept() {
        assert_eq!(target_path("/api", &uri("/api/")), Some("/".into()));
    }

    #[test]
    fn unmatched_uri_has_no_target() {
        assert!(target_path("/api", &uri("/cart-data")).is_none());
    }
}
