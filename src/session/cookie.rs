//! Session cookie parsing and `Set-Cookie` construction.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};

use super::SessionId;

/// Find the session id in the request's `Cookie` headers. Malformed values
/// are treated as absent.
#[must_use]
pub fn session_id(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| SessionId::parse(value.trim_matches('"')))
}

/// `Set-Cookie` value binding the browser to `id` for `max_age` seconds.
#[must_use]
pub fn issue(cookie_name: &str, id: &SessionId, max_age: u64, secure: bool) -> HeaderValue {
    build(cookie_name, id.as_str(), max_age, secure)
}

/// `Set-Cookie` value that makes the browser forget the session.
#[must_use]
pub fn expire(cookie_name: &str, secure: bool) -> HeaderValue {
    build(cookie_name, "", 0, secure)
}

fn build(cookie_name: &str, value: &str, max_age: u64, secure: bool) -> HeaderValue {
    let mut cookie =
        format!("{cookie_name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    // Name and value are restricted to token characters by config
    // validation and SessionId::parse.
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(COOKIE, c.parse().unwrap());
        }
        map
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let map = headers(&["theme=dark; sid=abc-123; lang=en"]);
        assert_eq!(session_id(&map, "sid").unwrap().as_str(), "abc-123");
    }

    #[test]
    fn searches_every_cookie_header() {
        let map = headers(&["theme=dark", "sid=second"]);
        assert_eq!(session_id(&map, "sid").unwrap().as_str(), "second");
    }

    #[test]
    fn ignores_similar_names_and_bad_values() {
        assert!(session_id(&headers(&["xsid=abc"]), "sid").is_none());
        assert!(session_id(&headers(&["sid=a%20b"]), "sid").is_none());
        assert!(session_id(&HeaderMap::new(), "sid").is_none());
    }

    #[test]
    fn issue_sets_attributes() {
        let id = SessionId::parse("abc").unwrap();
        let value = issue("sid", &id, 60, true);
        assert_eq!(
            value.to_str().unwrap(),
            "sid=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=60; Secure"
        );
    }

    #[test]
    fn expire_clears_value() {
        let value = expire("sid", false);
        assert_eq!(
            value.to_str().unwrap(),
            "sid=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }
}
