//! Serde data structures for the storefront-edge configuration file.
//!
//! Contains [`Config`] (the root), [`GatewayConfig`], [`ProxyConfig`],
//! [`SessionConfig`] and [`Endpoints`]. Every field has a default, so an
//! empty file (or no file at all) yields a working local setup. All types
//! use `deny_unknown_fields` for strict parsing.

use serde::{Deserialize, Serialize};

fn default_gateway_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_prefix() -> String {
    "/api".to_string()
}

fn default_cookie_name() -> String {
    "sid".to_string()
}

const fn default_ttl() -> u64 {
    86_400
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_cart_add() -> String {
    "/cart/add".to_string()
}

fn default_cart() -> String {
    "/cart".to_string()
}

fn default_order() -> String {
    "/order".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL every backend path is appended to.
    #[serde(default = "default_gateway_url")]
    pub url: String,

    /// Bound on the wait for gateway response headers, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    /// Mount point of the passthrough; replaced by the gateway URL.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Session lifetime in seconds.
    #[serde(default = "default_ttl")]
    pub ttl: u64,

    #[serde(default)]
    pub secure_cookie: bool,

    #[serde(default)]
    pub store: StoreKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl: default_ttl(),
            secure_cookie: false,
            store: StoreKind::Memory,
            redis_url: None,
        }
    }
}

/// Gateway paths used by the orchestration operations, relative to
/// [`GatewayConfig::url`]. `cart` and `orders` get the user id appended
/// as an extra path segment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoints {
    #[serde(default = "default_login")]
    pub login: String,

    #[serde(default = "default_cart_add")]
    pub cart_add: String,

    #[serde(default = "default_cart")]
    pub cart: String,

    #[serde(default = "default_order")]
    pub checkout: String,

    #[serde(default = "default_order")]
    pub orders: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: default_login(),
            cart_add: default_cart_add(),
            cart: default_cart(),
            checkout: default_order(),
            orders: default_order(),
        }
    }
}

impl Endpoints {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("endpoints.login", self.login.as_str()),
            ("endpoints.cart_add", self.cart_add.as_str()),
            ("endpoints.cart", self.cart.as_str()),
            ("endpoints.checkout", self.checkout.as_str()),
            ("endpoints.orders", self.orders.as_str()),
        ]
        .into_iter()
    }
}
