//! storefront-edge is the browser-facing HTTP layer of a storefront.
//!
//! It streams every request under a configurable prefix through to a
//! single upstream API gateway, and serves a handful of orchestration
//! endpoints (login, add-to-cart, cart view, checkout, order history)
//! that resolve the caller's identity from a server-side session before
//! talking to the gateway on their behalf.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, health).
//! - [`config`] -- Configuration loading and validation.
//! - [`error`] -- Error types using `thiserror`, and the JSON error replies.
//! - [`backend`] -- hyper client for the upstream gateway.
//! - [`proxy`] -- Streaming passthrough of everything under the prefix.
//! - [`orchestrator`] -- Session-gated login, cart and checkout operations.
//! - [`session`] -- Session ids, the session cookie, and the
//!   [`SessionStore`](session::SessionStore) trait with memory and Redis stores.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`server`] -- Axum router, shared application state, and graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `redis` | Redis session store |
//! | `file-backends` | All file formats |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod backend;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod orchestrator;
pub mod proxy;
pub mod server;
pub mod session;
