//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate, health), and their associated
//! argument structs. Every `run` flag has an environment variable
//! equivalent for container deployments; when set, it overrides the
//! matching config file value.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "storefront-edge",
    version,
    about = "Browser-facing edge for a storefront API gateway",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        storefront-edge run                                  Defaults: gateway at localhost:8000/api\n  \
        storefront-edge run --gateway-url http://gw:8000/api Point at another gateway\n  \
        storefront-edge init                                 Write a starter config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the edge server
    Run(Box<RunArgs>),

    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        storefront-edge run                                  Auto-detect config\n  \
        storefront-edge run -c edge.yaml                     Specific config file\n  \
        storefront-edge run -p 8080 --pretty                 Local dev mode\n  \
        storefront-edge run --timeout 3000                   Bound gateway waits")]
pub struct RunArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Gateway --
    /// Gateway base URL (overrides gateway.url)
    #[arg(long, env = "GATEWAY_URL", help_heading = "Gateway")]
    pub gateway_url: Option<String>,

    /// Passthrough mount prefix (overrides proxy.prefix)
    #[arg(long, env = "PROXY_PREFIX", help_heading = "Gateway")]
    pub prefix: Option<String>,

    /// Gateway response timeout in milliseconds (overrides gateway.timeout)
    #[arg(long, env = "GATEWAY_TIMEOUT_MS", help_heading = "Gateway")]
    pub timeout: Option<u64>,

    // -- Sessions --
    /// Redis URL; switches the session store to redis
    #[cfg(feature = "redis")]
    #[arg(long, env = "REDIS_URL", help_heading = "Sessions")]
    pub redis_url: Option<String>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max body size in bytes for login/cart/checkout requests
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 65_536,
        help_heading = "Tuning"
    )]
    pub max_body: usize,

    /// Interval between sweeps of expired in-memory sessions, in seconds
    #[arg(
        long,
        env = "SESSION_PURGE_SECS",
        default_value_t = 60,
        help_heading = "Tuning"
    )]
    pub purge_interval: u64,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        storefront-edge init                              Starter config (yaml)\n  \
        storefront-edge init -f toml -o edge.toml         TOML format, custom path")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "storefront-edge.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
