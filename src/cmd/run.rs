//! `storefront-edge run`: start the edge server.
//!
//! Loads configuration (file or built-in defaults) and applies CLI
//! overrides, connects the session store, starts the Axum HTTP server
//! with graceful shutdown, and spawns a background sweep of expired
//! sessions.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{build_http_client, BackendClient};
use crate::cli::RunArgs;
use crate::config::model::Config;
#[cfg(feature = "redis")]
use crate::config::model::StoreKind;
use crate::config::{self, validation};
use crate::error::EdgeError;
use crate::logging;
use crate::server::{self, AppState};
use crate::session::{self, SessionStore};

pub async fn execute(args: RunArgs) -> Result<(), EdgeError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let loaded = config::load(args.config.as_deref()).await?;
    let mut config = loaded.config;
    apply_overrides(&mut config, &args);
    validation::validate(&config).map_err(|errors| EdgeError::ConfigValidation { errors })?;

    let sessions = session::build_store(&config.session).await?;
    let backend = BackendClient::new(
        build_http_client(),
        &config.gateway.url,
        config.gateway.timeout,
    );

    tracing::info!(
        source = %loaded.source,
        gateway = %backend.base_url(),
        prefix = %config.proxy.prefix,
        session_store = sessions.name(),
        "configuration loaded"
    );

    let state = Arc::new(AppState::new(config, backend, Arc::clone(&sessions)));

    // Shutdown signal: sending on shutdown_tx stops the purge loop
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let purge_handle = tokio::spawn(session_purge_loop(
        sessions,
        args.purge_interval,
        shutdown_rx,
    ));

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "storefront-edge started");

    let graceful_shutdown = async move {
        server::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(graceful_shutdown)
        .await?;

    if let Err(e) = purge_handle.await {
        tracing::error!(error = %e, "session purge task failed");
    }

    tracing::info!("storefront-edge stopped");
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(ref url) = args.gateway_url {
        config.gateway.url.clone_from(url);
    }
    if let Some(ref prefix) = args.prefix {
        config.proxy.prefix.clone_from(prefix);
    }
    if args.timeout.is_some() {
        config.gateway.timeout = args.timeout;
    }
    #[cfg(feature = "redis")]
    if let Some(ref url) = args.redis_url {
        config.session.store = StoreKind::Redis;
        config.session.redis_url = Some(url.clone());
    }
}

async fn session_purge_loop(
    store: Arc<dyn SessionStore>,
    interval_secs: u64,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    interval.tick().await; // Skip first immediate tick

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => {
                tracing::debug!("session purge loop shutting down");
                return;
            }
        }

        match store.purge_expired().await {
            Ok(0) => {}
            Ok(purged) => tracing::debug!(purged, "expired sessions removed"),
            Err(e) => tracing::warn!(error = %e, "session purge failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Commands};

    fn run_args(extra: &[&str]) -> RunArgs {
        let argv = ["storefront-edge", "run"].iter().chain(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Run(args)) => *args,
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn cli_flags_override_file_values() {
        let mut config = Config::default();
        config.gateway.timeout = Some(1000);
        apply_overrides(
            &mut config,
            &run_args(&["--gateway-url", "https://gw.internal/api", "--prefix", "/b"]),
        );
        assert_eq!(config.gateway.url, "https://gw.internal/api");
        assert_eq!(config.proxy.prefix, "/b");
        assert_eq!(config.gateway.timeout, Some(1000));
    }

    #[test]
    fn absent_flags_leave_config_alone() {
        let mut config = Config::default();
        config.proxy.prefix = "/backend".into();
        apply_overrides(&mut config, &run_args(&[]));
        assert_eq!(config.proxy.prefix, "/backend");
    }
}
