//! `storefront-edge health`: check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the response as formatted text or raw JSON.

use axum::http::Method;

use crate::backend::{build_http_client, BackendClient};
use crate::cli::HealthArgs;
use crate::error::EdgeError;
use crate::health::HealthResponse;

const HEALTH_TIMEOUT_MS: u64 = 10_000;

pub async fn execute(args: HealthArgs) -> Result<(), EdgeError> {
    let instance = BackendClient::new(build_http_client(), &args.url, Some(HEALTH_TIMEOUT_MS));
    let reply = instance
        .call_json(Method::GET, "/health", None)
        .await
        .map_err(|e| EdgeError::HttpRequest {
            source: Box::new(e),
        })?;

    if !reply.is_success() {
        return Err(EdgeError::HealthCheckFailed(reply.status));
    }

    let body_str = String::from_utf8_lossy(&reply.body);
    if args.json {
        println!("{body_str}");
        return Ok(());
    }

    match serde_json::from_str::<HealthResponse>(&body_str) {
        Ok(health) => {
            let uptime = format_uptime(health.uptime_seconds);
            let timeout = health
                .gateway
                .timeout_ms
                .map_or_else(|| "none".to_string(), |t| format!("{t}ms"));
            println!("\u{2713} storefront-edge is healthy ({})", args.url);
            println!("  uptime:         {uptime}");
            println!("  gateway:        {} (timeout: {timeout})", health.gateway.url);
            println!("  proxy prefix:   {}", health.gateway.proxy_prefix);
            println!("  session store:  {}", health.session_store);
            println!(
                "  requests:       {} forwarded, {} failed, {} checkout fallbacks",
                health.stats.requests_forwarded,
                health.stats.requests_failed,
                health.stats.checkout_fallbacks
            );
        }
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{body_str}");
        }
    }

    Ok(())
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
