// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Relay Service
//!
//! Accepts contact form submissions on `POST /submit-form`, validates
//! them (honeypot, required fields, email shape), renders a notification
//! and relays it with exactly one POST to a configured webhook.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `PORT`: Listening port (default: 3000)
//! - `WEBHOOK_URL`: Relay target; must be https. When missing or
//!   insecure, valid submissions receive a 500 until corrected.
//! - `RATE_LIMIT_MAX`: Max submissions per window per IP (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length in seconds (default: 60)
//! - `WEBHOOK_TIMEOUT_MS`: Outbound request timeout (default: 10000)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_form_relay::{
    config::{Config, RateLimitConfig, WebhookConfig},
    handlers::{router, AppState},
    limiter::RateLimiter,
    WebhookDispatcher,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        webhook_configured = config.webhook.url.is_some(),
        rate_limit_max = config.rate_limit.max_per_window,
        rate_limit_window_secs = config.rate_limit.window_secs,
        "Starting contact form relay"
    );

    if let Err(err) = config.webhook.target() {
        // Not fatal: submissions get a 500 until the operator fixes it.
        warn!(error = %err, "Webhook target unusable at startup");
    }

    // Create application state
    let limiter = RateLimiter::new(config.rate_limit.clone());
    let dispatcher = WebhookDispatcher::new(config.webhook.request_timeout())?;

    let state = Arc::new(AppState { limiter, dispatcher, config: config.clone() });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_state.limiter.cleanup().await;
        }
    });

    // Build router
    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);

    Config {
        bind_addr: format!("0.0.0.0:{port}"),
        webhook: WebhookConfig {
            url: std::env::var("WEBHOOK_URL").ok(),
            request_timeout_ms: std::env::var("WEBHOOK_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        },
        rate_limit: RateLimitConfig {
            max_per_window: std::env::var("RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        },
    }
}
