// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact form relay service.
//!
//! The submission endpoint is a branch ladder, terminal on the first
//! applicable outcome: rate limit, body parse, validation, webhook
//! configuration, dispatch.

use crate::config::Config;
use crate::dispatcher::{DispatchError, WebhookDispatcher};
use crate::formatter::render_notification;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::validator::{self, SubmissionForm};
use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub dispatcher: WebhookDispatcher,
    pub config: Config,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Success response body.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/submit-form", post(submit_form))
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-form-relay",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Accept, validate and relay one contact form submission.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let ip = addr.ip();

    // Rate limit gate before any endpoint logic.
    if let RateLimitResult::Limited { retry_after } = state.limiter.check_ip(ip).await {
        let retry_secs = retry_after.as_secs().max(1);
        info!(%ip, retry_after_secs = retry_secs, "Submission rate limited");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [("Retry-After", retry_secs.to_string())],
            Json(ErrorResponse {
                error: "Too many submissions. Please wait a minute and try again.".to_string(),
            }),
        )
            .into_response();
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let form = match parse_submission(content_type, &body) {
        Ok(form) => form,
        Err(err) => {
            warn!(%ip, error = %err, "Unparseable submission body");
            return error_response(StatusCode::BAD_REQUEST, "Malformed request body.");
        }
    };

    let submission = match validator::validate(form) {
        Ok(submission) => submission,
        Err(err) => {
            info!(%ip, reason = %err, "Submission rejected");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    // The dispatcher must never run against a missing or insecure target.
    let target = match state.config.webhook.target() {
        Ok(target) => target,
        Err(err) => {
            error!(error = %err, "Webhook configuration unusable");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Webhook URL is missing or invalid in server configuration.",
            );
        }
    };

    let notification = render_notification(&submission, Utc::now());
    debug!(%ip, email = %submission.email, "Submission accepted, dispatching");

    let outcome = state.dispatcher.dispatch(&target, &notification).await;
    dispatch_outcome_response(ip, &submission.email, outcome)
}

/// Map the dispatch outcome onto the client response.
///
/// The remote body is echoed back on rejection; transport detail stays
/// in the logs and the caller gets a generic server error.
fn dispatch_outcome_response(
    ip: IpAddr,
    email: &str,
    outcome: Result<(), DispatchError>,
) -> Response {
    match outcome {
        Ok(()) => {
            info!(%ip, email = %email, "Notification delivered");
            (
                StatusCode::OK,
                Json(SubmitResponse { message: "Message sent successfully." }),
            )
                .into_response()
        }
        Err(DispatchError::Rejected { status, body }) => {
            error!(%ip, remote_status = %status, remote_body = %body, "Webhook rejected notification");
            error_response(
                StatusCode::BAD_GATEWAY,
                &format!("Failed to deliver notification: {body}"),
            )
        }
        Err(DispatchError::Transport(err)) => {
            error!(%ip, error = %err, "Webhook transport failure");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error. Please try again later.",
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

/// Parse the submission body by media type.
///
/// JSON bodies are parsed as JSON; everything else (including a missing
/// Content-Type) is treated as form-encoded, matching the original
/// intake behavior.
fn parse_submission(
    content_type: Option<&str>,
    body: &str,
) -> Result<SubmissionForm, Box<dyn std::error::Error + Send + Sync>> {
    let media_type = content_type
        .map(|s| s.split(';').next().unwrap_or(s).trim().to_lowercase())
        .unwrap_or_default();

    match media_type.as_str() {
        "application/json" => Ok(serde_json::from_str(body)?),
        _ => Ok(serde_urlencoded::from_str(body)?),
    }
}
