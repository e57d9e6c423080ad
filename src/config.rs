// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact form relay.
//!
//! Loaded once at startup and injected into handlers; the webhook target
//! is deliberately optional so a misconfigured deployment keeps serving
//! requests and reports the configuration error per submission.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration for the contact form relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:3000)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Webhook dispatch configuration
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Outbound webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Webhook target URL. Must use https; validated per request via
    /// [`WebhookConfig::target`], not at startup.
    #[serde(default)]
    pub url: Option<String>,

    /// Outbound request timeout in milliseconds (default: 10000)
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Rate limiting configuration for the submission endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per window per IP (default: 5)
    #[serde(default = "default_max_per_window")]
    pub max_per_window: u32,

    /// Time window for rate calculation in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

/// Webhook configuration errors, surfaced per request as a server error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("webhook URL is not configured")]
    MissingWebhookUrl,

    #[error("webhook URL is not parseable: {0}")]
    InvalidWebhookUrl(String),

    #[error("webhook URL must use https, got scheme {0:?}")]
    InsecureWebhookScheme(String),
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_per_window() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            webhook: WebhookConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self { url: None, request_timeout_ms: default_timeout_ms() }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_window: default_max_per_window(),
            window_secs: default_window_secs(),
        }
    }
}

impl WebhookConfig {
    /// Resolve and validate the webhook target.
    ///
    /// The target must be present, parseable and use https. Checked per
    /// request so an operator can fix the environment without losing the
    /// validation errors callers would otherwise see.
    pub fn target(&self) -> Result<Url, ConfigError> {
        let raw = match &self.url {
            Some(u) if !u.trim().is_empty() => u.trim(),
            _ => return Err(ConfigError::MissingWebhookUrl),
        };

        let url = Url::parse(raw).map_err(|_| ConfigError::InvalidWebhookUrl(raw.to_string()))?;

        if url.scheme() != "https" {
            return Err(ConfigError::InsecureWebhookScheme(url.scheme().to_string()));
        }

        Ok(url)
    }

    /// Get the outbound request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl RateLimitConfig {
    /// Get the rate window duration.
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}
