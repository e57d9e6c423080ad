// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound webhook dispatch.
//!
//! Exactly one POST per accepted submission; no retries and no queueing.
//! A remote non-success status and a transport failure are distinct
//! errors so the endpoint can map them to different responses.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Wire body for the webhook call: a single text field.
#[derive(Debug, Serialize)]
struct NotificationBody<'a> {
    content: &'a str,
}

/// Dispatch failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Remote endpoint answered with a non-success status.
    #[error("webhook rejected notification ({status}): {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The request never completed (connection, DNS, timeout).
    #[error("webhook transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Webhook dispatcher holding a shared HTTP client.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: reqwest::Client,
}

impl WebhookDispatcher {
    /// Build a dispatcher with the given outbound request timeout.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Send one notification to the target. One attempt only.
    pub async fn dispatch(&self, target: &Url, content: &str) -> Result<(), DispatchError> {
        debug!(target = %target, content_length = content.len(), "Dispatching notification");

        let response = self
            .client
            .post(target.clone())
            .json(&NotificationBody { content })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, "Webhook accepted notification");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DispatchError::Rejected { status, body })
    }
}
