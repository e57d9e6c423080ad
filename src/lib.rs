// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Relay
//!
//! This crate provides a single-endpoint intake service for contact form
//! submissions:
//!
//! - Per-IP rate limiting (5 submissions/minute default)
//! - Honeypot-based spam rejection
//! - Required-field and email-shape validation
//! - Notification rendering with submission timestamp
//! - One-shot relay to a configured https webhook (no retries)

pub mod config;
pub mod dispatcher;
pub mod formatter;
pub mod handlers;
pub mod limiter;
pub mod validator;

pub use config::Config;
pub use dispatcher::{DispatchError, WebhookDispatcher};
pub use limiter::{RateLimitResult, RateLimiter};
pub use validator::{Submission, SubmissionForm, ValidationError};
