// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact form submission validator.
//!
//! Checks run in a fixed order and short-circuit on the first failure:
//! honeypot, then required fields, then email shape. Only the first
//! failing reason is ever reported to the caller.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Raw submission fields as parsed from the request body.
///
/// Every field is optional here; presence is a validation concern, not a
/// parsing one. Unknown fields in the body are silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub honeypot: Option<String>,
}

/// A validated submission. Name, email and message are trimmed and
/// non-empty; subject is `None` when absent or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

/// Validation rejection reasons. The `#[error]` strings are the exact
/// client-facing bodies; the spam message stays generic so the honeypot
/// field is never revealed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Spam detected.")]
    SpamDetected,

    #[error("Name, Email, and Message are required.")]
    MissingFields,

    #[error("Invalid email address.")]
    InvalidEmail,
}

/// Validate a raw submission into a [`Submission`].
pub fn validate(form: SubmissionForm) -> Result<Submission, ValidationError> {
    // Honeypot first: a hidden field real users never fill.
    if let Some(honeypot) = &form.honeypot {
        if !honeypot.trim().is_empty() {
            debug!("Honeypot field set, rejecting as spam");
            return Err(ValidationError::SpamDetected);
        }
    }

    let name = trimmed_non_empty(form.name.as_deref());
    let email = trimmed_non_empty(form.email.as_deref());
    let message = trimmed_non_empty(form.message.as_deref());

    let (name, email, message) = match (name, email, message) {
        (Some(n), Some(e), Some(m)) => (n, e, m),
        _ => {
            debug!("Missing required field(s)");
            return Err(ValidationError::MissingFields);
        }
    };

    if !is_valid_email(&email) {
        debug!(email = %email, "Email failed shape check");
        return Err(ValidationError::InvalidEmail);
    }

    Ok(Submission {
        name,
        email,
        subject: trimmed_non_empty(form.subject.as_deref()),
        message,
    })
}

fn trimmed_non_empty(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        None => None,
    }
}

/// Check for a `local@domain.tld` shape: no whitespace, exactly one `@`
/// with a non-empty local part, and a domain containing a dot with
/// non-empty segments around the final one.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
