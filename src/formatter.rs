// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Notification text rendering.
//!
//! Pure function of the submission and timestamp; the message body is
//! rendered verbatim, with no escaping or truncation.

use crate::validator::Submission;
use chrono::{DateTime, Utc};

/// Placeholder rendered when the submission carries no subject.
const NO_SUBJECT: &str = "(No subject)";

/// Render the notification text for a validated submission.
///
/// Field order is fixed: header, name, email, subject, message,
/// submission timestamp.
pub fn render_notification(submission: &Submission, submitted_at: DateTime<Utc>) -> String {
    let subject = submission.subject.as_deref().unwrap_or(NO_SUBJECT);

    format!(
        "**New Contact Form Submission**\n\
         **Name:** {}\n\
         **Email:** {}\n\
         **Subject:** {}\n\
         **Message:** {}\n\
         **Submitted at:** {}",
        submission.name,
        submission.email,
        subject,
        submission.message,
        submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
