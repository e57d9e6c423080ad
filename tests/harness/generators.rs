// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use contact_form_relay::SubmissionForm;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// Generate well-formed submissions with distinct senders.
pub fn generate_valid_forms(count: usize) -> Vec<SubmissionForm> {
    (0..count)
        .map(|i| SubmissionForm {
            name: Some(format!("Sender {i}")),
            email: Some(format!("sender-{i}@mail-{}.example.com", i % 7)),
            subject: if i % 3 == 0 { None } else { Some(format!("Subject {i}")) },
            message: Some(format!("Message body number {i}")),
            honeypot: None,
        })
        .collect()
}

/// Generate bot-style submissions with the honeypot field filled.
pub fn generate_spam_forms(count: usize) -> Vec<SubmissionForm> {
    generate_valid_forms(count)
        .into_iter()
        .enumerate()
        .map(|(i, mut form)| {
            form.honeypot = Some(format!("https://spam-{i}.example.com"));
            form
        })
        .collect()
}

/// Generate malformed email variations that the validator should reject.
pub fn generate_malformed_emails() -> Vec<&'static str> {
    vec![
        "not-an-email",
        "a@b",
        "@b.com",
        "a@.com",
        "a@b.",
        "two words@c.com",
        "a@@b.com",
        "a@b@c.com",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips_unique() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_valid_forms_pass_validation() {
        for form in generate_valid_forms(20) {
            assert!(contact_form_relay::validator::validate(form).is_ok());
        }
    }
}
