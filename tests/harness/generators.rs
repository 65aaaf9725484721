// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for abuse simulation.

use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client addresses for testing.
pub fn generate_client_addrs(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// Generate submissions that pass every intake check.
pub fn generate_clean_texts(count: usize) -> Vec<String> {
    const SUBJECTS: &[&str] = &["The library", "Our street", "The night bus", "This café"];
    const REMARKS: &[&str] = &[
        "could use better lighting.",
        "was wonderful this week, thank you!",
        "needs more benches please.",
        "is noisy after midnight.",
    ];
    (0..count)
        .map(|i| {
            format!(
                "{} {}",
                SUBJECTS[i % SUBJECTS.len()],
                REMARKS[(i / SUBJECTS.len()) % REMARKS.len()]
            )
        })
        .collect()
}

/// Submissions carrying contact information in various disguises.
pub fn generate_pii_texts() -> Vec<&'static str> {
    vec![
        // phones
        "call me at 555-123-4567 ok?",
        "whatsapp +44 20 7946 0958 anytime",
        "номер 8 (912) 345-67-89 пишите",
        "digits only 5551234567 here",
        // emails
        "write to jane.doe@example.org soon",
        "MY MAIL IS JOHN+NEWS@EXAMPLE.COM",
        "contact: a_b-c@mail-server.info",
        // messenger links
        "join us at t.me/secretgroup now",
        "see https://T.ME/Channel for more",
    ]
}

/// Texts whose trimmed length falls outside 10..=2000 code points.
pub fn generate_bad_lengths() -> Vec<String> {
    vec![
        String::new(),
        "          ".to_string(),
        "short".to_string(),
        "   xxxxxxxxx   ".to_string(),
        "x".repeat(2001),
        "ж".repeat(2001),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_client_addrs() {
        let addrs = generate_client_addrs(256);
        assert_eq!(addrs.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = addrs.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_clean_texts_have_valid_length() {
        for text in generate_clean_texts(16) {
            let len = text.chars().count();
            assert!((10..=2000).contains(&len), "{:?}", text);
        }
    }
}
