// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pattern-based screening for embedded contact information.
//!
//! Three signatures are checked, each as a substring match:
//! - phone-like runs: optional `+`, a digit, then 8+ of digit/space/`-`/`(`/`)`
//! - email-like addresses (case-insensitive)
//! - Telegram `t.me/` links (case-insensitive)
//!
//! This is a heuristic. The phone signature also fires on long numeric runs
//! that are not phone numbers, and that over-inclusion is kept as-is.

use regex::Regex;
use std::sync::LazyLock;

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?[0-9][0-9\s()\-]{8,}").expect("invalid phone pattern"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[A-Za-z0-9_.+\-]+@[A-Za-z0-9_\-]+\.[a-z]{2,}").expect("invalid email pattern")
});

static MESSENGER_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)t\.me/").expect("invalid messenger link pattern"));

/// Which contact-information signature matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskSignature {
    Phone,
    Email,
    MessengerLink,
}

impl RiskSignature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Email => "email",
            Self::MessengerLink => "messenger_link",
        }
    }
}

impl std::fmt::Display for RiskSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return the first signature found in `text`, checked in phone, email,
/// messenger-link order.
pub fn classify(text: &str) -> Option<RiskSignature> {
    if PHONE.is_match(text) {
        Some(RiskSignature::Phone)
    } else if EMAIL.is_match(text) {
        Some(RiskSignature::Email)
    } else if MESSENGER_LINK.is_match(text) {
        Some(RiskSignature::MessengerLink)
    } else {
        None
    }
}

/// Whether `text` contains any contact-information signature.
pub fn is_risky(text: &str) -> bool {
    classify(text).is_some()
}
