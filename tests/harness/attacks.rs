// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Attack simulation patterns for security testing.

use std::time::Duration;

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Simulated time between submissions
    pub interval: Duration,
    /// Number of unique client addresses to simulate
    pub unique_clients: usize,
    /// Fraction of submissions carrying contact information (0.0-1.0)
    pub pii_ratio: f64,
    /// Fraction of submissions that are too short (0.0-1.0)
    pub short_ratio: f64,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            interval: Duration::from_millis(100),
            unique_clients: 1,
            pii_ratio: 0.0,
            short_ratio: 0.0,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single client flood - basic spam from one address.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            interval: Duration::from_millis(10),
            ..Default::default()
        }
    }

    /// Distributed spam - many clients, few submissions each.
    pub fn distributed_spam() -> Self {
        Self {
            total_requests: 500,
            interval: Duration::from_millis(20),
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// PII probing - a client cycling contact-info disguises.
    pub fn pii_probe() -> Self {
        Self {
            total_requests: 18,
            interval: Duration::from_millis(500),
            pii_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Junk flood - short payloads that still burn the admission budget.
    pub fn junk_flood() -> Self {
        Self {
            total_requests: 60,
            interval: Duration::from_millis(50),
            short_ratio: 1.0,
            ..Default::default()
        }
    }

    /// Slow drip - one submission every 4 seconds, under the budget.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 30,
            interval: Duration::from_secs(4),
            ..Default::default()
        }
    }

    /// Simulated time span covered by the attack.
    pub fn span(&self) -> Duration {
        self.interval * self.total_requests as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_drip_stays_under_budget() {
        let config = AttackConfig::slow_drip();
        // 30 submissions over 120s = 15 per 60s window
        assert_eq!(config.span(), Duration::from_secs(120));
    }
}
