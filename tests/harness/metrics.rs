// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome collection for attack simulation results.

use std::collections::HashMap;
use submission_intake::SubmitError;

/// Collects outcomes during attack simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    /// Count of submissions by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of submissions by client
    requests_per_client: HashMap<String, usize>,
    /// Accepted submissions by client
    accepted_per_client: HashMap<String, usize>,
}

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Accepted,
    RateLimited,
    InvalidLength,
    PiiDetected,
    StoreFailure,
}

impl Outcome {
    pub fn of<T>(result: &Result<T, SubmitError>) -> Self {
        match result {
            Ok(_) => Outcome::Accepted,
            Err(SubmitError::RateLimited { .. }) => Outcome::RateLimited,
            Err(SubmitError::InvalidLength { .. }) => Outcome::InvalidLength,
            Err(SubmitError::PiiDetected(_)) => Outcome::PiiDetected,
            Err(SubmitError::StoreFailure(_)) => Outcome::StoreFailure,
        }
    }
}

impl AttackMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission outcome.
    pub fn record(&mut self, outcome: Outcome, client: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_client.entry(client.to_string()).or_insert(0) += 1;
        if outcome == Outcome::Accepted {
            *self.accepted_per_client.entry(client.to_string()).or_insert(0) += 1;
        }
    }

    /// Get total submission count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get block rate (ratio of non-accepted to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Outcome::Accepted)) as f64 / total as f64
    }

    /// Get number of unique clients that submitted.
    pub fn unique_clients(&self) -> usize {
        self.requests_per_client.len()
    }

    /// Largest number of accepted submissions from any one client.
    pub fn max_accepted_per_client(&self) -> usize {
        self.accepted_per_client.values().copied().max().unwrap_or(0)
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.total_requests(),
            accepted: self.count(Outcome::Accepted),
            rate_limited: self.count(Outcome::RateLimited),
            invalid_length: self.count(Outcome::InvalidLength),
            pii_detected: self.count(Outcome::PiiDetected),
            store_failures: self.count(Outcome::StoreFailure),
            block_rate: self.block_rate(),
            unique_clients: self.unique_clients(),
            max_accepted_per_client: self.max_accepted_per_client(),
        }
    }
}

/// Summary report of attack outcomes.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub accepted: usize,
    pub rate_limited: usize,
    pub invalid_length: usize,
    pub pii_detected: usize,
    pub store_failures: usize,
    pub block_rate: f64,
    pub unique_clients: usize,
    pub max_accepted_per_client: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Attack Metrics Report ===")?;
        writeln!(f, "Total Submissions: {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Accepted:          {}", self.accepted)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Invalid Length:    {}", self.invalid_length)?;
        writeln!(f, "PII Detected:      {}", self.pii_detected)?;
        writeln!(f, "Store Failures:    {}", self.store_failures)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "--- Distribution ---")?;
        writeln!(f, "Unique Clients:    {}", self.unique_clients)?;
        writeln!(f, "Max Accepted/Client: {}", self.max_accepted_per_client)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = AttackMetrics::new();
        metrics.record(Outcome::Accepted, "10.0.0.1");
        metrics.record(Outcome::Accepted, "10.0.0.1");
        metrics.record(Outcome::RateLimited, "10.0.0.1");
        metrics.record(Outcome::Accepted, "10.0.0.2");

        assert_eq!(metrics.total_requests(), 4);
        assert_eq!(metrics.count(Outcome::Accepted), 3);
        assert_eq!(metrics.unique_clients(), 2);
        assert_eq!(metrics.max_accepted_per_client(), 2);
    }

    #[test]
    fn test_block_rate() {
        let mut metrics = AttackMetrics::new();
        for _ in 0..3 {
            metrics.record(Outcome::Accepted, "10.0.0.1");
        }
        for _ in 0..7 {
            metrics.record(Outcome::PiiDetected, "10.0.0.1");
        }

        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
    }
}
