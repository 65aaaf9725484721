// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the intake pipeline.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Pipeline outcome label values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    InvalidLength,
    PiiDetected,
    RateLimited,
    StoreFailure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::InvalidLength => "invalid_length",
            Self::PiiDetected => "pii_detected",
            Self::RateLimited => "rate_limited",
            Self::StoreFailure => "store_failure",
        }
    }
}

/// Metric handles registered against a private registry.
#[derive(Clone)]
pub struct IntakeMetrics {
    registry: Registry,
    outcomes: IntCounterVec,
    gate_keys: IntGauge,
}

impl IntakeMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let outcomes = IntCounterVec::new(
            Opts::new(
                "submission_intake_outcomes_total",
                "Submission attempts by pipeline outcome",
            ),
            &["outcome"],
        )?;
        let gate_keys = IntGauge::new(
            "submission_intake_gate_keys",
            "Client keys currently tracked by the admission gate",
        )?;

        registry.register(Box::new(outcomes.clone()))?;
        registry.register(Box::new(gate_keys.clone()))?;

        Ok(Self {
            registry,
            outcomes,
            gate_keys,
        })
    }

    pub fn record(&self, outcome: Outcome) {
        self.outcomes.with_label_values(&[outcome.as_str()]).inc();
    }

    pub fn count(&self, outcome: Outcome) -> u64 {
        self.outcomes.with_label_values(&[outcome.as_str()]).get()
    }

    pub fn set_gate_keys(&self, keys: usize) {
        self.gate_keys.set(keys as i64);
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
