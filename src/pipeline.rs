// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission intake pipeline.
//!
//! admission gate → validator → fingerprint → store. Each stage can end the
//! attempt; only the store call awaits I/O.

use crate::config::Config;
use crate::error::{Result, SubmitError};
use crate::fingerprint;
use crate::gate::{AdmissionGate, AdmissionResult};
use crate::metrics::{IntakeMetrics, Outcome};
use crate::store::{NewSubmission, StoreError, StoredSubmission, SubmissionStore};
use crate::validator::{user_agent_snippet, IntakeValidator, Lang};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Gate key shared by clients with no usable address.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Transport metadata accompanying a submission.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    /// Raw `X-Forwarded-For` header value
    pub forwarded_for: Option<String>,
    /// Transport peer address
    pub peer: Option<String>,
    /// Raw `User-Agent` header value
    pub user_agent: Option<String>,
}

impl ClientMeta {
    fn address(&self) -> Option<String> {
        fingerprint::client_address(self.forwarded_for.as_deref(), self.peer.as_deref())
    }
}

/// Submitted body fields, as received.
#[derive(Debug, Clone, Default)]
pub struct SubmitPayload {
    pub text: Option<String>,
    pub lang: Option<String>,
}

impl SubmitPayload {
    pub fn new(text: impl Into<String>, lang: Option<&str>) -> Self {
        Self {
            text: Some(text.into()),
            lang: lang.map(str::to_owned),
        }
    }
}

/// Confirmation of a stored submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Identifier assigned by the store
    pub id: u64,
    pub lang: Lang,
    /// Admissions left for this client in the current window
    pub remaining: u32,
}

/// The intake pipeline shared by all request handlers.
pub struct IntakePipeline {
    gate: AdmissionGate,
    validator: IntakeValidator,
    store: Arc<dyn SubmissionStore>,
    metrics: IntakeMetrics,
    user_agent_max_chars: usize,
}

impl IntakePipeline {
    pub fn new(config: &Config, store: Arc<dyn SubmissionStore>, metrics: IntakeMetrics) -> Self {
        Self {
            gate: AdmissionGate::new(config.gate.clone()),
            validator: IntakeValidator::new(config.intake.clone()),
            store,
            metrics,
            user_agent_max_chars: config.intake.user_agent_max_chars,
        }
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    pub fn metrics(&self) -> &IntakeMetrics {
        &self.metrics
    }

    /// Run a submission through the pipeline at the current time.
    pub async fn submit(&self, client: &ClientMeta, payload: &SubmitPayload) -> Result<SubmissionReceipt> {
        self.submit_at(client, payload, Instant::now()).await
    }

    /// Run a submission through the pipeline, using `now` for the gate.
    pub async fn submit_at(
        &self,
        client: &ClientMeta,
        payload: &SubmitPayload,
        now: Instant,
    ) -> Result<SubmissionReceipt> {
        let result = self.process(client, payload, now).await;
        self.metrics.record(match &result {
            Ok(_) => Outcome::Accepted,
            Err(SubmitError::InvalidLength { .. }) => Outcome::InvalidLength,
            Err(SubmitError::PiiDetected(_)) => Outcome::PiiDetected,
            Err(SubmitError::RateLimited { .. }) => Outcome::RateLimited,
            Err(SubmitError::StoreFailure(_)) => Outcome::StoreFailure,
        });
        self.metrics.set_gate_keys(self.gate.tracked_keys());
        result
    }

    async fn process(
        &self,
        client: &ClientMeta,
        payload: &SubmitPayload,
        now: Instant,
    ) -> Result<SubmissionReceipt> {
        let address = client.address();
        let client_fingerprint = address.as_deref().and_then(fingerprint::fingerprint);

        let gate_key = address.as_deref().unwrap_or(UNKNOWN_CLIENT);
        let remaining = match self.gate.check_at(gate_key, now) {
            AdmissionResult::Allowed { remaining, .. } => remaining,
            AdmissionResult::Limited { retry_after } => {
                info!(
                    client = client_fingerprint.as_deref().unwrap_or(UNKNOWN_CLIENT),
                    retry_after_secs = retry_after.as_secs(),
                    "Submission rate limited"
                );
                return Err(SubmitError::RateLimited { retry_after });
            }
        };

        let validated = self
            .validator
            .validate(payload.text.as_deref(), payload.lang.as_deref())
            .into_result()
            .map_err(|e| {
                debug!(reason = %e, "Submission rejected");
                SubmitError::from(e)
            })?;

        let lang = validated.lang;
        let submission = NewSubmission {
            text: validated.text,
            lang,
            client_fingerprint,
            user_agent: user_agent_snippet(client.user_agent.as_deref(), self.user_agent_max_chars),
        };
        let fingerprint_for_log = submission.client_fingerprint.clone();

        let id = self.store.insert(submission).await.map_err(|e| {
            error!(
                client = fingerprint_for_log.as_deref().unwrap_or(UNKNOWN_CLIENT),
                error = %e,
                "Failed to store submission"
            );
            SubmitError::StoreFailure(e)
        })?;

        info!(
            id,
            %lang,
            client = fingerprint_for_log.as_deref().unwrap_or(UNKNOWN_CLIENT),
            "Submission stored"
        );

        Ok(SubmissionReceipt { id, lang, remaining })
    }

    /// Most recent submissions, newest first.
    pub async fn list_latest(&self, limit: usize) -> std::result::Result<Vec<StoredSubmission>, StoreError> {
        self.store.list_latest(limit).await
    }
}
