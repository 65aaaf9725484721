// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Intake validator for submitted text.
//!
//! Checks run in order and stop at the first failure:
//! - trim surrounding whitespace (missing text counts as empty)
//! - length bounds, counted in Unicode code points
//! - contact-information screening
//! - language tag normalisation (never rejects)

use crate::classifier::{self, RiskSignature};
use crate::config::IntakeConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Submission language tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ru,
}

impl Lang {
    /// Only the exact tag `"ru"` selects Russian; anything else is English.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("ru") => Lang::Ru,
            _ => Lang::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid length: {length} characters, expected {min}..={max}")]
    InvalidLength { length: usize, min: usize, max: usize },

    #[error("PII detected ({0})")]
    PiiDetected(RiskSignature),
}

/// A submission that passed every intake check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub text: String,
    pub lang: Lang,
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Submission is accepted
    Accepted(ValidatedSubmission),
    /// Submission is rejected
    Rejected(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Accepted(_))
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Accepted(_) => None,
            ValidationResult::Rejected(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<ValidatedSubmission, ValidationError> {
        match self {
            ValidationResult::Accepted(submission) => Ok(submission),
            ValidationResult::Rejected(e) => Err(e),
        }
    }
}

/// Submission intake validator.
#[derive(Debug, Clone)]
pub struct IntakeValidator {
    config: IntakeConfig,
}

impl IntakeValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: IntakeConfig) -> Self {
        Self { config }
    }

    /// Check the trimmed text length against the configured bounds.
    pub fn validate_length(&self, text: &str) -> Result<(), ValidationError> {
        let length = text.chars().count();
        if length < self.config.min_chars || length > self.config.max_chars {
            debug!(length, "Submission length out of bounds");
            return Err(ValidationError::InvalidLength {
                length,
                min: self.config.min_chars,
                max: self.config.max_chars,
            });
        }
        Ok(())
    }

    /// Screen text for embedded contact information.
    pub fn validate_content(&self, text: &str) -> Result<(), ValidationError> {
        match classifier::classify(text) {
            Some(signature) => {
                debug!(%signature, "Contact information detected");
                Err(ValidationError::PiiDetected(signature))
            }
            None => Ok(()),
        }
    }

    /// Validate a complete submission payload.
    pub fn validate(&self, text: Option<&str>, lang: Option<&str>) -> ValidationResult {
        let text = text.unwrap_or_default().trim();

        if let Err(e) = self.validate_length(text) {
            return ValidationResult::Rejected(e);
        }
        if let Err(e) = self.validate_content(text) {
            return ValidationResult::Rejected(e);
        }

        ValidationResult::Accepted(ValidatedSubmission {
            text: text.to_string(),
            lang: Lang::normalize(lang),
        })
    }
}

impl Default for IntakeValidator {
    fn default() -> Self {
        Self::new(IntakeConfig::default())
    }
}

/// Truncate a User-Agent header to at most `max_chars` characters.
pub fn user_agent_snippet(user_agent: Option<&str>, max_chars: usize) -> String {
    user_agent
        .unwrap_or_default()
        .chars()
        .take(max_chars)
        .collect()
}
