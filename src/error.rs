// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the submission pipeline

use crate::classifier::RiskSignature;
use crate::handlers::ErrorResponse;
use crate::store::StoreError;
use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;
use thiserror::Error;

/// Reasons a submission attempt does not end in storage.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid length: {length} characters, expected {min}..={max}")]
    InvalidLength { length: usize, min: usize, max: usize },

    #[error("PII detected ({0})")]
    PiiDetected(RiskSignature),

    #[error("Rate limit exceeded, retry in {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("Store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

impl From<ValidationError> for SubmitError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidLength { length, min, max } => {
                Self::InvalidLength { length, min, max }
            }
            ValidationError::PiiDetected(signature) => Self::PiiDetected(signature),
        }
    }
}

impl SubmitError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidLength { .. } => "INVALID_LENGTH",
            Self::PiiDetected(_) => "PII_DETECTED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::StoreFailure(_) => "STORE_FAILURE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidLength { .. } | Self::PiiDetected(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Store causes stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidLength { .. } => "Invalid length",
            Self::PiiDetected(_) => "PII detected",
            Self::RateLimited { .. } => "Too many submissions, please try again later",
            Self::StoreFailure(_) => "Storage error",
        }
    }

    /// Whole seconds a throttled client should wait, rounded up.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after } => {
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                Some(secs.max(1))
            }
            _ => None,
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.public_message().to_string(),
            code: self.code(),
            retry_after_secs: self.retry_after_secs(),
        });

        match self.retry_after_secs() {
            Some(secs) => (
                self.status(),
                [(header::RETRY_AFTER, secs.to_string())],
                body,
            )
                .into_response(),
            None => (self.status(), body).into_response(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SubmitError>;
