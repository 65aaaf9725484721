// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission Intake
//!
//! Accepts short free-text submissions from anonymous visitors and screens
//! them before they reach storage:
//!
//! - Per-client admission gate (20 submissions per 60 s window by default)
//! - Length bounds on trimmed text (10..=2000 code points)
//! - Contact-information screening (phone numbers, emails, `t.me/` links)
//! - Language tag normalisation (`ru` or `en`)
//! - Pseudonymous client fingerprint (truncated SHA-256 of the address)

pub mod classifier;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod gate;
pub mod handlers;
pub mod metrics;
pub mod pipeline;
pub mod store;
pub mod validator;

pub use config::Config;
pub use error::SubmitError;
pub use gate::{AdmissionGate, AdmissionResult};
pub use pipeline::{ClientMeta, IntakePipeline, SubmissionReceipt, SubmitPayload};
pub use store::{JsonlStore, MemoryStore, SubmissionStore};
pub use validator::{IntakeValidator, Lang, ValidationResult};
