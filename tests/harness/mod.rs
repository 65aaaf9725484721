// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for abuse simulation against the intake pipeline.
//!
//! Provides client/payload generators, attack configurations and an outcome
//! collector used by the security tests.

pub mod attacks;
pub mod generators;
pub mod metrics;
