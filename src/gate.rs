// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Admission gate: per-client submission budget.
//!
//! Each client key gets a window that opens on its first request and lasts
//! `window_secs`. Within a window at most `max_requests` checks are admitted;
//! later checks are denied until the window elapses, at which point the next
//! check opens a fresh window. The counter saturates at the cap.
//!
//! State lives in a sharded concurrent map. The read-increment-compare for a
//! key happens while holding that key's shard lock, so concurrent checks for
//! one key cannot both slip past the cap.
//!
//! Windows are timed with the monotonic [`Instant`] clock rather than wall
//! time, so a system clock step cannot reopen or extend a window.

use crate::config::GateConfig;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionResult {
    /// Request is admitted
    Allowed {
        /// Admissions left in the current window
        remaining: u32,
        /// Time until the current window closes
        reset_in: Duration,
    },
    /// Request is over budget
    Limited {
        /// Time until the current window closes
        retry_after: Duration,
    },
}

impl AdmissionResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AdmissionResult::Allowed { .. })
    }
}

/// Admission window for one client key.
#[derive(Debug, Clone, Copy)]
struct Window {
    /// Admitted checks in this window, never above the cap
    count: u32,
    /// When the window opened
    started: Instant,
}

impl Window {
    fn open(now: Instant) -> Self {
        Self {
            count: 0,
            started: now,
        }
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}

/// Thread-safe admission gate shared by every request handler.
#[derive(Clone)]
pub struct AdmissionGate {
    config: GateConfig,
    windows: Arc<DashMap<String, Window>>,
}

impl AdmissionGate {
    /// Create a new gate with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            windows: Arc::new(DashMap::new()),
        }
    }

    /// A cap of zero turns the gate off.
    pub fn is_enabled(&self) -> bool {
        self.config.max_requests > 0
    }

    /// Configured admissions per window.
    pub fn limit(&self) -> u32 {
        self.config.max_requests
    }

    /// Check and count a request for `key` at the current time.
    pub fn check(&self, key: &str) -> AdmissionResult {
        self.check_at(key, Instant::now())
    }

    /// Check and count a request for `key` at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> AdmissionResult {
        let window_len = self.config.window_duration();
        let cap = self.config.max_requests;

        if !self.is_enabled() {
            return AdmissionResult::Allowed {
                remaining: u32::MAX,
                reset_in: window_len,
            };
        }

        let mut entry = self
            .windows
            .entry(key.to_owned())
            .or_insert_with(|| Window::open(now));
        let window = entry.value_mut();

        if window.elapsed(now) >= window_len {
            *window = Window::open(now);
        }

        let reset_in = window_len.saturating_sub(window.elapsed(now));

        if window.count < cap {
            window.count += 1;
            AdmissionResult::Allowed {
                remaining: cap - window.count,
                reset_in,
            }
        } else {
            debug!(retry_after = ?reset_in, "Admission window exhausted");
            AdmissionResult::Limited {
                retry_after: reset_in,
            }
        }
    }

    /// Drop windows that have fully elapsed.
    ///
    /// A key seen again after eviction simply opens a new window.
    pub fn cleanup_at(&self, now: Instant) -> usize {
        let window_len = self.config.window_duration();
        let before = self.windows.len();
        self.windows.retain(|_, window| window.elapsed(now) < window_len);
        let evicted = before.saturating_sub(self.windows.len());
        if evicted > 0 {
            debug!(evicted, remaining = self.windows.len(), "Evicted expired admission windows");
        }
        evicted
    }

    /// Drop windows that have fully elapsed as of now.
    pub fn cleanup(&self) -> usize {
        self.cleanup_at(Instant::now())
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
