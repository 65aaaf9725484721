// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the submission intake service.
//!
//! Every field has a serde default so a partial config file is valid, and
//! [`Config::from_env`] layers environment overrides on top of the defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the submission intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:3000)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Admission gate configuration
    #[serde(default)]
    pub gate: GateConfig,

    /// Intake validation configuration
    #[serde(default)]
    pub intake: IntakeConfig,

    /// Submission store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Reporting surface configuration
    #[serde(default)]
    pub admin: AdminConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Directory of static front-end assets, served with an index.html fallback
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

/// Admission gate policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Admissions allowed per client key per window (default: 20)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds, anchored at the first request (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between sweeps of expired windows in seconds (default: 60)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Structural limits applied to incoming submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Minimum trimmed text length in code points (default: 10)
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Maximum trimmed text length in code points (default: 2000)
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// User-Agent is truncated to this many characters (default: 180)
    #[serde(default = "default_user_agent_max_chars")]
    pub user_agent_max_chars: usize,

    /// Maximum request body size in bytes (default: 10 KiB)
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

/// Submission store selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON-lines file for durable storage; in-memory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Reporting surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Serve `GET /api/admin/list` (default: true)
    #[serde(default = "default_true")]
    pub list_enabled: bool,

    /// Number of submissions returned by the listing (default: 50)
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_requests() -> u32 {
    20
}

fn default_window_secs() -> u64 {
    60
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_min_chars() -> usize {
    10
}

fn default_max_chars() -> usize {
    2000
}

fn default_user_agent_max_chars() -> usize {
    180
}

fn default_body_limit_bytes() -> usize {
    10 * 1024
}

fn default_list_limit() -> usize {
    50
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            gate: GateConfig::default(),
            intake: IntakeConfig::default(),
            store: StoreConfig::default(),
            admin: AdminConfig::default(),
            metrics: MetricsConfig::default(),
            static_dir: None,
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            max_chars: default_max_chars(),
            user_agent_max_chars: default_user_agent_max_chars(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            list_enabled: default_true(),
            list_limit: default_list_limit(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl GateConfig {
    /// Get the admission window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Get the interval between eviction sweeps
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl Config {
    /// Build a configuration from environment variables.
    ///
    /// Unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            gate: GateConfig {
                max_requests: parsed(&lookup, "MAX_SUBMISSIONS_PER_WINDOW")
                    .unwrap_or(defaults.gate.max_requests),
                window_secs: parsed(&lookup, "RATE_WINDOW_SECS").unwrap_or(defaults.gate.window_secs),
                cleanup_interval_secs: parsed(&lookup, "GATE_CLEANUP_SECS")
                    .unwrap_or(defaults.gate.cleanup_interval_secs),
            },
            intake: IntakeConfig {
                min_chars: parsed(&lookup, "MIN_TEXT_CHARS").unwrap_or(defaults.intake.min_chars),
                max_chars: parsed(&lookup, "MAX_TEXT_CHARS").unwrap_or(defaults.intake.max_chars),
                user_agent_max_chars: parsed(&lookup, "USER_AGENT_MAX_CHARS")
                    .unwrap_or(defaults.intake.user_agent_max_chars),
                body_limit_bytes: parsed(&lookup, "BODY_LIMIT_BYTES")
                    .unwrap_or(defaults.intake.body_limit_bytes),
            },
            store: StoreConfig {
                path: non_empty(lookup("STORE_PATH")).map(PathBuf::from),
            },
            admin: AdminConfig {
                list_enabled: parsed(&lookup, "ADMIN_LIST_ENABLED").unwrap_or(defaults.admin.list_enabled),
                list_limit: parsed(&lookup, "ADMIN_LIST_LIMIT").unwrap_or(defaults.admin.list_limit),
            },
            metrics: MetricsConfig {
                enabled: parsed(&lookup, "METRICS_ENABLED").unwrap_or(defaults.metrics.enabled),
                ..defaults.metrics
            },
            static_dir: non_empty(lookup("STATIC_DIR")).map(PathBuf::from),
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|raw| raw.trim().parse().ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
