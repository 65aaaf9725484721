// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission storage.
//!
//! The pipeline only needs `insert` and `list_latest`. Two adapters are
//! provided: a volatile in-memory store and an append-only JSON-lines file.
//! Both assign identifiers starting at 1 and stamp `created_at` in UTC.

use crate::validator::Lang;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Storage error types.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// An accepted submission on its way to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub text: String,
    pub lang: Lang,
    pub client_fingerprint: Option<String>,
    pub user_agent: String,
}

/// A persisted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: u64,
    pub text: String,
    pub lang: Lang,
    pub client_fingerprint: Option<String>,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

impl StoredSubmission {
    fn from_new(id: u64, submission: NewSubmission) -> Self {
        Self {
            id,
            text: submission.text,
            lang: submission.lang,
            client_fingerprint: submission.client_fingerprint,
            user_agent: submission.user_agent,
            created_at: Utc::now(),
        }
    }
}

/// Durable record keeper consumed by the intake pipeline.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a submission and return its identifier.
    async fn insert(&self, submission: NewSubmission) -> Result<u64, StoreError>;

    /// Return up to `limit` submissions, newest first.
    async fn list_latest(&self, limit: usize) -> Result<Vec<StoredSubmission>, StoreError>;
}

fn newest_first(records: &[StoredSubmission], limit: usize) -> Vec<StoredSubmission> {
    records.iter().rev().take(limit).cloned().collect()
}

/// Volatile store, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<StoredSubmission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn insert(&self, submission: NewSubmission) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let id = records.len() as u64 + 1;
        records.push(StoredSubmission::from_new(id, submission));
        Ok(id)
    }

    async fn list_latest(&self, limit: usize) -> Result<Vec<StoredSubmission>, StoreError> {
        Ok(newest_first(&self.records.read().await, limit))
    }
}

struct JsonlState {
    file: tokio::fs::File,
    records: Vec<StoredSubmission>,
    next_id: u64,
    /// File length up to the end of the last acknowledged record
    committed_len: u64,
}

/// Append-only JSON-lines file store.
///
/// One record per line. Existing lines are replayed on open; lines that fail
/// to parse (for example a torn final write) are skipped.
///
/// A record is acknowledged only after it is synced. A failed append is
/// truncated away, and any bytes past the last acknowledged record are
/// dropped before the next append, so a failed insert never survives a
/// restart and never shares an id with a later one.
pub struct JsonlStore {
    path: PathBuf,
    state: Mutex<JsonlState>,
}

impl JsonlStore {
    /// Open or create the store at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let (records, torn_tail) = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => (replay(&contents), !contents.is_empty() && !contents.ends_with('\n')),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Vec::new(), false),
            Err(e) => return Err(e.into()),
        };
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        // keep the next record on a line of its own
        if torn_tail {
            file.write_all(b"\n").await?;
            file.flush().await?;
        }
        let committed_len = file.metadata().await?.len();

        info!(path = %path.display(), records = records.len(), "Opened submission store");

        Ok(Self {
            path,
            state: Mutex::new(JsonlState {
                file,
                records,
                next_id,
                committed_len,
            }),
        })
    }
}

async fn append_line(file: &mut tokio::fs::File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await?;
    file.sync_data().await
}

fn replay(contents: &str) -> Vec<StoredSubmission> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str(line) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping unreadable submission record");
                None
            }
        })
        .collect()
}

#[async_trait]
impl SubmissionStore for JsonlStore {
    async fn insert(&self, submission: NewSubmission) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let committed_len = state.committed_len;

        let on_disk = state.file.metadata().await?.len();
        if on_disk > committed_len {
            warn!(
                path = %self.path.display(),
                dropped_bytes = on_disk - committed_len,
                "Truncating unacknowledged bytes"
            );
            state.file.set_len(committed_len).await?;
        }

        let record = StoredSubmission::from_new(state.next_id, submission);
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        if let Err(e) = append_line(&mut state.file, &line).await {
            if let Err(rollback) = state.file.set_len(committed_len).await {
                warn!(
                    path = %self.path.display(),
                    error = %rollback,
                    "Rollback of failed append deferred to next insert"
                );
            }
            return Err(e.into());
        }

        let id = record.id;
        state.committed_len = committed_len + line.len() as u64;
        state.next_id += 1;
        state.records.push(record);
        Ok(id)
    }

    async fn list_latest(&self, limit: usize) -> Result<Vec<StoredSubmission>, StoreError> {
        let state = self.state.lock().await;
        Ok(newest_first(&state.records, limit))
    }
}
