// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission Intake Service
//!
//! Serves `POST /api/submit` for anonymous text submissions, screening each
//! one through the admission gate and intake validator before storing it.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:3000)
//! - `MAX_SUBMISSIONS_PER_WINDOW`: Admissions per client per window (default: 20)
//! - `RATE_WINDOW_SECS`: Admission window length (default: 60)
//! - `STORE_PATH`: JSON-lines file for durable storage (default: in-memory)
//! - `STATIC_DIR`: Front-end assets served with an index.html fallback
//! - `ADMIN_LIST_ENABLED`: Serve `GET /api/admin/list` (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use submission_intake::{
    config::Config,
    handlers::{router, AppState},
    metrics::IntakeMetrics,
    pipeline::IntakePipeline,
    store::{JsonlStore, MemoryStore, SubmissionStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.gate.max_requests,
        window_secs = config.gate.window_secs,
        store = ?config.store.path,
        static_dir = ?config.static_dir,
        "Starting submission intake"
    );

    let store: Arc<dyn SubmissionStore> = match &config.store.path {
        Some(path) => Arc::new(JsonlStore::open(path).await?),
        None => {
            warn!("STORE_PATH not set, submissions are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let pipeline = IntakePipeline::new(&config, store, IntakeMetrics::new()?);
    let state = Arc::new(AppState {
        pipeline,
        config: config.clone(),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    let cleanup_interval = config.gate.cleanup_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let gate = cleanup_state.pipeline.gate();
            gate.cleanup();
            cleanup_state.pipeline.metrics().set_gate_keys(gate.tracked_keys());
        }
    });

    let app = router(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
