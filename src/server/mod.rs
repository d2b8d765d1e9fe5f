// src/server/mod.rs

//! HTTP surface: `/events`, `/raw` and the embedded web UI.
//!
//! All handlers share an [`AppState`] that is built once at startup and
//! injected into the router; nothing here is global.

pub mod assets;
pub mod events;
pub mod raw;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;

use crate::errors::{Result, ViewerError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::hub::Hub;

/// Shared state handed to every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub hub: Arc<Hub>,
    /// Absolute path of the tracked file.
    pub file: Arc<PathBuf>,
    pub fs: Arc<dyn FileSystem>,
    /// Send `Access-Control-Allow-Origin: *` on `/raw`.
    pub cors: bool,
    pub heartbeat: Duration,
}

impl AppState {
    pub fn new(hub: Arc<Hub>, file: impl Into<PathBuf>, cors: bool, heartbeat: Duration) -> Self {
        Self {
            hub,
            file: Arc::new(file.into()),
            fs: Arc::new(RealFileSystem),
            cors,
            heartbeat,
        }
    }

    /// Swap the filesystem backend (tests use [`crate::fs::mock::MockFileSystem`]).
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/events", get(events::stream_events))
        .route("/raw", get(raw::serve_raw))
        .fallback(assets::serve_asset)
        .with_state(state)
}

/// Bind the listening socket; failure here is fatal at startup.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ViewerError::BindError {
            addr: addr.to_string(),
            source,
        })
}
