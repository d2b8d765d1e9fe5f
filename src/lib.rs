// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod hub;
pub mod logging;
pub mod server;
pub mod stream;
pub mod watch;

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{resolve_config, ViewerConfig};
use crate::hub::Hub;
use crate::server::AppState;
use crate::watch::{spawn_watcher, TrackedPath};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI flags)
/// - the notification hub
/// - the directory watcher and change detector
/// - the HTTP server
/// - Ctrl-C handling
///
/// Every step before serving is fatal on failure.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;
    let tracked = TrackedPath::resolve(&cfg.path)?;

    if args.dry_run {
        print_dry_run(&cfg, &tracked);
        return Ok(());
    }

    let hub = Arc::new(Hub::with_inbox_capacity(cfg.inbox_capacity));

    // Keep the handle alive for the whole process; dropping it stops watching.
    let _watcher = spawn_watcher(tracked.clone(), cfg.debounce, Arc::clone(&hub))?;

    let state = AppState::new(
        Arc::clone(&hub),
        tracked.path(),
        cfg.cors,
        cfg.heartbeat,
    );
    let app = server::router(state);
    let listener = server::bind(&cfg.addr).await?;

    info!(
        "listening on {}, serving {}",
        cfg.addr,
        tracked.path().display()
    );

    // Event streams never finish on their own, so Ctrl-C stops serving
    // outright instead of waiting for connections to drain.
    tokio::select! {
        res = axum::serve(listener, app).into_future() => res?,
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("Ctrl-C received; shutting down");
        }
    }

    Ok(())
}

/// Simple dry-run output: print the resolved settings.
fn print_dry_run(cfg: &ViewerConfig, tracked: &TrackedPath) {
    println!("nginx-config-viewer dry-run");
    println!("  addr            = {}", cfg.addr);
    println!("  path            = {}", tracked.path().display());
    println!("  watch dir       = {}", tracked.dir().display());
    println!("  cors            = {}", cfg.cors);
    println!("  debounce        = {:?}", cfg.debounce);
    println!("  heartbeat       = {:?}", cfg.heartbeat);
    println!("  inbox_capacity  = {}", cfg.inbox_capacity);

    debug!("dry-run complete (no watching, no serving)");
}
