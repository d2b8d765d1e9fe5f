// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every serving option is optional here so that values from a `--config`
//! file are only overridden when the flag is actually given.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `nginx-config-viewer`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "nginx-config-viewer",
    version,
    about = "Serve one nginx config file over HTTP and live-reload browsers when it changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Listen address, e.g. `:8080` or `127.0.0.1:9000`.
    ///
    /// Default: `:8080` (or `[server].addr` from the config file).
    #[arg(long, value_name = "ADDR")]
    pub addr: Option<String>,

    /// Path of the file to serve and watch.
    ///
    /// Default: `/etc/nginx/nginx.conf` (or `[server].path`).
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Allow cross-origin requests on `/raw`.
    #[arg(long)]
    pub cors: bool,

    /// Optional TOML config file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `NGINX_VIEWER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the settings, then exit without watching or serving.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
