//! Process-wide tracing setup.
//!
//! Call [`init_tracing`] once at startup. The explanation components only
//! emit events and never install a subscriber themselves, so tests and
//! embedding applications can skip this entirely.

use std::path::PathBuf;
use std::sync::Once;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: Once = Once::new();

/// Filter directive for a verbosity count (`-v`, `-vv`, ...).
pub fn filter_for(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install a human-readable stderr layer and, when `json_logs` is set, a
/// JSON file layer rolling daily under the user data directory.
///
/// Only the first call has any effect. Keep the returned guard alive for
/// the lifetime of the process so buffered JSON lines are flushed.
pub fn init_tracing(verbose: u8, quiet: bool, json_logs: bool) -> Option<WorkerGuard> {
    let mut guard = None;
    INIT.call_once(|| {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::new(filter_for(verbose, quiet)));

        let json_layer = if json_logs {
            let log_dir = directories::ProjectDirs::from("dev", "shapformel", "shapformel")
                .map(|d| d.data_dir().join("logs"))
                .unwrap_or_else(|| PathBuf::from("."));
            let _ = std::fs::create_dir_all(&log_dir);
            let file_appender = tracing_appender::rolling::daily(&log_dir, "shapformel.log");
            let (non_blocking, worker) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker);
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_filter(EnvFilter::new("debug")),
            )
        } else {
            None
        };

        let _ = tracing_subscriber::registry()
            .with(stderr_layer)
            .with(json_layer)
            .try_init();
    });
    guard
}
