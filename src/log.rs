// src/log.rs
//
// File-backed tracing setup plus the short call-site macros used across the crate.
// Binaries call `init` once; library code only ever uses the macros.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::consts::{DEFAULT_LOG_FILTER, LOG_FILE, STORE_DIR};

/// Where the log goes besides the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Console {
    /// GUI: file only.
    Off,
    /// CLI: warnings and errors also go to stderr.
    Stderr,
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(console: Console) -> io::Result<()> {
    fs::create_dir_all(STORE_DIR)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(STORE_DIR).join(LOG_FILE))?;

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_filter(file_filter);

    let stderr_layer = match console {
        Console::Off => None,
        Console::Stderr => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(EnvFilter::new("warn")),
        ),
    };

    // try_init: tests and repeated starts must not panic on a second registry
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    Ok(())
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!($($arg)*)
    };
}
