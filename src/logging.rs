// SPDX-License-Identifier: MIT
//
// Logging setup.
//
// Stdout belongs to the TUI, so log lines go to the file named by
// `HEXVIEW_LOG`. Without it no subscriber is installed and every tracing
// macro is a no-op. The filter comes from `RUST_LOG` and defaults to `info`.

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::sync::{Mutex, Once};

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming the log file.
pub const LOG_ENV: &str = "HEXVIEW_LOG";

static INIT: Once = Once::new();

/// Install the file subscriber if `HEXVIEW_LOG` is set. Later calls are
/// ignored.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init() -> io::Result<()> {
    let Some(path) = env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();

        info!(version = env!("CARGO_PKG_VERSION"), "hexview logging initialized");
    });
    Ok(())
}
