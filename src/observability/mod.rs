//! Structured logging setup.
//!
//! - [`init_logging`]: one-time `tracing` subscriber install with `RUST_LOG` support
//! - [`level_for_verbosity`]: maps CLI `-v` counts to a default filter level

use tracing_subscriber::EnvFilter;

/// Default filter level for a given `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// Falls back to `shadowscope=<level>` when `RUST_LOG` is not set. Logs go
/// to stderr so `--json` output on stdout stays parseable. Safe to call more
/// than once; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("shadowscope={}", level_for_verbosity(verbosity)))
    });

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
