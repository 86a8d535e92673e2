//! Logger bootstrap for the binary and for tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global `env_logger` backend.
///
/// The default filter is `info`, raised to `debug` when `verbose` is set;
/// `RUST_LOG` still overrides either. Repeated calls are harmless so tests
/// may initialise logging freely.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // try_init only fails when a logger is already installed, which is the
    // expected situation in test binaries.
    let already_installed =
        Builder::from_env(Env::default().default_filter_or(fallback.to_string()))
            .try_init()
            .is_err();
    if already_installed {
        log::debug!("logger already initialised");
    }
}
