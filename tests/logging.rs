//! Logger bootstrap behaviour.
//!
//! The global logger can only be installed once per process, so these tests
//! are serialised and assert that repeated initialisation stays harmless.

use serial_test::serial;

#[test]
#[serial]
fn init_is_idempotent() {
    atrium::init_logging(false);
    atrium::init_logging(false);
    log::info!("logging survives repeated initialisation");
}

#[test]
#[serial]
fn verbose_init_after_quiet_init_is_harmless() {
    atrium::init_logging(false);
    atrium::init_logging(true);
    log::debug!("verbose re-initialisation is a no-op");
}
