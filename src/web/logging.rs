//! Browser console logging.
//!
//! `tracing` events are forwarded as `log` records (the `tracing/log`
//! feature) and `console_log` prints them with the console method for their
//! level.

/// Install the panic hook and the console logger.
///
/// Safe to call more than once; later calls keep the first logger.
pub fn init() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        tracing::debug!(error = %e, "console logger already installed");
    }
}
