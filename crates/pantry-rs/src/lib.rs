//! Public SDK surface for Pantry.
//!
//! This crate re-exports the core building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use pantry_rs_config as config;
pub use pantry_rs_core as core;
/// Re-export for convenience.
pub use pantry_rs_inference as inference;
/// Re-export for convenience.
pub use pantry_rs_protocol as protocol;
pub use pantry_rs_storage as storage;
pub use pantry_rs_tui as tui;

mod overrides;

pub use overrides::{ConfigOverrides, resolve_config};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
