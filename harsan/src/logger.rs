//! Logger bootstrap for the `harsan` binary and its tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes `env_logger` once.
///
/// An explicit `level` wins over `RUST_LOG`; without either, only warnings
/// and errors are shown. Repeated calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).format_target(false);
    let _ = builder.try_init();
}
