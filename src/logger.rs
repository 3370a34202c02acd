//! CHIP-8 logger

use env_logger::Builder;
use log::LevelFilter;

/// Initialize logger
///
/// The `RUST_LOG` environment variable still takes precedence over the
/// requested level.
///
/// # Arguments
///
/// - `level` - Log level
///
pub fn init_logger(level: LevelFilter) {
    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
