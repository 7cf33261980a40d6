//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Honors `RUST_LOG`; defaults to whatever `env_logger` picks when unset.
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default level filter
///
/// `level` is an `env_logger` filter string such as `"info"` or
/// `"vk_text=debug"`. `RUST_LOG` still wins when it is set. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_with_level(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_initialization_is_ignored() {
        init_with_level("warn");
        init_with_level("debug");
        info!("logging initialized twice");
    }
}
