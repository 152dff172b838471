//! Logging initialization
//!
//! Provides `env_logger` setup so the `log` records emitted by the faultline crates
//! (directly or through `tracing`'s `log` feature) reach the terminal.

use log::info;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging setup using `env_logger`
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging (call once at application startup)
    ///
    /// Configure levels via the `RUST_LOG` environment variable:
    /// - `RUST_LOG=debug` - Enable all debug logs
    /// - `RUST_LOG=faultline=info` - Only the records forwarded by `LogBridge`
    /// - `RUST_LOG=faultline_callback=trace` - Override install/release events
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            let installed = env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .try_init()
                .is_ok();

            if installed {
                info!("faultline logging initialized");
            }
        });
    }

    /// Initialize logging for test environments
    ///
    /// Safe to call from every test; later calls are no-ops.
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Repeat `indent` `depth` times in front of `text`.
    ///
    /// Shared by every sink that renders nested diagnostic lines.
    #[must_use]
    pub fn indent(depth: u32, indent: char, text: &str) -> String {
        let mut out = String::with_capacity(depth as usize + text.len());
        out.extend(std::iter::repeat(indent).take(depth as usize));
        out.push_str(text);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_prefixes_only() {
        assert_eq!(LoggingTransformer::indent(3, '_', "hello"), "___hello");
        assert_eq!(LoggingTransformer::indent(0, '_', "a\nb"), "a\nb");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        LoggingTransformer::init_test();
        LoggingTransformer::init();
        LoggingTransformer::init();
    }
}
