//! Forwarding diagnostic lines to the `log` facade

use crate::stack::{CallbackRef, ExceptionCallback};
use faultline_common::{Config, LoggingTransformer};

/// Log target used for forwarded lines
pub const LOG_TARGET: &str = "faultline";

/// Override sending `log_message` events to `log` instead of the diagnostic stream
///
/// Exceptions pass through untouched. Lines are not delegated further, so the root
/// policy never writes them to stderr.
#[derive(Debug, Clone, Copy)]
pub struct LogBridge {
    level: log::Level,
}

impl LogBridge {
    /// Bridge emitting records at `level`
    #[must_use]
    pub fn new(level: log::Level) -> Self {
        Self { level }
    }

    /// Level of emitted records
    #[must_use]
    pub fn level(&self) -> log::Level {
        self.level
    }
}

impl Default for LogBridge {
    fn default() -> Self {
        Self::new(log::Level::Warn)
    }
}

impl ExceptionCallback for LogBridge {
    fn log_message(
        &self,
        file: &'static str,
        line: u32,
        context_depth: u32,
        text: String,
        _next: CallbackRef,
    ) {
        let text = LoggingTransformer::indent(
            context_depth,
            Config::global().indent,
            text.trim_end_matches('\n'),
        );
        log::log!(target: LOG_TARGET, self.level, "{file}:{line}: {text}");
    }
}
