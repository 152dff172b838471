//! Configuration of the exception machinery
//!
//! Whether exceptions may be raised at all is decided at build time and cannot be
//! changed afterwards. The remaining knobs are read once from the environment.

use once_cell::sync::Lazy;
use thiserror::Error;

/// Whether raising an exception (unwinding with it as the payload) is available.
///
/// False when the workspace is built with `panic = "abort"` or with the `no-throw`
/// feature. In that case every exception that would have been raised is logged instead.
pub const THROW_ENABLED: bool = cfg!(all(panic = "unwind", not(feature = "no-throw")));

/// Environment variable toggling stack-trace capture.
pub const CAPTURE_TRACES_VAR: &str = "FAULTLINE_CAPTURE_TRACES";

/// Environment variable overriding the indent character used for nested log lines.
pub const INDENT_VAR: &str = "FAULTLINE_INDENT";

/// Errors raised while loading configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A boolean variable held something other than a recognised flag
    #[error("invalid boolean for {var}: {value:?}")]
    InvalidBool {
        /// Variable name
        var: &'static str,
        /// Rejected value
        value: String,
    },

    /// The indent variable was not exactly one character
    #[error("{var} must be exactly one character, got {value:?}")]
    InvalidIndent {
        /// Variable name
        var: &'static str,
        /// Rejected value
        value: String,
    },
}

/// Runtime configuration shared by exception construction and the root policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Raise exceptions instead of logging them. Fixed by [`THROW_ENABLED`] unless a
    /// policy is constructed by hand.
    pub throw_enabled: bool,
    /// Capture return addresses when an exception is constructed.
    pub capture_traces: bool,
    /// Character repeated once per context level in front of logged text.
    pub indent: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            throw_enabled: THROW_ENABLED,
            capture_traces: true,
            indent: '_',
        }
    }
}

static GLOBAL: Lazy<Config> = Lazy::new(|| {
    Config::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring invalid faultline configuration");
        Config::default()
    })
});

impl Config {
    /// Process-wide configuration, loaded from the environment on first use.
    pub fn global() -> &'static Config {
        &GLOBAL
    }

    /// Load configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a key maps to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(CAPTURE_TRACES_VAR) {
            config.capture_traces = parse_bool(CAPTURE_TRACES_VAR, &value)?;
        }

        if let Some(value) = lookup(INDENT_VAR) {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => config.indent = c,
                _ => {
                    return Err(ConfigError::InvalidIndent {
                        var: INDENT_VAR,
                        value,
                    })
                }
            }
        }

        Ok(config)
    }

    /// Same configuration with throwing switched off.
    #[must_use]
    pub fn log_only(mut self) -> Self {
        self.throw_enabled = false;
        self
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("X", " Yes "), Ok(true));
        assert_eq!(parse_bool("X", "off"), Ok(false));
        assert!(parse_bool("X", "maybe").is_err());
    }
}
