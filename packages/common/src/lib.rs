//! Common infrastructure for the faultline crates
//!
//! This crate provides the pieces every other faultline crate leans on:
//! - Build-wide and runtime configuration of the exception machinery
//! - Logging initialization for applications and tests

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, THROW_ENABLED};
pub use logging::LoggingTransformer;
