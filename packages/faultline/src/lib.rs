//! # Faultline - Classified Exceptions with Scoped Reporting
//!
//! Structured failure values plus a per-thread, scope-nested chain of handlers deciding
//! how those failures are finally reported.
//!
//! ## Pieces
//!
//! ### Exception values
//! - [`Exception`] - nature, durability, capture site, description, raw stack trace
//! - [`Context`] frames - why the failure surfaced at each layer, innermost first
//!
//! ### Reporting
//! - [`ExceptionCallback`] - override recoverable/fatal/log events for a scope
//! - [`push_callback`] / [`with_callback`] - install an override until the guard drops
//! - [`context!`] - annotate everything reported in the current scope
//! - [`RootPolicy`] - raise, or log when raising is unavailable or unsafe
//!
//! ### Ambient
//! - [`Config`] - trace capture and indentation, read from `FAULTLINE_*` variables
//! - [`LoggingTransformer`] - `env_logger` setup
//! - [`LogBridge`] - send diagnostic lines to the `log` facade
//!
//! ## Features
//!
//! - `no-throw` - never raise; every exception takes the logging path
//!
//! ## Example
//!
//! ```rust
//! use faultline::{context, require, run_catching, Nature};
//!
//! fn flush(free_blocks: usize) {
//!     let _ctx = context!("while flushing");
//!     require!(free_blocks > 0, "disk full");
//! }
//!
//! # if faultline::THROW_ENABLED {
//! let err = run_catching(|| flush(0)).unwrap_err();
//! assert_eq!(err.nature(), Nature::PreconditionViolation);
//! assert_eq!(err.context().unwrap().description(), "while flushing");
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

// === Ambient ===

pub use faultline_common::{Config, ConfigError, LoggingTransformer, THROW_ENABLED};

// === Exception Values ===

pub use faultline_exception::{
    capture_return_addresses, Context, Contexts, Durability, Exception, Nature, MAX_TRACE,
};

// === Reporting ===

pub use faultline_callback::{
    current_callback, from_panic_payload, install_panic_hook, log_message, on_fatal_exception,
    on_recoverable_exception, override_depth, push_callback, push_context, root_policy,
    run_catching, throw, with_callback, CallbackGuard, CallbackRef, ContextCallback,
    ExceptionCallback, LogBridge, RootPolicy,
};

// === Macros ===

pub use faultline_callback::{context, exception, fatal, invariant, require};

/// Commonly used items
pub mod prelude {
    pub use crate::{
        context, exception, push_callback, require, run_catching, CallbackRef, Durability,
        Exception, ExceptionCallback, Nature,
    };
}
