//! Scoped exception callbacks
//!
//! Code that detects a failure builds an [`Exception`] and hands it to the current
//! thread's callback. Any scope can install an override for the code beneath it:
//!
//! ```rust
//! use faultline_callback::{push_callback, CallbackRef, Exception, ExceptionCallback};
//!
//! struct Swallow;
//!
//! impl ExceptionCallback for Swallow {
//!     fn on_recoverable_exception(&self, _exception: Exception, _next: CallbackRef) {}
//! }
//!
//! let _guard = push_callback(Swallow);
//! faultline_callback::require!(1 + 1 == 3, "arithmetic is broken");
//! // Still running: the override swallowed the exception.
//! ```
//!
//! Without overrides the [`RootPolicy`] raises the exception as an unwinding panic, or
//! logs it to stderr when throwing is disabled or the thread is already unwinding.

pub mod bridge;
pub mod catching;
pub mod context;
mod macros;
pub mod root;
pub mod stack;

pub use bridge::LogBridge;
pub use catching::{from_panic_payload, run_catching, throw};
pub use context::{push_context, ContextCallback};
pub use faultline_exception::{Context, Durability, Exception, Nature, MAX_TRACE};
pub use root::{install_panic_hook, root_policy, RootPolicy};
pub use stack::{
    current_callback, log_message, on_fatal_exception, on_recoverable_exception, override_depth,
    push_callback, with_callback, CallbackGuard, CallbackRef, ExceptionCallback,
};
