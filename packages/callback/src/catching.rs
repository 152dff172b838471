//! Raising and catching exceptions
//!
//! A raised exception is an unwinding panic whose payload is the [`Exception`] itself.

use faultline_exception::{Durability, Exception, Nature};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// File reported for failures that did not start out as an [`Exception`]
pub const UNKNOWN_FILE: &str = "(unknown)";

/// Unwind with `exception` as the panic payload.
pub fn throw(exception: Exception) -> ! {
    panic::panic_any(exception)
}

/// Run `f`, converting anything it raises into an [`Exception`].
///
/// # Errors
///
/// Returns the raised exception. Plain panics become an unclassified, permanent
/// exception carrying the panic message.
pub fn run_catching<T, F>(f: F) -> Result<T, Exception>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(from_panic_payload)
}

/// Recover an [`Exception`] from a panic payload.
pub fn from_panic_payload(payload: Box<dyn Any + Send>) -> Exception {
    match payload.downcast::<Exception>() {
        Ok(exception) => *exception,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                String::new()
            };
            Exception::new(
                Nature::Unclassified,
                Durability::Permanent,
                UNKNOWN_FILE,
                0,
                message,
            )
        }
    }
}
