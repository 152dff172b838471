//! Behaviour of a build with the `no-throw` feature
//!
//! Run with `--features no-throw`.

#![cfg(feature = "no-throw")]

use faultline::prelude::*;
use faultline::{on_fatal_exception, on_recoverable_exception, root_policy, THROW_ENABLED};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct CountingTap {
    calls: Cell<usize>,
}

impl ExceptionCallback for CountingTap {
    fn log_message(
        &self,
        _file: &'static str,
        _line: u32,
        _context_depth: u32,
        _text: String,
        _next: CallbackRef,
    ) {
        self.calls.set(self.calls.get() + 1);
    }
}

#[test]
fn test_build_flag_disables_throwing() {
    assert!(!THROW_ENABLED);
    assert!(!root_policy().config().throw_enabled);
}

#[test]
fn test_recoverable_is_logged_once_never_raised() {
    let tap = Rc::new(CountingTap::default());
    let _tap = push_callback(tap.clone());

    let outcome = run_catching(|| on_recoverable_exception(exception!(OsError, "disk full")));

    assert!(outcome.is_ok());
    assert_eq!(tap.calls.get(), 1);
}

#[test]
fn test_fatal_is_logged_when_throwing_is_disabled() {
    let tap = Rc::new(CountingTap::default());
    let _tap = push_callback(tap.clone());

    let outcome = run_catching(|| on_fatal_exception(exception!(InternalBug, "corrupted")));

    assert!(outcome.is_ok());
    assert_eq!(tap.calls.get(), 1);
}
