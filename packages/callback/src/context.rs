//! Scoped context annotations
//!
//! A [`ContextCallback`] narrates one layer of work: every exception reported while it
//! is installed gets its frame attached, and every log line passing through it is
//! nested one level deeper.

use crate::stack::{push_callback, CallbackGuard, CallbackRef, ExceptionCallback};
use faultline_exception::Exception;

/// Override that annotates exceptions with a fixed context frame
#[derive(Debug, Clone)]
pub struct ContextCallback {
    file: &'static str,
    line: u32,
    description: String,
}

impl ContextCallback {
    /// Frame reported as `<file>:<line>: context: <description>`
    pub fn new(file: &'static str, line: u32, description: impl Into<String>) -> Self {
        Self {
            file,
            line,
            description: description.into(),
        }
    }

    /// The annotation text
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    fn annotate(&self, exception: &mut Exception) {
        exception.wrap_context(self.file, self.line, self.description.clone());
    }
}

impl ExceptionCallback for ContextCallback {
    fn on_recoverable_exception(&self, mut exception: Exception, next: CallbackRef) {
        self.annotate(&mut exception);
        next.on_recoverable_exception(exception);
    }

    fn on_fatal_exception(&self, mut exception: Exception, next: CallbackRef) {
        self.annotate(&mut exception);
        next.on_fatal_exception(exception);
    }

    fn log_message(
        &self,
        file: &'static str,
        line: u32,
        context_depth: u32,
        text: String,
        next: CallbackRef,
    ) {
        next.log_message(file, line, context_depth.saturating_add(1), text);
    }
}

/// Install a context frame for the rest of the enclosing scope.
pub fn push_context(
    file: &'static str,
    line: u32,
    description: impl Into<String>,
) -> CallbackGuard {
    push_callback(ContextCallback::new(file, line, description))
}
