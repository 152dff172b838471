//! Exception constructors, context wrapping and accessors

use super::trace::capture_return_addresses;
use super::types::{Context, Contexts, Durability, Exception, Nature, MAX_TRACE};
use faultline_common::Config;
use std::io;

impl Exception {
    /// Create an exception, capturing the current call stack.
    ///
    /// Trace capture is best-effort: when it is unavailable or disabled through
    /// [`Config::capture_traces`] the trace is simply empty.
    #[must_use]
    pub fn new(
        nature: Nature,
        durability: Durability,
        file: &'static str,
        line: u32,
        description: impl Into<String>,
    ) -> Self {
        let mut trace = [0usize; MAX_TRACE];
        let trace_count = if Config::global().capture_traces {
            capture_return_addresses(&mut trace)
        } else {
            0
        };

        Self {
            file,
            line,
            nature,
            durability,
            description: description.into(),
            trace,
            trace_count,
            context: None,
        }
    }

    /// Create an exception with an explicit trace instead of capturing one.
    ///
    /// At most [`MAX_TRACE`] addresses are kept.
    #[must_use]
    pub fn with_trace(
        nature: Nature,
        durability: Durability,
        file: &'static str,
        line: u32,
        description: impl Into<String>,
        addresses: &[usize],
    ) -> Self {
        let mut trace = [0usize; MAX_TRACE];
        let trace_count = addresses.len().min(MAX_TRACE);
        trace[..trace_count].copy_from_slice(&addresses[..trace_count]);

        Self {
            file,
            line,
            nature,
            durability,
            description: description.into(),
            trace,
            trace_count,
            context: None,
        }
    }

    /// Create a permanent precondition violation
    #[must_use]
    pub fn precondition(file: &'static str, line: u32, description: impl Into<String>) -> Self {
        Self::new(
            Nature::PreconditionViolation,
            Durability::Permanent,
            file,
            line,
            description,
        )
    }

    /// Create a permanent internal bug
    #[must_use]
    pub fn bug(file: &'static str, line: u32, description: impl Into<String>) -> Self {
        Self::new(Nature::InternalBug, Durability::Permanent, file, line, description)
    }

    /// Create a permanent OS error
    #[must_use]
    pub fn os_error(file: &'static str, line: u32, description: impl Into<String>) -> Self {
        Self::new(Nature::OsError, Durability::Permanent, file, line, description)
    }

    /// Create a permanent network failure
    #[must_use]
    pub fn network_failure(file: &'static str, line: u32, description: impl Into<String>) -> Self {
        Self::new(
            Nature::NetworkFailure,
            Durability::Permanent,
            file,
            line,
            description,
        )
    }

    /// Create a permanent unclassified exception
    #[must_use]
    pub fn unclassified(file: &'static str, line: u32, description: impl Into<String>) -> Self {
        Self::new(Nature::Unclassified, Durability::Permanent, file, line, description)
    }

    /// Classify an I/O error as an OS error.
    ///
    /// Interrupted, would-block and timed-out operations are temporary.
    #[must_use]
    pub fn from_io(err: &io::Error, file: &'static str, line: u32) -> Self {
        let durability = match err.kind() {
            io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                Durability::Temporary
            }
            _ => Durability::Permanent,
        };
        Self::new(Nature::OsError, durability, file, line, err.to_string())
    }

    /// Attach a context frame in front of the existing chain.
    pub fn wrap_context(&mut self, file: &'static str, line: u32, description: impl Into<String>) {
        self.context = Some(Box::new(Context {
            file,
            line,
            description: description.into(),
            next: self.context.take(),
        }));
    }

    /// Builder form of [`Exception::wrap_context`]
    #[must_use]
    pub fn with_context(
        mut self,
        file: &'static str,
        line: u32,
        description: impl Into<String>,
    ) -> Self {
        self.wrap_context(file, line, description);
        self
    }

    /// Source file where the exception was created
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Source line where the exception was created
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Get the nature
    #[must_use]
    pub fn nature(&self) -> Nature {
        self.nature
    }

    /// Get the durability
    #[must_use]
    pub fn durability(&self) -> Durability {
        self.durability
    }

    /// Description text; empty means none was given
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Captured return addresses, innermost first
    #[must_use]
    pub fn stack_trace(&self) -> &[usize] {
        &self.trace[..self.trace_count]
    }

    /// Head of the context chain (most recently attached frame)
    #[must_use]
    pub fn context(&self) -> Option<&Context> {
        self.context.as_deref()
    }

    /// Iterate over context frames, most recently attached first
    #[must_use]
    pub fn contexts(&self) -> Contexts<'_> {
        Contexts {
            current: self.context(),
        }
    }

    /// Number of attached context frames
    #[must_use]
    pub fn context_depth(&self) -> usize {
        self.contexts().count()
    }
}

impl Context {
    /// Source file of the annotation
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Source line of the annotation
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Annotation text
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Next outer frame
    #[must_use]
    pub fn next(&self) -> Option<&Context> {
        self.next.as_deref()
    }
}
