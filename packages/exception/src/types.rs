//! Core exception types and definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of return addresses captured per exception
pub const MAX_TRACE: usize = 16;

/// What kind of condition caused a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nature {
    /// The caller broke a documented requirement
    PreconditionViolation,
    /// The code detected its own inconsistency
    InternalBug,
    /// The operating system reported an error
    OsError,
    /// A remote peer or the network failed
    NetworkFailure,
    /// Nothing more specific is known
    Unclassified,
}

/// Whether retrying the failed operation could plausibly succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Durability {
    /// Retrying the same operation may succeed
    Temporary,
    /// Retrying is futile without a change of state
    Permanent,
}

/// One annotation frame in an exception's context chain
///
/// Frames are ordered innermost-first: the head is the most recently attached one and
/// `next` points outward.
///
/// `Clone`, `PartialEq`, `Debug` and `Drop` all walk the chain in a loop, so chains of
/// any length are safe to copy, compare, print and release.
pub struct Context {
    pub(crate) file: &'static str,
    pub(crate) line: u32,
    pub(crate) description: String,
    pub(crate) next: Option<Box<Context>>,
}

impl Drop for Context {
    fn drop(&mut self) {
        // Unlink iteratively so long chains cannot exhaust the stack.
        let mut next = self.next.take();
        while let Some(mut frame) = next {
            next = frame.next.take();
        }
    }
}

impl Context {
    fn frames(&self) -> Contexts<'_> {
        Contexts {
            current: Some(self),
        }
    }

    fn key(&self) -> (&'static str, u32, &str) {
        (self.file, self.line, &self.description)
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        let outer: Vec<&Context> = Contexts {
            current: self.next.as_deref(),
        }
        .collect();

        // Rebuild from the outermost frame inward.
        let mut next = None;
        for frame in outer.into_iter().rev() {
            next = Some(Box::new(Context {
                file: frame.file,
                line: frame.line,
                description: frame.description.clone(),
                next,
            }));
        }

        Context {
            file: self.file,
            line: self.line,
            description: self.description.clone(),
            next,
        }
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.frames().map(Context::key).eq(other.frames().map(Context::key))
    }
}

impl Eq for Context {}

struct Frame<'a>(&'a Context);

impl fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("file", &self.0.file)
            .field("line", &self.0.line)
            .field("description", &self.0.description)
            .finish()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.frames().map(Frame)).finish()
    }
}

/// A classified failure with its capture site, stack trace and context chain
///
/// Everything except the context chain is fixed at construction. Cloning produces a
/// fully independent copy, context chain included.
#[derive(Debug, Clone)]
pub struct Exception {
    pub(crate) file: &'static str,
    pub(crate) line: u32,
    pub(crate) nature: Nature,
    pub(crate) durability: Durability,
    pub(crate) description: String,
    pub(crate) trace: [usize; MAX_TRACE],
    pub(crate) trace_count: usize,
    pub(crate) context: Option<Box<Context>>,
}

/// Iterator over an exception's context frames, innermost first
#[derive(Debug, Clone)]
pub struct Contexts<'a> {
    pub(crate) current: Option<&'a Context>,
}

impl<'a> Iterator for Contexts<'a> {
    type Item = &'a Context;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.current?;
        self.current = frame.next.as_deref();
        Some(frame)
    }
}
