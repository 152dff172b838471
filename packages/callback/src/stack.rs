//! Per-thread override stack
//!
//! Every thread owns an independent stack of installed [`ExceptionCallback`]s. The most
//! recently installed one is the thread's current callback; when none is installed the
//! process-wide [`RootPolicy`](crate::RootPolicy) takes over. Installation returns a
//! [`CallbackGuard`] and releasing the guard pops the override again, so installs and
//! releases nest exactly like the scopes that own them.
//!
//! No borrow of the stack is held while a callback runs. Callbacks are free to install
//! further overrides or to dispatch again from the top.

use crate::root::root_policy;
use faultline_exception::Exception;
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::Rc;

/// Pluggable handler for the three events the exception machinery reports
///
/// Every method receives `next`, the callback that was current when this one was
/// installed. The default implementations simply delegate to it; an override may log,
/// annotate, swallow or redirect before or instead of delegating.
pub trait ExceptionCallback {
    /// A failure occurred that the caller may be able to recover from
    fn on_recoverable_exception(&self, exception: Exception, next: CallbackRef) {
        next.on_recoverable_exception(exception);
    }

    /// A failure occurred that cannot be recovered from
    fn on_fatal_exception(&self, exception: Exception, next: CallbackRef) {
        next.on_fatal_exception(exception);
    }

    /// A diagnostic line should be written; `context_depth` is its nesting level
    fn log_message(
        &self,
        file: &'static str,
        line: u32,
        context_depth: u32,
        text: String,
        next: CallbackRef,
    ) {
        next.log_message(file, line, context_depth, text);
    }
}

impl<T: ExceptionCallback + ?Sized> ExceptionCallback for Rc<T> {
    fn on_recoverable_exception(&self, exception: Exception, next: CallbackRef) {
        (**self).on_recoverable_exception(exception, next);
    }

    fn on_fatal_exception(&self, exception: Exception, next: CallbackRef) {
        (**self).on_fatal_exception(exception, next);
    }

    fn log_message(
        &self,
        file: &'static str,
        line: u32,
        context_depth: u32,
        text: String,
        next: CallbackRef,
    ) {
        (**self).log_message(file, line, context_depth, text, next);
    }
}

/// An installed override tagged with the generation of the guard that owns it
type Installed = (u64, Rc<dyn ExceptionCallback>);

thread_local! {
    static OVERRIDES: RefCell<Vec<Installed>> = const { RefCell::new(Vec::new()) };
    static NEXT_GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Link to a callback in the current thread's chain
///
/// The chain always terminates in [`CallbackRef::Root`], so walking `next` never needs
/// a separate end-of-chain check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackRef {
    /// The process-wide root policy
    Root,
    /// The override installed at this depth on the current thread (0 is outermost)
    Override(usize),
}

impl CallbackRef {
    /// The link below `depth`, i.e. what was current before that override was installed.
    fn outer(depth: usize) -> Self {
        depth.checked_sub(1).map_or(Self::Root, Self::Override)
    }

    fn resolve(self) -> Option<(Rc<dyn ExceptionCallback>, CallbackRef)> {
        let Self::Override(depth) = self else {
            return None;
        };

        OVERRIDES
            .try_with(|stack| {
                stack
                    .borrow()
                    .get(depth)
                    .map(|(_, callback)| Rc::clone(callback))
            })
            .ok()
            .flatten()
            .map(|callback| (callback, Self::outer(depth)))
    }

    /// Deliver a recoverable exception to this link
    pub fn on_recoverable_exception(self, exception: Exception) {
        match self.resolve() {
            Some((callback, next)) => callback.on_recoverable_exception(exception, next),
            None => root_policy().handle_recoverable(exception),
        }
    }

    /// Deliver a fatal exception to this link
    pub fn on_fatal_exception(self, exception: Exception) {
        match self.resolve() {
            Some((callback, next)) => callback.on_fatal_exception(exception, next),
            None => root_policy().handle_fatal(exception),
        }
    }

    /// Deliver a diagnostic line to this link
    pub fn log_message(self, file: &'static str, line: u32, context_depth: u32, text: String) {
        match self.resolve() {
            Some((callback, next)) => callback.log_message(file, line, context_depth, text, next),
            None => root_policy().write_log(context_depth, &text),
        }
    }
}

/// Releases an installed override when dropped
///
/// Guards must be dropped in reverse order of installation on the thread that created
/// them. Dropping a guard while a later one is still live panics. A guard whose override
/// was already released that way is inert.
#[must_use = "the override is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CallbackGuard {
    depth: usize,
    generation: u64,
    _not_send: PhantomData<Rc<()>>,
}

impl CallbackGuard {
    /// Depth at which the guarded override sits
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for CallbackGuard {
    fn drop(&mut self) {
        let released = OVERRIDES.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            let owned = matches!(
                stack.get(self.depth),
                Some((generation, _)) if *generation == self.generation
            );
            if !owned {
                return None;
            }
            let in_order = stack.len() == self.depth + 1;
            Some((in_order, stack.split_off(self.depth)))
        });

        // Callbacks are dropped after the borrow ends; their own destructors may touch
        // the stack.
        match released {
            Ok(Some((true, removed))) => {
                drop(removed);
                tracing::trace!(depth = self.depth, "exception callback released");
            }
            Ok(Some((false, removed))) => {
                drop(removed);
                if !std::thread::panicking() {
                    panic!(
                        "exception callback at depth {} released out of order; \
                         overrides must be released in reverse order of installation",
                        self.depth
                    );
                }
            }
            // Already released along with an outer override.
            Ok(None) => {
                tracing::trace!(depth = self.depth, "stale exception callback guard dropped");
            }
            // Thread-local storage already torn down.
            Err(_) => {}
        }
    }
}

/// Install `callback` as the current thread's callback until the guard is dropped.
pub fn push_callback<C>(callback: C) -> CallbackGuard
where
    C: ExceptionCallback + 'static,
{
    let generation = NEXT_GENERATION.with(|next| {
        let generation = next.get();
        next.set(generation.wrapping_add(1));
        generation
    });
    let callback: Rc<dyn ExceptionCallback> = Rc::new(callback);
    let depth = OVERRIDES.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push((generation, callback));
        stack.len() - 1
    });
    tracing::trace!(depth, generation, "exception callback installed");

    CallbackGuard {
        depth,
        generation,
        _not_send: PhantomData,
    }
}

/// Run `f` with `callback` installed, releasing it on every exit path.
pub fn with_callback<C, F, R>(callback: C, f: F) -> R
where
    C: ExceptionCallback + 'static,
    F: FnOnce() -> R,
{
    let _guard = push_callback(callback);
    f()
}

/// Number of overrides installed on the current thread
#[must_use]
pub fn override_depth() -> usize {
    OVERRIDES
        .try_with(|stack| stack.borrow().len())
        .unwrap_or(0)
}

/// The current thread's callback
#[must_use]
pub fn current_callback() -> CallbackRef {
    CallbackRef::outer(override_depth())
}

/// Report a recoverable exception through the current callback.
///
/// Depending on the installed overrides and the root policy this either returns
/// (the exception was logged or swallowed) or unwinds with the exception as payload.
pub fn on_recoverable_exception(exception: Exception) {
    current_callback().on_recoverable_exception(exception);
}

/// Report a fatal exception through the current callback.
pub fn on_fatal_exception(exception: Exception) {
    current_callback().on_fatal_exception(exception);
}

/// Send a diagnostic line through the current callback.
pub fn log_message(file: &'static str, line: u32, context_depth: u32, text: String) {
    current_callback().log_message(file, line, context_depth, text);
}
