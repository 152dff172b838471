//! Terminal exception policy
//!
//! The root policy decides what finally happens to an exception nobody intercepted:
//! raise it (unwind with the exception as payload) or log it. Logged text is written to
//! the diagnostic stream, stderr unless a writer was supplied.

use crate::catching::throw;
use crate::stack::{current_callback, CallbackRef, ExceptionCallback};
use faultline_common::{Config, LoggingTransformer};
use faultline_exception::Exception;
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, Once, PoisonError};

static ROOT: Lazy<RootPolicy> = Lazy::new(|| RootPolicy::new(Config::global().clone()));

static PANIC_HOOK: Once = Once::new();

/// The process-wide root policy, created on first use
pub fn root_policy() -> &'static RootPolicy {
    &ROOT
}

enum Sink {
    Stderr,
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// Default handling at the bottom of every callback chain
pub struct RootPolicy {
    config: Config,
    sink: Sink,
}

impl fmt::Debug for RootPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sink = match self.sink {
            Sink::Stderr => "stderr",
            Sink::Writer(_) => "writer",
        };
        f.debug_struct("RootPolicy")
            .field("config", &self.config)
            .field("sink", &sink)
            .finish()
    }
}

impl RootPolicy {
    /// Policy writing its log output to stderr
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sink: Sink::Stderr,
        }
    }

    /// Policy writing its log output to `writer`
    ///
    /// Only [`write_log`](Self::write_log) and this policy's own `log_message` reach the
    /// writer. An exception the policy decides to log is re-sent through the thread's
    /// current callback, which is the process-wide root unless an override is installed;
    /// install this policy with [`push_callback`](crate::push_callback) to capture those too.
    #[must_use]
    pub fn with_writer<W>(config: Config, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            config,
            sink: Sink::Writer(Mutex::new(Box::new(writer))),
        }
    }

    /// Configuration this policy runs with
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Raise the exception, or log it when throwing is disabled or the thread is
    /// already unwinding.
    pub fn handle_recoverable(&self, exception: Exception) {
        if !self.config.throw_enabled {
            self.log_exception(exception);
        } else if std::thread::panicking() {
            tracing::warn!(
                file = exception.file(),
                line = exception.line(),
                "already unwinding; logging recoverable exception instead of raising it"
            );
            self.log_exception(exception);
        } else {
            tracing::debug!(
                nature = %exception.nature(),
                durability = %exception.durability(),
                "raising recoverable exception"
            );
            throw(exception);
        }
    }

    /// Raise the exception unconditionally, or log it when throwing is disabled.
    ///
    /// Raising while the thread is already unwinding aborts the process.
    pub fn handle_fatal(&self, exception: Exception) {
        if self.config.throw_enabled {
            tracing::debug!(nature = %exception.nature(), "raising fatal exception");
            throw(exception);
        } else {
            self.log_exception(exception);
        }
    }

    /// Write `text` indented by `context_depth` to the diagnostic stream.
    ///
    /// Write failures are swallowed.
    pub fn write_log(&self, context_depth: u32, text: &str) {
        let text = if context_depth > 0 {
            Cow::Owned(LoggingTransformer::indent(
                context_depth,
                self.config.indent,
                text,
            ))
        } else {
            Cow::Borrowed(text)
        };

        match &self.sink {
            Sink::Stderr => write_fully(&mut io::stderr().lock(), text.as_bytes()),
            Sink::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
                write_fully(&mut **writer, text.as_bytes());
            }
        }
    }

    fn log_exception(&self, exception: Exception) {
        // Re-enter at the top of the chain so installed log overrides see the message.
        let text = format!("{exception}\n");
        current_callback().log_message(exception.file(), exception.line(), 0, text);
    }
}

impl ExceptionCallback for RootPolicy {
    fn on_recoverable_exception(&self, exception: Exception, _next: CallbackRef) {
        self.handle_recoverable(exception);
    }

    fn on_fatal_exception(&self, exception: Exception, _next: CallbackRef) {
        self.handle_fatal(exception);
    }

    fn log_message(
        &self,
        _file: &'static str,
        _line: u32,
        context_depth: u32,
        text: String,
        _next: CallbackRef,
    ) {
        self.write_log(context_depth, &text);
    }
}

/// Write all of `bytes`, retrying partial writes. Gives up silently on a zero-length
/// write or an error.
pub(crate) fn write_fully<W: Write + ?Sized>(out: &mut W, mut bytes: &[u8]) {
    while !bytes.is_empty() {
        match out.write(bytes) {
            Ok(0) | Err(_) => return,
            Ok(n) => bytes = &bytes[n.min(bytes.len())..],
        }
    }
    let _ = out.flush();
}

/// Render uncaught exceptions in full when a thread unwinds with one.
///
/// Other panic payloads go to the previously installed hook. Idempotent.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Some(exception) = info.payload().downcast_ref::<Exception>() {
                let thread = std::thread::current();
                let name = thread.name().unwrap_or("<unnamed>");
                let text = format!("thread '{name}' raised exception:\n{exception}\n");
                write_fully(&mut io::stderr().lock(), text.as_bytes());
            } else {
                previous(info);
            }
        }));
    });
}
