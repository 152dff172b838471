//! Shared test callbacks

#![allow(dead_code)]

use faultline_callback::{CallbackRef, Exception, ExceptionCallback};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// One intercepted `log_message` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub file: &'static str,
    pub line: u32,
    pub depth: u32,
    pub text: String,
}

/// Records every event; optionally passes it on afterwards
#[derive(Default)]
pub struct Recorder {
    pub recoverable: RefCell<Vec<Exception>>,
    pub fatal: RefCell<Vec<Exception>>,
    pub logs: RefCell<Vec<LogLine>>,
    pub delegate: bool,
}

impl Recorder {
    /// Recorder that swallows everything
    pub fn terminal() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Recorder that forwards to the next callback after recording
    pub fn passthrough() -> Rc<Self> {
        Rc::new(Self {
            delegate: true,
            ..Self::default()
        })
    }

    pub fn recoverable_count(&self) -> usize {
        self.recoverable.borrow().len()
    }

    pub fn fatal_count(&self) -> usize {
        self.fatal.borrow().len()
    }

    pub fn logs(&self) -> Vec<LogLine> {
        self.logs.borrow().clone()
    }
}

impl ExceptionCallback for Recorder {
    fn on_recoverable_exception(&self, exception: Exception, next: CallbackRef) {
        self.recoverable.borrow_mut().push(exception.clone());
        if self.delegate {
            next.on_recoverable_exception(exception);
        }
    }

    fn on_fatal_exception(&self, exception: Exception, next: CallbackRef) {
        self.fatal.borrow_mut().push(exception.clone());
        if self.delegate {
            next.on_fatal_exception(exception);
        }
    }

    fn log_message(
        &self,
        file: &'static str,
        line: u32,
        context_depth: u32,
        text: String,
        next: CallbackRef,
    ) {
        self.logs.borrow_mut().push(LogLine {
            file,
            line,
            depth: context_depth,
            text: text.clone(),
        });
        if self.delegate {
            next.log_message(file, line, context_depth, text);
        }
    }
}

/// Override that leaves every default in place
pub struct Transparent;

impl ExceptionCallback for Transparent {}

/// Cloneable in-memory diagnostic stream
#[derive(Clone, Default)]
pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().expect("buffer lock").clone()).expect("utf8 output")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Diagnostic stream that is permanently broken
pub struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}
