//! Throw-or-log decisions and diagnostic output of the root policy

mod common;

use common::{BrokenPipe, Recorder, SharedBuf};
use faultline_callback::{
    install_panic_hook, on_recoverable_exception, push_callback, push_context, root_policy,
    run_catching, CallbackRef, Durability, Exception, ExceptionCallback, Nature, RootPolicy,
};
use faultline_common::{Config, THROW_ENABLED};

fn throwing() -> Config {
    Config {
        throw_enabled: true,
        ..Config::default()
    }
}

fn sample() -> Exception {
    Exception::with_trace(
        Nature::OsError,
        Durability::Permanent,
        "x.c",
        10,
        "disk full",
        &[0xabc],
    )
}

#[test]
fn test_log_message_indents_by_depth() {
    let buf = SharedBuf::default();
    let root = RootPolicy::with_writer(Config::default(), buf.clone());

    root.write_log(3, "hello");
    assert_eq!(buf.contents(), "___hello");
}

#[test]
fn test_log_message_depth_zero_is_verbatim() {
    let buf = SharedBuf::default();
    let root = RootPolicy::with_writer(Config::default(), buf.clone());

    root.write_log(0, "plain\nmulti-line\n");
    assert_eq!(buf.contents(), "plain\nmulti-line\n");
}

#[test]
fn test_custom_indent_character() {
    let buf = SharedBuf::default();
    let config = Config {
        indent: '>',
        ..Config::default()
    };
    let root = RootPolicy::with_writer(config, buf.clone());

    root.log_message("f.rs", 1, 2, "x".to_string(), CallbackRef::Root);
    assert_eq!(buf.contents(), ">>x");
}

#[test]
fn test_broken_stream_is_absorbed() {
    let root = RootPolicy::with_writer(Config::default(), BrokenPipe);
    root.write_log(1, "nobody hears this");
}

#[test]
fn test_disabled_throwing_logs_exactly_once() {
    let recorder = Recorder::terminal();
    let _guard = push_callback(recorder.clone());
    let root = RootPolicy::new(Config::default().log_only());

    let exception = sample();
    let expected = format!("{exception}\n");
    let result = run_catching(|| root.handle_recoverable(exception));

    assert!(result.is_ok(), "nothing may be raised");
    let logs = recorder.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].file, "x.c");
    assert_eq!(logs[0].line, 10);
    assert_eq!(logs[0].depth, 0);
    assert_eq!(logs[0].text, expected);
    assert_eq!(recorder.recoverable_count(), 0);
}

#[test]
fn test_disabled_throwing_logs_fatal_too() {
    let recorder = Recorder::terminal();
    let _guard = push_callback(recorder.clone());
    let root = RootPolicy::new(Config::default().log_only());

    let result = run_catching(|| root.handle_fatal(sample()));

    assert!(result.is_ok());
    assert_eq!(recorder.logs().len(), 1);
}

#[test]
fn test_enabled_throwing_raises_recoverable() {
    let recorder = Recorder::terminal();
    let _guard = push_callback(recorder.clone());
    let root = RootPolicy::new(throwing());

    let exception = sample().with_context("y.c", 20, "while flushing");
    let expected = exception.to_string();
    let raised = run_catching(|| root.handle_recoverable(exception)).expect_err("raised");

    assert_eq!(raised.to_string(), expected);
    assert_eq!(raised.nature(), Nature::OsError);
    assert!(recorder.logs().is_empty(), "raised exceptions are not also logged");
}

#[test]
fn test_enabled_throwing_raises_fatal() {
    let root = RootPolicy::new(throwing());
    let raised = run_catching(|| root.handle_fatal(sample())).expect_err("raised");
    assert_eq!(raised.description(), "disk full");
}

struct ReportOnDrop<'a> {
    root: &'a RootPolicy,
}

impl Drop for ReportOnDrop<'_> {
    fn drop(&mut self) {
        self.root
            .handle_recoverable(Exception::bug("cleanup.rs", 5, "failed during cleanup"));
    }
}

#[test]
fn test_recoverable_during_unwind_is_logged() {
    let recorder = Recorder::terminal();
    let _guard = push_callback(recorder.clone());
    let root = RootPolicy::new(throwing());

    let result = run_catching(|| {
        let _cleanup = ReportOnDrop { root: &root };
        panic!("original failure");
    });

    let original = result.expect_err("original panic propagates");
    assert_eq!(original.description(), "original failure");

    let logs = recorder.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].file, "cleanup.rs");
    assert!(logs[0].text.contains("bug in code: failed during cleanup"));
}

#[test]
fn test_logging_reenters_current_callback() {
    let recorder = Recorder::terminal();
    let _guard = push_callback(recorder.clone());
    let _ctx = push_context("outer.rs", 3, "handling request");
    let root = RootPolicy::new(Config::default().log_only());

    root.handle_recoverable(sample());

    let logs = recorder.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].depth, 1, "the installed context saw the log line");
}

#[test]
fn test_logged_exception_bypasses_policy_writer() {
    let recorder = Recorder::terminal();
    let _guard = push_callback(recorder.clone());
    let buf = SharedBuf::default();
    let root = RootPolicy::with_writer(Config::default().log_only(), buf.clone());

    root.handle_recoverable(sample());

    assert_eq!(recorder.logs().len(), 1);
    assert_eq!(buf.contents(), "");
}

#[test]
fn test_installed_policy_writes_logged_exception() {
    let buf = SharedBuf::default();
    let _policy = push_callback(RootPolicy::with_writer(
        Config::default().log_only(),
        buf.clone(),
    ));

    let exception = sample();
    let expected = format!("{exception}\n");
    on_recoverable_exception(exception);

    assert_eq!(buf.contents(), expected);
}

#[test]
fn test_singleton_root_is_shared_and_configured_globally() {
    let a = root_policy() as *const RootPolicy;
    let b = std::thread::spawn(|| root_policy() as *const RootPolicy as usize)
        .join()
        .expect("thread finished");
    assert_eq!(a as usize, b);
    assert_eq!(root_policy().config(), Config::global());
}

#[test]
fn test_unintercepted_dispatch_reaches_root() {
    if !THROW_ENABLED {
        return;
    }
    install_panic_hook();
    install_panic_hook();

    let raised = run_catching(|| on_recoverable_exception(sample())).expect_err("raised by root");
    assert_eq!(raised.file(), "x.c");
}
