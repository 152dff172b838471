//! Macros for reporting with automatic file/line capture

/// Build an [`Exception`](crate::Exception) at the call site.
///
/// `exception!(OsError, "disk {} full", name)` is permanent;
/// `exception!(NetworkFailure, Temporary, "reset")` picks the durability.
#[macro_export]
macro_rules! exception {
    ($nature:ident, $durability:ident, $($arg:tt)+) => {
        $crate::Exception::new(
            $crate::Nature::$nature,
            $crate::Durability::$durability,
            file!(),
            line!(),
            format!($($arg)+),
        )
    };
    ($nature:ident, $($arg:tt)+) => {
        $crate::exception!($nature, Permanent, $($arg)+)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __report_unmet {
    ($nature:ident, $cond:expr) => {
        if !$cond {
            $crate::on_recoverable_exception($crate::Exception::new(
                $crate::Nature::$nature,
                $crate::Durability::Permanent,
                file!(),
                line!(),
                concat!("expected ", stringify!($cond)),
            ));
        }
    };
    ($nature:ident, $cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::on_recoverable_exception($crate::Exception::new(
                $crate::Nature::$nature,
                $crate::Durability::Permanent,
                file!(),
                line!(),
                format!("expected {}; {}", stringify!($cond), format_args!($($arg)+)),
            ));
        }
    };
}

/// Report a recoverable precondition violation unless `cond` holds.
///
/// Execution continues after the macro when the exception was logged instead of raised.
#[macro_export]
macro_rules! require {
    ($cond:expr $(,)?) => {
        $crate::__report_unmet!(PreconditionViolation, $cond)
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::__report_unmet!(PreconditionViolation, $cond, $($arg)+)
    };
}

/// Report a recoverable internal bug unless `cond` holds.
#[macro_export]
macro_rules! invariant {
    ($cond:expr $(,)?) => {
        $crate::__report_unmet!(InternalBug, $cond)
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::__report_unmet!(InternalBug, $cond, $($arg)+)
    };
}

/// Report a fatal exception of the given nature.
#[macro_export]
macro_rules! fatal {
    ($nature:ident, $($arg:tt)+) => {
        $crate::on_fatal_exception($crate::exception!($nature, $($arg)+))
    };
}

/// Send a formatted diagnostic line through the current callback.
#[macro_export]
macro_rules! log_message {
    ($($arg:tt)+) => {
        $crate::log_message(
            file!(),
            line!(),
            0,
            format!("{}\n", format_args!($($arg)+)),
        )
    };
}

/// Attach a context frame to everything reported until the returned guard drops.
///
/// Bind the guard to a named variable: `let _ctx = context!("loading {}", path);`
#[macro_export]
macro_rules! context {
    ($($arg:tt)+) => {
        $crate::push_context(file!(), line!(), format!($($arg)+))
    };
}
