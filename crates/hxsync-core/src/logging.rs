#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! With the `tracing` feature the tracing macros are re-exported so leaf crates
//! can write `hxsync_core::debug!(...)`. Without it, no-op macros with the same
//! names keep call sites compiling at zero cost.
//!
//! The `tracing-json` feature adds [`init_json_subscriber`], which installs a
//! JSON formatter filtered by `RUST_LOG`-style directives.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op debug_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// No-op error macro when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// No-op error_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! error_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op info_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! info_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op trace_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// No-op warn_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// A no-op span for when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the no-op span (does nothing).
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// A no-op span guard.
#[cfg(not(feature = "tracing"))]
pub struct NoopGuard;

/// Install a global JSON subscriber.
///
/// `filter` uses `EnvFilter` directive syntax (`"hxsync_runtime=debug,info"`).
/// A `RUST_LOG` value in the environment takes precedence. Returns `false` if
/// a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber(filter: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
