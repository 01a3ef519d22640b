#![forbid(unsafe_code)]

//! Core: document mirror, swap lifecycle signals, correlation keys, and the
//! outcome event vocabulary shared by every hxsync crate.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod dom;
pub mod event;
pub mod key;
pub mod logging;
pub mod naming;
pub mod outcome;
pub mod trigger;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
