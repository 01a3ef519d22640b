#![forbid(unsafe_code)]

//! Handler isolation.
//!
//! Every reaction to a lifecycle signal or outcome event runs inside
//! [`run_isolated`]. An `Err` return or a panic becomes a [`HandlerFault`]
//! record and the caller moves on to the next handler, so one broken widget
//! family can never keep the modal from opening or a panel from expanding.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};

/// How a handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultKind {
    Error,
    Panic,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("failed"),
            Self::Panic => f.write_str("panicked"),
        }
    }
}

/// A captured handler failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("handler `{handler}` {kind}: {message}")]
pub struct HandlerFault {
    pub handler: String,
    pub kind: FaultKind,
    pub message: String,
}

impl HandlerFault {
    /// Fault from an error value.
    #[must_use]
    pub fn from_error(handler: &str, err: &dyn fmt::Display) -> Self {
        Self {
            handler: handler.to_string(),
            kind: FaultKind::Error,
            message: err.to_string(),
        }
    }

    fn from_panic(handler: &str, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self {
            handler: handler.to_string(),
            kind: FaultKind::Panic,
            message,
        }
    }
}

/// Run `f`, converting errors and panics into a [`HandlerFault`].
pub fn run_isolated<T, E, F>(handler: &str, f: F) -> Result<T, HandlerFault>
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    let fault = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(err)) => HandlerFault::from_error(handler, &err),
        Err(payload) => HandlerFault::from_panic(handler, payload),
    };
    tracing::warn!(
        handler = %fault.handler,
        kind = %fault.kind,
        message = %fault.message,
        "handler fault isolated"
    );
    Err(fault)
}

/// Accumulates faults from a sequence of isolated handlers.
#[derive(Debug, Default)]
pub struct FaultLog {
    faults: Vec<HandlerFault>,
}

impl FaultLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one handler, keeping its value or recording its fault.
    pub fn run<T, E, F>(&mut self, handler: &str, f: F) -> Option<T>
    where
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        match run_isolated(handler, f) {
            Ok(value) => Some(value),
            Err(fault) => {
                self.faults.push(fault);
                None
            }
        }
    }

    pub fn push(&mut self, fault: HandlerFault) {
        self.faults.push(fault);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    #[must_use]
    pub fn into_faults(self) -> Vec<HandlerFault> {
        self.faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_passes_through() {
        assert_eq!(run_isolated("ok", || Ok::<_, String>(3)), Ok(3));
    }

    #[test]
    fn err_becomes_fault() {
        let fault = run_isolated("broken", || Err::<(), _>("nope")).unwrap_err();
        assert_eq!(fault.kind, FaultKind::Error);
        assert_eq!(fault.message, "nope");
        assert_eq!(fault.to_string(), "handler `broken` failed: nope");
    }

    #[test]
    fn panic_becomes_fault() {
        let fault = run_isolated("boom", || -> Result<(), String> { panic!("kaboom") }).unwrap_err();
        assert_eq!(fault.kind, FaultKind::Panic);
        assert_eq!(fault.message, "kaboom");
    }

    #[test]
    fn siblings_run_after_a_fault() {
        let mut log = FaultLog::new();
        let mut ran = Vec::new();
        log.run("first", || -> Result<(), String> { panic!("first") });
        log.run("second", || {
            ran.push("second");
            Ok::<_, String>(())
        });
        assert_eq!(ran, ["second"]);
        assert_eq!(log.into_faults().len(), 1);
    }
}
