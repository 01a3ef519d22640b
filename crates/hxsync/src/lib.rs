#![forbid(unsafe_code)]

//! hxsync public facade crate.
//!
//! Keeps server-driven fragment swaps and client widgets in step: widget
//! registries are rebuilt after every swap, outcome events from the
//! `HX-Trigger` header become notices and child-panel refreshes, and the
//! modal form opens and closes with its content slot.
//!
//! Most embedders only need [`SyncProgram`]: push [`HostEvent`]s, call
//! [`SyncProgram::step`], render the drained [`SyncOutputs`].

// --- Core re-exports -------------------------------------------------------

pub use hxsync_core::clock::HostClock;
pub use hxsync_core::config::{ConfigError, Locale, MaskConfig, NotificationConfig, SyncConfig};
pub use hxsync_core::dom::{Document, Element, ElementSpec, NodeId, Selector, SwapError, SwapStyle};
pub use hxsync_core::event::{ResponseStatus, SwapSignal};
pub use hxsync_core::key::{CorrelationKey, KeyError};
pub use hxsync_core::naming::{Naming, SlotKind};
pub use hxsync_core::outcome::{OutcomeEvent, OutcomeKind, OutcomePayload, Polarity, Verb};
pub use hxsync_core::trigger::{TriggerError, TriggerHeader, decode_trigger_header};

// --- Widget re-exports -----------------------------------------------------

pub use hxsync_widgets::mask::{InputMasks, Mask, MaskError, MaskKind};
pub use hxsync_widgets::notify::{Notice, NoticeBoard, NoticeId, NotificationChannel, Profile};
pub use hxsync_widgets::provider::{
    ConstructRequest, HeadlessProvider, ProviderError, ProviderHandle, WidgetProvider,
};
pub use hxsync_widgets::registry::{Registries, Registry, WidgetInstance};
pub use hxsync_widgets::{WidgetFamily, WidgetOptions};

// --- Runtime re-exports ----------------------------------------------------

pub use hxsync_runtime::{
    CollapseSynchronizer, HandlerFault, ModalEvent, ModalState, OutcomeRouter, PanelState,
    SubmitOutcome, SwapLifecycleController, SyncReport,
};

// --- Web re-exports --------------------------------------------------------

pub use hxsync_web::{HostEvent, StepResult, SyncOutputs, SyncProgram, WebError};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Trigger(#[from] TriggerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Swap(#[from] SwapError),
    #[error(transparent)]
    Mask(#[from] MaskError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Handler(#[from] HandlerFault),
    #[error(transparent)]
    Web(#[from] WebError),
}

/// Standard result type for hxsync APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Install the JSON log subscriber.
///
/// `filter` uses `RUST_LOG` directive syntax and is overridden by the
/// environment. Returns `false` when a subscriber was already installed.
#[cfg(feature = "json-logging")]
pub fn init_logging(filter: &str) -> bool {
    hxsync_core::logging::init_json_subscriber(filter)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CorrelationKey, Document, ElementSpec, Error, HeadlessProvider, HostEvent, NodeId,
        ResponseStatus, Result, SwapStyle, SyncConfig, SyncOutputs, SyncProgram, WidgetProvider,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_convert_into_the_facade_error() {
        let err: Error = SwapError::UnknownTarget("x".to_string()).into();
        assert!(matches!(err, Error::Swap(_)));
        assert_eq!(err.to_string(), SwapError::UnknownTarget("x".to_string()).to_string());

        let err: Error = WebError::HostEvent("unknown variant".to_string()).into();
        assert!(matches!(err, Error::Web(_)));
        assert_eq!(err.to_string(), "host event: unknown variant");
    }

    #[test]
    fn question_mark_lifts_crate_errors() {
        fn parse() -> Result<SyncConfig> {
            Ok(SyncConfig::from_json_str("{not json")?)
        }
        assert!(matches!(parse(), Err(Error::Config(_))));
    }
}
