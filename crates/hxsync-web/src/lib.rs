#![forbid(unsafe_code)]

//! `hxsync-web` drives the synchronizer from a browser host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS) pushes lifecycle
//!   signals, trigger headers, and user input as [`HostEvent`] values.
//! - **Deterministic time**: the host advances a monotonic clock and sets the
//!   calendar date explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The crate does not bind to `wasm-bindgen`; a thin JS shim forwards DOM
//! events and renders [`SyncOutputs`].

pub mod step_program;

use core::time::Duration;

use chrono::NaiveDate;
use hxsync_core::config::ConfigError;
use hxsync_core::dom::{ElementSpec, NodeId, SwapError, SwapStyle};
use hxsync_core::event::{ResponseStatus, SwapSignal};
use hxsync_core::key::CorrelationKey;
use hxsync_core::trigger::TriggerError;
use hxsync_runtime::{DispatchedEvent, HandlerFault, ModalEvent, SubmitOutcome};
use hxsync_widgets::affordance::{ConfirmKind, RequestTarget};
use hxsync_widgets::mask::MaskError;
use hxsync_widgets::notify::{Notice, NoticeId};
use serde::{Deserialize, Serialize};

pub use step_program::{StepResult, SyncProgram};

/// Web host error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mask(#[from] MaskError),
    #[error(transparent)]
    Swap(#[from] SwapError),
    #[error(transparent)]
    Trigger(#[from] TriggerError),
    /// A host event payload did not parse.
    #[error("host event: {0}")]
    HostEvent(String),
}

const fn ok_status() -> ResponseStatus {
    ResponseStatus::OK
}

/// Everything the host can push into a [`SyncProgram`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The initial document finished loading.
    Loaded,
    /// A complete partial update. Expanded into trigger routing, before-swap,
    /// the swap itself, after-swap, and after-settle.
    Update {
        target: String,
        #[serde(default = "ok_status")]
        status: ResponseStatus,
        #[serde(default)]
        style: SwapStyle,
        #[serde(default)]
        fragment: Vec<ElementSpec>,
        #[serde(default)]
        trigger: Option<String>,
    },
    /// One lifecycle signal, for hosts that forward them individually.
    Signal(SwapSignal),
    /// Apply a swap to the mirror without any signal.
    Swap {
        target: String,
        #[serde(default)]
        style: SwapStyle,
        #[serde(default)]
        fragment: Vec<ElementSpec>,
    },
    /// An `HX-Trigger` header value.
    Trigger { header: String },
    Input { node: NodeId, value: String },
    Blur { node: NodeId },
    Click { node: NodeId },
    Submit { form: NodeId },
    /// The user answered a confirmation notice.
    ConfirmResolved { id: NoticeId, accepted: bool },
    /// The user closed a notice.
    DismissNotice { id: NoticeId },
    /// Show `target` only while `source` holds `expected`; a hidden target
    /// has its value cleared, a shown one is seeded with `default`.
    ShowWhen {
        source: NodeId,
        expected: String,
        target: NodeId,
        #[serde(default)]
        default: Option<String>,
    },
    /// Advance the host clock.
    Tick { dt: Duration },
    /// Change the calendar date.
    SetToday { today: NaiveDate },
}

impl HostEvent {
    /// Short label used in logs and fault records.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Update { .. } => "update",
            Self::Signal(_) => "signal",
            Self::Swap { .. } => "swap",
            Self::Trigger { .. } => "trigger",
            Self::Input { .. } => "input",
            Self::Blur { .. } => "blur",
            Self::Click { .. } => "click",
            Self::Submit { .. } => "submit",
            Self::ConfirmResolved { .. } => "confirm-resolved",
            Self::DismissNotice { .. } => "dismiss-notice",
            Self::ShowWhen { .. } => "show-when",
            Self::Tick { .. } => "tick",
            Self::SetToday { .. } => "set-today",
        }
    }
}

/// A confirmed destructive action, handed back to the host to issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedAction {
    pub kind: ConfirmKind,
    pub element: NodeId,
    pub request: Option<RequestTarget>,
}

/// A notice put on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShownNoticeOutput {
    pub id: NoticeId,
    pub notice: Notice,
    /// Notice that was on screen and got replaced.
    pub replaced: Option<NoticeId>,
}

/// Captured outputs, drained by the host after each step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutputs {
    pub notices: Vec<ShownNoticeOutput>,
    pub dismissed: Vec<NoticeId>,
    pub dispatched: Vec<DispatchedEvent>,
    pub confirmed: Vec<ConfirmedAction>,
    pub modal_events: Vec<ModalEvent>,
    pub submits: Vec<(NodeId, SubmitOutcome)>,
    /// Values rewritten by input masks.
    pub values: Vec<(NodeId, String)>,
    pub expanded: Vec<CorrelationKey>,
    pub collapsed: Vec<CorrelationKey>,
    /// Conditional fields and whether they are now shown.
    pub visibility: Vec<(NodeId, bool)>,
    pub faults: Vec<HandlerFault>,
}

impl SyncOutputs {
    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
