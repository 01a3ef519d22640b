#![forbid(unsafe_code)]

//! hxsync Runtime
//!
//! The reactive half of the synchronizer: everything that runs in response to
//! a partial update's lifecycle signals and outcome events.
//!
//! # Key Components
//!
//! - [`SwapLifecycleController`] - rebuilds registries after every swap and
//!   drives the modal
//! - [`ModalForm`] - two-state modal with a one-shot submit guard
//! - [`OutcomeRouter`] - outcome events to notices and panel retriggers
//! - [`CollapseSynchronizer`] - expands related panels on settle and binds
//!   their hide handlers
//! - [`run_isolated`] - per-handler fault isolation
//!
//! # How it fits in the system
//! `hxsync-core` supplies the document mirror and vocabulary, and
//! `hxsync-widgets` the registries and notices. This crate decides when each
//! of them runs. `hxsync-web` feeds it host events in order.

pub mod collapse;
pub mod isolate;
pub mod lifecycle;
pub mod modal;
pub mod router;

pub use collapse::{CollapseSynchronizer, PanelState, panel_state};
pub use isolate::{FaultKind, FaultLog, HandlerFault, run_isolated};
pub use lifecycle::{SwapLifecycleController, SyncReport};
pub use modal::{ModalEvent, ModalForm, ModalState, SubmitOutcome};
pub use router::{
    DispatchedEvent, OutcomeRouter, PanelControls, Route, Routed, find_panel_controls,
    find_show_control, route_for,
};
