#![forbid(unsafe_code)]

//! Modal form state machine and submit guard.
//!
//! The modal is a singleton with two states. Only swaps into the modal's
//! content slot move it: content shows it, a 204 hides it.
//!
//! Whenever modal content arrives a fresh submit guard is bound to the form
//! inside `.modal`. The first submit disables the submit button and swaps its
//! idle indicator for the busy one; further submits are blocked until new
//! content (and so a new guard) arrives.

use hxsync_core::dom::{Document, NodeId, Selector, SwapError};
use hxsync_core::naming::Naming;
use serde::{Deserialize, Serialize};

/// Class that hides an element.
const HIDDEN_CLASS: &str = "d-none";

/// Class carried by the modal element while shown.
const SHOWN_CLASS: &str = "show";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalState {
    #[default]
    Hidden,
    Shown,
}

/// A modal transition, reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalEvent {
    Shown,
    Hidden,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitOutcome {
    /// Let the request go out.
    Proceed,
    /// Drop it; one is already in flight.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubmitGuard {
    form: NodeId,
    button: NodeId,
    fired: bool,
}

/// The singleton modal dialog.
#[derive(Debug, Clone)]
pub struct ModalForm {
    naming: Naming,
    state: ModalState,
    guard: Option<SubmitGuard>,
}

impl ModalForm {
    #[must_use]
    pub fn new(naming: Naming) -> Self {
        Self {
            naming,
            state: ModalState::Hidden,
            guard: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ModalState {
        self.state
    }

    #[must_use]
    pub const fn is_shown(&self) -> bool {
        matches!(self.state, ModalState::Shown)
    }

    /// Whether a submit guard is bound and not yet fired.
    #[must_use]
    pub fn is_guard_armed(&self) -> bool {
        self.guard.is_some_and(|g| !g.fired)
    }

    /// Show the modal. Binds the submit guard and moves focus even when the
    /// modal was already shown, since the content underneath is new.
    pub fn show(&mut self, doc: &mut Document) -> Result<Option<ModalEvent>, SwapError> {
        let transition = (self.state == ModalState::Hidden).then_some(ModalEvent::Shown);
        self.state = ModalState::Shown;
        if let Some(modal) = doc.get_element_by_id(&self.naming.modal_id) {
            doc.add_class(modal, SHOWN_CLASS)?;
        }
        if transition.is_some() {
            tracing::info!(modal = %self.naming.modal_id, "modal shown");
        }
        self.on_shown(doc)?;
        Ok(transition)
    }

    /// Hide the modal and drop its guard.
    pub fn hide(&mut self, doc: &mut Document) -> Result<Option<ModalEvent>, SwapError> {
        if self.state == ModalState::Hidden {
            return Ok(None);
        }
        self.state = ModalState::Hidden;
        self.guard = None;
        if let Some(modal) = doc.get_element_by_id(&self.naming.modal_id) {
            doc.remove_class(modal, SHOWN_CLASS)?;
        }
        tracing::info!(modal = %self.naming.modal_id, "modal hidden");
        Ok(Some(ModalEvent::Hidden))
    }

    /// Bind the submit guard and focus the primary input.
    fn on_shown(&mut self, doc: &mut Document) -> Result<(), SwapError> {
        let button = doc.get_element_by_id(&self.naming.submit_id);
        let form = modal_form(doc);
        self.guard = match (form, button) {
            (Some(form), Some(button)) => Some(SubmitGuard {
                form,
                button,
                fired: false,
            }),
            _ => None,
        };
        if let Some(focus) = doc.get_element_by_id(&self.naming.focus_id) {
            let inside = doc
                .get_element_by_id(&self.naming.modal_id)
                .is_some_and(|modal| doc.is_within(focus, modal));
            if inside {
                doc.focus(focus)?;
            }
        }
        Ok(())
    }

    /// A form was submitted.
    pub fn on_submit(&mut self, doc: &mut Document, form: NodeId) -> Result<SubmitOutcome, SwapError> {
        let Some(guard) = self.guard.as_mut().filter(|g| g.form == form) else {
            return Ok(SubmitOutcome::Proceed);
        };
        if guard.fired || !doc.is_attached(guard.button) {
            return Ok(SubmitOutcome::Blocked);
        }
        guard.fired = true;
        let button = guard.button;
        doc.set_disabled(button, true)?;
        if let Some(busy) = doc.query_first_within(button, &Selector::class(&self.naming.busy_class)) {
            doc.remove_class(busy, HIDDEN_CLASS)?;
        }
        if let Some(idle) = doc.query_first_within(button, &Selector::class(&self.naming.idle_class)) {
            doc.add_class(idle, HIDDEN_CLASS)?;
        }
        tracing::debug!(form = form.index(), "modal submit guarded");
        Ok(SubmitOutcome::Proceed)
    }
}

/// First `form` nested in a `.modal` element.
fn modal_form(doc: &Document) -> Option<NodeId> {
    doc.query_all(&Selector::class("modal"))
        .into_iter()
        .find_map(|modal| doc.query_first_within(modal, &Selector::tag("form")))
}
