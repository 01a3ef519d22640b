#![forbid(unsafe_code)]

//! Outcome event router.
//!
//! Each [`OutcomeKind`] maps to a [`Route`]: which notification profile to
//! show, where the message goes, and whether the event must be re-triggered
//! onto a related panel's "show" control.
//!
//! | verb | placement | related success retriggers |
//! |---|---|---|
//! | Added, Edited, Deleted, Reactivated, PasswordUpdated | title | yes |
//! | Imported, CommentAdded | body | yes |
//!
//! Failures always use the error profile and never retrigger. A related
//! success whose show control is not in the document still shows its notice;
//! the retrigger is silently skipped.

use hxsync_core::dom::{Document, NodeId};
use hxsync_core::key::CorrelationKey;
use hxsync_core::naming::Naming;
use hxsync_core::outcome::{OutcomeEvent, OutcomeKind, OutcomePayload, Polarity, Verb};
use hxsync_widgets::notify::{Notice, NotificationChannel, Placement, Profile};
use serde::Serialize;

/// How one outcome kind is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub profile: Profile,
    pub placement: Placement,
    pub retrigger: bool,
}

/// The routing table.
#[must_use]
pub const fn route_for(kind: OutcomeKind) -> Route {
    let placement = match kind.verb() {
        Verb::Added | Verb::Edited | Verb::Deleted | Verb::Reactivated | Verb::PasswordUpdated => {
            Placement::Title
        }
        Verb::Imported | Verb::CommentAdded => Placement::Body,
    };
    match kind.polarity() {
        Polarity::Success => Route {
            profile: Profile::Success,
            placement,
            retrigger: kind.is_related(),
        },
        Polarity::Fail => Route {
            profile: Profile::Error,
            placement: Placement::Body,
            retrigger: false,
        },
    }
}

/// The three elements of a related-record panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelControls {
    pub show: NodeId,
    pub hide: NodeId,
    /// The panel's collapsible content slot.
    pub body: NodeId,
}

/// `related-show-<key>`, if present.
#[must_use]
pub fn find_show_control(doc: &Document, naming: &Naming, key: &CorrelationKey) -> Option<NodeId> {
    doc.get_element_by_id(&naming.show_control_id(key))
}

/// All three panel elements for `key`, or `None` if any is missing.
#[must_use]
pub fn find_panel_controls(
    doc: &Document,
    naming: &Naming,
    key: &CorrelationKey,
) -> Option<PanelControls> {
    Some(PanelControls {
        show: find_show_control(doc, naming, key)?,
        hide: doc.get_element_by_id(&naming.hide_control_id(key))?,
        body: doc.get_element_by_id(&naming.panel_slot_id(key))?,
    })
}

/// A synthesized event dispatched onto a document element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchedEvent {
    pub target: NodeId,
    pub target_id: String,
    pub name: String,
    pub payload: OutcomePayload,
}

/// What routing one event produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routed {
    pub notice: Option<Notice>,
    pub dispatched: Option<DispatchedEvent>,
}

/// Routes outcome events to notices and panel retriggers.
#[derive(Debug, Clone)]
pub struct OutcomeRouter {
    channel: NotificationChannel,
    naming: Naming,
}

impl OutcomeRouter {
    #[must_use]
    pub fn new(channel: NotificationChannel, naming: Naming) -> Self {
        Self { channel, naming }
    }

    #[must_use]
    pub fn channel(&self) -> &NotificationChannel {
        &self.channel
    }

    /// Route one event. Unknown names route to nothing.
    #[must_use]
    pub fn route(&self, doc: &Document, event: &OutcomeEvent) -> Routed {
        let Some(kind) = event.kind() else {
            tracing::debug!(name = event.name(), "ignoring non-outcome event");
            return Routed::default();
        };
        let route = route_for(kind);
        let payload = event.payload();
        let message = payload.message().unwrap_or_default();
        let notice = match route.profile {
            Profile::Error => self.channel.error(message),
            _ => self.channel.success(message, route.placement),
        };
        tracing::debug!(kind = %kind, profile = ?route.profile, "outcome routed");
        let dispatched = if route.retrigger {
            self.retrigger(doc, kind, payload)
        } else {
            None
        };
        Routed {
            notice: Some(notice),
            dispatched,
        }
    }

    fn retrigger(
        &self,
        doc: &Document,
        kind: OutcomeKind,
        payload: &OutcomePayload,
    ) -> Option<DispatchedEvent> {
        let Some(key) = payload.key() else {
            tracing::debug!(kind = %kind, "related outcome without key");
            return None;
        };
        let name = kind.retrigger_name(key)?;
        let target_id = self.naming.show_control_id(key);
        let Some(target) = doc.get_element_by_id(&target_id) else {
            tracing::debug!(kind = %kind, key = %key, "show control missing, retrigger skipped");
            return None;
        };
        tracing::debug!(target = %target_id, event = %name, key = %key, "retrigger dispatched");
        Some(DispatchedEvent {
            target,
            target_id,
            name,
            payload: payload.clone(),
        })
    }
}
