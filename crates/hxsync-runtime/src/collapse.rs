#![forbid(unsafe_code)]

//! Related-panel collapse synchronizer.
//!
//! A related-record panel has a "show" control, a "hide" control, and a
//! collapsible body that doubles as the panel's content slot. When content
//! settles into `collapse-related-<key>` the panel is expanded: the body gets
//! `show`, the show control is hidden, and the hide control revealed. A
//! one-shot hide handler is bound for the key; clicking the hide control
//! reverses all three effects and unbinds it.
//!
//! Exactly one of the two controls is visible outside of a transition.

use std::collections::HashMap;

use hxsync_core::dom::{Document, NodeId, SwapError};
use hxsync_core::key::CorrelationKey;
use hxsync_core::naming::{Naming, SlotKind};
use serde::{Deserialize, Serialize};

use crate::router::{PanelControls, find_panel_controls};

const HIDDEN_CLASS: &str = "d-none";
const EXPANDED_CLASS: &str = "show";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HideBinding {
    controls: PanelControls,
    generation: u64,
}

/// Tracks the hide handler bound for each expanded panel.
#[derive(Debug, Clone)]
pub struct CollapseSynchronizer {
    naming: Naming,
    bindings: HashMap<CorrelationKey, HideBinding>,
    generation: u64,
}

impl CollapseSynchronizer {
    #[must_use]
    pub fn new(naming: Naming) -> Self {
        Self {
            naming,
            bindings: HashMap::new(),
            generation: 0,
        }
    }

    /// React to content settling into `target_id`.
    ///
    /// Returns the key of the panel that was expanded, or `None` when the slot
    /// is not a panel or its controls are missing.
    pub fn on_settle(
        &mut self,
        doc: &mut Document,
        target_id: &str,
    ) -> Result<Option<CorrelationKey>, SwapError> {
        let SlotKind::RelatedPanel(key) = self.naming.classify(target_id) else {
            return Ok(None);
        };
        let Some(controls) = find_panel_controls(doc, &self.naming, &key) else {
            tracing::debug!(key = %key, "panel controls missing, nothing to expand");
            return Ok(None);
        };
        apply(doc, controls, PanelState::Expanded)?;
        self.generation += 1;
        let replaced = self
            .bindings
            .insert(
                key.clone(),
                HideBinding {
                    controls,
                    generation: self.generation,
                },
            )
            .is_some();
        tracing::debug!(key = %key, replaced, "panel expanded, hide handler bound");
        Ok(Some(key))
    }

    /// React to a click on `node`. Fires the hide handler whose control
    /// contains `node`, if any, and returns its key.
    pub fn on_click(
        &mut self,
        doc: &mut Document,
        node: NodeId,
    ) -> Result<Option<CorrelationKey>, SwapError> {
        let Some(key) = self
            .bindings
            .iter()
            .filter(|(_, b)| doc.is_within(node, b.controls.hide))
            .max_by_key(|(_, b)| b.generation)
            .map(|(key, _)| key.clone())
        else {
            return Ok(None);
        };
        let Some(binding) = self.bindings.remove(&key) else {
            return Ok(None);
        };
        apply(doc, binding.controls, PanelState::Collapsed)?;
        tracing::debug!(key = %key, "panel collapsed, hide handler released");
        Ok(Some(key))
    }

    /// Whether a hide handler is bound for `key`.
    #[must_use]
    pub fn is_bound(&self, key: &CorrelationKey) -> bool {
        self.bindings.contains_key(key)
    }

    /// Number of bound handlers.
    #[must_use]
    pub fn bound(&self) -> usize {
        self.bindings.len()
    }

    /// Drop handlers whose controls left the document.
    pub fn prune(&mut self, doc: &Document) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|_, b| {
            doc.is_attached(b.controls.show)
                && doc.is_attached(b.controls.hide)
                && doc.is_attached(b.controls.body)
        });
        before - self.bindings.len()
    }
}

/// Observed state of the panel for `key`.
#[must_use]
pub fn panel_state(doc: &Document, naming: &Naming, key: &CorrelationKey) -> Option<PanelState> {
    let controls = find_panel_controls(doc, naming, key)?;
    let body = doc.get(controls.body)?;
    Some(if body.has_class(EXPANDED_CLASS) {
        PanelState::Expanded
    } else {
        PanelState::Collapsed
    })
}

fn apply(doc: &mut Document, controls: PanelControls, state: PanelState) -> Result<(), SwapError> {
    let expanded = state == PanelState::Expanded;
    doc.toggle_class(controls.body, EXPANDED_CLASS, expanded)?;
    doc.toggle_class(controls.show, HIDDEN_CLASS, expanded)?;
    doc.toggle_class(controls.hide, HIDDEN_CLASS, !expanded)?;
    let aria = if expanded { "true" } else { "false" };
    doc.set_attr(controls.show, "aria-expanded", aria)?;
    doc.set_attr(controls.hide, "aria-expanded", aria)?;
    Ok(())
}
