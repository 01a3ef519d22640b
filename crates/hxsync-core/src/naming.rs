#![forbid(unsafe_code)]

//! Element naming conventions shared with the server-rendered markup.
//!
//! Slots and controls are found purely by id. [`Naming`] holds the fixed ids
//! and the prefixes that embed a [`CorrelationKey`]; [`Naming::classify`]
//! turns a swap target id into a [`SlotKind`].

use serde::{Deserialize, Serialize};

use crate::key::CorrelationKey;

/// Id conventions for the modal form and related-record panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Naming {
    /// Id of the modal dialog element itself.
    pub modal_id: String,
    /// Id of the slot that receives modal form content.
    pub modal_slot: String,
    /// Prefix of a child panel's content slot (`collapse-related-<key>`).
    pub panel_slot_prefix: String,
    /// Prefix of a panel's "show" control (`related-show-<key>`).
    pub show_prefix: String,
    /// Prefix of a panel's "hide" control (`related-hide-<key>`).
    pub hide_prefix: String,
    /// Id of the modal submit button.
    pub submit_id: String,
    /// Class of the busy indicator nested in the submit button.
    pub busy_class: String,
    /// Class of the idle indicator nested in the submit button.
    pub idle_class: String,
    /// Id of the input that receives focus when the modal opens.
    pub focus_id: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            modal_id: "modal-form".to_string(),
            modal_slot: "modal-form-dialog".to_string(),
            panel_slot_prefix: "collapse-related-".to_string(),
            show_prefix: "related-show-".to_string(),
            hide_prefix: "related-hide-".to_string(),
            submit_id: "btn-modal-enviar".to_string(),
            busy_class: "sent".to_string(),
            idle_class: "unsent".to_string(),
            focus_id: "id_name".to_string(),
        }
    }
}

/// What a swap target id refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKind {
    /// The modal form's content slot.
    ModalContent,
    /// A child panel's content slot, with the key parsed from the id.
    RelatedPanel(CorrelationKey),
    /// Any other fragment.
    Other,
}

impl Naming {
    /// Classify a swap target id.
    ///
    /// A panel-prefixed id whose suffix is not a valid key is `Other`: it
    /// violates the convention and no rule applies to it.
    #[must_use]
    pub fn classify(&self, slot_id: &str) -> SlotKind {
        if slot_id == self.modal_slot {
            return SlotKind::ModalContent;
        }
        match slot_id
            .strip_prefix(self.panel_slot_prefix.as_str())
            .map(CorrelationKey::parse)
        {
            Some(Ok(key)) => SlotKind::RelatedPanel(key),
            _ => SlotKind::Other,
        }
    }

    /// `collapse-related-<key>`
    #[must_use]
    pub fn panel_slot_id(&self, key: &CorrelationKey) -> String {
        format!("{}{}", self.panel_slot_prefix, key)
    }

    /// `related-show-<key>`
    #[must_use]
    pub fn show_control_id(&self, key: &CorrelationKey) -> String {
        format!("{}{}", self.show_prefix, key)
    }

    /// `related-hide-<key>`
    #[must_use]
    pub fn hide_control_id(&self, key: &CorrelationKey) -> String {
        format!("{}{}", self.hide_prefix, key)
    }

    /// Ids that must be non-empty for the conventions to be usable.
    pub(crate) fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("modal_id", &self.modal_id),
            ("modal_slot", &self.modal_slot),
            ("panel_slot_prefix", &self.panel_slot_prefix),
            ("show_prefix", &self.show_prefix),
            ("hide_prefix", &self.hide_prefix),
            ("submit_id", &self.submit_id),
            ("busy_class", &self.busy_class),
            ("idle_class", &self.idle_class),
            ("focus_id", &self.focus_id),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_modal_slot() {
        let naming = Naming::default();
        assert_eq!(naming.classify("modal-form-dialog"), SlotKind::ModalContent);
    }

    #[test]
    fn classifies_panel_slot_with_key() {
        let naming = Naming::default();
        assert_eq!(
            naming.classify("collapse-related-42"),
            SlotKind::RelatedPanel(CorrelationKey::from(42u64))
        );
    }

    #[test]
    fn malformed_panel_slot_is_other() {
        let naming = Naming::default();
        assert_eq!(naming.classify("collapse-related-"), SlotKind::Other);
        assert_eq!(naming.classify("collapse-related-a b"), SlotKind::Other);
        assert_eq!(naming.classify("search-results"), SlotKind::Other);
    }

    #[test]
    fn control_ids_embed_key() {
        let naming = Naming::default();
        let key = CorrelationKey::from(7u64);
        assert_eq!(naming.show_control_id(&key), "related-show-7");
        assert_eq!(naming.hide_control_id(&key), "related-hide-7");
        assert_eq!(naming.panel_slot_id(&key), "collapse-related-7");
    }
}
