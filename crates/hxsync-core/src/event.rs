#![forbid(unsafe_code)]

//! Swap lifecycle signals.
//!
//! The partial-update mechanism fires three signals per update, always in the
//! order [`SwapPhase::BeforeSwap`] → [`SwapPhase::AfterSwap`] →
//! [`SwapPhase::AfterSettle`]. Only the before-swap signal carries the
//! response status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP status of the response driving a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseStatus(pub u16);

impl ResponseStatus {
    /// `200 OK`
    pub const OK: Self = Self(200);
    /// `204 No Content`, the explicit empty-result status.
    pub const NO_CONTENT: Self = Self(204);

    /// Whether the response explicitly reports no content.
    #[must_use]
    pub const fn is_no_content(self) -> bool {
        self.0 == 204
    }

    /// Whether the partial-update mechanism swaps this response into the
    /// document. Only non-204 2xx responses are swapped.
    #[must_use]
    pub const fn is_swappable(self) -> bool {
        self.0 >= 200 && self.0 < 300 && self.0 != 204
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of a single update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapPhase {
    BeforeSwap,
    AfterSwap,
    AfterSettle,
}

/// A lifecycle signal with its target slot id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "kebab-case")]
pub enum SwapSignal {
    BeforeSwap { target: String, status: ResponseStatus },
    AfterSwap { target: String },
    AfterSettle { target: String },
}

impl SwapSignal {
    /// The phase this signal belongs to.
    #[must_use]
    pub const fn phase(&self) -> SwapPhase {
        match self {
            Self::BeforeSwap { .. } => SwapPhase::BeforeSwap,
            Self::AfterSwap { .. } => SwapPhase::AfterSwap,
            Self::AfterSettle { .. } => SwapPhase::AfterSettle,
        }
    }

    /// Id of the slot the update targets.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::BeforeSwap { target, .. }
            | Self::AfterSwap { target }
            | Self::AfterSettle { target } => target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_204_is_no_content() {
        assert!(ResponseStatus::NO_CONTENT.is_no_content());
        assert!(!ResponseStatus::OK.is_no_content());
        assert!(!ResponseStatus(404).is_no_content());
    }

    #[test]
    fn swappable_excludes_204_and_errors() {
        assert!(ResponseStatus::OK.is_swappable());
        assert!(!ResponseStatus::NO_CONTENT.is_swappable());
        assert!(!ResponseStatus(500).is_swappable());
    }

    #[test]
    fn phases_are_ordered() {
        assert!(SwapPhase::BeforeSwap < SwapPhase::AfterSwap);
        assert!(SwapPhase::AfterSwap < SwapPhase::AfterSettle);
    }

    #[test]
    fn signal_serializes_with_phase_tag() {
        let signal = SwapSignal::BeforeSwap {
            target: "modal-form-dialog".to_string(),
            status: ResponseStatus::NO_CONTENT,
        };
        let json = serde_json::to_string(&signal).unwrap();
        assert_eq!(
            json,
            r#"{"phase":"before-swap","target":"modal-form-dialog","status":204}"#
        );
        assert_eq!(signal.phase(), SwapPhase::BeforeSwap);
        assert_eq!(signal.target(), "modal-form-dialog");
    }
}
