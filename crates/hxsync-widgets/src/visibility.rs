#![forbid(unsafe_code)]

//! Conditional field visibility.
//!
//! Forms often reveal a dependent field only for one value of another field
//! (an "Other" option, a document type). The dependent field lives in a
//! wrapper element hidden with the `d-none` class; the wrapper holds either a
//! `select` or an `input`, with `select` taking precedence.

use hxsync_core::dom::{Document, NodeId, Selector, SwapError};

/// Class that hides an element.
pub const HIDDEN_CLASS: &str = "d-none";

/// The form control inside a wrapper.
#[must_use]
pub fn field_of(doc: &Document, wrapper: NodeId) -> Option<NodeId> {
    doc.query_first_within(wrapper, &Selector::tag("select"))
        .or_else(|| doc.query_first_within(wrapper, &Selector::tag("input")))
}

/// Set the value of the wrapper's control. Returns `false` when there is none.
pub fn set_field_value(doc: &mut Document, wrapper: NodeId, value: &str) -> Result<bool, SwapError> {
    let Some(field) = field_of(doc, wrapper) else {
        return Ok(false);
    };
    doc.set_value(field, value)?;
    Ok(true)
}

/// Reveal `target` when `source` holds `expected`, otherwise hide it.
///
/// Revealing applies `default` to the target's control when given; hiding
/// always clears it. Returns whether the target is now visible.
pub fn show_when_value(
    doc: &mut Document,
    source: NodeId,
    expected: &str,
    target: NodeId,
    default: Option<&str>,
) -> Result<bool, SwapError> {
    let matches = doc
        .get(source)
        .ok_or(SwapError::Detached(source))?
        .value()
        == expected;
    if matches {
        doc.remove_class(target, HIDDEN_CLASS)?;
        if let Some(default) = default.filter(|d| !d.is_empty()) {
            set_field_value(doc, target, default)?;
        }
    } else {
        doc.add_class(target, HIDDEN_CLASS)?;
        set_field_value(doc, target, "")?;
    }
    Ok(matches)
}
