#![forbid(unsafe_code)]

//! Destructive-action affordances.
//!
//! Buttons and links that delete or reactivate a record carry
//! `data-confirm="delete"` or `data-confirm="reactivate"`. Clicking one never
//! fires the request directly: it opens a confirmation notice, and only a
//! positive answer hands the request target back to the caller.

use hxsync_core::dom::Element;
use serde::{Deserialize, Serialize};

/// Marker attribute of both affordance families.
pub const CONFIRM_ATTR: &str = "data-confirm";

/// Attribute consulted when no `hx-*` verb is present.
const URL_ATTR: &str = "data-url";

/// `hx-*` request attributes, in lookup order.
const HX_VERBS: [(&str, &str); 5] = [
    ("hx-delete", "DELETE"),
    ("hx-post", "POST"),
    ("hx-put", "PUT"),
    ("hx-patch", "PATCH"),
    ("hx-get", "GET"),
];

/// What a confirmation is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmKind {
    Delete,
    Reactivate,
}

impl ConfirmKind {
    /// Value of [`CONFIRM_ATTR`] for this kind.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Reactivate => "reactivate",
        }
    }

    const fn default_method(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Reactivate => "POST",
        }
    }
}

/// Request issued once the user confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTarget {
    pub method: String,
    pub url: String,
}

/// Options read from an affordance element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffordanceOptions {
    pub kind: ConfirmKind,
    /// `None` when the element names no request; confirming is then a no-op
    /// for the caller.
    pub request: Option<RequestTarget>,
    /// Text describing the record, from `data-confirm-text`.
    pub subject: Option<String>,
}

impl AffordanceOptions {
    #[must_use]
    pub fn for_element(element: &Element, kind: ConfirmKind) -> Self {
        let hx = HX_VERBS.iter().find_map(|(attr, method)| {
            element
                .attr(attr)
                .filter(|url| !url.is_empty())
                .map(|url| RequestTarget {
                    method: (*method).to_string(),
                    url: url.to_string(),
                })
        });
        let request = hx.or_else(|| {
            element
                .attr(URL_ATTR)
                .filter(|url| !url.is_empty())
                .map(|url| RequestTarget {
                    method: kind.default_method().to_string(),
                    url: url.to_string(),
                })
        });
        Self {
            kind,
            request,
            subject: element
                .attr("data-confirm-text")
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hxsync_core::dom::{Document, ElementSpec};

    fn options_of(spec: ElementSpec, kind: ConfirmKind) -> AffordanceOptions {
        let doc = Document::from_fragment([spec.id("a")]);
        let node = doc.get_element_by_id("a").unwrap();
        AffordanceOptions::for_element(doc.get(node).unwrap(), kind)
    }

    #[test]
    fn hx_attribute_wins_over_data_url() {
        let opts = options_of(
            ElementSpec::new("button")
                .attr("hx-delete", "/users/7/")
                .attr("data-url", "/ignored/"),
            ConfirmKind::Delete,
        );
        assert_eq!(
            opts.request,
            Some(RequestTarget {
                method: "DELETE".to_string(),
                url: "/users/7/".to_string()
            })
        );
    }

    #[test]
    fn data_url_method_depends_on_kind() {
        let spec = ElementSpec::new("a").attr("data-url", "/users/7/reactivate/");
        let opts = options_of(spec, ConfirmKind::Reactivate);
        assert_eq!(opts.request.map(|r| r.method).as_deref(), Some("POST"));
    }

    #[test]
    fn no_request_when_unannotated() {
        let opts = options_of(
            ElementSpec::new("button").attr("data-confirm-text", "Provincia Lima"),
            ConfirmKind::Delete,
        );
        assert_eq!(opts.request, None);
        assert_eq!(opts.subject.as_deref(), Some("Provincia Lima"));
    }
}
