#![forbid(unsafe_code)]

//! Tooltip construction options.

use hxsync_core::dom::Element;

/// Default placement when the markup does not specify one.
const DEFAULT_PLACEMENT: &str = "top";

/// Options read from a tooltip element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipOptions {
    /// Text shown on hover (`data-bs-title`, falling back to `title`).
    pub title: Option<String>,
    /// `data-bs-placement`, default `top`.
    pub placement: String,
}

impl TooltipOptions {
    #[must_use]
    pub fn for_element(element: &Element) -> Self {
        let title = element
            .attr("data-bs-title")
            .or_else(|| element.attr("title"))
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self {
            title,
            placement: element
                .attr("data-bs-placement")
                .unwrap_or(DEFAULT_PLACEMENT)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hxsync_core::dom::{Document, ElementSpec};

    fn options_of(spec: ElementSpec) -> TooltipOptions {
        let doc = Document::from_fragment([spec.id("t")]);
        let node = doc.get_element_by_id("t").unwrap();
        TooltipOptions::for_element(doc.get(node).unwrap())
    }

    #[test]
    fn bs_title_wins_over_title() {
        let opts = options_of(
            ElementSpec::new("span")
                .attr("title", "plain")
                .attr("data-bs-title", "rich"),
        );
        assert_eq!(opts.title.as_deref(), Some("rich"));
        assert_eq!(opts.placement, "top");
    }

    #[test]
    fn empty_title_is_none() {
        let opts = options_of(
            ElementSpec::new("span")
                .attr("title", "")
                .attr("data-bs-placement", "left"),
        );
        assert_eq!(opts.title, None);
        assert_eq!(opts.placement, "left");
    }
}
