//! Property-based invariant tests for registries and input masks.
//!
//! Registries:
//! 1. After a rebuild, each family's elements equal the marker elements.
//! 2. Rebuilding twice with no document change yields the same instance set.
//! 3. After any swap + rebuild, no instance references a detached element
//!    and the provider holds exactly the registries' instances.
//!
//! Masks:
//! 4. Every cell value produced by an input event starts with the prefix.
//! 5. The variable numeric mask keeps at most 17 digits and accepts 8..=17.

use chrono::NaiveDate;
use hxsync_core::config::SyncConfig;
use hxsync_core::dom::{Document, ElementSpec, SwapStyle};
use hxsync_widgets::mask::{InputMasks, MaskKind};
use hxsync_widgets::provider::HeadlessProvider;
use hxsync_widgets::registry::Registries;
use hxsync_widgets::{BuildContext, WidgetFamily};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn element_strategy() -> impl Strategy<Value = ElementSpec> {
    let leaf = prop_oneof![
        Just(ElementSpec::new("span").attr("data-bs-toggle", "tooltip")),
        Just(ElementSpec::new("input").attr("data-date-picker", "true")),
        Just(
            ElementSpec::new("input")
                .attr("data-date-picker", "true")
                .attr("data-set-min-days", "1")
        ),
        Just(ElementSpec::new("input").attr("data-cell-input", "true")),
        Just(ElementSpec::new("input").attr("data-number-input", "true")),
        Just(ElementSpec::new("button").attr("data-confirm", "delete")),
        Just(ElementSpec::new("a").attr("data-confirm", "reactivate")),
        Just(ElementSpec::new("div").attr("data-number-input", "true")),
        Just(ElementSpec::new("p")),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 0..4)
            .prop_map(|children| ElementSpec::new("div").children(children))
    })
}

fn document_strategy() -> impl Strategy<Value = Vec<ElementSpec>> {
    prop::collection::vec(element_strategy(), 0..8)
}

fn ctx(config: &SyncConfig) -> BuildContext<'_> {
    BuildContext {
        config,
        today: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default(),
    }
}

fn assert_membership(doc: &Document, registries: &Registries) -> Result<(), TestCaseError> {
    for family in WidgetFamily::ALL {
        prop_assert_eq!(
            registries.get(family).elements(),
            doc.query_all(&family.marker()),
            "family {}",
            family
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn rebuild_matches_marker_set(fragment in document_strategy()) {
        let config = SyncConfig::default();
        let doc = Document::from_fragment(fragment);
        let mut provider = HeadlessProvider::new();
        let mut registries = Registries::new();
        registries.rebuild_all(&doc, &ctx(&config), &mut provider);
        assert_membership(&doc, &registries)?;
        prop_assert_eq!(provider.live_count(), registries.total());
    }

    #[test]
    fn rebuild_is_idempotent(fragment in document_strategy()) {
        let config = SyncConfig::default();
        let doc = Document::from_fragment(fragment);
        let mut provider = HeadlessProvider::new();
        let mut registries = Registries::new();
        registries.rebuild_all(&doc, &ctx(&config), &mut provider);
        let first: Vec<_> = registries
            .iter()
            .flat_map(|r| r.instances().iter().map(|i| (i.family, i.element, i.options.clone())))
            .collect();
        registries.rebuild_all(&doc, &ctx(&config), &mut provider);
        let second: Vec<_> = registries
            .iter()
            .flat_map(|r| r.instances().iter().map(|i| (i.family, i.element, i.options.clone())))
            .collect();
        prop_assert_eq!(first, second);
        prop_assert_eq!(provider.live_count(), registries.total());
    }

    #[test]
    fn swaps_never_leave_stale_instances(
        initial in document_strategy(),
        replacement in document_strategy(),
        style_pick in 0usize..4,
    ) {
        let config = SyncConfig::default();
        let mut doc = Document::from_fragment([ElementSpec::new("div")
            .id("slot")
            .children(initial)]);
        let mut provider = HeadlessProvider::new();
        let mut registries = Registries::new();
        registries.rebuild_all(&doc, &ctx(&config), &mut provider);

        let style = [
            SwapStyle::InnerHtml,
            SwapStyle::OuterHtml,
            SwapStyle::BeforeEnd,
            SwapStyle::Delete,
        ][style_pick];
        doc.apply_swap("slot", style, &replacement)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        registries.rebuild_all(&doc, &ctx(&config), &mut provider);

        assert_membership(&doc, &registries)?;
        for registry in registries.iter() {
            for node in registry.elements() {
                prop_assert!(doc.is_attached(node));
            }
        }
        prop_assert_eq!(provider.live_count(), registries.total());
    }

    #[test]
    fn cell_values_always_start_with_prefix(raw in ".{0,24}") {
        let masks = InputMasks::default();
        let value = masks.on_input(MaskKind::Cell, &raw);
        prop_assert!(value.starts_with('9'));
        prop_assert!(value.len() <= 9);
        prop_assert!(value.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn number_mask_accepts_eight_to_seventeen_digits(digits in "[0-9]{0,25}") {
        let masks = InputMasks::default();
        let mask = masks.mask(MaskKind::Number);
        let value = masks.on_input(MaskKind::Number, &digits);
        prop_assert_eq!(value.len(), digits.len().min(17));
        prop_assert!(digits.starts_with(&value));
        let in_range = (8..=17).contains(&digits.len());
        prop_assert_eq!(mask.is_complete(&digits), in_range);
        let blurred = masks.on_blur(MaskKind::Number, &value);
        if value.len() >= 8 {
            prop_assert_eq!(blurred, value);
        } else {
            prop_assert!(blurred.is_empty());
        }
    }
}
