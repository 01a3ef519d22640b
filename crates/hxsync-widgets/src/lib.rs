#![forbid(unsafe_code)]

//! Widget families, registries, and the notification channel.
//!
//! A widget family is identified by a marker attribute in the server-rendered
//! markup. Each family has one [`registry::Registry`] that owns the live
//! instances for the current document, built through an external
//! [`provider::WidgetProvider`].

pub mod affordance;
pub mod date_picker;
pub mod mask;
pub mod notify;
pub mod provider;
pub mod registry;
pub mod tooltip;
pub mod visibility;

use std::fmt;

use chrono::NaiveDate;
use hxsync_core::config::SyncConfig;
use hxsync_core::dom::{Element, Selector};
use serde::{Deserialize, Serialize};

use crate::affordance::{AffordanceOptions, ConfirmKind};
use crate::date_picker::DatePickerOptions;
use crate::mask::MaskKind;
use crate::tooltip::TooltipOptions;

/// A family of widgets managed through one marker attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetFamily {
    /// `[data-bs-toggle="tooltip"]`
    Tooltip,
    /// `input[data-date-picker="true"]`
    DatePicker,
    /// `input[data-cell-input="true"]`
    CellInput,
    /// `input[data-number-input="true"]`
    NumberInput,
    /// `[data-confirm="delete"]`
    DeleteAffordance,
    /// `[data-confirm="reactivate"]`
    ReactivateAffordance,
}

impl WidgetFamily {
    /// Every family, in rebuild order.
    pub const ALL: [WidgetFamily; 6] = [
        WidgetFamily::Tooltip,
        WidgetFamily::DatePicker,
        WidgetFamily::CellInput,
        WidgetFamily::NumberInput,
        WidgetFamily::DeleteAffordance,
        WidgetFamily::ReactivateAffordance,
    ];

    /// Short name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tooltip => "tooltip",
            Self::DatePicker => "date-picker",
            Self::CellInput => "cell-input",
            Self::NumberInput => "number-input",
            Self::DeleteAffordance => "delete-affordance",
            Self::ReactivateAffordance => "reactivate-affordance",
        }
    }

    /// Selector for the family's marker attribute.
    #[must_use]
    pub fn marker(self) -> Selector {
        match self {
            Self::Tooltip => Selector::attr_eq("data-bs-toggle", "tooltip"),
            Self::DatePicker => Selector::attr_eq("data-date-picker", "true").with_tag("input"),
            Self::CellInput => Selector::attr_eq("data-cell-input", "true").with_tag("input"),
            Self::NumberInput => Selector::attr_eq("data-number-input", "true").with_tag("input"),
            Self::DeleteAffordance => {
                Selector::attr_eq(affordance::CONFIRM_ATTR, ConfirmKind::Delete.marker())
            }
            Self::ReactivateAffordance => {
                Selector::attr_eq(affordance::CONFIRM_ATTR, ConfirmKind::Reactivate.marker())
            }
        }
    }

    /// Construction options for one element of this family.
    #[must_use]
    pub fn options(self, element: &Element, ctx: &BuildContext<'_>) -> WidgetOptions {
        match self {
            Self::Tooltip => WidgetOptions::Tooltip(TooltipOptions::for_element(element)),
            Self::DatePicker => WidgetOptions::DatePicker(DatePickerOptions::for_element(
                element,
                &ctx.config.date_picker,
                ctx.today,
            )),
            Self::CellInput => WidgetOptions::Mask(MaskKind::Cell),
            Self::NumberInput => WidgetOptions::Mask(MaskKind::Number),
            Self::DeleteAffordance => WidgetOptions::Confirm(AffordanceOptions::for_element(
                element,
                ConfirmKind::Delete,
            )),
            Self::ReactivateAffordance => WidgetOptions::Confirm(AffordanceOptions::for_element(
                element,
                ConfirmKind::Reactivate,
            )),
        }
    }
}

impl fmt::Display for WidgetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-element construction options, one variant per family shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOptions {
    Tooltip(TooltipOptions),
    DatePicker(DatePickerOptions),
    Mask(MaskKind),
    Confirm(AffordanceOptions),
}

/// Inputs shared by every family while a registry is rebuilt.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub config: &'a SyncConfig,
    pub today: NaiveDate,
}
