#![forbid(unsafe_code)]

//! Date-picker construction options.
//!
//! Pickers share the configured button class and language. An element opts in
//! to a lower bound with a non-empty `data-set-min-days` attribute, which pins
//! the earliest selectable date to the host's current date.

use chrono::NaiveDate;
use hxsync_core::config::DatePickerConfig;
use hxsync_core::dom::Element;

/// Attribute that restricts selection to today or later.
pub const MIN_DATE_ATTR: &str = "data-set-min-days";

/// Options passed to the date-picker provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePickerOptions {
    pub button_class: String,
    pub language: String,
    /// Earliest selectable date, if constrained.
    pub min_date: Option<NaiveDate>,
}

impl DatePickerOptions {
    #[must_use]
    pub fn for_element(element: &Element, config: &DatePickerConfig, today: NaiveDate) -> Self {
        let min_date = element
            .attr(MIN_DATE_ATTR)
            .is_some_and(|flag| !flag.is_empty())
            .then_some(today);
        Self {
            button_class: config.button_class.clone(),
            language: config.language.clone(),
            min_date,
        }
    }

    /// Whether the picker lets the user choose `date`.
    #[must_use]
    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        self.min_date.is_none_or(|min| date >= min)
    }
}
