#![forbid(unsafe_code)]

//! Input mask engine.
//!
//! Pattern syntax follows the subset used by the markup:
//!
//! - `9` is a digit slot.
//! - `[ ... ]` wraps optional trailing slots (one section, no nesting).
//! - `\x` is the literal `x`; any other character is a literal.
//! - Literals are never digits, so masked output reads back unchanged.
//!
//! Applying a mask keeps typed digits in order, inserts literals between them,
//! and drops everything beyond the last slot. A value is complete when every
//! required slot is filled.
//!
//! Cell inputs add one hard normalization on top of the mask: after every input
//! event a value that does not start with the configured prefix digit is reset
//! to exactly that digit.

use hxsync_core::config::MaskConfig;
use serde::{Deserialize, Serialize};

/// Pattern errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaskError {
    #[error("unbalanced optional section in mask {0:?}")]
    Unbalanced(String),
    #[error("nested optional section in mask {0:?}")]
    Nested(String),
    #[error("required slot after optional section in mask {0:?}")]
    RequiredAfterOptional(String),
    #[error("dangling escape at end of mask {0:?}")]
    DanglingEscape(String),
    #[error("digit literal in mask {0:?}")]
    DigitLiteral(String),
    #[error("mask {0:?} has no digit slots")]
    NoDigits(String),
    #[error("cell prefix {0:?} is not a single digit")]
    Prefix(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Digit,
    Literal(char),
}

/// A compiled mask pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pattern: String,
    slots: Vec<(Slot, bool)>,
}

impl Mask {
    /// Compile a pattern.
    pub fn parse(pattern: &str) -> Result<Self, MaskError> {
        let err = |make: fn(String) -> MaskError| make(pattern.to_string());
        let mut slots = Vec::new();
        let mut in_optional = false;
        let mut seen_optional = false;
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            let slot = match c {
                '[' if in_optional => return Err(err(MaskError::Nested)),
                '[' => {
                    in_optional = true;
                    seen_optional = true;
                    continue;
                }
                ']' if !in_optional => return Err(err(MaskError::Unbalanced)),
                ']' => {
                    in_optional = false;
                    continue;
                }
                '\\' => Slot::Literal(chars.next().ok_or_else(|| err(MaskError::DanglingEscape))?),
                '9' => Slot::Digit,
                other => Slot::Literal(other),
            };
            if matches!(slot, Slot::Literal(c) if c.is_ascii_digit()) {
                return Err(err(MaskError::DigitLiteral));
            }
            if seen_optional && !in_optional {
                return Err(err(MaskError::RequiredAfterOptional));
            }
            slots.push((slot, in_optional));
        }
        if in_optional {
            return Err(err(MaskError::Unbalanced));
        }
        if !slots.iter().any(|(slot, _)| *slot == Slot::Digit) {
            return Err(err(MaskError::NoDigits));
        }
        Ok(Self {
            pattern: pattern.to_string(),
            slots,
        })
    }

    /// Source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of required digit slots.
    #[must_use]
    pub fn min_digits(&self) -> usize {
        self.slots
            .iter()
            .filter(|(slot, optional)| *slot == Slot::Digit && !optional)
            .count()
    }

    /// Total number of digit slots.
    #[must_use]
    pub fn max_digits(&self) -> usize {
        self.slots.iter().filter(|(slot, _)| *slot == Slot::Digit).count()
    }

    /// Fit raw input to the mask.
    #[must_use]
    pub fn apply(&self, raw: &str) -> String {
        let mut digits = raw.chars().filter(char::is_ascii_digit).peekable();
        let mut out = String::with_capacity(self.slots.len());
        for (slot, _) in &self.slots {
            if digits.peek().is_none() {
                break;
            }
            match slot {
                Slot::Digit => out.extend(digits.next()),
                Slot::Literal(c) => out.push(*c),
            }
        }
        out
    }

    /// Whether `value` is already masked and fills every required slot.
    #[must_use]
    pub fn is_complete(&self, value: &str) -> bool {
        self.apply(value) == value
            && value.chars().filter(char::is_ascii_digit).count() >= self.min_digits()
    }
}

/// Which numeric sub-mask an input uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskKind {
    /// Fixed-length field that must start with the prefix digit.
    Cell,
    /// Variable-length numeric field.
    Number,
}

/// The two compiled sub-masks plus their input policies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMasks {
    cell: Mask,
    cell_prefix: char,
    number: Mask,
    clear_incomplete: bool,
}

impl InputMasks {
    /// Compile both masks from configuration.
    pub fn from_config(config: &MaskConfig) -> Result<Self, MaskError> {
        let mut prefix = config.cell_prefix.chars();
        let cell_prefix = match (prefix.next(), prefix.next()) {
            (Some(c), None) if c.is_ascii_digit() => c,
            _ => return Err(MaskError::Prefix(config.cell_prefix.clone())),
        };
        Ok(Self {
            cell: Mask::parse(&config.cell_pattern)?,
            cell_prefix,
            number: Mask::parse(&config.number_pattern)?,
            clear_incomplete: config.clear_incomplete,
        })
    }

    /// The mask used by `kind`.
    #[must_use]
    pub fn mask(&self, kind: MaskKind) -> &Mask {
        match kind {
            MaskKind::Cell => &self.cell,
            MaskKind::Number => &self.number,
        }
    }

    /// Value after an input event carrying `raw`.
    #[must_use]
    pub fn on_input(&self, kind: MaskKind, raw: &str) -> String {
        let masked = self.mask(kind).apply(raw);
        if kind == MaskKind::Cell && !masked.starts_with(self.cell_prefix) {
            return self.cell_prefix.to_string();
        }
        masked
    }

    /// Value after the field loses focus.
    #[must_use]
    pub fn on_blur(&self, kind: MaskKind, value: &str) -> String {
        if kind == MaskKind::Number && self.clear_incomplete && !self.number.is_complete(value) {
            return String::new();
        }
        value.to_string()
    }
}

impl Default for InputMasks {
    fn default() -> Self {
        Self {
            cell: Mask {
                pattern: "999999999".to_string(),
                slots: vec![(Slot::Digit, false); 9],
            },
            cell_prefix: '9',
            number: Mask {
                pattern: "99999999[999999999]".to_string(),
                slots: [vec![(Slot::Digit, false); 8], vec![(Slot::Digit, true); 9]].concat(),
            },
            clear_incomplete: true,
        }
    }
}
