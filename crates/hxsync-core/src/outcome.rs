#![forbid(unsafe_code)]

//! Outcome event vocabulary.
//!
//! Every accepted event name decomposes into a [`Verb`], a [`Polarity`], and a
//! `related` flag. The set of valid combinations is fixed by
//! [`OutcomeKind::ALL`]; anything else is not an outcome event.
//!
//! | verb | success | fail | related | fail-related |
//! |---|---|---|---|---|
//! | Added (`ObjectAdded`) | ✓ | | ✓ | ✓ |
//! | Edited (`ObjectEdited`) | ✓ | | ✓ | ✓ |
//! | Deleted (`ObjectDeleted`) | ✓ | ✓ | ✓ | ✓ |
//! | Reactivated (`ObjectReactivated`) | ✓ | ✓ | ✓ | ✓ |
//! | Imported (`ObjectsImported`) | ✓ | ✓ | ✓ | ✓ |
//! | PasswordUpdated | ✓ | ✓ | | |
//! | CommentAdded | ✓ | | | |

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::key::CorrelationKey;

/// Legacy spelling of `ObjectDeletedFail` still emitted by older views.
const LEGACY_DELETE_FAIL: &str = "ObjectNotDeleted";

/// The domain action an outcome reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verb {
    Added,
    Edited,
    Deleted,
    Reactivated,
    Imported,
    PasswordUpdated,
    CommentAdded,
}

impl Verb {
    /// Every verb, in table order.
    pub const ALL: [Verb; 7] = [
        Verb::Added,
        Verb::Edited,
        Verb::Deleted,
        Verb::Reactivated,
        Verb::Imported,
        Verb::PasswordUpdated,
        Verb::CommentAdded,
    ];

    /// Stem of the event name.
    #[must_use]
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Added => "ObjectAdded",
            Self::Edited => "ObjectEdited",
            Self::Deleted => "ObjectDeleted",
            Self::Reactivated => "ObjectReactivated",
            Self::Imported => "ObjectsImported",
            Self::PasswordUpdated => "PasswordUpdated",
            Self::CommentAdded => "CommentAdded",
        }
    }

    const fn has_fail(self) -> bool {
        matches!(
            self,
            Self::Deleted | Self::Reactivated | Self::Imported | Self::PasswordUpdated
        )
    }

    const fn has_related(self) -> bool {
        matches!(
            self,
            Self::Added | Self::Edited | Self::Deleted | Self::Reactivated | Self::Imported
        )
    }
}

/// Whether the reported action succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Success,
    Fail,
}

/// A valid outcome event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeKind {
    verb: Verb,
    polarity: Polarity,
    related: bool,
}

impl OutcomeKind {
    /// Every accepted kind.
    pub const ALL: [OutcomeKind; 21] = {
        let mut out = [OutcomeKind {
            verb: Verb::Added,
            polarity: Polarity::Success,
            related: false,
        }; 21];
        let mut n = 0;
        let mut i = 0;
        while i < Verb::ALL.len() {
            let verb = Verb::ALL[i];
            let combos = [
                (Polarity::Success, false),
                (Polarity::Fail, false),
                (Polarity::Success, true),
                (Polarity::Fail, true),
            ];
            let mut j = 0;
            while j < combos.len() {
                let (polarity, related) = combos[j];
                if Self::is_valid(verb, polarity, related) {
                    out[n] = OutcomeKind {
                        verb,
                        polarity,
                        related,
                    };
                    n += 1;
                }
                j += 1;
            }
            i += 1;
        }
        out
    };

    const fn is_valid(verb: Verb, polarity: Polarity, related: bool) -> bool {
        match (polarity, related) {
            (Polarity::Success, false) => true,
            (Polarity::Fail, false) => verb.has_fail(),
            (_, true) => verb.has_related(),
        }
    }

    /// Build a kind, returning `None` for combinations outside the vocabulary.
    #[must_use]
    pub const fn new(verb: Verb, polarity: Polarity, related: bool) -> Option<Self> {
        if Self::is_valid(verb, polarity, related) {
            Some(Self {
                verb,
                polarity,
                related,
            })
        } else {
            None
        }
    }

    /// Resolve an event name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name == LEGACY_DELETE_FAIL {
            return Self::new(Verb::Deleted, Polarity::Fail, false);
        }
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    #[must_use]
    pub const fn verb(self) -> Verb {
        self.verb
    }

    #[must_use]
    pub const fn polarity(self) -> Polarity {
        self.polarity
    }

    #[must_use]
    pub const fn is_related(self) -> bool {
        self.related
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self.polarity, Polarity::Success)
    }

    /// Canonical event name (`ObjectDeletedFailRelated`, ...).
    #[must_use]
    pub fn name(self) -> String {
        let mut name = String::from(self.verb.stem());
        if matches!(self.polarity, Polarity::Fail) {
            name.push_str("Fail");
        }
        if self.related {
            name.push_str("Related");
        }
        name
    }

    /// Name of the event dispatched onto a panel's show control to refresh it:
    /// the kind's name followed by the key (`ObjectDeletedRelated42`).
    ///
    /// Only successful related outcomes retrigger a refresh.
    #[must_use]
    pub fn retrigger_name(self, key: &CorrelationKey) -> Option<String> {
        (self.related && self.is_success()).then(|| format!("{}{key}", self.name()))
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Payload of an outcome event.
///
/// Field names drifted across protocol revisions; the accessors pick the
/// latest spelling first and fall back to older ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pk: Option<CorrelationKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_pk: Option<CorrelationKey>,
}

impl OutcomePayload {
    /// Payload carrying only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Attach a correlation key.
    #[must_use]
    pub fn with_pk(mut self, key: CorrelationKey) -> Self {
        self.pk = Some(key);
        self
    }

    /// Read a payload from JSON.
    ///
    /// A bare string is the message. In an object, unknown fields are
    /// ignored and a malformed key is dropped rather than failing the event.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(message) => Self {
                value: Some(message.clone()),
                ..Self::default()
            },
            Value::Object(map) => {
                let text = |field: &str| match map.get(field) {
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(Value::Number(n)) => Some(n.to_string()),
                    _ => None,
                };
                let key = |field: &str| {
                    map.get(field)
                        .and_then(|v| serde_json::from_value::<CorrelationKey>(v.clone()).ok())
                };
                Self {
                    title: text("title"),
                    text: text("text"),
                    value: text("value"),
                    pk: key("pk"),
                    parent_pk: key("parent_pk"),
                }
            }
            _ => Self::default(),
        }
    }

    /// Human-readable message: `title`, else `text`, else `value`.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.text.as_deref())
            .or(self.value.as_deref())
    }

    /// Correlation key: `pk`, else `parent_pk`.
    #[must_use]
    pub fn key(&self) -> Option<&CorrelationKey> {
        self.pk.as_ref().or(self.parent_pk.as_ref())
    }
}

/// A named outcome signal with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeEvent {
    name: String,
    kind: Option<OutcomeKind>,
    payload: OutcomePayload,
}

impl OutcomeEvent {
    /// Wrap a raw event name. Names outside the vocabulary keep `kind() == None`.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: OutcomePayload) -> Self {
        let name = name.into();
        let kind = OutcomeKind::from_name(&name);
        Self {
            name,
            kind,
            payload,
        }
    }

    /// Event of a known kind.
    #[must_use]
    pub fn of_kind(kind: OutcomeKind, payload: OutcomePayload) -> Self {
        Self {
            name: kind.name(),
            kind: Some(kind),
            payload,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> Option<OutcomeKind> {
        self.kind
    }

    #[must_use]
    pub const fn payload(&self) -> &OutcomePayload {
        &self.payload
    }
}
