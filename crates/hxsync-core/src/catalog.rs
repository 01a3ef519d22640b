#![forbid(unsafe_code)]

//! Message catalog for outcome events.
//!
//! Views describe the affected record with a noun ("Usuario", "Provincia") and
//! the catalog inflects the success message for the noun's grammatical gender.

use serde::{Deserialize, Serialize};

use crate::key::CorrelationKey;
use crate::outcome::{OutcomeEvent, OutcomeKind, OutcomePayload, Polarity, Verb};

/// Grammatical gender of the record noun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Masculine,
    Feminine,
}

/// Success message for `verb` applied to `subject`.
#[must_use]
pub fn success_message(verb: Verb, gender: Gender, subject: &str) -> String {
    let participle = match (verb, gender) {
        (Verb::Added, Gender::Masculine) => "creado",
        (Verb::Added, Gender::Feminine) => "creada",
        (Verb::Edited, Gender::Masculine) => "actualizado",
        (Verb::Edited, Gender::Feminine) => "actualizada",
        (Verb::Deleted, Gender::Masculine) => "eliminado",
        (Verb::Deleted, Gender::Feminine) => "eliminada",
        (Verb::Reactivated, Gender::Masculine) => "reactivado",
        (Verb::Reactivated, Gender::Feminine) => "reactivada",
        (Verb::Imported, _) => return format!("Importación correcta. {subject}"),
        (Verb::PasswordUpdated, _) => return "Contraseña reseteada correctamente".to_string(),
        (Verb::CommentAdded, _) => return "Comentario registrado correctamente".to_string(),
    };
    format!("{subject} {participle} correctamente")
}

/// Failure message for `verb` with a server-provided detail.
#[must_use]
pub fn failure_message(verb: Verb, detail: &str) -> String {
    match verb {
        Verb::Added => format!("No se pudo crear. {detail}"),
        Verb::Edited => format!("No se pudo editar. {detail}"),
        Verb::Deleted => format!("No se pudo eliminar. {detail}"),
        Verb::Reactivated => format!("No se pudo reactivar {detail}"),
        Verb::Imported => format!("No se pudo importar. {detail}"),
        Verb::PasswordUpdated => "No se actualizó contraseña".to_string(),
        Verb::CommentAdded => format!("No se pudo registrar el comentario. {detail}"),
    }
    .trim_end()
    .to_string()
}

/// Build a success event with a catalog title.
///
/// Returns `None` when the verb has no related variant and `key` is given.
#[must_use]
pub fn success_event(
    verb: Verb,
    gender: Gender,
    subject: &str,
    key: Option<CorrelationKey>,
) -> Option<OutcomeEvent> {
    let kind = OutcomeKind::new(verb, Polarity::Success, key.is_some())?;
    let mut payload = OutcomePayload::titled(success_message(verb, gender, subject));
    payload.pk = key;
    Some(OutcomeEvent::of_kind(kind, payload))
}

/// Build a failure event with a catalog title.
///
/// Returns `None` for verbs that have no failure variant in that shape
/// (plain `ObjectAdded`, for instance, reports errors by re-rendering the form).
#[must_use]
pub fn failure_event(
    verb: Verb,
    detail: &str,
    key: Option<CorrelationKey>,
) -> Option<OutcomeEvent> {
    let kind = OutcomeKind::new(verb, Polarity::Fail, key.is_some())?;
    let mut payload = OutcomePayload::titled(failure_message(verb, detail));
    payload.pk = key;
    Some(OutcomeEvent::of_kind(kind, payload))
}
