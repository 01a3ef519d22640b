#![forbid(unsafe_code)]

//! Notification channel.
//!
//! Three presentation profiles map a message to a transient notice:
//!
//! | profile | icon | dismissal | buttons |
//! |---|---|---|---|
//! | success | success | automatic after the configured delay | none |
//! | error | error | by the user | cancel |
//! | confirm | warning | by answering | confirm + cancel, reversed |
//!
//! Notices are data. The host renders them; the [`NoticeBoard`] tracks the one
//! currently on screen and expires success notices against the host clock.

use core::time::Duration;

use hxsync_core::config::{Labels, NotificationConfig};
use serde::{Deserialize, Serialize};

use crate::affordance::ConfirmKind;

/// Presentation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Success,
    Error,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeIcon {
    Success,
    Error,
    Warning,
}

/// Where a success message is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Short message as the heading.
    #[default]
    Title,
    /// Longer message as body text.
    Body,
}

/// Buttons offered by a notice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeActions {
    pub confirm: Option<String>,
    pub cancel: Option<String>,
    /// Show cancel before confirm.
    pub reverse: bool,
}

/// A notice ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub profile: Profile,
    pub icon: NoticeIcon,
    pub title: Option<String>,
    pub text: Option<String>,
    /// Automatic dismissal delay; `None` means the user must dismiss it.
    pub auto_dismiss: Option<Duration>,
    pub actions: NoticeActions,
}

/// Builds notices from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    success_dismiss: Duration,
    labels: Labels,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}

impl NotificationChannel {
    #[must_use]
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self {
            success_dismiss: config.success_dismiss(),
            labels: config.labels(),
        }
    }

    #[must_use]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Success notice; dismisses itself.
    #[must_use]
    pub fn success(&self, message: &str, placement: Placement) -> Notice {
        let (title, text) = match placement {
            Placement::Title => (Some(message.to_string()), None),
            Placement::Body => (None, Some(message.to_string())),
        };
        Notice {
            profile: Profile::Success,
            icon: NoticeIcon::Success,
            title,
            text,
            auto_dismiss: Some(self.success_dismiss),
            actions: NoticeActions::default(),
        }
    }

    /// Error notice with the generic heading.
    #[must_use]
    pub fn error(&self, detail: &str) -> Notice {
        Notice {
            profile: Profile::Error,
            icon: NoticeIcon::Error,
            title: Some(self.labels.error_heading.clone()),
            text: (!detail.is_empty()).then(|| detail.to_string()),
            auto_dismiss: None,
            actions: NoticeActions {
                confirm: None,
                cancel: Some(self.labels.cancel_button.clone()),
                reverse: false,
            },
        }
    }

    /// Confirmation request carrying `payload` until answered.
    #[must_use]
    pub fn confirm<S>(&self, kind: ConfirmKind, subject: Option<&str>, payload: S) -> Confirmation<S> {
        let (text, button) = match kind {
            ConfirmKind::Delete => (&self.labels.delete_text, &self.labels.delete_button),
            ConfirmKind::Reactivate => (&self.labels.reactivate_text, &self.labels.reactivate_button),
        };
        let text = match subject {
            Some(subject) => format!("{text}: {subject}"),
            None => text.clone(),
        };
        Confirmation {
            kind,
            notice: Notice {
                profile: Profile::Confirm,
                icon: NoticeIcon::Warning,
                title: Some(self.labels.confirm_title.clone()),
                text: Some(text),
                auto_dismiss: None,
                actions: NoticeActions {
                    confirm: Some(button.clone()),
                    cancel: Some(self.labels.cancel_button.clone()),
                    reverse: true,
                },
            },
            payload,
        }
    }
}

/// An outstanding confirmation request.
///
/// The payload is released only by a positive answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation<S> {
    kind: ConfirmKind,
    notice: Notice,
    payload: S,
}

impl<S> Confirmation<S> {
    #[must_use]
    pub const fn kind(&self) -> ConfirmKind {
        self.kind
    }

    #[must_use]
    pub const fn notice(&self) -> &Notice {
        &self.notice
    }

    /// Answer the request.
    #[must_use]
    pub fn resolve(self, accepted: bool) -> Option<S> {
        accepted.then_some(self.payload)
    }
}

/// Identifier of a notice shown on a [`NoticeBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeId(pub u64);

/// The notice currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownNotice {
    pub id: NoticeId,
    pub notice: Notice,
    pub shown_at: Duration,
}

impl ShownNotice {
    /// Host time at which the notice dismisses itself.
    #[must_use]
    pub fn expires_at(&self) -> Option<Duration> {
        self.notice.auto_dismiss.map(|d| self.shown_at + d)
    }
}

/// Single-slot notice display: showing a notice replaces the current one.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    next: u64,
    current: Option<ShownNotice>,
}

impl NoticeBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `notice` at host time `now`. Returns its id and the id of the
    /// notice it replaced, if any.
    pub fn show(&mut self, notice: Notice, now: Duration) -> (NoticeId, Option<NoticeId>) {
        self.next += 1;
        let id = NoticeId(self.next);
        let replaced = self.current.replace(ShownNotice {
            id,
            notice,
            shown_at: now,
        });
        (id, replaced.map(|r| r.id))
    }

    /// Dismiss `id` if it is still shown.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        if self.current.as_ref().is_some_and(|c| c.id == id) {
            self.current = None;
            return true;
        }
        false
    }

    /// Drop the current notice if its auto-dismiss deadline has passed.
    pub fn expire(&mut self, now: Duration) -> Option<NoticeId> {
        let due = self
            .current
            .as_ref()
            .and_then(ShownNotice::expires_at)
            .is_some_and(|at| now >= at);
        if due {
            return self.current.take().map(|c| c.id);
        }
        None
    }

    #[must_use]
    pub fn current(&self) -> Option<&ShownNotice> {
        self.current.as_ref()
    }
}
