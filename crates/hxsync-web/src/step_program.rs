#![forbid(unsafe_code)]

//! Step-based program runner for the synchronizer.
//!
//! [`SyncProgram`] owns the document mirror and every runtime component, and
//! processes host events without threads or blocking. The host controls the
//! loop:
//!
//! 1. Push events via [`SyncProgram::push_event`].
//! 2. Call [`SyncProgram::step`] to process everything queued.
//! 3. Drain what happened via [`SyncProgram::take_outputs`].
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use hxsync_core::config::SyncConfig;
//! use hxsync_core::dom::{Document, ElementSpec};
//! use hxsync_core::event::ResponseStatus;
//! use hxsync_core::dom::SwapStyle;
//! use hxsync_web::{HostEvent, SyncProgram};
//! use hxsync_widgets::provider::HeadlessProvider;
//!
//! let doc = Document::from_fragment([ElementSpec::new("div")
//!     .id("modal-form")
//!     .class("modal")
//!     .child(ElementSpec::new("div").id("modal-form-dialog"))]);
//! let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
//! let mut prog = SyncProgram::new(doc, SyncConfig::default(), HeadlessProvider::new(), today).unwrap();
//!
//! prog.push_event(HostEvent::Loaded);
//! prog.push_event(HostEvent::Update {
//!     target: "modal-form-dialog".to_string(),
//!     status: ResponseStatus::NO_CONTENT,
//!     style: SwapStyle::InnerHtml,
//!     fragment: Vec::new(),
//!     trigger: Some(r#"{"ObjectAdded": "Usuario creado correctamente"}"#.to_string()),
//! });
//! let result = prog.step();
//! assert_eq!(result.events_processed, 2);
//! assert_eq!(prog.take_outputs().notices.len(), 1);
//! ```

use core::time::Duration;
use std::collections::{BTreeMap, VecDeque};

use chrono::NaiveDate;
use hxsync_core::clock::HostClock;
use hxsync_core::config::SyncConfig;
use hxsync_core::dom::{Document, ElementSpec, NodeId, SwapStyle};
use hxsync_core::event::{ResponseStatus, SwapSignal};
use hxsync_core::outcome::OutcomeEvent;
use hxsync_core::trigger::decode_trigger_header;
use hxsync_runtime::{
    CollapseSynchronizer, OutcomeRouter, SwapLifecycleController, SyncReport, run_isolated,
};
use hxsync_widgets::WidgetOptions;
use hxsync_widgets::notify::{Confirmation, Notice, NoticeBoard, NotificationChannel};
use hxsync_widgets::provider::WidgetProvider;
use hxsync_widgets::visibility::show_when_value;

use crate::{ConfirmedAction, HostEvent, ShownNoticeOutput, SyncOutputs, WebError};

/// Result of a single [`SyncProgram::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Number of host events processed during this step.
    pub events_processed: u32,
    /// Current step index (monotonically increasing).
    pub step_idx: u64,
    /// Whether this step captured any output.
    pub produced_output: bool,
}

/// Host-driven, non-blocking synchronizer.
pub struct SyncProgram<P: WidgetProvider> {
    doc: Document,
    controller: SwapLifecycleController<P>,
    router: OutcomeRouter,
    collapse: CollapseSynchronizer,
    board: NoticeBoard,
    pending: BTreeMap<hxsync_widgets::notify::NoticeId, Confirmation<ConfirmedAction>>,
    clock: HostClock,
    queue: VecDeque<HostEvent>,
    outputs: SyncOutputs,
    step_idx: u64,
}

impl<P: WidgetProvider> SyncProgram<P> {
    /// Create a program over `doc`. Validates the configuration and compiles
    /// the mask patterns.
    pub fn new(
        doc: Document,
        config: SyncConfig,
        provider: P,
        today: NaiveDate,
    ) -> Result<Self, WebError> {
        config.validate()?;
        let router = OutcomeRouter::new(
            NotificationChannel::from_config(&config.notifications),
            config.naming.clone(),
        );
        let collapse = CollapseSynchronizer::new(config.naming.clone());
        let controller = SwapLifecycleController::new(config, provider)?;
        Ok(Self {
            doc,
            controller,
            router,
            collapse,
            board: NoticeBoard::new(),
            pending: BTreeMap::new(),
            clock: HostClock::new(today),
            queue: VecDeque::new(),
            outputs: SyncOutputs::default(),
            step_idx: 0,
        })
    }

    /// Build a program over a fragment-described initial document.
    pub fn from_fragment(
        fragment: &[ElementSpec],
        config: SyncConfig,
        provider: P,
        today: NaiveDate,
    ) -> Result<Self, WebError> {
        Self::new(
            Document::from_fragment(fragment.iter().cloned()),
            config,
            provider,
            today,
        )
    }

    /// Queue a host event. Events are processed on the next
    /// [`step`](Self::step) call.
    pub fn push_event(&mut self, event: HostEvent) {
        self.queue.push_back(event);
    }

    /// Queue a host event given as JSON, the form the JS shim sends.
    pub fn push_json(&mut self, json: &str) -> Result<(), WebError> {
        let event = serde_json::from_str(json).map_err(|e| WebError::HostEvent(e.to_string()))?;
        self.push_event(event);
        Ok(())
    }

    /// Process every queued event in order.
    pub fn step(&mut self) -> StepResult {
        let before = self.outputs.clone();
        let mut events_processed: u32 = 0;
        while let Some(event) = self.queue.pop_front() {
            events_processed += 1;
            let label = event.label();
            tracing::trace!(event = label, step = self.step_idx, "host event");
            if let Err(fault) = run_isolated(label, || self.handle_event(event)) {
                self.outputs.faults.push(fault);
            }
        }
        self.step_idx += 1;
        StepResult {
            events_processed,
            step_idx: self.step_idx,
            produced_output: self.outputs != before,
        }
    }

    /// Take the captured outputs, leaving an empty default.
    pub fn take_outputs(&mut self) -> SyncOutputs {
        std::mem::take(&mut self.outputs)
    }

    /// Read the captured outputs without consuming them.
    #[must_use]
    pub fn outputs(&self) -> &SyncOutputs {
        &self.outputs
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub fn controller(&self) -> &SwapLifecycleController<P> {
        &self.controller
    }

    #[must_use]
    pub fn collapse(&self) -> &CollapseSynchronizer {
        &self.collapse
    }

    #[must_use]
    pub fn board(&self) -> &NoticeBoard {
        &self.board
    }

    #[must_use]
    pub fn clock(&self) -> &HostClock {
        &self.clock
    }

    /// Number of confirmations awaiting an answer.
    #[must_use]
    pub fn pending_confirmations(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub const fn step_idx(&self) -> u64 {
        self.step_idx
    }

    /// Number of events waiting for the next step.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    fn handle_event(&mut self, event: HostEvent) -> Result<(), WebError> {
        match event {
            HostEvent::Loaded => {
                let report = self.controller.on_load(&self.doc, self.clock.today());
                self.absorb(report);
            }
            HostEvent::Update {
                target,
                status,
                style,
                fragment,
                trigger,
            } => self.update(&target, status, style, &fragment, trigger.as_deref())?,
            HostEvent::Signal(signal) => self.signal(signal)?,
            HostEvent::Swap {
                target,
                style,
                fragment,
            } => {
                self.doc.apply_swap(&target, style, &fragment)?;
                self.collapse.prune(&self.doc);
            }
            HostEvent::Trigger { header } => self.route_header(&header)?,
            HostEvent::Input { node, value } => {
                let stored = self.controller.on_input(&mut self.doc, node, &value)?;
                if stored != value {
                    self.outputs.values.push((node, stored));
                }
            }
            HostEvent::Blur { node } => {
                let before = self
                    .doc
                    .get(node)
                    .map(|el| el.value().to_string())
                    .unwrap_or_default();
                let stored = self.controller.on_blur(&mut self.doc, node)?;
                if stored != before {
                    self.outputs.values.push((node, stored));
                }
            }
            HostEvent::Click { node } => self.click(node)?,
            HostEvent::Submit { form } => {
                let outcome = self.controller.on_submit(&mut self.doc, form)?;
                self.outputs.submits.push((form, outcome));
            }
            HostEvent::ConfirmResolved { id, accepted } => {
                if let Some(ticket) = self.pending.remove(&id)
                    && let Some(action) = ticket.resolve(accepted)
                {
                    tracing::debug!(element = action.element.index(), "destructive action confirmed");
                    self.outputs.confirmed.push(action);
                }
                if self.board.dismiss(id) {
                    self.outputs.dismissed.push(id);
                }
            }
            HostEvent::DismissNotice { id } => {
                self.pending.remove(&id);
                if self.board.dismiss(id) {
                    self.outputs.dismissed.push(id);
                }
            }
            HostEvent::ShowWhen {
                source,
                expected,
                target,
                default,
            } => {
                let visible =
                    show_when_value(&mut self.doc, source, &expected, target, default.as_deref())?;
                self.outputs.visibility.push((target, visible));
            }
            HostEvent::Tick { dt } => self.advance_time(dt),
            HostEvent::SetToday { today } => self.clock.set_today(today),
        }
        Ok(())
    }

    /// Composite update: triggers, before-swap, swap, after-swap, after-settle.
    fn update(
        &mut self,
        target: &str,
        status: ResponseStatus,
        style: SwapStyle,
        fragment: &[ElementSpec],
        trigger: Option<&str>,
    ) -> Result<(), WebError> {
        // A bad header is its own fault; the swap lifecycle still runs.
        if let Some(header) = trigger
            && let Err(fault) = run_isolated("trigger", || self.route_header(header))
        {
            self.outputs.faults.push(fault);
        }
        self.signal(SwapSignal::BeforeSwap {
            target: target.to_string(),
            status,
        })?;
        if !status.is_swappable() {
            tracing::debug!(slot = target, status = status.0, "response not swapped");
            return Ok(());
        }
        self.doc.apply_swap(target, style, fragment)?;
        self.collapse.prune(&self.doc);
        self.signal(SwapSignal::AfterSwap {
            target: target.to_string(),
        })?;
        self.signal(SwapSignal::AfterSettle {
            target: target.to_string(),
        })
    }

    fn signal(&mut self, signal: SwapSignal) -> Result<(), WebError> {
        tracing::trace!(phase = ?signal.phase(), slot = signal.target(), "lifecycle signal");
        match signal {
            SwapSignal::BeforeSwap { target, status } => {
                match self.controller.before_swap(&mut self.doc, &target, status) {
                    Ok(Some(event)) => self.outputs.modal_events.push(event),
                    Ok(None) => {}
                    Err(fault) => self.outputs.faults.push(fault),
                }
            }
            SwapSignal::AfterSwap { target } => {
                let report = self
                    .controller
                    .after_swap(&mut self.doc, &target, self.clock.today());
                self.absorb(report);
            }
            SwapSignal::AfterSettle { target } => {
                if let Some(key) = self.collapse.on_settle(&mut self.doc, &target)? {
                    self.outputs.expanded.push(key);
                }
            }
        }
        Ok(())
    }

    fn absorb(&mut self, report: SyncReport) {
        self.outputs.modal_events.extend(report.modal);
        self.outputs.faults.extend(report.faults);
    }

    fn route_header(&mut self, header: &str) -> Result<(), WebError> {
        for event in decode_trigger_header(header)? {
            self.route(&event);
        }
        Ok(())
    }

    fn route(&mut self, event: &OutcomeEvent) {
        let routed = self.router.route(&self.doc, event);
        if let Some(notice) = routed.notice {
            self.show(notice);
        }
        self.outputs.dispatched.extend(routed.dispatched);
    }

    fn click(&mut self, node: NodeId) -> Result<(), WebError> {
        if let Some(key) = self.collapse.on_click(&mut self.doc, node)? {
            self.outputs.collapsed.push(key);
            return Ok(());
        }
        let Some(instance) = self.controller.affordance_at(&self.doc, node) else {
            return Ok(());
        };
        let WidgetOptions::Confirm(options) = &instance.options else {
            return Ok(());
        };
        let action = ConfirmedAction {
            kind: options.kind,
            element: instance.element,
            request: options.request.clone(),
        };
        let ticket = self
            .router
            .channel()
            .confirm(options.kind, options.subject.as_deref(), action);
        let id = self.show(ticket.notice().clone());
        self.pending.insert(id, ticket);
        Ok(())
    }

    /// Put a notice on the board. A replaced confirmation counts as cancelled.
    fn show(&mut self, notice: Notice) -> hxsync_widgets::notify::NoticeId {
        let (id, replaced) = self.board.show(notice.clone(), self.clock.now());
        if let Some(old) = replaced
            && self.pending.remove(&old).is_some()
        {
            tracing::debug!(notice = old.0, "pending confirmation replaced, treated as cancel");
        }
        self.outputs.notices.push(ShownNoticeOutput {
            id,
            notice,
            replaced,
        });
        id
    }

    fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
        if let Some(id) = self.board.expire(self.clock.now()) {
            self.outputs.dismissed.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hxsync_core::key::CorrelationKey;
    use hxsync_runtime::{ModalEvent, SubmitOutcome};
    use hxsync_widgets::affordance::ConfirmKind;
    use hxsync_widgets::notify::Profile;
    use hxsync_widgets::provider::HeadlessProvider;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn program(doc: Document) -> SyncProgram<HeadlessProvider> {
        SyncProgram::new(doc, SyncConfig::default(), HeadlessProvider::new(), today()).unwrap()
    }

    fn modal_page() -> Document {
        Document::from_fragment([
            ElementSpec::new("div")
                .id("modal-form")
                .class("modal")
                .child(ElementSpec::new("div").id("modal-form-dialog")),
            ElementSpec::new("div").id("list"),
        ])
    }

    fn modal_form() -> Vec<ElementSpec> {
        vec![ElementSpec::new("form").id("f").children([
            ElementSpec::new("input").id("id_name"),
            ElementSpec::new("input").id("id_phone").attr("data-cell-input", "true"),
            ElementSpec::new("button").id("btn-modal-enviar").children([
                ElementSpec::new("span").class("sent").class("d-none"),
                ElementSpec::new("span").class("unsent"),
            ]),
        ])]
    }

    fn update(target: &str, status: u16, fragment: Vec<ElementSpec>, trigger: Option<&str>) -> HostEvent {
        HostEvent::Update {
            target: target.to_string(),
            status: ResponseStatus(status),
            style: SwapStyle::InnerHtml,
            fragment,
            trigger: trigger.map(str::to_string),
        }
    }

    #[test]
    fn modal_round_trip() {
        let mut prog = program(modal_page());
        prog.push_event(HostEvent::Loaded);
        prog.push_event(update("modal-form-dialog", 200, modal_form(), None));
        prog.step();
        let out = prog.take_outputs();
        assert_eq!(out.modal_events, vec![ModalEvent::Shown]);
        assert!(prog.controller().modal().is_shown());

        let form = prog.document().get_element_by_id("f").unwrap();
        prog.push_event(HostEvent::Submit { form });
        prog.push_event(HostEvent::Submit { form });
        prog.push_event(update(
            "modal-form-dialog",
            204,
            Vec::new(),
            Some(r#"{"ObjectAdded": {"title": "Usuario creado correctamente"}}"#),
        ));
        prog.step();
        let out = prog.take_outputs();
        assert_eq!(
            out.submits,
            vec![(form, SubmitOutcome::Proceed), (form, SubmitOutcome::Blocked)]
        );
        assert_eq!(out.modal_events, vec![ModalEvent::Hidden]);
        assert_eq!(out.notices.len(), 1);
        assert_eq!(out.notices[0].notice.profile, Profile::Success);
        // 204 is not swapped: the form is still in the mirror.
        assert!(prog.document().get_element_by_id("f").is_some());
    }

    #[test]
    fn masked_input_rewrites_value() {
        let mut prog = program(modal_page());
        prog.push_event(update("modal-form-dialog", 200, modal_form(), None));
        prog.step();
        prog.take_outputs();
        let phone = prog.document().get_element_by_id("id_phone").unwrap();
        prog.push_event(HostEvent::Input {
            node: phone,
            value: "123".to_string(),
        });
        prog.step();
        assert_eq!(prog.take_outputs().values, vec![(phone, "9".to_string())]);
    }

    #[test]
    fn success_notice_expires_on_tick() {
        let mut prog = program(modal_page());
        prog.push_event(HostEvent::Trigger {
            header: "ObjectEdited".to_string(),
        });
        prog.step();
        let id = prog.take_outputs().notices[0].id;
        prog.push_event(HostEvent::Tick {
            dt: Duration::from_millis(1999),
        });
        prog.step();
        assert!(prog.take_outputs().dismissed.is_empty());
        prog.push_event(HostEvent::Tick {
            dt: Duration::from_millis(1),
        });
        prog.step();
        assert_eq!(prog.take_outputs().dismissed, vec![id]);
    }

    #[test]
    fn delete_affordance_requires_confirmation() {
        let doc = Document::from_fragment([ElementSpec::new("button")
            .id("del")
            .attr("data-confirm", "delete")
            .attr("hx-delete", "/usuarios/3/")
            .child(ElementSpec::new("i").id("icon"))]);
        let mut prog = program(doc);
        prog.push_event(HostEvent::Loaded);
        prog.step();
        let icon = prog.document().get_element_by_id("icon").unwrap();

        prog.push_event(HostEvent::Click { node: icon });
        prog.step();
        let out = prog.take_outputs();
        let shown = &out.notices[0];
        assert_eq!(shown.notice.profile, Profile::Confirm);
        assert_eq!(prog.pending_confirmations(), 1);

        prog.push_event(HostEvent::ConfirmResolved {
            id: shown.id,
            accepted: true,
        });
        prog.step();
        let out = prog.take_outputs();
        assert_eq!(out.confirmed.len(), 1);
        assert_eq!(out.confirmed[0].kind, ConfirmKind::Delete);
        assert_eq!(
            out.confirmed[0].request.as_ref().map(|r| r.url.as_str()),
            Some("/usuarios/3/")
        );
        assert_eq!(prog.pending_confirmations(), 0);
    }

    #[test]
    fn declined_or_replaced_confirmation_yields_nothing() {
        let doc = Document::from_fragment([ElementSpec::new("a")
            .id("re")
            .attr("data-confirm", "reactivate")
            .attr("data-url", "/usuarios/3/reactivar/")]);
        let mut prog = program(doc);
        prog.push_event(HostEvent::Loaded);
        let node = prog.document().get_element_by_id("re").unwrap();
        prog.push_event(HostEvent::Click { node });
        prog.step();
        let first = prog.take_outputs().notices[0].id;

        // A second click replaces the first notice; the first ticket is void.
        prog.push_event(HostEvent::Click { node });
        prog.step();
        let second = prog.take_outputs().notices[0].id;
        assert_eq!(prog.pending_confirmations(), 1);
        prog.push_event(HostEvent::ConfirmResolved {
            id: first,
            accepted: true,
        });
        prog.push_event(HostEvent::ConfirmResolved {
            id: second,
            accepted: false,
        });
        prog.step();
        assert!(prog.take_outputs().confirmed.is_empty());
    }

    #[test]
    fn related_update_expands_panel() {
        let doc = Document::from_fragment([
            ElementSpec::new("button").id("related-show-42"),
            ElementSpec::new("button").id("related-hide-42").class("d-none"),
            ElementSpec::new("div").id("collapse-related-42"),
        ]);
        let mut prog = program(doc);
        prog.push_event(update(
            "collapse-related-42",
            200,
            vec![ElementSpec::new("ul")],
            None,
        ));
        prog.step();
        let out = prog.take_outputs();
        assert_eq!(out.expanded, vec![CorrelationKey::from(42u64)]);

        let hide = prog.document().get_element_by_id("related-hide-42").unwrap();
        prog.push_event(HostEvent::Click { node: hide });
        prog.step();
        assert_eq!(prog.take_outputs().collapsed, vec![CorrelationKey::from(42u64)]);
    }

    #[test]
    fn bad_events_become_faults_without_stopping_the_step() {
        let mut prog = program(modal_page());
        prog.push_event(update("missing-slot", 200, Vec::new(), None));
        prog.push_event(HostEvent::Trigger {
            header: "{not json".to_string(),
        });
        prog.push_event(HostEvent::Trigger {
            header: "PasswordUpdated".to_string(),
        });
        let result = prog.step();
        assert_eq!(result.events_processed, 3);
        let out = prog.take_outputs();
        assert_eq!(out.faults.len(), 2);
        assert_eq!(out.faults[0].handler, "update");
        assert_eq!(out.faults[1].handler, "trigger");
        assert_eq!(out.notices.len(), 1);
    }
}
