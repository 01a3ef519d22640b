#![forbid(unsafe_code)]

//! Swap lifecycle controller.
//!
//! The controller owns every registry, the modal, and the compiled masks for
//! one document, and reacts to the lifecycle signals of each partial update:
//!
//! - **before-swap**: a 204 aimed at the modal content slot hides the modal.
//! - **after-swap**: every registry is rebuilt over the whole document, each
//!   family in its own isolation boundary; then, if the target was the modal
//!   content slot, the modal is shown.
//!
//! Input, blur, and submit events on the mirrored document are also handled
//! here because the widgets they concern are owned here.

use chrono::NaiveDate;
use hxsync_core::config::SyncConfig;
use hxsync_core::dom::{Document, NodeId, SwapError};
use hxsync_core::event::ResponseStatus;
use hxsync_core::naming::SlotKind;
use hxsync_widgets::mask::{InputMasks, MaskError, MaskKind};
use hxsync_widgets::provider::WidgetProvider;
use hxsync_widgets::registry::{RebuildReport, Registries, WidgetInstance};
use hxsync_widgets::{BuildContext, WidgetFamily, WidgetOptions};

use crate::isolate::{FaultLog, HandlerFault};
use crate::modal::{ModalEvent, ModalForm, SubmitOutcome};

/// What one after-swap (or initial load) did.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub rebuilds: Vec<RebuildReport>,
    pub modal: Option<ModalEvent>,
    pub faults: Vec<HandlerFault>,
}

/// Coordinates registries and the modal around every partial update.
#[derive(Debug)]
pub struct SwapLifecycleController<P> {
    config: SyncConfig,
    registries: Registries,
    modal: ModalForm,
    masks: InputMasks,
    provider: P,
}

impl<P: WidgetProvider> SwapLifecycleController<P> {
    /// Build a controller. Fails if a mask pattern does not compile.
    pub fn new(config: SyncConfig, provider: P) -> Result<Self, MaskError> {
        let masks = InputMasks::from_config(&config.masks)?;
        Ok(Self {
            modal: ModalForm::new(config.naming.clone()),
            config,
            registries: Registries::new(),
            masks,
            provider,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[must_use]
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    #[must_use]
    pub fn modal(&self) -> &ModalForm {
        &self.modal
    }

    #[must_use]
    pub fn masks(&self) -> &InputMasks {
        &self.masks
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Initial document: rebuild every registry once.
    pub fn on_load(&mut self, doc: &Document, today: NaiveDate) -> SyncReport {
        let mut faults = FaultLog::new();
        let rebuilds = self.rebuild_all(doc, today, &mut faults);
        SyncReport {
            rebuilds,
            modal: None,
            faults: faults.into_faults(),
        }
    }

    /// Before-swap signal.
    pub fn before_swap(
        &mut self,
        doc: &mut Document,
        target_id: &str,
        status: ResponseStatus,
    ) -> Result<Option<ModalEvent>, HandlerFault> {
        tracing::trace!(target = target_id, status = status.0, "before-swap");
        if !status.is_no_content() || self.config.naming.classify(target_id) != SlotKind::ModalContent
        {
            return Ok(None);
        }
        let modal = &mut self.modal;
        crate::isolate::run_isolated("modal-hide", || modal.hide(doc))
    }

    /// After-swap signal.
    pub fn after_swap(&mut self, doc: &mut Document, target_id: &str, today: NaiveDate) -> SyncReport {
        tracing::trace!(target = target_id, "after-swap");
        let mut faults = FaultLog::new();
        let rebuilds = self.rebuild_all(doc, today, &mut faults);
        let modal = if self.config.naming.classify(target_id) == SlotKind::ModalContent {
            let modal = &mut self.modal;
            faults.run("modal-show", || modal.show(doc)).flatten()
        } else {
            None
        };
        SyncReport {
            rebuilds,
            modal,
            faults: faults.into_faults(),
        }
    }

    fn rebuild_all(
        &mut self,
        doc: &Document,
        today: NaiveDate,
        faults: &mut FaultLog,
    ) -> Vec<RebuildReport> {
        let ctx = BuildContext {
            config: &self.config,
            today,
        };
        let mut reports = Vec::with_capacity(WidgetFamily::ALL.len());
        for family in WidgetFamily::ALL {
            let registry = self.registries.registry_mut(family);
            let provider = &mut self.provider;
            let Some(report) = faults.run(family.name(), || {
                Ok::<_, std::convert::Infallible>(registry.rebuild(doc, &ctx, provider))
            }) else {
                continue;
            };
            for (node, err) in &report.failed {
                faults.push(HandlerFault::from_error(
                    family.name(),
                    &format_args!("element {node}: {err}"),
                ));
            }
            reports.push(report);
        }
        reports
    }

    /// Mask family bound to `node`, if any.
    fn mask_kind(&self, node: NodeId) -> Option<MaskKind> {
        [WidgetFamily::CellInput, WidgetFamily::NumberInput]
            .into_iter()
            .find_map(|family| match self.registries.get(family).instance_for(node) {
                Some(WidgetInstance {
                    options: WidgetOptions::Mask(kind),
                    ..
                }) => Some(*kind),
                _ => None,
            })
    }

    /// Input event carrying `raw` on `node`. Returns the stored value.
    pub fn on_input(&mut self, doc: &mut Document, node: NodeId, raw: &str) -> Result<String, SwapError> {
        let value = match self.mask_kind(node) {
            Some(kind) => self.masks.on_input(kind, raw),
            None => raw.to_string(),
        };
        doc.set_value(node, value.clone())?;
        Ok(value)
    }

    /// Blur event on `node`. Returns the stored value.
    pub fn on_blur(&mut self, doc: &mut Document, node: NodeId) -> Result<String, SwapError> {
        let current = doc.get(node).ok_or(SwapError::Detached(node))?.value().to_string();
        let Some(kind) = self.mask_kind(node) else {
            return Ok(current);
        };
        let value = self.masks.on_blur(kind, &current);
        if value != current {
            doc.set_value(node, value.clone())?;
        }
        Ok(value)
    }

    /// Submit event on `form`.
    pub fn on_submit(&mut self, doc: &mut Document, form: NodeId) -> Result<SubmitOutcome, SwapError> {
        self.modal.on_submit(doc, form)
    }

    /// Affordance containing `node`, if the click landed on one.
    #[must_use]
    pub fn affordance_at(&self, doc: &Document, node: NodeId) -> Option<&WidgetInstance> {
        [WidgetFamily::DeleteAffordance, WidgetFamily::ReactivateAffordance]
            .into_iter()
            .find_map(|family| self.registries.get(family).instance_containing(doc, node))
    }
}
