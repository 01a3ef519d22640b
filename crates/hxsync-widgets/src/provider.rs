#![forbid(unsafe_code)]

//! Widget construction contract.
//!
//! The libraries that actually draw a tooltip or a calendar live outside this
//! workspace. A registry only needs two calls from them: construct an instance
//! bound to one element, and tear it down again. [`HeadlessProvider`] is the
//! in-memory implementation used by tests and by hosts that only track state.

use std::collections::BTreeMap;

use hxsync_core::dom::{Element, NodeId};

use crate::{WidgetFamily, WidgetOptions};

/// Opaque handle returned by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderHandle(pub u64);

/// Everything a provider sees when asked to construct an instance.
#[derive(Debug, Clone, Copy)]
pub struct ConstructRequest<'a> {
    pub family: WidgetFamily,
    pub element: NodeId,
    pub attrs: &'a Element,
    pub options: &'a WidgetOptions,
}

/// Construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider has no implementation for the family.
    #[error("provider does not support {0}")]
    Unsupported(WidgetFamily),
    /// The provider refused this element.
    #[error("{family} rejected element {element}: {reason}")]
    Rejected {
        family: WidgetFamily,
        element: NodeId,
        reason: String,
    },
}

/// Capability provider for widget instances.
pub trait WidgetProvider {
    /// Construct one instance bound to `request.element`.
    fn construct(&mut self, request: &ConstructRequest<'_>) -> Result<ProviderHandle, ProviderError>;

    /// Release an instance previously returned by [`construct`](Self::construct).
    fn teardown(&mut self, family: WidgetFamily, handle: ProviderHandle);
}

impl<P: WidgetProvider + ?Sized> WidgetProvider for &mut P {
    fn construct(&mut self, request: &ConstructRequest<'_>) -> Result<ProviderHandle, ProviderError> {
        (**self).construct(request)
    }

    fn teardown(&mut self, family: WidgetFamily, handle: ProviderHandle) {
        (**self).teardown(family, handle);
    }
}

/// Provider that records live instances without rendering anything.
#[derive(Debug, Default)]
pub struct HeadlessProvider {
    next: u64,
    live: BTreeMap<ProviderHandle, (WidgetFamily, NodeId)>,
    constructed: u64,
    torn_down: u64,
    reject: Vec<WidgetFamily>,
}

impl HeadlessProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every construction of `family` fail.
    #[must_use]
    pub fn rejecting(mut self, family: WidgetFamily) -> Self {
        self.reject.push(family);
        self
    }

    /// Number of instances not yet torn down.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live instances of one family, by bound element.
    #[must_use]
    pub fn live_elements(&self, family: WidgetFamily) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .live
            .values()
            .filter(|(f, _)| *f == family)
            .map(|(_, node)| *node)
            .collect();
        nodes.sort_unstable();
        nodes
    }

    /// Total successful constructions.
    #[must_use]
    pub const fn constructed(&self) -> u64 {
        self.constructed
    }

    /// Total teardowns.
    #[must_use]
    pub const fn torn_down(&self) -> u64 {
        self.torn_down
    }
}

impl WidgetProvider for HeadlessProvider {
    fn construct(&mut self, request: &ConstructRequest<'_>) -> Result<ProviderHandle, ProviderError> {
        if self.reject.contains(&request.family) {
            return Err(ProviderError::Rejected {
                family: request.family,
                element: request.element,
                reason: "rejected by configuration".to_string(),
            });
        }
        self.next += 1;
        let handle = ProviderHandle(self.next);
        self.live.insert(handle, (request.family, request.element));
        self.constructed += 1;
        Ok(handle)
    }

    fn teardown(&mut self, _family: WidgetFamily, handle: ProviderHandle) {
        if self.live.remove(&handle).is_some() {
            self.torn_down += 1;
        }
    }
}
