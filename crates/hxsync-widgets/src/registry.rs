#![forbid(unsafe_code)]

//! Per-family widget registries.
//!
//! A [`Registry`] owns the live instances of one [`WidgetFamily`]. Rebuilding
//! is never incremental:
//!
//! 1. Every instance from the previous rebuild is torn down through the
//!    provider, whether or not its element is still attached.
//! 2. The whole document is scanned in document order and one instance is
//!    constructed per element carrying the family marker.
//!
//! After a rebuild the registry's elements equal the set of marker elements,
//! minus any element whose construction the provider refused. Refusals are
//! reported, logged, and retried on the next rebuild.

use hxsync_core::dom::{Document, NodeId};

use crate::provider::{ConstructRequest, ProviderError, ProviderHandle, WidgetProvider};
use crate::{BuildContext, WidgetFamily, WidgetOptions};

/// One constructed widget bound to one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetInstance {
    pub family: WidgetFamily,
    pub element: NodeId,
    pub handle: ProviderHandle,
    pub options: WidgetOptions,
}

/// Summary of a single rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    pub family: WidgetFamily,
    /// Instances torn down before scanning.
    pub released: usize,
    /// Instances constructed by the scan.
    pub constructed: usize,
    /// Elements the provider refused.
    pub failed: Vec<(NodeId, ProviderError)>,
}

impl RebuildReport {
    /// Whether every marker element received an instance.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Live instances of one family.
#[derive(Debug, Clone)]
pub struct Registry {
    family: WidgetFamily,
    instances: Vec<WidgetInstance>,
}

impl Registry {
    #[must_use]
    pub const fn new(family: WidgetFamily) -> Self {
        Self {
            family,
            instances: Vec::new(),
        }
    }

    #[must_use]
    pub const fn family(&self) -> WidgetFamily {
        self.family
    }

    /// Tear down every instance, then construct one per marker element.
    pub fn rebuild<P: WidgetProvider + ?Sized>(
        &mut self,
        doc: &Document,
        ctx: &BuildContext<'_>,
        provider: &mut P,
    ) -> RebuildReport {
        let released = self.release_all(provider);
        let mut failed = Vec::new();
        for node in doc.query_all(&self.family.marker()) {
            let Some(element) = doc.get(node) else {
                continue;
            };
            let options = self.family.options(element, ctx);
            let request = ConstructRequest {
                family: self.family,
                element: node,
                attrs: element,
                options: &options,
            };
            match provider.construct(&request) {
                Ok(handle) => self.instances.push(WidgetInstance {
                    family: self.family,
                    element: node,
                    handle,
                    options,
                }),
                Err(err) => {
                    hxsync_core::warn!(
                        family = self.family.name(),
                        element = node.index(),
                        error = %err,
                        "widget construction failed"
                    );
                    failed.push((node, err));
                }
            }
        }
        hxsync_core::trace!(
            family = self.family.name(),
            released,
            constructed = self.instances.len(),
            "registry rebuilt"
        );
        RebuildReport {
            family: self.family,
            released,
            constructed: self.instances.len(),
            failed,
        }
    }

    /// Tear down every instance. Returns how many were released.
    pub fn release_all<P: WidgetProvider + ?Sized>(&mut self, provider: &mut P) -> usize {
        let released = self.instances.len();
        for instance in self.instances.drain(..) {
            provider.teardown(instance.family, instance.handle);
        }
        released
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[must_use]
    pub fn instances(&self) -> &[WidgetInstance] {
        &self.instances
    }

    /// Bound elements, in document order of the last rebuild.
    #[must_use]
    pub fn elements(&self) -> Vec<NodeId> {
        self.instances.iter().map(|i| i.element).collect()
    }

    /// Instance bound exactly to `node`.
    #[must_use]
    pub fn instance_for(&self, node: NodeId) -> Option<&WidgetInstance> {
        self.instances.iter().find(|i| i.element == node)
    }

    /// Instance bound to `node` or to one of its ancestors.
    ///
    /// Clicks usually land on an icon nested inside the marked button.
    #[must_use]
    pub fn instance_containing(&self, doc: &Document, node: NodeId) -> Option<&WidgetInstance> {
        self.instances
            .iter()
            .find(|i| doc.is_within(node, i.element))
    }
}

/// One registry per family, in [`WidgetFamily::ALL`] order.
#[derive(Debug, Clone)]
pub struct Registries {
    registries: Vec<Registry>,
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

impl Registries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registries: WidgetFamily::ALL.into_iter().map(Registry::new).collect(),
        }
    }

    fn slot(family: WidgetFamily) -> usize {
        WidgetFamily::ALL
            .iter()
            .position(|f| *f == family)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, family: WidgetFamily) -> &Registry {
        &self.registries[Self::slot(family)]
    }

    pub fn registry_mut(&mut self, family: WidgetFamily) -> &mut Registry {
        &mut self.registries[Self::slot(family)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registry> {
        self.registries.iter()
    }

    /// Rebuild every family in order. Used by hosts that do not need
    /// per-family isolation.
    pub fn rebuild_all<P: WidgetProvider + ?Sized>(
        &mut self,
        doc: &Document,
        ctx: &BuildContext<'_>,
        provider: &mut P,
    ) -> Vec<RebuildReport> {
        self.registries
            .iter_mut()
            .map(|registry| registry.rebuild(doc, ctx, provider))
            .collect()
    }

    /// Total live instances across families.
    #[must_use]
    pub fn total(&self) -> usize {
        self.registries.iter().map(Registry::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::HeadlessProvider;
    use chrono::NaiveDate;
    use hxsync_core::config::SyncConfig;
    use hxsync_core::dom::{ElementSpec, SwapStyle};

    fn ctx(config: &SyncConfig) -> BuildContext<'_> {
        BuildContext {
            config,
            today: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        }
    }

    fn tooltip(id: &str) -> ElementSpec {
        ElementSpec::new("span").id(id).attr("data-bs-toggle", "tooltip")
    }

    #[test]
    fn rebuild_matches_markers() {
        let config = SyncConfig::default();
        let doc = Document::from_fragment([tooltip("a"), ElementSpec::new("p"), tooltip("b")]);
        let mut provider = HeadlessProvider::new();
        let mut registry = Registry::new(WidgetFamily::Tooltip);
        let report = registry.rebuild(&doc, &ctx(&config), &mut provider);
        assert_eq!(report.constructed, 2);
        assert_eq!(report.released, 0);
        assert_eq!(registry.elements(), doc.query_all(&WidgetFamily::Tooltip.marker()));
    }

    #[test]
    fn rebuild_releases_before_constructing() {
        let config = SyncConfig::default();
        let mut doc = Document::from_fragment([
            ElementSpec::new("div").id("slot").child(tooltip("a")),
        ]);
        let mut provider = HeadlessProvider::new();
        let mut registry = Registry::new(WidgetFamily::Tooltip);
        registry.rebuild(&doc, &ctx(&config), &mut provider);

        doc.apply_swap("slot", SwapStyle::InnerHtml, &[tooltip("b"), tooltip("c")])
            .unwrap();
        let report = registry.rebuild(&doc, &ctx(&config), &mut provider);
        assert_eq!(report.released, 1);
        assert_eq!(report.constructed, 2);
        assert_eq!(provider.live_count(), 2);
        assert_eq!(provider.torn_down(), 1);
        assert!(registry.elements().iter().all(|n| doc.is_attached(*n)));
    }

    #[test]
    fn zero_matches_is_not_an_error() {
        let config = SyncConfig::default();
        let doc = Document::new();
        let mut provider = HeadlessProvider::new();
        let mut registry = Registry::new(WidgetFamily::DatePicker);
        let report = registry.rebuild(&doc, &ctx(&config), &mut provider);
        assert!(report.is_complete());
        assert!(registry.is_empty());
    }

    #[test]
    fn refused_constructions_are_reported() {
        let config = SyncConfig::default();
        let doc = Document::from_fragment([tooltip("a")]);
        let mut provider = HeadlessProvider::new().rejecting(WidgetFamily::Tooltip);
        let mut registry = Registry::new(WidgetFamily::Tooltip);
        let report = registry.rebuild(&doc, &ctx(&config), &mut provider);
        assert_eq!(report.failed.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn instance_containing_resolves_nested_clicks() {
        let config = SyncConfig::default();
        let doc = Document::from_fragment([ElementSpec::new("button")
            .id("del")
            .attr("data-confirm", "delete")
            .child(ElementSpec::new("i").id("icon"))]);
        let mut provider = HeadlessProvider::new();
        let mut registry = Registry::new(WidgetFamily::DeleteAffordance);
        registry.rebuild(&doc, &ctx(&config), &mut provider);
        let icon = doc.get_element_by_id("icon").unwrap();
        let button = doc.get_element_by_id("del").unwrap();
        assert_eq!(
            registry.instance_containing(&doc, icon).map(|i| i.element),
            Some(button)
        );
    }

    #[test]
    fn registries_cover_every_family() {
        let registries = Registries::new();
        for family in WidgetFamily::ALL {
            assert_eq!(registries.get(family).family(), family);
        }
        assert_eq!(registries.total(), 0);
    }
}
