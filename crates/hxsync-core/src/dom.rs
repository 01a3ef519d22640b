#![forbid(unsafe_code)]

//! Host-side document mirror.
//!
//! The [`Document`] is an arena of elements that mirrors the parts of the live
//! document the synchronizer cares about: ids, attributes, classes, input
//! values, the disabled flag, and focus. The host applies partial updates to it
//! with [`Document::apply_swap`] using [`ElementSpec`] fragments.
//!
//! # Invariants
//!
//! 1. A [`NodeId`] is never reused. Once an element is removed, every handle to
//!    it (and to its descendants) resolves to `None`, and its storage is freed.
//! 2. Id lookups go through an index of attached elements; on duplicate ids
//!    the first one in document order wins.
//! 3. Queries walk the tree in document (pre-)order from the root, so only
//!    attached elements are ever returned.
//! 4. The root element cannot be removed or replaced.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declarative description of an element subtree, used for swap fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSpec {
    pub tag: String,
    pub id: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub value: Option<String>,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    /// Create a spec for an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the element id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Add a class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the initial input value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A live element in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    value: String,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Element id, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Attribute value, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whether the element has the given class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Iterate over the element's classes in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Current input value (empty for non-inputs).
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the element is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Parent handle (`None` for the root).
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// How an attribute must match for a [`Selector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    /// The attribute is present with any value.
    Present,
    /// The attribute equals the given value exactly.
    Equals(String),
}

/// A minimal CSS-like selector: optional tag, attribute, and class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    attr: Option<(String, AttrMatch)>,
    class: Option<String>,
}

impl Selector {
    /// `[name="value"]`
    #[must_use]
    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attr: Some((name.into(), AttrMatch::Equals(value.into()))),
            ..Self::default()
        }
    }

    /// `[name]`
    #[must_use]
    pub fn attr_present(name: impl Into<String>) -> Self {
        Self {
            attr: Some((name.into(), AttrMatch::Present)),
            ..Self::default()
        }
    }

    /// `.class`
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    /// `tag`
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    /// Restrict to a tag name.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Whether an element matches.
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag
            && !element.tag.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(class) = &self.class
            && !element.has_class(class)
        {
            return false;
        }
        match &self.attr {
            None => true,
            Some((name, AttrMatch::Present)) => element.attrs.contains_key(name),
            Some((name, AttrMatch::Equals(value))) => element.attr(name) == Some(value.as_str()),
        }
    }
}

/// Swap strategies understood by [`Document::apply_swap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SwapStyle {
    /// Replace the target's children.
    #[default]
    #[serde(rename = "innerHTML")]
    InnerHtml,
    /// Replace the target itself.
    #[serde(rename = "outerHTML")]
    OuterHtml,
    /// Append after the target's last child.
    #[serde(rename = "beforeend")]
    BeforeEnd,
    /// Insert before the target's first child.
    #[serde(rename = "afterbegin")]
    AfterBegin,
    /// Remove the target.
    #[serde(rename = "delete")]
    Delete,
    /// Leave the document untouched.
    #[serde(rename = "none")]
    None,
}

impl FromStr for SwapStyle {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Modifiers such as "innerHTML settle:100ms" are not part of the style.
        let head = s.split_whitespace().next().unwrap_or_default();
        match head {
            "" | "innerHTML" => Ok(Self::InnerHtml),
            "outerHTML" => Ok(Self::OuterHtml),
            "beforeend" => Ok(Self::BeforeEnd),
            "afterbegin" => Ok(Self::AfterBegin),
            "delete" => Ok(Self::Delete),
            "none" => Ok(Self::None),
            other => Err(SwapError::UnknownStyle(other.to_string())),
        }
    }
}

/// Errors raised when applying a swap to the document mirror.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    /// No attached element carries the target id.
    #[error("swap target #{0} not found")]
    UnknownTarget(String),
    /// The swap would remove or replace the document root.
    #[error("the document root cannot be replaced or removed")]
    RootImmutable,
    /// The node handle does not refer to a live element.
    #[error("node {0} is not attached")]
    Detached(NodeId),
    /// Unrecognized swap style keyword.
    #[error("unknown swap style {0:?}")]
    UnknownStyle(String),
}

/// The document mirror.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: HashMap<NodeId, Element>,
    next_node: usize,
    ids: HashMap<String, Vec<NodeId>>,
    root: NodeId,
    focused: Option<NodeId>,
    revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a `body` root.
    #[must_use]
    pub fn new() -> Self {
        let root = Element {
            tag: "body".to_string(),
            id: None,
            attrs: BTreeMap::new(),
            classes: BTreeSet::new(),
            value: String::new(),
            disabled: false,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: HashMap::from([(NodeId(0), root)]),
            next_node: 1,
            ids: HashMap::new(),
            root: NodeId(0),
            focused: None,
            revision: 0,
        }
    }

    /// Create a document whose body holds the given fragment.
    #[must_use]
    pub fn from_fragment(fragment: impl IntoIterator<Item = ElementSpec>) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        for spec in fragment {
            doc.build(root, &spec, None);
        }
        doc
    }

    /// Root handle.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Monotonic counter bumped on every structural change.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of live elements, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the body has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.get(self.root).is_none_or(|root| root.children.is_empty())
    }

    /// Look up a live element.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node)
    }

    fn get_mut(&mut self, node: NodeId) -> Result<&mut Element, SwapError> {
        self.nodes.get_mut(&node).ok_or(SwapError::Detached(node))
    }

    /// Whether the handle refers to an element still in the tree.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// Append a subtree under `parent`.
    pub fn append(&mut self, parent: NodeId, spec: &ElementSpec) -> Result<NodeId, SwapError> {
        if !self.is_attached(parent) {
            return Err(SwapError::Detached(parent));
        }
        let node = self.build(parent, spec, None);
        self.revision += 1;
        Ok(node)
    }

    /// Remove an element and its subtree. Returns `false` if it was not attached.
    pub fn remove(&mut self, node: NodeId) -> Result<bool, SwapError> {
        if node == self.root {
            return Err(SwapError::RootImmutable);
        }
        let Some(parent) = self.get(node).map(|el| el.parent) else {
            return Ok(false);
        };
        if let Some(parent) = parent
            && let Ok(parent_el) = self.get_mut(parent)
        {
            parent_el.children.retain(|c| *c != node);
        }
        self.free_subtree(node);
        self.revision += 1;
        Ok(true)
    }

    /// First attached element with the given id, in document order.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        match self.ids.get(id)?.as_slice() {
            [] => None,
            [only] => Some(*only),
            many => many.iter().copied().min_by_key(|n| self.tree_path(*n)),
        }
    }

    /// All attached elements matching `selector`, in document order.
    #[must_use]
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.query_within(self.root, selector)
    }

    /// Descendants of `scope` (excluding `scope`) matching `selector`.
    #[must_use]
    pub fn query_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.walk(scope)
            .into_iter()
            .skip(1)
            .filter(|n| self.get(*n).is_some_and(|el| selector.matches(el)))
            .collect()
    }

    /// First descendant of `scope` matching `selector`.
    #[must_use]
    pub fn query_first_within(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.query_within(scope, selector).into_iter().next()
    }

    /// Whether `node` is `ancestor` or lies inside it.
    #[must_use]
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(Element::parent);
        }
        false
    }

    /// Set or replace an attribute.
    pub fn set_attr(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), SwapError> {
        self.get_mut(node)?.attrs.insert(name.into(), value.into());
        Ok(())
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<bool, SwapError> {
        Ok(self.get_mut(node)?.attrs.remove(name).is_some())
    }

    /// Add or remove a class.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) -> Result<(), SwapError> {
        let el = self.get_mut(node)?;
        if on {
            el.classes.insert(class.to_string());
        } else {
            el.classes.remove(class);
        }
        Ok(())
    }

    /// Add a class.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<(), SwapError> {
        self.toggle_class(node, class, true)
    }

    /// Remove a class.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<(), SwapError> {
        self.toggle_class(node, class, false)
    }

    /// Set an input's value.
    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) -> Result<(), SwapError> {
        self.get_mut(node)?.value = value.into();
        Ok(())
    }

    /// Enable or disable a control.
    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) -> Result<(), SwapError> {
        self.get_mut(node)?.disabled = disabled;
        Ok(())
    }

    /// Move focus to an element.
    pub fn focus(&mut self, node: NodeId) -> Result<(), SwapError> {
        if !self.is_attached(node) {
            return Err(SwapError::Detached(node));
        }
        self.focused = Some(node);
        Ok(())
    }

    /// Currently focused element.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.filter(|n| self.is_attached(*n))
    }

    /// Apply a partial update to the element with id `target_id`.
    ///
    /// Returns the handles of the newly inserted top-level elements.
    pub fn apply_swap(
        &mut self,
        target_id: &str,
        style: SwapStyle,
        fragment: &[ElementSpec],
    ) -> Result<Vec<NodeId>, SwapError> {
        let target = self
            .get_element_by_id(target_id)
            .ok_or_else(|| SwapError::UnknownTarget(target_id.to_string()))?;
        let inserted = match style {
            SwapStyle::None => Vec::new(),
            SwapStyle::InnerHtml => {
                let old = self.get(target).map(|el| el.children.clone()).unwrap_or_default();
                for child in old {
                    self.free_subtree(child);
                }
                self.get_mut(target)?.children.clear();
                fragment.iter().map(|spec| self.build(target, spec, None)).collect()
            }
            SwapStyle::BeforeEnd => fragment
                .iter()
                .map(|spec| self.build(target, spec, None))
                .collect(),
            SwapStyle::AfterBegin => fragment
                .iter()
                .enumerate()
                .map(|(offset, spec)| self.build(target, spec, Some(offset)))
                .collect(),
            SwapStyle::OuterHtml | SwapStyle::Delete => {
                let parent = self
                    .get(target)
                    .and_then(Element::parent)
                    .ok_or(SwapError::RootImmutable)?;
                let position = self
                    .get(parent)
                    .and_then(|p| p.children.iter().position(|c| *c == target))
                    .unwrap_or(0);
                self.get_mut(parent)?.children.retain(|c| *c != target);
                self.free_subtree(target);
                if style == SwapStyle::Delete {
                    Vec::new()
                } else {
                    fragment
                        .iter()
                        .enumerate()
                        .map(|(offset, spec)| self.build(parent, spec, Some(position + offset)))
                        .collect()
                }
            }
        };
        self.revision += 1;
        Ok(inserted)
    }

    /// Pre-order walk starting at (and including) `start`.
    fn walk(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            let Some(el) = self.get(node) else {
                continue;
            };
            out.push(node);
            stack.extend(el.children.iter().rev().copied());
        }
        out
    }

    /// Child positions from the root down to `node`; orders nodes in
    /// document order.
    fn tree_path(&self, node: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cursor = node;
        while let Some(parent) = self.get(cursor).and_then(Element::parent) {
            let at = self
                .get(parent)
                .and_then(|p| p.children.iter().position(|c| *c == cursor))
                .unwrap_or(0);
            path.push(at);
            cursor = parent;
        }
        path.reverse();
        path
    }

    fn free_subtree(&mut self, node: NodeId) {
        for n in self.walk(node) {
            if self.focused == Some(n) {
                self.focused = None;
            }
            let Some(el) = self.nodes.remove(&n) else {
                continue;
            };
            if let Some(id) = el.id
                && let Some(holders) = self.ids.get_mut(&id)
            {
                holders.retain(|h| *h != n);
                if holders.is_empty() {
                    self.ids.remove(&id);
                }
            }
        }
    }

    fn build(&mut self, parent: NodeId, spec: &ElementSpec, position: Option<usize>) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        if let Some(id) = &spec.id {
            self.ids.entry(id.clone()).or_default().push(node);
        }
        self.nodes.insert(node, Element {
            tag: spec.tag.to_ascii_lowercase(),
            id: spec.id.clone(),
            attrs: spec.attrs.clone(),
            classes: spec.classes.iter().cloned().collect(),
            value: spec.value.clone().unwrap_or_default(),
            disabled: spec.attrs.contains_key("disabled"),
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent_el) = self.nodes.get_mut(&parent) {
            match position {
                Some(at) if at <= parent_el.children.len() => parent_el.children.insert(at, node),
                _ => parent_el.children.push(node),
            }
        }
        for child in &spec.children {
            self.build(node, child, None);
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::from_fragment([
            ElementSpec::new("div").id("list").child(
                ElementSpec::new("span")
                    .id("tip")
                    .attr("data-bs-toggle", "tooltip"),
            ),
            ElementSpec::new("div").id("modal-form-dialog"),
        ])
    }

    #[test]
    fn get_element_by_id_finds_nested() {
        let doc = sample();
        let tip = doc.get_element_by_id("tip").unwrap();
        assert_eq!(doc.get(tip).unwrap().tag(), "span");
    }

    #[test]
    fn inner_swap_replaces_children_and_detaches_old() {
        let mut doc = sample();
        let old = doc.get_element_by_id("tip").unwrap();
        let inserted = doc
            .apply_swap("list", SwapStyle::InnerHtml, &[ElementSpec::new("p").id("new")])
            .unwrap();
        assert_eq!(inserted.len(), 1);
        assert!(!doc.is_attached(old));
        assert!(doc.get_element_by_id("tip").is_none());
        assert!(doc.get_element_by_id("new").is_some());
    }

    #[test]
    fn outer_swap_keeps_sibling_position() {
        let mut doc = Document::from_fragment([
            ElementSpec::new("tr").id("a"),
            ElementSpec::new("tr").id("b"),
            ElementSpec::new("tr").id("c"),
        ]);
        doc.apply_swap("b", SwapStyle::OuterHtml, &[ElementSpec::new("tr").id("b2")])
            .unwrap();
        let ids: Vec<_> = doc
            .get(doc.root())
            .unwrap()
            .children()
            .iter()
            .map(|n| doc.get(*n).unwrap().id().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["a", "b2", "c"]);
    }

    #[test]
    fn afterbegin_inserts_in_fragment_order() {
        let mut doc = Document::from_fragment([
            ElementSpec::new("ul").id("l").child(ElementSpec::new("li").id("z")),
        ]);
        doc.apply_swap(
            "l",
            SwapStyle::AfterBegin,
            &[ElementSpec::new("li").id("x"), ElementSpec::new("li").id("y")],
        )
        .unwrap();
        let list = doc.get_element_by_id("l").unwrap();
        let ids: Vec<_> = doc
            .get(list)
            .unwrap()
            .children()
            .iter()
            .filter_map(|n| doc.get(*n).and_then(Element::id))
            .collect();
        assert_eq!(ids, ["x", "y", "z"]);
    }

    #[test]
    fn delete_swap_removes_target() {
        let mut doc = sample();
        doc.apply_swap("list", SwapStyle::Delete, &[]).unwrap();
        assert!(doc.get_element_by_id("list").is_none());
        assert!(doc.get_element_by_id("tip").is_none());
    }

    #[test]
    fn unknown_target_is_an_error() {
        let mut doc = sample();
        let err = doc
            .apply_swap("missing", SwapStyle::InnerHtml, &[])
            .unwrap_err();
        assert_eq!(err, SwapError::UnknownTarget("missing".to_string()));
    }

    #[test]
    fn selector_matches_tag_attr_and_class() {
        let doc = Document::from_fragment([
            ElementSpec::new("input").attr("data-date-picker", "true"),
            ElementSpec::new("div").attr("data-date-picker", "true"),
            ElementSpec::new("input").attr("data-date-picker", "false"),
            ElementSpec::new("span").class("sent"),
        ]);
        let pickers = doc.query_all(&Selector::attr_eq("data-date-picker", "true").with_tag("input"));
        assert_eq!(pickers.len(), 1);
        assert_eq!(doc.query_all(&Selector::attr_present("data-date-picker")).len(), 3);
        assert_eq!(doc.query_all(&Selector::class("sent")).len(), 1);
    }

    #[test]
    fn removing_focused_subtree_clears_focus() {
        let mut doc = sample();
        let tip = doc.get_element_by_id("tip").unwrap();
        doc.focus(tip).unwrap();
        let list = doc.get_element_by_id("list").unwrap();
        assert!(doc.remove(list).unwrap());
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut doc = sample();
        let root = doc.root();
        assert_eq!(doc.remove(root), Err(SwapError::RootImmutable));
    }

    #[test]
    fn swap_style_parses_htmx_keywords() {
        assert_eq!("outerHTML".parse::<SwapStyle>().unwrap(), SwapStyle::OuterHtml);
        assert_eq!(
            "innerHTML settle:100ms".parse::<SwapStyle>().unwrap(),
            SwapStyle::InnerHtml
        );
        assert!("sideways".parse::<SwapStyle>().is_err());
    }

    #[test]
    fn revision_bumps_on_structural_change_only() {
        let mut doc = sample();
        let before = doc.revision();
        let tip = doc.get_element_by_id("tip").unwrap();
        doc.add_class(tip, "x").unwrap();
        assert_eq!(doc.revision(), before);
        doc.apply_swap("list", SwapStyle::InnerHtml, &[]).unwrap();
        assert_eq!(doc.revision(), before + 1);
    }

    #[test]
    fn repeated_swaps_free_old_storage() {
        let mut doc = sample();
        let base = doc.len();
        let row = ElementSpec::new("li").id("row").child(ElementSpec::new("span"));
        let mut seen = Vec::new();
        for _ in 0..50 {
            let inserted = doc
                .apply_swap("list", SwapStyle::InnerHtml, std::slice::from_ref(&row))
                .unwrap();
            seen.extend(inserted);
        }
        // `tip` was replaced by one row of two elements.
        assert_eq!(doc.len(), base + 1);
        assert_eq!(doc.nodes.len(), doc.len());
        assert_eq!(doc.get_element_by_id("row"), seen.last().copied());
        assert!(seen[..seen.len() - 1].iter().all(|n| !doc.is_attached(*n)));
        assert_eq!(doc.get_element_by_id("tip"), None);
    }

    #[test]
    fn duplicate_ids_resolve_in_document_order() {
        let mut doc = Document::from_fragment([
            ElementSpec::new("div").id("a"),
            ElementSpec::new("div").id("b"),
        ]);
        let late = doc.apply_swap("b", SwapStyle::BeforeEnd, &[ElementSpec::new("p").id("dup")]).unwrap();
        let early = doc.apply_swap("a", SwapStyle::BeforeEnd, &[ElementSpec::new("p").id("dup")]).unwrap();
        assert_eq!(doc.get_element_by_id("dup"), Some(early[0]));
        doc.remove(early[0]).unwrap();
        assert_eq!(doc.get_element_by_id("dup"), Some(late[0]));
        doc.remove(late[0]).unwrap();
        assert_eq!(doc.get_element_by_id("dup"), None);
    }
}
