//! Hierarchical namespace tree.
//!
//! A [`Namespace`] is a prefix tree keyed by dot-separated path segments,
//! like a DNS hierarchy: in `physics.speed`, the root is the implicit empty
//! segment before the first name. Each node may hold one attached item.
//!
//! # Ordering is load-bearing
//!
//! Children are stored in an [`IndexMap`] so that sibling order is exactly
//! insertion order, and all subtree traversals are child-first (post-order).
//! The tick loop executes functions in this traversal order, which is what
//! decides whether a function observes a dependency's same-tick or
//! previous-tick value. Insertion order is therefore a first-class, stored
//! property of the tree, not an accident of the underlying map.

use indexmap::IndexMap;

use crate::error::LookupError;

/// A node in the namespace tree, generic over the attached item type.
///
/// The state registry is a `Namespace<StateHandle>` and the function
/// registry a `Namespace<FunctionRecord>`; both share this one structure.
/// Nodes are created lazily on first insert along a path and never deleted.
#[derive(Clone, Debug)]
pub struct Namespace<T> {
    segment: String,
    children: IndexMap<String, Namespace<T>>,
    item: Option<T>,
}

// Manual impl: the derive would add a `T: Default` bound.
impl<T> Default for Namespace<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Namespace<T> {
    /// Create an empty root namespace.
    pub fn new() -> Self {
        Self::with_segment(String::new())
    }

    fn with_segment(segment: String) -> Self {
        Self {
            segment,
            children: IndexMap::new(),
            item: None,
        }
    }

    /// The path segment naming this node. Empty for the root.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Insert an item at `path`, creating intermediate nodes as needed.
    ///
    /// An empty path attaches to this node itself. Attaching to a path that
    /// already holds an item silently overwrites it — callers are expected
    /// to avoid path collisions. Paths must not contain empty segments.
    pub fn insert(&mut self, path: &str, item: T) {
        let mut node = self;
        if !path.is_empty() {
            for segment in path.split('.') {
                node = node
                    .children
                    .entry(segment.to_string())
                    .or_insert_with(|| Namespace::with_segment(segment.to_string()));
            }
        }
        node.item = Some(item);
    }

    /// Descend to the node at `path`, if every segment exists.
    fn node(&self, path: &str) -> Option<&Namespace<T>> {
        let mut node = self;
        if !path.is_empty() {
            for segment in path.split('.') {
                node = node.children.get(segment)?;
            }
        }
        Some(node)
    }

    /// Look up the item attached exactly at `path`.
    ///
    /// Fails with [`LookupError::NotFound`] if any segment is absent.
    /// Returns `Ok(None)` if the node exists but holds no item.
    pub fn lookup_exact(&self, path: &str) -> Result<Option<&T>, LookupError> {
        match self.node(path) {
            Some(node) => Ok(node.item.as_ref()),
            None => Err(LookupError::NotFound { path: path.to_string() }),
        }
    }

    /// Collect every item at or under `path`, child-first.
    ///
    /// An empty path collects the whole tree. Fails with
    /// [`LookupError::NotFound`] if the named node does not exist. Within
    /// the subtree, children are visited before the node itself, siblings in
    /// insertion order.
    pub fn collect(&self, path: &str) -> Result<Vec<&T>, LookupError> {
        match self.node(path) {
            Some(node) => Ok(node.items()),
            None => Err(LookupError::NotFound { path: path.to_string() }),
        }
    }

    /// All items in this subtree, child-first, siblings in insertion order.
    pub fn items(&self) -> Vec<&T> {
        let mut out = Vec::new();
        self.push_items(&mut out);
        out
    }

    fn push_items<'a>(&'a self, out: &mut Vec<&'a T>) {
        for child in self.children.values() {
            child.push_items(out);
        }
        if let Some(item) = &self.item {
            out.push(item);
        }
    }

    /// All items in this subtree, mutably, in the same order as
    /// [`Namespace::items`].
    pub fn items_mut(&mut self) -> Vec<&mut T> {
        let mut out = Vec::new();
        self.push_items_mut(&mut out);
        out
    }

    fn push_items_mut<'a>(&'a mut self, out: &mut Vec<&'a mut T>) {
        for child in self.children.values_mut() {
            child.push_items_mut(out);
        }
        if let Some(item) = &mut self.item {
            out.push(item);
        }
    }

    /// All `(dotted_path, item)` pairs in this subtree, in traversal order.
    ///
    /// Used by the trace writer to serialize a registry with canonical
    /// paths.
    pub fn paths(&self) -> Vec<(String, &T)> {
        let mut out = Vec::new();
        self.push_paths("", &mut out);
        out
    }

    fn push_paths<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a T)>) {
        for (segment, child) in &self.children {
            let path = if prefix.is_empty() {
                segment.clone()
            } else {
                format!("{prefix}.{segment}")
            };
            child.push_paths(&path, out);
        }
        if let Some(item) = &self.item {
            out.push((prefix.to_string(), item));
        }
    }

    /// Number of attached items in the whole tree.
    pub fn len(&self) -> usize {
        self.children.values().map(Namespace::len).sum::<usize>()
            + usize::from(self.item.is_some())
    }

    /// Whether the tree holds no items at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
