//! State nodes: the mutable key/value containers owned by namespace paths.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

/// Shared handle to a [`StateNode`].
///
/// The state registry, probes, injectors, and setup code all hold handles to
/// the same canonical node. The kernel is single-threaded by design, so the
/// handle is `Rc<RefCell<_>>`: borrows are short-lived and strictly
/// sequential within a tick.
pub type StateHandle = Rc<RefCell<StateNode>>;

/// The state for a single simulated entity, as key/value pairs.
///
/// A state node is owned by exactly one namespace path and mutated only by
/// the function registered at that same path, during that function's
/// invocation. Every other reader gets an independent deep copy via
/// [`StateNode::snapshot`].
#[derive(Clone, Debug, PartialEq)]
pub struct StateNode {
    path: String,
    values: IndexMap<String, Value>,
}

impl StateNode {
    /// Create an empty node owned by `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            values: IndexMap::new(),
        }
    }

    /// Wrap a node in a [`StateHandle`].
    pub fn into_shared(self) -> StateHandle {
        Rc::new(RefCell::new(self))
    }

    /// The namespace path that owns this node.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The value at `key`, or `None` if absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set `key` to `value`, overwriting any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// A fully independent deep copy of this node.
    ///
    /// Snapshots are what dependent functions receive: mutating a snapshot
    /// is never observable through the canonical node, this tick or any
    /// later tick. [`Value`] owns its whole structure, so the derived clone
    /// is already deep.
    pub fn snapshot(&self) -> StateNode {
        self.clone()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the node holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Snapshot every node in `handles`, preserving order.
pub fn snapshot_all(handles: &[&StateHandle]) -> Vec<StateNode> {
    handles.iter().map(|h| h.borrow().snapshot()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_existing_key() {
        let mut node = StateNode::new("physics.speed");
        node.set("lightspeed", 0.01);
        node.set("lightspeed", 0.02);
        assert_eq!(node.get("lightspeed"), Some(&Value::Float(0.02)));
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn get_missing_key_is_none() {
        let node = StateNode::new("a");
        assert_eq!(node.get("nope"), None);
    }

    #[test]
    fn snapshot_is_isolated_from_the_original() {
        let mut node = StateNode::new("a");
        node.set("xs", Value::List(vec![Value::Int(1)]));

        let mut snap = node.snapshot();
        snap.set("xs", Value::List(vec![Value::Int(99)]));
        snap.set("extra", 5i64);

        assert_eq!(node.get("xs"), Some(&Value::List(vec![Value::Int(1)])));
        assert_eq!(node.get("extra"), None);
    }

    #[test]
    fn snapshot_keeps_owner_path() {
        let node = StateNode::new("physics.time");
        assert_eq!(node.snapshot().path(), "physics.time");
    }

    #[test]
    fn snapshot_all_preserves_order() {
        let a = StateNode::new("a").into_shared();
        let b = StateNode::new("b").into_shared();
        a.borrow_mut().set("k", 1i64);
        b.borrow_mut().set("k", 2i64);

        let snaps = snapshot_all(&[&a, &b]);
        assert_eq!(snaps[0].path(), "a");
        assert_eq!(snaps[1].path(), "b");
    }
}
