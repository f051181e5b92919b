//! Probes: read-only external observation of state.

use eddy_core::{StateHandle, Value};

/// A registered observer bound to one state node and one key.
///
/// Probes are the outlet for external applications to watch internal
/// simulation state. Each probe fires once per tick, after all functions
/// have run, receiving the key's current value. Probes never mutate any
/// node; they read the canonical node directly, which is safe because they
/// only run outside the function-invocation window.
pub struct Probe {
    state: StateHandle,
    key: String,
    callback: Box<dyn FnMut(&Value)>,
}

impl Probe {
    /// Bind a callback to `key` on the given node.
    pub fn new(state: StateHandle, key: impl Into<String>, callback: Box<dyn FnMut(&Value)>) -> Self {
        Self {
            state,
            key: key.into(),
            callback,
        }
    }

    /// The observed key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the bound key and pass its value to the callback.
    ///
    /// Registration validated that the key existed, and keys are never
    /// deleted, so in practice the value is always present. A missing key is
    /// still tolerated by skipping the callback.
    pub fn fire(&mut self) {
        let node = self.state.borrow();
        if let Some(value) = node.get(&self.key) {
            (self.callback)(value);
        }
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe")
            .field("path", &self.state.borrow().path())
            .field("key", &self.key)
            .finish()
    }
}
