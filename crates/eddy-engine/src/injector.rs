//! Injectors: buffered external writes applied once per tick.

use std::cell::RefCell;
use std::rc::Rc;

use eddy_core::{StateHandle, Value};

/// A deferred-write handle bound to one state node and one key.
///
/// External callers buffer a value with [`Injector::set`]; the environment
/// applies it at the end of the next tick, after all functions and probes
/// have run, then clears the buffer unconditionally. At most one value is
/// pending at a time — setting twice between ticks keeps only the last.
///
/// The handle is cheap to clone; the environment keeps one clone in its
/// injector table and the registering caller keeps another, sharing the
/// pending buffer.
#[derive(Clone)]
pub struct Injector {
    state: StateHandle,
    key: String,
    pending: Rc<RefCell<Option<Value>>>,
}

impl Injector {
    /// Bind an injector to `key` on the given node, with nothing pending.
    pub fn new(state: StateHandle, key: impl Into<String>) -> Self {
        Self {
            state,
            key: key.into(),
            pending: Rc::new(RefCell::new(None)),
        }
    }

    /// The injected key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Buffer `value` for application at the end of the next tick.
    pub fn set(&self, value: impl Into<Value>) {
        *self.pending.borrow_mut() = Some(value.into());
    }

    /// Whether a value is currently buffered.
    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Write the pending value (if any) to the bound key, then clear the
    /// buffer. Called by the environment at the end of every tick.
    pub fn apply(&self) {
        if let Some(value) = self.pending.borrow_mut().take() {
            self.state.borrow_mut().set(self.key.clone(), value);
        }
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("path", &self.state.borrow().path())
            .field("key", &self.key)
            .field("pending", &self.is_pending())
            .finish()
    }
}
