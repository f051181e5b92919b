//! Test utilities and mock routines for Eddy development.
//!
//! Provides canned [`Routine`] implementations with predictable behavior
//! (constant writes, increments, scripted failure) and a [`Recorder`] for
//! capturing probe output in tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::rc::Rc;

use eddy_core::{Routine, RoutineError, StateNode, Value};

/// Routine that writes a fixed value to one key every tick.
pub struct ConstRoutine {
    name: String,
    key: String,
    value: Value,
}

impl ConstRoutine {
    pub fn new(name: &str, key: &str, value: impl Into<Value>) -> Self {
        Self {
            name: name.to_string(),
            key: key.to_string(),
            value: value.into(),
        }
    }
}

impl Routine for ConstRoutine {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, own: &mut StateNode, _deps: &[StateNode]) -> Result<(), RoutineError> {
        own.set(self.key.clone(), self.value.clone());
        Ok(())
    }
}

/// Routine that adds a fixed delta to one float key every tick.
///
/// A missing or non-float key counts as 0.0, so the routine can seed its
/// own state on the first tick.
pub struct IncrementRoutine {
    name: String,
    key: String,
    delta: f64,
}

impl IncrementRoutine {
    pub fn new(name: &str, key: &str, delta: f64) -> Self {
        Self {
            name: name.to_string(),
            key: key.to_string(),
            delta,
        }
    }
}

impl Routine for IncrementRoutine {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, own: &mut StateNode, _deps: &[StateNode]) -> Result<(), RoutineError> {
        let current = own.get(&self.key).and_then(Value::as_f64).unwrap_or(0.0);
        own.set(self.key.clone(), current + self.delta);
        Ok(())
    }
}

/// Routine that succeeds `succeed_count` times and then fails every tick.
pub struct FailingRoutine {
    name: String,
    remaining: usize,
}

impl FailingRoutine {
    pub fn new(name: &str, succeed_count: usize) -> Self {
        Self {
            name: name.to_string(),
            remaining: succeed_count,
        }
    }
}

impl Routine for FailingRoutine {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, _own: &mut StateNode, _deps: &[StateNode]) -> Result<(), RoutineError> {
        if self.remaining == 0 {
            return Err(RoutineError::Failed {
                reason: format!("{} failed as scripted", self.name),
            });
        }
        self.remaining -= 1;
        Ok(())
    }
}

/// Captures every value a probe callback receives.
///
/// ```
/// use eddy_test_utils::Recorder;
///
/// let recorder = Recorder::new();
/// let mut callback = recorder.callback();
/// callback(&1.5f64.into());
/// assert_eq!(recorder.values().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct Recorder {
    values: Rc<RefCell<Vec<Value>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A probe callback that appends every observed value.
    pub fn callback(&self) -> impl FnMut(&Value) + 'static {
        let sink = Rc::clone(&self.values);
        move |value: &Value| sink.borrow_mut().push(value.clone())
    }

    /// All values observed so far, in order.
    pub fn values(&self) -> Vec<Value> {
        self.values.borrow().clone()
    }

    /// The most recent value, if any.
    pub fn last(&self) -> Option<Value> {
        self.values.borrow().last().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_routine_counts_down() {
        let mut routine = FailingRoutine::new("flaky", 2);
        let mut own = StateNode::new("x");
        assert!(routine.step(&mut own, &[]).is_ok());
        assert!(routine.step(&mut own, &[]).is_ok());
        assert!(routine.step(&mut own, &[]).is_err());
        assert!(routine.step(&mut own, &[]).is_err());
    }

    #[test]
    fn increment_seeds_missing_key_from_zero() {
        let mut routine = IncrementRoutine::new("inc", "n", 2.5);
        let mut own = StateNode::new("x");
        routine.step(&mut own, &[]).unwrap();
        assert_eq!(own.get("n"), Some(&Value::Float(2.5)));
    }
}
