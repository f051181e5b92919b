//! Compound multiplicative growth or decay of one key.

use eddy_core::{Routine, RoutineError, StateNode};

use crate::require_f64;

/// Multiplies one float key by a fixed factor every tick.
///
/// A factor above 1 compounds growth, below 1 decays. The key must be
/// seeded before the first tick; a missing or non-float key is a routine
/// error, not a silent default.
pub struct Scale {
    key: String,
    factor: f64,
}

impl Scale {
    /// Scale `key` by `factor` each tick.
    pub fn new(key: &str, factor: f64) -> Self {
        Self {
            key: key.to_string(),
            factor,
        }
    }
}

impl Routine for Scale {
    fn name(&self) -> &str {
        "scale"
    }

    fn step(&mut self, own: &mut StateNode, _deps: &[StateNode]) -> Result<(), RoutineError> {
        let value = require_f64(own, &self.key)?;
        own.set(self.key.clone(), value * self.factor);
        Ok(())
    }
}
