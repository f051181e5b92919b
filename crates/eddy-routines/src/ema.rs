//! Exponential moving average over a dependency's key.

use eddy_core::{Routine, RoutineError, StateNode};

use crate::require_dep_f64;

/// Tracks an exponential moving average of a key read from the first
/// dependency snapshot.
///
/// Each tick:
///
/// ```text
/// own[key] = (1 - alpha) * own[key] + alpha * dep[source_key]
/// ```
///
/// On the first tick (own key absent) the average is seeded directly from
/// the observation.
pub struct Ema {
    key: String,
    source_key: String,
    alpha: f64,
}

impl Ema {
    /// Smooth `source_key` from the first dependency into own `key` with
    /// smoothing factor `alpha` in `(0, 1]`.
    pub fn new(key: &str, source_key: &str, alpha: f64) -> Self {
        Self {
            key: key.to_string(),
            source_key: source_key.to_string(),
            alpha,
        }
    }
}

impl Routine for Ema {
    fn name(&self) -> &str {
        "ema"
    }

    fn step(&mut self, own: &mut StateNode, deps: &[StateNode]) -> Result<(), RoutineError> {
        let observed = require_dep_f64(deps, &self.source_key)?;
        let next = match own.get(&self.key).and_then(|v| v.as_f64()) {
            Some(current) => (1.0 - self.alpha) * current + self.alpha * observed,
            None => observed,
        };
        own.set(self.key.clone(), next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eddy_core::Value;

    fn dep_with(key: &str, value: f64) -> StateNode {
        let mut node = StateNode::new("src");
        node.set(key, value);
        node
    }

    #[test]
    fn seeds_from_first_observation() {
        let mut routine = Ema::new("avg", "x", 0.5);
        let mut own = StateNode::new("smooth");
        routine.step(&mut own, &[dep_with("x", 10.0)]).unwrap();
        assert_eq!(own.get("avg"), Some(&Value::Float(10.0)));
    }

    #[test]
    fn converges_toward_a_constant_signal() {
        let mut routine = Ema::new("avg", "x", 0.5);
        let mut own = StateNode::new("smooth");
        own.set("avg", 0.0);

        for _ in 0..20 {
            routine.step(&mut own, &[dep_with("x", 4.0)]).unwrap();
        }
        let avg = own.get("avg").unwrap().as_f64().unwrap();
        assert!((avg - 4.0).abs() < 1e-4);
    }

    #[test]
    fn no_dependencies_is_an_error() {
        let mut routine = Ema::new("avg", "x", 0.5);
        let mut own = StateNode::new("smooth");
        assert!(matches!(
            routine.step(&mut own, &[]),
            Err(RoutineError::Failed { .. })
        ));
    }
}
