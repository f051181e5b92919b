//! Scalar Kalman filter over a noisy observation key.

use eddy_core::{Routine, RoutineError, StateNode, Value};

use crate::{require_dep_f64, require_f64};

/// One-dimensional Kalman filter tracking a noisy scalar signal.
///
/// Reads the observation from the first dependency snapshot and keeps its
/// estimate and error variance in its own state node:
///
/// ```text
/// predict:  variance += process_noise
/// gain:     k = variance / (variance + measurement_noise)
/// update:   estimate += k * (observation - estimate)
///           variance *= 1 - k
/// ```
///
/// The `estimate` key is seeded from the first observation if absent;
/// `variance` must be seeded by setup code (it encodes prior confidence).
pub struct Kalman1D {
    observation_key: String,
    process_noise: f64,
    measurement_noise: f64,
}

/// Key under which the filter keeps its running estimate.
pub const ESTIMATE_KEY: &str = "estimate";
/// Key under which the filter keeps its error variance.
pub const VARIANCE_KEY: &str = "variance";

impl Kalman1D {
    /// Track `observation_key` from the first dependency with the given
    /// noise parameters.
    pub fn new(observation_key: &str, process_noise: f64, measurement_noise: f64) -> Self {
        Self {
            observation_key: observation_key.to_string(),
            process_noise,
            measurement_noise,
        }
    }
}

impl Routine for Kalman1D {
    fn name(&self) -> &str {
        "kalman1d"
    }

    fn step(&mut self, own: &mut StateNode, deps: &[StateNode]) -> Result<(), RoutineError> {
        let observation = require_dep_f64(deps, &self.observation_key)?;
        let mut variance = require_f64(own, VARIANCE_KEY)?;

        let estimate = match own.get(ESTIMATE_KEY).and_then(Value::as_f64) {
            Some(estimate) => {
                variance += self.process_noise;
                let gain = variance / (variance + self.measurement_noise);
                variance *= 1.0 - gain;
                estimate + gain * (observation - estimate)
            }
            None => observation,
        };

        own.set(ESTIMATE_KEY, estimate);
        own.set(VARIANCE_KEY, variance);
        Ok(())
    }
}
