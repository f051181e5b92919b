//! Reference routines for the Eddy simulation kernel.
//!
//! Small, reusable [`Routine`](eddy_core::Routine) implementations that
//! exercise the kernel contract: each mutates only its own state node and
//! reads other entities only through dependency snapshots.
//!
//! - [`Scale`] — compound growth/decay of one float key
//! - [`Ema`] — exponential moving average of a key read from a dependency
//! - [`Kalman1D`] — scalar predict/update filter over a noisy observation

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod ema;
mod kalman;
mod scale;

pub use ema::Ema;
pub use kalman::Kalman1D;
pub use scale::Scale;

use eddy_core::{RoutineError, StateNode};

/// Read a required float key from a node, with routine-grade errors.
fn require_f64(node: &StateNode, key: &str) -> Result<f64, RoutineError> {
    match node.get(key) {
        Some(value) => value.as_f64().ok_or(RoutineError::TypeMismatch {
            key: key.to_string(),
            expected: "float",
        }),
        None => Err(RoutineError::MissingKey { key: key.to_string() }),
    }
}

/// Read a required float key from the first dependency snapshot.
fn require_dep_f64(deps: &[StateNode], key: &str) -> Result<f64, RoutineError> {
    let first = deps.first().ok_or(RoutineError::Failed {
        reason: "routine requires at least one dependency".to_string(),
    })?;
    require_f64(first, key)
}
