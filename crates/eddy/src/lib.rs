//! Eddy: a namespace-addressed discrete-step simulation kernel.
//!
//! An environment holds named, mutable state nodes and update routines,
//! both addressed by hierarchical dot-separated paths, and drives them with
//! a single `tick()` operation. Routines never call each other: each one
//! mutates only its own state node and reads other entities through deep
//! snapshots matched by its dependency patterns. Probes observe state
//! read-only once per tick; injectors buffer external writes that land at
//! the end of a tick.
//!
//! This facade crate re-exports the public API of the Eddy sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use eddy::prelude::*;
//!
//! let mut env = Environment::new();
//!
//! // Speed compounds by 1% per tick.
//! let grow = RoutineFn::new("grow", |own: &mut StateNode, _: &[StateNode]| {
//!     let v = own.get("lightspeed").and_then(Value::as_f64).unwrap_or(0.0);
//!     own.set("lightspeed", v * 1.01);
//!     Ok(())
//! });
//! let speed = env.add_function(Box::new(grow), "physics.speed", &[]);
//! speed.borrow_mut().set("lightspeed", 0.01);
//!
//! // Time dilation reads speed through a dependency snapshot.
//! let dilate = RoutineFn::new("dilate", |own: &mut StateNode, deps: &[StateNode]| {
//!     let v = deps[0].get("lightspeed").and_then(Value::as_f64).unwrap_or(0.0);
//!     own.set("second_length", 1.0 - v);
//!     Ok(())
//! });
//! env.add_function(Box::new(dilate), "physics.time", &["physics.speed"]);
//!
//! for _ in 0..10 {
//!     env.tick().unwrap();
//! }
//! assert_eq!(env.tick_id(), TickId(10));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `eddy-core` | Namespace tree, state nodes, routines, values, errors |
//! | [`engine`] | `eddy-engine` | `Environment`, probes, injectors, trace writer |
//! | [`routines`] | `eddy-routines` | Reference routines (scale, EMA, scalar Kalman) |
//! | [`graph`] | `eddy-graph` | Transition graph for demo/test code |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Namespace tree, state nodes, routines, values, and errors (`eddy-core`).
pub use eddy_core as types;

/// The environment orchestrator, probes, injectors, and tracing
/// (`eddy-engine`).
pub use eddy_engine as engine;

/// Attribute-weighted transition graph for demo and test code
/// (`eddy-graph`).
pub use eddy_graph as graph;

/// Reference routine implementations (`eddy-routines`).
pub use eddy_routines as routines;

/// Common imports for typical Eddy usage.
///
/// ```rust
/// use eddy::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use eddy_core::{
        FunctionRecord, Namespace, Routine, RoutineFn, StateHandle, StateNode, TickId, Value,
    };

    // Errors
    pub use eddy_core::{LookupError, RegisterError, RoutineError, TickError};

    // Engine
    pub use eddy_engine::{Environment, Injector, Probe, TraceWriter};

    // Reference routines
    pub use eddy_routines::{Ema, Kalman1D, Scale};
}
