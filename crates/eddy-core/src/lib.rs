//! Core types for the Eddy simulation kernel.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! fundamental abstractions used throughout the Eddy workspace:
//!
//! - [`Namespace`] — the hierarchical prefix tree that addresses everything
//!   in a simulation by dot-separated path (`physics.speed`)
//! - [`StateNode`] / [`StateHandle`] — the mutable key/value container owned
//!   by exactly one namespace path
//! - [`Routine`] / [`FunctionRecord`] — the update-function contract and the
//!   registry entry binding a routine to its path and dependency patterns
//! - [`Value`] — the dynamic value type stored under state keys
//! - the error enums ([`LookupError`], [`RegisterError`], [`RoutineError`],
//!   [`TickError`])
//!
//! The orchestrator that drives these types lives in `eddy-engine`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod function;
pub mod id;
pub mod namespace;
pub mod state;
pub mod value;

pub use error::{LookupError, RegisterError, RoutineError, TickError};
pub use function::{FunctionRecord, Routine, RoutineFn};
pub use id::TickId;
pub use namespace::Namespace;
pub use state::{snapshot_all, StateHandle, StateNode};
pub use value::Value;
