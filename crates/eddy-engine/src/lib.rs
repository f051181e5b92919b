//! Tick orchestrator for the Eddy simulation kernel.
//!
//! [`Environment`] owns the two namespace registries (state nodes and
//! function records), the tick counter, the probe list, and the injector
//! table, and drives them with a single blocking [`Environment::tick`]
//! operation.
//!
//! # Tick order
//!
//! 1. Trace snapshot (if enabled) — before time advances
//! 2. Increment the tick counter
//! 3. Run every function, child-first over the function registry, each with
//!    its own canonical state node and deep snapshots of its dependencies
//! 4. Fire every probe, in registration order
//! 5. Apply every injector, in table order, clearing its pending value
//!
//! Execution is single-threaded and strictly sequential; a failure anywhere
//! aborts the remainder of the tick with no rollback of earlier mutations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod environment;
pub mod injector;
pub mod probe;
pub mod trace;

pub use environment::Environment;
pub use injector::Injector;
pub use probe::Probe;
pub use trace::{TraceWriter, UNSERIALIZABLE};
