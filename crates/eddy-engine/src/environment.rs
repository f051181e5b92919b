//! The simulation environment: registries, tick loop, and registration API.

use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, debug_span, trace};

use eddy_core::{
    snapshot_all, FunctionRecord, LookupError, Namespace, RegisterError, Routine, StateHandle,
    StateNode, TickError, TickId, Value,
};

use crate::injector::Injector;
use crate::probe::Probe;
use crate::trace::TraceWriter;

/// The global container for simulation state.
///
/// An `Environment` owns two parallel namespace registries — state nodes and
/// function records, always inserted at the same paths — plus the tick
/// counter, probe list, and injector table. [`Environment::tick`] advances
/// the whole simulation by one discrete step.
///
/// Functions never call each other. A function reads other entities only
/// through the deep snapshots the environment hands it, addressed by its
/// registered dependency patterns, and writes only its own state node. That
/// makes the traversal order of the function registry the sole source of
/// cross-entity read timing: a dependency that already ran this tick is seen
/// fresh, one that has not yet run is seen at last tick's value.
#[derive(Default)]
pub struct Environment {
    tick: TickId,
    state: Namespace<StateHandle>,
    functions: Namespace<FunctionRecord>,
    probes: Vec<Probe>,
    injectors: IndexMap<String, Injector>,
    trace: Option<TraceWriter>,
}

impl Environment {
    /// Create an empty environment at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current tick. Starts at 0 and grows by exactly one per
    /// [`Environment::tick`] call; never resets.
    pub fn tick_id(&self) -> TickId {
        self.tick
    }

    /// Handle to the state node registered exactly at `path`, if any.
    ///
    /// A read-side convenience for tests and demo code; routines must go
    /// through their dependency snapshots instead.
    pub fn state(&self, path: &str) -> Option<StateHandle> {
        self.state.lookup_exact(path).ok().flatten().map(Rc::clone)
    }

    // ── Registration ─────────────────────────────────────────────

    /// Register `routine` at `path` with the given dependency patterns.
    ///
    /// Creates an empty state node at the same path and returns its handle
    /// so setup code can seed initial values. Dependency patterns are
    /// namespace paths, exact (`physics.speed`) or prefix (`physics`);
    /// their order fixes the order of snapshots passed to the routine.
    ///
    /// Registering twice at one path silently replaces both the function
    /// and the state node — a trie property, not a feature. Callers must
    /// avoid path collisions.
    pub fn add_function(
        &mut self,
        routine: Box<dyn Routine>,
        path: &str,
        dependencies: &[&str],
    ) -> StateHandle {
        debug!(path, routine = routine.name(), "registering function");
        let handle = StateNode::new(path).into_shared();
        self.state.insert(path, Rc::clone(&handle));
        let deps = dependencies.iter().map(|d| d.to_string());
        self.functions
            .insert(path, FunctionRecord::new(routine, path, deps));
        handle
    }

    /// Register a read-only probe on `key` of the node at `path`.
    ///
    /// The path must resolve to exactly one state node and the key must be
    /// present in that node's current values. The callback fires once per
    /// tick, after all functions have run.
    pub fn add_probe(
        &mut self,
        path: &str,
        key: &str,
        callback: impl FnMut(&Value) + 'static,
    ) -> Result<(), RegisterError> {
        let handle = self.resolve_single(path)?;
        require_key(&handle, path, key)?;
        debug!(path, key, "registering probe");
        self.probes.push(Probe::new(handle, key, Box::new(callback)));
        Ok(())
    }

    /// Register an injector on `key` of the node at `path`.
    ///
    /// Resolution and validation are identical to [`Environment::add_probe`].
    /// The returned handle's only mutating operation is [`Injector::set`];
    /// the buffered value is applied at the end of the next tick. The
    /// environment keeps the injector under the composite key
    /// `"{path}.{key}"`, so registering the same pair twice replaces the
    /// table entry.
    pub fn add_injector(&mut self, path: &str, key: &str) -> Result<Injector, RegisterError> {
        let handle = self.resolve_single(path)?;
        require_key(&handle, path, key)?;
        debug!(path, key, "registering injector");
        let injector = Injector::new(handle, key);
        self.injectors
            .insert(format!("{path}.{key}"), injector.clone());
        Ok(injector)
    }

    /// Resolve a probe/injector target: subtree match, exactly one node.
    fn resolve_single(&self, path: &str) -> Result<StateHandle, RegisterError> {
        let matches = match self.state.collect(path) {
            Ok(handles) => handles,
            Err(LookupError::NotFound { .. }) => Vec::new(),
        };
        match matches.as_slice() {
            [one] => Ok(Rc::clone(one)),
            [] => Err(RegisterError::MissingTarget { path: path.to_string() }),
            many => Err(RegisterError::AmbiguousTarget {
                path: path.to_string(),
                count: many.len(),
            }),
        }
    }

    // ── Tracing ──────────────────────────────────────────────────

    /// Enable trace emission into `dir`: one JSON document per tick,
    /// written before the tick body runs.
    pub fn start_trace(&mut self, dir: impl Into<PathBuf>) -> io::Result<()> {
        self.trace = Some(TraceWriter::new(dir)?);
        Ok(())
    }

    /// Disable trace emission.
    pub fn stop_trace(&mut self) {
        self.trace = None;
    }

    /// Whether trace emission is enabled.
    pub fn trace_enabled(&self) -> bool {
        self.trace.is_some()
    }

    // ── Tick ─────────────────────────────────────────────────────

    /// Advance the environment by one discrete step.
    ///
    /// Order within a tick:
    /// 1. trace snapshot (if enabled) of the pre-tick registries
    /// 2. increment the tick counter
    /// 3. run every function, child-first over the function registry: fetch
    ///    its own canonical node (must be exactly one), snapshot every node
    ///    matched by its dependency patterns, invoke
    /// 4. fire every probe in registration order
    /// 5. apply every injector in table order, clearing its pending value
    ///
    /// Any failure aborts the remainder of the tick and propagates; state
    /// mutated earlier in the tick keeps its new values (no rollback).
    pub fn tick(&mut self) -> Result<TickId, TickError> {
        if let Some(writer) = &self.trace {
            writer
                .write(self.tick, &self.state, &self.functions)
                .map_err(TickError::Trace)?;
        }

        self.tick = self.tick.next();
        let _span = debug_span!("tick", id = self.tick.0).entered();

        let state = &self.state;
        for record in self.functions.items_mut() {
            let path = record.path().to_string();
            let routine = record.routine_name().to_string();

            // Owner must resolve to exactly one node. The registry invariant
            // makes duplicates impossible, but the check stays.
            let owners = match state.collect(&path) {
                Ok(handles) => handles,
                Err(LookupError::NotFound { .. }) => Vec::new(),
            };
            let own = match owners.as_slice() {
                [one] => Rc::clone(one),
                other => {
                    return Err(TickError::AmbiguousOrMissingOwner {
                        path,
                        count: other.len(),
                    })
                }
            };

            // Snapshot dependencies: pattern order outer, traversal order
            // inner. Snapshots are deep copies; the routine can do anything
            // to them without touching the canonical nodes.
            let mut deps: Vec<StateNode> = Vec::new();
            for pattern in record.dependencies() {
                let matched = state.collect(pattern)?;
                deps.extend(snapshot_all(&matched));
            }

            trace!(path = %path, routine = %routine, deps = deps.len(), "invoking");
            let mut own_node = own.borrow_mut();
            if let Err(source) = record.invoke(&mut own_node, &deps) {
                return Err(TickError::Routine { path, routine, source });
            }
        }

        for probe in &mut self.probes {
            probe.fire();
        }

        for injector in self.injectors.values() {
            injector.apply();
        }

        Ok(self.tick)
    }
}

/// Registration-time check that `key` exists on the target node.
fn require_key(handle: &StateHandle, path: &str, key: &str) -> Result<(), RegisterError> {
    if handle.borrow().get(key).is_none() {
        return Err(RegisterError::KeyNotFound {
            path: path.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}
