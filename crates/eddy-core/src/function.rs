//! The routine contract and the function-registry record.

use smallvec::SmallVec;

use crate::error::RoutineError;
use crate::state::StateNode;

/// An update routine: the only mutator of simulation state.
///
/// Routines never call each other. Each tick, the orchestrator hands a
/// routine a mutable borrow of its own canonical state node plus deep
/// snapshots of every node matched by its dependency patterns, in pattern
/// order. The routine communicates solely by mutating `own`; the snapshots
/// are throwaway copies.
///
/// The `name` is an identifying label used in trace documents and error
/// reports, not an address — routines are addressed by their owner path.
pub trait Routine {
    /// Identifying name for traces and errors.
    fn name(&self) -> &str;

    /// Advance `own` by one tick, reading `deps` as needed.
    fn step(&mut self, own: &mut StateNode, deps: &[StateNode]) -> Result<(), RoutineError>;
}

/// Adapter wrapping a named closure as a [`Routine`].
///
/// ```
/// use eddy_core::{Routine, RoutineFn, StateNode, Value};
///
/// let mut double = RoutineFn::new("double", |own: &mut StateNode, _deps: &[StateNode]| {
///     let v = own.get("x").and_then(Value::as_f64).unwrap_or(0.0);
///     own.set("x", v * 2.0);
///     Ok(())
/// });
///
/// let mut own = StateNode::new("demo");
/// own.set("x", 3.0);
/// double.step(&mut own, &[]).unwrap();
/// assert_eq!(own.get("x"), Some(&Value::Float(6.0)));
/// ```
pub struct RoutineFn<F> {
    name: String,
    f: F,
}

impl<F> RoutineFn<F>
where
    F: FnMut(&mut StateNode, &[StateNode]) -> Result<(), RoutineError>,
{
    /// Wrap `f` under the given identifying name.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Routine for RoutineFn<F>
where
    F: FnMut(&mut StateNode, &[StateNode]) -> Result<(), RoutineError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, own: &mut StateNode, deps: &[StateNode]) -> Result<(), RoutineError> {
        (self.f)(own, deps)
    }
}

/// Registry entry binding a routine to its owner path and dependencies.
///
/// Dependency patterns are namespace paths, exact or prefix; their order is
/// preserved and fixes the order of the snapshots passed to the routine.
pub struct FunctionRecord {
    path: String,
    dependencies: SmallVec<[String; 4]>,
    routine: Box<dyn Routine>,
}

impl FunctionRecord {
    /// Bind `routine` to `path` with the given dependency patterns.
    pub fn new(
        routine: Box<dyn Routine>,
        path: impl Into<String>,
        dependencies: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            path: path.into(),
            dependencies: dependencies.into_iter().collect(),
            routine,
        }
    }

    /// The namespace path that owns this function and its state node.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The dependency patterns, in registration order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// The routine's identifying name.
    pub fn routine_name(&self) -> &str {
        self.routine.name()
    }

    /// Invoke the routine. Any routine error propagates unmodified; the
    /// record adds no handling of its own.
    pub fn invoke(
        &mut self,
        own: &mut StateNode,
        deps: &[StateNode],
    ) -> Result<(), RoutineError> {
        self.routine.step(own, deps)
    }
}

impl std::fmt::Debug for FunctionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRecord")
            .field("path", &self.path)
            .field("dependencies", &self.dependencies)
            .field("routine", &self.routine.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn invoke_forwards_to_the_routine() {
        let routine = RoutineFn::new("bump", |own: &mut StateNode, _: &[StateNode]| {
            let v = own.get("n").and_then(Value::as_i64).unwrap_or(0);
            own.set("n", v + 1);
            Ok(())
        });
        let mut record = FunctionRecord::new(Box::new(routine), "counter", Vec::new());
        let mut own = StateNode::new("counter");

        record.invoke(&mut own, &[]).unwrap();
        record.invoke(&mut own, &[]).unwrap();
        assert_eq!(own.get("n"), Some(&Value::Int(2)));
    }

    #[test]
    fn routine_errors_propagate_unmodified() {
        let routine = RoutineFn::new("broken", |_: &mut StateNode, _: &[StateNode]| {
            Err(RoutineError::Failed { reason: "kaboom".into() })
        });
        let mut record = FunctionRecord::new(Box::new(routine), "x", Vec::new());
        let mut own = StateNode::new("x");

        assert_eq!(
            record.invoke(&mut own, &[]),
            Err(RoutineError::Failed { reason: "kaboom".into() })
        );
    }

    #[test]
    fn dependency_order_is_preserved() {
        let routine = RoutineFn::new("noop", |_: &mut StateNode, _: &[StateNode]| Ok(()));
        let record = FunctionRecord::new(
            Box::new(routine),
            "c",
            vec!["b".to_string(), "a".to_string()],
        );
        assert_eq!(record.dependencies(), ["b", "a"]);
    }
}
