//! Error types for the Eddy simulation kernel.
//!
//! One enum per subsystem: namespace lookup, probe/injector registration,
//! routine execution, and the tick loop. Every fatal condition maps to an
//! explicit variant so callers can distinguish a missing path from a failing
//! routine programmatically. Nothing is retried and nothing is rolled back:
//! errors propagate out of the operation that triggered them.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors from namespace path resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupError {
    /// A segment of the path does not exist in the tree.
    NotFound {
        /// The full path that failed to resolve.
        path: String,
    },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "namespace path '{path}' not found"),
        }
    }
}

impl Error for LookupError {}

/// Errors from probe and injector registration.
///
/// Both registrations resolve their target by subtree match and require
/// exactly one state node, then require the key to be present in that node's
/// current values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegisterError {
    /// The path resolved to no state node.
    MissingTarget {
        /// The path that matched nothing.
        path: String,
    },
    /// The path resolved to more than one state node; probes and injectors
    /// target exactly one.
    AmbiguousTarget {
        /// The path that matched several nodes.
        path: String,
        /// How many nodes it matched.
        count: usize,
    },
    /// The key is absent from the target node's current values.
    KeyNotFound {
        /// The resolved node's path.
        path: String,
        /// The missing key.
        key: String,
    },
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTarget { path } => {
                write!(f, "no state node at '{path}'")
            }
            Self::AmbiguousTarget { path, count } => {
                write!(f, "'{path}' matches {count} state nodes, expected exactly one")
            }
            Self::KeyNotFound { path, key } => {
                write!(f, "state node '{path}' has no key '{key}'")
            }
        }
    }
}

impl Error for RegisterError {}

/// Errors returned by routine bodies.
///
/// Routines are the only mutators of simulation state; when one fails, the
/// kernel wraps the error in [`TickError::Routine`] and aborts the tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutineError {
    /// The routine failed for a reason of its own.
    Failed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A key the routine requires is absent.
    MissingKey {
        /// The missing key.
        key: String,
    },
    /// A key held a value of the wrong variant.
    TypeMismatch {
        /// The offending key.
        key: String,
        /// The variant the routine expected.
        expected: &'static str,
    },
}

impl fmt::Display for RoutineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "routine failed: {reason}"),
            Self::MissingKey { key } => write!(f, "required key '{key}' is absent"),
            Self::TypeMismatch { key, expected } => {
                write!(f, "key '{key}' is not a {expected}")
            }
        }
    }
}

impl Error for RoutineError {}

/// Errors from `Environment::tick()`.
///
/// A tick error aborts the remainder of the tick. State nodes mutated by
/// routines that ran earlier in the same tick keep their new values — there
/// is no rollback.
#[derive(Debug)]
pub enum TickError {
    /// A function's owner path resolved to zero or several state nodes.
    ///
    /// The registry invariant (one node per path) makes "several" impossible
    /// by construction, but the tick loop still checks.
    AmbiguousOrMissingOwner {
        /// The function's owner path.
        path: String,
        /// How many state nodes the path matched.
        count: usize,
    },
    /// A dependency pattern named a path that does not exist.
    Lookup(LookupError),
    /// A routine raised during invocation.
    Routine {
        /// The owner path of the failing function.
        path: String,
        /// The routine's identifying name.
        routine: String,
        /// The routine's own error, propagated unmodified.
        source: RoutineError,
    },
    /// Writing the trace document failed.
    Trace(io::Error),
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousOrMissingOwner { path, count } => {
                write!(f, "expected exactly one state node at '{path}', found {count}")
            }
            Self::Lookup(e) => write!(f, "dependency lookup failed: {e}"),
            Self::Routine { path, routine, source } => {
                write!(f, "routine '{routine}' at '{path}' failed: {source}")
            }
            Self::Trace(e) => write!(f, "trace write failed: {e}"),
        }
    }
}

impl Error for TickError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lookup(e) => Some(e),
            Self::Routine { source, .. } => Some(source),
            Self::Trace(e) => Some(e),
            Self::AmbiguousOrMissingOwner { .. } => None,
        }
    }
}

impl From<LookupError> for TickError {
    fn from(e: LookupError) -> Self {
        Self::Lookup(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_error_chains_routine_source() {
        let err = TickError::Routine {
            path: "a.b".into(),
            routine: "decay".into(),
            source: RoutineError::MissingKey { key: "x".into() },
        };
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "required key 'x' is absent");
    }

    #[test]
    fn display_messages_name_the_path() {
        let err = TickError::AmbiguousOrMissingOwner {
            path: "physics.speed".into(),
            count: 0,
        };
        assert!(err.to_string().contains("physics.speed"));
    }
}
