//! Strongly-typed tick counter.

use std::fmt;

/// Monotonically increasing tick counter.
///
/// Starts at 0 when an environment is created and is incremented by exactly
/// one each time the simulation advances one step. Never resets. A tick is a
/// discrete iteration of the environment, not a unit of wall-clock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// The tick that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_increments_by_one() {
        assert_eq!(TickId::default().next(), TickId(1));
        assert_eq!(TickId(41).next(), TickId(42));
    }
}
