//! Process priority lookup.
//!
//! The arbiter does not track process lifecycles itself; it asks an
//! injected oracle for the priority of a pid whenever it has to compare two
//! processes. Priorities are integers where a strictly lower value denotes
//! strictly more important work.

use std::collections::HashMap;

/// Supplies the scheduling priority of a process on demand.
///
/// Implementations are queried concurrently from multiple service threads
/// and must be cheap; the arbiter calls the oracle several times per
/// reclamation sweep.
pub trait ProcessPriorityOracle: Send + Sync {
    /// Returns the priority of `pid`, or `None` when the pid is unknown or
    /// stale. Lower values are more important.
    fn priority(&self, pid: i32) -> Option<i32>;
}

/// A table-backed oracle with fixed priorities.
///
/// Useful for tests and for embedders that compute priorities out of band.
/// Pids absent from the table resolve to `None`.
#[derive(Debug, Clone, Default)]
pub struct FixedPriorityOracle {
    priorities: HashMap<i32, i32>,
}

impl FixedPriorityOracle {
    /// Creates an oracle with an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pid to the table, builder style.
    #[must_use]
    pub fn with_priority(mut self, pid: i32, priority: i32) -> Self {
        self.priorities.insert(pid, priority);
        self
    }

    /// Sets or replaces the priority of `pid`.
    pub fn set_priority(&mut self, pid: i32, priority: i32) {
        self.priorities.insert(pid, priority);
    }

    /// Removes `pid` from the table so lookups for it fail.
    pub fn forget(&mut self, pid: i32) {
        self.priorities.remove(&pid);
    }
}

impl ProcessPriorityOracle for FixedPriorityOracle {
    fn priority(&self, pid: i32) -> Option<i32> {
        self.priorities.get(&pid).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_oracle_lookup() {
        let oracle = FixedPriorityOracle::new()
            .with_priority(10, 10)
            .with_priority(20, 5);

        assert_eq!(oracle.priority(10), Some(10));
        assert_eq!(oracle.priority(20), Some(5));
        assert_eq!(oracle.priority(30), None);
    }

    #[test]
    fn test_fixed_oracle_forget() {
        let mut oracle = FixedPriorityOracle::new().with_priority(10, 10);
        oracle.forget(10);
        assert_eq!(oracle.priority(10), None);
    }
}
