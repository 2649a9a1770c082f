/*!
The trail: assignments in the order they were made.

The prefix up to the first decision is the set of root-fixed literals.
`propagated` marks how far boolean constraint propagation has processed the trail; assignments
beyond the watermark are pending.

Two further trail-like vectors live here, both rewritten and shrunk by compaction:

- The *notification trail*, holding fixed literals not yet reported to the external
  fixed-assignment callback under lazy notification.
- The *probe schedule*, atoms queued for an external failed-literal prober.
*/

use crate::{
    db::LevelIndex,
    structures::{atom::Atom, literal::CLiteral},
};

/// The trail.
#[derive(Default)]
pub struct Trail {
    /// Assigned literals, in assignment order.
    pub assignments: Vec<CLiteral>,

    /// How far propagation has processed the trail.
    pub propagated: usize,

    /// The position on the trail at which each decision level starts.
    pub(crate) level_indices: Vec<usize>,

    /// Fixed literals awaiting lazy notification.
    pub notify_trail: Vec<CLiteral>,

    /// How far lazy notification has processed the notification trail.
    pub notified: usize,

    /// Atoms scheduled for failed-literal probing.
    pub probes: Vec<Atom>,
}

impl Trail {
    /// The current decision level.
    pub fn level(&self) -> LevelIndex {
        self.level_indices.len() as LevelIndex
    }

    /// A count of assignments.
    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// Records an assignment, returning its trail position.
    pub fn push(&mut self, literal: CLiteral) -> usize {
        self.assignments.push(literal);
        self.assignments.len() - 1
    }

    /// Opens a fresh decision level at the current trail length.
    pub fn new_level(&mut self) {
        self.level_indices.push(self.assignments.len());
    }

    /// Closes levels above `level`, returning the assignments made on them, most recent first.
    pub fn pop_levels(&mut self, level: LevelIndex) -> Vec<CLiteral> {
        let Some(&start) = self.level_indices.get(level as usize) else {
            return Vec::default();
        };
        self.level_indices.truncate(level as usize);
        let popped = self.assignments.split_off(start);
        self.propagated = self.propagated.min(self.assignments.len());
        popped.into_iter().rev().collect()
    }
}
