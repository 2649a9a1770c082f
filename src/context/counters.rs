//! Counters related to a context/solve.

/// Counts of atoms currently holding each inactive status.
///
/// Maintained on every status transition and reset by compaction, which retires the counted
/// indices (keeping at most the one fixed surrogate).
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusCounts {
    pub fixed: u32,
    pub eliminated: u32,
    pub substituted: u32,
    pub pure: u32,
}

impl StatusCounts {
    /// A count of atoms holding any inactive status.
    pub fn inactive(&self) -> u32 {
        self.fixed + self.eliminated + self.substituted + self.pure
    }
}

/// Counters over the import pipeline.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImportCounters {
    /// Clauses installed, as units or otherwise.
    pub imported: u64,

    /// Clauses discarded, for any reason.
    pub discarded: u64,

    /// Rejections due to a reconstruction-witness literal.
    pub r_wit: u64,

    /// Rejections due to an eliminated, substituted, or pure literal.
    pub r_el: u64,

    /// Rejections due to a fixed literal (a true literal, or a clause emptied by false ones).
    pub r_fx: u64,
}

/// Counters related to a context/solve.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counters {
    /// Conflicts observed, the clock against which compaction is scheduled.
    pub conflicts: u64,

    /// Compaction runs completed.
    pub compacts: u64,

    /// The conflict count at which compaction is next eligible.
    pub lim_compact: u64,

    /// Atoms ever fixed at the root, the clock for probe staleness.
    pub fixed_total: u64,

    /// Atoms currently holding each inactive status.
    pub now: StatusCounts,

    /// Counters over the import pipeline.
    pub import: ImportCounters,

    /// Derivations handed to the proof bus.
    pub produced_clauses: u64,

    /// Atoms with a target phase, adjusted when compaction shrinks the phase arrays.
    pub target_assigned: usize,

    /// Atoms with a best phase, adjusted when compaction shrinks the phase arrays.
    pub best_assigned: usize,
}
