/*!
Databases for holding information relevant to a solve.

- [The clause database](crate::db::clause)
  + Clauses of two or more literals, each under a stable 64-bit identifier.
    Unit clauses are not stored: a unit lives on the trail, and its identifier in the
    [unit registry](crate::db::units).
- [The atom database](crate::db::atom)
  + Per-atom and per-literal state: status flags, values, phases, watch and occurrence lists, the
    decision queue, and the activity heap.
- [The external database](crate::db::external)
  + The bidirectional map between stable external variables and compactable internal atoms,
    along with witness marks, assumptions, and the optional constraint.
- [The unit registry](crate::db::units)
  + For every literal fixed at the root, the identifier of the unit clause which proved it.
- [The trail](crate::db::trail)
  + Assignments in order, with the propagation watermark, the notification trail, and the probe
    schedule.
*/

pub mod atom;
pub mod clause;
pub mod external;
mod keys;
pub mod trail;
pub mod units;

pub use keys::*;

/// The index of a decision level.
pub type LevelIndex = u32;
