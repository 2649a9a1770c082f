/*!
The unit registry: for every fixed literal, the clause which proved it.

When a literal is fixed at the root the identifier of the responsible unit clause is recorded
twice:

- Under the *internal* literal, for fast lookup while building chains inside the engine --- e.g.
  when garbage collection strengthens falsified literals out of a clause.
- Under the *external* literal, so that compaction, which rewrites internal indices and collapses
  fixed atoms onto a surrogate, cannot destroy the mapping needed when building chains for
  incoming shared clauses.

For a fixed literal exactly one of the two polarities of its atom holds an identifier.
The internal side is a derived cache: compaction rebuilds it, while external entries are adopted
before the internal table is disturbed and survive every remap.
*/

use crate::{
    db::{ClauseId, NO_CLAUSE_ID},
    generic::lit_vec::LitVec,
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
};

/// The index of a signed external literal in the external table.
fn elit_index(elit: i32) -> usize {
    debug_assert!(elit != 0 && elit != i32::MIN);
    ((elit.unsigned_abs() as usize) << 1) | ((elit < 0) as usize)
}

/// The unit registry.
#[derive(Default)]
pub struct UnitDB {
    /// Identifiers by internal literal.
    pub(crate) internal: LitVec<ClauseId>,

    /// Identifiers by external literal.
    pub(crate) external: Vec<ClauseId>,
}

impl UnitDB {
    /// Ensures the internal table covers atoms up to and including `atom`.
    pub fn grow_internal(&mut self, atom: Atom) {
        self.internal.grow_for(atom);
    }

    /// Ensures the external table covers external variables up to and including `var`.
    pub fn grow_external(&mut self, var: i32) {
        debug_assert!(var > 0);
        let required = 2 * (var as usize + 1);
        if self.external.len() < required {
            self.external.resize(required, NO_CLAUSE_ID);
        }
    }

    /// Records `id` as the clause proving the internal literal.
    pub fn record_internal(&mut self, literal: CLiteral, id: ClauseId) {
        debug_assert_eq!(self.internal[literal.negate()], NO_CLAUSE_ID);
        self.internal[literal] = id;
    }

    /// Records `id` as the clause proving the external literal, keeping the first record if the
    /// literal is re-derived.
    pub fn record_external(&mut self, elit: i32, id: ClauseId) {
        self.grow_external(elit.abs());
        let index = elit_index(elit);
        if self.external[index] == NO_CLAUSE_ID {
            self.external[index] = id;
        }
    }

    /// The identifier proving the internal literal, if recorded.
    pub fn id_for_internal(&self, literal: CLiteral) -> Option<ClauseId> {
        match self.internal[literal] {
            NO_CLAUSE_ID => None,
            id => Some(id),
        }
    }

    /// The identifier proving the external literal, if recorded.
    pub fn id_for_external(&self, elit: i32) -> Option<ClauseId> {
        match self.external.get(elit_index(elit)).copied() {
            None | Some(NO_CLAUSE_ID) => None,
            Some(id) => Some(id),
        }
    }

    /// The external entries for both polarities of an external variable.
    pub(crate) fn external_pair(&self, var: i32) -> (ClauseId, ClauseId) {
        let index = elit_index(var);
        match self.external.get(index) {
            Some(_) => (self.external[index], self.external[index + 1]),
            None => (NO_CLAUSE_ID, NO_CLAUSE_ID),
        }
    }

    /// Sets the external entries for both polarities of an external variable.
    pub(crate) fn set_external_pair(&mut self, var: i32, positive: ClauseId, negative: ClauseId) {
        self.grow_external(var);
        let index = elit_index(var);
        self.external[index] = positive;
        self.external[index + 1] = negative;
    }
}
