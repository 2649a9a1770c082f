/*!
The external database: the stable face of the variable domain.

External variables are the names an embedder speaks: positive [i32]s, never renumbered.
Internally each external variable maps to a literal over a compactable atom --- usually the
positive literal of a dedicated atom, though after compaction every root-fixed external variable
shares the one surrogate atom, with polarity recording its value.

A mapping of `None` means the external variable currently has no internal image: either it was
never used, or its atom was retired (eliminated, substituted, pure) and compacted away.

The database also holds what must be replayed through the map when the map is rewritten: the
assumption stack and the optional constraint, plus the reconstruction-witness marks consulted by
the import pipeline.
*/

use crate::{
    misc::log::targets::{self},
    structures::literal::{CLiteral, Literal},
};

/// The index of a signed external literal in a two-sided table.
fn elit_index(elit: i32) -> usize {
    debug_assert!(elit != 0 && elit != i32::MIN);
    ((elit.unsigned_abs() as usize) << 1) | ((elit < 0) as usize)
}

/// The external database.
pub struct ExternalDB {
    /// The greatest external variable seen.
    max_var: i32,

    /// The internal literal of each external variable.
    e2i: Vec<Option<CLiteral>>,

    /// Which external literals are reconstruction witnesses of retired clauses.
    witness: Vec<bool>,

    /// The assumption stack, as given.
    pub(crate) assumptions: Vec<i32>,

    /// The optional constraint clause, as given.
    pub(crate) constraint: Vec<i32>,
}

impl Default for ExternalDB {
    fn default() -> Self {
        ExternalDB {
            max_var: 0,
            e2i: vec![None; 1],
            witness: vec![false; 2],
            assumptions: Vec::default(),
            constraint: Vec::default(),
        }
    }
}

impl ExternalDB {
    /// The greatest external variable seen.
    pub fn max_var(&self) -> i32 {
        self.max_var
    }

    /// Ensures tables cover external variables up to and including `var`.
    pub fn reserve(&mut self, var: i32) {
        debug_assert!(var > 0);
        if var > self.max_var {
            self.max_var = var;
            self.e2i.resize(var as usize + 1, None);
            self.witness.resize(2 * (var as usize + 1), false);
        }
    }

    /// The external variables introduced so far.
    pub fn vars(&self) -> impl Iterator<Item = i32> {
        1..=self.max_var
    }

    /// The internal literal of an external variable, if any.
    pub fn mapping(&self, var: i32) -> Option<CLiteral> {
        debug_assert!(var > 0);
        self.e2i.get(var as usize).copied().flatten()
    }

    /// Installs (or clears) the internal literal of an external variable.
    pub fn set_mapping(&mut self, var: i32, literal: Option<CLiteral>) {
        log::trace!(target: targets::ATOM_DB, "External {var} maps to {literal:?}");
        self.e2i[var as usize] = literal;
    }

    /// The internal literal of a signed external literal, if the variable has an image.
    pub fn map_literal(&self, elit: i32) -> Option<CLiteral> {
        let mapped = self.mapping(elit.abs())?;
        match elit > 0 {
            true => Some(mapped),
            false => Some(mapped.negate()),
        }
    }

    /// Marks a signed external literal as a reconstruction witness.
    pub fn mark_witness(&mut self, elit: i32) {
        self.reserve(elit.abs());
        self.witness[elit_index(elit)] = true;
    }

    /// Whether a signed external literal is marked as a reconstruction witness.
    pub fn is_witness(&self, elit: i32) -> bool {
        self.witness.get(elit_index(elit)).copied().unwrap_or(false)
    }
}
