/*!
Status hooks for an external inprocessor.

The techniques themselves (bounded clause elimination, equivalence substitution, purity) are the
business of whoever drives the engine; what lives here is the bookkeeping they rely on:

- Retiring an atom moves its status off `Active` --- permanently; compaction later reclaims the
  index.
- Clauses mentioning a retired atom are themselves retired, through the occurrence lists, with
  deletion events to the proof.
- Reconstruction-witness literals are recorded in the external database, where the import
  pipeline consults them.

The probe schedule for failed-literal probing also lives here: atoms queue up with a staleness
stamp, and re-probing is refused until new root units make it worthwhile.
*/

use crate::{
    context::GenericContext,
    db::atom::AtomStatus,
    misc::log::targets::{self},
    structures::{atom::Atom, literal::Literal},
};

impl<R: rand::Rng> GenericContext<R> {
    /// Marks the atom of an external variable as eliminated, retiring every clause it occurs in
    /// and recording the reconstruction witness.
    pub fn mark_eliminated(&mut self, var: i32, witness: &[i32]) {
        let atom = self.retire_atom(var, AtomStatus::Eliminated);
        self.counters.now.eliminated += 1;
        for elit in witness {
            self.external.mark_witness(*elit);
        }
        log::debug!(target: targets::ATOM_DB, "Eliminated atom {atom} (external {var})");
    }

    /// Marks the atom of an external variable as substituted, retiring every clause it occurs in
    /// and recording the reconstruction witness.
    pub fn mark_substituted(&mut self, var: i32, witness: &[i32]) {
        let atom = self.retire_atom(var, AtomStatus::Substituted);
        self.counters.now.substituted += 1;
        for elit in witness {
            self.external.mark_witness(*elit);
        }
        log::debug!(target: targets::ATOM_DB, "Substituted atom {atom} (external {var})");
    }

    /// Marks the atom of an external literal as pure, retiring the clauses the literal satisfies.
    ///
    /// Purity is the caller's claim: the negation must not occur in any live clause.
    pub fn mark_pure(&mut self, elit: i32) {
        let literal = self.internalize(elit);
        debug_assert!(self.atom_db.occurrences_of(literal.negate()).is_empty());
        let atom = self.retire_atom(elit.abs(), AtomStatus::Pure);
        self.counters.now.pure += 1;
        self.external.mark_witness(elit);
        log::debug!(target: targets::ATOM_DB, "Pure literal {elit} retired atom {atom}");
    }

    /// Common retirement: flag the atom, drop it from the activity heap, and retire its clauses.
    fn retire_atom(&mut self, var: i32, status: AtomStatus) -> Atom {
        debug_assert_eq!(self.trail.level(), 0);
        let literal = self.internalize(var);
        let atom = literal.atom();
        assert!(
            self.atom_db.status_of(atom).is_active(),
            "! Retiring a non-active atom"
        );
        assert!(!self.atom_db.frozen(atom), "! Retiring a frozen atom");

        // Both polarities: no live clause may mention a retired atom.
        for polarity in [true, false] {
            let occurrences = self
                .atom_db
                .occurrences_of(crate::structures::literal::CLiteral::fresh(atom, polarity))
                .to_vec();
            for key in occurrences {
                if self.clause_db.get(key).garbage() {
                    continue;
                }
                let id = self.clause_db.get(key).id();
                let literals = self.clause_db.get(key).literals().clone();
                self.proof_delete(id, &literals);
                self.clause_db.mark_garbage(key);
            }
        }
        // References shift on the sweep, so watches and occurrences rebuild now.
        self.collect_garbage();

        self.atom_db.set_status(atom, status);
        self.atom_db.activity.remove(atom as usize);
        atom
    }

    /// Schedules an atom for failed-literal probing, unless probing it is stale.
    pub fn schedule_probe(&mut self, var: i32) {
        let literal = self.internalize(var);
        if self.atom_db.probe_is_stale(literal, self.counters.fixed_total) {
            return;
        }
        self.trail.probes.push(literal.atom());
    }

    /// The next scheduled atom worth probing, stamped against the current fixed total.
    ///
    /// The returned external variable is for the prober; stale entries are discarded on the way.
    pub fn next_probe(&mut self) -> Option<i32> {
        while let Some(atom) = self.trail.probes.pop() {
            if !self.atom_db.status_of(atom).is_active() {
                continue;
            }
            let literal = crate::structures::literal::CLiteral::fresh(atom, true);
            if self.atom_db.probe_is_stale(literal, self.counters.fixed_total) {
                continue;
            }
            self.atom_db.note_probe(literal, self.counters.fixed_total);
            self.atom_db
                .note_probe(literal.negate(), self.counters.fixed_total);
            return Some(self.atom_db.external_of(atom));
        }
        None
    }
}
