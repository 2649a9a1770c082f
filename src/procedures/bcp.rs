/*!
Boolean constraint propagation over the watch lists.

Propagation examines the watch list of the freshly falsified literal.
For each watching clause, in order of preference: the blocking literal witnesses satisfaction,
a replacement watch is found among the unwatched literals, the other watched literal is asserted,
or the clause conflicts with the valuation.

At the root an asserted literal is fixed forever, so the assertion is recorded as a *unit
clause*: a fresh identifier is derived for it, with a chain through the units which falsified the
rest of the clause, and the unit registry is updated under both the internal and the external
literal.
Above the root an assertion is an ordinary trail entry, and conflicts are handed back to the
caller --- analysis is the business of the embedding search loop.

# Invariant

The watched literals of a clause are its first two, and propagation maintains this: when a watch
moves, the replacement literal is swapped into the watched position.
*/

use crate::{
    context::GenericContext,
    db::{
        atom::{watch_db::Watch, AssignmentInfo, AtomStatus},
        ClauseId, ClauseRef,
    },
    misc::log::targets::{self},
    structures::literal::{CLiteral, Literal},
    types::err::{self},
};

impl<R: rand::Rng> GenericContext<R> {
    /// Fixes a literal at the root as a unit clause with the given identifier.
    ///
    /// The identifier is recorded in the unit registry under both the internal and the external
    /// literal, and the fixed-assignment callback is fed (lazily or not, per configuration).
    pub(crate) fn assign_unit(&mut self, id: ClauseId, literal: CLiteral) {
        debug_assert_eq!(self.trail.level(), 0);
        debug_assert_eq!(self.atom_db.value_of(literal), 0);
        log::debug!(target: targets::PROPAGATION, "Unit [{id}] {literal}");

        self.atom_db.set_value(literal);
        let position = self.trail.push(literal);

        let atom = literal.atom();
        self.atom_db.info[atom as usize] = AssignmentInfo {
            level: 0,
            trail_position: position as u32,
        };

        if self.atom_db.status_of(atom).is_active() {
            self.atom_db.set_status(atom, AtomStatus::Fixed);
            self.counters.now.fixed += 1;
            self.counters.fixed_total += 1;
            self.atom_db.activity.remove(atom as usize);
        }

        self.units.record_internal(literal, id);
        let elit = self.externalize(literal);
        self.units.record_external(elit, id);

        match self.config.lazy_fixed_notification.value {
            true => self.trail.notify_trail.push(literal),
            false => self.notify_fixed(literal),
        }
    }

    /// Processes every assignment beyond the propagation watermark.
    ///
    /// A root conflict derives the empty clause and settles unsatisfiability before the error is
    /// returned; above the root the conflict is the caller's to analyse.
    pub fn propagate(&mut self) -> Result<(), err::BCPError> {
        while self.trail.propagated < self.trail.assignments.len() {
            let literal = self.trail.assignments[self.trail.propagated];
            self.trail.propagated += 1;
            if let Err(e) = self.propagate_literal(literal) {
                if let err::BCPError::Conflict(key) = e {
                    self.counters.conflicts += 1;
                    if self.trail.level() == 0 {
                        self.note_root_conflict(key);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Examines the clauses watching the negation of a freshly true literal.
    fn propagate_literal(&mut self, literal: CLiteral) -> Result<(), err::BCPError> {
        let false_literal = literal.negate();
        let mut list = self.atom_db.take_watches(false_literal);
        let mut kept = Vec::with_capacity(list.len());

        let mut result = Ok(());
        let mut index = 0;

        'watches: while index < list.len() {
            let watch = list[index];
            index += 1;

            if self.atom_db.value_of(watch.blocker) > 0 {
                kept.push(watch);
                continue 'watches;
            }

            if watch.binary {
                // The blocker is the whole of the rest of the clause.
                match self.atom_db.value_of(watch.blocker) {
                    0 => {
                        kept.push(watch);
                        self.assert_literal(watch.blocker, watch.key);
                    }

                    _ => {
                        kept.push(watch);
                        result = Err(err::BCPError::Conflict(watch.key));
                        break 'watches;
                    }
                }
                continue 'watches;
            }

            // A long clause: look past the watched pair for a replacement.
            let clause = self.clause_db.get_mut(watch.key);
            let literals = clause.literals_mut();
            if literals[0] == false_literal {
                literals.swap(0, 1);
            }
            if literals[1] != false_literal {
                log::error!(target: targets::PROPAGATION, "Watched literal not in watched position");
                kept.push(watch);
                result = Err(err::BCPError::CorruptWatch);
                break 'watches;
            }

            let first = literals[0];
            if self.atom_db.value_of(first) > 0 {
                // Satisfied through the other watch; remember it as the blocker.
                kept.push(Watch::new(watch.key, first, false));
                continue 'watches;
            }

            let mut replacement = None;
            for slot in 2..literals.len() {
                if self.atom_db.value_of(literals[slot]) >= 0 {
                    replacement = Some(slot);
                    break;
                }
            }

            match replacement {
                Some(slot) => {
                    literals.swap(1, slot);
                    let moved_to = literals[1];
                    self.atom_db
                        .watch(moved_to, Watch::new(watch.key, first, false));
                    // The watch leaves this list.
                }

                None => match self.atom_db.value_of(first) {
                    0 => {
                        kept.push(watch);
                        self.assert_literal(first, watch.key);
                    }

                    _ => {
                        kept.push(watch);
                        result = Err(err::BCPError::Conflict(watch.key));
                        break 'watches;
                    }
                },
            }
        }

        // On a conflict the unprocessed suffix is restored untouched.
        kept.extend(list.drain(index..));
        self.atom_db.restore_watches(false_literal, kept);
        result
    }

    /// Records a literal asserted by the clause at `key`: a derived unit at the root, an
    /// ordinary trail entry above it.
    fn assert_literal(&mut self, literal: CLiteral, key: ClauseRef) {
        if self.trail.level() == 0 {
            self.derive_unit_from_clause(literal, key);
        } else {
            self.atom_db.set_value(literal);
            let position = self.trail.push(literal);
            self.atom_db.info[literal.atom() as usize] = AssignmentInfo {
                level: self.trail.level(),
                trail_position: position as u32,
            };
        }
    }

    /// Derives `literal` as a unit clause from the clause at `key`, whose other literals are all
    /// falsified at the root.
    fn derive_unit_from_clause(&mut self, literal: CLiteral, key: ClauseRef) {
        debug_assert!(self.scratch_chain.is_empty());
        if self.lrat() {
            let clause = self.clause_db.get(key);
            for other in clause.literals() {
                if *other == literal {
                    continue;
                }
                match self.units.id_for_internal(other.negate()) {
                    Some(uid) => self.scratch_chain.push(uid),
                    None => panic!("! No unit for falsified literal {other}"),
                }
            }
            self.scratch_chain.push(clause.id());
        }
        let unit_id = self.clause_db.fresh_id();
        self.proof_add_derived(unit_id, true, false, 1, &[literal]);
        self.assign_unit(unit_id, literal);
    }

    /// Derives the empty clause from a root conflict on the clause at `key`.
    fn note_root_conflict(&mut self, key: ClauseRef) {
        log::info!(target: targets::PROPAGATION, "Conflict at the root");
        debug_assert!(self.scratch_chain.is_empty());
        if self.lrat() {
            let clause = self.clause_db.get(key);
            for other in clause.literals() {
                match self.units.id_for_internal(other.negate()) {
                    Some(uid) => self.scratch_chain.push(uid),
                    None => panic!("! No unit for falsified literal {other}"),
                }
            }
            self.scratch_chain.push(clause.id());
        }
        let empty_id = self.clause_db.fresh_id();
        self.proof_add_derived(empty_id, true, false, 0, &[]);
        self.set_unsatisfiable();
    }
}
