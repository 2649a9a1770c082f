/*!
Garbage collection: the clause database is quiesced against the root valuation.

Three things happen, in order:

1. Every clause satisfied at the root is marked garbage, with a deletion event to the proof.
2. Every surviving clause containing a root-falsified literal is strengthened: the falsified
   literals are dropped, the strengthened clause is reported as a derivation whose chain runs
   through the responsible units and the old clause, the old clause is deleted from the proof,
   and the stored clause adopts the fresh identifier.
3. Garbage is swept from the database and the watch, occurrence, and binary-implication
   structures are rebuilt from the survivors.

Collection assumes propagation is quiesced: a clause with exactly one unfalsified literal would
have propagated, making it root-satisfied.
Compaction runs collection first, and assumes its input is collection-quiesced.
*/

use crate::{
    context::GenericContext,
    db::{atom::watch_db::Watch, ClauseRef},
    misc::log::targets::{self},
    structures::literal::{CLiteral, Literal},
};

impl<R: rand::Rng> GenericContext<R> {
    /// Quiesces the clause database against the root valuation.
    pub fn collect_garbage(&mut self) {
        debug_assert_eq!(self.trail.level(), 0);
        debug_assert_eq!(self.trail.propagated, self.trail.assignments.len());

        self.atom_db.watching = false;
        let lrat = self.lrat();
        let count = self.clause_db.count();

        for index in 0..count {
            let key = index as ClauseRef;
            if self.clause_db.get(key).garbage() {
                continue;
            }

            let mut satisfied = false;
            let mut falsified = false;
            for literal in self.clause_db.get(key).literals() {
                match self.atom_db.value_of(*literal) {
                    value if value > 0 => {
                        satisfied = true;
                        break;
                    }
                    value if value < 0 => falsified = true,
                    _ => {}
                }
            }

            if satisfied {
                let id = self.clause_db.get(key).id();
                let literals = self.clause_db.get(key).literals().clone();
                self.proof_delete(id, &literals);
                self.clause_db.mark_garbage(key);
                continue;
            }

            if falsified {
                self.strengthen_against_root(key, lrat);
            }
        }

        self.clause_db.sweep();
        self.rebuild_watches();
        self.atom_db.watching = true;
    }

    /// Drops root-falsified literals from the clause at `key`, tracing the derivation.
    fn strengthen_against_root(&mut self, key: ClauseRef, lrat: bool) {
        debug_assert!(self.scratch_chain.is_empty());

        let old_id = self.clause_db.get(key).id();
        let old_literals = self.clause_db.get(key).literals().clone();

        let mut kept: Vec<CLiteral> = Vec::with_capacity(old_literals.len());
        for literal in &old_literals {
            match self.atom_db.value_of(*literal) {
                value if value < 0 => {
                    if lrat {
                        match self.units.id_for_internal(literal.negate()) {
                            Some(uid) => self.scratch_chain.push(uid),
                            None => panic!("! No unit for falsified literal {literal}"),
                        }
                    }
                }
                _ => kept.push(*literal),
            }
        }
        // Propagation is quiesced, so at least two unfalsified literals remain.
        debug_assert!(kept.len() >= 2);

        if lrat {
            self.scratch_chain.push(old_id);
        }
        let new_id = self.clause_db.fresh_id();
        let redundant = self.clause_db.get(key).redundant();
        let glue = self.clause_db.get(key).glue();

        log::debug!(
            target: targets::COLLECTION,
            "Strengthened [{old_id}] to [{new_id}], {} literals dropped",
            old_literals.len() - kept.len(),
        );

        self.proof_add_derived(new_id, redundant, false, glue as i32, &kept);
        self.proof_delete(old_id, &old_literals);

        let clause = self.clause_db.get_mut(key);
        *clause.literals_mut() = kept;
        clause.set_id(new_id);
    }

    /// Rebuilds watch lists, occurrence lists, and the binary implication graph from the live
    /// clauses.
    pub(crate) fn rebuild_watches(&mut self) {
        for list in self.atom_db.watches.iter_mut() {
            list.clear();
        }
        for list in self.atom_db.occurrences.iter_mut() {
            list.clear();
        }
        for list in self.atom_db.binary_graph.iter_mut() {
            list.clear();
        }

        let count = self.clause_db.count();
        for index in 0..count {
            let key = index as ClauseRef;
            let literals = self.clause_db.get(key).literals().clone();
            let binary = literals.len() == 2;
            let (first, second) = (literals[0], literals[1]);

            self.atom_db.watch(first, Watch::new(key, second, binary));
            self.atom_db.watch(second, Watch::new(key, first, binary));
            for literal in &literals {
                self.atom_db.occurrences[*literal].push(key);
            }
            if binary {
                self.atom_db.binary_graph[first.negate()].push(second);
                self.atom_db.binary_graph[second.negate()].push(first);
            }
        }
    }
}
