/*!
Ingestion of clauses derived elsewhere.

The engine drains its [learn source](crate::sharing::LearnSource) at the root.
Each incoming clause is screened literal by literal against the current flags and trail:

- An echo of a local export is dropped silently.
- A reconstruction-witness literal, or a literal over a retired atom (eliminated, substituted, or
  pure), discards the clause.
- A root-true literal discards the clause; a root-false literal is removed, and the identifier of
  the unit which falsified it joins the in-flight chain --- read from the *external* unit table,
  the side which survives compaction.

Whatever remains is dispatched by size: the empty clause settles unsatisfiability, a unit is
imported through the unit path, and anything larger is installed as a redundant clause with
watches.
A clause shortened on the way in is a local derivation now: it adopts a fresh local identifier,
its chain closes with the incoming identifier, and (for units) the simplified form is re-exported
to the fleet.
*/

use crate::{
    context::GenericContext,
    db::{atom::AtomStatus, ClauseId},
    misc::log::targets::{self},
    reports::Report,
    sharing::IncomingClause,
    structures::literal::Literal,
};

impl<R: rand::Rng> GenericContext<R> {
    /// Whether the import pipeline has work: at the root, with a source attached, watches
    /// installed, and a clause waiting.
    pub fn importing(&self) -> bool {
        if self.trail.level() != 0 || !self.watching() {
            return false;
        }
        match &self.learn_source {
            None => false,
            Some(source) => source.borrow().has_next_clause(),
        }
    }

    /// Drains the learn source, stopping early if (un)satisfiability is observed.
    pub fn import_shared_clauses(&mut self) -> Report {
        let Some(source) = self.learn_source.clone() else {
            return Report::Unknown;
        };

        loop {
            if self.unsat {
                return Report::Unsatisfiable;
            }
            if self.satisfied() {
                return Report::Satisfiable;
            }

            let incoming = {
                let mut source = source.borrow_mut();
                if !source.has_next_clause() {
                    break;
                }
                match source.next_clause() {
                    Some(incoming) => incoming,
                    None => break,
                }
            };
            self.receive_shared_clause(incoming);
        }

        match self.unsat {
            true => Report::Unsatisfiable,
            false => match self.satisfied() {
                true => Report::Satisfiable,
                false => Report::Unknown,
            },
        }
    }

    /// Screens and dispatches a single incoming clause.
    pub(crate) fn receive_shared_clause(&mut self, incoming: IncomingClause) {
        let IncomingClause {
            id,
            glue,
            literals: elits,
            signature,
        } = incoming;
        debug_assert!(!elits.is_empty());

        // An echo of a local export, reflected back by the fleet.
        if self.clause_db.is_locally_produced_id(id) {
            log::trace!(target: targets::IMPORT, "Dropped echo of local clause [{id}]");
            return;
        }

        if elits.len() == 1 {
            self.import_shared_unit(id, elits[0], false, signature.as_deref());
            return;
        }

        debug_assert!(glue > 0);
        debug_assert!(self.scratch_clause.is_empty());
        debug_assert!(self.scratch_chain.is_empty());
        let lrat = self.lrat();

        let mut reduced = false;
        let mut keep = true;

        for elit in &elits {
            if self.external.is_witness(*elit) {
                self.counters.import.r_wit += 1;
                keep = false;
                break;
            }

            let literal = self.internalize(*elit);
            match self.atom_db.status_of(literal.atom()) {
                AtomStatus::Eliminated | AtomStatus::Substituted | AtomStatus::Pure => {
                    self.counters.import.r_el += 1;
                    keep = false;
                    break;
                }

                AtomStatus::Fixed => {
                    if self.atom_db.value_of(literal) > 0 {
                        // True at the root: the clause is omitted.
                        self.counters.import.r_fx += 1;
                        keep = false;
                        break;
                    }
                    // False at the root: the literal is omitted from the clause.
                    debug_assert!(self.atom_db.value_of(literal) < 0);
                    reduced = true;
                    if lrat {
                        match self.units.id_for_external(-elit) {
                            Some(uid) => self.scratch_chain.push(uid),
                            None => panic!("! No unit for fixed external literal {elit}"),
                        }
                    }
                }

                AtomStatus::Active => self.scratch_clause.push(literal),
            }
        }

        if !keep {
            self.counters.import.discarded += 1;
            self.scratch_clause.clear();
            self.scratch_chain.clear();
            return;
        }

        if self.scratch_clause.is_empty() {
            // The incoming clause reduced to the empty clause.
            debug_assert!(reduced);
            if lrat {
                debug_assert!(!self.scratch_chain.is_empty());
                self.scratch_chain.push(id);
            }
            let empty_id = self.clause_db.fresh_id();
            self.proof_add_derived(empty_id, true, false, 0, &[]);
            self.counters.import.r_fx += 1;
            self.counters.import.discarded += 1;
            self.set_unsatisfiable();
            return;
        }

        if self.scratch_clause.len() == 1 {
            debug_assert!(reduced);
            let elit = self.externalize(self.scratch_clause[0]);
            self.scratch_clause.clear();
            self.import_shared_unit(id, elit, true, None);
            return;
        }

        let clause = std::mem::take(&mut self.scratch_clause);
        let import_id = match reduced {
            true => self.clause_db.fresh_id(),
            false => id,
        };

        if reduced {
            // Shortened here, so a local derivation now.
            if lrat {
                self.scratch_chain.push(id);
            }
            self.proof_add_derived(import_id, true, false, glue, &clause);
        } else {
            self.scratch_chain.clear();
            let validates = self
                .proof
                .as_ref()
                .is_some_and(|proof| proof.validates_signatures());
            match (&signature, validates) {
                (Some(sig), true) => {
                    // Vouched for out-of-band: admitted as a signed axiom.
                    let sig = sig.clone();
                    if let Some(proof) = &mut self.proof {
                        proof.add_original_clause_with_signature(id, &elits, &sig);
                    }
                }
                _ => {
                    // Fanned out as an imported derivation: file tracers and the export
                    // observer skip it.
                    self.proof_add_derived(import_id, true, true, glue, &clause);
                }
            }
        }

        debug_assert!(self.watching());
        match self.install_clause(import_id, clause, true, glue.max(1) as u32) {
            Ok(_) => self.counters.import.imported += 1,
            Err(e) => panic!("! Failed to store imported clause [{import_id}]: {e:?}"),
        }
    }

    /// Attempts to import an incoming unit clause, possibly arising from the simplification of a
    /// larger incoming clause.
    ///
    /// When `simplified`, the in-flight chain holds the identifiers of the units responsible.
    pub(crate) fn import_shared_unit(
        &mut self,
        id: ClauseId,
        elit: i32,
        simplified: bool,
        signature: Option<&[u8]>,
    ) {
        let lrat = self.lrat();

        // The screens of the non-unit path, against the singleton.
        if self.external.is_witness(elit) {
            self.counters.import.r_wit += 1;
            self.counters.import.discarded += 1;
            if simplified && lrat {
                self.scratch_chain.clear();
            }
            return;
        }

        let literal = self.internalize(elit);
        match self.atom_db.status_of(literal.atom()) {
            AtomStatus::Eliminated | AtomStatus::Substituted | AtomStatus::Pure => {
                self.counters.import.r_el += 1;
                self.counters.import.discarded += 1;
                if simplified && lrat {
                    self.scratch_chain.clear();
                }
                return;
            }

            AtomStatus::Fixed => {
                self.counters.import.r_fx += 1;
                self.counters.import.discarded += 1;
                if simplified && lrat {
                    self.scratch_chain.clear();
                }
                return;
            }

            AtomStatus::Active => {}
        }

        let unit_id = match simplified {
            true => self.clause_db.fresh_id(),
            false => id,
        };

        if simplified {
            // The simplified form is a local derivation, re-exported through the bus.
            if lrat {
                debug_assert!(!self.scratch_chain.is_empty());
                self.scratch_chain.push(id);
            }
            self.proof_add_derived(unit_id, true, false, 1, &[literal]);
        } else if let Some(sig) = signature {
            let validates = self
                .proof
                .as_ref()
                .is_some_and(|proof| proof.validates_signatures());
            if validates {
                if let Some(proof) = &mut self.proof {
                    proof.add_original_clause_with_signature(id, &[elit], sig);
                }
            }
        }

        self.assign_unit(unit_id, literal);
        self.counters.import.imported += 1;
        log::debug!(target: targets::IMPORT, "Imported unit [{unit_id}] {elit}");
    }
}
