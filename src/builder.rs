/*!
Methods for adding clauses to a context from external literals.

Clauses arrive either whole through [add_clause](GenericContext::add_clause) or literal by
literal through [add](GenericContext::add), where a zero terminates the clause --- the DIMACS
convention.

On the way in a clause is internalized and simplified against the root:

- Fresh external variables receive fresh (active) atoms.
- Duplicate literals are dropped; a tautological clause is skipped.
- A clause containing a root-satisfied literal is skipped.
- Root-falsified literals are removed, and when this shortens the clause the derivation is
  reported to the proof with a chain of the responsible unit identifiers --- the stored clause
  adopts the fresh identifier.

Whatever remains is installed: the empty clause settles unsatisfiability, a unit goes to the
trail and the unit registry, and anything larger is stored and watched.
*/

use crate::{
    context::{api_trace::trace_api, ContextState, GenericContext},
    db::{ClauseId, ClauseRef},
    misc::log::targets::{self},
    structures::literal::{CLiteral, Literal},
    types::err::{self},
};

/// How an added clause was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseOk {
    /// The clause (or what remained of it) was installed.
    Added,

    /// The clause was satisfied at the root or tautological, and skipped.
    Skipped,
}

impl<R: rand::Rng> GenericContext<R> {
    /// The internal literal of an external literal, allocating a fresh atom on first sight of
    /// the variable.
    pub(crate) fn internalize(&mut self, elit: i32) -> CLiteral {
        assert!(elit != 0 && elit != i32::MIN, "! Invalid literal");
        let var = elit.abs();
        self.external.reserve(var);
        let base = match self.external.mapping(var) {
            Some(literal) => literal,
            None => {
                let atom = match self.atom_db.fresh_atom(var) {
                    Ok(atom) => atom,
                    Err(e) => panic!("! {e:?}"),
                };
                self.units.grow_internal(atom);
                let literal = CLiteral::fresh(atom, true);
                self.external.set_mapping(var, Some(literal));
                literal
            }
        };
        match elit > 0 {
            true => base,
            false => base.negate(),
        }
    }

    /// Buffers a literal of a clause; `0` terminates and records the clause.
    pub fn add(&mut self, elit: i32) -> Result<ClauseOk, err::ErrorKind> {
        trace_api!(self, "add {elit}");
        assert!(elit != i32::MIN, "! Invalid literal");
        if elit != 0 {
            self.adding.push(elit);
            return Ok(ClauseOk::Added);
        }
        let literals = std::mem::take(&mut self.adding);
        self.record_external_clause(literals)
    }

    /// Records a clause of external literals.
    pub fn add_clause(&mut self, literals: &[i32]) -> Result<ClauseOk, err::ErrorKind> {
        trace_api!(self, "add_clause {literals:?}");
        for literal in literals {
            if *literal == 0 || *literal == i32::MIN {
                return Err(err::BuildError::InvalidLiteral(*literal).into());
            }
        }
        self.record_external_clause(literals.to_vec())
    }

    fn record_external_clause(&mut self, elits: Vec<i32>) -> Result<ClauseOk, err::ErrorKind> {
        assert!(
            self.state != ContextState::Solving,
            "! Clause added during a solve"
        );
        self.transition_to_unknown();

        let id = self.clause_db.fresh_id();
        self.proof_add_original(id, &elits);

        if self.unsat {
            // Nothing can matter after the empty clause.
            return Ok(ClauseOk::Skipped);
        }
        self.state = ContextState::Input;

        if elits.is_empty() {
            log::info!(target: targets::CLAUSE_DB, "The empty clause was added");
            self.set_unsatisfiable();
            return Err(err::BuildError::Unsatisfiable.into());
        }

        debug_assert!(self.scratch_clause.is_empty() && self.scratch_chain.is_empty());
        let lrat = self.lrat();

        let mut satisfied_at_root = false;
        let mut tautology = false;
        let mut reduced = false;

        for elit in &elits {
            let literal = self.internalize(*elit);
            match self.atom_db.value_of(literal) {
                value if value > 0 => {
                    satisfied_at_root = true;
                    break;
                }

                value if value < 0 => {
                    // Removed, with the responsible unit joining the chain.
                    reduced = true;
                    if lrat {
                        let uid = match self.units.id_for_internal(literal.negate()) {
                            Some(uid) => uid,
                            None => panic!("! No unit for falsified literal {literal}"),
                        };
                        self.scratch_chain.push(uid);
                    }
                }

                _ => {
                    let atom = literal.atom() as usize;
                    if self.atom_db.marked[atom] {
                        let duplicate = self.scratch_clause.contains(&literal);
                        if duplicate {
                            continue;
                        }
                        tautology = true;
                        break;
                    }
                    self.atom_db.marked[atom] = true;
                    self.scratch_clause.push(literal);
                }
            }
        }

        for literal in &self.scratch_clause {
            self.atom_db.marked[literal.atom() as usize] = false;
        }

        if satisfied_at_root || tautology {
            // The clause adds nothing, and is deleted from the proof at once.
            self.scratch_clause.clear();
            self.scratch_chain.clear();
            if let Some(proof) = &mut self.proof {
                proof.delete_clause(id, &elits);
            }
            return Ok(ClauseOk::Skipped);
        }

        match self.scratch_clause.len() {
            0 => {
                // Every literal was false at the root.
                debug_assert!(reduced);
                if lrat {
                    self.scratch_chain.push(id);
                }
                let empty_id = self.clause_db.fresh_id();
                self.proof_add_derived(empty_id, true, false, 0, &[]);
                self.set_unsatisfiable();
                Err(err::BuildError::Unsatisfiable.into())
            }

            1 => {
                let literal = self.scratch_clause[0];
                self.scratch_clause.clear();
                let unit_id = match reduced {
                    true => {
                        if lrat {
                            self.scratch_chain.push(id);
                        }
                        let unit_id = self.clause_db.fresh_id();
                        self.proof_add_derived(unit_id, true, false, 1, &[literal]);
                        if let Some(proof) = &mut self.proof {
                            proof.delete_clause(id, &elits);
                        }
                        unit_id
                    }
                    false => id,
                };
                self.scratch_chain.clear();
                self.assign_unit(unit_id, literal);
                Ok(ClauseOk::Added)
            }

            _ => {
                let literals = std::mem::take(&mut self.scratch_clause);
                let clause_id = match reduced {
                    true => {
                        if lrat {
                            self.scratch_chain.push(id);
                        }
                        let clause_id = self.clause_db.fresh_id();
                        self.proof_add_derived(clause_id, false, false, 0, &literals);
                        if let Some(proof) = &mut self.proof {
                            proof.delete_clause(id, &elits);
                        }
                        clause_id
                    }
                    false => id,
                };
                self.scratch_chain.clear();
                match self.install_clause(clause_id, literals, false, 0) {
                    Ok(_) => Ok(ClauseOk::Added),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    /// Stores a clause of two or more literals, installing watches, occurrences, and (for binary
    /// clauses) the implication graph.
    pub(crate) fn install_clause(
        &mut self,
        id: ClauseId,
        literals: Vec<CLiteral>,
        redundant: bool,
        glue: u32,
    ) -> Result<ClauseRef, err::ClauseDBError> {
        debug_assert!(literals.len() >= 2);
        let binary = literals.len() == 2;
        if binary {
            self.atom_db.note_binary(literals[0], literals[1]);
        }
        let key = self.clause_db.store(id, literals, redundant, glue)?;
        let clause = self.clause_db.get(key);
        let (first, second) = (clause.literals()[0], clause.literals()[1]);
        for literal in clause.literals() {
            self.atom_db.note_occurrence(*literal, key);
        }
        self.atom_db
            .watch(first, crate::db::atom::watch_db::Watch::new(key, second, binary));
        self.atom_db
            .watch(second, crate::db::atom::watch_db::Watch::new(key, first, binary));
        Ok(key)
    }
}
