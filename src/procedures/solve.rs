/*!
The root-level driver, and the decision hooks an external search loop consumes.

[solve](GenericContext::solve) settles what can be settled without search: propagation to a fixed
point, imports from the learn source, and compaction when scheduled.
The CDCL loop proper --- decisions, conflict analysis, learning, restarts --- belongs to the
embedding solver, which drives the same hooks ([decide](GenericContext::decide),
[backtrack](GenericContext::backtrack),
[next_decision_candidate](GenericContext::next_decision_candidate)) between calls into the
procedures here.
*/

use crate::{
    context::{api_trace::trace_api, ContextState, GenericContext},
    db::{atom::AssignmentInfo, LevelIndex},
    misc::log::targets::{self},
    reports::Report,
    structures::literal::Literal,
    types::err::{self},
};

impl<R: rand::Rng> GenericContext<R> {
    /// Settles what root-level reasoning can settle: propagation, imports, compaction.
    ///
    /// Returns [Satisfiable](Report::Satisfiable) only when every live atom holds a value,
    /// [Unsatisfiable](Report::Unsatisfiable) when the empty clause is derived (or an assumption
    /// is contradicted at the root), and [Unknown](Report::Unknown) otherwise --- deciding the
    /// rest is the search loop's business.
    pub fn solve(&mut self) -> Result<Report, err::ErrorKind> {
        trace_api!(self, "solve");
        debug_assert_eq!(self.trail.level(), 0);

        if self.unsat {
            self.state = ContextState::Unsatisfiable;
            return Ok(Report::Unsatisfiable);
        }
        self.transition_to_unknown();
        self.state = ContextState::Solving;

        loop {
            if self.check_callback_terminate() {
                log::info!(target: targets::PROPAGATION, "Terminated by callback");
                self.state = ContextState::Unknown;
                return Ok(Report::Unknown);
            }

            if self.propagate().is_err() {
                // A root conflict has already derived the empty clause.
                self.state = ContextState::Unsatisfiable;
                return Ok(Report::Unsatisfiable);
            }

            if self.compacting() {
                self.compact();
            }

            if self.importing() {
                match self.import_shared_clauses() {
                    Report::Unsatisfiable => {
                        self.state = ContextState::Unsatisfiable;
                        return Ok(Report::Unsatisfiable);
                    }
                    // Imported units may still propagate; go around again.
                    _ => continue,
                }
            }

            break;
        }

        for literal in self.assumptions.clone() {
            if self.atom_db.value_of(literal) < 0 {
                // Contradicted at the root; queryable through failed.
                self.state = ContextState::Unsatisfiable;
                return Ok(Report::Unsatisfiable);
            }
        }

        let report = match self.satisfied() {
            true => {
                self.state = ContextState::Satisfiable;
                Report::Satisfiable
            }
            false => {
                self.state = ContextState::Unknown;
                Report::Unknown
            }
        };
        Ok(report)
    }

    /// Runs `rounds` of root-level simplification: propagation, collection, and (when
    /// scheduled) compaction.
    pub fn simplify(&mut self, rounds: u32) -> Result<Report, err::ErrorKind> {
        trace_api!(self, "simplify {rounds}");
        debug_assert_eq!(self.trail.level(), 0);

        for _ in 0..rounds {
            if self.unsat {
                break;
            }
            if self.propagate().is_err() {
                self.state = ContextState::Unsatisfiable;
                return Ok(Report::Unsatisfiable);
            }
            self.collect_garbage();
            if self.compacting() {
                self.compact();
            }
        }

        match self.unsat {
            true => {
                self.state = ContextState::Unsatisfiable;
                Ok(Report::Unsatisfiable)
            }
            false => Ok(self.report()),
        }
    }

    /// Makes a decision: opens a fresh level and assigns the external literal.
    pub fn decide(&mut self, elit: i32) {
        let literal = self.internalize(elit);
        debug_assert_eq!(self.atom_db.value_of(literal), 0);
        self.trail.new_level();
        self.atom_db.set_value(literal);
        let position = self.trail.push(literal);
        self.atom_db.info[literal.atom() as usize] = AssignmentInfo {
            level: self.trail.level(),
            trail_position: position as u32,
        };
    }

    /// The most active unvalued atom, phased by the saved phase (or the configured lean), as an
    /// external literal.
    pub fn next_decision_candidate(&mut self) -> Option<i32> {
        loop {
            let atom = self.atom_db.activity.peek_max()? as crate::structures::atom::Atom;
            if self.atom_db.value_of_atom(atom) != 0 || !self.atom_db.status_of(atom).is_active() {
                self.atom_db.activity.pop_max();
                continue;
            }
            let lean = self.config.polarity_lean.value;
            let polarity = self.atom_db.preferred_value(atom, &mut self.rng, lean);
            let var = self.atom_db.external_of(atom);
            return Some(match polarity {
                true => var,
                false => -var,
            });
        }
    }

    /// Backtracks to `level`, clearing values, saving phases, and restoring decision structures.
    pub fn backtrack(&mut self, level: LevelIndex) {
        debug_assert!(level <= self.trail.level());
        for literal in self.trail.pop_levels(level) {
            let atom = literal.atom();
            self.atom_db.phases.saved[atom as usize] = match literal.polarity() {
                true => 1,
                false => -1,
            };
            self.atom_db.clear_value(atom);
            self.atom_db.activity.activate(atom as usize);
        }
        self.atom_db.queue.rewind();
    }
}
