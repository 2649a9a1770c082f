//! The export observer: locally derived clauses flow outward to a [Learner].
//!
//! The observer sits on the proof bus behind any file tracer, so a clause is on disk before its
//! export side effects fire.
//! Imported clauses are dropped to avoid re-export loops, and the learner is consulted per size
//! before anything is handed over.

use std::{cell::RefCell, rc::Rc};

use crate::{
    db::ClauseId,
    misc::log::targets::{self},
    proof::Tracer,
    sharing::Learner,
};

/// A tracer exporting derived clauses to a learner.
pub struct LearnerObserver {
    learner: Rc<RefCell<dyn Learner>>,
}

impl LearnerObserver {
    pub fn new(learner: Rc<RefCell<dyn Learner>>) -> Self {
        LearnerObserver { learner }
    }
}

impl Tracer for LearnerObserver {
    fn add_derived_clause(
        &mut self,
        id: ClauseId,
        _redundant: bool,
        imported: bool,
        glue: i32,
        clause: &[i32],
        _chain: &[ClauseId],
    ) {
        // Only export what was derived here.
        if imported {
            return;
        }

        if glue == -1 {
            panic!("! Invalid glue on derived clause [{id}]");
        }

        let mut learner = self.learner.borrow_mut();
        if !learner.learning(clause.len()) {
            return;
        }

        match clause.len() {
            // The empty clause concludes the solve and is not shared.
            0 => {}

            1 => {
                log::trace!(target: targets::EXPORT, "Exported unit [{id}]");
                learner.export_learned_unit_clause(id, clause[0]);
            }

            _ => {
                log::trace!(target: targets::EXPORT, "Exported clause [{id}], glue {glue}");
                learner.export_learned_large_clause(id, clause, glue);
            }
        }
    }
}
