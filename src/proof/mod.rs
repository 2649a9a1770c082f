/*!
The proof bus: fan-out of clause events to an ordered sequence of tracers.

The engine reports each clause addition, deletion, and finalization once, to the bus; the bus
forwards the event to every connected [Tracer] in order.
Order matters: the file tracer is connected at the *front*, so on-disk proof lines are written
before any export side effects fire for the same clause.

Three tracer families are provided:

- [FileTracer](crate::proof::file::FileTracer) --- DRAT, LRAT, and FRAT files, textual or binary.
- [CallbackTracer](crate::proof::callback::CallbackTracer) --- an internal LRAT stream through
  produce/import/delete callbacks, for signed clause sharing.
- [LearnerObserver](crate::proof::learner::LearnerObserver) --- exports locally derived clauses
  to a [Learner](crate::sharing::Learner).

Events carry external literals: the engine externalizes before reporting, so tracers never see a
compactable index.

# Glue

Before fan-out the glue of a derived clause is clamped to `[1, |clause|]`, so downstream formats
never see degenerate values.
*/

pub mod callback;
pub mod file;
pub mod learner;
mod tracer;

pub use tracer::Tracer;

use crate::{
    db::ClauseId,
    misc::log::targets::{self},
};

/// The proof bus.
#[derive(Default)]
pub struct Proof {
    /// The connected tracers, in notification order.
    tracers: Vec<Box<dyn Tracer>>,

    /// Whether a connected tracer validates signatures on imported clauses.
    validates_signatures: bool,
}

impl Proof {
    /// Connects a tracer at the back of the notification order.
    pub fn connect(&mut self, tracer: Box<dyn Tracer>) {
        self.tracers.push(tracer);
    }

    /// Connects a file tracer at the front of the notification order, so proof lines are written
    /// before any other observer acts on the same event.
    pub fn connect_file_tracer(&mut self, tracer: Box<dyn Tracer>) {
        self.tracers.insert(0, tracer);
    }

    /// Connects a signature-validating tracer at the back of the notification order.
    pub fn connect_validating(&mut self, tracer: Box<dyn Tracer>) {
        self.validates_signatures = true;
        self.tracers.push(tracer);
    }

    /// Whether imported clauses should carry signatures for validation.
    pub fn validates_signatures(&self) -> bool {
        self.validates_signatures
    }

    /// A count of connected tracers.
    pub fn tracer_count(&self) -> usize {
        self.tracers.len()
    }

    /// Seeds the identifier watermark of order-checking tracers.
    pub fn begin(&mut self, id: ClauseId) {
        for tracer in &mut self.tracers {
            tracer.begin_proof(id);
        }
    }

    pub fn add_original_clause(&mut self, id: ClauseId, clause: &[i32]) {
        log::debug!(target: targets::PROOF, "Original clause [{id}]");
        for tracer in &mut self.tracers {
            tracer.add_original_clause(id, clause);
        }
    }

    pub fn add_original_clause_with_signature(
        &mut self,
        id: ClauseId,
        clause: &[i32],
        signature: &[u8],
    ) {
        log::debug!(target: targets::PROOF, "Signed axiom [{id}]");
        for tracer in &mut self.tracers {
            tracer.add_original_clause_with_signature(id, clause, signature);
        }
    }

    /// Reports a derived clause, clamping glue to `[1, |clause|]` first.
    pub fn add_derived_clause(
        &mut self,
        id: ClauseId,
        redundant: bool,
        imported: bool,
        glue: i32,
        clause: &[i32],
        chain: &[ClauseId],
    ) {
        let mut glue = glue;
        if (clause.len() as i32) < glue {
            glue = clause.len() as i32;
        } else if glue < 1 {
            glue = 1;
        }
        log::debug!(target: targets::PROOF, "Derived clause [{id}], glue {glue}");
        for tracer in &mut self.tracers {
            tracer.add_derived_clause(id, redundant, imported, glue, clause, chain);
        }
    }

    /// Reports the derivation of the empty clause.
    pub fn add_derived_empty_clause(&mut self, id: ClauseId, chain: &[ClauseId]) {
        self.add_derived_clause(id, true, false, 0, &[], chain);
    }

    /// Reports the derivation of a unit clause.
    pub fn add_derived_unit_clause(&mut self, id: ClauseId, elit: i32, chain: &[ClauseId]) {
        self.add_derived_clause(id, true, false, 1, &[elit], chain);
    }

    pub fn delete_clause(&mut self, id: ClauseId, clause: &[i32]) {
        log::debug!(target: targets::PROOF, "Deleted clause [{id}]");
        for tracer in &mut self.tracers {
            tracer.delete_clause(id, clause);
        }
    }

    pub fn finalize_clause(&mut self, id: ClauseId, clause: &[i32]) {
        for tracer in &mut self.tracers {
            tracer.finalize_clause(id, clause);
        }
    }

    pub fn add_todo(&mut self, items: &[u64]) {
        for tracer in &mut self.tracers {
            tracer.add_todo(items);
        }
    }

    pub fn flush(&mut self) {
        for tracer in &mut self.tracers {
            tracer.flush();
        }
    }

    pub fn close(&mut self) {
        for tracer in &mut self.tracers {
            tracer.close();
        }
    }
}
