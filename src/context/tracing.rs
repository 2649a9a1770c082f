//! Connecting proofs, tracers, and sharing collaborators to a context.
//!
//! The proof bus is allocated on demand: a context pays nothing for proofs until a tracer or
//! collaborator is connected.
//! Emission helpers externalize literals before an event leaves the context, so no tracer ever
//! sees an internal index.

use std::{cell::RefCell, fs::File, io::BufWriter, path::Path, rc::Rc};

use crate::{
    context::{api_trace::trace_api, ApiTrace, GenericContext},
    db::ClauseId,
    misc::log::targets::{self},
    proof::{
        callback::{CallbackDelete, CallbackImport, CallbackProduce, CallbackTracer},
        file::{FileTracer, ProofFormat},
        learner::LearnerObserver,
        Proof, Tracer,
    },
    sharing::{LearnSource, Learner},
    structures::literal::CLiteral,
    types::err::{self},
};

impl<R: rand::Rng> GenericContext<R> {
    /// The proof bus, allocated on first use.
    pub fn proof_on_demand(&mut self) -> &mut Proof {
        if self.proof.is_none() {
            log::info!(target: targets::PROOF, "Connecting proof to the context");
            self.proof = Some(Proof::default());
        }
        // Allocated in the line above, if absent.
        unsafe { self.proof.as_mut().unwrap_unchecked() }
    }

    /// Begins tracing the proof to a file at `path`.
    ///
    /// The file tracer is connected at the front of the bus, so on-disk proof lines precede any
    /// export side effects.
    pub fn trace_proof(
        &mut self,
        path: impl AsRef<Path>,
        format: ProofFormat,
        binary: bool,
    ) -> Result<(), err::ProofError> {
        trace_api!(self, "trace_proof {:?}", path.as_ref());
        let sink = BufWriter::new(File::create(path)?);
        let delete_lines = self.config.proof.delete_lines.value;
        let tracer = FileTracer::new(sink, format, binary, delete_lines);
        let watermark = self.clause_db.last_id().unwrap_or(0);
        let proof = self.proof_on_demand();
        proof.connect_file_tracer(Box::new(tracer));
        proof.begin(watermark);
        Ok(())
    }

    /// Connects an arbitrary tracer at the back of the bus.
    pub fn connect_tracer(&mut self, tracer: Box<dyn Tracer>) {
        let watermark = self.clause_db.last_id().unwrap_or(0);
        let proof = self.proof_on_demand();
        proof.connect(tracer);
        proof.begin(watermark);
    }

    /// Connects the internal LRAT callback tracer, enabling signed clause sharing.
    pub fn connect_proof_callbacks(
        &mut self,
        produce: Box<CallbackProduce>,
        import: Box<CallbackImport>,
        delete: Box<CallbackDelete>,
    ) {
        let tracer = CallbackTracer::new(
            produce,
            import,
            delete,
            self.config.proof.delete_lines.value,
            self.config.proof.sign_shared.value,
        );
        let watermark = self.clause_db.last_id().unwrap_or(0);
        let proof = self.proof_on_demand();
        proof.connect_validating(Box::new(tracer));
        proof.begin(watermark);
    }

    /// Connects a learner, to which locally derived clauses are exported.
    pub fn connect_learner(&mut self, learner: Rc<RefCell<dyn Learner>>) {
        self.learner = Some(learner.clone());
        self.proof_on_demand()
            .connect(Box::new(LearnerObserver::new(learner)));
    }

    /// Connects a source of clauses derived elsewhere, drained at the root by the import
    /// pipeline.
    pub fn connect_learn_source(&mut self, source: Rc<RefCell<dyn LearnSource>>) {
        self.learn_source = Some(source);
    }

    /// Flushes buffered proof events to their destinations.
    pub fn flush_proof_trace(&mut self) -> Result<(), err::ProofError> {
        trace_api!(self, "flush_proof_trace");
        match &mut self.proof {
            None => Err(err::ProofError::NoTrace),
            Some(proof) => {
                proof.flush();
                Ok(())
            }
        }
    }

    /// Finalizes every live clause and closes the proof.
    ///
    /// Finalization events only reach formats which record them (FRAT); for the rest this is a
    /// flush.
    pub fn close_proof_trace(&mut self) -> Result<(), err::ProofError> {
        trace_api!(self, "close_proof_trace");
        if self.proof.is_none() {
            return Err(err::ProofError::NoTrace);
        }

        // Unit clauses live on the trail, everything else in the clause database.
        let mut finals: Vec<(ClauseId, Vec<i32>)> = Vec::default();
        for literal in &self.trail.assignments {
            if let Some(id) = self.units.id_for_internal(*literal) {
                finals.push((id, vec![self.externalize(*literal)]));
            }
        }
        for (_, clause) in self.clause_db.all_clauses() {
            let elits = clause
                .literals()
                .iter()
                .map(|l| self.externalize(*l))
                .collect();
            finals.push((clause.id(), elits));
        }

        // The check above ensures a proof is present.
        let proof = unsafe { self.proof.as_mut().unwrap_unchecked() };
        for (id, elits) in finals {
            proof.finalize_clause(id, &elits);
        }
        proof.flush();
        proof.close();
        Ok(())
    }

    /// Begins echoing API calls to a file at `path`.
    ///
    /// Fails if the environment variable mechanism is already tracing this context.
    pub fn trace_api_calls(&mut self, path: impl AsRef<Path>) -> Result<(), err::ProofError> {
        if self.api_trace.is_some() {
            return Err(err::ProofError::TraceGuardHeld);
        }
        self.api_trace = Some(ApiTrace::to_path(path)?);
        trace_api!(self, "init");
        Ok(())
    }
}

/// Emission helpers: events leave the context in external form.
impl<R: rand::Rng> GenericContext<R> {
    /// The external form of a slice of internal literals.
    pub(crate) fn externalize_all(&self, literals: &[CLiteral]) -> Vec<i32> {
        literals.iter().map(|l| self.externalize(*l)).collect()
    }

    /// Reports an original clause, external form as given.
    pub(crate) fn proof_add_original(&mut self, id: ClauseId, elits: &[i32]) {
        if let Some(proof) = &mut self.proof {
            proof.add_original_clause(id, elits);
        }
    }

    /// Reports a derived clause, with the in-flight chain; the chain is cleared by emission.
    pub(crate) fn proof_add_derived(
        &mut self,
        id: ClauseId,
        redundant: bool,
        imported: bool,
        glue: i32,
        literals: &[CLiteral],
    ) {
        if self.proof.is_none() {
            self.scratch_chain.clear();
            return;
        }
        let elits = self.externalize_all(literals);
        let chain = std::mem::take(&mut self.scratch_chain);
        // Checked non-empty above.
        let proof = unsafe { self.proof.as_mut().unwrap_unchecked() };
        proof.add_derived_clause(id, redundant, imported, glue, &elits, &chain);
        if !imported {
            self.counters.produced_clauses += 1;
        }
    }

    /// Reports the deletion of a clause.
    pub(crate) fn proof_delete(&mut self, id: ClauseId, literals: &[CLiteral]) {
        if self.proof.is_none() {
            return;
        }
        let elits = self.externalize_all(literals);
        // Checked non-empty above.
        let proof = unsafe { self.proof.as_mut().unwrap_unchecked() };
        proof.delete_clause(id, &elits);
    }

    /// Whether chains are maintained for derivations.
    pub(crate) fn lrat(&self) -> bool {
        self.config.proof.lrat.value
    }

    /// Whether watch lists are installed.
    pub fn watching(&self) -> bool {
        self.atom_db.watching()
    }
}
