/*!
An internal LRAT tracer which hands each derivation to a callback rather than a file.

This is the engine's side of cryptographically signed clause sharing: the produce callback
checks a derivation against its chain and (for clauses marked exportable by a non-zero glue)
computes a signature into the supplied buffer; the import callback validates the signature of a
clause arriving from elsewhere before it is admitted as an axiom.

The tracer guarantees strictly increasing identifiers across productions --- an identifier out of
order is unrecoverable, as the proof stream cannot be repaired later, and the process aborts.
Deletions accumulate and are flushed in bounded chunks immediately before the next production, so
the stream stays ordered.
*/

use crate::{
    db::ClauseId,
    misc::log::targets::{self},
    proof::Tracer,
};

/// The size of a clause signature, in bytes.
pub const SIGNATURE_BYTES: usize = 16;

/// A clause signature buffer.
pub type Signature = [u8; SIGNATURE_BYTES];

/// Checks and records a derivation: identifier, literals, chain, and glue.
///
/// A glue of zero means the clause is not for export and no signature is required; otherwise a
/// signature may be written into the buffer.
/// Returning false is unrecoverable.
pub type CallbackProduce = dyn FnMut(ClauseId, &[i32], &[ClauseId], i32, &mut Signature) -> bool;

/// Validates the signature of a clause to be admitted as an axiom.
/// Returning false is unrecoverable.
pub type CallbackImport = dyn FnMut(ClauseId, &[i32], &[u8]) -> bool;

/// Deletes a batch of clauses by identifier.
/// Returning false is unrecoverable.
pub type CallbackDelete = dyn FnMut(&[ClauseId]) -> bool;

/// The bound on identifiers in a single delete callback.
const DELETE_CHUNK: usize = 1 << 16;

/// An internal LRAT tracer backed by callbacks.
pub struct CallbackTracer {
    produce: Box<CallbackProduce>,
    import: Box<CallbackImport>,
    delete: Box<CallbackDelete>,

    /// The greatest identifier produced so far.
    latest_id: ClauseId,

    /// Deletions awaiting the next production.
    pending_deletes: Vec<ClauseId>,

    /// Whether deletions are recorded at all.
    delete_lines: bool,

    /// Whether exportable clauses are marked by a non-zero glue.
    sign_shared: bool,

    produced: u64,
    validated: u64,
}

impl CallbackTracer {
    pub fn new(
        produce: Box<CallbackProduce>,
        import: Box<CallbackImport>,
        delete: Box<CallbackDelete>,
        delete_lines: bool,
        sign_shared: bool,
    ) -> Self {
        CallbackTracer {
            produce,
            import,
            delete,
            latest_id: 0,
            pending_deletes: Vec::default(),
            delete_lines,
            sign_shared,
            produced: 0,
            validated: 0,
        }
    }

    /// Counts of produced derivations and validated imports.
    pub fn totals(&self) -> (u64, u64) {
        (self.produced, self.validated)
    }

    fn flush_pending_deletes(&mut self) {
        if self.pending_deletes.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_deletes);
        for chunk in pending.chunks(DELETE_CHUNK) {
            if !(self.delete)(chunk) {
                panic!("! Delete callback failed on a chunk of {}", chunk.len());
            }
        }
    }
}

impl Tracer for CallbackTracer {
    fn begin_proof(&mut self, id: ClauseId) {
        self.latest_id = id;
    }

    fn add_original_clause_with_signature(
        &mut self,
        id: ClauseId,
        clause: &[i32],
        signature: &[u8],
    ) {
        if !(self.import)(id, clause, signature) {
            panic!("! Signature validation failed for imported clause [{id}]");
        }
        self.validated += 1;
    }

    fn add_derived_clause(
        &mut self,
        id: ClauseId,
        redundant: bool,
        imported: bool,
        glue: i32,
        clause: &[i32],
        chain: &[ClauseId],
    ) {
        // Imported clauses are not local productions: neither the watermark nor the stream
        // advances for them.
        if imported {
            return;
        }

        if id <= self.latest_id {
            panic!(
                "! Clause [{id}] produced out of order, after [{}]",
                self.latest_id
            );
        }

        self.flush_pending_deletes();
        self.latest_id = id;

        // A glue of zero tells the callback the clause is not for export.
        let glue = match self.sign_shared && (redundant || clause.len() == 1) {
            true => glue,
            false => 0,
        };

        let mut signature = Signature::default();
        if !(self.produce)(id, clause, chain, glue, &mut signature) {
            panic!("! Produce callback rejected clause [{id}]");
        }
        self.produced += 1;
        log::trace!(target: targets::PROOF, "Produced clause [{id}]");
    }

    fn delete_clause(&mut self, id: ClauseId, _clause: &[i32]) {
        if self.delete_lines {
            // Pushed off until the next production.
            self.pending_deletes.push(id);
        }
    }

    fn flush(&mut self) {
        self.flush_pending_deletes();
    }

    fn close(&mut self) {
        log::info!(
            target: targets::PROOF,
            "Callback trace closed: produced {}, validated {}",
            self.produced,
            self.validated,
        );
    }
}
