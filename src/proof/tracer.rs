//! The observer contract for proof events.
//!
//! A tracer sees the life of every clause the engine tells the [proof bus](crate::proof::Proof)
//! about: addition (original, imported-with-signature, or derived), deletion, and finalization.
//! Events carry external literals and clause [identifiers](ClauseId); derived clauses also carry
//! their antecedent chain, when chains are maintained.
//!
//! For a single clause, events are totally ordered as `add → (delete)* → finalize`.

use crate::db::ClauseId;

/// An observer of proof events.
///
/// Every method except [add_derived_clause](Tracer::add_derived_clause) defaults to a no-op, as
/// most observers care about a subset of events.
pub trait Tracer {
    /// The identifier watermark at the point the proof began, for observers which check identifier
    /// order.
    fn begin_proof(&mut self, _id: ClauseId) {}

    /// A clause of the original formula.
    fn add_original_clause(&mut self, _id: ClauseId, _clause: &[i32]) {}

    /// A clause whose correctness is vouched for out-of-band by the given signature.
    fn add_original_clause_with_signature(
        &mut self,
        _id: ClauseId,
        _clause: &[i32],
        _signature: &[u8],
    ) {
    }

    /// A derived clause.
    ///
    /// `redundant` marks clauses deletable without loss; `imported` marks clauses which arrived
    /// through clause sharing rather than local derivation.
    /// The chain lists antecedent identifiers, empty when chains are not maintained.
    fn add_derived_clause(
        &mut self,
        id: ClauseId,
        redundant: bool,
        imported: bool,
        glue: i32,
        clause: &[i32],
        chain: &[ClauseId],
    );

    /// The clause is no longer used.
    fn delete_clause(&mut self, _id: ClauseId, _clause: &[i32]) {}

    /// The clause is live at the end of the proof.
    fn finalize_clause(&mut self, _id: ClauseId, _clause: &[i32]) {}

    /// A note that a derivation is missing its chain, for later repair.
    fn add_todo(&mut self, _items: &[u64]) {}

    /// Any buffered events should reach their destination.
    fn flush(&mut self) {}

    /// No further events will be sent.
    fn close(&mut self) {}
}
