/*!
Clause sharing collaborators.

Two traits mark the boundary between the engine and a sharing layer:

- A [LearnSource] supplies clauses derived elsewhere.
  The engine drains the source at the root through the
  [import pipeline](crate::procedures::import), which decides per clause whether to discard,
  shorten, or install it.
- A [Learner] receives clauses derived locally, forwarded by the
  [LearnerObserver](crate::proof::learner::LearnerObserver) on the proof bus.

Both are supplied by the embedder as shared handles; the engine never assumes anything about what
stands behind them --- [queue] provides a pair backed by lock-free queues for fleets of engines on
threads.
*/

pub mod queue;

use crate::db::ClauseId;

/// A clause arriving from a learn source.
#[derive(Clone, Debug)]
pub struct IncomingClause {
    /// The identifier under which the clause was derived elsewhere.
    pub id: ClauseId,

    /// The glue of the clause when derived.
    pub glue: i32,

    /// The literals of the clause, external form.
    pub literals: Vec<i32>,

    /// An optional signature vouching for the clause.
    pub signature: Option<Vec<u8>>,
}

/// A source of clauses derived elsewhere.
pub trait LearnSource {
    /// Whether a clause is available.
    fn has_next_clause(&self) -> bool;

    /// The next clause, if one is available.
    fn next_clause(&mut self) -> Option<IncomingClause>;
}

/// A consumer of clauses derived locally.
pub trait Learner {
    /// Whether the learner wants clauses of the given size.
    fn learning(&mut self, size: usize) -> bool;

    /// A locally derived unit clause.
    fn export_learned_unit_clause(&mut self, id: ClauseId, literal: i32);

    /// A locally derived clause of two or more literals.
    fn export_learned_large_clause(&mut self, id: ClauseId, literals: &[i32], glue: i32);

    /// A locally derived unit clause, with a signature.
    fn export_learned_unit_clause_signed(&mut self, id: ClauseId, literal: i32, _signature: &[u8]) {
        self.export_learned_unit_clause(id, literal);
    }

    /// A locally derived clause of two or more literals, with a signature.
    fn export_learned_large_clause_signed(
        &mut self,
        id: ClauseId,
        literals: &[i32],
        glue: i32,
        _signature: &[u8],
    ) {
        self.export_learned_large_clause(id, literals, glue);
    }
}
