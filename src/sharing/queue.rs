//! Queue-backed sharing collaborators.
//!
//! A [ClauseChannel] is a [LearnSource] fed by cloneable [producer](ClauseChannel::producer)
//! handles, and a [ClauseSink] is a [Learner] drained by cloneable
//! [consumer](ClauseSink::consumer) handles.
//! Both sit on lock-free queues, so the far ends may live on other threads --- inside the engine
//! everything stays synchronous.

use std::sync::Arc;

use crossbeam::queue::SegQueue;

use crate::{
    db::ClauseId,
    sharing::{IncomingClause, LearnSource, Learner},
};

/// A learn source fed through a queue.
#[derive(Default)]
pub struct ClauseChannel {
    queue: Arc<SegQueue<IncomingClause>>,
}

/// A handle for pushing clauses into a [ClauseChannel].
#[derive(Clone)]
pub struct ClauseProducer {
    queue: Arc<SegQueue<IncomingClause>>,
}

impl ClauseChannel {
    /// A handle for pushing clauses into the channel.
    pub fn producer(&self) -> ClauseProducer {
        ClauseProducer {
            queue: self.queue.clone(),
        }
    }
}

impl ClauseProducer {
    pub fn push(&self, clause: IncomingClause) {
        self.queue.push(clause);
    }
}

impl LearnSource for ClauseChannel {
    fn has_next_clause(&self) -> bool {
        !self.queue.is_empty()
    }

    fn next_clause(&mut self) -> Option<IncomingClause> {
        self.queue.pop()
    }
}

/// A clause exported through a [ClauseSink].
#[derive(Clone, Debug)]
pub struct ExportedClause {
    pub id: ClauseId,
    pub literals: Vec<i32>,
    pub glue: i32,
    pub signature: Option<Vec<u8>>,
}

/// A learner which queues exported clauses for consumption elsewhere.
pub struct ClauseSink {
    queue: Arc<SegQueue<ExportedClause>>,

    /// The greatest clause size accepted; larger derivations are refused up front.
    size_limit: usize,
}

/// A handle for draining clauses from a [ClauseSink].
#[derive(Clone)]
pub struct ClauseConsumer {
    queue: Arc<SegQueue<ExportedClause>>,
}

impl ClauseSink {
    pub fn new(size_limit: usize) -> Self {
        ClauseSink {
            queue: Arc::default(),
            size_limit,
        }
    }

    /// A handle for draining exported clauses.
    pub fn consumer(&self) -> ClauseConsumer {
        ClauseConsumer {
            queue: self.queue.clone(),
        }
    }
}

impl ClauseConsumer {
    pub fn pop(&self) -> Option<ExportedClause> {
        self.queue.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Learner for ClauseSink {
    fn learning(&mut self, size: usize) -> bool {
        size <= self.size_limit
    }

    fn export_learned_unit_clause(&mut self, id: ClauseId, literal: i32) {
        self.queue.push(ExportedClause {
            id,
            literals: vec![literal],
            glue: 1,
            signature: None,
        });
    }

    fn export_learned_large_clause(&mut self, id: ClauseId, literals: &[i32], glue: i32) {
        self.queue.push(ExportedClause {
            id,
            literals: literals.to_vec(),
            glue,
            signature: None,
        });
    }

    fn export_learned_unit_clause_signed(&mut self, id: ClauseId, literal: i32, signature: &[u8]) {
        self.queue.push(ExportedClause {
            id,
            literals: vec![literal],
            glue: 1,
            signature: Some(signature.to_vec()),
        });
    }

    fn export_learned_large_clause_signed(
        &mut self,
        id: ClauseId,
        literals: &[i32],
        glue: i32,
        signature: &[u8],
    ) {
        self.queue.push(ExportedClause {
            id,
            literals: literals.to_vec(),
            glue,
            signature: Some(signature.to_vec()),
        });
    }
}
