/*!
A database of clause related things.

Every clause of two or more literals is stored here, under a positional [reference](ClauseRef)
and a stable [identifier](ClauseId).
References index the backing vector and are invalidated by a garbage [sweep](ClauseDB::sweep);
identifiers are forever, and are the names used in proof hints and shared clauses.

The database also owns the [allocator](crate::db::IdAllocator) of locally produced identifiers.
Identifiers are assigned to original and derived clauses alike from the same stream, so any
locally produced identifier may appear in a later proof chain.

Unit clauses are not stored: a unit is an assignment on the trail, with its identifier in the
[unit registry](crate::db::units).
*/

pub mod db_clause;

use db_clause::DBClause;

use crate::{
    config::Config,
    db::{ClauseId, ClauseRef, IdAllocator},
    misc::log::targets::{self},
    structures::clause::CClause,
    types::err::{self},
};

/// A database of clause related things.
pub struct ClauseDB {
    /// The stored clauses, including those marked garbage until the next sweep.
    clauses: Vec<DBClause>,

    /// The allocator of locally produced identifiers.
    ids: IdAllocator,

    /// A count of clauses marked garbage.
    garbage_count: usize,
}

impl ClauseDB {
    /// A new [ClauseDB] with the identifier stream described by `config`.
    pub fn new(config: &Config) -> Self {
        ClauseDB {
            clauses: Vec::default(),
            ids: IdAllocator::new(
                config.sharing.id_origin.value,
                config.sharing.id_stride.value,
            ),
            garbage_count: 0,
        }
    }

    /// The next locally produced clause identifier.
    pub fn fresh_id(&mut self) -> ClauseId {
        self.ids.fresh()
    }

    /// The most recently produced local identifier, if any.
    pub fn last_id(&self) -> Option<ClauseId> {
        self.ids.last()
    }

    /// Whether `id` was produced by this database.
    pub fn is_locally_produced_id(&self, id: ClauseId) -> bool {
        self.ids.is_locally_produced(id)
    }

    /// Stores a clause of two or more literals under the given identifier.
    pub fn store(
        &mut self,
        id: ClauseId,
        literals: CClause,
        redundant: bool,
        glue: u32,
    ) -> Result<ClauseRef, err::ClauseDBError> {
        match literals.len() {
            0 => Err(err::ClauseDBError::EmptyClause),
            1 => Err(err::ClauseDBError::UnitClause),
            _ => {
                if self.clauses.len() > ClauseRef::MAX as usize {
                    return Err(err::ClauseDBError::StorageExhausted);
                }
                let key = self.clauses.len() as ClauseRef;
                log::debug!(target: targets::CLAUSE_DB, "Stored clause [{id}] at {key}");
                self.clauses.push(DBClause::new(id, literals, redundant, glue));
                Ok(key)
            }
        }
    }

    pub fn get(&self, key: ClauseRef) -> &DBClause {
        &self.clauses[key as usize]
    }

    pub fn get_mut(&mut self, key: ClauseRef) -> &mut DBClause {
        &mut self.clauses[key as usize]
    }

    /// Marks the clause at `key` as garbage.
    ///
    /// The clause remains readable until the next [sweep](ClauseDB::sweep); the proof deletion
    /// event is the caller's business.
    pub fn mark_garbage(&mut self, key: ClauseRef) {
        let clause = &mut self.clauses[key as usize];
        if !clause.garbage() {
            clause.mark_garbage();
            self.garbage_count += 1;
        }
    }

    /// A count of stored clauses, garbage included.
    pub fn count(&self) -> usize {
        self.clauses.len()
    }

    /// A count of clauses marked garbage.
    pub fn garbage_count(&self) -> usize {
        self.garbage_count
    }

    /// An iterator over references and clauses, skipping garbage.
    pub fn all_clauses(&self) -> impl Iterator<Item = (ClauseRef, &DBClause)> {
        self.clauses
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.garbage())
            .map(|(i, c)| (i as ClauseRef, c))
    }

    /// An iterator over mutable borrows of all live clauses.
    pub fn all_clauses_mut(&mut self) -> impl Iterator<Item = &mut DBClause> {
        self.clauses.iter_mut().filter(|c| !c.garbage())
    }

    /// Drops every clause marked garbage, compacting the backing vector.
    ///
    /// All [references](ClauseRef) are invalidated; the caller rebuilds the watch and occurrence
    /// structures from the survivors.
    pub fn sweep(&mut self) {
        if self.garbage_count == 0 {
            return;
        }
        let before = self.clauses.len();
        self.clauses.retain(|c| !c.garbage());
        log::info!(
            target: targets::CLAUSE_DB,
            "Swept {} of {before} clauses",
            before - self.clauses.len(),
        );
        self.garbage_count = 0;
    }
}
