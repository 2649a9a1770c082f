//! Clauses: disjunctions of literals.
//!
//! Anything which can report its size and iterate its literals counts as a clause, with the
//! canonical representation being a vector of [CLiteral]s.
//! Stored clauses carry considerably more structure --- see
//! [DBClause](crate::db::clause::db_clause::DBClause).

use crate::structures::literal::{CLiteral, Literal};

/// The canonical representation of a clause.
pub type CClause = Vec<CLiteral>;

/// Something which can be read as a disjunction of literals.
pub trait Clause {
    /// A count of the literals in the clause.
    fn size(&self) -> usize;

    /// The literals of the clause.
    fn literals(&self) -> impl Iterator<Item = CLiteral>;

    /// The clause in its canonical form.
    fn canonical(self) -> CClause;
}

impl Clause for CLiteral {
    fn size(&self) -> usize {
        1
    }

    fn literals(&self) -> impl Iterator<Item = CLiteral> {
        std::iter::once(*self)
    }

    fn canonical(self) -> CClause {
        vec![self]
    }
}

impl Clause for CClause {
    fn size(&self) -> usize {
        self.len()
    }

    fn literals(&self) -> impl Iterator<Item = CLiteral> {
        self.iter().copied()
    }

    fn canonical(self) -> CClause {
        self
    }
}

impl Clause for &[CLiteral] {
    fn size(&self) -> usize {
        self.len()
    }

    fn literals(&self) -> impl Iterator<Item = CLiteral> {
        self.iter().copied()
    }

    fn canonical(self) -> CClause {
        self.to_vec()
    }
}

/// The representation of a clause as space-separated signed integers, without a closing zero.
pub fn as_dimacs(literals: &[i32]) -> String {
    literals
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
