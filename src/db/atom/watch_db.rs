//! Watch lists: the two-literal lazy index used to detect unit propagation on a clause.
//!
//! Each clause of two or more literals watches two of its literals, and each watched literal's
//! list holds the clause [reference](ClauseRef) together with a *blocking* literal --- some other
//! literal of the clause whose truth witnesses that the clause needs no attention.
//! Checking the blocker first usually saves the trip to the clause database; for binary clauses
//! the blocker is the whole story, and the clause itself is never read during propagation.
//!
//! The watched literals of a clause are its first two: propagation maintains this by swapping a
//! replacement literal into the watched position when a watch moves.

use crate::{db::ClauseRef, structures::literal::CLiteral};

/// A record that a clause is watching some literal.
#[derive(Clone, Copy)]
pub struct Watch {
    /// The watching clause.
    pub key: ClauseRef,

    /// Another literal of the clause; if true, the clause is satisfied.
    pub blocker: CLiteral,

    /// Whether the watching clause is binary.
    pub binary: bool,
}

impl Watch {
    pub fn new(key: ClauseRef, blocker: CLiteral, binary: bool) -> Self {
        Watch {
            key,
            blocker,
            binary,
        }
    }
}

/// The clauses watching a literal.
pub type WatchList = Vec<Watch>;
