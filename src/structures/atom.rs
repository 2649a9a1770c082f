//! Atoms, the variables of a formula.
//!
//! Internally an atom is an index into the per-atom structures of the [atom
//! database](crate::db::atom), with index `0` reserved --- a zero in a compaction table or an
//! external map means 'no atom'.
//! The stable, user-visible name of an atom is a (non-zero) external variable, kept in the
//! [external database](crate::db::external).

/// An atom.
pub type Atom = u32;

/// The upper limit on atoms.
///
/// Bounded by the external representation of literals as non-zero [i32]s rather than by the
/// internal representation.
pub const ATOM_MAX: Atom = (i32::MAX - 1) as Atom;
