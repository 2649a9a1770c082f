//! A two-sided vector, indexed by literals.
//!
//! Several structures hold one entry per *literal* rather than per atom: values, watch lists,
//! occurrence lists, the binary implication graph, unit-clause identifiers.
//! A [LitVec] packs both polarities of an atom into adjacent slots of a single allocation, using
//! the [index](crate::structures::literal::Literal::index) of a literal, so that lookup by a
//! negative literal costs no branch and compaction can move both slots of an atom together.

use crate::structures::{
    atom::Atom,
    literal::{CLiteral, Literal},
};

/// A vector with one entry for each polarity of each atom.
#[derive(Clone, Default)]
pub struct LitVec<T> {
    items: Vec<T>,
}

impl<T: Default> LitVec<T> {
    /// An empty structure --- use [grow_for](LitVec::grow_for) before indexing.
    pub fn new() -> Self {
        LitVec { items: Vec::new() }
    }

    /// Ensures slots exist for both literals of every atom up to and including `atom`.
    pub fn grow_for(&mut self, atom: Atom) {
        let required = 2 * (atom as usize + 1);
        if self.items.len() < required {
            self.items.resize_with(required, T::default);
        }
    }

    /// A count of atoms for which slots exist.
    pub fn atom_limit(&self) -> usize {
        self.items.len() / 2
    }

    /// Shrinks the structure to cover atoms up to and including `atom`, releasing spare capacity.
    pub fn truncate_atoms(&mut self, atom: Atom) {
        self.items.truncate(2 * (atom as usize + 1));
        self.items.shrink_to_fit();
    }

    /// Swaps the slot pairs of two atoms.
    pub fn swap_atoms(&mut self, a: Atom, b: Atom) {
        let (a, b) = (2 * a as usize, 2 * b as usize);
        self.items.swap(a, b);
        self.items.swap(a + 1, b + 1);
    }

    /// The entry for the literal of `atom` with the given polarity.
    pub fn at(&self, atom: Atom, polarity: bool) -> &T {
        &self[CLiteral::fresh(atom, polarity)]
    }

    /// A mutable borrow of the entry for the literal of `atom` with the given polarity.
    pub fn at_mut(&mut self, atom: Atom, polarity: bool) -> &mut T {
        &mut self[CLiteral::fresh(atom, polarity)]
    }

    /// An iterator over mutable borrows of every entry.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }
}

impl<T: Default> std::ops::Index<CLiteral> for LitVec<T> {
    type Output = T;

    fn index(&self, literal: CLiteral) -> &T {
        &self.items[literal.index()]
    }
}

impl<T: Default> std::ops::IndexMut<CLiteral> for LitVec<T> {
    fn index_mut(&mut self, literal: CLiteral) -> &mut T {
        &mut self.items[literal.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sides() {
        let mut v: LitVec<i8> = LitVec::new();
        v.grow_for(4);

        let p = CLiteral::fresh(3, true);
        v[p] = 1;
        v[-p] = -1;

        assert_eq!(*v.at(3, true), 1);
        assert_eq!(*v.at(3, false), -1);
        assert_eq!(*v.at(4, true), 0);
    }

    #[test]
    fn atoms_move_together() {
        let mut v: LitVec<u64> = LitVec::new();
        v.grow_for(5);
        *v.at_mut(5, true) = 55;
        *v.at_mut(5, false) = 50;

        v.swap_atoms(2, 5);
        v.truncate_atoms(2);

        assert_eq!(*v.at(2, true), 55);
        assert_eq!(*v.at(2, false), 50);
        assert_eq!(v.atom_limit(), 3);
    }
}
