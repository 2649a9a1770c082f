//! The decision queue: a doubly linked list of atoms in (stamped) bump order.
//!
//! Fresh and recently bumped atoms sit at the tail, and a search loop walks from `unassigned`
//! towards the head for the next decision candidate.
//! Links are addressed by atom, with `0` as the list terminator --- atom `0` is never allocated.

use crate::structures::atom::Atom;

/// The neighbours of an atom in the decision queue.
#[derive(Clone, Copy, Default)]
pub struct Link {
    pub prev: Atom,
    pub next: Atom,
}

/// The decision queue.
pub struct DecisionQueue {
    /// Queue neighbours, indexed by atom.
    pub(crate) links: Vec<Link>,

    /// The head of the queue.
    pub(crate) first: Atom,

    /// The tail of the queue.
    pub(crate) last: Atom,

    /// The cached search position: every atom after this one is assigned.
    pub(crate) unassigned: Atom,
}

impl Default for DecisionQueue {
    fn default() -> Self {
        DecisionQueue {
            // Padding for the unallocated atom 0.
            links: vec![Link::default()],
            first: 0,
            last: 0,
            unassigned: 0,
        }
    }
}

impl DecisionQueue {
    /// Appends a fresh atom at the tail of the queue.
    pub fn push_fresh(&mut self, atom: Atom) {
        debug_assert_eq!(self.links.len(), atom as usize);
        self.links.push(Link {
            prev: self.last,
            next: 0,
        });
        if self.last != 0 {
            self.links[self.last as usize].next = atom;
        } else {
            self.first = atom;
        }
        self.last = atom;
        self.unassigned = atom;
    }

    /// Resets the cached search position to the tail.
    pub fn rewind(&mut self) {
        self.unassigned = self.last;
    }

    /// The atoms of the queue, head first.
    pub fn iter(&self) -> impl Iterator<Item = Atom> + '_ {
        let mut at = self.first;
        std::iter::from_fn(move || {
            if at == 0 {
                return None;
            }
            let atom = at;
            at = self.links[at as usize].next;
            Some(atom)
        })
    }
}
