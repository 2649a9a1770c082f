use crate::misc::log::targets::{self};

/// The identifier of a clause.
///
/// Identifiers are never reused, are strictly increasing over local derivations, and are the
/// names by which proof hints and shared clauses refer to clauses.
pub type ClauseId = u64;

/// The reserved identifier meaning 'no clause'.
pub const NO_CLAUSE_ID: ClauseId = 0;

/// The index of a clause in the clause database.
///
/// References are positional and invalidated by a garbage sweep, in contrast to identifiers.
pub type ClauseRef = u32;

/// An allocator of locally produced clause identifiers.
///
/// Identifiers walk `origin, origin + stride, origin + 2·stride, …`.
/// In a fleet of engines each member holds a distinct origin modulo a shared stride, so streams
/// from different members never collide and an engine recognises echoes of its own exports by
/// residue.
#[derive(Clone)]
pub struct IdAllocator {
    origin: ClauseId,
    stride: u64,
    next: ClauseId,
}

impl IdAllocator {
    pub fn new(origin: ClauseId, stride: u64) -> Self {
        assert!(origin > NO_CLAUSE_ID, "identifier origin must be positive");
        assert!(stride > 0, "identifier stride must be positive");
        IdAllocator {
            origin,
            stride,
            next: origin,
        }
    }

    /// The next locally produced identifier, advancing the allocator.
    pub fn fresh(&mut self) -> ClauseId {
        let id = self.next;
        self.next += self.stride;
        log::trace!(target: targets::CLAUSE_DB, "Fresh clause id {id}");
        id
    }

    /// The most recently produced identifier, if any.
    pub fn last(&self) -> Option<ClauseId> {
        match self.next == self.origin {
            true => None,
            false => Some(self.next - self.stride),
        }
    }

    /// Whether `id` was (or will next be) produced by this allocator.
    ///
    /// Used to recognise echoes of local exports arriving through a learn source.
    pub fn is_locally_produced(&self, id: ClauseId) -> bool {
        id >= self.origin && (id - self.origin) % self.stride == 0 && id < self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_allocation() {
        let mut ids = IdAllocator::new(3, 4);
        assert_eq!(ids.last(), None);

        assert_eq!(ids.fresh(), 3);
        assert_eq!(ids.fresh(), 7);
        assert_eq!(ids.last(), Some(7));

        assert!(ids.is_locally_produced(3));
        assert!(ids.is_locally_produced(7));
        // Right residue, not yet produced.
        assert!(!ids.is_locally_produced(11));
        // Wrong residue.
        assert!(!ids.is_locally_produced(4));
    }
}
