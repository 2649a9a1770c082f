/*!
A database of 'atom related' things, accessed via fields on an [AtomDB] struct.

Things include:
- A current valuation, held two-sided so the value of a negative literal is read without a branch.
- The [status](AtomStatus) of each atom, and the frozen/relevant reference counters.
- Saved, forced, target, best, previous, and minimum phases.
- [Watch lists](watch_db) for each literal, occurrence lists and counts, and the binary
  implication graph.
- The [decision queue](queue) and the activity [heap](crate::generic::index_heap::IndexHeap),
  the two orderings a search loop draws decisions from.
- Probe scheduling stamps for an external failed-literal prober.
- The internal half of the external map: the external variable of each atom.

Every structure here is indexed by atom or by literal, and every one of them is rewritten when
[compaction](crate::procedures::compact) shrinks the atom domain --- which is why they are
gathered behind one struct with crate-visible fields rather than scattered.
*/

pub mod queue;
mod status;
pub mod watch_db;

pub use status::AtomStatus;

use queue::DecisionQueue;
use watch_db::{Watch, WatchList};

use crate::{
    config::Activity,
    db::{ClauseRef, LevelIndex},
    generic::{index_heap::IndexHeap, lit_vec::LitVec},
    misc::log::targets::{self},
    structures::{
        atom::{Atom, ATOM_MAX},
        literal::{CLiteral, Literal},
    },
    types::err::{self},
};

/// Where and when an atom was assigned.
#[derive(Clone, Copy, Default)]
pub struct AssignmentInfo {
    /// The decision level of the assignment.
    pub level: LevelIndex,

    /// The position of the assignment on the trail.
    pub trail_position: u32,
}

/// The phase arrays: remembered values guiding future decisions.
///
/// `0` records no phase; otherwise the sign is the remembered value.
#[derive(Default)]
pub struct Phases {
    /// The value the atom held when last unassigned.
    pub saved: Vec<i8>,

    /// A value forced by rephasing.
    pub forced: Vec<i8>,

    /// The value under the largest trail seen this stabilisation.
    pub target: Vec<i8>,

    /// The value under the largest trail ever seen.
    pub best: Vec<i8>,

    /// The value before the previous rephase.
    pub previous: Vec<i8>,

    /// The value under the smallest conflicting trail, for local-search style rephasing.
    pub minimum: Vec<i8>,
}

impl Phases {
    fn push_fresh(&mut self) {
        self.saved.push(0);
        self.forced.push(0);
        self.target.push(0);
        self.best.push(0);
        self.previous.push(0);
        self.minimum.push(0);
    }
}

/// The atom database.
pub struct AtomDB {
    /// The greatest allocated atom; `0` when no atom has been allocated.
    pub(crate) max_atom: Atom,

    /// The current valuation, two-sided: `values[l] ∈ {-1, 0, 1}` with `values[l] = -values[¬l]`.
    pub(crate) values: LitVec<i8>,

    /// The status of each atom.
    pub(crate) status: Vec<AtomStatus>,

    /// How many freezes hold each atom in the external map.
    pub(crate) frozen: Vec<u32>,

    /// How many outstanding reasons make each atom relevant to conclusion certificates.
    pub(crate) relevant: Vec<u32>,

    /// Transient per-atom marks.
    pub(crate) marked: Vec<bool>,

    /// The implication parent of each atom during probing; `0` for none.
    pub(crate) parent: Vec<Atom>,

    /// The phase arrays.
    pub(crate) phases: Phases,

    /// Where and when each atom was assigned.
    pub(crate) info: Vec<AssignmentInfo>,

    /// The conflict count at which each atom was last bumped towards the queue tail.
    pub(crate) bumped: Vec<u64>,

    /// A stamp deduplicating bumps of an atom within one analysis round.
    pub(crate) analyzed_stamp: Vec<u64>,

    /// The decision queue.
    pub queue: DecisionQueue,

    /// The activity heap: any atom without a value is a candidate, most active first.
    pub activity: IndexHeap<Activity>,

    /// The clauses watching each literal.
    pub(crate) watches: LitVec<WatchList>,

    /// The clauses in which each literal occurs, maintained for inprocessing hooks.
    pub(crate) occurrences: LitVec<Vec<ClauseRef>>,

    /// A count of occurrences of each literal, surviving occurrence-list rebuilds.
    pub(crate) occurrence_count: LitVec<u64>,

    /// The binary implication graph: for each literal, the literals some binary clause forces.
    pub(crate) binary_graph: LitVec<Vec<CLiteral>>,

    /// The total of fixed atoms when each literal was last probed; probing a literal again is
    /// useless until the total grows.
    pub(crate) probe_fixed: LitVec<i64>,

    /// The external variable of each atom; `0` for an atom without an external name.
    pub(crate) i2e: Vec<i32>,

    /// Whether watch lists are installed and usable.
    pub(crate) watching: bool,
}

impl Default for AtomDB {
    fn default() -> Self {
        let mut db = AtomDB {
            max_atom: 0,

            values: LitVec::new(),
            status: vec![AtomStatus::default()],
            frozen: vec![0],
            relevant: vec![0],
            marked: vec![false],
            parent: vec![0],
            phases: Phases::default(),
            info: vec![AssignmentInfo::default()],
            bumped: vec![0],
            analyzed_stamp: vec![0],

            queue: DecisionQueue::default(),
            activity: IndexHeap::default(),

            watches: LitVec::new(),
            occurrences: LitVec::new(),
            occurrence_count: LitVec::new(),
            binary_graph: LitVec::new(),
            probe_fixed: LitVec::new(),

            i2e: vec![0],

            watching: true,
        };
        // Padding for the unallocated atom 0.
        db.phases.push_fresh();
        db.values.grow_for(0);
        db.watches.grow_for(0);
        db.occurrences.grow_for(0);
        db.occurrence_count.grow_for(0);
        db.binary_graph.grow_for(0);
        db.probe_fixed.grow_for(0);
        db.activity.add(0, Activity::default());
        db
    }
}

impl AtomDB {
    /// The greatest allocated atom.
    pub fn max_atom(&self) -> Atom {
        self.max_atom
    }

    /// A fresh atom with the given external name --- on Ok the atom is part of the language of
    /// the context.
    pub fn fresh_atom(&mut self, external: i32) -> Result<Atom, err::AtomDBError> {
        if self.max_atom >= ATOM_MAX {
            return Err(err::AtomDBError::AtomsExhausted);
        }
        let atom = self.max_atom + 1;
        self.max_atom = atom;

        self.values.grow_for(atom);
        self.status.push(AtomStatus::Active);
        self.frozen.push(0);
        self.relevant.push(0);
        self.marked.push(false);
        self.parent.push(0);
        self.phases.push_fresh();
        self.info.push(AssignmentInfo::default());
        self.bumped.push(0);
        self.analyzed_stamp.push(0);

        self.queue.push_fresh(atom);
        self.activity.add(atom as usize, Activity::default());
        self.activity.activate(atom as usize);

        self.watches.grow_for(atom);
        self.occurrences.grow_for(atom);
        self.occurrence_count.grow_for(atom);
        self.binary_graph.grow_for(atom);
        self.probe_fixed.grow_for(atom);

        self.i2e.push(external);

        log::trace!(target: targets::ATOM_DB, "Fresh atom {atom} for external {external}");
        Ok(atom)
    }

    /// The value of a literal on the current valuation: `1` true, `-1` false, `0` unset.
    pub fn value_of(&self, literal: CLiteral) -> i8 {
        self.values[literal]
    }

    /// The value of the positive literal of an atom.
    pub fn value_of_atom(&self, atom: Atom) -> i8 {
        *self.values.at(atom, true)
    }

    /// Makes `literal` true on the current valuation.
    pub fn set_value(&mut self, literal: CLiteral) {
        debug_assert_eq!(self.values[literal], 0);
        self.values[literal] = 1;
        self.values[literal.negate()] = -1;
    }

    /// Clears the value of an atom.
    pub fn clear_value(&mut self, atom: Atom) {
        *self.values.at_mut(atom, true) = 0;
        *self.values.at_mut(atom, false) = 0;
    }

    pub fn status_of(&self, atom: Atom) -> AtomStatus {
        self.status[atom as usize]
    }

    pub fn set_status(&mut self, atom: Atom, status: AtomStatus) {
        self.status[atom as usize] = status;
    }

    /// The external variable of an atom, `0` if the atom has no external name.
    pub fn external_of(&self, atom: Atom) -> i32 {
        self.i2e[atom as usize]
    }

    /// Whether watch lists are installed.
    pub fn watching(&self) -> bool {
        self.watching
    }

    /// Notes that `watch.key` watches `literal`.
    pub fn watch(&mut self, literal: CLiteral, watch: Watch) {
        self.watches[literal].push(watch);
    }

    /// Detaches the watch list of a literal for examination, see
    /// [restore_watches](AtomDB::restore_watches).
    pub(crate) fn take_watches(&mut self, literal: CLiteral) -> WatchList {
        std::mem::take(&mut self.watches[literal])
    }

    pub(crate) fn restore_watches(&mut self, literal: CLiteral, list: WatchList) {
        debug_assert!(self.watches[literal].is_empty());
        self.watches[literal] = list;
    }

    /// Notes an occurrence of `literal` in the clause at `key`.
    pub fn note_occurrence(&mut self, literal: CLiteral, key: ClauseRef) {
        self.occurrences[literal].push(key);
        self.occurrence_count[literal] += 1;
    }

    /// The clauses in which `literal` occurs.
    pub fn occurrences_of(&self, literal: CLiteral) -> &[ClauseRef] {
        &self.occurrences[literal]
    }

    /// Notes a binary clause over two literals in the implication graph.
    pub fn note_binary(&mut self, a: CLiteral, b: CLiteral) {
        self.binary_graph[a.negate()].push(b);
        self.binary_graph[b.negate()].push(a);
    }

    /// Stamps a probe of `literal` at the given total of fixed atoms.
    ///
    /// Stamps are offset by one so the zero default reads as 'never probed'.
    pub fn note_probe(&mut self, literal: CLiteral, fixed_total: u64) {
        self.probe_fixed[literal] = fixed_total as i64 + 1;
    }

    /// Whether probing `literal` is stale: it was probed, and no atom has been fixed since.
    pub fn probe_is_stale(&self, literal: CLiteral, fixed_total: u64) -> bool {
        self.probe_fixed[literal] > fixed_total as i64
    }

    /// Increments the freeze counter of an atom.
    pub fn freeze(&mut self, atom: Atom) {
        self.frozen[atom as usize] += 1;
    }

    /// Decrements the freeze counter of an atom, saturating at zero.
    pub fn melt(&mut self, atom: Atom) {
        let count = &mut self.frozen[atom as usize];
        *count = count.saturating_sub(1);
    }

    pub fn frozen(&self, atom: Atom) -> bool {
        self.frozen[atom as usize] > 0
    }

    /// Counts a reason for the atom to appear in conclusion certificates.
    pub fn note_relevant(&mut self, atom: Atom) {
        self.relevant[atom as usize] += 1;
    }

    /// How many outstanding reasons make the atom relevant to conclusion certificates.
    pub fn relevant(&self, atom: Atom) -> u32 {
        self.relevant[atom as usize]
    }

    /// A value to suggest for an unvalued atom: the saved phase if one exists, otherwise a lean
    /// towards false with probability `1 - lean`.
    pub fn preferred_value(
        &self,
        atom: Atom,
        rng: &mut impl rand::Rng,
        lean: crate::config::PolarityLean,
    ) -> bool {
        match self.phases.saved[atom as usize] {
            0 => rng.gen_bool(lean),
            phase => phase > 0,
        }
    }

    /// Bumps the activity of an atom, moving it towards the front of the heap.
    pub fn bump_activity(&mut self, atom: Atom, delta: Activity) {
        let bumped = self.activity.value_at(atom as usize) + delta;
        self.activity.revalue(atom as usize, bumped);
    }
}
