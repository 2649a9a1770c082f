/*!
Compaction of the internal variable domain.

Inactive atoms (fixed, eliminated, substituted, or pure) leave holes in the index space, and
every per-atom and per-literal structure pays for the holes.
Compaction maps the active atoms down to a contiguous interval and rewrites everything in one
atomic pass.

# The fixed surrogate

Fixed atoms are not simply dropped: the *first* fixed atom is kept, and every other fixed atom
maps onto it --- in the phase which agrees with its value, so a literal true at the root maps to
whichever literal of the surrogate is true.
This removes the per-fixed-literal special case from hot paths while preserving semantics, and
keeps one index whose unit-clause identifiers remain addressable.
Identifiers of the other fixed atoms survive in the external unit table, which is adopted from
the internal table before anything is rewritten.

# Pass order

The order of passes is load-bearing:

1. The external map is flushed (with unit-identifier adoption) before any internal array moves.
2. Internal unit identifiers are moved next, before the table shrinks.
3. Clause literals, then watch blockers, are rewritten.
4. The decision queue is relinked, before the link records themselves move.
5. Trail-like vectors are rewritten and shrunk.
6. Per-atom vectors, then per-literal vectors, move their slots.
7. The value array is rebuilt in a fresh allocation.
8. Frozen and relevant counters are *summed* into their targets.
9. The activity heap is drained in bounded batches, remapped, and refilled in drained order.
10. Assumptions and the constraint are re-applied through the new external map.

The heap drain is the one place cooperative termination is honoured --- and only while LRAT
production is off, as abandoning the pass with a proof attached would leave the chain
inconsistent.
*/

use crate::{
    context::{GenericContext, StatusCounts},
    db::{atom::AtomDB, NO_CLAUSE_ID},
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
};

/// How many heap entries are drained between termination checks.
const HEAP_DRAIN_BATCH: usize = 2048;

/// The compacting map from old atoms to new atoms and literals.
pub(crate) struct AtomMap {
    /// Old atom to new atom; `0` for atoms with no index of their own.
    index: Vec<Atom>,

    /// The image of the *positive* literal of each old atom; `None` for unmapped, unvalued atoms.
    images: Vec<Option<CLiteral>>,

    /// The old greatest atom.
    pub old_max_atom: Atom,

    /// The new greatest atom.
    pub new_max_atom: Atom,

    /// The first fixed atom, `0` if none; every fixed atom maps onto its image.
    pub first_fixed: Atom,

    /// The image of the first fixed atom.
    pub map_first_fixed: Atom,
}

impl AtomMap {
    /// Builds the map by a single ascending pass over the atoms.
    pub fn build(atom_db: &AtomDB) -> Self {
        let old_max_atom = atom_db.max_atom();
        let mut index = vec![0; old_max_atom as usize + 1];
        let mut images = vec![None; old_max_atom as usize + 1];
        let mut new_max_atom = 0;
        let mut first_fixed = 0;
        let mut map_first_fixed = 0;

        for src in 1..=old_max_atom {
            let status = atom_db.status_of(src);
            if status.is_active() {
                new_max_atom += 1;
                index[src as usize] = new_max_atom;
                images[src as usize] = Some(CLiteral::fresh(new_max_atom, true));
            } else if status.is_fixed() && first_fixed == 0 {
                new_max_atom += 1;
                first_fixed = src;
                map_first_fixed = new_max_atom;
                index[src as usize] = new_max_atom;
                images[src as usize] = Some(CLiteral::fresh(new_max_atom, true));
            }
        }

        // Any other valued atom collapses onto the surrogate, in the agreeing phase.
        if first_fixed != 0 {
            let first_fixed_value = atom_db.value_of_atom(first_fixed);
            for src in 1..=old_max_atom {
                if index[src as usize] == 0 {
                    let value = atom_db.value_of_atom(src);
                    if value != 0 {
                        images[src as usize] =
                            Some(CLiteral::fresh(map_first_fixed, value == first_fixed_value));
                    }
                }
            }
        }

        AtomMap {
            index,
            images,
            old_max_atom,
            new_max_atom,
            first_fixed,
            map_first_fixed,
        }
    }

    /// The new index of an old atom; `0` for atoms with no index of their own.
    pub fn atom(&self, src: Atom) -> Atom {
        self.index[src as usize]
    }

    /// The image of an old literal, routing valued atoms onto the surrogate.
    ///
    /// `None` only for literals over unmapped, unvalued atoms --- which no rewritten structure
    /// may contain.
    pub fn literal(&self, src: CLiteral) -> Option<CLiteral> {
        let base = self.images[src.atom() as usize]?;
        match src.polarity() {
            true => Some(base),
            false => Some(base.negate()),
        }
    }

    /// Moves mapped slots of a per-atom vector down, then shrinks it to the new domain.
    pub fn rewrite_atom_vec<T>(&self, v: &mut Vec<T>) {
        for src in 1..=self.old_max_atom {
            let dst = self.atom(src);
            if dst != 0 && dst != src {
                v.swap(dst as usize, src as usize);
            }
        }
        v.truncate(self.new_max_atom as usize + 1);
        v.shrink_to_fit();
    }

    /// Moves mapped slot pairs of a per-literal vector down, then shrinks it to the new domain.
    pub fn rewrite_lit_vec<T: Default>(&self, v: &mut crate::generic::lit_vec::LitVec<T>) {
        for src in 1..=self.old_max_atom {
            let dst = self.atom(src);
            if dst != 0 && dst != src {
                v.swap_atoms(dst, src);
            }
        }
        v.truncate_atoms(self.new_max_atom);
    }

    /// Rewrites a vector of literals in place, flushing literals of unmapped atoms.
    pub fn rewrite_literal_vec(&self, v: &mut Vec<CLiteral>) {
        let mut keep = 0;
        for i in 0..v.len() {
            let src = v[i];
            let dst = self.atom(src.atom());
            if dst == 0 {
                continue;
            }
            v[keep] = CLiteral::fresh(dst, src.polarity());
            keep += 1;
        }
        v.truncate(keep);
        v.shrink_to_fit();
    }

    /// Rewrites a vector of atoms in place, flushing unmapped atoms.
    pub fn rewrite_atom_list(&self, v: &mut Vec<Atom>) {
        let mut keep = 0;
        for i in 0..v.len() {
            let dst = self.atom(v[i]);
            if dst == 0 {
                continue;
            }
            v[keep] = dst;
            keep += 1;
        }
        v.truncate(keep);
        v.shrink_to_fit();
    }
}

impl<R: rand::Rng> GenericContext<R> {
    /// Whether compaction should run now.
    ///
    /// Requires: the root, compaction enabled, the scheduled conflict count reached, and enough
    /// inactive atoms in both absolute and proportional terms.
    pub fn compacting(&self) -> bool {
        if self.trail.level() != 0 {
            return false;
        }
        if !self.config.compaction.enabled.value {
            return false;
        }
        if self.counters.conflicts < self.counters.lim_compact {
            return false;
        }
        let max_atom = self.atom_db.max_atom();
        let inactive = self.counters.now.inactive();
        debug_assert!(inactive <= max_atom);
        if inactive == 0 {
            return false;
        }
        if inactive < self.config.compaction.minimum.value {
            return false;
        }
        inactive as f64
            >= 1e-3 * self.config.compaction.proportion.value as f64 * max_atom as f64
    }

    /// Rewrites every structure of the context so internal atoms form a contiguous interval.
    pub fn compact(&mut self) {
        debug_assert_eq!(self.trail.level(), 0);
        debug_assert!(!self.unsat);
        debug_assert!(self.scratch_clause.is_empty());
        debug_assert!(self.scratch_chain.is_empty());
        debug_assert_eq!(self.trail.propagated, self.trail.assignments.len());

        self.counters.compacts += 1;
        let run = self.counters.compacts;
        let lrat = self.lrat();

        self.collect_garbage();

        let map = AtomMap::build(&self.atom_db);
        match map.first_fixed {
            0 => log::debug!(target: targets::COMPACTION, "No atom fixed"),
            first => log::debug!(target: targets::COMPACTION, "First fixed atom {first}"),
        }

        // External flush.  This has to occur before any internal array is rewritten.
        // Unit identifiers of fixed atoms are adopted into the external table here, so the
        // identifiers survive the remap of the internal table below.
        for var in 1..=self.external.max_var() {
            let Some(image) = self.external.mapping(var) else {
                continue;
            };
            let (e_pos, e_neg) = self.units.external_pair(var);
            debug_assert!(e_pos == NO_CLAUSE_ID || e_neg == NO_CLAUSE_ID);
            if e_pos == NO_CLAUSE_ID && e_neg == NO_CLAUSE_ID {
                let i_pos = self.units.internal[image];
                let i_neg = self.units.internal[image.negate()];
                if i_pos != NO_CLAUSE_ID || i_neg != NO_CLAUSE_ID {
                    self.units.set_external_pair(var, i_pos, i_neg);
                }
            }
            let mapped = map.literal(image);
            log::trace!(
                target: targets::COMPACTION,
                "Compact {run} maps external {var} to {mapped:?} from {image}",
            );
            self.external.set_mapping(var, mapped);
        }

        // Internal unit identifiers: surviving entries move, entries of unmapped unvalued atoms
        // and of fixed atoms other than the first are zeroed.
        for src in 1..=map.old_max_atom {
            let dst = map.atom(src);
            let value = self.atom_db.value_of_atom(src);
            let pos = CLiteral::fresh(src, true);
            let neg = pos.negate();

            if dst == 0 && value == 0 {
                self.units.internal[pos] = NO_CLAUSE_ID;
                self.units.internal[neg] = NO_CLAUSE_ID;
                continue;
            }

            if value == 0 || src == map.first_fixed {
                debug_assert!(dst != 0);
                if dst == src {
                    continue;
                }
                let dst_pos = CLiteral::fresh(dst, true);
                let dst_neg = dst_pos.negate();
                debug_assert_eq!(self.units.internal[dst_pos], NO_CLAUSE_ID);
                debug_assert_eq!(self.units.internal[dst_neg], NO_CLAUSE_ID);
                self.units.internal[dst_pos] = self.units.internal[pos];
                self.units.internal[dst_neg] = self.units.internal[neg];
                self.units.internal[pos] = NO_CLAUSE_ID;
                self.units.internal[neg] = NO_CLAUSE_ID;
                continue;
            }

            // Another fixed atom: the identifier survives in the external table only.
            debug_assert!(
                !lrat
                    || self.units.internal[pos] != NO_CLAUSE_ID
                    || self.units.internal[neg] != NO_CLAUSE_ID
            );
            self.units.internal[pos] = NO_CLAUSE_ID;
            self.units.internal[neg] = NO_CLAUSE_ID;
        }
        self.units.internal.truncate_atoms(map.new_max_atom);

        // Literals in clauses.  Collection has run, so no clause contains a root-true literal.
        for clause in self.clause_db.all_clauses_mut() {
            for literal in clause.literals_mut().iter_mut() {
                debug_assert_ne!(map.atom(literal.atom()), 0);
                *literal = match map.literal(*literal) {
                    Some(mapped) => mapped,
                    None => panic!("! Unmapped literal {literal} in compacted clause"),
                };
            }
        }

        // Blocking literals in watches, and the contents of the binary implication graph.
        for list in self.atom_db.watches.iter_mut() {
            for watch in list.iter_mut() {
                watch.blocker = match map.literal(watch.blocker) {
                    Some(mapped) => mapped,
                    None => panic!("! Unmapped blocking literal"),
                };
            }
        }
        for list in self.atom_db.binary_graph.iter_mut() {
            for literal in list.iter_mut() {
                *literal = match map.literal(*literal) {
                    Some(mapped) => mapped,
                    None => panic!("! Unmapped implication literal"),
                };
            }
        }

        // The decision queue is relinked before the link records themselves move: inactive
        // entries and the fixed surrogate are skipped, relative order of survivors preserved.
        {
            let queue = &mut self.atom_db.queue;
            let mut prev: Atom = 0;
            let mut mapped_prev: Atom = 0;
            let mut at = queue.first;
            while at != 0 {
                let next = queue.links[at as usize].next;
                if at != map.first_fixed {
                    let dst = map.atom(at);
                    if dst != 0 {
                        if prev != 0 {
                            queue.links[prev as usize].next = dst;
                        } else {
                            queue.first = dst;
                        }
                        queue.links[at as usize].prev = mapped_prev;
                        mapped_prev = dst;
                        prev = at;
                    }
                }
                at = next;
            }
            if prev != 0 {
                queue.links[prev as usize].next = 0;
            } else {
                queue.first = 0;
            }
            queue.last = mapped_prev;
            queue.unassigned = mapped_prev;
        }

        // Trail-like vectors.
        map.rewrite_literal_vec(&mut self.trail.assignments);
        self.trail.propagated = self.trail.assignments.len();
        if map.first_fixed != 0 {
            debug_assert_eq!(self.trail.assignments.len(), 1);
            // Before the assignment records move.
            self.atom_db.info[map.first_fixed as usize].trail_position = 0;
        } else {
            debug_assert!(self.trail.assignments.is_empty());
        }

        if self.config.lazy_fixed_notification.value
            && self.trail.notified != self.trail.notify_trail.len()
        {
            self.notify_fixed_assignments();
        }
        map.rewrite_literal_vec(&mut self.trail.notify_trail);
        self.trail.notified = self.trail.notify_trail.len();

        map.rewrite_atom_list(&mut self.trail.probes);

        // Per-atom vectors.
        map.rewrite_atom_vec(&mut self.atom_db.status);
        map.rewrite_atom_vec(&mut self.atom_db.marked);
        map.rewrite_atom_vec(&mut self.atom_db.parent);
        for slot in 1..=map.new_max_atom {
            let parent = self.atom_db.parent[slot as usize];
            if parent != 0 {
                self.atom_db.parent[slot as usize] = map.atom(parent);
            }
        }
        map.rewrite_atom_vec(&mut self.atom_db.phases.saved);
        map.rewrite_atom_vec(&mut self.atom_db.phases.forced);
        map.rewrite_atom_vec(&mut self.atom_db.phases.target);
        map.rewrite_atom_vec(&mut self.atom_db.phases.best);
        map.rewrite_atom_vec(&mut self.atom_db.phases.previous);
        map.rewrite_atom_vec(&mut self.atom_db.phases.minimum);
        map.rewrite_atom_vec(&mut self.atom_db.info);
        map.rewrite_atom_vec(&mut self.atom_db.bumped);
        map.rewrite_atom_vec(&mut self.atom_db.analyzed_stamp);
        map.rewrite_atom_vec(&mut self.atom_db.queue.links);
        map.rewrite_atom_vec(&mut self.atom_db.i2e);

        // Per-literal vectors.
        map.rewrite_lit_vec(&mut self.atom_db.probe_fixed);
        map.rewrite_lit_vec(&mut self.atom_db.occurrence_count);
        map.rewrite_lit_vec(&mut self.atom_db.watches);
        map.rewrite_lit_vec(&mut self.atom_db.occurrences);
        map.rewrite_lit_vec(&mut self.atom_db.binary_graph);

        // The value array is rebuilt in a fresh allocation sized to the new domain, copying both
        // sides of every mapped atom.
        {
            let mut values: crate::generic::lit_vec::LitVec<i8> =
                crate::generic::lit_vec::LitVec::new();
            values.grow_for(map.new_max_atom);
            for src in 1..=map.old_max_atom {
                let dst = map.atom(src);
                if dst == 0 {
                    continue;
                }
                *values.at_mut(dst, true) = *self.atom_db.values.at(src, true);
                *values.at_mut(dst, false) = *self.atom_db.values.at(src, false);
            }
            self.atom_db.values = values;
        }

        // Frozen and relevant counters are summed, not overwritten: every retired atom folds its
        // counts into its image.
        for src in 1..=map.old_max_atom {
            let Some(image) = map.literal(CLiteral::fresh(src, true)) else {
                continue;
            };
            let dst = image.atom();
            if dst == src {
                continue;
            }
            debug_assert!(dst < src);
            self.atom_db.frozen[dst as usize] += self.atom_db.frozen[src as usize];
            self.atom_db.frozen[src as usize] = 0;
            self.atom_db.relevant[dst as usize] += self.atom_db.relevant[src as usize];
            self.atom_db.relevant[src as usize] = 0;
        }
        self.atom_db.frozen.truncate(map.new_max_atom as usize + 1);
        self.atom_db.frozen.shrink_to_fit();
        self.atom_db.relevant.truncate(map.new_max_atom as usize + 1);
        self.atom_db.relevant.shrink_to_fit();

        // The activity heap cannot be rewritten in place under an arbitrary map, so it is
        // drained, the score array remapped, and the survivors reinserted in drained order.
        // Draining happens in batches so cooperative termination stays responsive --- though
        // with LRAT on a request is ignored, as an early return would leave the proof chain
        // inconsistent.
        let mut survivors: Vec<Atom> = Vec::default();
        loop {
            let mut drained = 0;
            while drained < HEAP_DRAIN_BATCH {
                let Some(src) = self.atom_db.activity.pop_max() else {
                    break;
                };
                drained += 1;
                let src = src as Atom;
                if src == map.first_fixed {
                    continue;
                }
                let dst = map.atom(src);
                if dst == 0 {
                    continue;
                }
                survivors.push(dst);
            }
            if self.atom_db.activity.active_count() == 0 {
                break;
            }
            if self.check_callback_terminate() && !lrat {
                log::warn!(target: targets::COMPACTION, "Compaction abandoned on termination");
                return;
            }
        }
        map.rewrite_atom_vec(self.atom_db.activity.values_mut());
        self.atom_db
            .activity
            .shrink_universe(map.new_max_atom as usize + 1);
        for atom in survivors {
            self.atom_db.activity.activate(atom as usize);
        }

        // Assumptions and the constraint are re-applied through the new external map; assumed
        // and constrained atoms are frozen, so their images are never lost.
        if !self.external.assumptions.is_empty() {
            self.assumptions.clear();
            let external = self.external.assumptions.clone();
            for elit in external {
                match self.external.map_literal(elit) {
                    Some(literal) => self.assumptions.push(literal),
                    None => panic!("! Assumption {elit} lost in compaction"),
                }
            }
            log::debug!(
                target: targets::COMPACTION,
                "Compact {run} reassumed {} external assumptions",
                self.assumptions.len(),
            );
        }
        if !self.external.constraint.is_empty() {
            self.constraint.clear();
            let external = self.external.constraint.clone();
            for elit in external {
                match self.external.map_literal(elit) {
                    Some(literal) => self.constraint.push(literal),
                    None => panic!("! Constraint literal {elit} lost in compaction"),
                }
            }
        }

        log::info!(
            target: targets::COMPACTION,
            "Compact {run} reduced internal atoms from {} to {}",
            map.old_max_atom,
            map.new_max_atom,
        );

        self.atom_db.max_atom = map.new_max_atom;

        self.counters.now = StatusCounts {
            fixed: (map.first_fixed != 0) as u32,
            eliminated: 0,
            substituted: 0,
            pure: 0,
        };

        // The target and best assigned counters shrink with the phase arrays.
        let mut target_assigned = 0;
        let mut best_assigned = 0;
        for atom in 1..=map.new_max_atom as usize {
            if self.atom_db.phases.target[atom] != 0 {
                target_assigned += 1;
            }
            if self.atom_db.phases.best[atom] != 0 {
                best_assigned += 1;
            }
        }
        self.counters.target_assigned = target_assigned;
        self.counters.best_assigned = best_assigned;

        let delta = self.config.compaction.interval.value * (self.counters.compacts + 1);
        self.counters.lim_compact = self.counters.conflicts + delta;
        log::debug!(
            target: targets::COMPACTION,
            "New compact limit {} after {delta} conflicts",
            self.counters.lim_compact,
        );
    }
}
