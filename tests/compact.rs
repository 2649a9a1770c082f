use stoat_sat::{
    config::Config,
    context::Context,
    structures::literal::{CLiteral, Literal},
};

/// A context with compaction floors lowered so small tests can trigger a run.
fn eager_context() -> Context {
    let mut config = Config::default();
    config.compaction.minimum.value = 1;
    Context::from_config(config)
}

mod triggering {
    use super::*;

    #[test]
    fn requires_inactive_atoms() {
        let mut ctx = eager_context();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.limit("compact", 0).unwrap();

        assert!(!ctx.compacting());

        ctx.add_clause(&[3]).unwrap();
        assert!(ctx.compacting());
    }

    #[test]
    fn requires_the_root() {
        let mut ctx = eager_context();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[3]).unwrap();
        ctx.limit("compact", 0).unwrap();
        ctx.propagate().unwrap();

        ctx.decide(4);
        assert!(!ctx.compacting());

        ctx.backtrack(0);
        assert!(ctx.compacting());
    }

    #[test]
    fn respects_the_conflict_schedule() {
        let mut ctx = eager_context();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[3]).unwrap();

        // The default limit is an interval of conflicts away.
        assert!(!ctx.compacting());

        ctx.counters.conflicts = ctx.counters.lim_compact;
        assert!(ctx.compacting());
    }

    #[test]
    fn respects_the_enable_switch() {
        let mut ctx = eager_context();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[3]).unwrap();
        ctx.limit("compact", 0).unwrap();

        assert!(ctx.compacting());
        ctx.set_option("compact", 0).unwrap();
        assert!(!ctx.compacting());
    }
}

mod mapping {
    use super::*;

    /// Five variables, one original clause, one fixed, two eliminated: the survivors pack down
    /// with the fixed atom as the surrogate in the middle.
    #[test]
    fn one_fixed_two_eliminated() {
        let mut ctx = eager_context();
        ctx.reserve(5);

        ctx.add_clause(&[1, 2]).unwrap(); // id 1
        ctx.add_clause(&[3]).unwrap(); // id 2, fixes 3
        ctx.propagate().unwrap();

        ctx.mark_eliminated(2, &[]);
        ctx.mark_eliminated(4, &[]);

        ctx.compact();

        assert_eq!(ctx.atom_db.max_atom(), 3);
        assert_eq!(ctx.active(), 2);
        assert_eq!(ctx.counters.now.fixed, 1);
        assert_eq!(ctx.counters.now.eliminated, 0);

        // External 1 → 1, 3 → 2 (the surrogate), 5 → 3; the eliminated lose their image.
        assert_eq!(ctx.external.mapping(1), Some(CLiteral::fresh(1, true)));
        assert_eq!(ctx.external.mapping(3), Some(CLiteral::fresh(2, true)));
        assert_eq!(ctx.external.mapping(5), Some(CLiteral::fresh(3, true)));
        assert_eq!(ctx.external.mapping(2), None);
        assert_eq!(ctx.external.mapping(4), None);

        // The unit which fixed external 3 is now indexed under the surrogate.
        assert_eq!(ctx.units.id_for_internal(CLiteral::fresh(2, true)), Some(2));
        // And remains addressable under the external literal.
        assert_eq!(ctx.units.id_for_external(3), Some(2));
    }

    #[test]
    fn values_survive_through_the_surrogate() {
        let mut ctx = eager_context();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[-3]).unwrap();
        ctx.add_clause(&[4]).unwrap();
        ctx.propagate().unwrap();

        assert_eq!(ctx.val(3), -1);
        assert_eq!(ctx.val(4), 1);

        ctx.compact();

        // Externals 3 and 4 share one internal atom, in opposite phases.
        assert_eq!(ctx.val(3), -1);
        assert_eq!(ctx.val(4), 1);
        assert_eq!(ctx.fixed(3), -1);
        assert_eq!(ctx.fixed(4), 1);
        assert_eq!(ctx.atom_db.max_atom(), 3);
    }

    #[test]
    fn clauses_hold_only_mapped_unvalued_literals() {
        let mut ctx = eager_context();
        ctx.reserve(6);
        ctx.add_clause(&[1, 4, 6]).unwrap();
        ctx.add_clause(&[4, -6, 1]).unwrap();
        ctx.add_clause(&[2]).unwrap();
        ctx.propagate().unwrap();
        ctx.mark_eliminated(3, &[]);
        ctx.mark_eliminated(5, &[]);

        ctx.compact();

        let max_atom = ctx.atom_db.max_atom();
        assert_eq!(max_atom, 4);
        for (_, clause) in ctx.clause_db.all_clauses() {
            for literal in clause.literals() {
                assert!(literal.atom() <= max_atom);
                assert_eq!(ctx.atom_db.value_of(*literal), 0);
            }
        }
    }

    #[test]
    fn queue_order_of_survivors_is_preserved() {
        let mut ctx = eager_context();
        ctx.reserve(5);
        ctx.add_clause(&[1, 5]).unwrap();
        ctx.add_clause(&[3]).unwrap();
        ctx.propagate().unwrap();
        ctx.mark_eliminated(2, &[]);
        ctx.mark_eliminated(4, &[]);

        ctx.compact();

        // Old atoms 1 and 5 were enqueued in that order, and survive as 1 and 3.
        // The fixed surrogate leaves the queue.
        let order: Vec<_> = ctx.atom_db.queue.iter().collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn heap_survivors_are_remapped() {
        let mut ctx = eager_context();
        ctx.reserve(5);
        ctx.add_clause(&[1, 5]).unwrap();
        ctx.add_clause(&[3]).unwrap();
        ctx.propagate().unwrap();
        ctx.mark_eliminated(2, &[]);
        ctx.mark_eliminated(4, &[]);

        ctx.atom_db.bump_activity(5, 10.0);

        ctx.compact();

        // Two unvalued actives remain; the most active is old 5, now 3.
        assert_eq!(ctx.atom_db.activity.active_count(), 2);
        assert_eq!(ctx.atom_db.activity.peek_max(), Some(3));
    }

    #[test]
    fn frozen_counts_are_summed() {
        let mut ctx = eager_context();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.freeze(3);
        ctx.freeze(3);
        ctx.freeze(4);
        ctx.add_clause(&[3]).unwrap();
        ctx.add_clause(&[4]).unwrap();
        ctx.propagate().unwrap();

        ctx.compact();

        // Both fixed externals route to the surrogate, which carries their freezes.
        assert!(ctx.frozen(3));
        assert!(ctx.frozen(4));
    }

    #[test]
    fn unit_identifiers_survive_repeated_compaction() {
        let mut ctx = eager_context();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[3]).unwrap(); // id 2
        ctx.propagate().unwrap();
        ctx.compact();

        ctx.add_clause(&[4]).unwrap();
        ctx.propagate().unwrap();
        ctx.compact();

        assert_eq!(ctx.units.id_for_external(3), Some(2));
        assert_eq!(ctx.val(3), 1);
    }
}

mod idempotence {
    use super::*;

    #[test]
    fn a_second_run_performs_no_work() {
        let mut ctx = eager_context();
        ctx.reserve(5);
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[3]).unwrap();
        ctx.propagate().unwrap();
        ctx.mark_eliminated(4, &[]);

        ctx.compact();
        let max_atom = ctx.atom_db.max_atom();
        let mapping: Vec<_> = (1..=5).map(|v| ctx.external.mapping(v)).collect();

        ctx.compact();
        assert_eq!(ctx.atom_db.max_atom(), max_atom);
        let again: Vec<_> = (1..=5).map(|v| ctx.external.mapping(v)).collect();
        assert_eq!(mapping, again);
    }
}

mod assumptions {
    use super::*;

    #[test]
    fn assumptions_are_reapplied_through_the_new_map() {
        let mut ctx = eager_context();
        ctx.reserve(4);
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[4]).unwrap();
        ctx.assume(2);
        ctx.propagate().unwrap();
        ctx.mark_eliminated(3, &[]);

        ctx.compact();

        // The assumed atom was frozen, so its image survives.
        assert!(ctx.frozen(2));
        assert!(ctx.external.mapping(2).is_some());
    }
}
