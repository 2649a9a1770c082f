use std::{cell::RefCell, io::Read, rc::Rc};

use stoat_sat::{
    builder::ClauseOk,
    config::Config,
    context::{Context, ContextState},
    db::ClauseId,
    proof::Tracer,
    reports::Report,
};

mod solving {
    use super::*;

    #[test]
    fn one_literal() {
        let mut ctx = Context::default();
        assert_eq!(Ok(ClauseOk::Added), ctx.add_clause(&[1]));
        assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
        assert_eq!(ctx.val(1), 1);
    }

    #[test]
    fn units_propagate_to_a_model() {
        let mut ctx = Context::default();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[-1]).unwrap();
        ctx.add_clause(&[-2, 3]).unwrap();

        assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
        assert_eq!(ctx.val(1), -1);
        assert_eq!(ctx.val(2), 1);
        assert_eq!(ctx.val(3), 1);
    }

    #[test]
    fn contradictory_units_are_unsatisfiable() {
        let mut ctx = Context::default();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[-1]).unwrap();
        ctx.add_clause(&[-2]).unwrap();

        assert_eq!(ctx.solve().unwrap(), Report::Unsatisfiable);
        assert!(ctx.unsatisfiable());
    }

    #[test]
    fn undecided_formulas_report_unknown() {
        let mut ctx = Context::default();
        ctx.add_clause(&[1, 2]).unwrap();

        assert_eq!(ctx.solve().unwrap(), Report::Unknown);
    }

    #[test]
    fn a_contradicted_assumption_fails() {
        let mut ctx = Context::default();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.add_clause(&[-3]).unwrap();
        ctx.assume(3);

        assert_eq!(ctx.solve().unwrap(), Report::Unsatisfiable);
        assert!(ctx.failed(3));
        assert!(!ctx.failed(1));
        // The verdict rests on the assumptions, not the formula.
        assert!(!ctx.unsatisfiable());
    }

    #[test]
    fn termination_is_cooperative() {
        let mut ctx = Context::default();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.set_callback_terminate(Box::new(|| true));

        assert_eq!(ctx.solve().unwrap(), Report::Unknown);
        assert!(ctx.termination_forced());
    }

    #[test]
    fn terminal_zero_closes_a_buffered_clause() {
        let mut ctx = Context::default();
        ctx.add(1).unwrap();
        ctx.add(-2).unwrap();
        assert_eq!(ctx.add(0), Ok(ClauseOk::Added));
        assert_eq!(ctx.clause_db.count(), 1);
    }

    #[test]
    #[should_panic]
    fn the_minimum_integer_is_never_a_literal() {
        let mut ctx = Context::default();
        let _ = ctx.add(i32::MIN);
    }
}

mod states {
    use super::*;

    #[test]
    fn the_context_walks_its_states() {
        let mut ctx = Context::default();
        assert_eq!(ctx.state, ContextState::Configuration);

        ctx.add_clause(&[1]).unwrap();
        assert_eq!(ctx.state, ContextState::Input);

        ctx.solve().unwrap();
        assert_eq!(ctx.state, ContextState::Satisfiable);

        // Adding afresh leaves the verdict behind.
        ctx.add_clause(&[2, 3]).unwrap();
        assert_eq!(ctx.state, ContextState::Input);
    }

    #[test]
    fn leaving_a_verdict_resets_assumptions() {
        let mut ctx = Context::default();
        ctx.add_clause(&[1]).unwrap();
        ctx.assume(1);
        assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);

        // A fresh assumption first transitions out of the verdict, clearing the old stack.
        ctx.assume(3);
        assert!(!ctx.frozen(1));
        assert!(ctx.frozen(3));
    }
}

mod options {
    use super::*;

    #[test]
    fn options_revise_by_name_within_their_state() {
        let mut ctx = Context::default();
        assert!(ctx.set_option("compact_minimum", 3).is_ok());
        assert!(ctx.set_option("lrat", 1).is_ok());

        ctx.add_clause(&[1, 2]).unwrap();
        // Proof options are fixed once input arrives.
        assert!(ctx.set_option("lrat", 0).is_err());
        // Compaction scheduling stays revisable.
        assert!(ctx.set_option("compact_interval", 50).is_ok());

        assert!(ctx.set_option("no_such_option", 1).is_err());
        assert!(ctx.limit("compact", 17).is_ok());
        assert_eq!(ctx.counters.lim_compact, 17);
    }

    #[test]
    fn presets_apply_only_during_configuration() {
        let mut ctx = Context::default();
        assert!(ctx.configure("plain"));
        assert!(!ctx.config.compaction.enabled.value);
        assert!(!ctx.configure("no_such_preset"));

        ctx.add_clause(&[1]).unwrap();
        assert!(!ctx.configure("default"));
    }
}

mod freezing {
    use super::*;

    #[test]
    fn freeze_and_melt_balance() {
        let mut ctx = Context::default();
        ctx.freeze(1);
        ctx.freeze(1);
        assert!(ctx.frozen(1));

        ctx.melt(1);
        assert!(ctx.frozen(1));
        ctx.melt(1);
        assert!(!ctx.frozen(1));
    }

    #[test]
    fn reserve_names_variables_up_front() {
        let mut ctx = Context::default();
        ctx.reserve(5);
        assert_eq!(ctx.external.max_var(), 5);
        assert_eq!(ctx.val(5), 0);
    }
}

mod collection {
    use super::*;

    struct Events {
        derived: Rc<RefCell<Vec<(ClauseId, Vec<i32>, Vec<ClauseId>)>>>,
        deleted: Rc<RefCell<Vec<ClauseId>>>,
    }

    impl Tracer for Events {
        fn add_derived_clause(
            &mut self,
            id: ClauseId,
            _redundant: bool,
            _imported: bool,
            _glue: i32,
            clause: &[i32],
            chain: &[ClauseId],
        ) {
            self.derived
                .borrow_mut()
                .push((id, clause.to_vec(), chain.to_vec()));
        }

        fn delete_clause(&mut self, id: ClauseId, _clause: &[i32]) {
            self.deleted.borrow_mut().push(id);
        }
    }

    #[test]
    fn satisfied_clauses_are_deleted() {
        let mut ctx = Context::default();
        ctx.add_clause(&[1, 2, 3]).unwrap(); // id 1
        ctx.add_clause(&[1]).unwrap(); // id 2

        ctx.propagate().unwrap();
        ctx.collect_garbage();

        assert_eq!(ctx.clause_db.count(), 0);
    }

    #[test]
    fn falsified_literals_are_strengthened_out_with_proof_events() {
        let mut config = Config::default();
        config.proof.lrat.value = true;
        let mut ctx = Context::from_config(config);

        let derived = Rc::new(RefCell::new(Vec::new()));
        let deleted = Rc::new(RefCell::new(Vec::new()));
        ctx.connect_tracer(Box::new(Events {
            derived: derived.clone(),
            deleted: deleted.clone(),
        }));

        ctx.add_clause(&[1, 2, 3]).unwrap(); // id 1
        ctx.add_clause(&[-1]).unwrap(); // id 2, fixes -1
        ctx.propagate().unwrap();
        ctx.collect_garbage();

        // The survivor dropped the falsified literal under a fresh identifier.
        let (_, clause) = ctx.clause_db.all_clauses().next().unwrap();
        assert_eq!(clause.size(), 2);
        assert_eq!(clause.id(), 3);

        let derived = derived.borrow();
        assert_eq!(*derived.last().unwrap(), (3, vec![2, 3], vec![2, 1]));
        assert_eq!(*deleted.borrow(), vec![1]);
    }
}

mod api_tracing {
    use super::*;

    #[test]
    fn calls_echo_to_the_requested_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.trace");

        let mut ctx = Context::default();
        ctx.trace_api_calls(&path).unwrap();
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.assume(1);
        ctx.solve().unwrap();
        drop(ctx);

        let mut trace = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut trace)
            .unwrap();

        assert!(trace.contains("init"));
        assert!(trace.contains("add_clause [1, 2]"));
        assert!(trace.contains("assume 1"));
        assert!(trace.contains("solve"));
        assert!(trace.ends_with("reset\n"));
    }
}

mod proof_files {
    use super::*;
    use stoat_sat::proof::file::ProofFormat;

    #[test]
    fn a_drat_trace_reaches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proof.drat");

        let mut ctx = Context::default();
        ctx.trace_proof(&path, ProofFormat::Drat, false).unwrap();

        ctx.add_clause(&[-1]).unwrap();
        // Shortened on the way in: a derivation for the trace.
        ctx.add_clause(&[1, 2]).unwrap();
        ctx.close_proof_trace().unwrap();

        let trace = std::fs::read_to_string(&path).unwrap();
        assert!(trace.contains("2 0\n"));
    }

    #[test]
    fn closing_without_a_trace_is_an_error() {
        let mut ctx = Context::default();
        assert!(ctx.close_proof_trace().is_err());
        assert!(ctx.flush_proof_trace().is_err());
    }
}
