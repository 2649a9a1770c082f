use std::{cell::RefCell, rc::Rc};

use stoat_sat::{
    db::ClauseId,
    proof::{
        callback::{CallbackTracer, Signature},
        file::{FileTracer, ProofFormat},
        Proof, Tracer,
    },
};

mod binary_encoding {
    use super::*;

    /// An LRAT addition: marker, zigzag identifier, zigzag literals, zero, zigzag hints, zero.
    #[test]
    fn lrat_addition() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Lrat, true, true);
        tracer.add_derived_clause(100, true, false, 2, &[3, -7], &[42]);

        assert_eq!(
            tracer.sink(),
            &vec![b'a', 0xC8, 0x01, 0x06, 0x0F, 0x00, 0x54, 0x00],
        );
    }

    #[test]
    fn drat_addition_and_deletion() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Drat, true, true);
        tracer.add_derived_clause(9, true, false, 1, &[1, -2], &[]);
        tracer.delete_clause(9, &[1, -2]);

        assert_eq!(
            tracer.sink(),
            &vec![b'a', 0x02, 0x05, 0x00, b'd', 0x02, 0x05, 0x00],
        );
    }

    #[test]
    fn varints_use_seven_bit_groups() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Frat, true, true);
        // The identifier is encoded unsigned in FRAT.
        tracer.add_original_clause(300, &[1]);

        assert_eq!(tracer.sink(), &vec![b'o', 0xAC, 0x02, 0x02, 0x00]);
    }
}

mod textual_encoding {
    use super::*;

    fn text(tracer: &FileTracer<Vec<u8>>) -> String {
        String::from_utf8(tracer.sink().clone()).unwrap()
    }

    #[test]
    fn drat_lines() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Drat, false, true);
        tracer.add_derived_clause(7, true, false, 1, &[3, -7], &[]);
        tracer.delete_clause(7, &[3, -7]);

        assert_eq!(text(&tracer), "3 -7 0\nd 3 -7 0\n");
    }

    #[test]
    fn lrat_lines_carry_identifier_and_chain() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Lrat, false, true);
        tracer.add_derived_clause(100, true, false, 2, &[3, -7], &[42]);

        assert_eq!(text(&tracer), "100 3 -7 0 42 0\n");
    }

    #[test]
    fn lrat_deletions_batch_until_the_next_addition() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Lrat, false, true);
        tracer.add_derived_clause(10, true, false, 1, &[1], &[5]);
        tracer.delete_clause(5, &[2]);
        tracer.delete_clause(6, &[3]);

        // Nothing yet: deletions wait for the next addition.
        assert_eq!(text(&tracer), "10 1 0 5 0\n");

        tracer.add_derived_clause(12, true, false, 1, &[2], &[6]);
        assert_eq!(text(&tracer), "10 1 0 5 0\n10 d 5 6 0\n12 2 0 6 0\n");
    }

    #[test]
    fn frat_records_the_full_clause_life() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Frat, false, true);
        tracer.add_original_clause(1, &[1, 2]);
        tracer.add_derived_clause(2, true, false, 1, &[2], &[1]);
        tracer.delete_clause(1, &[1, 2]);
        tracer.finalize_clause(2, &[2]);
        tracer.add_todo(&[3]);

        assert_eq!(
            text(&tracer),
            "o 1 1 2 0\na 2 2 0 l 1 0\nd 1 1 2 0\nf 2 2 0\nt 3 0\n",
        );
    }

    #[test]
    fn only_frat_records_originals_and_finalization() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Lrat, false, true);
        tracer.add_original_clause(1, &[1, 2]);
        tracer.finalize_clause(1, &[1, 2]);

        assert!(tracer.sink().is_empty());
    }

    #[test]
    fn imported_clauses_stay_out_of_proof_files() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Lrat, false, true);
        tracer.add_derived_clause(100, true, true, 2, &[3, 4], &[]);

        assert!(tracer.sink().is_empty());
    }

    #[test]
    #[should_panic]
    fn lrat_requires_a_chain() {
        let mut tracer = FileTracer::new(Vec::new(), ProofFormat::Lrat, false, true);
        tracer.add_derived_clause(5, true, false, 1, &[1], &[]);
    }
}

mod glue {
    use super::*;

    struct GlueRecorder {
        glues: Rc<RefCell<Vec<i32>>>,
    }

    impl Tracer for GlueRecorder {
        fn add_derived_clause(
            &mut self,
            _id: ClauseId,
            _redundant: bool,
            _imported: bool,
            glue: i32,
            _clause: &[i32],
            _chain: &[ClauseId],
        ) {
            self.glues.borrow_mut().push(glue);
        }
    }

    /// Observers never see a glue outside `[1, |clause|]`.
    #[test]
    fn glue_is_clamped_before_fan_out() {
        let glues = Rc::new(RefCell::new(Vec::new()));
        let mut proof = Proof::default();
        proof.connect(Box::new(GlueRecorder {
            glues: glues.clone(),
        }));

        proof.add_derived_clause(1, true, false, 9, &[1, 2, 3], &[7]);
        proof.add_derived_clause(2, true, false, 0, &[1, 2, 3], &[7]);

        assert_eq!(*glues.borrow(), vec![3, 1]);
    }
}

mod callbacks {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Call {
        Produce(ClauseId, Vec<i32>, Vec<ClauseId>, i32),
        Import(ClauseId, Vec<i32>, Vec<u8>),
        Delete(Vec<ClauseId>),
    }

    fn recording_tracer(
        calls: Rc<RefCell<Vec<Call>>>,
        delete_lines: bool,
        sign_shared: bool,
    ) -> CallbackTracer {
        let produce_calls = calls.clone();
        let import_calls = calls.clone();
        let delete_calls = calls;
        CallbackTracer::new(
            Box::new(move |id, clause, chain, glue, _sig: &mut Signature| {
                produce_calls.borrow_mut().push(Call::Produce(
                    id,
                    clause.to_vec(),
                    chain.to_vec(),
                    glue,
                ));
                true
            }),
            Box::new(move |id, clause, signature| {
                import_calls
                    .borrow_mut()
                    .push(Call::Import(id, clause.to_vec(), signature.to_vec()));
                true
            }),
            Box::new(move |ids| {
                delete_calls.borrow_mut().push(Call::Delete(ids.to_vec()));
                true
            }),
            delete_lines,
            sign_shared,
        )
    }

    #[test]
    fn deletions_flush_before_the_next_production() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = recording_tracer(calls.clone(), true, false);

        tracer.add_derived_clause(1, true, false, 1, &[1], &[9]);
        tracer.delete_clause(1, &[1]);
        tracer.delete_clause(9, &[2]);
        tracer.add_derived_clause(3, true, false, 1, &[2], &[9]);

        let calls = calls.borrow();
        assert_eq!(
            *calls,
            vec![
                Call::Produce(1, vec![1], vec![9], 0),
                Call::Delete(vec![1, 9]),
                Call::Produce(3, vec![2], vec![9], 0),
            ],
        );
    }

    #[test]
    fn signed_axioms_reach_the_import_callback() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = recording_tracer(calls.clone(), true, false);

        tracer.add_original_clause_with_signature(100, &[1, 2], &[0xAB, 0xCD]);

        assert_eq!(
            *calls.borrow(),
            vec![Call::Import(100, vec![1, 2], vec![0xAB, 0xCD])],
        );
    }

    #[test]
    fn glue_marks_exportable_clauses_only_when_signing_is_on() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = recording_tracer(calls.clone(), true, true);

        tracer.add_derived_clause(1, true, false, 2, &[1, 2], &[9]);
        // Irredundant and not a unit: not for export.
        tracer.add_derived_clause(3, false, false, 2, &[1, 2], &[9]);

        let calls = calls.borrow();
        assert_eq!(calls[0], Call::Produce(1, vec![1, 2], vec![9], 2));
        assert_eq!(calls[1], Call::Produce(3, vec![1, 2], vec![9], 0));
    }

    #[test]
    fn imported_events_do_not_advance_the_watermark() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = recording_tracer(calls.clone(), true, false);

        tracer.add_derived_clause(100, true, true, 2, &[1, 2], &[]);
        // A smaller local identifier is still in order.
        tracer.add_derived_clause(2, true, false, 1, &[1], &[9]);

        assert_eq!(
            *calls.borrow(),
            vec![Call::Produce(2, vec![1], vec![9], 0)],
        );
    }

    #[test]
    #[should_panic]
    fn identifiers_out_of_order_are_fatal() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut tracer = recording_tracer(calls, true, false);

        tracer.add_derived_clause(5, true, false, 1, &[1], &[9]);
        tracer.add_derived_clause(5, true, false, 1, &[2], &[9]);
    }

    #[test]
    #[should_panic]
    fn rejected_signatures_are_fatal() {
        let mut tracer = CallbackTracer::new(
            Box::new(|_, _, _, _, _: &mut Signature| true),
            Box::new(|_, _, _| false),
            Box::new(|_| true),
            true,
            false,
        );
        tracer.add_original_clause_with_signature(100, &[1], &[0x00]);
    }

    #[test]
    #[should_panic]
    fn rejected_deletions_are_fatal() {
        let mut tracer = CallbackTracer::new(
            Box::new(|_, _, _, _, _: &mut Signature| true),
            Box::new(|_, _, _| true),
            Box::new(|_| false),
            true,
            false,
        );
        tracer.delete_clause(1, &[1]);
        tracer.add_derived_clause(5, true, false, 1, &[1], &[9]);
    }
}

mod ordering {
    use super::*;

    /// The file tracer connects at the front, so proof lines precede export side effects.
    #[test]
    fn file_tracers_are_notified_first() {
        struct Tagger {
            tag: &'static str,
            order: Rc<RefCell<Vec<&'static str>>>,
        }

        impl Tracer for Tagger {
            fn add_derived_clause(
                &mut self,
                _id: ClauseId,
                _redundant: bool,
                _imported: bool,
                _glue: i32,
                _clause: &[i32],
                _chain: &[ClauseId],
            ) {
                self.order.borrow_mut().push(self.tag);
            }
        }

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut proof = Proof::default();
        proof.connect(Box::new(Tagger {
            tag: "exporter",
            order: order.clone(),
        }));
        proof.connect_file_tracer(Box::new(Tagger {
            tag: "file",
            order: order.clone(),
        }));

        proof.add_derived_clause(1, true, false, 1, &[1], &[9]);

        assert_eq!(*order.borrow(), vec!["file", "exporter"]);
    }
}
