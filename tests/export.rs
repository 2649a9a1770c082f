use std::{cell::RefCell, rc::Rc};

use stoat_sat::{
    config::Config,
    context::Context,
    proof::{learner::LearnerObserver, Tracer},
    sharing::{
        queue::{ClauseChannel, ClauseConsumer, ClauseSink},
        IncomingClause,
    },
};

fn exporting_context(size_limit: usize) -> (Context, ClauseConsumer) {
    let mut config = Config::default();
    config.proof.lrat.value = true;
    let mut ctx = Context::from_config(config);

    let sink = ClauseSink::new(size_limit);
    let consumer = sink.consumer();
    ctx.connect_learner(Rc::new(RefCell::new(sink)));
    (ctx, consumer)
}

#[test]
fn derived_units_are_exported() {
    let (mut ctx, consumer) = exporting_context(8);

    // An original unit is not a derivation, and is not exported.
    ctx.add_clause(&[-1]).unwrap();
    assert!(consumer.is_empty());

    // Adding a clause shortened by the fixed literal derives the unit 2.
    ctx.add_clause(&[1, 2]).unwrap();

    let exported = consumer.pop().unwrap();
    assert_eq!(exported.literals, vec![2]);
    assert_eq!(exported.glue, 1);
    assert!(consumer.is_empty());
}

#[test]
fn derived_clauses_carry_their_glue() {
    let (mut ctx, consumer) = exporting_context(8);

    ctx.add_clause(&[-1]).unwrap();
    // Shortened to a binary clause: derived, and exported with its (clamped) glue.
    ctx.add_clause(&[1, 2, 3]).unwrap();

    let exported = consumer.pop().unwrap();
    assert_eq!(exported.literals, vec![2, 3]);
    assert!(exported.glue >= 1 && exported.glue <= 2);
}

#[test]
fn the_learner_size_gate_is_consulted() {
    let (mut ctx, consumer) = exporting_context(1);

    ctx.add_clause(&[-1]).unwrap();
    // Size two: over the learner's limit, so refused.
    ctx.add_clause(&[1, 2, 3]).unwrap();
    assert!(consumer.is_empty());

    // Size one: accepted.
    ctx.add_clause(&[1, 4]).unwrap();
    let exported = consumer.pop().unwrap();
    assert_eq!(exported.literals, vec![4]);
}

#[test]
fn imported_clauses_are_not_re_exported() {
    let (mut ctx, consumer) = exporting_context(8);
    ctx.add_clause(&[1, 2]).unwrap();

    let channel = ClauseChannel::default();
    channel.producer().push(IncomingClause {
        id: 100,
        glue: 2,
        literals: vec![3, 4],
        signature: None,
    });
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));
    ctx.import_shared_clauses();

    assert_eq!(ctx.counters.import.imported, 1);
    assert!(consumer.is_empty());
}

#[test]
fn simplified_imports_are_re_exported() {
    let (mut ctx, consumer) = exporting_context(8);
    ctx.add_clause(&[-1]).unwrap();
    ctx.add_clause(&[2, 3]).unwrap();

    let channel = ClauseChannel::default();
    channel.producer().push(IncomingClause {
        id: 100,
        glue: 2,
        literals: vec![1, 4],
        signature: None,
    });
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));
    ctx.import_shared_clauses();

    // The incoming clause shortened to the unit 4, which re-enters the fleet.
    let exported = consumer.pop().unwrap();
    assert_eq!(exported.literals, vec![4]);
}

#[test]
#[should_panic]
fn a_glue_of_minus_one_is_fatal() {
    // Reaching the observer directly, without the bus clamp in between.
    let sink = ClauseSink::new(8);
    let mut observer = LearnerObserver::new(Rc::new(RefCell::new(sink)));
    observer.add_derived_clause(1, true, false, -1, &[1, 2], &[]);
}
