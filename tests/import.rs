use std::{cell::RefCell, rc::Rc};

use stoat_sat::{
    config::Config,
    context::Context,
    db::ClauseId,
    proof::Tracer,
    reports::Report,
    sharing::{queue::ClauseChannel, IncomingClause},
};

/// A tracer recording derived clauses, for inspecting chains and identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Derived {
    id: ClauseId,
    imported: bool,
    clause: Vec<i32>,
    chain: Vec<ClauseId>,
}

struct Recorder {
    derived: Rc<RefCell<Vec<Derived>>>,
}

impl Tracer for Recorder {
    fn add_derived_clause(
        &mut self,
        id: ClauseId,
        _redundant: bool,
        imported: bool,
        _glue: i32,
        clause: &[i32],
        chain: &[ClauseId],
    ) {
        self.derived.borrow_mut().push(Derived {
            id,
            imported,
            clause: clause.to_vec(),
            chain: chain.to_vec(),
        });
    }
}

/// A context minting odd identifiers, with LRAT chains on, plus a channel and a record of
/// derivations.
fn sharing_context() -> (Context, ClauseChannel, Rc<RefCell<Vec<Derived>>>) {
    let mut config = Config::default();
    config.sharing.id_stride.value = 2;
    config.proof.lrat.value = true;
    let mut ctx = Context::from_config(config);

    let derived = Rc::new(RefCell::new(Vec::new()));
    ctx.connect_tracer(Box::new(Recorder {
        derived: derived.clone(),
    }));

    (ctx, ClauseChannel::default(), derived)
}

fn incoming(id: ClauseId, glue: i32, literals: &[i32]) -> IncomingClause {
    IncomingClause {
        id,
        glue,
        literals: literals.to_vec(),
        signature: None,
    }
}

#[test]
fn shortening_to_a_unit_extends_the_chain() {
    let (mut ctx, channel, derived) = sharing_context();
    ctx.add_clause(&[-1]).unwrap(); // id 1, fixes -1
    ctx.reserve(2);

    channel.producer().push(incoming(100, 2, &[1, 2]));
    let source = Rc::new(RefCell::new(channel));
    ctx.connect_learn_source(source);

    assert!(ctx.importing());
    assert_eq!(ctx.import_shared_clauses(), Report::Satisfiable);

    // The import shortened to the unit 2, derived locally under a fresh odd identifier with a
    // chain through the unit for -1 and the incoming clause.
    assert_eq!(ctx.val(2), 1);
    assert_eq!(ctx.fixed(2), 1);
    assert_eq!(ctx.counters.import.imported, 1);

    let events = derived.borrow();
    let unit = events.last().unwrap();
    assert_eq!(
        *unit,
        Derived {
            id: 3,
            imported: false,
            clause: vec![2],
            chain: vec![1, 100],
        }
    );
}

#[test]
fn shortening_to_the_empty_clause_settles_unsatisfiability() {
    let (mut ctx, channel, derived) = sharing_context();
    ctx.reserve(3);
    ctx.add_clause(&[-1]).unwrap(); // id 1
    ctx.add_clause(&[-2]).unwrap(); // id 3

    channel.producer().push(incoming(100, 2, &[1, 2]));
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));

    assert_eq!(ctx.import_shared_clauses(), Report::Unsatisfiable);
    assert!(ctx.unsatisfiable());

    let events = derived.borrow();
    let empty = events.last().unwrap();
    assert_eq!(
        *empty,
        Derived {
            id: 5,
            imported: false,
            clause: vec![],
            chain: vec![1, 3, 100],
        }
    );
    assert_eq!(ctx.counters.import.discarded, 1);
    assert_eq!(ctx.counters.import.r_fx, 1);
}

#[test]
fn echoes_of_local_exports_are_dropped() {
    let (mut ctx, channel, _derived) = sharing_context();
    ctx.add_clause(&[1, 2]).unwrap(); // id 1, locally produced

    channel.producer().push(incoming(1, 2, &[3, 4]));
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));

    ctx.import_shared_clauses();

    // Dropped silently: no counter moves, nothing is stored.
    assert_eq!(ctx.counters.import.imported, 0);
    assert_eq!(ctx.counters.import.discarded, 0);
    assert_eq!(ctx.clause_db.count(), 1);
}

#[test]
fn witness_literals_discard_the_clause() {
    let (mut ctx, channel, _derived) = sharing_context();
    ctx.add_clause(&[2, 3]).unwrap();
    ctx.mark_eliminated(1, &[-1]);

    channel.producer().push(incoming(100, 2, &[-1, 4]));
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));

    ctx.import_shared_clauses();

    assert_eq!(ctx.counters.import.r_wit, 1);
    assert_eq!(ctx.counters.import.discarded, 1);
    assert_eq!(ctx.counters.import.imported, 0);
}

#[test]
fn eliminated_and_pure_literals_discard_the_clause() {
    let (mut ctx, channel, _derived) = sharing_context();
    ctx.add_clause(&[2, 3]).unwrap();
    ctx.mark_eliminated(1, &[]);
    ctx.mark_pure(4);

    let producer = channel.producer();
    producer.push(incoming(100, 2, &[1, 5]));
    producer.push(incoming(102, 2, &[-4, 5]));
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));

    ctx.import_shared_clauses();

    assert_eq!(ctx.counters.import.r_el, 2);
    assert_eq!(ctx.counters.import.discarded, 2);
    assert_eq!(ctx.counters.import.imported, 0);
}

#[test]
fn root_satisfied_clauses_are_discarded() {
    let (mut ctx, channel, _derived) = sharing_context();
    ctx.add_clause(&[1]).unwrap();
    ctx.add_clause(&[2, 3]).unwrap();

    channel.producer().push(incoming(100, 2, &[1, 2]));
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));

    ctx.import_shared_clauses();

    assert_eq!(ctx.counters.import.r_fx, 1);
    assert_eq!(ctx.counters.import.discarded, 1);
    assert_eq!(ctx.counters.import.imported, 0);
}

#[test]
fn retained_clauses_are_sound_and_watched() {
    let (mut ctx, channel, derived) = sharing_context();
    ctx.add_clause(&[1, 2]).unwrap();

    channel.producer().push(incoming(100, 2, &[3, 4]));
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));

    ctx.import_shared_clauses();

    assert_eq!(ctx.counters.import.imported, 1);
    assert_eq!(ctx.clause_db.count(), 2);

    // Unshortened, so the incoming identifier is kept and the event is flagged imported.
    let events = derived.borrow();
    let import = events.last().unwrap();
    assert_eq!(import.id, 100);
    assert!(import.imported);

    // Every retained literal is unassigned or true.
    for (_, clause) in ctx.clause_db.all_clauses() {
        for literal in clause.literals() {
            assert!(ctx.atom_db.value_of(*literal) >= 0);
        }
    }
}

#[test]
fn incoming_units_are_imported_directly() {
    let (mut ctx, channel, _derived) = sharing_context();
    ctx.add_clause(&[1, 2]).unwrap();

    channel.producer().push(incoming(100, 1, &[3]));
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));

    ctx.import_shared_clauses();

    assert_eq!(ctx.fixed(3), 1);
    // Unshortened, so the unit keeps the incoming identifier.
    assert_eq!(ctx.units.id_for_external(3), Some(100));
    assert_eq!(ctx.counters.import.imported, 1);
}

#[test]
fn importing_requires_a_waiting_clause_at_the_root() {
    let (mut ctx, channel, _derived) = sharing_context();
    ctx.add_clause(&[1, 2]).unwrap();

    let producer = channel.producer();
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));
    assert!(!ctx.importing());

    producer.push(incoming(100, 2, &[3, 4]));
    assert!(ctx.importing());

    ctx.propagate().unwrap();
    ctx.decide(5);
    assert!(!ctx.importing());
    ctx.backtrack(0);
    assert!(ctx.importing());
}

#[test]
fn the_drain_stops_on_unsatisfiability() {
    let (mut ctx, channel, _derived) = sharing_context();
    ctx.add_clause(&[-1]).unwrap();
    ctx.add_clause(&[2, 3]).unwrap();

    let producer = channel.producer();
    producer.push(incoming(100, 1, &[1])); // discarded, -1 is fixed
    producer.push(incoming(102, 2, &[1, 1]));
    ctx.connect_learn_source(Rc::new(RefCell::new(channel)));

    // The first incoming unit conflicts with the fixed literal and is discarded; the second
    // reduces to the empty clause.
    assert_eq!(ctx.import_shared_clauses(), Report::Unsatisfiable);
    assert!(ctx.unsatisfiable());
    assert_eq!(ctx.counters.import.discarded, 2);
}
