use std::{cell::RefCell, rc::Rc};

use crate::{
    config::Config,
    context::{api_trace::trace_api, ApiTrace, CallbackFixed, CallbackTerminate, ContextState, Counters},
    db::{atom::AtomDB, clause::ClauseDB, external::ExternalDB, trail::Trail, units::UnitDB, ClauseId},
    proof::Proof,
    reports::Report,
    sharing::{LearnSource, Learner},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
    types::err::{self},
};

/// A generic context, parameterised to a source of randomness.
///
/// # Example
///
/// ```rust
/// # use stoat_sat::{config::Config, context::GenericContext};
/// # use rand::{rngs::SmallRng, SeedableRng};
/// let context = GenericContext::with_rng(Config::default(), SmallRng::seed_from_u64(31));
/// ```
pub struct GenericContext<R: rand::Rng> {
    /// The configuration of the context.
    pub config: Config,

    /// Counters related to the context/solve.
    pub counters: Counters,

    /// The atom database.
    /// See [db::atom](crate::db::atom) for details.
    pub atom_db: AtomDB,

    /// The clause database.
    /// See [db::clause](crate::db::clause) for details.
    pub clause_db: ClauseDB,

    /// The unit registry.
    /// See [db::units](crate::db::units) for details.
    pub units: UnitDB,

    /// The trail.
    /// See [db::trail](crate::db::trail) for details.
    pub trail: Trail,

    /// The external database.
    /// See [db::external](crate::db::external) for details.
    pub external: ExternalDB,

    /// The proof bus, allocated on demand.
    pub proof: Option<Proof>,

    /// The status of the context.
    pub state: ContextState,

    /// The source of rng.
    pub rng: R,

    /// Assumptions, internal form; rebuilt through the external map by compaction.
    pub(crate) assumptions: Vec<CLiteral>,

    /// The constraint, internal form; rebuilt through the external map by compaction.
    pub(crate) constraint: Vec<CLiteral>,

    /// A source of clauses derived elsewhere, if attached.
    pub(crate) learn_source: Option<Rc<RefCell<dyn LearnSource>>>,

    /// A consumer of clauses derived here, if attached.
    pub(crate) learner: Option<Rc<RefCell<dyn Learner>>>,

    pub(crate) callback_terminate: Option<Box<CallbackTerminate>>,

    pub(crate) callback_fixed: Option<Box<CallbackFixed>>,

    /// Whether cooperative termination has been requested.
    pub(crate) termination_forced: bool,

    /// Whether the empty clause has been derived.
    pub(crate) unsat: bool,

    /// The clause being assembled by the current procedure, internal form.
    pub(crate) scratch_clause: Vec<CLiteral>,

    /// The in-flight LRAT chain of the current procedure.
    pub(crate) scratch_chain: Vec<ClauseId>,

    /// Literals buffered by [add](GenericContext::add) until the terminating zero.
    pub(crate) adding: Vec<i32>,

    /// An open API trace, if one was requested.
    pub(crate) api_trace: Option<ApiTrace>,
}

impl<R: rand::Rng> GenericContext<R> {
    /// A context from a configuration and a source of randomness.
    pub fn with_rng(config: Config, rng: R) -> Self {
        let mut context = GenericContext {
            counters: Counters {
                lim_compact: config.compaction.interval.value,
                ..Counters::default()
            },

            atom_db: AtomDB::default(),
            clause_db: ClauseDB::new(&config),
            units: UnitDB::default(),
            trail: Trail::default(),
            external: ExternalDB::default(),

            proof: None,

            state: ContextState::Configuration,
            rng,

            assumptions: Vec::default(),
            constraint: Vec::default(),

            learn_source: None,
            learner: None,

            callback_terminate: None,
            callback_fixed: None,
            termination_forced: false,
            unsat: false,

            scratch_clause: Vec::default(),
            scratch_chain: Vec::default(),
            adding: Vec::default(),

            api_trace: ApiTrace::from_environment(),

            config,
        };
        trace_api!(context, "init");
        context
    }
}

impl<R: rand::Rng> Drop for GenericContext<R> {
    fn drop(&mut self) {
        trace_api!(self, "reset");
    }
}

/// Reports, counts, and state transitions.
impl<R: rand::Rng> GenericContext<R> {
    /// The high-level report matching the current state.
    pub fn report(&self) -> Report {
        match self.state {
            ContextState::Satisfiable => Report::Satisfiable,
            ContextState::Unsatisfiable => Report::Unsatisfiable,
            _ => Report::Unknown,
        }
    }

    /// A count of active atoms.
    pub fn active(&self) -> Atom {
        self.atom_db.max_atom() - self.counters.now.inactive()
    }

    /// Whether every atom still in the formula holds a value.
    pub fn satisfied(&self) -> bool {
        let removed = self.counters.now.eliminated
            + self.counters.now.substituted
            + self.counters.now.pure;
        !self.unsat
            && self.trail.assigned_count() == (self.atom_db.max_atom() - removed) as usize
    }

    /// Whether the empty clause has been derived.
    pub fn unsatisfiable(&self) -> bool {
        self.unsat
    }

    /// Moves to the unknown state, resetting assumptions when leaving a satisfied or unsatisfied
    /// verdict.
    ///
    /// A derived empty clause is permanent: once [unsatisfiable](GenericContext::unsatisfiable)
    /// holds, the state sticks.
    pub(crate) fn transition_to_unknown(&mut self) {
        if self.unsat {
            self.state = ContextState::Unsatisfiable;
            return;
        }
        match self.state {
            ContextState::Satisfiable | ContextState::Unsatisfiable => self.reset_assumptions(),
            _ => {}
        }
        self.state = ContextState::Unknown;
    }

    /// Notes the derivation of the empty clause.
    pub(crate) fn set_unsatisfiable(&mut self) {
        self.unsat = true;
        self.state = ContextState::Unsatisfiable;
    }
}

/// Literal boundary crossings and valuation queries.
impl<R: rand::Rng> GenericContext<R> {
    /// The external form of an internal literal.
    pub fn externalize(&self, literal: CLiteral) -> i32 {
        let var = self.atom_db.external_of(literal.atom());
        debug_assert!(var != 0);
        match literal.polarity() {
            true => var,
            false => -var,
        }
    }

    /// The value of an external literal: `1` true, `-1` false, `0` unset.
    pub fn val(&self, elit: i32) -> i8 {
        assert!(elit != 0 && elit != i32::MIN, "! Invalid literal");
        match self.external.map_literal(elit) {
            None => 0,
            Some(literal) => self.atom_db.value_of(literal),
        }
    }

    /// The root-level value of an external literal, `0` unless the literal is fixed.
    pub fn fixed(&self, elit: i32) -> i8 {
        assert!(elit != 0 && elit != i32::MIN, "! Invalid literal");
        match self.external.map_literal(elit) {
            None => 0,
            Some(literal) => match self.atom_db.status_of(literal.atom()).is_fixed() {
                true => self.atom_db.value_of(literal),
                false => 0,
            },
        }
    }
}

/// Assumptions and the constraint.
impl<R: rand::Rng> GenericContext<R> {
    /// Assumes an external literal for the next solve.
    ///
    /// The atom is frozen so the assumption survives compaction.
    pub fn assume(&mut self, elit: i32) {
        trace_api!(self, "assume {elit}");
        assert!(elit != 0 && elit != i32::MIN, "! Invalid literal");
        self.transition_to_unknown();
        let literal = self.internalize(elit);
        self.atom_db.freeze(literal.atom());
        self.external.assumptions.push(elit);
        self.assumptions.push(literal);
    }

    /// Clears all assumptions, melting the atoms they froze.
    pub fn reset_assumptions(&mut self) {
        for literal in std::mem::take(&mut self.assumptions) {
            self.atom_db.melt(literal.atom());
        }
        self.external.assumptions.clear();
    }

    /// Whether the external literal is an assumption contradicted at the root.
    pub fn failed(&self, elit: i32) -> bool {
        if !self.external.assumptions.contains(&elit) {
            return false;
        }
        match self.external.map_literal(elit) {
            None => false,
            Some(literal) => self.atom_db.value_of(literal) < 0,
        }
    }

    /// Adds a literal to the constraint clause; `0` terminates.
    pub fn constrain(&mut self, elit: i32) {
        trace_api!(self, "constrain {elit}");
        if elit == 0 {
            return;
        }
        assert!(elit != i32::MIN, "! Invalid literal");
        self.transition_to_unknown();
        let literal = self.internalize(elit);
        self.atom_db.freeze(literal.atom());
        self.external.constraint.push(elit);
        self.constraint.push(literal);
    }
}

/// Freezing, melting, and reservation of external variables.
impl<R: rand::Rng> GenericContext<R> {
    /// Freezes an external literal's atom, pinning it through compaction.
    pub fn freeze(&mut self, elit: i32) {
        trace_api!(self, "freeze {elit}");
        let literal = self.internalize(elit);
        self.atom_db.freeze(literal.atom());
    }

    /// Undoes one freeze of an external literal's atom.
    pub fn melt(&mut self, elit: i32) {
        trace_api!(self, "melt {elit}");
        let literal = self.internalize(elit);
        self.atom_db.melt(literal.atom());
    }

    /// Whether the external literal's atom is frozen.
    pub fn frozen(&self, elit: i32) -> bool {
        match self.external.map_literal(elit) {
            None => false,
            Some(literal) => self.atom_db.frozen(literal.atom()),
        }
    }

    /// Ensures external variables up to and including `var` exist.
    pub fn reserve(&mut self, var: i32) {
        trace_api!(self, "reserve {var}");
        for fresh in self.external.max_var() + 1..=var {
            self.internalize(fresh);
        }
    }
}

/// Options, limits, and presets.
impl<R: rand::Rng> GenericContext<R> {
    /// Revises the named option, if the state and the option's range allow.
    pub fn set_option(&mut self, name: &str, value: i64) -> Result<(), err::ErrorKind> {
        trace_api!(self, "set {name} {value}");
        use crate::config::ReviseOptionError;
        match self.config.revise(name, value, &self.state) {
            Ok(()) => Ok(()),
            Err(ReviseOptionError::Fixed) => Err(err::StateError::OptionFixed.into()),
            Err(ReviseOptionError::OutOfRange) => Err(err::StateError::OutOfRange.into()),
            Err(ReviseOptionError::Unknown) => Err(err::StateError::UnknownOption.into()),
        }
    }

    /// Sets the named limit for the current solve.
    pub fn limit(&mut self, name: &str, value: u64) -> Result<(), err::ErrorKind> {
        trace_api!(self, "limit {name} {value}");
        match name {
            "compact" => {
                self.counters.lim_compact = value;
                Ok(())
            }
            _ => Err(err::StateError::UnknownOption.into()),
        }
    }

    /// Applies a named configuration preset; permitted only before any clause is added.
    pub fn configure(&mut self, name: &str) -> bool {
        trace_api!(self, "configure {name}");
        match self.state {
            ContextState::Configuration => self.config.apply_preset(name),
            _ => false,
        }
    }
}
