/*!
Error types used in the library.

- Most of these are very unlikely to occur during use.
- Some are internally expected --- e.g. a BCP conflict is used to control the flow of root-level
  propagation.
- Others are external --- e.g. a context returns a [StateError] when an operation is requested in
  an incompatible state.

Unrecoverable situations (a proof identifier out of order, a rejected signature, a contract
violation in an observer) are not represented here: those panic, as the proof stream cannot be
repaired after the fact.
*/

use crate::db::ClauseRef;

/// A union of varied error kinds.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// An error in the atom database.
    AtomDB(AtomDBError),

    /// An error when adding a clause to the context.
    Build(BuildError),

    /// An error in the clause database.
    ClauseDB(ClauseDBError),

    /// An error related to proof tracing.
    Proof(ProofError),

    /// An error related to the state of the context.
    State(StateError),
}

/// An error from the atom database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AtomDBError {
    /// There are no more fresh atoms.
    AtomsExhausted,
}

impl From<AtomDBError> for ErrorKind {
    fn from(e: AtomDBError) -> Self {
        ErrorKind::AtomDB(e)
    }
}

/// Noted errors during boolean constraint propagation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BCPError {
    /// A conflict was found.
    /// At the root this establishes unsatisfiability.
    Conflict(ClauseRef),

    /// Some corruption in the watched literals of a clause.
    /// This is unexpected.
    CorruptWatch,
}

/// Noted errors when adding a clause to the context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildError {
    /// A literal outside the representable range (zero terminators aside, any non-zero [i32]
    /// other than [i32::MIN] is fine).
    InvalidLiteral(i32),

    /// The clause is, or simplifies to, the empty clause.
    Unsatisfiable,
}

impl From<BuildError> for ErrorKind {
    fn from(e: BuildError) -> Self {
        ErrorKind::Build(e)
    }
}

/// Errors in the clause database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClauseDBError {
    /// Some attempt was made to store an empty clause.
    EmptyClause,

    /// Some attempt was made to store a unit clause.
    /// Units live on the trail and in the unit registry, not in the database.
    UnitClause,

    /// All possible clause references have been used.
    StorageExhausted,

    /// A clause reference failed to unlock a clause.
    Missing,
}

impl From<ClauseDBError> for ErrorKind {
    fn from(e: ClauseDBError) -> Self {
        ErrorKind::ClauseDB(e)
    }
}

/// Errors related to proof tracing.
#[derive(Debug)]
pub enum ProofError {
    /// Opening or writing the trace file failed.
    Io(std::io::Error),

    /// No trace is connected.
    NoTrace,

    /// A second context attempted to trace API calls through the environment variable mechanism.
    TraceGuardHeld,
}

impl PartialEq for ProofError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ProofError::Io(a), ProofError::Io(b)) => a.kind() == b.kind(),
            (ProofError::NoTrace, ProofError::NoTrace) => true,
            (ProofError::TraceGuardHeld, ProofError::TraceGuardHeld) => true,
            _ => false,
        }
    }
}

impl From<std::io::Error> for ProofError {
    fn from(e: std::io::Error) -> Self {
        ProofError::Io(e)
    }
}

impl From<ProofError> for ErrorKind {
    fn from(e: ProofError) -> Self {
        ErrorKind::Proof(e)
    }
}

/// Errors due to the state of the context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateError {
    /// The requested option or limit cannot be adjusted in the current state.
    OptionFixed,

    /// The requested option or limit is unknown.
    UnknownOption,

    /// The value is outside the permitted range of the option.
    OutOfRange,
}

impl From<StateError> for ErrorKind {
    fn from(e: StateError) -> Self {
        ErrorKind::State(e)
    }
}
