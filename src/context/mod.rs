/*!
The context --- to which formulas are added and within which solves take place, etc.

Strictly, a [GenericContext] and a [Context].

The generic context is parameterised to a source of randomness, used when suggesting a value for
an atom with no saved phase.
[Context] fixes the source so that embedders without an opinion get deterministic behaviour.

# Example
```rust
# use stoat_sat::{config::Config, context::Context, reports::Report};
let mut ctx = Context::from_config(Config::default());

ctx.add_clause(&[1, -2]).unwrap();
ctx.add_clause(&[2]).unwrap();

assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
assert_eq!(ctx.val(1), 1);
```
*/

pub(crate) mod api_trace;
mod callbacks;
mod counters;
mod generic;
mod specific;
mod tracing;

pub use callbacks::{CallbackFixed, CallbackTerminate};
pub use counters::{Counters, ImportCounters, StatusCounts};
pub use generic::GenericContext;
pub use specific::Context;

pub(crate) use api_trace::ApiTrace;

/// The state of a context.
///
/// The ordering of states follows the life of a context, so an option revisable 'until' a state
/// admits revision in every earlier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContextState {
    /// Freshly built, everything may be configured.
    Configuration,

    /// Clauses are being added.
    Input,

    /// Between solves, with assumptions cleared.
    Unknown,

    /// A solve is in progress.
    Solving,

    /// The database is known to be consistent, e.g. with a complete valuation.
    Satisfiable,

    /// The database is known to be inconsistent, e.g. with the empty clause derived.
    Unsatisfiable,
}

impl std::fmt::Display for ContextState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Input => write!(f, "Input"),
            Self::Unknown => write!(f, "Unknown"),
            Self::Solving => write!(f, "Solving"),
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
        }
    }
}
