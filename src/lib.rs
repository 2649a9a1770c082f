//! The core of a conflict-driven clause-learning satisfiability engine.
//!
//! stoat_sat implements the two subsystems of a CDCL engine which survive contact with a fleet of
//! cooperating solvers: compaction of the internal variable domain, and clause sharing backed by
//! verifiable DRAT/LRAT/FRAT proof traces.
//! The search loop itself (decisions, conflict analysis, restarts) is the business of an embedding
//! solver --- this crate supplies the databases such a loop reads and writes, and keeps those
//! databases consistent across compaction, import, export, and proof emission.
//!
//! # Orientation
//!
//! The library is designed around the core structure of a [context](crate::context).
//!
//! A context owns:
//! - A [clause database](crate::db::clause) in which every clause carries a monotonically
//!   increasing 64-bit identifier, the currency of clause sharing and proof hints.
//! - An [atom database](crate::db::atom) of internal variables: status flags, values, phases,
//!   watch lists, occurrence lists, the decision queue, and the activity heap.
//! - An [external map](crate::db::external) from stable user-visible variables to (compactable)
//!   internal atoms, together with the assumption and constraint stacks.
//! - A [unit registry](crate::db::units) recording, for every literal fixed at the root, the
//!   identifier of the unit clause which proved it --- indexed both internally and externally, so
//!   that proof chains survive compaction.
//! - An optional [proof bus](crate::proof) fanning clause events out to an ordered sequence of
//!   tracers: proof files in three formats, a callback tracer for cryptographically signed
//!   sharing, and an export observer feeding a [learner](crate::sharing::Learner).
//!
//! Two procedures do the heavy lifting:
//! - [Compaction](crate::procedures::compact) rewrites every database in a single pass so that
//!   internal indices again form a contiguous range, collapsing all root-fixed variables onto a
//!   single surrogate index.
//! - [Import](crate::procedures::import) drains a [learn source](crate::sharing::LearnSource) of
//!   externally derived clauses, validates each against the current flags and trail, and installs
//!   the survivors --- extending the in-flight LRAT chain whenever a clause is shortened on the
//!   way in.
//!
//! # Example
//!
//! ```rust
//! use stoat_sat::{config::Config, context::Context, reports::Report};
//!
//! let mut ctx = Context::from_config(Config::default());
//!
//! ctx.add_clause(&[1, 2]).unwrap();
//! ctx.add_clause(&[-1]).unwrap();
//! ctx.add_clause(&[-2, 3]).unwrap();
//!
//! assert_eq!(ctx.solve().unwrap(), Report::Satisfiable);
//! assert_eq!(ctx.val(2), 1);
//! assert_eq!(ctx.val(3), 1);
//! ```

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod builder;
pub mod config;
pub mod context;
pub mod db;
pub mod generic;
pub mod misc;
pub mod procedures;
pub mod proof;
pub mod reports;
pub mod sharing;
pub mod structures;
pub mod types;
