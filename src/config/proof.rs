//! Configuration of proof production.

use crate::{config::ConfigOption, context::ContextState};

/// Proof production switches.
#[derive(Clone)]
pub struct ProofConfig {
    /// Whether LRAT chains are maintained for derived clauses.
    ///
    /// With chains off, derivations carry literals only (sufficient for DRAT), and cooperative
    /// termination may interrupt compaction.
    pub lrat: ConfigOption<bool>,

    /// Whether clause deletions are recorded in LRAT traces.
    pub delete_lines: ConfigOption<bool>,

    /// Whether locally derived redundant clauses are handed to the produce callback with a
    /// non-zero glue, marking them for signed export.
    pub sign_shared: ConfigOption<bool>,
}

impl Default for ProofConfig {
    fn default() -> Self {
        ProofConfig {
            lrat: ConfigOption {
                name: "lrat",
                min: false,
                max: true,
                max_state: ContextState::Configuration,
                value: false,
            },

            delete_lines: ConfigOption {
                name: "proof_delete_lines",
                min: false,
                max: true,
                max_state: ContextState::Configuration,
                value: true,
            },

            sign_shared: ConfigOption {
                name: "sign_shared",
                min: false,
                max: true,
                max_state: ContextState::Configuration,
                value: false,
            },
        }
    }
}
