/*!
Configuration of a context.

All configuration for a context is recorded in a [Config], grouped by concern.
Each option is a [ConfigOption] pairing the value with its name, permitted range, and the latest
[state](crate::context::ContextState) in which the value may still be revised --- revision by name
happens through [set_option](crate::context::GenericContext::set_option).
*/

mod config_option;
pub use config_option::{ConfigOption, ReviseOptionError};

mod compaction;
pub use compaction::CompactionConfig;

mod proof;
pub use proof::ProofConfig;

mod sharing;
pub use sharing::SharingConfig;

use crate::context::ContextState;

/// The activity score of an atom.
pub type Activity = f64;

/// The probability of assigning a fresh or unphased atom a positive value.
pub type PolarityLean = f64;

/// The primary configuration structure.
#[derive(Clone)]
pub struct Config {
    /// Configuration of variable-domain compaction.
    pub compaction: CompactionConfig,

    /// Configuration of proof production.
    pub proof: ProofConfig,

    /// Configuration of clause sharing.
    pub sharing: SharingConfig,

    /// The probability of suggesting a positive value for an atom with no saved phase.
    pub polarity_lean: ConfigOption<PolarityLean>,

    /// Whether the fixed-literal callback is fed lazily through the notification trail rather
    /// than invoked at each root assignment.
    pub lazy_fixed_notification: ConfigOption<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            compaction: CompactionConfig::default(),
            proof: ProofConfig::default(),
            sharing: SharingConfig::default(),

            polarity_lean: ConfigOption {
                name: "polarity_lean",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Solving,
                value: 0.0,
            },

            lazy_fixed_notification: ConfigOption {
                name: "lazy_fixed_notification",
                min: false,
                max: true,
                max_state: ContextState::Configuration,
                value: false,
            },
        }
    }
}

impl Config {
    /// Revises the named option, if `state` and the permitted range allow.
    pub fn revise(
        &mut self,
        name: &str,
        value: i64,
        state: &ContextState,
    ) -> Result<(), ReviseOptionError> {
        let flag = value != 0;
        match name {
            "compact" => self.compaction.enabled.revise(flag, state),
            "compact_interval" => self.compaction.interval.revise(value as u64, state),
            "compact_minimum" => self.compaction.minimum.revise(value as u32, state),
            "compact_proportion" => self.compaction.proportion.revise(value as u32, state),

            "lrat" => self.proof.lrat.revise(flag, state),
            "proof_delete_lines" => self.proof.delete_lines.revise(flag, state),
            "sign_shared" => self.proof.sign_shared.revise(flag, state),

            "id_origin" => self.sharing.id_origin.revise(value as u64, state),
            "id_stride" => self.sharing.id_stride.revise(value as u64, state),

            "polarity_lean" => {
                // By convention integer-valued APIs express probabilities in thousandths.
                self.polarity_lean.revise(value as f64 / 1_000.0, state)
            }
            "lazy_fixed_notification" => self.lazy_fixed_notification.revise(flag, state),

            _ => Err(ReviseOptionError::Unknown),
        }
    }

    /// Applies a named preset, returning false if the name is unknown.
    ///
    /// - `default`: the default configuration.
    /// - `plain`: inprocessing-free solving --- compaction disabled.
    /// - `sharing`: deletion lines and signed export enabled, for fleet membership.
    pub fn apply_preset(&mut self, name: &str) -> bool {
        match name {
            "default" => {
                *self = Config::default();
                true
            }

            "plain" => {
                self.compaction.enabled.value = false;
                true
            }

            "sharing" => {
                self.proof.delete_lines.value = true;
                self.proof.sign_shared.value = true;
                true
            }

            _ => false,
        }
    }
}
