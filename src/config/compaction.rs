//! Configuration of variable-domain compaction.

use crate::{config::ConfigOption, context::ContextState};

/// When compaction may run, and how eagerly.
///
/// Compaction is scheduled against the conflict count: each run pushes the next eligible conflict
/// count out by `interval × (runs + 1)`.
/// Even when scheduled, a run is skipped unless the count of inactive atoms clears both an
/// absolute floor (`minimum`) and a proportional floor (`proportion`, in thousandths of the atom
/// count).
#[derive(Clone)]
pub struct CompactionConfig {
    /// Whether compaction is enabled at all.
    pub enabled: ConfigOption<bool>,

    /// The base interval, in conflicts, between compaction runs.
    pub interval: ConfigOption<u64>,

    /// The absolute floor on inactive atoms below which a run is skipped.
    pub minimum: ConfigOption<u32>,

    /// The proportional floor on inactive atoms, in thousandths of the atom count.
    pub proportion: ConfigOption<u32>,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        CompactionConfig {
            enabled: ConfigOption {
                name: "compact",
                min: false,
                max: true,
                max_state: ContextState::Solving,
                value: true,
            },

            interval: ConfigOption {
                name: "compact_interval",
                min: 1,
                max: u64::MAX,
                max_state: ContextState::Solving,
                value: 2_000,
            },

            minimum: ConfigOption {
                name: "compact_minimum",
                min: 1,
                max: u32::MAX,
                max_state: ContextState::Solving,
                value: 100,
            },

            proportion: ConfigOption {
                name: "compact_proportion",
                min: 0,
                max: 1_000,
                max_state: ContextState::Solving,
                value: 100,
            },
        }
    }
}
