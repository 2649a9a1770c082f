//! Configuration of clause sharing.

use crate::{config::ConfigOption, context::ContextState};

/// Identifier allocation for a fleet of engines.
///
/// Locally produced clause identifiers walk `origin, origin + stride, origin + 2·stride, …`, so a
/// fleet in which every engine holds a distinct origin modulo a shared stride mints disjoint
/// identifier streams, and an engine recognises echoes of its own exports by residue.
#[derive(Clone)]
pub struct SharingConfig {
    /// The first locally produced clause identifier.
    pub id_origin: ConfigOption<u64>,

    /// The step between locally produced clause identifiers.
    pub id_stride: ConfigOption<u64>,
}

impl Default for SharingConfig {
    fn default() -> Self {
        SharingConfig {
            id_origin: ConfigOption {
                name: "id_origin",
                min: 1,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: 1,
            },

            id_stride: ConfigOption {
                name: "id_stride",
                min: 1,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: 1,
            },
        }
    }
}
