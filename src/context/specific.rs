use rand::{rngs::SmallRng, SeedableRng};

use crate::{config::Config, context::GenericContext};

/// A context which uses a small, deterministically seeded rng.
pub type Context = GenericContext<SmallRng>;

impl Context {
    /// Creates a context from some given configuration.
    pub fn from_config(config: Config) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(0))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::from_config(Config::default())
    }
}
