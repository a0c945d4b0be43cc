//! Demo configuration structures and loaders.
use std::env;

use utility_ai::EvaluatorConfig;

use crate::brain::MAX_ENERGY;

/// Configuration for one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    pub ticks: u32,
    pub seed: Option<u64>,
    pub start_energy: f64,
    pub strict_names: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ticks: 1000,
            seed: None,
            start_energy: MAX_ENERGY,
            strict_names: false,
        }
    }
}

impl DemoConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `FORAGE_TICKS` - Number of ticks to simulate (default: 1000)
    /// - `FORAGE_SEED` - RNG seed for a reproducible run (default: random)
    /// - `FORAGE_START_ENERGY` - Initial energy, clamped to 1-100 (default: 100)
    /// - `FORAGE_STRICT_NAMES` - Reject duplicate consideration names (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read::<u32>(&lookup, "FORAGE_TICKS") {
            config.ticks = ticks;
        }

        config.seed = read::<u64>(&lookup, "FORAGE_SEED");

        if let Some(energy) = read::<f64>(&lookup, "FORAGE_START_ENERGY")
            && energy.is_finite()
        {
            config.start_energy = energy.clamp(1.0, MAX_ENERGY);
        }

        if let Some(strict) = read::<bool>(&lookup, "FORAGE_STRICT_NAMES") {
            config.strict_names = strict;
        } else if lookup("FORAGE_STRICT_NAMES").is_some() {
            // Also accept just setting the variable without value as "true"
            config.strict_names = true;
        }

        config
    }

    /// Evaluator settings derived from this run's configuration.
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig::default().strict_names(self.strict_names)
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}
