//! Goal declarations for the hunter-gatherer.
//!
//! Each consideration reads one fact from [`HunterGatherer`] and normalizes it
//! through a response curve. Goals are declared in priority order: on equal
//! utility the earlier one wins.

use utility_ai::builder::from_fn;
use utility_ai::{Consideration, Curve, EvaluatorConfig, GoalMap, UtilityEvaluator, curve};

/// Maximum energy an agent can hold.
pub const MAX_ENERGY: f64 = 100.0;

/// What the agent can do in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Eat,
    Sleep,
    ForageFruit,
    ForageNuts,
}

/// Agent state read by the considerations.
#[derive(Debug, Clone, PartialEq)]
pub struct HunterGatherer {
    pub energy: f64,
    pub fruit: u32,
    pub nuts: u32,
}

impl HunterGatherer {
    /// Empty-handed agent with `energy`.
    pub fn new(energy: f64) -> Self {
        Self {
            energy,
            fruit: 0,
            nuts: 0,
        }
    }
}

impl Default for HunterGatherer {
    fn default() -> Self {
        Self::new(MAX_ENERGY)
    }
}

fn remaining_energy(agent: &HunterGatherer) -> f64 {
    agent.energy / MAX_ENERGY
}

fn has_food(agent: &HunterGatherer) -> f64 {
    f64::from(agent.fruit.max(agent.nuts))
}

fn has_fruit(agent: &HunterGatherer) -> f64 {
    f64::from(agent.fruit)
}

fn has_nuts(agent: &HunterGatherer) -> f64 {
    f64::from(agent.nuts)
}

/// Builds the agent's goal selector.
///
/// - `eat`: carrying food, weighted by how tired the agent is
/// - `sleep`: a floor just above zero
/// - `forage_fruit` / `forage_nuts`: the pouch for that food is empty
pub fn brain(config: EvaluatorConfig) -> UtilityEvaluator<Action, HunterGatherer> {
    let tiredness = Consideration::new(remaining_energy, Curve::InverseLinear);
    let carrying_food = Consideration::new(has_food, Curve::StepGreaterThanZero);
    let out_of_fruit = Consideration::new(has_fruit, Curve::StepLessEqualZero);
    let out_of_nuts = Consideration::new(has_nuts, Curve::StepLessEqualZero);

    let goals = GoalMap::new()
        .with(Action::Eat, carrying_food.multiply(&tiredness))
        .with(Action::Sleep, from_fn(|_: &HunterGatherer| curve::eps(0.0)))
        .with(Action::ForageFruit, out_of_fruit)
        .with(Action::ForageNuts, out_of_nuts);

    UtilityEvaluator::new(goals).with_config(config)
}
