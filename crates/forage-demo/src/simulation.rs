//! Tick loop for the hunter-gatherer.
//!
//! Each tick the agent loses one unit of energy, asks its brain for an
//! action, and the world resolves that action. Foraging is random: fruit is
//! rare but restores more energy than nuts.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use utility_ai::{EvaluatorConfig, UtilityError, UtilityEvaluator};

use crate::brain::{Action, HunterGatherer, MAX_ENERGY, brain};

/// Energy lost every tick.
pub const ENERGY_DRAIN: f64 = 1.0;

/// Chance that foraging for fruit finds one.
pub const FRUIT_CHANCE: f64 = 0.22;

/// Chance that foraging for nuts finds one.
pub const NUT_CHANCE: f64 = 0.8;

/// Energy restored by eating one fruit.
pub const FRUIT_ENERGY: f64 = 5.0;

/// Energy restored by eating one nut.
pub const NUT_ENERGY: f64 = 2.0;

/// Why a run stopped early.
#[derive(Debug, Error)]
pub enum SimError {
    /// Energy reached zero.
    #[error("agent starved on tick {tick}")]
    Starved { tick: u32 },

    /// The brain failed to score a goal.
    #[error(transparent)]
    Utility(#[from] UtilityError),
}

/// How the world resolved an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    FoundFruit,
    FoundNuts,
    FoundNothing,
    AteFruit,
    AteNuts,
    NothingToEat,
    Slept,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u32,
    pub action: Action,
    pub outcome: Outcome,
    pub energy: f64,
}

/// Resolves `action` against the agent's state.
pub fn resolve<R: Rng + ?Sized>(agent: &mut HunterGatherer, action: Action, rng: &mut R) -> Outcome {
    match action {
        Action::ForageFruit => {
            if rng.gen_bool(FRUIT_CHANCE) {
                agent.fruit += 1;
                Outcome::FoundFruit
            } else {
                Outcome::FoundNothing
            }
        }
        Action::ForageNuts => {
            if rng.gen_bool(NUT_CHANCE) {
                agent.nuts += 1;
                Outcome::FoundNuts
            } else {
                Outcome::FoundNothing
            }
        }
        Action::Eat => {
            if agent.fruit > 0 {
                agent.fruit -= 1;
                agent.energy = (agent.energy + FRUIT_ENERGY).min(MAX_ENERGY);
                Outcome::AteFruit
            } else if agent.nuts > 0 {
                agent.nuts -= 1;
                agent.energy = (agent.energy + NUT_ENERGY).min(MAX_ENERGY);
                Outcome::AteNuts
            } else {
                Outcome::NothingToEat
            }
        }
        Action::Sleep => Outcome::Slept,
    }
}

/// One agent, its brain and its world.
pub struct Simulation {
    agent: HunterGatherer,
    brain: UtilityEvaluator<Action, HunterGatherer>,
    rng: StdRng,
    tick: u32,
}

impl Simulation {
    /// Seeds the dice from `seed`, or from the OS when `None`.
    pub fn new(agent: HunterGatherer, config: EvaluatorConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            agent,
            brain: brain(config),
            rng,
            tick: 0,
        }
    }

    /// Current agent state.
    pub fn agent(&self) -> &HunterGatherer {
        &self.agent
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    /// Advances one tick.
    pub fn step(&mut self) -> Result<TickReport, SimError> {
        self.tick += 1;
        self.agent.energy -= ENERGY_DRAIN;
        if self.agent.energy <= 0.0 {
            return Err(SimError::Starved { tick: self.tick });
        }

        let action = self
            .brain
            .select(&self.agent)?
            // Nothing selectable: rest.
            .unwrap_or(Action::Sleep);
        let outcome = resolve(&mut self.agent, action, &mut self.rng);

        tracing::debug!(
            tick = self.tick,
            %action,
            ?outcome,
            energy = self.agent.energy,
            fruit = self.agent.fruit,
            nuts = self.agent.nuts,
            "tick resolved"
        );

        Ok(TickReport {
            tick: self.tick,
            action,
            outcome,
            energy: self.agent.energy,
        })
    }
}
