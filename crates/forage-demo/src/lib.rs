//! Hunter-gatherer demo for the utility-ai goal selector.
//!
//! An agent burns one unit of energy per tick and, every tick, asks its
//! [`UtilityEvaluator`](utility_ai::UtilityEvaluator) whether to eat, sleep or
//! forage for fruit or nuts. The simulation loop owns all state; the
//! evaluator only reads it.

pub mod brain;
pub mod config;
pub mod simulation;

pub use brain::{Action, HunterGatherer, brain};
pub use config::DemoConfig;
pub use simulation::{Outcome, SimError, Simulation, TickReport};
