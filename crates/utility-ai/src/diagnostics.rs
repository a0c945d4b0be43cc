//! Decision records and the sinks that receive them.
//!
//! After each evaluation the evaluator hands a [`Decision`] to its
//! [`DiagnosticsSink`]. The crate does not store or transport these records;
//! [`TracingSink`] logs them and any closure can stand in as a sink.

use std::fmt;

/// Raw and normalized value of one consideration during one evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConsiderationRecord {
    pub name: String,
    pub raw: f64,
    pub utility: f64,
}

/// Final utility of one goal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GoalScore<G> {
    pub goal: G,
    pub utility: f64,
}

impl<G> GoalScore<G> {
    /// NaN scores are never selected.
    pub fn is_nan(&self) -> bool {
        self.utility.is_nan()
    }
}

/// Everything one evaluation produced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Decision<G> {
    /// Considerations in the order they were first evaluated.
    pub considerations: Vec<ConsiderationRecord>,
    /// Goals in mapping order.
    pub goals: Vec<GoalScore<G>>,
    /// Winning goal, `None` when nothing was selectable.
    pub chosen: Option<G>,
}

impl<G: PartialEq> Decision<G> {
    /// Utility of the chosen goal.
    pub fn best_utility(&self) -> Option<f64> {
        let chosen = self.chosen.as_ref()?;
        self.goals
            .iter()
            .find(|score| &score.goal == chosen)
            .map(|score| score.utility)
    }

    /// Goals whose scorer produced NaN.
    pub fn nan_goals(&self) -> impl Iterator<Item = &G> {
        self.goals
            .iter()
            .filter(|score| score.is_nan())
            .map(|score| &score.goal)
    }
}

/// Receives every decision the evaluator makes.
pub trait DiagnosticsSink<G>: Send + Sync {
    fn record(&self, decision: &Decision<G>);
}

impl<G, F> DiagnosticsSink<G> for F
where
    F: Fn(&Decision<G>) + Send + Sync,
{
    #[inline]
    fn record(&self, decision: &Decision<G>) {
        self(decision)
    }
}

/// Logs decisions through `tracing`.
///
/// Goal scores and the chosen goal go out at `debug`, the consideration
/// trace at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl<G: fmt::Debug> DiagnosticsSink<G> for TracingSink {
    fn record(&self, decision: &Decision<G>) {
        for record in &decision.considerations {
            tracing::trace!(
                name = %record.name,
                raw = record.raw,
                utility = record.utility,
                "consideration"
            );
        }
        for score in &decision.goals {
            tracing::debug!(goal = ?score.goal, utility = score.utility, "goal scored");
        }
        tracing::debug!(
            chosen = ?decision.chosen,
            considerations = decision.considerations.len(),
            "goal selected"
        );
    }
}

/// Discards every decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<G> DiagnosticsSink<G> for NullSink {
    #[inline]
    fn record(&self, _decision: &Decision<G>) {}
}
