//! Goal selection.
//!
//! A [`UtilityEvaluator`] is built once from a [`GoalMap`] and then asked,
//! tick after tick, which goal scores highest for a context.
//!
//! # Semantics
//!
//! - Goals are scored in insertion order.
//! - The highest utility wins; on a tie, the goal listed first wins.
//! - A NaN utility is never selected. It is reported in the [`Decision`] and
//!   logged at `warn`.
//! - An empty mapping yields `None`, not an error.
//! - A failing scorer aborts the evaluation and its error is returned as is.
//!
//! Each call opens its own [`EvaluationContext`], so one evaluator can serve
//! several threads at once without locking.
//!
//! # Example
//!
//! ```rust
//! use utility_ai::{Consideration, Curve, GoalMap, UtilityEvaluator};
//!
//! struct Agent {
//!     hunger: f64,
//! }
//!
//! let hungry = Consideration::new(|a: &Agent| a.hunger, Curve::Quadratic);
//! let goals = GoalMap::new().with("eat", hungry).with("wander", 0.1);
//! let evaluator = UtilityEvaluator::new(goals);
//!
//! assert_eq!(evaluator.select(&Agent { hunger: 0.9 }).unwrap(), Some("eat"));
//! assert_eq!(evaluator.select(&Agent { hunger: 0.2 }).unwrap(), Some("wander"));
//! ```

use std::fmt;

use crate::context::EvaluationContext;
use crate::diagnostics::{Decision, DiagnosticsSink, GoalScore, TracingSink};
use crate::error::Result;
use crate::scorer::{AnyScorer, Scorer};

/// Insertion-ordered mapping from goals to scorers.
pub struct GoalMap<G, C> {
    entries: Vec<(G, AnyScorer<C>)>,
}

impl<G, C> GoalMap<G, C> {
    /// Empty mapping.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of goals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no goal is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Goals and scorers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&G, &AnyScorer<C>)> {
        self.entries.iter().map(|(goal, scorer)| (goal, scorer))
    }

    /// Goals in insertion order.
    pub fn goals(&self) -> impl Iterator<Item = &G> {
        self.entries.iter().map(|(goal, _)| goal)
    }
}

impl<G: PartialEq, C> GoalMap<G, C> {
    /// Adds a goal, or replaces the scorer of a goal already present while
    /// keeping its position.
    pub fn insert(&mut self, goal: G, scorer: impl Into<AnyScorer<C>>) {
        let scorer = scorer.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == goal) {
            Some((_, slot)) => *slot = scorer,
            None => self.entries.push((goal, scorer)),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, goal: G, scorer: impl Into<AnyScorer<C>>) -> Self {
        self.insert(goal, scorer);
        self
    }

    /// Scorer mapped to `goal`.
    pub fn get(&self, goal: &G) -> Option<&AnyScorer<C>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == goal)
            .map(|(_, scorer)| scorer)
    }
}

impl<G, C> Default for GoalMap<G, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: fmt::Debug, C> fmt::Debug for GoalMap<G, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(goal, scorer)| (goal, scorer.label())))
            .finish()
    }
}

impl<G, C, S> FromIterator<(G, S)> for GoalMap<G, C>
where
    G: PartialEq,
    S: Into<AnyScorer<C>>,
{
    fn from_iter<I: IntoIterator<Item = (G, S)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (goal, scorer) in iter {
            map.insert(goal, scorer);
        }
        map
    }
}

/// Evaluator settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Fail with [`UtilityError::AmbiguousKey`](crate::UtilityError::AmbiguousKey)
    /// when two distinct considerations share a display name within one
    /// evaluation. Off by default; collisions are then only logged.
    ///
    /// The check is by identity, not by value: building `a.multiply(2.0)`
    /// twice yields two considerations named `mul(a, 2.0)`, which strict mode
    /// rejects. Build the compound once and clone it to share it.
    pub strict_names: bool,
}

impl EvaluatorConfig {
    /// Sets the `strict_names` field.
    #[must_use]
    pub const fn strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }

    fn scope(&self) -> EvaluationContext {
        if self.strict_names {
            EvaluationContext::strict()
        } else {
            EvaluationContext::new()
        }
    }
}

/// Selects the arg-max goal of a [`GoalMap`].
pub struct UtilityEvaluator<G, C> {
    goals: GoalMap<G, C>,
    sink: Box<dyn DiagnosticsSink<G>>,
    config: EvaluatorConfig,
}

impl<G, C> UtilityEvaluator<G, C>
where
    G: Clone + fmt::Debug + 'static,
{
    /// Creates an evaluator that logs its decisions through [`TracingSink`].
    pub fn new(goals: GoalMap<G, C>) -> Self {
        Self {
            goals,
            sink: Box::new(TracingSink),
            config: EvaluatorConfig::default(),
        }
    }
}

impl<G, C> UtilityEvaluator<G, C>
where
    G: Clone + fmt::Debug,
{
    /// Replaces the diagnostics sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl DiagnosticsSink<G> + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Replaces the evaluator settings.
    #[must_use]
    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Current settings.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// The goal mapping this evaluator scores.
    pub fn goals(&self) -> &GoalMap<G, C> {
        &self.goals
    }

    /// Number of goals.
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// `true` when there is nothing to select.
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Scores every goal and returns the full decision record.
    ///
    /// The record is also handed to the diagnostics sink. Nothing is emitted
    /// when a scorer fails.
    pub fn evaluate(&self, ctx: &C) -> Result<Decision<G>> {
        let mut scope = self.config.scope();
        let mut goals = Vec::with_capacity(self.goals.len());
        let mut best: Option<(usize, f64)> = None;

        for (index, (goal, scorer)) in self.goals.entries.iter().enumerate() {
            let utility = scorer.evaluate(ctx, &mut scope)?;

            if utility.is_nan() {
                tracing::warn!(goal = ?goal, scorer = %scorer.label(), "goal scored NaN, skipping");
            } else if utility > best.map_or(f64::NEG_INFINITY, |(_, u)| u) {
                // Strict comparison: on a tie, the goal listed first stays.
                best = Some((index, utility));
            }

            goals.push(GoalScore {
                goal: goal.clone(),
                utility,
            });
        }

        let chosen = best.map(|(index, _)| goals[index].goal.clone());
        let decision = Decision {
            considerations: scope.into_trace(),
            goals,
            chosen,
        };
        self.sink.record(&decision);
        Ok(decision)
    }

    /// Returns the goal with the highest utility, or `None` when no goal is
    /// selectable.
    pub fn select(&self, ctx: &C) -> Result<Option<G>> {
        self.evaluate(ctx).map(|decision| decision.chosen)
    }
}

impl<G: fmt::Debug, C> fmt::Debug for UtilityEvaluator<G, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UtilityEvaluator")
            .field("goals", &self.goals)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
