//! Utility-based goal selection for simulated agents.
//!
//! Every tick an agent asks which of its goals is most desirable right now.
//! This library answers with the arg-max over a set of scorers.
//!
//! - **No persistent state**: each selection opens and drops its own scope
//! - **Memoized**: a consideration is measured at most once per selection
//! - **Deterministic**: goals are scored in declaration order and the first
//!   one wins ties
//! - **Generic**: the context and goal types belong to the caller
//!
//! # Architecture
//!
//! - [`curve`]: response curves normalizing raw measurements
//! - [`Consideration`]: raw measurement + curve, memoized and composable
//! - [`Scorer`]: the trait all scorers implement, with [`AnyScorer`] as the
//!   stored form
//! - [`EvaluationContext`]: per-selection memo table and trace
//! - [`UtilityEvaluator`]: scores a [`GoalMap`] and picks the winner
//! - [`DiagnosticsSink`]: receives a [`Decision`] after every selection

pub mod builder;
pub mod consideration;
pub mod context;
pub mod curve;
pub mod diagnostics;
pub mod error;
pub mod evaluator;
pub mod scorer;

// Re-export core types for ergonomic API
pub use consideration::{Consideration, ConsiderationId, Operator};
pub use context::{EvaluationContext, MemoKey, ValueKind};
pub use curve::{Curve, ExpBase, LogisticParams};
pub use diagnostics::{ConsiderationRecord, Decision, DiagnosticsSink, GoalScore, NullSink, TracingSink};
pub use error::{BoxError, ErrorSeverity, Result, UtilityError};
pub use evaluator::{EvaluatorConfig, GoalMap, UtilityEvaluator};
pub use scorer::{AnyScorer, Constant, FnScorer, Scorer};
