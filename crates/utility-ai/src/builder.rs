//! Builder utilities for ergonomic goal mapping construction.
//!
//! This module provides short helper functions so goal declarations read like
//! a table: `consideration(has_food, Curve::StepGreaterThanZero)` instead of
//! `Consideration::new(..)`, and `from_fn(f)` / `constant(x)` for scorers that
//! need no curve.

use crate::{AnyScorer, Consideration, Curve, FnScorer};

/// Creates a consideration.
///
/// Shorthand for `Consideration::new(func, curve)`.
#[inline]
pub fn consideration<C, F>(func: F, curve: Curve) -> Consideration<C>
where
    F: Fn(&C) -> f64 + Send + Sync + 'static,
{
    Consideration::new(func, curve)
}

/// Creates a named consideration.
///
/// Shorthand for `Consideration::new(func, curve).named(name)`.
#[inline]
pub fn named<C, F>(name: impl Into<String>, func: F, curve: Curve) -> Consideration<C>
where
    F: Fn(&C) -> f64 + Send + Sync + 'static,
{
    Consideration::new(func, curve).named(name)
}

/// Uses a plain function as a scorer, without memoization or curve.
///
/// Shorthand for `AnyScorer::Function(FnScorer::new(func))`.
#[inline]
pub fn from_fn<C, F>(func: F) -> AnyScorer<C>
where
    F: Fn(&C) -> f64 + Send + Sync + 'static,
{
    AnyScorer::Function(FnScorer::new(func))
}

/// A fixed score.
///
/// Shorthand for `AnyScorer::Constant(value)`.
#[inline]
pub fn constant<C>(value: f64) -> AnyScorer<C> {
    AnyScorer::Constant(value)
}
