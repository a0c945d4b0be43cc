//! Core scorer trait and its adapters.
//!
//! This module defines the [`Scorer`] trait, the single interface the
//! evaluator and the combinators work against. The trait is generic over a
//! context type `C`, which scorers only ever borrow immutably.
//!
//! Besides [`Consideration`], two adapters implement it: [`FnScorer`] for
//! plain functions and [`Constant`] for fixed values. [`AnyScorer`] is the
//! tagged union of all of them that goal mappings and combinators store.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::consideration::{Consideration, Operator, short_type_name};
use crate::context::EvaluationContext;
use crate::error::{BoxError, Result, UtilityError};

/// Something that can score a context.
pub trait Scorer<C>: Send + Sync {
    /// Scores `ctx`, memoizing through `scope` where the scorer supports it.
    ///
    /// # Errors
    ///
    /// Returns [`UtilityError::ScorerFailure`] when a raw measurement fails.
    fn evaluate(&self, ctx: &C, scope: &mut EvaluationContext) -> Result<f64>;

    /// Diagnostic name used in traces and compound names.
    fn label(&self) -> Cow<'_, str>;
}

/// Blanket implementation for boxed scorers.
///
/// This allows `Box<dyn Scorer<C>>` to be used wherever a `Scorer<C>` is
/// expected, enabling heterogeneous goal mappings.
impl<C> Scorer<C> for Box<dyn Scorer<C>> {
    #[inline]
    fn evaluate(&self, ctx: &C, scope: &mut EvaluationContext) -> Result<f64> {
        (**self).evaluate(ctx, scope)
    }

    #[inline]
    fn label(&self) -> Cow<'_, str> {
        (**self).label()
    }
}

impl<C> Scorer<C> for Arc<dyn Scorer<C>> {
    #[inline]
    fn evaluate(&self, ctx: &C, scope: &mut EvaluationContext) -> Result<f64> {
        (**self).evaluate(ctx, scope)
    }

    #[inline]
    fn label(&self) -> Cow<'_, str> {
        (**self).label()
    }
}

pub(crate) type MeasureFn<C> = dyn Fn(&C) -> std::result::Result<f64, BoxError> + Send + Sync;

/// A plain function used directly as a scorer.
///
/// Called on every evaluation and never memoized; it does not appear in the
/// consideration trace.
pub struct FnScorer<C> {
    func: Arc<MeasureFn<C>>,
    name: Cow<'static, str>,
}

impl<C> FnScorer<C> {
    /// Wraps an infallible function, named after its type.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&C) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: Cow::Owned(short_type_name::<F>()),
            func: Arc::new(move |ctx: &C| -> std::result::Result<f64, BoxError> { Ok(func(ctx)) }),
        }
    }

    /// Wraps a fallible function. Its error aborts the evaluation.
    pub fn try_new<F, E>(func: F) -> Self
    where
        F: Fn(&C) -> std::result::Result<f64, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            name: Cow::Owned(short_type_name::<F>()),
            func: Arc::new(move |ctx: &C| -> std::result::Result<f64, BoxError> {
                func(ctx).map_err(Into::into)
            }),
        }
    }

    /// Replaces the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<C> Clone for FnScorer<C> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            name: self.name.clone(),
        }
    }
}

impl<C> fmt::Debug for FnScorer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnScorer").field("name", &self.name).finish()
    }
}

impl<C> Scorer<C> for FnScorer<C> {
    fn evaluate(&self, ctx: &C, _scope: &mut EvaluationContext) -> Result<f64> {
        (self.func)(ctx).map_err(|source| UtilityError::scorer_failure(self.name.as_ref(), source))
    }

    fn label(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

/// A fixed score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl<C> Scorer<C> for Constant {
    #[inline]
    fn evaluate(&self, _ctx: &C, _scope: &mut EvaluationContext) -> Result<f64> {
        Ok(self.0)
    }

    fn label(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{:?}", self.0))
    }
}

/// Any scorer a goal mapping or a combinator can hold.
///
/// Considerations and plain-function scorers are stored by value, so no
/// `'static` bound on the context type is needed for them. Arbitrary
/// [`Scorer`] implementations go through [`AnyScorer::Dynamic`].
pub enum AnyScorer<C> {
    Constant(f64),
    Consideration(Consideration<C>),
    Function(FnScorer<C>),
    Dynamic(Arc<dyn Scorer<C>>),
}

impl<C> AnyScorer<C> {
    /// Wraps a custom [`Scorer`] implementation.
    pub fn dynamic<S>(scorer: S) -> Self
    where
        S: Scorer<C> + 'static,
    {
        Self::Dynamic(Arc::new(scorer))
    }

    /// Combines with `other` by multiplication. Lets a constant stand on the
    /// left-hand side.
    pub fn multiply(self, other: impl Into<AnyScorer<C>>) -> Consideration<C> {
        Consideration::compound(Operator::Multiply, self, other.into())
    }

    /// Smaller of the two utilities.
    pub fn min(self, other: impl Into<AnyScorer<C>>) -> Consideration<C> {
        Consideration::compound(Operator::Min, self, other.into())
    }

    /// Larger of the two utilities.
    pub fn max(self, other: impl Into<AnyScorer<C>>) -> Consideration<C> {
        Consideration::compound(Operator::Max, self, other.into())
    }
}

impl<C> Scorer<C> for AnyScorer<C> {
    fn evaluate(&self, ctx: &C, scope: &mut EvaluationContext) -> Result<f64> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::Consideration(consideration) => consideration.evaluate(ctx, scope),
            Self::Function(function) => function.evaluate(ctx, scope),
            Self::Dynamic(scorer) => scorer.evaluate(ctx, scope),
        }
    }

    fn label(&self) -> Cow<'_, str> {
        match self {
            Self::Constant(value) => Cow::Owned(format!("{value:?}")),
            Self::Consideration(consideration) => Cow::Borrowed(consideration.name()),
            Self::Function(function) => Cow::Borrowed(function.name()),
            Self::Dynamic(scorer) => scorer.label(),
        }
    }
}

impl<C> Clone for AnyScorer<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Constant(value) => Self::Constant(*value),
            Self::Consideration(consideration) => Self::Consideration(consideration.clone()),
            Self::Function(function) => Self::Function(function.clone()),
            Self::Dynamic(scorer) => Self::Dynamic(Arc::clone(scorer)),
        }
    }
}

impl<C> fmt::Debug for AnyScorer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Consideration(consideration) => {
                f.debug_tuple("Consideration").field(consideration).finish()
            }
            Self::Function(function) => f.debug_tuple("Function").field(function).finish(),
            Self::Dynamic(scorer) => f.debug_tuple("Dynamic").field(&scorer.label()).finish(),
        }
    }
}

impl<C> From<f64> for AnyScorer<C> {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl<C> From<Constant> for AnyScorer<C> {
    fn from(value: Constant) -> Self {
        Self::Constant(value.0)
    }
}

impl<C> From<Consideration<C>> for AnyScorer<C> {
    fn from(consideration: Consideration<C>) -> Self {
        Self::Consideration(consideration)
    }
}

impl<C> From<&Consideration<C>> for AnyScorer<C> {
    fn from(consideration: &Consideration<C>) -> Self {
        Self::Consideration(consideration.clone())
    }
}

impl<C> From<FnScorer<C>> for AnyScorer<C> {
    fn from(function: FnScorer<C>) -> Self {
        Self::Function(function)
    }
}

impl<C> From<Box<dyn Scorer<C>>> for AnyScorer<C> {
    fn from(scorer: Box<dyn Scorer<C>>) -> Self {
        Self::Dynamic(Arc::from(scorer))
    }
}

impl<C> From<Arc<dyn Scorer<C>>> for AnyScorer<C> {
    fn from(scorer: Arc<dyn Scorer<C>>) -> Self {
        Self::Dynamic(scorer)
    }
}
