//! Considerations: memoized, named scorers.
//!
//! A [`Consideration`] binds a raw-measurement function to a response
//! [`Curve`]. Within one [`EvaluationContext`] it measures at most once;
//! later evaluations read the cached utility back.
//!
//! Considerations compose with [`multiply`](Consideration::multiply),
//! [`min`](Consideration::min) and [`max`](Consideration::max). The result is
//! another consideration whose measurement is the operator applied to the
//! operands' *utilities*, with an identity curve.
//!
//! # Identity
//!
//! Every consideration gets a [`ConsiderationId`] when it is built. Clones
//! share it, so one consideration reused by several compounds is still
//! measured once per evaluation. Memo keys are derived from this id, never
//! from the display name.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::context::{EvaluationContext, MemoKey};
use crate::curve::Curve;
use crate::error::{BoxError, Result, UtilityError};
use crate::scorer::{AnyScorer, MeasureFn, Scorer};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsiderationId(u64);

impl ConsiderationId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConsiderationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Binary operator of a compound consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Multiply,
    Min,
    Max,
}

impl Operator {
    /// Applies the operator. NaN in either operand yields NaN.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        if lhs.is_nan() || rhs.is_nan() {
            return f64::NAN;
        }
        match self {
            Self::Multiply => lhs * rhs,
            Self::Min => lhs.min(rhs),
            Self::Max => lhs.max(rhs),
        }
    }

    /// Prefix used in compound names, e.g. `mul(a, b)`.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Multiply => "mul",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// Shortened `type_name` of a function type.
///
/// Named functions keep their last path segment (`has_food`); closures keep
/// the enclosing item as well (`main::{{closure}}`).
pub(crate) fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut segments = full.rsplit("::");
    match (segments.next(), segments.next()) {
        (Some(last), Some(parent)) if last.starts_with("{{") => format!("{parent}::{last}"),
        (Some(last), _) => last.to_owned(),
        (None, _) => full.to_owned(),
    }
}

enum Measure<C> {
    Raw(Arc<MeasureFn<C>>),
    Combine {
        op: Operator,
        lhs: AnyScorer<C>,
        rhs: AnyScorer<C>,
    },
}

impl<C> Clone for Measure<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Raw(func) => Self::Raw(Arc::clone(func)),
            Self::Combine { op, lhs, rhs } => Self::Combine {
                op: *op,
                lhs: lhs.clone(),
                rhs: rhs.clone(),
            },
        }
    }
}

struct Inner<C> {
    id: ConsiderationId,
    name: String,
    curve: Curve,
    measure: Measure<C>,
}

impl<C> Clone for Inner<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            curve: self.curve.clone(),
            measure: self.measure.clone(),
        }
    }
}

/// A raw measurement bound to a response curve.
pub struct Consideration<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Consideration<C> {
    /// Builds a consideration from an infallible measurement.
    ///
    /// The display name is derived from the function's type; override it with
    /// [`named`](Self::named).
    pub fn new<F>(func: F, curve: Curve) -> Self
    where
        F: Fn(&C) -> f64 + Send + Sync + 'static,
    {
        let name = short_type_name::<F>();
        Self::from_measure(
            name,
            curve,
            Measure::Raw(Arc::new(move |ctx: &C| -> std::result::Result<f64, BoxError> {
                Ok(func(ctx))
            })),
        )
    }

    /// Builds a consideration from a fallible measurement.
    ///
    /// A measurement error aborts the evaluation with
    /// [`UtilityError::ScorerFailure`].
    pub fn try_new<F, E>(func: F, curve: Curve) -> Self
    where
        F: Fn(&C) -> std::result::Result<f64, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let name = short_type_name::<F>();
        Self::from_measure(
            name,
            curve,
            Measure::Raw(Arc::new(move |ctx: &C| -> std::result::Result<f64, BoxError> {
                func(ctx).map_err(Into::into)
            })),
        )
    }

    fn from_measure(name: String, curve: Curve, measure: Measure<C>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: ConsiderationId::next(),
                name,
                curve,
                measure,
            }),
        }
    }

    pub(crate) fn compound(op: Operator, lhs: AnyScorer<C>, rhs: AnyScorer<C>) -> Self {
        let name = format!("{}({}, {})", op.symbol(), lhs.label(), rhs.label());
        Self::from_measure(name, Curve::Linear, Measure::Combine { op, lhs, rhs })
    }

    /// Replaces the display name.
    ///
    /// A consideration that is already shared gets a fresh identity under the
    /// new name, leaving the other handles untouched.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.name = name;
        } else {
            let mut inner = (*self.inner).clone();
            inner.id = ConsiderationId::next();
            inner.name = name;
            self.inner = Arc::new(inner);
        }
        self
    }

    /// Identity shared by clones; keys the memo table.
    pub fn id(&self) -> ConsiderationId {
        self.inner.id
    }

    /// Display name used in traces.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Curve applied to the raw value.
    pub fn curve(&self) -> &Curve {
        &self.inner.curve
    }

    /// `true` for results of [`multiply`](Self::multiply), [`min`](Self::min)
    /// and [`max`](Self::max).
    pub fn is_compound(&self) -> bool {
        matches!(self.inner.measure, Measure::Combine { .. })
    }

    /// Utility of this consideration for `ctx`, memoized in `scope`.
    pub fn evaluate(&self, ctx: &C, scope: &mut EvaluationContext) -> Result<f64> {
        let utility_key = MemoKey::utility(self.id());
        if let Some(utility) = scope.cached(utility_key) {
            return Ok(utility);
        }

        let raw = self.measure(ctx, scope)?;
        scope.store(MemoKey::raw(self.id()), raw);
        let utility = self.inner.curve.apply(raw);
        scope.store(utility_key, utility);
        scope.record(self.id(), self.name(), raw, utility)?;
        Ok(utility)
    }

    /// Measures `ctx` directly, skipping the memo table and the curve.
    ///
    /// Compound operands are evaluated in a private scope.
    pub fn raw_value(&self, ctx: &C) -> Result<f64> {
        self.measure(ctx, &mut EvaluationContext::new())
    }

    /// Raw value cached in `scope` by an earlier [`evaluate`](Self::evaluate).
    pub fn cached_raw(&self, scope: &EvaluationContext) -> Option<f64> {
        scope.cached(MemoKey::raw(self.id()))
    }

    fn measure(&self, ctx: &C, scope: &mut EvaluationContext) -> Result<f64> {
        match &self.inner.measure {
            Measure::Raw(func) => {
                func(ctx).map_err(|source| UtilityError::scorer_failure(self.name(), source))
            }
            Measure::Combine { op, lhs, rhs } => {
                let lhs = lhs.evaluate(ctx, scope)?;
                let rhs = rhs.evaluate(ctx, scope)?;
                Ok(op.apply(lhs, rhs))
            }
        }
    }

    /// `self × other`, where `other` is a scorer or a constant.
    #[must_use]
    pub fn multiply(&self, other: impl Into<AnyScorer<C>>) -> Self {
        Self::compound(Operator::Multiply, self.into(), other.into())
    }

    /// Smaller of the two utilities.
    #[must_use]
    pub fn min(&self, other: impl Into<AnyScorer<C>>) -> Self {
        Self::compound(Operator::Min, self.into(), other.into())
    }

    /// Larger of the two utilities.
    #[must_use]
    pub fn max(&self, other: impl Into<AnyScorer<C>>) -> Self {
        Self::compound(Operator::Max, self.into(), other.into())
    }
}

impl<C> Clone for Consideration<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for Consideration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consideration")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("curve", &self.inner.curve)
            .finish_non_exhaustive()
    }
}

impl<C> Scorer<C> for Consideration<C> {
    #[inline]
    fn evaluate(&self, ctx: &C, scope: &mut EvaluationContext) -> Result<f64> {
        Consideration::evaluate(self, ctx, scope)
    }

    fn label(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::FnScorer;

    struct Forager {
        energy: f64,
        fruit: u32,
        nuts: u32,
    }

    fn remaining_energy(ctx: &Forager) -> f64 {
        ctx.energy / 100.0
    }

    fn has_food(ctx: &Forager) -> f64 {
        f64::from(ctx.fruit.max(ctx.nuts))
    }

    fn forager() -> Forager {
        Forager {
            energy: 10.0,
            fruit: 1,
            nuts: 0,
        }
    }

    fn counted(counter: &Arc<AtomicUsize>) -> Consideration<Forager> {
        let counter = Arc::clone(counter);
        Consideration::new(
            move |ctx: &Forager| {
                counter.fetch_add(1, Ordering::SeqCst);
                ctx.energy / 100.0
            },
            Curve::Linear,
        )
        .named("counted")
    }

    #[test]
    fn derived_name_comes_from_function() {
        let c = Consideration::new(remaining_energy, Curve::InverseLinear);
        assert_eq!(c.name(), "remaining_energy");
        assert_eq!(c.named("stamina").name(), "stamina");
    }

    #[test]
    fn closure_names_keep_enclosing_item() {
        let c = Consideration::new(|ctx: &Forager| ctx.energy, Curve::Linear);
        assert!(c.name().ends_with("{{closure}}"), "got {}", c.name());
        assert!(c.name().contains("closure_names_keep_enclosing_item"));
    }

    #[test]
    fn evaluate_applies_curve_and_records_both_values() {
        let c = Consideration::new(remaining_energy, Curve::InverseLinear);
        let mut scope = EvaluationContext::new();

        let utility = c.evaluate(&forager(), &mut scope).unwrap();
        assert!((utility - 0.9).abs() < 1e-12);
        assert_eq!(c.cached_raw(&scope), Some(0.1));
        assert_eq!(scope.trace().len(), 1);
        assert_eq!(scope.trace()[0].name, "remaining_energy");
        assert_eq!(scope.trace()[0].raw, 0.1);
    }

    #[test]
    fn custom_name_does_not_clobber_raw_value() {
        // Name chosen to collide with another consideration's derived name.
        let c = Consideration::new(remaining_energy, Curve::Quadratic).named("has_food");
        let other = Consideration::new(has_food, Curve::StepGreaterThanZero);
        let mut scope = EvaluationContext::new();

        assert_eq!(c.evaluate(&forager(), &mut scope).unwrap(), 0.1 * 0.1);
        assert_eq!(other.evaluate(&forager(), &mut scope).unwrap(), 1.0);
        assert_eq!(c.cached_raw(&scope), Some(0.1));
        assert_eq!(other.cached_raw(&scope), Some(1.0));
        assert_eq!(c.evaluate(&forager(), &mut scope).unwrap(), 0.1 * 0.1);
    }

    #[test]
    fn memoizes_within_one_scope() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = counted(&calls);
        let mut scope = EvaluationContext::new();

        c.evaluate(&forager(), &mut scope).unwrap();
        c.clone().evaluate(&forager(), &mut scope).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(scope.len(), 1);

        c.evaluate(&forager(), &mut EvaluationContext::new()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn raw_value_bypasses_memo_and_curve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = counted(&calls);
        let squared = Consideration::new(remaining_energy, Curve::Quadratic);

        assert_eq!(c.raw_value(&forager()).unwrap(), 0.1);
        assert_eq!(c.raw_value(&forager()).unwrap(), 0.1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(squared.raw_value(&forager()).unwrap(), 0.1);
    }

    #[test]
    fn multiply_uses_operand_utilities() {
        let food = Consideration::new(has_food, Curve::StepGreaterThanZero);
        let energy = Consideration::new(remaining_energy, Curve::InverseLinear);
        let eat = food.multiply(&energy);
        let ctx = forager();

        let mut scope = EvaluationContext::new();
        let expected = food.evaluate(&ctx, &mut scope).unwrap() * energy.evaluate(&ctx, &mut scope).unwrap();
        assert_eq!(eat.evaluate(&ctx, &mut EvaluationContext::new()).unwrap(), expected);
        assert_eq!(eat.name(), "mul(has_food, remaining_energy)");
        assert!(eat.is_compound());
        assert!(matches!(eat.curve(), Curve::Linear));
    }

    #[test]
    fn combinators_accept_constants_in_either_order() {
        let energy = Consideration::new(remaining_energy, Curve::InverseLinear);
        let ctx = forager();
        let base = energy.evaluate(&ctx, &mut EvaluationContext::new()).unwrap();

        let right = energy.multiply(2.0);
        let left = AnyScorer::from(2.0).multiply(&energy);
        assert_eq!(right.evaluate(&ctx, &mut EvaluationContext::new()).unwrap(), base * 2.0);
        assert_eq!(left.evaluate(&ctx, &mut EvaluationContext::new()).unwrap(), base * 2.0);
        assert_eq!(right.name(), "mul(remaining_energy, 2.0)");
        assert_eq!(left.name(), "mul(2.0, remaining_energy)");

        assert_eq!(energy.min(0.5).evaluate(&ctx, &mut EvaluationContext::new()).unwrap(), 0.5);
        assert_eq!(energy.max(0.5).evaluate(&ctx, &mut EvaluationContext::new()).unwrap(), base);
        assert_eq!(energy.min(0.5).name(), "min(remaining_energy, 0.5)");
    }

    #[test]
    fn min_and_max_match_operand_utilities() {
        let food = Consideration::new(has_food, Curve::StepGreaterThanZero);
        let energy = Consideration::new(remaining_energy, Curve::Linear);
        let ctx = forager();

        let a = food.evaluate(&ctx, &mut EvaluationContext::new()).unwrap();
        let b = energy.evaluate(&ctx, &mut EvaluationContext::new()).unwrap();
        assert_eq!(food.min(&energy).evaluate(&ctx, &mut EvaluationContext::new()).unwrap(), a.min(b));
        assert_eq!(food.max(&energy).evaluate(&ctx, &mut EvaluationContext::new()).unwrap(), a.max(b));
    }

    #[test]
    fn combinators_accept_plain_functions() {
        let food = Consideration::new(has_food, Curve::StepGreaterThanZero);
        let eat = food.multiply(FnScorer::new(remaining_energy));
        let mut scope = EvaluationContext::new();

        assert_eq!(eat.evaluate(&forager(), &mut scope).unwrap(), 0.1);
        assert_eq!(eat.name(), "mul(has_food, remaining_energy)");
        // Plain functions are not traced: only `has_food` and the compound.
        assert_eq!(scope.len(), 2);
    }

    #[test]
    fn compound_is_memoized_and_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = counted(&calls);
        let doubled = counted.multiply(2.0);
        let both = doubled.max(&counted);
        let mut scope = EvaluationContext::new();

        let first = both.evaluate(&forager(), &mut scope).unwrap();
        let second = both.evaluate(&forager(), &mut scope).unwrap();
        assert_eq!(first, second);
        assert_eq!(doubled.evaluate(&forager(), &mut scope).unwrap(), 0.2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let names: Vec<&str> = scope.trace().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["counted", "mul(counted, 2.0)", "max(mul(counted, 2.0), counted)"]);
    }

    #[test]
    fn nan_propagates_through_operators() {
        assert!(Operator::Min.apply(f64::NAN, 1.0).is_nan());
        assert!(Operator::Max.apply(0.0, f64::NAN).is_nan());
        assert!(Operator::Multiply.apply(f64::NAN, 0.0).is_nan());
    }

    #[test]
    fn measurement_failure_propagates_with_name() {
        let broken = Consideration::try_new(
            |_: &Forager| Err::<f64, _>("sensor offline"),
            Curve::Linear,
        )
        .named("sensor");
        let energy = Consideration::new(remaining_energy, Curve::Linear);
        let compound = energy.multiply(&broken);
        let mut scope = EvaluationContext::new();

        let err = compound.evaluate(&forager(), &mut scope).unwrap_err();
        assert!(matches!(err, UtilityError::ScorerFailure { ref name, .. } if name == "sensor"));
        assert!(broken.raw_value(&forager()).is_err());
    }

    #[test]
    fn renaming_a_shared_consideration_forks_identity() {
        let c = Consideration::new(remaining_energy, Curve::Linear);
        let alias = c.clone();
        let renamed = c.named("stamina");

        assert_ne!(renamed.id(), alias.id());
        assert_eq!(alias.name(), "remaining_energy");
        assert_eq!(renamed.name(), "stamina");
    }

    #[test]
    fn ids_are_unique() {
        let a = Consideration::new(remaining_energy, Curve::Linear);
        let b = Consideration::new(remaining_energy, Curve::Linear);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), b.name());
    }
}
