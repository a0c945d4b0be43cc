//! Response curves.
//!
//! A response curve maps one raw measurement to a desirability score. Every
//! curve here is a pure function of its input and of parameters fixed at
//! construction. The free functions are the curves themselves; [`Curve`] is
//! the value a [`Consideration`](crate::Consideration) stores.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, UtilityError};

/// Floor returned by [`eps`].
pub const EPSILON: f64 = f64::EPSILON;

/// Default logistic midpoint.
pub const LOGISTIC_MIDPOINT: f64 = 0.5;

/// Default logistic steepness.
pub const LOGISTIC_STEEPNESS: f64 = 10.0;

/// Default exponential base.
pub const EXPONENTIAL_BASE: f64 = 2.0;

/// Near-zero constant, ignoring the input.
///
/// Useful as a fallback goal score that is never exactly zero.
#[inline]
pub fn eps(_val: f64) -> f64 {
    EPSILON
}

/// Identity.
#[inline]
pub fn linear(val: f64) -> f64 {
    val
}

/// `1 - x`.
#[inline]
pub fn inverse_linear(val: f64) -> f64 {
    1.0 - val
}

/// `x²`. Accelerates towards 1.
#[inline]
pub fn quadratic(val: f64) -> f64 {
    val * val
}

/// `1 - (1 - x)²`. Decelerates towards 1.
#[inline]
pub fn inverse_quadratic(val: f64) -> f64 {
    let rest = 1.0 - val;
    1.0 - rest * rest
}

/// S-shaped curve around `midpoint`.
///
/// `1 / (1 + e^(-steepness · (x - midpoint)))`
#[inline]
pub fn logistic(val: f64, midpoint: f64, steepness: f64) -> f64 {
    1.0 / (1.0 + (-steepness * (val - midpoint)).exp())
}

/// `(base^x - 1) / (base - 1)`, normalized so that `f(0) = 0` and `f(1) = 1`.
///
/// Unchecked: a `base <= 1` divides by zero or flips the curve upside down.
/// [`ExpBase`] and [`Curve::exponential`] validate the base; this raw form
/// does not.
#[inline]
pub fn exponential(val: f64, base: f64) -> f64 {
    (base.powf(val) - 1.0) / (base - 1.0)
}

/// Hermite smoothstep `t²(3 - 2t)` with `t = clamp(x, 0, 1)`.
#[inline]
pub fn smoothstep(val: f64) -> f64 {
    let t = val.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// `1.0` if `x > 0`, else `0.0`.
#[inline]
pub fn step_greater_than_zero(val: f64) -> f64 {
    if val > 0.0 { 1.0 } else { 0.0 }
}

/// `1.0` if `x <= 0`, else `0.0`.
#[inline]
pub fn step_less_equal_zero(val: f64) -> f64 {
    if val <= 0.0 { 1.0 } else { 0.0 }
}

type CurveFn = dyn Fn(f64) -> f64 + Send + Sync;

/// Validated logistic parameters. Both are finite.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LogisticParams {
    midpoint: f64,
    steepness: f64,
}

impl LogisticParams {
    /// Fails with [`UtilityError::InvalidParameter`] on a non-finite value.
    pub fn new(midpoint: f64, steepness: f64) -> Result<Self> {
        if !midpoint.is_finite() {
            return Err(UtilityError::invalid_parameter("logistic", "midpoint", midpoint));
        }
        if !steepness.is_finite() {
            return Err(UtilityError::invalid_parameter("logistic", "steepness", steepness));
        }
        Ok(Self {
            midpoint,
            steepness,
        })
    }

    pub const fn midpoint(&self) -> f64 {
        self.midpoint
    }

    pub const fn steepness(&self) -> f64 {
        self.steepness
    }
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            midpoint: LOGISTIC_MIDPOINT,
            steepness: LOGISTIC_STEEPNESS,
        }
    }
}

/// Validated exponential base. Always finite and greater than 1.
///
/// The field is private, so an invalid base cannot be written out by hand:
///
/// ```compile_fail
/// use utility_ai::curve::{Curve, ExpBase};
///
/// let curve = Curve::Exponential(ExpBase { base: 1.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ExpBase {
    base: f64,
}

impl ExpBase {
    /// Fails with [`UtilityError::InvalidParameter`] unless `base > 1`.
    pub fn new(base: f64) -> Result<Self> {
        // NaN fails the comparison too.
        if !(base > 1.0 && base.is_finite()) {
            return Err(UtilityError::invalid_parameter("exponential", "base", base));
        }
        Ok(Self { base })
    }

    pub const fn get(self) -> f64 {
        self.base
    }
}

impl Default for ExpBase {
    fn default() -> Self {
        Self {
            base: EXPONENTIAL_BASE,
        }
    }
}

/// A response curve with its parameters bound.
///
/// Parameterized variants only hold validated [`LogisticParams`] and
/// [`ExpBase`] values, built through [`Curve::logistic`],
/// [`Curve::exponential`] or the parameter types' own constructors.
#[derive(Clone, Default, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Curve {
    Epsilon,
    #[default]
    Linear,
    InverseLinear,
    Quadratic,
    InverseQuadratic,
    Logistic(LogisticParams),
    Exponential(ExpBase),
    Smoothstep,
    StepGreaterThanZero,
    StepLessEqualZero,
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(Arc<CurveFn>),
}

impl Curve {
    /// Logistic curve with explicit parameters.
    pub fn logistic(midpoint: f64, steepness: f64) -> Result<Self> {
        LogisticParams::new(midpoint, steepness).map(Self::Logistic)
    }

    /// Logistic curve with midpoint `0.5` and steepness `10`.
    pub const fn logistic_default() -> Self {
        Self::Logistic(LogisticParams {
            midpoint: LOGISTIC_MIDPOINT,
            steepness: LOGISTIC_STEEPNESS,
        })
    }

    /// Exponential curve. Fails unless `base > 1`.
    pub fn exponential(base: f64) -> Result<Self> {
        ExpBase::new(base).map(Self::Exponential)
    }

    /// Exponential curve with base `2`.
    pub const fn exponential_default() -> Self {
        Self::Exponential(ExpBase {
            base: EXPONENTIAL_BASE,
        })
    }

    /// Wraps an arbitrary function as a curve.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Maps a raw value through this curve.
    pub fn apply(&self, val: f64) -> f64 {
        match self {
            Self::Epsilon => eps(val),
            Self::Linear => linear(val),
            Self::InverseLinear => inverse_linear(val),
            Self::Quadratic => quadratic(val),
            Self::InverseQuadratic => inverse_quadratic(val),
            Self::Logistic(params) => logistic(val, params.midpoint, params.steepness),
            Self::Exponential(base) => exponential(val, base.get()),
            Self::Smoothstep => smoothstep(val),
            Self::StepGreaterThanZero => step_greater_than_zero(val),
            Self::StepLessEqualZero => step_less_equal_zero(val),
            Self::Custom(f) => f(val),
        }
    }

    /// Snake-case name of the curve kind, e.g. `"inverse_linear"`.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

impl From<LogisticParams> for Curve {
    fn from(params: LogisticParams) -> Self {
        Self::Logistic(params)
    }
}

impl From<ExpBase> for Curve {
    fn from(base: ExpBase) -> Self {
        Self::Exponential(base)
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logistic(params) => f
                .debug_struct("Logistic")
                .field("midpoint", &params.midpoint)
                .field("steepness", &params.steepness)
                .finish(),
            Self::Exponential(base) => f.debug_struct("Exponential").field("base", &base.base).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn grid() -> impl Iterator<Item = f64> {
        (0..=100_i32).map(|i| f64::from(i) / 100.0)
    }

    fn assert_non_decreasing(name: &str, f: impl Fn(f64) -> f64) {
        let values: Vec<f64> = grid().map(&f).collect();
        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1], "{name} decreased: {} > {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn eps_is_positive_constant() {
        assert!(eps(0.0) > 0.0);
        assert_eq!(eps(0.0), f64::EPSILON);
        assert_eq!(eps(42.0), eps(-3.0));
    }

    #[test]
    fn normalized_endpoints() {
        for f in [linear, quadratic, inverse_quadratic] {
            assert_eq!(f(0.0), 0.0);
            assert_eq!(f(1.0), 1.0);
        }
        assert_eq!(inverse_linear(0.0), 1.0);
        assert_eq!(inverse_linear(1.0), 0.0);
    }

    #[test]
    fn exponential_endpoints_for_various_bases() {
        for base in [1.5, 2.0, 5.0, 10.0] {
            let curve = Curve::exponential(base).unwrap();
            assert!(curve.apply(0.0).abs() < EPS, "base {base}");
            assert!((curve.apply(1.0) - 1.0).abs() < EPS, "base {base}");
        }
    }

    #[test]
    fn higher_exponential_base_bows_lower() {
        assert!(exponential(0.5, 10.0) < exponential(0.5, 2.0));
    }

    #[test]
    fn exponential_rejects_base_at_or_below_one() {
        for base in [1.0, 0.5, 0.0, -2.0, f64::NAN, f64::INFINITY] {
            let err = Curve::exponential(base).unwrap_err();
            assert!(
                matches!(err, UtilityError::InvalidParameter { curve: "exponential", parameter: "base", .. }),
                "base {base} accepted"
            );
        }
    }

    #[test]
    fn logistic_rejects_non_finite_parameters() {
        assert!(Curve::logistic(f64::NAN, 10.0).is_err());
        assert!(Curve::logistic(0.5, f64::INFINITY).is_err());
        assert!(Curve::logistic(0.3, 4.0).is_ok());
    }

    #[test]
    fn parameter_types_only_hold_valid_values() {
        assert!(ExpBase::new(1.0).is_err());
        assert!(ExpBase::new(0.5).is_err());
        assert_eq!(ExpBase::new(3.0).unwrap().get(), 3.0);
        assert_eq!(ExpBase::default().get(), EXPONENTIAL_BASE);
        assert!(LogisticParams::new(f64::NEG_INFINITY, 1.0).is_err());

        let params = LogisticParams::new(0.3, 4.0).unwrap();
        assert_eq!((params.midpoint(), params.steepness()), (0.3, 4.0));
        assert_eq!(LogisticParams::default().midpoint(), LOGISTIC_MIDPOINT);

        let curve = Curve::from(ExpBase::new(10.0).unwrap());
        assert_eq!(curve.apply(0.5), exponential(0.5, 10.0));
        assert!(matches!(Curve::exponential_default(), Curve::Exponential(base) if base == ExpBase::default()));
    }

    #[test]
    fn logistic_is_centered_on_midpoint() {
        assert!((Curve::logistic_default().apply(0.5) - 0.5).abs() < EPS);
        assert!((logistic(0.3, 0.3, 10.0) - 0.5).abs() < EPS);
        assert!(logistic(0.0, 0.5, 1.0) > logistic(0.0, 0.5, 10.0));
        assert!(logistic(0.49, 0.5, 100.0) < 0.3);
        assert!(logistic(0.51, 0.5, 100.0) > 0.7);
    }

    #[test]
    fn monotonic_curves_never_decrease() {
        assert_non_decreasing("quadratic", quadratic);
        assert_non_decreasing("inverse_quadratic", inverse_quadratic);
        assert_non_decreasing("logistic", |x| logistic(x, LOGISTIC_MIDPOINT, LOGISTIC_STEEPNESS));
        assert_non_decreasing("exponential", |x| exponential(x, EXPONENTIAL_BASE));
        assert_non_decreasing("exponential_10", |x| exponential(x, 10.0));
        assert_non_decreasing("smoothstep", smoothstep);
    }

    #[test]
    fn smoothstep_clamps_and_eases() {
        assert_eq!(smoothstep(-1.0), 0.0);
        assert_eq!(smoothstep(2.0), 1.0);
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < EPS);
        assert!(smoothstep(0.01) < 0.01);
        assert!(smoothstep(0.99) > 0.99);
    }

    #[test]
    fn step_functions_split_at_zero() {
        for x in [-5.0, -0.1, 0.0] {
            assert_eq!(step_greater_than_zero(x), 0.0, "x = {x}");
            assert_eq!(step_less_equal_zero(x), 1.0, "x = {x}");
        }
        for x in [1e-9, 0.5, 3.0] {
            assert_eq!(step_greater_than_zero(x), 1.0, "x = {x}");
            assert_eq!(step_less_equal_zero(x), 0.0, "x = {x}");
        }
    }

    #[test]
    fn enum_dispatch_matches_free_functions() {
        assert_eq!(Curve::Quadratic.apply(0.3), quadratic(0.3));
        assert_eq!(Curve::InverseLinear.apply(0.3), inverse_linear(0.3));
        assert_eq!(Curve::default().apply(0.42), 0.42);
        assert_eq!(Curve::custom(|x| x * 3.0).apply(0.5), 1.5);
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(Curve::StepGreaterThanZero.name(), "step_greater_than_zero");
        assert_eq!(Curve::exponential_default().name(), "exponential");
        assert_eq!(format!("{:?}", Curve::InverseQuadratic), "inverse_quadratic");
        assert_eq!(format!("{:?}", Curve::custom(linear)), "Custom(..)");
    }
}
