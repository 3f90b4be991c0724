//! Scale functions for data-to-visual mappings.
//!
//! A [`ValueDomain`] bounds a series; a [`LinearScale`] maps that domain onto
//! a visual range. Both the correlation scorer and the chart mapper go
//! through this module so that clamping and the flat-domain fallback behave
//! the same everywhere.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Fraction of the range used when a domain has no extent.
pub const MID_FRACTION: f32 = 0.5;

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Closed numeric interval a series is expected to live in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDomain {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl ValueDomain {
    /// Mood scores: 1 (worst) to 10 (best).
    pub const MOOD: Self = Self { min: 1.0, max: 10.0 };

    /// Air temperature in degrees Celsius.
    pub const TEMPERATURE_C: Self = Self { min: 0.0, max: 40.0 };

    /// Unit interval.
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };

    /// Create a domain. Bounds given in the wrong order are swapped.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Observed extent of the finite values, or `None` if there are none.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(d) => Some(Self { min: d.min.min(v), max: d.max.max(v) }),
        })
    }

    /// Width of the interval.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// True when the interval has no usable width.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        span.is_nan() || span <= 0.0
    }

    /// Position of `value` within the domain as a fraction in `[0, 1]`.
    ///
    /// Returns `None` for a degenerate domain; callers pick their own
    /// fallback.
    #[must_use]
    pub fn fraction(&self, value: f64) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some(((value - self.min) / self.span()).clamp(0.0, 1.0))
    }

    /// Check whether `value` lies inside the domain.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for ValueDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.min, self.max)
    }
}

impl FromStr for ValueDomain {
    type Err = Error;

    /// Accepts `mood`, `temperature` or an explicit `MIN:MAX` pair.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mood" => Ok(Self::MOOD),
            "temperature" | "temp" => Ok(Self::TEMPERATURE_C),
            other => {
                let (lo, hi) = other
                    .split_once(':')
                    .ok_or_else(|| Error::InputParse(format!("domain '{s}' is not MIN:MAX")))?;
                let parse = |part: &str| {
                    part.trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| Error::InputParse(format!("domain bound '{part}' is not a number")))
                };
                Ok(Self::new(parse(lo)?, parse(hi)?))
            }
        }
    }
}

/// Linear scale for continuous-to-continuous mapping.
///
/// Values outside the domain are clamped to the range ends. A degenerate
/// domain maps every value to the fallback fraction of the range.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain: ValueDomain,
    range_min: f32,
    range_max: f32,
    fallback: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    #[must_use]
    pub fn new(domain: ValueDomain, range: (f32, f32)) -> Self {
        Self { domain, range_min: range.0, range_max: range.1, fallback: MID_FRACTION }
    }

    /// Create a scale from data extent.
    #[must_use]
    pub fn from_data(data: &[f64], range: (f32, f32)) -> Option<Self> {
        ValueDomain::from_values(data.iter().copied()).map(|domain| Self::new(domain, range))
    }

    /// Set the fraction of the range used for a degenerate domain.
    #[must_use]
    pub fn fallback(mut self, fraction: f32) -> Self {
        self.fallback = fraction.clamp(0.0, 1.0);
        self
    }

    /// True when every value maps to the fallback position.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.domain.is_degenerate()
    }
}

impl Scale<f64, f32> for LinearScale {
    fn scale(&self, value: f64) -> f32 {
        let t = self.domain.fraction(value).map_or(self.fallback, |t| t as f32);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain.min, self.domain.max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new(ValueDomain::new(0.0, 100.0), (0.0, 1.0));
        assert!((scale.scale(0.0) - 0.0).abs() < 0.001);
        assert!((scale.scale(50.0) - 0.5).abs() < 0.001);
        assert!((scale.scale(100.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_linear_scale_clamps() {
        let scale = LinearScale::new(ValueDomain::TEMPERATURE_C, (0.0, 200.0));
        assert!((scale.scale(-5.0) - 0.0).abs() < 0.001);
        assert!((scale.scale(55.0) - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_linear_scale_degenerate_uses_mid() {
        let scale = LinearScale::new(ValueDomain::new(5.0, 5.0), (0.0, 120.0));
        assert!(scale.is_degenerate());
        assert!((scale.scale(5.0) - 60.0).abs() < 0.001);
        assert!((scale.scale(1e9) - 60.0).abs() < 0.001);
    }

    #[test]
    fn test_linear_scale_custom_fallback() {
        let scale = LinearScale::new(ValueDomain::new(2.0, 2.0), (0.0, 100.0)).fallback(0.25);
        assert!((scale.scale(2.0) - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_linear_scale_from_data() {
        let scale = LinearScale::from_data(&[0.0, 50.0, 100.0], (0.0, 1.0))
            .expect("operation should succeed");
        assert!((scale.scale(50.0) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_linear_scale_from_data_empty() {
        assert!(LinearScale::from_data(&[], (0.0, 1.0)).is_none());
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        let scale = LinearScale::new(ValueDomain::UNIT, (100.0, 0.0));
        assert!((scale.scale(0.25) - 75.0).abs() < 0.001);
        assert_eq!(scale.range(), (100.0, 0.0));
    }

    #[test]
    fn test_domain_new_orders_bounds() {
        let d = ValueDomain::new(10.0, 1.0);
        assert_eq!(d, ValueDomain::MOOD);
    }

    #[test]
    fn test_domain_from_values_skips_non_finite() {
        let d = ValueDomain::from_values([3.0, f64::NAN, -1.0, f64::INFINITY, 7.0])
            .expect("finite values present");
        assert_eq!(d, ValueDomain::new(-1.0, 7.0));
        assert!(ValueDomain::from_values([f64::NAN]).is_none());
    }

    #[test]
    fn test_domain_fraction() {
        let d = ValueDomain::MOOD;
        assert_eq!(d.fraction(1.0), Some(0.0));
        assert_eq!(d.fraction(10.0), Some(1.0));
        assert_eq!(d.fraction(0.0), Some(0.0));
        assert!(ValueDomain::new(4.0, 4.0).fraction(4.0).is_none());
    }

    #[test]
    fn test_domain_parse() {
        assert_eq!("mood".parse::<ValueDomain>().ok(), Some(ValueDomain::MOOD));
        assert_eq!("Temperature".parse::<ValueDomain>().ok(), Some(ValueDomain::TEMPERATURE_C));
        assert_eq!("0:250".parse::<ValueDomain>().ok(), Some(ValueDomain::new(0.0, 250.0)));
        assert!("wide".parse::<ValueDomain>().is_err());
        assert!("a:b".parse::<ValueDomain>().is_err());
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(ValueDomain::MOOD.to_string(), "1:10");
    }
}
