//! Co-movement score between two aligned series.
//!
//! Each side is first placed inside its own domain (an explicit one such as
//! the mood or temperature range, otherwise the observed extent), which puts
//! every value on a clamped `[0, 1]` position. The score is the mean signed
//! difference between the two positions:
//!
//! ```text
//! score = clamp(Σ(pᵢ - sᵢ) / n, -1, 1)
//! ```
//!
//! Its sign drives the label. The normalized covariance of the same
//! positions is reported alongside as `coherence` and backs
//! [`CorrelationResult::strength`].

use serde::Serialize;

use crate::align::AlignedPair;
use crate::scale::ValueDomain;

/// Below this the denominator is treated as zero.
const VARIANCE_EPSILON: f64 = 1e-12;

/// Qualitative reading of a correlation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Series move together.
    Positive,
    /// Series move in opposite directions.
    Negative,
    /// No signal, or not enough data.
    Neutral,
}

impl Impact {
    /// Plain sign test. Inputs are low resolution, so no dead band.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            Self::Positive
        } else if score < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlation strength categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationStrength {
    /// |r| >= 0.9
    VeryStrong,
    /// 0.7 <= |r| < 0.9
    Strong,
    /// 0.5 <= |r| < 0.7
    Moderate,
    /// 0.3 <= |r| < 0.5
    Weak,
    /// |r| < 0.3
    Negligible,
}

/// Outcome of scoring a set of aligned pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// Score in `[-1, 1]`.
    pub score: f64,
    /// Sign of the score.
    pub label: Impact,
    /// Number of pairs scored.
    pub sample_count: usize,
    /// Normalized covariance of the positions, in `[-1, 1]`. Zero when
    /// either side is flat.
    pub coherence: f64,
}

impl CorrelationResult {
    /// Result for fewer than two pairs.
    #[must_use]
    pub const fn insufficient(sample_count: usize) -> Self {
        Self { score: 0.0, label: Impact::Neutral, sample_count, coherence: 0.0 }
    }

    /// True when there were enough pairs to compute anything.
    #[must_use]
    pub fn has_signal(&self) -> bool {
        self.sample_count >= 2
    }

    /// Strength category of the positions' co-movement.
    #[must_use]
    pub fn strength(&self) -> CorrelationStrength {
        let abs = self.coherence.abs();
        if abs >= 0.9 {
            CorrelationStrength::VeryStrong
        } else if abs >= 0.7 {
            CorrelationStrength::Strong
        } else if abs >= 0.5 {
            CorrelationStrength::Moderate
        } else if abs >= 0.3 {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::Negligible
        }
    }
}

/// Scores aligned pairs, optionally against fixed domains.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scorer {
    primary_domain: Option<ValueDomain>,
    secondary_domain: Option<ValueDomain>,
}

impl Scorer {
    /// Scorer using observed extents on both sides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the primary side's domain.
    #[must_use]
    pub fn primary_domain(mut self, domain: ValueDomain) -> Self {
        self.primary_domain = Some(domain);
        self
    }

    /// Fix the secondary side's domain.
    #[must_use]
    pub fn secondary_domain(mut self, domain: ValueDomain) -> Self {
        self.secondary_domain = Some(domain);
        self
    }

    /// Score the pairs.
    pub fn score(&self, pairs: &[AlignedPair]) -> CorrelationResult {
        let n = pairs.len();
        if n < 2 {
            return CorrelationResult::insufficient(n);
        }

        let primary = positions(pairs.iter().map(|p| p.primary), self.primary_domain);
        let secondary = positions(pairs.iter().map(|p| p.secondary), self.secondary_domain);

        let score = mean_difference(&primary, &secondary).clamp(-1.0, 1.0);
        let coherence = normalized_covariance(&primary, &secondary).clamp(-1.0, 1.0);
        CorrelationResult { score, label: Impact::from_score(score), sample_count: n, coherence }
    }
}

/// Place values on `[0, 1]` within `domain`, or within their own extent.
fn positions<I>(values: I, domain: Option<ValueDomain>) -> Vec<f64>
where
    I: Iterator<Item = f64> + Clone,
{
    let domain = domain.or_else(|| ValueDomain::from_values(values.clone()));
    values
        .map(|v| domain.and_then(|d| d.fraction(v)).unwrap_or(0.5))
        .collect()
}

fn mean_difference(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    x.iter().zip(y).map(|(a, b)| a - b).sum::<f64>() / n as f64
}

fn normalized_covariance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    let denominator = (sum_xx * sum_yy).sqrt();
    if denominator > VARIANCE_EPSILON {
        sum_xy / denominator
    } else {
        0.0
    }
}
