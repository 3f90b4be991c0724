//! Nearest-timestamp join of two series.
//!
//! For each primary sample the closest secondary sample is looked up; the
//! pair survives only if the two are no further apart than the tolerance.
//! Primaries without a partner are dropped rather than paired with a made-up
//! value.

use chrono::{DateTime, Duration, FixedOffset};
use serde::Serialize;
use tracing::debug;

use crate::series::{Sample, Series};

/// Default pairing window: 24 hours.
pub const DEFAULT_TOLERANCE_MS: i64 = 86_400_000;

/// Two observations taken close enough together to compare.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedPair {
    /// Timestamp of the primary sample.
    pub timestamp: DateTime<FixedOffset>,
    /// Primary value.
    pub primary: f64,
    /// Secondary value.
    pub secondary: f64,
    /// Distance between the two original timestamps.
    #[serde(skip)]
    pub delta: Duration,
}

/// Joins series by nearest timestamp within a tolerance window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aligner {
    tolerance: Duration,
}

impl Default for Aligner {
    fn default() -> Self {
        Self { tolerance: Duration::milliseconds(DEFAULT_TOLERANCE_MS) }
    }
}

impl Aligner {
    /// Create an aligner with the default 24 hour window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pairing window. Negative windows are treated as zero.
    #[must_use]
    pub fn tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance.max(Duration::zero());
        self
    }

    /// Set the pairing window in milliseconds.
    #[must_use]
    pub fn tolerance_ms(self, millis: i64) -> Self {
        self.tolerance(Duration::milliseconds(millis))
    }

    /// Current pairing window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.tolerance
    }

    /// Pair every primary sample with its nearest secondary sample.
    ///
    /// Output follows the primary's order. When two secondary samples are
    /// equally close the earlier one is used.
    pub fn align(&self, primary: &Series, secondary: &Series) -> Vec<AlignedPair> {
        let mut pairs = Vec::with_capacity(primary.len().min(secondary.len()));

        for sample in primary {
            let Some((nearest, delta)) = nearest(sample, secondary) else {
                continue;
            };
            if delta <= self.tolerance {
                pairs.push(AlignedPair {
                    timestamp: sample.timestamp,
                    primary: sample.value,
                    secondary: nearest.value,
                    delta,
                });
            }
        }

        let dropped = primary.len() - pairs.len();
        if dropped > 0 {
            debug!(
                dropped,
                paired = pairs.len(),
                tolerance_ms = self.tolerance.num_milliseconds(),
                "primary samples without a secondary partner"
            );
        }
        pairs
    }
}

/// Closest secondary sample and its distance. Secondary samples are in
/// ascending time order, so keeping the first strict minimum prefers the
/// earlier sample on ties.
fn nearest<'a>(sample: &Sample, secondary: &'a Series) -> Option<(&'a Sample, Duration)> {
    let mut best: Option<(&Sample, Duration)> = None;
    for candidate in secondary {
        let delta = (candidate.timestamp - sample.timestamp).abs();
        match best {
            Some((_, best_delta)) if delta >= best_delta => {}
            _ => best = Some((candidate, delta)),
        }
    }
    best
}
