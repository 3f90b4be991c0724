//! # Tideline
//!
//! Daily time-series engine for wellness and savings views.
//!
//! Providers deliver samples with irregular timestamps: mood check-ins,
//! weather readings, ledger movements. Tideline puts them on a common daily
//! timeline, pairs two series by nearest timestamp, scores how they move
//! together, and projects series into chart coordinates. A small counter
//! animation rounds it off.
//!
//! ## Quick Start
//!
//! ```rust
//! use tideline::prelude::*;
//!
//! let normalizer = Normalizer::utc();
//! let mood = normalizer.normalize(vec![
//!     RawSample::at_text("2024-06-01T09:00:00Z", MoodLabel::Great.score()),
//!     RawSample::at_text("2024-06-02T09:00:00Z", MoodLabel::Terrible.score()),
//! ]);
//! let weather = normalizer.normalize(vec![
//!     RawSample::at_text("2024-06-01T13:00:00Z", 30.0),
//!     RawSample::at_text("2024-06-02T13:00:00Z", 5.0),
//! ]);
//!
//! let pairs = tideline::align(&mood, &weather, None);
//! let result = Scorer::new()
//!     .primary_domain(ValueDomain::MOOD)
//!     .secondary_domain(ValueDomain::TEMPERATURE_C)
//!     .score(&pairs);
//! assert_eq!(result.label, Impact::Positive);
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime`: drive counter ramps on a tokio interval
//! - `cli`: the `tideline` command-line tool
//! - `full`: all features enabled

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Canonical daily series and the normalizer building them.
pub mod series;

/// Mood, weather and savings provider adapters.
pub mod sources;

/// Nearest-timestamp alignment of two series.
pub mod align;

/// Bounded correlation score over aligned pairs.
pub mod correlation;

// ============================================================================
// Geometry Modules
// ============================================================================

/// Geometric primitives (points, segments).
pub mod geometry;

/// Value domains and scale functions.
pub mod scale;

/// Bar and line chart layouts.
pub mod plots;

// ============================================================================
// Pipelines
// ============================================================================

/// Counter animation.
pub mod animate;

/// Align, score and lay out two series together.
pub mod analysis;

/// Engine configuration.
pub mod config;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for tideline operations.
pub mod error;

pub use error::{Error, Result};

use std::time::Duration;

use animate::{Ramp, DEFAULT_DURATION};
use plots::{ChartKind, ChartMapper, Geometry};

/// Normalize raw samples, cutting days in the host's time zone.
pub fn normalize<I>(raw: I) -> series::Series
where
    I: IntoIterator<Item = series::RawSample>,
{
    series::Normalizer::local().normalize(raw)
}

/// Pair `primary` with `secondary` within `tolerance` (24 hours if `None`).
pub fn align(
    primary: &series::Series,
    secondary: &series::Series,
    tolerance: Option<chrono::Duration>,
) -> Vec<align::AlignedPair> {
    let aligner = tolerance.map_or_else(align::Aligner::new, |t| align::Aligner::new().tolerance(t));
    aligner.align(primary, secondary)
}

/// Score aligned pairs against their observed extents.
pub fn correlate(pairs: &[align::AlignedPair]) -> correlation::CorrelationResult {
    correlation::Scorer::new().score(pairs)
}

/// Lay out a series as `kind` in a chart of the given height.
pub fn map_to_geometry(
    series: &series::Series,
    kind: ChartKind,
    height: f32,
    domain: Option<scale::ValueDomain>,
) -> Geometry {
    ChartMapper::new(kind).height(height).maybe_domain(domain).map(series)
}

/// Counter ramp from 0 to `target` (over 2 seconds if `duration` is `None`).
pub fn animate_to(target: f64, duration: Option<Duration>) -> Ramp {
    Ramp::new(target, duration.unwrap_or(DEFAULT_DURATION))
}

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use tideline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::align::{AlignedPair, Aligner};
    pub use crate::analysis::{AnalysisOptions, PairedAnalysis};
    pub use crate::animate::{AnimatedCounter, CancelHandle, Ramp};
    pub use crate::config::Config;
    pub use crate::correlation::{CorrelationResult, CorrelationStrength, Impact, Scorer};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Point, Segment};
    pub use crate::plots::{ChartKind, ChartMapper, Geometry, PairedGeometry, RenderPoint};
    pub use crate::scale::{LinearScale, Scale, ValueDomain};
    pub use crate::series::{DayZone, Normalizer, RawSample, RawTimestamp, Sample, Series};
    pub use crate::sources::{MoodEntry, MoodLabel, SavingsEvent, WeatherObservation};
}

// ============================================================================
// Tests
// ============================================================================
