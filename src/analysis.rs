//! Paired analysis of two daily series.
//!
//! The paired chart needs three things computed from the same inputs: the
//! aligned pairs, their correlation, and geometry for both sides. Doing it in
//! one pass keeps the three consistent with each other.

use serde::Serialize;

use crate::align::{AlignedPair, Aligner};
use crate::correlation::{CorrelationResult, Scorer};
use crate::plots::{ChartKind, ChartMapper, PairedGeometry};
use crate::scale::ValueDomain;
use crate::series::Series;

/// Settings for a paired analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Pairing window.
    pub aligner: Aligner,
    /// Layout of the paired chart.
    pub mapper: ChartMapper,
    /// Fixed domain for the primary side.
    pub primary_domain: Option<ValueDomain>,
    /// Fixed domain for the secondary side.
    pub secondary_domain: Option<ValueDomain>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            aligner: Aligner::new(),
            mapper: ChartMapper::new(ChartKind::Line),
            primary_domain: None,
            secondary_domain: None,
        }
    }
}

impl AnalysisOptions {
    /// Mood against temperature, the app's weather-mood view.
    #[must_use]
    pub fn mood_weather() -> Self {
        Self {
            primary_domain: Some(ValueDomain::MOOD),
            secondary_domain: Some(ValueDomain::TEMPERATURE_C),
            ..Self::default()
        }
    }

    fn scorer(&self) -> Scorer {
        let mut scorer = Scorer::new();
        if let Some(domain) = self.primary_domain {
            scorer = scorer.primary_domain(domain);
        }
        if let Some(domain) = self.secondary_domain {
            scorer = scorer.secondary_domain(domain);
        }
        scorer
    }
}

/// Aligned pairs with their score and chart geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedAnalysis {
    /// Pairs found within the window.
    pub pairs: Vec<AlignedPair>,
    /// Score over `pairs`.
    pub correlation: CorrelationResult,
    /// Both sides laid out on shared x positions.
    pub geometry: PairedGeometry,
}

impl PairedAnalysis {
    /// Align, score and lay out two series.
    pub fn compute(primary: &Series, secondary: &Series, options: &AnalysisOptions) -> Self {
        let pairs = options.aligner.align(primary, secondary);
        let correlation = options.scorer().score(&pairs);
        let geometry = options.mapper.map_pairs(&pairs, options.primary_domain, options.secondary_domain);
        Self { pairs, correlation, geometry }
    }

    /// True when the view should show its "no data" placeholder.
    #[must_use]
    pub fn is_insufficient(&self) -> bool {
        !self.correlation.has_signal()
    }
}
