//! Chart geometry: projecting series into chart space.
//!
//! [`ChartMapper`] holds the layout parameters and dispatches on
//! [`ChartKind`] to one layout function per chart variant. Every variant
//! goes through the same [`LinearScale`] so clamping and the flat-domain
//! fallback are shared.

mod bar;
mod line;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::align::AlignedPair;
use crate::error::Error;
use crate::geometry::Point;
use crate::scale::{LinearScale, ValueDomain, MID_FRACTION};
use crate::series::{Sample, Series};

pub use bar::BarLayout;
pub use line::LineLayout;

/// Bars shown by the compact bar view.
pub const DEFAULT_COMPACT_BAR_LIMIT: usize = 7;

/// Default chart height in layout units.
pub const DEFAULT_HEIGHT: f32 = 200.0;

/// Default chart width in layout units.
pub const DEFAULT_WIDTH: f32 = 300.0;

/// Chart variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Compact bar chart of the most recent days.
    #[default]
    Bar,
    /// Line chart with connecting segments.
    Line,
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "line" => Ok(Self::Line),
            other => Err(Error::InputParse(format!("unknown chart kind '{other}'"))),
        }
    }
}

/// A sample projected into chart space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderPoint {
    /// Horizontal position.
    pub x: f32,
    /// Height above the baseline.
    pub y: f32,
    /// Sample the point was derived from.
    pub sample: Sample,
}

impl RenderPoint {
    /// Position as a bare point.
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Output of a mapping pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    /// Bar layout.
    Bar(BarLayout),
    /// Line layout.
    Line(LineLayout),
}

impl Geometry {
    /// Mapped points in layout order.
    #[must_use]
    pub fn points(&self) -> &[RenderPoint] {
        match self {
            Self::Bar(layout) => &layout.points,
            Self::Line(layout) => &layout.points,
        }
    }

    /// Number of mapped points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points().len()
    }

    /// True when nothing was mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    /// Chart variant that produced this geometry.
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Bar(_) => ChartKind::Bar,
            Self::Line(_) => ChartKind::Line,
        }
    }
}

/// Both sides of an aligned pair set, laid out on shared x positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedGeometry {
    /// Primary side.
    pub primary: Geometry,
    /// Secondary side.
    pub secondary: Geometry,
}

/// Projects series into chart space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMapper {
    kind: ChartKind,
    width: f32,
    height: f32,
    domain: Option<ValueDomain>,
    compact_limit: usize,
    mid_fraction: f32,
}

impl Default for ChartMapper {
    fn default() -> Self {
        Self::new(ChartKind::default())
    }
}

impl ChartMapper {
    /// Create a mapper for the given chart variant.
    #[must_use]
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            domain: None,
            compact_limit: DEFAULT_COMPACT_BAR_LIMIT,
            mid_fraction: MID_FRACTION,
        }
    }

    /// Switch chart variant.
    #[must_use]
    pub fn kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the available height.
    #[must_use]
    pub fn height(mut self, height: f32) -> Self {
        self.height = height.max(0.0);
        self
    }

    /// Set the available width.
    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.width = width.max(0.0);
        self
    }

    /// Use a fixed value domain instead of the data's own extent.
    #[must_use]
    pub fn domain(mut self, domain: ValueDomain) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Use a fixed domain if one is given.
    #[must_use]
    pub fn maybe_domain(mut self, domain: Option<ValueDomain>) -> Self {
        self.domain = domain;
        self
    }

    /// Maximum number of bars in the compact bar view (at least 1).
    #[must_use]
    pub fn compact_limit(mut self, limit: usize) -> Self {
        self.compact_limit = limit.max(1);
        self
    }

    /// Height fraction used when the domain is flat.
    #[must_use]
    pub fn mid_fraction(mut self, fraction: f32) -> Self {
        self.mid_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Selected chart variant.
    #[must_use]
    pub fn chart_kind(&self) -> ChartKind {
        self.kind
    }

    /// Map a series.
    pub fn map(&self, series: &Series) -> Geometry {
        self.map_samples(series.samples())
    }

    /// Map samples that are already in ascending order.
    pub fn map_samples(&self, samples: &[Sample]) -> Geometry {
        match self.kind {
            ChartKind::Bar => Geometry::Bar(bar::layout(self, samples)),
            ChartKind::Line => Geometry::Line(line::layout(self, samples)),
        }
    }

    /// Map both sides of aligned pairs, each against its own domain.
    ///
    /// The mapper's own fixed domain is ignored here; pass one per side.
    pub fn map_pairs(
        &self,
        pairs: &[AlignedPair],
        primary_domain: Option<ValueDomain>,
        secondary_domain: Option<ValueDomain>,
    ) -> PairedGeometry {
        let side = |value: fn(&AlignedPair) -> f64| -> Vec<Sample> {
            pairs
                .iter()
                .map(|p| Sample { timestamp: p.timestamp, day: p.timestamp.date_naive(), value: value(p) })
                .collect()
        };
        let primary = side(|p| p.primary);
        let secondary = side(|p| p.secondary);

        PairedGeometry {
            primary: self.maybe_domain(primary_domain).map_samples(&primary),
            secondary: self.maybe_domain(secondary_domain).map_samples(&secondary),
        }
    }

    /// Height scale for the samples that will actually be drawn.
    ///
    /// Values outside a fixed domain are clamped to `[0, H]` rather than
    /// drawn past the chart edge.
    fn value_scale(&self, samples: &[Sample]) -> LinearScale {
        let domain = self
            .domain
            .or_else(|| ValueDomain::from_values(samples.iter().map(|s| s.value)))
            .unwrap_or(ValueDomain { min: 0.0, max: 0.0 });
        LinearScale::new(domain, (0.0, self.height)).fallback(self.mid_fraction)
    }
}
