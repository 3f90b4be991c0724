//! Engine configuration.
//!
//! YAML with a serde default for every field, so an empty document is a
//! valid configuration.

use std::path::Path;
use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::align::{Aligner, DEFAULT_TOLERANCE_MS};
use crate::animate::{AnimatedCounter, Ramp};
use crate::error::{Error, Result};
use crate::plots::{ChartKind, ChartMapper, DEFAULT_COMPACT_BAR_LIMIT, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::scale::MID_FRACTION;
use crate::series::Normalizer;

/// Alignment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Maximum distance between paired samples, in milliseconds.
    #[serde(default = "default_tolerance_ms")]
    pub tolerance_ms: i64,
}

fn default_tolerance_ms() -> i64 {
    DEFAULT_TOLERANCE_MS
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self { tolerance_ms: default_tolerance_ms() }
    }
}

/// Chart layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Default chart variant.
    #[serde(default)]
    pub kind: ChartKind,

    /// Available height.
    #[serde(default = "default_height")]
    pub height: f32,

    /// Available width.
    #[serde(default = "default_width")]
    pub width: f32,

    /// Bars kept by the compact bar view.
    #[serde(default = "default_compact_bar_limit")]
    pub compact_bar_limit: usize,

    /// Height fraction used for a flat domain.
    #[serde(default = "default_mid_height_fraction")]
    pub mid_height_fraction: f32,
}

fn default_height() -> f32 {
    DEFAULT_HEIGHT
}
fn default_width() -> f32 {
    DEFAULT_WIDTH
}
fn default_compact_bar_limit() -> usize {
    DEFAULT_COMPACT_BAR_LIMIT
}
fn default_mid_height_fraction() -> f32 {
    MID_FRACTION
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::default(),
            height: default_height(),
            width: default_width(),
            compact_bar_limit: default_compact_bar_limit(),
            mid_height_fraction: default_mid_height_fraction(),
        }
    }
}

/// Counter animation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Animation length in milliseconds.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// Tick interval in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_duration_ms() -> u64 {
    2000
}
fn default_tick_ms() -> u64 {
    16
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { duration_ms: default_duration_ms(), tick_ms: default_tick_ms() }
    }
}

/// Time zone used to cut days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneConfig {
    /// Offset from UTC in minutes; the host's offset when absent.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Alignment settings.
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Animation settings.
    #[serde(default)]
    pub animation: AnimationConfig,

    /// Day boundary settings.
    #[serde(default)]
    pub timezone: TimezoneConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            alignment: AlignmentConfig::default(),
            chart: ChartConfig::default(),
            animation: AnimationConfig::default(),
            timezone: TimezoneConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;

        Self::parse(&content)
    }

    /// Parses and validates configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails, or the offending
    /// key if validation fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                let line = e.location().map(|l| l.line()).unwrap_or(0);
                Error::ConfigParse { line, message: e.to_string() }
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] naming the first bad key.
    pub fn validate(&self) -> Result<()> {
        if self.alignment.tolerance_ms < 0 {
            return Err(Error::invalid("alignment.tolerance_ms", "must not be negative"));
        }
        if !(self.chart.height.is_finite() && self.chart.height > 0.0) {
            return Err(Error::invalid("chart.height", "must be a positive number"));
        }
        if !(self.chart.width.is_finite() && self.chart.width > 0.0) {
            return Err(Error::invalid("chart.width", "must be a positive number"));
        }
        if self.chart.compact_bar_limit == 0 {
            return Err(Error::invalid("chart.compact_bar_limit", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.chart.mid_height_fraction) {
            return Err(Error::invalid("chart.mid_height_fraction", "must be between 0 and 1"));
        }
        if self.animation.tick_ms == 0 {
            return Err(Error::invalid("animation.tick_ms", "must be at least 1"));
        }
        if let Some(minutes) = self.timezone.utc_offset_minutes {
            if self.offset().is_none() {
                return Err(Error::invalid(
                    "timezone.utc_offset_minutes",
                    format!("{minutes} is outside -1439..=1439"),
                ));
            }
        }
        Ok(())
    }

    /// Configured fixed offset, if one is set and valid.
    #[must_use]
    pub fn offset(&self) -> Option<FixedOffset> {
        self.timezone.utc_offset_minutes.and_then(|m| FixedOffset::east_opt(m.checked_mul(60)?))
    }

    /// Normalizer cutting days at the configured offset.
    #[must_use]
    pub fn normalizer(&self) -> Normalizer {
        self.offset().map_or_else(Normalizer::local, Normalizer::new)
    }

    /// Aligner with the configured tolerance.
    #[must_use]
    pub fn aligner(&self) -> Aligner {
        Aligner::new().tolerance_ms(self.alignment.tolerance_ms)
    }

    /// Chart mapper with the configured layout.
    #[must_use]
    pub fn chart_mapper(&self) -> ChartMapper {
        ChartMapper::new(self.chart.kind)
            .height(self.chart.height)
            .width(self.chart.width)
            .compact_limit(self.chart.compact_bar_limit)
            .mid_fraction(self.chart.mid_height_fraction)
    }

    /// Animation length.
    #[must_use]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation.duration_ms)
    }

    /// Tick interval.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.animation.tick_ms)
    }

    /// Ramp to `target` with the configured timing.
    #[must_use]
    pub fn ramp(&self, target: f64) -> Ramp {
        Ramp::with_tick(target, self.animation_duration(), self.tick_interval())
    }

    /// Counter with the configured timing.
    #[must_use]
    pub fn counter(&self) -> AnimatedCounter {
        AnimatedCounter::new(self.animation_duration()).with_tick(self.tick_interval())
    }
}
