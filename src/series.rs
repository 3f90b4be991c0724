//! Canonical daily series.
//!
//! Providers hand over samples in whatever shape they have: epoch
//! milliseconds, RFC 3339 strings, bare dates, duplicates, out of order.
//! [`Normalizer`] turns that into a [`Series`] holding at most one sample per
//! calendar day, ascending by day.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Timestamp as delivered by a provider, not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Milliseconds since the Unix epoch.
    Millis(f64),
    /// A fully qualified instant.
    Instant(DateTime<FixedOffset>),
    /// Free text: RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.
    Text(String),
}

/// A sample before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// When the value was observed.
    pub timestamp: RawTimestamp,
    /// Observed value.
    pub value: f64,
}

impl RawSample {
    /// Sample stamped with epoch milliseconds.
    #[must_use]
    pub fn at_millis(millis: f64, value: f64) -> Self {
        Self { timestamp: RawTimestamp::Millis(millis), value }
    }

    /// Sample stamped with a zoned instant.
    #[must_use]
    pub fn at<Tz: TimeZone>(timestamp: &DateTime<Tz>, value: f64) -> Self {
        Self { timestamp: RawTimestamp::Instant(timestamp.fixed_offset()), value }
    }

    /// Sample stamped with provider text.
    #[must_use]
    pub fn at_text(text: impl Into<String>, value: f64) -> Self {
        Self { timestamp: RawTimestamp::Text(text.into()), value }
    }
}

impl From<&Sample> for RawSample {
    fn from(sample: &Sample) -> Self {
        Self { timestamp: RawTimestamp::Instant(sample.timestamp), value: sample.value }
    }
}

/// A validated observation pinned to a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Original instant, kept for display and alignment.
    pub timestamp: DateTime<FixedOffset>,
    /// Calendar day of `timestamp` in the normalizer's zone.
    pub day: NaiveDate,
    /// Observed value (always finite).
    pub value: f64,
}

impl Sample {
    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub fn millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// Day-deduplicated, day-ascending sequence of samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Series with no samples.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the series holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples, ascending by day.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Iterate over samples, ascending by day.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Values in day order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Most recent sample.
    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// The `n` most recent samples, still ascending.
    #[must_use]
    pub fn last_n(&self, n: usize) -> &[Sample] {
        &self.samples[self.samples.len().saturating_sub(n)..]
    }

    /// Sum of all values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values().sum()
    }

    /// Sample recorded on `day`, if any.
    #[must_use]
    pub fn on(&self, day: NaiveDate) -> Option<&Sample> {
        self.samples.binary_search_by_key(&day, |s| s.day).ok().map(|i| &self.samples[i])
    }

    /// Samples converted back to raw form.
    pub fn to_raw(&self) -> impl Iterator<Item = RawSample> + '_ {
        self.samples.iter().map(RawSample::from)
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Time zone in which calendar days are cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayZone {
    /// The host's zone, daylight-saving rules included.
    Local,
    /// A pinned UTC offset.
    Fixed(FixedOffset),
}

/// Builds [`Series`] from raw samples in a given time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    zone: DayZone,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::local()
    }
}

impl Normalizer {
    /// Normalizer truncating to days at the given UTC offset.
    #[must_use]
    pub fn new(offset: FixedOffset) -> Self {
        Self { zone: DayZone::Fixed(offset) }
    }

    /// Normalizer in UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Normalizer in the host's time zone.
    ///
    /// Each instant takes the offset in force at that instant, so samples on
    /// either side of a daylight-saving change land on their own local day.
    #[must_use]
    pub fn local() -> Self {
        Self { zone: DayZone::Local }
    }

    /// Zone used for day truncation.
    #[must_use]
    pub fn zone(&self) -> DayZone {
        self.zone
    }

    /// Validate a raw timestamp and express it in this normalizer's zone.
    #[must_use]
    pub fn resolve(&self, timestamp: &RawTimestamp) -> Option<DateTime<FixedOffset>> {
        let instant = match timestamp {
            RawTimestamp::Millis(ms) if ms.is_finite() => {
                DateTime::<Utc>::from_timestamp_millis(ms.round() as i64)?.fixed_offset()
            }
            RawTimestamp::Millis(_) => return None,
            RawTimestamp::Instant(dt) => *dt,
            RawTimestamp::Text(text) => self.parse_text(text.trim())?,
        };
        Some(match self.zone {
            DayZone::Local => instant.with_timezone(&Local).fixed_offset(),
            DayZone::Fixed(offset) => instant.with_timezone(&offset),
        })
    }

    fn parse_text(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt);
        }
        let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0)
            })?;
        // Wall-clock times inside a DST gap do not exist; ambiguous ones take
        // the earlier instant.
        match self.zone {
            DayZone::Local => Local.from_local_datetime(&naive).earliest().map(|dt| dt.fixed_offset()),
            DayZone::Fixed(offset) => offset.from_local_datetime(&naive).single(),
        }
    }

    /// Normalize raw samples into a [`Series`].
    ///
    /// Samples with an unusable timestamp or a non-finite value are skipped.
    /// When two samples fall on the same day the one with the later original
    /// timestamp is kept; on equal timestamps the later one in input order.
    pub fn normalize<I>(&self, raw: I) -> Series
    where
        I: IntoIterator<Item = RawSample>,
    {
        let mut by_day: BTreeMap<NaiveDate, Sample> = BTreeMap::new();
        let mut skipped = 0usize;

        for RawSample { timestamp, value } in raw {
            let Some(resolved) = self.resolve(&timestamp) else {
                warn!(?timestamp, "skipping sample with invalid timestamp");
                skipped += 1;
                continue;
            };
            if !value.is_finite() {
                warn!(%resolved, value, "skipping sample with non-finite value");
                skipped += 1;
                continue;
            }

            let sample = Sample { timestamp: resolved, day: resolved.date_naive(), value };
            by_day
                .entry(sample.day)
                .and_modify(|kept| {
                    if sample.timestamp >= kept.timestamp {
                        *kept = sample;
                    }
                })
                .or_insert(sample);
        }

        let samples: Vec<Sample> = by_day.into_values().collect();
        debug!(days = samples.len(), skipped, "normalized series");
        Series { samples }
    }
}
