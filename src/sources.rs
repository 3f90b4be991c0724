//! Adapters for the providers feeding the engine.
//!
//! Each provider speaks its own vocabulary (mood labels, temperatures,
//! ledger amounts); these types reduce them to [`RawSample`]s.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::scale::ValueDomain;
use crate::series::{RawSample, RawTimestamp};

/// Discrete mood reported by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    /// Worst mood.
    Terrible,
    /// Below average.
    Bad,
    /// Neither good nor bad.
    Neutral,
    /// Above average.
    Good,
    /// Best mood.
    Great,
}

impl MoodLabel {
    /// All labels, worst first.
    pub const ALL: [Self; 5] = [Self::Terrible, Self::Bad, Self::Neutral, Self::Good, Self::Great];

    /// Numeric score on the mood domain (1 to 10).
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Self::Terrible => 2.0,
            Self::Bad => 4.0,
            Self::Neutral => 5.0,
            Self::Good => 7.0,
            Self::Great => 9.0,
        }
    }

    /// Domain the scores live in.
    #[must_use]
    pub const fn domain() -> ValueDomain {
        ValueDomain::MOOD
    }

    /// Lowercase name as used by the provider.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terrible => "terrible",
            Self::Bad => "bad",
            Self::Neutral => "neutral",
            Self::Good => "good",
            Self::Great => "great",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InputParse(format!("unknown mood '{s}'")))
    }
}

/// One mood check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// When the mood was logged.
    pub timestamp: RawTimestamp,
    /// Reported mood.
    pub mood: MoodLabel,
}

impl From<MoodEntry> for RawSample {
    fn from(entry: MoodEntry) -> Self {
        Self { timestamp: entry.timestamp, value: entry.mood.score() }
    }
}

/// One weather reading from the location provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Observation time.
    pub timestamp: RawTimestamp,
    /// Air temperature in degrees Celsius.
    pub temperature_c: f64,
}

impl WeatherObservation {
    /// Domain used when scoring temperatures.
    #[must_use]
    pub const fn domain() -> ValueDomain {
        ValueDomain::TEMPERATURE_C
    }
}

impl From<WeatherObservation> for RawSample {
    fn from(obs: WeatherObservation) -> Self {
        Self { timestamp: obs.timestamp, value: obs.temperature_c }
    }
}

/// One ledger movement into (positive) or out of (negative) savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEvent {
    /// Booking time.
    pub timestamp: RawTimestamp,
    /// Monetary amount.
    pub amount: f64,
}

impl From<SavingsEvent> for RawSample {
    fn from(event: SavingsEvent) -> Self {
        Self { timestamp: event.timestamp, value: event.amount }
    }
}
