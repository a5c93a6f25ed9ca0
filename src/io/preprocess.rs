//! Conversion of raw regional station files into per-day case files.
//!
//! MeteoNavarra stations log in solar time. Cases expect civil time, which is
//! one hour ahead in winter and two in summer.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::info;

use crate::error::TimeSeriesError;
use crate::io::temperature_csv::TemperatureSample;

/// Offset between solar and civil time in force on the recorded dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarTimeSchedule {
    Winter,
    Summer,
}

impl SolarTimeSchedule {
    pub fn offset(self) -> Duration {
        match self {
            Self::Winter => Duration::hours(1),
            Self::Summer => Duration::hours(2),
        }
    }
}

impl FromStr for SolarTimeSchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "winter" => Ok(Self::Winter),
            "summer" => Ok(Self::Summer),
            other => Err(format!(
                "unknown time schedule \"{other}\", expected \"winter\" or \"summer\""
            )),
        }
    }
}

impl fmt::Display for SolarTimeSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Winter => "winter",
            Self::Summer => "summer",
        })
    }
}

/// Shifts samples to civil time and keeps those in `[start, end)` (midnights).
///
/// # Errors
///
/// Returns [`TimeSeriesError::EmptyWindow`] if no shifted sample falls in the window.
pub fn shift_to_civil_time(
    samples: impl IntoIterator<Item = TemperatureSample>,
    schedule: SolarTimeSchedule,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<TemperatureSample>, TimeSeriesError> {
    let from = start.and_time(NaiveTime::default());
    let until = end.and_time(NaiveTime::default());
    let offset = schedule.offset();

    let kept: Vec<TemperatureSample> = samples
        .into_iter()
        .map(|s| TemperatureSample {
            timestamp: s.timestamp + offset,
            ..s
        })
        .filter(|s| in_window(s.timestamp, from, until))
        .collect();

    if kept.is_empty() {
        return Err(TimeSeriesError::EmptyWindow {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    info!(
        samples = kept.len(),
        %schedule,
        %start,
        %end,
        "shifted ambient temperature to civil time"
    );
    Ok(kept)
}

fn in_window(at: NaiveDateTime, from: NaiveDateTime, until: NaiveDateTime) -> bool {
    at >= from && at < until
}

/// Name of the case file holding the series that starts on `start`.
pub fn preprocessed_file_name(start: NaiveDate) -> String {
    format!("{}_ambient_temperature_upna.csv", start.format("%Y%m%d"))
}
