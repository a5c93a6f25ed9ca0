//! Lazy reader for regional ambient-temperature files.
//!
//! Files are CSV with a `DateTime` column (`%Y-%m-%d %H:%M:%S`) and a
//! `DegreeCelsius` column, one sample per row in chronological order.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::TimeSeriesError;

pub const DATE_TIME_COLUMN: &str = "DateTime";
pub const DEGREE_CELSIUS_COLUMN: &str = "DegreeCelsius";

/// Timestamp layout written by the preprocessing tools.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED_FORMATS: &[&str] = &[
    TIMESTAMP_FORMAT,
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// One ambient-temperature observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSample {
    pub timestamp: NaiveDateTime,
    pub degree_celsius: f64,
}

/// Parses a timestamp in any of the layouts found in regional files.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Handle on a temperature file. Cheap to clone; nothing is read until
/// [`TemperatureCsv::samples`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemperatureCsv {
    path: PathBuf,
}

impl TemperatureCsv {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file and returns an iterator over its samples in file order.
    ///
    /// Each call starts again from the first row.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::Open`] if the file cannot be opened, or
    /// [`TimeSeriesError::Record`] if the header lacks a required column.
    pub fn samples(&self) -> Result<TemperatureSamples, TimeSeriesError> {
        let file = File::open(&self.path).map_err(|source| TimeSeriesError::Open {
            path: self.path.clone(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| self.record_error(1, e))?;
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| TimeSeriesError::Record {
                    path: self.path.clone(),
                    line: 1,
                    message: format!("missing column `{name}`"),
                })
        };
        let date_time_idx = column(DATE_TIME_COLUMN)?;
        let degree_celsius_idx = column(DEGREE_CELSIUS_COLUMN)?;

        Ok(TemperatureSamples {
            path: self.path.clone(),
            records: reader.into_records(),
            date_time_idx,
            degree_celsius_idx,
        })
    }

    /// Reads every sample eagerly.
    ///
    /// # Errors
    ///
    /// Propagates the first read error, or [`TimeSeriesError::Empty`] if
    /// the file holds a header only.
    pub fn read_all(&self) -> Result<Vec<TemperatureSample>, TimeSeriesError> {
        let samples = self.samples()?.collect::<Result<Vec<_>, _>>()?;
        if samples.is_empty() {
            return Err(TimeSeriesError::Empty {
                path: self.path.clone(),
            });
        }
        Ok(samples)
    }

    fn record_error(&self, line: u64, e: csv::Error) -> TimeSeriesError {
        TimeSeriesError::Record {
            path: self.path.clone(),
            line,
            message: e.to_string(),
        }
    }
}

/// Iterator returned by [`TemperatureCsv::samples`].
pub struct TemperatureSamples {
    path: PathBuf,
    records: csv::StringRecordsIntoIter<File>,
    date_time_idx: usize,
    degree_celsius_idx: usize,
}

impl TemperatureSamples {
    fn parse(&self, record: &csv::StringRecord) -> Result<TemperatureSample, TimeSeriesError> {
        let line = record.position().map_or(0, csv::Position::line);
        let err = |message: String| TimeSeriesError::Record {
            path: self.path.clone(),
            line,
            message,
        };

        let raw_ts = record
            .get(self.date_time_idx)
            .ok_or_else(|| err(format!("missing `{DATE_TIME_COLUMN}` value")))?;
        let timestamp =
            parse_timestamp(raw_ts).ok_or_else(|| err(format!("invalid timestamp \"{raw_ts}\"")))?;

        let raw_temp = record
            .get(self.degree_celsius_idx)
            .ok_or_else(|| err(format!("missing `{DEGREE_CELSIUS_COLUMN}` value")))?;
        let degree_celsius = raw_temp
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| err(format!("invalid temperature \"{raw_temp}\"")))?;

        Ok(TemperatureSample {
            timestamp,
            degree_celsius,
        })
    }
}

impl Iterator for TemperatureSamples {
    type Item = Result<TemperatureSample, TimeSeriesError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(0, csv::Position::line);
                return Some(Err(TimeSeriesError::Record {
                    path: self.path.clone(),
                    line,
                    message: e.to_string(),
                }));
            }
        };
        Some(self.parse(&record))
    }
}
