//! Ambient-temperature data strategies.
//!
//! The strategy is chosen by the `data_strategy` tag of a case. Each variant
//! carries only the field it needs, and produces an
//! [`AmbientTemperatureSource`] for the building thermal model.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::error::{CaseError, TimeSeriesError};
use crate::io::temperature_csv::{TemperatureCsv, TemperatureSample};
use crate::resolution::MINUTES_PER_DAY;

/// Capability shared by every ambient-temperature provider.
pub trait AmbientTemperatureSource {
    /// Ambient temperature (°C) at the given instant.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeSeriesError`] if backing data cannot be read.
    fn temperature_at(&self, at: NaiveDateTime) -> Result<f64, TimeSeriesError>;

    /// One value per interval for a day split into `intervals_per_day` equal parts.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeSeriesError`] if backing data cannot be read.
    fn daily_profile(&self, intervals_per_day: usize) -> Result<Vec<f64>, TimeSeriesError>;
}

/// Which ambient-temperature data a case uses.
#[derive(Debug, Clone, PartialEq)]
pub enum DataStrategy {
    /// UK OPEN cases: one fixed temperature for the whole run.
    Uk {
        ambient_temperature_in_degree_celsius: f64,
    },
    /// Pamplona cases: a preprocessed MeteoNavarra station file.
    MeteoNavarra {
        ambient_temperature_file_path: PathBuf,
    },
}

impl DataStrategy {
    pub const UK: &'static str = "UK";
    pub const METEO_NAVARRA: &'static str = "MeteoNavarra";

    /// Recognized `data_strategy` tags.
    pub const TAGS: &'static [&'static str] = &[Self::UK, Self::METEO_NAVARRA];

    /// Document key holding the parameter of the strategy with this tag.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::UnknownDataStrategy`] for an unrecognized tag.
    pub fn required_field(tag: &str) -> Result<&'static str, CaseError> {
        match tag {
            Self::UK => Ok("ambient_temperature_in_degree_celsius"),
            Self::METEO_NAVARRA => Ok("ambient_temperature_file_path"),
            _ => Err(CaseError::UnknownDataStrategy {
                tag: tag.to_string(),
                available: Self::TAGS,
            }),
        }
    }

    /// Builds the strategy from its tag and the candidate fields of a document.
    ///
    /// The field the tag does not use is ignored; the caller decides whether
    /// to warn about it.
    ///
    /// # Errors
    ///
    /// - [`CaseError::UnknownDataStrategy`] for an unrecognized tag.
    /// - [`CaseError::MissingField`] if the tag's field is absent.
    /// - [`CaseError::RangeViolation`] for a non-finite temperature or empty path.
    pub fn from_fields(
        tag: &str,
        ambient_temperature_in_degree_celsius: Option<f64>,
        ambient_temperature_file_path: Option<&str>,
    ) -> Result<Self, CaseError> {
        let field = Self::required_field(tag)?;
        let missing = || CaseError::MissingField {
            field: field.to_string(),
            context: Some(format!("data_strategy {tag}")),
        };

        match tag {
            Self::UK => {
                let t = ambient_temperature_in_degree_celsius.ok_or_else(missing)?;
                if !t.is_finite() {
                    return Err(CaseError::range(field, t, "must be a finite temperature"));
                }
                Ok(Self::Uk {
                    ambient_temperature_in_degree_celsius: t,
                })
            }
            _ => {
                let path = ambient_temperature_file_path.ok_or_else(missing)?;
                Ok(Self::MeteoNavarra {
                    ambient_temperature_file_path: crate::config::checked_path(field, path)?,
                })
            }
        }
    }

    /// The `data_strategy` tag of this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Uk { .. } => Self::UK,
            Self::MeteoNavarra { .. } => Self::METEO_NAVARRA,
        }
    }

    /// Builds the ambient-temperature provider for this strategy.
    pub fn source(&self) -> Box<dyn AmbientTemperatureSource> {
        match self {
            Self::Uk {
                ambient_temperature_in_degree_celsius,
            } => Box::new(FixedTemperature::new(*ambient_temperature_in_degree_celsius)),
            Self::MeteoNavarra {
                ambient_temperature_file_path,
            } => Box::new(RegionalTemperature::new(ambient_temperature_file_path)),
        }
    }
}

impl fmt::Display for DataStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uk {
                ambient_temperature_in_degree_celsius,
            } => write!(f, "{} (fixed {ambient_temperature_in_degree_celsius} °C)", self.tag()),
            Self::MeteoNavarra {
                ambient_temperature_file_path,
            } => write!(
                f,
                "{} ({})",
                self.tag(),
                ambient_temperature_file_path.display()
            ),
        }
    }
}

/// Same temperature at every instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTemperature {
    degree_celsius: f64,
}

impl FixedTemperature {
    pub fn new(degree_celsius: f64) -> Self {
        Self { degree_celsius }
    }
}

impl AmbientTemperatureSource for FixedTemperature {
    fn temperature_at(&self, _at: NaiveDateTime) -> Result<f64, TimeSeriesError> {
        Ok(self.degree_celsius)
    }

    fn daily_profile(&self, intervals_per_day: usize) -> Result<Vec<f64>, TimeSeriesError> {
        Ok(vec![self.degree_celsius; intervals_per_day])
    }
}

/// Temperatures read on demand from a regional station file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionalTemperature {
    file: TemperatureCsv,
}

impl RegionalTemperature {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: TemperatureCsv::new(path.as_ref()),
        }
    }

    /// The underlying file handle; call `samples()` on it for the raw sequence.
    pub fn file(&self) -> &TemperatureCsv {
        &self.file
    }

    fn interpolate(samples: &[TemperatureSample], at: NaiveDateTime) -> f64 {
        let after = samples.partition_point(|s| s.timestamp <= at);
        match (after.checked_sub(1).map(|i| &samples[i]), samples.get(after)) {
            (Some(before), Some(next)) => {
                let span = (next.timestamp - before.timestamp).num_milliseconds() as f64;
                if span <= 0.0 {
                    return before.degree_celsius;
                }
                let w = (at - before.timestamp).num_milliseconds() as f64 / span;
                before.degree_celsius + w * (next.degree_celsius - before.degree_celsius)
            }
            (Some(only), None) | (None, Some(only)) => only.degree_celsius,
            (None, None) => f64::NAN,
        }
    }
}

impl AmbientTemperatureSource for RegionalTemperature {
    /// Linear interpolation between neighbouring samples; the first and
    /// last samples are held outside the file's time span.
    fn temperature_at(&self, at: NaiveDateTime) -> Result<f64, TimeSeriesError> {
        let samples = self.file.read_all()?;
        Ok(Self::interpolate(&samples, at))
    }

    /// Samples the day of the file's first record, starting at midnight.
    fn daily_profile(&self, intervals_per_day: usize) -> Result<Vec<f64>, TimeSeriesError> {
        let samples = self.file.read_all()?;
        let midnight = samples[0].timestamp.date().and_time(NaiveTime::default());
        if intervals_per_day == 0 {
            return Ok(Vec::new());
        }
        let step_ms = i64::from(MINUTES_PER_DAY) * 60_000 / intervals_per_day as i64;
        Ok((0..intervals_per_day)
            .map(|i| {
                let at = midnight + Duration::milliseconds(step_ms * i as i64);
                Self::interpolate(&samples, at)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 7, 17)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid timestamp")
    }

    fn station_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(
            b"DateTime,DegreeCelsius\n\
              2022-07-17 00:00:00,20.0\n\
              2022-07-17 06:00:00,14.0\n\
              2022-07-17 12:00:00,26.0\n\
              2022-07-17 18:00:00,32.0\n",
        )
        .expect("write");
        file
    }

    #[test]
    fn unknown_tag_rejected() {
        let err = DataStrategy::from_fields("Atlantis", Some(10.0), None).expect_err("must fail");
        assert!(matches!(err, CaseError::UnknownDataStrategy { .. }));
        assert!(err.to_string().contains("UK, MeteoNavarra"));
    }

    #[test]
    fn meteo_navarra_requires_file_path() {
        let err = DataStrategy::from_fields(DataStrategy::METEO_NAVARRA, Some(10.0), None)
            .expect_err("must fail");
        assert!(matches!(err, CaseError::MissingField { .. }));
        assert_eq!(err.field(), Some("ambient_temperature_file_path"));
    }

    #[test]
    fn uk_requires_scalar() {
        let err = DataStrategy::from_fields(DataStrategy::UK, None, Some("t.csv"))
            .expect_err("must fail");
        assert_eq!(err.field(), Some("ambient_temperature_in_degree_celsius"));
    }

    #[test]
    fn uk_ignores_file_path() {
        let s = DataStrategy::from_fields(DataStrategy::UK, Some(22.0), Some("t.csv"))
            .expect("valid");
        assert_eq!(
            s,
            DataStrategy::Uk {
                ambient_temperature_in_degree_celsius: 22.0
            }
        );
        assert_eq!(s.tag(), "UK");
    }

    #[test]
    fn fixed_profile_is_constant() {
        let source = FixedTemperature::new(20.0);
        let profile = source.daily_profile(96).expect("fixed never fails");
        assert_eq!(profile.len(), 96);
        assert!(profile.iter().all(|&t| t == 20.0));
        assert_eq!(source.temperature_at(at(13, 0)).ok(), Some(20.0));
    }

    #[test]
    fn regional_interpolates_between_samples() {
        let file = station_file();
        let source = RegionalTemperature::new(file.path());
        let t = source.temperature_at(at(3, 0)).expect("readable");
        assert!((t - 17.0).abs() < 1e-9);
        let t = source.temperature_at(at(12, 0)).expect("readable");
        assert!((t - 26.0).abs() < 1e-9);
    }

    #[test]
    fn regional_holds_end_values() {
        let file = station_file();
        let source = RegionalTemperature::new(file.path());
        let late = source.temperature_at(at(23, 0)).expect("readable");
        assert_eq!(late, 32.0);
    }

    #[test]
    fn regional_profile_spans_the_day() {
        let file = station_file();
        let strategy = DataStrategy::MeteoNavarra {
            ambient_temperature_file_path: file.path().to_path_buf(),
        };
        let profile = strategy.source().daily_profile(4).expect("readable");
        assert_eq!(profile, vec![20.0, 14.0, 26.0, 32.0]);
    }

    #[test]
    fn regional_reports_missing_file() {
        let source = RegionalTemperature::new("missing/ambient.csv");
        assert!(matches!(
            source.daily_profile(96),
            Err(TimeSeriesError::Open { .. })
        ));
    }
}
