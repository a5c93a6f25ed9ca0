//! Error taxonomy for case loading and ambient-temperature time series.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a case document is rejected.
///
/// Every variant names the offending key so the operator can fix the
/// document without re-reading the loader.
#[derive(Debug, Error)]
pub enum CaseError {
    /// The case file could not be read.
    #[error("cannot read case \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not well-formed YAML/TOML or contains unknown keys.
    #[error("malformed case document: {message}")]
    Parse { message: String },

    /// A field required by the selected data strategy (or always required) is absent.
    #[error("missing field `{field}`{}", context_suffix(.context))]
    MissingField {
        field: String,
        context: Option<String>,
    },

    /// A value lies outside its declared bound.
    #[error("field `{field}` = {value} violates bound: {bound}")]
    RangeViolation {
        field: String,
        value: String,
        bound: String,
    },

    /// Import periods claim more than a day, or more than one open-ended period.
    #[error(
        "import periods cover {explicit_hours} h with {open_ended} open-ended period(s); \
         at most 24 h and one open-ended period are allowed"
    )]
    ScheduleOverlap { explicit_hours: f64, open_ended: usize },

    /// The `data_strategy` selector is not a known provider.
    #[error("unknown data strategy \"{tag}\", available: {}", .available.join(", "))]
    UnknownDataStrategy {
        tag: String,
        available: &'static [&'static str],
    },

    /// The `market` selector is not a known market.
    #[error("unknown market \"{tag}\", available: {}", .available.join(", "))]
    UnknownMarket {
        tag: String,
        available: &'static [&'static str],
    },

    /// Both spellings of the same data-source key are present.
    #[error("fields `{first}` and `{second}` are mutually exclusive; choose one")]
    ConflictingFields { first: String, second: String },

    /// A built-in preset name was not recognized.
    #[error("unknown preset \"{name}\", available: {}", .available.join(", "))]
    UnknownPreset {
        name: String,
        available: &'static [&'static str],
    },
}

fn context_suffix(context: &Option<String>) -> String {
    context
        .as_deref()
        .map(|c| format!(" (required by {c})"))
        .unwrap_or_default()
}

impl CaseError {
    /// Document key the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field, .. } | Self::RangeViolation { field, .. } => Some(field),
            Self::ScheduleOverlap { .. } => Some("import_periods"),
            Self::UnknownDataStrategy { .. } => Some("data_strategy"),
            Self::UnknownMarket { .. } => Some("market"),
            Self::ConflictingFields { first, .. } => Some(first),
            Self::Io { .. } | Self::Parse { .. } | Self::UnknownPreset { .. } => None,
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: None,
        }
    }

    pub(crate) fn range(
        field: impl Into<String>,
        value: impl ToString,
        bound: impl Into<String>,
    ) -> Self {
        Self::RangeViolation {
            field: field.into(),
            value: value.to_string(),
            bound: bound.into(),
        }
    }
}

/// Failures while reading an ambient-temperature file.
#[derive(Debug, Error)]
pub enum TimeSeriesError {
    #[error("cannot open time series \"{}\": {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid record in \"{}\" at line {line}: {message}", .path.display())]
    Record {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("time series \"{}\" contains no samples", .path.display())]
    Empty { path: PathBuf },

    #[error("no samples between {start} and {end}")]
    EmptyWindow { start: String, end: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_mentions_strategy() {
        let err = CaseError::MissingField {
            field: "ambient_temperature_file_path".into(),
            context: Some("data_strategy MeteoNavarra".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("ambient_temperature_file_path"));
        assert!(msg.contains("MeteoNavarra"));
        assert_eq!(err.field(), Some("ambient_temperature_file_path"));
    }

    #[test]
    fn range_violation_reports_value_and_bound() {
        let err = CaseError::range("min_inside_degree_celsius", 30.0, "must be < 25");
        let msg = err.to_string();
        assert!(msg.contains("= 30"));
        assert!(msg.contains("must be < 25"));
    }
}
