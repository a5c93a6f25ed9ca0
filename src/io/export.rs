//! CSV export for ambient-temperature series.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::{Duration, NaiveDateTime};

use crate::io::temperature_csv::{
    DATE_TIME_COLUMN, DEGREE_CELSIUS_COLUMN, TIMESTAMP_FORMAT, TemperatureSample,
};

/// Writes samples to a CSV file at the given path, replacing any existing file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_temperature_csv(samples: &[TemperatureSample], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_temperature_csv(samples, io::BufWriter::new(file))
}

/// Writes samples as `DateTime,DegreeCelsius` CSV to any writer.
///
/// The output is readable by [`TemperatureCsv`](crate::io::temperature_csv::TemperatureCsv).
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_temperature_csv(samples: &[TemperatureSample], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record([DATE_TIME_COLUMN, DEGREE_CELSIUS_COLUMN])?;
    for s in samples {
        wtr.write_record(&[
            s.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            s.degree_celsius.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Lays a per-interval profile out as samples spaced `minutes_per_interval` apart.
pub fn profile_samples(
    start: NaiveDateTime,
    minutes_per_interval: u32,
    values: &[f64],
) -> Vec<TemperatureSample> {
    let step = Duration::minutes(i64::from(minutes_per_interval));
    values
        .iter()
        .zip(0i32..)
        .map(|(&degree_celsius, i)| TemperatureSample {
            timestamp: start + step * i,
            degree_celsius,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::io::temperature_csv::TemperatureCsv;

    fn midnight() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 7, 17)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn header_and_timestamp_layout() {
        let samples = profile_samples(midnight(), 15, &[20.1, 19.5]);
        let mut buf = Vec::new();
        write_temperature_csv(&samples, &mut buf).expect("in-memory write");
        let output = String::from_utf8(buf).expect("utf-8");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "DateTime,DegreeCelsius",
                "2022-07-17 00:00:00,20.1",
                "2022-07-17 00:15:00,19.5"
            ]
        );
    }

    #[test]
    fn profile_spacing_follows_interval() {
        let samples = profile_samples(midnight(), 60, &[1.0; 24]);
        assert_eq!(samples.len(), 24);
        assert_eq!(samples[23].timestamp - samples[0].timestamp, Duration::hours(23));
    }

    #[test]
    fn exported_file_reads_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("profile.csv");
        let samples = profile_samples(midnight(), 10, &[20.1, 20.3, 19.8]);
        export_temperature_csv(&samples, &path).expect("export");

        let back = TemperatureCsv::new(&path).read_all().expect("read back");
        assert_eq!(back, samples);
    }
}
