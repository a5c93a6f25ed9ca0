//! `open-case` entry point: loads cases and runs the inspection tools.

mod cli;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{CaseSource, Cli, Command};
use open_case::config::{CaseConfig, CaseWarning};
use open_case::document::{CaseDocument, CaseFormat};
use open_case::io::export::{export_temperature_csv, profile_samples};
use open_case::io::preprocess::{SolarTimeSchedule, preprocessed_file_name, shift_to_civil_time};
use open_case::io::temperature_csv::TemperatureCsv;
use open_case::report::CaseReport;
use open_case::strategy::DataStrategy;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Validate { paths } => Ok(validate(&paths)),
        Command::Show(source) => {
            let (config, warnings) = load(&source)?;
            println!("{}", CaseReport::new(&config));
            if !warnings.is_empty() {
                println!("\n--- Warnings ---");
                for w in &warnings {
                    println!("{w}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Normalize {
            path,
            output,
            format,
        } => {
            let config = CaseConfig::from_path(&path)?;
            let format = format.map(CaseFormat::from).unwrap_or_else(|| {
                output
                    .as_deref()
                    .map_or(CaseFormat::Yaml, CaseFormat::from_path)
            });
            let text = config.to_string_as(format)?;
            match output {
                Some(out) => fs::write(&out, text)
                    .with_context(|| format!("failed to write {}", out.display()))?,
                None => print!("{text}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Ambient {
            source,
            date,
            output,
        } => {
            let (config, _) = load(&source)?;
            ambient(&config, date, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Fleet { source, seed } => {
            let (config, _) = load(&source)?;
            let plans = config
                .electric_vehicles()
                .sample(&config.resolution(), seed);
            let mut out = io::stdout().lock();
            writeln!(out, "vehicle,arrival_hour,departure_hour,initial_energy_kwh")?;
            for (i, p) in plans.iter().enumerate() {
                writeln!(
                    out,
                    "{i},{:.2},{:.2},{:.3}",
                    p.arrival_hour, p.departure_hour, p.initial_energy_in_kilowatt_hour
                )?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::PreprocessTemperature {
            input,
            schedule,
            start,
            end,
            output_dir,
        } => {
            preprocess(&input, schedule, start, end, &output_dir)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load(source: &CaseSource) -> Result<(CaseConfig, Vec<CaseWarning>)> {
    let doc = match (&source.path, &source.preset) {
        (Some(path), _) => CaseDocument::from_path(path)?,
        (None, Some(name)) => CaseDocument::from_yaml_str(CaseConfig::preset_yaml(name)?)?,
        (None, None) => bail!("a case file or --preset is required"),
    };
    Ok(CaseConfig::load_with_warnings(&doc)?)
}

/// Prints every violation of every file; fails if any file is invalid.
fn validate(paths: &[PathBuf]) -> ExitCode {
    let mut failed = 0usize;
    for path in paths {
        let errors = match CaseDocument::from_path(path) {
            Ok(doc) => CaseConfig::check(&doc),
            Err(e) => vec![e],
        };
        if errors.is_empty() {
            println!("{}: ok", path.display());
        } else {
            failed += 1;
            for e in &errors {
                println!("{}: {e}", path.display());
            }
        }
    }
    info!(files = paths.len(), failed, "validation finished");
    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn ambient(config: &CaseConfig, date: Option<NaiveDate>, output: Option<&Path>) -> Result<()> {
    let resolution = config.resolution();
    let profile = config
        .data_strategy()
        .source()
        .daily_profile(resolution.ems_intervals_per_day())?;

    let day = match (date, config.data_strategy()) {
        (Some(day), _) => day,
        (
            None,
            DataStrategy::MeteoNavarra {
                ambient_temperature_file_path,
            },
        ) => TemperatureCsv::new(ambient_temperature_file_path)
            .read_all()?
            .first()
            .map(|s| s.timestamp.date())
            .unwrap_or_default(),
        (None, DataStrategy::Uk { .. }) => NaiveDate::default(),
    };
    let samples = profile_samples(
        day.and_time(NaiveTime::default()),
        resolution.energy_management_system_minutes(),
        &profile,
    );

    match output {
        Some(path) => {
            export_temperature_csv(&samples, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), intervals = samples.len(), "ambient profile written");
        }
        None => {
            let mut out = io::stdout().lock();
            for s in &samples {
                writeln!(out, "{}  {:>6.2} °C", s.timestamp.format("%H:%M"), s.degree_celsius)?;
            }
        }
    }
    Ok(())
}

fn preprocess(
    input: &Path,
    schedule: SolarTimeSchedule,
    start: NaiveDate,
    end: NaiveDate,
    output_dir: &Path,
) -> Result<()> {
    if start >= end {
        bail!("--start ({start}) must be before --end ({end})");
    }
    let raw = TemperatureCsv::new(input).read_all()?;
    let shifted = shift_to_civil_time(raw, schedule, start, end)?;
    let path = output_dir.join(preprocessed_file_name(start));
    export_temperature_csv(&shifted, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "preprocessed ambient temperature saved");
    println!("{}", path.display());
    Ok(())
}
