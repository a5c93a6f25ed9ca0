mod common;

use std::fs;

use open_case::config::CaseConfig;
use open_case::document::CaseFormat;
use open_case::io::temperature_csv::TemperatureCsv;

use common::{open_case, preset_doc, stdout, write_case};

#[test]
fn validate_accepts_shipped_cases() {
    let output = open_case(&[
        "validate",
        "cases/uk_winter.yaml",
        "cases/uk_winter.toml",
        "cases/pamplona_meteo_navarra.yaml",
    ]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout(&output).matches(": ok").count(), 3);
}

#[test]
fn validate_lists_every_violation_and_fails() {
    let mut doc = preset_doc("uk_winter");
    doc.is_winter = None;
    doc.max_export_kilowatts = Some(100.0);
    let file = write_case(&doc, CaseFormat::Yaml);
    let path = file.path().to_str().expect("utf-8 temp path");

    let output = open_case(&["validate", path]);
    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("is_winter"), "{text}");
    assert!(text.contains("max_export_kilowatts"), "{text}");
}

#[test]
fn show_preset_prints_report_and_warnings() {
    let output = open_case(&["show", "--preset", "pamplona_meteo_navarra"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Market:                Spanish"));
    assert!(text.contains("--- Warnings ---"));
    assert!(text.contains("offered_kilowatts_in_frequency_response is 0"));
}

#[test]
fn show_unknown_preset_fails() {
    let output = open_case(&["show", "--preset", "atlantis"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown preset"));
}

#[test]
fn normalize_yaml_to_toml_reloads_equal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("uk_winter.toml");
    let output = open_case(&[
        "normalize",
        "cases/uk_winter.yaml",
        "--output",
        out.to_str().expect("utf-8 temp path"),
    ]);
    assert!(output.status.success());

    let written = fs::read_to_string(&out).expect("output written");
    let back = CaseConfig::from_toml_str(&written).expect("normalized TOML loads");
    assert_eq!(back, CaseConfig::from_preset("uk_winter").expect("preset"));
}

#[test]
fn ambient_uk_profile_is_flat() {
    let output = open_case(&["ambient", "--preset", "uk_winter"]);
    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 96);
    assert!(lines.iter().all(|l| l.ends_with("5.00 °C")));
}

#[test]
fn ambient_pamplona_writes_csv() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("profile.csv");
    let output = open_case(&[
        "ambient",
        "--preset",
        "pamplona_meteo_navarra",
        "--output",
        out.to_str().expect("utf-8 temp path"),
    ]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let samples = TemperatureCsv::new(&out).read_all().expect("profile readable");
    assert_eq!(samples.len(), 96);
    assert_eq!(samples[0].degree_celsius, 20.1);
    assert_eq!(samples[0].timestamp.to_string(), "2022-07-17 00:00:00");
}

#[test]
fn fleet_is_reproducible_for_a_seed() {
    let a = open_case(&["fleet", "--preset", "uk_winter", "--seed", "7"]);
    let b = open_case(&["fleet", "--preset", "uk_winter", "--seed", "7"]);
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
    // header + 120 vehicles
    assert_eq!(stdout(&a).lines().count(), 121);
}

#[test]
fn preprocess_temperature_shifts_and_names_output() {
    let dir = tempfile::tempdir().expect("temp dir");
    let raw = dir.path().join("202210_ambient_temperature.csv");
    fs::write(
        &raw,
        "DateTime,DegreeCelsius\n\
         2022-10-14 21:50:00,14.2\n\
         2022-10-14 22:00:00,14.0\n\
         2022-10-15 21:50:00,15.1\n\
         2022-10-15 22:00:00,15.0\n",
    )
    .expect("write raw file");

    let output = open_case(&[
        "preprocess-temperature",
        "--input",
        raw.to_str().expect("utf-8 temp path"),
        "--schedule",
        "summer",
        "--start",
        "2022-10-15",
        "--end",
        "2022-10-16",
        "--output-dir",
        dir.path().to_str().expect("utf-8 temp path"),
    ]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let written = dir.path().join("20221015_ambient_temperature_upna.csv");
    let samples = TemperatureCsv::new(&written).read_all().expect("output readable");
    let temps: Vec<f64> = samples.iter().map(|s| s.degree_celsius).collect();
    assert_eq!(temps, vec![14.0, 15.1]);
    assert_eq!(samples[0].timestamp.to_string(), "2022-10-15 00:00:00");
}

#[test]
fn preprocess_temperature_fails_on_empty_window() {
    let dir = tempfile::tempdir().expect("temp dir");
    let raw = dir.path().join("raw.csv");
    fs::write(&raw, "DateTime,DegreeCelsius\n2022-01-01 00:00:00,3.0\n").expect("write");

    let output = open_case(&[
        "preprocess-temperature",
        "--input",
        raw.to_str().expect("utf-8 temp path"),
        "--schedule",
        "winter",
        "--start",
        "2022-10-15",
        "--end",
        "2022-10-16",
        "--output-dir",
        dir.path().to_str().expect("utf-8 temp path"),
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no samples"));
}
