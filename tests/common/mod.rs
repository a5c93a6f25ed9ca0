//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Output};

use open_case::config::CaseConfig;
use open_case::document::{CaseDocument, CaseFormat};

/// Parsed document of a built-in case, ready to be mutated.
pub fn preset_doc(name: &str) -> CaseDocument {
    let yaml = CaseConfig::preset_yaml(name).expect("preset should exist");
    CaseDocument::from_yaml_str(yaml).expect("preset should parse")
}

/// Writes a document to a temp file with the extension of `format`.
pub fn write_case(doc: &CaseDocument, format: CaseFormat) -> tempfile::NamedTempFile {
    let suffix = match format {
        CaseFormat::Yaml => ".yaml",
        CaseFormat::Toml => ".toml",
    };
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    let text = doc.to_string_as(format).expect("document should serialize");
    file.write_all(text.as_bytes()).expect("write case");
    file
}

/// Runs the `open-case` binary from the package root.
pub fn open_case(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_open-case"))
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("open-case process should run")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout should be valid UTF-8")
}
