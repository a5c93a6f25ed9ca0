//! Ambient-temperature file formats.

pub mod export;
pub mod preprocess;
pub mod temperature_csv;
