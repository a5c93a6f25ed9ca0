//! Case configuration loader for the OPEN energy-system simulator.
//!
//! A case is a flat YAML (or TOML) document describing one simulated day of a
//! building with PV, an EV car park, an HVAC-heated thermal mass, an optional
//! battery and a tariff. [`config::CaseConfig`] validates it into an immutable
//! record the simulator is initialized from.

pub mod config;
pub mod document;
pub mod error;
pub mod fleet;
/// Ambient-temperature CSV reading, writing and preprocessing.
pub mod io;
pub mod report;
pub mod resolution;
pub mod strategy;
pub mod tariff;
