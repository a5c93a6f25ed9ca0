//! Flat key/value case document as it appears on disk.
//!
//! Every key is optional at this layer so that absent fields surface as
//! [`CaseError::MissingField`] from the loader rather than as opaque parse
//! errors. Unknown keys are still rejected while parsing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CaseError;

/// One entry of `import_periods`: a single-key mapping `NAME: [hours, price]`.
pub type ImportPeriodEntry = BTreeMap<String, (f64, f64)>;

/// On-disk encoding of a case document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFormat {
    Yaml,
    Toml,
}

impl CaseFormat {
    /// Picks the format from a file extension; anything but `.toml` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Raw case document. Field names are the persisted key names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photovoltaic_generation_data_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photovoltaic_generation_data_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electric_load_data_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electric_load_data_file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_winter: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_time_series_resolution_in_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_management_system_time_series_resolution_in_minutes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_photovoltaic_kilowatts: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_electric_vehicles: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_battery_capacity_in_kilowatt_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_battery_charging_power_in_kilowatts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electric_vehicle_arrival_time_start_in_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electric_vehicle_arrival_time_end_in_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electric_vehicle_departure_time_start_in_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electric_vehicle_departure_time_end_in_hours: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_inside_degree_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_inside_degree_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_inside_degree_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_consumed_electric_heating_kilowatts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_consumed_electric_cooling_kilowatts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heat_pump_coefficient_of_performance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chiller_coefficient_of_performance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_thermal_capacitance_in_kilowatts_hour_per_degree_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_thermal_resistance_in_degree_celsius_per_kilowatts: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_prices_in_euros_per_kilowatt_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_periods: Option<Vec<ImportPeriodEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand_charge_in_euros_per_kilowatt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_import_kilowatts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_export_kilowatts: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offered_kilowatts_in_frequency_response: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_frequency_response_state_of_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_frequency_response_state_of_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_response_price_in_euros_per_kilowatt_hour: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_1_voltage_level_in_kilo_volts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_2_voltage_level_in_kilo_volts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_3_voltage_level_in_kilo_volts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformer_apparent_power_in_mega_volt_ampere: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_from_bus_2_to_bus_3_in_km: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_storage_asset_energy_in_kilowatt_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_storage_asset_energy_in_kilowatt_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_storage_asset_active_power_in_kilowatts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_storage_asset_active_power_in_kilowatts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_storage_asset_energy_level_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_storage_asset_terminal_energy_level_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_asset_absolute_active_power_in_kilowatts: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_asset_degradation_ratio_in_euros_per_kilowatt_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_asset_charging_efficiency_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_asset_charging_efficiency_for_the_optimizer_percentage: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_temperature_in_degree_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient_temperature_file_path: Option<String>,
}

impl CaseDocument {
    /// Parses a YAML case document.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Parse`] if the text is not valid YAML or
    /// contains unknown keys.
    pub fn from_yaml_str(s: &str) -> Result<Self, CaseError> {
        serde_yaml::from_str(s).map_err(|e| CaseError::Parse {
            message: e.to_string(),
        })
    }

    /// Parses a TOML case document.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Parse`] if the text is not valid TOML or
    /// contains unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self, CaseError> {
        toml::from_str(s).map_err(|e| CaseError::Parse {
            message: e.to_string(),
        })
    }

    /// Parses text in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Parse`] on malformed input.
    pub fn from_str_as(s: &str, format: CaseFormat) -> Result<Self, CaseError> {
        match format {
            CaseFormat::Yaml => Self::from_yaml_str(s),
            CaseFormat::Toml => Self::from_toml_str(s),
        }
    }

    /// Reads and parses a case file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Io`] if the file cannot be read, or
    /// [`CaseError::Parse`] on malformed content.
    pub fn from_path(path: &Path) -> Result<Self, CaseError> {
        let content = fs::read_to_string(path).map_err(|source| CaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str_as(&content, CaseFormat::from_path(path))
    }

    /// Serializes the document as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Parse`] if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String, CaseError> {
        serde_yaml::to_string(self).map_err(|e| CaseError::Parse {
            message: e.to_string(),
        })
    }

    /// Serializes the document as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Parse`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, CaseError> {
        toml::to_string(self).map_err(|e| CaseError::Parse {
            message: e.to_string(),
        })
    }

    /// Serializes the document in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Parse`] if serialization fails.
    pub fn to_string_as(&self, format: CaseFormat) -> Result<String, CaseError> {
        match format {
            CaseFormat::Yaml => self.to_yaml_string(),
            CaseFormat::Toml => self.to_toml_string(),
        }
    }
}
