//! Validated case configuration and its loader.
//!
//! A [`CaseConfig`] is built once from a [`CaseDocument`] by
//! [`CaseConfig::load`], which checks every invariant up front and fails on
//! the first violation. The result is read-only: fields are reachable only
//! through accessors. Use [`CaseConfig::check`] to list every violation of a
//! document at once, or [`CaseConfig::from_preset`] for the built-in cases.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::document::{CaseDocument, CaseFormat};
use crate::error::CaseError;
use crate::fleet::ElectricVehicleFleet;
use crate::resolution::Resolution;
use crate::strategy::DataStrategy;
use crate::tariff::ImportSchedule;

const UK_WINTER_YAML: &str = include_str!("../cases/uk_winter.yaml");
const PAMPLONA_METEO_NAVARRA_YAML: &str = include_str!("../cases/pamplona_meteo_navarra.yaml");

/// Upstream market the case is priced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Market {
    /// Original OPEN (UK) pricing; import periods may leave hours unpriced.
    #[default]
    Open,
    /// Spanish 6.1TD tariff; import periods must price every hour.
    Spanish,
}

impl Market {
    pub const TAGS: &'static [&'static str] = &["OPEN", "Spanish"];

    /// Parses the `market` selector.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::UnknownMarket`] for an unrecognized tag.
    pub fn from_tag(tag: &str) -> Result<Self, CaseError> {
        match tag {
            "OPEN" => Ok(Self::Open),
            "Spanish" => Ok(Self::Spanish),
            _ => Err(CaseError::UnknownMarket {
                tag: tag.to_string(),
                available: Self::TAGS,
            }),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Spanish => "Spanish",
        }
    }
}

/// A data file named either relative to `data_path` or by its own path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataFile {
    /// Bare file name under `data_path` (UK-style `*_data_file` keys).
    InDataPath(PathBuf),
    /// Full path (Spanish-style `*_data_file_path` keys).
    Path(PathBuf),
}

impl DataFile {
    fn resolve(&self, data_path: Option<&Path>) -> PathBuf {
        match (self, data_path) {
            (Self::InDataPath(name), Some(dir)) => dir.join(name),
            (Self::InDataPath(p) | Self::Path(p), _) => p.clone(),
        }
    }
}

/// Where the external simulator finds its input time series.
///
/// Paths are only checked for well-formedness; the files are never opened here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub data_path: Option<PathBuf>,
    pub photovoltaic_generation: DataFile,
    pub electric_load: DataFile,
    /// Month used to pick a representative day from yearly load files.
    pub month: Option<u32>,
}

impl DataSources {
    pub fn photovoltaic_generation_path(&self) -> PathBuf {
        self.photovoltaic_generation
            .resolve(self.data_path.as_deref())
    }

    pub fn electric_load_path(&self) -> PathBuf {
        self.electric_load.resolve(self.data_path.as_deref())
    }

    fn from_document(doc: &CaseDocument) -> Result<Self, CaseError> {
        let data_path = doc
            .data_path
            .as_deref()
            .map(|p| checked_path("data_path", p))
            .transpose()?;
        let photovoltaic_generation = data_file(
            "photovoltaic_generation_data_file",
            doc.photovoltaic_generation_data_file.as_deref(),
            "photovoltaic_generation_data_file_path",
            doc.photovoltaic_generation_data_file_path.as_deref(),
        )?;
        let electric_load = data_file(
            "electric_load_data_file",
            doc.electric_load_data_file.as_deref(),
            "electric_load_data_file_path",
            doc.electric_load_data_file_path.as_deref(),
        )?;
        let month = doc
            .month
            .map(|raw| match u32::try_from(raw) {
                Ok(month @ 1..=12) => Ok(month),
                _ => Err(CaseError::range("month", raw, "must be in [1, 12]")),
            })
            .transpose()?;
        Ok(Self {
            data_path,
            photovoltaic_generation,
            electric_load,
            month,
        })
    }

    fn write_document(&self, doc: &mut CaseDocument) {
        doc.data_path = self.data_path.as_ref().map(|p| path_string(p));
        match &self.photovoltaic_generation {
            DataFile::InDataPath(p) => doc.photovoltaic_generation_data_file = Some(path_string(p)),
            DataFile::Path(p) => doc.photovoltaic_generation_data_file_path = Some(path_string(p)),
        }
        match &self.electric_load {
            DataFile::InDataPath(p) => doc.electric_load_data_file = Some(path_string(p)),
            DataFile::Path(p) => doc.electric_load_data_file_path = Some(path_string(p)),
        }
        doc.month = self.month.map(i64::from);
    }
}

/// Photovoltaic plant parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotovoltaicConfig {
    pub rated_kilowatts: f64,
}

/// First-order RC thermal model parameters of the building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingThermal {
    pub max_inside_degree_celsius: f64,
    pub min_inside_degree_celsius: f64,
    pub initial_inside_degree_celsius: f64,
    pub max_consumed_electric_heating_kilowatts: f64,
    pub max_consumed_electric_cooling_kilowatts: f64,
    pub heat_pump_coefficient_of_performance: f64,
    pub chiller_coefficient_of_performance: f64,
    pub thermal_capacitance_in_kilowatts_hour_per_degree_celsius: f64,
    pub thermal_resistance_in_degree_celsius_per_kilowatts: f64,
}

impl BuildingThermal {
    fn from_document(doc: &CaseDocument) -> Result<Self, CaseError> {
        let max = finite(
            "max_inside_degree_celsius",
            require(doc.max_inside_degree_celsius, "max_inside_degree_celsius")?,
        )?;
        let min = finite(
            "min_inside_degree_celsius",
            require(doc.min_inside_degree_celsius, "min_inside_degree_celsius")?,
        )?;
        let initial = finite(
            "initial_inside_degree_celsius",
            require(
                doc.initial_inside_degree_celsius,
                "initial_inside_degree_celsius",
            )?,
        )?;
        if min >= max {
            return Err(CaseError::range(
                "min_inside_degree_celsius",
                min,
                format!("must be < max_inside_degree_celsius ({max})"),
            ));
        }
        if !(min..=max).contains(&initial) {
            return Err(CaseError::range(
                "initial_inside_degree_celsius",
                initial,
                format!("must be in [{min}, {max}] (min/max_inside_degree_celsius)"),
            ));
        }

        Ok(Self {
            max_inside_degree_celsius: max,
            min_inside_degree_celsius: min,
            initial_inside_degree_celsius: initial,
            max_consumed_electric_heating_kilowatts: required_positive(
                doc.max_consumed_electric_heating_kilowatts,
                "max_consumed_electric_heating_kilowatts",
            )?,
            max_consumed_electric_cooling_kilowatts: required_positive(
                doc.max_consumed_electric_cooling_kilowatts,
                "max_consumed_electric_cooling_kilowatts",
            )?,
            heat_pump_coefficient_of_performance: required_positive(
                doc.heat_pump_coefficient_of_performance,
                "heat_pump_coefficient_of_performance",
            )?,
            chiller_coefficient_of_performance: required_positive(
                doc.chiller_coefficient_of_performance,
                "chiller_coefficient_of_performance",
            )?,
            thermal_capacitance_in_kilowatts_hour_per_degree_celsius: required_positive(
                doc.building_thermal_capacitance_in_kilowatts_hour_per_degree_celsius,
                "building_thermal_capacitance_in_kilowatts_hour_per_degree_celsius",
            )?,
            thermal_resistance_in_degree_celsius_per_kilowatts: required_positive(
                doc.building_thermal_resistance_in_degree_celsius_per_kilowatts,
                "building_thermal_resistance_in_degree_celsius_per_kilowatts",
            )?,
        })
    }

    fn write_document(&self, doc: &mut CaseDocument) {
        doc.max_inside_degree_celsius = Some(self.max_inside_degree_celsius);
        doc.min_inside_degree_celsius = Some(self.min_inside_degree_celsius);
        doc.initial_inside_degree_celsius = Some(self.initial_inside_degree_celsius);
        doc.max_consumed_electric_heating_kilowatts =
            Some(self.max_consumed_electric_heating_kilowatts);
        doc.max_consumed_electric_cooling_kilowatts =
            Some(self.max_consumed_electric_cooling_kilowatts);
        doc.heat_pump_coefficient_of_performance = Some(self.heat_pump_coefficient_of_performance);
        doc.chiller_coefficient_of_performance = Some(self.chiller_coefficient_of_performance);
        doc.building_thermal_capacitance_in_kilowatts_hour_per_degree_celsius =
            Some(self.thermal_capacitance_in_kilowatts_hour_per_degree_celsius);
        doc.building_thermal_resistance_in_degree_celsius_per_kilowatts =
            Some(self.thermal_resistance_in_degree_celsius_per_kilowatts);
    }
}

/// Import/export prices and connection limits.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffConfig {
    pub export_price_in_euros_per_kilowatt_hour: f64,
    pub import_schedule: ImportSchedule,
    /// Charged on the peak import of the simulated day. Whether the source
    /// figure is a daily or an annual rate differs between cases.
    pub demand_charge_in_euros_per_kilowatt: f64,
    pub max_import_kilowatts: f64,
    /// Export bound, negative (export is negative import).
    pub max_export_kilowatts: f64,
}

impl TariffConfig {
    /// Constant export price per market interval.
    pub fn export_prices_per_interval(&self, intervals_per_day: usize) -> Vec<f64> {
        vec![self.export_price_in_euros_per_kilowatt_hour; intervals_per_day]
    }

    fn from_document(doc: &CaseDocument, market: Market) -> Result<Self, CaseError> {
        let export_price = required_non_negative(
            doc.export_prices_in_euros_per_kilowatt_hour,
            "export_prices_in_euros_per_kilowatt_hour",
        )?;
        let entries = doc
            .import_periods
            .as_deref()
            .ok_or_else(|| CaseError::missing("import_periods"))?;
        let import_schedule = ImportSchedule::from_entries(entries)?;
        if market == Market::Spanish && !import_schedule.covers_whole_day() {
            return Err(CaseError::range(
                "import_periods",
                format!("{} h", import_schedule.explicit_hours()),
                "market Spanish requires periods covering 24 h, or one open-ended period",
            ));
        }
        let demand_charge = required_non_negative(
            doc.demand_charge_in_euros_per_kilowatt,
            "demand_charge_in_euros_per_kilowatt",
        )?;
        let max_import = required_positive(doc.max_import_kilowatts, "max_import_kilowatts")?;
        let max_export = finite(
            "max_export_kilowatts",
            require(doc.max_export_kilowatts, "max_export_kilowatts")?,
        )?;
        if max_export > 0.0 {
            return Err(CaseError::range(
                "max_export_kilowatts",
                max_export,
                "must be <= 0 (export is expressed as a negative bound)",
            ));
        }

        Ok(Self {
            export_price_in_euros_per_kilowatt_hour: export_price,
            import_schedule,
            demand_charge_in_euros_per_kilowatt: demand_charge,
            max_import_kilowatts: max_import,
            max_export_kilowatts: max_export,
        })
    }

    fn write_document(&self, doc: &mut CaseDocument) {
        doc.export_prices_in_euros_per_kilowatt_hour =
            Some(self.export_price_in_euros_per_kilowatt_hour);
        doc.import_periods = Some(self.import_schedule.to_entries());
        doc.demand_charge_in_euros_per_kilowatt = Some(self.demand_charge_in_euros_per_kilowatt);
        doc.max_import_kilowatts = Some(self.max_import_kilowatts);
        doc.max_export_kilowatts = Some(self.max_export_kilowatts);
    }
}

/// Frequency-response flexibility offer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyResponse {
    pub offered_kilowatts: f64,
    pub max_state_of_charge: f64,
    pub min_state_of_charge: f64,
    pub price_in_euros_per_kilowatt_hour: f64,
}

impl FrequencyResponse {
    /// The service is only provided when some power is offered.
    pub fn is_active(&self) -> bool {
        self.offered_kilowatts > 0.0
    }

    fn from_document(doc: &CaseDocument) -> Result<Self, CaseError> {
        let offered = required_non_negative(
            doc.offered_kilowatts_in_frequency_response,
            "offered_kilowatts_in_frequency_response",
        )?;
        let max_soc = unit_fraction(
            "max_frequency_response_state_of_charge",
            require(
                doc.max_frequency_response_state_of_charge,
                "max_frequency_response_state_of_charge",
            )?,
        )?;
        let min_soc = unit_fraction(
            "min_frequency_response_state_of_charge",
            require(
                doc.min_frequency_response_state_of_charge,
                "min_frequency_response_state_of_charge",
            )?,
        )?;
        if min_soc >= max_soc {
            return Err(CaseError::range(
                "min_frequency_response_state_of_charge",
                min_soc,
                format!("must be < max_frequency_response_state_of_charge ({max_soc})"),
            ));
        }
        let price = required_non_negative(
            doc.frequency_response_price_in_euros_per_kilowatt_hour,
            "frequency_response_price_in_euros_per_kilowatt_hour",
        )?;

        Ok(Self {
            offered_kilowatts: offered,
            max_state_of_charge: max_soc,
            min_state_of_charge: min_soc,
            price_in_euros_per_kilowatt_hour: price,
        })
    }

    fn write_document(&self, doc: &mut CaseDocument) {
        doc.offered_kilowatts_in_frequency_response = Some(self.offered_kilowatts);
        doc.max_frequency_response_state_of_charge = Some(self.max_state_of_charge);
        doc.min_frequency_response_state_of_charge = Some(self.min_state_of_charge);
        doc.frequency_response_price_in_euros_per_kilowatt_hour =
            Some(self.price_in_euros_per_kilowatt_hour);
    }
}

/// Two-transformer radial feeder: grid 1 → transformer → bus 2 → line → bus 3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub grid_1_voltage_level_in_kilo_volts: f64,
    pub grid_2_voltage_level_in_kilo_volts: f64,
    pub grid_3_voltage_level_in_kilo_volts: f64,
    pub transformer_apparent_power_in_mega_volt_ampere: f64,
    pub length_from_bus_2_to_bus_3_in_km: f64,
}

impl GridConfig {
    /// Standard transformer type name, e.g. `0.4 MVA 20/0.4 kV`.
    pub fn transformer_std_type(&self) -> String {
        format!(
            "{} MVA {}/{} kV",
            self.transformer_apparent_power_in_mega_volt_ampere,
            self.grid_1_voltage_level_in_kilo_volts,
            self.grid_2_voltage_level_in_kilo_volts
        )
    }

    fn from_document(doc: &CaseDocument) -> Result<Self, CaseError> {
        let v1 = required_positive(
            doc.grid_1_voltage_level_in_kilo_volts,
            "grid_1_voltage_level_in_kilo_volts",
        )?;
        let v2 = required_positive(
            doc.grid_2_voltage_level_in_kilo_volts,
            "grid_2_voltage_level_in_kilo_volts",
        )?;
        let v3 = required_positive(
            doc.grid_3_voltage_level_in_kilo_volts,
            "grid_3_voltage_level_in_kilo_volts",
        )?;
        if v2 > v1 {
            return Err(CaseError::range(
                "grid_2_voltage_level_in_kilo_volts",
                v2,
                format!("must be <= grid_1_voltage_level_in_kilo_volts ({v1})"),
            ));
        }
        if v3 > v2 {
            return Err(CaseError::range(
                "grid_3_voltage_level_in_kilo_volts",
                v3,
                format!("must be <= grid_2_voltage_level_in_kilo_volts ({v2})"),
            ));
        }

        Ok(Self {
            grid_1_voltage_level_in_kilo_volts: v1,
            grid_2_voltage_level_in_kilo_volts: v2,
            grid_3_voltage_level_in_kilo_volts: v3,
            transformer_apparent_power_in_mega_volt_ampere: required_positive(
                doc.transformer_apparent_power_in_mega_volt_ampere,
                "transformer_apparent_power_in_mega_volt_ampere",
            )?,
            length_from_bus_2_to_bus_3_in_km: required_non_negative(
                doc.length_from_bus_2_to_bus_3_in_km,
                "length_from_bus_2_to_bus_3_in_km",
            )?,
        })
    }

    fn write_document(&self, doc: &mut CaseDocument) {
        doc.grid_1_voltage_level_in_kilo_volts = Some(self.grid_1_voltage_level_in_kilo_volts);
        doc.grid_2_voltage_level_in_kilo_volts = Some(self.grid_2_voltage_level_in_kilo_volts);
        doc.grid_3_voltage_level_in_kilo_volts = Some(self.grid_3_voltage_level_in_kilo_volts);
        doc.transformer_apparent_power_in_mega_volt_ampere =
            Some(self.transformer_apparent_power_in_mega_volt_ampere);
        doc.length_from_bus_2_to_bus_3_in_km = Some(self.length_from_bus_2_to_bus_3_in_km);
    }
}

/// Stationary battery at bus 3. Optional; when any key is given, all are required.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageAsset {
    pub max_energy_in_kilowatt_hour: f64,
    pub min_energy_in_kilowatt_hour: f64,
    pub max_active_power_in_kilowatts: f64,
    pub min_active_power_in_kilowatts: f64,
    pub initial_energy_level_percentage: f64,
    pub required_terminal_energy_level_percentage: f64,
    pub absolute_active_power_in_kilowatts: f64,
    pub degradation_ratio_in_euros_per_kilowatt_hour: f64,
    pub charging_efficiency_percentage: f64,
    pub charging_efficiency_for_the_optimizer_percentage: f64,
}

impl StorageAsset {
    pub fn initial_energy_in_kilowatt_hour(&self) -> f64 {
        self.initial_energy_level_percentage / 100.0 * self.max_energy_in_kilowatt_hour
    }

    pub fn required_terminal_energy_in_kilowatt_hour(&self) -> f64 {
        self.required_terminal_energy_level_percentage / 100.0 * self.max_energy_in_kilowatt_hour
    }

    fn fields(doc: &CaseDocument) -> [(&'static str, Option<f64>); 10] {
        [
            (
                "max_storage_asset_energy_in_kilowatt_hour",
                doc.max_storage_asset_energy_in_kilowatt_hour,
            ),
            (
                "min_storage_asset_energy_in_kilowatt_hour",
                doc.min_storage_asset_energy_in_kilowatt_hour,
            ),
            (
                "max_storage_asset_active_power_in_kilowatts",
                doc.max_storage_asset_active_power_in_kilowatts,
            ),
            (
                "min_storage_asset_active_power_in_kilowatts",
                doc.min_storage_asset_active_power_in_kilowatts,
            ),
            (
                "initial_storage_asset_energy_level_percentage",
                doc.initial_storage_asset_energy_level_percentage,
            ),
            (
                "required_storage_asset_terminal_energy_level_percentage",
                doc.required_storage_asset_terminal_energy_level_percentage,
            ),
            (
                "storage_asset_absolute_active_power_in_kilowatts",
                doc.storage_asset_absolute_active_power_in_kilowatts,
            ),
            (
                "storage_asset_degradation_ratio_in_euros_per_kilowatt_hour",
                doc.storage_asset_degradation_ratio_in_euros_per_kilowatt_hour,
            ),
            (
                "storage_asset_charging_efficiency_percentage",
                doc.storage_asset_charging_efficiency_percentage,
            ),
            (
                "storage_asset_charging_efficiency_for_the_optimizer_percentage",
                doc.storage_asset_charging_efficiency_for_the_optimizer_percentage,
            ),
        ]
    }

    fn from_document(doc: &CaseDocument) -> Result<Option<Self>, CaseError> {
        let fields = Self::fields(doc);
        if fields.iter().all(|(_, v)| v.is_none()) {
            return Ok(None);
        }
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.is_none()) {
            return Err(CaseError::MissingField {
                field: (*name).to_string(),
                context: Some("the storage asset group".to_string()),
            });
        }
        let [
            max_energy,
            min_energy,
            max_power,
            min_power,
            initial_pct,
            terminal_pct,
            absolute_power,
            degradation,
            efficiency,
            optimizer_efficiency,
        ] = fields.map(|(name, v)| (name, v.unwrap_or_default()));

        let max_energy_kwh = positive(max_energy.0, max_energy.1)?;
        let min_energy_kwh = non_negative(min_energy.0, min_energy.1)?;
        if min_energy_kwh > max_energy_kwh {
            return Err(CaseError::range(
                min_energy.0,
                min_energy_kwh,
                format!("must be <= {} ({max_energy_kwh})", max_energy.0),
            ));
        }
        let max_power_kw = finite(max_power.0, max_power.1)?;
        let min_power_kw = finite(min_power.0, min_power.1)?;
        if min_power_kw > max_power_kw {
            return Err(CaseError::range(
                min_power.0,
                min_power_kw,
                format!("must be <= {} ({max_power_kw})", max_power.0),
            ));
        }

        Ok(Some(Self {
            max_energy_in_kilowatt_hour: max_energy_kwh,
            min_energy_in_kilowatt_hour: min_energy_kwh,
            max_active_power_in_kilowatts: max_power_kw,
            min_active_power_in_kilowatts: min_power_kw,
            initial_energy_level_percentage: percentage(initial_pct.0, initial_pct.1)?,
            required_terminal_energy_level_percentage: percentage(terminal_pct.0, terminal_pct.1)?,
            absolute_active_power_in_kilowatts: non_negative(absolute_power.0, absolute_power.1)?,
            degradation_ratio_in_euros_per_kilowatt_hour: non_negative(
                degradation.0,
                degradation.1,
            )?,
            charging_efficiency_percentage: efficiency_percentage(efficiency.0, efficiency.1)?,
            charging_efficiency_for_the_optimizer_percentage: efficiency_percentage(
                optimizer_efficiency.0,
                optimizer_efficiency.1,
            )?,
        }))
    }

    fn write_document(&self, doc: &mut CaseDocument) {
        doc.max_storage_asset_energy_in_kilowatt_hour = Some(self.max_energy_in_kilowatt_hour);
        doc.min_storage_asset_energy_in_kilowatt_hour = Some(self.min_energy_in_kilowatt_hour);
        doc.max_storage_asset_active_power_in_kilowatts = Some(self.max_active_power_in_kilowatts);
        doc.min_storage_asset_active_power_in_kilowatts = Some(self.min_active_power_in_kilowatts);
        doc.initial_storage_asset_energy_level_percentage =
            Some(self.initial_energy_level_percentage);
        doc.required_storage_asset_terminal_energy_level_percentage =
            Some(self.required_terminal_energy_level_percentage);
        doc.storage_asset_absolute_active_power_in_kilowatts =
            Some(self.absolute_active_power_in_kilowatts);
        doc.storage_asset_degradation_ratio_in_euros_per_kilowatt_hour =
            Some(self.degradation_ratio_in_euros_per_kilowatt_hour);
        doc.storage_asset_charging_efficiency_percentage =
            Some(self.charging_efficiency_percentage);
        doc.storage_asset_charging_efficiency_for_the_optimizer_percentage =
            Some(self.charging_efficiency_for_the_optimizer_percentage);
    }
}

/// Non-fatal observations about a loaded case.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseWarning {
    /// UK and Spanish sources disagree on whether the demand charge is daily or annual.
    DemandChargeRatePeriod { euros_per_kilowatt: f64 },
    /// The band is validated and kept, but no power is offered.
    IdleFrequencyResponseBand { min: f64, max: f64 },
    /// A field belonging to a different data strategy was present and ignored.
    IgnoredStrategyField {
        field: &'static str,
        data_strategy: &'static str,
    },
}

impl fmt::Display for CaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DemandChargeRatePeriod { euros_per_kilowatt } => write!(
                f,
                "demand_charge_in_euros_per_kilowatt = {euros_per_kilowatt}: \
                 confirm whether this is a daily or an annual rate"
            ),
            Self::IdleFrequencyResponseBand { min, max } => write!(
                f,
                "frequency response state-of-charge band [{min}, {max}] is kept \
                 but offered_kilowatts_in_frequency_response is 0"
            ),
            Self::IgnoredStrategyField {
                field,
                data_strategy,
            } => write!(f, "`{field}` is ignored with data_strategy {data_strategy}"),
        }
    }
}

/// One fully validated simulation case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseConfig {
    market: Market,
    data_sources: DataSources,
    is_winter: bool,
    resolution: Resolution,
    photovoltaic: PhotovoltaicConfig,
    electric_vehicles: ElectricVehicleFleet,
    building: BuildingThermal,
    tariff: TariffConfig,
    frequency_response: FrequencyResponse,
    grid: GridConfig,
    storage: Option<StorageAsset>,
    data_strategy: DataStrategy,
}

impl CaseConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["uk_winter", "pamplona_meteo_navarra"];

    /// Validates a parsed document into a case, failing on the first violation.
    ///
    /// Warnings are logged at `warn` level and not returned; see
    /// [`CaseConfig::load_with_warnings`].
    ///
    /// # Errors
    ///
    /// Returns the first [`CaseError`] found, checking groups in document order.
    pub fn load(doc: &CaseDocument) -> Result<Self, CaseError> {
        Self::load_with_warnings(doc).map(|(config, _)| config)
    }

    /// Like [`CaseConfig::load`], also returning the warnings.
    ///
    /// # Errors
    ///
    /// Returns the first [`CaseError`] found.
    pub fn load_with_warnings(doc: &CaseDocument) -> Result<(Self, Vec<CaseWarning>), CaseError> {
        let market = doc
            .market
            .as_deref()
            .map(Market::from_tag)
            .transpose()?
            .unwrap_or_default();
        let data_sources = DataSources::from_document(doc)?;
        let is_winter = require(doc.is_winter, "is_winter")?;
        let resolution = Resolution::from_document(doc)?;
        let photovoltaic = PhotovoltaicConfig {
            rated_kilowatts: required_positive(
                doc.rated_photovoltaic_kilowatts,
                "rated_photovoltaic_kilowatts",
            )?,
        };
        let electric_vehicles = ElectricVehicleFleet::from_document(doc)?;
        let building = BuildingThermal::from_document(doc)?;
        let tariff = TariffConfig::from_document(doc, market)?;
        let frequency_response = FrequencyResponse::from_document(doc)?;
        let grid = GridConfig::from_document(doc)?;
        let storage = StorageAsset::from_document(doc)?;
        let tag = require(doc.data_strategy.as_deref(), "data_strategy")?;
        let data_strategy = DataStrategy::from_fields(
            tag,
            doc.ambient_temperature_in_degree_celsius,
            doc.ambient_temperature_file_path.as_deref(),
        )?;

        let config = Self {
            market,
            data_sources,
            is_winter,
            resolution,
            photovoltaic,
            electric_vehicles,
            building,
            tariff,
            frequency_response,
            grid,
            storage,
            data_strategy,
        };

        let mut warnings = config.warnings();
        warnings.extend(ignored_strategy_fields(doc, &config.data_strategy));
        for w in &warnings {
            warn!("{w}");
        }
        debug!(
            data_strategy = config.data_strategy.tag(),
            market = config.market.tag(),
            is_winter,
            "case loaded"
        );
        Ok((config, warnings))
    }

    /// Validates every group of a document and returns all violations.
    ///
    /// Within a group only the first violation is reported. An empty vector
    /// means [`CaseConfig::load`] will succeed.
    pub fn check(doc: &CaseDocument) -> Vec<CaseError> {
        let market = match doc.market.as_deref().map(Market::from_tag).transpose() {
            Ok(m) => m.unwrap_or_default(),
            Err(e) => return vec![e],
        };
        let resolution = || Resolution::from_document(doc);
        let strategy = || {
            let tag = require(doc.data_strategy.as_deref(), "data_strategy")?;
            DataStrategy::from_fields(
                tag,
                doc.ambient_temperature_in_degree_celsius,
                doc.ambient_temperature_file_path.as_deref(),
            )
        };

        [
            DataSources::from_document(doc).err(),
            require(doc.is_winter, "is_winter").err(),
            resolution().err(),
            required_positive(
                doc.rated_photovoltaic_kilowatts,
                "rated_photovoltaic_kilowatts",
            )
            .err(),
            ElectricVehicleFleet::from_document(doc).err(),
            BuildingThermal::from_document(doc).err(),
            TariffConfig::from_document(doc, market).err(),
            FrequencyResponse::from_document(doc).err(),
            GridConfig::from_document(doc).err(),
            StorageAsset::from_document(doc).err(),
            strategy().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Parses and validates a YAML case.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Parse`] or the first validation error.
    pub fn from_yaml_str(s: &str) -> Result<Self, CaseError> {
        Self::load(&CaseDocument::from_yaml_str(s)?)
    }

    /// Parses and validates a TOML case.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Parse`] or the first validation error.
    pub fn from_toml_str(s: &str) -> Result<Self, CaseError> {
        Self::load(&CaseDocument::from_toml_str(s)?)
    }

    /// Reads, parses and validates a case file (`.toml` as TOML, otherwise YAML).
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Io`], [`CaseError::Parse`] or the first validation error.
    pub fn from_path(path: &Path) -> Result<Self, CaseError> {
        Self::load(&CaseDocument::from_path(path)?)
    }

    /// Loads one of the built-in cases.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::UnknownPreset`] if the name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, CaseError> {
        Self::from_yaml_str(Self::preset_yaml(name)?)
    }

    /// Source text of a built-in case.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::UnknownPreset`] if the name is unknown.
    pub fn preset_yaml(name: &str) -> Result<&'static str, CaseError> {
        match name {
            "uk_winter" => Ok(UK_WINTER_YAML),
            "pamplona_meteo_navarra" => Ok(PAMPLONA_METEO_NAVARRA_YAML),
            _ => Err(CaseError::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS,
            }),
        }
    }

    /// Writes the case back into the flat document layout.
    pub fn to_document(&self) -> CaseDocument {
        let mut doc = CaseDocument {
            market: Some(self.market.tag().to_string()),
            is_winter: Some(self.is_winter),
            simulation_time_series_resolution_in_minutes: Some(i64::from(
                self.resolution.simulation_minutes(),
            )),
            energy_management_system_time_series_resolution_in_minutes: Some(i64::from(
                self.resolution.energy_management_system_minutes(),
            )),
            rated_photovoltaic_kilowatts: Some(self.photovoltaic.rated_kilowatts),
            data_strategy: Some(self.data_strategy.tag().to_string()),
            ..CaseDocument::default()
        };
        self.data_sources.write_document(&mut doc);
        self.electric_vehicles.write_document(&mut doc);
        self.building.write_document(&mut doc);
        self.tariff.write_document(&mut doc);
        self.frequency_response.write_document(&mut doc);
        self.grid.write_document(&mut doc);
        if let Some(storage) = &self.storage {
            storage.write_document(&mut doc);
        }
        match &self.data_strategy {
            DataStrategy::Uk {
                ambient_temperature_in_degree_celsius,
            } => {
                doc.ambient_temperature_in_degree_celsius =
                    Some(*ambient_temperature_in_degree_celsius)
            }
            DataStrategy::MeteoNavarra {
                ambient_temperature_file_path,
            } => {
                doc.ambient_temperature_file_path = Some(path_string(ambient_temperature_file_path))
            }
        }
        doc
    }

    /// Serializes the case in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::Parse`] if serialization fails.
    pub fn to_string_as(&self, format: CaseFormat) -> Result<String, CaseError> {
        self.to_document().to_string_as(format)
    }

    /// Warnings derived from the validated values alone.
    pub fn warnings(&self) -> Vec<CaseWarning> {
        let mut warnings = Vec::new();
        if self.tariff.demand_charge_in_euros_per_kilowatt > 0.0 {
            warnings.push(CaseWarning::DemandChargeRatePeriod {
                euros_per_kilowatt: self.tariff.demand_charge_in_euros_per_kilowatt,
            });
        }
        if !self.frequency_response.is_active() {
            warnings.push(CaseWarning::IdleFrequencyResponseBand {
                min: self.frequency_response.min_state_of_charge,
                max: self.frequency_response.max_state_of_charge,
            });
        }
        warnings
    }

    /// One price per EMS interval, laid out from midnight.
    pub fn import_prices_per_ems_interval(&self) -> Vec<f64> {
        self.tariff
            .import_schedule
            .prices_per_interval(self.resolution.ems_intervals_per_day())
    }

    pub fn market(&self) -> Market {
        self.market
    }

    pub fn data_sources(&self) -> &DataSources {
        &self.data_sources
    }

    pub fn is_winter(&self) -> bool {
        self.is_winter
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn photovoltaic(&self) -> &PhotovoltaicConfig {
        &self.photovoltaic
    }

    pub fn electric_vehicles(&self) -> &ElectricVehicleFleet {
        &self.electric_vehicles
    }

    pub fn building(&self) -> &BuildingThermal {
        &self.building
    }

    pub fn tariff(&self) -> &TariffConfig {
        &self.tariff
    }

    pub fn frequency_response(&self) -> &FrequencyResponse {
        &self.frequency_response
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn storage(&self) -> Option<&StorageAsset> {
        self.storage.as_ref()
    }

    pub fn data_strategy(&self) -> &DataStrategy {
        &self.data_strategy
    }
}

fn ignored_strategy_fields(doc: &CaseDocument, strategy: &DataStrategy) -> Vec<CaseWarning> {
    let ignored = match strategy {
        DataStrategy::Uk { .. } => doc
            .ambient_temperature_file_path
            .is_some()
            .then_some("ambient_temperature_file_path"),
        DataStrategy::MeteoNavarra { .. } => doc
            .ambient_temperature_in_degree_celsius
            .is_some()
            .then_some("ambient_temperature_in_degree_celsius"),
    };
    ignored
        .map(|field| CaseWarning::IgnoredStrategyField {
            field,
            data_strategy: strategy.tag(),
        })
        .into_iter()
        .collect()
}

fn data_file(
    name_field: &str,
    name: Option<&str>,
    path_field: &str,
    path: Option<&str>,
) -> Result<DataFile, CaseError> {
    match (name, path) {
        (Some(_), Some(_)) => Err(CaseError::ConflictingFields {
            first: name_field.to_string(),
            second: path_field.to_string(),
        }),
        (Some(n), None) => Ok(DataFile::InDataPath(checked_path(name_field, n)?)),
        (None, Some(p)) => Ok(DataFile::Path(checked_path(path_field, p)?)),
        (None, None) => Err(CaseError::MissingField {
            field: path_field.to_string(),
            context: Some(format!("every case (or `{name_field}` with `data_path`)")),
        }),
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Checks that a declared path is well-formed. The file is not opened.
pub(crate) fn checked_path(field: &str, raw: &str) -> Result<PathBuf, CaseError> {
    if raw.trim().is_empty() {
        return Err(CaseError::range(field, "\"\"", "must be a non-empty path"));
    }
    if raw.contains('\0') {
        return Err(CaseError::range(
            field,
            format!("{raw:?}"),
            "must not contain NUL bytes",
        ));
    }
    Ok(PathBuf::from(raw))
}

pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, CaseError> {
    value.ok_or_else(|| CaseError::missing(field))
}

pub(crate) fn finite(field: &str, value: f64) -> Result<f64, CaseError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CaseError::range(field, value, "must be a finite number"))
    }
}

pub(crate) fn positive(field: &str, value: f64) -> Result<f64, CaseError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CaseError::range(field, value, "must be > 0"))
    }
}

pub(crate) fn non_negative(field: &str, value: f64) -> Result<f64, CaseError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CaseError::range(field, value, "must be >= 0"))
    }
}

pub(crate) fn required_positive(value: Option<f64>, field: &str) -> Result<f64, CaseError> {
    positive(field, require(value, field)?)
}

pub(crate) fn required_non_negative(value: Option<f64>, field: &str) -> Result<f64, CaseError> {
    non_negative(field, require(value, field)?)
}

fn unit_fraction(field: &str, value: f64) -> Result<f64, CaseError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(CaseError::range(field, value, "must be in [0.0, 1.0]"))
    }
}

fn percentage(field: &str, value: f64) -> Result<f64, CaseError> {
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(CaseError::range(field, value, "must be in [0, 100]"))
    }
}

fn efficiency_percentage(field: &str, value: f64) -> Result<f64, CaseError> {
    if value > 0.0 && value <= 100.0 {
        Ok(value)
    } else {
        Err(CaseError::range(field, value, "must be in (0, 100]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uk_doc() -> CaseDocument {
        CaseDocument::from_yaml_str(UK_WINTER_YAML).expect("preset should parse")
    }

    fn pamplona_doc() -> CaseDocument {
        CaseDocument::from_yaml_str(PAMPLONA_METEO_NAVARRA_YAML).expect("preset should parse")
    }

    #[test]
    fn all_presets_are_valid() {
        for name in CaseConfig::PRESETS {
            let cfg = CaseConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load: {:?}", cfg.err());
            let doc = CaseDocument::from_yaml_str(CaseConfig::preset_yaml(name).unwrap_or(""))
                .expect("preset should parse");
            let errors = CaseConfig::check(&doc);
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = CaseConfig::from_preset("nonexistent").expect_err("must fail");
        assert!(err.to_string().contains("unknown preset"));
        assert!(err.to_string().contains("uk_winter"));
    }

    #[test]
    fn uk_winter_keeps_negative_export_bound() {
        let cfg = CaseConfig::from_preset("uk_winter").expect("valid preset");
        assert!(cfg.is_winter());
        assert_eq!(cfg.tariff().max_import_kilowatts, 500.0);
        assert_eq!(cfg.tariff().max_export_kilowatts, -500.0);
        assert_eq!(cfg.data_strategy().tag(), "UK");
        assert_eq!(cfg.market(), Market::Open);
    }

    #[test]
    fn uk_data_files_resolve_under_data_path() {
        let cfg = CaseConfig::from_preset("uk_winter").expect("valid preset");
        assert_eq!(
            cfg.data_sources().photovoltaic_generation_path(),
            PathBuf::from("data/building/PVpu_1min_2014JAN.csv")
        );
    }

    #[test]
    fn zero_offer_keeps_frequency_response_band() {
        let cfg = CaseConfig::from_preset("pamplona_meteo_navarra").expect("valid preset");
        let fr = cfg.frequency_response();
        assert_eq!(fr.offered_kilowatts, 0.0);
        assert!(!fr.is_active());
        assert_eq!(fr.min_state_of_charge, 0.4);
        assert_eq!(fr.max_state_of_charge, 0.6);
        assert!(
            cfg.warnings()
                .iter()
                .any(|w| matches!(w, CaseWarning::IdleFrequencyResponseBand { .. }))
        );
    }

    #[test]
    fn frequency_response_band_validated_even_when_idle() {
        let mut doc = pamplona_doc();
        doc.min_frequency_response_state_of_charge = Some(0.7);
        let err = CaseConfig::load(&doc).expect_err("min > max must fail");
        assert_eq!(err.field(), Some("min_frequency_response_state_of_charge"));
    }

    #[test]
    fn soc_outside_unit_interval_rejected() {
        let mut doc = pamplona_doc();
        doc.max_frequency_response_state_of_charge = Some(1.2);
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert!(matches!(err, CaseError::RangeViolation { .. }));
        assert_eq!(err.field(), Some("max_frequency_response_state_of_charge"));
    }

    #[test]
    fn inverted_temperature_band_rejected() {
        let mut doc = uk_doc();
        doc.min_inside_degree_celsius = Some(19.0);
        let err = CaseConfig::load(&doc).expect_err("min > max must fail");
        assert!(matches!(err, CaseError::RangeViolation { .. }));
        assert_eq!(err.field(), Some("min_inside_degree_celsius"));
    }

    #[test]
    fn initial_temperature_outside_band_rejected() {
        let mut doc = uk_doc();
        doc.initial_inside_degree_celsius = Some(15.5);
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert_eq!(err.field(), Some("initial_inside_degree_celsius"));
    }

    #[test]
    fn initial_temperature_on_band_edge_accepted() {
        let mut doc = uk_doc();
        doc.initial_inside_degree_celsius = doc.min_inside_degree_celsius;
        assert!(CaseConfig::load(&doc).is_ok());
    }

    #[test]
    fn ems_resolution_not_multiple_rejected() {
        let mut doc = uk_doc();
        doc.simulation_time_series_resolution_in_minutes = Some(4);
        doc.energy_management_system_time_series_resolution_in_minutes = Some(10);
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert!(matches!(err, CaseError::RangeViolation { .. }));
    }

    #[test]
    fn meteo_navarra_without_file_is_missing_field() {
        let mut doc = pamplona_doc();
        doc.ambient_temperature_file_path = None;
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert!(matches!(err, CaseError::MissingField { .. }));

        doc.data_strategy = Some("UK".to_string());
        doc.ambient_temperature_in_degree_celsius = Some(18.0);
        let cfg = CaseConfig::load(&doc).expect("UK with scalar temperature is valid");
        assert_eq!(cfg.data_strategy().tag(), "UK");
    }

    #[test]
    fn unknown_strategy_rejected() {
        let mut doc = uk_doc();
        doc.data_strategy = Some("Sahara".to_string());
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert!(matches!(err, CaseError::UnknownDataStrategy { .. }));
    }

    #[test]
    fn ignored_strategy_field_is_a_warning() {
        let mut doc = uk_doc();
        doc.ambient_temperature_file_path = Some("some/file.csv".to_string());
        let (_, warnings) = CaseConfig::load_with_warnings(&doc).expect("still valid");
        assert!(warnings.contains(&CaseWarning::IgnoredStrategyField {
            field: "ambient_temperature_file_path",
            data_strategy: "UK",
        }));
    }

    #[test]
    fn demand_charge_surfaces_warning() {
        let cfg = CaseConfig::from_preset("uk_winter").expect("valid preset");
        assert!(
            cfg.warnings()
                .iter()
                .any(|w| matches!(w, CaseWarning::DemandChargeRatePeriod { .. }))
        );
    }

    #[test]
    fn missing_import_periods_rejected() {
        let mut doc = uk_doc();
        doc.import_periods = None;
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert_eq!(err.field(), Some("import_periods"));

        doc.import_periods = Some(Vec::new());
        let err = CaseConfig::load(&doc).expect_err("empty must fail");
        assert!(matches!(err, CaseError::MissingField { .. }));
    }

    #[test]
    fn spanish_market_requires_full_day() {
        let mut doc = pamplona_doc();
        if let Some(periods) = doc.import_periods.as_mut() {
            periods.pop();
        }
        let err = CaseConfig::load(&doc).expect_err("16 h without sentinel must fail");
        assert_eq!(err.field(), Some("import_periods"));
    }

    #[test]
    fn unknown_market_rejected() {
        let mut doc = uk_doc();
        doc.market = Some("Mars".to_string());
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert!(matches!(err, CaseError::UnknownMarket { .. }));
    }

    #[test]
    fn positive_export_bound_rejected() {
        let mut doc = uk_doc();
        doc.max_export_kilowatts = Some(500.0);
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert_eq!(err.field(), Some("max_export_kilowatts"));
    }

    #[test]
    fn voltage_levels_must_not_increase() {
        let mut doc = uk_doc();
        doc.grid_3_voltage_level_in_kilo_volts = Some(11.0);
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert_eq!(err.field(), Some("grid_3_voltage_level_in_kilo_volts"));
    }

    #[test]
    fn both_data_file_spellings_conflict() {
        let mut doc = uk_doc();
        doc.photovoltaic_generation_data_file_path = Some("data/pv.csv".to_string());
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert!(matches!(err, CaseError::ConflictingFields { .. }));
    }

    #[test]
    fn empty_path_rejected() {
        let mut doc = pamplona_doc();
        doc.electric_load_data_file_path = Some("  ".to_string());
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert_eq!(err.field(), Some("electric_load_data_file_path"));
    }

    #[test]
    fn partial_storage_group_rejected() {
        let mut doc = uk_doc();
        doc.max_storage_asset_energy_in_kilowatt_hour = Some(100.0);
        let err = CaseConfig::load(&doc).expect_err("must fail");
        assert!(matches!(err, CaseError::MissingField { .. }));
        assert_eq!(err.field(), Some("min_storage_asset_energy_in_kilowatt_hour"));
    }

    #[test]
    fn storage_energy_levels_derived_from_percentages() {
        let cfg = CaseConfig::from_preset("pamplona_meteo_navarra").expect("valid preset");
        let storage = cfg.storage().expect("pamplona declares a battery");
        assert_eq!(
            storage.initial_energy_in_kilowatt_hour(),
            storage.initial_energy_level_percentage / 100.0 * storage.max_energy_in_kilowatt_hour
        );
    }

    #[test]
    fn check_collects_violations_across_groups() {
        let mut doc = uk_doc();
        doc.is_winter = None;
        doc.rated_photovoltaic_kilowatts = Some(-1.0);
        doc.data_strategy = Some("Nowhere".to_string());
        let errors = CaseConfig::check(&doc);
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert_eq!(errors[0].field(), Some("is_winter"));
        assert_eq!(errors[1].field(), Some("rated_photovoltaic_kilowatts"));
        assert_eq!(errors[2].field(), Some("data_strategy"));
    }

    #[test]
    fn load_is_deterministic() {
        let a = CaseConfig::load(&uk_doc()).expect("valid");
        let b = CaseConfig::load(&uk_doc()).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn yaml_round_trip_is_idempotent() {
        for name in CaseConfig::PRESETS {
            let cfg = CaseConfig::from_preset(name).expect("valid preset");
            let yaml = cfg.to_string_as(CaseFormat::Yaml).expect("serializes");
            let back = CaseConfig::from_yaml_str(&yaml).expect("reloads");
            assert_eq!(back, cfg, "round trip changed preset \"{name}\"");
        }
    }

    #[test]
    fn toml_round_trip_is_idempotent() {
        for name in CaseConfig::PRESETS {
            let cfg = CaseConfig::from_preset(name).expect("valid preset");
            let toml = cfg.to_string_as(CaseFormat::Toml).expect("serializes");
            let back = CaseConfig::from_toml_str(&toml).expect("reloads");
            assert_eq!(back, cfg, "round trip changed preset \"{name}\"");
        }
    }

    #[test]
    fn import_prices_follow_ems_grid() {
        let cfg = CaseConfig::from_preset("pamplona_meteo_navarra").expect("valid preset");
        let prices = cfg.import_prices_per_ems_interval();
        assert_eq!(prices.len(), cfg.resolution().ems_intervals_per_day());
        assert_eq!(prices[0], 0.1395);
        assert_eq!(prices[prices.len() - 1], 0.0871);
    }

    #[test]
    fn transformer_std_type_name() {
        let cfg = CaseConfig::from_preset("uk_winter").expect("valid preset");
        assert_eq!(cfg.grid().transformer_std_type(), "0.4 MVA 20/0.4 kV");
    }
}
