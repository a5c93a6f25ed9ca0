//! Simulation and energy-management time grids.

use crate::config::require;
use crate::document::CaseDocument;
use crate::error::CaseError;

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

const SIM: &str = "simulation_time_series_resolution_in_minutes";
const EMS: &str = "energy_management_system_time_series_resolution_in_minutes";

/// Time resolutions of the raw simulation and of the EMS re-planning grid.
///
/// # Examples
///
/// ```
/// use open_case::resolution::Resolution;
///
/// let res = Resolution::new(1, 15).unwrap();
/// assert_eq!(res.simulation_intervals_per_day(), 1440);
/// assert_eq!(res.ems_intervals_per_day(), 96);
/// assert_eq!(res.simulation_steps_per_ems_interval(), 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    simulation_minutes: u32,
    energy_management_system_minutes: u32,
}

impl Resolution {
    /// Builds a resolution pair.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::RangeViolation`] if either resolution is zero,
    /// does not divide a day, or if the EMS resolution is not an integer
    /// multiple of the simulation resolution.
    pub fn new(
        simulation_minutes: u32,
        energy_management_system_minutes: u32,
    ) -> Result<Self, CaseError> {
        if simulation_minutes == 0 {
            return Err(CaseError::range(SIM, simulation_minutes, "must be > 0"));
        }
        if MINUTES_PER_DAY % simulation_minutes != 0 {
            return Err(CaseError::range(
                SIM,
                simulation_minutes,
                format!("must divide a day ({MINUTES_PER_DAY} minutes) evenly"),
            ));
        }
        if energy_management_system_minutes == 0 {
            return Err(CaseError::range(
                EMS,
                energy_management_system_minutes,
                "must be > 0",
            ));
        }
        if energy_management_system_minutes < simulation_minutes {
            return Err(CaseError::range(
                EMS,
                energy_management_system_minutes,
                format!("must be >= {SIM} ({simulation_minutes})"),
            ));
        }
        if energy_management_system_minutes % simulation_minutes != 0 {
            return Err(CaseError::range(
                EMS,
                energy_management_system_minutes,
                format!("must be an integer multiple of {SIM} ({simulation_minutes})"),
            ));
        }
        if MINUTES_PER_DAY % energy_management_system_minutes != 0 {
            return Err(CaseError::range(
                EMS,
                energy_management_system_minutes,
                format!("must divide a day ({MINUTES_PER_DAY} minutes) evenly"),
            ));
        }

        Ok(Self {
            simulation_minutes,
            energy_management_system_minutes,
        })
    }

    pub(crate) fn from_document(doc: &CaseDocument) -> Result<Self, CaseError> {
        let simulation = require(doc.simulation_time_series_resolution_in_minutes, SIM)?;
        let ems = require(
            doc.energy_management_system_time_series_resolution_in_minutes,
            EMS,
        )?;
        Self::new(minutes(SIM, simulation)?, minutes(EMS, ems)?)
    }

    pub fn simulation_minutes(&self) -> u32 {
        self.simulation_minutes
    }

    pub fn energy_management_system_minutes(&self) -> u32 {
        self.energy_management_system_minutes
    }

    /// Duration of one simulation step in hours.
    pub fn simulation_hours(&self) -> f64 {
        f64::from(self.simulation_minutes) / 60.0
    }

    /// Duration of one EMS interval in hours.
    pub fn ems_hours(&self) -> f64 {
        f64::from(self.energy_management_system_minutes) / 60.0
    }

    pub fn simulation_intervals_per_day(&self) -> usize {
        (MINUTES_PER_DAY / self.simulation_minutes) as usize
    }

    pub fn ems_intervals_per_day(&self) -> usize {
        (MINUTES_PER_DAY / self.energy_management_system_minutes) as usize
    }

    /// Number of simulation steps aggregated into one EMS interval.
    pub fn simulation_steps_per_ems_interval(&self) -> usize {
        (self.energy_management_system_minutes / self.simulation_minutes) as usize
    }
}

fn minutes(field: &str, raw: i64) -> Result<u32, CaseError> {
    match u32::try_from(raw) {
        Ok(m) => Ok(m),
        Err(_) if raw <= 0 => Err(CaseError::range(field, raw, "must be > 0")),
        Err(_) => Err(CaseError::range(
            field,
            raw,
            format!("must divide a day ({MINUTES_PER_DAY} minutes) evenly"),
        )),
    }
}
