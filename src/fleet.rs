use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::{finite, require, required_positive};
use crate::document::CaseDocument;
use crate::error::CaseError;
use crate::resolution::Resolution;
use crate::tariff::HOURS_PER_DAY;

/// Interval of hours of the day, `0 <= start < end <= 24`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourWindow {
    pub start: f64,
    pub end: f64,
}

impl HourWindow {
    /// Builds a window from its two document keys.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::RangeViolation`] if a bound leaves `[0, 24]` or
    /// the window is empty or inverted.
    pub fn new(
        start_field: &str,
        start: f64,
        end_field: &str,
        end: f64,
    ) -> Result<Self, CaseError> {
        for (field, hour) in [(start_field, start), (end_field, end)] {
            if !(0.0..=HOURS_PER_DAY).contains(&finite(field, hour)?) {
                return Err(CaseError::range(field, hour, "must be an hour in [0, 24]"));
            }
        }
        if start >= end {
            return Err(CaseError::range(
                start_field,
                start,
                format!("must be < {end_field} ({end})"),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn span_hours(&self) -> f64 {
        self.end - self.start
    }
}

/// Identical EVs plugged in at the building car park.
///
/// Every vehicle arrives somewhere in the arrival window and leaves somewhere
/// in the departure window. A departure window earlier in the day than the
/// arrival window means the vehicles stay overnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectricVehicleFleet {
    pub count: u32,
    pub battery_capacity_in_kilowatt_hour: f64,
    pub max_charging_power_in_kilowatts: f64,
    pub arrival_window: HourWindow,
    pub departure_window: HourWindow,
}

/// One sampled vehicle: when it is connected and how full it arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePlan {
    /// Arrival, snapped down to the EMS grid, in hours from midnight.
    pub arrival_hour: f64,
    /// Departure in hours from midnight of the arrival day; may exceed 24.
    pub departure_hour: f64,
    pub arrival_interval: usize,
    pub departure_interval: usize,
    pub initial_energy_in_kilowatt_hour: f64,
}

impl VehiclePlan {
    pub fn dwell_hours(&self) -> f64 {
        self.departure_hour - self.arrival_hour
    }
}

impl ElectricVehicleFleet {
    /// Energy the whole fleet could store.
    pub fn total_capacity_in_kilowatt_hour(&self) -> f64 {
        f64::from(self.count) * self.battery_capacity_in_kilowatt_hour
    }

    /// Whether the departure window lies on the day after arrival.
    pub fn stays_overnight(&self) -> bool {
        self.departure_window.end <= self.arrival_window.start
    }

    /// Draws one plan per vehicle. The same seed always gives the same plans.
    ///
    /// Arrival and departure hours are uniform in their windows and snapped
    /// down to the EMS grid; a departure not after its arrival moves to the
    /// next day. The initial energy is uniform in `[0, capacity]`, raised
    /// where needed so that a full charge is reachable before departure.
    pub fn sample(&self, resolution: &Resolution, seed: u64) -> Vec<VehiclePlan> {
        let mut rng = StdRng::seed_from_u64(seed);
        let step = resolution.ems_hours();
        let snap = |hour: f64| (hour / step).floor() as usize;

        (0..self.count)
            .map(|_| {
                let arrival = uniform(&mut rng, self.arrival_window);
                let mut departure = uniform(&mut rng, self.departure_window);
                if departure <= arrival {
                    departure += HOURS_PER_DAY;
                }

                let arrival_interval = snap(arrival);
                let departure_interval = snap(departure).max(arrival_interval + 1);
                let arrival_hour = arrival_interval as f64 * step;
                let departure_hour = departure_interval as f64 * step;

                let capacity = self.battery_capacity_in_kilowatt_hour;
                let chargeable =
                    self.max_charging_power_in_kilowatts * (departure_hour - arrival_hour);
                let initial = rng
                    .random_range(0.0..=capacity)
                    .max(capacity - chargeable)
                    .clamp(0.0, capacity);

                VehiclePlan {
                    arrival_hour,
                    departure_hour,
                    arrival_interval,
                    departure_interval,
                    initial_energy_in_kilowatt_hour: initial,
                }
            })
            .collect()
    }

    pub(crate) fn from_document(doc: &CaseDocument) -> Result<Self, CaseError> {
        let raw = require(doc.number_of_electric_vehicles, "number_of_electric_vehicles")?;
        let count = u32::try_from(raw).map_err(|_| {
            CaseError::range("number_of_electric_vehicles", raw, "must be >= 0")
        })?;
        let window = |start_field: &str,
                      start: Option<f64>,
                      end_field: &str,
                      end: Option<f64>|
         -> Result<HourWindow, CaseError> {
            HourWindow::new(
                start_field,
                require(start, start_field)?,
                end_field,
                require(end, end_field)?,
            )
        };

        Ok(Self {
            count,
            battery_capacity_in_kilowatt_hour: required_positive(
                doc.max_battery_capacity_in_kilowatt_hour,
                "max_battery_capacity_in_kilowatt_hour",
            )?,
            max_charging_power_in_kilowatts: required_positive(
                doc.max_battery_charging_power_in_kilowatts,
                "max_battery_charging_power_in_kilowatts",
            )?,
            arrival_window: window(
                "electric_vehicle_arrival_time_start_in_hours",
                doc.electric_vehicle_arrival_time_start_in_hours,
                "electric_vehicle_arrival_time_end_in_hours",
                doc.electric_vehicle_arrival_time_end_in_hours,
            )?,
            departure_window: window(
                "electric_vehicle_departure_time_start_in_hours",
                doc.electric_vehicle_departure_time_start_in_hours,
                "electric_vehicle_departure_time_end_in_hours",
                doc.electric_vehicle_departure_time_end_in_hours,
            )?,
        })
    }

    pub(crate) fn write_document(&self, doc: &mut CaseDocument) {
        doc.number_of_electric_vehicles = Some(i64::from(self.count));
        doc.max_battery_capacity_in_kilowatt_hour = Some(self.battery_capacity_in_kilowatt_hour);
        doc.max_battery_charging_power_in_kilowatts = Some(self.max_charging_power_in_kilowatts);
        doc.electric_vehicle_arrival_time_start_in_hours = Some(self.arrival_window.start);
        doc.electric_vehicle_arrival_time_end_in_hours = Some(self.arrival_window.end);
        doc.electric_vehicle_departure_time_start_in_hours = Some(self.departure_window.start);
        doc.electric_vehicle_departure_time_end_in_hours = Some(self.departure_window.end);
    }
}

fn uniform(rng: &mut StdRng, window: HourWindow) -> f64 {
    if window.span_hours() > 0.0 {
        rng.random_range(window.start..window.end)
    } else {
        window.start
    }
}
