use std::fmt;

use crate::config::CaseConfig;

/// Human-readable summary of a loaded case, one group per section.
pub struct CaseReport<'a> {
    config: &'a CaseConfig,
}

impl<'a> CaseReport<'a> {
    pub fn new(config: &'a CaseConfig) -> Self {
        Self { config }
    }
}

impl fmt::Display for CaseReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.config;
        let res = c.resolution();
        let sources = c.data_sources();
        let ev = c.electric_vehicles();
        let b = c.building();
        let t = c.tariff();
        let fr = c.frequency_response();
        let g = c.grid();

        writeln!(f, "--- Case ---")?;
        writeln!(f, "Market:                {}", c.market().tag())?;
        writeln!(
            f,
            "Season:                {}",
            if c.is_winter() { "winter" } else { "summer" }
        )?;
        writeln!(
            f,
            "Resolution:            {} min simulation, {} min EMS ({} EMS intervals/day)",
            res.simulation_minutes(),
            res.energy_management_system_minutes(),
            res.ems_intervals_per_day()
        )?;
        writeln!(
            f,
            "PV data:               {}",
            sources.photovoltaic_generation_path().display()
        )?;
        writeln!(
            f,
            "Load data:             {}",
            sources.electric_load_path().display()
        )?;
        if let Some(month) = sources.month {
            writeln!(f, "Month:                 {month}")?;
        }
        writeln!(f, "Ambient temperature:   {}", c.data_strategy())?;

        writeln!(f, "\n--- Assets ---")?;
        writeln!(
            f,
            "PV rating:             {:.1} kW",
            c.photovoltaic().rated_kilowatts
        )?;
        writeln!(
            f,
            "EV fleet:              {} x {:.1} kWh @ {:.1} kW (arrive {}-{} h, leave {}-{} h)",
            ev.count,
            ev.battery_capacity_in_kilowatt_hour,
            ev.max_charging_power_in_kilowatts,
            ev.arrival_window.start,
            ev.arrival_window.end,
            ev.departure_window.start,
            ev.departure_window.end
        )?;
        writeln!(
            f,
            "Inside temperature:    {}..{} °C (start {} °C)",
            b.min_inside_degree_celsius,
            b.max_inside_degree_celsius,
            b.initial_inside_degree_celsius
        )?;
        writeln!(
            f,
            "HVAC:                  {:.1} kW heat (CoP {}), {:.1} kW cool (CoP {})",
            b.max_consumed_electric_heating_kilowatts,
            b.heat_pump_coefficient_of_performance,
            b.max_consumed_electric_cooling_kilowatts,
            b.chiller_coefficient_of_performance
        )?;
        writeln!(
            f,
            "Thermal RC:            C = {} kWh/°C, R = {} °C/kW",
            b.thermal_capacitance_in_kilowatts_hour_per_degree_celsius,
            b.thermal_resistance_in_degree_celsius_per_kilowatts
        )?;
        match c.storage() {
            Some(s) => writeln!(
                f,
                "Storage:               {:.1}..{:.1} kWh, {:.1}..{:.1} kW, start {:.1} kWh",
                s.min_energy_in_kilowatt_hour,
                s.max_energy_in_kilowatt_hour,
                s.min_active_power_in_kilowatts,
                s.max_active_power_in_kilowatts,
                s.initial_energy_in_kilowatt_hour()
            )?,
            None => writeln!(f, "Storage:               none")?,
        }

        writeln!(f, "\n--- Tariff ---")?;
        for period in t.import_schedule.periods() {
            writeln!(f, "Import period          {period}")?;
        }
        writeln!(
            f,
            "Export price:          {:.4} €/kWh",
            t.export_price_in_euros_per_kilowatt_hour
        )?;
        writeln!(
            f,
            "Demand charge:         {:.4} €/kW",
            t.demand_charge_in_euros_per_kilowatt
        )?;
        writeln!(
            f,
            "Connection limits:     import {:.1} kW, export {:.1} kW",
            t.max_import_kilowatts, t.max_export_kilowatts
        )?;
        writeln!(
            f,
            "Frequency response:    {:.1} kW offered, SoC {}..{}, {:.4} €/kWh",
            fr.offered_kilowatts,
            fr.min_state_of_charge,
            fr.max_state_of_charge,
            fr.price_in_euros_per_kilowatt_hour
        )?;

        writeln!(f, "\n--- Network ---")?;
        writeln!(f, "Transformer:           {}", g.transformer_std_type())?;
        write!(
            f,
            "Bus 3:                 {} kV, {} km from bus 2",
            g.grid_3_voltage_level_in_kilo_volts, g.length_from_bus_2_to_bus_3_in_km
        )
    }
}
