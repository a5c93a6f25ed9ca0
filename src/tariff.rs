//! Import-period tariff schedule.
//!
//! A schedule is an ordered list of bands laid out from midnight. Each band
//! has an explicit duration in hours, or is the single open-ended band that
//! takes whatever is left of the day.

use std::fmt;

use crate::document::ImportPeriodEntry;
use crate::error::CaseError;

/// Hours in one day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Slack allowed when summing decimal period durations.
const HOURS_TOLERANCE: f64 = 1e-9;

/// Duration of an import period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PeriodDuration {
    /// A fixed number of hours per day.
    Hours(f64),
    /// The remainder of the day, written as `0` in the document.
    RemainderOfDay,
}

impl PeriodDuration {
    fn from_document(hours: f64) -> Self {
        if hours == 0.0 {
            Self::RemainderOfDay
        } else {
            Self::Hours(hours)
        }
    }

    fn to_document(self) -> f64 {
        match self {
            Self::Hours(h) => h,
            Self::RemainderOfDay => 0.0,
        }
    }
}

/// One tariff band, e.g. `P1` of the Spanish 6.1TD tariff.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPeriod {
    pub name: String,
    pub duration: PeriodDuration,
    pub price_in_euros_per_kilowatt_hour: f64,
}

impl ImportPeriod {
    pub fn new(name: impl Into<String>, duration: PeriodDuration, price: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            price_in_euros_per_kilowatt_hour: price,
        }
    }
}

impl fmt::Display for ImportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.duration {
            PeriodDuration::Hours(h) => write!(
                f,
                "{}: {h} h @ {:.4} €/kWh",
                self.name, self.price_in_euros_per_kilowatt_hour
            ),
            PeriodDuration::RemainderOfDay => write!(
                f,
                "{}: rest of day @ {:.4} €/kWh",
                self.name, self.price_in_euros_per_kilowatt_hour
            ),
        }
    }
}

/// Validated, non-empty import-period schedule.
///
/// Invariants, checked in [`ImportSchedule::new`]:
/// - at least one period;
/// - explicit durations are finite and positive, prices finite;
/// - at most one open-ended period;
/// - explicit durations sum to at most 24 h.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSchedule {
    periods: Vec<ImportPeriod>,
}

impl ImportSchedule {
    /// Builds a schedule, enforcing the daily-coverage invariants.
    ///
    /// # Errors
    ///
    /// - [`CaseError::MissingField`] if `periods` is empty.
    /// - [`CaseError::RangeViolation`] for a negative/non-finite duration or price.
    /// - [`CaseError::ScheduleOverlap`] if explicit hours exceed 24 or more
    ///   than one period is open-ended.
    pub fn new(periods: Vec<ImportPeriod>) -> Result<Self, CaseError> {
        if periods.is_empty() {
            return Err(CaseError::missing("import_periods"));
        }

        for (i, p) in periods.iter().enumerate() {
            if let PeriodDuration::Hours(h) = p.duration {
                if !h.is_finite() || h <= 0.0 {
                    return Err(CaseError::range(
                        format!("import_periods[{i}].{}", p.name),
                        h,
                        "duration must be a positive number of hours, or 0 for the rest of the day",
                    ));
                }
            }
            if !p.price_in_euros_per_kilowatt_hour.is_finite() {
                return Err(CaseError::range(
                    format!("import_periods[{i}].{}", p.name),
                    p.price_in_euros_per_kilowatt_hour,
                    "price must be finite",
                ));
            }
        }

        let schedule = Self { periods };
        let explicit_hours = schedule.explicit_hours();
        let open_ended = schedule.open_ended_count();
        if explicit_hours > HOURS_PER_DAY + HOURS_TOLERANCE || open_ended > 1 {
            return Err(CaseError::ScheduleOverlap {
                explicit_hours,
                open_ended,
            });
        }
        Ok(schedule)
    }

    /// Converts the document's list of single-key mappings.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::RangeViolation`] if an entry does not hold
    /// exactly one period name, plus everything [`ImportSchedule::new`] rejects.
    pub fn from_entries(entries: &[ImportPeriodEntry]) -> Result<Self, CaseError> {
        let mut periods = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let mut iter = entry.iter();
            let (Some((name, &(hours, price))), None) = (iter.next(), iter.next()) else {
                return Err(CaseError::range(
                    format!("import_periods[{i}]"),
                    format!("{} keys", entry.len()),
                    "each entry must name exactly one period",
                ));
            };
            periods.push(ImportPeriod::new(
                name.clone(),
                PeriodDuration::from_document(hours),
                price,
            ));
        }
        Self::new(periods)
    }

    /// Converts back to the document's list of single-key mappings.
    pub fn to_entries(&self) -> Vec<ImportPeriodEntry> {
        self.periods
            .iter()
            .map(|p| {
                ImportPeriodEntry::from([(
                    p.name.clone(),
                    (p.duration.to_document(), p.price_in_euros_per_kilowatt_hour),
                )])
            })
            .collect()
    }

    pub fn periods(&self) -> &[ImportPeriod] {
        &self.periods
    }

    /// Sum of all explicit (non open-ended) durations.
    pub fn explicit_hours(&self) -> f64 {
        self.periods
            .iter()
            .filter_map(|p| match p.duration {
                PeriodDuration::Hours(h) => Some(h),
                PeriodDuration::RemainderOfDay => None,
            })
            .sum()
    }

    fn open_ended_count(&self) -> usize {
        self.periods
            .iter()
            .filter(|p| p.duration == PeriodDuration::RemainderOfDay)
            .count()
    }

    /// The open-ended period, if the schedule has one.
    pub fn open_ended(&self) -> Option<&ImportPeriod> {
        self.periods
            .iter()
            .find(|p| p.duration == PeriodDuration::RemainderOfDay)
    }

    /// Hours per day effectively assigned to `period`.
    pub fn hours_of(&self, period: &ImportPeriod) -> f64 {
        match period.duration {
            PeriodDuration::Hours(h) => h,
            PeriodDuration::RemainderOfDay => (HOURS_PER_DAY - self.explicit_hours()).max(0.0),
        }
    }

    /// True when every hour of the day falls in some period.
    pub fn covers_whole_day(&self) -> bool {
        self.open_ended().is_some()
            || (self.explicit_hours() - HOURS_PER_DAY).abs() < HOURS_TOLERANCE
    }

    /// Expands the schedule to one import price per market interval.
    ///
    /// Periods are laid out from midnight in document order. Each explicit
    /// period gets `floor(hours / 24 * n)` intervals, the open-ended period
    /// takes what the others leave, and any tail still uncovered is priced
    /// like the last period.
    pub fn prices_per_interval(&self, intervals_per_day: usize) -> Vec<f64> {
        let n = intervals_per_day;
        let explicit_intervals: usize = self
            .periods
            .iter()
            .filter_map(|p| match p.duration {
                PeriodDuration::Hours(h) => Some(Self::intervals_for(h, n)),
                PeriodDuration::RemainderOfDay => None,
            })
            .sum();
        let remainder_intervals = n.saturating_sub(explicit_intervals);

        let mut prices = Vec::with_capacity(n);
        for p in &self.periods {
            let count = match p.duration {
                PeriodDuration::Hours(h) => Self::intervals_for(h, n),
                PeriodDuration::RemainderOfDay => remainder_intervals,
            };
            let count = count.min(n - prices.len());
            prices.extend(std::iter::repeat_n(p.price_in_euros_per_kilowatt_hour, count));
        }

        if let Some(last) = self.periods.last() {
            prices.resize(n, last.price_in_euros_per_kilowatt_hour);
        }
        prices
    }

    fn intervals_for(hours: f64, intervals_per_day: usize) -> usize {
        (hours / HOURS_PER_DAY * intervals_per_day as f64 + 1e-9).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spanish() -> ImportSchedule {
        ImportSchedule::new(vec![
            ImportPeriod::new("P1", PeriodDuration::Hours(8.0), 0.1395),
            ImportPeriod::new("P2", PeriodDuration::Hours(8.0), 0.1278),
            ImportPeriod::new("P6", PeriodDuration::RemainderOfDay, 0.0871),
        ])
        .expect("valid schedule")
    }

    #[test]
    fn empty_schedule_is_missing_field() {
        let err = ImportSchedule::new(Vec::new()).expect_err("must fail");
        assert!(matches!(err, CaseError::MissingField { .. }));
    }

    #[test]
    fn twenty_five_hours_overlap() {
        let err = ImportSchedule::new(vec![
            ImportPeriod::new("peak", PeriodDuration::Hours(8.0), 0.07),
            ImportPeriod::new("valley", PeriodDuration::Hours(17.0), 0.15),
        ])
        .expect_err("25 h must be rejected");
        assert!(matches!(
            err,
            CaseError::ScheduleOverlap { explicit_hours, open_ended: 0 } if explicit_hours == 25.0
        ));
    }

    #[test]
    fn decimal_durations_summing_to_a_day_are_accepted() {
        let schedule = ImportSchedule::new(vec![
            ImportPeriod::new("P1", PeriodDuration::Hours(0.1), 0.12),
            ImportPeriod::new("P2", PeriodDuration::Hours(16.1), 0.10),
            ImportPeriod::new("P3", PeriodDuration::Hours(7.8), 0.08),
        ])
        .expect("0.1 + 16.1 + 7.8 h is a whole day");
        assert!(schedule.covers_whole_day());
        assert_eq!(schedule.prices_per_interval(24).len(), 24);
    }

    #[test]
    fn two_open_ended_periods_overlap() {
        let err = ImportSchedule::new(vec![
            ImportPeriod::new("a", PeriodDuration::RemainderOfDay, 0.1),
            ImportPeriod::new("b", PeriodDuration::RemainderOfDay, 0.2),
        ])
        .expect_err("two sentinels must be rejected");
        assert!(matches!(err, CaseError::ScheduleOverlap { open_ended: 2, .. }));
    }

    #[test]
    fn twenty_four_explicit_hours_plus_sentinel_is_valid() {
        let schedule = ImportSchedule::new(vec![
            ImportPeriod::new("peak", PeriodDuration::Hours(7.0), 0.07),
            ImportPeriod::new("valley", PeriodDuration::Hours(17.0), 0.15),
            ImportPeriod::new("rest", PeriodDuration::RemainderOfDay, 0.01),
        ])
        .expect("24 h plus an empty remainder is allowed");
        let rest = schedule.open_ended().expect("sentinel present");
        assert_eq!(schedule.hours_of(rest), 0.0);
    }

    #[test]
    fn negative_duration_is_range_violation() {
        let err = ImportSchedule::new(vec![ImportPeriod::new(
            "P1",
            PeriodDuration::Hours(-1.0),
            0.1,
        )])
        .expect_err("must fail");
        assert!(matches!(err, CaseError::RangeViolation { .. }));
    }

    #[test]
    fn remainder_hours_and_coverage() {
        let schedule = spanish();
        assert_eq!(schedule.explicit_hours(), 16.0);
        let p6 = schedule.open_ended().expect("P6 is open-ended");
        assert_eq!(p6.name, "P6");
        assert_eq!(schedule.hours_of(p6), 8.0);
        assert!(schedule.covers_whole_day());
    }

    #[test]
    fn prices_expand_in_document_order() {
        let prices = spanish().prices_per_interval(96);
        assert_eq!(prices.len(), 96);
        assert!(prices[..32].iter().all(|&p| p == 0.1395));
        assert!(prices[32..64].iter().all(|&p| p == 0.1278));
        assert!(prices[64..].iter().all(|&p| p == 0.0871));
    }

    #[test]
    fn uncovered_tail_takes_last_price() {
        let schedule = ImportSchedule::new(vec![
            ImportPeriod::new("peak", PeriodDuration::Hours(6.0), 0.2),
            ImportPeriod::new("valley", PeriodDuration::Hours(6.0), 0.1),
        ])
        .expect("valid");
        assert!(!schedule.covers_whole_day());
        let prices = schedule.prices_per_interval(24);
        assert_eq!(prices.len(), 24);
        assert_eq!(prices[0], 0.2);
        assert_eq!(prices[23], 0.1);
    }

    #[test]
    fn entries_round_trip() {
        let schedule = spanish();
        let back = ImportSchedule::from_entries(&schedule.to_entries()).expect("valid");
        assert_eq!(back, schedule);
    }

    #[test]
    fn entry_with_two_names_is_rejected() {
        let entry = ImportPeriodEntry::from([
            ("P1".to_string(), (8.0, 0.1)),
            ("P2".to_string(), (8.0, 0.2)),
        ]);
        let err = ImportSchedule::from_entries(&[entry]).expect_err("must fail");
        assert_eq!(err.field(), Some("import_periods[0]"));
    }
}
