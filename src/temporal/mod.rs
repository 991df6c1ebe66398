//! Time-of-day statistics
//!
//! Converts each row's UTC creation timestamp into a target civil timezone
//! (real tz-database rules, so daylight saving transitions are handled) and
//! groups purchase counts by minute-of-day, day-of-week, and year. Rows whose
//! timestamp does not parse are skipped rather than failing the run.

use crate::flatten::TransactionRow;
use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A purchase's calendar coordinates in the target timezone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSlot {
    /// Minute-precision label, e.g. `"00:30"`
    pub time: String,
    /// Full day name, e.g. `"Sunday"`
    pub day_of_week: String,
    pub year: i32,
}

/// Purchase count for one minute-of-day label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCount {
    pub time: String,
    pub count: u64,
}

/// Purchase count for a (day-of-week, minute-of-day) slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTimeCount {
    pub day_of_week: String,
    pub time: String,
    pub count: u64,
}

/// Purchase count for a (year, day-of-week, minute-of-day) slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearDayTimeCount {
    pub year: i32,
    pub day_of_week: String,
    pub time: String,
    pub count: u64,
}

/// The three temporal groupings over one transaction table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeOfDayReport {
    pub by_time: Vec<TimeCount>,
    pub by_day_time: Vec<DayTimeCount>,
    pub by_year_day_time: Vec<YearDayTimeCount>,
}

/// Convert a UTC RFC 3339 timestamp into its slot in `tz`
///
/// Returns `None` when the timestamp is missing or unparsable.
pub fn local_slot(created_at: Option<&str>, tz: Tz) -> Option<LocalSlot> {
    let parsed = DateTime::parse_from_rfc3339(created_at?).ok()?;
    let local = parsed.with_timezone(&tz);
    Some(LocalSlot {
        time: local.format("%H:%M").to_string(),
        day_of_week: local.format("%A").to_string(),
        year: local.year(),
    })
}

/// Group purchase counts by time, (day, time) and (year, day, time)
pub fn analyze_time_of_day(rows: &[TransactionRow], tz: Tz) -> TimeOfDayReport {
    let mut by_time: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_day_time: BTreeMap<(String, String), u64> = BTreeMap::new();
    let mut by_year_day_time: BTreeMap<(i32, String, String), u64> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in rows {
        let Some(slot) = local_slot(row.created_at.as_deref(), tz) else {
            skipped += 1;
            continue;
        };

        *by_time.entry(slot.time.clone()).or_insert(0) += 1;
        *by_day_time
            .entry((slot.day_of_week.clone(), slot.time.clone()))
            .or_insert(0) += 1;
        *by_year_day_time
            .entry((slot.year, slot.day_of_week, slot.time))
            .or_insert(0) += 1;
    }

    if skipped > 0 {
        debug!(skipped, "Rows without a parsable timestamp were excluded");
    }

    TimeOfDayReport {
        by_time: by_time
            .into_iter()
            .map(|(time, count)| TimeCount { time, count })
            .collect(),
        by_day_time: by_day_time
            .into_iter()
            .map(|((day_of_week, time), count)| DayTimeCount {
                day_of_week,
                time,
                count,
            })
            .collect(),
        by_year_day_time: by_year_day_time
            .into_iter()
            .map(|((year, day_of_week, time), count)| YearDayTimeCount {
                year,
                day_of_week,
                time,
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    fn row(created_at: Option<&str>) -> TransactionRow {
        TransactionRow {
            order_id: Some("o1".to_string()),
            location_id: Some("L1".to_string()),
            created_at: created_at.map(|s| s.to_string()),
            updated_at: None,
            state: Some("COMPLETED".to_string()),
            item_id: None,
            item_name: Some("Latte".to_string()),
            variation_name: None,
            quantity: Some(1),
            base_price: Some(4.75),
            total_money: 4.75,
        }
    }

    #[test]
    fn test_daylight_saving_conversion() {
        // Early September is EDT (UTC-4).
        let slot = local_slot(Some("2024-09-01T04:30:00Z"), New_York).unwrap();
        assert_eq!(slot.time, "00:30");
        assert_eq!(slot.day_of_week, "Sunday");
        assert_eq!(slot.year, 2024);
    }

    #[test]
    fn test_standard_time_conversion() {
        // Mid January is EST (UTC-5), so the same UTC instant lands an hour
        // earlier and on the previous civil day.
        let slot = local_slot(Some("2024-01-15T04:30:00Z"), New_York).unwrap();
        assert_eq!(slot.time, "23:30");
        assert_eq!(slot.day_of_week, "Sunday");
    }

    #[test]
    fn test_unparsable_timestamp_is_none() {
        assert!(local_slot(None, New_York).is_none());
        assert!(local_slot(Some("not-a-timestamp"), New_York).is_none());
    }

    #[test]
    fn test_groupings_count_and_exclude_bad_rows() {
        let rows = vec![
            row(Some("2024-09-01T04:30:00Z")),
            row(Some("2024-09-01T04:30:00Z")),
            row(Some("2023-09-03T04:30:00Z")),
            row(Some("garbage")),
            row(None),
        ];
        let report = analyze_time_of_day(&rows, New_York);

        assert_eq!(report.by_time.len(), 1);
        assert_eq!(report.by_time[0].time, "00:30");
        assert_eq!(report.by_time[0].count, 3);

        assert_eq!(report.by_day_time.len(), 1);
        assert_eq!(report.by_day_time[0].day_of_week, "Sunday");
        assert_eq!(report.by_day_time[0].count, 3);

        assert_eq!(report.by_year_day_time.len(), 2);
        let years: Vec<i32> = report.by_year_day_time.iter().map(|c| c.year).collect();
        assert_eq!(years, vec![2023, 2024]);
        assert_eq!(report.by_year_day_time[1].count, 2);
    }
}
