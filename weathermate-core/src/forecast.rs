//! Daily aggregation of the provider's 3-hourly forecast entries.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{ForecastDay, ForecastEntry};

/// Maximum number of daily summaries produced, matching the provider's
/// 5-day window.
pub const FORECAST_DAYS: usize = 5;

/// Bucket 3-hourly entries into at most [`FORECAST_DAYS`] daily summaries.
///
/// Days are emitted in chronological order starting from the first entry's
/// calendar date. A day with no entries is simply absent, so the result can
/// be shorter than five days; callers must handle a short list.
pub fn aggregate_daily(entries: Vec<ForecastEntry>) -> Vec<ForecastDay> {
    let mut days: BTreeMap<NaiveDate, Vec<ForecastEntry>> = BTreeMap::new();
    for entry in entries {
        days.entry(entry.at.date()).or_default().push(entry);
    }

    days.into_iter()
        .take(FORECAST_DAYS)
        .map(|(date, entries)| summarize_day(date, entries))
        .collect()
}

fn summarize_day(date: NaiveDate, entries: Vec<ForecastEntry>) -> ForecastDay {
    let mut min_temp = f64::INFINITY;
    let mut max_temp = f64::NEG_INFINITY;
    for entry in &entries {
        min_temp = min_temp.min(entry.temperature);
        max_temp = max_temp.max(entry.temperature);
    }

    ForecastDay {
        date,
        min_temp,
        max_temp,
        condition: dominant_condition(&entries),
        entries,
    }
}

/// Most frequent condition of the day. Only a strictly greater count
/// replaces the running best, so ties resolve to the first-seen condition.
fn dominant_condition(entries: &[ForecastEntry]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for entry in entries {
        match counts.iter_mut().find(|(c, _)| *c == entry.condition) {
            Some((_, n)) => *n += 1,
            None => counts.push((entry.condition.as_str(), 1)),
        }
    }

    let mut best: (&str, usize) = ("", 0);
    for (condition, count) in counts {
        if count > best.1 {
            best = (condition, count);
        }
    }
    best.0.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn entry(dt: &str, temp: f64, condition: &str) -> ForecastEntry {
        ForecastEntry {
            at: NaiveDateTime::parse_from_str(dt, "%Y-%m-%d %H:%M:%S").unwrap(),
            temperature: temp,
            condition: condition.to_string(),
            humidity_pct: 50,
            wind_speed: 2.0,
        }
    }

    #[test]
    fn five_full_days_yield_five_summaries_in_order() {
        let mut entries = Vec::new();
        for day in 1..=5 {
            for hour in [9, 12, 15] {
                entries.push(entry(
                    &format!("2024-06-{day:02} {hour:02}:00:00"),
                    10.0 + day as f64,
                    "Clear Sky",
                ));
            }
        }
        let days = aggregate_daily(entries);
        assert_eq!(days.len(), 5);
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 6, (i + 1) as u32).unwrap());
        }
    }

    #[test]
    fn min_max_are_extrema_over_the_day() {
        let days = aggregate_daily(vec![
            entry("2024-06-01 06:00:00", 9.5, "Mist"),
            entry("2024-06-01 12:00:00", 21.0, "Clear Sky"),
            entry("2024-06-01 18:00:00", 16.3, "Clear Sky"),
        ]);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].min_temp, 9.5);
        assert_eq!(days[0].max_temp, 21.0);
    }

    #[test]
    fn most_frequent_condition_wins() {
        let days = aggregate_daily(vec![
            entry("2024-06-01 06:00:00", 10.0, "Mist"),
            entry("2024-06-01 09:00:00", 12.0, "Light Rain"),
            entry("2024-06-01 12:00:00", 14.0, "Light Rain"),
        ]);
        assert_eq!(days[0].condition, "Light Rain");
    }

    #[test]
    fn condition_tie_resolves_to_first_seen() {
        let days = aggregate_daily(vec![
            entry("2024-06-01 06:00:00", 10.0, "Mist"),
            entry("2024-06-01 09:00:00", 12.0, "Light Rain"),
            entry("2024-06-01 12:00:00", 14.0, "Mist"),
            entry("2024-06-01 15:00:00", 13.0, "Light Rain"),
        ]);
        assert_eq!(days[0].condition, "Mist");
    }

    #[test]
    fn day_without_entries_is_omitted() {
        // Entries cover June 1, 2 and 4; June 3 has no data.
        let days = aggregate_daily(vec![
            entry("2024-06-01 12:00:00", 10.0, "Clear Sky"),
            entry("2024-06-02 12:00:00", 11.0, "Clear Sky"),
            entry("2024-06-04 12:00:00", 12.0, "Clear Sky"),
        ]);
        let dates: Vec<_> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, ["2024-06-01", "2024-06-02", "2024-06-04"]);
    }

    #[test]
    fn window_is_capped_at_five_days() {
        let entries = (1..=7)
            .map(|day| entry(&format!("2024-06-{day:02} 12:00:00"), 15.0, "Clear Sky"))
            .collect();
        let days = aggregate_daily(entries);
        assert_eq!(days.len(), FORECAST_DAYS);
        assert_eq!(days.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_daily(Vec::new()).is_empty());
    }
}
