//! Search history and favorite cities.
//!
//! The store sits behind a small trait so the session-only in-memory backing
//! and the flat-file backing are interchangeable; aggregation and rendering
//! never know which one they are talking to. Neither implementation is
//! thread-safe: the app drives them from a single task.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::WeatherError;
use crate::model::HistoryEntry;

/// Retained readings per city before the oldest is evicted.
pub const DEFAULT_HISTORY_CAP: usize = 30;

pub trait HistoryStore {
    /// Append a reading for `city`, evicting the oldest once the cap is hit.
    fn record(&mut self, city: &str, entry: HistoryEntry) -> Result<(), WeatherError>;

    /// Up to `limit` most recent readings for `city`, oldest first.
    fn recent(&self, city: &str, limit: usize) -> Vec<HistoryEntry>;

    /// Cities with at least one recorded reading.
    fn cities(&self) -> Vec<String>;

    fn clear_city(&mut self, city: &str) -> Result<(), WeatherError>;

    fn add_favorite(&mut self, city: &str) -> Result<(), WeatherError>;

    fn remove_favorite(&mut self, city: &str) -> Result<(), WeatherError>;

    fn favorites(&self) -> Vec<String>;

    fn is_favorite(&self, city: &str) -> bool {
        self.favorites().iter().any(|c| c == city)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HistoryData {
    records: HashMap<String, VecDeque<HistoryEntry>>,
    favorites: Vec<String>,
}

impl HistoryData {
    fn record(&mut self, city: &str, entry: HistoryEntry, cap: usize) {
        let entries = self.records.entry(city.to_string()).or_default();
        entries.push_back(entry);
        while entries.len() > cap {
            entries.pop_front();
        }
    }

    fn recent(&self, city: &str, limit: usize) -> Vec<HistoryEntry> {
        match self.records.get(city) {
            Some(entries) => {
                let skip = entries.len().saturating_sub(limit);
                entries.iter().skip(skip).cloned().collect()
            }
            None => Vec::new(),
        }
    }

    fn add_favorite(&mut self, city: &str) -> bool {
        if self.favorites.iter().any(|c| c == city) {
            return false;
        }
        self.favorites.push(city.to_string());
        true
    }

    fn remove_favorite(&mut self, city: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|c| c != city);
        self.favorites.len() != before
    }
}

/// Session-only history, discarded at process exit.
#[derive(Debug)]
pub struct MemoryHistory {
    cap: usize,
    data: HistoryData,
}

impl MemoryHistory {
    pub fn new(cap: usize) -> Self {
        Self { cap, data: HistoryData::default() }
    }
}

impl HistoryStore for MemoryHistory {
    fn record(&mut self, city: &str, entry: HistoryEntry) -> Result<(), WeatherError> {
        self.data.record(city, entry, self.cap);
        Ok(())
    }

    fn recent(&self, city: &str, limit: usize) -> Vec<HistoryEntry> {
        self.data.recent(city, limit)
    }

    fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self.data.records.keys().cloned().collect();
        cities.sort();
        cities
    }

    fn clear_city(&mut self, city: &str) -> Result<(), WeatherError> {
        self.data.records.remove(city);
        Ok(())
    }

    fn add_favorite(&mut self, city: &str) -> Result<(), WeatherError> {
        self.data.add_favorite(city);
        Ok(())
    }

    fn remove_favorite(&mut self, city: &str) -> Result<(), WeatherError> {
        self.data.remove_favorite(city);
        Ok(())
    }

    fn favorites(&self) -> Vec<String> {
        self.data.favorites.clone()
    }
}

/// History persisted verbatim to a JSON flat file after every change.
///
/// A missing or corrupt file starts an empty history rather than aborting;
/// only writes propagate errors.
#[derive(Debug)]
pub struct FileHistory {
    path: PathBuf,
    cap: usize,
    data: HistoryData,
}

impl FileHistory {
    pub fn open(path: impl Into<PathBuf>, cap: usize) -> Self {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(data) => data,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "history file is corrupt, starting empty");
                    HistoryData::default()
                }
            },
            Err(_) => HistoryData::default(),
        };
        Self { path, cap, data }
    }

    fn save(&self) -> Result<(), WeatherError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HistoryStore for FileHistory {
    fn record(&mut self, city: &str, entry: HistoryEntry) -> Result<(), WeatherError> {
        self.data.record(city, entry, self.cap);
        self.save()
    }

    fn recent(&self, city: &str, limit: usize) -> Vec<HistoryEntry> {
        self.data.recent(city, limit)
    }

    fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self.data.records.keys().cloned().collect();
        cities.sort();
        cities
    }

    fn clear_city(&mut self, city: &str) -> Result<(), WeatherError> {
        self.data.records.remove(city);
        self.save()
    }

    fn add_favorite(&mut self, city: &str) -> Result<(), WeatherError> {
        if self.data.add_favorite(city) {
            self.save()?;
        }
        Ok(())
    }

    fn remove_favorite(&mut self, city: &str) -> Result<(), WeatherError> {
        if self.data.remove_favorite(city) {
            self.save()?;
        }
        Ok(())
    }

    fn favorites(&self) -> Vec<String> {
        self.data.favorites.clone()
    }
}

/// Temperatures of the given records in chronological order.
pub fn temperatures(entries: &[HistoryEntry]) -> Vec<f64> {
    entries.iter().map(|e| e.temperature).collect()
}

pub fn average_temperature(entries: &[HistoryEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let sum: f64 = entries.iter().map(|e| e.temperature).sum();
    Some(sum / entries.len() as f64)
}

pub fn min_temperature(entries: &[HistoryEntry]) -> Option<f64> {
    entries.iter().map(|e| e.temperature).min_by(f64::total_cmp)
}

pub fn max_temperature(entries: &[HistoryEntry]) -> Option<f64> {
    entries.iter().map(|e| e.temperature).max_by(f64::total_cmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(temp: f64) -> HistoryEntry {
        HistoryEntry {
            recorded_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            temperature: temp,
            condition: "Clear Sky".to_string(),
        }
    }

    #[test]
    fn cap_evicts_oldest_first() {
        let mut store = MemoryHistory::new(3);
        for temp in [1.0, 2.0, 3.0, 4.0] {
            store.record("London", entry(temp)).unwrap();
        }
        let recent = store.recent("London", 10);
        let temps: Vec<f64> = recent.iter().map(|e| e.temperature).collect();
        assert_eq!(temps, [2.0, 3.0, 4.0]);
    }

    #[test]
    fn cap_plus_one_appends_drop_the_first() {
        let cap = DEFAULT_HISTORY_CAP;
        let mut store = MemoryHistory::new(cap);
        for i in 0..=cap {
            store.record("Kyiv", entry(i as f64)).unwrap();
        }
        let recent = store.recent("Kyiv", cap + 1);
        assert_eq!(recent.len(), cap);
        assert_eq!(recent[0].temperature, 1.0);
    }

    #[test]
    fn recent_limits_and_keeps_chronological_order() {
        let mut store = MemoryHistory::new(10);
        for temp in [1.0, 2.0, 3.0, 4.0, 5.0] {
            store.record("Paris", entry(temp)).unwrap();
        }
        let recent = store.recent("Paris", 2);
        let temps: Vec<f64> = recent.iter().map(|e| e.temperature).collect();
        assert_eq!(temps, [4.0, 5.0]);
        assert!(store.recent("Unknown", 5).is_empty());
    }

    #[test]
    fn caps_are_per_city() {
        let mut store = MemoryHistory::new(2);
        for temp in [1.0, 2.0, 3.0] {
            store.record("London", entry(temp)).unwrap();
        }
        store.record("Paris", entry(9.0)).unwrap();
        assert_eq!(store.recent("London", 10).len(), 2);
        assert_eq!(store.recent("Paris", 10).len(), 1);
        assert_eq!(store.cities(), ["London", "Paris"]);
    }

    #[test]
    fn favorites_are_deduplicated() {
        let mut store = MemoryHistory::new(5);
        store.add_favorite("London").unwrap();
        store.add_favorite("London").unwrap();
        store.add_favorite("Paris").unwrap();
        assert_eq!(store.favorites(), ["London", "Paris"]);
        assert!(store.is_favorite("London"));

        store.remove_favorite("London").unwrap();
        assert!(!store.is_favorite("London"));
        assert_eq!(store.favorites(), ["Paris"]);
    }

    #[test]
    fn trend_statistics() {
        let entries = [entry(10.0), entry(14.0), entry(12.0)];
        assert_eq!(temperatures(&entries), [10.0, 14.0, 12.0]);
        assert_eq!(average_temperature(&entries), Some(12.0));
        assert_eq!(min_temperature(&entries), Some(10.0));
        assert_eq!(max_temperature(&entries), Some(14.0));
        assert_eq!(average_temperature(&[]), None);
    }

    #[test]
    fn file_history_round_trips_and_survives_corruption() {
        let path = std::env::temp_dir().join(format!("weathermate-history-{}.json", std::process::id()));
        let _ = fs::remove_file(&path);

        {
            let mut store = FileHistory::open(&path, 5);
            store.record("London", entry(18.0)).unwrap();
            store.add_favorite("London").unwrap();
        }
        {
            let store = FileHistory::open(&path, 5);
            assert_eq!(store.recent("London", 5).len(), 1);
            assert!(store.is_favorite("London"));
        }

        fs::write(&path, "{ not json").unwrap();
        let store = FileHistory::open(&path, 5);
        assert!(store.recent("London", 5).is_empty());
        assert!(store.favorites().is_empty());

        let _ = fs::remove_file(&path);
    }
}
