//! Side-by-side comparison of a handful of city snapshots.

use crate::model::{AirQualitySample, WeatherReading};

/// Comparing more cities than this stops being a comparison.
pub const MAX_COMPARED_CITIES: usize = 3;

/// A city's fetched state at comparison time.
#[derive(Debug, Clone)]
pub struct CitySnapshot {
    pub reading: WeatherReading,
    pub air_quality: Option<AirQualitySample>,
}

#[derive(Debug, Default)]
pub struct Comparison {
    cities: Vec<CitySnapshot>,
}

impl Comparison {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snapshot; returns false once [`MAX_COMPARED_CITIES`] is reached.
    pub fn add(&mut self, snapshot: CitySnapshot) -> bool {
        if self.cities.len() >= MAX_COMPARED_CITIES {
            return false;
        }
        self.cities.push(snapshot);
        true
    }

    pub fn remove(&mut self, city: &str) {
        self.cities.retain(|c| c.reading.city != city);
    }

    pub fn clear(&mut self) {
        self.cities.clear();
    }

    pub fn snapshots(&self) -> &[CitySnapshot] {
        &self.cities
    }

    pub fn city_names(&self) -> Vec<String> {
        self.cities.iter().map(|c| c.reading.city.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn warmest(&self) -> Option<&CitySnapshot> {
        self.cities.iter().max_by(|a, b| a.reading.temperature.total_cmp(&b.reading.temperature))
    }

    pub fn coldest(&self) -> Option<&CitySnapshot> {
        self.cities.iter().min_by(|a, b| a.reading.temperature.total_cmp(&b.reading.temperature))
    }

    pub fn most_humid(&self) -> Option<&CitySnapshot> {
        self.cities.iter().max_by_key(|c| c.reading.humidity_pct)
    }

    pub fn windiest(&self) -> Option<&CitySnapshot> {
        self.cities.iter().max_by(|a, b| a.reading.wind_speed.total_cmp(&b.reading.wind_speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(city: &str, temp: f64, humidity: u8, wind: f64) -> CitySnapshot {
        CitySnapshot {
            reading: WeatherReading {
                city: city.to_string(),
                observed_at: Utc::now(),
                temperature: temp,
                feels_like: temp,
                humidity_pct: humidity,
                wind_speed: wind,
                condition: "Clear Sky".to_string(),
                icon: "01d".to_string(),
            },
            air_quality: None,
        }
    }

    #[test]
    fn fourth_city_is_rejected() {
        let mut cmp = Comparison::new();
        assert!(cmp.add(snapshot("A", 10.0, 50, 1.0)));
        assert!(cmp.add(snapshot("B", 11.0, 51, 2.0)));
        assert!(cmp.add(snapshot("C", 12.0, 52, 3.0)));
        assert!(!cmp.add(snapshot("D", 13.0, 53, 4.0)));
        assert_eq!(cmp.snapshots().len(), MAX_COMPARED_CITIES);
    }

    #[test]
    fn superlatives() {
        let mut cmp = Comparison::new();
        cmp.add(snapshot("Oslo", 4.0, 80, 6.5));
        cmp.add(snapshot("Madrid", 31.0, 25, 2.0));
        cmp.add(snapshot("London", 17.0, 90, 4.0));

        assert_eq!(cmp.warmest().unwrap().reading.city, "Madrid");
        assert_eq!(cmp.coldest().unwrap().reading.city, "Oslo");
        assert_eq!(cmp.most_humid().unwrap().reading.city, "London");
        assert_eq!(cmp.windiest().unwrap().reading.city, "Oslo");
    }

    #[test]
    fn remove_and_empty() {
        let mut cmp = Comparison::new();
        assert!(cmp.is_empty());
        assert!(cmp.warmest().is_none());

        cmp.add(snapshot("Oslo", 4.0, 80, 6.5));
        cmp.remove("Oslo");
        assert!(cmp.is_empty());
    }
}
