use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Unit system passed through to the provider and used for display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Value of the `units` query parameter expected by OpenWeatherMap.
    pub fn api_value(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temp_label(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_label(self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "celsius" | "c" => Ok(Units::Metric),
            "imperial" | "fahrenheit" | "f" => Ok(Units::Imperial),
            other => Err(format!("unknown unit system '{other}' (expected 'metric' or 'imperial')")),
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_value())
    }
}

/// Geographic coordinates, validated to lie in range at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A single observed weather state for a city. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city: String,
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub condition: String,
    /// OpenWeatherMap icon code, e.g. "04d".
    pub icon: String,
}

/// One 3-hour forecast data point from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Provider-local naive timestamp; bucketing uses its calendar date.
    pub at: NaiveDateTime,
    pub temperature: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed: f64,
}

/// Daily summary derived from the 3-hourly entries of one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    /// Most frequent condition of the day; ties go to the first seen.
    pub condition: String,
    /// The day's 3-hourly entries, kept for the detail view.
    pub entries: Vec<ForecastEntry>,
}

/// OpenWeatherMap air quality index, a 1-5 health-severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiLevel {
    /// Map the numeric index to a level. Anything outside [1,5] is invalid.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            1 => Some(AqiLevel::Good),
            2 => Some(AqiLevel::Fair),
            3 => Some(AqiLevel::Moderate),
            4 => Some(AqiLevel::Poor),
            5 => Some(AqiLevel::VeryPoor),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            AqiLevel::Good => 1,
            AqiLevel::Fair => 2,
            AqiLevel::Moderate => 3,
            AqiLevel::Poor => 4,
            AqiLevel::VeryPoor => 5,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
        }
    }

    pub fn health_advice(self) -> &'static str {
        match self {
            AqiLevel::Good => "Air quality is satisfactory; enjoy outdoor activities.",
            AqiLevel::Fair => "Acceptable air quality; unusually sensitive people may notice mild effects.",
            AqiLevel::Moderate => {
                "Sensitive groups (children, elderly, respiratory conditions) should limit prolonged outdoor activity."
            }
            AqiLevel::Poor => {
                "Everyone may experience health effects; reduce prolonged outdoor activity and consider a mask outside."
            }
            AqiLevel::VeryPoor => {
                "Health alert: stay indoors if possible, keep windows closed, and wear an N95 mask outdoors."
            }
        }
    }
}

impl std::fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.index(), self.description())
    }
}

/// Pollutant concentrations in µg/m³ as reported by the air pollution endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pollutants {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

impl Pollutants {
    /// Labelled concentrations in display order.
    pub fn labelled(&self) -> [(&'static str, f64); 6] {
        [
            ("PM2.5", self.pm2_5),
            ("PM10", self.pm10),
            ("O3", self.o3),
            ("NO2", self.no2),
            ("SO2", self.so2),
            ("CO", self.co),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub level: AqiLevel,
    pub components: Pollutants,
}

/// Sunrise and sunset instants for a location.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl SunTimes {
    pub fn daylight(&self) -> TimeDelta {
        self.sunset - self.sunrise
    }
}

/// One recorded search result, stored per city in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub recorded_at: DateTime<Utc>,
    pub temperature: f64,
    pub condition: String,
}

/// Title-case each whitespace-separated word, as the provider descriptions
/// arrive all-lowercase ("scattered clouds" -> "Scattered Clouds").
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aqi_from_index_accepts_scale() {
        assert_eq!(AqiLevel::from_index(1), Some(AqiLevel::Good));
        assert_eq!(AqiLevel::from_index(5), Some(AqiLevel::VeryPoor));
        assert_eq!(AqiLevel::from_index(0), None);
        assert_eq!(AqiLevel::from_index(6), None);
    }

    #[test]
    fn aqi_display_pairs_index_and_description() {
        assert_eq!(AqiLevel::Fair.to_string(), "2 (Fair)");
    }

    #[test]
    fn units_parse_aliases() {
        assert_eq!("celsius".parse::<Units>().unwrap(), Units::Metric);
        assert_eq!("F".parse::<Units>().unwrap(), Units::Imperial);
        assert!("kelvin".parse::<Units>().is_err());
    }

    #[test]
    fn title_case_normalizes_descriptions() {
        assert_eq!(title_case("scattered clouds"), "Scattered Clouds");
        assert_eq!(title_case("light rain"), "Light Rain");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn daylight_spans_sunrise_to_sunset() {
        let sunrise = DateTime::parse_from_rfc3339("2024-06-01T04:30:00+00:00")
            .unwrap()
            .with_timezone(&Utc);
        let sunset = DateTime::parse_from_rfc3339("2024-06-01T19:45:00+00:00")
            .unwrap()
            .with_timezone(&Utc);
        let sun = SunTimes { sunrise, sunset };
        assert_eq!(sun.daylight().num_minutes(), 15 * 60 + 15);
    }
}
