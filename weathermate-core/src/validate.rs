//! Structural validation of raw provider responses.
//!
//! Every response body is checked field by field before a typed model is
//! built, so a malformed payload surfaces as a descriptive error naming the
//! offending path instead of a panic deeper in the pipeline.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::model::{
    AirQualitySample, AqiLevel, Coordinates, ForecastEntry, Pollutants, SunTimes, WeatherReading,
    title_case,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field '{path}'")]
    MissingField { path: String },

    #[error("field '{path}' should be {expected}, got {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field '{path}' out of range: {detail}")]
    OutOfRange { path: String, detail: String },

    #[error("array '{path}' is empty")]
    EmptyArray { path: String },
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() { key.to_string() } else { format!("{path}.{key}") }
}

/// Fetch `key` from an object, with the full path in any error.
fn member<'a>(value: &'a Value, path: &str, key: &str) -> Result<&'a Value, ValidationError> {
    let Value::Object(map) = value else {
        return Err(ValidationError::WrongType {
            path: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
            expected: "object",
            found: kind(value),
        });
    };
    map.get(key).ok_or_else(|| ValidationError::MissingField { path: join(path, key) })
}

fn number(value: &Value, path: &str) -> Result<f64, ValidationError> {
    value.as_f64().ok_or_else(|| ValidationError::WrongType {
        path: path.to_string(),
        expected: "number",
        found: kind(value),
    })
}

fn integer(value: &Value, path: &str) -> Result<i64, ValidationError> {
    value.as_i64().ok_or_else(|| ValidationError::WrongType {
        path: path.to_string(),
        expected: "integer",
        found: kind(value),
    })
}

fn string<'a>(value: &'a Value, path: &str) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or_else(|| ValidationError::WrongType {
        path: path.to_string(),
        expected: "string",
        found: kind(value),
    })
}

fn non_empty_array<'a>(value: &'a Value, path: &str) -> Result<&'a [Value], ValidationError> {
    let Value::Array(items) = value else {
        return Err(ValidationError::WrongType {
            path: path.to_string(),
            expected: "array",
            found: kind(value),
        });
    };
    if items.is_empty() {
        return Err(ValidationError::EmptyArray { path: path.to_string() });
    }
    Ok(items)
}

/// Validate a current-weather body and build a [`WeatherReading`].
///
/// `city` is the name the user searched for; the provider's own `name` field
/// wins when present so the displayed spelling matches the match.
pub fn current_weather(city: &str, body: &Value) -> Result<WeatherReading, ValidationError> {
    let main = member(body, "", "main")?;
    let temperature = number(member(main, "main", "temp")?, "main.temp")?;
    let feels_like = main
        .get("feels_like")
        .map(|v| number(v, "main.feels_like"))
        .transpose()?
        .unwrap_or(temperature);
    let humidity = number(member(main, "main", "humidity")?, "main.humidity")?;

    let weather = non_empty_array(member(body, "", "weather")?, "weather")?;
    let first = &weather[0];
    let description = string(member(first, "weather[0]", "description")?, "weather[0].description")?;
    let icon = string(member(first, "weather[0]", "icon")?, "weather[0].icon")?;

    let wind = member(body, "", "wind")?;
    let wind_speed = number(member(wind, "wind", "speed")?, "wind.speed")?;

    let observed_at = body
        .get("dt")
        .and_then(Value::as_i64)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);

    let name = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or(city);

    Ok(WeatherReading {
        city: name.to_string(),
        observed_at,
        temperature,
        feels_like,
        humidity_pct: humidity.clamp(0.0, 100.0).round() as u8,
        wind_speed,
        condition: title_case(description),
        icon: icon.to_string(),
    })
}

/// Validate the `coord` section of a current-weather body.
pub fn coordinates(body: &Value) -> Result<Coordinates, ValidationError> {
    let coord = member(body, "", "coord")?;
    let lat = number(member(coord, "coord", "lat")?, "coord.lat")?;
    let lon = number(member(coord, "coord", "lon")?, "coord.lon")?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::OutOfRange {
            path: "coord.lat".to_string(),
            detail: format!("latitude {lat} is not in -90..=90"),
        });
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ValidationError::OutOfRange {
            path: "coord.lon".to_string(),
            detail: format!("longitude {lon} is not in -180..=180"),
        });
    }

    Ok(Coordinates { lat, lon })
}

/// Validate an air-pollution body. The index must sit on the 1-5 scale.
pub fn air_quality(body: &Value) -> Result<AirQualitySample, ValidationError> {
    let list = non_empty_array(member(body, "", "list")?, "list")?;
    let item = &list[0];
    let main = member(item, "list[0]", "main")?;
    let index = integer(member(main, "list[0].main", "aqi")?, "list[0].main.aqi")?;

    let level = AqiLevel::from_index(index).ok_or_else(|| ValidationError::OutOfRange {
        path: "list[0].main.aqi".to_string(),
        detail: format!("{index} is not in 1..=5"),
    })?;

    let components = item
        .get("components")
        .cloned()
        .and_then(|c| serde_json::from_value::<Pollutants>(c).ok())
        .unwrap_or_default();

    Ok(AirQualitySample { level, components })
}

/// Validate a 5-day forecast body and extract its 3-hourly entries.
///
/// The first entry is checked strictly so a broken response yields a named
/// error; the rest are parsed leniently, with malformed entries skipped.
pub fn forecast(body: &Value) -> Result<Vec<ForecastEntry>, ValidationError> {
    let list = non_empty_array(member(body, "", "list")?, "list")?;

    let first = &list[0];
    string(member(first, "list[0]", "dt_txt")?, "list[0].dt_txt")?;
    let main = member(first, "list[0]", "main")?;
    number(member(main, "list[0].main", "temp")?, "list[0].main.temp")?;
    let weather = non_empty_array(member(first, "list[0]", "weather")?, "list[0].weather")?;
    string(
        member(&weather[0], "list[0].weather[0]", "description")?,
        "list[0].weather[0].description",
    )?;

    let entries: Vec<ForecastEntry> = list.iter().filter_map(forecast_entry).collect();
    if entries.is_empty() {
        return Err(ValidationError::EmptyArray { path: "list".to_string() });
    }

    Ok(entries)
}

fn forecast_entry(entry: &Value) -> Option<ForecastEntry> {
    let at = NaiveDateTime::parse_from_str(entry.get("dt_txt")?.as_str()?, "%Y-%m-%d %H:%M:%S").ok()?;
    let main = entry.get("main")?;
    let temperature = main.get("temp")?.as_f64()?;
    let humidity = main.get("humidity").and_then(Value::as_f64).unwrap_or(0.0);
    let description = entry.get("weather")?.get(0)?.get("description")?.as_str()?;
    let wind_speed = entry
        .get("wind")
        .and_then(|w| w.get("speed"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    Some(ForecastEntry {
        at,
        temperature,
        condition: title_case(description),
        humidity_pct: humidity.clamp(0.0, 100.0).round() as u8,
        wind_speed,
    })
}

/// Validate a Sunrise-Sunset.org body (`formatted=0` payloads only).
pub fn sun_times(body: &Value) -> Result<SunTimes, ValidationError> {
    let status = string(member(body, "", "status")?, "status")?;
    if status != "OK" {
        return Err(ValidationError::OutOfRange {
            path: "status".to_string(),
            detail: format!("expected 'OK', got '{status}'"),
        });
    }

    let results = member(body, "", "results")?;
    let sunrise = iso_instant(member(results, "results", "sunrise")?, "results.sunrise")?;
    let sunset = iso_instant(member(results, "results", "sunset")?, "results.sunset")?;

    Ok(SunTimes { sunrise, sunset })
}

fn iso_instant(value: &Value, path: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = string(value, path)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::OutOfRange {
            path: path.to_string(),
            detail: format!("'{raw}' is not an ISO-8601 timestamp"),
        })
}
