//! Plain-text rendering of core models for the terminal.

use chrono::TimeDelta;
use weathermate_core::{
    AirQualitySample, Comparison, ForecastDay, HistoryEntry, SunTimes, Units, WeatherReading,
    history,
};

pub fn current(
    reading: &WeatherReading,
    units: Units,
    air: Option<&AirQualitySample>,
    sun: Option<&SunTimes>,
) -> String {
    let mut out = format!("Current weather for {}:\n", reading.city);
    out.push_str(&format!("  Condition:   {}\n", reading.condition));
    out.push_str(&format!("  Temperature: {:.1} {}\n", reading.temperature, units.temp_label()));
    out.push_str(&format!("  Feels like:  {:.1} {}\n", reading.feels_like, units.temp_label()));
    out.push_str(&format!("  Humidity:    {}%\n", reading.humidity_pct));
    out.push_str(&format!("  Wind speed:  {:.1} {}\n", reading.wind_speed, units.wind_label()));

    match air {
        Some(sample) => out.push_str(&format!("  Air quality: {}\n", sample.level)),
        None => out.push_str("  Air quality: unavailable\n"),
    }
    if let Some(sun) = sun {
        out.push_str(&format!(
            "  Sunrise:     {} UTC   Sunset: {} UTC   Daylight: {}\n",
            sun.sunrise.format("%H:%M:%S"),
            sun.sunset.format("%H:%M:%S"),
            daylight(sun.daylight()),
        ));
    }
    out
}

pub fn forecast_summary(days: &[ForecastDay], units: Units) -> String {
    if days.is_empty() {
        return "No forecast data available.\n".to_string();
    }

    let mut out = String::from("\n5-day forecast:\n");
    for day in days {
        out.push_str(&format!(
            "  {}  {:5.1}{t} .. {:5.1}{t}  {}\n",
            day.date,
            day.min_temp,
            day.max_temp,
            day.condition,
            t = units.temp_label(),
        ));
    }
    out
}

pub fn forecast_hourly(day: &ForecastDay, units: Units) -> String {
    let mut out = format!("Forecast for {} ({}):\n", day.date, day.condition);
    for entry in &day.entries {
        out.push_str(&format!(
            "  {}  {:5.1} {}  {:3}%  {:.1} {}  {}\n",
            entry.at.format("%H:%M"),
            entry.temperature,
            units.temp_label(),
            entry.humidity_pct,
            entry.wind_speed,
            units.wind_label(),
            entry.condition,
        ));
    }
    out
}

pub fn air_report(city: &str, sample: &AirQualitySample) -> String {
    let mut out = format!("Air quality report for {city}:\n");
    out.push_str(&format!("  Index:  {}\n", sample.level));
    out.push_str(&format!("  Advice: {}\n", sample.level.health_advice()));
    out.push_str("  Pollutants (µg/m³):\n");
    for (label, value) in sample.components.labelled() {
        out.push_str(&format!("    {label:<6} {value:.2}\n"));
    }
    out
}

pub fn sun_info(city: &str, sun: &SunTimes) -> String {
    format!(
        "Sun times for {city} (UTC):\n  Sunrise:  {}\n  Sunset:   {}\n  Daylight: {}\n",
        sun.sunrise.format("%H:%M:%S"),
        sun.sunset.format("%H:%M:%S"),
        daylight(sun.daylight()),
    )
}

pub fn history_report(city: &str, entries: &[HistoryEntry], units: Units) -> String {
    let mut out = format!("Recent readings for {city}:\n");
    for entry in entries {
        out.push_str(&format!(
            "  {}  {:5.1} {}  {}\n",
            entry.recorded_at.format("%Y-%m-%d %H:%M"),
            entry.temperature,
            units.temp_label(),
            entry.condition,
        ));
    }

    if let (Some(avg), Some(min), Some(max)) = (
        history::average_temperature(entries),
        history::min_temperature(entries),
        history::max_temperature(entries),
    ) {
        out.push_str(&format!(
            "  Trend: avg {avg:.1}{t}, min {min:.1}{t}, max {max:.1}{t}\n",
            t = units.temp_label()
        ));
    }
    out
}

pub fn comparison(cmp: &Comparison, units: Units) -> String {
    let mut out = String::from("Weather comparison:\n");
    for (i, snap) in cmp.snapshots().iter().enumerate() {
        let r = &snap.reading;
        out.push_str(&format!("  [{}] {}\n", i + 1, r.city));
        out.push_str(&format!("      {:.1} {}, {}\n", r.temperature, units.temp_label(), r.condition));
        out.push_str(&format!(
            "      humidity {}%, wind {:.1} {}\n",
            r.humidity_pct,
            r.wind_speed,
            units.wind_label()
        ));
        match &snap.air_quality {
            Some(sample) => out.push_str(&format!("      AQI {}\n", sample.level)),
            None => out.push_str("      AQI unavailable\n"),
        }
    }

    let superlatives = [
        ("Warmest", cmp.warmest()),
        ("Coldest", cmp.coldest()),
        ("Most humid", cmp.most_humid()),
        ("Windiest", cmp.windiest()),
    ];
    for (label, snap) in superlatives {
        if let Some(snap) = snap {
            out.push_str(&format!("  {label}: {}\n", snap.reading.city));
        }
    }
    out
}

fn daylight(delta: TimeDelta) -> String {
    let minutes = delta.num_minutes();
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}
