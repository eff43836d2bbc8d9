use serde::Deserialize;
use std::time::Duration;

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

// Berlin, matching the app's launch market. Overridable per deployment.
const DEFAULT_LAT: f64 = 52.52;
const DEFAULT_LON: f64 = 13.405;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i32,
}

fn describe_code(code: i32) -> &'static str {
    match code {
        0 => "clear sky",
        1..=3 => "partly cloudy",
        45 | 48 => "foggy",
        51..=57 => "drizzle",
        61..=67 => "rain",
        71..=77 => "snow",
        80..=82 => "rain showers",
        85 | 86 => "snow showers",
        95..=99 => "thunderstorms",
        _ => "mixed conditions",
    }
}

fn configured_coords() -> (f64, f64) {
    let lat = std::env::var("WEATHER_LAT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LAT);
    let lon = std::env::var("WEATHER_LON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LON);
    (lat, lon)
}

/// Short weather summary for the insight text, or `None` if the lookup
/// fails for any reason. Never an error: weather is flavor, not data.
pub async fn fetch_weather_summary() -> Option<String> {
    let (lat, lon) = configured_coords();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .ok()?;

    let response = client
        .get(OPEN_METEO_URL)
        .query(&[
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("current_weather", "true".to_string()),
        ])
        .send()
        .await
        .map_err(|e| tracing::warn!("🌧️ Weather lookup failed: {}", e))
        .ok()?;

    let forecast: ForecastResponse = response
        .json()
        .await
        .map_err(|e| tracing::warn!("🌧️ Weather response unreadable: {}", e))
        .ok()?;

    forecast.current_weather.map(summarize)
}

fn summarize(current: CurrentWeather) -> String {
    format!(
        "{}, {}°C",
        describe_code(current.weathercode),
        current.temperature.round() as i64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reads_naturally() {
        let current = CurrentWeather { temperature: 20.6, weathercode: 0 };
        assert_eq!(summarize(current), "clear sky, 21°C");
    }

    #[test]
    fn unknown_codes_still_describe_something() {
        assert_eq!(describe_code(42), "mixed conditions");
        assert_eq!(describe_code(63), "rain");
    }
}
