//! Current weather lookup via Open-Meteo.

use super::{FieldSpec, FieldValue, InputSchema, Tool, ToolInput};
use crate::error::ToolError;
use crate::http::{endpoint, fetch_json};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

const SERVICE: &str = "Open-Meteo";

/// Reports current conditions for a named place.
pub struct WeatherTool {
    http: reqwest::Client,
    geocoding_base: String,
    forecast_base: String,
    schema: InputSchema,
}

/// A geocoded place.
#[derive(Debug, Clone, PartialEq)]
struct Place {
    name: String,
    region: Option<String>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl Place {
    fn label(&self) -> String {
        [Some(self.name.as_str()), self.region.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl WeatherTool {
    pub fn new(http: reqwest::Client, geocoding_base: &str, forecast_base: &str) -> Self {
        Self {
            http,
            geocoding_base: geocoding_base.to_string(),
            forecast_base: forecast_base.to_string(),
            schema: InputSchema::new(vec![
                FieldSpec::text("location", "City or place name, e.g. \"Oslo\"").required(),
                FieldSpec::text("units", "\"celsius\" or \"fahrenheit\"")
                    .with_default(FieldValue::Text("celsius".to_string())),
            ]),
        }
    }

    #[instrument(skip(self))]
    async fn geocode(&self, location: &str) -> Result<Place, ToolError> {
        let request = self
            .http
            .get(endpoint(&self.geocoding_base, "search"))
            .query(&[("name", location), ("count", "1"), ("language", "en"), ("format", "json")]);

        let raw = fetch_json(request, SERVICE)
            .await
            .map_err(ToolError::execution)?;

        parse_place(&raw)
            .ok_or_else(|| ToolError::Execution(format!("No location found for '{}'", location)))
    }

    async fn current(&self, place: &Place, units: &str) -> Result<Value, ToolError> {
        let latitude = place.latitude.to_string();
        let longitude = place.longitude.to_string();
        let request = self
            .http
            .get(endpoint(&self.forecast_base, "forecast"))
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                (
                    "current",
                    "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code",
                ),
                ("temperature_unit", units),
            ]);

        fetch_json(request, SERVICE)
            .await
            .map_err(ToolError::execution)
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "weather"
    }

    fn description(&self) -> &str {
        "Get the current weather for a city or place."
    }

    fn input_schema(&self) -> &InputSchema {
        &self.schema
    }

    async fn invoke(&self, input: ToolInput) -> Result<String, ToolError> {
        let location = input.require_text("location")?;
        let units = input.text("units").unwrap_or("celsius").to_lowercase();
        if units != "celsius" && units != "fahrenheit" {
            return Err(ToolError::InvalidInput(format!(
                "units must be \"celsius\" or \"fahrenheit\", got \"{}\"",
                units
            )));
        }

        let place = self.geocode(location).await?;
        debug!("Resolved '{}' to {:?}", location, place);

        let forecast = self.current(&place, &units).await?;
        format_current(&place, &forecast)
    }
}

fn parse_place(raw: &Value) -> Option<Place> {
    let first = raw.get("results")?.as_array()?.first()?;
    Some(Place {
        name: first.get("name")?.as_str()?.to_string(),
        region: first.get("admin1").and_then(Value::as_str).map(str::to_string),
        country: first.get("country").and_then(Value::as_str).map(str::to_string),
        latitude: first.get("latitude")?.as_f64()?,
        longitude: first.get("longitude")?.as_f64()?,
    })
}

fn format_current(place: &Place, forecast: &Value) -> Result<String, ToolError> {
    let current = forecast
        .get("current")
        .ok_or_else(|| ToolError::Execution("Weather response had no current conditions".to_string()))?;
    let units = forecast.get("current_units");
    let unit = |key: &str, fallback: &str| -> String {
        units
            .and_then(|u| u.get(key))
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string()
    };

    let mut parts = Vec::new();
    if let Some(code) = current.get("weather_code").and_then(Value::as_i64) {
        parts.push(describe_weather_code(code).to_string());
    }
    if let Some(temp) = current.get("temperature_2m").and_then(Value::as_f64) {
        parts.push(format!("{:.1}{}", temp, unit("temperature_2m", "°C")));
    }
    if let Some(humidity) = current.get("relative_humidity_2m").and_then(Value::as_f64) {
        parts.push(format!("humidity {:.0}{}", humidity, unit("relative_humidity_2m", "%")));
    }
    if let Some(wind) = current.get("wind_speed_10m").and_then(Value::as_f64) {
        parts.push(format!("wind {:.1} {}", wind, unit("wind_speed_10m", "km/h")));
    }

    if parts.is_empty() {
        return Err(ToolError::Execution(format!(
            "No current conditions reported for {}",
            place.label()
        )));
    }

    Ok(format!("Current weather in {}: {}", place.label(), parts.join(", ")))
}

/// WMO weather interpretation codes.
fn describe_weather_code(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown conditions",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn tool_against(server: &MockServer) -> WeatherTool {
        let http = crate::http::build_client(Duration::from_secs(5)).unwrap();
        WeatherTool::new(
            http,
            &format!("{}/geo", server.uri()),
            &format!("{}/wx", server.uri()),
        )
    }

    #[test]
    fn test_weather_codes() {
        assert_eq!(describe_weather_code(0), "Clear sky");
        assert_eq!(describe_weather_code(81), "Rain showers");
        assert_eq!(describe_weather_code(1234), "Unknown conditions");
    }

    #[test]
    fn test_parse_place_requires_coordinates() {
        assert!(parse_place(&json!({"results": [{"name": "Nowhere"}]})).is_none());
        assert!(parse_place(&json!({"generationtime_ms": 0.3})).is_none());

        let place = parse_place(&json!({"results": [
            {"name": "Oslo", "country": "Norway", "latitude": 59.91, "longitude": 10.75}
        ]}))
        .unwrap();
        assert_eq!(place.label(), "Oslo, Norway");
    }

    #[tokio::test]
    async fn test_invoke_reports_current_conditions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/search"))
            .and(query_param("name", "Oslo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [
                {"name": "Oslo", "admin1": "Oslo County", "country": "Norway", "latitude": 59.91, "longitude": 10.75}
            ]})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wx/forecast"))
            .and(query_param("temperature_unit", "celsius"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current_units": {"temperature_2m": "°C", "relative_humidity_2m": "%", "wind_speed_10m": "km/h"},
                "current": {"temperature_2m": 4.2, "relative_humidity_2m": 81, "wind_speed_10m": 12.0, "weather_code": 3}
            })))
            .mount(&server)
            .await;

        let tool = tool_against(&server).await;
        let input = tool.input_schema().validate("Oslo").unwrap();
        let out = tool.invoke(input).await.unwrap();
        assert_eq!(
            out,
            "Current weather in Oslo, Oslo County, Norway: Overcast, 4.2°C, humidity 81%, wind 12.0 km/h"
        );
    }

    #[tokio::test]
    async fn test_invoke_unknown_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let tool = tool_against(&server).await;
        let input = tool.input_schema().validate("Atlantis").unwrap();
        let err = tool.invoke(input).await.unwrap_err();
        assert_eq!(err.to_string(), "No location found for 'Atlantis'");
    }

    #[tokio::test]
    async fn test_invoke_rejects_bad_units() {
        let server = MockServer::start().await;
        let tool = tool_against(&server).await;
        let input = tool
            .input_schema()
            .validate(r#"{"location": "Oslo", "units": "kelvin"}"#)
            .unwrap();
        assert!(matches!(
            tool.invoke(input).await,
            Err(ToolError::InvalidInput(_))
        ));
    }
}
