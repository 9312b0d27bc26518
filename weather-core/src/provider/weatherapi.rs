use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::WeatherApiConfig,
    error::{AlertError, AlertResult},
    model::Forecast,
    provider::truncate_body,
};

use super::ForecastProvider;

const FETCH_FAILED: &str = "Error consultando el clima";

/// WeatherAPI.com `forecast.json` client.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    url: String,
    days: u8,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(config: &WeatherApiConfig) -> AlertResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AlertError::Internal(e.into()))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            url: config.url.clone(),
            days: config.days,
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    code: i64,
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: WaForecast,
}

/// Condition of the first forecast day, date of the second.
fn forecast_from_response(parsed: WaForecastResponse) -> AlertResult<Forecast> {
    let mut days = parsed.forecast.forecastday.into_iter();
    let (Some(first), Some(second)) = (days.next(), days.next()) else {
        warn!("WeatherAPI response contained fewer than two forecast days");
        return Err(AlertError::weather_api(FETCH_FAILED));
    };

    Ok(Forecast {
        code: first.day.condition.code,
        condition: first.day.condition.text,
        date: second.date,
    })
}

#[async_trait]
impl ForecastProvider for WeatherApiProvider {
    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> AlertResult<Forecast> {
        let q = format!("{latitude},{longitude}");
        let days = self.days.to_string();

        let res = self
            .http
            .get(&self.url)
            .query(&[("key", self.api_key.as_str()), ("q", q.as_str()), ("days", days.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to send request to WeatherAPI.com (forecast)");
                AlertError::weather_api(FETCH_FAILED)
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            warn!(error = %e, "Failed to read WeatherAPI forecast response body");
            AlertError::weather_api(FETCH_FAILED)
        })?;

        if !status.is_success() {
            warn!(%status, body = %truncate_body(&body), "WeatherAPI forecast request failed");
            return Err(AlertError::weather_api(FETCH_FAILED));
        }

        let parsed: WaForecastResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body = %truncate_body(&body),
                "Failed to parse WeatherAPI forecast JSON"
            );
            AlertError::weather_api(FETCH_FAILED)
        })?;

        let forecast = forecast_from_response(parsed)?;
        debug!(code = forecast.code, date = %forecast.date, "forecast fetched");
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> WeatherApiProvider {
        let cfg = WeatherApiConfig {
            api_key: "test_key".into(),
            url: format!("{}/v1/forecast.json", server.uri()),
            days: 2,
            timeout_secs: 5,
        };
        WeatherApiProvider::new(&cfg).expect("client builds")
    }

    fn two_day_body(code: i64, text: &str) -> serde_json::Value {
        json!({
            "location": {"name": "San José"},
            "forecast": {
                "forecastday": [
                    {"date": "2025-04-07", "day": {"condition": {"code": code, "text": text}}},
                    {"date": "2025-04-08", "day": {"condition": {"code": 1000, "text": "Sunny"}}}
                ]
            }
        })
    }

    #[tokio::test]
    async fn sends_key_coordinates_and_depth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast.json"))
            .and(query_param("key", "test_key"))
            .and(query_param("q", "10,-84.5"))
            .and(query_param("days", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(two_day_body(1276, "Heavy Rain")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let forecast = provider_for(&server).fetch_forecast(10.0, -84.5).await.unwrap();

        assert_eq!(forecast.code, 1276);
        assert_eq!(forecast.condition, "Heavy Rain");
    }

    #[tokio::test]
    async fn date_comes_from_second_day() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(two_day_body(1195, "Heavy rain")),
            )
            .mount(&server)
            .await;

        let forecast = provider_for(&server).fetch_forecast(5.07, -75.52).await.unwrap();

        assert_eq!(forecast.code, 1195);
        assert_eq!(forecast.date, "2025-04-08");
    }

    #[tokio::test]
    async fn non_success_status_is_weather_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"bad key\"}"))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_forecast(1.0, 2.0).await.unwrap_err();

        assert!(err.is_upstream());
        assert_eq!(err.to_string(), "Error consultando el clima");
    }

    #[tokio::test]
    async fn single_day_payload_is_weather_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "forecast": {"forecastday": [
                    {"date": "2025-04-07", "day": {"condition": {"code": 1000, "text": "Sunny"}}}
                ]}
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_forecast(1.0, 2.0).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn malformed_payload_is_weather_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch_forecast(1.0, 2.0).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn unreachable_host_is_weather_api_error() {
        let cfg = WeatherApiConfig {
            api_key: "k".into(),
            url: "http://127.0.0.1:9/v1/forecast.json".into(),
            days: 2,
            timeout_secs: 2,
        };
        let provider = WeatherApiProvider::new(&cfg).expect("client builds");

        let err = provider.fetch_forecast(1.0, 2.0).await.unwrap_err();
        assert!(err.is_upstream());
    }
}
