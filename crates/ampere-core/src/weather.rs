//! Optional weather enrichment for bill predictions.
//!
//! Enrichment improves a prompt but is never required for a result, so the
//! source returns `Option` rather than `Result`. Every failure (no API key,
//! network error, unknown city, unexpected body) is logged and becomes `None`.

use crate::config::WeatherConfig;
use crate::error::AgentError;
use crate::llm::resolve_env_var;
use crate::types::WeatherSnapshot;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// A source of current weather conditions.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions for `city`, or `None` when unavailable for any reason.
    async fn fetch(&self, city: &str) -> Option<WeatherSnapshot>;
}

/// OpenWeatherMap client: geocodes the city, then reads current conditions.
pub struct OpenWeatherClient {
    endpoint: String,
    api_key: Option<String>,
    country: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenWeatherClient {
    pub fn new(endpoint: &str, api_key: Option<String>, country: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            country: country.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from config, resolving `${ENV_VAR}` in the key.
    /// An unset key yields a client that always returns `None`.
    pub fn from_config(config: &WeatherConfig) -> Self {
        Self::new(
            &config.endpoint,
            resolve_env_var(&config.api_key),
            &config.country,
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn lookup(&self, api_key: &str, city: &str) -> Result<WeatherSnapshot, AgentError> {
        let query = if self.country.is_empty() {
            city.to_string()
        } else {
            format!("{city},{}", self.country)
        };

        let places: Vec<GeoPlace> = self
            .get_json(
                "/geo/1.0/direct",
                &[("q", query.as_str()), ("limit", "1"), ("appid", api_key)],
            )
            .await?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::transport(format!("no geocoding match for '{city}'")))?;

        let lat = place.lat.to_string();
        let lon = place.lon.to_string();
        let current: CurrentWeather = self
            .get_json(
                "/data/2.5/weather",
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", api_key),
                    ("units", "metric"),
                ],
            )
            .await?;

        let description = current
            .weather
            .into_iter()
            .next()
            .map(|condition| condition.description)
            .ok_or_else(|| AgentError::transport("weather response has no conditions"))?;

        Ok(WeatherSnapshot {
            temperature: current.main.temp,
            humidity: current.main.humidity,
            description,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AgentError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.endpoint))
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                AgentError::transport(format!("weather request failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AgentError::Transport {
                message: format!("weather HTTP {status} for {path}"),
                status_code: Some(status.as_u16()),
            });
        }

        resp.json()
            .await
            .map_err(|e| {
                AgentError::transport(format!("unexpected weather response: {}", e.without_url()))
            })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Option<WeatherSnapshot> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("No weather API key configured, skipping enrichment");
            return None;
        };

        match self.lookup(api_key, city).await {
            Ok(snapshot) => {
                tracing::debug!(
                    city,
                    temperature = snapshot.temperature,
                    humidity = snapshot.humidity,
                    "Fetched current weather"
                );
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!("Weather enrichment unavailable for {city}: {e}");
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct GeoPlace {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct CurrentWeather {
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_yields_none_without_network() {
        // Unroutable endpoint: any request attempt would fail loudly in the log,
        // but the missing key must short-circuit first.
        let client = OpenWeatherClient::new("http://127.0.0.1:9", None, "IN", Duration::from_millis(50));
        assert!(!client.has_credential());
        assert!(client.fetch("Mumbai").await.is_none());
    }

    #[tokio::test]
    async fn test_blank_key_counts_as_missing() {
        let client = OpenWeatherClient::new(
            "http://127.0.0.1:9",
            Some("   ".to_string()),
            "IN",
            Duration::from_millis(50),
        );
        assert!(!client.has_credential());
        assert!(client.fetch("Pune").await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_none() {
        let client = OpenWeatherClient::new(
            "http://127.0.0.1:9",
            Some("key".to_string()),
            "IN",
            Duration::from_millis(200),
        );
        assert!(client.fetch("Delhi").await.is_none());
    }

    #[tokio::test]
    async fn test_lookup_error_does_not_leak_key() {
        let client = OpenWeatherClient::new(
            "http://127.0.0.1:9",
            Some("SECRET-WEATHER-KEY".to_string()),
            "IN",
            Duration::from_millis(200),
        );
        let err = client.lookup("SECRET-WEATHER-KEY", "Delhi").await.unwrap_err();
        assert!(err.to_string().starts_with("weather request failed"));
        assert!(!err.to_string().contains("SECRET-WEATHER-KEY"));
    }

    #[test]
    fn test_from_config_unset_env_var() {
        let config = WeatherConfig {
            api_key: "${AMPERE_TEST_UNSET_WEATHER_KEY_41}".to_string(),
            ..WeatherConfig::default()
        };
        assert!(!OpenWeatherClient::from_config(&config).has_credential());
    }
}
