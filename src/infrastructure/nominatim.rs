// Nominatim reverse-geocoding client
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::application::geocode_service::ReverseGeocoder;
use crate::infrastructure::config::GeocoderSettings;

#[derive(Debug, Clone)]
pub struct NominatimClient {
    base_url: String,
    language: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: Option<String>,
    // Nominatim reports "Unable to geocode" through this field with a
    // 200 status.
    #[serde(default)]
    error: Option<String>,
}

impl NominatimClient {
    pub fn new(settings: &GeocoderSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("failed to build geocoder http client")?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            language: settings.language.clone(),
            client,
        })
    }

    fn build_reverse_url(&self, lat: f64, lon: f64) -> String {
        let language = urlencoding::encode(&self.language);
        format!(
            "{}/reverse?lat={lat}&lon={lon}&format=jsonv2&accept-language={language}",
            self.base_url
        )
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        let url = self.build_reverse_url(lat, lon);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("failed to send reverse geocode request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("reverse geocode failed with status {status}: {body}");
        }

        let data = response
            .json::<ReverseResponse>()
            .await
            .context("failed to parse reverse geocode response")?;

        if data.error.is_some() {
            return Ok(None);
        }
        Ok(data.display_name)
    }
}
