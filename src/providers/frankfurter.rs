use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::rate_provider::RateProvider;

// FrankfurterProvider implementation for RateProvider
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("currencyd/0.1")
            .timeout(timeout)
            .build()?;
        Ok(FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Deserialize, Debug)]
struct FrankfurterResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(
        name = "FrankfurterFetch",
        skip(self),
        fields(date_key = %date_key)
    )]
    async fn fetch_rates(&self, date_key: &str) -> Result<HashMap<String, f64>> {
        let url = format!("{}/{}?from=USD", self.base_url, date_key);
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for date: {}", e, date_key))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for date: {}",
                response.status(),
                date_key
            ));
        }

        let text = response.text().await?;

        let data: FrankfurterResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Malformed rate payload for {}: {}", date_key, e))?;

        Ok(data.rates)
    }
}
