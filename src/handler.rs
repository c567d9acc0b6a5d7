use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::RateCache;
use crate::error::ConvertError;
use crate::message::{ConversionRequest, ConversionResponse};
use crate::rate_provider::RateProvider;

/// Validates requests, resolves rates through the cache and provider, and
/// computes the converted amount. `handle` never fails outward: every failure
/// becomes an error-variant response.
pub struct ConversionHandler {
    provider: Arc<dyn RateProvider>,
    cache: RateCache,
}

impl ConversionHandler {
    pub fn new(provider: Arc<dyn RateProvider>, cache: RateCache) -> Self {
        Self { provider, cache }
    }

    pub async fn handle(&self, request: ConversionRequest) -> ConversionResponse {
        match self.convert(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request failed: {e}");
                ConversionResponse::Error {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionResponse, ConvertError> {
        let to_currency = match request.to_currency {
            Some(c) if !c.is_empty() => c,
            _ => return Err(ConvertError::MissingField),
        };
        let amount = request.amount.ok_or(ConvertError::MissingField)?;

        if let Some(date) = request.date.as_deref() {
            NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ConvertError::InvalidDate)?;
        }
        let date_key = request.date.as_deref().unwrap_or("latest");

        let rates = self.resolve_rates(date_key).await?;

        let rate = *rates
            .get(&to_currency)
            .ok_or_else(|| ConvertError::UnsupportedCurrency {
                currency: to_currency.clone(),
                date: date_key.to_string(),
            })?;

        Ok(ConversionResponse::Success {
            converted_amount: amount * rate,
            rate,
            date: date_key.to_string(),
        })
    }

    async fn resolve_rates(&self, date_key: &str) -> Result<HashMap<String, f64>, ConvertError> {
        if let Some(rates) = self.cache.get(date_key, Utc::now()).await {
            return Ok(rates);
        }

        debug!("Fetching rates for {date_key}...");
        let rates = self
            .provider
            .fetch_rates(date_key)
            .await
            .map_err(|e| ConvertError::Provider(e.to_string()))?;
        self.cache.put(date_key, rates.clone(), Utc::now()).await;
        Ok(rates)
    }
}
