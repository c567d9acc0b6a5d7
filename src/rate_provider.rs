//! Provides exchange rate acquisition for the conversion service.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetch the USD-based rates for `date_key`, either the literal "latest"
    /// or a calendar date in YYYY-MM-DD form.
    async fn fetch_rates(&self, date_key: &str) -> Result<HashMap<String, f64>>;
}
