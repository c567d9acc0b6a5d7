//! Wire messages exchanged between client and service.

use serde::{Deserialize, Serialize};

/// A single conversion request. `to_currency` and `amount` are optional here
/// so that a request missing either key still deserializes and gets the
/// descriptive validation error instead of a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Historical rate date in YYYY-MM-DD form; latest rates when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Reply to a conversion request. Exactly one variant appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversionResponse {
    Success {
        converted_amount: f64,
        rate: f64,
        date: String,
    },
    Error {
        error: String,
    },
}
