use thiserror::Error;

/// Per-request failure taxonomy. Each variant renders to the exact message
/// sent back to the client in the error-variant response.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Missing 'to_currency' or 'amount' in the request.")]
    MissingField,

    #[error("Invalid date format. Use 'YYYY-MM-DD'.")]
    InvalidDate,

    #[error("Unsupported currency or no data available for {currency} on {date}.")]
    UnsupportedCurrency { currency: String, date: String },

    #[error("{0}")]
    Provider(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConvertError::MissingField.to_string(),
            "Missing 'to_currency' or 'amount' in the request."
        );
        assert_eq!(
            ConvertError::InvalidDate.to_string(),
            "Invalid date format. Use 'YYYY-MM-DD'."
        );
        assert_eq!(
            ConvertError::UnsupportedCurrency {
                currency: "XYZ".to_string(),
                date: "latest".to_string(),
            }
            .to_string(),
            "Unsupported currency or no data available for XYZ on latest."
        );
    }
}
