//! Type-safe price representation using decimal arithmetic.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amount string that is not a decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid price amount: {0}")]
pub struct PriceParseError(pub String);

/// A price with currency information.
///
/// Currency codes are kept as the ISO 4217 string the API returned, so codes
/// this crate has never heard of still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Parse the decimal-string amount the GraphQL APIs return.
    ///
    /// # Errors
    ///
    /// Returns `PriceParseError` if `amount` is not a decimal number.
    pub fn parse(amount: &str, currency_code: impl Into<String>) -> Result<Self, PriceParseError> {
        let amount =
            Decimal::from_str(amount.trim()).map_err(|_| PriceParseError(amount.to_string()))?;
        Ok(Self::new(amount, currency_code))
    }

    /// Format for display (e.g., "19.90 CAD").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency_code)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let price = Price::parse("70.0", "CAD").unwrap();
        assert_eq!(price.amount, Decimal::new(700, 1));
        assert_eq!(price.display(), "70.00 CAD");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Price::parse("seventy", "CAD").is_err());
    }
}
