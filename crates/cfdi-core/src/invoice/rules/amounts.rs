//! Monetary attribute parsing.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ExtractionError;
use crate::models::record::{zero_amount, NOT_AVAILABLE};

/// Parse a monetary attribute.
///
/// An absent value, or one holding the `N/A` sentinel, counts as `0.00`.
/// Surrounding whitespace is ignored and scientific notation is accepted.
pub fn parse_amount(field: &str, value: Option<&str>) -> Result<Decimal, ExtractionError> {
    let Some(raw) = value else {
        return Ok(zero_amount());
    };

    let trimmed = raw.trim();
    if trimmed == NOT_AVAILABLE {
        return Ok(zero_amount());
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ExtractionError::InvalidNumericField {
            field: field.to_string(),
            value: raw.to_string(),
        })
}
