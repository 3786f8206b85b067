//! Locale number handling for printed amounts.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::ReissueError;

/// Printed in place of a shipping amount when shipping costs nothing.
pub const FREE_SHIPPING: &str = "Free shipping";

/// Currency symbol, separators and precision used on the documents, both
/// when reading printed amounts and when formatting new ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub symbol: String,
    pub thousands: char,
    pub decimal: char,
    /// Digits after the decimal separator.
    pub precision: u32,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            symbol: "€".into(),
            thousands: '.',
            decimal: ',',
            precision: 2,
        }
    }
}

impl NumberFormat {
    /// Parse a printed amount such as `"1.234,56"` or `"€ 12,00"`.
    ///
    /// `field` names the value in the error when parsing fails.
    pub fn parse_amount(&self, field: &'static str, raw: &str) -> Result<Decimal, ReissueError> {
        let invalid = || ReissueError::InvalidAmount {
            field,
            value: raw.to_string(),
        };

        let mut text = raw.trim();
        let negative = match text.strip_prefix('-') {
            Some(rest) => {
                text = rest;
                true
            }
            None => false,
        };
        if !self.symbol.is_empty() {
            text = text.strip_prefix(self.symbol.as_str()).unwrap_or(text);
            text = text.strip_suffix(self.symbol.as_str()).unwrap_or(text);
        }

        let mut normalized = String::with_capacity(text.len() + 1);
        if negative {
            normalized.push('-');
        }
        for ch in text.chars() {
            match ch {
                c if c == self.thousands => {}
                c if c == self.decimal => normalized.push('.'),
                c if c.is_ascii_digit() => normalized.push(c),
                c if c.is_whitespace() => {}
                _ => return Err(invalid()),
            }
        }
        if !normalized.bytes().any(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        Decimal::from_str(&normalized).map_err(|_| invalid())
    }

    /// Round to the configured precision, half away from zero.
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.precision, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format as currency, e.g. `€1.234,56` or `-€1,50`.
    pub fn format_money(&self, value: Decimal) -> String {
        let rounded = self.round(value);
        let digits = format!("{:.*}", self.precision as usize, rounded.abs());
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };

        let mut out = String::with_capacity(digits.len() + self.symbol.len() + 4);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            out.push('-');
        }
        out.push_str(&self.symbol);
        let len = int_part.len();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.thousands);
            }
            out.push(ch);
        }
        if let Some(frac) = frac_part {
            out.push(self.decimal);
            out.push_str(frac);
        }
        out
    }
}

/// Format a rate as a percentage with two decimals, e.g. `0.19` → `19.00%`.
pub fn format_percent(rate: Decimal) -> String {
    let percent = (rate * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{percent:.2}%")
}
