//! VAT numbers printed in billing addresses.

use std::fmt;

/// Label preceding a VAT number in an address block.
pub const VAT_NUMBER_LABEL: &str = "VAT Number:";

/// Error returned when a VAT number cannot be split into prefix and number.
#[derive(Debug, Clone)]
pub struct VatNumberError {
    /// The invalid input value.
    pub value: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl fmt::Display for VatNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid VAT number '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for VatNumberError {}

/// Split a VAT number into its two-letter country prefix and the rest.
///
/// Spaces are tolerated (`"NL 1234 56789 B01"`), only the structure is
/// checked, not the country-specific format.
pub fn split_vat_number(vat_number: &str) -> Result<(&str, &str), VatNumberError> {
    let vat_number = vat_number.trim();
    let reject = |reason: &str| VatNumberError {
        value: vat_number.into(),
        reason: reason.into(),
    };

    let prefix = vat_number
        .get(..2)
        .filter(|p| p.chars().all(|c| c.is_ascii_alphabetic()))
        .ok_or_else(|| reject("must start with a two-letter country prefix"))?;
    let number = vat_number[2..].trim_start();
    if number.is_empty() {
        return Err(reject("no digits after the country prefix"));
    }
    if !number
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ')
    {
        return Err(reject("contains characters other than letters and digits"));
    }
    Ok((prefix, number))
}

/// Find the VAT number in a billing address.
///
/// The label sits on the second-to-last or the last line. The number is
/// whatever follows the label on its line, or the last line when the label
/// stands alone.
pub fn find_vat_number(bill_to: &[String]) -> Option<&str> {
    let last = bill_to.last()?;
    if let Some(rest) = after_label(last) {
        return (!rest.is_empty()).then_some(rest);
    }
    let key = bill_to.len().checked_sub(2).map(|i| bill_to[i].as_str())?;
    let rest = after_label(key)?;
    if rest.is_empty() {
        Some(last.trim())
    } else {
        Some(rest)
    }
}

fn after_label(line: &str) -> Option<&str> {
    line.find(VAT_NUMBER_LABEL)
        .map(|at| line[at + VAT_NUMBER_LABEL.len()..].trim())
}
