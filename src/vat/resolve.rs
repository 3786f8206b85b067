//! Resolve the VAT rate for an invoice from its billing address and date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::countries::country_name;
use super::rates::{DEFAULT_COUNTRY, VAT_RATES, VatRateEntry, VatSchedule};
use super::vat_number::{find_vat_number, split_vat_number};
use crate::core::ReissueError;

/// Where the country used for the lookup came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountrySource<'a> {
    /// The last billing-address line.
    AddressLine(&'a str),
    /// The prefix of a VAT number, mapped through the code table.
    VatNumber {
        vat_number: &'a str,
        country: Option<&'static str>,
    },
}

impl CountrySource<'_> {
    /// Text matched against the rate table.
    pub fn country(&self) -> Option<&str> {
        match self {
            Self::AddressLine(line) => Some(*line),
            Self::VatNumber { country, .. } => *country,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::AddressLine(line) => line.to_string(),
            Self::VatNumber { vat_number, .. } => vat_number.to_string(),
        }
    }
}

/// Determine the country indicator of a billing address.
pub fn country_source(bill_to: &[String]) -> Result<CountrySource<'_>, ReissueError> {
    if let Some(vat_number) = find_vat_number(bill_to) {
        let country = match split_vat_number(vat_number) {
            Ok((code, _)) => country_name(code),
            Err(e) => {
                warn!(error = %e, "unusable VAT number in billing address");
                None
            }
        };
        return Ok(CountrySource::VatNumber {
            vat_number,
            country,
        });
    }
    bill_to
        .last()
        .map(|line| CountrySource::AddressLine(line.trim()))
        .ok_or(ReissueError::MissingRequiredField("bill_to"))
}

/// Parse an issue date printed as `"May 5, 2021"` or `"05.05.2021"`.
pub fn parse_issue_date(text: &str) -> Result<NaiveDate, ReissueError> {
    let text = text.trim();
    ["%B %d, %Y", "%B %d %Y", "%d.%m.%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .ok_or_else(|| ReissueError::InvalidDate {
            value: text.to_string(),
        })
}

/// Looks up VAT rates in a rate table.
///
/// Without a match the default country's base rate applies, unless the
/// resolver was built with [`VatResolver::without_fallback`].
///
/// ```
/// use refaktura::vat::VatResolver;
/// use rust_decimal_macros::dec;
///
/// let resolver = VatResolver::default();
/// let rate = resolver.resolve_country("Netherlands", Some("August 2, 2021")).unwrap();
/// assert_eq!(rate, dec!(0.21));
/// ```
#[derive(Debug, Clone)]
pub struct VatResolver {
    table: &'static [VatRateEntry],
    default_country: Option<String>,
}

impl Default for VatResolver {
    fn default() -> Self {
        Self {
            table: VAT_RATES,
            default_country: Some(DEFAULT_COUNTRY.to_string()),
        }
    }
}

impl VatResolver {
    /// Resolver over a custom table, falling back to [`DEFAULT_COUNTRY`].
    pub fn new(table: &'static [VatRateEntry]) -> Self {
        Self {
            table,
            ..Default::default()
        }
    }

    /// Fall back to `country` instead of [`DEFAULT_COUNTRY`].
    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = Some(country.into());
        self
    }

    /// Fail with [`ReissueError::UnresolvedVatRate`] for unknown countries.
    pub fn without_fallback(mut self) -> Self {
        self.default_country = None;
        self
    }

    pub fn default_country(&self) -> Option<&str> {
        self.default_country.as_deref()
    }

    /// First table entry whose country name occurs in `text`.
    pub fn lookup(&self, text: &str) -> Option<&'static VatRateEntry> {
        self.table.iter().find(|entry| text.contains(entry.country))
    }

    /// Rate for a billing address, given the raw issue date text.
    pub fn resolve(
        &self,
        bill_to: &[String],
        issue_date: Option<&str>,
    ) -> Result<Decimal, ReissueError> {
        let source = country_source(bill_to)?;
        let entry = source.country().and_then(|c| self.lookup(c));
        self.rate_for(entry, &source.describe(), issue_date)
    }

    /// Rate for a country name (or any text containing one).
    pub fn resolve_country(
        &self,
        country: &str,
        issue_date: Option<&str>,
    ) -> Result<Decimal, ReissueError> {
        self.rate_for(self.lookup(country), country, issue_date)
    }

    fn rate_for(
        &self,
        entry: Option<&'static VatRateEntry>,
        described: &str,
        issue_date: Option<&str>,
    ) -> Result<Decimal, ReissueError> {
        let Some(entry) = entry else {
            return self.fallback(described);
        };
        let rate = match entry.schedule {
            VatSchedule::Flat(rate) => rate,
            VatSchedule::Threshold {
                switch_date,
                until,
                after,
            } => {
                let issued = issue_date
                    .ok_or(ReissueError::MissingRequiredField("invoice_date"))
                    .and_then(parse_issue_date)?;
                if issued > parse_issue_date(switch_date)? {
                    after
                } else {
                    until
                }
            }
        };
        debug!(country = entry.country, %rate, "resolved VAT rate");
        Ok(rate)
    }

    fn fallback(&self, described: &str) -> Result<Decimal, ReissueError> {
        let unresolved = || ReissueError::UnresolvedVatRate {
            country: described.to_string(),
        };
        let default = self.default_country.as_deref().ok_or_else(unresolved)?;
        let entry = self.lookup(default).ok_or_else(unresolved)?;
        let rate = entry.schedule.base_rate();
        warn!(
            country = described,
            fallback = default,
            %rate,
            "no VAT rate for country, using fallback"
        );
        Ok(rate)
    }
}
