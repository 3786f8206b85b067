//! VAT rate resolution.
//!
//! Maps the billing country of an invoice (or the country prefix of a VAT
//! number in the billing address) to a rate from a static, ordered table,
//! choosing between pre- and post-threshold rates by issue date.
//!
//! # Example
//!
//! ```
//! use refaktura::vat::VatResolver;
//! use rust_decimal_macros::dec;
//!
//! let bill_to = vec![
//!     "Acme B.V.".to_string(),
//!     "Amsterdam".to_string(),
//!     "VAT Number: NL123456789B01".to_string(),
//! ];
//! let rate = VatResolver::default().resolve(&bill_to, Some("March 1, 2022")).unwrap();
//! assert_eq!(rate, dec!(0.21));
//! ```

mod countries;
mod rates;
mod resolve;
mod vat_number;

pub use countries::country_name;
pub use rates::{DEFAULT_COUNTRY, OSS_SWITCH_DATE, VAT_RATES, VatRateEntry, VatSchedule};
pub use resolve::{CountrySource, VatResolver, country_source, parse_issue_date};
pub use vat_number::{VAT_NUMBER_LABEL, VatNumberError, find_vat_number, split_vat_number};
