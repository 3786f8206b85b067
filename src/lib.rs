//! # refaktura
//!
//! Re-issue invoices printed in a fixed layout. The text fragments of the
//! original document are read by anchor, the VAT rate is resolved from the
//! billing address and issue date, and the printed amounts are reconciled
//! so that the re-issued invoice still closes to the printed total.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use refaktura::core::*;
//! use refaktura::vat::VatResolver;
//! use rust_decimal_macros::dec;
//!
//! let mut fragments: Vec<&str> = HEADER_BLOCK.to_vec();
//! fragments.extend([
//!     "Invoice", "Invoice Number: 1042", "Invoice Date: September 1, 2021",
//!     "Bill to:", "Acme B.V.", "VAT Number: NL123456789B01",
//!     "Ship to:", "Acme B.V.",
//!     "Description", "Qty", "Price", "Standing desk", "1",
//!     "Subtotal:", "€500,00", "Shipping:", "€12,00", "Total:", "€617,00",
//! ]);
//! fragments.extend(PAYMENT_BLOCK);
//!
//! let record = Extractor::default()
//!     .extract(&FragmentStream::single_row(fragments))
//!     .unwrap();
//! let rate = VatResolver::default()
//!     .resolve(&record.bill_to, record.issue_date_text())
//!     .unwrap();
//! assert_eq!(rate, dec!(0.21));
//!
//! let totals = reconcile(&RawAmounts::from(&record), rate, &NumberFormat::default()).unwrap();
//! assert!(totals.is_closed());
//! assert_eq!(totals.total, dec!(617.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Fragment streams, layout, extraction, amounts, reconciliation |
//! | `vat` (default) | VAT rate table, VAT numbers, rate resolution |
//! | `reissue` (default) | Parameter assembly, per-document pipeline, batches, config |
//! | `cli` | `refaktura` command-line binary |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "vat")]
pub mod vat;

#[cfg(feature = "reissue")]
pub mod reissue;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
