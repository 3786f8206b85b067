//! Core extraction and reconciliation.
//!
//! This module turns a fragment stream into an [`InvoiceRecord`] using the
//! fixed anchor [`Layout`], and closes the printed amounts into a consistent
//! [`ReconciledTotals`] breakdown.

mod amount;
mod error;
mod extract;
mod layout;
mod reconcile;
mod types;

pub use amount::*;
pub use error::*;
pub use extract::*;
pub use layout::*;
pub use reconcile::*;
pub use types::*;
