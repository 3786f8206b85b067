//! End-to-end re-issue of extracted invoices.
//!
//! [`Reissuer`] chains extraction, VAT resolution, reconciliation and
//! parameter assembly for one document; [`Batch`] runs it over many.

mod assemble;
mod batch;
mod config;
mod pipeline;

pub use assemble::{Assembler, ParameterSet, escape_markup};
pub use batch::{Batch, BatchAbort, BatchReport, Document, FailurePolicy};
pub use config::{ReissueConfig, VatConfig};
pub use pipeline::{Reissued, Reissuer};
