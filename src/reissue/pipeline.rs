//! Per-document re-issue: extract, resolve VAT, reconcile, assemble.

use serde::Serialize;
use tracing::debug;

use super::assemble::{Assembler, ParameterSet};
use super::config::ReissueConfig;
use crate::core::{
    Extractor, FragmentStream, InvoiceRecord, NumberFormat, RawAmounts, ReconciledTotals,
    ReissueError, reconcile,
};
use crate::vat::VatResolver;

/// Output of a successful re-issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reissued {
    pub record: InvoiceRecord,
    pub totals: ReconciledTotals,
    pub parameters: ParameterSet,
}

/// Runs the full pipeline for one fragment stream.
///
/// A `Reissuer` holds only immutable configuration, so clones can be handed
/// to worker threads.
///
/// ```
/// use refaktura::core::{FragmentStream, HEADER_BLOCK, PAYMENT_BLOCK};
/// use refaktura::reissue::Reissuer;
///
/// let mut fragments: Vec<&str> = HEADER_BLOCK.to_vec();
/// fragments.extend([
///     "Invoice", "PAID", "Invoice Number: 1042", "Invoice Date: May 5, 2021",
///     "Bill to:", "Erika Mustermann", "Berlin", "Germany",
///     "Ship to:", "Erika Mustermann",
///     "Description", "Qty", "Price",
///     "Espresso beans 1kg", "2", "Subtotal:", "€100,00",
///     "Shipping:", "Free shipping", "Total:", "€119,00",
/// ]);
/// fragments.extend(PAYMENT_BLOCK);
///
/// let reissued = Reissuer::default()
///     .reissue(&FragmentStream::single_row(fragments))
///     .unwrap();
/// assert_eq!(reissued.parameters.get("vat_total"), Some("€19,00"));
/// assert_eq!(reissued.parameters.get("shipping"), Some("Free shipping"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reissuer {
    extractor: Extractor,
    resolver: VatResolver,
    format: NumberFormat,
    assembler: Assembler,
}

impl Reissuer {
    /// Pipeline from its parts. `line_break` joins the lines of address and
    /// details blocks in the parameter set.
    pub fn new(
        extractor: Extractor,
        resolver: VatResolver,
        format: NumberFormat,
        line_break: impl Into<String>,
    ) -> Self {
        let assembler = Assembler::new(format.clone(), line_break);
        Self {
            extractor,
            resolver,
            format,
            assembler,
        }
    }

    /// Pipeline for a loaded configuration.
    pub fn from_config(config: &ReissueConfig) -> Self {
        let resolver = match &config.vat.default_country {
            Some(country) => VatResolver::default().with_default_country(country.as_str()),
            None => VatResolver::default().without_fallback(),
        };
        Self::new(
            Extractor::new(config.layout.clone()),
            resolver,
            config.format.clone(),
            config.line_break.as_str(),
        )
    }

    /// The extractor in use.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// The VAT resolver in use.
    pub fn resolver(&self) -> &VatResolver {
        &self.resolver
    }

    /// Extract, resolve, reconcile and assemble one document.
    pub fn reissue(&self, stream: &FragmentStream) -> Result<Reissued, ReissueError> {
        let record = self.extractor.extract(stream)?;
        let vat_rate = self
            .resolver
            .resolve(&record.bill_to, record.issue_date_text())?;
        let totals = reconcile(&RawAmounts::from(&record), vat_rate, &self.format)?;
        debug!(
            %vat_rate,
            margin = %totals.margin,
            total = %totals.total,
            "reconciled invoice"
        );
        let parameters = self.assembler.assemble(&record, &totals);
        Ok(Reissued {
            record,
            totals,
            parameters,
        })
    }
}
