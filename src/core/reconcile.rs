//! Closing the monetary breakdown of an invoice.
//!
//! The printed subtotal, VAT and total are rounded independently, so they
//! rarely add up once VAT is recomputed at the resolved rate. The residual
//! ("margin") is pushed into either the discount or the shipping amount so
//! that the re-issued document still shows the printed total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::amount::{FREE_SHIPPING, NumberFormat};
use super::error::ReissueError;
use super::types::InvoiceRecord;

/// Printed monetary values, as they appear on the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAmounts<'a> {
    pub subtotal: Option<&'a str>,
    pub discount: Option<&'a str>,
    pub shipping: Option<&'a str>,
    pub total: Option<&'a str>,
}

impl<'a> From<&'a InvoiceRecord> for RawAmounts<'a> {
    fn from(record: &'a InvoiceRecord) -> Self {
        Self {
            subtotal: record.subtotal.as_deref(),
            discount: record.discount.as_deref(),
            shipping: record.shipping.as_deref(),
            total: record.total.as_deref(),
        }
    }
}

/// Normalized amounts, before closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amounts {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    /// `None` when the document prints no total.
    pub total: Option<Decimal>,
}

impl Amounts {
    /// Normalize printed values.
    ///
    /// Discount and shipping default to zero, `"Free shipping"` is zero, and a
    /// discount printed with a minus sign counts by its magnitude.
    pub fn parse(raw: &RawAmounts<'_>, format: &NumberFormat) -> Result<Self, ReissueError> {
        let subtotal = raw
            .subtotal
            .ok_or(ReissueError::MissingRequiredField("subtotal"))?;
        let subtotal = format.parse_amount("subtotal", subtotal)?;

        let discount = match raw.discount {
            Some(d) => format.parse_amount("discount", d)?.abs(),
            None => Decimal::ZERO,
        };
        let shipping = match raw.shipping {
            Some(s) if s.trim().eq_ignore_ascii_case(FREE_SHIPPING) => Decimal::ZERO,
            Some(s) => format.parse_amount("shipping", s)?,
            None => Decimal::ZERO,
        };
        let total = raw
            .total
            .map(|t| format.parse_amount("total", t))
            .transpose()?;

        Ok(Self {
            subtotal,
            discount,
            shipping,
            total,
        })
    }
}

/// A closed monetary breakdown.
///
/// `total_excl_vat == subtotal + shipping - discount` and
/// `total == total_excl_vat + vat_amount` hold exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledTotals {
    /// Subtotal excluding VAT, as printed.
    pub subtotal: Decimal,
    /// VAT rate as a fraction (0.19 for 19%).
    pub vat_rate: Decimal,
    pub vat_amount: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub total_excl_vat: Decimal,
    pub total: Decimal,
    /// Residual absorbed into discount or shipping.
    pub margin: Decimal,
}

impl ReconciledTotals {
    /// Whether both accounting identities hold.
    pub fn is_closed(&self) -> bool {
        self.total_excl_vat == self.subtotal + self.shipping - self.discount
            && self.total == self.total_excl_vat + self.vat_amount
    }
}

/// Compute the closed breakdown for printed `raw` amounts at `vat_rate`.
///
/// ```
/// use refaktura::core::{NumberFormat, RawAmounts, reconcile};
/// use rust_decimal_macros::dec;
///
/// let raw = RawAmounts {
///     subtotal: Some("50,00"),
///     shipping: Some("Free shipping"),
///     total: Some("58,00"),
///     ..Default::default()
/// };
/// let totals = reconcile(&raw, dec!(0.19), &NumberFormat::default()).unwrap();
/// assert_eq!(totals.discount, dec!(1.50));
/// assert_eq!(totals.total, dec!(58.00));
/// ```
pub fn reconcile(
    raw: &RawAmounts<'_>,
    vat_rate: Decimal,
    format: &NumberFormat,
) -> Result<ReconciledTotals, ReissueError> {
    let amounts = Amounts::parse(raw, format)?;
    close(amounts, vat_rate, format)
}

/// Close already-normalized amounts.
///
/// Fails with [`ReissueError::InvalidAmount`] when an intermediate sum
/// leaves the `Decimal` range.
pub fn close(
    amounts: Amounts,
    vat_rate: Decimal,
    format: &NumberFormat,
) -> Result<ReconciledTotals, ReissueError> {
    let Amounts {
        subtotal,
        mut discount,
        mut shipping,
        total,
    } = amounts;
    let overflow = |field: &'static str, value: Decimal| ReissueError::InvalidAmount {
        field,
        value: value.to_string(),
    };

    let vat_amount = subtotal
        .checked_mul(vat_rate)
        .map(|vat| format.round(vat))
        .ok_or_else(|| overflow("subtotal", subtotal))?;
    let margin = match total {
        Some(printed) => subtotal
            .checked_add(vat_amount)
            .ok_or_else(|| overflow("subtotal", subtotal))?
            .checked_add(shipping)
            .ok_or_else(|| overflow("shipping", shipping))?
            .checked_sub(discount)
            .ok_or_else(|| overflow("discount", discount))?
            .checked_sub(printed)
            .ok_or_else(|| overflow("total", printed))?,
        None => Decimal::ZERO,
    };

    if !discount.is_zero() || shipping < margin {
        discount = discount
            .checked_add(margin)
            .ok_or_else(|| overflow("discount", discount))?;
    } else {
        shipping = shipping
            .checked_sub(margin)
            .ok_or_else(|| overflow("shipping", shipping))?;
    }

    let total_excl_vat = subtotal
        .checked_add(shipping)
        .ok_or_else(|| overflow("shipping", shipping))?
        .checked_sub(discount)
        .ok_or_else(|| overflow("discount", discount))?;
    let total = total_excl_vat
        .checked_add(vat_amount)
        .ok_or_else(|| overflow("subtotal", subtotal))?;
    debug!(%subtotal, %vat_rate, %vat_amount, %margin, %total, "reconciled totals");

    Ok(ReconciledTotals {
        subtotal,
        vat_rate,
        vat_amount,
        discount,
        shipping,
        total_excl_vat,
        total,
        margin,
    })
}
