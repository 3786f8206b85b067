//! Flat parameter set handed to the template renderer.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{FREE_SHIPPING, InvoiceRecord, NumberFormat, ReconciledTotals, format_percent};

/// String parameters keyed by template variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, String>);

impl ParameterSet {
    /// Value of one template variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

/// Formats reconciled values and merges them with the record's text fields.
#[derive(Debug, Clone)]
pub struct Assembler {
    format: NumberFormat,
    line_break: String,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(NumberFormat::default(), "<br/>")
    }
}

impl Assembler {
    /// Assembler formatting money with `format` and joining lines with
    /// `line_break`.
    pub fn new(format: NumberFormat, line_break: impl Into<String>) -> Self {
        Self {
            format,
            line_break: line_break.into(),
        }
    }

    /// Build the full parameter set for one reconciled invoice.
    pub fn assemble(&self, record: &InvoiceRecord, totals: &ReconciledTotals) -> ParameterSet {
        let mut params = ParameterSet::default();
        let money = |value| self.format.format_money(value);

        if let Some(status) = &record.status {
            params.insert("status", status.as_str());
        }
        params.insert("invoice_details", self.join_block(&record.invoice_details));
        params.insert("bill_to", self.join_block(&record.bill_to));
        params.insert("ship_to", self.join_block(&record.ship_to));
        if let Some(details) = &record.details {
            for (key, value) in details.pairs() {
                params.insert(key, value);
            }
        }
        if let Some(description) = &record.description {
            params.insert("description", description.as_str());
        }
        if let Some(quantity) = &record.quantity {
            params.insert("quantity", quantity.as_str());
        }

        params.insert("subtotal", money(totals.subtotal));
        // A negative discount is a surcharge and prints without the minus.
        let discount = if totals.discount.is_sign_negative() && !totals.discount.is_zero() {
            money(-totals.discount)
        } else {
            format!("-{}", money(totals.discount))
        };
        params.insert("discount", discount);
        let shipping = if totals.shipping.is_zero() {
            FREE_SHIPPING.to_string()
        } else {
            money(totals.shipping)
        };
        params.insert("shipping", shipping);
        params.insert("vat_total", money(totals.vat_amount));
        params.insert("vat_percentage", format_percent(totals.vat_rate));
        params.insert("total_excl_vat", money(totals.total_excl_vat));
        params.insert("total", money(totals.total));
        params
    }

    /// Escape each line and join with the configured line break.
    pub fn join_block(&self, lines: &[String]) -> String {
        lines
            .iter()
            .map(|line| escape_markup(line))
            .collect::<Vec<_>>()
            .join(&self.line_break)
    }
}

/// Escape the characters significant in HTML markup.
pub fn escape_markup(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}
