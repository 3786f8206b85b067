use serde::{Deserialize, Serialize};

/// Ordered rows of ordered, non-empty text fragments as produced by the
/// text-extraction step. Serializes as a JSON array of string arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FragmentStream {
    rows: Vec<Vec<String>>,
}

impl FragmentStream {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// A stream holding a single row.
    pub fn single_row<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: vec![fragments.into_iter().map(Into::into).collect()],
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Rows that carry at least one fragment, with their original index.
    pub fn non_empty_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.is_empty())
            .map(|(i, row)| (i, row.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }
}

impl From<Vec<Vec<String>>> for FragmentStream {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

/// Invoice fields recovered from a fragment stream.
///
/// Monetary values are kept exactly as printed; see
/// [`NumberFormat::parse_amount`](super::NumberFormat::parse_amount).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Status marker printed next to the title (e.g. "PAID").
    pub status: Option<String>,
    /// Fragments between the title and "Bill to:", verbatim.
    pub invoice_details: Vec<String>,
    /// Named detail fields, set only with positional details mapping.
    pub details: Option<InvoiceDetails>,
    /// Billing address lines.
    pub bill_to: Vec<String>,
    /// Shipping address lines.
    pub ship_to: Vec<String>,
    /// Line-item description.
    pub description: Option<String>,
    /// Line-item quantity.
    pub quantity: Option<String>,
    /// Subtotal excluding VAT, raw.
    pub subtotal: Option<String>,
    /// Discount, raw.
    pub discount: Option<String>,
    /// Shipping, raw (may be "Free shipping").
    pub shipping: Option<String>,
    /// Printed total, raw.
    pub total: Option<String>,
}

impl InvoiceRecord {
    /// Store a value captured after a line-item label.
    pub fn set(&mut self, field: LineField, value: impl Into<String>) {
        let slot = match field {
            LineField::Description => &mut self.description,
            LineField::Quantity => &mut self.quantity,
            LineField::Subtotal => &mut self.subtotal,
            LineField::Discount => &mut self.discount,
            LineField::Shipping => &mut self.shipping,
            LineField::Total => &mut self.total,
        };
        *slot = Some(value.into());
    }

    pub fn get(&self, field: LineField) -> Option<&str> {
        match field {
            LineField::Description => self.description.as_deref(),
            LineField::Quantity => self.quantity.as_deref(),
            LineField::Subtotal => self.subtotal.as_deref(),
            LineField::Discount => self.discount.as_deref(),
            LineField::Shipping => self.shipping.as_deref(),
            LineField::Total => self.total.as_deref(),
        }
    }

    /// Raw issue date text.
    ///
    /// Taken from the positional `invoice_date` field when mapped, otherwise
    /// from the second invoice-details fragment. A leading `"Label:"` is
    /// stripped, so `"Invoice Date: May 5, 2021"` yields `"May 5, 2021"`.
    pub fn issue_date_text(&self) -> Option<&str> {
        let raw = match &self.details {
            Some(details) => details.invoice_date.as_str(),
            None => self.invoice_details.get(1)?.as_str(),
        };
        let value = match raw.split_once(':') {
            Some((_, rest)) => rest.trim(),
            None => raw.trim(),
        };
        (!value.is_empty()).then_some(value)
    }

    /// Fold a later row's record into this one: lists append, scalars
    /// present in `other` override.
    pub fn merge(&mut self, other: InvoiceRecord) {
        self.invoice_details.extend(other.invoice_details);
        self.bill_to.extend(other.bill_to);
        self.ship_to.extend(other.ship_to);
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(status, details, description, quantity, subtotal, discount, shipping, total);
    }
}

/// Named invoice-details fields in the order they are printed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    pub invoice_number: String,
    pub invoice_date: String,
    pub order_date: String,
    pub order_number: String,
    pub payment_method: String,
    pub shipping_method: String,
}

impl InvoiceDetails {
    /// Field names, in positional order.
    pub const FIELDS: [&'static str; 6] = [
        "invoice_number",
        "invoice_date",
        "order_date",
        "order_number",
        "payment_method",
        "shipping_method",
    ];

    /// Map exactly [`Self::FIELDS`]`.len()` fragments onto the named fields.
    pub fn from_positional(values: &[String]) -> Option<Self> {
        match values {
            [
                invoice_number,
                invoice_date,
                order_date,
                order_number,
                payment_method,
                shipping_method,
            ] => Some(Self {
                invoice_number: invoice_number.clone(),
                invoice_date: invoice_date.clone(),
                order_date: order_date.clone(),
                order_number: order_number.clone(),
                payment_method: payment_method.clone(),
                shipping_method: shipping_method.clone(),
            }),
            _ => None,
        }
    }

    /// `(name, value)` pairs in positional order.
    pub fn pairs(&self) -> [(&'static str, &str); 6] {
        [
            (Self::FIELDS[0], &self.invoice_number),
            (Self::FIELDS[1], &self.invoice_date),
            (Self::FIELDS[2], &self.order_date),
            (Self::FIELDS[3], &self.order_number),
            (Self::FIELDS[4], &self.payment_method),
            (Self::FIELDS[5], &self.shipping_method),
        ]
    }
}

/// Line-item fields captured at a fixed offset after a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    Description,
    Quantity,
    Subtotal,
    Discount,
    Shipping,
    Total,
}

impl LineField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Quantity => "quantity",
            Self::Subtotal => "subtotal",
            Self::Discount => "discount",
            Self::Shipping => "shipping",
            Self::Total => "total",
        }
    }
}
