//! The fixed invoice layout: anchor literals, the line-item label table,
//! and the knobs for the places where known document variants disagree.

use serde::{Deserialize, Serialize};

use super::types::LineField;

/// Company identity block printed at the top of every invoice.
pub const HEADER_BLOCK: &[&str] = &[
    "Nordlicht Handel GmbH",
    "Hafenstraße 12",
    "20457 Hamburg",
    "Germany",
    "VAT ID: DE287654321",
    "Tax No.: 27/123/45678",
];

/// Payment-info block closing every invoice. Its first fragment is the
/// `"Payment details:"` anchor.
pub const PAYMENT_BLOCK: &[&str] = &[
    "Payment details:",
    "Nordlicht Handel GmbH",
    "IBAN: DE44 2005 0550 1234 5678 90",
    "BIC: HASPDEHHXXX",
    "Hamburger Sparkasse",
];

pub const INVOICE_ANCHOR: &str = "Invoice";
pub const BILL_TO_ANCHOR: &str = "Bill to:";
pub const SHIP_TO_ANCHOR: &str = "Ship to:";
pub const DESCRIPTION_ANCHOR: &str = "Description";

/// Line-item labels and what to capture after each one, as
/// `(label, [(offset after label, field)])`.
///
/// `"Qty"` heads the item table: the description sits two fragments after it
/// (past the "Price" column header) and the quantity three.
pub const LINE_LABELS: &[(&str, &[(usize, LineField)])] = &[
    ("Qty", &[(2, LineField::Description), (3, LineField::Quantity)]),
    ("Discount:", &[(1, LineField::Discount)]),
    ("Shipping:", &[(1, LineField::Shipping)]),
    ("Subtotal:", &[(1, LineField::Subtotal)]),
    ("Total:", &[(1, LineField::Total)]),
];

/// One entry of the line-item label table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRule {
    pub label: String,
    pub captures: Vec<Capture>,
}

impl LabelRule {
    pub fn new(label: impl Into<String>, captures: &[(usize, LineField)]) -> Self {
        Self {
            label: label.into(),
            captures: captures
                .iter()
                .map(|&(offset, field)| Capture { offset, field })
                .collect(),
        }
    }
}

/// A single `(offset, field)` capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub offset: usize,
    pub field: LineField,
}

/// What happens to the cursor after `"Invoice"` when no status marker follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusAdvance {
    /// Skip the status slot only when a marker is present.
    #[default]
    MarkerOnly,
    /// Always skip one fragment after `"Invoice"`, marker or not.
    Always,
}

/// How the invoice-details fragments are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailsMode {
    /// Keep the fragments as a list only.
    #[default]
    Verbatim,
    /// Also map them onto named fields; any count mismatch fails.
    Strict,
    /// Also map them onto named fields; excess fragments are dropped,
    /// missing ones still fail.
    Truncate,
}

/// Whether a stream may span several rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Every row is a full layout pass; results are merged.
    #[default]
    Merge,
    /// Exactly one non-empty row is expected.
    Single,
}

/// Anchor literals and extraction options for one invoice layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub header: Vec<String>,
    pub invoice: String,
    /// Fragments recognized as a status marker after the title.
    pub status_markers: Vec<String>,
    pub status_advance: StatusAdvance,
    pub bill_to: String,
    pub ship_to: String,
    pub description: String,
    pub labels: Vec<LabelRule>,
    /// The payment-info block; its first fragment terminates the line items.
    pub payment_block: Vec<String>,
    pub details_mode: DetailsMode,
    pub row_policy: RowPolicy,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            header: to_strings(HEADER_BLOCK),
            invoice: INVOICE_ANCHOR.into(),
            status_markers: vec!["PAID".into()],
            status_advance: StatusAdvance::default(),
            bill_to: BILL_TO_ANCHOR.into(),
            ship_to: SHIP_TO_ANCHOR.into(),
            description: DESCRIPTION_ANCHOR.into(),
            labels: LINE_LABELS
                .iter()
                .map(|(label, captures)| LabelRule::new(*label, captures))
                .collect(),
            payment_block: to_strings(PAYMENT_BLOCK),
            details_mode: DetailsMode::default(),
            row_policy: RowPolicy::default(),
        }
    }
}

impl Layout {
    /// The anchor that closes the line-item region.
    pub fn payment_anchor(&self) -> &str {
        self.payment_block.first().map(String::as_str).unwrap_or_default()
    }

    /// The capture rule for `fragment` when it is a line-item label.
    pub fn label_rule(&self, fragment: &str) -> Option<&LabelRule> {
        self.labels.iter().find(|rule| rule.label == fragment)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Builder for [`Layout`].
///
/// # Example
///
/// ```
/// use refaktura::core::{DetailsMode, Extractor, LayoutBuilder, RowPolicy, StatusAdvance};
///
/// let layout = LayoutBuilder::new()
///     .status_marker("UNPAID")
///     .status_advance(StatusAdvance::Always)
///     .details_mode(DetailsMode::Strict)
///     .row_policy(RowPolicy::Single)
///     .build();
/// assert_eq!(layout.payment_anchor(), "Payment details:");
/// assert_eq!(layout.status_markers, ["PAID", "UNPAID"]);
/// assert!(layout.label_rule("Subtotal:").is_some());
/// assert!(layout.label_rule("Invoice").is_none());
///
/// let extractor = Extractor::new(layout.clone());
/// assert_eq!(extractor.layout(), &layout);
/// ```
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    layout: Layout,
}

impl LayoutBuilder {
    /// Start from the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the header block.
    pub fn header<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layout.header = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the payment-info block.
    pub fn payment_block<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layout.payment_block = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Accept one more fragment as a status marker after the title.
    pub fn status_marker(mut self, marker: impl Into<String>) -> Self {
        self.layout.status_markers.push(marker.into());
        self
    }

    /// Whether the slot after the title is consumed without a marker.
    pub fn status_advance(mut self, advance: StatusAdvance) -> Self {
        self.layout.status_advance = advance;
        self
    }

    /// How positional invoice details are checked.
    pub fn details_mode(mut self, mode: DetailsMode) -> Self {
        self.layout.details_mode = mode;
        self
    }

    /// How rows after the first are treated.
    pub fn row_policy(mut self, policy: RowPolicy) -> Self {
        self.layout.row_policy = policy;
        self
    }

    /// Add or replace the captures for a line-item label.
    pub fn label(mut self, label: impl Into<String>, captures: &[(usize, LineField)]) -> Self {
        let rule = LabelRule::new(label, captures);
        match self.layout.labels.iter_mut().find(|r| r.label == rule.label) {
            Some(existing) => *existing = rule,
            None => self.layout.labels.push(rule),
        }
        self
    }

    /// Finish building.
    pub fn build(self) -> Layout {
        self.layout
    }
}
