use thiserror::Error;

/// Errors that can occur while re-issuing an invoice.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReissueError {
    /// The fragment stream does not follow the fixed invoice layout.
    #[error("malformed document (row {row}, at {anchor:?}): {kind}")]
    MalformedDocument {
        /// Zero-based index of the offending row.
        row: usize,
        /// The anchor or label being matched when the error occurred.
        anchor: String,
        /// What went wrong.
        kind: MalformedKind,
    },

    /// A monetary value could not be normalized to a decimal number.
    #[error("invalid amount for {field}: {value:?}")]
    InvalidAmount {
        /// Field the value was read from (e.g. "subtotal").
        field: &'static str,
        /// Raw value as printed on the document.
        value: String,
    },

    /// A date could not be parsed in any supported format.
    #[error("invalid date: {value:?}")]
    InvalidDate {
        /// Raw date text.
        value: String,
    },

    /// A field required for reconciliation is absent.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// No VAT rate matches the billing country and no fallback is configured.
    #[error("no VAT rate for country {country:?}")]
    UnresolvedVatRate {
        /// Country text taken from the billing address.
        country: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ReissueError {
    /// Shorthand for a [`ReissueError::MalformedDocument`].
    pub fn malformed(row: usize, anchor: impl Into<String>, kind: MalformedKind) -> Self {
        Self::MalformedDocument {
            row,
            anchor: anchor.into(),
            kind,
        }
    }

    /// The anchor named by a [`ReissueError::MalformedDocument`], if any.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Self::MalformedDocument { anchor, .. } => Some(anchor),
            _ => None,
        }
    }
}

/// The ways a fragment stream can deviate from the expected layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedKind {
    /// The fixed header block is missing or corrupt.
    #[error("header block mismatch")]
    HeaderMismatch,

    /// A different section started where an anchor was expected.
    #[error("unexpected section, found {found:?}")]
    UnexpectedSection {
        /// The fragment found at the cursor (empty at end of row).
        found: String,
    },

    /// The anchor never appeared in the rest of the row.
    #[error("anchor not found")]
    AnchorNotFound,

    /// The anchor appeared but the section before it holds no fragments.
    #[error("empty section")]
    EmptySection,

    /// A label appeared without the value expected at its offset.
    #[error("no value at offset {offset}")]
    MissingValue {
        /// Offset after the label.
        offset: usize,
    },

    /// The fixed payment-info block is missing or corrupt.
    #[error("payment block mismatch")]
    PaymentBlockMismatch,

    /// Positional field mapping got the wrong number of fragments.
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        /// Fields in the schema.
        expected: usize,
        /// Fragments collected.
        found: usize,
    },

    /// More than one row in a stream configured for a single row.
    #[error("unexpected additional row")]
    UnexpectedRow,
}
