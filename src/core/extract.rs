//! Anchor-driven extraction of invoice fields from a fragment stream.
//!
//! Each row is read in one forward pass. The cursor matches the header
//! block, the title, then collects fragments section by section until the
//! next anchor. Inside the line-item region, labels from the layout's label
//! table capture the fragments at fixed offsets after them.

use tracing::{debug, trace};

use super::error::{MalformedKind, ReissueError};
use super::layout::{DetailsMode, Layout, RowPolicy, StatusAdvance};
use super::types::{FragmentStream, InvoiceDetails, InvoiceRecord};

/// Anchor name used in errors about the header block.
pub const HEADER_ANCHOR_NAME: &str = "header block";
/// Anchor name used in errors about positional invoice details.
pub const DETAILS_ANCHOR_NAME: &str = "invoice details";

/// Extracts an [`InvoiceRecord`] from a [`FragmentStream`].
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    layout: Layout,
}

impl Extractor {
    /// Extractor for a custom layout.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// The layout this extractor matches.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Run the extraction over every non-empty row.
    ///
    /// With [`RowPolicy::Merge`] each row must be a complete layout pass and
    /// later rows augment the record built from earlier ones.
    pub fn extract(&self, stream: &FragmentStream) -> Result<InvoiceRecord, ReissueError> {
        let mut rows = stream.non_empty_rows();
        let Some((first_index, first_row)) = rows.next() else {
            return Err(ReissueError::malformed(
                0,
                HEADER_ANCHOR_NAME,
                MalformedKind::HeaderMismatch,
            ));
        };

        let mut record = self.extract_row(first_index, first_row)?;
        for (index, row) in rows {
            if self.layout.row_policy == RowPolicy::Single {
                return Err(ReissueError::malformed(
                    index,
                    HEADER_ANCHOR_NAME,
                    MalformedKind::UnexpectedRow,
                ));
            }
            record.merge(self.extract_row(index, row)?);
        }
        Ok(record)
    }

    /// Extract the fields of a single row.
    pub fn extract_row(
        &self,
        row_index: usize,
        fragments: &[String],
    ) -> Result<InvoiceRecord, ReissueError> {
        let layout = &self.layout;
        let mut cursor = Cursor::new(row_index, fragments);
        let mut record = InvoiceRecord::default();

        cursor.expect_block(&layout.header, HEADER_ANCHOR_NAME, MalformedKind::HeaderMismatch)?;

        match cursor.peek() {
            Some(fragment) if fragment == layout.invoice => cursor.advance(1),
            found => {
                return Err(ReissueError::malformed(
                    row_index,
                    layout.invoice.as_str(),
                    MalformedKind::UnexpectedSection {
                        found: found.unwrap_or_default().to_string(),
                    },
                ));
            }
        }

        match cursor.peek() {
            Some(marker) if layout.status_markers.iter().any(|m| m == marker) => {
                record.status = Some(marker.to_string());
                cursor.advance(1);
            }
            Some(_) if layout.status_advance == StatusAdvance::Always => {
                cursor.advance(1);
            }
            _ => {}
        }

        record.invoice_details = cursor.collect_until(&layout.bill_to)?;
        record.details = self.map_details(row_index, &record.invoice_details)?;
        record.bill_to = cursor.collect_until(&layout.ship_to)?;
        record.ship_to = cursor.collect_until(&layout.description)?;

        let payment_anchor = layout.payment_anchor();
        let region = cursor.region_until(payment_anchor)?;
        for (i, fragment) in region.iter().enumerate() {
            let Some(rule) = layout.label_rule(fragment) else {
                continue;
            };
            for capture in &rule.captures {
                let value = region.get(i + capture.offset).ok_or_else(|| {
                    ReissueError::malformed(
                        row_index,
                        rule.label.as_str(),
                        MalformedKind::MissingValue {
                            offset: capture.offset,
                        },
                    )
                })?;
                trace!(label = %rule.label, field = capture.field.name(), %value, "captured");
                record.set(capture.field, value.as_str());
            }
        }
        cursor.advance(region.len());

        cursor.expect_block(
            &layout.payment_block,
            payment_anchor,
            MalformedKind::PaymentBlockMismatch,
        )?;

        debug!(
            row = row_index,
            details = record.invoice_details.len(),
            bill_to = record.bill_to.len(),
            ship_to = record.ship_to.len(),
            trailing = cursor.remaining().len(),
            "extracted row"
        );
        Ok(record)
    }

    fn map_details(
        &self,
        row_index: usize,
        fragments: &[String],
    ) -> Result<Option<InvoiceDetails>, ReissueError> {
        let expected = InvoiceDetails::FIELDS.len();
        let count_error = || {
            ReissueError::malformed(
                row_index,
                DETAILS_ANCHOR_NAME,
                MalformedKind::FieldCount {
                    expected,
                    found: fragments.len(),
                },
            )
        };
        match self.layout.details_mode {
            DetailsMode::Verbatim => Ok(None),
            DetailsMode::Strict if fragments.len() != expected => Err(count_error()),
            DetailsMode::Truncate if fragments.len() < expected => Err(count_error()),
            DetailsMode::Strict | DetailsMode::Truncate => {
                if fragments.len() > expected {
                    debug!(
                        dropped = fragments.len() - expected,
                        "truncating invoice details"
                    );
                }
                InvoiceDetails::from_positional(&fragments[..expected])
                    .map(Some)
                    .ok_or_else(count_error)
            }
        }
    }
}

/// Forward-only position within one row.
struct Cursor<'r> {
    row_index: usize,
    fragments: &'r [String],
    pos: usize,
}

impl<'r> Cursor<'r> {
    fn new(row_index: usize, fragments: &'r [String]) -> Self {
        Self {
            row_index,
            fragments,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'r str> {
        self.fragments.get(self.pos).map(String::as_str)
    }

    fn remaining(&self) -> &'r [String] {
        self.fragments.get(self.pos..).unwrap_or_default()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.fragments.len());
    }

    /// Match `block` fragment-for-fragment at the cursor and step past it.
    fn expect_block(
        &mut self,
        block: &[String],
        anchor: &str,
        kind: MalformedKind,
    ) -> Result<(), ReissueError> {
        if !self.remaining().starts_with(block) {
            return Err(ReissueError::malformed(self.row_index, anchor, kind));
        }
        self.advance(block.len());
        Ok(())
    }

    /// Collect fragments up to `anchor` and step past the anchor.
    fn collect_until(&mut self, anchor: &str) -> Result<Vec<String>, ReissueError> {
        let section = self.find(anchor)?;
        self.advance(section.len() + 1);
        Ok(section.to_vec())
    }

    /// The non-empty run of fragments before `anchor`; the cursor stays put.
    fn region_until(&self, anchor: &str) -> Result<&'r [String], ReissueError> {
        let region = self.find(anchor)?;
        if region.is_empty() {
            return Err(ReissueError::malformed(
                self.row_index,
                anchor,
                MalformedKind::EmptySection,
            ));
        }
        Ok(region)
    }

    fn find(&self, anchor: &str) -> Result<&'r [String], ReissueError> {
        let remaining = self.remaining();
        remaining
            .iter()
            .position(|fragment| fragment == anchor)
            .map(|end| &remaining[..end])
            .ok_or_else(|| {
                ReissueError::malformed(self.row_index, anchor, MalformedKind::AnchorNotFound)
            })
    }
}
