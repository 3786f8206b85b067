#![cfg(feature = "core")]

use pretty_assertions::assert_eq;
use refaktura::core::*;

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// A complete row: header, `middle`, payment block.
fn row(middle: &[&str]) -> Vec<String> {
    HEADER_BLOCK
        .iter()
        .chain(middle)
        .chain(PAYMENT_BLOCK)
        .map(|s| s.to_string())
        .collect()
}

fn standard_middle() -> Vec<&'static str> {
    vec![
        "Invoice",
        "PAID",
        "Invoice Number: 1042",
        "Invoice Date: May 5, 2021",
        "Bill to:",
        "Erika Mustermann",
        "Lindenweg 4",
        "10115 Berlin",
        "Germany",
        "Ship to:",
        "Erika Mustermann",
        "Lindenweg 4",
        "Description",
        "Qty",
        "Price",
        "Barista Pro grinder",
        "1",
        "€249,00",
        "Discount:",
        "-€10,00",
        "Shipping:",
        "€5,90",
        "Subtotal:",
        "€210,84",
        "Total:",
        "€245,00",
    ]
}

fn extract(middle: &[&str]) -> Result<InvoiceRecord, ReissueError> {
    Extractor::default().extract(&FragmentStream::new(vec![row(middle)]))
}

fn malformed_kind(err: ReissueError) -> (String, MalformedKind) {
    match err {
        ReissueError::MalformedDocument { anchor, kind, .. } => (anchor, kind),
        other => panic!("expected malformed document, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// Well-formed documents
// ---------------------------------------------------------------------------

#[test]
fn all_sections_and_labels() {
    let record = extract(&standard_middle()).unwrap();
    assert_eq!(record.status.as_deref(), Some("PAID"));
    assert_eq!(
        record.invoice_details,
        strings(&["Invoice Number: 1042", "Invoice Date: May 5, 2021"])
    );
    assert_eq!(
        record.bill_to,
        strings(&["Erika Mustermann", "Lindenweg 4", "10115 Berlin", "Germany"])
    );
    assert_eq!(record.ship_to, strings(&["Erika Mustermann", "Lindenweg 4"]));
    assert_eq!(record.description.as_deref(), Some("Barista Pro grinder"));
    assert_eq!(record.quantity.as_deref(), Some("1"));
    assert_eq!(record.discount.as_deref(), Some("-€10,00"));
    assert_eq!(record.shipping.as_deref(), Some("€5,90"));
    assert_eq!(record.subtotal.as_deref(), Some("€210,84"));
    assert_eq!(record.total.as_deref(), Some("€245,00"));
    assert_eq!(record.issue_date_text(), Some("May 5, 2021"));
}

#[test]
fn optional_labels_absent() {
    let middle: Vec<_> = standard_middle()
        .into_iter()
        .filter(|f| !matches!(*f, "Discount:" | "-€10,00" | "Shipping:" | "€5,90"))
        .collect();
    let record = extract(&middle).unwrap();
    assert_eq!(record.discount, None);
    assert_eq!(record.shipping, None);
    assert_eq!(record.subtotal.as_deref(), Some("€210,84"));
}

#[test]
fn no_status_marker() {
    let middle: Vec<_> = standard_middle()
        .into_iter()
        .filter(|f| *f != "PAID")
        .collect();
    let record = extract(&middle).unwrap();
    assert_eq!(record.status, None);
    assert_eq!(record.invoice_details.len(), 2);
}

#[test]
fn status_always_advances() {
    let layout = LayoutBuilder::new()
        .status_advance(StatusAdvance::Always)
        .build();
    let middle: Vec<_> = standard_middle()
        .into_iter()
        .filter(|f| *f != "PAID")
        .collect();
    let record = Extractor::new(layout)
        .extract(&FragmentStream::new(vec![row(&middle)]))
        .unwrap();
    // The fragment after the title is skipped even though it is no marker.
    assert_eq!(record.invoice_details, strings(&["Invoice Date: May 5, 2021"]));
}

#[test]
fn extra_status_marker() {
    let layout = LayoutBuilder::new().status_marker("REFUNDED").build();
    let mut middle = standard_middle();
    middle[1] = "REFUNDED";
    let record = Extractor::new(layout)
        .extract(&FragmentStream::new(vec![row(&middle)]))
        .unwrap();
    assert_eq!(record.status.as_deref(), Some("REFUNDED"));
}

#[test]
fn empty_address_sections_allowed() {
    let record = extract(&[
        "Invoice",
        "Bill to:",
        "Ship to:",
        "Description",
        "Subtotal:",
        "€1,00",
    ])
    .unwrap();
    assert!(record.invoice_details.is_empty());
    assert!(record.bill_to.is_empty());
    assert!(record.ship_to.is_empty());
    assert_eq!(record.subtotal.as_deref(), Some("€1,00"));
}

#[test]
fn trailing_fragments_after_payment_block_ignored() {
    let mut fragments = row(&standard_middle());
    fragments.push("Thank you for your order!".into());
    let record = Extractor::default()
        .extract(&FragmentStream::new(vec![fragments]))
        .unwrap();
    assert_eq!(record.total.as_deref(), Some("€245,00"));
}

// ---------------------------------------------------------------------------
// Malformed documents
// ---------------------------------------------------------------------------

#[test]
fn empty_stream() {
    let err = Extractor::default()
        .extract(&FragmentStream::default())
        .unwrap_err();
    assert_eq!(malformed_kind(err).1, MalformedKind::HeaderMismatch);
}

#[test]
fn corrupt_header() {
    let mut fragments = row(&standard_middle());
    fragments[1] = "Hafenstrasse 12".into();
    let err = Extractor::default()
        .extract(&FragmentStream::new(vec![fragments]))
        .unwrap_err();
    assert_eq!(malformed_kind(err), ("header block".to_string(), MalformedKind::HeaderMismatch));
}

#[test]
fn credit_note_is_unexpected_section() {
    let mut middle = standard_middle();
    middle[0] = "Credit Note";
    let (anchor, kind) = malformed_kind(extract(&middle).unwrap_err());
    assert_eq!(anchor, "Invoice");
    assert_eq!(
        kind,
        MalformedKind::UnexpectedSection {
            found: "Credit Note".into()
        }
    );
}

#[test]
fn missing_section_anchor_is_named() {
    for missing in ["Bill to:", "Ship to:", "Description"] {
        let middle: Vec<_> = standard_middle()
            .into_iter()
            .filter(|f| *f != missing)
            .collect();
        let (anchor, kind) = malformed_kind(extract(&middle).unwrap_err());
        assert_eq!(anchor, missing);
        assert_eq!(kind, MalformedKind::AnchorNotFound);
    }
}

#[test]
fn missing_payment_anchor() {
    let fragments: Vec<String> = row(&standard_middle())
        .into_iter()
        .filter(|f| f != "Payment details:")
        .collect();
    let err = Extractor::default()
        .extract(&FragmentStream::new(vec![fragments]))
        .unwrap_err();
    let (anchor, kind) = malformed_kind(err);
    assert_eq!(anchor, "Payment details:");
    assert_eq!(kind, MalformedKind::AnchorNotFound);
}

#[test]
fn empty_line_item_region() {
    let (anchor, kind) = malformed_kind(
        extract(&["Invoice", "Bill to:", "Ship to:", "Description"]).unwrap_err(),
    );
    assert_eq!(anchor, "Payment details:");
    assert_eq!(kind, MalformedKind::EmptySection);
}

#[test]
fn label_without_value() {
    let (anchor, kind) = malformed_kind(
        extract(&["Invoice", "Bill to:", "Ship to:", "Description", "Subtotal:"]).unwrap_err(),
    );
    assert_eq!(anchor, "Subtotal:");
    assert_eq!(kind, MalformedKind::MissingValue { offset: 1 });
}

#[test]
fn qty_offsets_stay_in_region() {
    let (anchor, kind) = malformed_kind(
        extract(&["Invoice", "Bill to:", "Ship to:", "Description", "Qty", "Price", "Mug"])
            .unwrap_err(),
    );
    assert_eq!(anchor, "Qty");
    assert_eq!(kind, MalformedKind::MissingValue { offset: 3 });
}

#[test]
fn corrupt_payment_block() {
    let mut fragments = row(&standard_middle());
    let last = fragments.len() - 1;
    fragments[last] = "Sparkasse".into();
    let err = Extractor::default()
        .extract(&FragmentStream::new(vec![fragments]))
        .unwrap_err();
    let (anchor, kind) = malformed_kind(err);
    assert_eq!(anchor, "Payment details:");
    assert_eq!(kind, MalformedKind::PaymentBlockMismatch);
}

// ---------------------------------------------------------------------------
// Positional invoice details
// ---------------------------------------------------------------------------

fn positional_middle(details: &[&'static str]) -> Vec<&'static str> {
    let mut middle = vec!["Invoice"];
    middle.extend(details);
    middle.extend(["Bill to:", "Germany", "Ship to:", "Description", "Subtotal:", "€1,00"]);
    middle
}

const SIX_DETAILS: [&str; 6] = [
    "1042",
    "May 5, 2021",
    "May 4, 2021",
    "WEB-77",
    "PayPal",
    "DHL Paket",
];

#[test]
fn strict_details() {
    let extractor = Extractor::new(LayoutBuilder::new().details_mode(DetailsMode::Strict).build());
    let record = extractor
        .extract(&FragmentStream::new(vec![row(&positional_middle(&SIX_DETAILS))]))
        .unwrap();
    let details = record.details.as_ref().unwrap();
    assert_eq!(details.order_number, "WEB-77");
    assert_eq!(details.shipping_method, "DHL Paket");
    assert_eq!(record.issue_date_text(), Some("May 5, 2021"));

    let err = extractor
        .extract(&FragmentStream::new(vec![row(&positional_middle(&SIX_DETAILS[..5]))]))
        .unwrap_err();
    assert_eq!(
        malformed_kind(err),
        (
            "invoice details".to_string(),
            MalformedKind::FieldCount {
                expected: 6,
                found: 5
            }
        )
    );
}

#[test]
fn truncate_details() {
    let extractor = Extractor::new(LayoutBuilder::new().details_mode(DetailsMode::Truncate).build());
    let mut seven = SIX_DETAILS.to_vec();
    seven.push("Gift wrap");
    let record = extractor
        .extract(&FragmentStream::new(vec![row(&positional_middle(&seven))]))
        .unwrap();
    assert_eq!(record.details.unwrap().shipping_method, "DHL Paket");
    assert_eq!(record.invoice_details.len(), 7);

    let strict = Extractor::new(LayoutBuilder::new().details_mode(DetailsMode::Strict).build());
    assert!(
        strict
            .extract(&FragmentStream::new(vec![row(&positional_middle(&seven))]))
            .is_err()
    );
}

// ---------------------------------------------------------------------------
// Multi-row streams
// ---------------------------------------------------------------------------

#[test]
fn empty_rows_are_skipped() {
    let stream = FragmentStream::new(vec![vec![], row(&standard_middle()), vec![]]);
    assert!(Extractor::default().extract(&stream).is_ok());
}

#[test]
fn rows_are_merged() {
    let second = row(&[
        "Invoice",
        "Bill to:",
        "Ship to:",
        "Description",
        "Total:",
        "€250,00",
    ]);
    let stream = FragmentStream::new(vec![row(&standard_middle()), second]);
    let record = Extractor::default().extract(&stream).unwrap();
    assert_eq!(record.total.as_deref(), Some("€250,00"));
    assert_eq!(record.subtotal.as_deref(), Some("€210,84"));
    assert_eq!(record.bill_to.len(), 4);
}

#[test]
fn single_row_policy_rejects_second_row() {
    let extractor = Extractor::new(LayoutBuilder::new().row_policy(RowPolicy::Single).build());
    let stream = FragmentStream::new(vec![
        row(&standard_middle()),
        vec![],
        row(&standard_middle()),
    ]);
    let err = extractor.extract(&stream).unwrap_err();
    match err {
        ReissueError::MalformedDocument { row, kind, .. } => {
            assert_eq!(row, 2);
            assert_eq!(kind, MalformedKind::UnexpectedRow);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn error_in_second_row_names_it() {
    let mut broken = row(&standard_middle());
    broken.truncate(3);
    let stream = FragmentStream::new(vec![row(&standard_middle()), broken]);
    match Extractor::default().extract(&stream).unwrap_err() {
        ReissueError::MalformedDocument { row, .. } => assert_eq!(row, 1),
        other => panic!("unexpected error {other}"),
    }
}

// ---------------------------------------------------------------------------
// Custom layouts
// ---------------------------------------------------------------------------

#[test]
fn custom_header_and_label() {
    let layout = LayoutBuilder::new()
        .header(["Kaffeerösterei Süd", "München"])
        .label("Total:", &[(2, LineField::Total)])
        .build();
    let fragments: Vec<String> = [
        "Kaffeerösterei Süd",
        "München",
        "Invoice",
        "Bill to:",
        "Ship to:",
        "Description",
        "Subtotal:",
        "€10,00",
        "Total:",
        "(gross)",
        "€11,90",
    ]
    .iter()
    .chain(PAYMENT_BLOCK)
    .map(|s| s.to_string())
    .collect();
    let record = Extractor::new(layout)
        .extract(&FragmentStream::new(vec![fragments]))
        .unwrap();
    assert_eq!(record.total.as_deref(), Some("€11,90"));
}

#[test]
fn layout_from_json() {
    let layout: Layout =
        serde_json::from_str(r#"{"status_markers": ["PAID", "OPEN"], "details_mode": "truncate"}"#)
            .unwrap();
    assert_eq!(layout.details_mode, DetailsMode::Truncate);
    assert_eq!(layout.invoice, "Invoice");
    assert_eq!(layout.labels.len(), LINE_LABELS.len());
}

#[test]
fn fragment_stream_from_json() {
    let stream: FragmentStream = serde_json::from_str(r#"[["a", "b"], []]"#).unwrap();
    assert_eq!(stream.rows().len(), 2);
    assert_eq!(stream.non_empty_rows().count(), 1);
}
