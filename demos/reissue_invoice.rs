use refaktura::core::*;
use refaktura::reissue::{Batch, Document, FailurePolicy, Reissuer};

fn invoice(bill_to: &[&str], date: &str, amounts: &[&str]) -> FragmentStream {
    let mut fragments: Vec<&str> = HEADER_BLOCK.to_vec();
    fragments.extend(["Invoice", "PAID", "Invoice Number: 2021-0815"]);
    fragments.push(date);
    fragments.push("Bill to:");
    fragments.extend(bill_to);
    fragments.extend(["Ship to:", "Same as billing address"]);
    fragments.extend(["Description", "Qty", "Price", "Ceramic pour-over set", "2"]);
    fragments.extend(amounts);
    fragments.extend(PAYMENT_BLOCK);
    FragmentStream::single_row(fragments)
}

fn main() {
    // A Dutch business customer, issued after the OSS switch: 21% applies,
    // and the printed total (computed at 19%) is kept by adjusting the discount.
    let dutch = invoice(
        &["Koffiebar De Boon B.V.", "Utrecht", "VAT Number: NL123456789B01"],
        "Invoice Date: August 12, 2021",
        &[
            "Subtotal:", "€84,03", "Discount:", "-€5,00", "Shipping:", "€4,90", "Total:", "€99,90",
        ],
    );

    let reissuer = Reissuer::default();
    let reissued = reissuer.reissue(&dutch).unwrap();
    let totals = &reissued.totals;
    println!(
        "VAT {} at {}, margin {}, closed: {}",
        totals.vat_amount,
        totals.vat_rate,
        totals.margin,
        totals.is_closed()
    );
    for (key, value) in reissued.parameters.iter() {
        println!("  {key:16} {value}");
    }

    // A batch with one broken document: it is logged and skipped.
    let documents = vec![
        Document::new("2021-0815", dutch),
        Document::new(
            "broken",
            FragmentStream::single_row(["Some other shop", "Invoice"]),
        ),
        Document::new(
            "2021-0816",
            invoice(
                &["Erika Mustermann", "Berlin", "Germany"],
                "Invoice Date: August 13, 2021",
                &["Subtotal:", "€42,00", "Shipping:", "Free shipping", "Total:", "€49,98"],
            ),
        ),
    ];
    let report = Batch::new(reissuer, FailurePolicy::Skip)
        .run_parallel(&documents, 2)
        .unwrap();
    println!(
        "\n{} re-issued, {} failed",
        report.reissued.len(),
        report.failed.len()
    );
    for (name, e) in &report.failed {
        println!("  {name}: {e}");
    }
}
