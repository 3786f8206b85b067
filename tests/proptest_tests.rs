//! Property-based tests for the extraction and reconciliation core.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "core")]

use proptest::prelude::*;
use refaktura::core::*;
use rust_decimal::Decimal;

fn arb_cents(max: i64) -> impl Strategy<Value = Decimal> {
    (0i64..max).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=27).prop_map(|percent| Decimal::new(percent, 2))
}

fn arb_any_decimal() -> impl Strategy<Value = Decimal> {
    (any::<u32>(), any::<u32>(), any::<u32>(), any::<bool>(), 0u32..=28)
        .prop_map(|(lo, mid, hi, negative, scale)| Decimal::from_parts(lo, mid, hi, negative, scale))
}

fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Invoice".to_string()),
        Just("Bill to:".to_string()),
        Just("Ship to:".to_string()),
        Just("Description".to_string()),
        Just("Qty".to_string()),
        Just("Subtotal:".to_string()),
        Just("Total:".to_string()),
        Just("Payment details:".to_string()),
        "[a-zA-Z0-9€.,: -]{0,12}",
    ]
}

proptest! {
    #[test]
    fn reconciled_totals_close(
        subtotal in arb_cents(1_000_000),
        discount in arb_cents(10_000),
        shipping in arb_cents(5_000),
        printed in proptest::option::of(arb_cents(1_500_000)),
        rate in arb_rate(),
    ) {
        let fmt = NumberFormat::default();
        let totals = close(
            Amounts { subtotal, discount, shipping, total: printed },
            rate,
            &fmt,
        )
        .unwrap();
        prop_assert!(totals.is_closed());
        prop_assert_eq!(totals.vat_amount, fmt.round(subtotal * rate));
        if let Some(printed) = printed {
            prop_assert_eq!(totals.total, printed);
        } else {
            prop_assert_eq!(totals.margin, Decimal::ZERO);
        }
    }

    #[test]
    fn reconciling_twice_changes_nothing(
        subtotal in arb_cents(1_000_000),
        shipping in arb_cents(5_000),
        printed in arb_cents(1_500_000),
        rate in arb_rate(),
    ) {
        let fmt = NumberFormat::default();
        let first = close(
            Amounts { subtotal, discount: Decimal::ZERO, shipping, total: Some(printed) },
            rate,
            &fmt,
        )
        .unwrap();
        let second = close(
            Amounts {
                subtotal,
                discount: first.discount,
                shipping: first.shipping,
                total: Some(first.total),
            },
            rate,
            &fmt,
        )
        .unwrap();
        prop_assert_eq!(second.margin, Decimal::ZERO);
        prop_assert_eq!(second.total, first.total);
    }

    #[test]
    fn closing_extreme_amounts_never_panics(
        subtotal in arb_any_decimal(),
        discount in arb_any_decimal(),
        shipping in arb_any_decimal(),
        printed in proptest::option::of(arb_any_decimal()),
        rate in arb_rate(),
    ) {
        let amounts = Amounts { subtotal, discount: discount.abs(), shipping, total: printed };
        if let Ok(totals) = close(amounts, rate, &NumberFormat::default()) {
            prop_assert!(totals.is_closed());
        }
    }

    #[test]
    fn formatted_money_parses_back(value in arb_cents(1_000_000_000)) {
        let fmt = NumberFormat::default();
        let printed = fmt.format_money(value);
        prop_assert_eq!(fmt.parse_amount("total", &printed).unwrap(), value);
    }

    #[test]
    fn extractor_never_panics(rows in proptest::collection::vec(
        proptest::collection::vec(arb_fragment(), 0..40),
        0..3,
    )) {
        let mut with_header = rows.clone();
        if let Some(first) = with_header.first_mut() {
            let mut row: Vec<String> = HEADER_BLOCK.iter().map(|s| s.to_string()).collect();
            row.append(first);
            *first = row;
        }
        for stream in [rows, with_header] {
            let _ = Extractor::default().extract(&FragmentStream::new(stream));
        }
    }

    #[test]
    fn amount_parser_never_panics(raw in "\\PC{0,24}") {
        let _ = NumberFormat::default().parse_amount("subtotal", &raw);
    }
}
