//! VAT rate table.
//!
//! Until the EU one-stop-shop reform of 1 July 2021 distance sales below the
//! delivery threshold were taxed at the German rate; from then on the
//! destination country's rate applies. Non-EU destinations are zero-rated
//! exports.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Last day on which EU distance sales were taxed at the German rate.
pub const OSS_SWITCH_DATE: &str = "30.06.2021";

/// Country whose rate applies when a billing country is not in the table.
pub const DEFAULT_COUNTRY: &str = "Germany";

/// How the rate for a country is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VatSchedule {
    /// One rate regardless of date.
    Flat(Decimal),
    /// `until` applies up to and including `switch_date` (`DD.MM.YYYY`),
    /// `after` to issue dates strictly after it.
    Threshold {
        switch_date: &'static str,
        until: Decimal,
        after: Decimal,
    },
}

impl VatSchedule {
    /// The flat rate, or the rate applying up to the threshold.
    pub fn base_rate(&self) -> Decimal {
        match self {
            Self::Flat(rate) => *rate,
            Self::Threshold { until, .. } => *until,
        }
    }
}

/// A country and its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VatRateEntry {
    pub country: &'static str,
    pub schedule: VatSchedule,
}

const fn flat(country: &'static str, rate: Decimal) -> VatRateEntry {
    VatRateEntry {
        country,
        schedule: VatSchedule::Flat(rate),
    }
}

const fn oss(country: &'static str, destination_rate: Decimal) -> VatRateEntry {
    VatRateEntry {
        country,
        schedule: VatSchedule::Threshold {
            switch_date: OSS_SWITCH_DATE,
            until: dec!(0.19),
            after: destination_rate,
        },
    }
}

/// Rate table in lookup order. Names are matched as substrings of the
/// address line; the first match wins.
pub static VAT_RATES: &[VatRateEntry] = &[
    flat("Germany", dec!(0.19)),
    oss("Austria", dec!(0.20)),
    oss("Belgium", dec!(0.21)),
    oss("Bulgaria", dec!(0.20)),
    oss("Croatia", dec!(0.25)),
    oss("Cyprus", dec!(0.19)),
    oss("Czech Republic", dec!(0.21)),
    oss("Denmark", dec!(0.25)),
    oss("Estonia", dec!(0.20)),
    oss("Finland", dec!(0.24)),
    oss("France", dec!(0.20)),
    oss("Greece", dec!(0.24)),
    oss("Hungary", dec!(0.27)),
    oss("Ireland", dec!(0.23)),
    oss("Italy", dec!(0.22)),
    oss("Latvia", dec!(0.21)),
    oss("Lithuania", dec!(0.21)),
    oss("Luxembourg", dec!(0.17)),
    oss("Malta", dec!(0.18)),
    oss("Netherlands", dec!(0.21)),
    oss("Poland", dec!(0.23)),
    oss("Portugal", dec!(0.23)),
    oss("Romania", dec!(0.19)),
    oss("Slovakia", dec!(0.20)),
    oss("Slovenia", dec!(0.22)),
    oss("Spain", dec!(0.21)),
    oss("Sweden", dec!(0.25)),
    flat("Switzerland", dec!(0)),
    flat("Norway", dec!(0)),
    flat("United Kingdom", dec!(0)),
];
