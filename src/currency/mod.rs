//! Currency handling: the two supported denominations, the fixed reference
//! rate, conversion, and display formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference EUR → Kz exchange rate used for consolidated figures.
pub const EUR_TO_KZ_RATE: f64 = 1050.25;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// The two denominations a wallet can hold.
pub enum Currency {
    Kz,
    Eur,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Kz => "Kz",
            Currency::Eur => "€",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kz" | "aoa" => Some(Currency::Kz),
            "eur" | "€" => Some(Currency::Eur),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Currency::Kz => "Kz",
            Currency::Eur => "EUR",
        };
        f.write_str(label)
    }
}

/// Converts an amount into its Kz equivalent at the given rate.
///
/// Kz amounts pass through unchanged; EUR amounts are multiplied by the
/// rate. Pure arithmetic, no rounding beyond native f64.
pub fn convert_to_kz(amount: f64, currency: Currency, rate: f64) -> f64 {
    match currency {
        Currency::Kz => amount,
        Currency::Eur => amount * rate,
    }
}

/// Formats a Kz amount with thousands grouping, e.g. `1 250 000 Kz`.
pub fn format_kz(amount: f64) -> String {
    format!("{} Kz", format_grouped(amount, 0))
}

/// Formats a EUR amount with two decimal places, e.g. `1 234.50 €`.
pub fn format_eur(amount: f64) -> String {
    format!("{} €", format_grouped(amount, 2))
}

pub fn format_amount(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::Kz => format_kz(amount),
        Currency::Eur => format_eur(amount),
    }
}

fn format_grouped(value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (body, None),
    };
    let mut grouped = group_digits(&int_part, ' ');
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(&frac);
    }
    if value < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}
