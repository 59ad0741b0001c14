//! German number and date conventions used by comdirect exports.
//!
//! Amounts are written as `1.234,56` (`.` groups thousands, `,` separates
//! decimals); dates as `dd.mm.yyyy`.

use crate::error::{Error, Result};
use crate::types::Amount;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Booking date placeholder for transactions that are not booked yet.
pub const PENDING_DATE: &str = "offen";

/// Parse a localized amount such as `"4.588,30"` into an exact decimal.
pub fn parse_localized_amount(text: &str) -> Result<Decimal> {
    let cleaned = text
        .trim()
        .replace('"', "")
        .replace('.', "")
        .replace(',', ".");

    Decimal::from_str(cleaned.trim()).map_err(|_| Error::MalformedAmount(text.to_string()))
}

/// Parse a `dd.mm.yyyy` date.
///
/// Returns `None` for the pending marker and for anything that is not a
/// calendar date; the caller decides what a missing date means.
pub fn parse_localized_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim().trim_matches('"');
    if text.eq_ignore_ascii_case(PENDING_DATE) {
        return None;
    }
    NaiveDate::parse_from_str(text, "%d.%m.%Y").ok()
}

/// Split `"7.511,15 EUR"` into `("7.511,15", "EUR")`, dropping quotes.
pub fn split_amount_and_currency(text: &str) -> Result<(String, String)> {
    let unquoted = text.trim().replace('"', "");
    let (amount, currency) = unquoted.split_once(' ').ok_or_else(|| {
        Error::malformed_header("amount and currency must be separated by a space", text)
    })?;

    if currency.is_empty() || currency.contains(' ') {
        return Err(Error::malformed_header("expected a single currency code", text));
    }

    Ok((amount.to_string(), currency.to_string()))
}

/// Parse `"7.511,15 EUR"` into an [`Amount`].
pub fn parse_amount_with_currency(text: &str) -> Result<Amount> {
    let (amount, currency) = split_amount_and_currency(text)?;
    Ok(Amount::new(parse_localized_amount(&amount)?, currency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_localized_amount() {
        assert_eq!(parse_localized_amount("4.588,30").unwrap().to_string(), "4588.30");
        assert_eq!(
            parse_localized_amount("1.234.567,89").unwrap(),
            Decimal::from_str("1234567.89").unwrap()
        );
        assert_eq!(parse_localized_amount("\"-12,5\"").unwrap().to_string(), "-12.5");
    }

    #[test]
    fn test_parse_localized_amount_rejects_garbage() {
        assert!(matches!(
            parse_localized_amount("zwölf"),
            Err(Error::MalformedAmount(s)) if s == "zwölf"
        ));
        assert!(parse_localized_amount("").is_err());
    }

    #[test]
    fn test_parse_localized_date() {
        assert_eq!(
            parse_localized_date("01.06.2024"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_localized_date("offen"), None);
        assert_eq!(parse_localized_date("Offen"), None);
        assert_eq!(parse_localized_date("31.02.2024"), None);
        assert_eq!(parse_localized_date("2024-06-01"), None);
    }

    #[test]
    fn test_split_amount_and_currency() {
        let (amount, currency) = split_amount_and_currency("\"7.511,15 EUR\"").unwrap();
        assert_eq!(amount, "7.511,15");
        assert_eq!(currency, "EUR");

        assert!(matches!(
            split_amount_and_currency("7.511,15EUR"),
            Err(Error::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_parse_amount_with_currency() {
        let amount = parse_amount_with_currency("5.994,00 EUR").unwrap();
        assert_eq!(amount, Amount::new(Decimal::from_str("5994.00").unwrap(), "EUR"));
    }
}
