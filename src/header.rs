//! Metadata header of a comdirect export.
//!
//! Line 2 describes the statement period. Older exports name both ends
//! (`"Zeitraum: 01.06.2024 - 09.06.2024"`), newer ones only give a length
//! (`"Zeitraum: 30 Tage"`) and the end has to come from the export time
//! stamped into the file name (`umsaetze_1234567890_20240901-1606.csv`).

use crate::error::{Error, Result};
use crate::locale::parse_amount_with_currency;
use crate::types::{Amount, Period};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::path::Path;

pub const PERIOD_MARKER: &str = "Zeitraum:";
pub const CLOSING_BALANCE_LABEL: &str = "\"Neuer Kontostand\";";

/// Export time encoded in the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl FileStamp {
    /// Date and time of the export; midnight when the name has no time.
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

/// Read the `yyyymmdd[-hhmm]` stamp from the last `_` segment of a file name.
pub fn parse_file_stamp(file_name: &str) -> Result<FileStamp> {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);

    let stamp_re = Regex::new(r"_(\d{4})(\d{2})(\d{2})(?:-(\d{2})(\d{2}))?(?:\.[^._]+)?$")?;
    let invalid = || Error::InvalidFileName(file_name.to_string());
    let caps = stamp_re.captures(base).ok_or_else(invalid)?;

    let number = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<u32>().ok());
    let year = caps[1].parse::<i32>().map_err(|_| invalid())?;
    let date = match (number(2), number(3)) {
        (Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day),
        _ => None,
    }
    .ok_or_else(invalid)?;

    let time = match (number(4), number(5)) {
        (Some(hour), Some(minute)) => {
            Some(NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?)
        }
        _ => None,
    };

    Ok(FileStamp { date, time })
}

/// Resolve the statement period from header line 2.
///
/// Two explicit dates win. Otherwise a `Zeitraum: N Tage` phrase counts back
/// from the date in the file name, which is only consulted in that case.
pub fn resolve_period(line: &str, file_name: &str) -> Result<Period> {
    let date_re = Regex::new(r"\b\d{2}\.\d{2}\.\d{4}\b")?;
    let dates = date_re
        .find_iter(line)
        .map(|m| {
            NaiveDate::parse_from_str(m.as_str(), "%d.%m.%Y")
                .map_err(|_| Error::malformed_header(format!("invalid date {}", m.as_str()), line))
        })
        .collect::<Result<Vec<_>>>()?;

    if let [start, end] = dates.as_slice() {
        return Ok(Period { start: *start, end: *end });
    }

    if !line.contains(PERIOD_MARKER) {
        return Err(Error::malformed_header("start and end dates could not be determined", line));
    }

    let days_re = Regex::new(r"(\d+)\s*Tage")?;
    let days = days_re
        .captures(line)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .ok_or_else(|| Error::malformed_header("start date could not be determined", line))?;

    let end = parse_file_stamp(file_name)
        .map_err(|_| {
            Error::malformed_header(format!("no end date in file name {}", file_name), line)
        })?
        .date;
    let start = end
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| Error::malformed_header("period reaches before the calendar", line))?;

    Ok(Period { start, end })
}

/// Parse header line 3, `"Neuer Kontostand";"4.588,30 EUR";`.
///
/// `line_no` is only used for the error when the label is missing.
pub fn parse_closing_balance_line(line: &str, line_no: usize) -> Result<Amount> {
    if !line.starts_with(CLOSING_BALANCE_LABEL) {
        return Err(Error::MissingClosingBalance { line: line_no });
    }

    let field = line
        .split(';')
        .nth(1)
        .filter(|field| !field.trim().is_empty())
        .ok_or_else(|| Error::malformed_header("closing balance has no amount", line))?;

    parse_amount_with_currency(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_file_stamp() {
        let stamp = parse_file_stamp("/tmp/umsaetze_5873596814_20240522-1438.csv").unwrap();
        assert_eq!(stamp.date, date(2024, 5, 22));
        assert_eq!(stamp.time, NaiveTime::from_hms_opt(14, 38, 0));
        assert_eq!(
            stamp.as_datetime(),
            date(2024, 5, 22).and_hms_opt(14, 38, 0).unwrap()
        );

        let stamp = parse_file_stamp("umsaetze_5873596814_20240522.csv").unwrap();
        assert_eq!(stamp.time, None);
    }

    #[test]
    fn test_parse_file_stamp_rejects_other_names() {
        assert!(matches!(parse_file_stamp("statement.csv"), Err(Error::InvalidFileName(_))));
        assert!(parse_file_stamp("umsaetze_123_20241340-1606.csv").is_err());
    }

    #[test]
    fn test_resolve_period_from_days() {
        let period = resolve_period(
            "\"Umsätze Girokonto\";\"Zeitraum: 30 Tage\";",
            "umsaetze_1234567890_20240901-1606.csv",
        )
        .unwrap();
        assert_eq!(period.end, date(2024, 9, 1));
        assert_eq!(period.start, date(2024, 8, 2));
    }

    #[test]
    fn test_resolve_period_from_explicit_dates() {
        let period = resolve_period(
            "\"Umsätze Girokonto\";\"Zeitraum: 01.06.2024 - 09.06.2024\";",
            "no-stamp-here.csv",
        )
        .unwrap();
        assert_eq!(
            period,
            Period {
                start: date(2024, 6, 1),
                end: date(2024, 6, 9),
            }
        );
    }

    #[test]
    fn test_resolve_period_failures() {
        assert!(matches!(
            resolve_period("\"Umsätze Girokonto\";\"irgendwas\";", "umsaetze_1_20240901-1606.csv"),
            Err(Error::MalformedHeader { .. })
        ));
        assert!(matches!(
            resolve_period("\"Umsätze Girokonto\";\"Zeitraum: 30 Tage\";", "statement.csv"),
            Err(Error::MalformedHeader { .. })
        ));
        assert!(matches!(
            resolve_period("\"Zeitraum: 31.02.2024 - 09.06.2024\";", "statement.csv"),
            Err(Error::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_parse_closing_balance_line() {
        let line = "\"Neuer Kontostand\";\"4.588,30 EUR\";";
        let amount = parse_closing_balance_line(line, 3).unwrap();
        assert_eq!(amount.number, Decimal::from_str("4588.30").unwrap());
        assert_eq!(amount.currency, "EUR");
    }

    #[test]
    fn test_missing_closing_balance() {
        assert!(matches!(
            parse_closing_balance_line("\"Buchungstag\";......", 3),
            Err(Error::MissingClosingBalance { line: 3 })
        ));
        assert!(matches!(
            parse_closing_balance_line("\"Neuer Kontostand\";\"4.588,30\";", 3),
            Err(Error::MalformedHeader { .. })
        ));
    }
}
