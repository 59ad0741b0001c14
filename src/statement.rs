//! comdirect checking account export parser.
//!
//! Layout of an export:
//!
//! ```text
//! ;
//! "Umsätze Girokonto";"Zeitraum: 30 Tage";
//! "Neuer Kontostand";"7.511,15 EUR";
//!
//! "Buchungstag";"Wertstellung (Valuta)";"Vorgang";"Buchungstext";"Umsatz in EUR";
//! "02.09.2024";"02.09.2024";"Lastschrift / Belastung";"...";"-12,34";
//! "Alter Kontostand";"5.994,00 EUR";
//! ```
//!
//! All state lives on the stack of a single call, so one parser may be used
//! for many files at once.

use crate::config::ImporterConfig;
use crate::detector::identify_text;
use crate::error::{Error, Result};
use crate::header::{parse_closing_balance_line, resolve_period};
use crate::locale::{parse_amount_with_currency, parse_localized_amount, parse_localized_date};
use crate::types::{
    Amount, BalanceAssertion, Entry, Extraction, Posting, SourceMeta, Statement, StatementHeader,
    Transaction, COMPLETE_FLAG,
};
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::io::Read;
use tracing::debug;

const BOOKING_DATE: &str = "Buchungstag";
const VALUE_DATE: &str = "Wertstellung (Valuta)";
const AMOUNT: &str = "Umsatz in EUR";
const DESCRIPTION: &str = "Buchungstext";

/// Booking date field of the row that ends the transaction block.
pub const OPENING_BALANCE_LABEL: &str = "Alter Kontostand";

/// Lines before the tabular section.
const HEADER_LINES: usize = 4;

/// Decode Latin-1 bytes. Never interprets the input as UTF-8.
pub fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    WINDOWS_1252.decode_without_bom_handling(bytes).0
}

/// Parse a statement from any source implementing `Read`.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
/// use comdirect_importer::{statement, Extraction, ImporterConfig};
///
/// let name = "umsaetze_5873596814_20240901-1606.csv";
/// let config = ImporterConfig::new("Assets:Comdirect:Checking", "5873596814");
/// let mut file = File::open(name)?;
/// if let Extraction::Parsed(parsed) = statement::from_read(&mut file, name, &config)? {
///     println!("{} entries", parsed.entries.len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn from_read<R: Read>(
    reader: &mut R,
    file_name: &str,
    config: &ImporterConfig,
) -> Result<Extraction> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_statement(&decode_latin1(&bytes), file_name, config)
}

/// Parse decoded export contents.
///
/// Returns [`Extraction::Skipped`] when the contents are not an export.
pub fn parse_statement(text: &str, file_name: &str, config: &ImporterConfig) -> Result<Extraction> {
    if !identify_text(text) {
        return Ok(skipped(file_name));
    }

    let mut cursor = LineCursor::new(text);
    let header = parse_header(&mut cursor, file_name)?;

    if !cursor.next_line().is_empty() {
        return Err(Error::malformed_header("empty line expected after header", cursor.current()));
    }

    let rows = read_rows(cursor.remainder(), file_name, config)?;

    let mut entries: Vec<Entry> = rows.transactions.into_iter().map(Entry::Transaction).collect();

    // The export states the balance at the end of the last day; ledger
    // balances hold at the start of a day.
    let period_end = header.period.end;
    let balance_date = period_end.succ_opt().ok_or_else(|| {
        Error::malformed_header("period end has no following day", period_end.to_string())
    })?;
    entries.push(Entry::Balance(BalanceAssertion {
        meta: SourceMeta::new(file_name, header.closing_balance_line),
        date: balance_date,
        account: config.account.clone(),
        amount: header.closing_balance.clone(),
    }));

    Ok(Extraction::Parsed(Statement {
        header,
        entries,
        opening_balance: rows.opening_balance,
    }))
}

/// Read only the metadata header (lines 1-3).
///
/// Returns `None` when the contents are not an export.
pub fn read_header(text: &str, file_name: &str) -> Result<Option<StatementHeader>> {
    if !identify_text(text) {
        return Ok(None);
    }
    parse_header(&mut LineCursor::new(text), file_name).map(Some)
}

fn skipped(file_name: &str) -> Extraction {
    let reason = format!("{} is not compatible with the comdirect importer", file_name);
    tracing::warn!("{}", reason);
    Extraction::Skipped { reason }
}

fn parse_header(cursor: &mut LineCursor<'_>, file_name: &str) -> Result<StatementHeader> {
    cursor.next_line();

    let period = resolve_period(cursor.next_line(), file_name)?;

    let balance_line = cursor.next_line();
    let closing_balance = parse_closing_balance_line(balance_line, cursor.line_no())?;

    debug!(
        start = %period.start,
        end = %period.end,
        closing_balance = %closing_balance,
        "resolved statement header"
    );

    Ok(StatementHeader {
        period,
        closing_balance,
        closing_balance_line: cursor.line_no(),
    })
}

/// Walks the text line by line, keeping the 1-based number of the last line.
struct LineCursor<'a> {
    text: &'a str,
    offset: usize,
    line_no: usize,
    current: &'a str,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line_no: 0,
            current: "",
        }
    }

    /// Next line without surrounding whitespace; empty once the text ends.
    fn next_line(&mut self) -> &'a str {
        let rest = &self.text[self.offset..];
        let len = rest.find('\n').map_or(rest.len(), |idx| idx + 1);
        self.offset += len;
        self.line_no += 1;
        self.current = rest[..len].trim();
        self.current
    }

    fn current(&self) -> &'a str {
        self.current
    }

    fn line_no(&self) -> usize {
        self.line_no
    }

    fn remainder(&self) -> &'a str {
        &self.text[self.offset..]
    }
}

/// Column positions taken from the table's header row.
struct Columns {
    booking_date: Option<usize>,
    value_date: Option<usize>,
    amount: Option<usize>,
    description: Option<usize>,
    header_line: String,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|field| field.trim() == name);
        Self {
            booking_date: position(BOOKING_DATE),
            value_date: position(VALUE_DATE),
            amount: position(AMOUNT),
            description: position(DESCRIPTION),
            header_line: headers.iter().collect::<Vec<_>>().join(";"),
        }
    }

    fn field<'r>(
        &self,
        record: &'r StringRecord,
        column: Option<usize>,
        name: &str,
    ) -> Result<&'r str> {
        let idx = column.ok_or_else(|| {
            let reason = format!("column \"{}\" missing", name);
            Error::malformed_header(reason, self.header_line.as_str())
        })?;
        Ok(record.get(idx).unwrap_or("").trim())
    }
}

struct Rows {
    transactions: Vec<Transaction>,
    opening_balance: Option<Amount>,
}

fn read_rows(table: &str, file_name: &str, config: &ImporterConfig) -> Result<Rows> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(table.as_bytes());

    let columns = Columns::from_headers(reader.headers()?);
    let mut transactions = Vec::new();
    let mut opening_balance = None;

    for result in reader.records() {
        let record = result?;
        let line_no = HEADER_LINES + record.position().map_or(0, |pos| pos.line() as usize);

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let booking_date = columns.field(&record, columns.booking_date, BOOKING_DATE)?;
        if booking_date == OPENING_BALANCE_LABEL {
            let value = columns.field(&record, columns.value_date, VALUE_DATE)?;
            opening_balance = Some(parse_amount_with_currency(value)?);
            break;
        }

        let amount = parse_localized_amount(columns.field(&record, columns.amount, AMOUNT)?)?;

        let Some(date) = parse_localized_date(booking_date) else {
            debug!(line = line_no, booking_date, "skipping row without booking date");
            continue;
        };

        let narration = columns.field(&record, columns.description, DESCRIPTION)?;
        transactions.push(Transaction {
            meta: SourceMeta::new(file_name, line_no),
            date,
            flag: COMPLETE_FLAG,
            narration: narration.to_string(),
            postings: vec![Posting {
                account: config.account.clone(),
                amount: Amount::new(amount, config.currency.as_str()),
            }],
        });
    }

    debug!(count = transactions.len(), "read transactions");

    Ok(Rows {
        transactions,
        opening_balance,
    })
}
