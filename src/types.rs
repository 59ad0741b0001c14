//! Ledger entry types produced by the importer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flag attached to every imported transaction.
pub const COMPLETE_FLAG: char = '*';

/// A decimal number paired with its currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Exact amount, never a binary float.
    pub number: Decimal,

    /// Currency code (e.g., EUR).
    pub currency: String,
}

impl Amount {
    /// Create a new amount.
    pub fn new(number: Decimal, currency: impl Into<String>) -> Self {
        Self {
            number,
            currency: currency.into(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.currency)
    }
}

/// Where in the source file an entry came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    /// File the entry was read from.
    pub filename: String,

    /// 1-based physical line number.
    pub lineno: usize,
}

impl SourceMeta {
    pub fn new(filename: impl Into<String>, lineno: usize) -> Self {
        Self {
            filename: filename.into(),
            lineno,
        }
    }
}

/// A single leg of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub account: String,
    pub amount: Amount,
}

/// A booked transaction read from one data row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub meta: SourceMeta,

    /// Booking date ("Buchungstag").
    pub date: NaiveDate,

    pub flag: char,

    /// Raw "Buchungstext" of the row.
    pub narration: String,

    pub postings: Vec<Posting>,
}

/// Assertion that an account holds an amount at the start of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAssertion {
    pub meta: SourceMeta,
    pub date: NaiveDate,
    pub account: String,
    pub amount: Amount,
}

/// An entry handed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Transaction(Transaction),
    Balance(BalanceAssertion),
}

impl Entry {
    /// Date the entry is booked on.
    pub fn date(&self) -> NaiveDate {
        match self {
            Entry::Transaction(txn) => txn.date,
            Entry::Balance(balance) => balance.date,
        }
    }
}

/// Statement period, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Metadata recovered from the first lines of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementHeader {
    pub period: Period,

    /// Balance at the end of `period.end` ("Neuer Kontostand").
    pub closing_balance: Amount,

    /// Line the closing balance was read from.
    pub closing_balance_line: usize,
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub header: StatementHeader,

    /// Transactions in file order followed by one closing balance assertion.
    pub entries: Vec<Entry>,

    /// Balance read from the "Alter Kontostand" row, if the file has one.
    ///
    /// Not turned into an entry.
    pub opening_balance: Option<Amount>,
}

impl Statement {
    /// Transactions only, without the trailing balance assertion.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Transaction(txn) => Some(txn),
            Entry::Balance(_) => None,
        })
    }
}

/// Outcome of running the importer over a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The file is not a comdirect checking account export.
    Skipped { reason: String },

    /// The file was parsed.
    Parsed(Statement),
}

impl Extraction {
    /// Entries of a parsed statement; empty when skipped.
    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            Extraction::Skipped { .. } => Vec::new(),
            Extraction::Parsed(statement) => statement.entries,
        }
    }
}
