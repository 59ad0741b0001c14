//! Ledger text serializer.
//!
//! Writes entries as beancount directives:
//!
//! ```text
//! 2024-08-28 * "Auftraggeber: Stadtwerke"
//!   filename: "umsaetze_5873596814_20240901-1606.csv"
//!   lineno: 7
//!   Assets:Comdirect:Checking  -1012.34 EUR
//!
//! 2024-09-02 balance Assets:Comdirect:Checking  7511.15 EUR
//! ```

use crate::error::Result;
use crate::types::{BalanceAssertion, Entry, SourceMeta, Transaction};
use std::io::Write;

/// Write all entries, separated by blank lines.
pub fn write_entries<W: Write>(writer: &mut W, entries: &[Entry]) -> Result<()> {
    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            writeln!(writer)?;
        }
        match entry {
            Entry::Transaction(txn) => write_transaction(writer, txn)?,
            Entry::Balance(balance) => write_balance(writer, balance)?,
        }
    }
    Ok(())
}

fn write_transaction<W: Write>(writer: &mut W, txn: &Transaction) -> Result<()> {
    writeln!(writer, "{} {} \"{}\"", txn.date, txn.flag, escape(&txn.narration))?;
    write_meta(writer, &txn.meta)?;
    for posting in &txn.postings {
        writeln!(writer, "  {}  {}", posting.account, posting.amount)?;
    }
    Ok(())
}

fn write_balance<W: Write>(writer: &mut W, balance: &BalanceAssertion) -> Result<()> {
    writeln!(writer, "{} balance {}  {}", balance.date, balance.account, balance.amount)?;
    write_meta(writer, &balance.meta)?;
    Ok(())
}

fn write_meta<W: Write>(writer: &mut W, meta: &SourceMeta) -> Result<()> {
    writeln!(writer, "  filename: \"{}\"", escape(&meta.filename))?;
    writeln!(writer, "  lineno: {}", meta.lineno)?;
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Amount, Posting, COMPLETE_FLAG};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_write_entries() {
        let entries = vec![
            Entry::Transaction(Transaction {
                meta: SourceMeta::new("export.csv", 6),
                date: NaiveDate::from_ymd_opt(2024, 8, 28).unwrap(),
                flag: COMPLETE_FLAG,
                narration: "Kino \"Metropol\"".into(),
                postings: vec![Posting {
                    account: "Assets:Comdirect:Checking".into(),
                    amount: Amount::new(Decimal::from_str("-12.50").unwrap(), "EUR"),
                }],
            }),
            Entry::Balance(BalanceAssertion {
                meta: SourceMeta::new("export.csv", 3),
                date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
                account: "Assets:Comdirect:Checking".into(),
                amount: Amount::new(Decimal::from_str("7511.15").unwrap(), "EUR"),
            }),
        ];

        let mut out = Vec::new();
        write_entries(&mut out, &entries).unwrap();

        let expected = "2024-08-28 * \"Kino \\\"Metropol\\\"\"
  filename: \"export.csv\"
  lineno: 6
  Assets:Comdirect:Checking  -12.50 EUR

2024-09-02 balance Assets:Comdirect:Checking  7511.15 EUR
  filename: \"export.csv\"
  lineno: 3
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
