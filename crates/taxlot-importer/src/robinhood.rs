//! Robinhood activity CSV importer.
//!
//! Parses the account activity export: one row per event, dollar signs on
//! money columns, parentheses for negative amounts, and a long tail of
//! transaction codes (ACH, interest, gold fees) that are not trades.

use crate::{ImportResult, Importer};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use taxlot_core::{TradeKind, TradeRecord};

const ACTIVITY_DATE: &str = "Activity Date";
const INSTRUMENT: &str = "Instrument";
const TRANS_CODE: &str = "Trans Code";
const QUANTITY: &str = "Quantity";
const PRICE: &str = "Price";
const AMOUNT: &str = "Amount";

/// Importer for Robinhood account activity CSV exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct RobinhoodCsv;

impl RobinhoodCsv {
    /// Create a new Robinhood CSV importer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        header_map: &HashMap<String, usize>,
        row_num: usize,
    ) -> Result<Option<TradeRecord>, String> {
        let trans_code = get_column(record, header_map, TRANS_CODE)
            .ok_or_else(|| format!("Row {row_num}: missing {TRANS_CODE} column"))?;

        // Non-trade codes (transfers, interest, fees) are not malformed;
        // they just aren't ours.
        let Ok(kind) = TradeKind::from_str(trans_code) else {
            return Ok(None);
        };

        let activity_date = get_column(record, header_map, ACTIVITY_DATE)
            .ok_or_else(|| format!("Row {row_num}: missing {ACTIVITY_DATE} column"))?
            .trim()
            .to_string();
        if activity_date.is_empty() {
            return Err(format!("Row {row_num}: empty activity date"));
        }

        let instrument = get_column(record, header_map, INSTRUMENT)
            .ok_or_else(|| format!("Row {row_num}: missing {INSTRUMENT} column"))?
            .trim()
            .to_string();
        if instrument.is_empty() {
            return Err(format!("Row {row_num}: empty instrument for {kind} row"));
        }

        let amount = get_column(record, header_map, AMOUNT)
            .and_then(parse_money_string)
            .unwrap_or(0.0);

        let (quantity, price) = match kind {
            TradeKind::CashDividend => (0.0, 0.0),
            TradeKind::Split => {
                let extra = get_column(record, header_map, QUANTITY)
                    .and_then(parse_money_string)
                    .ok_or_else(|| {
                        format!("Row {row_num}: unreadable extra-share quantity for split")
                    })?;
                (extra, 0.0)
            }
            _ => {
                let quantity = get_column(record, header_map, QUANTITY)
                    .and_then(parse_money_string)
                    .ok_or_else(|| format!("Row {row_num}: unreadable quantity for {kind} row"))?;
                let price = get_column(record, header_map, PRICE)
                    .and_then(parse_money_string)
                    .ok_or_else(|| format!("Row {row_num}: unreadable price for {kind} row"))?;
                (quantity, price)
            }
        };

        Ok(Some(
            TradeRecord::new(kind, activity_date, instrument, quantity, price)
                .with_amount(amount),
        ))
    }
}

impl Importer for RobinhoodCsv {
    fn name(&self) -> &str {
        "robinhood-csv"
    }

    fn identify(&self, path: &Path) -> bool {
        if path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(true, |ext| !ext.eq_ignore_ascii_case("csv"))
        {
            return false;
        }

        // Sniff the header row for the activity-export column names.
        let Ok(file) = File::open(path) else {
            return false;
        };
        let mut header = String::new();
        let mut reader = BufReader::new(file).take(1024);
        if reader.read_to_string(&mut header).is_err() {
            return false;
        }
        let first_line = header.lines().next().unwrap_or("");
        first_line.contains(ACTIVITY_DATE) && first_line.contains(TRANS_CODE)
    }

    fn extract(&self, path: &Path) -> Result<ImportResult> {
        let file =
            File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.extract_string(&content)
    }

    fn extract_string(&self, content: &str) -> Result<ImportResult> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let header_map: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();

        let mut records = Vec::new();
        let mut warnings = Vec::new();
        let mut row_num = 1; // header is row 1

        for result in reader.records() {
            row_num += 1;
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    warnings.push(format!("Row {row_num}: parse error: {e}"));
                    continue;
                }
            };

            match self.parse_row(&record, &header_map, row_num) {
                Ok(Some(trade)) => records.push(trade),
                Ok(None) => {} // Not a trade row
                Err(warning) => warnings.push(warning),
            }
        }

        let mut result = ImportResult::new(records);
        for warning in warnings {
            result = result.with_warning(warning);
        }
        Ok(result)
    }

    fn description(&self) -> &str {
        "Robinhood account activity CSV export"
    }
}

fn get_column<'a>(
    record: &'a csv::StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    record.get(*header_map.get(name)?)
}

/// Parse a money-ish string, handling currency symbols, thousands commas,
/// and parentheses for negatives. Also used for share quantities.
fn parse_money_string(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (is_negative, s) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;

    if is_negative {
        Some(-value)
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract_from_string;
    use std::io::Write;

    const SAMPLE: &str = "\
Activity Date,Process Date,Settle Date,Instrument,Description,Trans Code,Quantity,Price,Amount
1/3/2022,1/3/2022,1/5/2022,AAPL,Apple,Buy,10,$150.00,($1500.00)
2/1/2022,2/1/2022,2/3/2022,AAPL,Apple,CDIV,,,$2.30
6/6/2022,6/6/2022,6/6/2022,AAPL,Apple 2:1 split,SPL,10,,
7/1/2022,7/1/2022,7/5/2022,AAPL,Apple,Sell,5,$160.00,$800.00
7/2/2022,7/2/2022,7/2/2022,,ACH deposit,ACH,,,$500.00
";

    #[test]
    fn parses_trade_rows() {
        let result = extract_from_string(SAMPLE, &RobinhoodCsv::new()).unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.records.len(), 4);

        let buy = &result.records[0];
        assert_eq!(buy.kind, TradeKind::Buy);
        assert_eq!(buy.instrument, "AAPL");
        assert_eq!(buy.activity_date, "1/3/2022");
        assert_eq!(buy.quantity, 10.0);
        assert_eq!(buy.price, 150.0);
        assert_eq!(buy.amount, -1500.0);

        let dividend = &result.records[1];
        assert_eq!(dividend.kind, TradeKind::CashDividend);
        assert_eq!(dividend.quantity, 0.0);
        assert_eq!(dividend.amount, 2.30);

        let split = &result.records[2];
        assert_eq!(split.kind, TradeKind::Split);
        assert_eq!(split.quantity, 10.0);
        assert_eq!(split.price, 0.0);

        let sell = &result.records[3];
        assert_eq!(sell.kind, TradeKind::Sell);
        assert_eq!(sell.quantity, 5.0);
        assert_eq!(sell.price, 160.0);
    }

    #[test]
    fn non_trade_codes_are_dropped_without_warning() {
        let result = extract_from_string(SAMPLE, &RobinhoodCsv::new()).unwrap();
        assert!(result
            .records
            .iter()
            .all(|record| record.instrument == "AAPL"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn malformed_trade_rows_warn_but_do_not_fail() {
        let csv = "\
Activity Date,Process Date,Settle Date,Instrument,Description,Trans Code,Quantity,Price,Amount
1/3/2022,1/3/2022,1/5/2022,AAPL,Apple,Buy,N/A,$150.00,($1500.00)
2/3/2022,2/3/2022,2/5/2022,AAPL,Apple,Buy,5,$151.00,($755.00)
";
        let result = extract_from_string(csv, &RobinhoodCsv::new()).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Row 2"));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv = "\
Activity Date,Process Date,Settle Date,Instrument,Description,Trans Code,Quantity,Price,Amount
1/3/2022,1/3/2022
2/3/2022,2/3/2022,2/5/2022,AAPL,Apple,Buy,5,$151.00,($755.00)
";
        let result = extract_from_string(csv, &RobinhoodCsv::new()).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_parse_money_string() {
        assert_eq!(parse_money_string("100.00"), Some(100.0));
        assert_eq!(parse_money_string("$100.00"), Some(100.0));
        assert_eq!(parse_money_string("1,234.56"), Some(1234.56));
        assert_eq!(parse_money_string("-50.00"), Some(-50.0));
        assert_eq!(parse_money_string("($50.00)"), Some(-50.0));
        assert_eq!(parse_money_string("0.5214"), Some(0.5214));
        assert_eq!(parse_money_string(""), None);
        assert_eq!(parse_money_string("N/A"), None);
    }

    #[test]
    fn identify_checks_extension_and_header() {
        let importer = RobinhoodCsv::new();

        let mut good = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        good.write_all(SAMPLE.as_bytes()).unwrap();
        assert!(importer.identify(good.path()));

        let mut wrong_header = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        wrong_header
            .write_all(b"Date,Description,Amount\n")
            .unwrap();
        assert!(!importer.identify(wrong_header.path()));

        let mut wrong_ext = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        wrong_ext.write_all(SAMPLE.as_bytes()).unwrap();
        assert!(!importer.identify(wrong_ext.path()));
    }

    #[test]
    fn extract_reads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let result = RobinhoodCsv::new().extract(file.path()).unwrap();
        assert_eq!(result.records.len(), 4);
    }
}
