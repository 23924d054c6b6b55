use crate::error::{ParseError, ParseErrorKind, Result};
use crate::types::{DayOfWeek, SalesRecord};
use crate::util::parse_display_date;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Number of positional columns in a sales row.
pub const FIELD_COUNT: usize = 8;

/// Largest accepted magnitude for a sales or profit amount (₹1 lakh crore).
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub rejected: Vec<ParseError>,
}

impl LoadReport {
    pub fn parse_errors(&self) -> usize {
        self.rejected.len()
    }
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    // The header row is consumed and ignored; columns are read by position.
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
}

fn parse_number<T: FromStr>(
    value: &str,
    field: &'static str,
) -> std::result::Result<T, ParseErrorKind> {
    value.parse::<T>().map_err(|_| ParseErrorKind::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_amount(value: &str, field: &'static str) -> std::result::Result<i64, ParseErrorKind> {
    let amount: i64 = parse_number(value, field)?;
    if amount.unsigned_abs() > MAX_AMOUNT as u64 {
        return Err(ParseErrorKind::AmountOutOfRange {
            field,
            value: amount,
            limit: MAX_AMOUNT,
        });
    }
    Ok(amount)
}

fn parse_row(row: &StringRecord) -> std::result::Result<SalesRecord, ParseErrorKind> {
    if row.len() != FIELD_COUNT {
        return Err(ParseErrorKind::FieldCount(row.len()));
    }
    let field = |i: usize| row.get(i).unwrap_or("");

    let date = field(0);
    let parsed_date =
        parse_display_date(date).ok_or_else(|| ParseErrorKind::InvalidDate(date.to_string()))?;
    let day_of_week = DayOfWeek::from_str(field(1))
        .map_err(|_| ParseErrorKind::InvalidDayOfWeek(field(1).to_string()))?;
    let store_id: u32 = parse_number(field(2), "storeId")?;
    let units_sold: u32 = parse_number(field(5), "unitsSold")?;
    let total_sales = parse_amount(field(6), "totalSalesAmount")?;
    if total_sales < 0 {
        return Err(ParseErrorKind::InvalidNumber {
            field: "totalSalesAmount",
            value: field(6).to_string(),
        });
    }
    let profit = parse_amount(field(7), "profitAmount")?;

    Ok(SalesRecord::new(
        date,
        parsed_date,
        day_of_week,
        store_id,
        field(3),
        field(4),
        units_sold,
        total_sales,
        profit,
    ))
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or(0)
}

/// Parse CSV text into records, failing on the first malformed row.
///
/// Output order matches input order.
pub fn parse(text: &str) -> Result<Vec<SalesRecord>> {
    let mut rdr = reader(text);
    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let record = parse_row(&row).map_err(|kind| ParseError {
            line: line_of(&row),
            kind,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Parse CSV text, skipping malformed rows and reporting each one.
pub fn parse_lenient(text: &str) -> Result<(Vec<SalesRecord>, LoadReport)> {
    let mut rdr = reader(text);
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.records() {
        report.total_rows += 1;
        let row = result?;
        match parse_row(&row) {
            Ok(r) => records.push(r),
            Err(kind) => {
                let err = ParseError {
                    line: line_of(&row),
                    kind,
                };
                warn!(%err, "rejected sales row");
                report.rejected.push(err);
            }
        }
    }

    report.loaded_rows = records.len();
    Ok((records, report))
}

/// Read a CSV file, returning the raw text alongside the parsed records so
/// it can be exported unmodified later.
pub fn load_file(path: impl AsRef<Path>) -> Result<(String, Vec<SalesRecord>, LoadReport)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let (records, report) = parse_lenient(&text)?;
    info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        rejected = report.parse_errors(),
        "loaded sales data"
    );
    Ok((text, records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    const HEADER: &str = "Date,DayOfWeek,StoreID,StoreLocation,ProductCategory,UnitsSold,TotalSales_INR,Profit_INR\n";

    #[test]
    fn parses_single_row_with_derived_fields() {
        let csv = format!("{HEADER}10-08-2023,Thursday,3,Andheri,Smartphones,10,100000,15000\n");
        let records = parse(&csv).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.date(), "10-08-2023");
        assert_eq!(r.day_of_week(), DayOfWeek::Thursday);
        assert_eq!(r.store_id(), 3);
        assert_eq!(r.store_location(), "Andheri");
        assert_eq!(r.product_category(), "Smartphones");
        assert_eq!(r.month(), "August");
        assert_eq!(r.week_number(), 32);
        assert_eq!(r.profit_margin(), 15.0);
        assert_eq!(r.revenue_per_unit(), 10000.0);
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(parse(HEADER).unwrap().is_empty());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn keeps_input_order() {
        let csv = format!(
            "{HEADER}30-09-2023,Saturday,1,Bandra,Audio,2,5000,1500\n\
             01-07-2023,Saturday,2,Colaba,Laptops,1,60000,6000\n"
        );
        let records = parse(&csv).unwrap();
        assert_eq!(records[0].date(), "30-09-2023");
        assert_eq!(records[1].date(), "01-07-2023");
    }

    #[test]
    fn malformed_number_fails_loudly() {
        let csv = format!("{HEADER}10-08-2023,Thursday,3,Andheri,Smartphones,ten,100000,15000\n");
        match parse(&csv) {
            Err(DashboardError::Parse(e)) => {
                assert_eq!(e.line, 2);
                assert_eq!(
                    e.kind,
                    ParseErrorKind::InvalidNumber {
                        field: "unitsSold",
                        value: "ten".to_string()
                    }
                );
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn every_numeric_field_rejects_bad_text() {
        let csv = format!(
            "{HEADER}10-08-2023,Thursday,3.5,Andheri,Smartphones,10,100000,15000\n\
             10-08-2023,Thursday,3,Andheri,Smartphones,10,1e5,15000\n\
             10-08-2023,Thursday,3,Andheri,Smartphones,10,100000,3.5\n\
             10-08-2023,Thursday,-3,Andheri,Smartphones,10,100000,15000\n\
             10-08-2023,Thursday,3,Andheri,Smartphones,2.5,100000,15000\n\
             10-08-2023,Thursday,3,Andheri,Smartphones,10,,15000\n"
        );
        let (records, report) = parse_lenient(&csv).unwrap();
        assert!(records.is_empty());
        let got: Vec<_> = report
            .rejected
            .iter()
            .map(|e| match &e.kind {
                ParseErrorKind::InvalidNumber { field, value } => (e.line, *field, value.as_str()),
                other => panic!("unexpected rejection {other:?}"),
            })
            .collect();
        assert_eq!(
            got,
            [
                (2, "storeId", "3.5"),
                (3, "totalSalesAmount", "1e5"),
                (4, "profitAmount", "3.5"),
                (5, "storeId", "-3"),
                (6, "unitsSold", "2.5"),
                (7, "totalSalesAmount", ""),
            ]
        );
    }

    #[test]
    fn amounts_beyond_limit_are_rejected() {
        let csv = format!(
            "{HEADER}10-08-2023,Thursday,3,Andheri,Smartphones,10,9223372036854775807,15000\n\
             11-08-2023,Friday,3,Andheri,Smartphones,10,9223372036854775807,15000\n\
             12-08-2023,Saturday,3,Andheri,Audio,10,5000,-9223372036854775808\n"
        );
        let (records, report) = parse_lenient(&csv).unwrap();
        assert!(records.is_empty());
        assert_eq!(
            report.rejected[0].kind,
            ParseErrorKind::AmountOutOfRange {
                field: "totalSalesAmount",
                value: i64::MAX,
                limit: MAX_AMOUNT,
            }
        );
        assert!(matches!(
            report.rejected[2].kind,
            ParseErrorKind::AmountOutOfRange { field: "profitAmount", .. }
        ));
        assert!(matches!(parse(&csv), Err(DashboardError::Parse(e)) if e.line == 2));
    }

    #[test]
    fn amounts_at_the_limit_still_sum_exactly() {
        let csv = format!(
            "{HEADER}10-08-2023,Thursday,3,Andheri,Smartphones,10,{MAX_AMOUNT},{MAX_AMOUNT}\n\
             11-08-2023,Friday,3,Andheri,Smartphones,10,{MAX_AMOUNT},-{MAX_AMOUNT}\n"
        );
        let records = parse(&csv).unwrap();
        let kpis = crate::aggregate::summarize(&records);
        assert_eq!(kpis.total_revenue, 2 * MAX_AMOUNT);
        assert_eq!(kpis.total_profit, 0);
    }

    #[test]
    fn wrong_field_count_and_bad_date_are_rejected() {
        let csv = format!(
            "{HEADER}10-08-2023,Thursday,3,Andheri,Smartphones,10,100000\n\
             2023-08-10,Thursday,3,Andheri,Smartphones,10,100000,15000\n\
             10-08-2023,Someday,3,Andheri,Smartphones,10,100000,15000\n\
             11-08-2023,Friday,3,Andheri,Audio,4,8000,2400\n"
        );
        let (records, report) = parse_lenient(&csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.loaded_rows, 1);
        assert_eq!(report.parse_errors(), 3);
        assert_eq!(report.rejected[0].kind, ParseErrorKind::FieldCount(7));
        assert_eq!(
            report.rejected[1].kind,
            ParseErrorKind::InvalidDate("2023-08-10".to_string())
        );
        assert_eq!(
            report.rejected[2].kind,
            ParseErrorKind::InvalidDayOfWeek("Someday".to_string())
        );
    }

    #[test]
    fn negative_sales_is_malformed_but_negative_profit_is_not() {
        let csv = format!(
            "{HEADER}10-08-2023,Thursday,3,Andheri,Smartphones,10,-5,15000\n\
             10-08-2023,Thursday,3,Andheri,Smartphones,10,1000,-50\n"
        );
        let (records, report) = parse_lenient(&csv).unwrap();
        assert_eq!(report.parse_errors(), 1);
        assert_eq!(records[0].profit_margin(), -5.0);
    }

    #[test]
    fn zero_denominators_give_nan() {
        let csv = format!("{HEADER}10-08-2023,Thursday,3,Andheri,Smartphones,0,0,0\n");
        let r = &parse(&csv).unwrap()[0];
        assert!(r.profit_margin().is_nan());
        assert!(r.revenue_per_unit().is_nan());
    }
}
