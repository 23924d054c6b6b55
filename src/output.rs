use crate::error::Result;
use crate::types::{BreakdownRow, GroupTotals, RecordPreviewRow, SalesRecord};
use crate::util::{format_currency, format_int, format_number, format_pct};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    info!(path = %path.as_ref().display(), rows = rows.len(), "wrote csv");
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path.as_ref(), s)?;
    info!(path = %path.as_ref().display(), "wrote json");
    Ok(())
}

/// Write the dataset exactly as it was loaded.
pub fn write_raw(path: impl AsRef<Path>, raw: &str) -> Result<()> {
    std::fs::write(path.as_ref(), raw)?;
    info!(path = %path.as_ref().display(), bytes = raw.len(), "exported raw dataset");
    Ok(())
}

pub fn breakdown_rows(groups: &[GroupTotals]) -> Vec<BreakdownRow> {
    groups
        .iter()
        .map(|g| BreakdownRow {
            group: g.key.clone(),
            revenue: format_currency(g.sales as f64),
            profit: format_currency(g.profit as f64),
            units: format_int(g.units),
            margin_pct: format_number(g.margin(), 2),
        })
        .collect()
}

pub fn record_preview_rows(records: &[SalesRecord], max_rows: usize) -> Vec<RecordPreviewRow> {
    records
        .iter()
        .take(max_rows)
        .map(|r| RecordPreviewRow {
            date: r.date().to_string(),
            day: r.day_of_week().name().to_string(),
            store: r.store_location().to_string(),
            category: r.product_category().to_string(),
            units: r.units_sold(),
            sales: format_currency(r.total_sales_amount() as f64),
            profit: format_currency(r.profit_amount() as f64),
            month: r.month().to_string(),
            week: r.week_number(),
            margin: format_pct(r.profit_margin()),
            revenue_per_unit: format_currency(r.revenue_per_unit()),
        })
        .collect()
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_rows_format_amounts() {
        let g = GroupTotals {
            key: "Andheri".to_string(),
            sales: 1_234_567,
            profit: 185_185,
            units: 1200,
            count: 3,
        };
        let rows = breakdown_rows(&[g, GroupTotals::new("Empty")]);
        assert_eq!(rows[0].revenue, "₹12,34,567");
        assert_eq!(rows[0].units, "1,200");
        assert_eq!(rows[1].margin_pct, "N/A");
    }

    #[test]
    fn renders_markdown_or_placeholder() {
        let rows = breakdown_rows(&[GroupTotals::new("Audio")]);
        let table = render_table(&rows, 5);
        assert!(table.contains("| Group"));
        assert!(table.contains("Audio"));
        assert_eq!(render_table::<BreakdownRow>(&[], 5), "(no rows)");
    }
}
