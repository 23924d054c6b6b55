use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

use crate::util::{month_name, ratio, week_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Calendar order used by the weekday breakdown.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayOfWeek {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// One transaction-day summary row.
///
/// Fields are private so the derived metrics can only ever come from
/// [`SalesRecord::new`]; a record never changes after it is built.
#[derive(Debug, Clone, Serialize)]
pub struct SalesRecord {
    date: String,
    #[serde(skip)]
    parsed_date: NaiveDate,
    day_of_week: DayOfWeek,
    store_id: u32,
    store_location: String,
    product_category: String,
    units_sold: u32,
    total_sales_amount: i64,
    profit_amount: i64,
    month: &'static str,
    week_number: u32,
    profit_margin: f64,
    revenue_per_unit: f64,
}

impl SalesRecord {
    /// Build a record and attach its derived fields.
    ///
    /// `date` is the display string; `parsed_date` must be the same day.
    /// `profit_margin` and `revenue_per_unit` are `NaN` when their
    /// denominator is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: impl Into<String>,
        parsed_date: NaiveDate,
        day_of_week: DayOfWeek,
        store_id: u32,
        store_location: impl Into<String>,
        product_category: impl Into<String>,
        units_sold: u32,
        total_sales_amount: i64,
        profit_amount: i64,
    ) -> Self {
        Self {
            date: date.into(),
            parsed_date,
            day_of_week,
            store_id,
            store_location: store_location.into(),
            product_category: product_category.into(),
            units_sold,
            total_sales_amount,
            profit_amount,
            month: month_name(parsed_date),
            week_number: week_number(parsed_date),
            profit_margin: ratio(profit_amount as f64, total_sales_amount as f64) * 100.0,
            revenue_per_unit: ratio(total_sales_amount as f64, units_sold as f64),
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn parsed_date(&self) -> NaiveDate {
        self.parsed_date
    }

    pub fn day_of_week(&self) -> DayOfWeek {
        self.day_of_week
    }

    pub fn store_id(&self) -> u32 {
        self.store_id
    }

    pub fn store_location(&self) -> &str {
        &self.store_location
    }

    pub fn product_category(&self) -> &str {
        &self.product_category
    }

    pub fn units_sold(&self) -> u32 {
        self.units_sold
    }

    pub fn total_sales_amount(&self) -> i64 {
        self.total_sales_amount
    }

    pub fn profit_amount(&self) -> i64 {
        self.profit_amount
    }

    pub fn month(&self) -> &'static str {
        self.month
    }

    pub fn week_number(&self) -> u32 {
        self.week_number
    }

    pub fn profit_margin(&self) -> f64 {
        self.profit_margin
    }

    pub fn revenue_per_unit(&self) -> f64 {
        self.revenue_per_unit
    }
}

// Derived fields are functions of the raw ones, so equality looks only at the
// raw fields. This keeps records with a `NaN` margin equal to themselves.
impl PartialEq for SalesRecord {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.parsed_date == other.parsed_date
            && self.day_of_week == other.day_of_week
            && self.store_id == other.store_id
            && self.store_location == other.store_location
            && self.product_category == other.product_category
            && self.units_sold == other.units_sold
            && self.total_sales_amount == other.total_sales_amount
            && self.profit_amount == other.profit_amount
    }
}

/// Sentinel used for `top_store` / `top_category` when there is nothing to rank.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_revenue: i64,
    pub total_units_sold: u64,
    pub total_profit: i64,
    pub top_store: String,
    pub top_category: String,
}

impl Default for KpiSummary {
    fn default() -> Self {
        Self {
            total_revenue: 0,
            total_units_sold: 0,
            total_profit: 0,
            top_store: NOT_AVAILABLE.to_string(),
            top_category: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Summed sales, profit and units for one group key.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GroupTotals {
    pub key: String,
    pub sales: i64,
    pub profit: i64,
    pub units: u64,
    pub count: usize,
}

impl GroupTotals {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn add(&mut self, r: &SalesRecord) {
        self.sales = self.sales.saturating_add(r.total_sales_amount());
        self.profit = self.profit.saturating_add(r.profit_amount());
        self.units += u64::from(r.units_sold());
        self.count += 1;
    }

    /// Aggregate margin in percent, `NaN` when the group has no revenue.
    pub fn margin(&self) -> f64 {
        ratio(self.profit as f64, self.sales as f64) * 100.0
    }

    /// Average revenue per record, 0 for an empty group.
    pub fn avg_sales(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sales as f64 / self.count as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub date: String,
    pub cumulative_sales: i64,
    pub cumulative_profit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub revenue_share_pct: f64,
    pub margin_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekendLift {
    pub weekend_avg: f64,
    pub weekday_avg: f64,
    pub lift_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SimulationResult {
    pub expected_revenue: f64,
    pub expected_profit: f64,
    pub roi: f64,
    pub revenue_to_spend_ratio: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct BreakdownRow {
    #[serde(rename = "Group")]
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: String,
    #[serde(rename = "Profit")]
    #[tabled(rename = "Profit")]
    pub profit: String,
    #[serde(rename = "Units")]
    #[tabled(rename = "Units")]
    pub units: String,
    #[serde(rename = "MarginPct")]
    #[tabled(rename = "MarginPct")]
    pub margin_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RecordPreviewRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Day")]
    pub day: String,
    #[tabled(rename = "Store")]
    pub store: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Units")]
    pub units: u32,
    #[tabled(rename = "Sales")]
    pub sales: String,
    #[tabled(rename = "Profit")]
    pub profit: String,
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Week")]
    pub week: u32,
    #[tabled(rename = "Margin%")]
    pub margin: String,
    #[tabled(rename = "Rev/Unit")]
    pub revenue_per_unit: String,
}
