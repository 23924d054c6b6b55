use crate::types::{
    CategoryShare, CumulativePoint, DayOfWeek, GroupTotals, KpiSummary, SalesRecord, WeekendLift,
    NOT_AVAILABLE,
};
use crate::util::{parse_display_date, sum_amounts};
use std::cmp::Ordering;
use std::collections::HashMap;

/// What records are grouped by for chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Store,
    Category,
    DayOfWeek,
    Month,
    Date,
}

impl Dimension {
    fn key<'a>(self, r: &'a SalesRecord) -> &'a str {
        match self {
            Dimension::Store => r.store_location(),
            Dimension::Category => r.product_category(),
            Dimension::DayOfWeek => r.day_of_week().name(),
            Dimension::Month => r.month(),
            Dimension::Date => r.date(),
        }
    }
}

// Groups keep the order in which their key was first seen.
#[derive(Default)]
struct OrderedGroups {
    groups: Vec<GroupTotals>,
    index: HashMap<String, usize>,
}

impl OrderedGroups {
    fn add(&mut self, key: &str, r: &SalesRecord) {
        let idx = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.groups.push(GroupTotals::new(key));
                self.index.insert(key.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[idx].add(r);
    }

    fn collect(records: &[SalesRecord], dim: Dimension) -> Vec<GroupTotals> {
        let mut acc = OrderedGroups::default();
        for r in records {
            acc.add(dim.key(r), r);
        }
        acc.groups
    }
}

// Highest revenue wins; on an exact tie the first-seen key is kept.
fn top_by_revenue(groups: &[GroupTotals]) -> Option<&GroupTotals> {
    groups.iter().fold(None, |best: Option<&GroupTotals>, g| match best {
        Some(b) if b.sales >= g.sales => Some(b),
        _ => Some(g),
    })
}

pub fn summarize(records: &[SalesRecord]) -> KpiSummary {
    if records.is_empty() {
        return KpiSummary::default();
    }
    let total_revenue = sum_amounts(records.iter().map(|r| r.total_sales_amount()));
    let total_units_sold: u64 = records.iter().map(|r| u64::from(r.units_sold())).sum();
    let total_profit = sum_amounts(records.iter().map(|r| r.profit_amount()));

    let stores = OrderedGroups::collect(records, Dimension::Store);
    let categories = OrderedGroups::collect(records, Dimension::Category);
    let name = |g: Option<&GroupTotals>| {
        g.map(|g| g.key.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    KpiSummary {
        total_revenue,
        total_units_sold,
        total_profit,
        top_store: name(top_by_revenue(&stores)),
        top_category: name(top_by_revenue(&categories)),
    }
}

/// Sum sales, profit and units per group.
///
/// Groups come out in first-seen order, except `Dimension::Date` which is
/// ordered by ascending calendar date.
pub fn group_by(records: &[SalesRecord], dim: Dimension) -> Vec<GroupTotals> {
    let mut groups = OrderedGroups::collect(records, dim);
    if dim == Dimension::Date {
        groups.sort_by_key(|g| parse_display_date(&g.key));
    }
    groups
}

/// Groups ordered by revenue, largest first. Equal revenues keep first-seen order.
pub fn sorted_by_revenue(records: &[SalesRecord], dim: Dimension) -> Vec<GroupTotals> {
    let mut groups = group_by(records, dim);
    groups.sort_by(|a, b| b.sales.cmp(&a.sales));
    groups
}

/// Monday..Sunday, with zero totals for days that have no records.
pub fn by_day_of_week(records: &[SalesRecord]) -> Vec<GroupTotals> {
    let groups = group_by(records, Dimension::DayOfWeek);
    DayOfWeek::ALL
        .iter()
        .map(|day| {
            groups
                .iter()
                .find(|g| g.key == day.name())
                .cloned()
                .unwrap_or_else(|| GroupTotals::new(day.name()))
        })
        .collect()
}

/// Running totals of daily sales and profit in chronological order.
pub fn cumulative_by_date(records: &[SalesRecord]) -> Vec<CumulativePoint> {
    let mut sales = 0i64;
    let mut profit = 0i64;
    group_by(records, Dimension::Date)
        .into_iter()
        .map(|g| {
            sales = sales.saturating_add(g.sales);
            profit = profit.saturating_add(g.profit);
            CumulativePoint {
                date: g.key,
                cumulative_sales: sales,
                cumulative_profit: profit,
            }
        })
        .collect()
}

/// Revenue share and margin per category, largest revenue first.
pub fn category_shares(records: &[SalesRecord]) -> Vec<CategoryShare> {
    let groups = sorted_by_revenue(records, Dimension::Category);
    let total = sum_amounts(groups.iter().map(|g| g.sales));
    groups
        .into_iter()
        .map(|g| CategoryShare {
            revenue_share_pct: if total > 0 {
                g.sales as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            margin_pct: g.margin(),
            category: g.key,
        })
        .collect()
}

/// Average revenue per calendar date on weekends against weekdays.
pub fn weekend_lift(records: &[SalesRecord]) -> WeekendLift {
    let days = group_by(records, Dimension::Date);
    let mut weekend = (0i64, 0usize);
    let mut weekday = (0i64, 0usize);
    for g in &days {
        let is_weekend = records
            .iter()
            .find(|r| r.date() == g.key)
            .map(|r| r.day_of_week().is_weekend())
            .unwrap_or(false);
        let slot = if is_weekend { &mut weekend } else { &mut weekday };
        slot.0 = slot.0.saturating_add(g.sales);
        slot.1 += 1;
    }
    let avg = |(sum, n): (i64, usize)| if n == 0 { 0.0 } else { sum as f64 / n as f64 };
    let weekend_avg = avg(weekend);
    let weekday_avg = avg(weekday);
    let lift_pct = if weekday_avg > 0.0 {
        (weekend_avg - weekday_avg) / weekday_avg * 100.0
    } else {
        0.0
    };
    WeekendLift {
        weekend_avg,
        weekday_avg,
        lift_pct,
    }
}

/// Date with the largest daily revenue; the earliest date wins a tie.
pub fn peak_sales_day(records: &[SalesRecord]) -> Option<GroupTotals> {
    let days = group_by(records, Dimension::Date);
    top_by_revenue(&days).cloned()
}

/// Group with the highest aggregate margin. Groups without revenue are skipped.
pub fn best_margin(records: &[SalesRecord], dim: Dimension) -> Option<(String, f64)> {
    group_by(records, dim)
        .into_iter()
        .map(|g| {
            let m = g.margin();
            (g.key, m)
        })
        .filter(|(_, m)| m.is_finite())
        .fold(None, |best, cur| match best {
            Some(b) if b.1.partial_cmp(&cur.1) != Some(Ordering::Less) => Some(b),
            _ => Some(cur),
        })
}
