use crate::types::SalesRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// A categorical constraint: either no constraint or an exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// `"all"` (any case) or an empty string clears the constraint.
    pub fn from_input(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(s.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Selection::All)
    }
}

/// Closed interval over a record's profit margin, in percent.
///
/// Exactly `[0, 100]` ([`ProfitRange::FULL`], the default) is treated as no
/// constraint at all, so it keeps records with negative or `NaN` margins. Any
/// other range, even `[0, 99.99]` or `[-100, 100]`, is active and drops them
/// if they fall outside it; `NaN` margins fail every active range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitRange {
    pub min: f64,
    pub max: f64,
}

impl ProfitRange {
    pub const FULL: ProfitRange = ProfitRange {
        min: 0.0,
        max: 100.0,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The full `[0, 100]` domain places no constraint on records.
    pub fn is_active(&self) -> bool {
        *self != Self::FULL
    }

    /// `NaN` margins are outside every range.
    pub fn contains(&self, margin: f64) -> bool {
        if margin.is_nan() {
            return false;
        }
        !(margin < self.min || margin > self.max)
    }
}

impl Default for ProfitRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Inclusive calendar range over the record date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterState {
    pub store: Selection,
    pub category: Selection,
    pub month: Selection,
    pub day_of_week: Selection,
    pub profit_range: ProfitRange,
    pub date_range: Option<DateRange>,
}

/// One change to the filter state, as sent by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Store(Selection),
    Category(Selection),
    Month(Selection),
    DayOfWeek(Selection),
    ProfitRange(ProfitRange),
    DateRange(Option<DateRange>),
    Reset,
}

impl FilterState {
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Store(s) => self.store = s,
            FilterUpdate::Category(s) => self.category = s,
            FilterUpdate::Month(s) => self.month = s,
            FilterUpdate::DayOfWeek(s) => self.day_of_week = s,
            FilterUpdate::ProfitRange(r) => self.profit_range = r,
            FilterUpdate::DateRange(r) => self.date_range = r,
            FilterUpdate::Reset => *self = FilterState::default(),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }

    /// A record passes only if it satisfies every active constraint.
    pub fn matches(&self, r: &SalesRecord) -> bool {
        self.store.matches(r.store_location())
            && self.category.matches(r.product_category())
            && self.month.matches(r.month())
            && self.day_of_week.matches(r.day_of_week().name())
            && (!self.profit_range.is_active() || self.profit_range.contains(r.profit_margin()))
            && self
                .date_range
                .map_or(true, |range| range.contains(r.parsed_date()))
    }
}

/// Records passing `filters`, in input order.
pub fn apply_filters(records: &[SalesRecord], filters: &FilterState) -> Vec<SalesRecord> {
    records
        .iter()
        .filter(|r| filters.matches(r))
        .cloned()
        .collect()
}

/// Distinct values for each categorical selector, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub stores: Vec<String>,
    pub categories: Vec<String>,
    pub months: Vec<String>,
    pub days_of_week: Vec<String>,
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

impl FilterOptions {
    pub fn from_records(records: &[SalesRecord]) -> Self {
        Self {
            stores: distinct(records.iter().map(|r| r.store_location())),
            categories: distinct(records.iter().map(|r| r.product_category())),
            months: distinct(records.iter().map(|r| r.month())),
            days_of_week: distinct(records.iter().map(|r| r.day_of_week().name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DayOfWeek;
    use crate::util::parse_display_date;

    fn rec(date: &str, day: DayOfWeek, store: &str, cat: &str, sales: i64, profit: i64) -> SalesRecord {
        let parsed = parse_display_date(date).unwrap();
        SalesRecord::new(date, parsed, day, 1, store, cat, 5, sales, profit)
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            rec("10-08-2023", DayOfWeek::Thursday, "Andheri", "Smartphones", 100_000, 15_000),
            rec("12-08-2023", DayOfWeek::Saturday, "Bandra", "Audio", 20_000, 6_000),
            rec("02-09-2023", DayOfWeek::Saturday, "Andheri", "Accessories", 10_000, 4_000),
            rec("03-09-2023", DayOfWeek::Sunday, "Colaba", "Laptops", 0, 0),
            rec("04-09-2023", DayOfWeek::Monday, "Colaba", "Laptops", 50_000, -2_500),
        ]
    }

    #[test]
    fn default_state_passes_everything() {
        let records = sample();
        assert_eq!(apply_filters(&records, &FilterState::default()), records);
    }

    #[test]
    fn categorical_filters_combine_with_and() {
        let mut f = FilterState::default();
        f.apply(FilterUpdate::Store(Selection::from_input("Andheri")));
        assert_eq!(apply_filters(&sample(), &f).len(), 2);
        f.apply(FilterUpdate::Month(Selection::from_input("September")));
        let out = apply_filters(&sample(), &f);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].product_category(), "Accessories");
        f.apply(FilterUpdate::DayOfWeek(Selection::from_input("Sunday")));
        assert!(apply_filters(&sample(), &f).is_empty());
    }

    #[test]
    fn profit_range_is_inclusive_and_rejects_nan() {
        let mut f = FilterState::default();
        f.apply(FilterUpdate::ProfitRange(ProfitRange::new(15.0, 30.0)));
        let out = apply_filters(&sample(), &f);
        let margins: Vec<f64> = out.iter().map(|r| r.profit_margin()).collect();
        assert_eq!(margins, [15.0, 30.0]);

        // Any active range drops the zero-revenue record with a NaN margin.
        f.apply(FilterUpdate::ProfitRange(ProfitRange::new(-100.0, 100.0)));
        let out = apply_filters(&sample(), &f);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|r| !r.profit_margin().is_nan()));
    }

    #[test]
    fn only_the_exact_full_range_is_inactive() {
        let mut f = FilterState::default();
        f.apply(FilterUpdate::ProfitRange(ProfitRange::new(0.0, 100.0)));
        assert!(!f.profit_range.is_active());
        assert_eq!(apply_filters(&sample(), &f), sample());

        f.apply(FilterUpdate::ProfitRange(ProfitRange::new(0.0, 99.99)));
        assert!(f.profit_range.is_active());
        let out = apply_filters(&sample(), &f);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|r| r.profit_margin() >= 0.0));
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut f = FilterState::default();
        f.apply(FilterUpdate::ProfitRange(ProfitRange::new(10.0, 35.0)));
        f.apply(FilterUpdate::Category(Selection::from_input("Audio")));
        let once = apply_filters(&sample(), &f);
        let twice = apply_filters(&once, &f);
        assert_eq!(once, twice);
    }

    #[test]
    fn reset_restores_full_sequence() {
        let mut f = FilterState::default();
        f.apply(FilterUpdate::Store(Selection::from_input("Colaba")));
        f.apply(FilterUpdate::ProfitRange(ProfitRange::new(50.0, 60.0)));
        assert!(!f.is_default());
        f.apply(FilterUpdate::Reset);
        assert!(f.is_default());
        assert_eq!(apply_filters(&sample(), &f), sample());
    }

    #[test]
    fn date_range_is_inclusive() {
        let mut f = FilterState::default();
        f.apply(FilterUpdate::DateRange(Some(DateRange {
            from: parse_display_date("12-08-2023").unwrap(),
            to: parse_display_date("03-09-2023").unwrap(),
        })));
        let dates: Vec<_> = apply_filters(&sample(), &f)
            .iter()
            .map(|r| r.date().to_string())
            .collect();
        assert_eq!(dates, ["12-08-2023", "02-09-2023", "03-09-2023"]);
    }

    #[test]
    fn selection_input_parsing() {
        assert_eq!(Selection::from_input("ALL"), Selection::All);
        assert_eq!(Selection::from_input(" "), Selection::All);
        assert!(Selection::from_input("Audio").is_active());
    }

    #[test]
    fn options_are_distinct_in_first_seen_order() {
        let opts = FilterOptions::from_records(&sample());
        assert_eq!(opts.stores, ["Andheri", "Bandra", "Colaba"]);
        assert_eq!(opts.months, ["August", "September"]);
        assert_eq!(opts.days_of_week, ["Thursday", "Saturday", "Sunday", "Monday"]);
    }
}
