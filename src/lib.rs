// Sales analytics core for a single quarter of retail sales records.
//
// Raw CSV text is parsed into immutable `SalesRecord`s, which can then be
// filtered (`apply_filters`), summarised (`summarize`, `group_by`) and fed to
// the budget simulator (`simulate`). `Dashboard` wires these into a pipeline
// that re-derives everything on each filter change.
pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod simulator;
pub mod types;
pub mod util;

pub use aggregate::{
    by_day_of_week, category_shares, cumulative_by_date, group_by, peak_sales_day,
    sorted_by_revenue, summarize, weekend_lift, Dimension,
};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardSummary, DashboardView};
pub use error::{DashboardError, ParseError, ParseErrorKind, Result};
pub use filter::{apply_filters, DateRange, FilterOptions, FilterState, FilterUpdate, ProfitRange, Selection};
pub use loader::{parse, parse_lenient, LoadReport};
pub use simulator::{simulate, PerformanceBadge, SimulationSession};
pub use types::{
    CategoryShare, CumulativePoint, DayOfWeek, GroupTotals, KpiSummary, SalesRecord,
    SimulationResult, WeekendLift,
};
