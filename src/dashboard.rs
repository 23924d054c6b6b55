// Re-derivation pipeline tying the core together.
//
// The dashboard owns the full record sequence and the current filter
// state. Every explicit state change re-runs filter + summarize from
// scratch; nothing is patched incrementally.
use crate::aggregate::{
    category_shares, cumulative_by_date, peak_sales_day, sorted_by_revenue, summarize,
    weekend_lift, Dimension,
};
use crate::error::Result;
use crate::filter::{apply_filters, FilterOptions, FilterState, FilterUpdate};
use crate::loader::{self, LoadReport};
use crate::output::{breakdown_rows, write_csv, write_json, write_raw};
use crate::simulator::SimulationSession;
use crate::types::{
    CategoryShare, GroupTotals, KpiSummary, SalesRecord, SimulationResult, WeekendLift,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filtered records and their KPIs for the current filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub filtered: Vec<SalesRecord>,
    pub kpis: KpiSummary,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_records: usize,
    pub filtered_records: usize,
    pub filters: FilterState,
    pub overall: KpiSummary,
    pub filtered: KpiSummary,
    pub category_shares: Vec<CategoryShare>,
    pub weekend_lift: WeekendLift,
    pub peak_sales_day: Option<GroupTotals>,
    pub simulation: Option<SimulationResult>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    raw: String,
    records: Vec<SalesRecord>,
    overall: KpiSummary,
    filters: FilterState,
    view: DashboardView,
}

impl Dashboard {
    pub fn new(raw: String, records: Vec<SalesRecord>) -> Self {
        let overall = summarize(&records);
        let view = DashboardView {
            filtered: records.clone(),
            kpis: overall.clone(),
        };
        Self {
            raw,
            records,
            overall,
            filters: FilterState::default(),
            view,
        }
    }

    /// Parse CSV text, skipping rejected rows.
    pub fn from_csv(raw: String) -> Result<(Self, LoadReport)> {
        let (records, report) = loader::parse_lenient(&raw)?;
        Ok((Self::new(raw, records), report))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<(Self, LoadReport)> {
        let (raw, records, report) = loader::load_file(path)?;
        Ok((Self::new(raw, records), report))
    }

    pub fn raw_csv(&self) -> &str {
        &self.raw
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn overall_kpis(&self) -> &KpiSummary {
        &self.overall
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn filtered(&self) -> &[SalesRecord] {
        &self.view.filtered
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_records(&self.records)
    }

    /// Apply one filter change and re-derive the filtered view.
    pub fn update(&mut self, update: FilterUpdate) -> &DashboardView {
        self.filters.apply(update);
        self.recompute();
        &self.view
    }

    pub fn reset_filters(&mut self) -> &DashboardView {
        self.update(FilterUpdate::Reset)
    }

    fn recompute(&mut self) {
        let filtered = apply_filters(&self.records, &self.filters);
        let kpis = summarize(&filtered);
        debug!(
            total = self.records.len(),
            filtered = filtered.len(),
            "recomputed dashboard view"
        );
        self.view = DashboardView { filtered, kpis };
    }

    /// Run the simulator on the filtered records, tracking the session best.
    pub fn simulate(&self, budget: f64, session: &mut SimulationSession) -> SimulationResult {
        session.simulate(&self.view.filtered, budget)
    }

    pub fn summary(&self, simulation: Option<SimulationResult>) -> DashboardSummary {
        let filtered = &self.view.filtered;
        DashboardSummary {
            total_records: self.records.len(),
            filtered_records: filtered.len(),
            filters: self.filters.clone(),
            overall: self.overall.clone(),
            filtered: self.view.kpis.clone(),
            category_shares: category_shares(filtered),
            weekend_lift: weekend_lift(filtered),
            peak_sales_day: peak_sales_day(filtered),
            simulation,
        }
    }

    /// Write the raw dataset, per-dimension breakdowns of the filtered view,
    /// the cumulative series and a JSON summary into `dir`.
    pub fn export(
        &self,
        dir: impl AsRef<Path>,
        simulation: Option<SimulationResult>,
    ) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let filtered = &self.view.filtered;
        let mut written = Vec::new();

        let raw_path = dir.join("sales_data.csv");
        write_raw(&raw_path, &self.raw)?;
        written.push(raw_path);

        for (name, dim) in [
            ("breakdown_by_store.csv", Dimension::Store),
            ("breakdown_by_category.csv", Dimension::Category),
        ] {
            let path = dir.join(name);
            write_csv(&path, &breakdown_rows(&sorted_by_revenue(filtered, dim)))?;
            written.push(path);
        }

        let path = dir.join("cumulative_growth.csv");
        write_csv(&path, &cumulative_by_date(filtered))?;
        written.push(path);

        let path = dir.join("summary.json");
        write_json(&path, &self.summary(simulation))?;
        written.push(path);

        Ok(written)
    }
}
