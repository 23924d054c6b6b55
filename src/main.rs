// Console shell over the sales dashboard core.
//
// - Option [1] loads the CSV and reports rejected rows.
// - Options [2]-[5] show KPIs, change filters and run the budget simulator,
//   always against the currently filtered records.
// - Option [6] exports the raw dataset plus breakdowns and a JSON summary.
use sales_dashboard::aggregate::{by_day_of_week, cumulative_by_date, group_by, sorted_by_revenue};
use sales_dashboard::output::{breakdown_rows, preview_table_rows, record_preview_rows};
use sales_dashboard::simulator::insights;
use sales_dashboard::util::{format_currency, format_int, format_pct, parse_display_date};
use sales_dashboard::{
    Dashboard, DashboardConfig, DashboardError, DateRange, Dimension, FilterUpdate, KpiSummary,
    ProfitRange, Selection, SimulationResult, SimulationSession,
};
use std::io::{self, Write};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Everything the shell keeps between menu choices. Owned by `main`, passed
// down explicitly.
struct Session {
    config: DashboardConfig,
    dashboard: Option<Dashboard>,
    simulation: SimulationSession,
    last_result: Option<SimulationResult>,
}

/// Print `label` and read one trimmed line from stdin.
fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    prompt("Enter choice: ")
}

fn print_kpis(title: &str, kpis: &KpiSummary) {
    println!("{}", title);
    println!("  Total Revenue : {}", format_currency(kpis.total_revenue as f64));
    println!("  Units Sold    : {}", format_int(kpis.total_units_sold));
    println!("  Total Profit  : {}", format_currency(kpis.total_profit as f64));
    println!("  Top Store     : {}", kpis.top_store);
    println!("  Top Category  : {}\n", kpis.top_category);
}

/// Handle option [1]: load the CSV file named in the config.
fn handle_load(session: &mut Session) {
    let path = session.config.csv_path.clone();
    match Dashboard::load(&path) {
        Ok((dashboard, report)) => {
            println!(
                "Processing dataset... ({} rows read, {} loaded)",
                format_int(report.total_rows),
                format_int(report.loaded_rows)
            );
            if report.parse_errors() > 0 {
                println!(
                    "Note: {} rows rejected due to parse errors:",
                    format_int(report.parse_errors())
                );
                for e in report.rejected.iter().take(5) {
                    println!("  - {}", e);
                }
            }
            println!("\nData preview:");
            preview_table_rows(
                &record_preview_rows(dashboard.records(), session.config.preview_rows),
                session.config.preview_rows,
            );
            session.dashboard = Some(dashboard);
            session.simulation = SimulationSession::new();
            session.last_result = None;
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to load sales data");
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: KPI cards plus the chart series as tables.
fn handle_show(dashboard: &Dashboard) {
    print_kpis("Overall KPIs", dashboard.overall_kpis());
    if !dashboard.filters().is_default() {
        print_kpis(
            &format!(
                "Filtered KPIs ({} of {} records)",
                format_int(dashboard.filtered().len()),
                format_int(dashboard.records().len())
            ),
            &dashboard.view().kpis,
        );
    }
    let filtered = dashboard.filtered();
    let rows = usize::MAX;

    println!("Revenue by Store");
    preview_table_rows(&breakdown_rows(&sorted_by_revenue(filtered, Dimension::Store)), rows);
    println!("Revenue by Category");
    preview_table_rows(&breakdown_rows(&sorted_by_revenue(filtered, Dimension::Category)), rows);
    println!("Revenue by Month");
    preview_table_rows(&breakdown_rows(&group_by(filtered, Dimension::Month)), rows);
    println!("Day-of-Week Sales");
    preview_table_rows(&breakdown_rows(&by_day_of_week(filtered)), rows);

    let summary = dashboard.summary(None);
    println!(
        "Weekend avg/day = {}, weekday avg/day = {}, weekend lift = {}",
        format_currency(summary.weekend_lift.weekend_avg),
        format_currency(summary.weekend_lift.weekday_avg),
        format_pct(summary.weekend_lift.lift_pct)
    );
    if let Some(last) = cumulative_by_date(filtered).last() {
        println!(
            "Cumulative sales {} / profit {} by {}",
            format_currency(last.cumulative_sales as f64),
            format_currency(last.cumulative_profit as f64),
            last.date
        );
    }
    if let Some(peak) = summary.peak_sales_day {
        println!("Peak sales day: {} with {}", peak.key, format_currency(peak.sales as f64));
    }
    println!();
}

fn pick(label: &str, options: &[String]) -> Selection {
    println!("{} (or 'all'): {}", label, options.join(", "));
    Selection::from_input(&prompt("Value: "))
}

/// Handle option [3]: change one filter field.
fn handle_filter(dashboard: &mut Dashboard) {
    let opts = dashboard.options();
    println!("[1] Store  [2] Category  [3] Month  [4] Day of week  [5] Profit margin range  [6] Date range");
    let update = match read_choice().as_str() {
        "1" => FilterUpdate::Store(pick("Stores", &opts.stores)),
        "2" => FilterUpdate::Category(pick("Categories", &opts.categories)),
        "3" => FilterUpdate::Month(pick("Months", &opts.months)),
        "4" => FilterUpdate::DayOfWeek(pick("Days", &opts.days_of_week)),
        "5" => {
            let min = prompt("Min margin %: ").parse::<f64>();
            let max = prompt("Max margin %: ").parse::<f64>();
            match (min, max) {
                (Ok(min), Ok(max)) => FilterUpdate::ProfitRange(ProfitRange::new(min, max)),
                _ => {
                    println!("Invalid number.\n");
                    return;
                }
            }
        }
        "6" => {
            let input = prompt("From and to as DD-MM-YYYY DD-MM-YYYY (blank clears): ");
            if input.is_empty() {
                FilterUpdate::DateRange(None)
            } else {
                let mut parts = input.split_whitespace().map(parse_display_date);
                match (parts.next().flatten(), parts.next().flatten()) {
                    (Some(from), Some(to)) => FilterUpdate::DateRange(Some(DateRange { from, to })),
                    _ => {
                        println!("Invalid dates.\n");
                        return;
                    }
                }
            }
        }
        _ => {
            println!("Invalid choice.\n");
            return;
        }
    };
    let view = dashboard.update(update);
    println!(
        "Filter applied: {} records match.\n",
        format_int(view.filtered.len())
    );
}

/// Handle option [5]: project returns for a budget.
fn handle_simulate(session: &mut Session) {
    let Some(dashboard) = session.dashboard.as_ref() else {
        return;
    };
    let cfg = &session.config;
    let input = prompt(&format!(
        "Investment budget ({} - {}, blank for {}): ",
        format_currency(cfg.budget_min),
        format_currency(cfg.budget_max),
        format_currency(cfg.default_budget)
    ));
    let requested = if input.is_empty() {
        cfg.default_budget
    } else {
        match input.replace(',', "").parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                println!("Invalid budget.\n");
                return;
            }
        }
    };
    let budget = cfg.clamp_budget(requested);
    let result = dashboard.simulate(budget, &mut session.simulation);

    println!("\nBudget            : {}", format_currency(budget));
    println!("Expected Revenue  : {}", format_currency(result.expected_revenue));
    println!("Expected Profit   : {}", format_currency(result.expected_profit));
    println!("ROI               : {}", format_pct(result.roi));
    println!("Revenue/Spend     : {:.2}x", result.revenue_to_spend_ratio);
    println!("Profit Margin     : {}", format_pct(result.profit_margin));
    println!("Performance       : {}", result.badge().label());
    if result.is_celebration() {
        println!("*** Smart move! ***");
    }
    for line in insights(dashboard.filtered(), &result) {
        println!("  - {}", line);
    }
    if let Some(best) = session.simulation.best_budget() {
        println!(
            "Best ROI so far: {} with a {} budget",
            format_pct(session.simulation.best_roi()),
            format_currency(best)
        );
    }
    println!();
    session.last_result = Some(result);
}

/// Handle option [6]: write files into the export directory.
fn handle_export(session: &Session) {
    let Some(dashboard) = session.dashboard.as_ref() else {
        return;
    };
    match dashboard.export(&session.config.export_dir, session.last_result) {
        Ok(paths) => {
            println!("Outputs saved:");
            for p in paths {
                println!("  {}", p.display());
            }
            println!();
        }
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn main() -> Result<(), DashboardError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_dashboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut session = Session {
        config: DashboardConfig::from_env()?,
        dashboard: None,
        simulation: SimulationSession::new(),
        last_result: None,
    };

    loop {
        println!("Sales Dashboard:");
        println!("[1] Load the file");
        println!("[2] Show KPIs and breakdowns");
        println!("[3] Change a filter");
        println!("[4] Reset filters");
        println!("[5] Run budget simulator");
        println!("[6] Export data and reports");
        println!("[0] Exit\n");
        let choice = read_choice();
        if choice == "0" {
            println!("Exiting the program.");
            break;
        }
        if choice == "1" {
            handle_load(&mut session);
            continue;
        }
        if !matches!(choice.as_str(), "2" | "3" | "4" | "5" | "6") {
            println!("Invalid choice. Please enter 0-6.\n");
            continue;
        }
        let Some(dashboard) = session.dashboard.as_mut() else {
            println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
            continue;
        };
        match choice.as_str() {
            "2" => handle_show(dashboard),
            "3" => handle_filter(dashboard),
            "4" => {
                dashboard.reset_filters();
                println!("Filters reset.\n");
            }
            "5" => handle_simulate(&mut session),
            _ => handle_export(&session),
        }
    }
    Ok(())
}
