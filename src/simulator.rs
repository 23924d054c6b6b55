// Budget "what-if" simulator.
//
// The projection is a fixed linear model: historical spend is assumed to be
// 4% of revenue, and the resulting return ratio is applied to the budget.
use crate::aggregate::{best_margin, Dimension};
use crate::types::{SalesRecord, SimulationResult};
use crate::util::sum_amounts;
use serde::Serialize;
use tracing::debug;

/// Share of revenue assumed to have been spent to earn it.
pub const SPEND_SHARE_OF_REVENUE: f64 = 0.04;

/// ROI (%) above which a strategy counts as a smart investment.
pub const SMART_ROI: f64 = 15.0;
/// ROI (%) from which a strategy counts as average.
pub const AVERAGE_ROI: f64 = 8.0;
/// ROI (%) above which a strategy is flagged as a best-move candidate.
pub const BEST_MOVE_ROI: f64 = 12.0;

pub fn simulate(records: &[SalesRecord], budget: f64) -> SimulationResult {
    if records.is_empty() {
        return SimulationResult::default();
    }
    let budget = if budget.is_finite() { budget } else { 0.0 };

    let total_revenue = sum_amounts(records.iter().map(|r| r.total_sales_amount())) as f64;
    let total_profit = sum_amounts(records.iter().map(|r| r.profit_amount())) as f64;

    let average_roi = if total_revenue > 0.0 {
        total_profit / (total_revenue * SPEND_SHARE_OF_REVENUE)
    } else {
        0.0
    };
    let investment_multiplier = average_roi / 100.0;

    let expected_profit = budget * investment_multiplier;
    let expected_revenue = budget + expected_profit;

    let roi = if budget > 0.0 {
        expected_profit / budget * 100.0
    } else {
        0.0
    };
    let revenue_to_spend_ratio = if budget > 0.0 {
        expected_revenue / budget
    } else {
        0.0
    };
    let profit_margin = if expected_revenue > 0.0 {
        expected_profit / expected_revenue * 100.0
    } else {
        0.0
    };

    debug!(budget, roi, expected_profit, "simulated budget");
    SimulationResult {
        expected_revenue,
        expected_profit,
        roi,
        revenue_to_spend_ratio,
        profit_margin,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceBadge {
    SmartInvestor,
    AverageSpender,
    NeedsOptimization,
}

impl PerformanceBadge {
    pub fn for_roi(roi: f64) -> Self {
        if roi > SMART_ROI {
            PerformanceBadge::SmartInvestor
        } else if roi >= AVERAGE_ROI {
            PerformanceBadge::AverageSpender
        } else {
            PerformanceBadge::NeedsOptimization
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceBadge::SmartInvestor => "Smart Investor",
            PerformanceBadge::AverageSpender => "Average Spender",
            PerformanceBadge::NeedsOptimization => "Needs Optimization",
        }
    }
}

impl SimulationResult {
    pub fn badge(&self) -> PerformanceBadge {
        PerformanceBadge::for_roi(self.roi)
    }

    /// Strong enough to celebrate.
    pub fn is_celebration(&self) -> bool {
        self.roi > SMART_ROI
    }
}

/// Advice lines shown next to a simulation result.
pub fn insights(records: &[SalesRecord], result: &SimulationResult) -> Vec<String> {
    let mut out = Vec::new();
    if result.roi > SMART_ROI {
        out.push("Excellent choice! This investment strategy shows strong potential returns.".to_string());
    } else if result.roi < AVERAGE_ROI {
        out.push(
            "Consider adjusting your strategy - try different stores or product categories for better ROI."
                .to_string(),
        );
    }
    if let Some((store, margin)) = best_margin(records, Dimension::Store) {
        out.push(format!(
            "{} store shows the highest profit margin at {:.1}% - consider focusing your budget here.",
            store, margin
        ));
    }
    if let Some((category, margin)) = best_margin(records, Dimension::Category) {
        out.push(format!(
            "{} category offers {:.1}% profit margin - great for maximizing returns.",
            category, margin
        ));
    }
    if result.roi > BEST_MOVE_ROI {
        out.push("This strategy could be your best move of the day - keep experimenting with different filters!".to_string());
    }
    out
}

/// Best ROI seen across simulations in one session.
///
/// Owned by the caller; only a strictly higher ROI replaces the current best.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSession {
    best_roi: f64,
    best_budget: Option<f64>,
}

impl SimulationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result; returns `true` when it set a new best.
    pub fn record(&mut self, budget: f64, result: &SimulationResult) -> bool {
        if result.roi > self.best_roi {
            self.best_roi = result.roi;
            self.best_budget = Some(budget);
            return true;
        }
        false
    }

    pub fn best_roi(&self) -> f64 {
        self.best_roi
    }

    pub fn best_budget(&self) -> Option<f64> {
        self.best_budget
    }

    /// Simulate and record in one step.
    pub fn simulate(&mut self, records: &[SalesRecord], budget: f64) -> SimulationResult {
        let result = simulate(records, budget);
        self.record(budget, &result);
        result
    }
}
