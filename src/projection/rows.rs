//! Projection output structures

use serde::{Deserialize, Serialize};

/// Variance-to-plan percentage: (actual / baseline - 1) * 100.
/// None when the baseline is zero.
pub fn variance_to_plan(actual: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        None
    } else {
        Some((actual / baseline - 1.0) * 100.0)
    }
}

/// One year of projected financials under a scenario.
///
/// Ratios that would divide by zero carry None instead; extreme variances can
/// legitimately drive revenue or homes to zero (or negative), and the engine
/// stays total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Period label ("Year 1")
    pub year: String,
    /// Zero-based year index
    pub year_index: usize,

    /// Homes processed after volume variance
    pub adjusted_homes: f64,
    /// Recovery rate after yield variance
    pub adjusted_recovery: f64,
    /// Sellable board feet: homes * board feet per home * recovery
    pub total_board_feet: f64,

    /// Lumber sales after price variance
    pub lumber_revenue: f64,
    /// Tipping fees (after tipping variance) plus materials fees
    pub other_revenue: f64,
    /// Lumber plus other revenue
    pub total_revenue: f64,

    /// Direct costs after volume and cost variance
    pub direct_costs: f64,
    /// Total revenue minus direct costs
    pub gross_margin: f64,
    /// Gross margin as a percent of revenue; None at zero revenue
    pub margin_percent: Option<f64>,
    /// Total revenue per home processed; None at zero homes
    pub revenue_per_home: Option<f64>,

    /// The plan revenue target for this year, for variance comparison
    pub baseline_revenue: f64,
    /// Fixed external inflow for this year
    pub non_operating_inflow: f64,
    /// Gross margin plus non-operating inflow
    pub total_cash_inflow: f64,
}

/// Complete scenario evaluation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// One row per plan year, in year order
    pub rows: Vec<ProjectionRow>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a projection row
    pub fn add_row(&mut self, row: ProjectionRow) {
        self.rows.push(row);
    }

    /// Derived aggregate metrics over all years
    pub fn summary(&self) -> ProjectionSummary {
        let cumulative_revenue: f64 = self.rows.iter().map(|r| r.total_revenue).sum();
        let cumulative_margin: f64 = self.rows.iter().map(|r| r.gross_margin).sum();
        let cumulative_cash_inflow: f64 = self.rows.iter().map(|r| r.total_cash_inflow).sum();

        let last = self.rows.last();
        let final_year_revenue = last.map(|r| r.total_revenue).unwrap_or(0.0);
        let final_year_margin = last.map(|r| r.gross_margin).unwrap_or(0.0);
        let final_year_variance_to_plan =
            last.and_then(|r| variance_to_plan(r.total_revenue, r.baseline_revenue));
        let final_year_margin_percent = last.and_then(|r| r.margin_percent);
        let final_year_revenue_per_home = last.and_then(|r| r.revenue_per_home);

        ProjectionSummary {
            years: self.rows.len(),
            cumulative_revenue,
            cumulative_margin,
            cumulative_cash_inflow,
            final_year_revenue,
            final_year_margin,
            final_year_variance_to_plan,
            final_year_margin_percent,
            final_year_revenue_per_home,
        }
    }
}

impl Default for ProjectionResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate metrics for the KPI ribbon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: usize,
    pub cumulative_revenue: f64,
    pub cumulative_margin: f64,
    pub cumulative_cash_inflow: f64,
    pub final_year_revenue: f64,
    pub final_year_margin: f64,
    pub final_year_variance_to_plan: Option<f64>,
    pub final_year_margin_percent: Option<f64>,
    pub final_year_revenue_per_home: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_variance_to_plan() {
        assert_relative_eq!(variance_to_plan(110.0, 100.0).unwrap(), 10.0);
        assert_relative_eq!(variance_to_plan(90.0, 100.0).unwrap(), -10.0);
        assert_eq!(variance_to_plan(100.0, 0.0), None);
    }

    #[test]
    fn test_empty_result_summary() {
        let summary = ProjectionResult::new().summary();

        assert_eq!(summary.years, 0);
        assert_eq!(summary.cumulative_revenue, 0.0);
        assert_eq!(summary.final_year_variance_to_plan, None);
        assert_eq!(summary.final_year_margin_percent, None);
    }
}
