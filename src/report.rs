//! Presentation feeds: currency formatting, margin waterfall, plan comparison
//!
//! Pure functions over engine output, shaped for the KPI ribbon, grouped-bar
//! comparison, and waterfall chart the planner renders.

use serde::{Deserialize, Serialize};

use crate::projection::{ProjectionResult, ProjectionRow};

/// Format a dollar amount: `$` plus thousands separators, zero decimals
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.abs().round() as i64;
    let negative = amount < 0.0 && rounded != 0;

    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Step kind in the waterfall chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Measure {
    /// Incremental bar
    Relative,
    /// Running-total bar
    Total,
}

/// One bar of the unit-economics waterfall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallStep {
    pub label: String,
    pub amount: f64,
    pub measure: Measure,
}

/// Decompose one year's row into the waterfall:
/// lumber (+), other (+), total revenue, direct costs (-), gross margin
pub fn waterfall(row: &ProjectionRow) -> Vec<WaterfallStep> {
    vec![
        WaterfallStep {
            label: "Lumber Sales".to_string(),
            amount: row.lumber_revenue,
            measure: Measure::Relative,
        },
        WaterfallStep {
            label: "Other Revenue".to_string(),
            amount: row.other_revenue,
            measure: Measure::Relative,
        },
        WaterfallStep {
            label: "Total Revenue".to_string(),
            amount: row.total_revenue,
            measure: Measure::Total,
        },
        WaterfallStep {
            label: "Direct Costs".to_string(),
            amount: -row.direct_costs,
            measure: Measure::Relative,
        },
        WaterfallStep {
            label: "Gross Margin".to_string(),
            amount: row.gross_margin,
            measure: Measure::Total,
        },
    ]
}

/// One year of the plan-vs-scenario grouped bar chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub year: String,
    pub baseline_revenue: f64,
    pub scenario_revenue: f64,
}

/// Paired per-year revenue series for the comparison chart
pub fn comparison_series(result: &ProjectionResult) -> Vec<ComparisonPoint> {
    result
        .rows
        .iter()
        .map(|row| ComparisonPoint {
            year: row.year.clone(),
            baseline_revenue: row.baseline_revenue,
            scenario_revenue: row.total_revenue,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineModel;
    use crate::projection::ProjectionEngine;
    use crate::scenario::ScenarioSchedule;
    use approx::assert_relative_eq;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(600.0), "$600");
        assert_eq!(format_currency(17_845_488.4), "$17,845,488");
        assert_eq!(format_currency(-3_015_339.0), "-$3,015,339");
        assert_eq!(format_currency(999.6), "$1,000");
        // Rounds to zero: no negative sign on $0
        assert_eq!(format_currency(-0.4), "$0");
    }

    #[test]
    fn test_waterfall_reconciles() {
        let engine = ProjectionEngine::new(BaselineModel::v54());
        let result = engine.project(&ScenarioSchedule::baseline());
        let steps = waterfall(&result.rows[2]);

        assert_eq!(steps.len(), 5);

        // Relative revenue steps sum to the revenue total bar
        let revenue: f64 = steps[..2].iter().map(|s| s.amount).sum();
        assert_relative_eq!(revenue, steps[2].amount, max_relative = 1e-12);

        // Total revenue plus the cost step lands on the margin bar
        assert_relative_eq!(
            steps[2].amount + steps[3].amount,
            steps[4].amount,
            max_relative = 1e-12
        );
        assert_eq!(steps[2].measure, Measure::Total);
        assert_eq!(steps[3].measure, Measure::Relative);
    }

    #[test]
    fn test_comparison_series_pairs_plan_and_scenario() {
        let engine = ProjectionEngine::new(BaselineModel::v54());
        let result = engine.project(&ScenarioSchedule::baseline());
        let series = comparison_series(&result);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].year, "Year 1");
        assert_relative_eq!(series[2].baseline_revenue, 17_820_600.0);
        assert_relative_eq!(series[2].scenario_revenue, result.rows[2].total_revenue);
    }
}
