//! Core scenario calculation: variance multipliers over the calibrated plan
//!
//! Pure and total. Variance deltas arrive unclamped; impossible scenarios
//! (negative homes, negative revenue) are valid exploratory outputs, not
//! errors. The only guarded condition is division by zero on the ratio
//! fields, which become None.

use crate::baseline::BaselineModel;
use crate::scenario::{ScenarioParameters, ScenarioSchedule};

use super::rows::{ProjectionResult, ProjectionRow};

/// Stateless projection engine over a baseline model
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    baseline: BaselineModel,
}

impl ProjectionEngine {
    /// Create an engine over the given baseline
    pub fn new(baseline: BaselineModel) -> Self {
        Self { baseline }
    }

    /// Reference to the underlying baseline
    pub fn baseline(&self) -> &BaselineModel {
        &self.baseline
    }

    /// Evaluate a schedule, producing one row per plan year in order
    pub fn project(&self, schedule: &ScenarioSchedule) -> ProjectionResult {
        let mut result = ProjectionResult::new();
        for year in 0..self.baseline.year_count() {
            let params = schedule.params_for(year);
            result.add_row(self.project_year(year, &params));
        }
        result
    }

    /// Evaluate a single plan year under one parameter set
    pub fn project_year(&self, year: usize, params: &ScenarioParameters) -> ProjectionRow {
        let b = &self.baseline;

        let adjusted_homes = b.base_homes[year] * params.volume_multiplier();
        let adjusted_recovery = b.base_recovery[year] * params.yield_multiplier();
        let total_board_feet = adjusted_homes * b.board_feet_per_home * adjusted_recovery;

        let lumber_revenue =
            b.pricing
                .lumber_revenue(total_board_feet, year, params.price_multiplier());

        // Materials fees track volume only; tipping fees also take the
        // negotiating-power variance
        let other_revenue = adjusted_homes * b.tipping_fee_per_home * params.tipping_multiplier()
            + adjusted_homes * b.materials_fee_per_home;

        let total_revenue = lumber_revenue + other_revenue;

        // Direct costs are home-driven, so volume scales them alongside the
        // cost variance in both calibration modes
        let direct_costs =
            b.direct_cost_basis(year) * params.volume_multiplier() * params.cost_multiplier();

        let gross_margin = total_revenue - direct_costs;

        let margin_percent = if total_revenue == 0.0 {
            None
        } else {
            Some(gross_margin / total_revenue * 100.0)
        };
        let revenue_per_home = if adjusted_homes == 0.0 {
            None
        } else {
            Some(total_revenue / adjusted_homes)
        };

        let non_operating_inflow = b.non_operating_inflow[year];

        ProjectionRow {
            year: b.years[year].clone(),
            year_index: year,
            adjusted_homes,
            adjusted_recovery,
            total_board_feet,
            lumber_revenue,
            other_revenue,
            total_revenue,
            direct_costs,
            gross_margin,
            margin_percent,
            revenue_per_home,
            baseline_revenue: b.base_revenue_target[year],
            non_operating_inflow,
            total_cash_inflow: gross_margin + non_operating_inflow,
        }
    }
}
