//! Baseline plan constants: throughput, recovery, pricing, fees, and cost calibration

mod costs;
mod pricing;
pub mod loader;

pub use costs::CostBasis;
pub use loader::LoadedBaseline;
pub use pricing::{PriceSegment, PricingBasis};

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a baseline model
#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("failed to read baseline file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse baseline CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid numeric field: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    #[error("invalid integer field: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("baseline has no plan years")]
    EmptyPlan,

    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("segment mix for year index {year} sums to {sum}, expected 1.0")]
    MixSum { year: usize, sum: f64 },

    #[error("segment {segment} references year index {year} outside the plan")]
    SegmentYear { segment: String, year: usize },

    #[error("missing fee constant: {0}")]
    MissingFee(&'static str),
}

/// The calibrated business plan: every per-year constant the scenario engine
/// perturbs, plus the revenue/margin targets the plan was calibrated against.
///
/// Trusted input. All per-year vectors are aligned by year index; `validate`
/// checks alignment and segment mix sums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineModel {
    /// Period labels ("Year 1".."Year 3")
    pub years: Vec<String>,

    /// Homes processed per year at plan volume
    pub base_homes: Vec<f64>,

    /// Fraction of material recovered as sellable lumber per year
    pub base_recovery: Vec<f64>,

    /// Board feet of recoverable lumber per home processed
    pub board_feet_per_home: f64,

    /// Lumber pricing basis (blended per-board-foot or product segments)
    pub pricing: PricingBasis,

    /// Tipping fee collected per home accepted
    pub tipping_fee_per_home: f64,

    /// Salvaged-materials fee per home, unaffected by tipping variance
    pub materials_fee_per_home: f64,

    /// Direct cost calibration mode
    pub cost_basis: CostBasis,

    /// Plan revenue targets per year (the calibration reference)
    pub base_revenue_target: Vec<f64>,

    /// Plan gross margin targets per year
    pub base_margin_target: Vec<f64>,

    /// Fixed external inflow per year (grant schedule etc.), added after
    /// margin and untouched by any variance multiplier
    pub non_operating_inflow: Vec<f64>,
}

impl BaselineModel {
    /// The v5.4 financial model: blended pricing, margin-derived costs.
    ///
    /// This is the calibration the interactive planner ships with; sliders
    /// at 0% reproduce these targets to within the rounding of the published
    /// plan figures (see `recalibrated` for an exact contract).
    pub fn v54() -> Self {
        Self {
            years: vec![
                "Year 1".to_string(),
                "Year 2".to_string(),
                "Year 3".to_string(),
            ],
            base_homes: vec![457.0, 960.0, 1200.0],
            base_recovery: vec![0.50, 0.60, 0.65],
            board_feet_per_home: 6615.0,
            pricing: PricingBasis::v54_blended(),
            tipping_fee_per_home: 1200.0,
            materials_fee_per_home: 600.0,
            cost_basis: CostBasis::MarginDerived,
            base_revenue_target: vec![4_753_166.0, 12_469_066.0, 17_820_600.0],
            base_margin_target: vec![3_978_038.0, 10_826_653.0, 14_805_261.0],
            non_operating_inflow: vec![0.0, 0.0, 0.0],
        }
    }

    /// Number of plan years
    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    /// Unscaled direct cost for a year, per the configured calibration mode.
    /// The engine applies the volume and cost multipliers on top.
    pub fn direct_cost_basis(&self, year: usize) -> f64 {
        match &self.cost_basis {
            CostBasis::MarginDerived => {
                self.base_revenue_target[year] - self.base_margin_target[year]
            }
            CostBasis::PerHome { cost_per_home } => self.base_homes[year] * cost_per_home[year],
        }
    }

    /// Replace the plan targets with this model's own zero-variance output.
    ///
    /// The published plan targets are rounded, so the calibration identity
    /// only holds to ~0.2% against them. The recalibrated model reproduces
    /// its targets exactly; margin-derived cost dollars are unchanged.
    pub fn recalibrated(&self) -> Self {
        let costs: Vec<f64> = (0..self.year_count())
            .map(|y| self.direct_cost_basis(y))
            .collect();

        let engine = crate::projection::ProjectionEngine::new(self.clone());
        let result = engine.project(&crate::scenario::ScenarioSchedule::baseline());

        let mut out = self.clone();
        out.base_revenue_target = result.rows.iter().map(|r| r.total_revenue).collect();
        out.base_margin_target = result
            .rows
            .iter()
            .zip(&costs)
            .map(|(r, c)| r.total_revenue - c)
            .collect();
        out
    }

    /// Check per-year vector alignment and segment mix sums
    pub fn validate(&self) -> Result<(), BaselineError> {
        let n = self.year_count();
        if n == 0 {
            return Err(BaselineError::EmptyPlan);
        }

        let check = |field: &'static str, actual: usize| {
            if actual == n {
                Ok(())
            } else {
                Err(BaselineError::LengthMismatch {
                    field,
                    expected: n,
                    actual,
                })
            }
        };
        check("base_homes", self.base_homes.len())?;
        check("base_recovery", self.base_recovery.len())?;
        check("base_revenue_target", self.base_revenue_target.len())?;
        check("base_margin_target", self.base_margin_target.len())?;
        check("non_operating_inflow", self.non_operating_inflow.len())?;

        self.pricing.validate(n)?;
        self.cost_basis.validate(n)?;
        Ok(())
    }

    /// Load a baseline from CSV files in the default location (data/baseline/)
    pub fn from_csv() -> Result<Self, BaselineError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_BASELINE_PATH))
    }

    /// Load a baseline from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, BaselineError> {
        let loaded = LoadedBaseline::load_from(path)?;
        Self::from_loaded(&loaded)
    }

    /// Build and validate a model from loaded CSV data
    pub fn from_loaded(loaded: &LoadedBaseline) -> Result<Self, BaselineError> {
        let pricing = match &loaded.segments {
            Some(segments) => PricingBasis::Segmented {
                segments: segments.clone(),
            },
            None => PricingBasis::Blended {
                price_per_board_foot: loaded.plan_years.iter().map(|y| y.price).collect(),
            },
        };

        let cost_basis = match &loaded.cost_per_home {
            Some(costs) => CostBasis::PerHome {
                cost_per_home: costs.clone(),
            },
            None => CostBasis::MarginDerived,
        };

        let model = Self {
            years: loaded.plan_years.iter().map(|y| y.year.clone()).collect(),
            base_homes: loaded.plan_years.iter().map(|y| y.homes).collect(),
            base_recovery: loaded.plan_years.iter().map(|y| y.recovery).collect(),
            board_feet_per_home: loaded.fee("board_feet_per_home")?,
            pricing,
            tipping_fee_per_home: loaded.fee("tipping_fee_per_home")?,
            materials_fee_per_home: loaded.fee("materials_fee_per_home")?,
            cost_basis,
            base_revenue_target: loaded.plan_years.iter().map(|y| y.revenue_target).collect(),
            base_margin_target: loaded.plan_years.iter().map(|y| y.margin_target).collect(),
            non_operating_inflow: loaded
                .plan_years
                .iter()
                .map(|y| y.non_operating_inflow)
                .collect(),
        };
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_v54_validates() {
        let model = BaselineModel::v54();
        assert!(model.validate().is_ok());
        assert_eq!(model.year_count(), 3);
    }

    #[test]
    fn test_margin_derived_cost_basis() {
        let model = BaselineModel::v54();

        assert_relative_eq!(model.direct_cost_basis(0), 775_128.0);
        assert_relative_eq!(model.direct_cost_basis(1), 1_642_413.0);
        assert_relative_eq!(model.direct_cost_basis(2), 3_015_339.0);
    }

    #[test]
    fn test_per_home_cost_basis() {
        let mut model = BaselineModel::v54();
        model.cost_basis = CostBasis::v54_per_home();

        assert_relative_eq!(model.direct_cost_basis(0), 457.0 * 1700.0);
        assert_relative_eq!(model.direct_cost_basis(2), 1200.0 * 1850.0);
    }

    #[test]
    fn test_misaligned_vector_rejected() {
        let mut model = BaselineModel::v54();
        model.base_recovery.pop();

        assert!(matches!(
            model.validate(),
            Err(BaselineError::LengthMismatch {
                field: "base_recovery",
                ..
            })
        ));
    }

    #[test]
    fn test_recalibrated_preserves_cost_dollars() {
        let model = BaselineModel::v54();
        let recal = model.recalibrated();

        for y in 0..model.year_count() {
            assert_relative_eq!(
                recal.direct_cost_basis(y),
                model.direct_cost_basis(y),
                max_relative = 1e-12
            );
        }
        // Targets move by at most the published rounding drift
        for y in 0..model.year_count() {
            assert_relative_eq!(
                recal.base_revenue_target[y],
                model.base_revenue_target[y],
                max_relative = 2e-3
            );
        }
    }
}
