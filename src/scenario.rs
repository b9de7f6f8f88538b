//! Scenario inputs and the batch runner
//!
//! Variances are signed percentage deltas against the plan, converted to
//! multipliers as `1 + delta / 100`. The engine enforces no bounds; the
//! `*_BOUNDS` constants are the recommended slider ranges for input
//! collectors, nothing more.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::baseline::{BaselineError, BaselineModel};
use crate::projection::{ProjectionEngine, ProjectionResult};

/// Recommended volume variance slider range, percent
pub const VOLUME_VARIANCE_BOUNDS: (f64, f64) = (-50.0, 50.0);
/// Recommended recovery yield variance slider range, percent
pub const YIELD_VARIANCE_BOUNDS: (f64, f64) = (-25.0, 25.0);
/// Recommended lumber price variance slider range, percent
pub const PRICE_VARIANCE_BOUNDS: (f64, f64) = (-50.0, 50.0);
/// Recommended tipping-power variance slider range, percent
pub const TIPPING_VARIANCE_BOUNDS: (f64, f64) = (-20.0, 20.0);
/// Recommended direct cost variance slider range, percent
pub const COST_VARIANCE_BOUNDS: (f64, f64) = (-20.0, 30.0);

/// Signed percentage deltas against the plan assumptions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Home throughput delta, percent
    #[serde(default)]
    pub volume_variance: f64,

    /// Recovery yield delta, percent
    #[serde(default)]
    pub yield_variance: f64,

    /// Lumber market price delta, percent
    #[serde(default)]
    pub price_variance: f64,

    /// Tipping-fee negotiating power delta, percent
    #[serde(default)]
    pub tipping_variance: f64,

    /// Direct cost delta, percent
    #[serde(default)]
    pub cost_variance: f64,
}

impl ScenarioParameters {
    pub fn new(
        volume_variance: f64,
        yield_variance: f64,
        price_variance: f64,
        tipping_variance: f64,
        cost_variance: f64,
    ) -> Self {
        Self {
            volume_variance,
            yield_variance,
            price_variance,
            tipping_variance,
            cost_variance,
        }
    }

    pub fn volume_multiplier(&self) -> f64 {
        1.0 + self.volume_variance / 100.0
    }

    pub fn yield_multiplier(&self) -> f64 {
        1.0 + self.yield_variance / 100.0
    }

    pub fn price_multiplier(&self) -> f64 {
        1.0 + self.price_variance / 100.0
    }

    pub fn tipping_multiplier(&self) -> f64 {
        1.0 + self.tipping_variance / 100.0
    }

    pub fn cost_multiplier(&self) -> f64 {
        1.0 + self.cost_variance / 100.0
    }
}

/// How parameters apply across plan years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScenarioSchedule {
    /// One parameter set for every year
    Uniform(ScenarioParameters),
    /// Independent parameters per year index; missing indices stay at plan
    PerYear(Vec<ScenarioParameters>),
}

impl ScenarioSchedule {
    /// The all-zero schedule: sliders centered, plan reproduced
    pub fn baseline() -> Self {
        ScenarioSchedule::Uniform(ScenarioParameters::default())
    }

    /// Effective parameters for a year index
    pub fn params_for(&self, year: usize) -> ScenarioParameters {
        match self {
            ScenarioSchedule::Uniform(params) => *params,
            ScenarioSchedule::PerYear(per_year) => {
                per_year.get(year).copied().unwrap_or_default()
            }
        }
    }
}

/// Pre-loaded scenario runner for evaluating many slider states against one
/// baseline.
///
/// # Example
/// ```
/// use reclamation_planner::{ScenarioParameters, ScenarioRunner, ScenarioSchedule};
///
/// let runner = ScenarioRunner::new();
/// for price in [-25.0, 0.0, 25.0] {
///     let schedule =
///         ScenarioSchedule::Uniform(ScenarioParameters::new(0.0, 0.0, price, 0.0, 0.0));
///     let result = runner.run(&schedule);
///     assert_eq!(result.rows.len(), 3);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    baseline: BaselineModel,
}

impl ScenarioRunner {
    /// Create a runner over the v5.4 calibration
    pub fn new() -> Self {
        Self {
            baseline: BaselineModel::v54(),
        }
    }

    /// Create a runner with a pre-built baseline
    pub fn with_baseline(baseline: BaselineModel) -> Self {
        Self { baseline }
    }

    /// Create a runner by loading baseline CSVs from a directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self, BaselineError> {
        Ok(Self {
            baseline: BaselineModel::from_csv_path(path)?,
        })
    }

    /// Evaluate a single schedule
    pub fn run(&self, schedule: &ScenarioSchedule) -> ProjectionResult {
        ProjectionEngine::new(self.baseline.clone()).project(schedule)
    }

    /// Evaluate several schedules sequentially
    pub fn run_scenarios(&self, schedules: &[ScenarioSchedule]) -> Vec<ProjectionResult> {
        let engine = ProjectionEngine::new(self.baseline.clone());
        schedules.iter().map(|s| engine.project(s)).collect()
    }

    /// Evaluate a large batch in parallel (stress grids, sensitivity sweeps)
    pub fn run_batch(&self, schedules: &[ScenarioSchedule]) -> Vec<ProjectionResult> {
        let engine = ProjectionEngine::new(self.baseline.clone());
        schedules.par_iter().map(|s| engine.project(s)).collect()
    }

    /// Get reference to the baseline for inspection
    pub fn baseline(&self) -> &BaselineModel {
        &self.baseline
    }

    /// Get mutable reference to the baseline for customization
    pub fn baseline_mut(&mut self) -> &mut BaselineModel {
        &mut self.baseline
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_multiplier_conversion() {
        let params = ScenarioParameters::new(50.0, -25.0, 0.0, 20.0, -100.0);

        assert_relative_eq!(params.volume_multiplier(), 1.5);
        assert_relative_eq!(params.yield_multiplier(), 0.75);
        assert_relative_eq!(params.price_multiplier(), 1.0);
        assert_relative_eq!(params.tipping_multiplier(), 1.2, max_relative = 1e-12);
        assert_relative_eq!(params.cost_multiplier(), 0.0);
    }

    #[test]
    fn test_per_year_fallback_to_plan() {
        let schedule = ScenarioSchedule::PerYear(vec![ScenarioParameters::new(
            10.0, 0.0, 0.0, 0.0, 0.0,
        )]);

        assert_eq!(schedule.params_for(0).volume_variance, 10.0);
        assert_eq!(schedule.params_for(1), ScenarioParameters::default());
        assert_eq!(schedule.params_for(2), ScenarioParameters::default());
    }

    #[test]
    fn test_partial_parameters_deserialize_with_defaults() {
        let params: ScenarioParameters =
            serde_json::from_str(r#"{"price_variance": -15.0}"#).unwrap();

        assert_relative_eq!(params.price_variance, -15.0);
        assert_relative_eq!(params.volume_variance, 0.0);
    }

    #[test]
    fn test_runner_batch() {
        let runner = ScenarioRunner::new();

        let schedules: Vec<_> = [-30.0, 0.0, 30.0]
            .iter()
            .map(|&price| {
                ScenarioSchedule::Uniform(ScenarioParameters::new(0.0, 0.0, price, 0.0, 0.0))
            })
            .collect();

        let results = runner.run_batch(&schedules);
        assert_eq!(results.len(), 3);

        // Higher price should mean higher final-year revenue
        let revenues: Vec<f64> = results
            .iter()
            .map(|r| r.summary().final_year_revenue)
            .collect();
        assert!(revenues[2] > revenues[1] && revenues[1] > revenues[0]);
    }

    #[test]
    fn test_runner_matches_engine() {
        let runner = ScenarioRunner::new();
        let schedule =
            ScenarioSchedule::Uniform(ScenarioParameters::new(12.0, -5.0, 8.0, 2.0, -3.0));

        let direct = ProjectionEngine::new(runner.baseline().clone()).project(&schedule);
        assert_eq!(runner.run(&schedule), direct);
    }
}
