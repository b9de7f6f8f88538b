//! AWS Lambda handler for the scenario planner
//!
//! Accepts variance parameters via JSON, checks the shared access code, runs
//! the projection, and returns rows, summary metrics, the comparison series,
//! and a waterfall for the requested year.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};

use reclamation_planner::report::{comparison_series, waterfall, ComparisonPoint, WaterfallStep};
use reclamation_planner::{
    AccessGate, BaselineModel, CostBasis, PricingBasis, ProjectionRow, ProjectionSummary,
    ScenarioParameters, ScenarioRunner, ScenarioSchedule, SharedSecretGate,
};

/// Env var holding the shared access code
const ACCESS_CODE_VAR: &str = "ACCESS_CODE";

/// Input for one scenario evaluation
#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    /// Caller credential, checked against the configured access code
    #[serde(default)]
    pub access_code: String,

    /// Uniform variances; ignored when `per_year` is present
    #[serde(flatten)]
    pub parameters: ScenarioParameters,

    /// Independent per-year parameter sets (missing years stay at plan)
    #[serde(default)]
    pub per_year: Option<Vec<ScenarioParameters>>,

    /// Use the flat per-home cost table instead of margin-derived costs
    #[serde(default)]
    pub per_home_costs: bool,

    /// Price lumber by product segments instead of blended
    #[serde(default)]
    pub segmented_pricing: bool,

    /// Year index for the waterfall (default: final year)
    #[serde(default)]
    pub waterfall_year: Option<usize>,
}

/// Output from one scenario evaluation
#[derive(Debug, Serialize)]
pub struct ScenarioResponse {
    pub rows: Vec<ProjectionRow>,
    pub summary: ProjectionSummary,
    pub comparison: Vec<ComparisonPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waterfall: Option<Vec<WaterfallStep>>,
    pub execution_time_ms: u64,
}

fn error_response(status: u16, message: &str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(format!(r#"{{"error":"{}"}}"#, message)))
        .unwrap()
}

fn json_response(body: &ScenarioResponse) -> Response<Body> {
    Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body).unwrap()))
        .unwrap()
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .unwrap());
    }

    // Parse request body
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: ScenarioRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    // Explicit per-request access check
    let secret = match std::env::var(ACCESS_CODE_VAR) {
        Ok(s) => s,
        Err(_) => {
            return Ok(error_response(500, "Access code not configured"));
        }
    };
    let gate = SharedSecretGate::new(secret);
    if !gate.authorize(&request.access_code) {
        return Ok(error_response(401, "Access denied"));
    }

    // Assemble baseline per calibration switches
    let mut baseline = BaselineModel::v54();
    if request.per_home_costs {
        baseline.cost_basis = CostBasis::v54_per_home();
    }
    if request.segmented_pricing {
        baseline.pricing = PricingBasis::v54_segmented();
    }

    let schedule = match request.per_year {
        Some(per_year) => ScenarioSchedule::PerYear(per_year),
        None => ScenarioSchedule::Uniform(request.parameters),
    };

    let runner = ScenarioRunner::with_baseline(baseline);
    let result = runner.run(&schedule);
    let summary = result.summary();
    let comparison = comparison_series(&result);

    let waterfall_row = match request.waterfall_year {
        Some(year) => result.rows.get(year),
        None => result.rows.last(),
    };
    let waterfall_steps = waterfall_row.map(waterfall);

    let response = ScenarioResponse {
        rows: result.rows,
        summary,
        comparison,
        waterfall: waterfall_steps,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    Ok(json_response(&response))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
