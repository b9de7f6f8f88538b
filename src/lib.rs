//! Reclamation Planner - scenario projection engine for lumber reclamation operations
//!
//! This library provides:
//! - A calibrated 3-year baseline model (home throughput, recovery yield, pricing, costs)
//! - A pure scenario engine mapping variance inputs to per-year projection rows
//! - Uniform and per-year variance schedules with batch evaluation
//! - Presentation feeds (currency formatting, margin waterfall, plan comparison)
//! - An explicit access gate for credential checks

pub mod access;
pub mod baseline;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use access::{AccessGate, SharedSecretGate};
pub use baseline::{BaselineError, BaselineModel, CostBasis, PriceSegment, PricingBasis};
pub use projection::{ProjectionEngine, ProjectionResult, ProjectionRow, ProjectionSummary};
pub use scenario::{ScenarioParameters, ScenarioRunner, ScenarioSchedule};
