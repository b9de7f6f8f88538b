//! Projection engine and output rows for scenario evaluation

mod engine;
mod rows;

pub use engine::ProjectionEngine;
pub use rows::{variance_to_plan, ProjectionResult, ProjectionRow, ProjectionSummary};
