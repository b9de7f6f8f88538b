//! Direct cost calibration modes

use serde::{Deserialize, Serialize};

use super::BaselineError;

/// How per-year direct costs are calibrated.
///
/// Two modes circulated in the planning variants; both scale with the volume
/// multiplier (costs are home-driven) and the cost variance multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CostBasis {
    /// Costs backed out of the plan targets: revenue target minus margin
    /// target. Reproduces the plan margins from the plan revenues by
    /// construction.
    MarginDerived,

    /// Flat cost per home processed, per year
    PerHome { cost_per_home: Vec<f64> },
}

impl CostBasis {
    /// The per-home cost table used by the flat-cost planning variants
    pub fn v54_per_home() -> Self {
        CostBasis::PerHome {
            cost_per_home: vec![1700.0, 1750.0, 1850.0],
        }
    }

    /// Check per-year vector alignment
    pub fn validate(&self, years: usize) -> Result<(), BaselineError> {
        match self {
            CostBasis::MarginDerived => Ok(()),
            CostBasis::PerHome { cost_per_home } => {
                if cost_per_home.len() != years {
                    Err(BaselineError::LengthMismatch {
                        field: "cost_per_home",
                        expected: years,
                        actual: cost_per_home.len(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_home_length_checked() {
        let basis = CostBasis::PerHome {
            cost_per_home: vec![1700.0, 1750.0],
        };

        assert!(basis.validate(3).is_err());
        assert!(basis.validate(2).is_ok());
        assert!(CostBasis::MarginDerived.validate(3).is_ok());
    }
}
