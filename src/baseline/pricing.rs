//! Lumber pricing basis: blended per-board-foot or Premium/Builder/Industrial segments

use serde::{Deserialize, Serialize};

use super::BaselineError;

/// Tolerance for segment mix fractions summing to 1 per year
const MIX_SUM_TOLERANCE: f64 = 1e-9;

/// One product segment with per-year mix share and unit price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSegment {
    /// Segment name (Premium, Builder, Industrial)
    pub name: String,

    /// Fraction of board feet sold into this segment, per year
    pub mix_fraction: Vec<f64>,

    /// Price per board foot in this segment, per year
    pub unit_price: Vec<f64>,
}

/// How lumber revenue is priced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PricingBasis {
    /// Single blended price per board foot, per year
    Blended {
        price_per_board_foot: Vec<f64>,
    },
    /// Product mix priced per segment; mix fractions sum to 1 per year
    Segmented {
        segments: Vec<PriceSegment>,
    },
}

impl PricingBasis {
    /// The v5.4 blended price track
    pub fn v54_blended() -> Self {
        PricingBasis::Blended {
            price_per_board_foot: vec![2.60, 2.82, 3.04],
        }
    }

    /// The v5.4 product mix. The mix-weighted price matches the blended
    /// track in every year, so the two bases price identically at plan mix.
    pub fn v54_segmented() -> Self {
        PricingBasis::Segmented {
            segments: vec![
                PriceSegment {
                    name: "Premium".to_string(),
                    mix_fraction: vec![0.20, 0.25, 0.30],
                    unit_price: vec![3.80, 3.95, 4.10],
                },
                PriceSegment {
                    name: "Builder".to_string(),
                    mix_fraction: vec![0.50, 0.50, 0.50],
                    unit_price: vec![2.60, 2.75, 2.86],
                },
                PriceSegment {
                    name: "Industrial".to_string(),
                    mix_fraction: vec![0.30, 0.25, 0.20],
                    unit_price: vec![1.80, 1.83, 1.90],
                },
            ],
        }
    }

    /// Lumber revenue for a year's board feet under the price multiplier
    pub fn lumber_revenue(&self, total_board_feet: f64, year: usize, price_multiplier: f64) -> f64 {
        match self {
            PricingBasis::Blended {
                price_per_board_foot,
            } => total_board_feet * price_per_board_foot[year] * price_multiplier,
            PricingBasis::Segmented { segments } => segments
                .iter()
                .map(|s| {
                    total_board_feet * s.mix_fraction[year] * s.unit_price[year] * price_multiplier
                })
                .sum(),
        }
    }

    /// Mix-weighted price per board foot for a year (before any variance)
    pub fn effective_price(&self, year: usize) -> f64 {
        match self {
            PricingBasis::Blended {
                price_per_board_foot,
            } => price_per_board_foot[year],
            PricingBasis::Segmented { segments } => segments
                .iter()
                .map(|s| s.mix_fraction[year] * s.unit_price[year])
                .sum(),
        }
    }

    /// Check per-year vector alignment and that mix fractions sum to 1
    pub fn validate(&self, years: usize) -> Result<(), BaselineError> {
        match self {
            PricingBasis::Blended {
                price_per_board_foot,
            } => {
                if price_per_board_foot.len() != years {
                    return Err(BaselineError::LengthMismatch {
                        field: "price_per_board_foot",
                        expected: years,
                        actual: price_per_board_foot.len(),
                    });
                }
            }
            PricingBasis::Segmented { segments } => {
                for segment in segments {
                    if segment.mix_fraction.len() != years {
                        return Err(BaselineError::LengthMismatch {
                            field: "mix_fraction",
                            expected: years,
                            actual: segment.mix_fraction.len(),
                        });
                    }
                    if segment.unit_price.len() != years {
                        return Err(BaselineError::LengthMismatch {
                            field: "unit_price",
                            expected: years,
                            actual: segment.unit_price.len(),
                        });
                    }
                }
                for year in 0..years {
                    let sum: f64 = segments.iter().map(|s| s.mix_fraction[year]).sum();
                    if (sum - 1.0).abs() > MIX_SUM_TOLERANCE {
                        return Err(BaselineError::MixSum { year, sum });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_blended_revenue() {
        let pricing = PricingBasis::v54_blended();

        // Year 3: 5,159,700 bf at $3.04
        assert_relative_eq!(
            pricing.lumber_revenue(5_159_700.0, 2, 1.0),
            15_685_488.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_segmented_matches_blended_at_plan_mix() {
        let blended = PricingBasis::v54_blended();
        let segmented = PricingBasis::v54_segmented();
        let bf = 3_810_240.0;

        for year in 0..3 {
            assert_relative_eq!(
                segmented.effective_price(year),
                blended.effective_price(year),
                max_relative = 1e-9
            );
            assert_relative_eq!(
                segmented.lumber_revenue(bf, year, 1.15),
                blended.lumber_revenue(bf, year, 1.15),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_segmented_validates() {
        assert!(PricingBasis::v54_segmented().validate(3).is_ok());
    }

    #[test]
    fn test_bad_mix_sum_rejected() {
        let mut pricing = PricingBasis::v54_segmented();
        if let PricingBasis::Segmented { segments } = &mut pricing {
            segments[0].mix_fraction[1] = 0.40;
        }

        assert!(matches!(
            pricing.validate(3),
            Err(BaselineError::MixSum { year: 1, .. })
        ));
    }
}
