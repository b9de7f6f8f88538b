//! CSV-based baseline loader
//!
//! Loads plan constants from CSV files in data/baseline/:
//! - plan_years.csv: year,homes,recovery,price,revenue_target,margin_target,non_operating_inflow
//! - fees.csv: name,value (board_feet_per_home, tipping_fee_per_home, materials_fee_per_home)
//! - price_segments.csv (optional): segment,year,mix_fraction,unit_price
//! - cost_per_home.csv (optional): year,cost - presence selects the flat-cost mode

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use log::{debug, info};

use super::{BaselineError, PriceSegment};

/// Default path to the baseline directory
pub const DEFAULT_BASELINE_PATH: &str = "data/baseline";

/// One row of plan_years.csv
#[derive(Debug, Clone)]
pub struct PlanYearRecord {
    pub year: String,
    pub homes: f64,
    pub recovery: f64,
    pub price: f64,
    pub revenue_target: f64,
    pub margin_target: f64,
    pub non_operating_inflow: f64,
}

/// Raw baseline data loaded from CSV, before model assembly
#[derive(Debug, Clone)]
pub struct LoadedBaseline {
    pub plan_years: Vec<PlanYearRecord>,
    pub fees: HashMap<String, f64>,
    pub segments: Option<Vec<PriceSegment>>,
    pub cost_per_home: Option<Vec<f64>>,
}

impl LoadedBaseline {
    /// Load all baseline files from a directory
    pub fn load_from(path: &Path) -> Result<Self, BaselineError> {
        let plan_years = load_plan_years(path)?;
        let fees = load_fees(path)?;
        let segments = load_price_segments(path, plan_years.len())?;
        let cost_per_home = load_cost_per_home(path, plan_years.len())?;

        info!(
            "loaded baseline from {}: {} plan years, segments={}, per-home costs={}",
            path.display(),
            plan_years.len(),
            segments.is_some(),
            cost_per_home.is_some()
        );

        Ok(Self {
            plan_years,
            fees,
            segments,
            cost_per_home,
        })
    }

    /// Look up a fee constant by name
    pub fn fee(&self, name: &'static str) -> Result<f64, BaselineError> {
        self.fees
            .get(name)
            .copied()
            .ok_or(BaselineError::MissingFee(name))
    }
}

/// Load the per-year plan table
fn load_plan_years(path: &Path) -> Result<Vec<PlanYearRecord>, BaselineError> {
    let file = File::open(path.join("plan_years.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut years = Vec::new();
    for result in reader.records() {
        let record = result?;
        years.push(PlanYearRecord {
            year: record[0].to_string(),
            homes: record[1].parse()?,
            recovery: record[2].parse()?,
            price: record[3].parse()?,
            revenue_target: record[4].parse()?,
            margin_target: record[5].parse()?,
            non_operating_inflow: record[6].parse()?,
        });
    }

    if years.is_empty() {
        return Err(BaselineError::EmptyPlan);
    }
    Ok(years)
}

/// Load named fee constants
fn load_fees(path: &Path) -> Result<HashMap<String, f64>, BaselineError> {
    let file = File::open(path.join("fees.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut fees = HashMap::new();
    for result in reader.records() {
        let record = result?;
        fees.insert(record[0].to_string(), record[1].parse()?);
    }
    Ok(fees)
}

/// Load product segments if price_segments.csv exists.
/// Rows reference plan years by 1-based index.
fn load_price_segments(
    path: &Path,
    years: usize,
) -> Result<Option<Vec<PriceSegment>>, BaselineError> {
    let file_path = path.join("price_segments.csv");
    if !file_path.exists() {
        debug!("no price_segments.csv, using blended pricing");
        return Ok(None);
    }

    let file = File::open(file_path)?;
    let mut reader = csv::Reader::from_reader(file);

    // Keyed by name, preserving first-seen order
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, PriceSegment> = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let name = record[0].to_string();
        let year: usize = record[1].parse()?;
        let mix: f64 = record[2].parse()?;
        let price: f64 = record[3].parse()?;

        if year < 1 || year > years {
            return Err(BaselineError::SegmentYear {
                segment: name,
                year,
            });
        }

        let segment = by_name.entry(name.clone()).or_insert_with(|| {
            order.push(name.clone());
            PriceSegment {
                name,
                mix_fraction: vec![0.0; years],
                unit_price: vec![0.0; years],
            }
        });
        segment.mix_fraction[year - 1] = mix;
        segment.unit_price[year - 1] = price;
    }

    let segments = order
        .into_iter()
        .filter_map(|name| by_name.remove(&name))
        .collect();
    Ok(Some(segments))
}

/// Load the flat per-home cost table if cost_per_home.csv exists
fn load_cost_per_home(path: &Path, years: usize) -> Result<Option<Vec<f64>>, BaselineError> {
    let file_path = path.join("cost_per_home.csv");
    if !file_path.exists() {
        debug!("no cost_per_home.csv, using margin-derived costs");
        return Ok(None);
    }

    let file = File::open(file_path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut costs = vec![0.0; years];
    for result in reader.records() {
        let record = result?;
        let year: usize = record[0].parse()?;
        if year < 1 || year > years {
            return Err(BaselineError::SegmentYear {
                segment: "cost_per_home".to_string(),
                year,
            });
        }
        costs[year - 1] = record[1].parse()?;
    }
    Ok(Some(costs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::{BaselineModel, CostBasis, PricingBasis};
    use approx::assert_relative_eq;
    use std::fs;

    fn write_plan_files(dir: &Path) {
        fs::write(
            dir.join("plan_years.csv"),
            "year,homes,recovery,price,revenue_target,margin_target,non_operating_inflow\n\
             Year 1,457,0.50,2.60,4753166,3978038,0\n\
             Year 2,960,0.60,2.82,12469066,10826653,0\n\
             Year 3,1200,0.65,3.04,17820600,14805261,0\n",
        )
        .unwrap();
        fs::write(
            dir.join("fees.csv"),
            "name,value\n\
             board_feet_per_home,6615\n\
             tipping_fee_per_home,1200\n\
             materials_fee_per_home,600\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_matches_v54() {
        let dir = tempfile::tempdir().unwrap();
        write_plan_files(dir.path());

        let model = BaselineModel::from_csv_path(dir.path()).unwrap();
        let v54 = BaselineModel::v54();

        assert_eq!(model.years, v54.years);
        assert_eq!(model.base_homes, v54.base_homes);
        assert_eq!(model.base_recovery, v54.base_recovery);
        assert_relative_eq!(model.board_feet_per_home, 6615.0);
        assert!(matches!(model.cost_basis, CostBasis::MarginDerived));
        for year in 0..3 {
            assert_relative_eq!(
                model.pricing.effective_price(year),
                v54.pricing.effective_price(year)
            );
        }
    }

    #[test]
    fn test_load_segments_and_costs() {
        let dir = tempfile::tempdir().unwrap();
        write_plan_files(dir.path());
        fs::write(
            dir.path().join("price_segments.csv"),
            "segment,year,mix_fraction,unit_price\n\
             Premium,1,0.20,3.80\nPremium,2,0.25,3.95\nPremium,3,0.30,4.10\n\
             Builder,1,0.50,2.60\nBuilder,2,0.50,2.75\nBuilder,3,0.50,2.86\n\
             Industrial,1,0.30,1.80\nIndustrial,2,0.25,1.83\nIndustrial,3,0.20,1.90\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("cost_per_home.csv"),
            "year,cost\n1,1700\n2,1750\n3,1850\n",
        )
        .unwrap();

        let model = BaselineModel::from_csv_path(dir.path()).unwrap();

        match &model.pricing {
            PricingBasis::Segmented { segments } => {
                assert_eq!(segments.len(), 3);
                assert_eq!(segments[0].name, "Premium");
                assert_relative_eq!(model.pricing.effective_price(2), 3.04, max_relative = 1e-9);
            }
            other => panic!("expected segmented pricing, got {:?}", other),
        }
        assert_relative_eq!(model.direct_cost_basis(0), 457.0 * 1700.0);
    }

    #[test]
    fn test_missing_fee_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_plan_files(dir.path());
        fs::write(dir.path().join("fees.csv"), "name,value\nboard_feet_per_home,6615\n").unwrap();

        assert!(matches!(
            BaselineModel::from_csv_path(dir.path()),
            Err(BaselineError::MissingFee("tipping_fee_per_home"))
        ));
    }

    #[test]
    fn test_segment_year_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        write_plan_files(dir.path());
        fs::write(
            dir.path().join("price_segments.csv"),
            "segment,year,mix_fraction,unit_price\nPremium,4,1.0,3.80\n",
        )
        .unwrap();

        assert!(matches!(
            BaselineModel::from_csv_path(dir.path()),
            Err(BaselineError::SegmentYear { year: 4, .. })
        ));
    }
}
