//! Reclamation Planner CLI
//!
//! Runs one scenario against the calibrated plan and prints the KPI ribbon,
//! the per-year table, and the final-year unit-economics waterfall.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use reclamation_planner::report::{comparison_series, format_currency, waterfall};
use reclamation_planner::{
    BaselineModel, CostBasis, PricingBasis, ProjectionResult, ScenarioParameters, ScenarioRunner,
    ScenarioSchedule,
};

#[derive(Debug, Parser)]
#[command(
    name = "reclamation_planner",
    about = "Scenario projection for the reclamation business plan"
)]
struct Cli {
    /// Volume variance in percent (homes processed)
    #[arg(long = "volume", default_value_t = 0.0)]
    volume_variance: f64,

    /// Recovery yield variance in percent
    #[arg(long = "yield", default_value_t = 0.0)]
    yield_variance: f64,

    /// Lumber price variance in percent
    #[arg(long = "price", default_value_t = 0.0)]
    price_variance: f64,

    /// Tipping-fee negotiating power variance in percent
    #[arg(long = "tipping", default_value_t = 0.0)]
    tipping_variance: f64,

    /// Direct cost variance in percent
    #[arg(long = "cost", default_value_t = 0.0)]
    cost_variance: f64,

    /// Use the flat per-home cost table instead of margin-derived costs
    #[arg(long)]
    per_home_costs: bool,

    /// Price lumber by Premium/Builder/Industrial segments instead of blended
    #[arg(long)]
    segmented: bool,

    /// Load baseline constants from a CSV directory instead of the built-in v5.4 plan
    #[arg(long)]
    baseline_dir: Option<PathBuf>,

    /// Write full projection rows to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut baseline = match &cli.baseline_dir {
        Some(dir) => BaselineModel::from_csv_path(dir)
            .with_context(|| format!("loading baseline from {}", dir.display()))?,
        None => BaselineModel::v54(),
    };
    if cli.per_home_costs {
        baseline.cost_basis = CostBasis::v54_per_home();
    }
    if cli.segmented {
        baseline.pricing = PricingBasis::v54_segmented();
    }
    baseline.validate().context("baseline failed validation")?;

    let params = ScenarioParameters::new(
        cli.volume_variance,
        cli.yield_variance,
        cli.price_variance,
        cli.tipping_variance,
        cli.cost_variance,
    );
    let schedule = ScenarioSchedule::Uniform(params);

    let runner = ScenarioRunner::with_baseline(baseline);
    let result = runner.run(&schedule);
    let summary = result.summary();

    println!("Reclamation Planner v0.1.0");
    println!("==========================\n");
    println!(
        "Scenario: {:+.0}% volume | {:+.0}% yield | {:+.0}% price | {:+.0}% tipping | {:+.0}% cost\n",
        params.volume_variance,
        params.yield_variance,
        params.price_variance,
        params.tipping_variance,
        params.cost_variance,
    );

    // KPI ribbon, final year is the exit year
    let variance = summary
        .final_year_variance_to_plan
        .map(|v| format!("{:+.1}% vs plan", v))
        .unwrap_or_else(|| "n/a vs plan".to_string());
    let efficiency = summary
        .final_year_margin_percent
        .map(|m| format!("{:.1}%", m))
        .unwrap_or_else(|| "n/a".to_string());

    println!(
        "Final Year Revenue:   {:>14}  ({})",
        format_currency(summary.final_year_revenue),
        variance
    );
    println!(
        "Final Year Margin:    {:>14}",
        format_currency(summary.final_year_margin)
    );
    println!("Operating Efficiency: {:>14}", efficiency);
    println!(
        "Cumulative Revenue:   {:>14}",
        format_currency(summary.cumulative_revenue)
    );
    println!(
        "Cumulative Margin:    {:>14}\n",
        format_currency(summary.cumulative_margin)
    );

    // Per-year table
    println!(
        "{:<8} {:>9} {:>15} {:>14} {:>15} {:>14} {:>15} {:>15}",
        "Year", "Homes", "Lumber", "Other", "Revenue", "Costs", "Margin", "Plan"
    );
    println!("{}", "-".repeat(116));
    for row in &result.rows {
        println!(
            "{:<8} {:>9.0} {:>15} {:>14} {:>15} {:>14} {:>15} {:>15}",
            row.year,
            row.adjusted_homes,
            format_currency(row.lumber_revenue),
            format_currency(row.other_revenue),
            format_currency(row.total_revenue),
            format_currency(row.direct_costs),
            format_currency(row.gross_margin),
            format_currency(row.baseline_revenue),
        );
    }

    // Final-year waterfall
    if let Some(last) = result.rows.last() {
        println!("\n{} Unit Economics Walk:", last.year);
        for step in waterfall(last) {
            println!("  {:<15} {:>15}", step.label, format_currency(step.amount));
        }
    }

    // Plan-vs-scenario pairs, the comparison chart feed
    println!("\nRevenue vs Plan:");
    for point in comparison_series(&result) {
        println!(
            "  {:<8} plan {:>15}  scenario {:>15}",
            point.year,
            format_currency(point.baseline_revenue),
            format_currency(point.scenario_revenue),
        );
    }

    if let Some(path) = &cli.csv {
        write_csv(path, &result)
            .with_context(|| format!("writing projection CSV to {}", path.display()))?;
        println!("\nFull results written to: {}", path.display());
    }

    Ok(())
}

/// Write all projection rows to CSV with unformatted values
fn write_csv(path: &PathBuf, result: &ProjectionResult) -> anyhow::Result<()> {
    let mut file = File::create(path)?;

    writeln!(
        file,
        "Year,AdjustedHomes,AdjustedRecovery,TotalBoardFeet,LumberRevenue,OtherRevenue,TotalRevenue,DirectCosts,GrossMargin,MarginPercent,RevenuePerHome,BaselineRevenue,NonOperatingInflow,TotalCashInflow"
    )?;
    for row in &result.rows {
        writeln!(
            file,
            "{},{:.2},{:.4},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{},{},{:.2},{:.2},{:.2}",
            row.year,
            row.adjusted_homes,
            row.adjusted_recovery,
            row.total_board_feet,
            row.lumber_revenue,
            row.other_revenue,
            row.total_revenue,
            row.direct_costs,
            row.gross_margin,
            row.margin_percent
                .map(|m| format!("{:.2}", m))
                .unwrap_or_default(),
            row.revenue_per_home
                .map(|r| format!("{:.2}", r))
                .unwrap_or_default(),
            row.baseline_revenue,
            row.non_operating_inflow,
            row.total_cash_inflow,
        )?;
    }
    Ok(())
}
