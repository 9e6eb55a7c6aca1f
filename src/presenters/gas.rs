//! Gas analysis report

use super::{Band, Report};
use crate::models::types::GasAnalysisResult;
use crate::utils::format::format_number;

/// Efficiency above 80 is green, above 50 orange, otherwise red
pub fn efficiency_band(score: f64) -> Band {
    if score > 80.0 {
        Band::Green
    } else if score > 50.0 {
        Band::Orange
    } else {
        Band::Red
    }
}

pub fn render_gas_analysis(result: &GasAnalysisResult) -> String {
    let efficiency = result.efficiency_score();
    let mut report = Report::new("⛽ GAS USAGE ANALYSIS");

    report
        .section("Gas Usage Overview")
        .field("Average Gas Used", format_number(Some(result.average_gas_used)))
        .bar("Efficiency Score", efficiency, efficiency_band(efficiency), "%");
    if !result.highest_gas_operation.is_empty() {
        report.field("Highest Gas Operation", &result.highest_gas_operation);
    }

    if !result.optimization_suggestions.is_empty() {
        report.section("Optimization Suggestions");
        for suggestion in &result.optimization_suggestions {
            report.item(format!("💡 {}", suggestion));
        }
        report.field(
            "Estimated Savings",
            format!("{} gas", format_number(Some(result.estimated_savings))),
        );
    }

    if !result.historical_gas_trends.is_empty() {
        report.section("Historical Gas Trends");
        for point in &result.historical_gas_trends {
            report.field(&point.date, format_number(Some(point.average_gas)));
        }
    }

    report.finish()
}
