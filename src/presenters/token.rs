//! Token analysis report

use super::{Band, Report};
use crate::models::types::TokenAnalysisResult;
use crate::utils::format::{format_date, format_number, yes_no};

/// Token risk uses wider bands: above 70 red, above 30 orange
pub fn token_risk_band(score: f64) -> Band {
    if score > 70.0 {
        Band::Red
    } else if score > 30.0 {
        Band::Orange
    } else {
        Band::Green
    }
}

pub fn render_token_analysis(result: &TokenAnalysisResult) -> String {
    let info = &result.basic_info;
    let supply = &result.supply_mechanics;
    let security = &result.security_analysis;
    let risk = &result.risk_assessment;

    let mut report = Report::new("🪙 TOKEN RISK ANALYSIS");
    report.field("Contract", &result.contract_address);
    if !result.token_type.is_empty() {
        report.field("Token Type", &result.token_type);
    }

    report
        .section("Basic Information")
        .field("Token Name", &info.name)
        .field("Symbol", &info.symbol)
        .field("Total Supply", format_number(info.total_supply))
        .field("Decimals", info.decimals);

    report.section("Supply Mechanics");
    for (label, flag) in supply.flags() {
        report.field(label, yes_no(flag));
    }
    if !supply.suspicious_features.is_empty() {
        report.note("⚠️ Suspicious features:");
        for feature in &supply.suspicious_features {
            report.item(feature);
        }
    }

    report
        .section("Trading Metrics")
        .field("24h Volume", format_number(result.trading_metrics.volume_24h))
        .field("Liquidity", format_number(result.trading_metrics.liquidity))
        .field(
            "Price Impact",
            result
                .trading_metrics
                .price_impact
                .map(|p| format!("{:.2}%", p))
                .unwrap_or_else(|| "N/A".to_string()),
        );

    let holders = &result.holder_analysis;
    report
        .section("Holder Analysis")
        .field(
            "Total Holders",
            holders
                .total_holders
                .map(|n| n.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        )
        .field(
            "Top Holder Share",
            holders
                .top_holder_percentage
                .map(|p| format!("{:.2}%", p))
                .unwrap_or_else(|| "N/A".to_string()),
        )
        .field(
            "Distribution",
            holders.distribution_type.as_deref().unwrap_or("N/A"),
        );

    let ownership = &security.ownership_analysis;
    let indicators = &security.risk_indicators;
    report
        .section("Security Analysis")
        .field("Has Owner", yes_no(ownership.has_owner))
        .field("Can Renounce Ownership", yes_no(ownership.can_renounce_ownership))
        .field("Has Multiple Admins", yes_no(ownership.has_multiple_admins))
        .field("Has Timelock", yes_no(ownership.has_timelock))
        .field("High Risk Functions", yes_no(indicators.high_risk_functions))
        .field("Centralized Control", yes_no(indicators.centralized_control))
        .field("Unsafe Design", yes_no(indicators.unsafe_design))
        .field("Complexity Risk", yes_no(indicators.complexity_risk));
    for vuln in &security.vulnerabilities {
        report.item(format!("🔴 {}", vuln));
    }
    for feature in &security.security_features {
        report.item(format!("🛡️ {}", feature));
    }

    report.section("Risk Assessment").bar(
        "Risk Score",
        risk.risk_score,
        token_risk_band(risk.risk_score),
        "/100",
    );
    report.field("Risk Level", format!("{} Risk", risk.risk_level));

    if !risk.risk_factors.is_empty() {
        report.note("Risk Factors:");
        for factor in &risk.risk_factors {
            report.item(format!("⚠️ {}", factor));
        }
    }
    if !risk.immediate_concerns.is_empty() {
        report.note("Immediate Concerns:");
        for concern in &risk.immediate_concerns {
            report.item(format!("🚨 {}", concern));
        }
    }
    if !risk.recommendations.is_empty() {
        report.section("Recommendations");
        for recommendation in &risk.recommendations {
            report.item(format!("✅ {}", recommendation));
        }
    }

    if result.timestamp > 0 {
        report.note("").field("Analysed At", format_date(result.timestamp));
    }

    report.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_render_placeholders() {
        let text = render_token_analysis(&TokenAnalysisResult::default());
        assert!(text.contains("UNKNOWN Risk"));
        assert!(text.contains("N/A"));
        assert!(!text.contains("Recommendations"));
    }

    #[test]
    fn test_token_report() {
        let mut result = TokenAnalysisResult::default();
        result.basic_info.symbol = "USDT".into();
        result.basic_info.total_supply = Some(39_823_000_000.0);
        result.supply_mechanics.has_blacklist = true;
        result.risk_assessment.risk_score = 45.0;
        result.risk_assessment.risk_level = "MEDIUM".into();
        result.risk_assessment.recommendations = vec!["Monitor owner actions".into()];

        let text = render_token_analysis(&result);
        assert!(text.contains("39.82B"));
        assert!(text.contains("MEDIUM Risk"));
        assert!(text.contains("(orange)"));
        assert!(text.contains("Monitor owner actions"));
        assert_eq!(token_risk_band(71.0), Band::Red);
        assert_eq!(token_risk_band(30.0), Band::Green);
    }
}
