//! Contract analysis report

use super::{display_value, Band, Report};
use crate::models::types::AnalysisResult;
use crate::utils::format::{format_date, title_case};

/// Above 66 is red, above 33 orange, otherwise green
pub fn risk_band(score: f64) -> Band {
    if score > 66.0 {
        Band::Red
    } else if score > 33.0 {
        Band::Orange
    } else {
        Band::Green
    }
}

pub fn render_contract_analysis(result: &AnalysisResult) -> String {
    let mut report = Report::new("🛡️ CONTRACT SECURITY ANALYSIS");

    report
        .field("Contract", &result.contract_address)
        .bar("Risk Score", result.risk_score, risk_band(result.risk_score), "")
        .field("Code Size", format!("{} bytes", result.code_size))
        .field("Vulnerabilities Found", result.vulnerabilities.len())
        .field("Last Updated", format_date(result.timestamp));

    report.section("Detected Vulnerabilities");
    if result.vulnerabilities.is_empty() {
        report.note("No vulnerabilities detected");
    }
    for vuln in &result.vulnerabilities {
        report.item(format!(
            "{} {} [{} / {}]",
            vuln.severity.emoji(),
            vuln.kind.replace('_', " "),
            vuln.severity.as_str(),
            vuln.severity.color()
        ));
        report.note(format!("    {}", vuln.description));
        if let Some(evidence) = vuln.evidence.as_deref().filter(|e| !e.is_empty()) {
            report.note(format!("    Evidence: {}", evidence));
        }
        if let Some(location) = vuln.location.as_deref().filter(|l| !l.is_empty()) {
            report.note(format!("    Location: {}", location));
        }
    }

    report.section("Transaction Summary");
    for (key, value) in &result.transaction_summary {
        report.field(&title_case(key), display_value(value));
    }

    // Holder statistics are optional in the payload
    if !result.holder_stats.is_empty() {
        report.section("Holder Statistics");
        for (key, value) in &result.holder_stats {
            report.field(&title_case(key), display_value(value));
        }
    }

    report.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{Severity, Vulnerability};
    use serde_json::json;

    #[test]
    fn test_risk_bands() {
        assert_eq!(risk_band(90.0), Band::Red);
        assert_eq!(risk_band(66.0), Band::Orange);
        assert_eq!(risk_band(34.0), Band::Orange);
        assert_eq!(risk_band(33.0), Band::Green);
        assert_eq!(risk_band(0.0), Band::Green);
    }

    #[test]
    fn test_render_contract_report() {
        let mut result = AnalysisResult {
            contract_address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".into(),
            code_size: 2048,
            risk_score: 72.0,
            vulnerabilities: vec![Vulnerability {
                kind: "unchecked_call".into(),
                severity: Severity::High,
                description: "Return value of low-level call is ignored".into(),
                evidence: Some("call.value()".into()),
                location: None,
            }],
            ..Default::default()
        };
        result
            .transaction_summary
            .insert("transaction_frequency".into(), json!("high"));

        let text = render_contract_analysis(&result);
        assert!(text.contains("(red)"));
        assert!(text.contains("2048 bytes"));
        assert!(text.contains("unchecked call [HIGH / red]"));
        assert!(text.contains("Evidence: call.value()"));
        assert!(text.contains("Transaction Frequency"));
        assert!(!text.contains("Holder Statistics"));
    }
}
