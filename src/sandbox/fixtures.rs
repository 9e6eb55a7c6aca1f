//! Sample payloads served by the mock backend
//!
//! Values are drawn from an RNG seeded by the address, so the same address
//! always gets the same report.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::collections::BTreeMap;

use crate::models::config::{AnalysisDepth, TimeRange};
use crate::models::types::{
    AnalysisPeriod, AnalysisResult, BasicInfo, EventHistory, GasAnalysisResult, GasTrendPoint,
    HistoryEvent, HistoryModification, HistoryResult, HistoryTransaction, ModificationHistory,
    RiskAssessment, Severity, SupplyMechanics, TokenAnalysisResult, TradingMetrics,
    TransactionHistory, Vulnerability,
};
use crate::sandbox::types::HistoryParams;

const LATEST_BLOCK: u64 = 19_000_000;
const BLOCKS_PER_HOUR: u64 = 300;

const VULNERABILITY_KINDS: [(&str, &str); 4] = [
    ("reentrancy", "External call made before state update"),
    ("unchecked_call", "Return value of low-level call is ignored"),
    ("tx_origin_auth", "Authorization relies on tx.origin"),
    ("unbounded_loop", "Loop over user-controlled array may exceed block gas limit"),
];

const EVENT_TYPES: [&str; 3] = ["Transfer", "Approval", "OwnershipTransferred"];

/// RNG seeded from the address bytes
fn rng_for(address: &str) -> StdRng {
    let bytes = hex::decode(address.trim_start_matches("0x")).unwrap_or_default();
    let mut seed = [0u8; 32];
    for (i, b) in bytes.iter().enumerate() {
        seed[i % 32] ^= b;
    }
    StdRng::from_seed(seed)
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn random_address(rng: &mut StdRng) -> String {
    format!("0x{}", hex::encode(rng.gen::<[u8; 20]>()))
}

fn random_hash(rng: &mut StdRng) -> String {
    format!("0x{}", hex::encode(rng.gen::<[u8; 32]>()))
}

pub fn contract_analysis(address: &str) -> AnalysisResult {
    let mut rng = rng_for(address);
    let count = rng.gen_range(0..=VULNERABILITY_KINDS.len());

    let vulnerabilities: Vec<Vulnerability> = VULNERABILITY_KINDS
        .iter()
        .take(count)
        .map(|(kind, description)| Vulnerability {
            kind: kind.to_string(),
            severity: match rng.gen_range(0..3) {
                0 => Severity::High,
                1 => Severity::Medium,
                _ => Severity::Low,
            },
            description: description.to_string(),
            evidence: Some(format!("bytecode offset 0x{:04x}", rng.gen_range(0..0x4000))),
            location: None,
        })
        .collect();

    let risk_score = vulnerabilities
        .iter()
        .map(|v| match v.severity {
            Severity::High => 35.0,
            Severity::Medium => 20.0,
            _ => 8.0,
        })
        .sum::<f64>()
        .min(100.0);

    let transaction_summary = BTreeMap::from([
        ("total_transactions".to_string(), json!(rng.gen_range(100..50_000))),
        ("unique_addresses".to_string(), json!(rng.gen_range(10..5_000))),
        ("transaction_frequency".to_string(), json!("daily")),
    ]);

    AnalysisResult {
        contract_address: address.to_string(),
        code_size: rng.gen_range(512..24_576),
        vulnerabilities,
        risk_score,
        timestamp: now(),
        transaction_summary,
        holder_stats: BTreeMap::from([
            ("total_holders".to_string(), json!(rng.gen_range(50..100_000))),
            ("top_10_share".to_string(), json!(format!("{:.1}%", rng.gen_range(5.0..90.0)))),
        ]),
    }
}

pub fn token_analysis(address: &str) -> TokenAnalysisResult {
    let mut rng = rng_for(address);
    let is_mintable = rng.gen_bool(0.4);
    let has_blacklist = rng.gen_bool(0.3);
    let has_transfer_fee = rng.gen_bool(0.2);

    let mut risk_factors = Vec::new();
    let mut suspicious_features = Vec::new();
    if is_mintable {
        risk_factors.push("Owner can mint new tokens".to_string());
    }
    if has_blacklist {
        risk_factors.push("Transfers can be blocked per address".to_string());
        suspicious_features.push("blacklist".to_string());
    }
    if has_transfer_fee {
        suspicious_features.push("transfer_fee".to_string());
    }

    let risk_score = (risk_factors.len() as f64 * 25.0 + suspicious_features.len() as f64 * 10.0)
        .min(100.0);
    let risk_level = match risk_score {
        s if s > 70.0 => "HIGH",
        s if s > 30.0 => "MEDIUM",
        _ => "LOW",
    };

    let mut result = TokenAnalysisResult {
        contract_address: address.to_string(),
        token_type: "ERC20".to_string(),
        basic_info: BasicInfo {
            total_supply: Some(rng.gen_range(1e6..1e12_f64).round()),
            decimals: 18,
            symbol: format!("TKN{}", rng.gen_range(1..100)),
            name: "Sample Token".to_string(),
        },
        supply_mechanics: SupplyMechanics {
            is_mintable,
            is_burnable: rng.gen_bool(0.5),
            has_transfer_fee,
            has_blacklist,
            suspicious_features,
            ..Default::default()
        },
        trading_metrics: TradingMetrics {
            volume_24h: Some(rng.gen_range(1e3..1e8)),
            liquidity: Some(rng.gen_range(1e4..1e9)),
            price_impact: Some(rng.gen_range(0.01..5.0)),
        },
        risk_assessment: RiskAssessment {
            risk_score,
            risk_level: risk_level.to_string(),
            risk_factors,
            recommendations: vec!["Verify ownership controls before trading".to_string()],
            immediate_concerns: Vec::new(),
        },
        timestamp: now(),
        ..Default::default()
    };
    result.holder_analysis.total_holders = Some(rng.gen_range(50..100_000));
    result.holder_analysis.top_holder_percentage = Some(rng.gen_range(1.0..60.0));
    result.security_analysis.ownership_analysis.has_owner = true;
    result.security_analysis.risk_indicators.centralized_control = is_mintable || has_blacklist;
    result
}

pub fn gas_analysis(address: &str) -> GasAnalysisResult {
    let mut rng = rng_for(address);
    let average_gas_used = rng.gen_range(21_000.0..6_000_000.0_f64).round();
    let today = chrono::Utc::now().date_naive();

    let historical_gas_trends = (0..7)
        .rev()
        .map(|days_ago| GasTrendPoint {
            date: (today - chrono::Duration::days(days_ago))
                .format("%Y-%m-%d")
                .to_string(),
            average_gas: (average_gas_used * rng.gen_range(0.8..1.2)).round(),
        })
        .collect();

    GasAnalysisResult {
        average_gas_used,
        highest_gas_operation: ["transfer", "swap", "mint", "approve"][rng.gen_range(0..4)]
            .to_string(),
        optimization_suggestions: vec![
            "Pack storage variables into fewer slots".to_string(),
            "Cache storage reads in memory inside loops".to_string(),
        ],
        estimated_savings: (average_gas_used * 0.12).round(),
        historical_gas_trends,
    }
}

fn period(range: TimeRange) -> AnalysisPeriod {
    let hours = match range {
        TimeRange::OneHour => 1,
        TimeRange::OneDay => 24,
        TimeRange::SevenDays => 24 * 7,
        TimeRange::ThirtyDays => 24 * 30,
    };
    let block_range = hours * BLOCKS_PER_HOUR;
    AnalysisPeriod {
        from_block: LATEST_BLOCK - block_range,
        to_block: LATEST_BLOCK,
        block_range,
    }
}

/// Counts only, no items: what a deferred request shows while it runs
pub fn quick_overview(address: &str, params: &HistoryParams) -> HistoryResult {
    let full = history(address, params);
    HistoryResult {
        contract_address: full.contract_address,
        analysis_period: full.analysis_period,
        transactions: TransactionHistory {
            items: Vec::new(),
            ..full.transactions
        },
        events: EventHistory {
            items: Vec::new(),
            ..full.events
        },
        modifications: ModificationHistory {
            items: Vec::new(),
            ..full.modifications
        },
    }
}

pub fn history(address: &str, params: &HistoryParams) -> HistoryResult {
    let mut rng = rng_for(address);
    let period = period(params.time_range);
    let tx_count = match params.analysis_depth {
        AnalysisDepth::Quick => 3,
        AnalysisDepth::Standard => 8,
        AnalysisDepth::Deep => 15,
    };
    let started = now() - (period.block_range as i64) * 12;

    let items: Vec<HistoryTransaction> = (0..tx_count)
        .map(|i| HistoryTransaction {
            timestamp: started + i as i64 * 600,
            transaction_hash: random_hash(&mut rng),
            from_address: random_address(&mut rng),
            to_address: address.to_string(),
            value: (rng.gen_range(0.0..25.0_f64) * 1000.0).round() / 1000.0,
            block_number: period.from_block + rng.gen_range(0..period.block_range.max(1)),
            gas_used: rng.gen_range(21_000..400_000),
            success: rng.gen_bool(0.9),
        })
        .collect();

    let successes = items.iter().filter(|tx| tx.success).count();
    let transactions = TransactionHistory {
        total_count: items.len() as u64,
        unique_senders: items.len() as u64,
        unique_receivers: 1,
        total_volume: items.iter().map(|tx| tx.value).sum(),
        successful_ratio: if items.is_empty() {
            0.0
        } else {
            successes as f64 / items.len() as f64
        },
        items,
    };

    let event_items: Vec<HistoryEvent> = transactions
        .items
        .iter()
        .filter(|tx| tx.success)
        .map(|tx| HistoryEvent {
            event_type: EVENT_TYPES[rng.gen_range(0..EVENT_TYPES.len())].to_string(),
            timestamp: tx.timestamp,
            transaction_hash: tx.transaction_hash.clone(),
            block_number: tx.block_number,
            details: BTreeMap::from([
                ("from".to_string(), json!(tx.from_address)),
                ("value".to_string(), json!(tx.value)),
            ]),
        })
        .collect();
    let mut event_types: Vec<String> = event_items.iter().map(|e| e.event_type.clone()).collect();
    event_types.sort();
    event_types.dedup();

    let modification_items = if params.include_governance {
        vec![HistoryModification {
            timestamp: started,
            transaction_hash: random_hash(&mut rng),
            block_number: period.from_block,
            modification_type: "ownership_transfer".to_string(),
            old_value: Some(random_address(&mut rng)),
            new_value: Some(random_address(&mut rng)),
        }]
    } else {
        Vec::new()
    };

    HistoryResult {
        contract_address: address.to_string(),
        analysis_period: period,
        transactions,
        events: EventHistory {
            total_count: event_items.len() as u64,
            event_types,
            items: event_items,
        },
        modifications: ModificationHistory {
            total_count: modification_items.len() as u64,
            modification_types: modification_items
                .iter()
                .map(|m| m.modification_type.clone())
                .collect(),
            items: modification_items,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    #[test]
    fn test_same_address_same_report() {
        let a = contract_analysis(ADDR);
        let b = contract_analysis(&ADDR.to_lowercase());
        assert_eq!(a.vulnerabilities, b.vulnerabilities);
        assert_eq!(a.code_size, b.code_size);
        assert!(a.risk_score <= 100.0);
    }

    #[test]
    fn test_history_depth_and_overview() {
        let params = HistoryParams {
            analysis_depth: AnalysisDepth::Deep,
            ..Default::default()
        };
        let full = history(ADDR, &params);
        assert_eq!(full.transactions.items.len(), 15);
        assert_eq!(full.analysis_period.block_range, 24 * BLOCKS_PER_HOUR);
        assert_eq!(full.modifications.total_count, 1);

        let overview = quick_overview(ADDR, &params);
        assert!(overview.transactions.items.is_empty());
        assert_eq!(overview.transactions.total_count, 15);
    }

    #[test]
    fn test_gas_trends_cover_a_week() {
        let gas = gas_analysis(ADDR);
        assert_eq!(gas.historical_gas_trends.len(), 7);
        assert!(gas.average_gas_used >= 21_000.0);
    }
}
