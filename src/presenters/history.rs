//! Contract history report
//!
//! `render_history` draws a result; `render_session` draws whatever a
//! `HistorySession` currently shows, including the in-progress banner of a
//! deferred analysis and the preview underneath it.

use super::Report;
use crate::core::polling::SessionState;
use crate::models::types::{HistoryResult, TaskHandle};
use crate::utils::format::{format_date, format_number, short_hash};

/// Items listed per section; the totals still count everything
const MAX_ITEMS: usize = 10;

pub fn render_history(result: &HistoryResult) -> String {
    let mut report = Report::new("📜 CONTRACT HISTORY");
    write_history(&mut report, result);
    report.finish()
}

/// Banner shown while a deferred analysis runs
pub fn progress_banner(handle: &TaskHandle, attempts: Option<u32>) -> String {
    let mut banner = format!(
        "⏳ Analysis in progress... (task {})\n   Estimated completion time: {} seconds",
        handle.task_id, handle.estimated_completion_secs
    );
    if let Some(attempts) = attempts {
        banner.push_str(&format!("\n   Status checks so far: {}", attempts));
    }
    banner
}

pub fn render_session(state: &SessionState) -> String {
    match state {
        SessionState::Idle => String::new(),
        SessionState::Submitting => "⏳ Requesting contract history...\n".to_string(),
        SessionState::ImmediateDone(result) | SessionState::Completed(result) => {
            render_history(result)
        }
        SessionState::Pending { preview, handle } => render_deferred(preview.as_ref(), handle, None),
        SessionState::Polling {
            preview,
            handle,
            attempts,
        } => render_deferred(preview.as_ref(), handle, Some(*attempts)),
        SessionState::Failed { error, preview } => with_preview("❌", &error.message, preview.as_ref()),
        SessionState::TimedOut { message, preview } => with_preview("⌛", message, preview.as_ref()),
    }
}

/// Error line, followed by the quick overview if one was received
fn with_preview(icon: &str, message: &str, preview: Option<&HistoryResult>) -> String {
    let mut text = format!("{} {}\n", icon, message);
    if let Some(result) = preview {
        let mut report = Report::new("📜 CONTRACT HISTORY (QUICK OVERVIEW)");
        write_history(&mut report, result);
        text.push_str(&report.finish());
    }
    text
}

fn render_deferred(preview: Option<&HistoryResult>, handle: &TaskHandle, attempts: Option<u32>) -> String {
    let mut report = Report::new("📜 CONTRACT HISTORY (QUICK OVERVIEW)");
    for line in progress_banner(handle, attempts).lines() {
        report.note(line);
    }
    match preview {
        Some(result) => write_history(&mut report, result),
        None => {
            report.note("No preview available yet");
        }
    }
    report.finish()
}

fn write_history(report: &mut Report, result: &HistoryResult) {
    let period = &result.analysis_period;
    report
        .field("Contract", &result.contract_address)
        .section("Analysis Period")
        .field("From Block", period.from_block)
        .field("To Block", period.to_block)
        .field("Block Range", period.block_range);

    report
        .section("Overview")
        .field("Total Transactions", result.transactions.total_count)
        .field("Total Events", result.events.total_count)
        .field("Total Modifications", result.modifications.total_count);

    let txs = &result.transactions;
    report
        .section("Transactions")
        .field("Unique Senders", txs.unique_senders)
        .field("Unique Receivers", txs.unique_receivers)
        .field("Total Volume", format!("{} ETH", format_number(Some(txs.total_volume))))
        .field("Success Ratio", format!("{:.1}%", txs.successful_ratio * 100.0));
    if txs.items.is_empty() {
        report.note("No transactions found");
    }
    for tx in txs.items.iter().take(MAX_ITEMS) {
        report.item(format!(
            "{} #{} {} -> {} | {} ETH | {} | {}",
            short_hash(&tx.transaction_hash),
            tx.block_number,
            short_hash(&tx.from_address),
            short_hash(&tx.to_address),
            tx.value,
            format_date(tx.timestamp),
            if tx.success { "Success" } else { "Failed" }
        ));
    }

    report.section("Events");
    if !result.events.event_types.is_empty() {
        report.field("Event Types", result.events.event_types.join(", "));
    }
    if result.events.items.is_empty() {
        report.note("No events found");
    }
    for event in result.events.items.iter().take(MAX_ITEMS) {
        report.item(format!(
            "{} | {} | {}",
            event.event_type,
            format_date(event.timestamp),
            short_hash(&event.transaction_hash)
        ));
        for (key, value) in &event.details {
            report.note(format!("      {}: {}", key, super::display_value(value)));
        }
    }

    report.section("Contract Modifications");
    if result.modifications.items.is_empty() {
        report.note("No modifications found");
    }
    for change in result.modifications.items.iter().take(MAX_ITEMS) {
        report.item(format!(
            "{} | {} | block {}",
            change.modification_type,
            format_date(change.timestamp),
            change.block_number
        ));
        if let (Some(old), Some(new)) = (&change.old_value, &change.new_value) {
            report.note(format!("      {} -> {}", old, new));
        }
    }
}
