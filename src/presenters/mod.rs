//! Presenters Module - Text reports
//!
//! Pure `render_*` functions turning backend payloads into boxed reports for
//! the terminal. No I/O happens here.

pub mod contract;
pub mod gas;
pub mod history;
pub mod token;

pub use contract::render_contract_analysis;
pub use gas::render_gas_analysis;
pub use history::{render_history, render_session};
pub use token::render_token_analysis;

const BOX_WIDTH: usize = 66;
const BAR_WIDTH: usize = 30;

/// Score band shared by the risk and efficiency bars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Green,
    Orange,
    Red,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Green => "green",
            Band::Orange => "orange",
            Band::Red => "red",
        }
    }

    fn emoji(&self) -> &'static str {
        match self {
            Band::Green => "🟢",
            Band::Orange => "🟠",
            Band::Red => "🔴",
        }
    }
}

/// Line-oriented builder for the boxed report layout
pub(crate) struct Report {
    out: String,
}

impl Report {
    pub(crate) fn new(title: &str) -> Self {
        let rule = "═".repeat(BOX_WIDTH);
        Self {
            out: format!("╔{rule}╗\n║   {title}\n╠{rule}╣\n"),
        }
    }

    pub(crate) fn section(&mut self, title: &str) -> &mut Self {
        self.out.push_str(&format!("║\n║   ▸ {}\n", title));
        self
    }

    pub(crate) fn field(&mut self, label: &str, value: impl std::fmt::Display) -> &mut Self {
        self.out.push_str(&format!("║     {:<26} {}\n", label, value));
        self
    }

    pub(crate) fn item(&mut self, text: impl std::fmt::Display) -> &mut Self {
        self.out.push_str(&format!("║       • {}\n", text));
        self
    }

    pub(crate) fn note(&mut self, text: impl std::fmt::Display) -> &mut Self {
        self.out.push_str(&format!("║     {}\n", text));
        self
    }

    /// Score bar with its band colour
    pub(crate) fn bar(&mut self, label: &str, value: f64, band: Band, suffix: &str) -> &mut Self {
        let bar = crate::utils::format::progress_bar(value, BAR_WIDTH);
        self.out.push_str(&format!(
            "║     {:<26} {} {} {:.1}{} ({})\n",
            label,
            bar,
            band.emoji(),
            value,
            suffix,
            band.as_str()
        ));
        self
    }

    pub(crate) fn finish(mut self) -> String {
        self.out
            .push_str(&format!("║\n╚{}╝\n", "═".repeat(BOX_WIDTH)));
        self.out
    }
}

/// Render a scalar JSON value without quotes around strings
pub(crate) fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_layout() {
        let mut report = Report::new("TITLE");
        report.section("Overview").field("Count", 3).item("one");
        let text = report.finish();

        assert!(text.starts_with("╔"));
        assert!(text.trim_end().ends_with("╝"));
        assert!(text.contains("▸ Overview"));
        assert!(text.contains("• one"));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("daily")), "daily");
        assert_eq!(display_value(&json!(12)), "12");
        assert_eq!(display_value(&json!(null)), "N/A");
    }
}
