//! Display formatting shared by the presenters

use chrono::{DateTime, Utc};

/// Compact number: `1.50B`, `2.25M`, `3.10K`, `12.00`; `N/A` when missing
pub fn format_number(num: Option<f64>) -> String {
    let Some(num) = num else {
        return "N/A".to_string();
    };
    if num >= 1e9 {
        format!("{:.2}B", num / 1e9)
    } else if num >= 1e6 {
        format!("{:.2}M", num / 1e6)
    } else if num >= 1e3 {
        format!("{:.2}K", num / 1e3)
    } else {
        format!("{:.2}", num)
    }
}

/// Unix seconds to `YYYY-MM-DD HH:MM:SS UTC`
pub fn format_date(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// `transaction_frequency` -> `Transaction Frequency`
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fixed-width bar for a 0..=100 value
pub fn progress_bar(value: f64, width: usize) -> String {
    let clamped = value.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

/// Shorten a hash/address to `0x1234…abcd`
pub fn short_hash(hash: &str) -> String {
    if hash.len() <= 14 || !hash.is_ascii() {
        return hash.to_string();
    }
    format!("{}…{}", &hash[..6], &hash[hash.len() - 4..])
}

/// ✅ / ❌ marker
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "✅"
    } else {
        "❌"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_suffixes() {
        assert_eq!(format_number(None), "N/A");
        assert_eq!(format_number(Some(1_500_000_000.0)), "1.50B");
        assert_eq!(format_number(Some(2_250_000.0)), "2.25M");
        assert_eq!(format_number(Some(3_100.0)), "3.10K");
        assert_eq!(format_number(Some(12.0)), "12.00");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_date(1_700_000_000), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("transaction_frequency"), "Transaction Frequency");
        assert_eq!(title_case("volume_24h"), "Volume 24h");
    }

    #[test]
    fn test_progress_bar_clamps() {
        assert_eq!(progress_bar(150.0, 4), "[████]");
        assert_eq!(progress_bar(-3.0, 4), "[░░░░]");
        assert_eq!(progress_bar(50.0, 4), "[██░░]");
    }
}
