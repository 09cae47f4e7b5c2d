//! Shared formatting utilities for size display and console output

use console::Emoji;

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅ ", "[OK] ");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊 ", "");

/// Info emoji for informational messages
pub const INFO: Emoji = Emoji("ℹ️  ", "i ");

/// Warning emoji for caution/alerts
pub const WARNING: Emoji = Emoji("⚠️  ", "! ");

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;

/// Format bytes as human-readable size string
///
/// Sizes below one kilobyte keep their exact value.
///
/// # Examples
///
/// ```
/// use build_tracker::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512.0), "512 B");
/// assert_eq!(format_bytes(1024.0), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576.0), "1.00 MB");
/// ```
pub fn format_bytes(bytes: f64) -> String {
    let magnitude = bytes.abs();
    if magnitude >= MB {
        format!("{:.2} MB", bytes / MB)
    } else if magnitude >= KB {
        format!("{:.2} KB", bytes / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a size change with an explicit sign
///
/// ```
/// use build_tracker::fmt::format_size_delta;
///
/// assert_eq!(format_size_delta(20.0), "+20 B");
/// assert_eq!(format_size_delta(-2048.0), "-2.00 KB");
/// assert_eq!(format_size_delta(0.0), "0 B");
/// ```
pub fn format_size_delta(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{}", format_bytes(delta))
    } else if delta < 0.0 {
        format!("-{}", format_bytes(-delta))
    } else {
        format_bytes(0.0)
    }
}

/// Format a percentage change with an explicit sign and two decimals
pub fn format_percent(percent: f64) -> String {
    format!("{:+.2}%", percent)
}

/// Truncate string to max length
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
