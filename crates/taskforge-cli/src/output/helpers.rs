//! Common helper functions for output formatting.

use chrono::NaiveDateTime;
use owo_colors::OwoColorize;
use taskforge_ql::DATE_FORMAT;

/// Truncates an ID to 8 characters for display.
pub fn truncate_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats an optional date, empty for `None`.
pub fn format_optional_date(date: Option<&NaiveDateTime>) -> String {
    date.map(format_date).unwrap_or_default()
}

/// Formats a priority in its shortest form: `1`, `6.1`.
pub fn format_priority(priority: f64) -> String {
    format!("{priority}")
}

/// Dims `text` when colors are on.
pub fn dim(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Bolds `text` when colors are on.
pub fn bold(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_truncate_id() {
        assert_eq!(truncate_id("0123456789abcdef"), "01234567");
        assert_eq!(truncate_id("abc"), "abc");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("take out the trash", 10), "take ou...");
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("ééééé", 4), "é...");
    }

    #[test]
    fn test_format_priority() {
        assert_eq!(format_priority(1.0), "1");
        assert_eq!(format_priority(6.1), "6.1");
    }

    #[test]
    fn test_format_optional_date() {
        let date = NaiveDate::from_ymd_opt(2018, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(format_optional_date(Some(&date)), "2018-01-02 03:04:05");
        assert_eq!(format_optional_date(None), "");
    }

    #[test]
    fn test_no_color_is_plain() {
        assert_eq!(dim("ID", false), "ID");
        assert_eq!(bold("ID", false), "ID");
        assert_ne!(dim("ID", true), "ID");
    }
}
