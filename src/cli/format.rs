use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Table};

/// Build a report table with the shared preset and header row.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    table
}

/// Compact token counts: 1234567 -> "1.23M", 1234 -> "1.23K", 0 -> "-".
pub fn format_tokens(value: u64) -> String {
    if value == 0 {
        "-".to_string()
    } else if value >= 1_000_000 {
        format!("{:.2}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.2}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

/// Clip long cell text to `max` characters with a ".." marker.
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{}..", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_tokens() {
        assert_eq!(format_tokens(0), "-");
        assert_eq!(format_tokens(999), "999");
        assert_eq!(format_tokens(1_000), "1.00K");
        assert_eq!(format_tokens(1_234), "1.23K");
        assert_eq!(format_tokens(2_500_000), "2.50M");
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("exactly-ten", 11), "exactly-ten");
        assert_eq!(clip("a-rather-long-model-name", 10), "a-rather-l..");
    }
}
