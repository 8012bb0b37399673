use std::cmp::Ordering;

pub fn compare_natural(a: &str, b: &str) -> Ordering {
    natord::compare_ignore_case(a, b).then_with(|| a.cmp(b))
}

/// Canonical form of a CSV header, so `PE_Ratio`, `pe ratio` and ` PE Ratio `
/// all name the same column.
pub fn normalize_header(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| if c == '_' { ' ' } else { c.to_ascii_lowercase() })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_natural() {
        let mut texts = ["Company 10", "company 2", "Company 1", "Alpha"];
        texts.sort_by(|a, b| compare_natural(a, b));

        assert_eq!(texts, ["Alpha", "Company 1", "company 2", "Company 10"]);
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("PE_Ratio"), "pe ratio");
        assert_eq!(normalize_header("  Dividend   Yield "), "dividend yield");
        assert_eq!(normalize_header("Market_Cap"), "market cap");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Consolidated Industries", 12), "Consolidated");
        assert_eq!(truncate_chars("ABC", 12), "ABC");
    }
}
