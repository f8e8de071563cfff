use chrono::NaiveDate;

/// Chart x-axis labels use the dashboard's date display format.
pub fn to_display_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

const LEGAL_TYPES: [&str; 4] = ["株式会社", "(株)", "（株）", "合同会社"];

/// Strip corporate legal-type prefixes/suffixes from a company name so that
/// "株式会社ほげ" and "ほげ" match the same search query.
pub fn remove_legal_type(name: &str) -> String {
    let mut result = name.trim();
    for legal in LEGAL_TYPES {
        if let Some(stripped) = result.strip_prefix(legal) {
            result = stripped.trim();
        }
        if let Some(stripped) = result.strip_suffix(legal) {
            result = stripped.trim();
        }
    }
    result.to_string()
}

/// Securities codes: four digits, optionally followed by one more digit or
/// an uppercase letter (the post-2024 alphanumeric codes).
pub fn is_valid_issue_code(code: &str) -> bool {
    use std::sync::OnceLock;
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();

    let pattern = PATTERN.get_or_init(|| {
        regex::Regex::new(r"^[0-9]{4}[0-9A-Z]?$").expect("issue code pattern is valid")
    });
    pattern.is_match(code)
}

/// Split a comma-joined query parameter into trimmed, non-empty values.
pub fn split_codes(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_display_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(to_display_date(date), "2024/01/02");
    }

    #[test]
    fn test_remove_legal_type_prefix() {
        assert_eq!(remove_legal_type("株式会社テスト"), "テスト");
    }

    #[test]
    fn test_remove_legal_type_suffix() {
        assert_eq!(remove_legal_type("テスト株式会社"), "テスト");
    }

    #[test]
    fn test_remove_legal_type_untouched() {
        assert_eq!(remove_legal_type("テスト"), "テスト");
    }

    #[test]
    fn test_is_valid_issue_code() {
        assert!(is_valid_issue_code("7203"));
        assert!(is_valid_issue_code("285A"));
        assert!(!is_valid_issue_code("72"));
        assert!(!is_valid_issue_code("7203X9"));
        assert!(!is_valid_issue_code("72o3"));
    }

    #[test]
    fn test_split_codes() {
        assert_eq!(split_codes(Some("7203, 6758,,9984 ")), vec!["7203", "6758", "9984"]);
        assert!(split_codes(None).is_empty());
        assert!(split_codes(Some("")).is_empty());
    }
}
