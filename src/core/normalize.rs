use crate::domain::model::{CleanRecord, RawRecord};
use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Country calling code prepended during phone canonicalization.
pub const COUNTRY_CODE: &str = "+254";
/// Leading digit of local-format mobile numbers.
pub const TRUNK_PREFIX: char = '7';
/// Canonical label of the column holding phone data.
pub const PHONE_FIELD: &str = "PHONE";

/// Column-key canonicalization rule. Two conventions exist across source files;
/// one is selected per run. Both are idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRule {
    /// Interior spaces become underscores, existing underscores are kept.
    Underscored,
    /// Spaces and underscores are removed entirely.
    Compact,
}

impl ColumnRule {
    pub fn apply(&self, label: &str) -> String {
        let flattened = label.replace('\n', " ");
        let trimmed = flattened.trim();
        let rekeyed = match self {
            ColumnRule::Underscored => trimmed.replace(' ', "_"),
            ColumnRule::Compact => trimmed.chars().filter(|c| *c != ' ' && *c != '_').collect(),
        };
        rekeyed.to_uppercase()
    }
}

/// Rewrites a raw phone value into `+254…` E.164 form.
///
/// Non-digits are stripped first. A digit string starting with the trunk
/// prefix or at least 9 digits long keeps only its last 9 digits; anything
/// shorter is prefixed as-is.
pub fn canonicalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.starts_with(TRUNK_PREFIX) || digits.len() >= 9 {
        let tail_start = digits.len().saturating_sub(9);
        format!("{}{}", COUNTRY_CODE, &digits[tail_start..])
    } else {
        format!("{}{}", COUNTRY_CODE, digits)
    }
}

/// Placeholder phone for rows with no usable phone value, so payload shaping
/// never fails on a missing field. Always matches `^\+2547\d{8}$`.
pub fn synthesize_phone() -> String {
    let suffix: u32 = rand::rng().random_range(10_000_000..=99_999_999);
    format!("{}{}{}", COUNTRY_CODE, TRUNK_PREFIX, suffix)
}

pub struct FieldNormalizer {
    rule: ColumnRule,
}

impl FieldNormalizer {
    pub fn new(rule: ColumnRule) -> Self {
        Self { rule }
    }

    /// Produces a CleanRecord: canonical keys, string values, phone rewritten
    /// or synthesized.
    pub fn normalize(&self, record: &RawRecord) -> CleanRecord {
        let mut data = HashMap::new();
        for (label, value) in &record.data {
            data.insert(self.rule.apply(label), coerce_scalar(value));
        }

        // 電話欄位缺失或空白時補上合成值
        let phone_key = self.rule.apply(PHONE_FIELD);
        let phone = match data.get(&phone_key) {
            Some(raw) if !raw.trim().is_empty() => canonicalize_phone(raw),
            _ => synthesize_phone(),
        };
        data.insert(phone_key, phone);

        CleanRecord { data }
    }
}

fn coerce_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string().trim_matches('"').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(entries: &[(&str, serde_json::Value)]) -> RawRecord {
        RawRecord {
            data: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_phone_long_number_keeps_last_nine_digits() {
        assert_eq!(canonicalize_phone("0712345678"), "+254712345678");
        assert_eq!(canonicalize_phone("254712345678"), "+254712345678");
        assert_eq!(canonicalize_phone("+254 712 345 678"), "+254712345678");
    }

    #[test]
    fn test_phone_trunk_prefix_short_number_is_not_truncated() {
        // Starts with 7 but shorter than 9 digits: last-9 is the whole string
        assert_eq!(canonicalize_phone("71234"), "+25471234");
    }

    #[test]
    fn test_phone_short_number_without_trunk_prefix_prefixed_as_is() {
        assert_eq!(canonicalize_phone("12345"), "+25412345");
    }

    #[test]
    fn test_phone_strips_separators() {
        assert_eq!(canonicalize_phone("(071) 234-5678"), "+254712345678");
    }

    #[test]
    fn test_synthesized_phone_matches_pattern() {
        let pattern = regex::Regex::new(r"^\+2547\d{8}$").unwrap();
        for _ in 0..50 {
            let phone = synthesize_phone();
            assert!(pattern.is_match(&phone), "unexpected phone {}", phone);
        }
    }

    #[test]
    fn test_underscored_rule() {
        assert_eq!(ColumnRule::Underscored.apply("  sales\ncode "), "SALES_CODE");
        assert_eq!(ColumnRule::Underscored.apply("SALES  CODE"), "SALES__CODE");
        assert_eq!(ColumnRule::Underscored.apply("SALES_CODE"), "SALES_CODE");
    }

    #[test]
    fn test_compact_rule() {
        assert_eq!(ColumnRule::Compact.apply(" sales _code\n"), "SALESCODE");
    }

    #[test]
    fn test_column_rules_are_idempotent() {
        for rule in [ColumnRule::Underscored, ColumnRule::Compact] {
            for label in ["Sales \n Code", "PHONE", "  debit_number "] {
                let once = rule.apply(label);
                assert_eq!(rule.apply(&once), once);
            }
        }
    }

    #[test]
    fn test_normalize_rewrites_phone_and_keys() {
        let normalizer = FieldNormalizer::new(ColumnRule::Underscored);
        let record = raw(&[
            ("Salesperson", json!("Jane Doe")),
            ("PHONE", json!("0712345678")),
            ("Sales Code", json!(42)),
        ]);

        let clean = normalizer.normalize(&record);
        assert_eq!(clean.get("SALESPERSON"), Some("Jane Doe"));
        assert_eq!(clean.get("PHONE"), Some("+254712345678"));
        assert_eq!(clean.get("SALES_CODE"), Some("42"));
    }

    #[test]
    fn test_normalize_synthesizes_missing_phone() {
        let normalizer = FieldNormalizer::new(ColumnRule::Underscored);
        let record = raw(&[("SALESPERSON", json!("Jane Doe"))]);

        let clean = normalizer.normalize(&record);
        let phone = clean.get("PHONE").expect("phone must be present");
        let pattern = regex::Regex::new(r"^\+2547\d{8}$").unwrap();
        assert!(pattern.is_match(phone));
    }

    #[test]
    fn test_normalize_synthesizes_blank_phone() {
        let normalizer = FieldNormalizer::new(ColumnRule::Compact);
        let record = raw(&[("PHONE", json!("   "))]);

        let clean = normalizer.normalize(&record);
        let pattern = regex::Regex::new(r"^\+2547\d{8}$").unwrap();
        assert!(pattern.is_match(clean.get("PHONE").unwrap()));
    }
}
