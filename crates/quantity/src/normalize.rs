//! Locale-aware numeral normalization.
//!
//! Document numerals arrive in US (`1,234.56`), European (`1.234,56`) or
//! Swiss (`1'234.56`) conventions. [`normalize`] decides which separator is
//! the decimal point and parses the canonical form.

use serde::{Deserialize, Serialize};

/// Reading of a lone comma followed by exactly three digits (`1,234`).
///
/// The string alone cannot tell `1234` from `1.234`; documents in this
/// pipeline are dominated by US grouping, hence the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommaPolicy {
    #[default]
    Thousands,
    Decimal,
}

/// Parse a digit-and-separator string with the default [`CommaPolicy`].
pub fn normalize(raw: &str) -> Option<f64> {
    normalize_with(raw, CommaPolicy::default())
}

/// Parse a digit-and-separator string into a float.
///
/// Rules, in order:
/// 1. Keep only digits, `.`, `,` and apostrophes (`'`, `’`).
/// 2. Apostrophes are Swiss thousands separators and are dropped.
/// 3. With both `.` and `,`, whichever appears last is the decimal point.
/// 4. With only `,`: several commas group thousands; a single comma followed
///    by 1, 2 or 4 digits is a decimal point; exactly 3 follows `policy`.
/// 5. With only `.`: several dots group thousands; a single dot is decimal.
pub fn normalize_with(raw: &str, policy: CommaPolicy) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
        .collect();

    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let has_dot = cleaned.contains('.');
    let has_comma = cleaned.contains(',');

    let canonical = match (has_dot, has_comma) {
        (true, true) => {
            let last_dot = cleaned.rfind('.')?;
            let last_comma = cleaned.rfind(',')?;
            if last_comma > last_dot {
                cleaned.replace('.', "").replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        (false, true) => comma_only(&cleaned, policy),
        (true, false) => {
            if cleaned.matches('.').count() > 1 {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (false, false) => cleaned,
    };

    let value: f64 = canonical.parse().ok()?;
    value.is_finite().then_some(value)
}

fn comma_only(s: &str, policy: CommaPolicy) -> String {
    if s.matches(',').count() > 1 {
        return s.replace(',', "");
    }
    // Exactly one comma.
    let trailing = s.rsplit(',').next().map(str::len).unwrap_or(0);
    let as_decimal = match trailing {
        1 | 2 | 4 => true,
        3 => policy == CommaPolicy::Decimal,
        _ => false,
    };
    if as_decimal {
        s.replace(',', ".")
    } else {
        s.replace(',', "")
    }
}

/// Strip everything but digits and separators, keeping apostrophes.
///
/// Used by callers that want to show the numeral exactly as matched.
pub(crate) fn numeral_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '\'' | '\u{2019}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integer() {
        assert_eq!(normalize("1200"), Some(1200.0));
        assert_eq!(normalize("0"), Some(0.0));
    }

    #[test]
    fn us_grouping_with_decimals() {
        assert_eq!(normalize("1,234.56"), Some(1234.56));
        assert_eq!(normalize("12,345,678.9"), Some(12_345_678.9));
    }

    #[test]
    fn european_grouping_with_decimals() {
        assert_eq!(normalize("1.234,56"), Some(1234.56));
        assert_eq!(normalize("1.000,00"), Some(1000.0));
        assert_eq!(normalize("12.345.678,5"), Some(12_345_678.5));
    }

    #[test]
    fn swiss_apostrophes() {
        assert_eq!(normalize("1'200"), Some(1200.0));
        assert_eq!(normalize("1'234'567.25"), Some(1_234_567.25));
        assert_eq!(normalize("1\u{2019}500"), Some(1500.0));
    }

    #[test]
    fn comma_short_decimal() {
        assert_eq!(normalize("12,5"), Some(12.5));
        assert_eq!(normalize("100,25"), Some(100.25));
        assert_eq!(normalize("3,1416"), Some(3.1416));
    }

    #[test]
    fn comma_three_digits_follows_policy() {
        assert_eq!(normalize("1,234"), Some(1234.0));
        assert_eq!(normalize_with("1,234", CommaPolicy::Thousands), Some(1234.0));
        assert_eq!(normalize_with("1,234", CommaPolicy::Decimal), Some(1.234));
    }

    #[test]
    fn multiple_commas_are_grouping() {
        assert_eq!(normalize("1,234,567"), Some(1_234_567.0));
        // Policy only applies to the single-comma case.
        assert_eq!(normalize_with("1,234,567", CommaPolicy::Decimal), Some(1_234_567.0));
        // Short trailing group is still grouping once a second comma appears.
        assert_eq!(normalize("1,234,56"), Some(123_456.0));
    }

    #[test]
    fn long_fraction_after_comma_is_grouping() {
        assert_eq!(normalize("1,23456"), Some(123_456.0));
    }

    #[test]
    fn dots_only() {
        assert_eq!(normalize("350.45"), Some(350.45));
        assert_eq!(normalize("1.234.567"), Some(1_234_567.0));
    }

    #[test]
    fn strips_noise() {
        assert_eq!(normalize(" $1,000.50 "), Some(1000.5));
        assert_eq!(normalize("CHF 1'200.-"), Some(1200.0));
    }

    #[test]
    fn rejects_empty_and_separator_only() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("shares"), None);
        assert_eq!(normalize(".,'"), None);
    }

    #[test]
    fn numeral_text_keeps_apostrophes() {
        assert_eq!(numeral_text("1'200 shares"), "1'200");
        assert_eq!(numeral_text("(1.000,00)"), "1.000,00");
    }
}
