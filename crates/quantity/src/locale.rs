//! European (`1.234,56`) and Swiss (`1'234.56`) formatted numerals.
//!
//! These overlap with what the pattern rules find on European documents.
//! The overlap is kept; selection ranks duplicates by confidence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::filter::ReasonablenessFilter;
use crate::model::{Candidate, CandidateSource, LocaleFormat, Provenance};
use crate::normalize::{normalize_with, numeral_text, CommaPolicy};

const EUROPEAN: &str = r"([0-9]{1,3}(?:\.[0-9]{3})+,[0-9]{1,3})";
const SWISS: &str = r"([0-9]{1,3}(?:['\x{2019}][0-9]{3})+(?:\.[0-9]{1,3})?)";
const UNIT_WORD: &str = r"(?:shares?|units?|pieces|pcs)";

struct LocaleRule {
    format: LocaleFormat,
    with_unit: bool,
    confidence: f64,
    regex: Regex,
}

fn locale_rule(format: LocaleFormat, with_unit: bool, confidence: f64, pattern: String) -> LocaleRule {
    LocaleRule {
        format,
        with_unit,
        confidence,
        regex: Regex::new(&pattern).unwrap(),
    }
}

static RULES: Lazy<Vec<LocaleRule>> = Lazy::new(|| {
    vec![
        locale_rule(
            LocaleFormat::European,
            true,
            0.90,
            format!(r"(?i)\b{EUROPEAN}\s*{UNIT_WORD}\b"),
        ),
        locale_rule(LocaleFormat::European, false, 0.75, format!(r"\b{EUROPEAN}\b")),
        locale_rule(
            LocaleFormat::Swiss,
            true,
            0.90,
            format!(r"(?i)\b{SWISS}\s*{UNIT_WORD}\b"),
        ),
        locale_rule(LocaleFormat::Swiss, false, 0.75, format!(r"\b{SWISS}\b")),
    ]
});

pub fn extract(text: &str, policy: CommaPolicy, filter: &ReasonablenessFilter) -> Vec<Candidate> {
    let mut out = Vec::new();

    for rule in RULES.iter() {
        for caps in rule.regex.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            let Some(q) = normalize_with(m.as_str(), policy) else { continue };
            if !filter.accepts(q) {
                continue;
            }
            out.push(Candidate::new(
                q,
                rule.confidence,
                CandidateSource::Locale,
                Provenance::Locale {
                    format: rule.format,
                    with_unit: rule.with_unit,
                    matched: numeral_text(m.as_str()),
                },
            ));
        }
    }

    out
}
