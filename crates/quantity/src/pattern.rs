//! Labeled-phrase extraction: `Quantity: 100 shares`, `(1'200 units)`, ...
//!
//! Rules run from most to least specific. Every match of every rule becomes
//! its own candidate; duplicates are resolved later by confidence.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::filter::ReasonablenessFilter;
use crate::model::{Candidate, CandidateSource, Provenance};
use crate::normalize::{normalize_with, numeral_text, CommaPolicy};

/// Numeral capture shared by all rules: digits with any mix of `.`, `,` and
/// apostrophes inside, always starting and ending on a digit.
pub(crate) const NUMERAL: &str = r"([0-9][0-9,.'\x{2019}]*[0-9]|[0-9])";

const UNIT: &str = r"(?:shares?|units?)";

/// Confidence of the ISIN-adjacent rule, the weakest labeled signal.
pub const ISIN_ADJACENT_CONFIDENCE: f64 = 0.65;

/// Non-digit characters allowed between an ISIN and its numeral.
const ISIN_GAP: usize = 30;

pub struct PatternRule {
    pub id: &'static str,
    pub confidence: f64,
    regex: Regex,
}

fn rule(id: &'static str, confidence: f64, pattern: String) -> PatternRule {
    PatternRule {
        id,
        confidence,
        regex: Regex::new(&pattern).unwrap(),
    }
}

/// Static rule table, highest specificity first.
pub static RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        rule(
            "quantity_label",
            0.95,
            format!(r"(?i)\bquantity\s*[:=]\s*{NUMERAL}(?:\s*{UNIT}\b)?"),
        ),
        rule(
            "number_of_shares",
            0.95,
            format!(r"(?i)\bnumber\s+of\s+{UNIT}\s*[:=]?\s*{NUMERAL}"),
        ),
        rule("shares_label", 0.90, format!(r"(?i)\b{UNIT}\s*[:=]\s*{NUMERAL}")),
        rule(
            "holding_position",
            0.87,
            format!(r"(?i)\b(?:holdings?|position)\s*[:=]?\s*{NUMERAL}\s*{UNIT}\b"),
        ),
        rule("bare_shares", 0.85, format!(r"(?i)\b{NUMERAL}\s*{UNIT}\b")),
        rule(
            "parenthetical_shares",
            0.80,
            format!(r"(?i)\(\s*{NUMERAL}\s*{UNIT}\s*\)"),
        ),
        rule(
            "contextual_shares",
            0.80,
            format!(r"(?i)\b(?:contains|has|with|holds?)\s+{NUMERAL}\s*{UNIT}\b"),
        ),
        rule("parenthetical_number", 0.70, format!(r"\(\s*{NUMERAL}\s*\)")),
    ]
});

/// Run every rule over `text`, plus the ISIN-adjacent rule when `isin` is usable.
pub fn extract(
    text: &str,
    isin: Option<&str>,
    policy: CommaPolicy,
    filter: &ReasonablenessFilter,
) -> Vec<Candidate> {
    let mut out = Vec::new();

    for rule in RULES.iter() {
        for caps in rule.regex.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            push_if_reasonable(&mut out, m.as_str(), rule.id, rule.confidence, policy, filter);
        }
    }

    if let Some(isin) = isin {
        for (id, regex) in isin_adjacent_rules(isin) {
            for caps in regex.captures_iter(text) {
                let Some(m) = caps.get(1) else { continue };
                push_if_reasonable(&mut out, m.as_str(), id, ISIN_ADJACENT_CONFIDENCE, policy, filter);
            }
        }
    }

    out
}

fn push_if_reasonable(
    out: &mut Vec<Candidate>,
    raw: &str,
    rule: &'static str,
    confidence: f64,
    policy: CommaPolicy,
    filter: &ReasonablenessFilter,
) {
    match normalize_with(raw, policy) {
        Some(q) if filter.accepts(q) => out.push(Candidate::new(
            q,
            confidence,
            CandidateSource::Pattern,
            Provenance::Pattern {
                rule,
                matched: numeral_text(raw),
            },
        )),
        Some(q) => log::trace!("pattern {rule}: rejected {q} from {raw:?}"),
        None => log::trace!("pattern {rule}: cannot normalize {raw:?}"),
    }
}

/// A 12-character alphanumeric identifier.
pub fn is_isin_shaped(isin: &str) -> bool {
    isin.len() == 12 && isin.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Rules matching a numeral just after or just before the supplied ISIN.
fn isin_adjacent_rules(isin: &str) -> Vec<(&'static str, Regex)> {
    let isin = isin.trim();
    if !is_isin_shaped(isin) {
        log::debug!("isin {isin:?} is not 12 alphanumerics; skipping adjacency rule");
        return Vec::new();
    }
    let esc = regex::escape(isin);
    // The numeral must stand alone on the side facing the gap, so digits
    // inside a neighbouring identifier (`FR0000120271`) are never read.
    let after = format!(r"(?i)\b{esc}\b[^0-9]{{0,{ISIN_GAP}}}?\b{NUMERAL}");
    let before = format!(r"(?i)\b{NUMERAL}\b[^0-9]{{1,{ISIN_GAP}}}?\b{esc}\b");

    [("isin_after", after), ("isin_before", before)]
        .into_iter()
        .filter_map(|(id, pattern)| Regex::new(&pattern).ok().map(|re| (id, re)))
        .collect()
}
