//! Numerals found near quantity-indicator words ("shares", "qty", ...).
//!
//! Each indicator occurrence opens a character window around it. Numerals in
//! the window are scored by distance to the indicator and by side: a number
//! stated before its unit word is more often the quantity than one after.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::IndicatorConfig;
use crate::filter::ReasonablenessFilter;
use crate::model::{Candidate, CandidateSource, IndicatorPosition, Provenance};
use crate::normalize::{normalize_with, CommaPolicy};

pub const INDICATORS: &[&str] = &[
    "shares", "units", "quantity", "holding", "position", "pieces", "pcs", "qty", "volume",
    "amount",
];

static INDICATOR_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    INDICATORS
        .iter()
        .map(|word| (*word, Regex::new(&format!("(?i){}", regex::escape(word))).unwrap()))
        .collect()
});

/// Numeral shapes, tried in order. The plain shape takes an optional
/// fraction so `12.5` is one numeral rather than two.
static SHAPES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"[0-9]{1,3}(?:[,.'\x{2019}][0-9]{3})+[.,][0-9]+").unwrap(),
        Regex::new(r"[0-9]{1,3}(?:[,.'\x{2019}][0-9]{3})+").unwrap(),
        Regex::new(r"[0-9]+(?:[.,][0-9]+)?").unwrap(),
    ]
});

pub fn extract(
    text: &str,
    config: &IndicatorConfig,
    policy: CommaPolicy,
    filter: &ReasonablenessFilter,
) -> Vec<Candidate> {
    let mut out = Vec::new();

    for (word, re) in INDICATOR_RES.iter() {
        for occ in re.find_iter(text) {
            if prev_char(text, occ.start()).is_some_and(char::is_alphabetic) {
                continue;
            }
            scan_window(text, word, occ.range(), config, policy, filter, &mut out);
        }
    }

    out
}

fn scan_window(
    text: &str,
    word: &str,
    indicator: Range<usize>,
    config: &IndicatorConfig,
    policy: CommaPolicy,
    filter: &ReasonablenessFilter,
    out: &mut Vec<Candidate>,
) {
    let start = back_chars(text, indicator.start, config.window_before);
    let end = forward_chars(text, indicator.end, config.window_after);
    let window = &text[start..end];

    let mut claimed: Vec<Range<usize>> = Vec::new();

    for shape in SHAPES.iter() {
        for m in shape.find_iter(window) {
            let span = (start + m.start())..(start + m.end());
            if overlaps(&span, &indicator) || claimed.iter().any(|c| overlaps(c, &span)) {
                continue;
            }
            if glued(text, &span) {
                continue;
            }
            claimed.push(span.clone());

            let (position, gap) = if span.end <= indicator.start {
                (IndicatorPosition::Before, span.end..indicator.start)
            } else {
                (IndicatorPosition::After, indicator.end..span.start)
            };
            let distance = text[gap].chars().count();
            let proximity = (1.0 - distance as f64 / config.falloff).max(0.0);
            if proximity <= config.min_proximity {
                continue;
            }
            let modifier = match position {
                IndicatorPosition::Before => config.before_modifier,
                IndicatorPosition::After => config.after_modifier,
            };

            let Some(q) = normalize_with(m.as_str(), policy) else { continue };
            if !filter.accepts(q) {
                log::trace!("indicator {word}: rejected {q}");
                continue;
            }
            out.push(Candidate::new(
                q,
                config.base_confidence * proximity * modifier,
                CandidateSource::Indicator,
                Provenance::Indicator {
                    word: word.to_string(),
                    distance,
                    position,
                },
            ));
        }
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// True when the numeral is a fragment of a longer token: a letter or digit
/// directly before it (`US0378331005`), a separator-plus-digit on either
/// side, or a digit directly after it.
fn glued(text: &str, span: &Range<usize>) -> bool {
    if let Some(c) = prev_char(text, span.start) {
        if c.is_alphanumeric() {
            return true;
        }
        if is_separator(c)
            && prev_char(text, span.start - c.len_utf8()).is_some_and(|d| d.is_ascii_digit())
        {
            return true;
        }
    }
    let mut after = text[span.end..].chars();
    match (after.next(), after.next()) {
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some(c), Some(d)) if is_separator(c) && d.is_ascii_digit() => true,
        _ => false,
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, '.' | ',' | '\'' | '\u{2019}')
}

fn prev_char(text: &str, at: usize) -> Option<char> {
    text.get(..at).and_then(|s| s.chars().next_back())
}

/// Byte index `n` characters before `at`, clamped to the start.
fn back_chars(text: &str, at: usize, n: usize) -> usize {
    if n == 0 {
        return at;
    }
    text[..at]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte index `n` characters after `at`, clamped to the end.
fn forward_chars(text: &str, at: usize, n: usize) -> usize {
    text[at..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| at + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<Candidate> {
        extract(
            text,
            &IndicatorConfig::default(),
            CommaPolicy::Thousands,
            &ReasonablenessFilter::default(),
        )
    }

    fn detail(c: &Candidate) -> (&str, usize, IndicatorPosition) {
        match &c.provenance {
            Provenance::Indicator { word, distance, position } => (word.as_str(), *distance, *position),
            other => panic!("unexpected provenance {other:?}"),
        }
    }

    #[test]
    fn number_before_indicator_scores_higher() {
        let c = run("500 shares");
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].quantity, 500.0);
        assert_eq!(detail(&c[0]), ("shares", 1, IndicatorPosition::Before));
        assert!((c[0].confidence - 0.75 * 0.98 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn number_after_indicator() {
        let c = run("Qty: 100");
        assert_eq!(c.len(), 1);
        assert_eq!(detail(&c[0]), ("qty", 2, IndicatorPosition::After));
        assert!((c[0].confidence - 0.75 * 0.96 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn glued_unit_is_distance_zero() {
        let c = run("500units");
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].quantity, 500.0);
        assert_eq!(detail(&c[0]).1, 0);
        assert!((c[0].confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn indicator_inside_word_ignored() {
        assert!(run("composition 100").is_empty());
    }

    #[test]
    fn distant_numbers_dropped() {
        // 36 characters between numeral and indicator: proximity 0.28
        let text = format!("100{}shares", " ".repeat(36));
        assert!(run(&text).is_empty());
        let text = format!("100{}shares", " ".repeat(34));
        assert_eq!(run(&text).len(), 1);
    }

    #[test]
    fn window_bounds_respected() {
        // 45 characters before the indicator is outside the 40-char window.
        let text = format!("7{}shares", "-".repeat(45));
        assert!(run(&text).is_empty());
    }

    #[test]
    fn separated_numeral_read_once() {
        let c = run("1,234.56 units");
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].quantity, 1234.56);
    }

    #[test]
    fn identifier_fragments_skipped() {
        assert!(run("US0378331005 shares").is_empty());
        assert!(run("ABC123 shares").is_empty());
    }

    #[test]
    fn every_indicator_occurrence_scanned() {
        let c = run("Position 40 shares");
        let words: Vec<&str> = c.iter().map(|c| detail(c).0).collect();
        assert!(words.contains(&"shares"));
        assert!(words.contains(&"position"));
        assert!(c.iter().all(|c| c.quantity == 40.0));
    }

    #[test]
    fn multibyte_text_window_is_safe() {
        let c = run("Stück: 12 — Anteile ¼ € 30 units ✓✓✓");
        assert!(c.iter().any(|c| c.quantity == 30.0));
    }

    #[test]
    fn window_helpers() {
        let text = "ab€cd";
        assert_eq!(back_chars(text, 5, 1), 2);
        assert_eq!(back_chars(text, 5, 10), 0);
        assert_eq!(forward_chars(text, 0, 3), 5);
        assert_eq!(forward_chars(text, 0, 10), text.len());
    }
}
