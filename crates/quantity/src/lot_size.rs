//! Lot / contract-size declarations.
//!
//! When a document states `Lot size: 100`, every quantity already found may
//! be a lot count; each gets a derived candidate scaled by the lot size.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LotSizeConfig;
use crate::filter::ReasonablenessFilter;
use crate::model::{Candidate, CandidateSource, Provenance};
use crate::normalize::{normalize_with, CommaPolicy};
use crate::pattern::NUMERAL;

static DECLARATIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"(?i)\blot\s*size\s*[:=]?\s*{NUMERAL}"),
        format!(r"(?i)\blot\s*:\s*{NUMERAL}"),
        format!(r"(?i)\bcontract\s*size\s*[:=]?\s*{NUMERAL}"),
        format!(r"(?i)\bmultiplier\s*[:=]?\s*{NUMERAL}"),
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// The first lot-size declaration in text order, if it normalizes to a
/// positive value.
pub fn detect(text: &str, policy: CommaPolicy) -> Option<f64> {
    let (_, raw) = DECLARATIONS
        .iter()
        .filter_map(|re| re.captures(text).and_then(|c| c.get(1)))
        .map(|m| (m.start(), m.as_str()))
        .min_by_key(|(start, _)| *start)?;

    let lot = normalize_with(raw, policy)?;
    (lot > 0.0).then_some(lot)
}

/// Derived candidates: each existing candidate scaled by the declared lot size.
pub fn adjust(
    text: &str,
    existing: &[Candidate],
    config: &LotSizeConfig,
    policy: CommaPolicy,
    filter: &ReasonablenessFilter,
) -> Vec<Candidate> {
    let Some(lot) = detect(text, policy) else {
        return Vec::new();
    };
    log::debug!("lot size {lot} declared; deriving from {} candidate(s)", existing.len());

    existing
        .iter()
        .filter_map(|c| {
            let q = c.quantity * lot;
            filter.accepts(q).then(|| {
                Candidate::new(
                    q,
                    c.confidence * config.confidence_decay,
                    CandidateSource::LotSize,
                    Provenance::LotSize {
                        lot_size: lot,
                        origin_quantity: c.quantity,
                        origin_source: c.source,
                    },
                )
            })
        })
        .collect()
}
