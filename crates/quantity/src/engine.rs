use once_cell::sync::Lazy;

use crate::config::{ExtractConfig, MAX_ROUND_DECIMALS};
use crate::filter::ReasonablenessFilter;
use crate::model::{Candidate, ExtractionReport, ExtractionRequest, Resolution, SelectionMethod};
use crate::{indicator, locale, lot_size, pattern};

static DEFAULT_EXTRACTOR: Lazy<QuantityExtractor> = Lazy::new(QuantityExtractor::default);

/// Extract a quantity with the default configuration.
///
/// `value` and `price` are the market value and unit price extracted
/// independently from the same document; when both are present their
/// quotient cross-checks the text candidates.
pub fn extract_quantity(
    text: &str,
    isin: Option<&str>,
    name: Option<&str>,
    value: Option<f64>,
    price: Option<f64>,
) -> Option<f64> {
    let request = ExtractionRequest {
        text,
        isin,
        security_name: name,
        price,
        market_value: value,
    };
    DEFAULT_EXTRACTOR.extract(&request)
}

/// Quantity extraction and reconciliation engine.
///
/// Stateless apart from its configuration; one instance can serve any number
/// of concurrent calls.
#[derive(Debug, Clone)]
pub struct QuantityExtractor {
    config: ExtractConfig,
    filter: ReasonablenessFilter,
}

impl Default for QuantityExtractor {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

impl QuantityExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        let filter = ReasonablenessFilter::new(config.limits.clone());
        Self { config, filter }
    }

    pub fn extract(&self, request: &ExtractionRequest<'_>) -> Option<f64> {
        self.explain(request).quantity()
    }

    /// Every reasonable candidate from all extractors, best first.
    ///
    /// Ranking: confidence descending, then source (pattern, indicator,
    /// locale, lot size), then discovery order.
    pub fn candidates(&self, request: &ExtractionRequest<'_>) -> Vec<Candidate> {
        let policy = self.config.normalize.three_digit_comma;
        let text = request.text;

        let mut all = pattern::extract(text, request.isin, policy, &self.filter);
        all.extend(indicator::extract(text, &self.config.indicator, policy, &self.filter));
        all.extend(locale::extract(text, policy, &self.filter));
        let derived = lot_size::adjust(text, &all, &self.config.lot_size, policy, &self.filter);
        all.extend(derived);

        all.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.source.cmp(&b.source))
        });
        all
    }

    /// Run extraction and return the decision with its audit trail.
    pub fn explain(&self, request: &ExtractionRequest<'_>) -> ExtractionReport {
        let calculated = request.calculated_quantity();
        let candidates = self.candidates(request);
        log::debug!(
            "{} candidate(s), calculated quantity {:?}",
            candidates.len(),
            calculated
        );

        let (resolution, method) = self.select(&candidates, calculated);
        let discrepancy = calculated.is_some()
            && !candidates.is_empty()
            && !matches!(
                method,
                SelectionMethod::DirectMatch | SelectionMethod::LotSizeMatch { .. }
            );
        log::debug!("selected {resolution:?} via {method}");

        ExtractionReport {
            resolution,
            method,
            isin: request.isin.map(str::to_string),
            security_name: request.security_name.map(str::to_string),
            calculated,
            discrepancy,
            candidates,
        }
    }

    fn select(
        &self,
        candidates: &[Candidate],
        calculated: Option<f64>,
    ) -> (Resolution, SelectionMethod) {
        let reconcile = &self.config.reconcile;
        let rounded = calculated
            .map(|q| round_to(q, reconcile.round_decimals))
            .filter(|q| self.filter.accepts(*q));

        let Some(calc) = calculated else {
            return match candidates.first() {
                Some(best) => (Resolution::Resolved(best.quantity), SelectionMethod::HighestConfidence),
                None => (Resolution::Unknown, SelectionMethod::Unknown),
            };
        };

        if candidates.is_empty() {
            return match rounded {
                Some(q) => (Resolution::Resolved(q), SelectionMethod::Calculated),
                None => (Resolution::Unknown, SelectionMethod::Unknown),
            };
        }

        if let Some(c) = candidates
            .iter()
            .find(|c| reconcile.within_band(c.quantity / calc))
        {
            return (Resolution::Resolved(c.quantity), SelectionMethod::DirectMatch);
        }

        for c in candidates {
            for &multiplier in &reconcile.lot_multipliers {
                let scaled = c.quantity * f64::from(multiplier);
                if reconcile.within_band(scaled / calc) && self.filter.accepts(scaled) {
                    return (
                        Resolution::Resolved(scaled),
                        SelectionMethod::LotSizeMatch { multiplier },
                    );
                }
            }
        }

        match rounded {
            Some(q) => (Resolution::Resolved(q), SelectionMethod::CalculatedFallback),
            None => (
                Resolution::Resolved(candidates[0].quantity),
                SelectionMethod::HighestConfidence,
            ),
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_ROUND_DECIMALS) as i32);
    (value * factor).round() / factor
}
