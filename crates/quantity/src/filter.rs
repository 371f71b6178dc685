use crate::config::LimitsConfig;

/// Plausibility predicate applied to every candidate and to the calculated
/// quantity before either can be selected.
#[derive(Debug, Clone)]
pub struct ReasonablenessFilter {
    limits: LimitsConfig,
}

impl Default for ReasonablenessFilter {
    fn default() -> Self {
        Self::new(LimitsConfig::default())
    }
}

impl ReasonablenessFilter {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Reject non-positive, oversized, over-precise and identifier-shaped values.
    pub fn accepts(&self, quantity: f64) -> bool {
        if !quantity.is_finite() || quantity <= 0.0 {
            return false;
        }
        if quantity > self.limits.max_quantity || quantity > self.limits.absolute_ceiling {
            return false;
        }
        if fraction_digits(quantity) > self.limits.max_fraction_digits {
            return false;
        }
        let int_digits = integer_digits(quantity);
        !(self.limits.identifier_min_digits..=self.limits.identifier_max_digits)
            .contains(&int_digits)
    }
}

/// [`ReasonablenessFilter::accepts`] with default limits.
pub fn is_reasonable(quantity: f64) -> bool {
    ReasonablenessFilter::default().accepts(quantity)
}

/// Digits after the point in the shortest round-trip representation.
fn fraction_digits(q: f64) -> usize {
    let repr = q.to_string();
    match repr.split_once('.') {
        Some((_, frac)) => frac.len(),
        None => 0,
    }
}

fn integer_digits(q: f64) -> usize {
    let int = q.trunc();
    if int < 1.0 {
        return 0;
    }
    format!("{int:.0}").len()
}
