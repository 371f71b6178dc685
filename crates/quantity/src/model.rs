use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One extraction call's inputs. Borrowed from the caller, never retained.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionRequest<'a> {
    pub text: &'a str,
    pub isin: Option<&'a str>,
    pub security_name: Option<&'a str>,
    pub price: Option<f64>,
    pub market_value: Option<f64>,
}

impl<'a> ExtractionRequest<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    pub fn with_isin(mut self, isin: &'a str) -> Self {
        self.isin = Some(isin);
        self
    }

    pub fn with_security_name(mut self, name: &'a str) -> Self {
        self.security_name = Some(name);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_market_value(mut self, value: f64) -> Self {
        self.market_value = Some(value);
        self
    }

    /// `market_value / price` when both are present and price is positive.
    pub fn calculated_quantity(&self) -> Option<f64> {
        match (self.market_value, self.price) {
            (Some(value), Some(price)) if price > 0.0 && price.is_finite() => {
                let q = value / price;
                q.is_finite().then_some(q)
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// Which extractor produced a candidate. Declaration order is the
/// tie-break rank among equal confidences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Pattern,
    Indicator,
    Locale,
    LotSize,
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern => write!(f, "pattern"),
            Self::Indicator => write!(f, "indicator"),
            Self::Locale => write!(f, "locale"),
            Self::LotSize => write!(f, "lot_size"),
        }
    }
}

/// Whether an indicator-window numeral sits before or after the indicator word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorPosition {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleFormat {
    /// `1.234,56`
    European,
    /// `1'234.56`
    Swiss,
}

/// Source-specific detail explaining where a candidate came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    Pattern {
        rule: &'static str,
        matched: String,
    },
    Indicator {
        word: String,
        distance: usize,
        position: IndicatorPosition,
    },
    Locale {
        format: LocaleFormat,
        with_unit: bool,
        matched: String,
    },
    LotSize {
        lot_size: f64,
        origin_quantity: f64,
        origin_source: CandidateSource,
    },
}

/// A provisional quantity with its confidence and provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub quantity: f64,
    pub confidence: f64,
    pub source: CandidateSource,
    pub provenance: Provenance,
}

impl Candidate {
    /// Confidence is clamped into `[0, 1]`.
    pub fn new(quantity: f64, confidence: f64, source: CandidateSource, provenance: Provenance) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            quantity,
            confidence,
            source,
            provenance,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Outcome of one extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "quantity", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(f64),
    /// No reasonable quantity could be determined.
    Unknown,
}

impl Resolution {
    pub fn into_option(self) -> Option<f64> {
        match self {
            Self::Resolved(q) => Some(q),
            Self::Unknown => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Which branch of the selection algorithm produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SelectionMethod {
    /// A candidate agreed with `value / price` directly.
    DirectMatch,
    /// A candidate times a lot multiplier agreed with `value / price`.
    LotSizeMatch { multiplier: u32 },
    /// No candidates; the calculation was used.
    Calculated,
    /// Candidates disagreed with the calculation, which was trusted.
    CalculatedFallback,
    /// Highest-confidence candidate, no usable calculation.
    HighestConfidence,
    Unknown,
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectMatch => write!(f, "direct_match"),
            Self::LotSizeMatch { multiplier } => write!(f, "lot_size_match(x{multiplier})"),
            Self::Calculated => write!(f, "calculated"),
            Self::CalculatedFallback => write!(f, "calculated_fallback"),
            Self::HighestConfidence => write!(f, "highest_confidence"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Full audit trail of one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub resolution: Resolution,
    pub method: SelectionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated: Option<f64>,
    /// Calculation and candidates both existed but nothing reconciled them.
    pub discrepancy: bool,
    /// Every reasonable candidate, best first.
    pub candidates: Vec<Candidate>,
}

impl ExtractionReport {
    pub fn quantity(&self) -> Option<f64> {
        self.resolution.into_option()
    }
}
