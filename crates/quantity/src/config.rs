use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::normalize::CommaPolicy;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Engine tunables. Every section is optional; defaults are the production
/// constants, so `ExtractConfig::default()` is the reference behavior.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    pub reconcile: ReconcileConfig,
    pub limits: LimitsConfig,
    pub indicator: IndicatorConfig,
    pub lot_size: LotSizeConfig,
    pub normalize: NormalizeConfig,
}

// ---------------------------------------------------------------------------
// Reconcile
// ---------------------------------------------------------------------------

/// Upper bound for `reconcile.round_decimals`; f64 carries ~15 significant digits.
pub const MAX_ROUND_DECIMALS: u32 = 15;

/// Cross-validation of text candidates against `value / price`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconcileConfig {
    /// Accepted ratio band is `[1 - tolerance, 1 + tolerance]`.
    pub tolerance: f64,
    /// Multipliers tried when a candidate is a lot count rather than units.
    pub lot_multipliers: Vec<u32>,
    /// Decimal places kept when the answer comes from the calculation.
    pub round_decimals: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            lot_multipliers: vec![10, 100, 1000],
            round_decimals: 2,
        }
    }
}

impl ReconcileConfig {
    /// True when `ratio` lies inside the tolerance band around 1.
    pub fn within_band(&self, ratio: f64) -> bool {
        ratio >= 1.0 - self.tolerance && ratio <= 1.0 + self.tolerance
    }
}

// ---------------------------------------------------------------------------
// Limits (reasonableness)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Retail share-count ceiling.
    pub max_quantity: f64,
    /// Hard ceiling regardless of `max_quantity`.
    pub absolute_ceiling: f64,
    pub max_fraction_digits: usize,
    /// Integer parts with this many digits look like identifiers, not counts.
    pub identifier_min_digits: usize,
    pub identifier_max_digits: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_quantity: 10_000_000.0,
            absolute_ceiling: 1_000_000_000.0,
            max_fraction_digits: 6,
            identifier_min_digits: 9,
            identifier_max_digits: 12,
        }
    }
}

// ---------------------------------------------------------------------------
// Indicator proximity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorConfig {
    /// Characters scanned before the indicator word.
    pub window_before: usize,
    /// Characters scanned after the indicator word.
    pub window_after: usize,
    /// Distance at which the proximity score reaches zero.
    pub falloff: f64,
    /// Candidates at or below this proximity score are dropped.
    pub min_proximity: f64,
    pub base_confidence: f64,
    pub before_modifier: f64,
    pub after_modifier: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            window_before: 40,
            window_after: 60,
            falloff: 50.0,
            min_proximity: 0.3,
            base_confidence: 0.75,
            before_modifier: 1.2,
            after_modifier: 0.8,
        }
    }
}

// ---------------------------------------------------------------------------
// Lot size + normalize
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LotSizeConfig {
    /// Confidence multiplier applied to lot-size derived candidates.
    pub confidence_decay: f64,
}

impl Default for LotSizeConfig {
    fn default() -> Self {
        Self { confidence_decay: 0.9 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeConfig {
    /// How `1,234` (single comma, exactly three trailing digits) is read.
    pub three_digit_comma: CommaPolicy,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ExtractConfig {
    pub fn from_toml(input: &str) -> Result<Self, ExtractError> {
        let config: ExtractConfig =
            toml::from_str(input).map_err(|e| ExtractError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ExtractError> {
        toml::to_string_pretty(self).map_err(|e| ExtractError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ExtractError> {
        let r = &self.reconcile;
        if !(r.tolerance > 0.0 && r.tolerance < 1.0) {
            return Err(ExtractError::ConfigValidation(format!(
                "reconcile.tolerance must be in (0, 1), got {}",
                r.tolerance
            )));
        }
        if r.lot_multipliers.is_empty() {
            return Err(ExtractError::ConfigValidation(
                "reconcile.lot_multipliers must not be empty".into(),
            ));
        }
        if let Some(m) = r.lot_multipliers.iter().find(|m| **m <= 1) {
            return Err(ExtractError::ConfigValidation(format!(
                "reconcile.lot_multipliers must be > 1, got {m}"
            )));
        }

        if r.round_decimals > MAX_ROUND_DECIMALS {
            return Err(ExtractError::ConfigValidation(format!(
                "reconcile.round_decimals must be <= {MAX_ROUND_DECIMALS}, got {}",
                r.round_decimals
            )));
        }

        let l = &self.limits;
        if !(l.max_quantity > 0.0) {
            return Err(ExtractError::ConfigValidation(format!(
                "limits.max_quantity must be positive, got {}",
                l.max_quantity
            )));
        }
        if l.max_quantity > l.absolute_ceiling {
            return Err(ExtractError::ConfigValidation(format!(
                "limits.max_quantity ({}) exceeds limits.absolute_ceiling ({})",
                l.max_quantity, l.absolute_ceiling
            )));
        }
        if l.identifier_min_digits > l.identifier_max_digits {
            return Err(ExtractError::ConfigValidation(format!(
                "limits.identifier_min_digits ({}) > limits.identifier_max_digits ({})",
                l.identifier_min_digits, l.identifier_max_digits
            )));
        }

        let i = &self.indicator;
        if i.window_before == 0 || i.window_after == 0 {
            return Err(ExtractError::ConfigValidation(
                "indicator windows must be non-zero".into(),
            ));
        }
        if !(i.falloff > 0.0) {
            return Err(ExtractError::ConfigValidation(format!(
                "indicator.falloff must be positive, got {}",
                i.falloff
            )));
        }
        if !(0.0..1.0).contains(&i.min_proximity) {
            return Err(ExtractError::ConfigValidation(format!(
                "indicator.min_proximity must be in [0, 1), got {}",
                i.min_proximity
            )));
        }
        for (name, v) in [
            ("base_confidence", i.base_confidence),
            ("before_modifier", i.before_modifier),
            ("after_modifier", i.after_modifier),
        ] {
            if !(v > 0.0) {
                return Err(ExtractError::ConfigValidation(format!(
                    "indicator.{name} must be positive, got {v}"
                )));
            }
        }

        let d = self.lot_size.confidence_decay;
        if !(d > 0.0 && d <= 1.0) {
            return Err(ExtractError::ConfigValidation(format!(
                "lot_size.confidence_decay must be in (0, 1], got {d}"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
