use std::fmt;

/// Errors surfaced while loading engine configuration.
///
/// Extraction itself never fails: unparseable numerals and missing inputs
/// resolve to [`crate::Resolution::Unknown`] instead.
#[derive(Debug)]
pub enum ExtractError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (out-of-range tolerance, empty multipliers, etc.).
    ConfigValidation(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ExtractError {}
