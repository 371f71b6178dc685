//! `sharecount-quantity`: share/unit quantity extraction and reconciliation.
//!
//! Pure engine crate: receives document text plus the independently
//! extracted price and market value, returns a single quantity or unknown.
//! No CLI or IO dependencies, no mutable global state.

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod indicator;
pub mod locale;
pub mod lot_size;
pub mod model;
pub mod normalize;
pub mod pattern;

pub use config::ExtractConfig;
pub use engine::{extract_quantity, QuantityExtractor};
pub use error::ExtractError;
pub use filter::{is_reasonable, ReasonablenessFilter};
pub use model::{
    Candidate, CandidateSource, ExtractionReport, ExtractionRequest, Provenance, Resolution,
    SelectionMethod,
};
pub use normalize::{normalize, normalize_with, CommaPolicy};
