//! `sharecount extract`: run the engine over one document.

use std::io::Read;
use std::path::PathBuf;

use serde::Serialize;
use sharecount_quantity::{
    ExtractConfig, ExtractionReport, ExtractionRequest, QuantityExtractor, Resolution,
};

use crate::config_cmd::load_config;
use crate::exit_codes::EXIT_QUANTITY_UNKNOWN;
use crate::CliError;

/// `--json` output: run metadata plus the engine's report.
#[derive(Debug, Serialize)]
struct ExtractOutput<'a> {
    meta: RunMeta,
    #[serde(flatten)]
    report: &'a ExtractionReport,
}

#[derive(Debug, Serialize)]
struct RunMeta {
    engine_version: String,
    run_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<String>,
}

pub fn cmd_extract(
    file: Option<PathBuf>,
    isin: Option<String>,
    name: Option<String>,
    price: Option<f64>,
    value: Option<f64>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    for (flag, v) in [("--price", price), ("--value", value)] {
        if v.is_some_and(|v| !v.is_finite()) {
            return Err(CliError::usage(format!("{flag} must be a finite number")));
        }
    }

    let text = read_document(file.as_ref())?;
    let config = match &config_path {
        Some(path) => load_config(path)?,
        None => ExtractConfig::default(),
    };

    let engine = QuantityExtractor::new(config);
    let request = ExtractionRequest {
        text: &text,
        isin: isin.as_deref(),
        security_name: name.as_deref(),
        price,
        market_value: value,
    };
    let report = engine.explain(&request);

    if report.discrepancy {
        log::warn!(
            "text candidates disagree with value/price ({:?}); selected {} via {}",
            report.calculated,
            display_resolution(report.resolution),
            report.method,
        );
    }

    if json {
        let output = ExtractOutput {
            meta: RunMeta {
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
                source: file.as_ref().map(|p| p.display().to_string()),
                config: config_path.as_ref().map(|p| p.display().to_string()),
            },
            report: &report,
        };
        let json_str = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        println!("{}", display_resolution(report.resolution));
        eprintln!(
            "method: {}, {} candidate(s){}",
            report.method,
            report.candidates.len(),
            if report.discrepancy { ", discrepancy" } else { "" },
        );
    }

    if report.resolution.is_resolved() {
        Ok(())
    } else {
        // Already reported on stdout; exit code only.
        Err(CliError { code: EXIT_QUANTITY_UNKNOWN, message: String::new(), hint: None })
    }
}

fn display_resolution(resolution: Resolution) -> String {
    match resolution {
        Resolution::Resolved(q) => q.to_string(),
        Resolution::Unknown => "unknown".to_string(),
    }
}

fn read_document(file: Option<&PathBuf>) -> Result<String, CliError> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            CliError::io(format!("cannot read {}: {e}", path.display()))
                .with_hint("input must be UTF-8 text; convert PDFs with pdftotext first")
        }),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| CliError::io(format!("cannot read stdin: {e}")))?;
            Ok(text)
        }
    }
}
