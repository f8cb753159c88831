//! Upload boundary: file name, size, and JSON syntax checks before parsing.

use crate::config::ImportConfig;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tk_core::{ParseResult, ValidationReport, parse_token_file, validate_token_file};

/// Why an uploaded file was refused. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please upload a JSON file (.{0})")]
    WrongExtension(String),
    #[error("File is too large. Maximum size is {}", size_limit(.max))]
    TooLarge { size: usize, max: usize },
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("{}", .0.join("; "))]
    Rejected(Vec<String>),
}

const MIB: usize = 1024 * 1024;

/// `"5 MB"` for whole mebibytes, one decimal above 1 MiB, bytes below.
fn size_limit(max: &usize) -> String {
    let max = *max;
    if max >= MIB && max % MIB == 0 {
        format!("{} MB", max / MIB)
    } else if max >= MIB {
        format!("{:.1} MB", max as f64 / MIB as f64)
    } else {
        format!("{max} bytes")
    }
}

/// An accepted upload with its validation report and parse.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    pub size: usize,
    pub report: ValidationReport,
    pub result: ParseResult,
}

impl LoadedFile {
    /// Warnings from validation and parsing, deduplicated.
    pub fn warnings(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for w in self.report.warnings.iter().chain(&self.result.warnings) {
            if !out.contains(&w.as_str()) {
                out.push(w.as_str());
            }
        }
        out
    }
}

/// Check and parse an uploaded token file.
///
/// Order: extension → size → JSON syntax → structural validation.
pub fn load_token_file(
    file_name: &str,
    bytes: &[u8],
    config: &ImportConfig,
) -> Result<LoadedFile, UploadError> {
    let extension_ok = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(&config.allowed_extension));
    if !extension_ok {
        log::warn!("rejected upload `{file_name}`: wrong extension");
        return Err(UploadError::WrongExtension(config.allowed_extension.clone()));
    }

    if bytes.len() > config.max_file_size {
        log::warn!("rejected upload `{file_name}`: {} bytes", bytes.len());
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            max: config.max_file_size,
        });
    }

    let json: Value =
        serde_json::from_slice(bytes).map_err(|e| UploadError::InvalidJson(e.to_string()))?;

    let report = validate_token_file(&json);
    if !report.valid {
        return Err(UploadError::Rejected(report.errors));
    }

    let result = parse_token_file(&json);
    log::info!(
        "loaded `{file_name}`: {} tokens, mode {:?}",
        result.metadata.total_tokens,
        result.metadata.mode_name
    );

    Ok(LoadedFile {
        name: file_name.to_string(),
        size: bytes.len(),
        report,
        result,
    })
}
