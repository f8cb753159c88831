//! Structural pre-check for token files.
//!
//! Rejects inputs that are not JSON objects and flags files whose root keys
//! look nothing like a Figma Variables export. Runs before parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ERR_NOT_OBJECT: &str = "Invalid JSON: expected an object";
pub const ERR_ARRAY: &str = "Invalid format: expected object, got array";
pub const WARN_NO_CATEGORIES: &str =
    "No recognized token categories found. File may not be a Figma Variables export.";

/// Which token families the root keys suggest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedCategories {
    pub has_color: bool,
    pub has_typography: bool,
    pub has_spacing: bool,
    pub has_grid: bool,
}

impl DetectedCategories {
    pub fn any(&self) -> bool {
        self.has_color || self.has_typography || self.has_spacing || self.has_grid
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub detected: DetectedCategories,
}

/// Validate the shape of a decoded token file.
///
/// `Value::Null` stands in for a missing document.
#[must_use]
pub fn validate_token_file(json: &Value) -> ValidationReport {
    let root = match json {
        Value::Object(root) => root,
        Value::Array(_) => return rejected(ERR_ARRAY),
        _ => return rejected(ERR_NOT_OBJECT),
    };

    let mut detected = DetectedCategories::default();
    for key in root.keys() {
        let key = key.to_lowercase();
        if key.contains("color") {
            detected.has_color = true;
        }
        if key.contains("font")
            || key.contains("typography")
            || key.contains("line height")
            || key.contains("letter spacing")
        {
            detected.has_typography = true;
        }
        if key.contains("spacing") || key.contains("space") {
            detected.has_spacing = true;
        }
        if key.contains("breakpoint") || key.contains("grid") {
            detected.has_grid = true;
        }
    }

    let mut warnings = Vec::new();
    if !detected.any() {
        log::warn!("token file has no recognized root categories");
        warnings.push(WARN_NO_CATEGORIES.to_string());
    }

    ValidationReport {
        valid: true,
        errors: Vec::new(),
        warnings,
        detected,
    }
}

fn rejected(message: &str) -> ValidationReport {
    log::warn!("token file rejected: {message}");
    ValidationReport {
        valid: false,
        errors: vec![message.to_string()],
        warnings: Vec::new(),
        detected: DetectedCategories::default(),
    }
}
