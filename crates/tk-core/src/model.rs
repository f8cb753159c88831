//! Core data model for parsed design tokens.
//!
//! A Figma Variables export is a nested JSON tree. Parsing flattens it into
//! a list of `ParsedToken`s, each carrying a derived `Category`, a
//! normalized `TokenValue`, and a synthesized CSS custom-property name.
//! A `ParseResult` is created fresh per parse and never mutated afterwards;
//! downstream layers copy tokens when they need to change them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Path segments from the tree root to a node. Most exports nest fewer
/// than six levels deep, so this rarely spills to the heap.
pub type TokenPath = SmallVec<[String; 6]>;

// ─── Category ────────────────────────────────────────────────────────────

/// The fixed set of token categories.
///
/// Declaration order is the display order and the `Ord` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Color,
    Typography,
    Spacing,
    Shadow,
    Radius,
    Grid,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Color,
        Category::Typography,
        Category::Spacing,
        Category::Shadow,
        Category::Radius,
        Category::Grid,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Color => "color",
            Category::Typography => "typography",
            Category::Spacing => "spacing",
            Category::Shadow => "shadow",
            Category::Radius => "radius",
            Category::Grid => "grid",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| format!("unknown category `{s}`"))
    }
}

// ─── Values ──────────────────────────────────────────────────────────────

/// Normalized color: a hex string plus the raw Figma channel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    pub hex: String,
    pub alpha: Value,
    #[serde(rename = "colorSpace")]
    pub color_space: Value,
    pub components: Value,
    /// Set when `hex` is `FALLBACK_HEX` because the source had no hex and its
    /// components were unusable. Not part of the stored shape.
    #[serde(skip)]
    pub hex_fallback: bool,
}

/// A number with a unit inferred from the token path (`"px"` or `""`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberValue {
    pub value: Value,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    pub value: Value,
}

/// The value of a token, shaped by its declared `$type`.
///
/// Serialized untagged so the JSON matches what the theme service stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Color(ColorValue),
    Number(NumberValue),
    Text(TextValue),
    /// Passthrough of `$value` for types with no dedicated shape.
    Raw(Value),
}

// ─── Tokens ──────────────────────────────────────────────────────────────

/// One design token extracted from a leaf of the raw tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedToken {
    /// Last path segment.
    pub name: String,
    pub category: Category,
    /// Middle path segments joined by `/`.
    pub subcategory: Option<String>,
    /// First path segment, when the token is nested under a group.
    pub group_name: Option<String>,
    pub value: TokenValue,
    /// Declared `$type`, or `"unknown"` when absent.
    #[serde(rename = "type")]
    pub token_type: String,
    pub css_variable: String,
    pub figma_variable_id: Option<String>,
    pub alias_reference: Option<String>,
    /// Full `/`-joined path. Unique within one parse.
    pub path: String,
    #[serde(default)]
    pub sort_order: i64,
}

/// Aggregate facts about one parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetadata {
    pub total_tokens: usize,
    pub categories: BTreeMap<Category, usize>,
    pub mode_name: Option<String>,
}

/// Output of `parse_token_file`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub tokens: Vec<ParsedToken>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub metadata: ParseMetadata,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Find a token by its full path.
    pub fn get(&self, path: &str) -> Option<&ParsedToken> {
        self.tokens.iter().find(|t| t.path == path)
    }
}

/// Count tokens per category. Categories with no tokens are absent.
pub fn count_categories(tokens: &[ParsedToken]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.category).or_insert(0) += 1;
    }
    counts
}
