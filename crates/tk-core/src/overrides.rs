//! User category overrides layered over parsed tokens.
//!
//! The parser's output stays untouched; an override map keyed by token path
//! is merged on demand into a fresh token list.

use crate::model::{Category, ParseResult, ParsedToken, count_categories};
use crate::naming::css_variable_name;
use std::collections::HashMap;

/// Path → category corrections chosen by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOverrides {
    by_path: HashMap<String, Category>,
}

impl CategoryOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: impl Into<String>, category: Category) {
        self.by_path.insert(path.into(), category);
    }

    /// Remove an override. Returns the category that was set, if any.
    pub fn clear(&mut self, path: &str) -> Option<Category> {
        self.by_path.remove(path)
    }

    pub fn get(&self, path: &str) -> Option<Category> {
        self.by_path.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

/// Merge overrides into a copy of `tokens`.
///
/// A token whose category changes gets its CSS variable regenerated, since
/// the category is the variable's first segment.
#[must_use]
pub fn apply_overrides(tokens: &[ParsedToken], overrides: &CategoryOverrides) -> Vec<ParsedToken> {
    tokens
        .iter()
        .map(|token| {
            let mut merged = token.clone();
            match overrides.get(&token.path) {
                Some(category) if category != token.category => {
                    merged.category = category;
                    merged.css_variable =
                        css_variable_name(category, token.subcategory.as_deref(), &token.name);
                }
                _ => {}
            }
            merged
        })
        .collect()
}

impl ParseResult {
    /// A new result with overrides applied and category counts recomputed.
    #[must_use]
    pub fn with_overrides(&self, overrides: &CategoryOverrides) -> ParseResult {
        let tokens = apply_overrides(&self.tokens, overrides);
        let mut metadata = self.metadata.clone();
        metadata.categories = count_categories(&tokens);
        ParseResult {
            tokens,
            errors: self.errors.clone(),
            warnings: self.warnings.clone(),
            metadata,
        }
    }
}
