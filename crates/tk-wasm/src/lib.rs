//! WASM bridge for Tokenkit — exposes the token pipeline to the dashboard.
//!
//! Compiled via `wasm-pack build --target web`. Everything crosses the
//! boundary as JSON strings so the React side keeps plain objects.

use serde::Serialize;
use tk_core::{
    Category, CategoryFilter, CategoryOverrides, CssConfig, ParseResult, emit_stylesheet,
    filter_by_category, group_by_category, parse_token_str, search_tokens, token_stats,
    validate_token_file,
};
use wasm_bindgen::prelude::*;

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Validate token file text. Returns a `ValidationReport` as JSON.
/// Unparseable text is reported like a non-object document.
#[wasm_bindgen(js_name = validateTokenFile)]
pub fn validate_token_file_json(text: &str) -> String {
    let json = serde_json::from_str(text).unwrap_or(serde_json::Value::Null);
    to_json(&validate_token_file(&json))
}

/// Parse token file text. Returns a `ParseResult` as JSON.
#[wasm_bindgen(js_name = parseTokenFile)]
pub fn parse_token_file_json(text: &str) -> String {
    to_json(&parse_token_str(text))
}

/// One parsed file plus the user's category overrides.
#[wasm_bindgen]
pub struct TokenBrowser {
    result: ParseResult,
    overrides: CategoryOverrides,
}

#[wasm_bindgen]
impl TokenBrowser {
    /// Parse `text` and start with no overrides.
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Self {
        Self {
            result: parse_token_str(text),
            overrides: CategoryOverrides::new(),
        }
    }

    pub fn token_count(&self) -> usize {
        self.result.tokens.len()
    }

    /// The raw parse result, without overrides.
    pub fn result_json(&self) -> String {
        to_json(&self.result)
    }

    /// Override a token's category. Returns `false` for an unknown category.
    pub fn set_override(&mut self, path: &str, category: &str) -> bool {
        match category.parse::<Category>() {
            Ok(category) => {
                self.overrides.set(path, category);
                true
            }
            Err(e) => {
                log::warn!("set_override: {e}");
                false
            }
        }
    }

    pub fn clear_override(&mut self, path: &str) -> bool {
        self.overrides.clear(path).is_some()
    }

    /// Tokens grouped by category (overrides applied) as a JSON object.
    pub fn grouped_json(&self) -> String {
        let merged = self.result.with_overrides(&self.overrides);
        to_json(&group_by_category(&merged.tokens))
    }

    /// Search within a category (`"all"` for every category). Returns a JSON array.
    pub fn search_json(&self, query: &str, category: &str) -> String {
        let filter = category.parse().unwrap_or(CategoryFilter::All);
        let merged = self.result.with_overrides(&self.overrides);
        let scoped = filter_by_category(&merged.tokens, filter);
        to_json(&search_tokens(&scoped, query))
    }

    pub fn stats_json(&self) -> String {
        to_json(&token_stats(&self.result.with_overrides(&self.overrides)))
    }

    /// CSS custom properties for every token under `selector`.
    pub fn stylesheet(&self, selector: &str) -> String {
        let merged = self.result.with_overrides(&self.overrides);
        let config = CssConfig {
            selector: selector.to_string(),
            ..CssConfig::default()
        };
        emit_stylesheet(&merged.tokens, &config)
    }
}
