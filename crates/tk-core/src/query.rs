//! Read-only views over a parsed token list: grouping, filtering, search,
//! and aggregate stats. Nothing here mutates its input.

use crate::model::{Category, ParseResult, ParsedToken};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

// ─── Grouping ─────────────────────────────────────────────────────────────

/// Partition tokens by category, each group sorted by `(sort_order, name)`.
#[must_use]
pub fn group_by_category(tokens: &[ParsedToken]) -> BTreeMap<Category, Vec<ParsedToken>> {
    let mut groups: BTreeMap<Category, Vec<ParsedToken>> = BTreeMap::new();
    for token in tokens {
        groups.entry(token.category).or_default().push(token.clone());
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| compare_names(&a.name, &b.name))
        });
    }
    groups
}

/// Human-friendly name ordering: case-insensitive first, lowercase before
/// uppercase on ties (`"apple" < "banana" < "Banana"`).
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

// ─── Filtering ────────────────────────────────────────────────────────────

/// Category filter as chosen in a picker: everything, or one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Keep the tokens matching `filter`.
#[must_use]
pub fn filter_by_category(tokens: &[ParsedToken], filter: CategoryFilter) -> Vec<ParsedToken> {
    match filter {
        CategoryFilter::All => tokens.to_vec(),
        CategoryFilter::Only(category) => tokens
            .iter()
            .filter(|t| t.category == category)
            .cloned()
            .collect(),
    }
}

// ─── Search ───────────────────────────────────────────────────────────────

/// Case-insensitive substring match on name, path, or CSS variable.
/// An empty query matches everything.
#[must_use]
pub fn search_tokens(tokens: &[ParsedToken], query: &str) -> Vec<ParsedToken> {
    if query.is_empty() {
        return tokens.to_vec();
    }
    let needle = query.to_lowercase();
    tokens
        .iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&needle)
                || t.path.to_lowercase().contains(&needle)
                || t.css_variable.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

// ─── Stats ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub has_errors: bool,
    pub has_warnings: bool,
}

/// Summarize a parse. Category counts come from the metadata; type counts
/// are recomputed from the tokens.
#[must_use]
pub fn token_stats(result: &ParseResult) -> TokenStats {
    let mut by_type = BTreeMap::new();
    for token in &result.tokens {
        *by_type.entry(token.token_type.clone()).or_insert(0) += 1;
    }

    TokenStats {
        total: result.metadata.total_tokens,
        by_category: result.metadata.categories.clone(),
        by_type,
        has_errors: result.has_errors(),
        has_warnings: result.has_warnings(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_token_file;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> ParseResult {
        parse_token_file(&json!({
            "Color": {
                "primary": {"$type": "color", "$value": {"hex": "#0055FF"}},
                "Accent": {"$type": "color", "$value": {"hex": "#FF5500"}},
                "background": {"$type": "color", "$value": {"hex": "#FFFFFF"}}
            },
            "Spacing": {
                "md": {"$type": "number", "$value": 16}
            },
            "Font Family": {
                "body": {"$type": "string", "$value": "Inter"}
            }
        }))
    }

    fn names(tokens: &[ParsedToken]) -> Vec<&str> {
        tokens.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn group_sorts_by_name_when_sort_order_ties() {
        let groups = group_by_category(&sample().tokens);
        assert_eq!(
            names(&groups[&Category::Color]),
            vec!["Accent", "background", "primary"]
        );
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn group_sorts_by_sort_order_first() {
        let mut tokens = sample().tokens;
        for (i, token) in tokens.iter_mut().enumerate() {
            token.sort_order = 10 - i as i64;
        }
        let groups = group_by_category(&tokens);
        assert_eq!(
            names(&groups[&Category::Color]),
            vec!["background", "Accent", "primary"]
        );
    }

    #[test]
    fn compare_names_is_total() {
        let mut v = vec!["banana", "apple", "Banana"];
        v.sort_by(|a, b| compare_names(a, b));
        assert_eq!(v, vec!["apple", "banana", "Banana"]);
    }

    #[test]
    fn filter_all_and_one() {
        let tokens = sample().tokens;
        assert_eq!(filter_by_category(&tokens, CategoryFilter::All).len(), 5);
        let spacing = filter_by_category(&tokens, CategoryFilter::Only(Category::Spacing));
        assert_eq!(names(&spacing), vec!["md"]);
    }

    #[test]
    fn filter_parses_from_str() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!("".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!("grid".parse::<CategoryFilter>(), Ok(CategoryFilter::Only(Category::Grid)));
        assert!("nope".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn search_matches_name_path_and_css() {
        let tokens = sample().tokens;
        assert_eq!(names(&search_tokens(&tokens, "ACCENT")), vec!["Accent"]);
        assert_eq!(names(&search_tokens(&tokens, "spacing/")), vec!["md"]);
        assert_eq!(
            names(&search_tokens(&tokens, "--typography-body")),
            vec!["body"]
        );
        assert_eq!(search_tokens(&tokens, "").len(), 5);
        assert!(search_tokens(&tokens, "zzz").is_empty());
    }

    #[test]
    fn stats_counts_types_and_flags() {
        let stats = token_stats(&sample());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_category[&Category::Color], 3);
        assert_eq!(stats.by_type["color"], 3);
        assert_eq!(stats.by_type["number"], 1);
        assert_eq!(stats.by_type["string"], 1);
        assert!(!stats.has_errors);
        assert!(!stats.has_warnings);
    }
}
