//! CSS custom-property names for tokens.

use crate::model::Category;

/// Build `--{category}[-{subcategory segments}]-{name}`.
///
/// Every segment is slugged: lower-cased, runs of characters outside
/// `[a-z0-9]` collapsed to one hyphen, leading/trailing hyphens stripped.
/// Segments that slug to nothing are dropped. Distinct tokens may collide;
/// see `lint::lint_tokens` for detection.
#[must_use]
pub fn css_variable_name(category: Category, subcategory: Option<&str>, name: &str) -> String {
    let mut parts: Vec<String> = vec![category.as_str().to_string()];
    if let Some(sub) = subcategory {
        parts.extend(sub.split('/').map(slug_segment));
    }
    parts.push(slug_segment(name));
    parts.retain(|p| !p.is_empty());

    format!("--{}", parts.join("-"))
}

/// Slug one name segment.
pub fn slug_segment(segment: &str) -> String {
    let lower = segment.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut pending_hyphen = false;

    for ch in lower.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    out
}
