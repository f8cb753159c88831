//! Category classification from a token's path.
//!
//! An ordered list of `(pattern, category)` rules is tested against the
//! lower-cased, `/`-joined path. The first matching rule wins; no match
//! falls back to `Category::Other`.

use crate::model::Category;
use regex::Regex;
use std::sync::LazyLock;

/// Classification rules in priority order.
static RULES: LazyLock<Vec<(Regex, Category)>> = LazyLock::new(|| {
    [
        (r"^colou?r", Category::Color),
        (
            r"^(font|typography|type|text|line[ _-]?height|letter[ _-]?spacing)",
            Category::Typography,
        ),
        (r"^(spacing|space|gap|margin|padding)", Category::Spacing),
        (r"^(shadow|elevation)", Category::Shadow),
        (r"^(radius|corner|border[ _-]?radius)", Category::Radius),
        (r"^(grid|column|gutter|breakpoint)", Category::Grid),
    ]
    .into_iter()
    .map(|(pattern, category)| {
        (Regex::new(pattern).expect("invalid classification pattern"), category)
    })
    .collect()
});

/// Classify a token by its path segments.
#[must_use]
pub fn classify<S: AsRef<str>>(path: &[S]) -> Category {
    let joined = path
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
        .to_lowercase();
    classify_path(&joined)
}

/// Classify an already-joined, lower-cased path.
pub(crate) fn classify_path(lower_path: &str) -> Category {
    RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(lower_path))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}
