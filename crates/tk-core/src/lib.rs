pub mod classify;
pub mod css;
pub mod lint;
pub mod model;
pub mod naming;
pub mod normalize;
pub mod overrides;
pub mod parser;
pub mod query;
pub mod validate;

pub use classify::classify;
pub use css::{CssConfig, emit_stylesheet};
pub use lint::{LintSeverity, TokenDiagnostic, lint_tokens};
pub use model::*;
pub use naming::css_variable_name;
pub use normalize::normalize_value;
pub use overrides::{CategoryOverrides, apply_overrides};
pub use parser::{parse_token_file, parse_token_str};
pub use query::{
    CategoryFilter, TokenStats, filter_by_category, group_by_category, search_tokens, token_stats,
};
pub use validate::{DetectedCategories, ValidationReport, validate_token_file};
