//! Parser for Figma Variables exports → `ParseResult`.
//!
//! Walks the nested JSON tree depth-first in key order. Any object carrying
//! `$type` or `$value` is a leaf and becomes one `ParsedToken`; other objects
//! are groups whose non-`$` keys are visited. Primitives outside `$value`
//! are skipped. Malformed data never aborts the parse: structural problems
//! land in `errors`, advisory ones in `warnings`.

use crate::classify::classify_path;
use crate::model::*;
use crate::naming::css_variable_name;
use crate::normalize::normalize_value;
use crate::validate::validate_token_file;
use serde_json::{Map, Value};

pub const EXT_MODE_NAME: &str = "com.figma.modeName";
pub const EXT_VARIABLE_ID: &str = "com.figma.variableId";
pub const EXT_ALIAS_DATA: &str = "com.figma.aliasData";

/// Parse a decoded token file.
#[must_use]
pub fn parse_token_file(json: &Value) -> ParseResult {
    let mut result = ParseResult::default();

    let report = validate_token_file(json);
    result.warnings = report.warnings;
    if !report.valid {
        result.errors = report.errors;
        return result;
    }
    let Value::Object(root) = json else {
        return result;
    };

    result.metadata.mode_name = root
        .get("$extensions")
        .and_then(|ext| ext.get(EXT_MODE_NAME))
        .and_then(Value::as_str)
        .map(str::to_string);

    walk(root, &mut result);

    result.metadata.total_tokens = result.tokens.len();
    result.metadata.categories = count_categories(&result.tokens);
    log::debug!(
        "parsed {} tokens ({} errors, {} warnings)",
        result.metadata.total_tokens,
        result.errors.len(),
        result.warnings.len()
    );
    result
}

/// Parse token file text. Invalid JSON syntax becomes a single error entry.
#[must_use]
pub fn parse_token_str(text: &str) -> ParseResult {
    match serde_json::from_str::<Value>(text) {
        Ok(json) => parse_token_file(&json),
        Err(e) => ParseResult {
            errors: vec![format!("Parse error: {e}")],
            ..Default::default()
        },
    }
}

fn is_leaf(node: &Map<String, Value>) -> bool {
    node.contains_key("$type") || node.contains_key("$value")
}

/// Depth-first walk over an explicit stack. Children are pushed in reverse
/// so they pop in document order.
fn walk(root: &Map<String, Value>, result: &mut ParseResult) {
    let mut stack: Vec<(&Map<String, Value>, TokenPath)> = vec![(root, TokenPath::new())];

    while let Some((node, path)) = stack.pop() {
        if is_leaf(node) {
            // A leaf at the root has no name to give the token
            if !path.is_empty() {
                let token = build_token(node, &path);
                log::trace!("token {} → {}", token.path, token.css_variable);
                result.tokens.push(token);
            }
            continue;
        }

        for (key, child) in node.iter().rev() {
            if key.starts_with('$') {
                continue;
            }
            if let Value::Object(child) = child {
                let mut child_path = path.clone();
                child_path.push(key.clone());
                stack.push((child, child_path));
            }
        }
    }
}

fn build_token(leaf: &Map<String, Value>, path: &TokenPath) -> ParsedToken {
    let joined = path.join("/");
    let category = classify_path(&joined.to_lowercase());

    let name = path[path.len() - 1].clone();
    let (group_name, subcategory) = if path.len() > 1 {
        let middle = &path[1..path.len() - 1];
        let sub = (!middle.is_empty()).then(|| middle.join("/"));
        (Some(path[0].clone()), sub)
    } else {
        (None, None)
    };

    let token_type = leaf
        .get("$type")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let raw = leaf.get("$value").unwrap_or(&Value::Null);
    let value = normalize_value(&token_type, raw, path);

    let extensions = leaf.get("$extensions");
    let figma_variable_id = extensions
        .and_then(|ext| ext.get(EXT_VARIABLE_ID))
        .and_then(Value::as_str)
        .map(str::to_string);
    let alias_reference = extensions
        .and_then(|ext| ext.get(EXT_ALIAS_DATA))
        .and_then(|alias| alias.get("targetVariableName"))
        .and_then(Value::as_str)
        .map(str::to_string);

    ParsedToken {
        css_variable: css_variable_name(category, subcategory.as_deref(), &name),
        name,
        category,
        subcategory,
        group_name,
        value,
        token_type,
        figma_variable_id,
        alias_reference,
        path: joined,
        sort_order: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{ERR_ARRAY, ERR_NOT_OBJECT};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parse_empty_object() {
        let result = parse_token_file(&json!({}));
        assert!(result.tokens.is_empty());
        assert!(result.errors.is_empty());
        assert_eq!(result.metadata.total_tokens, 0);
    }

    #[test]
    fn parse_rejects_non_objects() {
        assert_eq!(
            parse_token_file(&Value::Null).errors,
            vec![ERR_NOT_OBJECT.to_string()]
        );
        assert_eq!(
            parse_token_file(&json!([1, 2])).errors,
            vec![ERR_ARRAY.to_string()]
        );
    }

    #[test]
    fn parse_counts_categories() {
        let input = json!({
            "Color": {
                "a": {"$type": "color", "$value": {"hex": "#111"}},
                "b": {"$type": "color", "$value": {"hex": "#222"}}
            },
            "Font Size": {
                "c": {"$type": "number", "$value": 16}
            }
        });
        let result = parse_token_file(&input);
        assert_eq!(result.tokens.len(), 3);
        assert_eq!(result.metadata.total_tokens, 3);
        let expected: std::collections::BTreeMap<_, _> =
            [(Category::Color, 2), (Category::Typography, 1)].into_iter().collect();
        assert_eq!(result.metadata.categories, expected);
    }

    #[test]
    fn parse_preserves_key_order() {
        let input = json!({
            "Spacing": {
                "lg": {"$type": "number", "$value": 24},
                "sm": {"$type": "number", "$value": 8},
                "md": {"$type": "number", "$value": 16}
            }
        });
        let names: Vec<_> = parse_token_file(&input)
            .tokens
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["lg", "sm", "md"]);
    }

    #[test]
    fn parse_deep_leaf_keeps_full_path() {
        let input = json!({
            "Color": {"Brand": {"Button": {"Primary": {
                "hover": {"$type": "color", "$value": {"components": [1, 0, 0]}}
            }}}}
        });
        let result = parse_token_file(&input);
        assert_eq!(result.tokens.len(), 1);
        let token = &result.tokens[0];
        assert_eq!(token.path, "Color/Brand/Button/Primary/hover");
        assert_eq!(token.subcategory.as_deref(), Some("Brand/Button/Primary"));
        assert_eq!(token.group_name.as_deref(), Some("Color"));
        assert_eq!(token.name, "hover");
        assert_eq!(token.css_variable, "--color-brand-button-primary-hover");
        assert_eq!(token.sort_order, 0);
    }

    #[test]
    fn parse_reads_figma_extensions() {
        let input = json!({
            "$extensions": {"com.figma.modeName": "Light"},
            "Color": {
                "link": {
                    "$type": "color",
                    "$value": {"hex": "#0000FF"},
                    "$extensions": {
                        "com.figma.variableId": "VariableID:1:2",
                        "com.figma.aliasData": {"targetVariableName": "Blue/500"}
                    }
                }
            }
        });
        let result = parse_token_file(&input);
        assert_eq!(result.metadata.mode_name.as_deref(), Some("Light"));
        let token = result.get("Color/link").expect("token missing");
        assert_eq!(token.figma_variable_id.as_deref(), Some("VariableID:1:2"));
        assert_eq!(token.alias_reference.as_deref(), Some("Blue/500"));
    }

    #[test]
    fn parse_skips_primitives_and_metadata_keys() {
        let input = json!({
            "$description": {"$type": "string", "$value": "not a token"},
            "Color": {
                "note": "just a string",
                "count": 3,
                "list": [1, 2],
                "ok": {"$value": "#FFF"}
            }
        });
        let result = parse_token_file(&input);
        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.tokens[0].token_type, "unknown");
        assert_eq!(result.tokens[0].value, TokenValue::Raw(json!("#FFF")));
    }

    #[test]
    fn parse_ignores_root_leaf() {
        let input = json!({"$type": "color", "$value": {"hex": "#FFF"}});
        let result = parse_token_file(&input);
        assert!(result.tokens.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn parse_single_segment_leaf_has_no_group() {
        let input = json!({"primary": {"$type": "string", "$value": "x"}});
        let token = &parse_token_file(&input).tokens[0];
        assert_eq!(token.group_name, None);
        assert_eq!(token.subcategory, None);
        assert_eq!(token.css_variable, "--other-primary");
    }

    #[test]
    fn parse_keeps_deeply_nested_leaves() {
        let mut node = json!({"leaf": {"$type": "number", "$value": 1}});
        for _ in 0..100 {
            node = json!({ "g": node });
        }
        let result = parse_token_file(&json!({ "Spacing": node }));
        assert!(result.errors.is_empty());
        assert_eq!(result.tokens.len(), 1);
        let token = &result.tokens[0];
        assert_eq!(token.path.split('/').count(), 102);
        assert_eq!(token.category, Category::Spacing);
        assert_eq!(token.name, "leaf");
    }

    #[test]
    fn parse_str_accepts_nesting_past_sixty_four_levels() {
        let mut text = String::from(r#"{"$type": "number", "$value": 4}"#);
        for _ in 0..70 {
            text = format!(r#"{{"g": {text}}}"#);
        }
        let result = parse_token_str(&format!(r#"{{"Spacing": {text}}}"#));
        assert!(result.errors.is_empty());
        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.metadata.total_tokens, 1);
    }

    #[test]
    fn parse_str_reports_syntax_errors() {
        let result = parse_token_str("{not json");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Parse error:"));
    }

    #[test]
    fn parse_carries_validation_warning() {
        let result = parse_token_str(r#"{"Misc": {"x": {"$type": "string", "$value": "y"}}}"#);
        assert_eq!(result.tokens.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }
}
