//! Emitter: parsed tokens → CSS custom-property stylesheet.

use crate::model::{Category, ColorValue, ParsedToken, TokenValue};
use serde_json::Value;
use std::fmt::Write;

/// Configuration for `emit_stylesheet`.
#[derive(Debug, Clone)]
pub struct CssConfig {
    /// Selector wrapping the declarations. Default: `:root`.
    pub selector: String,
    /// Emit a `/* category */` line whenever the category changes. Default: **true**.
    pub group_comments: bool,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            selector: ":root".to_string(),
            group_comments: true,
        }
    }
}

/// Emit one rule declaring every token as a custom property, in input order.
#[must_use]
pub fn emit_stylesheet(tokens: &[ParsedToken], config: &CssConfig) -> String {
    let mut out = String::with_capacity(64 + tokens.len() * 48);
    let _ = writeln!(out, "{} {{", config.selector);

    let mut current: Option<Category> = None;
    for token in tokens {
        if config.group_comments && current != Some(token.category) {
            let _ = writeln!(out, "  /* {} */", token.category);
            current = Some(token.category);
        }
        let _ = writeln!(out, "  {}: {};", token.css_variable, css_value(&token.value));
    }

    out.push_str("}\n");
    out
}

/// Render a token value as a CSS value.
pub fn css_value(value: &TokenValue) -> String {
    match value {
        TokenValue::Color(color) => color_value(color),
        TokenValue::Number(n) => format!("{}{}", plain(&n.value), n.unit),
        TokenValue::Text(t) => plain(&t.value),
        TokenValue::Raw(raw) => plain(raw),
    }
}

fn color_value(color: &ColorValue) -> String {
    let alpha = color.alpha.as_f64().unwrap_or(1.0);
    if alpha >= 1.0 {
        return color.hex.clone();
    }
    match rgb_bytes(&color.hex) {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {})", round_alpha(alpha)),
        None => color.hex.clone(),
    }
}

fn round_alpha(alpha: f64) -> f64 {
    (alpha.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

/// Parse `#RGB` or `#RRGGBB` (alpha digits ignored).
fn rgb_bytes(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.is_ascii() {
        return None;
    }
    match digits.len() {
        3 | 4 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|v| v * 17);
            Some((channel(0)?, channel(1)?, channel(2)?))
        }
        6 | 8 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

/// Strings verbatim, everything else as compact JSON.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
