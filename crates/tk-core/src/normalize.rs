//! Value normalization: raw `$value` → `TokenValue`, shaped by `$type`.
//!
//! Conversion never fails. Malformed input degrades (a color without
//! usable components becomes black) instead of aborting the parse.

use crate::model::{ColorValue, NumberValue, TextValue, TokenValue};
use serde_json::Value;

/// Hex used when a color has neither `hex` nor three usable components.
pub const FALLBACK_HEX: &str = "#000000";

/// Normalize a raw value according to its declared type.
///
/// `path` is used to infer units for numbers.
#[must_use]
pub fn normalize_value<S: AsRef<str>>(token_type: &str, raw: &Value, path: &[S]) -> TokenValue {
    match token_type {
        "color" => match raw {
            Value::Object(obj) => TokenValue::Color(normalize_color(obj)),
            other => TokenValue::Raw(other.clone()),
        },
        "number" => {
            let lower = path
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join("/")
                .to_lowercase();
            TokenValue::Number(NumberValue {
                value: raw.clone(),
                unit: infer_unit(&lower, raw).to_string(),
            })
        }
        "string" => TokenValue::Text(TextValue { value: raw.clone() }),
        _ => TokenValue::Raw(raw.clone()),
    }
}

fn normalize_color(obj: &serde_json::Map<String, Value>) -> ColorValue {
    let components = obj.get("components").cloned().unwrap_or(Value::Null);
    let explicit = obj
        .get("hex")
        .and_then(Value::as_str)
        .filter(|hex| !hex.is_empty());
    let (hex, hex_fallback) = match explicit {
        Some(hex) => (hex.to_string(), false),
        None => match hex_from_components(&components) {
            Some(hex) => (hex, false),
            None => (FALLBACK_HEX.to_string(), true),
        },
    };

    ColorValue {
        hex,
        alpha: obj.get("alpha").cloned().unwrap_or_else(|| Value::from(1)),
        color_space: obj.get("colorSpace").cloned().unwrap_or(Value::Null),
        components,
        hex_fallback,
    }
}

/// Convert the first three float channels in `[0, 1]` to `#RRGGBB`.
///
/// Returns `None` when there are fewer than three numeric channels.
/// Channels outside `[0, 1]` are clamped.
pub fn hex_from_components(components: &Value) -> Option<String> {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

    let channels = components.as_array()?;
    if channels.len() < 3 {
        return None;
    }

    let mut out = String::with_capacity(7);
    out.push('#');
    for channel in &channels[..3] {
        let v = channel.as_f64()?;
        let byte = (v * 255.0).round().clamp(0.0, 255.0) as u8;
        out.push(HEX_CHARS[(byte >> 4) as usize] as char);
        out.push(HEX_CHARS[(byte & 0xF) as usize] as char);
    }
    Some(out)
}

/// Infer a CSS unit from a lower-cased, `/`-joined token path.
fn infer_unit(lower_path: &str, raw: &Value) -> &'static str {
    const PX_HINTS: [&str; 8] = [
        "size",
        "spacing",
        "margin",
        "padding",
        "gutter",
        "breakpoint",
        "width",
        "radius",
    ];

    if lower_path.contains("weight") {
        return "";
    }
    if is_line_height(lower_path) {
        // Small line heights are unitless multipliers
        return match raw.as_f64() {
            Some(v) if v > 10.0 => "px",
            _ => "",
        };
    }
    if lower_path.contains("letter-spacing")
        || lower_path.contains("letter spacing")
        || lower_path.contains("letterspacing")
    {
        return "px";
    }
    if PX_HINTS.iter().any(|hint| lower_path.contains(hint)) {
        return "px";
    }
    ""
}

fn is_line_height(lower_path: &str) -> bool {
    lower_path.contains("line-height")
        || lower_path.contains("line height")
        || lower_path.contains("lineheight")
}
