//! Lint diagnostics for parsed tokens.
//!
//! Reports suspicious tokens without modifying them. The parser degrades
//! silently on bad data; these rules surface what it papered over.

use crate::model::{ParsedToken, TokenValue};
use crate::normalize::FALLBACK_HEX;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Should be fixed — likely a mistake in the export.
    Warning,
    Info,
}

/// A single lint diagnostic for a token.
#[derive(Debug, Clone, Serialize)]
pub struct TokenDiagnostic {
    /// Path of the token this diagnostic refers to.
    pub path: String,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "css-collision").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the tokens and return diagnostics.
#[must_use]
pub fn lint_tokens(tokens: &[ParsedToken]) -> Vec<TokenDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_paths(tokens, &mut diags);
    lint_css_collisions(tokens, &mut diags);
    lint_color_fallback(tokens, &mut diags);
    lint_unknown_type(tokens, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Warn when keys containing `/` make two leaves share one path. Overrides
/// are keyed by path, so both tokens would move together.
fn lint_duplicate_paths(tokens: &[ParsedToken], diags: &mut Vec<TokenDiagnostic>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for token in tokens {
        if !seen.insert(&token.path) {
            diags.push(TokenDiagnostic {
                path: token.path.clone(),
                message: format!(
                    "`{}` is reached by more than one key; a `/` inside a key name splits it.",
                    token.path
                ),
                severity: LintSeverity::Warning,
                rule: "duplicate-path",
            });
        }
    }
}

/// Warn when two tokens slug to the same CSS variable.
fn lint_css_collisions(tokens: &[ParsedToken], diags: &mut Vec<TokenDiagnostic>) {
    let mut first_by_var: HashMap<&str, &str> = HashMap::new();
    for token in tokens {
        match first_by_var.get(token.css_variable.as_str()) {
            Some(first) => diags.push(TokenDiagnostic {
                path: token.path.clone(),
                message: format!(
                    "`{}` collides with `{first}` on `{}`.",
                    token.path, token.css_variable
                ),
                severity: LintSeverity::Warning,
                rule: "css-collision",
            }),
            None => {
                first_by_var.insert(&token.css_variable, &token.path);
            }
        }
    }
}

/// Warn when a color's hex was synthesized because its components were unusable.
fn lint_color_fallback(tokens: &[ParsedToken], diags: &mut Vec<TokenDiagnostic>) {
    for token in tokens {
        let TokenValue::Color(color) = &token.value else {
            continue;
        };
        if color.hex_fallback {
            diags.push(TokenDiagnostic {
                path: token.path.clone(),
                message: format!(
                    "`{}` has no usable color components — rendered as {FALLBACK_HEX}.",
                    token.path
                ),
                severity: LintSeverity::Warning,
                rule: "color-fallback",
            });
        }
    }
}

/// Info when a leaf had no `$type`.
fn lint_unknown_type(tokens: &[ParsedToken], diags: &mut Vec<TokenDiagnostic>) {
    for token in tokens.iter().filter(|t| t.token_type == "unknown") {
        diags.push(TokenDiagnostic {
            path: token.path.clone(),
            message: format!("`{}` has no `$type`; value kept as-is.", token.path),
            severity: LintSeverity::Info,
            rule: "unknown-type",
        });
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
