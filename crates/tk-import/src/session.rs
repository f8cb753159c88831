//! The active theme for rendering, held as explicit state.

use tk_core::{CssConfig, ParsedToken, emit_stylesheet};

/// Which theme the dashboard currently renders with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeSession {
    current: Option<String>,
}

impl ThemeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to the theme with `slug`. Returns the previous slug.
    pub fn select(&mut self, slug: &str) -> Option<String> {
        log::debug!("active theme → {slug}");
        self.current.replace(slug.to_string())
    }

    pub fn clear(&mut self) -> Option<String> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Class name scoping the active theme's variables, e.g. `theme-dark`.
    pub fn scope_class(&self) -> Option<String> {
        self.current.as_ref().map(|slug| format!("theme-{slug}"))
    }

    /// Stylesheet for `tokens` scoped to the active theme, or `:root` when
    /// no theme is selected.
    pub fn stylesheet(&self, tokens: &[ParsedToken]) -> String {
        let selector = self
            .scope_class()
            .map(|class| format!(".{class}"))
            .unwrap_or_else(|| ":root".to_string());
        let config = CssConfig {
            selector,
            ..CssConfig::default()
        };
        emit_stylesheet(tokens, &config)
    }
}
