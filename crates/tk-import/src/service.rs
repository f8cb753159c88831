//! Theme service contract: the persistence collaborator an import writes to.
//!
//! The storage engine lives elsewhere. This module defines the row shapes
//! and an in-memory implementation for tests and dry runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tk_core::{Category, ParsedToken};
use tokio::sync::Mutex;

/// A failure reported by the theme service. The message is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ServiceError(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Payload for creating a theme record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTheme {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub source: String,
    pub source_file_name: Option<String>,
    pub status: ThemeStatus,
}

/// A stored theme as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRecord {
    pub id: String,
    #[serde(flatten)]
    pub theme: NewTheme,
}

/// One token row as persisted under a theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRow {
    pub theme_id: String,
    pub category: Category,
    pub subcategory: Option<String>,
    pub group_name: Option<String>,
    pub name: String,
    pub value: Value,
    pub css_variable: String,
    pub figma_variable_id: Option<String>,
    pub sort_order: i64,
}

impl TokenRow {
    pub fn from_token(theme_id: &str, token: &ParsedToken, sort_order: i64) -> Self {
        Self {
            theme_id: theme_id.to_string(),
            category: token.category,
            subcategory: token.subcategory.clone(),
            group_name: token.group_name.clone(),
            name: token.name.clone(),
            value: serde_json::to_value(&token.value).unwrap_or(Value::Null),
            css_variable: token.css_variable.clone(),
            figma_variable_id: token.figma_variable_id.clone(),
            sort_order,
        }
    }
}

#[async_trait]
pub trait ThemeService: Send + Sync {
    async fn create_theme(&self, theme: NewTheme) -> Result<ThemeRecord, ServiceError>;

    async fn bulk_create_tokens(&self, rows: Vec<TokenRow>) -> Result<Vec<TokenRow>, ServiceError>;

    async fn is_slug_available(&self, slug: &str) -> Result<bool, ServiceError>;
}

// ─── In-memory service ────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemoryState {
    themes: Vec<ThemeRecord>,
    tokens: Vec<TokenRow>,
    next_id: u64,
    fail_create: Option<String>,
    fail_tokens: Option<String>,
}

/// A `ThemeService` backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryThemeService {
    state: Mutex<MemoryState>,
}

impl MemoryThemeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_theme` call fail with `message`.
    pub async fn fail_next_create(&self, message: &str) {
        self.state.lock().await.fail_create = Some(message.to_string());
    }

    /// Make the next `bulk_create_tokens` call fail with `message`.
    pub async fn fail_next_tokens(&self, message: &str) {
        self.state.lock().await.fail_tokens = Some(message.to_string());
    }

    pub async fn themes(&self) -> Vec<ThemeRecord> {
        self.state.lock().await.themes.clone()
    }

    pub async fn tokens(&self) -> Vec<TokenRow> {
        self.state.lock().await.tokens.clone()
    }
}

#[async_trait]
impl ThemeService for MemoryThemeService {
    async fn create_theme(&self, theme: NewTheme) -> Result<ThemeRecord, ServiceError> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.fail_create.take() {
            return Err(ServiceError(message));
        }
        if state.themes.iter().any(|t| t.theme.slug == theme.slug) {
            return Err(ServiceError(format!(
                "A theme with slug \"{}\" already exists",
                theme.slug
            )));
        }
        state.next_id += 1;
        let record = ThemeRecord {
            id: format!("theme-{}", state.next_id),
            theme,
        };
        state.themes.push(record.clone());
        Ok(record)
    }

    async fn bulk_create_tokens(&self, rows: Vec<TokenRow>) -> Result<Vec<TokenRow>, ServiceError> {
        let mut state = self.state.lock().await;
        if let Some(message) = state.fail_tokens.take() {
            return Err(ServiceError(message));
        }
        if let Some(orphan) = rows
            .iter()
            .find(|row| !state.themes.iter().any(|t| t.id == row.theme_id))
        {
            return Err(ServiceError(format!("Unknown theme id {}", orphan.theme_id)));
        }
        state.tokens.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn is_slug_available(&self, slug: &str) -> Result<bool, ServiceError> {
        let state = self.state.lock().await;
        Ok(!state.themes.iter().any(|t| t.theme.slug == slug))
    }
}
