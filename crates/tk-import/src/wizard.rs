//! Theme import wizard: `Upload → Mapping → Details → Review`.
//!
//! Moving forward is gated per step; moving back is always allowed from any
//! step but the first. The parse result is kept immutable and category
//! corrections live in a separate override map merged on demand.
//!
//! Submission is split in three so a UI can release its lock on the wizard
//! while the network calls run: `begin_import` (sets the in-flight guard and
//! builds the plan), `run_import` (creates the theme, then its token rows),
//! and `finish_import` (clears the guard and records the outcome).
//! `submit` chains all three. A failure after the theme was created is not
//! rolled back; the error carries the theme id for a retry.

use crate::config::ImportConfig;
use crate::service::{NewTheme, ServiceError, ThemeRecord, ThemeService, ThemeStatus, TokenRow};
use crate::slug::{
    SlugCheckOutcome, SlugChecker, SlugTicket, check_slug, is_valid_slug, slugify,
};
use crate::upload::{LoadedFile, UploadError, load_token_file};
use std::fmt;
use thiserror::Error;
use tk_core::{Category, CategoryOverrides, ParsedToken, apply_overrides};

pub const IMPORT_SOURCE: &str = "figma";

// ─── Steps ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Upload,
    Mapping,
    Details,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Upload,
        WizardStep::Mapping,
        WizardStep::Details,
        WizardStep::Review,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WizardStep::Upload => "upload",
            WizardStep::Mapping => "mapping",
            WizardStep::Details => "details",
            WizardStep::Review => "review",
        })
    }
}

// ─── Errors ───────────────────────────────────────────────────────────────

/// Wizard failures. `Display` is the user-facing message; service errors
/// are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Complete the {0} step before continuing")]
    StepIncomplete(WizardStep),
    #[error("Already at the final step")]
    LastStep,
    #[error("An import is already in progress")]
    InProgress,
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("{0}")]
    CreateTheme(ServiceError),
    #[error("{source}")]
    CreateTokens {
        theme_id: String,
        source: ServiceError,
    },
}

// ─── Details ──────────────────────────────────────────────────────────────

/// Availability of the current slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SlugStatus {
    #[default]
    Unchecked,
    Checking,
    Available,
    Taken,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeDetails {
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Set once the user types a slug; stops auto-derivation from the name.
    pub slug_edited: bool,
}

/// What `begin_import` hands to `run_import`.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub theme: NewTheme,
    pub tokens: Vec<ParsedToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub theme: ThemeRecord,
    pub token_count: usize,
}

// ─── Wizard ───────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ImportWizard {
    config: ImportConfig,
    step: WizardStep,
    file: Option<LoadedFile>,
    overrides: CategoryOverrides,
    details: ThemeDetails,
    slug_status: SlugStatus,
    slugs: SlugChecker,
    importing: bool,
    error: Option<String>,
    completed: Option<ImportOutcome>,
}

impl Default for ImportWizard {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}

impl ImportWizard {
    pub fn new(config: ImportConfig) -> Self {
        Self {
            config,
            step: WizardStep::Upload,
            file: None,
            overrides: CategoryOverrides::new(),
            details: ThemeDetails::default(),
            slug_status: SlugStatus::Unchecked,
            slugs: SlugChecker::new(),
            importing: false,
            error: None,
            completed: None,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn file(&self) -> Option<&LoadedFile> {
        self.file.as_ref()
    }

    pub fn details(&self) -> &ThemeDetails {
        &self.details
    }

    pub fn slug_status(&self) -> &SlugStatus {
        &self.slug_status
    }

    pub fn is_importing(&self) -> bool {
        self.importing
    }

    /// The last user-facing error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn completed(&self) -> Option<&ImportOutcome> {
        self.completed.as_ref()
    }

    // ── Upload ────────────────────────────────────────────────────────────

    /// Check and parse an upload. A rejected file clears any previous one.
    pub fn load_file(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), ImportError> {
        self.overrides = CategoryOverrides::new();
        match load_token_file(file_name, bytes, &self.config) {
            Ok(file) => {
                self.file = Some(file);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.file = None;
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    // ── Mapping ───────────────────────────────────────────────────────────

    pub fn override_category(&mut self, path: &str, category: Category) {
        self.overrides.set(path, category);
    }

    pub fn clear_override(&mut self, path: &str) {
        self.overrides.clear(path);
    }

    pub fn overrides(&self) -> &CategoryOverrides {
        &self.overrides
    }

    /// Parsed tokens with the user's category overrides merged in.
    pub fn tokens_for_display(&self) -> Vec<ParsedToken> {
        match &self.file {
            Some(file) => apply_overrides(&file.result.tokens, &self.overrides),
            None => Vec::new(),
        }
    }

    // ── Details ───────────────────────────────────────────────────────────

    /// Set the theme name, re-deriving the slug unless it was edited by hand.
    pub fn set_name(&mut self, name: &str) {
        self.details.name = name.to_string();
        if !self.details.slug_edited {
            self.replace_slug(slugify(name));
        }
    }

    pub fn set_slug(&mut self, slug: &str) {
        self.details.slug_edited = true;
        self.replace_slug(slug.to_string());
    }

    pub fn set_description(&mut self, description: &str) {
        self.details.description = description.to_string();
    }

    fn replace_slug(&mut self, slug: String) {
        if slug != self.details.slug {
            self.details.slug = slug;
            self.slug_status = SlugStatus::Unchecked;
            self.slugs.cancel();
        }
    }

    /// Start an availability check for the current slug.
    ///
    /// Returns `None` when the slug is malformed; nothing is worth asking.
    pub fn request_slug_check(&mut self) -> Option<SlugTicket> {
        if !is_valid_slug(&self.details.slug) {
            self.slugs.cancel();
            self.slug_status = SlugStatus::Unchecked;
            return None;
        }
        self.slug_status = SlugStatus::Checking;
        Some(self.slugs.request(&self.details.slug))
    }

    /// Apply the answer for `ticket`. Stale answers are ignored; returns
    /// whether the status changed.
    pub fn complete_slug_check(&mut self, ticket: &SlugTicket, outcome: SlugCheckOutcome) -> bool {
        if !ticket.is_current() || ticket.slug != self.details.slug {
            return false;
        }
        self.slug_status = match outcome {
            SlugCheckOutcome::Superseded => return false,
            SlugCheckOutcome::Checked(Ok(true)) => SlugStatus::Available,
            SlugCheckOutcome::Checked(Ok(false)) => SlugStatus::Taken,
            SlugCheckOutcome::Checked(Err(e)) => SlugStatus::Failed(e.to_string()),
        };
        true
    }

    /// Request, debounce by `config.slug_debounce`, and apply a check for the
    /// current slug. Returns whether the status changed.
    pub async fn refresh_slug_status<S: ThemeService + ?Sized>(&mut self, service: &S) -> bool {
        let Some(ticket) = self.request_slug_check() else {
            return false;
        };
        let outcome = check_slug(service, &ticket, self.config.slug_debounce).await;
        self.complete_slug_check(&ticket, outcome)
    }

    pub fn details_valid(&self) -> bool {
        !self.details.name.trim().is_empty()
            && is_valid_slug(&self.details.slug)
            && self.slug_status == SlugStatus::Available
    }

    // ── Navigation ────────────────────────────────────────────────────────

    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Upload => self.file.is_some(),
            WizardStep::Mapping => self
                .file
                .as_ref()
                .is_some_and(|f| !f.result.tokens.is_empty()),
            WizardStep::Details => self.details_valid(),
            WizardStep::Review => true,
        }
    }

    pub fn advance(&mut self) -> Result<WizardStep, ImportError> {
        if !self.can_advance() {
            return Err(ImportError::StepIncomplete(self.step));
        }
        let next = self.step.next().ok_or(ImportError::LastStep)?;
        log::debug!("wizard {} → {}", self.step, next);
        self.step = next;
        Ok(next)
    }

    /// Step back. Returns `false` on the first step.
    pub fn back(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    // ── Submission ────────────────────────────────────────────────────────

    /// Claim the in-flight guard and build the import plan.
    pub fn begin_import(&mut self) -> Result<ImportPlan, ImportError> {
        if self.importing {
            return Err(ImportError::InProgress);
        }
        if self.step != WizardStep::Review || !self.details_valid() {
            return Err(ImportError::StepIncomplete(self.step));
        }
        let Some(file) = &self.file else {
            return Err(ImportError::StepIncomplete(WizardStep::Upload));
        };

        let description = self.details.description.trim();
        let plan = ImportPlan {
            theme: NewTheme {
                name: self.details.name.trim().to_string(),
                slug: self.details.slug.clone(),
                description: (!description.is_empty()).then(|| description.to_string()),
                source: IMPORT_SOURCE.to_string(),
                source_file_name: Some(file.name.clone()),
                status: ThemeStatus::Draft,
            },
            tokens: apply_overrides(&file.result.tokens, &self.overrides),
        };

        self.importing = true;
        self.error = None;
        Ok(plan)
    }

    /// Release the in-flight guard and record the outcome.
    pub fn finish_import(&mut self, outcome: &Result<ImportOutcome, ImportError>) {
        self.importing = false;
        match outcome {
            Ok(done) => {
                self.completed = Some(done.clone());
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Run the whole submission against `service`.
    pub async fn submit<S: ThemeService + ?Sized>(
        &mut self,
        service: &S,
    ) -> Result<ImportOutcome, ImportError> {
        let plan = self.begin_import()?;
        let outcome = run_import(service, plan).await;
        self.finish_import(&outcome);
        outcome
    }
}

/// Create the theme, then its token rows with positional `sort_order`.
pub async fn run_import<S: ThemeService + ?Sized>(
    service: &S,
    plan: ImportPlan,
) -> Result<ImportOutcome, ImportError> {
    let theme = service
        .create_theme(plan.theme)
        .await
        .map_err(ImportError::CreateTheme)?;
    log::info!("created theme {} ({})", theme.id, theme.theme.slug);

    let rows: Vec<TokenRow> = plan
        .tokens
        .iter()
        .enumerate()
        .map(|(i, token)| TokenRow::from_token(&theme.id, token, i as i64))
        .collect();
    let token_count = rows.len();

    if let Err(source) = service.bulk_create_tokens(rows).await {
        log::warn!("token insert failed for theme {}: {source}", theme.id);
        return Err(ImportError::CreateTokens {
            theme_id: theme.id,
            source,
        });
    }
    log::info!("imported {token_count} tokens into theme {}", theme.id);

    Ok(ImportOutcome { theme, token_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MemoryThemeService;

    const TOKENS: &[u8] = br##"{
        "Color": {"primary": {"$type": "color", "$value": {"hex": "#0055FF"}}},
        "Misc": {"gap": {"$type": "number", "$value": 12}}
    }"##;

    #[test]
    fn step_order() {
        assert_eq!(WizardStep::Upload.next(), Some(WizardStep::Mapping));
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::Upload.prev(), None);
        assert_eq!(WizardStep::Review.prev(), Some(WizardStep::Details));
    }

    #[test]
    fn upload_gates_first_step() {
        let mut wizard = ImportWizard::default();
        assert_eq!(
            wizard.advance(),
            Err(ImportError::StepIncomplete(WizardStep::Upload))
        );
        assert!(wizard.load_file("tokens.txt", TOKENS).is_err());
        assert_eq!(wizard.error(), Some("Please upload a JSON file (.json)"));

        wizard.load_file("tokens.json", TOKENS).unwrap();
        assert_eq!(wizard.error(), None);
        assert_eq!(wizard.advance(), Ok(WizardStep::Mapping));
    }

    #[test]
    fn mapping_requires_tokens() {
        let mut wizard = ImportWizard::default();
        wizard.load_file("empty.json", b"{}").unwrap();
        wizard.advance().unwrap();
        assert!(!wizard.can_advance());
    }

    #[test]
    fn back_is_unconditional() {
        let mut wizard = ImportWizard::default();
        assert!(!wizard.back());
        wizard.load_file("tokens.json", TOKENS).unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), WizardStep::Details);
        assert!(wizard.back());
        assert_eq!(wizard.step(), WizardStep::Mapping);
    }

    #[test]
    fn overrides_show_in_display_tokens_only() {
        let mut wizard = ImportWizard::default();
        wizard.load_file("tokens.json", TOKENS).unwrap();
        wizard.override_category("Misc/gap", Category::Spacing);

        let shown = wizard.tokens_for_display();
        assert_eq!(shown[1].category, Category::Spacing);
        assert_eq!(shown[1].css_variable, "--spacing-gap");
        assert_eq!(
            wizard.file().unwrap().result.tokens[1].category,
            Category::Other
        );

        wizard.clear_override("Misc/gap");
        assert_eq!(wizard.tokens_for_display()[1].category, Category::Other);
    }

    #[test]
    fn name_derives_slug_until_edited() {
        let mut wizard = ImportWizard::default();
        wizard.set_name("Dark Mode");
        assert_eq!(wizard.details().slug, "dark-mode");
        wizard.set_slug("night");
        wizard.set_name("Dark Mode 2");
        assert_eq!(wizard.details().slug, "night");
    }

    #[test]
    fn stale_slug_answer_is_ignored() {
        let mut wizard = ImportWizard::default();
        wizard.set_name("Dar");
        let stale = wizard.request_slug_check().unwrap();
        wizard.set_name("Dark");
        let fresh = wizard.request_slug_check().unwrap();

        assert!(!wizard.complete_slug_check(&stale, SlugCheckOutcome::Checked(Ok(false))));
        assert_eq!(wizard.slug_status(), &SlugStatus::Checking);
        assert!(wizard.complete_slug_check(&fresh, SlugCheckOutcome::Checked(Ok(true))));
        assert_eq!(wizard.slug_status(), &SlugStatus::Available);
    }

    #[test]
    fn malformed_slug_is_not_checked() {
        let mut wizard = ImportWizard::default();
        wizard.set_slug("Not A Slug");
        assert!(wizard.request_slug_check().is_none());
        assert!(!wizard.details_valid());
    }

    #[test]
    fn editing_slug_resets_availability() {
        let mut wizard = ImportWizard::default();
        wizard.set_name("Light");
        let ticket = wizard.request_slug_check().unwrap();
        wizard.complete_slug_check(&ticket, SlugCheckOutcome::Checked(Ok(true)));
        assert!(wizard.details_valid());
        wizard.set_slug("light-2");
        assert_eq!(wizard.slug_status(), &SlugStatus::Unchecked);
        assert!(!wizard.details_valid());
    }

    #[tokio::test]
    async fn refresh_uses_configured_debounce() {
        let service = MemoryThemeService::new();
        let mut wizard = ImportWizard::new(ImportConfig {
            slug_debounce: std::time::Duration::from_millis(30),
            ..ImportConfig::default()
        });
        wizard.set_name("Light");

        let started = tokio::time::Instant::now();
        assert!(wizard.refresh_slug_status(&service).await);
        assert!(started.elapsed() >= std::time::Duration::from_millis(30));
        assert_eq!(wizard.slug_status(), &SlugStatus::Available);

        wizard.set_slug("Bad Slug");
        assert!(!wizard.refresh_slug_status(&service).await);
        assert_eq!(wizard.slug_status(), &SlugStatus::Unchecked);
    }

    #[tokio::test]
    async fn submit_outside_review_is_refused() {
        let service = MemoryThemeService::new();
        let mut wizard = ImportWizard::default();
        let err = wizard.submit(&service).await.unwrap_err();
        assert_eq!(err, ImportError::StepIncomplete(WizardStep::Upload));
        assert!(service.themes().await.is_empty());
    }

    #[test]
    fn begin_import_guards_against_double_submit() {
        let mut wizard = ImportWizard::default();
        wizard.load_file("tokens.json", TOKENS).unwrap();
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        wizard.set_name("Light");
        let ticket = wizard.request_slug_check().unwrap();
        wizard.complete_slug_check(&ticket, SlugCheckOutcome::Checked(Ok(true)));
        wizard.advance().unwrap();

        let plan = wizard.begin_import().unwrap();
        assert_eq!(plan.theme.slug, "light");
        assert_eq!(plan.theme.source_file_name.as_deref(), Some("tokens.json"));
        assert_eq!(plan.theme.description, None);
        assert!(wizard.is_importing());
        assert_eq!(wizard.begin_import().unwrap_err(), ImportError::InProgress);

        wizard.finish_import(&Err(ImportError::CreateTheme(ServiceError("boom".into()))));
        assert!(!wizard.is_importing());
        assert_eq!(wizard.error(), Some("boom"));
    }
}
