//! Integration tests: full wizard flow against the in-memory theme service.

use pretty_assertions::assert_eq;
use std::time::Duration;
use tk_core::Category;
use tk_import::*;

const FIXTURE: &[u8] = include_bytes!("fixtures/figma_light.json");

fn quick_wizard() -> ImportWizard {
    ImportWizard::new(ImportConfig {
        slug_debounce: Duration::from_millis(1),
        ..ImportConfig::default()
    })
}

/// Drive a wizard from upload to review with an available slug.
async fn wizard_at_review(service: &MemoryThemeService, name: &str) -> ImportWizard {
    let mut wizard = quick_wizard();
    wizard.load_file("figma_light.json", FIXTURE).expect("fixture loads");
    wizard.advance().expect("upload → mapping");

    wizard.override_category("Motion/reduced", Category::Shadow);
    wizard.advance().expect("mapping → details");

    wizard.set_name(name);
    wizard.set_description("Imported from Figma");
    assert!(wizard.refresh_slug_status(service).await);
    wizard.advance().expect("details → review");
    wizard
}

// ─── Happy path ──────────────────────────────────────────────────────────

#[tokio::test]
async fn import_creates_theme_and_rows() {
    let service = MemoryThemeService::new();
    let mut wizard = wizard_at_review(&service, "Acme Light").await;

    let outcome = wizard.submit(&service).await.expect("import succeeds");
    assert_eq!(outcome.token_count, 14);
    assert_eq!(outcome.theme.theme.slug, "acme-light");
    assert_eq!(outcome.theme.theme.status, ThemeStatus::Draft);
    assert_eq!(outcome.theme.theme.source, "figma");
    assert_eq!(
        outcome.theme.theme.description.as_deref(),
        Some("Imported from Figma")
    );
    assert!(!wizard.is_importing());
    assert_eq!(wizard.completed(), Some(&outcome));

    let rows = service.tokens().await;
    assert_eq!(rows.len(), 14);
    let orders: Vec<i64> = rows.iter().map(|r| r.sort_order).collect();
    assert_eq!(orders, (0..14).collect::<Vec<i64>>());
    assert!(rows.iter().all(|r| r.theme_id == outcome.theme.id));

    let motion = rows.iter().find(|r| r.name == "reduced").expect("motion row");
    assert_eq!(motion.category, Category::Shadow);
    assert_eq!(motion.css_variable, "--shadow-reduced");
}

#[tokio::test]
async fn taken_slug_blocks_details_step() {
    let service = MemoryThemeService::new();
    let mut first = wizard_at_review(&service, "Acme").await;
    first.submit(&service).await.expect("first import");

    let mut wizard = quick_wizard();
    wizard.load_file("figma_light.json", FIXTURE).unwrap();
    wizard.advance().unwrap();
    wizard.advance().unwrap();
    wizard.set_name("Acme");
    assert!(wizard.refresh_slug_status(&service).await);

    assert_eq!(wizard.slug_status(), &SlugStatus::Taken);
    assert_eq!(
        wizard.advance(),
        Err(ImportError::StepIncomplete(WizardStep::Details))
    );
}

// ─── Failures ────────────────────────────────────────────────────────────

#[tokio::test]
async fn theme_failure_surfaces_message_verbatim() {
    let service = MemoryThemeService::new();
    let mut wizard = wizard_at_review(&service, "Acme").await;
    service.fail_next_create("permission denied for table themes").await;

    let err = wizard.submit(&service).await.unwrap_err();
    assert_eq!(err.to_string(), "permission denied for table themes");
    assert_eq!(wizard.error(), Some("permission denied for table themes"));
    assert!(service.themes().await.is_empty());
}

#[tokio::test]
async fn token_failure_keeps_created_theme() {
    let service = MemoryThemeService::new();
    let mut wizard = wizard_at_review(&service, "Acme").await;
    service.fail_next_tokens("value too long for column").await;

    let err = wizard.submit(&service).await.unwrap_err();
    assert_eq!(err.to_string(), "value too long for column");
    match &err {
        ImportError::CreateTokens { theme_id, .. } => assert_eq!(theme_id, "theme-1"),
        other => panic!("expected CreateTokens, got {other:?}"),
    }

    // No rollback: the theme stays, without tokens
    assert_eq!(service.themes().await.len(), 1);
    assert!(service.tokens().await.is_empty());
    assert!(!wizard.is_importing());
    assert_eq!(wizard.completed(), None);
}

#[tokio::test]
async fn superseded_slug_check_is_dropped() {
    let service = MemoryThemeService::new();
    let mut wizard = quick_wizard();
    wizard.set_name("Acme Dark");
    let stale = wizard.request_slug_check().unwrap();
    wizard.set_name("Acme Night");

    let outcome = check_slug(&service, &stale, wizard.config().slug_debounce).await;
    assert_eq!(outcome, SlugCheckOutcome::Superseded);
    assert!(!wizard.complete_slug_check(&stale, outcome));
    assert_eq!(wizard.slug_status(), &SlugStatus::Unchecked);
}

#[tokio::test]
async fn split_submission_releases_guard() {
    let service = MemoryThemeService::new();
    let mut wizard = wizard_at_review(&service, "Acme").await;

    let plan = wizard.begin_import().expect("plan");
    assert_eq!(plan.tokens.len(), 14);
    assert!(wizard.is_importing());

    let outcome = run_import(&service, plan).await;
    wizard.finish_import(&outcome);
    assert!(outcome.is_ok());
    assert!(!wizard.is_importing());
}
