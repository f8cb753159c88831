//! Command implementations. Each returns the text to print on stdout.

use anyhow::{Context, Result, bail};
use std::fmt::Write;
use std::path::Path;
use tk_core::{
    CategoryFilter, CssConfig, LintSeverity, emit_stylesheet, filter_by_category, lint_tokens,
    search_tokens, token_stats,
};
use tk_import::{
    ImportConfig, LoadedFile, MemoryThemeService, NewTheme, ThemeService, ThemeStatus,
    load_token_file, run_import, slugify, wizard::ImportPlan,
};

/// Read and check a token file the same way the dashboard upload does.
pub fn load(path: &Path, config: &ImportConfig) -> Result<LoadedFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(load_token_file(&name, &bytes, config)?)
}

pub fn validate(file: &LoadedFile) -> String {
    let d = &file.report.detected;
    let mut out = String::new();
    let _ = writeln!(out, "{}: valid", file.name);
    let _ = writeln!(
        out,
        "  color: {}  typography: {}  spacing: {}  grid: {}",
        d.has_color, d.has_typography, d.has_spacing, d.has_grid
    );
    for warning in file.warnings() {
        let _ = writeln!(out, "  warning: {warning}");
    }
    out
}

pub fn parse(file: &LoadedFile, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        serde_json::to_string_pretty(&file.result)?
    } else {
        serde_json::to_string(&file.result)?
    };
    json.push('\n');
    Ok(json)
}

pub fn stats(file: &LoadedFile) -> String {
    let stats = token_stats(&file.result);
    let mut out = String::new();
    let _ = writeln!(out, "{} tokens", stats.total);
    if let Some(mode) = &file.result.metadata.mode_name {
        let _ = writeln!(out, "mode: {mode}");
    }
    out.push_str("by category:\n");
    for (category, count) in &stats.by_category {
        let _ = writeln!(out, "  {category:<12} {count}");
    }
    out.push_str("by type:\n");
    for (ty, count) in &stats.by_type {
        let _ = writeln!(out, "  {ty:<12} {count}");
    }
    out
}

pub fn search(file: &LoadedFile, query: &str, category: &str) -> Result<String> {
    let filter: CategoryFilter = category.parse().map_err(anyhow::Error::msg)?;
    let scoped = filter_by_category(&file.result.tokens, filter);
    let mut out = String::new();
    for token in search_tokens(&scoped, query) {
        let _ = writeln!(out, "{:<40} {}", token.css_variable, token.path);
    }
    Ok(out)
}

pub fn css(file: &LoadedFile, selector: &str, comments: bool, category: &str) -> Result<String> {
    let filter: CategoryFilter = category.parse().map_err(anyhow::Error::msg)?;
    let tokens = filter_by_category(&file.result.tokens, filter);
    let config = CssConfig {
        selector: selector.to_string(),
        group_comments: comments,
    };
    Ok(emit_stylesheet(&tokens, &config))
}

/// Lint output plus whether any warning-level finding was reported.
pub fn lint(file: &LoadedFile) -> (String, bool) {
    let diags = lint_tokens(&file.result.tokens);
    let mut out = String::new();
    let mut failed = false;
    for d in &diags {
        let level = match d.severity {
            LintSeverity::Warning => {
                failed = true;
                "warning"
            }
            LintSeverity::Info => "info",
        };
        let _ = writeln!(out, "{level}[{}] {}", d.rule, d.message);
    }
    if diags.is_empty() {
        out.push_str("no issues\n");
    }
    (out, failed)
}

/// Dry-run an import into an in-memory theme service.
pub async fn import_dry_run(
    file: &LoadedFile,
    name: &str,
    slug: Option<&str>,
    description: Option<&str>,
) -> Result<String> {
    let slug = slug.map(str::to_string).unwrap_or_else(|| slugify(name));
    if !tk_import::is_valid_slug(&slug) {
        bail!("invalid slug `{slug}`");
    }

    let service = MemoryThemeService::new();
    if !service.is_slug_available(&slug).await? {
        bail!("slug `{slug}` is taken");
    }

    let plan = ImportPlan {
        theme: NewTheme {
            name: name.to_string(),
            slug,
            description: description.map(str::to_string),
            source: tk_import::wizard::IMPORT_SOURCE.to_string(),
            source_file_name: Some(file.name.clone()),
            status: ThemeStatus::Draft,
        },
        tokens: file.result.tokens.clone(),
    };
    let outcome = run_import(&service, plan).await?;

    let mut out = serde_json::to_string_pretty(&outcome.theme)?;
    let _ = write!(out, "\n{} token rows\n", outcome.token_count);
    Ok(out)
}
