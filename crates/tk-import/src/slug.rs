//! Theme slugs: derivation, validation, and debounced availability checks.
//!
//! Availability checks are tagged with a generation number. Requesting a new
//! check supersedes every earlier ticket, so a slow response for an old slug
//! can never overwrite the answer for the current one.

use crate::service::{ServiceError, ThemeService};
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("invalid slug pattern")
});

/// Derive a slug from a display name: `"Dark Mode 2"` → `"dark-mode-2"`.
pub fn slugify(name: &str) -> String {
    tk_core::naming::slug_segment(name)
}

/// Lowercase alphanumerics separated by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_PATTERN.is_match(slug)
}

/// A pending availability check for one slug.
#[derive(Debug, Clone)]
pub struct SlugTicket {
    pub slug: String,
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl SlugTicket {
    /// Whether no newer check has been requested since this one.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

/// Issues generation-tagged tickets; the newest ticket is the only live one.
#[derive(Debug, Clone, Default)]
pub struct SlugChecker {
    latest: Arc<AtomicU64>,
}

impl SlugChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new check, superseding all outstanding tickets.
    pub fn request(&self, slug: &str) -> SlugTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        SlugTicket {
            slug: slug.to_string(),
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Invalidate all outstanding tickets without starting a new check.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

/// Result of a debounced check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugCheckOutcome {
    /// A newer request arrived during the debounce window or the call.
    Superseded,
    Checked(Result<bool, ServiceError>),
}

/// Wait out the debounce window, then ask the service, unless superseded.
pub async fn check_slug<S: ThemeService + ?Sized>(
    service: &S,
    ticket: &SlugTicket,
    debounce: Duration,
) -> SlugCheckOutcome {
    tokio::time::sleep(debounce).await;
    if !ticket.is_current() {
        log::debug!("slug check for `{}` superseded before sending", ticket.slug);
        return SlugCheckOutcome::Superseded;
    }

    let answer = service.is_slug_available(&ticket.slug).await;
    if !ticket.is_current() {
        log::debug!("slug check for `{}` superseded in flight", ticket.slug);
        return SlugCheckOutcome::Superseded;
    }
    SlugCheckOutcome::Checked(answer)
}
