//! Import boundary configuration.

use std::time::Duration;

/// Limits and timings for `load_token_file` and the import wizard.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Largest accepted upload, in bytes. Default: 5 MiB.
    pub max_file_size: usize,
    /// Accepted file extension, compared case-insensitively. Default: `json`.
    pub allowed_extension: String,
    /// Quiet period before a slug availability check fires. Default: 400 ms.
    pub slug_debounce: Duration,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024,
            allowed_extension: "json".to_string(),
            slug_debounce: Duration::from_millis(400),
        }
    }
}
