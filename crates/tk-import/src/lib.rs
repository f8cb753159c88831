pub mod config;
pub mod service;
pub mod session;
pub mod slug;
pub mod upload;
pub mod wizard;

pub use config::ImportConfig;
pub use service::{
    MemoryThemeService, NewTheme, ServiceError, ThemeRecord, ThemeService, ThemeStatus, TokenRow,
};
pub use session::ThemeSession;
pub use slug::{SlugCheckOutcome, SlugChecker, SlugTicket, check_slug, is_valid_slug, slugify};
pub use upload::{LoadedFile, UploadError, load_token_file};
pub use wizard::{
    ImportError, ImportOutcome, ImportPlan, ImportWizard, SlugStatus, ThemeDetails, WizardStep,
    run_import,
};
