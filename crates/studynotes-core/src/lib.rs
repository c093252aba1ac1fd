//! All backend logic independent of how the app is run (CLI or a UI shell).
//!
//! Notes live only in memory for the life of the process. The only thing stored on
//! disk is the backend config in the app data directory (see [app_data]).

pub mod app_data;
pub mod auth;
pub mod backend;
pub mod config;
pub mod notes;
pub mod search;
pub mod store;
pub mod validate;

pub use app_data::app_data_dir;
pub use auth::{AuthService, AuthState};
pub use backend::{AuthBackend, BackendError, BackendKind, UserProfile};
pub use config::{
    load_config, load_config_from, save_config, set_backend_field, BackendConfig, Config,
    ConfigError,
};
pub use notes::{Note, NoteId};
pub use search::{
    courses, filter_notes, sort_notes, CourseFilter, NoteFilter, RecentSearches, SortOrder,
    ALL_COURSES,
};
pub use store::{NotesStore, StoreError};
pub use validate::{GamePin, NoteDraft, SignInForm, SignUpForm, ValidationError};

/// Returns a short status string. Used to verify the backend is wired up.
pub fn status() -> &'static str {
    "studynotes-core ready"
}
