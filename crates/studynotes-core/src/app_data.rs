//! Where studynotes keeps its own data (config only; notes are never written to disk).

use std::path::PathBuf;

/// Returns the directory where studynotes stores its config.
/// On macOS: `~/Library/Application Support/StudyNotes/`.
/// Creates the directory if it doesn't exist; returns `None` if we can't determine the path.
pub fn app_data_dir() -> Option<PathBuf> {
    let dir = directories::ProjectDirs::from("app", "StudyNotes", "StudyNotes")?
        .data_local_dir()
        .to_path_buf();
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
