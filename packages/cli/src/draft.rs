//! Generator draft persistence.
//!
//! Starting a checkout kicks the user out to the browser; the title and
//! description they typed are saved here so the form survives the round
//! trip and the next `generate` run can offer to resume it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("no cache directory available on this platform")]
    NoCacheDir,
    #[error("draft I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("draft is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An unsubmitted generator form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorDraft {
    pub title: String,
    pub description: String,
    pub saved_at: DateTime<Utc>,
}

impl GeneratorDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            saved_at: Utc::now(),
        }
    }
}

/// Default draft location under the platform cache directory.
pub fn default_path() -> Result<PathBuf, DraftError> {
    let cache = dirs::cache_dir().ok_or(DraftError::NoCacheDir)?;
    Ok(cache.join("atelier").join("draft.json"))
}

pub fn save(path: &Path, draft: &GeneratorDraft) -> Result<(), DraftError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(draft)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "saved generator draft");
    Ok(())
}

/// Load the saved draft, if any. A missing file is `Ok(None)`; a
/// corrupt one is an error so the caller can report it rather than
/// silently discarding the user's text.
pub fn load(path: &Path) -> Result<Option<GeneratorDraft>, DraftError> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn clear(path: &Path) -> Result<(), DraftError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn draft_path(dir: &TempDir) -> PathBuf {
        dir.path().join("atelier").join("draft.json")
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = draft_path(&dir);

        let draft = GeneratorDraft::new("Portfolio site", "Three pages and a contact form");
        save(&path, &draft).unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded, draft);
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load(&draft_path(&dir)).unwrap(), None);
    }

    #[test]
    fn corrupt_draft_is_an_error_not_none() {
        let dir = TempDir::new().unwrap();
        let path = draft_path(&dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        assert!(load(&path).is_err());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = draft_path(&dir);

        save(&path, &GeneratorDraft::new("t", "d")).unwrap();
        clear(&path).unwrap();
        clear(&path).unwrap();
        assert_eq!(load(&path).unwrap(), None);
    }
}
