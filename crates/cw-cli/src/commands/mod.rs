pub mod cards;
pub mod journal;
pub mod read;
pub mod spreads;
pub mod theme;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cw_reading::JournalStore;
use cw_reading::config::DEFAULT_STORAGE_KEY;
use cw_reading::journal::FileStore;

/// Resolve the journal directory: explicit flag, else `~/.cosmic-whisper`.
fn journal_dir(dir: Option<&Path>) -> Result<PathBuf, String> {
    if let Some(dir) = dir {
        return Ok(dir.to_path_buf());
    }
    let home = std::env::var_os("HOME")
        .ok_or("cannot locate home directory; pass --journal-dir or set CW_JOURNAL_DIR")?;
    Ok(PathBuf::from(home).join(".cosmic-whisper"))
}

/// Open the file-backed journal store.
fn open_store(dir: Option<&Path>) -> Result<JournalStore, String> {
    let dir = journal_dir(dir)?;
    tracing::debug!(dir = %dir.display(), "using journal directory");
    Ok(JournalStore::new(
        Arc::new(FileStore::new(dir)),
        DEFAULT_STORAGE_KEY,
    ))
}

/// Shorten `text` to at most `max` characters, adding an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else if text.is_empty() {
        "—".to_string()
    } else {
        text.to_string()
    }
}
