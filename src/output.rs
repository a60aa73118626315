use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Expand a leading `~` to the home directory; other paths pass through.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Write `content` to `dir/filename`, creating `dir` as needed. Existing files are replaced.
pub fn write_markdown(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(filename);
    fs::write(&path, content).map_err(|source| Error::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), bytes = content.len(), "Wrote markdown");
    Ok(path)
}
