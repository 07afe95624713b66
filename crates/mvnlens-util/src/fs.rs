use std::path::{Path, PathBuf};

use crate::errors::LensError;

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the directory containing the file, or `None`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Read a whole text file, naming the path in the error.
pub fn read_text(path: &Path) -> Result<String, LensError> {
    std::fs::read_to_string(path).map_err(|e| LensError::Input {
        message: format!("failed to read {}: {e}", path.display()),
    })
}

/// Read a text file, replacing any bytes that are not UTF-8 with U+FFFD.
///
/// The flag is `true` when something had to be replaced.
pub fn read_text_lossy(path: &Path) -> Result<(String, bool), LensError> {
    let bytes = std::fs::read(path).map_err(|e| LensError::Input {
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok((text, false)),
        Err(e) => Ok((String::from_utf8_lossy(e.as_bytes()).into_owned(), true)),
    }
}
