//! Output directory layout.
//!
//! ```text
//! root/<entry>/<book>/<volume>.<archive ext>
//! root/<entry>/<book>/<volume>/0001.<image ext> ...
//! ```

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fs::naming::sanitize;

/// Sanitize a display name and check that it can be used as a single path
/// segment.
pub fn path_segment(name: &str) -> Result<String> {
    let segment = sanitize(name);
    let trimmed = segment.trim();

    if trimmed.is_empty() {
        return Err(Error::InvalidFilename(format!(
            "name cannot be empty or whitespace-only: '{}'",
            name
        )));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidFilename(format!(
            "name refers to a relative directory: '{}'",
            name
        )));
    }
    if segment.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "null bytes not allowed: '{}'",
            name
        )));
    }

    Ok(segment)
}

/// Directory holding the archives of one book.
pub fn volume_output_dir(root: &Path, entry_name: &str, book_name: &str) -> Result<PathBuf> {
    Ok(root
        .join(path_segment(entry_name)?)
        .join(path_segment(book_name)?))
}

/// Staging directory for one volume's images, a sibling of its archive.
pub fn staging_dir(output_dir: &Path, volume_name: &str) -> Result<PathBuf> {
    Ok(output_dir.join(path_segment(volume_name)?))
}

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        tokio::fs::create_dir_all(path).await?;
    }
    Ok(())
}
