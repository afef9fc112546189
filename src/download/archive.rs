//! Zip packaging of a volume's staging directory.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::fs::naming::archive_file_name;

/// Outcome of packing a staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveResult {
    /// The archive was written with `files` entries.
    Packed { path: PathBuf, files: usize },
    /// The directory was missing or empty.
    NothingToArchive,
}

/// Packs a staging directory into `<dir name>.<ext>` next to it.
#[derive(Debug, Clone)]
pub struct Archiver {
    extension: String,
}

impl Archiver {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Path of the archive for a staging directory.
    pub fn archive_path(&self, target_dir: &Path) -> Result<PathBuf> {
        let name = target_dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidFilename(target_dir.display().to_string()))?;
        Ok(target_dir.with_file_name(archive_file_name(name, &self.extension)))
    }

    /// Pack every file of `target_dir`. The directory is left in place.
    pub async fn pack(&self, target_dir: &Path) -> Result<ArchiveResult> {
        let archive_path = self.archive_path(target_dir)?;
        let target_dir = target_dir.to_path_buf();

        tokio::task::spawn_blocking(move || pack_dir(&target_dir, &archive_path))
            .await
            .map_err(|e| Error::Io(io::Error::other(format!("archive task failed: {}", e))))?
    }
}

/// Regular files of `dir`, sorted by name.
fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn pack_dir(dir: &Path, archive_path: &Path) -> Result<ArchiveResult> {
    if !dir.is_dir() {
        return Ok(ArchiveResult::NothingToArchive);
    }

    let files = list_files(dir)?;
    if files.is_empty() {
        return Ok(ArchiveResult::NothingToArchive);
    }

    // the final name only ever refers to a complete archive
    let mut part_name = archive_path.as_os_str().to_os_string();
    part_name.push(".part");
    let part_path = PathBuf::from(part_name);

    let written = write_zip(&files, &part_path)
        .and_then(|()| std::fs::rename(&part_path, archive_path).map_err(Error::from));
    if let Err(e) = written {
        if let Err(cleanup) = std::fs::remove_file(&part_path) {
            if cleanup.kind() != io::ErrorKind::NotFound {
                tracing::warn!("Could not remove {}: {}", part_path.display(), cleanup);
            }
        }
        return Err(e);
    }

    Ok(ArchiveResult::Packed {
        path: archive_path.to_path_buf(),
        files: files.len(),
    })
}

fn write_zip(files: &[PathBuf], output: &Path) -> Result<()> {
    let file = File::create(output)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidFilename(path.display().to_string()))?;
        zip.start_file(name, options)?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut zip)?;
    }

    let mut out = zip.finish()?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[tokio::test]
    async fn test_missing_dir_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let archiver = Archiver::new("zip");
        let result = archiver.pack(&tmp.path().join("nope")).await.unwrap();
        assert_eq!(result, ArchiveResult::NothingToArchive);
        assert!(!tmp.path().join("nope.zip").exists());
    }

    #[tokio::test]
    async fn test_empty_dir_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("1");
        std::fs::create_dir(&dir).unwrap();

        let result = Archiver::new("zip").pack(&dir).await.unwrap();
        assert_eq!(result, ArchiveResult::NothingToArchive);
        assert!(!tmp.path().join("1.zip").exists());
    }

    #[tokio::test]
    async fn test_pack_writes_sibling_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("第1话");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("0002.jpg"), b"two").unwrap();
        std::fs::write(dir.join("0001.jpg"), b"one").unwrap();
        std::fs::create_dir(dir.join("nested")).unwrap();

        let result = Archiver::new("zip").pack(&dir).await.unwrap();
        let archive_path = tmp.path().join("第1话.zip");
        assert_eq!(
            result,
            ArchiveResult::Packed {
                path: archive_path.clone(),
                files: 2
            }
        );

        // staging directory is kept
        assert!(dir.join("0001.jpg").exists());
        assert!(!tmp.path().join("第1话.zip.part").exists());

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "0001.jpg");
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "one");
    }

    #[tokio::test]
    async fn test_failed_rename_removes_part_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("1");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("0001.jpg"), b"one").unwrap();
        // a directory where the archive should go makes the final rename fail
        std::fs::create_dir(tmp.path().join("1.zip")).unwrap();

        let result = Archiver::new("zip").pack(&dir).await;
        assert!(result.is_err());
        assert!(dir.join("0001.jpg").is_file());
        assert!(!tmp.path().join("1.zip.part").exists());
    }

    #[test]
    fn test_archive_path() {
        let archiver = Archiver::new("cbz");
        let path = archiver.archive_path(Path::new("/out/X/Y/5")).unwrap();
        assert_eq!(path, PathBuf::from("/out/X/Y/5.cbz"));
    }
}
