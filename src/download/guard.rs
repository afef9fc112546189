//! Skip decision for volumes whose archive already exists.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::fs::naming::{archive_file_name, sanitize};

/// Maximum number of zeros the padding heuristic prepends.
const MAX_EXTRA_ZEROS: usize = 2;

fn leading_digits() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)(.*)$").unwrap())
}

/// Decides whether a volume can be skipped because its archive is on disk.
#[derive(Debug, Clone)]
pub struct ResumabilityGuard {
    archive_extension: String,
}

impl ResumabilityGuard {
    pub fn new(archive_extension: impl Into<String>) -> Self {
        Self {
            archive_extension: archive_extension.into(),
        }
    }

    /// Whether the volume's output already exists under `output_dir`.
    ///
    /// Always false when `overwrite` is set.
    pub fn should_skip(&self, output_dir: &Path, volume_name: &str, overwrite: bool) -> bool {
        if overwrite {
            return false;
        }
        match self.existing_archive(output_dir, volume_name) {
            Some(path) => {
                tracing::debug!("Found existing archive {}", path.display());
                true
            }
            None => false,
        }
    }

    /// Locate an existing archive for the volume, trying zero-padded variants
    /// of a leading chapter number ("5" also matches "05" and "005").
    fn existing_archive(&self, output_dir: &Path, volume_name: &str) -> Option<PathBuf> {
        candidate_names(&sanitize(volume_name))
            .into_iter()
            .map(|stem| output_dir.join(archive_file_name(&stem, &self.archive_extension)))
            .find(|path| path.is_file())
    }
}

/// The sanitized name followed by its zero-padded variants, if it starts
/// with ASCII digits.
fn candidate_names(sanitized: &str) -> Vec<String> {
    let mut names = vec![sanitized.to_string()];

    if let Some(caps) = leading_digits().captures(sanitized) {
        let digits = &caps[1];
        let rest = &caps[2];
        for zeros in 1..=MAX_EXTRA_ZEROS {
            names.push(format!("{}{}{}", "0".repeat(zeros), digits, rest));
        }
    }

    names
}
