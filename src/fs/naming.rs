//! File name generation and sanitization.

/// Characters that are never written into a path segment.
const FORBIDDEN_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Replacement for forbidden characters.
const REPLACEMENT: char = '-';

/// Number of digits used for image file names (`0007.jpg`).
pub const IMAGE_INDEX_WIDTH: usize = 4;

/// Map a display name to a path segment by replacing forbidden characters
/// with a hyphen.
///
/// All other characters, including non-ASCII ones, are kept as they are, so
/// the mapping is idempotent. Distinct names may collide after sanitizing.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if FORBIDDEN_CHARS.contains(&c) {
                REPLACEMENT
            } else {
                c
            }
        })
        .collect()
}

/// File name of the image at 1-based position `index`.
pub fn image_file_name(index: usize, extension: &str) -> String {
    format!("{:0width$}.{}", index, extension, width = IMAGE_INDEX_WIDTH)
}

/// File name of a volume's archive.
pub fn archive_file_name(volume_name: &str, extension: &str) -> String {
    format!("{}.{}", sanitize(volume_name), extension)
}

/// Index encoded in an image file name produced by [`image_file_name`].
pub fn image_index(file_name: &str, extension: &str) -> Option<usize> {
    let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;
    if stem.len() < IMAGE_INDEX_WIDTH || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_forbidden() {
        assert_eq!(sanitize("A/B:C"), "A-B-C");
        assert_eq!(sanitize(r#"a\b*c?d"e<f>g|h"#), "a-b-c-d-e-f-g-h");
    }

    #[test]
    fn test_sanitize_keeps_other_chars() {
        assert_eq!(sanitize("第1话 上篇"), "第1话 上篇");
        assert_eq!(sanitize("Vol. 3 (end)"), "Vol. 3 (end)");
    }

    #[test]
    fn test_sanitize_idempotent() {
        for name in ["A/B:C", "第2话：下", "plain", "<<>>", ""] {
            let once = sanitize(name);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_image_file_name() {
        assert_eq!(image_file_name(7, "jpg"), "0007.jpg");
        assert_eq!(image_file_name(1234, "png"), "1234.png");
        assert_eq!(image_file_name(12345, "jpg"), "12345.jpg");
    }

    #[test]
    fn test_image_index() {
        assert_eq!(image_index("0007.jpg", "jpg"), Some(7));
        assert_eq!(image_index("12345.jpg", "jpg"), Some(12345));
        assert_eq!(image_index(&image_file_name(42, "png"), "png"), Some(42));
        assert_eq!(image_index("0007.png", "jpg"), None);
        assert_eq!(image_index("7.jpg", "jpg"), None);
        assert_eq!(image_index("cover.jpg", "jpg"), None);
        assert_eq!(image_index("0007jpg", "jpg"), None);
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name("1/2", "zip"), "1-2.zip");
        assert_eq!(archive_file_name("005", "cbz"), "005.cbz");
    }
}
