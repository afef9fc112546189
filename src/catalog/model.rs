//! Catalog tree representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single key/value pair of descriptive metadata (author, status, tags...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

/// One catalog item, as produced by a `CatalogSource`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    /// Display name. May contain characters that are illegal in paths.
    pub name: String,

    #[serde(default)]
    pub author: Option<String>,

    /// Source page URL.
    #[serde(default)]
    pub url: String,

    /// Identifier of the source adapter that produced this entry.
    #[serde(default)]
    pub source: String,

    /// Free-form metadata, in page order.
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,

    #[serde(default)]
    pub books: Vec<Book>,
}

/// A named grouping of volumes within an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
    pub name: String,

    /// Volumes in download order.
    #[serde(default)]
    pub vols: Vec<Volume>,
}

/// The smallest downloadable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    pub url: String,

    /// Name of the owning book. Lookup only.
    #[serde(default)]
    pub book_name: String,
}

impl Volume {
    /// Create a new volume belonging to `book_name`.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        book_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            book_name: book_name.into(),
        }
    }
}

impl Book {
    /// Create an empty book.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vols: Vec::new(),
        }
    }

    /// Append a volume, setting its back-reference to this book.
    pub fn push_volume(&mut self, name: impl Into<String>, url: impl Into<String>) {
        let vol = Volume::new(name, url, self.name.clone());
        self.vols.push(vol);
    }

    /// Select a contiguous slice of volumes.
    pub fn select(&self, range: VolumeRange) -> Result<&[Volume]> {
        let len = self.vols.len();
        if len == 0 {
            return Err(Error::InvalidRange(format!(
                "book '{}' has no volumes",
                self.name
            )));
        }

        let from = range.from.unwrap_or(0);
        let to = range.to.unwrap_or(len - 1);

        if from >= len {
            return Err(Error::InvalidRange(format!(
                "start index {} out of bounds (book '{}' has {} volumes)",
                from, self.name, len
            )));
        }
        if to >= len {
            return Err(Error::InvalidRange(format!(
                "end index {} out of bounds (book '{}' has {} volumes)",
                to, self.name, len
            )));
        }
        if from > to {
            return Err(Error::InvalidRange(format!(
                "start index {} is after end index {}",
                from, to
            )));
        }

        Ok(&self.vols[from..=to])
    }
}

impl Entry {
    /// Total number of volumes across all books.
    pub fn volume_count(&self) -> usize {
        self.books.iter().map(|b| b.vols.len()).sum()
    }

    /// Select a range of volumes from the book at `book_index`.
    pub fn select(&self, book_index: usize, range: VolumeRange) -> Result<(&Book, &[Volume])> {
        let book = self.books.get(book_index).ok_or_else(|| {
            Error::InvalidRange(format!(
                "book index {} out of bounds ({} books)",
                book_index,
                self.books.len()
            ))
        })?;
        let vols = book.select(range)?;
        Ok((book, vols))
    }
}

/// Inclusive, zero-based range of volume indices within a book.
///
/// Accepted forms: `a..b`, `..b`, `a..`, `..` and `a` (a single volume).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeRange {
    pub from: Option<usize>,
    pub to: Option<usize>,
}

impl VolumeRange {
    /// The whole book.
    pub fn all() -> Self {
        Self::default()
    }

    /// From the first volume up to and including `to`.
    pub fn up_to(to: usize) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// Between `from` and `to`, both inclusive.
    pub fn between(from: usize, to: usize) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }
}

impl fmt::Display for VolumeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(a), Some(b)) if a == b => write!(f, "{}", a),
            (Some(a), Some(b)) => write!(f, "{}..{}", a, b),
            (Some(a), None) => write!(f, "{}..", a),
            (None, Some(b)) => write!(f, "..{}", b),
            (None, None) => write!(f, ".."),
        }
    }
}

impl FromStr for VolumeRange {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let parse_index = |part: &str| -> Result<Option<usize>> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            part.parse::<usize>()
                .map(Some)
                .map_err(|_| Error::InvalidRange(format!("'{}' is not a volume index", part)))
        };

        match s.split_once("..") {
            Some((from, to)) => match (parse_index(from)?, parse_index(to)?) {
                (Some(from), Some(to)) => Ok(Self::between(from, to)),
                (None, Some(to)) => Ok(Self::up_to(to)),
                (from, None) => Ok(Self { from, to: None }),
            },
            None => match parse_index(s)? {
                Some(index) => Ok(Self::between(index, index)),
                None => Ok(Self::all()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_book(count: usize) -> Book {
        let mut book = Book::new("Chapters");
        for i in 1..=count {
            book.push_volume(i.to_string(), format!("http://x/{}", i));
        }
        book
    }

    #[test]
    fn test_push_volume_sets_book_name() {
        let book = make_book(2);
        assert_eq!(book.vols[0].book_name, "Chapters");
        assert_eq!(book.vols[1].name, "2");
    }

    #[test]
    fn test_select_all() {
        let book = make_book(5);
        assert_eq!(book.select(VolumeRange::all()).unwrap().len(), 5);
    }

    #[test]
    fn test_select_up_to_is_inclusive() {
        let book = make_book(5);
        let vols = book.select(VolumeRange::up_to(2)).unwrap();
        let names: Vec<_> = vols.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["1", "2", "3"]);
    }

    #[test]
    fn test_select_between() {
        let book = make_book(5);
        let vols = book.select(VolumeRange::between(3, 4)).unwrap();
        let names: Vec<_> = vols.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["4", "5"]);
    }

    #[test]
    fn test_select_out_of_bounds() {
        let book = make_book(3);
        assert!(book.select(VolumeRange::up_to(3)).is_err());
        assert!(book.select(VolumeRange::between(3, 3)).is_err());
        assert!(book.select(VolumeRange::between(2, 1)).is_err());
        assert!(Book::new("empty").select(VolumeRange::all()).is_err());
    }

    #[test]
    fn test_parse_range() {
        assert_eq!("2..5".parse::<VolumeRange>().unwrap(), VolumeRange::between(2, 5));
        assert_eq!("..5".parse::<VolumeRange>().unwrap(), VolumeRange::up_to(5));
        assert_eq!("..".parse::<VolumeRange>().unwrap(), VolumeRange::all());
        assert_eq!("4".parse::<VolumeRange>().unwrap(), VolumeRange::between(4, 4));
        assert_eq!(
            "3..".parse::<VolumeRange>().unwrap(),
            VolumeRange {
                from: Some(3),
                to: None
            }
        );
        assert!("a..b".parse::<VolumeRange>().is_err());
    }

    #[test]
    fn test_range_display() {
        assert_eq!(VolumeRange::between(1, 4).to_string(), "1..4");
        assert_eq!(VolumeRange::between(2, 2).to_string(), "2");
        assert_eq!(VolumeRange::all().to_string(), "..");
    }

    #[test]
    fn test_entry_select() {
        let entry = Entry {
            name: "X".into(),
            books: vec![Book {
                name: "Y".into(),
                vols: vec![Volume::new("1", "http://x/1", "Y")],
            }],
            ..Default::default()
        };

        let (book, vols) = entry.select(0, VolumeRange::all()).unwrap();
        assert_eq!(book.name, "Y");
        assert_eq!(vols.len(), 1);
        assert!(entry.select(1, VolumeRange::all()).is_err());
        assert_eq!(entry.volume_count(), 1);
    }
}
