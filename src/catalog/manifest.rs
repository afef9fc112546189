//! Offline catalog source backed by JSON manifest files.
//!
//! A manifest describes one entry and the image list of each of its volumes:
//!
//! ```json
//! {
//!   "entry": {
//!     "name": "X",
//!     "metadata": [{ "key": "Status", "value": "Ongoing" }],
//!     "books": [{
//!       "name": "Y",
//!       "reverse_volumes": false,
//!       "vols": [{ "name": "1", "url": "http://x/1" }]
//!     }]
//!   },
//!   "images": { "http://x/1": ["http://img/a.jpg", "http://img/b.jpg"] }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::catalog::model::{Book, Entry, MetadataEntry, Volume};
use crate::catalog::source::CatalogSource;
use crate::error::{Error, Result};

/// Identifier recorded on entries produced by this source.
pub const SOURCE_NAME: &str = "manifest";

/// Top-level manifest document.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub entry: ManifestEntry,

    /// Image URLs keyed by volume URL.
    #[serde(default)]
    pub images: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
    #[serde(default)]
    pub books: Vec<ManifestBook>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestBook {
    pub name: String,

    /// Set when `vols` is listed newest-first.
    #[serde(default)]
    pub reverse_volumes: bool,

    #[serde(default)]
    pub vols: Vec<ManifestVolume>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestVolume {
    pub name: String,
    pub url: String,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(text)?;
        if manifest.entry.name.trim().is_empty() {
            return Err(Error::Parse("manifest entry has no name".into()));
        }
        Ok(manifest)
    }

    /// Build the entry tree, restoring ascending volume order where needed.
    pub fn to_entry(&self, query: &str) -> Entry {
        let books = self
            .entry
            .books
            .iter()
            .filter_map(|mb| {
                let mut book = Book::new(mb.name.clone());
                for mv in &mb.vols {
                    if mv.url.trim().is_empty() {
                        tracing::warn!(
                            "Volume '{}' in '{}' has no URL, skipped",
                            mv.name,
                            mb.name
                        );
                        continue;
                    }
                    let volume = Volume::new(mv.name.clone(), mv.url.clone(), mb.name.clone());
                    book.vols.push(volume);
                }
                if mb.reverse_volumes {
                    book.vols.reverse();
                }
                if book.vols.is_empty() {
                    tracing::warn!("Book '{}' has no valid volumes, skipped", mb.name);
                    None
                } else {
                    Some(book)
                }
            })
            .collect();

        let url = if self.entry.url.is_empty() {
            query.to_string()
        } else {
            self.entry.url.clone()
        };

        Entry {
            name: self.entry.name.clone(),
            author: self.entry.author.clone(),
            url,
            source: SOURCE_NAME.to_string(),
            metadata: self.entry.metadata.clone(),
            books,
        }
    }
}

/// Catalog source that treats each query as a path to a manifest file.
#[derive(Debug, Default)]
pub struct ManifestSource {
    images: RwLock<HashMap<String, Vec<String>>>,
}

impl ManifestSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-parsed manifest and return its entry.
    pub async fn register(&self, manifest: &Manifest, query: &str) -> Entry {
        let mut images = self.images.write().await;
        for (url, list) in &manifest.images {
            images.insert(url.clone(), list.clone());
        }
        manifest.to_entry(query)
    }

    async fn load(&self, path: &Path) -> Result<Entry> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Manifest not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        let manifest = Manifest::from_json(&text)?;
        Ok(self.register(&manifest, &path.display().to_string()).await)
    }
}

#[async_trait]
impl CatalogSource for ManifestSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn resolve_catalog(&self, query: &str) -> Result<Entry> {
        let entry = self.load(Path::new(query)).await?;
        tracing::info!(
            "Resolved '{}': {} book(s), {} volume(s)",
            entry.name,
            entry.books.len(),
            entry.volume_count()
        );
        Ok(entry)
    }

    async fn list_images(&self, volume_url: &str) -> Result<Vec<String>> {
        let images = self.images.read().await;
        images
            .get(volume_url)
            .map(|list| {
                list.iter()
                    .filter(|u| !u.trim().is_empty())
                    .cloned()
                    .collect()
            })
            .ok_or_else(|| Error::Parse(format!("No image list for volume {}", volume_url)))
    }
}
