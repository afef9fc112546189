//! The per-site catalog capability consumed by the engine.

use async_trait::async_trait;

use crate::catalog::model::Entry;
use crate::error::Result;

/// A site adapter that can resolve catalogs and list volume images.
///
/// The engine never references a concrete site; scraping, browser automation
/// and any other per-site state live behind this trait and are only touched
/// before a volume's images are fetched.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short identifier of the adapter, recorded as `Entry::source`.
    fn name(&self) -> &str;

    /// Resolve a query (usually a catalog page URL) into an entry tree.
    async fn resolve_catalog(&self, query: &str) -> Result<Entry>;

    /// List the image URLs of one volume, in reading order.
    ///
    /// An empty list is treated by the engine as a parse failure.
    async fn list_images(&self, volume_url: &str) -> Result<Vec<String>>;
}
