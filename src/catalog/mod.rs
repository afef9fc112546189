//! Catalog module.
//!
//! Provides:
//! - The Entry / Book / Volume tree handed to the download engine
//! - The `CatalogSource` capability implemented per site
//! - An offline manifest-backed source

pub mod manifest;
pub mod model;
pub mod source;

pub use manifest::ManifestSource;
pub use model::{Book, Entry, MetadataEntry, Volume, VolumeRange};
pub use source::CatalogSource;
