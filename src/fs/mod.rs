//! Filesystem module.
//!
//! Provides:
//! - Name sanitization for path segments
//! - Image and archive file naming
//! - Output directory layout

pub mod naming;
pub mod paths;

pub use naming::{
    archive_file_name, image_file_name, image_index, sanitize, IMAGE_INDEX_WIDTH,
};
pub use paths::{ensure_dir, path_segment, staging_dir, volume_output_dir};
