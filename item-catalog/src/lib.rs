//! Reading game item catalogs.
//!
//! A catalog is a JSON file holding an array of item records. Each record
//! may carry an `id` and an `image` URL; records that have both are turned
//! into [`ItemAsset`]s, everything else is ignored.
pub mod catalog;
pub mod error;
pub mod record;

pub use catalog::{CatalogEntry, CatalogFile, CatalogSet, DEFAULT_CATALOG_FILES};
pub use error::Error;
pub use record::{is_truthy, ItemAsset, ItemId, ItemRecord, IMAGE_EXTENSION};
