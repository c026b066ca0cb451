//! Static item catalog: loading, lookup and asset path resolution.
//!
//! # Responsibility
//! - Parse the catalog JSON document into an immutable `Catalog` value.
//! - Answer theme and item lookups for presentation and services.
//! - Resolve item image references to paths under the asset root.
//!
//! # Invariants
//! - A catalog is either fully loaded or rejected; no partial catalog exists.
//! - Themes and items keep document order.
//! - No API mutates a loaded catalog.

mod assets;
mod loader;

pub use assets::{theme_folder, AssetResolver};
pub use loader::{load_catalog_from_path, BlankItemQuery, Catalog, CatalogLoadError, ItemRef};

/// Default catalog file name, relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "cosmetics_catalog.json";
/// Default asset root, relative to the working directory.
pub const DEFAULT_ASSET_ROOT: &str = "cosmetics_images";
