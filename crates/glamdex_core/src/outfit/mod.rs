//! Outfit library and assembly against owned items.
//!
//! # Responsibility
//! - Load the optional outfit library (themed looks built from catalog items).
//! - Match outfits of the active theme against owned items and colour palette.
//!
//! # Invariants
//! - Theme, item and colour comparisons are case-insensitive.
//! - Without a palette, colours never make a match partial.

mod library;
mod workbench;

pub use library::{load_outfits_from_path, Outfit, OutfitLibrary, OutfitLoadError};
pub use workbench::{AssembleError, Assembly, OutfitMatch, Workbench};
