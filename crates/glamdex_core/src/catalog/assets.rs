//! Image asset path resolution.
//!
//! Only paths are resolved here; reading pixels is left to the presentation
//! layer.

use crate::model::item::Item;
use std::path::{Path, PathBuf};

/// Resolves item image references against an asset root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the asset path for `item`.
    ///
    /// References containing `/` are taken as already theme-relative; bare file
    /// names are placed under the item's theme folder.
    pub fn resolve(&self, item: &Item) -> PathBuf {
        self.resolve_reference(&item.theme, &item.image)
    }

    /// Resolves a raw image reference that belongs to `theme`.
    pub fn resolve_reference(&self, theme: &str, image: &str) -> PathBuf {
        let reference = image.trim_start_matches('/');
        if reference.contains('/') {
            self.root.join(reference)
        } else {
            self.root.join(theme_folder(theme)).join(reference)
        }
    }

    /// Whether the resolved asset is present on disk.
    pub fn exists(&self, item: &Item) -> bool {
        self.resolve(item).is_file()
    }
}

/// Folder name for a theme label: spaces become underscores.
pub fn theme_folder(theme: &str) -> String {
    theme.trim().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::{theme_folder, AssetResolver};
    use crate::model::item::Item;
    use std::path::PathBuf;

    #[test]
    fn nested_reference_is_joined_as_is() {
        let resolver = AssetResolver::new("assets");
        let item = Item::new("e1", "Mascara", "Eyes", "eyes/e1.png");
        assert_eq!(resolver.resolve(&item), PathBuf::from("assets/eyes/e1.png"));
    }

    #[test]
    fn bare_file_name_goes_under_theme_folder() {
        let resolver = AssetResolver::new("assets");
        let item = Item::new("df1", "Veil", "dark fantasy", "veil.png");
        assert_eq!(
            resolver.resolve(&item),
            PathBuf::from("assets/dark_fantasy/veil.png")
        );
    }

    #[test]
    fn theme_folder_replaces_spaces() {
        assert_eq!(theme_folder(" soft glam "), "soft_glam");
    }
}
