//! Active theme and palette, and outfit matching against owned items.
//!
//! # Invariants
//! - Theme, palette, outfit items and colours compare lower-cased.
//! - An outfit is exact only when nothing is missing; otherwise it is near.

use super::library::{Outfit, OutfitLibrary};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleError {
    NoTheme,
    EmptyInventory,
    NoOutfitsForTheme(String),
}

impl Display for AssembleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTheme => write!(f, "no theme set; use `apply theme` first"),
            Self::EmptyInventory => write!(f, "inventory is empty; add items first"),
            Self::NoOutfitsForTheme(theme) => {
                write!(f, "no outfits available for theme `{theme}`")
            }
        }
    }
}

impl Error for AssembleError {}

/// One outfit compared against the owned items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitMatch<'a> {
    pub outfit: &'a Outfit,
    pub missing_items: BTreeSet<String>,
    pub missing_colors: BTreeSet<String>,
}

impl OutfitMatch<'_> {
    pub fn is_exact(&self) -> bool {
        self.missing_items.is_empty() && self.missing_colors.is_empty()
    }
}

/// Outfits of the active theme split into exact and near matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly<'a> {
    pub exact: Vec<OutfitMatch<'a>>,
    pub near: Vec<OutfitMatch<'a>>,
}

/// Active theme and colour palette of an interactive session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbench {
    theme: Option<String>,
    palette: Vec<String>,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the theme lower-cased.
    pub fn apply_theme(&mut self, theme: &str) {
        self.theme = Some(theme.trim().to_lowercase());
    }

    /// Replaces the palette; colours are trimmed, lower-cased, blanks dropped.
    pub fn set_palette<I, C>(&mut self, colors: I)
    where
        I: IntoIterator<Item = C>,
        C: AsRef<str>,
    {
        self.palette = colors
            .into_iter()
            .map(|color| color.as_ref().trim().to_lowercase())
            .filter(|color| !color.is_empty())
            .collect();
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    /// Matches the active theme's outfits against `owned` item ids.
    ///
    /// # Errors
    /// - `NoTheme` before `apply_theme`.
    /// - `EmptyInventory` when nothing is owned.
    /// - `NoOutfitsForTheme` when the library has no outfit for the theme.
    pub fn assemble<'a, I, S>(
        &self,
        library: &'a OutfitLibrary,
        owned: I,
    ) -> Result<Assembly<'a>, AssembleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let theme = self.theme.as_deref().ok_or(AssembleError::NoTheme)?;
        let owned: BTreeSet<String> = owned
            .into_iter()
            .map(|item| item.as_ref().to_lowercase())
            .collect();
        if owned.is_empty() {
            return Err(AssembleError::EmptyInventory);
        }

        let palette: Option<BTreeSet<&str>> = if self.palette.is_empty() {
            None
        } else {
            Some(self.palette.iter().map(String::as_str).collect())
        };

        let mut assembly = Assembly {
            exact: Vec::new(),
            near: Vec::new(),
        };
        for outfit in library.for_theme(theme) {
            let missing_items = outfit
                .items
                .iter()
                .map(|item| item.to_lowercase())
                .filter(|item| !owned.contains(item))
                .collect();
            let missing_colors = match &palette {
                Some(palette) => outfit
                    .colors
                    .iter()
                    .map(|color| color.to_lowercase())
                    .filter(|color| !palette.contains(color.as_str()))
                    .collect(),
                None => BTreeSet::new(),
            };
            let candidate = OutfitMatch {
                outfit,
                missing_items,
                missing_colors,
            };
            if candidate.is_exact() {
                assembly.exact.push(candidate);
            } else {
                assembly.near.push(candidate);
            }
        }

        if assembly.exact.is_empty() && assembly.near.is_empty() {
            return Err(AssembleError::NoOutfitsForTheme(theme.to_string()));
        }
        Ok(assembly)
    }
}
