//! Outfit descriptors loaded from a JSON array.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// One themed look. Missing document fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Outfit {
    pub name: String,
    pub theme: String,
    /// Required item ids.
    pub items: Vec<String>,
    pub colors: Vec<String>,
    pub image: String,
    /// Assembly instructions, in order.
    pub steps: Vec<String>,
}

#[derive(Debug)]
pub enum OutfitLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for OutfitLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read outfit library `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "malformed outfit library: {err}"),
        }
    }
}

impl Error for OutfitLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for OutfitLoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Immutable list of outfits, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutfitLibrary {
    outfits: Vec<Outfit>,
}

impl OutfitLibrary {
    pub fn new(outfits: Vec<Outfit>) -> Self {
        Self { outfits }
    }

    /// Parses a JSON array of outfit descriptors.
    pub fn from_json_str(text: &str) -> Result<Self, OutfitLoadError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    /// Outfits whose theme equals `theme`, ignoring case.
    pub fn for_theme<'a>(&'a self, theme: &str) -> impl Iterator<Item = &'a Outfit> + 'a {
        let wanted = theme.trim().to_lowercase();
        self.outfits
            .iter()
            .filter(move |outfit| outfit.theme.trim().to_lowercase() == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outfit> {
        self.outfits.iter()
    }

    pub fn len(&self) -> usize {
        self.outfits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outfits.is_empty()
    }
}

/// Loads an outfit library file.
pub fn load_outfits_from_path(path: impl AsRef<Path>) -> Result<OutfitLibrary, OutfitLoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| OutfitLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    OutfitLibrary::from_json_str(&text)
}
