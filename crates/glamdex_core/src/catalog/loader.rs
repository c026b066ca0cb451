//! Catalog document parsing and lookup.

use crate::model::item::Item;
use log::{error, info};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Catalog document could not be turned into a usable catalog.
#[derive(Debug)]
pub enum CatalogLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    InvalidShape(String),
    MissingField {
        theme: String,
        index: usize,
        field: &'static str,
    },
    DuplicateItemId(String),
}

impl Display for CatalogLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read catalog `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "catalog is not valid JSON: {err}"),
            Self::InvalidShape(message) => write!(f, "malformed catalog: {message}"),
            Self::MissingField {
                theme,
                index,
                field,
            } => write!(
                f,
                "malformed catalog: item #{index} of theme `{theme}` is missing `{field}`"
            ),
            Self::DuplicateItemId(id) => write!(f, "malformed catalog: duplicate item id `{id}`"),
        }
    }
}

impl Error for CatalogLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidShape(_) | Self::MissingField { .. } | Self::DuplicateItemId(_) => None,
        }
    }
}

impl From<serde_json::Error> for CatalogLoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Item text that was empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankItemQuery;

impl Display for BlankItemQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "item name or id cannot be blank")
    }
}

impl Error for BlankItemQuery {}

/// Inventory key chosen for a user-typed item query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    /// Key written to the inventory store.
    pub id: String,
    /// Text shown to the user.
    pub label: String,
    pub in_catalog: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ThemeGroup {
    label: String,
    items: Vec<Item>,
}

/// Immutable, fully validated item catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    themes: Vec<ThemeGroup>,
    // item id -> (theme index, item index)
    by_id: HashMap<String, (usize, usize)>,
}

impl Catalog {
    /// Parses a catalog document.
    ///
    /// Accepted shapes per theme: an array of item descriptors, or an object
    /// carrying that array under `items`.
    ///
    /// # Errors
    /// - `Parse` when the text is not JSON.
    /// - `InvalidShape` when the top level or a theme entry has the wrong shape.
    /// - `MissingField` when an item lacks a non-blank `id`, `name` or `image`.
    /// - `DuplicateItemId` when two items share an id.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogLoadError> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value(&document)
    }

    /// Builds a catalog from an already parsed JSON document.
    pub fn from_value(document: &Value) -> Result<Self, CatalogLoadError> {
        let root = document.as_object().ok_or_else(|| {
            CatalogLoadError::InvalidShape(
                "top level must be an object mapping theme labels to items".to_string(),
            )
        })?;

        let mut themes = Vec::with_capacity(root.len());
        let mut by_id = HashMap::new();

        for (theme_index, (label, entry)) in root.iter().enumerate() {
            let descriptors = theme_entries(label, entry)?;
            let mut items = Vec::with_capacity(descriptors.len());

            for (item_index, descriptor) in descriptors.iter().enumerate() {
                let item = parse_item(label, item_index, descriptor)?;
                if by_id
                    .insert(item.id.clone(), (theme_index, item_index))
                    .is_some()
                {
                    return Err(CatalogLoadError::DuplicateItemId(item.id));
                }
                items.push(item);
            }

            themes.push(ThemeGroup {
                label: label.clone(),
                items,
            });
        }

        Ok(Self { themes, by_id })
    }

    /// Theme labels in document order.
    pub fn themes(&self) -> Vec<&str> {
        self.themes.iter().map(|group| group.label.as_str()).collect()
    }

    /// Items listed under `theme`, in source order; empty for an unknown theme.
    pub fn items(&self, theme: &str) -> &[Item] {
        self.themes
            .iter()
            .find(|group| group.label == theme)
            .map(|group| group.items.as_slice())
            .unwrap_or(&[])
    }

    /// Looks up one item by id.
    pub fn item(&self, id: &str) -> Option<&Item> {
        let (theme_index, item_index) = self.by_id.get(id)?;
        self.themes
            .get(*theme_index)
            .and_then(|group| group.items.get(*item_index))
    }

    /// Finds an item by exact id, then by case-insensitive display name.
    pub fn find(&self, query: &str) -> Option<&Item> {
        let trimmed = query.trim();
        if let Some(item) = self.item(trimmed) {
            return Some(item);
        }
        let lowered = trimmed.to_lowercase();
        self.iter().find(|item| item.name.to_lowercase() == lowered)
    }

    /// Maps user input to the inventory key every front end writes.
    ///
    /// Catalog matches (see `find`) use the item id; any other text is keyed by
    /// its trimmed, lower-cased form.
    pub fn item_key(&self, query: &str) -> Result<ItemRef, BlankItemQuery> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(BlankItemQuery);
        }
        Ok(match self.find(trimmed) {
            Some(item) => ItemRef {
                id: item.id.clone(),
                label: item.name.clone(),
                in_catalog: true,
            },
            None => {
                let key = trimmed.to_lowercase();
                ItemRef {
                    id: key.clone(),
                    label: key,
                    in_catalog: false,
                }
            }
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All items, theme by theme, in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.themes.iter().flat_map(|group| group.items.iter())
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Loads and validates a catalog file.
///
/// # Side effects
/// - Reads `path` once.
/// - Emits `catalog_load` logging events with duration and status.
pub fn load_catalog_from_path(path: impl AsRef<Path>) -> Result<Catalog, CatalogLoadError> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=catalog_load module=catalog status=start");

    let result = std::fs::read_to_string(path)
        .map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|text| Catalog::from_json_str(&text));

    match &result {
        Ok(catalog) => info!(
            "event=catalog_load module=catalog status=ok duration_ms={} themes={} items={}",
            started_at.elapsed().as_millis(),
            catalog.themes.len(),
            catalog.len()
        ),
        Err(err) => error!(
            "event=catalog_load module=catalog status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }

    result
}

fn theme_entries<'doc>(
    label: &str,
    entry: &'doc Value,
) -> Result<&'doc Vec<Value>, CatalogLoadError> {
    match entry {
        Value::Array(descriptors) => Ok(descriptors),
        Value::Object(fields) => match fields.get("items") {
            Some(Value::Array(descriptors)) => Ok(descriptors),
            Some(_) => Err(CatalogLoadError::InvalidShape(format!(
                "theme `{label}` has a non-array `items` value"
            ))),
            None => Err(CatalogLoadError::InvalidShape(format!(
                "theme `{label}` is missing `items`"
            ))),
        },
        _ => Err(CatalogLoadError::InvalidShape(format!(
            "theme `{label}` must be an array of items or an object with `items`"
        ))),
    }
}

fn parse_item(theme: &str, index: usize, descriptor: &Value) -> Result<Item, CatalogLoadError> {
    let fields = descriptor.as_object().ok_or_else(|| {
        CatalogLoadError::InvalidShape(format!(
            "item #{index} of theme `{theme}` is not an object"
        ))
    })?;

    let id = required_string(fields, theme, index, "id")?;
    let name = required_string(fields, theme, index, "name")?;
    let image = required_string(fields, theme, index, "image")?;

    Ok(Item::new(id, name, theme, image))
}

fn required_string(
    fields: &Map<String, Value>,
    theme: &str,
    index: usize,
    field: &'static str,
) -> Result<String, CatalogLoadError> {
    match fields.get(field).and_then(Value::as_str).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(CatalogLoadError::MissingField {
            theme: theme.to_string(),
            index,
            field,
        }),
    }
}
