//! Command execution against catalog, identity and inventory services.

use super::parser::{parse_command, Command, ParseError};
use super::COMMANDS;
use crate::catalog::{AssetResolver, BlankItemQuery, Catalog, ItemRef};
use crate::model::inventory::InventoryRecord;
use crate::outfit::{AssembleError, Assembly, OutfitLibrary, Workbench};
use crate::repo::error::{PersistenceError, PersistenceResult};
use crate::repo::inventory_repo::InventoryStore;
use crate::repo::user_repo::UserDirectory;
use crate::service::identity_service::{IdentityError, IdentityResolver};
use crate::service::session::InventorySession;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter, Write};

#[derive(Debug)]
pub enum ExecutionError {
    Parse(ParseError),
    BlankItem(BlankItemQuery),
    NotSignedIn,
    UnknownAccount(String),
    Identity(IdentityError),
    Persistence(PersistenceError),
    Assemble(AssembleError),
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::BlankItem(err) => write!(f, "{err}"),
            Self::NotSignedIn => write!(f, "not logged in; use `login \"email\"` first"),
            Self::UnknownAccount(email) => {
                write!(f, "no account for {email}; use `register \"email\"` first")
            }
            Self::Identity(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "change not saved: {err}"),
            Self::Assemble(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ExecutionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::BlankItem(err) => Some(err),
            Self::Identity(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::Assemble(err) => Some(err),
            Self::NotSignedIn | Self::UnknownAccount(_) => None,
        }
    }
}

impl From<ParseError> for ExecutionError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<BlankItemQuery> for ExecutionError {
    fn from(value: BlankItemQuery) -> Self {
        Self::BlankItem(value)
    }
}

impl From<IdentityError> for ExecutionError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}

impl From<PersistenceError> for ExecutionError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

impl From<AssembleError> for ExecutionError {
    fn from(value: AssembleError) -> Self {
        Self::Assemble(value)
    }
}

/// Result of one executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Message(String),
    Exit,
}

/// Stateful command executor for one interactive shell.
pub struct Executor<'a, S, D>
where
    S: InventoryStore + Clone,
    D: UserDirectory,
{
    catalog: &'a Catalog,
    outfits: &'a OutfitLibrary,
    assets: &'a AssetResolver,
    identity: IdentityResolver<D>,
    store: S,
    session: Option<InventorySession<S>>,
    // In-process inventory used while nobody is signed in; never persisted.
    guest: Option<InventoryRecord>,
    workbench: Workbench,
}

/// Inventory that inventory commands act on.
enum ActiveInventory<'e, S: InventoryStore> {
    Session(&'e mut InventorySession<S>),
    Guest(&'e mut InventoryRecord),
}

impl<S: InventoryStore> ActiveInventory<'_, S> {
    fn is_owned(&self, item_id: &str) -> bool {
        match self {
            Self::Session(session) => session.is_owned(item_id),
            Self::Guest(record) => record.is_owned(item_id),
        }
    }

    fn set_owned(&mut self, item_id: &str, owned: bool) -> PersistenceResult<()> {
        match self {
            Self::Session(session) => session.set_owned(item_id, owned),
            Self::Guest(record) => {
                record.set(item_id, owned);
                Ok(())
            }
        }
    }

    fn clear(&mut self) -> PersistenceResult<usize> {
        match self {
            Self::Session(session) => session.clear(),
            Self::Guest(record) => {
                let owned: Vec<String> = record.owned_ids().map(str::to_string).collect();
                for item_id in &owned {
                    record.set(item_id.as_str(), false);
                }
                Ok(owned.len())
            }
        }
    }
}

impl<'a, S, D> Executor<'a, S, D>
where
    S: InventoryStore + Clone,
    D: UserDirectory,
{
    pub fn new(
        catalog: &'a Catalog,
        outfits: &'a OutfitLibrary,
        assets: &'a AssetResolver,
        store: S,
        directory: D,
    ) -> Self {
        Self {
            catalog,
            outfits,
            assets,
            identity: IdentityResolver::new(directory),
            store,
            session: None,
            guest: None,
            workbench: Workbench::new(),
        }
    }

    /// Lets inventory commands work on an unsaved in-process inventory until
    /// someone signs in.
    pub fn with_guest_inventory(mut self) -> Self {
        self.guest = Some(InventoryRecord::new());
        self
    }

    pub fn session(&self) -> Option<&InventorySession<S>> {
        self.session.as_ref()
    }

    pub fn workbench(&self) -> &Workbench {
        &self.workbench
    }

    /// Parses and executes one input line.
    pub fn run_line(&mut self, line: &str) -> Result<Outcome, ExecutionError> {
        let command = parse_command(line)?;
        self.execute(command)
    }

    /// Signs in `email`, creating the account when absent, and opens a session.
    pub fn sign_in(&mut self, email: &str) -> Result<String, ExecutionError> {
        let user = self.identity.sign_in(email)?;
        let message = format!("Logged in as {}", user.email);
        self.session = Some(InventorySession::open(self.store.clone(), user)?);
        Ok(message)
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, ExecutionError> {
        debug!("event=command_execute module=command status=start");
        let message = match command {
            Command::Exit => return Ok(Outcome::Exit),
            Command::Help => help_text(),
            Command::Register { email, password } => self.register(&email, password.is_some())?,
            Command::Login(email) => self.login(&email)?,
            Command::Logout => match self.session.take() {
                Some(session) => format!("Logged out {}", session.user().email),
                None => "Not logged in".to_string(),
            },
            Command::WhoAmI => match (&self.session, &self.guest) {
                (Some(session), _) => format!("Logged in as {}", session.user().email),
                (None, Some(_)) => "Not logged in (guest inventory, not saved)".to_string(),
                (None, None) => "Not logged in".to_string(),
            },
            Command::Themes => self.list_themes(),
            Command::Items(theme) => self.list_items(&theme),
            Command::AddItem(item) => self.add_item(&item)?,
            Command::AddItemList(items) => self.add_item_list(&items)?,
            Command::RemoveItem(item) => self.remove_item(&item)?,
            Command::ClearInventory => {
                let cleared = self.active_inventory()?.clear()?;
                format!("Inventory cleared ({cleared} item(s))")
            }
            Command::ApplyTheme(theme) => {
                self.workbench.apply_theme(&theme);
                format!("Theme applied: {}", theme.trim())
            }
            Command::ColorPalette(colors) => {
                self.workbench.set_palette(&colors);
                format!("Color palette set: {}", self.workbench.palette().join(", "))
            }
            Command::AssembleCosmetic => self.assemble()?,
        };
        Ok(Outcome::Message(message))
    }

    fn active_inventory(&mut self) -> Result<ActiveInventory<'_, S>, ExecutionError> {
        if let Some(session) = self.session.as_mut() {
            return Ok(ActiveInventory::Session(session));
        }
        self.guest
            .as_mut()
            .map(ActiveInventory::Guest)
            .ok_or(ExecutionError::NotSignedIn)
    }

    fn owned_record(&self) -> Option<&InventoryRecord> {
        match &self.session {
            Some(session) => Some(session.record()),
            None => self.guest.as_ref(),
        }
    }

    fn register(&mut self, email: &str, password_given: bool) -> Result<String, ExecutionError> {
        let resolution = self.identity.resolve(email)?;
        let mut message = if resolution.created {
            format!("Registered {}", resolution.user.email)
        } else {
            format!("Account {} already exists", resolution.user.email)
        };
        if password_given {
            message.push_str(" (password ignored; accounts are identified by email only)");
        }
        Ok(message)
    }

    fn login(&mut self, email: &str) -> Result<String, ExecutionError> {
        if self.identity.find(email)?.is_none() {
            return Err(ExecutionError::UnknownAccount(email.trim().to_string()));
        }
        self.sign_in(email)
    }

    fn add_item(&mut self, query: &str) -> Result<String, ExecutionError> {
        let ItemRef {
            id,
            label,
            in_catalog,
        } = self.catalog.item_key(query)?;
        let mut inventory = self.active_inventory()?;
        if inventory.is_owned(&id) {
            return Ok(format!("Item '{label}' is already in inventory"));
        }
        inventory.set_owned(&id, true)?;
        Ok(if in_catalog {
            format!("Added item: {label}")
        } else {
            format!("Added item: {label} (not in catalog)")
        })
    }

    fn add_item_list(&mut self, queries: &[String]) -> Result<String, ExecutionError> {
        let keys = queries
            .iter()
            .map(|query| self.catalog.item_key(query).map(|item| item.id))
            .collect::<Result<Vec<_>, _>>()?;
        let mut inventory = self.active_inventory()?;
        let mut added = 0;
        for item_id in keys {
            if inventory.is_owned(&item_id) {
                continue;
            }
            inventory.set_owned(&item_id, true)?;
            added += 1;
        }
        Ok(format!("Added {added} item(s)"))
    }

    fn remove_item(&mut self, query: &str) -> Result<String, ExecutionError> {
        let ItemRef { id, label, .. } = self.catalog.item_key(query)?;
        let mut inventory = self.active_inventory()?;
        if !inventory.is_owned(&id) {
            return Ok(format!("Item '{label}' is not in inventory"));
        }
        inventory.set_owned(&id, false)?;
        Ok(format!("Removed item: {label}"))
    }

    fn list_themes(&self) -> String {
        let themes = self.catalog.themes();
        if themes.is_empty() {
            return "Catalog has no themes".to_string();
        }
        themes
            .into_iter()
            .map(|theme| format!("{theme} ({} item(s))", self.catalog.items(theme).len()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn list_items(&self, theme: &str) -> String {
        let items = self.catalog.items(theme.trim());
        if items.is_empty() {
            return format!("No items in theme '{}'", theme.trim());
        }
        items
            .iter()
            .map(|item| {
                let mark = match self.owned_record() {
                    Some(record) if record.is_owned(&item.id) => "[x]",
                    Some(_) => "[ ]",
                    None => "-",
                };
                format!("{mark} {} ({}) {}", item.name, item.id, item.image)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn assemble(&mut self) -> Result<String, ExecutionError> {
        let record = self.owned_record().ok_or(ExecutionError::NotSignedIn)?;
        let assembly = self.workbench.assemble(self.outfits, record.owned_ids())?;
        Ok(self.describe_assembly(&assembly))
    }

    fn describe_assembly(&self, assembly: &Assembly<'_>) -> String {
        let mut out = String::new();
        if assembly.exact.is_empty() {
            let _ = write!(
                out,
                "Assembled partial: {} near match(es).",
                assembly.near.len()
            );
            for candidate in &assembly.near {
                let _ = write!(out, "\n- {}", candidate.outfit.name);
                if !candidate.missing_items.is_empty() {
                    let missing: Vec<&str> =
                        candidate.missing_items.iter().map(String::as_str).collect();
                    let _ = write!(out, "; missing items: {}", missing.join(", "));
                }
                if !candidate.missing_colors.is_empty() {
                    let missing: Vec<&str> =
                        candidate.missing_colors.iter().map(String::as_str).collect();
                    let _ = write!(out, "; missing colors: {}", missing.join(", "));
                }
            }
            return out;
        }

        let _ = write!(
            out,
            "Assembled! Found {} exact match(es).",
            assembly.exact.len()
        );
        for candidate in &assembly.exact {
            let outfit = candidate.outfit;
            let _ = write!(
                out,
                "\n\n{} | theme: {} | colors: {}",
                outfit.name,
                outfit.theme,
                outfit.colors.join(", ")
            );
            if !outfit.image.is_empty() {
                let path = self.assets.resolve_reference(&outfit.theme, &outfit.image);
                let status = if path.is_file() { "" } else { " (not found)" };
                let _ = write!(out, "\nimage: {}{status}", path.display());
            }
            for step in &outfit.steps {
                let _ = write!(out, "\n- {step}");
            }
        }
        out
    }
}

fn help_text() -> String {
    let mut out = String::from("Commands:");
    for spec in COMMANDS {
        let _ = write!(out, "\n  {}", spec.usage);
    }
    out
}
