//! One-shot subcommands over the store traits.

use crate::{shell, AppContext, Commands};
use anyhow::{anyhow, bail, Result};
use glamdex_core::{
    Email, IdentityResolver, InventoryService, InventoryStore, SyncService, UserDirectory,
};

/// Runs one subcommand against the selected backend.
pub(crate) fn dispatch<S, D>(ctx: &AppContext, store: S, directory: D, command: Commands) -> Result<()>
where
    S: InventoryStore + Clone,
    D: UserDirectory,
{
    match command {
        Commands::Themes => {
            for theme in ctx.catalog.themes() {
                println!("{theme} ({} item(s))", ctx.catalog.items(theme).len());
            }
            Ok(())
        }
        Commands::Items { theme } => {
            let items = ctx.catalog.items(&theme);
            if items.is_empty() {
                println!("No items in theme '{theme}'");
            }
            for item in items {
                println!("{}\t{}\t{}", item.id, item.name, item.image);
            }
            Ok(())
        }
        Commands::Item { id } => {
            let item = ctx
                .catalog
                .find(&id)
                .ok_or_else(|| anyhow!("no item '{id}' in the catalog"))?;
            let path = ctx.assets.resolve(item);
            println!("id:    {}", item.id);
            println!("name:  {}", item.name);
            println!("theme: {}", item.theme);
            println!(
                "image: {}{}",
                path.display(),
                if path.is_file() { "" } else { " (not found)" }
            );
            Ok(())
        }
        Commands::Register { email } => {
            let resolution = IdentityResolver::new(directory).resolve(&email)?;
            if resolution.created {
                println!("Registered {}", resolution.user.email);
            } else {
                println!("Account {} already exists", resolution.user.email);
            }
            Ok(())
        }
        Commands::Inventory { email } => {
            let user = IdentityResolver::new(directory).resolve_or_create(&email)?;
            let view = InventoryService::new(store).snapshot(&user.email, &ctx.catalog)?;
            for theme in &view.themes {
                println!("{}", theme.theme);
                for state in &theme.items {
                    let mark = if state.owned { "[x]" } else { "[ ]" };
                    println!("  {mark} {} ({})", state.item.name, state.item.id);
                }
            }
            println!("{}/{} owned", view.owned_count(), view.total());
            if view.stale_keys > 0 {
                println!(
                    "{} stored entr(y/ies) not in the current catalog",
                    view.stale_keys
                );
            }
            Ok(())
        }
        Commands::Own { email, item } => write_flag(ctx, store, directory, &email, &item, Some(true)),
        Commands::Disown { email, item } => {
            write_flag(ctx, store, directory, &email, &item, Some(false))
        }
        Commands::Toggle { email, item } => write_flag(ctx, store, directory, &email, &item, None),
        Commands::Shell { user } => shell::run(ctx, store, directory, user.as_deref()),
        Commands::Sync { .. } => bail!("sync is handled before backend selection"),
        Commands::Version => Ok(()),
    }
}

/// Sets (`Some`) or flips (`None`) one owned flag.
fn write_flag<S, D>(
    ctx: &AppContext,
    store: S,
    directory: D,
    email: &str,
    query: &str,
    owned: Option<bool>,
) -> Result<()>
where
    S: InventoryStore,
    D: UserDirectory,
{
    let user = IdentityResolver::new(directory).resolve_or_create(email)?;
    let item = ctx.catalog.item_key(query)?;
    if !item.in_catalog {
        eprintln!("note: '{}' is not in the catalog", item.label);
    }

    let service = InventoryService::new(store);
    let owned = match owned {
        Some(owned) => {
            service.set_owned(&user.email, &item.id, owned)?;
            owned
        }
        None => service.toggle(&user.email, &item.id)?,
    };
    println!(
        "{} ({}): {}",
        item.label,
        item.id,
        if owned { "owned" } else { "not owned" }
    );
    Ok(())
}

pub(crate) fn sync<L, R>(local: L, remote: R, email: &str, pull: bool) -> Result<()>
where
    L: InventoryStore,
    R: InventoryStore,
{
    let email = Email::parse(email)?;
    let service = SyncService::new(local, remote);
    let (direction, report) = if pull {
        ("pulled", service.pull(&email)?)
    } else {
        ("pushed", service.push(&email)?)
    };
    println!(
        "{direction} {} change(s), {} already in sync",
        report.copied, report.unchanged
    );
    Ok(())
}
