//! Command-line front end for the cosmetics inventory.
//!
//! # Responsibility
//! - Load configuration, logging, catalog and the configured store backend.
//! - Run one-shot subcommands or the interactive shell against the store traits.

mod actions;
mod shell;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glamdex_core::config::DEFAULT_CONFIG_PATH;
use glamdex_core::db::open_db;
use glamdex_core::logging::resolve_log_dir;
use glamdex_core::outfit::{load_outfits_from_path, OutfitLibrary};
use glamdex_core::{
    core_version, default_log_level, init_logging, load_catalog_from_path, AppConfig,
    AssetResolver, Catalog, HttpDocumentTransport, RemoteInventoryStore, SqliteInventoryStore,
    SqliteUserDirectory, StoreSelection,
};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "glamdex", version, about = "Browse a cosmetics catalog and track owned items")]
struct Cli {
    /// Configuration file; defaults apply when it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Catalog document, overriding `catalog_path` from the config.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List themes in catalog order.
    Themes,
    /// List the items of one theme.
    Items { theme: String },
    /// Show one item and its resolved image path.
    Item { id: String },
    /// Create an account for an email (no password).
    Register { email: String },
    /// Show a user's inventory against the catalog.
    Inventory { email: String },
    /// Mark an item as owned.
    Own { email: String, item: String },
    /// Mark an item as not owned.
    Disown { email: String, item: String },
    /// Flip an item's owned flag.
    Toggle { email: String, item: String },
    /// Copy a user's inventory between the local and remote stores.
    Sync {
        email: String,
        #[arg(long, value_enum)]
        direction: SyncDirection,
    },
    /// Interactive command shell.
    Shell {
        /// Sign in as this email before the first prompt.
        #[arg(long)]
        user: Option<String>,
    },
    /// Print the core version.
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SyncDirection {
    /// Remote into local.
    Pull,
    /// Local into remote.
    Push,
}

/// Loaded, immutable inputs shared by every subcommand.
pub(crate) struct AppContext {
    pub catalog: Catalog,
    pub outfits: OutfitLibrary,
    pub assets: AssetResolver,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if matches!(cli.command, Commands::Version) {
        println!("glamdex {}", core_version());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.apply_process_env();
    start_logging(&config, cli.log_level.as_deref());

    let catalog_path = cli.catalog.clone().unwrap_or_else(|| config.catalog_path.clone());
    let catalog =
        load_catalog_from_path(&catalog_path).map_err(|err| anyhow!("catalog unavailable: {err}"))?;
    let outfits = match &config.outfits_path {
        Some(path) => load_outfits_from_path(path)?,
        None => OutfitLibrary::default(),
    };
    let ctx = AppContext {
        catalog,
        outfits,
        assets: AssetResolver::new(config.asset_root.clone()),
    };

    if let Commands::Sync { email, direction } = &cli.command {
        return run_sync(&config, email, *direction);
    }

    match config.store_selection()? {
        StoreSelection::Local { db_path } => {
            info!("event=store_select module=cli status=ok backend=local");
            let conn = open_db(&db_path)
                .with_context(|| format!("opening inventory database {}", db_path.display()))?;
            actions::dispatch(
                &ctx,
                SqliteInventoryStore::new(&conn),
                SqliteUserDirectory::new(&conn),
                cli.command,
            )
        }
        StoreSelection::Remote(remote) => {
            info!("event=store_select module=cli status=ok backend=remote");
            let transport = HttpDocumentTransport::new(&remote)?;
            let store = RemoteInventoryStore::with_namespace(transport, remote.namespace.as_str());
            actions::dispatch(&ctx, store.clone(), store, cli.command)
        }
    }
}

fn run_sync(config: &AppConfig, email: &str, direction: SyncDirection) -> Result<()> {
    let remote = config
        .remote_config()?
        .ok_or_else(|| anyhow!("sync needs a configured remote store"))?;
    let conn = open_db(&config.store.db_path).with_context(|| {
        format!(
            "opening inventory database {}",
            config.store.db_path.display()
        )
    })?;
    let transport = HttpDocumentTransport::new(&remote)?;
    actions::sync(
        SqliteInventoryStore::new(&conn),
        RemoteInventoryStore::with_namespace(transport, remote.namespace.as_str()),
        email,
        direction == SyncDirection::Pull,
    )
}

fn start_logging(config: &AppConfig, cli_level: Option<&str>) {
    let level = cli_level
        .or(config.logging.level.as_deref())
        .unwrap_or(default_log_level());
    let base = std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir());
    let log_dir = resolve_log_dir(config.logging.dir.as_deref(), &base);
    if let Err(err) = init_logging(level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, SyncDirection};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "glamdex",
            "own",
            "a@x.com",
            "e1",
            "--catalog",
            "catalog.json",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("glamdex.toml"));
        assert_eq!(cli.catalog, Some(PathBuf::from("catalog.json")));
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
        assert!(matches!(
            cli.command,
            Commands::Own { email, item } if email == "a@x.com" && item == "e1"
        ));
    }

    #[test]
    fn sync_requires_a_direction() {
        assert!(Cli::try_parse_from(["glamdex", "sync", "a@x.com"]).is_err());

        let cli =
            Cli::try_parse_from(["glamdex", "sync", "a@x.com", "--direction", "pull"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sync {
                direction: SyncDirection::Pull,
                ..
            }
        ));
    }

    #[test]
    fn shell_user_is_optional() {
        let cli = Cli::try_parse_from(["glamdex", "shell"]).unwrap();
        assert!(matches!(cli.command, Commands::Shell { user: None }));
    }
}
