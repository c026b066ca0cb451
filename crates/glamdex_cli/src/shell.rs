//! Interactive command shell.

use crate::AppContext;
use anyhow::Result;
use glamdex_core::command::{Executor, Outcome};
use glamdex_core::{InventoryStore, UserDirectory};
use std::io::{self, BufRead, Write};

const PROMPT: &str = "glamdex> ";

/// Reads commands from stdin until `exit` or end of input.
///
/// Without `user`, inventory commands work on an in-process guest inventory.
///
/// Command failures are printed and the shell keeps running.
pub(crate) fn run<S, D>(ctx: &AppContext, store: S, directory: D, user: Option<&str>) -> Result<()>
where
    S: InventoryStore + Clone,
    D: UserDirectory,
{
    let mut executor = Executor::new(&ctx.catalog, &ctx.outfits, &ctx.assets, store, directory);
    match user {
        Some(email) => println!("{}", executor.sign_in(email)?),
        None => {
            executor = executor.with_guest_inventory();
            println!("Guest inventory active (not saved); `login` to use a stored one.");
        }
    }
    println!("Type `help` for commands, `exit` to quit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match executor.run_line(&line) {
            Ok(Outcome::Message(message)) => println!("{message}"),
            Ok(Outcome::Exit) => break,
            Err(err) => println!("error: {err}"),
        }
    }

    Ok(())
}
