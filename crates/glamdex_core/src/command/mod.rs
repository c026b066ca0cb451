//! Interactive command language.
//!
//! # Responsibility
//! - Tokenize a command line into a command keyword and quoted arguments.
//! - Parse tokens into a typed `Command`, enforcing per-command arity.
//! - Execute commands against the catalog, identity and inventory services.
//!
//! # Invariants
//! - Keywords match case-insensitively; the longest keyword wins.
//! - Arguments are double-quoted literals; an unterminated quote ends scanning.

mod executor;
mod lexer;
mod parser;

pub use executor::{ExecutionError, Executor, Outcome};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse, parse_command, Command, ParseError};

/// Keyword with its accepted argument count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub keyword: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub usage: &'static str,
}

const fn spec(
    keyword: &'static str,
    min_args: usize,
    max_args: usize,
    usage: &'static str,
) -> CommandSpec {
    CommandSpec {
        keyword,
        min_args,
        max_args,
        usage,
    }
}

/// Every recognized command, in help order.
pub const COMMANDS: &[CommandSpec] = &[
    spec("register", 1, 2, "register \"email\""),
    spec("login", 1, 1, "login \"email\""),
    spec("logout", 0, 0, "logout"),
    spec("whoami", 0, 0, "whoami"),
    spec("themes", 0, 0, "themes"),
    spec("items", 1, 1, "items \"theme\""),
    spec("add item", 1, 1, "add item \"item\""),
    spec("add item list", 1, 99, "add item list \"item\" \"item\" ..."),
    spec("remove item", 1, 1, "remove item \"item\""),
    spec("clear inventory", 0, 0, "clear inventory"),
    spec("apply theme", 1, 1, "apply theme \"theme\""),
    spec("color palette", 1, 99, "color palette \"color\" \"color\" ..."),
    spec("assemble cosmetic", 0, 0, "assemble cosmetic"),
    spec("help", 0, 0, "help"),
    spec("exit", 0, 0, "exit"),
];

/// Looks up a keyword's spec.
pub fn command_spec(keyword: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.keyword == keyword)
}
