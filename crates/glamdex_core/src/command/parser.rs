//! Token stream to typed `Command`.
//!
//! # Invariants
//! - Argument counts follow the keyword table in `COMMANDS`.
//! - Blank arguments are rejected before any command runs.

use super::lexer::{tokenize, Token, TokenKind};
use super::command_spec;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Parsed command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register {
        email: String,
        /// Accepted for compatibility; accounts are identified by email only.
        password: Option<String>,
    },
    Login(String),
    Logout,
    WhoAmI,
    Themes,
    Items(String),
    AddItem(String),
    AddItemList(Vec<String>),
    RemoveItem(String),
    ClearInventory,
    ApplyTheme(String),
    ColorPalette(Vec<String>),
    AssembleCosmetic,
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    ExpectedCommand,
    UnknownCommand(String),
    Arity {
        command: &'static str,
        min: usize,
        max: usize,
        got: usize,
    },
    /// Zero-based index of a quoted argument that is empty after trimming.
    BlankArgument {
        command: &'static str,
        index: usize,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpectedCommand => write!(f, "expected a command at the start; try `help`"),
            Self::UnknownCommand(command) => write!(f, "unknown command: {command}"),
            Self::Arity {
                command,
                min,
                max,
                got,
            } if min == max => write!(
                f,
                "`{command}` expects {min} quoted argument(s), got {got}"
            ),
            Self::Arity {
                command,
                min,
                max,
                got,
            } => write!(
                f,
                "`{command}` expects {min} to {max} quoted arguments, got {got}"
            ),
            Self::BlankArgument { command, index } => {
                write!(f, "`{command}` argument #{} is blank", index + 1)
            }
        }
    }
}

impl Error for ParseError {}

/// Tokenizes and parses one command line.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    parse(&tokenize(input))
}

/// Parses a token stream produced by `tokenize`.
pub fn parse(tokens: &[Token]) -> Result<Command, ParseError> {
    let head = tokens
        .first()
        .filter(|token| token.kind == TokenKind::Command)
        .ok_or(ParseError::ExpectedCommand)?;
    let spec = command_spec(&head.value)
        .ok_or_else(|| ParseError::UnknownCommand(head.value.clone()))?;

    let mut args: Vec<String> = tokens[1..]
        .iter()
        .take_while(|token| token.kind == TokenKind::StringLiteral)
        .map(|token| token.value.clone())
        .collect();

    if args.len() < spec.min_args || args.len() > spec.max_args {
        return Err(ParseError::Arity {
            command: spec.keyword,
            min: spec.min_args,
            max: spec.max_args,
            got: args.len(),
        });
    }

    if let Some(index) = args.iter().position(|arg| arg.trim().is_empty()) {
        return Err(ParseError::BlankArgument {
            command: spec.keyword,
            index,
        });
    }

    let command = match spec.keyword {
        "register" => {
            let password = if args.len() > 1 { args.pop() } else { None };
            Command::Register {
                email: args.remove(0),
                password,
            }
        }
        "login" => Command::Login(args.remove(0)),
        "logout" => Command::Logout,
        "whoami" => Command::WhoAmI,
        "themes" => Command::Themes,
        "items" => Command::Items(args.remove(0)),
        "add item" => Command::AddItem(args.remove(0)),
        "add item list" => Command::AddItemList(args),
        "remove item" => Command::RemoveItem(args.remove(0)),
        "clear inventory" => Command::ClearInventory,
        "apply theme" => Command::ApplyTheme(args.remove(0)),
        "color palette" => Command::ColorPalette(args),
        "assemble cosmetic" => Command::AssembleCosmetic,
        "help" => Command::Help,
        "exit" => Command::Exit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(command)
}
