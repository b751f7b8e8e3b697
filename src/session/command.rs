//! Parsing of terminal input into UI events.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// One line of user input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// `/new`: open a fresh conversation.
    New,
    /// `/switch N`: show the N-th conversation of the history list.
    Switch(usize),
    /// `/delete N`: delete the N-th conversation of the history list.
    Delete(usize),
    /// `/upload [PATH]`: upload a CSV; no path means nothing selected.
    Upload(Option<PathBuf>),
    /// `/list`: redraw the screen.
    List,
    /// `/help`: show the command summary.
    Help,
    /// `/quit`: leave.
    Quit,
    /// Anything else is sent as a chat message.
    Message(String),
}

/// Errors from [`Command::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Slash command that does not exist.
    #[error("unknown command: /{0}")]
    Unknown(String),
    /// Missing, non-numeric or zero position.
    #[error("/{command} expects a position from the list (1, 2, ...), got {got:?}")]
    InvalidIndex {
        /// Command name.
        command: &'static str,
        /// Raw argument.
        got: String,
    },
}

/// Command summary printed by `/help`.
pub const HELP: &str = "\
/new            nova conversa
/switch N       abrir a conversa N da lista
/delete N       excluir a conversa N da lista
/upload [ARQ]   enviar um arquivo CSV
/list           redesenhar a tela
/quit           sair
qualquer outro texto é enviado ao bot";

impl Command {
    /// Zero-based history index for `Switch`/`Delete`.
    #[must_use]
    pub const fn list_index(&self) -> Option<usize> {
        match self {
            Self::Switch(n) | Self::Delete(n) => n.checked_sub(1),
            _ => None,
        }
    }
}

fn parse_position(command: &'static str, arg: &str) -> Result<usize, CommandError> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidIndex {
            command,
            got: arg.to_string(),
        }),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Ok(Self::Message(line.to_string()));
        };

        let (name, arg) = rest
            .split_once(char::is_whitespace)
            .map_or((rest.trim(), ""), |(n, a)| (n, a.trim()));

        match name {
            "new" => Ok(Self::New),
            "switch" => parse_position("switch", arg).map(Self::Switch),
            "delete" => parse_position("delete", arg).map(Self::Delete),
            "upload" if arg.is_empty() => Ok(Self::Upload(None)),
            "upload" => Ok(Self::Upload(Some(PathBuf::from(arg)))),
            "list" => Ok(Self::List),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
