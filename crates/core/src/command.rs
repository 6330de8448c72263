//! Chat command surface
//!
//! Maps `!name arg…` lines onto command kinds and defines the rejections a
//! command can end in.

use crate::bot::RoomAction;
use crate::config::BotConfig;
use crate::models::UserRole;

/// Everything the bot knows how to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Lock,
    Unlock,
    /// `!dwflags` / `!dwflags3` with user-supplied flags
    DwFlags,
    Version,
    Beta,
    Url,
    Clear,
    /// `!roll` / `!roll3` with the standard flags
    Roll,
    /// Summer test-event build with the standard flags
    Summer,
    /// Community fork build with user-supplied flags
    Juef,
    /// A configured non-standard preset such as `!week1`
    Preset,
}

/// Built-in command names
const BUILTIN_COMMANDS: &[(&str, CommandKind)] = &[
    ("lock", CommandKind::Lock),
    ("unlock", CommandKind::Unlock),
    ("dwflags", CommandKind::DwFlags),
    ("dwflags3", CommandKind::DwFlags),
    ("version", CommandKind::Version),
    ("beta", CommandKind::Beta),
    ("url", CommandKind::Url),
    ("clear", CommandKind::Clear),
    ("roll", CommandKind::Roll),
    ("roll3", CommandKind::Roll),
    ("summer", CommandKind::Summer),
    ("juef", CommandKind::Juef),
];

/// Check if a name belongs to a built-in command
pub fn is_builtin_command(name: &str) -> bool {
    BUILTIN_COMMANDS.iter().any(|(builtin, _)| *builtin == name)
}

impl CommandKind {
    /// Resolve a command name, consulting configured presets after built-ins
    pub fn resolve(name: &str, config: &BotConfig) -> Option<Self> {
        BUILTIN_COMMANDS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, kind)| *kind)
            .or_else(|| config.preset(name).map(|_| CommandKind::Preset))
    }
}

/// A `!command` split into name and arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(name: impl Into<String>, args: &[&str]) -> Self {
        Self {
            name: name.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Parse a chat line; anything not starting with `!` is not a command
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let name = words.next()?.strip_prefix('!')?;
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            args: words.map(str::to_string).collect(),
        })
    }
}

/// Why a command did not go through
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{message}")]
    Usage {
        message: String,
        example: Option<String>,
    },

    #[error("Sorry {user}, seed rolling is locked. Only race monitors may roll a seed for this race.")]
    Locked { user: String },

    #[error("Well excuuuuuse me princess, but I already rolled a seed. Don't get greedy!")]
    RerollDenied,

    #[error("{required} privilege required")]
    PermissionDenied { required: UserRole },

    #[error("Race is in progress")]
    RaceInProgress,

    #[error("{0}")]
    WrongGoal(String),

    #[error("Seed already rolled! Use !clear before re-rolling.")]
    AlreadyRolled,
}

impl CommandError {
    pub fn usage(message: impl Into<String>) -> Self {
        CommandError::Usage {
            message: message.into(),
            example: None,
        }
    }

    /// Rejections that end without a reply
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            CommandError::PermissionDenied { .. } | CommandError::RaceInProgress
        )
    }

    /// Chat replies for this rejection
    pub fn into_actions(self) -> Vec<RoomAction> {
        if self.is_silent() {
            return Vec::new();
        }
        match self {
            CommandError::Usage { message, example } => std::iter::once(message)
                .chain(example)
                .map(RoomAction::send)
                .collect(),
            other => vec![RoomAction::send(other.to_string())],
        }
    }
}
