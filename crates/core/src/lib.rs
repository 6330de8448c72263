//! RandoBot Core Library
//!
//! Race room state machine, command table, permissions and configuration
//! for the randomizer race bot.

pub mod bot;
pub mod command;
pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod seed;
pub mod session;
pub mod spoiler;

pub use bot::{RaceHandler, RoomAction};
pub use command::{CommandError, CommandInvocation, CommandKind};
pub use config::{BotConfig, ConfigError, PresetDef};
pub use error::{Error, Result};
pub use models::*;
pub use permissions::*;
pub use seed::Seed;
pub use session::RaceSession;
