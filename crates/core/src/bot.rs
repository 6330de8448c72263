//! Race handler interface
//!
//! A handler never talks to the platform directly. It reads a `RaceInfo`
//! snapshot and the incoming `ChatMessage`, mutates its own state and
//! returns `RoomAction`s for the runtime to execute.

use serde::{Deserialize, Serialize};

use crate::command::CommandInvocation;
use crate::models::{ChatMessage, RaceInfo};

/// Actions a handler can emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomAction {
    /// Post a chat message in the room
    SendMessage { content: String },
    /// Set the room's public info line
    SetRoomInfo { content: String, overwrite: bool },
}

impl RoomAction {
    pub fn send(content: impl Into<String>) -> Self {
        RoomAction::SendMessage {
            content: content.into(),
        }
    }

    pub fn set_info(content: impl Into<String>) -> Self {
        RoomAction::SetRoomInfo {
            content: content.into(),
            overwrite: true,
        }
    }
}

/// Trait for race room handlers
pub trait RaceHandler: Send {
    /// Called once the bot has joined the room (and again on rejoin)
    fn on_begin(&mut self, race: &RaceInfo) -> Vec<RoomAction>;

    /// Handle a parsed `!command`
    fn on_command(
        &mut self,
        race: &RaceInfo,
        invocation: &CommandInvocation,
        message: &ChatMessage,
    ) -> Vec<RoomAction>;

    /// Rooms in a terminal state get no more processing
    fn should_stop(&self, race: &RaceInfo) -> bool {
        race.is_terminal()
    }

    /// Handle any chat line, ignoring ones that are not commands
    fn on_chat(&mut self, race: &RaceInfo, message: &ChatMessage) -> Vec<RoomAction> {
        match CommandInvocation::parse(&message.text) {
            Some(invocation) => self.on_command(race, &invocation, message),
            None => Vec::new(),
        }
    }
}
