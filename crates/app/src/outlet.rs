//! Outbound side of a race room
//!
//! The runtime hands every `RoomAction` to a `RoomOutlet`. Delivery is
//! best-effort: a failed send is logged and never reaches session state.

use std::io::{self, Write};

use chrono::Local;
use randobot_core::RoomAction;

/// Platform capabilities a race room needs
pub trait RoomOutlet: Send + Sync {
    /// Post a chat message in a room
    fn send_message(&self, room: &str, content: &str) -> io::Result<()>;

    /// Set a room's public info line
    fn set_room_info(&self, room: &str, content: &str, overwrite: bool) -> io::Result<()>;
}

/// Execute actions in order, logging failures
pub fn execute_actions(outlet: &dyn RoomOutlet, room: &str, actions: Vec<RoomAction>) {
    for action in actions {
        let result = match &action {
            RoomAction::SendMessage { content } => outlet.send_message(room, content),
            RoomAction::SetRoomInfo { content, overwrite } => {
                outlet.set_room_info(room, content, *overwrite)
            }
        };
        if let Err(e) = result {
            tracing::warn!(
                room = %room,
                action = ?action,
                error = %e,
                "Failed to deliver room action"
            );
        }
    }
}

/// Prints room output to stdout with local timestamps
#[derive(Debug, Default)]
pub struct ConsoleOutlet;

impl ConsoleOutlet {
    fn write_line(&self, room: &str, kind: &str, content: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(
            out,
            "[{}] {} {} {}",
            Local::now().format("%H:%M:%S"),
            room,
            kind,
            content
        )
    }
}

impl RoomOutlet for ConsoleOutlet {
    fn send_message(&self, room: &str, content: &str) -> io::Result<()> {
        self.write_line(room, "<randobot>", content)
    }

    fn set_room_info(&self, room: &str, content: &str, _overwrite: bool) -> io::Result<()> {
        if content.is_empty() {
            self.write_line(room, "[info cleared]", "")
        } else {
            self.write_line(room, "[info]", content)
        }
    }
}
