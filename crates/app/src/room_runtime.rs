//! Room runtime - one task per race room
//!
//! Each room owns its `RaceSession` inside a tokio task and drains an mpsc
//! channel, so commands for one room are handled strictly one after another
//! while different rooms run independently.

use std::collections::HashMap;
use std::sync::Arc;

use randobot_core::{
    BotConfig, ChatMessage, Error, RaceHandler, RaceInfo, RaceSession, RaceStatus, Result,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::outlet::{execute_actions, RoomOutlet};

/// Pending events per room before senders wait
const ROOM_QUEUE_DEPTH: usize = 64;

/// Inbound events for a room
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// A chat line from a user
    Chat(ChatMessage),
    /// The race moved to a new status
    Status(RaceStatus),
    /// Fresh race snapshot from the platform
    Race(RaceInfo),
}

impl RoomEvent {
    /// Whether this event ends the room
    fn closes_room(&self) -> bool {
        match self {
            RoomEvent::Chat(_) => false,
            RoomEvent::Status(status) => status.is_terminal(),
            RoomEvent::Race(race) => race.is_terminal(),
        }
    }
}

struct RoomHandle {
    tx: mpsc::Sender<RoomEvent>,
    task: JoinHandle<()>,
}

/// Owns every open room
pub struct RoomRuntime {
    config: Arc<BotConfig>,
    outlet: Arc<dyn RoomOutlet>,
    rooms: HashMap<String, RoomHandle>,
    /// Rooms told to close whose tasks may still be draining
    closing: Vec<JoinHandle<()>>,
}

impl RoomRuntime {
    pub fn new(config: Arc<BotConfig>, outlet: Arc<dyn RoomOutlet>) -> Self {
        Self {
            config,
            outlet,
            rooms: HashMap::new(),
            closing: Vec::new(),
        }
    }

    /// Join a room: create its session and run the introduction
    pub fn open_room(&mut self, name: &str, race: RaceInfo) -> Result<()> {
        if self.rooms.contains_key(name) {
            return Err(Error::RoomExists(name.to_string()));
        }

        let session = RaceSession::new(self.config.clone());
        info!(
            room = %name,
            session_id = %session.session_id(),
            goal = %race.goal_name(),
            "Opening race room"
        );

        let (tx, rx) = mpsc::channel(ROOM_QUEUE_DEPTH);
        let task = tokio::spawn(room_task(
            name.to_string(),
            race,
            session,
            self.outlet.clone(),
            rx,
        ));
        self.rooms.insert(name.to_string(), RoomHandle { tx, task });
        Ok(())
    }

    /// Queue an event for a room
    ///
    /// Events that end the race also remove the room; later events for it
    /// fail with `RoomClosed`.
    pub async fn dispatch(&mut self, name: &str, event: RoomEvent) -> Result<()> {
        let closes = event.closes_room();
        let handle = self
            .rooms
            .get(name)
            .ok_or_else(|| Error::RoomClosed(name.to_string()))?;

        if handle.tx.send(event).await.is_err() {
            warn!(room = %name, "Room task is gone, dropping room");
            self.forget(name);
            return Err(Error::RoomClosed(name.to_string()));
        }

        if closes {
            self.forget(name);
        }
        Ok(())
    }

    /// Names of open rooms, sorted
    pub fn room_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rooms.keys().cloned().collect();
        names.sort();
        names
    }

    /// Close every room and wait for queued events to finish
    pub async fn shutdown(mut self) {
        let names = self.room_names();
        for name in names {
            self.forget(&name);
        }
        for task in self.closing.drain(..) {
            if let Err(e) = task.await {
                warn!(error = %e, "Room task ended abnormally");
            }
        }
        info!("Room runtime stopped");
    }

    fn forget(&mut self, name: &str) {
        if let Some(handle) = self.rooms.remove(name) {
            debug!(room = %name, "Room removed from runtime");
            // Dropping the sender lets the task finish its queue and exit
            drop(handle.tx);
            self.closing.retain(|task| !task.is_finished());
            self.closing.push(handle.task);
        }
    }
}

async fn room_task<H: RaceHandler>(
    name: String,
    mut race: RaceInfo,
    mut handler: H,
    outlet: Arc<dyn RoomOutlet>,
    mut rx: mpsc::Receiver<RoomEvent>,
) {
    execute_actions(outlet.as_ref(), &name, handler.on_begin(&race));

    while !handler.should_stop(&race) {
        let Some(event) = rx.recv().await else {
            break;
        };
        let actions = match event {
            RoomEvent::Chat(message) => handler.on_chat(&race, &message),
            RoomEvent::Status(status) => {
                debug!(room = %name, status = %status, "Race status changed");
                race.status = status;
                Vec::new()
            }
            RoomEvent::Race(snapshot) => {
                race = snapshot;
                Vec::new()
            }
        };
        execute_actions(outlet.as_ref(), &name, actions);
    }

    info!(room = %name, status = %race.status, "Race room closed");
}
