//! Console driver
//!
//! Stands in for the race platform: an operator opens rooms, moves races
//! through their statuses and types chat lines on behalf of users.
//!
//! ```text
//! open dwr/brave-slime-0001 Standard Flags
//! dwr/brave-slime-0001 erdrick@monitor !lock
//! dwr/brave-slime-0001 loto !roll3
//! status dwr/brave-slime-0001 in_progress
//! race dwr/brave-slime-0001 {"status": {"value": "finished"}}
//! quit
//! ```

use randobot_core::{ChatMessage, RaceInfo, RaceStatus, Result, UserRole};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::room_runtime::{RoomEvent, RoomRuntime};

const USAGE: &str = "commands: open <room> [goal] | status <room> <status> | race <room> <json> \
                     | <room> <user>[@monitor|@moderator] <text> | rooms | quit";

/// One line of operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Open { room: String, goal: Option<String> },
    Status { room: String, status: RaceStatus },
    Race { room: String, json: String },
    Chat { room: String, message: ChatMessage },
    Rooms,
    Quit,
}

impl ConsoleCommand {
    /// Parse a line; blank lines yield `None`
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (head, rest) = split_word(line);
        let command = match head {
            "quit" | "exit" => ConsoleCommand::Quit,
            "rooms" => ConsoleCommand::Rooms,
            "open" => {
                let (room, goal) = split_word(rest);
                ConsoleCommand::Open {
                    room: required(room, "open needs a room name")?,
                    goal: (!goal.is_empty()).then(|| goal.to_string()),
                }
            }
            "status" => {
                let (room, status) = split_word(rest);
                ConsoleCommand::Status {
                    room: required(room, "status needs a room name")?,
                    status: RaceStatus::parse(&required(status, "status needs a value")?),
                }
            }
            "race" => {
                let (room, json) = split_word(rest);
                ConsoleCommand::Race {
                    room: required(room, "race needs a room name")?,
                    json: required(json, "race needs a JSON payload")?,
                }
            }
            room => {
                let (sender, text) = split_word(rest);
                let (user, role) = parse_sender(&required(sender, USAGE)?)?;
                ConsoleCommand::Chat {
                    room: room.to_string(),
                    message: ChatMessage::new(user, role, text),
                }
            }
        };
        Ok(Some(command))
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn required(value: &str, message: &str) -> std::result::Result<String, String> {
    if value.is_empty() {
        Err(message.to_string())
    } else {
        Ok(value.to_string())
    }
}

/// `name` or `name@role`
fn parse_sender(sender: &str) -> std::result::Result<(String, UserRole), String> {
    match sender.split_once('@') {
        Some((user, tag)) => UserRole::from_tag(tag)
            .map(|role| (user.to_string(), role))
            .ok_or_else(|| format!("unknown role '{}'", tag)),
        None => Ok((sender.to_string(), UserRole::Participant)),
    }
}

/// Apply one operator command. Returns `false` on quit.
pub async fn apply(runtime: &mut RoomRuntime, command: ConsoleCommand) -> Result<bool> {
    match command {
        ConsoleCommand::Quit => return Ok(false),
        ConsoleCommand::Rooms => {
            for room in runtime.room_names() {
                println!("{}", room);
            }
        }
        ConsoleCommand::Open { room, goal } => {
            runtime.open_room(&room, RaceInfo::new(RaceStatus::Open, goal))?;
        }
        ConsoleCommand::Status { room, status } => {
            runtime.dispatch(&room, RoomEvent::Status(status)).await?;
        }
        ConsoleCommand::Race { room, json } => {
            let race = RaceInfo::from_json(&json)?;
            runtime.dispatch(&room, RoomEvent::Race(race)).await?;
        }
        ConsoleCommand::Chat { room, message } => {
            runtime.dispatch(&room, RoomEvent::Chat(message)).await?;
        }
    }
    Ok(true)
}

/// Read operator commands from stdin until EOF or `quit`
pub async fn run(runtime: &mut RoomRuntime) -> Result<()> {
    println!("{}", USAGE);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match ConsoleCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{}", usage);
                continue;
            }
        };
        match apply(runtime, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Console command failed");
                println!("error: {}", e);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open() {
        assert_eq!(
            ConsoleCommand::parse("open dwr/a Standard Flags").unwrap(),
            Some(ConsoleCommand::Open {
                room: "dwr/a".to_string(),
                goal: Some("Standard Flags".to_string()),
            })
        );
        assert_eq!(
            ConsoleCommand::parse("open dwr/a").unwrap(),
            Some(ConsoleCommand::Open {
                room: "dwr/a".to_string(),
                goal: None,
            })
        );
        assert!(ConsoleCommand::parse("open").is_err());
    }

    #[test]
    fn test_parse_chat_with_role() {
        let parsed = ConsoleCommand::parse("dwr/a erdrick@monitor !dwflags3 AAAA").unwrap();
        assert_eq!(
            parsed,
            Some(ConsoleCommand::Chat {
                room: "dwr/a".to_string(),
                message: ChatMessage::new("erdrick", UserRole::Monitor, "!dwflags3 AAAA"),
            })
        );
        assert!(ConsoleCommand::parse("dwr/a erdrick@king !roll").is_err());
        assert!(ConsoleCommand::parse("dwr/a").is_err());
    }

    #[test]
    fn test_parse_status_and_race() {
        assert_eq!(
            ConsoleCommand::parse("status dwr/a in_progress").unwrap(),
            Some(ConsoleCommand::Status {
                room: "dwr/a".to_string(),
                status: RaceStatus::InProgress,
            })
        );
        assert_eq!(
            ConsoleCommand::parse(r#"race dwr/a {"status": {"value": "open"}}"#).unwrap(),
            Some(ConsoleCommand::Race {
                room: "dwr/a".to_string(),
                json: r#"{"status": {"value": "open"}}"#.to_string(),
            })
        );
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(ConsoleCommand::parse("   ").unwrap(), None);
        assert_eq!(ConsoleCommand::parse("quit").unwrap(), Some(ConsoleCommand::Quit));
        assert_eq!(ConsoleCommand::parse("rooms").unwrap(), Some(ConsoleCommand::Rooms));
    }
}
