//! Race snapshot model
//!
//! Mirrors the subset of the platform's race payload the bot reads:
//! `{"status": {"value": "open"}, "goal": {"name": "Standard Flags"}}`.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Race lifecycle status as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceStatus {
    Open,
    Invitational,
    Pending,
    InProgress,
    Finished,
    Cancelled,
    /// A status value this bot does not know about
    #[serde(untagged)]
    Other(String),
}

impl RaceStatus {
    /// Race is counting down or running; configuration is frozen
    pub fn is_in_progress(&self) -> bool {
        matches!(self, RaceStatus::Pending | RaceStatus::InProgress)
    }

    /// Race is over; the room's session should be discarded
    pub fn is_terminal(&self) -> bool {
        matches!(self, RaceStatus::Finished | RaceStatus::Cancelled)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RaceStatus::Open => "open",
            RaceStatus::Invitational => "invitational",
            RaceStatus::Pending => "pending",
            RaceStatus::InProgress => "in_progress",
            RaceStatus::Finished => "finished",
            RaceStatus::Cancelled => "cancelled",
            RaceStatus::Other(value) => value,
        }
    }

    /// Parse a status value, keeping unknown values as `Other`
    pub fn parse(value: &str) -> Self {
        match value {
            "open" => RaceStatus::Open,
            "invitational" => RaceStatus::Invitational,
            "pending" => RaceStatus::Pending,
            "in_progress" => RaceStatus::InProgress,
            "finished" => RaceStatus::Finished,
            "cancelled" => RaceStatus::Cancelled,
            other => RaceStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for RaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StatusField {
    value: RaceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct GoalField {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RacePayload {
    status: StatusField,
    #[serde(default)]
    goal: Option<GoalField>,
}

/// Snapshot of the race a session belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceInfo {
    pub status: RaceStatus,
    pub goal: Option<String>,
}

impl RaceInfo {
    pub fn new(status: RaceStatus, goal: Option<String>) -> Self {
        Self { status, goal }
    }

    /// An open race with the given goal
    pub fn open(goal: impl Into<String>) -> Self {
        Self::new(RaceStatus::Open, Some(goal.into()))
    }

    /// Decode the platform's race JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: RacePayload = serde_json::from_str(json)?;
        Ok(Self {
            status: payload.status.value,
            goal: payload.goal.map(|g| g.name),
        })
    }

    pub fn goal_name(&self) -> &str {
        self.goal.as_deref().unwrap_or("")
    }

    pub fn is_in_progress(&self) -> bool {
        self.status.is_in_progress()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_phases() {
        assert!(RaceStatus::Pending.is_in_progress());
        assert!(RaceStatus::InProgress.is_in_progress());
        assert!(!RaceStatus::Open.is_in_progress());
        assert!(RaceStatus::Finished.is_terminal());
        assert!(RaceStatus::Cancelled.is_terminal());
        assert!(!RaceStatus::Invitational.is_terminal());
    }

    #[test]
    fn test_parse_platform_payload() {
        let json = r#"{
            "name": "dwr/lucky-slime-4242",
            "status": {"value": "in_progress", "verbose_value": "In progress"},
            "goal": {"name": "Standard Flags", "custom": false}
        }"#;
        let info = RaceInfo::from_json(json).unwrap();
        assert_eq!(info.status, RaceStatus::InProgress);
        assert_eq!(info.goal_name(), "Standard Flags");
    }

    #[test]
    fn test_parse_unknown_status() {
        let info = RaceInfo::from_json(r#"{"status": {"value": "paused"}}"#).unwrap();
        assert_eq!(info.status, RaceStatus::Other("paused".to_string()));
        assert!(!info.is_in_progress());
        assert!(!info.is_terminal());
        assert_eq!(info.goal, None);
    }

    #[test]
    fn test_parse_invalid_payload() {
        assert!(RaceInfo::from_json(r#"{"goal": {"name": "x"}}"#).is_err());
    }

    #[test]
    fn test_status_round_trip_strings() {
        for value in ["open", "pending", "in_progress", "cancelled"] {
            assert_eq!(RaceStatus::parse(value).as_str(), value);
        }
    }
}
