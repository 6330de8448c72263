//! Caller role model

use serde::{Deserialize, Serialize};

/// Race room roles in priority order (lowest to highest)
///
/// Moderator implies monitor, monitor implies participant, so privilege
/// checks are plain comparisons.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum UserRole {
    /// Anyone typing in the room
    #[default]
    Participant = 1,
    /// Race monitor - scoped to a single race
    Monitor = 2,
    /// Platform-wide moderator
    Moderator = 3,
}

impl UserRole {
    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Participant => "Participant",
            UserRole::Monitor => "Race Monitor",
            UserRole::Moderator => "Moderator",
        }
    }

    pub fn can_monitor(&self) -> bool {
        *self >= UserRole::Monitor
    }

    pub fn can_moderate(&self) -> bool {
        *self >= UserRole::Moderator
    }

    /// Parse a role tag such as `monitor` (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "participant" | "user" => Some(UserRole::Participant),
            "monitor" => Some(UserRole::Monitor),
            "moderator" | "mod" => Some(UserRole::Moderator),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A chat line as seen by the bot, with the sender's role already resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatMessage {
    pub user: Option<String>,
    pub role: UserRole,
    pub text: String,
}

impl ChatMessage {
    pub fn new(user: impl Into<String>, role: UserRole, text: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            role,
            text: text.into(),
        }
    }

    /// Name to address the sender by in replies
    pub fn reply_to(&self) -> &str {
        self.user.as_deref().unwrap_or("friend")
    }
}
