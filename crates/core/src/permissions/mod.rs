//! Permission system for race room commands
//!
//! Each command carries a small policy checked before its handler runs.

use crate::command::{CommandError, CommandKind};
use crate::models::{ChatMessage, RaceInfo, UserRole};

/// Per-command access metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPolicy {
    /// Minimum role to use the command at all
    pub required_role: UserRole,
    /// Ignored while the race is pending or in progress
    pub phase_gated: bool,
    /// Monitor-only while the room is locked
    pub lock_gated: bool,
    /// Moderator-only once a seed exists
    pub moderator_reroll: bool,
}

impl CommandPolicy {
    const fn open() -> Self {
        Self {
            required_role: UserRole::Participant,
            phase_gated: true,
            lock_gated: false,
            moderator_reroll: false,
        }
    }

    const fn roll() -> Self {
        Self {
            lock_gated: true,
            ..Self::open()
        }
    }
}

/// What the matrix needs to know about the room and the caller
#[derive(Debug, Clone, Copy)]
pub struct AccessContext<'a> {
    pub race: &'a RaceInfo,
    pub message: &'a ChatMessage,
    pub locked: bool,
    pub seed_rolled: bool,
}

/// Permission matrix for race commands
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Policy for a command
    pub fn policy(kind: CommandKind) -> CommandPolicy {
        match kind {
            // Lock works at any phase so monitors can freeze a running race
            CommandKind::Lock => CommandPolicy {
                required_role: UserRole::Monitor,
                phase_gated: false,
                ..CommandPolicy::open()
            },
            CommandKind::Unlock => CommandPolicy {
                required_role: UserRole::Monitor,
                ..CommandPolicy::open()
            },

            // User-supplied flags
            CommandKind::DwFlags | CommandKind::Juef => CommandPolicy {
                moderator_reroll: true,
                ..CommandPolicy::roll()
            },

            // Fixed presets
            CommandKind::Roll | CommandKind::Summer | CommandKind::Preset => CommandPolicy::roll(),

            CommandKind::Version | CommandKind::Beta | CommandKind::Clear => CommandPolicy::open(),

            CommandKind::Url => CommandPolicy {
                phase_gated: false,
                ..CommandPolicy::open()
            },
        }
    }

    /// Check phase, role, lock and re-roll rules, in that order
    pub fn authorize(kind: CommandKind, ctx: &AccessContext<'_>) -> Result<(), CommandError> {
        let policy = Self::policy(kind);
        let role = ctx.message.role;

        if policy.phase_gated && ctx.race.is_in_progress() {
            return Err(CommandError::RaceInProgress);
        }

        if role < policy.required_role {
            return Err(CommandError::PermissionDenied {
                required: policy.required_role,
            });
        }

        if policy.lock_gated && ctx.locked && !role.can_monitor() {
            return Err(CommandError::Locked {
                user: ctx.message.reply_to().to_string(),
            });
        }

        if policy.moderator_reroll && ctx.seed_rolled && !role.can_moderate() {
            return Err(CommandError::RerollDenied);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RaceStatus;

    fn message(role: UserRole) -> ChatMessage {
        ChatMessage::new("loto", role, "")
    }

    fn check(
        kind: CommandKind,
        status: RaceStatus,
        role: UserRole,
        locked: bool,
        seed_rolled: bool,
    ) -> Result<(), CommandError> {
        let race = RaceInfo::new(status, Some("Standard Flags".to_string()));
        let message = message(role);
        PermissionMatrix::authorize(
            kind,
            &AccessContext {
                race: &race,
                message: &message,
                locked,
                seed_rolled,
            },
        )
    }

    #[test]
    fn test_lock_is_monitor_only() {
        assert_eq!(
            check(CommandKind::Lock, RaceStatus::Open, UserRole::Participant, false, false),
            Err(CommandError::PermissionDenied {
                required: UserRole::Monitor
            })
        );
        assert!(check(CommandKind::Lock, RaceStatus::Open, UserRole::Monitor, false, false).is_ok());
        assert!(check(CommandKind::Unlock, RaceStatus::Open, UserRole::Moderator, true, false).is_ok());
    }

    #[test]
    fn test_lock_allowed_mid_race() {
        assert!(check(CommandKind::Lock, RaceStatus::InProgress, UserRole::Monitor, false, false).is_ok());
        assert_eq!(
            check(CommandKind::Unlock, RaceStatus::InProgress, UserRole::Monitor, true, false),
            Err(CommandError::RaceInProgress)
        );
    }

    #[test]
    fn test_phase_gating() {
        for kind in [
            CommandKind::DwFlags,
            CommandKind::Version,
            CommandKind::Beta,
            CommandKind::Clear,
            CommandKind::Roll,
            CommandKind::Preset,
        ] {
            assert_eq!(
                check(kind, RaceStatus::Pending, UserRole::Moderator, false, false),
                Err(CommandError::RaceInProgress),
                "{:?} should be gated",
                kind
            );
        }
        assert!(check(CommandKind::Url, RaceStatus::InProgress, UserRole::Participant, false, true).is_ok());
    }

    #[test]
    fn test_locked_rolls() {
        assert!(matches!(
            check(CommandKind::Roll, RaceStatus::Open, UserRole::Participant, true, false),
            Err(CommandError::Locked { .. })
        ));
        assert!(check(CommandKind::Roll, RaceStatus::Open, UserRole::Monitor, true, false).is_ok());
        assert!(check(CommandKind::Version, RaceStatus::Open, UserRole::Participant, true, false).is_ok());
    }

    #[test]
    fn test_reroll_needs_moderator() {
        assert_eq!(
            check(CommandKind::DwFlags, RaceStatus::Open, UserRole::Monitor, false, true),
            Err(CommandError::RerollDenied)
        );
        assert!(check(CommandKind::DwFlags, RaceStatus::Open, UserRole::Moderator, false, true).is_ok());
        // Presets fall through to the already-rolled check instead
        assert!(check(CommandKind::Roll, RaceStatus::Open, UserRole::Participant, false, true).is_ok());
    }
}
