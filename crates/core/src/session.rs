//! Race session - per-room state machine
//!
//! One `RaceSession` lives for as long as the bot sits in a race room. It
//! owns the lock flag, the current seed and the version/build it belongs
//! to. Commands are handled one at a time; the runtime guarantees no two
//! commands for the same room interleave, which is what keeps the
//! already-rolled check and the seed write together.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::bot::{RaceHandler, RoomAction};
use crate::command::{CommandError, CommandInvocation, CommandKind};
use crate::config::BotConfig;
use crate::invariants::assert_session_invariants;
use crate::models::{BuildType, ChatMessage, RaceInfo, RaceVersion};
use crate::permissions::{AccessContext, PermissionMatrix};
use crate::seed::Seed;
use crate::spoiler;

type CommandResult = Result<Vec<RoomAction>, CommandError>;

/// How a roll treats the current version
#[derive(Debug, Clone)]
enum VersionRule {
    /// Use this version unless one was already chosen
    DefaultIfUnset(RaceVersion),
    /// Always use this version
    Set(RaceVersion),
}

/// Everything a roll command asks for, applied only if the roll goes through
#[derive(Debug, Clone)]
struct RollRequest {
    flags: String,
    version: VersionRule,
    build: Option<BuildType>,
    label: Option<String>,
}

/// State of a single race room
pub struct RaceSession {
    session_id: Uuid,
    config: Arc<BotConfig>,
    rng: StdRng,
    locked: bool,
    seed_rolled: bool,
    seed: Option<Seed>,
    flag_string: String,
    race_version: Option<RaceVersion>,
    build_type: BuildType,
    intro_sent: bool,
    /// Whether the room currently shows our info line
    info_published: bool,
}

impl RaceSession {
    /// Create a session seeded from OS entropy
    pub fn new(config: Arc<BotConfig>) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a session with a caller-provided generator
    pub fn with_rng(config: Arc<BotConfig>, rng: StdRng) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            config,
            rng,
            locked: false,
            seed_rolled: false,
            seed: None,
            flag_string: String::new(),
            race_version: None,
            build_type: BuildType::Release,
            intro_sent: false,
            info_published: false,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn seed_rolled(&self) -> bool {
        self.seed_rolled
    }

    pub fn seed(&self) -> Option<Seed> {
        self.seed
    }

    pub fn flag_string(&self) -> &str {
        &self.flag_string
    }

    pub fn race_version(&self) -> Option<&RaceVersion> {
        self.race_version.as_ref()
    }

    pub fn build_type(&self) -> BuildType {
        self.build_type
    }

    pub fn intro_sent(&self) -> bool {
        self.intro_sent
    }

    pub fn info_published(&self) -> bool {
        self.info_published
    }

    /// Current info line, if a seed is rolled
    pub fn info_line(&self) -> Option<String> {
        if !self.seed_rolled {
            return None;
        }
        let seed = self.seed?;
        Some(spoiler::info_line(
            self.race_version.as_ref(),
            seed,
            &self.flag_string,
        ))
    }

    /// Current spoiler URL, if a seed is rolled and a template fits
    pub fn spoiler_url(&self) -> Option<String> {
        if !self.seed_rolled {
            return None;
        }
        spoiler::spoiler_url(
            &self.config.urls,
            self.build_type,
            self.race_version.as_ref(),
            &self.flag_string,
            self.seed?,
        )
    }

    // ==================== Dispatch ====================

    fn dispatch(
        &mut self,
        race: &RaceInfo,
        invocation: &CommandInvocation,
        message: &ChatMessage,
    ) -> CommandResult {
        let Some(kind) = CommandKind::resolve(&invocation.name, &self.config) else {
            debug!(
                session_id = %self.session_id,
                command = %invocation.name,
                "Ignoring unknown command"
            );
            return Ok(Vec::new());
        };

        PermissionMatrix::authorize(
            kind,
            &AccessContext {
                race,
                message,
                locked: self.locked,
                seed_rolled: self.seed_rolled,
            },
        )?;

        let args = &invocation.args;
        match kind {
            CommandKind::Lock => Ok(self.lock()),
            CommandKind::Unlock => Ok(self.unlock()),
            CommandKind::DwFlags => self.dwflags(args),
            CommandKind::Version => self.set_version(args),
            CommandKind::Beta => self.set_beta(args),
            CommandKind::Url => Ok(self.print_url()),
            CommandKind::Clear => Ok(self.clear()),
            CommandKind::Roll => self.roll_standard(race),
            CommandKind::Summer => self.roll_summer(race),
            CommandKind::Juef => self.roll_juef(race, args),
            CommandKind::Preset => self.roll_preset(race, &invocation.name),
        }
    }

    // ==================== Lock ====================

    fn lock(&mut self) -> Vec<RoomAction> {
        self.locked = true;
        info!(session_id = %self.session_id, "Seed rolling locked");
        vec![RoomAction::send(
            "Lock initiated. I will now only roll seeds for race monitors.",
        )]
    }

    fn unlock(&mut self) -> Vec<RoomAction> {
        self.locked = false;
        info!(session_id = %self.session_id, "Seed rolling unlocked");
        vec![RoomAction::send("Lock released. Anyone may now roll a seed.")]
    }

    // ==================== Rolls ====================

    fn roll_standard(&mut self, race: &RaceInfo) -> CommandResult {
        if race.goal_name() != self.config.roll_goal {
            return Err(CommandError::WrongGoal(
                "This command only works in Standard".to_string(),
            ));
        }
        self.commit_roll(RollRequest {
            flags: self.config.standard_flags.clone(),
            version: VersionRule::Set(self.config.versions.default.clone()),
            build: None,
            label: None,
        })
    }

    fn roll_summer(&mut self, race: &RaceInfo) -> CommandResult {
        self.require_standard_goal(race)?;
        self.commit_roll(RollRequest {
            flags: self.config.standard_flags.clone(),
            version: VersionRule::Set(self.config.versions.summer.clone()),
            build: Some(BuildType::Te),
            label: None,
        })
    }

    fn roll_juef(&mut self, race: &RaceInfo, args: &[String]) -> CommandResult {
        self.require_standard_goal(race)?;
        let flags = single_flags_arg(args)?;
        self.commit_roll(RollRequest {
            flags,
            version: VersionRule::Set(self.config.versions.juef.clone()),
            build: Some(BuildType::Juef),
            label: None,
        })
    }

    fn roll_preset(&mut self, race: &RaceInfo, name: &str) -> CommandResult {
        if self.config.is_standard_goal(race.goal_name()) {
            return Err(CommandError::WrongGoal(
                "This does not work in Standard or Standard Tournament".to_string(),
            ));
        }
        // Resolved from the same config by dispatch, so the preset exists
        let Some(preset) = self.config.preset(name) else {
            return Ok(Vec::new());
        };
        let request = RollRequest {
            flags: preset.flags.clone(),
            version: VersionRule::DefaultIfUnset(self.config.versions.default.clone()),
            build: None,
            label: preset.label.clone(),
        };
        self.commit_roll(request)
    }

    fn dwflags(&mut self, args: &[String]) -> CommandResult {
        let flags = single_flags_arg(args)?;
        self.commit_roll(RollRequest {
            flags,
            version: VersionRule::DefaultIfUnset(self.config.versions.default.clone()),
            build: None,
            label: None,
        })
    }

    fn require_standard_goal(&self, race: &RaceInfo) -> Result<(), CommandError> {
        if self.config.is_standard_goal(race.goal_name()) {
            Ok(())
        } else {
            Err(CommandError::WrongGoal(
                "This command only works in Standard and Tournament".to_string(),
            ))
        }
    }

    /// Commit a new seed. Rejects if one is already active.
    fn commit_roll(&mut self, request: RollRequest) -> CommandResult {
        if self.seed_rolled {
            return Err(CommandError::AlreadyRolled);
        }

        match request.version {
            VersionRule::Set(version) => self.race_version = Some(version),
            VersionRule::DefaultIfUnset(version) => {
                self.race_version.get_or_insert(version);
            }
        }
        if let Some(build) = request.build {
            self.build_type = build;
        }

        let mut actions = Vec::new();
        if let Some(label) = request.label {
            actions.push(RoomAction::send(label));
        }

        let seed = Seed::generate(&mut self.rng);
        self.seed = Some(seed);
        self.flag_string = request.flags;
        self.seed_rolled = true;

        info!(
            session_id = %self.session_id,
            seed = %seed,
            flags = %self.flag_string,
            build = %self.build_type,
            "Seed rolled"
        );

        actions.extend(self.refresh_info());
        Ok(actions)
    }

    // ==================== Version ====================

    fn set_version(&mut self, args: &[String]) -> CommandResult {
        let [version] = args else {
            return Err(CommandError::usage("Hey, you forgot a new version."));
        };
        let version = parse_version(version)?;
        Ok(self.apply_version(version, None))
    }

    fn set_beta(&mut self, args: &[String]) -> CommandResult {
        let [version, build_number] = args else {
            return Err(CommandError::Usage {
                message: "Hey, you forgot a new version and build number.".to_string(),
                example: Some("Example: !beta v3.0.3 670".to_string()),
            });
        };
        let version = RaceVersion::beta(&parse_version(version)?, build_number);
        Ok(self.apply_version(version, Some(BuildType::Beta)))
    }

    fn apply_version(&mut self, version: RaceVersion, build: Option<BuildType>) -> Vec<RoomAction> {
        let mut actions = vec![RoomAction::send(format!(
            "Seed version updated to: {}",
            version
        ))];
        debug!(session_id = %self.session_id, version = %version, "Race version set");
        self.race_version = Some(version);
        if let Some(build) = build {
            self.build_type = build;
        }
        actions.extend(self.refresh_info());
        actions
    }

    // ==================== Clear ====================

    fn clear(&mut self) -> Vec<RoomAction> {
        let mut actions = Vec::new();
        if self.seed_rolled {
            actions.push(RoomAction::set_info(""));
        }
        self.info_published = false;
        self.seed_rolled = false;
        self.flag_string.clear();
        self.seed = None;
        self.race_version = None;
        self.build_type = BuildType::Release;
        info!(session_id = %self.session_id, "Race info cleared");
        actions.push(RoomAction::send("Race info cleared!"));
        actions
    }

    // ==================== Derived state ====================

    /// Republish the info line and URL. Nothing happens without a seed.
    fn refresh_info(&mut self) -> Vec<RoomAction> {
        let Some(line) = self.info_line() else {
            return Vec::new();
        };
        self.info_published = true;
        let mut actions = vec![RoomAction::set_info(line.clone()), RoomAction::send(line)];
        actions.extend(self.print_url());
        actions
    }

    fn print_url(&self) -> Vec<RoomAction> {
        self.spoiler_url().map(RoomAction::send).into_iter().collect()
    }
}

impl RaceHandler for RaceSession {
    fn on_begin(&mut self, race: &RaceInfo) -> Vec<RoomAction> {
        if self.should_stop(race) {
            return Vec::new();
        }
        if self.intro_sent || race.is_in_progress() {
            return Vec::new();
        }

        let welcome = if self.config.is_standard_goal(race.goal_name()) {
            "Welcome to DWR! Create a standard seed with !roll or !roll3 for version 3.0"
        } else {
            "Welcome to DWR! Create a custom flag seed with !dwflags <flags> or !dwflags3 <flags> for version 3.0"
        };
        self.intro_sent = true;
        info!(session_id = %self.session_id, goal = %race.goal_name(), "Sent introduction");

        vec![
            RoomAction::send(welcome),
            RoomAction::send(format!(
                "Full list of raceroom commands at {}",
                self.config.command_reference_url
            )),
        ]
    }

    fn on_command(
        &mut self,
        race: &RaceInfo,
        invocation: &CommandInvocation,
        message: &ChatMessage,
    ) -> Vec<RoomAction> {
        if self.should_stop(race) {
            debug!(
                session_id = %self.session_id,
                status = %race.status,
                "Race is over, ignoring command"
            );
            return Vec::new();
        }

        let actions = match self.dispatch(race, invocation, message) {
            Ok(actions) => actions,
            Err(e) => {
                debug!(
                    session_id = %self.session_id,
                    command = %invocation.name,
                    user = %message.reply_to(),
                    reason = %e,
                    "Command rejected"
                );
                e.into_actions()
            }
        };

        assert_session_invariants(self);
        actions
    }
}

/// Exactly one flags token
fn single_flags_arg(args: &[String]) -> Result<String, CommandError> {
    match args {
        [flags] => Ok(flags.clone()),
        _ => Err(CommandError::usage("Hey, you forgot flags.")),
    }
}

fn parse_version(tag: &str) -> Result<RaceVersion, CommandError> {
    RaceVersion::parse(tag)
        .ok_or_else(|| CommandError::usage("Versions must start with \"v\" (ex.: \"v2.2\")"))
}
