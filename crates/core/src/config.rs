//! Bot configuration schema and loader
//!
//! Every field has a default, so an empty `randobot.toml` yields the
//! built-in configuration. Week presets are plain `[[presets]]` tables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::command::is_builtin_command;
use crate::models::RaceVersion;

/// Flags rolled by `!roll`, `!roll3` and `!summer`
pub const STANDARD_FLAGS: &str = "IVIAAVCEKACAAAAAAAAAAEAQ";

/// Top-level bot configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Link sent with the welcome message
    pub command_reference_url: String,
    /// Goals treated as standard (welcome wording, preset goal gating)
    pub standard_goals: Vec<String>,
    /// The only goal where `!roll` and `!roll3` are allowed
    pub roll_goal: String,
    /// Flags for the standard presets
    pub standard_flags: String,
    pub versions: VersionConfig,
    pub urls: UrlConfig,
    /// Named non-standard presets (`!week1` etc.)
    pub presets: Vec<PresetDef>,
}

/// Version tags bound to specific commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// Used by `!roll3`, and when `!dwflags` or a week preset runs with no version set
    pub default: RaceVersion,
    /// Summer test-event build
    pub summer: RaceVersion,
    /// Community fork build
    pub juef: RaceVersion,
}

/// Spoiler URL templates
///
/// Placeholders: `{build}`, `{flags}`, `{seed}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Official builds, keyed by build type
    pub release_template: String,
    /// Community fork build
    pub juef_template: String,
    /// Version prefixes the official template knows about
    pub versioned_prefixes: Vec<String>,
}

/// A fixed-flag roll command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetDef {
    /// Command name without the leading `!`
    pub name: String,
    pub flags: String,
    /// Sent to the room right before the seed
    #[serde(default)]
    pub label: Option<String>,
}

impl PresetDef {
    fn new(name: &str, flags: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: flags.to_string(),
            label: Some(label.to_string()),
        }
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Preset '{0}' is defined more than once")]
    DuplicatePreset(String),
    #[error("Preset '{0}' shadows a built-in command")]
    ReservedPreset(String),
    #[error("Preset '{name}' is invalid: {reason}")]
    InvalidPreset { name: String, reason: String },
    #[error("standard_flags must not be empty")]
    EmptyStandardFlags,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_reference_url: "https://pastebin.com/raw/4nKVRxXR".to_string(),
            standard_goals: vec!["Standard Flags".to_string(), "Tournament".to_string()],
            roll_goal: "Standard Flags".to_string(),
            standard_flags: STANDARD_FLAGS.to_string(),
            versions: VersionConfig::default(),
            urls: UrlConfig::default(),
            presets: default_presets(),
        }
    }
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            default: RaceVersion::known("v3.0.3"),
            summer: RaceVersion::known("v2025-TE"),
            juef: RaceVersion::known("v3.0.3.18"),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            release_template: "https://dwrandomizer.com/{build}/#flags={flags}&seed={seed}"
                .to_string(),
            juef_template:
                "https://snestop.jerther.com/misc/dwr/unofficial_juef/current/#flags={flags}&seed={seed}"
                    .to_string(),
            versioned_prefixes: vec!["v3.0".to_string(), "v2025-TE".to_string()],
        }
    }
}

/// 2024 winter league presets
fn default_presets() -> Vec<PresetDef> {
    vec![
        PresetDef::new("week1", "CVKQAVCECUABCQAAIAAAAZAQ", "It`s Winter Chaos Time"),
        PresetDef::new("week2", "IVIAAVCFKECBAQCAKEAAAZBU", "Big Swamp? No Hurtmore? No Problem!"),
        PresetDef::new("week3", "IQAAAVCUAAABAAIAIAAAAIAQ", "Neapolitan-ish"),
        PresetDef::new("week4", "UWVIA2CEVIUBVAAKUIAABWQQ", "Random%"),
        PresetDef::new("week5", "KVIUAVCEKUABAAAAIAAAAFJU", "ChaosThe2nd"),
        PresetDef::new("week6", "KVIAIVCFKUABAAAAIAAAAEJU", "Stair Shuffle Chaos"),
        PresetDef::new("week7", "UWJIAVCVSJCBAAAAMAAAAGRU", "Random Repel Runback"),
        PresetDef::new("week8a", "IVIAAVCAKACBAACVCQAAAEJE", "You No Nothing, Jon Snow"),
        PresetDef::new("week8b", "KVIUIVCEKVABAAAAKEAAAEJU", "Kitchen Sink!"),
    ]
}

impl BotConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            presets = config.presets.len(),
            "Loaded bot configuration"
        );
        Ok(config)
    }

    /// Parse and validate config from TOML content
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: BotConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the standard flags and every preset
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.standard_flags.trim().is_empty() {
            return Err(ConfigError::EmptyStandardFlags);
        }
        let mut seen = std::collections::HashSet::new();
        for preset in &self.presets {
            if is_builtin_command(&preset.name) {
                return Err(ConfigError::ReservedPreset(preset.name.clone()));
            }
            if !seen.insert(preset.name.as_str()) {
                return Err(ConfigError::DuplicatePreset(preset.name.clone()));
            }
            if preset.name.is_empty() || preset.name.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidPreset {
                    name: preset.name.clone(),
                    reason: "name must be a single non-empty word".to_string(),
                });
            }
            if preset.flags.trim().is_empty() {
                return Err(ConfigError::InvalidPreset {
                    name: preset.name.clone(),
                    reason: "flags must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn is_standard_goal(&self, goal: &str) -> bool {
        self.standard_goals.iter().any(|g| g == goal)
    }

    /// Look up a named preset (case-sensitive, like the rest of the command surface)
    pub fn preset(&self, name: &str) -> Option<&PresetDef> {
        self.presets.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = BotConfig::from_toml("").unwrap();
        assert_eq!(config, BotConfig::default());
        assert_eq!(config.presets.len(), 9);
        assert_eq!(config.versions.default.as_str(), "v3.0.3");
        assert!(config.is_standard_goal("Tournament"));
        assert!(!config.is_standard_goal("Random League"));
    }

    #[test]
    fn test_custom_presets_replace_defaults() {
        let toml = r#"
command_reference_url = "https://example.org/commands"

[[presets]]
name = "spring1"
flags = "AAAAAAAAAAAAAAAAAAAAAAAA"
label = "Spring has sprung"

[[presets]]
name = "spring2"
flags = "BBBBBBBBBBBBBBBBBBBBBBBB"
"#;
        let config = BotConfig::from_toml(toml).unwrap();
        assert_eq!(config.command_reference_url, "https://example.org/commands");
        assert_eq!(config.presets.len(), 2);
        assert_eq!(
            config.preset("spring1").and_then(|p| p.label.as_deref()),
            Some("Spring has sprung")
        );
        assert_eq!(config.preset("spring2").unwrap().label, None);
        assert!(config.preset("week1").is_none());
        assert_eq!(config.standard_flags, STANDARD_FLAGS);
    }

    #[test]
    fn test_reserved_preset_name() {
        let toml = r#"
[[presets]]
name = "roll3"
flags = "AAAA"
"#;
        assert!(matches!(
            BotConfig::from_toml(toml),
            Err(ConfigError::ReservedPreset(name)) if name == "roll3"
        ));
    }

    #[test]
    fn test_duplicate_preset_name() {
        let toml = r#"
[[presets]]
name = "week1"
flags = "AAAA"

[[presets]]
name = "week1"
flags = "BBBB"
"#;
        assert!(matches!(
            BotConfig::from_toml(toml),
            Err(ConfigError::DuplicatePreset(_))
        ));
    }

    #[test]
    fn test_empty_preset_flags() {
        let toml = r#"
[[presets]]
name = "blank"
flags = "  "
"#;
        assert!(matches!(
            BotConfig::from_toml(toml),
            Err(ConfigError::InvalidPreset { .. })
        ));
    }

    #[test]
    fn test_empty_standard_flags() {
        for toml in ["standard_flags = \"\"", "standard_flags = \"   \""] {
            assert!(matches!(
                BotConfig::from_toml(toml),
                Err(ConfigError::EmptyStandardFlags)
            ));
        }
    }

    #[test]
    fn test_version_must_start_with_v() {
        let toml = r#"
[versions]
summer = "2026-TE"
"#;
        assert!(matches!(
            BotConfig::from_toml(toml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "roll_goal = \"Speedrun Flags\"").unwrap();
        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.roll_goal, "Speedrun Flags");
        assert_eq!(config.urls, UrlConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = BotConfig::load(Path::new("/nonexistent/randobot.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
