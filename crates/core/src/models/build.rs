//! Build type and version tags

use serde::{Deserialize, Serialize};

/// Which deployed randomizer build a seed belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    #[default]
    Release,
    Beta,
    /// Test-event build
    Te,
    /// Community fork
    Juef,
}

impl BuildType {
    /// Path segment used in the official URL scheme
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Release => "release",
            BuildType::Beta => "beta",
            BuildType::Te => "te",
            BuildType::Juef => "juef",
        }
    }
}

impl std::fmt::Display for BuildType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A randomizer version tag. Always starts with `v`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RaceVersion(String);

impl RaceVersion {
    /// Returns `None` unless the tag starts with `v`
    pub fn parse(tag: &str) -> Option<Self> {
        tag.starts_with('v').then(|| Self(tag.to_string()))
    }

    /// Version tag fixed at compile time
    pub(crate) fn known(tag: &'static str) -> Self {
        debug_assert!(tag.starts_with('v'), "version tag {} lacks v prefix", tag);
        Self(tag.to_string())
    }

    /// Beta tag: `<version>b<build>`
    pub fn beta(version: &RaceVersion, build_number: &str) -> Self {
        Self(format!("{}b{}", version.0, build_number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RaceVersion {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if value.starts_with('v') {
            Ok(Self(value))
        } else {
            Err(format!("version '{}' must start with \"v\"", value))
        }
    }
}

impl From<RaceVersion> for String {
    fn from(version: RaceVersion) -> Self {
        version.0
    }
}

impl std::fmt::Display for RaceVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
