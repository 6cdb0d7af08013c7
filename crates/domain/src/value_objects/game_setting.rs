//! Game settings (worlds) that content and characters can be filtered by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A published game setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameSetting {
    WovenRealms,
    Cyberpunk,
}

/// Display information for a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingMetadata {
    pub key: GameSetting,
    pub display_name: &'static str,
    pub description: &'static str,
}

impl GameSetting {
    /// Every available setting.
    pub fn all() -> [GameSetting; 2] {
        [Self::WovenRealms, Self::Cyberpunk]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WovenRealms => "woven-realms",
            Self::Cyberpunk => "cyberpunk",
        }
    }

    pub fn is_valid(key: &str) -> bool {
        key.parse::<Self>().is_ok()
    }

    pub fn metadata(&self) -> SettingMetadata {
        let (display_name, description) = match self {
            Self::WovenRealms => ("Woven Realms", "A fantasy world of magic and mystery"),
            Self::Cyberpunk => (
                "Cyberpunk 2080",
                "A dystopian future of technology and corporate power",
            ),
        };
        SettingMetadata {
            key: *self,
            display_name,
            description,
        }
    }
}

impl fmt::Display for GameSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameSetting {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|setting| setting.as_str() == s.trim())
            .ok_or_else(|| DomainError::parse(format!("Unknown game setting: {}", s)))
    }
}
