//! Character management use cases.
//!
//! These keep HTTP handlers thin: handlers parse, `CharacterCrud` loads,
//! checks ownership, mutates the aggregate, saves and publishes.

mod crud;

pub use crud::CharacterCrud;

use serde::{Deserialize, Serialize};
use tapestry_domain::value_objects::{CharacterSnapshot, SnapshotDiff};
use tapestry_domain::{
    CampaignId, Character, CharacterSheet, CharacterStatus, DomainError, PlayerId,
    RuleValidationError,
};

use crate::infrastructure::ports::RepoError;

/// Shared error type for character management.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("Not found")]
    NotFound,
    #[error("Character belongs to another player")]
    Forbidden,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Rules(#[from] RuleValidationError),
    #[error("Domain error: {0}")]
    Domain(DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for ManagementError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Rules(rules) => Self::Rules(rules),
            DomainError::Validation(msg) | DomainError::Parse(msg) | DomainError::InvalidId(msg) => {
                Self::InvalidInput(msg)
            }
            other => Self::Domain(other),
        }
    }
}

/// Fields accepted when creating a character.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacterInput {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
    #[serde(default)]
    pub setting_key: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tone_modules: Vec<String>,
    #[serde(default)]
    pub sheet: Option<CharacterSheet>,
}

impl CreateCharacterInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCharacterInput {
    #[serde(default)]
    pub name: Option<String>,
    /// Only accepted when it names the current owner
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub status: Option<CharacterStatus>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub setting_key: Option<String>,
    #[serde(default)]
    pub tone_modules: Option<Vec<String>>,
    #[serde(default)]
    pub sheet: Option<CharacterSheet>,
}

/// Listing request; `page` is 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub player_id: Option<PlayerId>,
    pub status: Option<CharacterStatus>,
    pub query: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_count: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub metadata: PageMetadata,
}

pub type CharacterPage = Page<Character>;

/// Latest snapshot and how the character has moved on since.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotView {
    pub snapshot: CharacterSnapshot,
    pub diff: SnapshotDiff,
}
