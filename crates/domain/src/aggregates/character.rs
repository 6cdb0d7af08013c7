//! Character aggregate - a player's Tapestry character
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: all state is reached through accessors
//! - **Newtypes**: `CharacterName` is valid by construction
//! - **Status enum**: `CharacterStatus` instead of `is_archived` booleans
//! - **Domain events**: mutations return outcome enums (`CharacterUpdate`, etc.)
//! - **Rules on write**: every sheet that enters the aggregate goes through
//!   [`apply_character_rules`](crate::rules::apply_character_rules)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::events::{CampaignMembershipChange, CharacterStatusChange, CharacterUpdate};
use crate::rules::{apply_character_rules, CharacterRuleData, RuleValidationError};
use crate::value_objects::{CharacterName, CharacterSheet, GameSetting};
use crate::{CampaignId, CharacterId, PlayerId};

/// Ruleset revision written on new characters.
pub const CURRENT_RULESET_VERSION: u32 = 1;

fn default_ruleset_version() -> u32 {
    CURRENT_RULESET_VERSION
}

/// Whether a character shows up in the player's active roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterStatus {
    #[default]
    Active,
    Archived,
}

impl CharacterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl std::str::FromStr for CharacterStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(DomainError::parse(format!(
                "Unknown character status: {}",
                other
            ))),
        }
    }
}

/// Bookkeeping timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterMeta {
    #[serde(default)]
    pub last_played_at: Option<DateTime<Utc>>,
    /// Set when the character is soft-deleted
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A player's character.
///
/// # Invariants
///
/// - `name` is non-empty and at most 200 characters (enforced by `CharacterName`)
/// - the sheet's hp and threads satisfy the Tapestry rules whenever the sheet
///   was set through `new`, `replace_sheet` or `enforce_rules`
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use tapestry_domain::aggregates::Character;
/// use tapestry_domain::value_objects::CharacterName;
/// use tapestry_domain::PlayerId;
///
/// let player = PlayerId::new();
/// let name = CharacterName::new("Mireille").unwrap();
/// let character = Character::new(player, name, Utc::now()).unwrap();
///
/// assert!(character.is_owned_by(player));
/// assert_eq!(character.sheet().resources.hp.map(|hp| hp.max), Some(12));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    id: CharacterId,
    player_id: PlayerId,
    campaign_id: Option<CampaignId>,
    name: CharacterName,
    avatar_url: Option<String>,
    forked_from: Option<CharacterId>,
    status: CharacterStatus,
    #[serde(default)]
    tags: Vec<String>,
    setting_key: Option<GameSetting>,
    #[serde(default)]
    tone_modules: Vec<String>,
    #[serde(default = "default_ruleset_version")]
    ruleset_version: u32,
    sheet: CharacterSheet,
    #[serde(default)]
    meta: CharacterMeta,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a character with a default sheet, run through the rules.
    pub fn new(
        player_id: PlayerId,
        name: CharacterName,
        now: DateTime<Utc>,
    ) -> Result<Self, RuleValidationError> {
        let mut character = Self {
            id: CharacterId::new(),
            player_id,
            campaign_id: None,
            name,
            avatar_url: None,
            forked_from: None,
            status: CharacterStatus::Active,
            tags: Vec::new(),
            setting_key: None,
            tone_modules: Vec::new(),
            ruleset_version: CURRENT_RULESET_VERSION,
            sheet: CharacterSheet::default(),
            meta: CharacterMeta::default(),
            created_at: now,
            updated_at: now,
        };
        character.enforce_rules()?;
        Ok(character)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    #[inline]
    pub fn campaign_id(&self) -> Option<CampaignId> {
        self.campaign_id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// The character this one was copied from, if any.
    #[inline]
    pub fn forked_from(&self) -> Option<CharacterId> {
        self.forked_from
    }

    #[inline]
    pub fn status(&self) -> CharacterStatus {
        self.status
    }

    #[inline]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[inline]
    pub fn setting_key(&self) -> Option<GameSetting> {
        self.setting_key
    }

    #[inline]
    pub fn tone_modules(&self) -> &[String] {
        &self.tone_modules
    }

    #[inline]
    pub fn ruleset_version(&self) -> u32 {
        self.ruleset_version
    }

    #[inline]
    pub fn sheet(&self) -> &CharacterSheet {
        &self.sheet
    }

    #[inline]
    pub fn meta(&self) -> &CharacterMeta {
        &self.meta
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.meta.deleted_at.is_some()
    }

    #[inline]
    pub fn is_owned_by(&self, player_id: PlayerId) -> bool {
        self.player_id == player_id
    }

    // =========================================================================
    // Builder Methods (for construction)
    // =========================================================================

    /// Set the character's ID (used when loading from storage).
    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }

    pub fn with_setting(mut self, setting: GameSetting) -> Self {
        self.setting_key = Some(setting);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_tone_modules(mut self, modules: Vec<String>) -> Self {
        self.tone_modules = modules;
        self
    }

    pub fn with_campaign(mut self, campaign_id: CampaignId) -> Self {
        self.campaign_id = Some(campaign_id);
        self
    }

    /// Set the sheet, running it through validation and the rules.
    pub fn with_sheet(mut self, sheet: CharacterSheet) -> Result<Self, DomainError> {
        let now = self.updated_at;
        self.replace_sheet(sheet, now)?;
        Ok(self)
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Run the Tapestry rules over the current sheet and write the derived
    /// resource tracks back.
    ///
    /// On error the sheet is left exactly as it was.
    pub fn enforce_rules(&mut self) -> Result<(), RuleValidationError> {
        let resources = &self.sheet.resources;
        let mut data = CharacterRuleData {
            aspects: Some(self.sheet.aspects.clone()),
            hp: resources.hp,
            threads: resources.threads,
            resolve: resources.resolve,
            other: serde_json::Map::new(),
        };
        apply_character_rules(&mut data)?;

        self.sheet.resources.hp = data.hp;
        self.sheet.resources.threads = data.threads;
        Ok(())
    }

    /// Replace the whole sheet.
    ///
    /// The candidate is validated and ruled before it is stored, so a
    /// rejected sheet never replaces the current one.
    pub fn replace_sheet(
        &mut self,
        sheet: CharacterSheet,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sheet.validate()?;

        let mut candidate = self.clone();
        candidate.sheet = sheet;
        candidate.sheet.stamp_conditions(now);
        candidate.enforce_rules()?;

        self.sheet = candidate.sheet;
        self.touch(now);
        Ok(())
    }

    // =========================================================================
    // Mutation Methods (return domain events)
    // =========================================================================

    pub fn rename(&mut self, name: CharacterName, now: DateTime<Utc>) -> CharacterUpdate {
        if self.name == name {
            return CharacterUpdate::Unchanged;
        }
        let from = std::mem::replace(&mut self.name, name);
        self.touch(now);
        CharacterUpdate::NameChanged {
            from,
            to: self.name.clone(),
        }
    }

    pub fn set_avatar(&mut self, url: Option<String>, now: DateTime<Utc>) {
        self.avatar_url = url;
        self.touch(now);
    }

    pub fn set_setting(&mut self, setting: Option<GameSetting>, now: DateTime<Utc>) {
        self.setting_key = setting;
        self.touch(now);
    }

    pub fn set_tags(&mut self, tags: Vec<String>, now: DateTime<Utc>) {
        self.tags = tags;
        self.touch(now);
    }

    pub fn set_tone_modules(&mut self, modules: Vec<String>, now: DateTime<Utc>) {
        self.tone_modules = modules;
        self.touch(now);
    }

    /// Attach the character to a campaign. A character belongs to at most one.
    pub fn join_campaign(
        &mut self,
        campaign_id: CampaignId,
        now: DateTime<Utc>,
    ) -> CampaignMembershipChange {
        if self.campaign_id == Some(campaign_id) {
            return CampaignMembershipChange::AlreadyMember { campaign_id };
        }
        let previous = self.campaign_id.replace(campaign_id);
        self.touch(now);
        CampaignMembershipChange::Joined {
            campaign_id,
            previous,
        }
    }

    /// Detach from the current campaign, returning the one that was left.
    pub fn leave_campaign(&mut self, now: DateTime<Utc>) -> Option<CampaignId> {
        let left = self.campaign_id.take();
        if left.is_some() {
            self.touch(now);
        }
        left
    }

    /// Copy this character into a new, campaign-free character.
    pub fn fork(&self, now: DateTime<Utc>) -> Character {
        Character {
            id: CharacterId::new(),
            campaign_id: None,
            name: self.name.copy_of(),
            forked_from: Some(self.id),
            status: CharacterStatus::Active,
            meta: CharacterMeta::default(),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn archive(&mut self, now: DateTime<Utc>) -> CharacterStatusChange {
        self.set_status(CharacterStatus::Archived, now)
    }

    pub fn restore(&mut self, now: DateTime<Utc>) -> CharacterStatusChange {
        self.set_status(CharacterStatus::Active, now)
    }

    pub fn set_status(
        &mut self,
        status: CharacterStatus,
        now: DateTime<Utc>,
    ) -> CharacterStatusChange {
        if self.status == status {
            return CharacterStatusChange::Unchanged { status };
        }
        let from = std::mem::replace(&mut self.status, status);
        self.touch(now);
        CharacterStatusChange::StatusChanged { from, to: status }
    }

    /// Mark the character deleted without removing it from storage.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_deleted() {
            return Err(DomainError::invalid_state_transition(format!(
                "Character {} is already deleted",
                self.id
            )));
        }
        self.meta.deleted_at = Some(now);
        self.touch(now);
        Ok(())
    }

    pub fn mark_played(&mut self, now: DateTime<Utc>) {
        self.meta.last_played_at = Some(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
