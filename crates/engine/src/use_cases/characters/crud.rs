//! Character CRUD operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tapestry_domain::value_objects::CharacterSnapshot;
use tapestry_domain::{
    CampaignId, Character, CharacterEvent, CharacterId, CharacterName, DomainError, GameSetting,
    PlayerId,
};

use crate::infrastructure::config::PaginationConfig;
use crate::infrastructure::ports::{
    CharacterFilter, CharacterRepo, ClockPort, EventPublisher, SnapshotRepo,
};

use super::{
    CharacterPage, CreateCharacterInput, ListQuery, ManagementError, Page, PageMetadata,
    SnapshotView, UpdateCharacterInput,
};

pub struct CharacterCrud {
    repo: Arc<dyn CharacterRepo>,
    snapshots: Arc<dyn SnapshotRepo>,
    clock: Arc<dyn ClockPort>,
    events: Arc<dyn EventPublisher>,
    pagination: PaginationConfig,
}

impl CharacterCrud {
    pub fn new(
        repo: Arc<dyn CharacterRepo>,
        snapshots: Arc<dyn SnapshotRepo>,
        clock: Arc<dyn ClockPort>,
        events: Arc<dyn EventPublisher>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            repo,
            snapshots,
            clock,
            events,
            pagination,
        }
    }

    pub async fn create(
        &self,
        player_id: PlayerId,
        input: CreateCharacterInput,
    ) -> Result<Character, ManagementError> {
        let now = self.clock.now();
        let name = CharacterName::new(input.name)?;
        let setting = parse_setting(input.setting_key.as_deref())?;

        let mut character = Character::new(player_id, name, now)?
            .with_tags(input.tags)
            .with_tone_modules(input.tone_modules);
        if let Some(url) = non_blank(input.avatar_url) {
            character = character.with_avatar(url);
        }
        if let Some(setting) = setting {
            character = character.with_setting(setting);
        }
        if let Some(campaign_id) = input.campaign_id {
            character = character.with_campaign(campaign_id);
        }
        if let Some(sheet) = input.sheet {
            character = character
                .with_sheet(sheet)
                .map_err(|e| rejected(e, player_id, None))?;
        }

        self.repo.save(&character).await?;
        tracing::info!(
            character_id = %character.id(),
            player_id = %player_id,
            "Created character"
        );

        self.publish(CharacterEvent::Created {
            character_id: character.id(),
            player_id,
        })
        .await;
        if let Some(campaign_id) = character.campaign_id() {
            self.publish(CharacterEvent::JoinedCampaign {
                character_id: character.id(),
                campaign_id,
                player_id,
            })
            .await;
        }

        Ok(character)
    }

    pub async fn get(&self, character_id: CharacterId) -> Result<Character, ManagementError> {
        tracing::debug!(character_id = %character_id, "Loading character");
        self.repo
            .get(character_id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or(ManagementError::NotFound)
    }

    pub async fn list(&self, query: ListQuery) -> Result<CharacterPage, ManagementError> {
        let page = query.page.unwrap_or(1);
        if page < 1 {
            return Err(ManagementError::InvalidInput(
                "page must be at least 1".to_string(),
            ));
        }
        let limit = query.limit.unwrap_or(self.pagination.default_limit);
        if !(1..=self.pagination.max_limit).contains(&limit) {
            return Err(ManagementError::InvalidInput(format!(
                "limit must be between 1 and {}",
                self.pagination.max_limit
            )));
        }

        let filter = CharacterFilter {
            player_id: query.player_id,
            status: query.status,
            name_query: query.query,
        };
        let offset = (page - 1).saturating_mul(limit);
        let listing = self.repo.list(filter, limit, offset).await?;
        tracing::debug!(
            page,
            limit,
            total_count = listing.total_count,
            "Listed characters"
        );

        Ok(Page {
            entries: listing.characters,
            metadata: PageMetadata {
                total_count: listing.total_count,
                page,
                limit,
            },
        })
    }

    pub async fn update(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
        input: UpdateCharacterInput,
    ) -> Result<Character, ManagementError> {
        let mut character = self.load_owned(player_id, character_id).await?;

        if input.player_id.is_some_and(|owner| owner != character.player_id()) {
            return Err(ManagementError::InvalidInput(
                "Cannot change character owner".to_string(),
            ));
        }

        let now = self.clock.now();
        if let Some(name) = input.name {
            character.rename(CharacterName::new(name)?, now);
        }
        if let Some(url) = input.avatar_url {
            character.set_avatar(non_blank(Some(url)), now);
        }
        if let Some(setting_key) = input.setting_key {
            let setting = parse_setting(Some(&setting_key))?;
            character.set_setting(setting, now);
        }
        if let Some(tags) = input.tags {
            character.set_tags(tags, now);
        }
        if let Some(modules) = input.tone_modules {
            character.set_tone_modules(modules, now);
        }
        if let Some(status) = input.status {
            character.set_status(status, now);
        }
        if let Some(sheet) = input.sheet {
            character
                .replace_sheet(sheet, now)
                .map_err(|e| rejected(e, player_id, Some(character_id)))?;
        }

        self.repo.save(&character).await?;
        tracing::info!(character_id = %character_id, "Updated character");
        Ok(character)
    }

    /// Soft delete: the character disappears from reads but stays stored.
    pub async fn delete(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> Result<(), ManagementError> {
        let mut character = self.load_owned(player_id, character_id).await?;
        character.soft_delete(self.clock.now())?;
        self.repo.save(&character).await?;
        tracing::info!(character_id = %character_id, "Deleted character");
        Ok(())
    }

    pub async fn fork(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> Result<Character, ManagementError> {
        let original = self.load_owned(player_id, character_id).await?;
        let forked = original.fork(self.clock.now());

        self.repo.save(&forked).await?;
        tracing::info!(
            original_id = %character_id,
            forked_id = %forked.id(),
            "Forked character"
        );
        self.publish(CharacterEvent::Forked {
            original_id: character_id,
            forked_id: forked.id(),
            player_id,
        })
        .await;
        Ok(forked)
    }

    pub async fn join_campaign(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
        campaign_id: CampaignId,
    ) -> Result<Character, ManagementError> {
        let mut character = self.load_owned(player_id, character_id).await?;
        let previous = character.campaign_id();
        let now = self.clock.now();
        if !character.join_campaign(campaign_id, now).is_change() {
            return Ok(character);
        }
        character.mark_played(now);

        self.repo.save(&character).await?;
        self.record_snapshot(&character, now).await?;
        tracing::info!(
            character_id = %character_id,
            campaign_id = %campaign_id,
            "Character joined campaign"
        );
        if let Some(previous) = previous {
            self.publish(CharacterEvent::LeftCampaign {
                character_id,
                campaign_id: previous,
                player_id,
            })
            .await;
        }
        self.publish(CharacterEvent::JoinedCampaign {
            character_id,
            campaign_id,
            player_id,
        })
        .await;
        Ok(character)
    }

    pub async fn leave_campaign(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> Result<Character, ManagementError> {
        let mut character = self.load_owned(player_id, character_id).await?;
        let Some(campaign_id) = character.leave_campaign(self.clock.now()) else {
            return Err(ManagementError::InvalidInput(
                "Character is not in a campaign".to_string(),
            ));
        };

        self.repo.save(&character).await?;
        tracing::info!(
            character_id = %character_id,
            campaign_id = %campaign_id,
            "Character left campaign"
        );
        self.publish(CharacterEvent::LeftCampaign {
            character_id,
            campaign_id,
            player_id,
        })
        .await;
        Ok(character)
    }

    /// The character's latest snapshot compared against its current state.
    pub async fn snapshot(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> Result<SnapshotView, ManagementError> {
        let character = self.load_owned(player_id, character_id).await?;
        let snapshot = self
            .snapshots
            .latest(character_id)
            .await?
            .ok_or(ManagementError::NotFound)?;

        let current = CharacterSnapshot::create(&character, self.clock.now());
        let diff = CharacterSnapshot::compare(&snapshot, &current);
        Ok(SnapshotView { snapshot, diff })
    }

    async fn record_snapshot(
        &self,
        character: &Character,
        now: DateTime<Utc>,
    ) -> Result<(), ManagementError> {
        let snapshot = match self.snapshots.latest(character.id()).await? {
            Some(previous) => previous.update(character, now),
            None => CharacterSnapshot::create(character, now),
        };
        self.snapshots.save(&snapshot).await?;
        tracing::debug!(character_id = %character.id(), "Recorded character snapshot");
        Ok(())
    }

    async fn load_owned(
        &self,
        player_id: PlayerId,
        character_id: CharacterId,
    ) -> Result<Character, ManagementError> {
        let character = self.get(character_id).await?;
        if !character.is_owned_by(player_id) {
            tracing::warn!(
                character_id = %character_id,
                player_id = %player_id,
                "Rejected mutation by non-owner"
            );
            return Err(ManagementError::Forbidden);
        }
        Ok(character)
    }

    async fn publish(&self, event: CharacterEvent) {
        let topic = event.topic();
        if let Err(e) = self.events.publish(event).await {
            tracing::warn!(topic, error = %e, "Failed to publish character event");
        }
    }
}

fn parse_setting(key: Option<&str>) -> Result<Option<GameSetting>, ManagementError> {
    match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => key.parse::<GameSetting>().map(Some).map_err(|_| {
            ManagementError::InvalidInput(format!("Invalid setting: {}", key))
        }),
        None => Ok(None),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn rejected(
    error: DomainError,
    player_id: PlayerId,
    character_id: Option<CharacterId>,
) -> ManagementError {
    if let DomainError::Rules(rules) = &error {
        tracing::warn!(
            player_id = %player_id,
            character_id = ?character_id,
            error = %rules,
            "Character sheet rejected by rules"
        );
    }
    error.into()
}
