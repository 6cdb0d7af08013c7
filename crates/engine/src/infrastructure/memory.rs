//! In-memory character and snapshot storage.

use async_trait::async_trait;
use dashmap::DashMap;
use tapestry_domain::value_objects::CharacterSnapshot;
use tapestry_domain::{Character, CharacterId};

use crate::infrastructure::ports::{
    CharacterFilter, CharacterListing, CharacterRepo, RepoError, SnapshotRepo,
};

/// Characters held in a concurrent map, lost on restart.
#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: DashMap<CharacterId, Character>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.characters.insert(character.id(), character.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: CharacterFilter,
        limit: u32,
        offset: u32,
    ) -> Result<CharacterListing, RepoError> {
        let mut matching: Vec<Character> = self
            .characters
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matching.sort_by(|a, b| {
            b.updated_at()
                .cmp(&a.updated_at())
                .then_with(|| a.id().to_uuid().cmp(&b.id().to_uuid()))
        });

        let total_count = matching.len() as u64;
        let characters = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok(CharacterListing {
            characters,
            total_count,
        })
    }
}

/// Latest snapshot per character.
#[derive(Default)]
pub struct InMemorySnapshotRepo {
    snapshots: DashMap<CharacterId, CharacterSnapshot>,
}

impl InMemorySnapshotRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotRepo for InMemorySnapshotRepo {
    async fn latest(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<CharacterSnapshot>, RepoError> {
        Ok(self
            .snapshots
            .get(&character_id)
            .map(|entry| entry.value().clone()))
    }

    async fn save(&self, snapshot: &CharacterSnapshot) -> Result<(), RepoError> {
        self.snapshots.insert(snapshot.character_id, snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use tapestry_domain::{CharacterName, CharacterStatus, PlayerId};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn character(player: PlayerId, name: &str, updated: i64) -> Character {
        Character::new(player, CharacterName::new(name).unwrap(), at(updated)).unwrap()
    }

    #[tokio::test]
    async fn save_then_get() {
        let repo = InMemoryCharacterRepo::new();
        let c = character(PlayerId::new(), "Ash", 0);
        repo.save(&c).await.unwrap();

        assert_eq!(repo.get(c.id()).await.unwrap(), Some(c));
        assert_eq!(repo.get(CharacterId::new()).await.unwrap(), None);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn list_sorts_newest_first_and_pages() {
        let repo = InMemoryCharacterRepo::new();
        let player = PlayerId::new();
        for (name, updated) in [("Ash", 10), ("Birch", 30), ("Cedar", 20)] {
            repo.save(&character(player, name, updated)).await.unwrap();
        }

        let first = repo
            .list(CharacterFilter::for_player(player), 2, 0)
            .await
            .unwrap();
        let names: Vec<_> = first.characters.iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["Birch", "Cedar"]);
        assert_eq!(first.total_count, 3);

        let second = repo
            .list(CharacterFilter::for_player(player), 2, 2)
            .await
            .unwrap();
        assert_eq!(second.characters.len(), 1);
        assert_eq!(second.characters[0].name().as_str(), "Ash");
    }

    #[tokio::test]
    async fn list_filters_owner_status_name_and_deleted() {
        let repo = InMemoryCharacterRepo::new();
        let player = PlayerId::new();

        repo.save(&character(player, "Willow Fen", 1)).await.unwrap();
        repo.save(&character(PlayerId::new(), "Willow Bright", 2))
            .await
            .unwrap();
        let mut archived = character(player, "Old Willow", 3);
        archived.archive(at(4));
        repo.save(&archived).await.unwrap();
        let mut deleted = character(player, "Gone Willow", 5);
        deleted.soft_delete(at(6)).unwrap();
        repo.save(&deleted).await.unwrap();

        let filter = CharacterFilter {
            player_id: Some(player),
            status: Some(CharacterStatus::Active),
            name_query: Some("WILLOW".into()),
        };
        let listing = repo.list(filter, 10, 0).await.unwrap();
        assert_eq!(listing.total_count, 1);
        assert_eq!(listing.characters[0].name().as_str(), "Willow Fen");

        let everyone = repo.list(CharacterFilter::default(), 10, 0).await.unwrap();
        assert_eq!(everyone.total_count, 3);
    }

    #[tokio::test]
    async fn snapshot_save_replaces_latest() {
        let repo = InMemorySnapshotRepo::new();
        let mut c = character(PlayerId::new(), "Ash", 0);
        assert_eq!(repo.latest(c.id()).await.unwrap(), None);

        let first = CharacterSnapshot::create(&c, at(1));
        repo.save(&first).await.unwrap();
        c.rename(CharacterName::new("Ember").unwrap(), at(2));
        repo.save(&first.update(&c, at(3))).await.unwrap();

        let latest = repo.latest(c.id()).await.unwrap().unwrap();
        assert_eq!(latest.name, "Ember");
        assert_eq!(latest.snapshot_date, at(3));
        assert!(latest.previous_data.is_some());
    }
}
