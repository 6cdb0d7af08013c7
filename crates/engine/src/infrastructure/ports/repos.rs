//! Repository and publisher port traits.

use async_trait::async_trait;
use tapestry_domain::value_objects::CharacterSnapshot;
use tapestry_domain::{Character, CharacterEvent, CharacterId};

use super::error::{PublishError, RepoError};
use super::types::{CharacterFilter, CharacterListing};

// =============================================================================
// Database Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    /// Fetch by id, soft-deleted characters included.
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    /// Insert or replace.
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    /// Matching characters, most recently updated first.
    async fn list(
        &self,
        filter: CharacterFilter,
        limit: u32,
        offset: u32,
    ) -> Result<CharacterListing, RepoError>;
}

/// One snapshot per character; saving replaces the previous one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotRepo: Send + Sync {
    async fn latest(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<CharacterSnapshot>, RepoError>;
    async fn save(&self, snapshot: &CharacterSnapshot) -> Result<(), RepoError>;
}

// =============================================================================
// Messaging Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: CharacterEvent) -> Result<(), PublishError>;
}
