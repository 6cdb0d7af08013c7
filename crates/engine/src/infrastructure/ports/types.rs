//! Plain data passed across the repository ports.

use tapestry_domain::{Character, CharacterStatus, PlayerId};

/// Which characters a listing should return.
///
/// Soft-deleted characters are never listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterFilter {
    pub player_id: Option<PlayerId>,
    pub status: Option<CharacterStatus>,
    /// Case-insensitive substring of the name
    pub name_query: Option<String>,
}

impl CharacterFilter {
    pub fn for_player(player_id: PlayerId) -> Self {
        Self {
            player_id: Some(player_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, character: &Character) -> bool {
        if character.is_deleted() {
            return false;
        }
        if self.player_id.is_some_and(|p| !character.is_owned_by(p)) {
            return false;
        }
        if self.status.is_some_and(|s| character.status() != s) {
            return false;
        }
        match self.name_query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => character
                .name()
                .as_str()
                .to_lowercase()
                .contains(&q.to_lowercase()),
            _ => true,
        }
    }
}

/// One window of a listing plus the size of the whole result.
#[derive(Debug, Clone, Default)]
pub struct CharacterListing {
    pub characters: Vec<Character>,
    pub total_count: u64,
}
