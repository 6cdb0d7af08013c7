//! Point-in-time copies of a character, used for history and undo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregates::Character;
use crate::{CharacterId, PlayerId};

/// A stored copy of a character at `snapshot_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSnapshot {
    pub character_id: CharacterId,
    pub player_id: PlayerId,
    pub snapshot_date: DateTime<Utc>,
    pub name: String,
    pub data: Character,
    /// The data this snapshot held before its last update
    #[serde(default)]
    pub previous_data: Option<Box<Character>>,
}

/// Result of comparing two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDiff {
    pub changed: bool,
    /// `new.snapshot_date - old.snapshot_date` in milliseconds
    pub date_diff_ms: i64,
}

impl CharacterSnapshot {
    pub fn create(character: &Character, now: DateTime<Utc>) -> Self {
        Self {
            character_id: character.id(),
            player_id: character.player_id(),
            snapshot_date: now,
            name: character.name().to_string(),
            data: character.clone(),
            previous_data: None,
        }
    }

    /// Refresh the snapshot, keeping the replaced data as `previous_data`.
    pub fn update(self, character: &Character, now: DateTime<Utc>) -> Self {
        Self {
            snapshot_date: now,
            name: character.name().to_string(),
            data: character.clone(),
            previous_data: Some(Box::new(self.data)),
            ..self
        }
    }

    pub fn compare(old: &Self, new: &Self) -> SnapshotDiff {
        SnapshotDiff {
            changed: old.data != new.data,
            date_diff_ms: (new.snapshot_date - old.snapshot_date).num_milliseconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::CharacterName;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn update_keeps_previous_data() {
        let mut character =
            Character::new(PlayerId::new(), CharacterName::new("Ash").unwrap(), at(0)).unwrap();
        let first = CharacterSnapshot::create(&character, at(1));
        assert!(first.previous_data.is_none());

        character.rename(CharacterName::new("Ember").unwrap(), at(2));
        let second = first.clone().update(&character, at(3));

        assert_eq!(second.name, "Ember");
        assert_eq!(
            second.previous_data.as_deref().map(|c| c.name().as_str()),
            Some("Ash")
        );
        assert_eq!(second.character_id, first.character_id);
    }

    #[test]
    fn compare_reports_change_and_elapsed_time() {
        let mut character =
            Character::new(PlayerId::new(), CharacterName::new("Ash").unwrap(), at(0)).unwrap();
        let old = CharacterSnapshot::create(&character, at(10));
        let same = CharacterSnapshot::create(&character, at(12));
        assert_eq!(
            CharacterSnapshot::compare(&old, &same),
            SnapshotDiff {
                changed: false,
                date_diff_ms: 2_000
            }
        );

        character.archive(at(11));
        let new = CharacterSnapshot::create(&character, at(15));
        assert!(CharacterSnapshot::compare(&old, &new).changed);
    }
}
