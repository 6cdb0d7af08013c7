//! Domain Events
//!
//! `CharacterEvent` is published by the engine after a successful mutation.
//! The `character_events` submodule holds the return types of aggregate
//! mutations.

pub mod character_events;

pub use character_events::*;

use serde::{Deserialize, Serialize};

use crate::{CampaignId, CharacterId, PlayerId};

/// Events published to other services when a character changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CharacterEvent {
    #[serde(rename_all = "camelCase")]
    Created {
        character_id: CharacterId,
        player_id: PlayerId,
    },
    #[serde(rename_all = "camelCase")]
    JoinedCampaign {
        character_id: CharacterId,
        campaign_id: CampaignId,
        player_id: PlayerId,
    },
    #[serde(rename_all = "camelCase")]
    LeftCampaign {
        character_id: CharacterId,
        campaign_id: CampaignId,
        player_id: PlayerId,
    },
    #[serde(rename_all = "camelCase")]
    Forked {
        original_id: CharacterId,
        forked_id: CharacterId,
        player_id: PlayerId,
    },
}

impl CharacterEvent {
    /// Message-bus topic the event is published on.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Created { .. } => "game.character.created",
            Self::JoinedCampaign { .. } => "game.character.joined_campaign",
            Self::LeftCampaign { .. } => "game.character.left_campaign",
            Self::Forked { .. } => "game.character.forked",
        }
    }

    pub fn player_id(&self) -> PlayerId {
        match self {
            Self::Created { player_id, .. }
            | Self::JoinedCampaign { player_id, .. }
            | Self::LeftCampaign { player_id, .. }
            | Self::Forked { player_id, .. } => *player_id,
        }
    }
}
