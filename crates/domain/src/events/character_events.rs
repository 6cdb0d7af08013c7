//! Character-related domain events
//!
//! These enums communicate what happened when character state was modified,
//! allowing callers to react appropriately.

use crate::aggregates::CharacterStatus;
use crate::value_objects::CharacterName;
use crate::CampaignId;

/// Outcome of renaming a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterUpdate {
    NameChanged { from: CharacterName, to: CharacterName },
    Unchanged,
}

/// Outcome of archiving or restoring a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterStatusChange {
    StatusChanged {
        from: CharacterStatus,
        to: CharacterStatus,
    },
    Unchanged { status: CharacterStatus },
}

/// Outcome of joining a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignMembershipChange {
    /// The character now belongs to `campaign_id`, replacing `previous` if any
    Joined {
        campaign_id: CampaignId,
        previous: Option<CampaignId>,
    },
    /// Already a member of this campaign
    AlreadyMember { campaign_id: CampaignId },
}

impl CampaignMembershipChange {
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Joined { .. })
    }
}
