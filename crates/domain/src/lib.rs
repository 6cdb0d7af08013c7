//! Tapestry domain: the character rules engine and the character aggregate.
//!
//! This crate performs no I/O. The engine crate wraps it with storage, use
//! cases and HTTP.

pub mod aggregates;
pub mod error;
pub mod events;
pub mod ids;
pub mod rules;
pub mod value_objects;

pub use aggregates::{Character, CharacterMeta, CharacterStatus};
pub use error::DomainError;
pub use events::CharacterEvent;
pub use ids::{CampaignId, CharacterId, PlayerId};
pub use rules::{apply_character_rules, CharacterRuleData, RuleValidationError};
pub use value_objects::{CharacterName, CharacterSheet, GameSetting};
