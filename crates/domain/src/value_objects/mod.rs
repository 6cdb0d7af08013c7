//! Value objects - Immutable objects defined by their attributes

mod game_setting;
mod names;
mod sheet;
mod snapshot;

pub use game_setting::{GameSetting, SettingMetadata};
pub use names::CharacterName;
pub use sheet::{CharacterSheet, ConditionInstance, InventoryItem, SheetResources};
pub use snapshot::{CharacterSnapshot, SnapshotDiff};
