//! Character sheet contents: aspects, resources, conditions, inventory.
//!
//! Sheet fields are plain data. The rules in [`crate::rules`] decide which
//! numeric combinations are legal; `CharacterSheet::validate` only checks the
//! shape of the non-numeric parts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::rules::{CharacterAspects, ResourceTrack};

fn default_weave_level() -> u32 {
    1
}

fn default_aspects() -> CharacterAspects {
    CharacterAspects::uniform(0)
}

fn default_stacks() -> u32 {
    1
}

fn default_qty() -> u32 {
    1
}

/// A condition currently affecting the character (e.g. "poisoned").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionInstance {
    pub key: String,
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    /// Filled in with the save time when a sheet is stored without it.
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ConditionInstance {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            stacks: default_stacks(),
            applied_at: None,
            expires_at: None,
            source: None,
            notes: None,
        }
    }
}

/// An inventory entry, either linked to content (`item_key`) or freeform (`name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Content key, e.g. "wr:longbow" or "hb:my-campaign:revolver"
    #[serde(default)]
    pub item_key: Option<String>,
    /// Content source, e.g. "core", "woven-realms"
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_qty")]
    pub qty: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl InventoryItem {
    pub fn named(name: impl Into<String>, qty: u32) -> Self {
        Self {
            item_key: None,
            source_id: None,
            name: Some(name.into()),
            qty,
            tags: Vec::new(),
            notes: None,
        }
    }

    pub fn keyed(item_key: impl Into<String>, source_id: impl Into<String>, qty: u32) -> Self {
        Self {
            item_key: Some(item_key.into()),
            source_id: Some(source_id.into()),
            name: None,
            qty,
            tags: Vec::new(),
            notes: None,
        }
    }

    fn label(&self) -> Option<&str> {
        self.item_key
            .as_deref()
            .or(self.name.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Resource pools on the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetResources {
    #[serde(default)]
    pub hp: Option<ResourceTrack>,
    #[serde(default, deserialize_with = "crate::rules::deserialize_threads")]
    pub threads: Option<ResourceTrack>,
    /// Optional future pool, carried but not ruled.
    #[serde(default)]
    pub resolve: Option<ResourceTrack>,
    #[serde(default)]
    pub other: BTreeMap<String, i32>,
}

/// The playable contents of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    #[serde(default)]
    pub archetype_key: Option<String>,
    /// Weave milestone, the level-like progression number.
    #[serde(default = "default_weave_level")]
    pub weave_level: u32,
    #[serde(default = "default_aspects")]
    pub aspects: CharacterAspects,
    #[serde(default)]
    pub skills: BTreeMap<String, i32>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub resources: SheetResources,
    #[serde(default)]
    pub conditions: Vec<ConditionInstance>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub notes: String,
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self {
            archetype_key: None,
            weave_level: default_weave_level(),
            aspects: default_aspects(),
            skills: BTreeMap::new(),
            features: Vec::new(),
            resources: SheetResources::default(),
            conditions: Vec::new(),
            inventory: Vec::new(),
            notes: String::new(),
        }
    }
}

impl CharacterSheet {
    /// Check the non-numeric structure of the sheet.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.weave_level < 1 {
            return Err(DomainError::validation("Weave level must be at least 1"));
        }
        if let Some(index) = self.conditions.iter().position(|c| c.key.trim().is_empty()) {
            return Err(DomainError::validation(format!(
                "Condition {} has an empty key",
                index
            )));
        }
        if let Some(index) = self.inventory.iter().position(|item| item.label().is_none()) {
            return Err(DomainError::validation(format!(
                "Inventory item {} needs an item key or a name",
                index
            )));
        }
        Ok(())
    }

    /// Stamp conditions that have no application time.
    pub fn stamp_conditions(&mut self, now: DateTime<Utc>) {
        for condition in &mut self.conditions {
            condition.applied_at.get_or_insert(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::SubAspect;
    use serde_json::json;

    #[test]
    fn empty_json_gives_default_sheet() {
        let sheet: CharacterSheet = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sheet, CharacterSheet::default());
        assert_eq!(sheet.weave_level, 1);
        assert_eq!(sheet.aspects.get(SubAspect::Empathy), Some(0));
    }

    #[test]
    fn partial_threads_on_sheet_use_threads_fallbacks() {
        let sheet: CharacterSheet = serde_json::from_value(json!({
            "resources": { "threads": { "current": 2 } }
        }))
        .unwrap();
        assert_eq!(sheet.resources.threads, Some(ResourceTrack::new(2, 5)));
    }

    #[test]
    fn zero_weave_level_is_rejected() {
        let sheet = CharacterSheet {
            weave_level: 0,
            ..CharacterSheet::default()
        };
        assert!(sheet.validate().is_err());
    }

    #[test]
    fn inventory_item_needs_key_or_name() {
        let mut sheet = CharacterSheet::default();
        sheet.inventory.push(InventoryItem::named("Rope", 1));
        sheet.inventory.push(InventoryItem::keyed("wr:longbow", "woven-realms", 1));
        assert!(sheet.validate().is_ok());

        sheet.inventory.push(InventoryItem::named("  ", 1));
        let err = sheet.validate().unwrap_err();
        assert!(err.to_string().contains("Inventory item 2"));
    }

    #[test]
    fn condition_key_must_not_be_blank() {
        let mut sheet = CharacterSheet::default();
        sheet.conditions.push(ConditionInstance::new(""));
        assert!(sheet.validate().is_err());
    }

    #[test]
    fn inventory_defaults_quantity_to_one() {
        let item: InventoryItem = serde_json::from_value(json!({ "name": "Torch" })).unwrap();
        assert_eq!(item.qty, 1);
    }

    #[test]
    fn stamping_keeps_existing_times() {
        let earlier = DateTime::<Utc>::from_timestamp(1_000, 0).unwrap();
        let now = DateTime::<Utc>::from_timestamp(2_000, 0).unwrap();

        let mut sheet = CharacterSheet::default();
        let mut stamped = ConditionInstance::new("exposed");
        stamped.applied_at = Some(earlier);
        sheet.conditions.push(stamped);
        sheet.conditions.push(ConditionInstance::new("poisoned"));

        sheet.stamp_conditions(now);
        assert_eq!(sheet.conditions[0].applied_at, Some(earlier));
        assert_eq!(sheet.conditions[1].applied_at, Some(now));
    }
}
