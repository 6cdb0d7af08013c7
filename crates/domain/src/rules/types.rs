//! Rule types for the Tapestry character rules engine.
//!
//! `CharacterRuleData` is the subset of a character sheet the rules operate on.
//! Every structural piece is optional so the validator can report what is
//! missing instead of failing at deserialization time. Fields the rules do not
//! know about are carried through untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Lowest legal value for a sub-aspect on a direct sheet edit.
pub const ASPECT_MIN: i32 = -2;
/// Highest legal value for a sub-aspect on a direct sheet edit.
pub const ASPECT_MAX: i32 = 4;
/// Lower bound for every threads value.
pub const THREADS_MIN: i32 = 0;
/// Upper bound for every threads value.
pub const THREADS_MAX: i32 = 5;
/// Max HP before the Might [Strength] bonus.
pub const BASE_HP: i32 = 12;

// =============================================================================
// Aspect names
// =============================================================================

/// The four aspect families, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectFamily {
    Might,
    Finesse,
    Wit,
    Resolve,
}

impl AspectFamily {
    pub const ALL: [AspectFamily; 4] = [
        AspectFamily::Might,
        AspectFamily::Finesse,
        AspectFamily::Wit,
        AspectFamily::Resolve,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Might => "might",
            Self::Finesse => "finesse",
            Self::Wit => "wit",
            Self::Resolve => "resolve",
        }
    }

    /// The two sub-aspects of this family, in validation order.
    pub fn sub_aspects(&self) -> [SubAspect; 2] {
        match self {
            Self::Might => [SubAspect::Strength, SubAspect::Presence],
            Self::Finesse => [SubAspect::Agility, SubAspect::Charm],
            Self::Wit => [SubAspect::Instinct, SubAspect::Knowledge],
            Self::Resolve => [SubAspect::Willpower, SubAspect::Empathy],
        }
    }
}

impl fmt::Display for AspectFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectFamily {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "might" => Ok(Self::Might),
            "finesse" => Ok(Self::Finesse),
            "wit" => Ok(Self::Wit),
            "resolve" => Ok(Self::Resolve),
            _ => Err(DomainError::parse(format!("Unknown aspect family: {}", s))),
        }
    }
}

/// The eight sub-aspects. Each belongs to exactly one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubAspect {
    Strength,
    Presence,
    Agility,
    Charm,
    Instinct,
    Knowledge,
    Willpower,
    Empathy,
}

impl SubAspect {
    pub const ALL: [SubAspect; 8] = [
        SubAspect::Strength,
        SubAspect::Presence,
        SubAspect::Agility,
        SubAspect::Charm,
        SubAspect::Instinct,
        SubAspect::Knowledge,
        SubAspect::Willpower,
        SubAspect::Empathy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Presence => "presence",
            Self::Agility => "agility",
            Self::Charm => "charm",
            Self::Instinct => "instinct",
            Self::Knowledge => "knowledge",
            Self::Willpower => "willpower",
            Self::Empathy => "empathy",
        }
    }

    pub fn family(&self) -> AspectFamily {
        match self {
            Self::Strength | Self::Presence => AspectFamily::Might,
            Self::Agility | Self::Charm => AspectFamily::Finesse,
            Self::Instinct | Self::Knowledge => AspectFamily::Wit,
            Self::Willpower | Self::Empathy => AspectFamily::Resolve,
        }
    }

    /// Dotted path used in error messages, e.g. `might.strength`.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.family(), self.as_str())
    }
}

impl fmt::Display for SubAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubAspect {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|sub| sub.as_str() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown sub-aspect: {}", s)))
    }
}

// =============================================================================
// Aspect blocks
// =============================================================================

macro_rules! define_family {
    ($name:ident, $first:ident => $first_sub:ident, $second:ident => $second_sub:ident) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub $first: Option<i32>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub $second: Option<i32>,
        }

        impl $name {
            pub fn new($first: i32, $second: i32) -> Self {
                Self {
                    $first: Some($first),
                    $second: Some($second),
                }
            }

            fn slot(&self, sub: SubAspect) -> Option<i32> {
                match sub {
                    SubAspect::$first_sub => self.$first,
                    SubAspect::$second_sub => self.$second,
                    _ => None,
                }
            }

            fn slot_mut(&mut self, sub: SubAspect) -> Option<&mut Option<i32>> {
                match sub {
                    SubAspect::$first_sub => Some(&mut self.$first),
                    SubAspect::$second_sub => Some(&mut self.$second),
                    _ => None,
                }
            }
        }
    };
}

define_family!(MightAspects, strength => Strength, presence => Presence);
define_family!(FinesseAspects, agility => Agility, charm => Charm);
define_family!(WitAspects, instinct => Instinct, knowledge => Knowledge);
define_family!(ResolveAspects, willpower => Willpower, empathy => Empathy);

/// All aspect families of a character.
///
/// `extra` is an escape hatch for modules that add sub-aspects of their own.
/// It is schema-free and never range-checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterAspects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub might: Option<MightAspects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finesse: Option<FinesseAspects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wit: Option<WitAspects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve: Option<ResolveAspects>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, i32>,
}

impl CharacterAspects {
    pub fn new(
        might: MightAspects,
        finesse: FinesseAspects,
        wit: WitAspects,
        resolve: ResolveAspects,
    ) -> Self {
        Self {
            might: Some(might),
            finesse: Some(finesse),
            wit: Some(wit),
            resolve: Some(resolve),
            extra: BTreeMap::new(),
        }
    }

    /// Every sub-aspect present and set to `value`.
    pub fn uniform(value: i32) -> Self {
        Self::new(
            MightAspects::new(value, value),
            FinesseAspects::new(value, value),
            WitAspects::new(value, value),
            ResolveAspects::new(value, value),
        )
    }

    pub fn has_family(&self, family: AspectFamily) -> bool {
        match family {
            AspectFamily::Might => self.might.is_some(),
            AspectFamily::Finesse => self.finesse.is_some(),
            AspectFamily::Wit => self.wit.is_some(),
            AspectFamily::Resolve => self.resolve.is_some(),
        }
    }

    /// Value of a sub-aspect, or `None` if it or its family is absent.
    pub fn get(&self, sub: SubAspect) -> Option<i32> {
        match sub.family() {
            AspectFamily::Might => self.might.and_then(|f| f.slot(sub)),
            AspectFamily::Finesse => self.finesse.and_then(|f| f.slot(sub)),
            AspectFamily::Wit => self.wit.and_then(|f| f.slot(sub)),
            AspectFamily::Resolve => self.resolve.and_then(|f| f.slot(sub)),
        }
    }

    /// Set a sub-aspect, creating its family if it is absent.
    pub fn set(&mut self, sub: SubAspect, value: i32) {
        if let Some(slot) = self.slot_mut(sub, true) {
            *slot = Some(value);
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, sub: SubAspect, value: i32) -> Self {
        self.set(sub, value);
        self
    }

    /// Mark a sub-aspect as absent. The family itself stays present.
    pub fn unset(&mut self, sub: SubAspect) {
        if let Some(slot) = self.slot_mut(sub, false) {
            *slot = None;
        }
    }

    pub fn remove_family(&mut self, family: AspectFamily) {
        match family {
            AspectFamily::Might => self.might = None,
            AspectFamily::Finesse => self.finesse = None,
            AspectFamily::Wit => self.wit = None,
            AspectFamily::Resolve => self.resolve = None,
        }
    }

    /// Might [Strength], the input to max HP.
    pub fn strength(&self) -> Option<i32> {
        self.get(SubAspect::Strength)
    }

    fn slot_mut(&mut self, sub: SubAspect, create: bool) -> Option<&mut Option<i32>> {
        match sub.family() {
            AspectFamily::Might => family_mut(&mut self.might, create)?.slot_mut(sub),
            AspectFamily::Finesse => family_mut(&mut self.finesse, create)?.slot_mut(sub),
            AspectFamily::Wit => family_mut(&mut self.wit, create)?.slot_mut(sub),
            AspectFamily::Resolve => family_mut(&mut self.resolve, create)?.slot_mut(sub),
        }
    }
}

fn family_mut<T: Default>(family: &mut Option<T>, create: bool) -> Option<&mut T> {
    if create {
        Some(family.get_or_insert_with(T::default))
    } else {
        family.as_mut()
    }
}

// =============================================================================
// Resource tracks
// =============================================================================

/// A depletable pool such as HP or Threads.
///
/// Missing `current`/`max` deserialize as 0. Threads override this with their
/// own fallbacks, see [`CharacterRuleData`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTrack {
    #[serde(default)]
    pub current: i32,
    #[serde(default)]
    pub max: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<i32>,
}

impl ResourceTrack {
    pub fn new(current: i32, max: i32) -> Self {
        Self {
            current,
            max,
            temp: None,
        }
    }

    pub fn with_temp(mut self, temp: i32) -> Self {
        self.temp = Some(temp);
        self
    }
}

#[derive(Deserialize)]
struct PartialTrack {
    #[serde(default)]
    current: Option<i32>,
    #[serde(default)]
    max: Option<i32>,
    #[serde(default)]
    temp: Option<i32>,
}

/// Threads fall back to an empty pool of full size: `max` 5, `current` 0.
pub(crate) fn deserialize_threads<'de, D>(deserializer: D) -> Result<Option<ResourceTrack>, D::Error>
where
    D: Deserializer<'de>,
{
    let partial = Option::<PartialTrack>::deserialize(deserializer)?;
    Ok(partial.map(|track| ResourceTrack {
        current: track.current.unwrap_or(0),
        max: track.max.unwrap_or(THREADS_MAX),
        temp: track.temp,
    }))
}

// =============================================================================
// Rule input
// =============================================================================

/// Character data needed for rule enforcement.
///
/// Unknown fields are collected into `other` and written back on
/// serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRuleData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspects: Option<CharacterAspects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<ResourceTrack>,
    #[serde(
        default,
        deserialize_with = "deserialize_threads",
        skip_serializing_if = "Option::is_none"
    )]
    pub threads: Option<ResourceTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve: Option<ResourceTrack>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl CharacterRuleData {
    pub fn new(aspects: CharacterAspects, hp: ResourceTrack, threads: ResourceTrack) -> Self {
        Self {
            aspects: Some(aspects),
            hp: Some(hp),
            threads: Some(threads),
            resolve: None,
            other: serde_json::Map::new(),
        }
    }

    /// Attach a pass-through field the rules do not inspect.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.other.insert(key.into(), value);
        self
    }
}

// =============================================================================
// Violations
// =============================================================================

/// Inclusive range a value was expected to fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRange {
    pub min: i32,
    pub max: i32,
}

/// One failed range check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    /// Path into the character, e.g. `aspects.might.strength`.
    pub field: String,
    pub value: i32,
    pub expected_range: RuleRange,
    pub message: String,
}

impl RuleViolation {
    pub fn aspect_out_of_range(sub: SubAspect, value: i32) -> Self {
        let name = sub.qualified_name();
        Self {
            field: format!("aspects.{}", name),
            value,
            expected_range: RuleRange {
                min: ASPECT_MIN,
                max: ASPECT_MAX,
            },
            message: format!(
                "{} value {} is outside the legal range ({} to {})",
                name, value, ASPECT_MIN, ASPECT_MAX
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_family_lists_its_own_sub_aspects() {
        for family in AspectFamily::ALL {
            for sub in family.sub_aspects() {
                assert_eq!(sub.family(), family);
            }
        }
    }

    #[test]
    fn sub_aspect_qualified_name_uses_family_prefix() {
        assert_eq!(SubAspect::Strength.qualified_name(), "might.strength");
        assert_eq!(SubAspect::Empathy.qualified_name(), "resolve.empathy");
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("Wit".parse::<AspectFamily>().ok(), Some(AspectFamily::Wit));
        assert_eq!(
            " KNOWLEDGE ".parse::<SubAspect>().ok(),
            Some(SubAspect::Knowledge)
        );
        assert!("luck".parse::<SubAspect>().is_err());
        assert!("spirit".parse::<AspectFamily>().is_err());
    }

    #[test]
    fn set_creates_missing_family() {
        let mut aspects = CharacterAspects::default();
        aspects.set(SubAspect::Charm, 3);
        assert!(aspects.has_family(AspectFamily::Finesse));
        assert_eq!(aspects.get(SubAspect::Charm), Some(3));
        assert_eq!(aspects.get(SubAspect::Agility), None);
    }

    #[test]
    fn unset_leaves_family_present() {
        let mut aspects = CharacterAspects::uniform(1);
        aspects.unset(SubAspect::Presence);
        assert!(aspects.has_family(AspectFamily::Might));
        assert_eq!(aspects.get(SubAspect::Presence), None);
        assert_eq!(aspects.strength(), Some(1));
    }

    #[test]
    fn null_sub_aspect_deserializes_as_absent() {
        let aspects: CharacterAspects = serde_json::from_value(json!({
            "might": { "strength": 2, "presence": null },
            "extra": { "luck": 9 }
        }))
        .unwrap();
        assert_eq!(aspects.get(SubAspect::Strength), Some(2));
        assert_eq!(aspects.get(SubAspect::Presence), None);
        assert!(!aspects.has_family(AspectFamily::Wit));
        assert_eq!(aspects.extra.get("luck"), Some(&9));
    }

    #[test]
    fn partial_threads_use_threads_fallbacks() {
        let data: CharacterRuleData = serde_json::from_value(json!({
            "hp": { "max": 10 },
            "threads": { "temp": 2 }
        }))
        .unwrap();
        assert_eq!(data.hp, Some(ResourceTrack::new(0, 10)));
        assert_eq!(data.threads, Some(ResourceTrack::new(0, THREADS_MAX).with_temp(2)));
    }

    #[test]
    fn unknown_fields_pass_through() {
        let input = json!({
            "aspects": { "might": { "strength": 1, "presence": 0 } },
            "hp": { "current": 5, "max": 13 },
            "name": "Ysolde",
            "inventory": [{ "name": "rope", "qty": 1 }]
        });
        let data: CharacterRuleData = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(data.other.get("name"), Some(&json!("Ysolde")));
        assert_eq!(serde_json::to_value(&data).unwrap(), input);
    }

    #[test]
    fn violation_message_names_field_value_and_range() {
        let violation = RuleViolation::aspect_out_of_range(SubAspect::Agility, -3);
        assert_eq!(violation.field, "aspects.finesse.agility");
        assert_eq!(
            violation.message,
            "finesse.agility value -3 is outside the legal range (-2 to 4)"
        );
        assert_eq!(violation.expected_range, RuleRange { min: -2, max: 4 });
    }
}
