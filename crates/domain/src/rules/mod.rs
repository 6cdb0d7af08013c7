//! Tapestry character rules.
//!
//! Applied on every character create and update:
//!
//! 1. Aspect range validation: every sub-aspect within -2..=4
//! 2. Max HP = 12 + Might [Strength], current HP clamped to it
//! 3. Threads clamped to 0..=5
//!
//! ```
//! use tapestry_domain::rules::{
//!     apply_character_rules, CharacterAspects, CharacterRuleData, ResourceTrack, SubAspect,
//! };
//!
//! let mut character = CharacterRuleData::new(
//!     CharacterAspects::uniform(0).with(SubAspect::Strength, 3),
//!     ResourceTrack::new(15, 15),
//!     ResourceTrack::new(3, 5),
//! );
//! apply_character_rules(&mut character)?;
//! assert_eq!(character.hp.map(|hp| hp.max), Some(15));
//! # Ok::<(), tapestry_domain::rules::RuleValidationError>(())
//! ```

mod aspects;
mod error;
mod hp;
mod threads;
mod types;

pub use aspects::{aspect_range_description, validate_aspect_ranges};
pub use error::RuleValidationError;
pub use hp::{adjust_current_hp, apply_hp_rules, calculate_max_hp};
pub use threads::enforce_threads_range;
pub(crate) use types::deserialize_threads;
pub use types::{
    AspectFamily, CharacterAspects, CharacterRuleData, FinesseAspects, MightAspects,
    ResolveAspects, ResourceTrack, RuleRange, RuleViolation, SubAspect, WitAspects, ASPECT_MAX,
    ASPECT_MIN, BASE_HP, THREADS_MAX, THREADS_MIN,
};

/// Apply all rules to a character, in order.
///
/// Validation runs first and aborts the whole pipeline, leaving `hp` and
/// `threads` untouched. On success the record is mutated in place and the
/// same reference is handed back.
pub fn apply_character_rules(
    character: &mut CharacterRuleData,
) -> Result<&mut CharacterRuleData, RuleValidationError> {
    validate_aspect_ranges(character)?;
    apply_hp_rules(character);
    enforce_threads_range(character);
    Ok(character)
}
