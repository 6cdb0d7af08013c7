//! HP calculation and adjustment rules.
//!
//! Max HP = 12 + Might [Strength].

use super::types::{CharacterRuleData, ResourceTrack, BASE_HP};

/// HP given to a character that has no track yet.
fn default_hp() -> ResourceTrack {
    ResourceTrack::new(BASE_HP, BASE_HP).with_temp(0)
}

/// Max HP for the character's strength; absent strength counts as 0.
///
/// Saturates at the `i32` bounds.
pub fn calculate_max_hp(character: &CharacterRuleData) -> i32 {
    let strength = character
        .aspects
        .as_ref()
        .and_then(|aspects| aspects.strength())
        .unwrap_or(0);
    BASE_HP.saturating_add(strength)
}

/// Clamp current HP into `0..=max`, initializing a missing track.
///
/// The upper clamp runs first, so with a negative max the current value ends
/// at 0 rather than at max.
pub fn adjust_current_hp(character: &mut CharacterRuleData) {
    let Some(hp) = character.hp.as_mut() else {
        character.hp = Some(default_hp());
        return;
    };

    if hp.current > hp.max {
        hp.current = hp.max;
    }
    if hp.current < 0 {
        hp.current = 0;
    }
}

/// Recalculate max HP from strength and clamp current HP to it.
///
/// A character without an HP track gets the flat base track, not one derived
/// from strength.
pub fn apply_hp_rules(character: &mut CharacterRuleData) {
    let max = calculate_max_hp(character);
    match character.hp.as_mut() {
        Some(hp) => hp.max = max,
        None => {
            character.hp = Some(default_hp());
            return;
        }
    }
    adjust_current_hp(character);
}
