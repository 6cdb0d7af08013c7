//! Aspect range validation.
//!
//! Sub-aspects have a legal range of -2 to +4 for direct character edits.
//! Values outside this range can arise from status effects or other
//! modifiers, but direct sheet modifications are rejected.

use super::error::RuleValidationError;
use super::types::{
    AspectFamily, CharacterAspects, CharacterRuleData, RuleViolation, SubAspect, ASPECT_MAX,
    ASPECT_MIN,
};

fn is_aspect_value_valid(value: i32) -> bool {
    (ASPECT_MIN..=ASPECT_MAX).contains(&value)
}

/// Validate that all eight sub-aspects are present and within -2..=4.
///
/// Runs in two phases. Structure is checked first and the first missing piece
/// is reported on its own. Only once all eight values are known are they
/// range-checked, and every violation is reported together.
pub fn validate_aspect_ranges(character: &CharacterRuleData) -> Result<(), RuleValidationError> {
    let aspects = character
        .aspects
        .as_ref()
        .ok_or(RuleValidationError::AspectsMissing)?;

    let values = collect_sub_aspects(aspects)?;

    let violations: Vec<RuleViolation> = values
        .into_iter()
        .filter(|(_, value)| !is_aspect_value_valid(*value))
        .map(|(sub, value)| RuleViolation::aspect_out_of_range(sub, value))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(RuleValidationError::OutOfRange(violations))
    }
}

fn collect_sub_aspects(
    aspects: &CharacterAspects,
) -> Result<Vec<(SubAspect, i32)>, RuleValidationError> {
    let mut values = Vec::with_capacity(SubAspect::ALL.len());
    for family in AspectFamily::ALL {
        if !aspects.has_family(family) {
            return Err(RuleValidationError::FamilyMissing(family));
        }
        for sub in family.sub_aspects() {
            let value = aspects
                .get(sub)
                .ok_or(RuleValidationError::SubAspectMissing(sub))?;
            values.push((sub, value));
        }
    }
    Ok(values)
}

/// Human-readable description of the aspect range.
pub fn aspect_range_description() -> String {
    format!(
        "Aspects must be between {} and {} (inclusive)",
        ASPECT_MIN, ASPECT_MAX
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::types::{
        FinesseAspects, MightAspects, ResolveAspects, ResourceTrack, WitAspects,
    };

    fn valid_character() -> CharacterRuleData {
        CharacterRuleData::new(
            CharacterAspects::new(
                MightAspects::new(2, 0),
                FinesseAspects::new(1, -1),
                WitAspects::new(3, 4),
                ResolveAspects::new(-2, 0),
            ),
            ResourceTrack::new(12, 12),
            ResourceTrack::new(5, 5),
        )
    }

    fn aspects_mut(character: &mut CharacterRuleData) -> &mut CharacterAspects {
        character.aspects.get_or_insert_with(CharacterAspects::default)
    }

    #[test]
    fn aspects_within_range_pass() {
        assert!(validate_aspect_ranges(&valid_character()).is_ok());
    }

    #[test]
    fn aspect_above_maximum_is_rejected() {
        let mut character = valid_character();
        aspects_mut(&mut character).set(SubAspect::Strength, 5);

        let err = validate_aspect_ranges(&character).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Aspect validation failed"));
        assert!(message.contains("might.strength value 5 is outside the legal range"));
    }

    #[test]
    fn aspect_below_minimum_is_rejected() {
        let mut character = valid_character();
        aspects_mut(&mut character).set(SubAspect::Agility, -3);

        let err = validate_aspect_ranges(&character).unwrap_err();
        assert!(err
            .to_string()
            .contains("finesse.agility value -3 is outside the legal range"));
    }

    #[test]
    fn boundary_values_are_accepted() {
        let mut character = valid_character();
        let aspects = aspects_mut(&mut character);
        aspects.set(SubAspect::Strength, ASPECT_MAX);
        aspects.set(SubAspect::Presence, ASPECT_MIN);

        assert!(validate_aspect_ranges(&character).is_ok());
    }

    #[test]
    fn every_violation_is_reported_together() {
        let mut character = valid_character();
        let aspects = aspects_mut(&mut character);
        aspects.set(SubAspect::Strength, 6);
        aspects.set(SubAspect::Agility, -5);
        aspects.set(SubAspect::Knowledge, 10);

        let err = validate_aspect_ranges(&character).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("might.strength value 6"));
        assert!(message.contains("finesse.agility value -5"));
        assert!(message.contains("wit.knowledge value 10"));
        assert_eq!(err.violations().len(), 3);
    }

    #[test]
    fn missing_family_fails_fast() {
        let mut character = valid_character();
        aspects_mut(&mut character).remove_family(AspectFamily::Resolve);

        let err = validate_aspect_ranges(&character).unwrap_err();
        assert_eq!(err, RuleValidationError::FamilyMissing(AspectFamily::Resolve));
        assert!(err.to_string().contains("Aspect family 'resolve' is missing"));
    }

    #[test]
    fn missing_family_is_reported_before_earlier_range_violations() {
        let mut character = valid_character();
        let aspects = aspects_mut(&mut character);
        aspects.set(SubAspect::Strength, 9);
        aspects.remove_family(AspectFamily::Wit);

        assert_eq!(
            validate_aspect_ranges(&character),
            Err(RuleValidationError::FamilyMissing(AspectFamily::Wit))
        );
    }

    #[test]
    fn first_missing_family_in_order_wins() {
        let mut character = valid_character();
        let aspects = aspects_mut(&mut character);
        aspects.remove_family(AspectFamily::Resolve);
        aspects.remove_family(AspectFamily::Finesse);

        assert_eq!(
            validate_aspect_ranges(&character),
            Err(RuleValidationError::FamilyMissing(AspectFamily::Finesse))
        );
    }

    #[test]
    fn missing_sub_aspect_fails_fast() {
        let mut character = valid_character();
        aspects_mut(&mut character).unset(SubAspect::Presence);

        let err = validate_aspect_ranges(&character).unwrap_err();
        assert!(err
            .to_string()
            .contains("Sub-aspect 'might.presence' is missing or undefined"));
    }

    #[test]
    fn missing_aspects_object_fails() {
        let mut character = valid_character();
        character.aspects = None;

        let err = validate_aspect_ranges(&character).unwrap_err();
        assert!(err.to_string().contains("aspects are missing"));
    }

    #[test]
    fn each_of_the_eight_sub_aspects_is_checked() {
        for sub in SubAspect::ALL {
            let mut character = valid_character();
            aspects_mut(&mut character).set(sub, 10);

            let err = validate_aspect_ranges(&character).unwrap_err();
            let expected = format!(
                "{}.{} value 10 is outside the legal range",
                sub.family(),
                sub
            );
            assert!(err.to_string().contains(&expected), "{}", expected);
        }
    }

    #[test]
    fn extra_aspects_are_not_range_checked() {
        let mut character = valid_character();
        aspects_mut(&mut character)
            .extra
            .insert("luck".to_string(), 42);

        assert!(validate_aspect_ranges(&character).is_ok());
    }

    #[test]
    fn validation_does_not_mutate() {
        let mut character = valid_character();
        aspects_mut(&mut character).set(SubAspect::Willpower, 7);
        let before = character.clone();

        let _ = validate_aspect_ranges(&character);
        assert_eq!(character, before);
    }

    #[test]
    fn range_description_mentions_bounds() {
        let description = aspect_range_description();
        assert!(description.contains("-2"));
        assert!(description.contains('4'));
    }
}
