//! Rule validation errors.

use thiserror::Error;

use super::types::{AspectFamily, RuleViolation, SubAspect};

/// Raised by the aspect validator; HP and Threads rules never fail.
///
/// Structural problems are reported one at a time. Range problems are
/// collected so the caller sees every invalid aspect in a single response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleValidationError {
    #[error("Character aspects are missing or undefined")]
    AspectsMissing,

    #[error("Aspect family '{0}' is missing")]
    FamilyMissing(AspectFamily),

    #[error("Sub-aspect '{}' is missing or undefined", .0.qualified_name())]
    SubAspectMissing(SubAspect),

    #[error("Aspect validation failed: {}", join_messages(.0))]
    OutOfRange(Vec<RuleViolation>),
}

impl RuleValidationError {
    /// Range violations carried by this error; empty for structural errors.
    pub fn violations(&self) -> &[RuleViolation] {
        match self {
            Self::OutOfRange(violations) => violations,
            _ => &[],
        }
    }

    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::OutOfRange(_))
    }
}

fn join_messages(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_messages() {
        assert_eq!(
            RuleValidationError::AspectsMissing.to_string(),
            "Character aspects are missing or undefined"
        );
        assert_eq!(
            RuleValidationError::FamilyMissing(AspectFamily::Resolve).to_string(),
            "Aspect family 'resolve' is missing"
        );
        assert_eq!(
            RuleValidationError::SubAspectMissing(SubAspect::Presence).to_string(),
            "Sub-aspect 'might.presence' is missing or undefined"
        );
    }

    #[test]
    fn out_of_range_joins_every_violation() {
        let err = RuleValidationError::OutOfRange(vec![
            RuleViolation::aspect_out_of_range(SubAspect::Strength, 6),
            RuleViolation::aspect_out_of_range(SubAspect::Knowledge, 10),
        ]);
        assert_eq!(
            err.to_string(),
            "Aspect validation failed: might.strength value 6 is outside the legal range (-2 to 4); \
             wit.knowledge value 10 is outside the legal range (-2 to 4)"
        );
        assert_eq!(err.violations().len(), 2);
        assert!(!err.is_structural());
        assert!(RuleValidationError::AspectsMissing.violations().is_empty());
    }
}
