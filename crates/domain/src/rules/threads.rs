//! Threads range enforcement.
//!
//! Threads are a fixed-range pool (0-5) that does not scale with aspects.

use super::types::{CharacterRuleData, ResourceTrack, THREADS_MAX, THREADS_MIN};

fn clamp_to_threads_range(value: i32) -> i32 {
    value.clamp(THREADS_MIN, THREADS_MAX)
}

/// Clamp `threads.current`, `threads.max` and `threads.temp` into 0..=5.
///
/// A missing track starts saturated. A missing `temp` stays missing.
pub fn enforce_threads_range(character: &mut CharacterRuleData) {
    let Some(threads) = character.threads.as_mut() else {
        character.threads = Some(ResourceTrack::new(THREADS_MAX, THREADS_MAX).with_temp(0));
        return;
    };

    threads.max = clamp_to_threads_range(threads.max);
    threads.current = clamp_to_threads_range(threads.current);
    if let Some(temp) = threads.temp.as_mut() {
        *temp = clamp_to_threads_range(*temp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::types::CharacterAspects;

    fn with_threads(threads: ResourceTrack) -> CharacterRuleData {
        CharacterRuleData::new(
            CharacterAspects::uniform(0),
            ResourceTrack::new(12, 12),
            threads,
        )
    }

    fn threads(character: &CharacterRuleData) -> ResourceTrack {
        character.threads.unwrap_or_default()
    }

    #[test]
    fn max_is_capped() {
        let mut c = with_threads(ResourceTrack::new(3, 10));
        enforce_threads_range(&mut c);
        assert_eq!(threads(&c).max, THREADS_MAX);
    }

    #[test]
    fn current_is_capped() {
        let mut c = with_threads(ResourceTrack::new(8, 5));
        enforce_threads_range(&mut c);
        assert_eq!(threads(&c).current, THREADS_MAX);
    }

    #[test]
    fn temp_is_capped() {
        let mut c = with_threads(ResourceTrack::new(3, 5).with_temp(15));
        enforce_threads_range(&mut c);
        assert_eq!(threads(&c).temp, Some(THREADS_MAX));
    }

    #[test]
    fn negative_values_are_raised_to_zero() {
        let mut c = with_threads(ResourceTrack::new(-5, -2).with_temp(-1));
        enforce_threads_range(&mut c);
        assert_eq!(threads(&c), ResourceTrack::new(THREADS_MIN, THREADS_MIN).with_temp(0));
    }

    #[test]
    fn valid_values_are_unchanged() {
        let mut c = with_threads(ResourceTrack::new(3, 5).with_temp(2));
        enforce_threads_range(&mut c);
        assert_eq!(threads(&c), ResourceTrack::new(3, 5).with_temp(2));
    }

    #[test]
    fn absent_temp_is_not_injected() {
        let mut c = with_threads(ResourceTrack::new(2, 4));
        enforce_threads_range(&mut c);
        assert_eq!(threads(&c).temp, None);
    }

    #[test]
    fn missing_track_starts_saturated() {
        let mut c = with_threads(ResourceTrack::default());
        c.threads = None;
        enforce_threads_range(&mut c);
        assert_eq!(c.threads, Some(ResourceTrack::new(5, 5).with_temp(0)));
    }

    #[test]
    fn current_is_not_clamped_to_max() {
        let mut c = with_threads(ResourceTrack::new(4, 2));
        enforce_threads_range(&mut c);
        assert_eq!(threads(&c), ResourceTrack::new(4, 2));
    }
}
