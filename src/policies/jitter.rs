//! # Jitter policy for retry delays.
//!
//! [`JitterPolicy`] adds randomness to backoff delays so that many retry loops failing at
//! the same moment do not hammer a dependency in lockstep.
//!
//! - [`JitterPolicy::None`] - no randomization, predictable delays
//! - [`JitterPolicy::Full`] - random delay in [0, delay]
//! - [`JitterPolicy::Equal`] - delay/2 + random[0, delay/2]
//! - [`JitterPolicy::Decorrelated`] - random[floor, delay × 3], capped at max

use std::time::Duration;

use rand::Rng;

/// Randomization applied on top of a base retry delay.
///
/// Jitter never widens the upper bound of `Full`/`Equal` past the base delay, so a policy
/// with a zero base delay stays at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Exact base delay.
    #[default]
    None,

    /// Random delay in [0, base].
    Full,

    /// base/2 + random[0, base/2]; keeps ~75% of the base on average.
    Equal,

    /// Random delay in [floor, base × 3], capped at max.
    ///
    /// Needs extra context, see [`apply_decorrelated`](Self::apply_decorrelated).
    Decorrelated,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    ///
    /// For `Decorrelated` this returns the input unchanged; use
    /// [`apply_decorrelated`](Self::apply_decorrelated) instead.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => full_jitter(delay),
            JitterPolicy::Equal => equal_jitter(delay),
            JitterPolicy::Decorrelated => delay,
        }
    }

    /// Applies decorrelated jitter with full context.
    ///
    /// If called on a non-`Decorrelated` policy, falls back to `apply(base)`.
    pub fn apply_decorrelated(&self, floor: Duration, base: Duration, max: Duration) -> Duration {
        if !matches!(self, JitterPolicy::Decorrelated) {
            return self.apply(base);
        }

        let floor_ms = floor.as_millis() as u64;
        let base_ms = base.as_millis() as u64;
        let max_ms = max.as_millis() as u64;

        let upper = base_ms.saturating_mul(3).min(max_ms).max(floor_ms);
        if floor_ms >= upper {
            return floor;
        }
        Duration::from_millis(rand::rng().random_range(floor_ms..=upper))
    }
}

fn full_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

fn equal_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    let half = ms / 2;
    let jitter = if half == 0 {
        0
    } else {
        rand::rng().random_range(0..=half)
    };
    Duration::from_millis(half + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let d = Duration::from_millis(1234);
        assert_eq!(JitterPolicy::None.apply(d), d);
        assert_eq!(JitterPolicy::default(), JitterPolicy::None);
    }

    #[test]
    fn zero_delay_stays_zero() {
        for jitter in [JitterPolicy::None, JitterPolicy::Full, JitterPolicy::Equal] {
            assert_eq!(jitter.apply(Duration::ZERO), Duration::ZERO);
        }
    }

    #[test]
    fn full_jitter_bounds() {
        let d = Duration::from_millis(1000);
        for _ in 0..50 {
            assert!(JitterPolicy::Full.apply(d) <= d);
        }
    }

    #[test]
    fn equal_jitter_bounds() {
        let d = Duration::from_millis(1000);
        for _ in 0..50 {
            let j = JitterPolicy::Equal.apply(d);
            assert!(j >= Duration::from_millis(500));
            assert!(j <= d);
        }
    }

    #[test]
    fn decorrelated_respects_floor_and_max() {
        let floor = Duration::from_millis(100);
        let max = Duration::from_secs(2);
        for _ in 0..50 {
            let j = JitterPolicy::Decorrelated.apply_decorrelated(floor, Duration::from_secs(1), max);
            assert!(j >= floor);
            assert!(j <= max);
        }
    }

    #[test]
    fn decorrelated_collapses_to_floor() {
        let floor = Duration::from_millis(100);
        let j = JitterPolicy::Decorrelated.apply_decorrelated(floor, Duration::ZERO, Duration::ZERO);
        assert_eq!(j, floor);
    }
}
