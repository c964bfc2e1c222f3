//! Frame-driven timers
//!
//! Waits and tweens are plain fields advanced by the caller's `dt`, so a
//! pending timer is visible state that can be inspected or dropped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fires once after `duration` seconds of accumulated `dt`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
        }
    }

    /// Advance by `dt`; true once the countdown has expired
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining = (self.remaining - dt).max(0.0);
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// Linear interpolation of a position over a fixed duration.
/// Lands exactly on `to` when the duration has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    from: Vec2,
    to: Vec2,
    duration: f32,
    elapsed: f32,
}

impl Tween {
    pub fn new(from: Vec2, to: Vec2, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` and return the interpolated position
    pub fn update(&mut self, dt: f32) -> Vec2 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    pub fn value(&self) -> Vec2 {
        if self.is_done() {
            return self.to;
        }
        self.from.lerp(self.to, self.progress())
    }

    /// 0.0 at the start, 1.0 once finished
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_countdown_expires_after_duration() {
        let mut wait = Countdown::new(0.4);
        assert!(!wait.tick(0.25));
        assert!(wait.tick(0.25));
        assert_eq!(wait.remaining(), 0.0);
        // Stays expired
        assert!(wait.tick(0.1));
    }

    #[test]
    fn test_tween_reaches_destination_exactly() {
        let to = Vec2::new(33.3, -7.1);
        let mut tween = Tween::new(Vec2::new(1.0, 2.0), to, 0.4);
        for _ in 0..3 {
            tween.update(1.0 / 60.0);
        }
        assert!(!tween.is_done());
        tween.update(1.0);
        assert!(tween.is_done());
        assert_eq!(tween.value(), to);
    }

    #[test]
    fn test_zero_duration_tween_is_immediately_done() {
        let tween = Tween::new(Vec2::ZERO, Vec2::ONE, 0.0);
        assert!(tween.is_done());
        assert_eq!(tween.value(), Vec2::ONE);
    }

    proptest! {
        #[test]
        fn prop_tween_is_monotonic(steps in proptest::collection::vec(0.0f32..0.1, 1..40)) {
            let mut tween = Tween::new(Vec2::new(0.0, 50.0), Vec2::new(100.0, 0.0), 0.4);
            let mut last = tween.value();
            for dt in steps {
                let next = tween.update(dt);
                prop_assert!(next.x >= last.x);
                prop_assert!(next.y <= last.y);
                last = next;
            }
        }
    }
}
