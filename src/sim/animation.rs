//! Sprite animation playback
//!
//! Gameplay only reads two signals from an animation: the current frame index
//! and whether a finite animation has finished.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    frames: Vec<usize>,
    interval: f32,
    /// Number of full plays before the animation is done; `None` loops forever
    cycles: Option<u32>,
    timer: f32,
    index: usize,
    times_played: u32,
}

impl Animation {
    pub fn new(frames: Vec<usize>, interval: f32, cycles: Option<u32>) -> Self {
        Self {
            frames,
            interval,
            cycles,
            timer: 0.0,
            index: 0,
            times_played: 0,
        }
    }

    /// Looping animation
    pub fn looping(frames: Vec<usize>, interval: f32) -> Self {
        Self::new(frames, interval, None)
    }

    /// Animation that plays once and then holds its last frame
    pub fn once(frames: Vec<usize>, interval: f32) -> Self {
        Self::new(frames, interval, Some(1))
    }

    /// Single frame that never changes
    pub fn still(frame: usize) -> Self {
        Self::looping(vec![frame], 1.0)
    }

    pub fn update(&mut self, dt: f32) {
        if self.frames.len() <= 1 && self.cycles.is_none() {
            return;
        }
        if self.is_done() || self.interval <= 0.0 {
            return;
        }

        self.timer += dt;
        while self.timer >= self.interval && !self.is_done() {
            self.timer -= self.interval;
            if self.index + 1 >= self.frames.len() {
                self.times_played += 1;
                if !self.is_done() {
                    self.index = 0;
                }
            } else {
                self.index += 1;
            }
        }
    }

    pub fn current_frame(&self) -> usize {
        self.frames.get(self.index).copied().unwrap_or(0)
    }

    pub fn is_done(&self) -> bool {
        self.cycles.is_some_and(|cycles| self.times_played >= cycles)
    }

    /// True from the middle frame onward within the current play
    pub fn is_halfway_done(&self) -> bool {
        self.is_done() || self.index >= self.frames.len() / 2
    }

    /// Seconds for one full play
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 * self.interval
    }

    /// Restart from the first frame
    pub fn refresh(&mut self) {
        self.timer = 0.0;
        self.index = 0;
        self.times_played = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_finishes_on_last_frame() {
        let mut shatter = Animation::once(vec![8, 9, 10, 11], 0.1);
        assert_eq!(shatter.current_frame(), 8);
        shatter.update(0.25);
        assert_eq!(shatter.current_frame(), 10);
        assert!(!shatter.is_done());
        shatter.update(0.2);
        assert!(shatter.is_done());
        assert_eq!(shatter.current_frame(), 11);
        assert!((shatter.duration() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_looping_wraps() {
        let mut walk = Animation::looping(vec![0, 1, 2, 3], 0.2);
        walk.update(0.85);
        assert_eq!(walk.current_frame(), 0);
        assert!(!walk.is_done());
    }

    #[test]
    fn test_refresh_restarts() {
        let mut swing = Animation::once(vec![0, 1, 2, 3], 0.05);
        swing.update(1.0);
        assert!(swing.is_done());
        swing.refresh();
        assert!(!swing.is_done());
        assert!(!swing.is_halfway_done());
        swing.update(0.11);
        assert!(swing.is_halfway_done());
    }

    #[test]
    fn test_still_frame() {
        let mut idle = Animation::still(12);
        idle.update(5.0);
        assert_eq!(idle.current_frame(), 12);
        assert!(!idle.is_done());
    }
}
