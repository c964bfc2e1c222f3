//! Draw list output
//!
//! The simulation never touches a graphics API. A room's render pass turns its
//! frozen render queue into [`DrawCommand`]s that a frontend blits in order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sprite sheets the frontend is expected to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteSheet {
    Tiles,
    PlayerWalk,
    PlayerSword,
    PlayerLift,
    PlayerCarry,
    Enemies,
    Pots,
    Hearts,
    Switches,
}

/// One frame of one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub sheet: SpriteSheet,
    pub frame: usize,
}

impl Sprite {
    pub fn new(sheet: SpriteSheet, frame: usize) -> Self {
        Self { sheet, frame }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub sprite: Sprite,
    /// Top-left corner in screen pixels
    pub position: Vec2,
    /// 0.0 (invisible) - 1.0 (opaque)
    pub alpha: f32,
}

impl DrawCommand {
    pub fn new(sprite: Sprite, position: Vec2) -> Self {
        Self {
            sprite,
            position,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Snap to whole pixels, as the blitter expects
    pub fn snapped(mut self) -> Self {
        self.position = self.position.floor();
        self
    }
}
