//! Geometry primitives: hitboxes and facing directions

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One of the four axis-aligned facings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit vector in screen space (y grows downward)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Axis-aligned rectangle used for collision tests
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hitbox {
    pub position: Vec2,
    pub dimensions: Vec2,
}

impl Hitbox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            dimensions: Vec2::new(width, height),
        }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.dimensions.x
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.dimensions.y
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.dimensions / 2.0
    }

    /// Zero-area (or malformed) boxes take part in no collisions
    pub fn is_degenerate(&self) -> bool {
        !(self.dimensions.x > 0.0 && self.dimensions.y > 0.0)
    }

    /// Strict overlap test; touching edges do not count
    pub fn intersects(&self, other: &Hitbox) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True when `other` lies entirely inside this box
    pub fn contains(&self, other: &Hitbox) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Smallest translation that moves `self` out of `other`, along one axis.
    /// None when the boxes do not overlap.
    pub fn separation_from(&self, other: &Hitbox) -> Option<Vec2> {
        if !self.intersects(other) {
            return None;
        }
        let push_left = other.left() - self.right();
        let push_right = other.right() - self.left();
        let push_up = other.top() - self.bottom();
        let push_down = other.bottom() - self.top();

        let dx = if push_right < -push_left { push_right } else { push_left };
        let dy = if push_down < -push_up { push_down } else { push_up };

        if dx.abs() < dy.abs() {
            Some(Vec2::new(dx, 0.0))
        } else {
            Some(Vec2::new(0.0, dy))
        }
    }
}

/// Inset/outset of a hitbox relative to its owner's bounding box.
/// Negative dimensions shrink the box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HitboxOffsets {
    pub position: Vec2,
    pub dimensions: Vec2,
}

impl HitboxOffsets {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            dimensions: Vec2::new(width, height),
        }
    }

    /// Hitbox for an owner at `position` with `dimensions`. Dimensions are
    /// clamped to zero so a bad offset yields a box that never collides.
    pub fn apply(&self, position: Vec2, dimensions: Vec2) -> Hitbox {
        Hitbox {
            position: position + self.position,
            dimensions: (dimensions + self.dimensions).max(Vec2::ZERO),
        }
    }
}
