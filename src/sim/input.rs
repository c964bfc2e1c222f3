//! Per-frame input snapshot

use serde::{Deserialize, Serialize};

use super::geometry::Direction;

/// Logical keys the simulation reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Swing the sword
    Attack,
    /// Lift or throw a pot
    Interact,
}

/// Input commands for a single frame. Movement keys are "held"; `attack` and
/// `interact` should be set only on the frame the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
    pub interact: bool,
}

impl FrameInput {
    pub fn is_key_pressed(&self, key: Key) -> bool {
        match key {
            Key::Up => self.up,
            Key::Down => self.down,
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Attack => self.attack,
            Key::Interact => self.interact,
        }
    }

    pub fn press(mut self, key: Key) -> Self {
        match key {
            Key::Up => self.up = true,
            Key::Down => self.down = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Attack => self.attack = true,
            Key::Interact => self.interact = true,
        }
        self
    }

    /// Input holding only the movement key for `direction`
    pub fn moving(direction: Direction) -> Self {
        Self::default().press(movement_key(direction))
    }

    /// First held movement direction, checked in Down, Right, Up, Left order
    pub fn movement(&self) -> Option<Direction> {
        [Direction::Down, Direction::Right, Direction::Up, Direction::Left]
            .into_iter()
            .find(|direction| self.is_key_pressed(movement_key(*direction)))
    }
}

pub fn movement_key(direction: Direction) -> Key {
    match direction {
        Direction::Up => Key::Up,
        Direction::Down => Key::Down,
        Direction::Left => Key::Left,
        Direction::Right => Key::Right,
    }
}
