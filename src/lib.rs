//! Pot Dungeon - single-screen dungeon crawler simulation core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (state machines, combat, pot lift/carry/throw, rooms)
//! - `render`: Draw list built from a room's frozen render queue
//! - `audio`: Fire-and-forget sound triggering
//! - `settings`: Data-driven game tuning
//! - `error`: Error types shared across modules

pub mod audio;
pub mod error;
pub mod render;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, LogAudio, SoundEffect};
pub use error::{FsmError, SettingsError};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Edge length of one square tile in pixels
    pub const TILE_SIZE: f32 = 16.0;

    /// Screen dimensions
    pub const CANVAS_WIDTH: f32 = 384.0;
    pub const CANVAS_HEIGHT: f32 = 208.0;

    /// Room dimensions in tiles (the outer ring is wall)
    pub const ROOM_WIDTH_TILES: usize = (CANVAS_WIDTH / TILE_SIZE) as usize - 2;
    pub const ROOM_HEIGHT_TILES: usize = (CANVAS_HEIGHT / TILE_SIZE) as usize - 2;

    /// Offset of the tile grid inside the canvas
    pub const RENDER_OFFSET_X: f32 = (CANVAS_WIDTH - ROOM_WIDTH_TILES as f32 * TILE_SIZE) / 2.0;
    pub const RENDER_OFFSET_Y: f32 = (CANVAS_HEIGHT - ROOM_HEIGHT_TILES as f32 * TILE_SIZE) / 2.0;

    /// Movement bounds for entities
    pub const TOP_EDGE: f32 = RENDER_OFFSET_Y + TILE_SIZE;
    pub const BOTTOM_EDGE: f32 = CANVAS_HEIGHT - RENDER_OFFSET_Y - TILE_SIZE - 5.0;
    pub const LEFT_EDGE: f32 = RENDER_OFFSET_X + TILE_SIZE - 5.0;
    pub const RIGHT_EDGE: f32 = CANVAS_WIDTH - TILE_SIZE * 2.0 + 5.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 16.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    pub const PLAYER_SPEED: f32 = 100.0;
    pub const PLAYER_MAX_HEALTH: i32 = 6;
    pub const PLAYER_SWORD_DAMAGE: i32 = 1;
    /// How far the sword reaches past the player's hitbox
    pub const SWORD_REACH: f32 = 16.0;
    pub const INVULNERABLE_DURATION: f32 = 1.5;
    pub const INVULNERABLE_FLASH_INTERVAL: f32 = 0.1;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 16.0;
    pub const ENEMY_HEIGHT: f32 = 16.0;
    pub const ENEMY_COUNT: usize = 10;
    /// Chance that a dying enemy leaves a heart behind
    pub const HEART_DROP_CHANCE: f32 = 0.3;

    /// Pot interaction
    pub const POT_WIDTH: f32 = 32.0;
    pub const POT_HEIGHT: f32 = 32.0;
    /// Carried pot sits this far down over the carrier's head
    pub const POT_CARRY_OVERLAP: f32 = 10.0;
    /// Max distance between centers along the facing axis to lift
    pub const LIFT_REACH: f32 = 20.0;
    /// Max misalignment between centers across the facing axis to lift
    pub const LIFT_ALIGNMENT: f32 = 10.0;
    pub const LIFT_DURATION: f32 = 0.4;
    pub const THROW_DURATION: f32 = 0.2;

    /// Thrown pot flight
    pub const THROWN_POT_SPEED: f32 = 200.0;
    pub const THROWN_POT_MAX_DISTANCE: f32 = TILE_SIZE * 4.0;
    pub const THROWN_POT_DAMAGE: i32 = 1;

    /// Heart pickup
    pub const HEART_SIZE: f32 = 16.0;
    pub const HEART_HEAL_AMOUNT: i32 = 2;

    /// Switch size
    pub const SWITCH_SIZE: f32 = 16.0;

    /// Room population
    pub const MIN_POTS: u32 = 3;
    pub const MAX_POTS: u32 = 5;
    /// Pots must be at least two tiles apart
    pub const POT_MIN_SPACING: f32 = TILE_SIZE * 2.0;
    pub const POT_PLACEMENT_ATTEMPTS: u32 = 50;

    /// Camera shift between rooms
    pub const SHIFT_DURATION: f32 = 1.0;
}
