//! Behavior contract shared by the player and enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Direction, Hitbox, HitboxOffsets};
use super::random::Dice;
use crate::audio::SoundEffect;

/// Identifies an entity within the game; resolved through the owning room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// The player's id is fixed and never handed out to enemies
pub const PLAYER_ID: EntityId = EntityId(0);

/// Identifies a room within a dungeon run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// Something a dying entity leaves behind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeathDrop {
    /// Heart whose top-left corner is at the given position
    Heart(Vec2),
}

/// State common to every entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityBody {
    pub id: EntityId,
    pub position: Vec2,
    pub dimensions: Vec2,
    pub hitbox_offsets: HitboxOffsets,
    pub direction: Direction,
    /// Pixels per second
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    /// Damage dealt to the player on contact
    pub damage: i32,
    pub is_dead: bool,
    pub render_priority: i32,
}

impl EntityBody {
    pub fn new(id: EntityId, position: Vec2, dimensions: Vec2, health: i32) -> Self {
        Self {
            id,
            position,
            dimensions,
            hitbox_offsets: HitboxOffsets::default(),
            direction: Direction::Down,
            speed: 0.0,
            health,
            max_health: health,
            damage: 0,
            is_dead: false,
            render_priority: 0,
        }
    }

    /// Hitbox derived from the current position
    pub fn hitbox(&self) -> Hitbox {
        self.hitbox_offsets.apply(self.position, self.dimensions)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.dimensions / 2.0
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// Capability set every simulated entity exposes
pub trait Entity {
    fn body(&self) -> &EntityBody;
    fn body_mut(&mut self) -> &mut EntityBody;

    fn is_player(&self) -> bool {
        false
    }

    fn id(&self) -> EntityId {
        self.body().id
    }

    fn position(&self) -> Vec2 {
        self.body().position
    }

    fn hitbox(&self) -> Hitbox {
        self.body().hitbox()
    }

    fn health(&self) -> i32 {
        self.body().health
    }

    fn is_dead(&self) -> bool {
        self.body().is_dead
    }

    fn render_priority(&self) -> i32 {
        self.body().render_priority
    }

    fn did_collide_with(&self, hitbox: &Hitbox) -> bool {
        self.hitbox().intersects(hitbox)
    }

    fn receive_damage(&mut self, damage: i32, sounds: &mut Vec<SoundEffect>) {
        self.body_mut().health -= damage;
        sounds.push(SoundEffect::HitEnemy);
    }

    /// Runs once, the first frame the entity is found at zero health.
    /// May ask the room to spawn a drop.
    fn on_death(&mut self, _dice: &mut dyn Dice, _drop_chance: f32) -> Option<DeathDrop> {
        None
    }
}
