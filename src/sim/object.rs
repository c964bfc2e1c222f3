//! Interactive objects: pots, thrown pots, hearts, switches, doorways
//!
//! Objects share one struct with capability flags; kind-specific state lives
//! in [`ObjectKind`]. The room drives them through three hooks:
//! [`GameObject::update`], [`GameObject::on_collision`] and
//! [`GameObject::on_consume`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::entity::{Entity, EntityBody, EntityId};
use super::geometry::{Direction, Hitbox, HitboxOffsets};
use super::player::Player;
use super::pot::{Pot, ThrownPot};
use super::room::RoomBounds;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::render::{Sprite, SpriteSheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Hands out object ids that are unique within a room
#[derive(Debug, Clone, Default)]
pub struct ObjectIds {
    next: u32,
}

impl ObjectIds {
    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next += 1;
        id
    }
}

/// Switch sprite frames
const SWITCH_FRAME_OFF: usize = 2;
const SWITCH_FRAME_ON: usize = 1;
/// Full heart in the hearts sheet
const HEART_FRAME: usize = 4;
/// Doorway frames in the tile sheet
const DOOR_FRAME_OPEN: usize = 18;
const DOOR_FRAME_CLOSED: usize = 98;
/// Doorway hitboxes reach this far into the room so the player can touch them
const DOOR_REACH: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub is_on: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doorway {
    pub direction: Direction,
    pub is_open: bool,
}

#[derive(Debug, Clone)]
pub enum ObjectKind {
    Pot(Pot),
    ThrownPot(ThrownPot),
    Heart,
    Switch(Switch),
    Doorway(Doorway),
}

/// Side effects an object asks of its room after a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCommand {
    OpenDoors,
    /// The player walked into an open doorway
    Exit(Direction),
}

/// What an object may read or touch while it updates
pub struct ObjectCtx<'a> {
    pub player: &'a Player,
    pub enemies: &'a mut [Enemy],
    pub bounds: &'a RoomBounds,
    pub sounds: &'a mut Vec<SoundEffect>,
}

impl ObjectCtx<'_> {
    /// Resolve an entity id against the room's entity list
    pub fn entity_body(&self, id: EntityId) -> Option<&EntityBody> {
        if self.player.id() == id {
            return Some(self.player.body());
        }
        self.enemies.iter().find(|enemy| enemy.id() == id).map(Enemy::body)
    }
}

#[derive(Debug, Clone)]
pub struct GameObject {
    pub id: ObjectId,
    pub position: Vec2,
    pub dimensions: Vec2,
    pub hitbox_offsets: HitboxOffsets,
    pub render_priority: i32,
    pub is_solid: bool,
    pub is_collidable: bool,
    pub is_liftable: bool,
    pub is_consumable: bool,
    pub was_consumed: bool,
    /// Removed from the room at the next cleanup pass
    pub clean_up: bool,
    pub kind: ObjectKind,
}

impl GameObject {
    fn new(id: ObjectId, position: Vec2, dimensions: Vec2, kind: ObjectKind) -> Self {
        Self {
            id,
            position,
            dimensions,
            hitbox_offsets: HitboxOffsets::default(),
            render_priority: 0,
            is_solid: false,
            is_collidable: false,
            is_liftable: false,
            is_consumable: false,
            was_consumed: false,
            clean_up: false,
            kind,
        }
    }

    /// Solid, liftable pot resting on the floor
    pub fn pot(id: ObjectId, position: Vec2) -> Self {
        let mut pot = Self::new(id, position, Vec2::new(POT_WIDTH, POT_HEIGHT), ObjectKind::Pot(Pot::default()));
        pot.is_solid = true;
        pot.is_collidable = true;
        pot.is_liftable = true;
        // Collide with the base of the pot, not the whole sprite
        pot.hitbox_offsets = HitboxOffsets::new(10.0, 24.0, -20.0, -24.0);
        pot
    }

    /// Pot in flight
    pub fn thrown_pot(id: ObjectId, position: Vec2, direction: Direction) -> Self {
        let mut pot = Self::new(
            id,
            position,
            Vec2::new(POT_WIDTH, POT_HEIGHT),
            ObjectKind::ThrownPot(ThrownPot::new(direction)),
        );
        pot.hitbox_offsets = HitboxOffsets::new(8.0, 8.0, -16.0, -16.0);
        pot
    }

    pub fn heart(id: ObjectId, position: Vec2) -> Self {
        let mut heart = Self::new(id, position, Vec2::splat(HEART_SIZE), ObjectKind::Heart);
        heart.is_collidable = true;
        heart.is_consumable = true;
        heart.render_priority = -1;
        heart
    }

    pub fn switch(id: ObjectId, position: Vec2) -> Self {
        let mut switch = Self::new(
            id,
            position,
            Vec2::splat(SWITCH_SIZE),
            ObjectKind::Switch(Switch { is_on: false }),
        );
        switch.is_collidable = true;
        switch.render_priority = -1;
        switch
    }

    /// Closed doorway in the wall on the `direction` side of the room
    pub fn doorway(id: ObjectId, direction: Direction) -> Self {
        let (position, dimensions) = doorway_placement(direction);
        let mut doorway = Self::new(
            id,
            position,
            dimensions,
            ObjectKind::Doorway(Doorway {
                direction,
                is_open: false,
            }),
        );
        doorway.is_collidable = true;
        doorway.is_solid = true;
        doorway.render_priority = -2;
        doorway.hitbox_offsets = doorway_offsets(direction);
        doorway
    }

    /// Hitbox derived from the current position
    pub fn hitbox(&self) -> Hitbox {
        self.hitbox_offsets.apply(self.position, self.dimensions)
    }

    /// Where the sprite goes; a pot mid-lift is drawn along its lift tween
    pub fn draw_position(&self) -> Vec2 {
        match &self.kind {
            ObjectKind::Pot(pot) => pot.draw_position(self.position),
            _ => self.position,
        }
    }

    /// Shattered pots no longer take part in collisions
    pub fn did_collide_with_entity(&self, hitbox: &Hitbox) -> bool {
        if let ObjectKind::ThrownPot(thrown) = &self.kind {
            if thrown.is_broken {
                return false;
            }
        }
        self.hitbox().intersects(hitbox)
    }

    pub fn as_pot(&self) -> Option<&Pot> {
        match &self.kind {
            ObjectKind::Pot(pot) => Some(pot),
            _ => None,
        }
    }

    pub fn as_thrown_pot(&self) -> Option<&ThrownPot> {
        match &self.kind {
            ObjectKind::ThrownPot(thrown) => Some(thrown),
            _ => None,
        }
    }

    pub fn as_doorway(&self) -> Option<&Doorway> {
        match &self.kind {
            ObjectKind::Doorway(doorway) => Some(doorway),
            _ => None,
        }
    }

    pub fn update(&mut self, ctx: &mut ObjectCtx<'_>, dt: f32) {
        match self.kind {
            ObjectKind::Pot(_) => self.update_pot(ctx, dt),
            ObjectKind::ThrownPot(_) => self.update_thrown_pot(ctx, dt),
            ObjectKind::Heart | ObjectKind::Switch(_) | ObjectKind::Doorway(_) => {}
        }
    }

    /// Called for every collidable object overlapping `entity` this frame
    pub fn on_collision(&mut self, entity: &mut dyn Entity, sounds: &mut Vec<SoundEffect>) -> Option<RoomCommand> {
        if self.is_solid {
            let hitbox = self.hitbox();
            let body = entity.body_mut();
            if let Some(push) = body.hitbox().separation_from(&hitbox) {
                body.position += push;
            }
        }

        match &mut self.kind {
            ObjectKind::Switch(switch) if entity.is_player() && !switch.is_on => {
                switch.is_on = true;
                sounds.push(SoundEffect::Door);
                log::debug!("switch {:?} pressed", self.id);
                Some(RoomCommand::OpenDoors)
            }
            ObjectKind::Doorway(doorway)
                if doorway.is_open && entity.is_player() && entity.body().direction == doorway.direction =>
            {
                Some(RoomCommand::Exit(doorway.direction))
            }
            _ => None,
        }
    }

    pub fn on_consume(&mut self, consumer: &mut dyn Entity, sounds: &mut Vec<SoundEffect>) {
        self.was_consumed = true;
        if matches!(self.kind, ObjectKind::Heart) && consumer.is_player() {
            consumer.body_mut().heal(HEART_HEAL_AMOUNT);
            sounds.push(SoundEffect::Pickup);
        }
    }

    /// Opening a doorway makes it passable
    pub fn set_door_open(&mut self, open: bool) {
        if let ObjectKind::Doorway(doorway) = &mut self.kind {
            doorway.is_open = open;
            self.is_solid = !open;
        }
    }

    pub fn sprite(&self) -> Sprite {
        match &self.kind {
            ObjectKind::Pot(_) => Sprite::new(SpriteSheet::Pots, super::pot::POT_FRAME),
            ObjectKind::ThrownPot(thrown) => Sprite::new(SpriteSheet::Pots, thrown.frame()),
            ObjectKind::Heart => Sprite::new(SpriteSheet::Hearts, HEART_FRAME),
            ObjectKind::Switch(switch) => Sprite::new(
                SpriteSheet::Switches,
                if switch.is_on { SWITCH_FRAME_ON } else { SWITCH_FRAME_OFF },
            ),
            ObjectKind::Doorway(doorway) => Sprite::new(
                SpriteSheet::Tiles,
                if doorway.is_open { DOOR_FRAME_OPEN } else { DOOR_FRAME_CLOSED },
            ),
        }
    }
}

fn doorway_offsets(direction: Direction) -> HitboxOffsets {
    match direction {
        Direction::Up => HitboxOffsets::new(0.0, 0.0, 0.0, DOOR_REACH),
        Direction::Down => HitboxOffsets::new(0.0, -DOOR_REACH, 0.0, DOOR_REACH),
        Direction::Left => HitboxOffsets::new(0.0, 0.0, DOOR_REACH, 0.0),
        Direction::Right => HitboxOffsets::new(-DOOR_REACH, 0.0, DOOR_REACH, 0.0),
    }
}

/// Collision area of the doorway on `direction`'s side of the room
pub fn doorway_hitbox(direction: Direction) -> Hitbox {
    let (position, dimensions) = doorway_placement(direction);
    doorway_offsets(direction).apply(position, dimensions)
}

/// Position and size of the doorway covering the wall gap on `direction`'s side
pub fn doorway_placement(direction: Direction) -> (Vec2, Vec2) {
    let mid_x = RENDER_OFFSET_X + (ROOM_WIDTH_TILES / 2 - 1) as f32 * TILE_SIZE;
    let mid_y = RENDER_OFFSET_Y + (ROOM_HEIGHT_TILES / 2) as f32 * TILE_SIZE;
    let horizontal = Vec2::new(TILE_SIZE * 2.0, TILE_SIZE);
    let vertical = Vec2::new(TILE_SIZE, TILE_SIZE * 2.0);
    match direction {
        Direction::Up => (Vec2::new(mid_x, RENDER_OFFSET_Y), horizontal),
        Direction::Down => (
            Vec2::new(mid_x, CANVAS_HEIGHT - RENDER_OFFSET_Y - TILE_SIZE),
            horizontal,
        ),
        Direction::Left => (Vec2::new(RENDER_OFFSET_X, mid_y), vertical),
        Direction::Right => (
            Vec2::new(CANVAS_WIDTH - RENDER_OFFSET_X - TILE_SIZE, mid_y),
            vertical,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Enemy, EnemyKind};
    use crate::sim::player::Player;

    #[test]
    fn test_solid_pot_pushes_entity_out() {
        let mut pot = GameObject::pot(ObjectId(1), Vec2::new(100.0, 100.0));
        // Pot base hitbox is (110, 124) 12x8
        let mut enemy = Enemy::new(EntityId(5), EnemyKind::Slime, Vec2::new(96.0, 110.0), None);
        assert!(pot.did_collide_with_entity(&enemy.hitbox()));

        let mut sounds = Vec::new();
        assert_eq!(pot.on_collision(&mut enemy, &mut sounds), None);
        assert!(!pot.hitbox().intersects(&enemy.hitbox()));
        assert!(sounds.is_empty());
    }

    #[test]
    fn test_switch_opens_doors_once_for_player_only() {
        let mut switch = GameObject::switch(ObjectId(1), Vec2::new(50.0, 50.0));
        let mut sounds = Vec::new();

        let mut enemy = Enemy::new(EntityId(3), EnemyKind::Skeleton, Vec2::new(50.0, 50.0), None);
        assert_eq!(switch.on_collision(&mut enemy, &mut sounds), None);

        let mut player = Player::new(Vec2::new(50.0, 40.0));
        assert_eq!(switch.on_collision(&mut player, &mut sounds), Some(RoomCommand::OpenDoors));
        assert_eq!(switch.on_collision(&mut player, &mut sounds), None);
        assert_eq!(sounds, vec![SoundEffect::Door]);
    }

    #[test]
    fn test_heart_heals_up_to_max() {
        let mut heart = GameObject::heart(ObjectId(2), Vec2::ZERO);
        let mut player = Player::new(Vec2::ZERO);
        player.body_mut().health = PLAYER_MAX_HEALTH - 1;
        let mut sounds = Vec::new();
        heart.on_consume(&mut player, &mut sounds);
        assert!(heart.was_consumed);
        assert_eq!(player.health(), PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_open_doorway_requests_exit_when_facing_it() {
        let mut door = GameObject::doorway(ObjectId(9), Direction::Left);
        let mut player = Player::new(Vec2::new(LEFT_EDGE, door.position.y));
        let mut sounds = Vec::new();
        assert!(door.did_collide_with_entity(&player.hitbox()));

        // Closed: solid, no exit
        player.body_mut().direction = Direction::Left;
        assert_eq!(door.on_collision(&mut player, &mut sounds), None);

        door.set_door_open(true);
        assert!(!door.is_solid);
        player.body_mut().position.x = LEFT_EDGE;
        player.body_mut().direction = Direction::Up;
        assert_eq!(door.on_collision(&mut player, &mut sounds), None);
        player.body_mut().direction = Direction::Left;
        assert_eq!(
            door.on_collision(&mut player, &mut sounds),
            Some(RoomCommand::Exit(Direction::Left))
        );
    }

    #[test]
    fn test_every_doorway_reachable_from_clamped_player() {
        // Player standing against each wall at the door's center must touch it
        for direction in Direction::ALL {
            let door = GameObject::doorway(ObjectId(1), direction);
            let center = door.hitbox().center();
            let position = match direction {
                Direction::Up => Vec2::new(center.x - PLAYER_WIDTH / 2.0, TOP_EDGE - PLAYER_HEIGHT),
                Direction::Down => Vec2::new(center.x - PLAYER_WIDTH / 2.0, BOTTOM_EDGE - PLAYER_HEIGHT),
                Direction::Left => Vec2::new(LEFT_EDGE, center.y - PLAYER_HEIGHT * 0.75),
                Direction::Right => Vec2::new(RIGHT_EDGE - PLAYER_WIDTH, center.y - PLAYER_HEIGHT * 0.75),
            };
            let player = Player::new(position);
            assert!(
                door.did_collide_with_entity(&player.hitbox()),
                "{direction:?} doorway unreachable"
            );
        }
    }
}
