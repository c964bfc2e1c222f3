//! One screen of the dungeon
//!
//! The room owns the player, its enemies and its objects, and advances them in
//! a fixed order every frame:
//!
//! 1. rebuild the render queue from the previous frame's live set
//! 2. evict dead enemies
//! 3. evict objects flagged for cleanup
//! 4. update entities (enemies first, the player last) and resolve their
//!    collisions and combat
//! 5. update objects
//!
//! Rendering reads the queue frozen in step 1 and has no gameplay effect.

use std::mem;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::entity::{DeathDrop, Entity, EntityBody, EntityId, RoomId};
use super::geometry::{Direction, Hitbox};
use super::input::FrameInput;
use super::layout::TileGrid;
use super::object::{GameObject, ObjectCtx, ObjectId, ObjectIds, RoomCommand};
use super::player::{Player, PlayerWorld};
use super::population::RoomContents;
use super::random::Dice;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::render::DrawCommand;

/// Movement limits of a room, fixed for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub tile_size: f32,
}

impl Default for RoomBounds {
    fn default() -> Self {
        Self {
            top: TOP_EDGE,
            bottom: BOTTOM_EDGE,
            left: LEFT_EDGE,
            right: RIGHT_EDGE,
            tile_size: TILE_SIZE,
        }
    }
}

impl RoomBounds {
    /// Area a projectile may occupy without hitting a wall
    pub fn playable(&self) -> Hitbox {
        Hitbox::new(self.left, self.top, self.right - self.left, self.bottom - self.top)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + (self.right - self.left) / 2.0).floor(),
            (self.top + (self.bottom - self.top) / 2.0).floor(),
        )
    }

    /// Keep a walking player inside the room. The sprite may overlap the top
    /// wall by its own height so the feet can reach the top edge.
    /// Returns true if the body was moved.
    pub fn clamp_walker(&self, body: &mut EntityBody) -> bool {
        let top = self.top - body.dimensions.y;
        self.clamp(body, top)
    }

    /// Keep the whole body inside the room. Returns true if it was moved.
    pub fn clamp_inside(&self, body: &mut EntityBody) -> bool {
        self.clamp(body, self.top)
    }

    fn clamp(&self, body: &mut EntityBody, top: f32) -> bool {
        let before = body.position;
        body.position.x = body.position.x.max(self.left).min(self.right - body.dimensions.x);
        body.position.y = body.position.y.max(top).min(self.bottom - body.dimensions.y);
        body.position != before
    }
}

/// Something the render queue points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderItem {
    Player,
    Enemy(EntityId),
    Object(ObjectId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEntry {
    pub item: RenderItem,
    pub priority: i32,
    /// Bottom edge of the hitbox, used as the depth key
    pub bottom: f32,
}

impl RenderEntry {
    fn new(item: RenderItem, priority: i32, hitbox: Hitbox) -> Self {
        Self {
            item,
            priority,
            bottom: hitbox.bottom(),
        }
    }
}

/// Stable sort: priority ascending, then hitbox bottom ascending
pub fn sort_render_queue(queue: &mut [RenderEntry]) {
    queue.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.bottom.total_cmp(&b.bottom)));
}

pub struct Room {
    id: RoomId,
    bounds: RoomBounds,
    tiles: TileGrid,
    player: Player,
    enemies: Vec<Enemy>,
    objects: Vec<GameObject>,
    doorways: Vec<ObjectId>,
    object_ids: ObjectIds,
    next_enemy_id: u32,
    render_queue: Vec<RenderEntry>,
    /// Things culled this frame; still drawn once from the frozen queue
    evicted_enemies: Vec<Enemy>,
    evicted_objects: Vec<GameObject>,
    /// Player frozen while the camera moves to the next room
    is_shifting: bool,
    /// Camera offset applied while shifting
    adjacent_offset: Vec2,
    dice: Box<dyn Dice>,
    heart_drop_chance: f32,
    sounds: Vec<SoundEffect>,
    commands: Vec<RoomCommand>,
    exit_request: Option<Direction>,
}

impl Room {
    pub fn new(player: Player, contents: RoomContents, dice: Box<dyn Dice>) -> Self {
        let mut room = Self {
            id: contents.id,
            bounds: RoomBounds::default(),
            tiles: TileGrid::empty(),
            player,
            enemies: Vec::new(),
            objects: Vec::new(),
            doorways: Vec::new(),
            object_ids: ObjectIds::default(),
            next_enemy_id: 1,
            render_queue: Vec::new(),
            evicted_enemies: Vec::new(),
            evicted_objects: Vec::new(),
            is_shifting: false,
            adjacent_offset: Vec2::ZERO,
            dice,
            heart_drop_chance: HEART_DROP_CHANCE,
            sounds: Vec::new(),
            commands: Vec::new(),
            exit_request: None,
        };
        room.install(contents);
        room.render_queue = room.build_render_queue();
        room
    }

    pub fn with_heart_drop_chance(mut self, chance: f32) -> Self {
        self.heart_drop_chance = if chance.is_finite() { chance.clamp(0.0, 1.0) } else { 0.0 };
        self
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn bounds(&self) -> &RoomBounds {
        &self.bounds
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [GameObject] {
        &mut self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn doorways(&self) -> &[ObjectId] {
        &self.doorways
    }

    pub fn render_queue(&self) -> &[RenderEntry] {
        &self.render_queue
    }

    pub fn is_shifting(&self) -> bool {
        self.is_shifting
    }

    pub fn set_shifting(&mut self, shifting: bool) {
        self.is_shifting = shifting;
    }

    pub fn set_adjacent_offset(&mut self, offset: Vec2) {
        self.adjacent_offset = offset;
    }

    /// Sounds queued since the last drain, in the order they fired
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        mem::take(&mut self.sounds)
    }

    /// The doorway the player walked into, if any. Cleared on read.
    pub fn take_exit_request(&mut self) -> Option<Direction> {
        self.exit_request.take()
    }

    /// Add an enemy owned by this room
    pub fn add_enemy(&mut self, make: impl FnOnce(EntityId) -> Enemy) -> EntityId {
        let id = EntityId(self.next_enemy_id);
        self.next_enemy_id += 1;
        let mut enemy = make(id);
        enemy.set_room(Some(self.id));
        self.enemies.push(enemy);
        id
    }

    pub fn spawn(&mut self, make: impl FnOnce(ObjectId) -> GameObject) -> ObjectId {
        let id = self.object_ids.allocate();
        self.objects.push(make(id));
        id
    }

    pub fn open_doors(&mut self) {
        self.set_doors_open(true);
    }

    pub fn close_doors(&mut self) {
        self.set_doors_open(false);
    }

    fn set_doors_open(&mut self, open: bool) {
        for object in self.objects.iter_mut().filter(|object| self.doorways.contains(&object.id)) {
            object.set_door_open(open);
        }
        log::debug!("room {:?} doors {}", self.id, if open { "opened" } else { "closed" });
    }

    /// Replace everything but the player with `contents`, returning the old
    /// contents detached from this room. Pending player actions are cancelled
    /// first, so a pot being lifted or carried stays behind.
    pub fn enter_contents(&mut self, contents: RoomContents) -> RoomContents {
        self.player.cancel_pending(&mut self.objects, &mut self.object_ids);

        let mut old = RoomContents {
            id: self.id,
            tiles: mem::replace(&mut self.tiles, TileGrid::empty()),
            enemies: mem::take(&mut self.enemies),
            objects: mem::take(&mut self.objects),
            doorways: mem::take(&mut self.doorways),
            object_ids: mem::take(&mut self.object_ids),
        };
        for enemy in &mut old.enemies {
            enemy.set_room(None);
        }

        self.install(contents);
        self.render_queue = self.build_render_queue();
        self.evicted_enemies.clear();
        self.evicted_objects.clear();
        self.commands.clear();
        self.exit_request = None;
        self.adjacent_offset = Vec2::ZERO;
        log::info!("entered room {:?}", self.id);
        old
    }

    fn install(&mut self, contents: RoomContents) {
        self.id = contents.id;
        self.tiles = contents.tiles;
        self.enemies = contents.enemies;
        self.objects = contents.objects;
        self.doorways = contents.doorways;
        self.object_ids = contents.object_ids;
        for enemy in &mut self.enemies {
            enemy.set_room(Some(self.id));
        }
        self.next_enemy_id = self.enemies.iter().map(|enemy| enemy.id().0 + 1).max().unwrap_or(1);
    }

    pub fn update(&mut self, dt: f32, input: &FrameInput) {
        self.render_queue = self.build_render_queue();
        self.clean_up_entities();
        self.clean_up_objects();
        self.update_entities(dt, input);
        self.update_objects(dt);
    }

    fn build_render_queue(&self) -> Vec<RenderEntry> {
        let mut queue: Vec<RenderEntry> = self
            .enemies
            .iter()
            .map(|enemy| RenderEntry::new(RenderItem::Enemy(enemy.id()), enemy.render_priority(), enemy.hitbox()))
            .chain(std::iter::once(RenderEntry::new(
                RenderItem::Player,
                self.player.render_priority(),
                self.player.hitbox(),
            )))
            .chain(self.objects.iter().map(|object| {
                RenderEntry::new(RenderItem::Object(object.id), object.render_priority, object.hitbox())
            }))
            .collect();
        sort_render_queue(&mut queue);
        queue
    }

    fn clean_up_entities(&mut self) {
        let (dead, alive): (Vec<_>, Vec<_>) = mem::take(&mut self.enemies).into_iter().partition(Enemy::is_dead);
        for enemy in &dead {
            log::trace!("evicting {:?}", enemy.id());
        }
        self.enemies = alive;
        self.evicted_enemies = dead;
    }

    fn clean_up_objects(&mut self) {
        let (flagged, kept): (Vec<_>, Vec<_>) =
            mem::take(&mut self.objects).into_iter().partition(|object| object.clean_up);
        self.objects = kept;
        self.evicted_objects = flagged;
    }

    fn update_entities(&mut self, dt: f32, input: &FrameInput) {
        for index in 0..self.enemies.len() {
            self.update_enemy(index, dt);
        }
        self.update_player(dt, input);
        self.apply_commands();
    }

    fn update_enemy(&mut self, index: usize, dt: f32) {
        let enemy = &mut self.enemies[index];

        let mut drop = None;
        if enemy.health() <= 0 && !enemy.is_dead() {
            drop = enemy.on_death(self.dice.as_mut(), self.heart_drop_chance);
            enemy.body_mut().is_dead = true;
        }

        enemy.update(self.dice.as_mut(), &self.bounds, dt);
        collide_with_objects(&mut self.objects, enemy, &mut self.sounds, &mut self.commands);

        if let Some(sword) = self.player.sword_hitbox() {
            if !enemy.is_dead() && enemy.did_collide_with(&sword) {
                log::trace!("sword hit {:?}", enemy.id());
                enemy.receive_damage(self.player.body().damage, &mut self.sounds);
            }
        }

        if !enemy.is_dead() && self.player.did_collide_with(&enemy.hitbox()) && !self.player.is_invulnerable() {
            log::debug!("{:?} hit the player", enemy.id());
            self.player.receive_damage(enemy.body().damage, &mut self.sounds);
            self.player.become_invulnerable();
        }

        if let Some(drop) = drop {
            self.spawn_drop(drop);
        }
    }

    fn update_player(&mut self, dt: f32, input: &FrameInput) {
        if self.player.health() <= 0 && !self.player.is_dead() {
            self.player.on_death(self.dice.as_mut(), 0.0);
            self.player.body_mut().is_dead = true;
            self.sounds.push(SoundEffect::Death);
            log::info!("player died in room {:?}", self.id);
        }

        if !self.is_shifting {
            self.player.update(
                PlayerWorld {
                    objects: &mut self.objects,
                    object_ids: &mut self.object_ids,
                    input,
                    bounds: &self.bounds,
                    sounds: &mut self.sounds,
                },
                dt,
            );
        }

        collide_with_objects(&mut self.objects, &mut self.player, &mut self.sounds, &mut self.commands);
    }

    fn apply_commands(&mut self) {
        for command in mem::take(&mut self.commands) {
            match command {
                RoomCommand::OpenDoors => self.open_doors(),
                RoomCommand::Exit(direction) => {
                    if self.exit_request.is_none() {
                        log::info!("player leaving room {:?} {direction:?}", self.id);
                        self.exit_request = Some(direction);
                    }
                }
            }
        }
    }

    fn spawn_drop(&mut self, drop: DeathDrop) {
        match drop {
            DeathDrop::Heart(position) => {
                let id = self.spawn(|id| GameObject::heart(id, position));
                log::debug!("heart {id:?} dropped at {position}");
            }
        }
    }

    fn update_objects(&mut self, dt: f32) {
        let mut ctx = ObjectCtx {
            player: &self.player,
            enemies: &mut self.enemies,
            bounds: &self.bounds,
            sounds: &mut self.sounds,
        };
        for object in &mut self.objects {
            object.update(&mut ctx, dt);
        }
    }

    /// Tiles, then everything in the frozen render queue, shifted by `offset`
    /// on top of the room's own camera offset
    pub fn render(&self, offset: Vec2) -> Vec<DrawCommand> {
        let offset = offset + self.adjacent_offset;
        let mut commands: Vec<DrawCommand> = self.tiles.draw(offset).collect();
        commands.extend(self.render_queue.iter().filter_map(|entry| self.draw_item(entry.item, offset)));
        commands.into_iter().map(DrawCommand::snapped).collect()
    }

    fn draw_item(&self, item: RenderItem, offset: Vec2) -> Option<DrawCommand> {
        match item {
            RenderItem::Player => Some(self.player.draw(offset)),
            RenderItem::Enemy(id) => self
                .enemies
                .iter()
                .chain(&self.evicted_enemies)
                .find(|enemy| enemy.id() == id)
                .map(|enemy| enemy.draw(offset)),
            RenderItem::Object(id) => self
                .objects
                .iter()
                .chain(&self.evicted_objects)
                .find(|object| object.id == id)
                .map(|object| DrawCommand::new(object.sprite(), object.draw_position() + offset)),
        }
    }
}

/// Run every overlapping object's hooks against `entity`, in list order
fn collide_with_objects(
    objects: &mut [GameObject],
    entity: &mut dyn Entity,
    sounds: &mut Vec<SoundEffect>,
    commands: &mut Vec<RoomCommand>,
) {
    for object in objects.iter_mut() {
        if !object.did_collide_with_entity(&entity.hitbox()) {
            continue;
        }
        if object.is_collidable {
            commands.extend(object.on_collision(entity, sounds));
        }
        if object.is_consumable && !object.was_consumed && entity.is_player() {
            object.on_consume(entity, sounds);
            object.clean_up = true;
        }
    }
}
