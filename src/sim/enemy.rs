//! Enemies: random ambulation and a chance to drop a heart on death

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::Animation;
use super::entity::{DeathDrop, Entity, EntityBody, EntityId, RoomId};
use super::fsm::{Machine, State, StateMachine, Transition};
use super::geometry::Direction;
use super::random::Dice;
use super::room::RoomBounds;
use super::timer::Countdown;
use crate::consts::*;
use crate::error::FsmError;
use crate::render::{DrawCommand, Sprite, SpriteSheet};

const WALK_INTERVAL: f32 = 0.2;
/// Seconds an enemy keeps walking before picking again
const MOVE_DURATION: (f32, f32) = (1.0, 3.0);
const IDLE_DURATION: (f32, f32) = (0.5, 1.5);
/// Chance to stop and stand after a walk
const IDLE_CHANCE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Skeleton,
    Slime,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 2] = [EnemyKind::Skeleton, EnemyKind::Slime];

    pub fn health(self) -> i32 {
        match self {
            EnemyKind::Skeleton => 2,
            EnemyKind::Slime => 1,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Skeleton => 20.0,
            EnemyKind::Slime => 10.0,
        }
    }

    pub fn damage(self) -> i32 {
        1
    }

    /// First frame of this kind's block in the enemies sheet
    fn first_frame(self) -> usize {
        match self {
            EnemyKind::Skeleton => 0,
            EnemyKind::Slime => 16,
        }
    }

    fn facing_frames(self, direction: Direction) -> Vec<usize> {
        let offset = match direction {
            Direction::Down => 0,
            Direction::Right => 4,
            Direction::Up => 8,
            Direction::Left => 12,
        };
        let first = self.first_frame() + offset;
        (first..first + 4).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyStateId {
    Idle,
    Walking,
}

pub struct EnemyMachine;

impl Machine for EnemyMachine {
    type Id = EnemyStateId;
    type Params = ();
    type Ctx<'a> = EnemyCtx<'a>;
}

pub struct EnemyCtx<'a> {
    pub enemy: &'a mut EnemyData,
    pub dice: &'a mut dyn Dice,
    pub bounds: &'a RoomBounds,
}

#[derive(Debug, Clone)]
pub struct EnemyData {
    pub body: EntityBody,
    pub kind: EnemyKind,
    pub animation: Animation,
}

pub struct Enemy {
    data: EnemyData,
    /// Owning room; `None` while detached
    room: Option<RoomId>,
    machine: StateMachine<EnemyMachine>,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, position: Vec2, room: Option<RoomId>) -> Self {
        let mut body = EntityBody::new(id, position, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT), kind.health());
        body.speed = kind.speed();
        body.damage = kind.damage();

        let mut machine = StateMachine::new();
        let registered = register(&mut machine);
        debug_assert!(registered.is_ok(), "enemy states misregistered: {registered:?}");

        Self {
            data: EnemyData {
                animation: Animation::still(kind.first_frame()),
                body,
                kind,
            },
            room,
            machine,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.data.kind
    }

    pub fn room(&self) -> Option<RoomId> {
        self.room
    }

    pub fn set_room(&mut self, room: Option<RoomId>) {
        self.room = room;
    }

    pub fn state(&self) -> Option<EnemyStateId> {
        self.machine.current()
    }

    /// The first update starts the enemy walking, since picking a heading needs
    /// the room's dice
    pub fn update(&mut self, dice: &mut dyn Dice, bounds: &RoomBounds, dt: f32) {
        let mut ctx = EnemyCtx {
            enemy: &mut self.data,
            dice,
            bounds,
        };
        if self.machine.current().is_none() {
            self.machine.change(&mut ctx, EnemyStateId::Walking, ());
        }
        self.machine.update(&mut ctx, dt);
        self.data.animation.update(dt);
    }

    pub fn sprite(&self) -> Sprite {
        Sprite::new(SpriteSheet::Enemies, self.data.animation.current_frame())
    }

    pub fn draw(&self, offset: Vec2) -> DrawCommand {
        DrawCommand::new(self.sprite(), self.data.body.position + offset)
    }
}

impl Entity for Enemy {
    fn body(&self) -> &EntityBody {
        &self.data.body
    }

    fn body_mut(&mut self) -> &mut EntityBody {
        &mut self.data.body
    }

    fn on_death(&mut self, dice: &mut dyn Dice, drop_chance: f32) -> Option<DeathDrop> {
        log::debug!("{:?} {:?} died", self.data.kind, self.data.body.id);
        // Detached enemies have nowhere to put a drop
        self.room?;
        if !dice.chance(drop_chance) {
            return None;
        }
        let heart = self.data.body.center() - Vec2::splat(HEART_SIZE / 2.0);
        Some(DeathDrop::Heart(heart))
    }
}

fn register(machine: &mut StateMachine<EnemyMachine>) -> Result<(), FsmError> {
    machine.add(EnemyStateId::Idle, IdleState::default())?;
    machine.add(EnemyStateId::Walking, WalkingState::default())?;
    Ok(())
}

#[derive(Default)]
struct IdleState {
    timer: Countdown,
}

impl State<EnemyMachine> for IdleState {
    fn enter(&mut self, ctx: &mut EnemyCtx<'_>, _params: ()) {
        let frames = ctx.enemy.kind.facing_frames(ctx.enemy.body.direction);
        ctx.enemy.animation = Animation::still(frames[0]);
        self.timer = Countdown::new(ctx.dice.range(IDLE_DURATION.0, IDLE_DURATION.1));
    }

    fn update(&mut self, _ctx: &mut EnemyCtx<'_>, dt: f32) -> Option<Transition<EnemyMachine>> {
        self.timer.tick(dt).then(|| Transition::new(EnemyStateId::Walking, ()))
    }
}

#[derive(Default)]
struct WalkingState {
    timer: Countdown,
}

impl WalkingState {
    fn face(ctx: &mut EnemyCtx<'_>, direction: Direction) {
        ctx.enemy.body.direction = direction;
        ctx.enemy.animation = Animation::looping(ctx.enemy.kind.facing_frames(direction), WALK_INTERVAL);
    }
}

impl State<EnemyMachine> for WalkingState {
    fn enter(&mut self, ctx: &mut EnemyCtx<'_>, _params: ()) {
        let direction = Direction::ALL[ctx.dice.index(Direction::ALL.len())];
        Self::face(ctx, direction);
        self.timer = Countdown::new(ctx.dice.range(MOVE_DURATION.0, MOVE_DURATION.1));
    }

    fn update(&mut self, ctx: &mut EnemyCtx<'_>, dt: f32) -> Option<Transition<EnemyMachine>> {
        let body = &mut ctx.enemy.body;
        body.position += body.direction.unit() * body.speed * dt;
        if ctx.bounds.clamp_inside(body) {
            // Bumped a wall: turn around
            let reversed = body.direction.opposite();
            Self::face(ctx, reversed);
        }

        if !self.timer.tick(dt) {
            return None;
        }
        let next = if ctx.dice.chance(IDLE_CHANCE) {
            EnemyStateId::Idle
        } else {
            EnemyStateId::Walking
        };
        Some(Transition::new(next, ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::{FixedDice, SeededDice};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_kind_stats() {
        let skeleton = Enemy::new(EntityId(1), EnemyKind::Skeleton, Vec2::ZERO, None);
        assert_eq!(skeleton.health(), 2);
        assert_eq!(skeleton.body().damage, 1);
        assert!(!skeleton.is_player());
        let slime = Enemy::new(EntityId(2), EnemyKind::Slime, Vec2::ZERO, None);
        assert_eq!(slime.health(), 1);
    }

    #[test]
    fn test_first_update_starts_walking() {
        let bounds = RoomBounds::default();
        let mut enemy = Enemy::new(EntityId(1), EnemyKind::Skeleton, Vec2::new(150.0, 100.0), None);
        assert_eq!(enemy.state(), None);
        let mut dice = SeededDice::new(7);
        enemy.update(&mut dice, &bounds, DT);
        assert_eq!(enemy.state(), Some(EnemyStateId::Walking));
    }

    #[test]
    fn test_wandering_stays_in_bounds() {
        let bounds = RoomBounds::default();
        let playable = bounds.playable();
        let mut dice = SeededDice::new(42);
        let mut enemies: Vec<Enemy> = (0..4)
            .map(|i| {
                Enemy::new(
                    EntityId(i + 1),
                    EnemyKind::ALL[i as usize % 2],
                    Vec2::new(LEFT_EDGE + 1.0, TOP_EDGE + 1.0),
                    None,
                )
            })
            .collect();
        for _ in 0..1200 {
            for enemy in &mut enemies {
                enemy.update(&mut dice, &bounds, DT);
                assert!(playable.contains(&enemy.hitbox()), "{:?} escaped", enemy.position());
            }
        }
    }

    #[test]
    fn test_heart_drop_is_centered_and_forced() {
        let mut enemy = Enemy::new(EntityId(1), EnemyKind::Slime, Vec2::new(100.0, 80.0), Some(RoomId(0)));
        let drop = enemy.on_death(&mut FixedDice::always(), HEART_DROP_CHANCE);
        let expected = Vec2::new(100.0, 80.0) + Vec2::splat(ENEMY_WIDTH / 2.0 - HEART_SIZE / 2.0);
        assert_eq!(drop, Some(DeathDrop::Heart(expected)));

        assert_eq!(enemy.on_death(&mut FixedDice::never(), HEART_DROP_CHANCE), None);
    }

    #[test]
    fn test_no_drop_without_room() {
        let mut enemy = Enemy::new(EntityId(1), EnemyKind::Slime, Vec2::new(100.0, 80.0), None);
        assert_eq!(enemy.on_death(&mut FixedDice::always(), 1.0), None);
    }
}
