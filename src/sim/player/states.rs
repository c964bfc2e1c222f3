use super::{PlayerCtx, PlayerMachine, PlayerParams, PlayerStateId};
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::error::FsmError;
use crate::render::SpriteSheet;
use crate::sim::animation::Animation;
use crate::sim::collision::{find_liftable_pot, sword_hitbox};
use crate::sim::fsm::{State, StateMachine, Transition};
use crate::sim::geometry::Direction;
use crate::sim::object::{GameObject, ObjectId};
use crate::sim::timer::Countdown;

const WALK_INTERVAL: f32 = 0.2;
const SWING_INTERVAL: f32 = 0.05;
const THROW_INTERVAL: f32 = 0.05;

pub(super) fn machine() -> StateMachine<PlayerMachine> {
    let mut machine = StateMachine::new();
    let registered = register(&mut machine);
    debug_assert!(registered.is_ok(), "player states misregistered: {registered:?}");
    machine
}

fn register(machine: &mut StateMachine<PlayerMachine>) -> Result<(), FsmError> {
    machine.add(PlayerStateId::Idle, IdleState)?;
    machine.add(PlayerStateId::Walking, WalkingState)?;
    machine.add(PlayerStateId::SwordSwinging, SwordSwingingState)?;
    machine.add(PlayerStateId::PotLifting, PotLiftingState::default())?;
    machine.add(PlayerStateId::PotCarrying, PotCarryingState::default())?;
    machine.add(PlayerStateId::PotThrowing, PotThrowingState::default())?;
    Ok(())
}

/// Four frames per facing, in the order every player sheet uses
fn facing_frames(direction: Direction) -> [usize; 4] {
    let first = match direction {
        Direction::Down => 0,
        Direction::Right => 4,
        Direction::Up => 8,
        Direction::Left => 12,
    };
    [first, first + 1, first + 2, first + 3]
}

fn idle_animation(direction: Direction) -> Animation {
    Animation::still(facing_frames(direction)[0])
}

fn walk_animation(direction: Direction) -> Animation {
    Animation::looping(facing_frames(direction).to_vec(), WALK_INTERVAL)
}

/// Lift takes priority over a swing when both are pressed
fn action_requested(ctx: &PlayerCtx<'_>) -> Option<Transition<PlayerMachine>> {
    let input = ctx.world.input;
    if input.interact && ctx.player.carried_pot.is_none() {
        if let Some(pot) = find_liftable_pot(&ctx.player.body, ctx.world.objects.as_slice()) {
            return Some(Transition::new(PlayerStateId::PotLifting, PlayerParams { pot: Some(pot) }));
        }
    }
    if input.attack {
        return Some(Transition::to(PlayerStateId::SwordSwinging));
    }
    None
}

fn find_object(objects: &mut [GameObject], pot: Option<ObjectId>) -> Option<&mut GameObject> {
    let id = pot?;
    objects.iter_mut().find(|object| object.id == id)
}

struct IdleState;

impl State<PlayerMachine> for IdleState {
    fn enter(&mut self, ctx: &mut PlayerCtx<'_>, _params: PlayerParams) {
        ctx.player.sheet = SpriteSheet::PlayerWalk;
        ctx.player.animation = idle_animation(ctx.player.body.direction);
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'_>, _dt: f32) -> Option<Transition<PlayerMachine>> {
        let movement = ctx.world.input.movement();
        if let Some(direction) = movement {
            ctx.player.body.direction = direction;
        }
        action_requested(ctx).or_else(|| movement.map(|_| Transition::to(PlayerStateId::Walking)))
    }
}

struct WalkingState;

impl State<PlayerMachine> for WalkingState {
    fn enter(&mut self, ctx: &mut PlayerCtx<'_>, _params: PlayerParams) {
        ctx.player.sheet = SpriteSheet::PlayerWalk;
        ctx.player.animation = walk_animation(ctx.player.body.direction);
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'_>, dt: f32) -> Option<Transition<PlayerMachine>> {
        let Some(direction) = ctx.world.input.movement() else {
            return Some(Transition::to(PlayerStateId::Idle));
        };
        if direction != ctx.player.body.direction {
            ctx.player.animation = walk_animation(direction);
        }
        ctx.player.step(direction, dt, ctx.world.bounds);
        action_requested(ctx)
    }
}

struct SwordSwingingState;

impl State<PlayerMachine> for SwordSwingingState {
    fn enter(&mut self, ctx: &mut PlayerCtx<'_>, _params: PlayerParams) {
        ctx.player.sheet = SpriteSheet::PlayerSword;
        ctx.player.animation = Animation::once(facing_frames(ctx.player.body.direction).to_vec(), SWING_INTERVAL);
        ctx.player.begin_swing();
        ctx.world.sounds.push(SoundEffect::Sword);
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'_>, _dt: f32) -> Option<Transition<PlayerMachine>> {
        if ctx.player.animation.is_done() {
            return Some(Transition::to(PlayerStateId::Idle));
        }
        if ctx.player.animation.is_halfway_done() {
            ctx.player.sword_hitbox = Some(sword_hitbox(&ctx.player.body));
        }
        None
    }

    fn exit(&mut self, ctx: &mut PlayerCtx<'_>) {
        ctx.player.sword_hitbox = None;
    }
}

/// Timed, input-free; the pot's tween runs alongside
#[derive(Default)]
struct PotLiftingState {
    pot: Option<ObjectId>,
    timer: Countdown,
}

impl State<PlayerMachine> for PotLiftingState {
    fn enter(&mut self, ctx: &mut PlayerCtx<'_>, params: PlayerParams) {
        ctx.player.sheet = SpriteSheet::PlayerLift;
        ctx.player.animation = idle_animation(ctx.player.body.direction);
        self.timer = Countdown::new(LIFT_DURATION);

        let body = &ctx.player.body;
        let lifted = find_object(ctx.world.objects, params.pot).is_some_and(|pot| pot.begin_lift(body));
        self.pot = if lifted { params.pot } else { None };
        ctx.player.carried_pot = self.pot;
    }

    fn update(&mut self, _ctx: &mut PlayerCtx<'_>, dt: f32) -> Option<Transition<PlayerMachine>> {
        if self.pot.is_none() {
            return Some(Transition::to(PlayerStateId::Idle));
        }
        if self.timer.tick(dt) {
            return Some(Transition::new(PlayerStateId::PotCarrying, PlayerParams { pot: self.pot }));
        }
        None
    }

    fn exit(&mut self, ctx: &mut PlayerCtx<'_>) {
        ctx.player.carried_pot = None;
    }
}

#[derive(Default)]
struct PotCarryingState {
    pot: Option<ObjectId>,
    is_walking: bool,
}

impl State<PlayerMachine> for PotCarryingState {
    fn enter(&mut self, ctx: &mut PlayerCtx<'_>, params: PlayerParams) {
        self.pot = params.pot;
        self.is_walking = false;
        ctx.player.sheet = SpriteSheet::PlayerCarry;
        ctx.player.animation = idle_animation(ctx.player.body.direction);
        ctx.player.carried_pot = self.pot;
    }

    fn update(&mut self, ctx: &mut PlayerCtx<'_>, dt: f32) -> Option<Transition<PlayerMachine>> {
        match ctx.world.input.movement() {
            Some(direction) => {
                if !self.is_walking || direction != ctx.player.body.direction {
                    ctx.player.animation = walk_animation(direction);
                }
                ctx.player.step(direction, dt, ctx.world.bounds);
                self.is_walking = true;
            }
            None => {
                if self.is_walking {
                    ctx.player.animation = idle_animation(ctx.player.body.direction);
                }
                self.is_walking = false;
            }
        }

        if ctx.world.input.interact {
            return Some(Transition::new(PlayerStateId::PotThrowing, PlayerParams { pot: self.pot }));
        }
        None
    }

    fn exit(&mut self, ctx: &mut PlayerCtx<'_>) {
        ctx.player.carried_pot = None;
    }
}

#[derive(Default)]
struct PotThrowingState {
    timer: Countdown,
}

impl State<PlayerMachine> for PotThrowingState {
    fn enter(&mut self, ctx: &mut PlayerCtx<'_>, params: PlayerParams) {
        let direction = ctx.player.body.direction;
        ctx.player.sheet = SpriteSheet::PlayerLift;
        let mut frames = facing_frames(direction);
        frames.reverse();
        ctx.player.animation = Animation::once(frames.to_vec(), THROW_INTERVAL);
        self.timer = Countdown::new(THROW_DURATION);

        let start = find_object(ctx.world.objects, params.pot).and_then(GameObject::release_for_throw);
        if let Some(position) = start {
            let id = ctx.world.object_ids.allocate();
            ctx.world.objects.push(GameObject::thrown_pot(id, position, direction));
            log::debug!("pot thrown {direction:?} as {id:?}");
        }
    }

    fn update(&mut self, _ctx: &mut PlayerCtx<'_>, dt: f32) -> Option<Transition<PlayerMachine>> {
        self.timer.tick(dt).then(|| Transition::to(PlayerStateId::Idle))
    }
}
