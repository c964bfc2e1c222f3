//! The player character
//!
//! The player is owned by whichever room is active and is handed to the next
//! room on a transition. Its behavior is a six-state machine; the states live
//! in [`states`] and operate on a [`PlayerCtx`] borrowed from the room for the
//! duration of one update.

mod states;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::Animation;
use super::entity::{Entity, EntityBody, PLAYER_ID};
use super::fsm::{Machine, StateMachine};
use super::geometry::{Direction, Hitbox, HitboxOffsets};
use super::input::FrameInput;
use super::object::{GameObject, ObjectId, ObjectIds};
use super::room::RoomBounds;
use super::timer::Countdown;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::render::{DrawCommand, Sprite, SpriteSheet};

/// Alpha used on the "off" beat of the invulnerability flicker
const FLASH_ALPHA: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStateId {
    Idle,
    Walking,
    SwordSwinging,
    PotLifting,
    PotCarrying,
    PotThrowing,
}

/// Entry parameters shared by every player state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerParams {
    /// The pot being lifted, carried or thrown
    pub pot: Option<ObjectId>,
}

pub struct PlayerMachine;

impl Machine for PlayerMachine {
    type Id = PlayerStateId;
    type Params = PlayerParams;
    type Ctx<'a> = PlayerCtx<'a>;
}

/// Room state the player may read or change during its update
pub struct PlayerWorld<'a> {
    pub objects: &'a mut Vec<GameObject>,
    pub object_ids: &'a mut ObjectIds,
    pub input: &'a FrameInput,
    pub bounds: &'a RoomBounds,
    pub sounds: &'a mut Vec<SoundEffect>,
}

pub struct PlayerCtx<'a> {
    pub player: &'a mut PlayerData,
    pub world: PlayerWorld<'a>,
}

/// Everything about the player except its state machine
#[derive(Debug, Clone)]
pub struct PlayerData {
    pub body: EntityBody,
    /// Present only while a swing is past its halfway point
    pub sword_hitbox: Option<Hitbox>,
    invulnerability: Option<Countdown>,
    flash_timer: f32,
    is_visible: bool,
    pub invulnerable_duration: f32,
    pub carried_pot: Option<ObjectId>,
    pub sheet: SpriteSheet,
    pub animation: Animation,
}

impl PlayerData {
    fn new(position: Vec2) -> Self {
        let mut body = EntityBody::new(
            PLAYER_ID,
            position,
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            PLAYER_MAX_HEALTH,
        );
        // Only the lower half of the sprite collides
        body.hitbox_offsets = HitboxOffsets::new(0.0, PLAYER_HEIGHT / 2.0, 0.0, -PLAYER_HEIGHT / 2.0);
        body.speed = PLAYER_SPEED;
        body.damage = PLAYER_SWORD_DAMAGE;

        Self {
            body,
            sword_hitbox: None,
            invulnerability: None,
            flash_timer: 0.0,
            is_visible: true,
            invulnerable_duration: INVULNERABLE_DURATION,
            carried_pot: None,
            sheet: SpriteSheet::PlayerWalk,
            animation: Animation::still(0),
        }
    }

    /// Move one frame in `direction`, staying inside the room
    fn step(&mut self, direction: Direction, dt: f32, bounds: &RoomBounds) {
        self.body.direction = direction;
        self.body.position += direction.unit() * self.body.speed * dt;
        bounds.clamp_walker(&mut self.body);
    }

    fn begin_swing(&mut self) {
        self.sword_hitbox = None;
    }

    fn tick_invulnerability(&mut self, dt: f32) {
        let Some(countdown) = &mut self.invulnerability else {
            return;
        };
        if countdown.tick(dt) {
            self.invulnerability = None;
            self.flash_timer = 0.0;
            self.is_visible = true;
            return;
        }
        self.flash_timer += dt;
        while self.flash_timer >= INVULNERABLE_FLASH_INTERVAL {
            self.flash_timer -= INVULNERABLE_FLASH_INTERVAL;
            self.is_visible = !self.is_visible;
        }
    }
}

pub struct Player {
    data: PlayerData,
    machine: StateMachine<PlayerMachine>,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        let mut player = Self {
            data: PlayerData::new(position),
            machine: states::machine(),
        };
        player.reset_state(&mut Vec::new(), &mut ObjectIds::default());
        player
    }

    pub fn data(&self) -> &PlayerData {
        &self.data
    }

    pub fn state(&self) -> Option<PlayerStateId> {
        self.machine.current()
    }

    pub fn is_in(&self, state: PlayerStateId) -> bool {
        self.machine.is_in(state)
    }

    pub fn update(&mut self, world: PlayerWorld<'_>, dt: f32) {
        let mut ctx = PlayerCtx {
            player: &mut self.data,
            world,
        };
        self.machine.update(&mut ctx, dt);
        self.data.animation.update(dt);
        self.data.tick_invulnerability(dt);
    }

    /// Drop whatever timed action is pending and return to Idle.
    /// Used when the player leaves a room mid-action.
    pub fn cancel_pending(&mut self, objects: &mut Vec<GameObject>, object_ids: &mut ObjectIds) {
        if !self.is_in(PlayerStateId::Idle) {
            log::debug!("cancelling player state {:?}", self.state());
        }
        self.reset_state(objects, object_ids);
    }

    fn reset_state(&mut self, objects: &mut Vec<GameObject>, object_ids: &mut ObjectIds) {
        let input = FrameInput::default();
        let bounds = RoomBounds::default();
        let mut sounds = Vec::new();
        let mut ctx = PlayerCtx {
            player: &mut self.data,
            world: PlayerWorld {
                objects,
                object_ids,
                input: &input,
                bounds: &bounds,
                sounds: &mut sounds,
            },
        };
        self.machine.change(&mut ctx, PlayerStateId::Idle, PlayerParams::default());
    }

    /// Put the player at `position` facing `direction`, as on entering a room
    pub fn place(&mut self, position: Vec2, direction: Direction) {
        self.data.body.position = position;
        self.data.body.direction = direction;
    }

    pub fn sword_hitbox(&self) -> Option<Hitbox> {
        self.data.sword_hitbox
    }

    pub fn is_carrying_pot(&self) -> bool {
        self.data.carried_pot.is_some()
    }

    pub fn carried_pot(&self) -> Option<ObjectId> {
        self.data.carried_pot
    }

    pub fn is_invulnerable(&self) -> bool {
        self.data.invulnerability.is_some()
    }

    pub fn become_invulnerable(&mut self) {
        self.data.invulnerability = Some(Countdown::new(self.data.invulnerable_duration));
        self.data.flash_timer = 0.0;
        self.data.is_visible = true;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.data.body.speed = speed;
    }

    pub fn set_invulnerable_duration(&mut self, duration: f32) {
        self.data.invulnerable_duration = duration;
    }

    pub fn sprite(&self) -> Sprite {
        Sprite::new(self.data.sheet, self.data.animation.current_frame())
    }

    pub fn draw(&self, offset: Vec2) -> DrawCommand {
        let alpha = if self.data.is_visible { 1.0 } else { FLASH_ALPHA };
        DrawCommand::new(self.sprite(), self.data.body.position + offset).with_alpha(alpha)
    }
}

impl Entity for Player {
    fn body(&self) -> &EntityBody {
        &self.data.body
    }

    fn body_mut(&mut self) -> &mut EntityBody {
        &mut self.data.body
    }

    fn is_player(&self) -> bool {
        true
    }

    fn receive_damage(&mut self, damage: i32, sounds: &mut Vec<SoundEffect>) {
        self.data.body.health -= damage;
        sounds.push(SoundEffect::HitPlayer);
        log::debug!("player took {damage} damage, {} left", self.data.body.health);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::Key;
    use crate::sim::object::ObjectKind;
    use crate::sim::pot::CarryPhase;

    const DT: f32 = 1.0 / 60.0;

    #[derive(Default)]
    struct Harness {
        objects: Vec<GameObject>,
        object_ids: ObjectIds,
        bounds: RoomBounds,
        sounds: Vec<SoundEffect>,
    }

    impl Harness {
        fn frame(&mut self, player: &mut Player, input: FrameInput) {
            player.update(
                PlayerWorld {
                    objects: &mut self.objects,
                    object_ids: &mut self.object_ids,
                    input: &input,
                    bounds: &self.bounds,
                    sounds: &mut self.sounds,
                },
                DT,
            );
        }

        /// Run idle frames until the player leaves `state`, with an upper bound
        fn wait_out(&mut self, player: &mut Player, state: PlayerStateId) -> usize {
            let mut frames = 0;
            while player.is_in(state) {
                self.frame(player, FrameInput::default());
                frames += 1;
                assert!(frames < 120, "stuck in {state:?}");
            }
            frames
        }
    }

    /// Player at (100, 100) facing down with a pot centered just below
    fn player_facing_pot(harness: &mut Harness) -> (Player, ObjectId) {
        let player = Player::new(Vec2::new(100.0, 100.0));
        let center = player.body().center();
        let id = harness.object_ids.allocate();
        harness.objects.push(GameObject::pot(
            id,
            Vec2::new(center.x - POT_WIDTH / 2.0, center.y + 15.0 - POT_HEIGHT / 2.0),
        ));
        (player, id)
    }

    #[test]
    fn test_new_player_is_idle() {
        let player = Player::new(Vec2::new(50.0, 50.0));
        assert_eq!(player.state(), Some(PlayerStateId::Idle));
        assert!(player.is_player());
        assert_eq!(player.health(), PLAYER_MAX_HEALTH);
        assert_eq!(player.sword_hitbox(), None);
    }

    #[test]
    fn test_walk_and_stop() {
        let mut harness = Harness::default();
        let mut player = Player::new(Vec2::new(100.0, 100.0));

        harness.frame(&mut player, FrameInput::moving(Direction::Right));
        assert!(player.is_in(PlayerStateId::Walking));
        assert_eq!(player.body().direction, Direction::Right);

        let start = player.position();
        harness.frame(&mut player, FrameInput::moving(Direction::Right));
        assert!(player.position().x > start.x);

        harness.frame(&mut player, FrameInput::default());
        assert!(player.is_in(PlayerStateId::Idle));
    }

    #[test]
    fn test_walking_is_clamped_to_room() {
        let mut harness = Harness::default();
        let mut player = Player::new(Vec2::new(LEFT_EDGE + 2.0, 100.0));
        for _ in 0..60 {
            harness.frame(&mut player, FrameInput::moving(Direction::Left));
        }
        assert_eq!(player.position().x, LEFT_EDGE);

        for _ in 0..200 {
            harness.frame(&mut player, FrameInput::moving(Direction::Up));
        }
        assert_eq!(player.position().y, TOP_EDGE - PLAYER_HEIGHT);
    }

    #[test]
    fn test_sword_swing_lifecycle() {
        let mut harness = Harness::default();
        let mut player = Player::new(Vec2::new(100.0, 100.0));

        harness.frame(&mut player, FrameInput::default().press(Key::Attack));
        assert!(player.is_in(PlayerStateId::SwordSwinging));
        assert_eq!(harness.sounds, vec![SoundEffect::Sword]);

        let mut saw_hitbox = false;
        while player.is_in(PlayerStateId::SwordSwinging) {
            saw_hitbox |= player.sword_hitbox().is_some();
            harness.frame(&mut player, FrameInput::default());
        }
        assert!(saw_hitbox);
        assert!(player.is_in(PlayerStateId::Idle));
        assert_eq!(player.sword_hitbox(), None);
    }

    #[test]
    fn test_interact_with_nothing_in_reach_stays_idle() {
        let mut harness = Harness::default();
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        harness.frame(&mut player, FrameInput::default().press(Key::Interact));
        assert!(player.is_in(PlayerStateId::Idle));
        assert!(!player.is_carrying_pot());
    }

    #[test]
    fn test_lift_carry_throw_chain() {
        let mut harness = Harness::default();
        let (mut player, pot) = player_facing_pot(&mut harness);

        harness.frame(&mut player, FrameInput::default().press(Key::Interact));
        assert!(player.is_in(PlayerStateId::PotLifting));
        assert_eq!(player.carried_pot(), Some(pot));
        let lifted = &harness.objects[0];
        assert!(!lifted.is_solid);
        assert!(matches!(lifted.as_pot().map(|p| p.phase), Some(CarryPhase::Lifting(_))));

        // Throw pressed mid-lift is ignored
        harness.frame(&mut player, FrameInput::default().press(Key::Interact));
        assert!(player.is_in(PlayerStateId::PotLifting));
        assert_eq!(harness.objects.len(), 1);

        let frames = harness.wait_out(&mut player, PlayerStateId::PotLifting);
        assert!(frames as f32 * DT >= LIFT_DURATION - 2.0 * DT);
        assert!(player.is_in(PlayerStateId::PotCarrying));
        assert!(player.is_carrying_pot());

        // Attack does nothing while carrying
        harness.frame(&mut player, FrameInput::default().press(Key::Attack));
        assert!(player.is_in(PlayerStateId::PotCarrying));

        harness.frame(&mut player, FrameInput::default().press(Key::Interact));
        assert!(player.is_in(PlayerStateId::PotThrowing));
        assert!(!player.is_carrying_pot());
        assert!(harness.objects[0].clean_up);
        let thrown = &harness.objects[1];
        assert!(matches!(thrown.kind, ObjectKind::ThrownPot(_)));
        assert_eq!(thrown.as_thrown_pot().map(|t| t.direction), Some(Direction::Down));

        harness.wait_out(&mut player, PlayerStateId::PotThrowing);
        assert!(player.is_in(PlayerStateId::Idle));
    }

    #[test]
    fn test_carrying_toggles_walk_animation_without_leaving_state() {
        let mut harness = Harness::default();
        let (mut player, _) = player_facing_pot(&mut harness);
        harness.frame(&mut player, FrameInput::default().press(Key::Interact));
        harness.wait_out(&mut player, PlayerStateId::PotLifting);

        let start = player.position();
        for _ in 0..10 {
            harness.frame(&mut player, FrameInput::moving(Direction::Right));
        }
        assert!(player.is_in(PlayerStateId::PotCarrying));
        assert!(player.position().x > start.x);
        assert_eq!(player.data().sheet, SpriteSheet::PlayerCarry);

        harness.frame(&mut player, FrameInput::default());
        assert!(player.is_in(PlayerStateId::PotCarrying));
    }

    #[test]
    fn test_cancel_pending_returns_to_idle() {
        let mut harness = Harness::default();
        let (mut player, _) = player_facing_pot(&mut harness);
        harness.frame(&mut player, FrameInput::default().press(Key::Interact));
        assert!(player.is_in(PlayerStateId::PotLifting));

        player.cancel_pending(&mut harness.objects, &mut harness.object_ids);
        assert!(player.is_in(PlayerStateId::Idle));
        assert!(!player.is_carrying_pot());

        // Lift timer does not fire later
        for _ in 0..60 {
            harness.frame(&mut player, FrameInput::default());
        }
        assert!(player.is_in(PlayerStateId::Idle));
    }

    #[test]
    fn test_invulnerability_expires_and_flickers() {
        let mut harness = Harness::default();
        let mut player = Player::new(Vec2::new(100.0, 100.0));
        player.become_invulnerable();
        assert!(player.is_invulnerable());

        let mut dimmed = false;
        let mut frames = 0;
        while player.is_invulnerable() {
            harness.frame(&mut player, FrameInput::default());
            dimmed |= player.draw(Vec2::ZERO).alpha < 1.0;
            frames += 1;
            assert!(frames < 200);
        }
        assert!(dimmed);
        assert_eq!(player.draw(Vec2::ZERO).alpha, 1.0);
    }

    #[test]
    fn test_player_damage_plays_hit_player() {
        let mut player = Player::new(Vec2::ZERO);
        let mut sounds = Vec::new();
        player.receive_damage(2, &mut sounds);
        assert_eq!(player.health(), PLAYER_MAX_HEALTH - 2);
        assert_eq!(sounds, vec![SoundEffect::HitPlayer]);
    }
}
