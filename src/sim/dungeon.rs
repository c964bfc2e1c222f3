//! Room-to-room play
//!
//! A [`Dungeon`] keeps one live [`Room`] and swaps fresh contents into it when
//! the player walks through an open doorway. The swap is preceded by a camera
//! shift during which the player is frozen and the room's enemies keep moving.

use glam::Vec2;

use super::entity::{Entity, RoomId};
use super::geometry::Direction;
use super::input::FrameInput;
use super::object::doorway_hitbox;
use super::player::Player;
use super::population::RoomContents;
use super::random::SeededDice;
use super::room::{Room, RoomBounds};
use super::timer::Tween;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::render::DrawCommand;
use crate::settings::Settings;

/// Space left between an entering player and the doorway behind them
const ENTRY_GAP: f32 = 4.0;

struct Shift {
    direction: Direction,
    camera: Tween,
    next: RoomContents,
}

pub struct Dungeon {
    settings: Settings,
    room: Room,
    /// Drives room generation; the room holds a second stream for play
    dice: SeededDice,
    next_room_id: u32,
    shift: Option<Shift>,
    rooms_entered: u32,
}

impl Dungeon {
    pub fn new(settings: Settings) -> Self {
        let mut dice = SeededDice::new(settings.seed);
        let contents = RoomContents::generate(RoomId(0), &settings, &mut dice);

        let start = RoomBounds::default().center() - Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT) / 2.0;
        let mut player = Player::new(start);
        player.set_speed(settings.player_speed);
        player.set_invulnerable_duration(settings.invulnerable_duration);

        let play_dice = SeededDice::new(settings.seed.wrapping_add(1));
        let room = Room::new(player, contents, Box::new(play_dice))
            .with_heart_drop_chance(settings.heart_drop_chance);
        log::info!("dungeon started with seed {}", settings.seed);

        Self {
            settings,
            room,
            dice,
            next_room_id: 1,
            shift: None,
            rooms_entered: 0,
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn room_mut(&mut self) -> &mut Room {
        &mut self.room
    }

    pub fn player(&self) -> &Player {
        self.room.player()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_shifting(&self) -> bool {
        self.shift.is_some()
    }

    pub fn is_game_over(&self) -> bool {
        self.room.player().is_dead()
    }

    /// Rooms entered through a doorway so far
    pub fn rooms_entered(&self) -> u32 {
        self.rooms_entered
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        self.room.drain_sounds()
    }

    pub fn update(&mut self, dt: f32, input: &FrameInput) {
        if self.is_game_over() {
            return;
        }
        self.room.update(dt, input);

        match &mut self.shift {
            Some(shift) => {
                let offset = shift.camera.update(dt);
                self.room.set_adjacent_offset(offset);
                if shift.camera.is_done() {
                    self.finish_shift();
                }
            }
            None => {
                if let Some(direction) = self.room.take_exit_request() {
                    self.begin_shift(direction);
                }
            }
        }
    }

    fn begin_shift(&mut self, direction: Direction) {
        let id = RoomId(self.next_room_id);
        self.next_room_id += 1;
        let next = RoomContents::generate(id, &self.settings, &mut self.dice);

        self.shift = Some(Shift {
            direction,
            camera: Tween::new(Vec2::ZERO, -screen_step(direction), self.settings.shift_duration),
            next,
        });
        self.room.set_shifting(true);
        log::info!("shifting {direction:?} into room {id:?}");
    }

    fn finish_shift(&mut self) {
        let Some(shift) = self.shift.take() else {
            return;
        };
        let id = shift.next.id;
        let old = self.room.enter_contents(shift.next);
        log::debug!("discarded room {:?} with {} objects", old.id, old.objects.len());

        self.room.player_mut().place(entry_position(shift.direction), shift.direction);
        self.room.set_shifting(false);
        self.room.close_doors();
        self.rooms_entered += 1;
        log::info!("arrived in room {id:?}");
    }

    /// Current room, plus the incoming room's floor while shifting
    pub fn render(&self) -> Vec<DrawCommand> {
        let mut commands = self.room.render(Vec2::ZERO);
        if let Some(shift) = &self.shift {
            let offset = shift.camera.value() + screen_step(shift.direction);
            commands.extend(shift.next.tiles.draw(offset).map(DrawCommand::snapped));
        }
        commands
    }
}

/// One screen in `direction`
fn screen_step(direction: Direction) -> Vec2 {
    direction.unit() * Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT)
}

/// Where a player leaving through the `exit` doorway appears in the next
/// room: just clear of the doorway on the opposite wall
pub fn entry_position(exit: Direction) -> Vec2 {
    let door = doorway_hitbox(exit.opposite());
    let center = door.center();
    match exit {
        Direction::Left => Vec2::new(
            door.left() - PLAYER_WIDTH - ENTRY_GAP,
            center.y - PLAYER_HEIGHT * 0.75,
        ),
        Direction::Right => Vec2::new(door.right() + ENTRY_GAP, center.y - PLAYER_HEIGHT * 0.75),
        Direction::Up => Vec2::new(center.x - PLAYER_WIDTH / 2.0, door.top() - PLAYER_HEIGHT - ENTRY_GAP),
        Direction::Down => Vec2::new(
            center.x - PLAYER_WIDTH / 2.0,
            door.bottom() + ENTRY_GAP - PLAYER_HEIGHT / 2.0,
        ),
    }
}
