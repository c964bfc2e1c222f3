//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Randomness only through a [`Dice`]
//! - Stable iteration order (entities in insertion order)
//! - No platform dependencies; rendering only produces draw commands

pub mod animation;
pub mod collision;
pub mod dungeon;
pub mod enemy;
pub mod entity;
pub mod fsm;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod object;
pub mod player;
pub mod population;
pub mod pot;
pub mod random;
pub mod room;
pub mod timer;

pub use dungeon::Dungeon;
pub use enemy::{Enemy, EnemyKind, EnemyStateId};
pub use entity::{DeathDrop, Entity, EntityBody, EntityId, RoomId};
pub use fsm::{Machine, State, StateMachine, Transition};
pub use geometry::{Direction, Hitbox, HitboxOffsets};
pub use input::{FrameInput, Key};
pub use layout::TileGrid;
pub use object::{GameObject, ObjectId, ObjectKind, RoomCommand};
pub use player::{Player, PlayerStateId};
pub use population::RoomContents;
pub use pot::{CarryPhase, Pot, ThrownPot};
pub use random::{Dice, FixedDice, SeededDice};
pub use room::{RenderEntry, RenderItem, Room, RoomBounds};
pub use timer::{Countdown, Tween};
