//! Collision helpers used by the room's combat pass and the player's states

use glam::Vec2;

use super::entity::EntityBody;
use super::geometry::{Direction, Hitbox};
use super::object::{GameObject, ObjectId};
use crate::consts::*;

/// Area the sword covers in front of `body` while a swing is active
pub fn sword_hitbox(body: &EntityBody) -> Hitbox {
    let hitbox = body.hitbox();
    match body.direction {
        Direction::Up => Hitbox::new(hitbox.left(), hitbox.top() - SWORD_REACH, hitbox.dimensions.x, SWORD_REACH),
        Direction::Down => Hitbox::new(hitbox.left(), hitbox.bottom(), hitbox.dimensions.x, SWORD_REACH),
        Direction::Left => Hitbox::new(hitbox.left() - SWORD_REACH, hitbox.top(), SWORD_REACH, hitbox.dimensions.y),
        Direction::Right => Hitbox::new(hitbox.right(), hitbox.top(), SWORD_REACH, hitbox.dimensions.y),
    }
}

/// True when an object centered at `target` is close enough in front of an
/// entity centered at `origin` facing `direction` to be lifted
pub fn is_in_lift_range(origin: Vec2, target: Vec2, direction: Direction) -> bool {
    let delta = target - origin;
    let (ahead, across) = match direction {
        Direction::Up => (-delta.y, delta.x),
        Direction::Down => (delta.y, delta.x),
        Direction::Left => (-delta.x, delta.y),
        Direction::Right => (delta.x, delta.y),
    };
    ahead > 0.0 && ahead < LIFT_REACH && across.abs() < LIFT_ALIGNMENT
}

/// First liftable, uncarried pot in list order that `body` is facing
pub fn find_liftable_pot(body: &EntityBody, objects: &[GameObject]) -> Option<ObjectId> {
    let origin = body.center();
    objects
        .iter()
        .filter(|object| object.is_liftable && !object.clean_up)
        .filter(|object| object.as_pot().is_some_and(|pot| !pot.is_being_carried()))
        .find(|object| {
            let target = object.position + object.dimensions / 2.0;
            is_in_lift_range(origin, target, body.direction)
        })
        .map(|object| object.id)
}
