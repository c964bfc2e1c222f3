//! Pot lift/carry chain and the thrown-pot projectile
//!
//! A pot at rest is solid. From the moment it is lifted its position is
//! recomputed from the carrier every frame; the lift tween only moves where the
//! pot is drawn until it reaches the carry point. Throwing destroys the pot and
//! spawns a [`ThrownPot`], which flies until it leaves the room, hits an enemy,
//! or reaches its maximum distance, then shatters.

use glam::Vec2;

use super::animation::Animation;
use super::entity::{Entity, EntityBody, EntityId};
use super::geometry::Direction;
use super::object::{GameObject, ObjectCtx, ObjectKind};
use super::timer::Tween;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Pot frame in the pots sheet
pub const POT_FRAME: usize = 8;
const SHATTER_FRAMES: [usize; 4] = [8, 9, 10, 11];
const SHATTER_INTERVAL: f32 = 0.1;
/// Carried pots draw above their carrier
const CARRIED_RENDER_PRIORITY: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CarryPhase {
    #[default]
    AtRest,
    /// Drawn along the tween from the floor to the carry point
    Lifting(Tween),
    /// Position slaved to the carrier
    Carried,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pot {
    pub phase: CarryPhase,
    pub carrier: Option<EntityId>,
}

impl Pot {
    pub fn is_being_carried(&self) -> bool {
        self.carrier.is_some()
    }

    /// Where the pot is drawn; differs from its position only mid-lift
    pub fn draw_position(&self, position: Vec2) -> Vec2 {
        match &self.phase {
            CarryPhase::Lifting(tween) => tween.value(),
            _ => position,
        }
    }
}

/// Where a carried pot sits relative to its carrier: centered over the head
pub fn carry_position(carrier: &EntityBody) -> Vec2 {
    Vec2::new(
        carrier.position.x + carrier.dimensions.x / 2.0 - POT_WIDTH / 2.0,
        carrier.position.y - POT_HEIGHT + POT_CARRY_OVERLAP,
    )
}

#[derive(Debug, Clone)]
pub struct ThrownPot {
    pub direction: Direction,
    pub distance_traveled: f32,
    pub is_broken: bool,
    break_animation: Animation,
}

impl ThrownPot {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            distance_traveled: 0.0,
            is_broken: false,
            break_animation: Animation::once(SHATTER_FRAMES.to_vec(), SHATTER_INTERVAL),
        }
    }

    pub fn frame(&self) -> usize {
        if self.is_broken {
            self.break_animation.current_frame()
        } else {
            POT_FRAME
        }
    }
}

impl GameObject {
    /// Start lifting this pot. Only a liftable pot at rest can be lifted.
    pub fn begin_lift(&mut self, carrier: &EntityBody) -> bool {
        let ObjectKind::Pot(pot) = &mut self.kind else {
            return false;
        };
        if !self.is_liftable || pot.phase != CarryPhase::AtRest {
            return false;
        }

        let carried_at = carry_position(carrier);
        pot.carrier = Some(carrier.id);
        pot.phase = CarryPhase::Lifting(Tween::new(self.position, carried_at, LIFT_DURATION));
        self.position = carried_at;
        self.is_solid = false;
        self.render_priority = CARRIED_RENDER_PRIORITY;
        log::debug!("pot {:?} lifted by {:?}", self.id, carrier.id);
        true
    }

    /// Detach a lifted or carried pot and flag it for removal.
    /// Returns where the replacement projectile should start.
    pub fn release_for_throw(&mut self) -> Option<Vec2> {
        let ObjectKind::Pot(pot) = &mut self.kind else {
            return None;
        };
        if !pot.is_being_carried() {
            return None;
        }
        pot.carrier = None;
        self.clean_up = true;
        Some(self.position)
    }

    pub(super) fn update_pot(&mut self, ctx: &mut ObjectCtx<'_>, dt: f32) {
        let ObjectKind::Pot(pot) = &mut self.kind else {
            return;
        };
        if let CarryPhase::Lifting(tween) = &mut pot.phase {
            tween.update(dt);
            if tween.is_done() {
                pot.phase = CarryPhase::Carried;
            }
        }
        if !pot.is_being_carried() {
            return;
        }

        match pot.carrier.and_then(|id| ctx.entity_body(id)) {
            Some(body) => {
                self.position = carry_position(body);
                self.render_priority = CARRIED_RENDER_PRIORITY;
            }
            None => {
                // Carrier left the room; the pot goes with the old room
                log::debug!("pot {:?} lost its carrier", self.id);
                pot.carrier = None;
                self.clean_up = true;
            }
        }
    }

    /// Shatter a thrown pot. Breaking an already broken pot does nothing.
    pub fn shatter(&mut self, sounds: &mut Vec<SoundEffect>) {
        let ObjectKind::ThrownPot(thrown) = &mut self.kind else {
            return;
        };
        if thrown.is_broken {
            return;
        }
        thrown.is_broken = true;
        thrown.break_animation.refresh();
        self.is_collidable = false;
        self.is_solid = false;
        sounds.push(SoundEffect::Shatter);
        log::debug!(
            "thrown pot {:?} shattered after {:.1}px",
            self.id,
            thrown.distance_traveled
        );
    }

    pub(super) fn update_thrown_pot(&mut self, ctx: &mut ObjectCtx<'_>, dt: f32) {
        let ObjectKind::ThrownPot(thrown) = &mut self.kind else {
            return;
        };

        if thrown.is_broken {
            thrown.break_animation.update(dt);
            if thrown.break_animation.is_done() {
                self.clean_up = true;
            }
            return;
        }

        let remaining = THROWN_POT_MAX_DISTANCE - thrown.distance_traveled;
        let step = THROWN_POT_SPEED * dt;
        if step >= remaining {
            self.position += thrown.direction.unit() * remaining;
            thrown.distance_traveled = THROWN_POT_MAX_DISTANCE;
        } else {
            self.position += thrown.direction.unit() * step;
            thrown.distance_traveled += step;
        }
        let reached_max = thrown.distance_traveled >= THROWN_POT_MAX_DISTANCE;

        self.check_thrown_pot_hits(ctx);

        if reached_max {
            self.shatter(ctx.sounds);
        }
    }

    fn check_thrown_pot_hits(&mut self, ctx: &mut ObjectCtx<'_>) {
        let hitbox = self.hitbox();

        if !ctx.bounds.playable().contains(&hitbox) {
            self.shatter(ctx.sounds);
            return;
        }

        let mut hit_any = false;
        for enemy in ctx.enemies.iter_mut() {
            if !enemy.is_dead() && hitbox.intersects(&enemy.hitbox()) {
                log::debug!("thrown pot {:?} hit enemy {:?}", self.id, enemy.id());
                enemy.receive_damage(THROWN_POT_DAMAGE, ctx.sounds);
                hit_any = true;
            }
        }
        if hit_any {
            self.shatter(ctx.sounds);
        }
    }
}
