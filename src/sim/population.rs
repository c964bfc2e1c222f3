//! Procedural room contents

use glam::Vec2;

use super::enemy::{Enemy, EnemyKind};
use super::entity::{EntityId, RoomId};
use super::geometry::Direction;
use super::layout::TileGrid;
use super::object::{GameObject, ObjectId, ObjectIds};
use super::random::Dice;
use crate::consts::*;
use crate::settings::Settings;

/// Everything a room holds apart from the player
pub struct RoomContents {
    pub id: RoomId,
    pub tiles: TileGrid,
    pub enemies: Vec<Enemy>,
    pub objects: Vec<GameObject>,
    /// Doorway ids; the doorways themselves are also in `objects`
    pub doorways: Vec<ObjectId>,
    pub object_ids: ObjectIds,
}

impl RoomContents {
    /// Bare floor with no enemies or objects
    pub fn empty(id: RoomId) -> Self {
        Self {
            id,
            tiles: TileGrid::empty(),
            enemies: Vec::new(),
            objects: Vec::new(),
            doorways: Vec::new(),
            object_ids: ObjectIds::default(),
        }
    }

    /// Random room: one enemy kind, a switch, a few pots, and four closed doors
    pub fn generate(id: RoomId, settings: &Settings, dice: &mut dyn Dice) -> Self {
        let mut contents = Self::empty(id);
        contents.tiles = TileGrid::generate(dice);

        let kind = EnemyKind::ALL[dice.index(EnemyKind::ALL.len())];
        contents.enemies = (0..settings.enemy_count)
            .map(|i| {
                let position = random_position(dice, TILE_SIZE, 0.0);
                // Id 0 belongs to the player
                Enemy::new(EntityId(i as u32 + 1), kind, position, Some(id))
            })
            .collect();

        let switch = contents.object_ids.allocate();
        let position = random_position(dice, SWITCH_SIZE * 2.0, SWITCH_SIZE);
        contents.objects.push(GameObject::switch(switch, position));

        for position in place_pots(dice) {
            let pot = contents.object_ids.allocate();
            contents.objects.push(GameObject::pot(pot, position));
        }

        for direction in Direction::ALL {
            let doorway = contents.object_ids.allocate();
            contents.objects.push(GameObject::doorway(doorway, direction));
            contents.doorways.push(doorway);
        }

        log::info!(
            "generated room {:?}: {} {:?}, {} objects",
            id,
            contents.enemies.len(),
            kind,
            contents.objects.len()
        );
        contents
    }
}

/// Random whole-pixel position inside the room edges, `inset` from the
/// top/left and `reach` short of the bottom/right
fn random_position(dice: &mut dyn Dice, reach: f32, inset: f32) -> Vec2 {
    let x = dice.range_inclusive((LEFT_EDGE + inset) as u32, (RIGHT_EDGE - reach) as u32);
    let y = dice.range_inclusive((TOP_EDGE + inset) as u32, (BOTTOM_EDGE - reach) as u32);
    Vec2::new(x as f32, y as f32)
}

/// Between `MIN_POTS` and `MAX_POTS` pots, spaced apart. Gives up after
/// `POT_PLACEMENT_ATTEMPTS` tries, so a crowded roll yields fewer pots.
fn place_pots(dice: &mut dyn Dice) -> Vec<Vec2> {
    let wanted = dice.range_inclusive(MIN_POTS, MAX_POTS) as usize;
    let mut placed: Vec<Vec2> = Vec::with_capacity(wanted);
    let mut attempts = 0;
    while placed.len() < wanted && attempts < POT_PLACEMENT_ATTEMPTS {
        attempts += 1;
        let candidate = random_position(dice, POT_WIDTH * 2.0, POT_WIDTH);
        if placed.iter().all(|pot| pot.distance(candidate) >= POT_MIN_SPACING) {
            placed.push(candidate);
        }
    }
    placed
}
