//! Room tile grid: walls with a two-tile gap per doorway, random floor

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::random::Dice;
use crate::consts::*;
use crate::render::{DrawCommand, Sprite, SpriteSheet};

pub const TILE_TOP_LEFT_CORNER: usize = 3;
pub const TILE_TOP_RIGHT_CORNER: usize = 4;
pub const TILE_BOTTOM_LEFT_CORNER: usize = 22;
pub const TILE_BOTTOM_RIGHT_CORNER: usize = 23;
pub const TILE_EMPTY: usize = 18;
const TILE_TOP_WALLS: [usize; 3] = [57, 58, 59];
const TILE_BOTTOM_WALLS: [usize; 3] = [78, 79, 80];
const TILE_LEFT_WALLS: [usize; 3] = [76, 95, 114];
const TILE_RIGHT_WALLS: [usize; 3] = [77, 96, 115];
const TILE_FLOORS: [usize; 32] = [
    6, 7, 8, 9, 10, 11, 12, 25, 26, 27, 28, 29, 30, 31, 44, 45, 46, 47, 48, 49, 50, 63, 64, 65, 66, 67, 68, 69, 87, 88,
    106, 107,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    /// Row-major sprite indices into the tile sheet
    tiles: Vec<usize>,
}

impl TileGrid {
    /// Grid of the standard room size filled with `TILE_EMPTY`
    pub fn empty() -> Self {
        Self {
            width: ROOM_WIDTH_TILES,
            height: ROOM_HEIGHT_TILES,
            tiles: vec![TILE_EMPTY; ROOM_WIDTH_TILES * ROOM_HEIGHT_TILES],
        }
    }

    pub fn generate(dice: &mut dyn Dice) -> Self {
        let mut grid = Self::empty();
        for y in 0..grid.height {
            for x in 0..grid.width {
                let tile = grid.pick_tile(x, y, dice);
                grid.tiles[y * grid.width + x] = tile;
            }
        }
        grid
    }

    fn pick_tile(&self, x: usize, y: usize, dice: &mut dyn Dice) -> usize {
        let last_x = self.width - 1;
        let last_y = self.height - 1;
        let mut pick = |choices: &[usize]| choices[dice.index(choices.len())];

        match (x, y) {
            (0, 0) => TILE_TOP_LEFT_CORNER,
            (0, y) if y == last_y => TILE_BOTTOM_LEFT_CORNER,
            (x, 0) if x == last_x => TILE_TOP_RIGHT_CORNER,
            (x, y) if x == last_x && y == last_y => TILE_BOTTOM_RIGHT_CORNER,
            _ if self.is_door_gap(x, y) => TILE_EMPTY,
            (0, _) => pick(&TILE_LEFT_WALLS),
            (x, _) if x == last_x => pick(&TILE_RIGHT_WALLS),
            (_, 0) => pick(&TILE_TOP_WALLS),
            (_, y) if y == last_y => pick(&TILE_BOTTOM_WALLS),
            _ => pick(&TILE_FLOORS),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y * self.width + x).copied()
    }

    /// True for the wall cells left open for a doorway
    pub fn is_door_gap(&self, x: usize, y: usize) -> bool {
        let side = x == 0 || x == self.width - 1;
        let cap = y == 0 || y == self.height - 1;
        let mid_y = self.height / 2;
        let mid_x = self.width / 2;
        (side && (y == mid_y || y == mid_y + 1)) || (cap && (x == mid_x || x + 1 == mid_x))
    }

    /// One draw command per tile, shifted by `offset`
    pub fn draw(&self, offset: Vec2) -> impl Iterator<Item = DrawCommand> + '_ {
        self.tiles.iter().enumerate().map(move |(i, &tile)| {
            let (x, y) = (i % self.width, i / self.width);
            let position = Vec2::new(
                RENDER_OFFSET_X + x as f32 * TILE_SIZE,
                RENDER_OFFSET_Y + y as f32 * TILE_SIZE,
            );
            DrawCommand::new(Sprite::new(SpriteSheet::Tiles, tile), position + offset)
        })
    }
}
