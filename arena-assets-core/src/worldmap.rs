//! World map data: the packed clickable-region masks from TAMRIEL.MNU and
//! the indexed terrain image from TERRAIN.IMG.

use serde::Serialize;

use crate::{AssetError, Result};

pub const WORLD_MAP_FILENAME: &str = "TAMRIEL.MNU";
pub const TERRAIN_FILENAME: &str = "TERRAIN.IMG";

pub const PROVINCE_MASK_COUNT: usize = 10;

// Beginning of the mask data inside the menu file.
const MASK_START_OFFSET: usize = 0x87D5;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

// Source rectangle of each province's mask, in file order. The mask bytes
// are packed back-to-back in this same order; the last entry is the "Exit"
// button.
const MASK_RECTS: [Rect; PROVINCE_MASK_COUNT] = [
    Rect::new(37, 32, 86, 57),
    Rect::new(47, 53, 90, 62),
    Rect::new(113, 29, 88, 53),
    Rect::new(190, 31, 102, 93),
    Rect::new(31, 131, 65, 52),
    Rect::new(100, 118, 61, 55),
    Rect::new(144, 119, 50, 57),
    Rect::new(204, 116, 67, 67),
    Rect::new(103, 72, 131, 84),
    Rect::new(279, 188, 37, 11),
];

/// A province's clickable-region bitmap, one bit per pixel, rows padded to
/// whole bytes.
#[derive(Debug, Clone)]
pub struct WorldMapMask {
    mask: Vec<u8>,
    rect: Rect,
}

impl WorldMapMask {
    /// Width of one mask row in bytes.
    pub fn adjusted_width(width: i32) -> i32 {
        (width + 7) / 8
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Tests the mask bit for a global map coordinate inside the rect.
    /// Bits run most-significant first within each byte.
    pub fn get(&self, x: i32, y: i32) -> bool {
        let relative_x = x - self.rect.x;
        let relative_y = y - self.rect.y;
        let byte_index =
            (relative_x / 8) + relative_y * Self::adjusted_width(self.rect.width);
        let bit_index = 7 - (relative_x % 8);
        (self.mask[byte_index as usize] >> bit_index) & 0x1 != 0
    }
}

/// Slices the ten packed mask bitmaps out of the menu file. The regions
/// have no per-region framing; their sizes come entirely from the fixed
/// rectangle table, so file order must match it.
pub fn parse_world_map_masks(data: &[u8]) -> Result<Vec<WorldMapMask>> {
    let mut masks = Vec::with_capacity(PROVINCE_MASK_COUNT);
    let mut offset = 0usize;

    for rect in MASK_RECTS {
        let byte_count =
            WorldMapMask::adjusted_width(rect.width) as usize * rect.height as usize;
        let start = MASK_START_OFFSET + offset;

        let mask = data
            .get(start..start + byte_count)
            .ok_or_else(|| {
                AssetError::Format(format!(
                    "{}: mask data ends at {} but region needs {}..{}",
                    WORLD_MAP_FILENAME,
                    data.len(),
                    start,
                    start + byte_count
                ))
            })?
            .to_vec();

        masks.push(WorldMapMask { mask, rect });
        offset += byte_count;
    }

    Ok(masks)
}

pub const TERRAIN_WIDTH: usize = 320;
pub const TERRAIN_HEIGHT: usize = 200;

// Header of the raw indexed image, skipped on load.
const TERRAIN_HEADER_SIZE: usize = 12;

// Terrain pixel codes.
pub const TERRAIN_SEA: u8 = 248;
pub const TERRAIN_MOUNTAIN_1: u8 = 249;
pub const TERRAIN_MOUNTAIN_2: u8 = 250;
pub const TERRAIN_TEMPERATE_2: u8 = 251;
pub const TERRAIN_DESERT_2: u8 = 252;
pub const TERRAIN_DESERT_1: u8 = 253;
pub const TERRAIN_TEMPERATE_1: u8 = 254;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClimateType {
    Temperate,
    Mountain,
    Desert,
}

impl ClimateType {
    /// Classifies a terrain pixel. Sea pixels have no climate; use the
    /// fail-safe lookup to avoid them.
    pub fn from_terrain(index: u8) -> Result<ClimateType> {
        match index {
            TERRAIN_TEMPERATE_1 | TERRAIN_TEMPERATE_2 => Ok(ClimateType::Temperate),
            TERRAIN_MOUNTAIN_1 | TERRAIN_MOUNTAIN_2 => Ok(ClimateType::Mountain),
            TERRAIN_DESERT_1 | TERRAIN_DESERT_2 => Ok(ClimateType::Desert),
            other => Err(AssetError::Format(format!(
                "{}: bad terrain index {}",
                TERRAIN_FILENAME, other
            ))),
        }
    }
}

/// The world map's coarse terrain classification image.
#[derive(Debug, Clone)]
pub struct WorldMapTerrain {
    indices: Vec<u8>,
}

impl WorldMapTerrain {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let pixel_count = TERRAIN_WIDTH * TERRAIN_HEIGHT;
        let indices = data
            .get(TERRAIN_HEADER_SIZE..TERRAIN_HEADER_SIZE + pixel_count)
            .ok_or_else(|| {
                AssetError::Format(format!(
                    "{}: expected {} pixels after the header, got {} bytes",
                    TERRAIN_FILENAME,
                    pixel_count,
                    data.len()
                ))
            })?
            .to_vec();

        Ok(WorldMapTerrain { indices })
    }

    #[cfg(test)]
    fn from_pixels(indices: Vec<u8>) -> Self {
        WorldMapTerrain { indices }
    }

    /// Offsets a pixel code into the small terrain index space.
    pub fn normalized_index(index: u8) -> u8 {
        index - TERRAIN_SEA
    }

    /// Direct pixel lookup.
    pub fn get_at(&self, x: i32, y: i32) -> u8 {
        let index = x + y * TERRAIN_WIDTH as i32;
        self.indices[index as usize]
    }

    // The mask coordinate space is registered 12 pixels to the right of
    // the terrain image, so lookups shift left and wrap.
    fn shifted_at(&self, x: i32, y: i32) -> u8 {
        let pixel_count = (TERRAIN_WIDTH * TERRAIN_HEIGHT) as i32;
        let index = (x + y * TERRAIN_WIDTH as i32 - 12).rem_euclid(pixel_count);
        self.indices[index as usize]
    }

    /// Pixel lookup that tolerates sea pixels: coastal UI coordinates can
    /// legitimately land on sea, so search outward in a '+' pattern for
    /// the nearest real terrain, giving up to a temperate default.
    pub fn get_fail_safe_at(&self, x: i32, y: i32) -> u8 {
        let pixel = self.shifted_at(x, y);
        if pixel != TERRAIN_SEA {
            return pixel;
        }

        for dist in 1..200 {
            let candidates = [
                self.shifted_at(x, y + dist), // Below.
                self.shifted_at(x, y - dist), // Above.
                self.shifted_at(x + dist, y), // Right.
                self.shifted_at(x - dist, y), // Left.
            ];

            if let Some(&pixel) = candidates.iter().find(|&&p| p != TERRAIN_SEA) {
                return pixel;
            }
        }

        TERRAIN_TEMPERATE_1
    }
}
