use bitflags::bitflags;

use crate::machine::bus::VideoMemory;

/// Base of OAM.
pub(super) const OAM_BASE: u16 = 0xFE00;
/// Number of sprite entries in OAM.
pub(super) const OAM_ENTRIES: u16 = 40;

bitflags! {
    /// Byte 3 of an OAM entry.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct OamFlags: u8 {
        /// Sprite is hidden behind background colours 1-3.
        const BEHIND_BG = 0b1000_0000;
        const FLIP_Y    = 0b0100_0000;
        const FLIP_X    = 0b0010_0000;
        /// Use OBP1 instead of OBP0.
        const PALETTE_1 = 0b0001_0000;
    }
}

/// One 4-byte sprite record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OamEntry {
    pub pos_y: u8,
    pub pos_x: u8,
    pub tile: u8,
    pub flags: OamFlags,
}

impl OamEntry {
    /// Decode entry `index` (0..40) from OAM.
    pub fn read(video: &dyn VideoMemory, index: u16) -> Self {
        let base = OAM_BASE + index * 4;
        Self {
            pos_y: video.read_video(base),
            pos_x: video.read_video(base + 1),
            tile: video.read_video(base + 2),
            flags: OamFlags::from_bits_retain(video.read_video(base + 3)),
        }
    }

    /// Whether the sprite lies completely outside the visible screen.
    pub fn is_offscreen(&self) -> bool {
        self.pos_x == 0 || self.pos_x >= 168 || self.pos_y == 0 || self.pos_y >= 160
    }
}

/// Decoded 2-bit colour indices of an 8x8 or 8x16 tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    rows: [[u8; 8]; 16],
    height: u8,
}

impl Tile {
    /// Decode `height` rows (8 or 16) of 2 bytes each starting at `addr`.
    pub fn read(video: &dyn VideoMemory, addr: u16, height: u8) -> Self {
        debug_assert!(height == 8 || height == 16);
        let mut rows = [[0; 8]; 16];
        for (y, row) in rows.iter_mut().take(height as usize).enumerate() {
            let row_addr = addr.wrapping_add(y as u16 * 2);
            let low = video.read_video(row_addr);
            let high = video.read_video(row_addr.wrapping_add(1));
            *row = decode_row(low, high);
        }
        Self { rows, height }
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: u8, y: u8) -> u8 {
        self.rows[y as usize][x as usize]
    }
}

/// The 8 colour indices of one tile row, leftmost pixel first.
///
/// Bit `7 - x` of `low` and of `high` form the low and high bit of pixel x.
pub fn decode_row(low: u8, high: u8) -> [u8; 8] {
    std::array::from_fn(|x| row_pixel(low, high, x as u8))
}

#[inline]
pub(super) fn row_pixel(low: u8, high: u8, x: u8) -> u8 {
    let bit = 7 - x;
    (((high >> bit) & 1) << 1) | ((low >> bit) & 1)
}

/// Map a 2-bit colour index through a BGP/OBP palette register.
#[inline]
pub fn apply_palette(palette: u8, color: u8) -> u8 {
    (palette >> ((color & 0x03) * 2)) & 0x03
}
