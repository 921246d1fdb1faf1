use crate::machine::bus::VideoMemory;
use crate::machine::video::Shade;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::registers::Lcdc;
use super::tile::{apply_palette, row_pixel, OamEntry, OamFlags, Tile, OAM_ENTRIES};
use super::Gpu;

const MAP_LOW: u16 = 0x9800;
const MAP_HIGH: u16 = 0x9C00;
const SPRITE_TILES: u16 = 0x8000;

impl Gpu {
    /// Render background and window for the current LY into the frame
    /// buffer.
    pub(super) fn render_scanline(&mut self, video: &dyn VideoMemory) {
        let line = self.ly.get() as usize;
        if line >= SCREEN_HEIGHT {
            return;
        }

        let lcdc = self.lcdc();
        let mut colors = [0u8; SCREEN_WIDTH];

        // With the display or the background off the line stays white.
        if lcdc.contains(Lcdc::DISPLAY_ENABLE | Lcdc::BG_ENABLE) {
            let bg_map = if lcdc.contains(Lcdc::BG_MAP) {
                MAP_HIGH
            } else {
                MAP_LOW
            };
            let window_map = if lcdc.contains(Lcdc::WINDOW_MAP) {
                MAP_HIGH
            } else {
                MAP_LOW
            };
            let bg_y = self.scy.get().wrapping_add(line as u8);
            let window = self.window_origin(lcdc, line);

            for (col, color) in colors.iter_mut().enumerate() {
                *color = match window {
                    Some((left, win_y)) if col as i16 >= left => {
                        let win_x = (col as i16 - left) as u8;
                        self.map_pixel(video, window_map, win_x, win_y)
                    }
                    _ => {
                        let bg_x = self.scx.get().wrapping_add(col as u8);
                        self.map_pixel(video, bg_map, bg_x, bg_y)
                    }
                };
            }
        }

        let bgp = self.bgp.get();
        let enabled = lcdc.contains(Lcdc::DISPLAY_ENABLE | Lcdc::BG_ENABLE);
        for (pixel, &color) in self.buffer.row_mut(line).iter_mut().zip(colors.iter()) {
            *pixel = if enabled {
                Shade::from_bits(apply_palette(bgp, color))
            } else {
                Shade::White
            };
        }
        self.bg_colors[line * SCREEN_WIDTH..(line + 1) * SCREEN_WIDTH].copy_from_slice(&colors);
    }

    /// Screen column where the window starts and the window row for `line`,
    /// if the window covers this line.
    fn window_origin(&self, lcdc: Lcdc, line: usize) -> Option<(i16, u8)> {
        let wy = self.wy.get() as usize;
        if !lcdc.contains(Lcdc::WINDOW_ENABLE) || line < wy {
            return None;
        }
        Some((i16::from(self.wx.get()) - 7, (line - wy) as u8))
    }

    /// Colour index at `(x, y)` of the 256x256 plane described by the tile
    /// map at `map`.
    fn map_pixel(&self, video: &dyn VideoMemory, map: u16, x: u8, y: u8) -> u8 {
        let entry = map + u16::from(y / 8) * 32 + u16::from(x / 8);
        let index = video.read_video(entry);
        let row_addr = self.tile_data_addr(index) + u16::from(y % 8) * 2;
        let low = video.read_video(row_addr);
        let high = video.read_video(row_addr + 1);
        row_pixel(low, high, x % 8)
    }

    /// Address of BG/window tile `index` under the current LCDC addressing
    /// mode.
    fn tile_data_addr(&self, index: u8) -> u16 {
        if self.lcdc().contains(Lcdc::TILE_DATA_8000) {
            0x8000 + u16::from(index) * 16
        } else {
            0x9000u16.wrapping_add_signed(i16::from(index as i8) * 16)
        }
    }

    /// Composite all 40 sprites over the finished frame.
    pub(super) fn render_sprites(&mut self, video: &dyn VideoMemory) {
        let lcdc = self.lcdc();
        if !lcdc.contains(Lcdc::DISPLAY_ENABLE | Lcdc::SPRITE_ENABLE) {
            return;
        }
        let height = if lcdc.contains(Lcdc::SPRITE_8X16) {
            16
        } else {
            8
        };

        // Lower OAM indices win where sprites overlap, so they go last.
        for index in (0..OAM_ENTRIES).rev() {
            let entry = OamEntry::read(video, index);
            if entry.is_offscreen() {
                continue;
            }
            let tile_index = if height == 16 {
                entry.tile & 0xFE
            } else {
                entry.tile
            };
            let tile = Tile::read(video, SPRITE_TILES + u16::from(tile_index) * 16, height);
            self.draw_sprite(&entry, &tile);
        }
    }

    fn draw_sprite(&mut self, entry: &OamEntry, tile: &Tile) {
        let palette = if entry.flags.contains(OamFlags::PALETTE_1) {
            self.obp1.get()
        } else {
            self.obp0.get()
        };
        let left = i16::from(entry.pos_x) - 8;
        let top = i16::from(entry.pos_y) - 16;

        for row in 0..tile.height() {
            let y = top + i16::from(row);
            if !(0..SCREEN_HEIGHT as i16).contains(&y) {
                continue;
            }
            let src_y = if entry.flags.contains(OamFlags::FLIP_Y) {
                tile.height() - 1 - row
            } else {
                row
            };

            for col in 0..8u8 {
                let x = left + i16::from(col);
                if !(0..SCREEN_WIDTH as i16).contains(&x) {
                    continue;
                }
                let src_x = if entry.flags.contains(OamFlags::FLIP_X) {
                    7 - col
                } else {
                    col
                };

                // Colour 0 is transparent.
                let color = tile.pixel(src_x, src_y);
                if color == 0 {
                    continue;
                }

                let (x, y) = (x as usize, y as usize);
                if entry.flags.contains(OamFlags::BEHIND_BG)
                    && self.bg_colors[y * SCREEN_WIDTH + x] != 0
                {
                    continue;
                }
                self.buffer
                    .set(x, y, Shade::from_bits(apply_palette(palette, color)));
            }
        }
    }
}
