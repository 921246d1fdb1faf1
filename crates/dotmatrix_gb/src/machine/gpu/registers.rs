use bitflags::bitflags;

use super::{Gpu, GpuMode};
use crate::machine::bus::DisplayRegisters;

bitflags! {
    /// LCDC ($FF40).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Lcdc: u8 {
        const DISPLAY_ENABLE = 0b1000_0000;
        const WINDOW_MAP     = 0b0100_0000;
        const WINDOW_ENABLE  = 0b0010_0000;
        /// Set: unsigned tiles at 0x8000. Clear: signed tiles around 0x9000.
        const TILE_DATA_8000 = 0b0001_0000;
        const BG_MAP         = 0b0000_1000;
        const SPRITE_8X16    = 0b0000_0100;
        const SPRITE_ENABLE  = 0b0000_0010;
        const BG_ENABLE      = 0b0000_0001;
    }
}

bitflags! {
    /// STAT ($FF41). Bits 1-0 hold the [`GpuMode`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Stat: u8 {
        const LYC_INTERRUPT    = 0b0100_0000;
        const OAM_INTERRUPT    = 0b0010_0000;
        const VBLANK_INTERRUPT = 0b0001_0000;
        const HBLANK_INTERRUPT = 0b0000_1000;
        const COINCIDENCE      = 0b0000_0100;
        const MODE_HIGH        = 0b0000_0010;
        const MODE_LOW         = 0b0000_0001;
    }
}

pub(super) const LCDC: u16 = 0xFF40;
pub(super) const STAT: u16 = 0xFF41;
pub(super) const SCY: u16 = 0xFF42;
pub(super) const SCX: u16 = 0xFF43;
pub(super) const LY: u16 = 0xFF44;
pub(super) const LYC: u16 = 0xFF45;
pub(super) const DMA: u16 = 0xFF46;
pub(super) const BGP: u16 = 0xFF47;
pub(super) const OBP0: u16 = 0xFF48;
pub(super) const OBP1: u16 = 0xFF49;
pub(super) const WY: u16 = 0xFF4A;
pub(super) const WX: u16 = 0xFF4B;

/// STAT bits the CPU can write.
const STAT_WRITABLE: u8 = 0b0111_1000;

impl Gpu {
    pub fn lcdc(&self) -> Lcdc {
        Lcdc::from_bits_retain(self.lcdc.get())
    }

    pub fn stat(&self) -> Stat {
        Stat::from_bits_retain(self.stat.get())
    }

    pub(super) fn set_stat(&mut self, stat: Stat) {
        self.stat.set(stat.bits());
    }

    /// Record the mode in STAT bits 1-0.
    pub(super) fn write_mode_bits(&mut self, mode: GpuMode) {
        let bits = mode as u8;
        self.stat.set_bit(1, bits & 0b10 != 0);
        self.stat.set_bit(0, bits & 0b01 != 0);
    }
}

impl DisplayRegisters for Gpu {
    fn read_register(&self, addr: u16) -> u8 {
        match addr {
            LCDC => self.lcdc.get(),
            // Bit 7 is unused and reads back as 1.
            STAT => self.stat.get() | 0x80,
            SCY => self.scy.get(),
            SCX => self.scx.get(),
            LY => self.ly.get(),
            LYC => self.lyc.get(),
            // Write-only.
            DMA => 0xFF,
            BGP => self.bgp.get(),
            OBP0 => self.obp0.get(),
            OBP1 => self.obp1.get(),
            WY => self.wy.get(),
            WX => self.wx.get(),
            _ => 0xFF,
        }
    }

    fn write_register(&mut self, addr: u16, value: u8) {
        match addr {
            LCDC => {
                let was_on = self.lcdc().contains(Lcdc::DISPLAY_ENABLE);
                self.lcdc.set(value);
                let is_on = self.lcdc().contains(Lcdc::DISPLAY_ENABLE);
                if was_on != is_on {
                    log::debug!("GB PPU: display {}", if is_on { "on" } else { "off" });
                }
            }
            STAT => {
                // Mode and coincidence bits are read-only.
                let current = self.stat.get() & !STAT_WRITABLE;
                self.stat.set(current | (value & STAT_WRITABLE));
            }
            SCY => self.scy.set(value),
            SCX => self.scx.set(value),
            // LY is driven by the timing state machine only.
            LY => {}
            LYC => self.lyc.set(value),
            // The copy itself is performed by the bus.
            DMA => {}
            BGP => self.bgp.set(value),
            OBP0 => self.obp0.set(value),
            OBP1 => self.obp1.set(value),
            WY => self.wy.set(value),
            WX => self.wx.set(value),
            _ => {}
        }
    }
}
