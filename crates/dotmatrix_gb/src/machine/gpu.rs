mod registers;
mod render;
mod tile;

use crate::cpu::{Interrupt, InterruptRegisters};
use crate::register::Register;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

use super::bus::VideoMemory;
use super::video::{VideoBuffer, VideoSink};

pub use registers::{Lcdc, Stat};
pub use tile::{OamEntry, OamFlags, Tile};

/// Cycles spent searching OAM at the start of each visible line.
pub const OAM_CYCLES: u32 = 80;
/// Cycles spent transferring pixels to the LCD.
pub const VRAM_CYCLES: u32 = 172;
/// Cycles of horizontal blank closing each visible line.
pub const HBLANK_CYCLES: u32 = 204;
/// Length of a whole line, and of each of the 10 vertical blank lines.
pub const LINE_CYCLES: u32 = OAM_CYCLES + VRAM_CYCLES + HBLANK_CYCLES;

/// LY value at which vertical blank starts.
const VBLANK_START: u8 = SCREEN_HEIGHT as u8;
/// LY value at which the frame wraps back to line 0.
const LINES_PER_FRAME: u8 = 154;

/// Display controller phase. The discriminant is the STAT mode value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GpuMode {
    HBlank = 0b00,
    VBlank = 0b01,
    Oam = 0b10,
    Vram = 0b11,
}

impl GpuMode {
    /// Cycles the phase lasts before its transition fires.
    pub fn budget(self) -> u32 {
        match self {
            GpuMode::Oam => OAM_CYCLES,
            GpuMode::Vram => VRAM_CYCLES,
            GpuMode::HBlank => HBLANK_CYCLES,
            GpuMode::VBlank => LINE_CYCLES,
        }
    }
}

/// DMG display controller.
///
/// Owns the twelve LCD registers and the frame buffer. It is clocked by the
/// cycle counts the CPU reports and renders one scanline at the end of each
/// HBLANK; sprites are composited over the whole frame just before it is
/// handed to the sink.
///
/// LCD_STAT is raised for all four STAT sources (HBLANK, LY=LYC, OAM and
/// VBLANK), not only HBLANK and LY=LYC. The OAM source fires on every entry
/// to mode 2, the VBLANK source together with the VBLANK interrupt.
pub struct Gpu {
    lcdc: Register,
    stat: Register,
    scy: Register,
    scx: Register,
    ly: Register,
    lyc: Register,
    bgp: Register,
    obp0: Register,
    obp1: Register,
    wy: Register,
    wx: Register,

    mode: GpuMode,
    /// Cycles accumulated in the current phase.
    clock: u32,
    buffer: VideoBuffer,
    /// Pre-palette BG/window colour index of every pixel, consulted by
    /// sprites with the behind-background attribute.
    bg_colors: Box<[u8]>,
    frames: u64,
}

impl Default for Gpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpu {
    pub fn new() -> Self {
        let mut gpu = Self {
            lcdc: Register::default(),
            stat: Register::default(),
            scy: Register::default(),
            scx: Register::default(),
            ly: Register::default(),
            lyc: Register::default(),
            bgp: Register::default(),
            obp0: Register::default(),
            obp1: Register::default(),
            wy: Register::default(),
            wx: Register::default(),
            mode: GpuMode::Oam,
            clock: 0,
            buffer: VideoBuffer::new(),
            bg_colors: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT].into_boxed_slice(),
            frames: 0,
        };
        gpu.write_mode_bits(GpuMode::Oam);
        gpu
    }

    /// Register values left behind by the boot ROM.
    pub fn apply_post_boot_state(&mut self) {
        self.lcdc.set(0x91);
        self.bgp.set(0xFC);
    }

    pub fn mode(&self) -> GpuMode {
        self.mode
    }

    pub fn ly(&self) -> u8 {
        self.ly.get()
    }

    /// Cycles accumulated in the current phase.
    pub fn clock(&self) -> u32 {
        self.clock
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn buffer(&self) -> &VideoBuffer {
        &self.buffer
    }

    /// Advance the state machine by `cycles`, crossing as many phase
    /// boundaries as they cover.
    ///
    /// Returns `true` if a frame was delivered to `sink`.
    pub fn tick(
        &mut self,
        cycles: u32,
        video: &dyn VideoMemory,
        interrupts: &mut dyn InterruptRegisters,
        sink: &mut dyn VideoSink,
    ) -> bool {
        self.clock += cycles;
        let mut delivered = false;

        while self.clock >= self.mode.budget() {
            self.clock -= self.mode.budget();
            match self.mode {
                GpuMode::Oam => self.set_mode(GpuMode::Vram),
                GpuMode::Vram => self.end_vram(interrupts),
                GpuMode::HBlank => self.end_hblank(video, interrupts),
                GpuMode::VBlank => delivered |= self.end_vblank_line(video, interrupts, sink),
            }
        }
        delivered
    }

    fn set_mode(&mut self, mode: GpuMode) {
        self.mode = mode;
        self.write_mode_bits(mode);
    }

    fn request_stat_if(&self, source: Stat, interrupts: &mut dyn InterruptRegisters) {
        if self.stat().contains(source) {
            interrupts.request(Interrupt::LcdStat);
        }
    }

    fn end_vram(&mut self, interrupts: &mut dyn InterruptRegisters) {
        self.request_stat_if(Stat::HBLANK_INTERRUPT, interrupts);

        let coincidence = self.ly.get() == self.lyc.get();
        let mut stat = self.stat();
        stat.set(Stat::COINCIDENCE, coincidence);
        self.set_stat(stat);
        if coincidence {
            self.request_stat_if(Stat::LYC_INTERRUPT, interrupts);
        }

        self.set_mode(GpuMode::HBlank);
    }

    fn end_hblank(&mut self, video: &dyn VideoMemory, interrupts: &mut dyn InterruptRegisters) {
        self.render_scanline(video);

        if self.ly.inc() < VBLANK_START {
            self.enter_oam(interrupts);
        } else {
            log::trace!("GB PPU: VBlank, frame {}", self.frames);
            interrupts.request(Interrupt::VBlank);
            self.request_stat_if(Stat::VBLANK_INTERRUPT, interrupts);
            self.set_mode(GpuMode::VBlank);
        }
    }

    fn end_vblank_line(
        &mut self,
        video: &dyn VideoMemory,
        interrupts: &mut dyn InterruptRegisters,
        sink: &mut dyn VideoSink,
    ) -> bool {
        if self.ly.inc() < LINES_PER_FRAME {
            return false;
        }

        self.render_sprites(video);
        sink.paint(&self.buffer);
        self.frames += 1;

        self.ly.set(0);
        self.enter_oam(interrupts);
        true
    }

    fn enter_oam(&mut self, interrupts: &mut dyn InterruptRegisters) {
        self.request_stat_if(Stat::OAM_INTERRUPT, interrupts);
        self.set_mode(GpuMode::Oam);
    }
}
