mod boot;
mod bus;
mod cartridge;
mod controller;
mod gameboy;
mod gpu;
mod video;

pub use boot::BOOT_ROM;
pub use bus::{DisplayRegisters, Memory, MemoryBus, VideoMemory};
pub use cartridge::{Cartridge, CartridgeHeader};
pub use controller::{
    Button, Controller, InputEvent, Joypad, Recording, RecordingController, ReplayController,
};
pub use gameboy::{GameBoy, GameBoyOptions};
pub use gpu::{Gpu, GpuMode, Lcdc, OamEntry, OamFlags, Stat, Tile};
pub use video::{FrameCounter, NullSink, Shade, VideoBuffer, VideoSink};

/// Total addressable memory for the Game Boy (64 KiB).
///
/// Every region that is not routed to a device (cartridge, interrupt
/// registers, display registers, controller) is backed by this flat array.
const MEMORY_SIZE: usize = 0x10000;

#[cfg(test)]
mod tests;
