pub mod cpu;
pub mod debugger;
pub mod machine;
pub mod register;

pub use debugger::{Debugger, InstructionLine, StopReason};
pub use machine::{
    Button, Cartridge, CartridgeHeader, GameBoy, GameBoyOptions, Shade, VideoBuffer, VideoSink,
};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
