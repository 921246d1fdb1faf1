use crate::cpu::Bus;

use super::{Memory, MemoryBus};

/// The display controller's memory-mapped registers (0xFF40..=0xFF4B).
pub trait DisplayRegisters {
    fn read_register(&self, addr: u16) -> u8;
    fn write_register(&mut self, addr: u16, value: u8);
}

/// Raw access to VRAM and OAM for the renderer. Bypasses the bus decode
/// and has no side effects.
pub trait VideoMemory {
    fn read_video(&self, addr: u16) -> u8;
}

impl VideoMemory for Memory {
    #[inline]
    fn read_video(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }
}

impl Bus for MemoryBus<'_> {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.write(addr, value)
    }
}
