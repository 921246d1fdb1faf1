use super::{cartridge::Cartridge, controller::Controller, MEMORY_SIZE};
use crate::cpu::InterruptRegisters;

mod decode;
mod dma;
mod traits;

pub use traits::{DisplayRegisters, VideoMemory};

/// Address of the boot ROM disable latch.
pub(super) const BOOT_LATCH: u16 = 0xFF50;

/// Backing store for the 16-bit address space.
///
/// Owns the RAM bytes, the cartridge and the controller. The interrupt and
/// display registers live elsewhere; [`Memory::bind`] borrows them for the
/// duration of one CPU instruction.
pub struct Memory {
    pub(super) memory: [u8; MEMORY_SIZE],
    cartridge: Cartridge,
    controller: Box<dyn Controller>,
}

/// A [`Memory`] wired to the interrupt and display registers.
///
/// This is the view the CPU executes against.
pub struct MemoryBus<'a> {
    memory: &'a mut Memory,
    interrupts: &'a mut dyn InterruptRegisters,
    display: &'a mut dyn DisplayRegisters,
}

impl Memory {
    pub fn new(cartridge: Cartridge, controller: Box<dyn Controller>) -> Self {
        Self {
            memory: [0; MEMORY_SIZE],
            cartridge,
            controller,
        }
    }

    pub fn bind<'a>(
        &'a mut self,
        interrupts: &'a mut dyn InterruptRegisters,
        display: &'a mut dyn DisplayRegisters,
    ) -> MemoryBus<'a> {
        MemoryBus {
            memory: self,
            interrupts,
            display,
        }
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> &mut dyn Controller {
        self.controller.as_mut()
    }

    /// Whether 0x0000..0x0100 still maps the internal boot ROM.
    pub fn boot_rom_enabled(&self) -> bool {
        self.memory[BOOT_LATCH as usize] == 0
    }

    /// Unmap the boot ROM, as its final instruction would.
    pub fn disable_boot_rom(&mut self) {
        self.memory[BOOT_LATCH as usize] = 0x01;
    }
}
