use super::super::boot::BOOT_ROM;
use super::{MemoryBus, BOOT_LATCH};

/// DMA source register, the one display register with a bus side effect.
const DMA: u16 = 0xFF46;

impl MemoryBus<'_> {
    /// Decode a read. Arms are in priority order.
    pub fn read(&self, addr: u16) -> u8 {
        let mem = &self.memory.memory;
        match addr {
            // Interrupt enable.
            0xFFFF => self.interrupts.interrupt_enable(),

            // High RAM.
            0xFF80..=0xFFFE => mem[addr as usize],

            // Boot ROM disable latch.
            BOOT_LATCH => mem[addr as usize],

            // LCDC, STAT, SCY, SCX, LY, LYC, DMA, BGP, OBP0, OBP1, WY, WX.
            0xFF40..=0xFF4B => self.display.read_register(addr),

            // Sound registers and wave RAM (no APU).
            0xFF10..=0xFF3F => mem[addr as usize],

            // Interrupt flag. The unused upper bits read as 1.
            0xFF0F => self.interrupts.interrupt_flag() | 0xE0,

            // DIV, TIMA, TMA, TAC (no timer).
            0xFF04..=0xFF07 => mem[addr as usize],

            // SB, SC (no serial link).
            0xFF01..=0xFF02 => mem[addr as usize],

            // Joypad (P1).
            0xFF00 => self.memory.controller.get_value(),

            // Unusable.
            0xFEA0..=0xFEFF => 0xFF,

            // OAM.
            0xFE00..=0xFE9F => mem[addr as usize],

            // Echo RAM: 0xE000..0xFDFF mirrors 0xC000..0xDDFF.
            0xE000..=0xFDFF => mem[(addr - 0x2000) as usize],

            // Work RAM.
            0xC000..=0xDFFF => mem[addr as usize],

            // External RAM window.
            0xA000..=0xBFFF => self.memory.cartridge.read(addr),

            // VRAM, never locked.
            0x8000..=0x9FFF => mem[addr as usize],

            0x0100..=0x7FFF => self.memory.cartridge.read(addr),

            0x0000..=0x00FF => {
                if self.memory.boot_rom_enabled() {
                    BOOT_ROM[addr as usize]
                } else {
                    self.memory.cartridge.read(addr)
                }
            }

            // Remaining I/O holes (0xFF03, 0xFF08..0xFF0E, 0xFF4C..0xFF4F,
            // 0xFF51..0xFF7F).
            _ => 0xFF,
        }
    }

    /// Decode a write. Arms mirror [`MemoryBus::read`].
    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFFFF => self.interrupts.set_interrupt_enable(value),

            0xFF80..=0xFFFE => self.memory.memory[addr as usize] = value,

            BOOT_LATCH => {
                if value != 0 && self.memory.boot_rom_enabled() {
                    log::debug!("GB BUS: boot ROM unmapped");
                }
                self.memory.memory[addr as usize] = value;
            }

            0xFF40..=0xFF4B => {
                self.display.write_register(addr, value);
                if addr == DMA {
                    self.oam_dma(value);
                }
            }

            0xFF10..=0xFF3F => self.memory.memory[addr as usize] = value,

            0xFF0F => self.interrupts.set_interrupt_flag(value),

            0xFF04..=0xFF07 => self.memory.memory[addr as usize] = value,

            0xFF01..=0xFF02 => self.memory.memory[addr as usize] = value,

            0xFF00 => self.memory.controller.set_value(value),

            0xFEA0..=0xFEFF => {}

            0xFE00..=0xFE9F => self.memory.memory[addr as usize] = value,

            0xE000..=0xFDFF => self.memory.memory[(addr - 0x2000) as usize] = value,

            0xC000..=0xDFFF => self.memory.memory[addr as usize] = value,

            0xA000..=0xBFFF => self.memory.cartridge.write(addr, value),

            0x8000..=0x9FFF => self.memory.memory[addr as usize] = value,

            0x0100..=0x7FFF => self.memory.cartridge.write(addr, value),

            0x0000..=0x00FF => {
                // The boot ROM is read-only; the cartridge sees the write
                // either way.
                self.memory.cartridge.write(addr, value);
            }

            _ => {}
        }
    }
}
