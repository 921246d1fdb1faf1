use super::super::{Bus, Cpu};
use super::Interrupt;

const IE_ADDR: u16 = 0xFFFF;
const IF_ADDR: u16 = 0xFF0F;

/// T-cycles charged for an interrupt entry.
pub(in crate::cpu) const INTERRUPT_CYCLES: u32 = 20;

impl Cpu {
    /// Interrupt lines that are both requested and enabled.
    pub(in crate::cpu) fn pending_interrupts<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let ie = bus.read8(IE_ADDR);
        let iflags = bus.read8(IF_ADDR);
        ie & iflags & 0x1F
    }

    /// Service the highest-priority pending interrupt if IME is set.
    ///
    /// Returns `Some(cycles)` if an interrupt was taken. A pending interrupt
    /// with IME clear still wakes the CPU from HALT, without servicing it.
    pub(in crate::cpu) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        let pending = self.pending_interrupts(bus);
        if pending == 0 {
            return None;
        }

        if !self.ime {
            self.halted = false;
            return None;
        }

        // Lowest bit wins: VBlank > LCD STAT > Timer > Serial > Joypad.
        let interrupt = Interrupt::from_bit(pending.trailing_zeros() as u8)?;

        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        self.halted = false;

        let pc = self.regs.pc.get();
        self.push_u16(bus, pc);

        let iflags = bus.read8(IF_ADDR);
        bus.write8(IF_ADDR, iflags & !interrupt.mask());
        self.regs.pc.set(interrupt.vector());

        log::debug!(
            "GB CPU interrupt: {:?} vector=0x{:04X} pc=0x{:04X} sp=0x{:04X}",
            interrupt,
            interrupt.vector(),
            pc,
            self.regs.sp.get(),
        );

        Some(INTERRUPT_CYCLES)
    }

    /// Apply delayed IME change requested by EI.
    #[inline]
    pub(in crate::cpu) fn apply_ime_delay(&mut self) {
        if self.ime_enable_delay {
            // Second step after EI: actually enable IME.
            self.ime = true;
            self.ime_enable_delay = false;
        } else if self.ime_enable_pending {
            // First step after EI: arm the delayed enable.
            self.ime_enable_pending = false;
            self.ime_enable_delay = true;
        }
    }
}
