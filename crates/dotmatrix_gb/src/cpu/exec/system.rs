use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_halt(&mut self) {
        self.halted = true;
    }

    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) {
        // STOP is a 2-byte instruction; the padding byte is fetched and
        // discarded so that PC matches hardware.
        let _padding = self.fetch8(bus);

        // Stay idle until a joypad interrupt is requested (see `tick`).
        self.stopped = true;
        self.halted = false;
        log::debug!("GB CPU STOP at PC=0x{:04X}", self.regs.pc.get());
    }

    pub(super) fn exec_di(&mut self) {
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
    }

    pub(super) fn exec_ei(&mut self) {
        // IME becomes 1 after the *next* instruction completes.
        self.ime_enable_pending = true;
    }
}
