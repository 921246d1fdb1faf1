use crate::cpu::{Bus, Cpu, Pair};

impl Cpu {
    pub(super) fn exec_push_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));

        let pair = Self::rp2_pair((opcode >> 4) & 0x03);
        let value = self.regs.pair(pair).get();
        self.push_u16(bus, value);
    }

    pub(super) fn exec_pop_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));

        let value = self.pop_u16(bus);
        match Self::rp2_pair((opcode >> 4) & 0x03) {
            // POP AF must keep the low nibble of F clear.
            Pair::AF => self.regs.set_af(value),
            pair => self.regs.pair(pair).set(value),
        }
    }
}
