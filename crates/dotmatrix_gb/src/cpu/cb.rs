use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Execute a CB-prefixed instruction (bit operations, shifts and rotates).
    pub(super) fn exec_cb<B: Bus>(&mut self, bus: &mut B, cb: u8) {
        let x = cb >> 6;
        let y = (cb >> 3) & 0x07;
        let z = cb & 0x07;

        match x {
            // Rotates and shifts.
            0 => {
                let value = self.read_reg8(bus, z);
                let result = self.alu_shift(y, value);
                self.write_reg8(bus, z, result);
            }
            // BIT b, r
            1 => {
                let value = self.read_reg8(bus, z);
                self.set_flag(Flag::Z, value & (1 << y) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
            }
            // RES b, r
            2 => {
                let value = self.read_reg8(bus, z);
                self.write_reg8(bus, z, value & !(1 << y));
            }
            // SET b, r
            3 => {
                let value = self.read_reg8(bus, z);
                self.write_reg8(bus, z, value | (1 << y));
            }
            _ => unreachable!(),
        }
    }
}
