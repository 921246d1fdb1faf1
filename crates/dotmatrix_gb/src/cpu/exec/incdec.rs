use crate::cpu::{Bus, Cpu, Pair};

impl Cpu {
    pub(super) fn exec_inc8_reg<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(
            matches!(opcode, 0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C),
            "unexpected INC r opcode {opcode:#04x}"
        );

        let reg = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, reg);
        let result = self.alu_inc8(value);
        self.write_reg8(bus, reg, result);
    }

    pub(super) fn exec_dec8_reg<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        debug_assert!(
            matches!(opcode, 0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D),
            "unexpected DEC r opcode {opcode:#04x}"
        );

        let reg = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, reg);
        let result = self.alu_dec8(value);
        self.write_reg8(bus, reg, result);
    }

    pub(super) fn exec_inc16_rr(&mut self, opcode: u8) {
        debug_assert!(matches!(opcode, 0x03 | 0x13 | 0x23 | 0x33));
        match opcode {
            0x03 => {
                self.regs.pair(Pair::BC).inc();
            }
            0x13 => {
                self.regs.pair(Pair::DE).inc();
            }
            0x23 => {
                self.regs.pair(Pair::HL).inc();
            }
            0x33 => {
                self.regs.sp.inc();
            }
            _ => unreachable!(),
        }
    }

    pub(super) fn exec_dec16_rr(&mut self, opcode: u8) {
        debug_assert!(matches!(opcode, 0x0B | 0x1B | 0x2B | 0x3B));
        match opcode {
            0x0B => {
                self.regs.pair(Pair::BC).dec();
            }
            0x1B => {
                self.regs.pair(Pair::DE).dec();
            }
            0x2B => {
                self.regs.pair(Pair::HL).dec();
            }
            0x3B => {
                self.regs.sp.dec();
            }
            _ => unreachable!(),
        }
    }
}
