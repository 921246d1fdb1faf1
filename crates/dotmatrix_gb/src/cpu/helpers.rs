use super::{Bus, Cpu, Flag, Pair};

impl Cpu {
    /// Helper to read an 8-bit register or (HL) by index.
    ///
    /// The encoding matches the standard Game Boy register order used by
    /// opcode tables:
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8<B: Bus>(&mut self, bus: &mut B, index: u8) -> u8 {
        match index {
            0 => self.regs.b.get(),
            1 => self.regs.c.get(),
            2 => self.regs.d.get(),
            3 => self.regs.e.get(),
            4 => self.regs.h.get(),
            5 => self.regs.l.get(),
            6 => bus.read8(self.regs.hl()),
            7 => self.regs.a.get(),
            _ => unreachable!("register index {index} out of range"),
        }
    }

    /// Helper to write an 8-bit register or (HL) by index.
    ///
    /// The encoding matches `read_reg8`.
    #[inline]
    pub(super) fn write_reg8<B: Bus>(&mut self, bus: &mut B, index: u8, value: u8) {
        match index {
            0 => self.regs.b.set(value),
            1 => self.regs.c.set(value),
            2 => self.regs.d.set(value),
            3 => self.regs.e.set(value),
            4 => self.regs.h.set(value),
            5 => self.regs.l.set(value),
            6 => bus.write8(self.regs.hl(), value),
            7 => self.regs.a.set(value),
            _ => unreachable!("register index {index} out of range"),
        }
    }

    /// 16-bit register pair by the `rp` opcode field: BC, DE, HL, SP.
    #[inline]
    pub(super) fn read_rp(&self, rp: u8) -> u16 {
        match rp {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            3 => self.regs.sp.get(),
            _ => unreachable!("register pair index {rp} out of range"),
        }
    }

    #[inline]
    pub(super) fn write_rp(&mut self, rp: u8, value: u16) {
        match rp {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            3 => self.regs.sp.set(value),
            _ => unreachable!("register pair index {rp} out of range"),
        }
    }

    /// Register pair for the PUSH/POP `rp2` field: BC, DE, HL, AF.
    #[inline]
    pub(super) fn rp2_pair(rp2: u8) -> Pair {
        match rp2 {
            0 => Pair::BC,
            1 => Pair::DE,
            2 => Pair::HL,
            _ => Pair::AF,
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let pc = self.regs.pc.post_inc();
        bus.read8(pc)
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Push a 16-bit value: high byte first, each at a descending address.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        let addr = self.regs.sp.dec();
        bus.write8(addr, hi);
        let addr = self.regs.sp.dec();
        bus.write8(addr, lo);
    }

    /// Pop a 16-bit value: the exact mirror of `push_u16`.
    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp.post_inc());
        let hi = bus.read8(self.regs.sp.post_inc());
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn cc_condition(&self, cc: u8) -> bool {
        match cc {
            0 => !self.get_flag(Flag::Z), // NZ
            1 => self.get_flag(Flag::Z),  // Z
            2 => !self.get_flag(Flag::C), // NC
            3 => self.get_flag(Flag::C),  // C
            _ => unreachable!("condition code {cc} out of range"),
        }
    }

    /// Relative jump helper used by JR/JR cc.
    ///
    /// The displacement is a signed 8-bit offset relative to the address
    /// following the operand.
    pub(super) fn jr<B: Bus>(&mut self, bus: &mut B, cond: bool) {
        let offset = self.fetch8(bus) as i8;
        if cond {
            let pc = self.regs.pc.get().wrapping_add_signed(offset as i16);
            self.regs.pc.set(pc);
        }
        self.branch_taken = cond;
    }

    /// Absolute jump helper used by JP/JP cc,a16.
    pub(super) fn jp<B: Bus>(&mut self, bus: &mut B, cond: bool) {
        let addr = self.fetch16(bus);
        if cond {
            self.regs.pc.set(addr);
        }
        self.branch_taken = cond;
    }

    /// Call helper used by CALL/CALL cc,a16.
    pub(super) fn call<B: Bus>(&mut self, bus: &mut B, cond: bool) {
        let addr = self.fetch16(bus);
        if cond {
            let ret = self.regs.pc.get();
            self.push_u16(bus, ret);
            self.regs.pc.set(addr);
        }
        self.branch_taken = cond;
    }

    /// Return helper used by RET/RET cc.
    pub(super) fn ret<B: Bus>(&mut self, bus: &mut B, cond: bool) {
        if cond {
            let addr = self.pop_u16(bus);
            self.regs.pc.set(addr);
        }
        self.branch_taken = cond;
    }
}
