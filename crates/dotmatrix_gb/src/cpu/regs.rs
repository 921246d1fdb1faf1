use crate::register::{DoubleRegister, PairRegister, Register};

/// Registers for the Game Boy CPU (LR35902).
///
/// The eight 8-bit registers are owned individually; AF/BC/DE/HL are
/// composed on demand through [`PairRegister`]. SP and PC are plain 16-bit
/// registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: Register,
    pub f: Register,
    pub b: Register,
    pub c: Register,
    pub d: Register,
    pub e: Register,
    pub h: Register,
    pub l: Register,
    pub sp: DoubleRegister,
    pub pc: DoubleRegister,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pair {
    AF,
    BC,
    DE,
    HL,
}

impl Registers {
    /// Borrow two 8-bit registers as one 16-bit register.
    ///
    /// Writes through the AF pair are not masked; use [`Registers::set_af`]
    /// when the value comes from outside the CPU.
    pub fn pair(&mut self, pair: Pair) -> PairRegister<'_> {
        match pair {
            Pair::AF => PairRegister::new(&mut self.a, &mut self.f),
            Pair::BC => PairRegister::new(&mut self.b, &mut self.c),
            Pair::DE => PairRegister::new(&mut self.d, &mut self.e),
            Pair::HL => PairRegister::new(&mut self.h, &mut self.l),
        }
    }

    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a.get(), self.f.get() & 0xF0])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        // Lower 4 bits of F are always zero.
        self.pair(Pair::AF).set(value & 0xFFF0);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b.get(), self.c.get()])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.pair(Pair::BC).set(value);
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d.get(), self.e.get()])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.pair(Pair::DE).set(value);
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h.get(), self.l.get()])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.pair(Pair::HL).set(value);
    }
}
