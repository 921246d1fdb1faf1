mod service;

/// Interrupt sources, numbered by their bit in IE ($FFFF) and IF ($FF0F).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    /// Highest priority first.
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    #[inline]
    pub fn bit(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn mask(self) -> u8 {
        1 << self.bit()
    }

    /// Fixed service routine address.
    #[inline]
    pub fn vector(self) -> u16 {
        0x0040 + (self as u16) * 8
    }

    pub fn from_bit(bit: u8) -> Option<Self> {
        Self::ALL.get(bit as usize).copied()
    }
}

/// The CPU's interrupt enable/flag register pair.
///
/// The memory bus routes $FFFF and $FF0F here; the display controller and
/// the joypad use [`InterruptRegisters::request`] to raise interrupts.
pub trait InterruptRegisters {
    fn interrupt_enable(&self) -> u8;
    fn set_interrupt_enable(&mut self, value: u8);
    fn interrupt_flag(&self) -> u8;
    fn set_interrupt_flag(&mut self, value: u8);

    fn request(&mut self, interrupt: Interrupt) {
        let flags = self.interrupt_flag();
        self.set_interrupt_flag(flags | interrupt.mask());
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interrupts {
    enable: u8,
    flag: u8,
}

impl Interrupts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InterruptRegisters for Interrupts {
    fn interrupt_enable(&self) -> u8 {
        self.enable
    }

    fn set_interrupt_enable(&mut self, value: u8) {
        self.enable = value;
    }

    fn interrupt_flag(&self) -> u8 {
        self.flag
    }

    fn set_interrupt_flag(&mut self, value: u8) {
        // Only the five interrupt lines are stored.
        self.flag = value & 0x1F;
    }
}
