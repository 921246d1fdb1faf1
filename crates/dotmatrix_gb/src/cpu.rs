mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;
mod timing;

pub use bus::Bus;
pub use interrupts::{Interrupt, InterruptRegisters, Interrupts};
pub use regs::{Pair, Registers};

/// Flag bits in the F register.
///
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

/// Cycles reported for every tick spent in HALT or STOP.
pub const IDLE_CYCLES: u32 = 4;

/// Game Boy CPU (LR35902).
///
/// Executes one instruction (or one interrupt entry) per `tick` and reports
/// the T-cycles it consumed. All memory traffic, including the interrupt
/// enable/flag registers, goes through a [`Bus`].
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable.
    pub ime: bool,
    pub halted: bool,
    /// STOP low-power state, left when a joypad interrupt is requested.
    stopped: bool,
    ime_enable_pending: bool,
    ime_enable_delay: bool,
    /// Set after executing one of the opcode holes; the CPU stays dead and
    /// `tick` returns 0 until reset.
    locked: bool,
    /// Whether the last conditional JR/JP/CALL/RET took its branch. Selects
    /// the branch-taken cycle table.
    branch_taken: bool,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        self.regs.f.get_bit(flag as u8)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.regs.f.set_bit(flag as u8, value);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f.set(0);
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
