use super::interrupts::Interrupt;
use super::timing::{BASE_CYCLES, BRANCH_TAKEN_CYCLES, CB_CYCLES};
use super::{Bus, Cpu, IDLE_CYCLES};

impl Cpu {
    /// Execute a single instruction, or enter a single interrupt, and return
    /// the number of T-cycles taken.
    ///
    /// A locked CPU returns 0. HALT and STOP return [`IDLE_CYCLES`] without
    /// touching any other state.
    pub fn tick<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.locked {
            return 0;
        }

        if self.stopped {
            // STOP is left once a joypad interrupt has been requested. The
            // interrupt itself is then serviced as usual if enabled.
            if bus.read8(0xFF0F) & Interrupt::Joypad.mask() == 0 {
                return IDLE_CYCLES;
            }
            self.stopped = false;
        }

        if self.halted && self.pending_interrupts(bus) == 0 {
            return IDLE_CYCLES;
        }

        if let Some(cycles) = self.handle_interrupts(bus) {
            return cycles;
        }

        let cycles = self.execute_next(bus);
        self.apply_ime_delay();
        cycles
    }

    fn execute_next<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.branch_taken = false;

        let opcode = self.fetch8(bus);
        if opcode == 0xCB {
            let cb = self.fetch8(bus);
            self.exec_cb(bus, cb);
            return u32::from(CB_CYCLES[cb as usize]);
        }

        self.exec_opcode(bus, opcode);
        if self.locked {
            return 0;
        }

        let table = if self.branch_taken {
            &BRANCH_TAKEN_CYCLES
        } else {
            &BASE_CYCLES
        };
        u32::from(table[opcode as usize])
    }
}
