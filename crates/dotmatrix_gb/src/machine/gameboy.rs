use std::path::PathBuf;

use anyhow::{bail, Result};
use typed_builder::TypedBuilder;

use crate::cpu::{Cpu, Interrupt, InterruptRegisters, Interrupts, Registers};

use super::bus::Memory;
use super::cartridge::Cartridge;
use super::controller::{
    Button, Controller, Joypad, Recording, RecordingController, ReplayController,
};
use super::gpu::Gpu;
use super::video::{NullSink, VideoSink};

/// Machine configuration.
#[derive(Clone, Debug, TypedBuilder)]
pub struct GameBoyOptions {
    /// Start at 0x0100 with the post-boot register state instead of running
    /// the internal boot ROM.
    #[builder(default = false)]
    pub skip_boot_rom: bool,
    /// Reject cartridges whose header logo is not the Nintendo logo.
    #[builder(default = true)]
    pub validate_logo: bool,
    /// Record every button press and release to this file.
    #[builder(default, setter(into, strip_option))]
    pub recording: Option<PathBuf>,
    /// Drive the joypad from a previously recorded file.
    #[builder(default, setter(into, strip_option))]
    pub replay: Option<PathBuf>,
}

impl Default for GameBoyOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// High-level DMG machine.
///
/// Owns the CPU, its interrupt registers, the display controller, the
/// memory (with the cartridge and the controller) and the video sink. Each
/// [`GameBoy::tick`] wires them together for a single instruction.
pub struct GameBoy {
    cpu: Cpu,
    interrupts: Interrupts,
    gpu: Gpu,
    memory: Memory,
    sink: Box<dyn VideoSink>,
    ticks: u64,
    cycles: u64,
}

impl GameBoy {
    /// Build a machine whose frames are discarded.
    pub fn new(cartridge: Cartridge, options: GameBoyOptions) -> Result<Self> {
        Self::with_sink(cartridge, options, Box::new(NullSink))
    }

    pub fn with_sink(
        cartridge: Cartridge,
        options: GameBoyOptions,
        sink: Box<dyn VideoSink>,
    ) -> Result<Self> {
        if options.validate_logo {
            cartridge.validate_logo()?;
        }

        let mut interrupts = Interrupts::new();
        let controller: Box<dyn Controller> = match (&options.recording, &options.replay) {
            (Some(_), Some(_)) => bail!("cannot record and replay input at the same time"),
            (Some(path), None) => Box::new(RecordingController::create(path)?),
            (None, Some(path)) => {
                let recording = Recording::load(path)?;
                log::info!(
                    "GB input: replaying {} events from '{}'",
                    recording.len(),
                    path.display()
                );
                let mut replay = ReplayController::new(recording);
                replay.apply_due(&mut interrupts);
                Box::new(replay)
            }
            (None, None) => Box::new(Joypad::new()),
        };

        let mut gameboy = Self {
            cpu: Cpu::new(),
            interrupts,
            gpu: Gpu::new(),
            memory: Memory::new(cartridge, controller),
            sink,
            ticks: 0,
            cycles: 0,
        };
        if options.skip_boot_rom {
            gameboy.cpu.apply_post_boot_state();
            gameboy.gpu.apply_post_boot_state();
            gameboy.memory.disable_boot_rom();
        }
        Ok(gameboy)
    }

    /// Execute one instruction (or interrupt entry), clock the display
    /// controller with its cycles and tick the controller.
    ///
    /// Returns the T-cycles consumed. A CPU that hit an illegal opcode is an
    /// error.
    pub fn tick(&mut self) -> Result<u32> {
        let cycles = {
            let mut bus = self.memory.bind(&mut self.interrupts, &mut self.gpu);
            self.cpu.tick(&mut bus)
        };
        if self.cpu.is_locked() {
            bail!(
                "CPU locked by an illegal opcode at 0x{:04X}",
                self.cpu.regs.pc.get().wrapping_sub(1)
            );
        }

        self.gpu
            .tick(cycles, &self.memory, &mut self.interrupts, self.sink.as_mut());
        self.memory.controller_mut().tick(&mut self.interrupts);

        self.ticks += 1;
        self.cycles += u64::from(cycles);
        Ok(cycles)
    }

    /// Tick until the display controller delivers the next frame.
    pub fn run_frame(&mut self) -> Result<()> {
        let frame = self.gpu.frames();
        while self.gpu.frames() == frame {
            self.tick()?;
        }
        Ok(())
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn registers(&self) -> &Registers {
        &self.cpu.regs
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn interrupts(&self) -> &Interrupts {
        &self.interrupts
    }

    /// Read through the bus decode, as the CPU would.
    pub fn read(&mut self, addr: u16) -> u8 {
        self.memory
            .bind(&mut self.interrupts, &mut self.gpu)
            .read(addr)
    }

    /// Write through the bus decode, as the CPU would.
    pub fn write(&mut self, addr: u16, value: u8) {
        self.memory
            .bind(&mut self.interrupts, &mut self.gpu)
            .write(addr, value);
    }

    pub fn press(&mut self, button: Button) {
        self.memory.controller_mut().press(button);
        self.interrupts.request(Interrupt::Joypad);
    }

    pub fn release(&mut self, button: Button) {
        self.memory.controller_mut().release(button);
    }

    /// Why input recording stopped, if it did.
    pub fn input_error(&self) -> Option<&anyhow::Error> {
        self.memory.controller().error()
    }

    pub fn frames(&self) -> u64 {
        self.gpu.frames()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
