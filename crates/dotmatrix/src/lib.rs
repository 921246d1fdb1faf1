pub mod shell;
pub mod sink;

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use dotmatrix_gb::{Cartridge, Debugger, GameBoy, GameBoyOptions};
use typed_builder::TypedBuilder;

pub use shell::{Command, Shell};
pub use sink::{RawDumpSink, TerminalSink};

/// Frame destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Output {
    /// Draw into the terminal with ANSI half blocks.
    Terminal,
    /// Append 160x144 shade bytes per frame to the dump file.
    Raw,
    /// Discard frames.
    None,
}

#[derive(Debug, TypedBuilder)]
pub struct RunInfo {
    pub rom: PathBuf,
    #[builder(default)]
    pub frames: Option<u64>,
    #[builder(default = Output::Terminal)]
    pub output: Output,
    #[builder(default)]
    pub dump: Option<PathBuf>,
    #[builder(default)]
    pub debug: bool,
    #[builder(default)]
    pub breakpoints: Vec<u16>,
    #[builder(default)]
    pub options: GameBoyOptions,
}

pub fn run(info: RunInfo) -> Result<()> {
    let cartridge = Cartridge::from_path(&info.rom)?;
    log::info!("Playing ROM path: '{}'", info.rom.display());

    let sink = sink::open(info.output, info.dump.as_deref())?;
    let gameboy = GameBoy::with_sink(cartridge, info.options, sink)?;

    if info.debug || !info.breakpoints.is_empty() {
        let mut debugger = Debugger::new(gameboy);
        for addr in info.breakpoints {
            debugger.set_breakpoint(addr);
        }
        let mut shell = Shell::new(debugger, io::stdout().lock());
        return shell.run(io::stdin().lock());
    }

    run_frames(gameboy, info.frames)
}

/// Run `frames` frames, or forever.
pub fn run_frames(mut gameboy: GameBoy, frames: Option<u64>) -> Result<()> {
    while frames.map_or(true, |limit| gameboy.frames() < limit) {
        gameboy
            .run_frame()
            .with_context(|| format!("emulation stopped during frame {}", gameboy.frames()))?;
        if let Some(err) = gameboy.input_error() {
            bail!("input recording stopped: {err:#}");
        }
    }

    log::info!(
        "Ran {} frames ({} instructions, {} cycles)",
        gameboy.frames(),
        gameboy.ticks(),
        gameboy.cycles()
    );
    Ok(())
}

/// Parse a hexadecimal address, with or without a `0x` or `$` prefix.
pub fn parse_address(text: &str) -> Result<u16> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'))
        .unwrap_or(text);
    if digits.is_empty() {
        bail!("empty address");
    }
    u16::from_str_radix(digits, 16).with_context(|| format!("invalid address '{text}'"))
}
