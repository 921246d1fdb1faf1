use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dotmatrix::{parse_address, Output, RunInfo};
use dotmatrix_gb::GameBoyOptions;

/// DMG Game Boy emulator
#[derive(Parser, Debug)]
#[command(name = "dotmatrix")]
#[command(about = "A DMG Game Boy emulator with a terminal display and debugger", long_about = None)]
struct Args {
    /// Path to the ROM image
    rom: PathBuf,

    /// Number of frames to run; runs until interrupted when omitted
    #[arg(short, long)]
    frames: Option<u64>,

    /// Start at 0x0100 with the post-boot registers instead of running the boot ROM
    #[arg(long)]
    skip_boot: bool,

    /// Accept cartridges whose header logo does not match
    #[arg(long)]
    no_logo_check: bool,

    /// Record button presses to this file (JSON lines)
    #[arg(long, value_name = "FILE")]
    record: Option<PathBuf>,

    /// Replay button presses from a recording
    #[arg(long, value_name = "FILE", conflicts_with = "record")]
    replay: Option<PathBuf>,

    /// Where finished frames go
    #[arg(short, long, value_enum, default_value_t = Output::Terminal)]
    output: Output,

    /// File receiving raw frames with `--output raw`
    #[arg(long, value_name = "FILE", required_if_eq("output", "raw"))]
    dump: Option<PathBuf>,

    /// Start the interactive debugger instead of running freely
    #[arg(short, long)]
    debug: bool,

    /// Address breakpoint in hex; may be repeated. Implies --debug
    #[arg(short, long = "breakpoint", value_name = "ADDR", value_parser = parse_address)]
    breakpoints: Vec<u16>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut options = GameBoyOptions::builder()
        .skip_boot_rom(args.skip_boot)
        .validate_logo(!args.no_logo_check)
        .build();
    options.recording = args.record;
    options.replay = args.replay;

    let info = RunInfo::builder()
        .rom(args.rom)
        .frames(args.frames)
        .output(args.output)
        .dump(args.dump)
        .debug(args.debug)
        .breakpoints(args.breakpoints)
        .options(options)
        .build();

    dotmatrix::run(info)
}
