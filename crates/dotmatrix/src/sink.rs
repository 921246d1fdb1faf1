use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use dotmatrix_gb::machine::NullSink;
use dotmatrix_gb::{Shade, VideoBuffer, VideoSink, SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::Output;

/// Build the sink selected on the command line.
pub fn open(output: Output, dump: Option<&Path>) -> Result<Box<dyn VideoSink>> {
    Ok(match output {
        Output::Terminal => Box::new(TerminalSink::new(io::stdout())),
        Output::Raw => {
            let path = dump.context("--output raw needs a --dump file")?;
            Box::new(RawDumpSink::create(path)?)
        }
        Output::None => Box::new(NullSink),
    })
}

/// Simple DMG-style grayscale: 0=white, 3=black.
fn gray(shade: Shade) -> u8 {
    match shade {
        Shade::White => 0xFF,
        Shade::LightGray => 0xAA,
        Shade::DarkGray => 0x55,
        Shade::Black => 0x00,
    }
}

/// Draws each frame in place with `▀`, two pixel rows per text row: the
/// foreground colour is the upper pixel, the background the lower one.
pub struct TerminalSink<W: Write> {
    out: W,
    cleared: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cleared: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, frame: &VideoBuffer) -> io::Result<()> {
        let mut text = String::with_capacity(SCREEN_WIDTH * SCREEN_HEIGHT * 20);
        if !self.cleared {
            text.push_str("\x1b[2J");
            self.cleared = true;
        }
        text.push_str("\x1b[H");

        for y in (0..SCREEN_HEIGHT).step_by(2) {
            let mut last = None;
            for x in 0..SCREEN_WIDTH {
                let colors = (gray(frame.get(x, y)), gray(frame.get(x, y + 1)));
                if last != Some(colors) {
                    let (top, bottom) = colors;
                    text.push_str(&format!(
                        "\x1b[38;2;{top};{top};{top}m\x1b[48;2;{bottom};{bottom};{bottom}m"
                    ));
                    last = Some(colors);
                }
                text.push('▀');
            }
            text.push_str("\x1b[0m\n");
        }

        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> VideoSink for TerminalSink<W> {
    fn paint(&mut self, frame: &VideoBuffer) {
        if let Err(err) = self.draw(frame) {
            log::error!("Terminal output failed: {err}");
        }
    }
}

/// Appends every frame as 160x144 bytes, one shade index (0-3) per pixel,
/// row-major.
pub struct RawDumpSink<W: Write> {
    out: W,
    frames: u64,
}

impl RawDumpSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create dump file '{}'", path.display()))?;
        log::info!("Dumping frames to '{}'", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RawDumpSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, frame: &VideoBuffer) -> io::Result<()> {
        let bytes: Vec<u8> = frame.pixels().iter().map(|shade| shade.bits()).collect();
        self.out.write_all(&bytes)?;
        self.out.flush()
    }
}

impl<W: Write> VideoSink for RawDumpSink<W> {
    fn paint(&mut self, frame: &VideoBuffer) {
        match self.write_frame(frame) {
            Ok(()) => self.frames += 1,
            Err(err) => log::error!("Frame dump failed after {} frames: {err}", self.frames),
        }
    }
}
