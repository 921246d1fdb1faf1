use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{Button, Controller, Joypad};
use crate::cpu::InterruptRegisters;

/// One line of an input recording.
///
/// `frame` is the number of controller ticks (CPU instructions) that had
/// elapsed when the button changed state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub frame: u64,
    pub button: Button,
    pub pressed: bool,
}

/// A joypad that logs every press and release as a JSON line.
///
/// The first write failure is kept and ends the recording; the joypad keeps
/// working.
pub struct RecordingController<W: Write> {
    joypad: Joypad,
    writer: W,
    ticks: u64,
    error: Option<anyhow::Error>,
}

impl RecordingController<BufWriter<File>> {
    /// Record into a new file at `path`, truncating any existing one.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create recording '{}'", path.display()))?;
        log::info!("GB input: recording to '{}'", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RecordingController<W> {
    pub fn new(writer: W) -> Self {
        Self {
            joypad: Joypad::new(),
            writer,
            ticks: 0,
            error: None,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn record(&mut self, button: Button, pressed: bool) {
        let event = InputEvent {
            frame: self.ticks,
            button,
            pressed,
        };
        log::debug!("GB input: {event:?}");
        if self.error.is_some() {
            return;
        }

        if let Err(err) = self.write_event(&event) {
            log::error!("GB input: failed to record {event:?}, recording stopped: {err:#}");
            let ticks = self.ticks;
            self.error = Some(err.context(format!("failed to record input at tick {ticks}")));
        }
    }

    fn write_event(&mut self, event: &InputEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Controller for RecordingController<W> {
    fn get_value(&self) -> u8 {
        self.joypad.get_value()
    }

    fn set_value(&mut self, value: u8) {
        self.joypad.set_value(value);
    }

    fn press(&mut self, button: Button) {
        self.record(button, true);
        self.joypad.press(button);
    }

    fn release(&mut self, button: Button) {
        self.record(button, false);
        self.joypad.release(button);
    }

    fn tick(&mut self, _interrupts: &mut dyn InterruptRegisters) {
        self.ticks += 1;
    }

    fn error(&self) -> Option<&anyhow::Error> {
        self.error.as_ref()
    }
}
