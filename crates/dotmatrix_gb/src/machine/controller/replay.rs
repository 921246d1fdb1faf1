use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use super::{Button, Controller, InputEvent, Joypad};
use crate::cpu::{Interrupt, InterruptRegisters};

/// Input events loaded from a recording, ordered by tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recording {
    events: Vec<InputEvent>,
}

impl Recording {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open recording '{}'", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid recording '{}'", path.display()))
    }

    /// Parse one JSON event per line. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut events = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event: InputEvent = serde_json::from_str(&line)
                .with_context(|| format!("line {}: malformed input event", index + 1))?;
            events.push(event);
        }
        // Stable, so events recorded on the same tick keep their order.
        events.sort_by_key(|event| event.frame);
        Ok(Self { events })
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A joypad driven by a [`Recording`].
///
/// Each tick advances the counter, then applies every event whose `frame`
/// has been reached. Events at frame 0 happened before the first
/// instruction, so the owner applies them up front with
/// [`ReplayController::apply_due`]. Live presses still go through.
#[derive(Clone, Debug)]
pub struct ReplayController {
    joypad: Joypad,
    events: VecDeque<InputEvent>,
    ticks: u64,
}

impl ReplayController {
    pub fn new(recording: Recording) -> Self {
        Self {
            joypad: Joypad::new(),
            events: recording.events.into(),
            ticks: 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Events not yet applied.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// Apply every event whose `frame` is at or before the current tick.
    pub fn apply_due(&mut self, interrupts: &mut dyn InterruptRegisters) {
        while let Some(event) = self.events.front().copied() {
            if event.frame > self.ticks {
                break;
            }
            self.events.pop_front();
            log::debug!("GB input: replaying {event:?}");
            if event.pressed {
                self.joypad.press(event.button);
                interrupts.request(Interrupt::Joypad);
            } else {
                self.joypad.release(event.button);
            }
        }
    }
}

impl Controller for ReplayController {
    fn get_value(&self) -> u8 {
        self.joypad.get_value()
    }

    fn set_value(&mut self, value: u8) {
        self.joypad.set_value(value);
    }

    fn press(&mut self, button: Button) {
        self.joypad.press(button);
    }

    fn release(&mut self, button: Button) {
        self.joypad.release(button);
    }

    fn tick(&mut self, interrupts: &mut dyn InterruptRegisters) {
        self.ticks += 1;
        self.apply_due(interrupts);
    }
}
