mod recording;
mod replay;

use serde::{Deserialize, Serialize};

use crate::cpu::InterruptRegisters;

pub use recording::{InputEvent, RecordingController};
pub use replay::{Recording, ReplayController};

/// DMG buttons. The discriminant is the bit in the pressed mask: the d-pad
/// occupies bits 0-3, the face and system buttons bits 4-7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Right = 0,
    Left = 1,
    Up = 2,
    Down = 3,
    A = 4,
    B = 5,
    Select = 6,
    Start = 7,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Right,
        Button::Left,
        Button::Up,
        Button::Down,
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
    ];

    #[inline]
    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// The P1 register ($FF00) and whatever feeds it.
pub trait Controller {
    /// Value read from $FF00.
    fn get_value(&self) -> u8;

    /// Value written to $FF00. Only the select lines (bits 4 and 5) stick.
    fn set_value(&mut self, value: u8);

    fn press(&mut self, button: Button);

    fn release(&mut self, button: Button);

    /// Called once per CPU instruction.
    fn tick(&mut self, _interrupts: &mut dyn InterruptRegisters) {}

    /// The failure that stopped an input recording, if any.
    fn error(&self) -> Option<&anyhow::Error> {
        None
    }
}

/// Live joypad state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Joypad {
    select: u8,
    pressed: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Joypad {
    pub fn new() -> Self {
        Self {
            // Neither group selected.
            select: 0x30,
            pressed: 0x00,
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed & button.mask() != 0
    }
}

impl Controller for Joypad {
    fn get_value(&self) -> u8 {
        // Bits 7-6 always read as 1 on DMG.
        let select = self.select & 0x30;

        // A pressed button is observed as 0.
        let mut low = 0x0F;
        if select & 0x10 == 0 {
            low &= !(self.pressed & 0x0F);
        }
        if select & 0x20 == 0 {
            low &= !(self.pressed >> 4);
        }
        0xC0 | select | (low & 0x0F)
    }

    fn set_value(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    fn press(&mut self, button: Button) {
        self.pressed |= button.mask();
    }

    fn release(&mut self, button: Button) {
        self.pressed &= !button.mask();
    }
}
