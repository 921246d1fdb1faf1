use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// One of the four DMG grey levels, 0 being the lightest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Shade {
    #[default]
    White = 0,
    LightGray = 1,
    DarkGray = 2,
    Black = 3,
}

impl Shade {
    /// Shade for a 2-bit value; higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Shade::White,
            1 => Shade::LightGray,
            2 => Shade::DarkGray,
            _ => Shade::Black,
        }
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// A complete 160x144 frame of shades, stored row-major.
///
/// The display controller rewrites it line by line and hands it to a
/// [`VideoSink`] once per frame. It never changes size.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoBuffer {
    pixels: Box<[Shade]>,
}

impl Default for VideoBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VideoBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoBuffer")
            .field("width", &SCREEN_WIDTH)
            .field("height", &SCREEN_HEIGHT)
            .finish_non_exhaustive()
    }
}

impl VideoBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![Shade::White; SCREEN_WIDTH * SCREEN_HEIGHT].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Shade {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, shade: Shade) {
        self.pixels[y * SCREEN_WIDTH + x] = shade;
    }

    pub fn row(&self, y: usize) -> &[Shade] {
        &self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [Shade] {
        &mut self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub fn pixels(&self) -> &[Shade] {
        &self.pixels
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Shade::White);
    }
}

/// Consumer of finished frames.
pub trait VideoSink {
    /// Called exactly once per 154-line frame with the complete buffer.
    fn paint(&mut self, frame: &VideoBuffer);
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl VideoSink for NullSink {
    fn paint(&mut self, _frame: &VideoBuffer) {}
}

/// Counts painted frames and keeps a copy of the most recent one.
#[derive(Clone, Debug, Default)]
pub struct FrameCounter {
    frames: u64,
    last: VideoBuffer,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> &VideoBuffer {
        &self.last
    }
}

impl VideoSink for FrameCounter {
    fn paint(&mut self, frame: &VideoBuffer) {
        self.frames += 1;
        self.last.clone_from(frame);
    }
}
