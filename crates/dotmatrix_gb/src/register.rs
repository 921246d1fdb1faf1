//! Storage cells shared by the CPU and the display controller.
//!
//! `Register` and `DoubleRegister` own their value. `PairRegister` borrows two
//! 8-bit registers and presents them as one 16-bit value (AF, BC, DE, HL).
//! All arithmetic wraps.

macro_rules! storage_cell {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $bits:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name($ty);

        impl $name {
            pub const fn new(value: $ty) -> Self {
                Self(value)
            }

            #[inline]
            pub fn get(&self) -> $ty {
                self.0
            }

            #[inline]
            pub fn set(&mut self, value: $ty) {
                self.0 = value;
            }

            /// Bit `bit` of the value, 0 being the least significant.
            #[inline]
            pub fn get_bit(&self, bit: u8) -> bool {
                debug_assert!(u32::from(bit) < $bits);
                (self.0 >> bit) & 1 != 0
            }

            #[inline]
            pub fn set_bit(&mut self, bit: u8, value: bool) {
                debug_assert!(u32::from(bit) < $bits);
                if value {
                    self.0 |= 1 << bit;
                } else {
                    self.0 &= !(1 << bit);
                }
            }

            /// Pre-increment: returns the new value.
            #[inline]
            pub fn inc(&mut self) -> $ty {
                self.0 = self.0.wrapping_add(1);
                self.0
            }

            /// Pre-decrement: returns the new value.
            #[inline]
            pub fn dec(&mut self) -> $ty {
                self.0 = self.0.wrapping_sub(1);
                self.0
            }

            /// Post-increment: returns the value before the increment.
            #[inline]
            pub fn post_inc(&mut self) -> $ty {
                let old = self.0;
                self.0 = old.wrapping_add(1);
                old
            }

            /// Post-decrement: returns the value before the decrement.
            #[inline]
            pub fn post_dec(&mut self) -> $ty {
                let old = self.0;
                self.0 = old.wrapping_sub(1);
                old
            }
        }
    };
}

storage_cell!(
    /// An 8-bit register.
    Register,
    u8,
    8
);

storage_cell!(
    /// A standalone 16-bit register (SP, PC).
    DoubleRegister,
    u16,
    16
);

/// A 16-bit view over two borrowed 8-bit registers.
///
/// Bits 8-15 live in `high`, bits 0-7 in `low`.
#[derive(Debug)]
pub struct PairRegister<'a> {
    high: &'a mut Register,
    low: &'a mut Register,
}

impl<'a> PairRegister<'a> {
    pub fn new(high: &'a mut Register, low: &'a mut Register) -> Self {
        Self { high, low }
    }

    #[inline]
    pub fn get(&self) -> u16 {
        u16::from_be_bytes([self.high.get(), self.low.get()])
    }

    #[inline]
    pub fn set(&mut self, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.high.set(high);
        self.low.set(low);
    }

    #[inline]
    pub fn get_high(&self) -> u8 {
        self.high.get()
    }

    #[inline]
    pub fn get_low(&self) -> u8 {
        self.low.get()
    }

    pub fn get_bit(&self, bit: u8) -> bool {
        debug_assert!(bit < 16);
        if bit >= 8 {
            self.high.get_bit(bit - 8)
        } else {
            self.low.get_bit(bit)
        }
    }

    pub fn set_bit(&mut self, bit: u8, value: bool) {
        debug_assert!(bit < 16);
        if bit >= 8 {
            self.high.set_bit(bit - 8, value);
        } else {
            self.low.set_bit(bit, value);
        }
    }

    pub fn inc(&mut self) -> u16 {
        let value = self.get().wrapping_add(1);
        self.set(value);
        value
    }

    pub fn dec(&mut self) -> u16 {
        let value = self.get().wrapping_sub(1);
        self.set(value);
        value
    }

    pub fn post_inc(&mut self) -> u16 {
        let old = self.get();
        self.set(old.wrapping_add(1));
        old
    }

    pub fn post_dec(&mut self) -> u16 {
        let old = self.get();
        self.set(old.wrapping_sub(1));
        old
    }
}
