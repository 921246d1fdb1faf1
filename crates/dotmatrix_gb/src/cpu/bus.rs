/// Abstraction over the Game Boy bus (memory and IO) as seen by the CPU.
///
/// Reads and writes always succeed; the implementation decides what an
/// unmapped or write-only address returns.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

