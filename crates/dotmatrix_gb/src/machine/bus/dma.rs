use super::MemoryBus;

const OAM_START: u16 = 0xFE00;
const OAM_LEN: u16 = 0xA0;

impl MemoryBus<'_> {
    /// OAM DMA: copy 160 bytes from `XX00..XX9F` to `FE00..FE9F`.
    ///
    /// The transfer is instantaneous; the 160 M-cycle duration and the
    /// CPU's restricted bus access during it are not modelled.
    pub(super) fn oam_dma(&mut self, value: u8) {
        let base = u16::from(value) << 8;
        log::debug!("GB BUS: OAM DMA from 0x{base:04X}");
        for i in 0..OAM_LEN {
            let byte = self.read(base.wrapping_add(i));
            self.memory.memory[(OAM_START + i) as usize] = byte;
        }
    }
}
