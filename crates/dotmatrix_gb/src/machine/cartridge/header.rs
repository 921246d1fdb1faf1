/// Scrolling logo every licensed cartridge carries at 0x0104..0x0134.
pub(super) const NINTENDO_LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

pub(super) const LOGO_START: usize = 0x0104;
pub(super) const LOGO_END: usize = LOGO_START + NINTENDO_LOGO.len();

const TITLE_START: usize = 0x0134;
const TITLE_END: usize = 0x0143;

/// First byte past the cartridge header.
pub(super) const HEADER_END: usize = 0x0150;

/// Metadata decoded from the cartridge header at 0x0134..0x0150.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cgb_flag: u8,
    pub sgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size: u8,
    pub ram_size: u8,
    pub destination: u8,
    pub old_licensee: u8,
    pub header_checksum: u8,
    computed_checksum: u8,
}

impl CartridgeHeader {
    /// Decode the header. `rom` must be at least [`HEADER_END`] bytes long.
    pub(super) fn parse(rom: &[u8]) -> Self {
        let title_bytes = &rom[TITLE_START..TITLE_END];
        let title_len = title_bytes
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);

        let computed_checksum = rom[0x0134..=0x014C]
            .iter()
            .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1));

        Self {
            title: String::from_utf8_lossy(&title_bytes[..title_len]).into_owned(),
            cgb_flag: rom[0x0143],
            sgb_flag: rom[0x0146],
            cartridge_type: rom[0x0147],
            rom_size: rom[0x0148],
            ram_size: rom[0x0149],
            destination: rom[0x014A],
            old_licensee: rom[0x014B],
            header_checksum: rom[0x014D],
            computed_checksum,
        }
    }

    /// Whether the stored header checksum matches the header bytes. The boot
    /// ROM of real hardware refuses to start a cartridge that fails this.
    pub fn header_checksum_valid(&self) -> bool {
        self.header_checksum == self.computed_checksum
    }

    /// ROM size in bytes, or `None` for an unknown size code.
    pub fn rom_size_bytes(&self) -> Option<usize> {
        match self.rom_size {
            code @ 0x00..=0x08 => Some(0x8000 << code),
            _ => None,
        }
    }

    /// External RAM size in bytes, or `None` for an unknown size code.
    pub fn ram_size_bytes(&self) -> Option<usize> {
        match self.ram_size {
            0x00 | 0x01 => Some(0),
            0x02 => Some(8 * 1024),
            0x03 => Some(32 * 1024),
            0x04 => Some(128 * 1024),
            0x05 => Some(64 * 1024),
            _ => None,
        }
    }
}
