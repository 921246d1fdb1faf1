mod header;

use std::path::Path;

use anyhow::{bail, Context, Result};

pub use header::CartridgeHeader;
use header::{HEADER_END, LOGO_END, LOGO_START, NINTENDO_LOGO};

/// A flat ROM-only cartridge.
///
/// ROM is mapped at 0x0000..0x8000. There is no bank controller and no
/// external RAM: the RAM window reads 0xFF and every write is dropped.
#[derive(Clone, Debug)]
pub struct Cartridge {
    rom: Vec<u8>,
    header: CartridgeHeader,
}

impl Cartridge {
    pub fn from_bytes(rom: Vec<u8>) -> Result<Self> {
        if rom.len() < HEADER_END {
            bail!(
                "ROM image is {} bytes, shorter than the {HEADER_END:#06x}-byte header",
                rom.len()
            );
        }

        let header = CartridgeHeader::parse(&rom);
        log::info!(
            "GB cartridge: '{}' type=0x{:02X} rom={:?} ram={:?} checksum {}",
            header.title,
            header.cartridge_type,
            header.rom_size_bytes(),
            header.ram_size_bytes(),
            if header.header_checksum_valid() {
                "ok"
            } else {
                "BAD"
            },
        );
        if header.cartridge_type != 0x00 {
            log::warn!(
                "GB cartridge: type 0x{:02X} needs a bank controller; mapping the first 32 KiB flat",
                header.cartridge_type
            );
        }

        Ok(Self { rom, header })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rom = std::fs::read(path)
            .with_context(|| format!("failed to read ROM file '{}'", path.display()))?;
        Self::from_bytes(rom).with_context(|| format!("invalid ROM file '{}'", path.display()))
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    /// Check the 48-byte logo at 0x0104.
    pub fn validate_logo(&self) -> Result<()> {
        let logo = &self.rom[LOGO_START..LOGO_END];
        if let Some(offset) = logo.iter().zip(NINTENDO_LOGO).position(|(&a, b)| a != b) {
            let addr = LOGO_START + offset;
            log::warn!(
                "GB cartridge: logo mismatch at 0x{addr:04X} (found 0x{:02X}, expected 0x{:02X})",
                logo[offset],
                NINTENDO_LOGO[offset]
            );
            bail!("cartridge logo check failed at {addr:#06x}");
        }
        Ok(())
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.rom.get(addr as usize).copied().unwrap_or(0xFF),
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        log::trace!("GB cartridge: dropped write 0x{value:02X} -> 0x{addr:04X}");
    }
}
