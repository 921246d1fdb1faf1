/// Internal 256-byte boot image mapped over 0x0000..0x0100 until 0xFF50 is
/// written.
///
/// It clears VRAM, programs BGP and LCDC, loads the DMG post-boot register
/// values and unmaps itself with its last instruction at 0x00FE, so the CPU
/// falls through into the cartridge entry point at 0x0100.
#[rustfmt::skip]
pub const BOOT_ROM: [u8; 0x100] = {
    let mut rom = [0u8; 0x100];
    let program: [u8; 0x25] = [
        0x31, 0xFE, 0xFF, // 0x00 LD SP,$FFFE
        0xAF,             // 0x03 XOR A
        0x21, 0xFF, 0x9F, // 0x04 LD HL,$9FFF
        0x32,             // 0x07 LD (HL-),A
        0xCB, 0x7C,       // 0x08 BIT 7,H
        0x20, 0xFB,       // 0x0A JR NZ,$0007
        0x3E, 0xFC,       // 0x0C LD A,$FC
        0xE0, 0x47,       // 0x0E LDH ($47),A   BGP
        0x3E, 0x91,       // 0x10 LD A,$91
        0xE0, 0x40,       // 0x12 LDH ($40),A   LCDC
        0x01, 0xB0, 0x01, // 0x14 LD BC,$01B0
        0xC5,             // 0x17 PUSH BC
        0xF1,             // 0x18 POP AF
        0x01, 0x13, 0x00, // 0x19 LD BC,$0013
        0x11, 0xD8, 0x00, // 0x1C LD DE,$00D8
        0x21, 0x4D, 0x01, // 0x1F LD HL,$014D
        0xC3, 0xFE, 0x00, // 0x22 JP $00FE
    ];
    let mut i = 0;
    while i < program.len() {
        rom[i] = program[i];
        i += 1;
    }
    rom[0xFE] = 0xE0; // LDH ($50),A
    rom[0xFF] = 0x50;
    rom
};
