//! Per-opcode T-cycle costs.
//!
//! Conditional JR/JP/CALL/RET have two costs: `BASE_CYCLES` holds the
//! not-taken cost, `BRANCH_TAKEN_CYCLES` the taken one. Opcode holes cost 0.

#[rustfmt::skip]
pub(super) const BASE_CYCLES: [u8; 256] = [
//  x0  x1  x2  x3  x4  x5  x6  x7  x8  x9  xA  xB  xC  xD  xE  xF
     4, 12,  8,  8,  4,  4,  8,  4, 20,  8,  8,  8,  4,  4,  8,  4, // 0x
     4, 12,  8,  8,  4,  4,  8,  4, 12,  8,  8,  8,  4,  4,  8,  4, // 1x
     8, 12,  8,  8,  4,  4,  8,  4,  8,  8,  8,  8,  4,  4,  8,  4, // 2x
     8, 12,  8,  8, 12, 12, 12,  4,  8,  8,  8,  8,  4,  4,  8,  4, // 3x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 4x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 5x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 6x
     8,  8,  8,  8,  8,  8,  4,  8,  4,  4,  4,  4,  4,  4,  8,  4, // 7x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 8x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 9x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // Ax
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // Bx
     8, 12, 12, 16, 12, 16,  8, 16,  8, 16, 12,  4, 12, 24,  8, 16, // Cx
     8, 12, 12,  0, 12, 16,  8, 16,  8, 16, 12,  0, 12,  0,  8, 16, // Dx
    12, 12,  8,  0,  0, 16,  8, 16, 16,  4, 16,  0,  0,  0,  8, 16, // Ex
    12, 12,  8,  4,  0, 16,  8, 16, 12,  8, 16,  4,  0,  0,  8, 16, // Fx
];

pub(super) const BRANCH_TAKEN_CYCLES: [u8; 256] = branch_taken_table();

pub(super) const CB_CYCLES: [u8; 256] = cb_table();

const fn branch_taken_table() -> [u8; 256] {
    let mut table = BASE_CYCLES;
    // JR cc, r8
    table[0x20] = 12;
    table[0x28] = 12;
    table[0x30] = 12;
    table[0x38] = 12;
    // RET cc
    table[0xC0] = 20;
    table[0xC8] = 20;
    table[0xD0] = 20;
    table[0xD8] = 20;
    // JP cc, a16
    table[0xC2] = 16;
    table[0xCA] = 16;
    table[0xD2] = 16;
    table[0xDA] = 16;
    // CALL cc, a16
    table[0xC4] = 24;
    table[0xCC] = 24;
    table[0xD4] = 24;
    table[0xDC] = 24;
    table
}

/// Costs include the 0xCB prefix fetch: 8 for registers, 16 for (HL),
/// 12 for BIT b,(HL) which does not write back.
const fn cb_table() -> [u8; 256] {
    let mut table = [8u8; 256];
    let mut op = 0;
    while op < 256 {
        if op & 0x07 == 6 {
            table[op] = if op >> 6 == 1 { 12 } else { 16 };
        }
        op += 1;
    }
    table
}
