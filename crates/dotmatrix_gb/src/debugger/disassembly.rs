use std::borrow::Cow;
use std::fmt;

/// Operand registers in opcode encoding order (bits 2-0 / 5-3).
const OPERANDS: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];

const ALU_OPS: [&str; 8] = [
    "ADD A,", "ADC A,", "SUB ", "SBC A,", "AND ", "XOR ", "OR ", "CP ",
];

const CB_SHIFTS: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SWAP", "SRL"];

const CB_BITS: [&str; 3] = ["BIT", "RES", "SET"];

/// 0x00..0x3F. Immediates are written as `d8`/`a8`/`r8` (one byte) and
/// `d16`/`a16` (two bytes).
#[rustfmt::skip]
const LOW_OPCODES: [&str; 0x40] = [
    "NOP",        "LD BC,d16", "LD (BC),A",  "INC BC", "INC B",    "DEC B",    "LD B,d8",    "RLCA",
    "LD (a16),SP", "ADD HL,BC", "LD A,(BC)",  "DEC BC", "INC C",    "DEC C",    "LD C,d8",    "RRCA",
    "STOP d8",    "LD DE,d16", "LD (DE),A",  "INC DE", "INC D",    "DEC D",    "LD D,d8",    "RLA",
    "JR r8",      "ADD HL,DE", "LD A,(DE)",  "DEC DE", "INC E",    "DEC E",    "LD E,d8",    "RRA",
    "JR NZ,r8",   "LD HL,d16", "LD (HL+),A", "INC HL", "INC H",    "DEC H",    "LD H,d8",    "DAA",
    "JR Z,r8",    "ADD HL,HL", "LD A,(HL+)", "DEC HL", "INC L",    "DEC L",    "LD L,d8",    "CPL",
    "JR NC,r8",   "LD SP,d16", "LD (HL-),A", "INC SP", "INC (HL)", "DEC (HL)", "LD (HL),d8", "SCF",
    "JR C,r8",    "ADD HL,SP", "LD A,(HL-)", "DEC SP", "INC A",    "DEC A",    "LD A,d8",    "CCF",
];

/// 0xC0..0xFF. `None` marks the opcode holes.
#[rustfmt::skip]
const HIGH_OPCODES: [Option<&str>; 0x40] = [
    Some("RET NZ"),      Some("POP BC"), Some("JP NZ,a16"), Some("JP a16"),
    Some("CALL NZ,a16"), Some("PUSH BC"), Some("ADD A,d8"), Some("RST 00H"),
    Some("RET Z"),       Some("RET"),     Some("JP Z,a16"),  Some("PREFIX CB"),
    Some("CALL Z,a16"),  Some("CALL a16"), Some("ADC A,d8"), Some("RST 08H"),
    Some("RET NC"),      Some("POP DE"), Some("JP NC,a16"), None,
    Some("CALL NC,a16"), Some("PUSH DE"), Some("SUB d8"),   Some("RST 10H"),
    Some("RET C"),       Some("RETI"),    Some("JP C,a16"),  None,
    Some("CALL C,a16"),  None,            Some("SBC A,d8"), Some("RST 18H"),
    Some("LDH (a8),A"),  Some("POP HL"), Some("LD (C),A"),  None,
    None,                Some("PUSH HL"), Some("AND d8"),   Some("RST 20H"),
    Some("ADD SP,r8"),   Some("JP (HL)"), Some("LD (a16),A"), None,
    None,                None,            Some("XOR d8"),   Some("RST 28H"),
    Some("LDH A,(a8)"),  Some("POP AF"), Some("LD A,(C)"),  Some("DI"),
    None,                Some("PUSH AF"), Some("OR d8"),    Some("RST 30H"),
    Some("LD HL,SP+r8"), Some("LD SP,HL"), Some("LD A,(a16)"), Some("EI"),
    None,                None,            Some("CP d8"),    Some("RST 38H"),
];

/// One disassembled instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionLine {
    pub address: u16,
    /// Mnemonic with the immediate substituted, e.g. `LD A,$05`.
    pub mnemonic: String,
    /// The decoded immediate. For relative jumps this is the target address.
    pub operand: Option<u16>,
    /// Instruction length in bytes (1-3).
    pub length: u8,
    bytes: [u8; 3],
}

impl InstructionLine {
    /// Decode the instruction starting at `address` from its first three
    /// bytes. Bytes past the instruction's length are ignored.
    pub fn decode(address: u16, bytes: [u8; 3]) -> Self {
        let opcode = bytes[0];

        if opcode == 0xCB {
            return Self {
                address,
                mnemonic: cb_mnemonic(bytes[1]),
                operand: None,
                length: 2,
                bytes,
            };
        }

        let Some(template) = opcode_template(opcode) else {
            return Self {
                address,
                mnemonic: format!("DB ${opcode:02X}"),
                operand: None,
                length: 1,
                bytes,
            };
        };

        let imm8 = bytes[1];
        let imm16 = u16::from_le_bytes([bytes[1], bytes[2]]);
        let (mnemonic, operand, length) = if let Some(at) = find_any(&template, &["d16", "a16"]) {
            (
                splice(&template, at, 3, &format!("${imm16:04X}")),
                Some(imm16),
                3,
            )
        } else if let Some(at) = find_any(&template, &["d8", "a8"]) {
            (
                splice(&template, at, 2, &format!("${imm8:02X}")),
                Some(u16::from(imm8)),
                2,
            )
        } else if let Some(at) = template.find("r8") {
            if template.starts_with("JR") {
                let target = address.wrapping_add(2).wrapping_add_signed(i16::from(imm8 as i8));
                (
                    splice(&template, at, 2, &format!("${target:04X}")),
                    Some(target),
                    2,
                )
            } else {
                // ADD SP,r8 and LD HL,SP+r8 print the signed offset.
                let (at, len) = if template[..at].ends_with('+') {
                    (at - 1, 3)
                } else {
                    (at, 2)
                };
                (
                    splice(&template, at, len, &signed_hex(imm8)),
                    Some(u16::from(imm8)),
                    2,
                )
            }
        } else {
            (template.into_owned(), None, 1)
        };

        Self {
            address,
            mnemonic,
            operand,
            length,
            bytes,
        }
    }

    /// The raw bytes of this instruction.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.length as usize]
    }

    /// Address of the following instruction.
    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(u16::from(self.length))
    }
}

impl fmt::Display for InstructionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self
            .bytes()
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{:04X}: {hex:<9}{}", self.address, self.mnemonic)
    }
}

/// Mnemonic template for a non-CB opcode, `None` for the holes.
fn opcode_template(opcode: u8) -> Option<Cow<'static, str>> {
    match opcode {
        0x00..=0x3F => Some(Cow::Borrowed(LOW_OPCODES[opcode as usize])),
        0x76 => Some(Cow::Borrowed("HALT")),
        0x40..=0x7F => Some(Cow::Owned(format!(
            "LD {},{}",
            OPERANDS[((opcode >> 3) & 7) as usize],
            OPERANDS[(opcode & 7) as usize]
        ))),
        0x80..=0xBF => Some(Cow::Owned(format!(
            "{}{}",
            ALU_OPS[((opcode >> 3) & 7) as usize],
            OPERANDS[(opcode & 7) as usize]
        ))),
        0xC0..=0xFF => HIGH_OPCODES[(opcode - 0xC0) as usize].map(Cow::Borrowed),
    }
}

fn cb_mnemonic(op: u8) -> String {
    let target = OPERANDS[(op & 7) as usize];
    match op >> 6 {
        0 => format!("{} {target}", CB_SHIFTS[(op >> 3) as usize]),
        group => format!(
            "{} {},{target}",
            CB_BITS[(group - 1) as usize],
            (op >> 3) & 7
        ),
    }
}

fn find_any(template: &str, needles: &[&str]) -> Option<usize> {
    needles.iter().find_map(|needle| template.find(needle))
}

fn splice(template: &str, at: usize, len: usize, with: &str) -> String {
    format!("{}{with}{}", &template[..at], &template[at + len..])
}

fn signed_hex(value: u8) -> String {
    let offset = value as i8;
    if offset < 0 {
        format!("-${:02X}", offset.unsigned_abs())
    } else {
        format!("+${offset:02X}")
    }
}
