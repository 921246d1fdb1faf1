use super::*;
use crate::machine::{Cartridge, GameBoyOptions};

/// A machine past the boot ROM whose entry point jumps to `program` at
/// 0x0150.
fn debugger(program: &[u8]) -> Debugger {
    let mut rom = vec![0u8; 0x8000];
    rom[0x100..0x104].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
    rom[0x150..0x150 + program.len()].copy_from_slice(program);

    let options = GameBoyOptions::builder()
        .skip_boot_rom(true)
        .validate_logo(false)
        .build();
    let cartridge = Cartridge::from_bytes(rom).unwrap();
    Debugger::new(GameBoy::new(cartridge, options).unwrap())
}

fn line(bytes: &[u8]) -> InstructionLine {
    let mut raw = [0u8; 3];
    raw[..bytes.len()].copy_from_slice(bytes);
    InstructionLine::decode(0x0150, raw)
}

#[test]
fn breakpoint_sets_report_changes() {
    let mut dbg = debugger(&[]);
    assert!(dbg.set_breakpoint(0x0200));
    assert!(dbg.set_breakpoint(0x0150));
    assert!(!dbg.set_breakpoint(0x0200));
    assert!(dbg.set_tick_breakpoint(10));
    assert!(!dbg.set_tick_breakpoint(10));
    assert!(dbg.set_cycle_breakpoint(99));

    assert_eq!(
        dbg.breakpoints().iter().copied().collect::<Vec<_>>(),
        [0x0150, 0x0200]
    );

    assert!(dbg.remove_breakpoint(0x0200));
    assert!(!dbg.remove_breakpoint(0x0200));
    assert!(dbg.remove_tick_breakpoint(10));
    assert!(!dbg.remove_cycle_breakpoint(98));
    assert_eq!(dbg.breakpoints().len(), 1);
    assert!(dbg.tick_breakpoints().is_empty());
    assert_eq!(dbg.cycle_breakpoints().len(), 1);
}

#[test]
fn run_without_breakpoints_does_nothing() {
    let mut dbg = debugger(&[]);
    assert_eq!(dbg.run().unwrap(), StopReason::NoBreakpoints);
    assert_eq!(dbg.gameboy().ticks(), 0);
}

#[test]
fn step_executes_one_instruction() {
    let mut dbg = debugger(&[]);
    assert_eq!(dbg.step().unwrap(), 4);
    assert_eq!(dbg.gameboy().registers().pc.get(), 0x0101);
    assert_eq!(dbg.gameboy().ticks(), 1);
}

#[test]
fn run_stops_at_address_breakpoints_in_turn() {
    // LD A,5; INC A; INC A; HALT
    let mut dbg = debugger(&[0x3E, 0x05, 0x3C, 0x3C, 0x76]);
    dbg.set_breakpoint(0x0152);
    dbg.set_breakpoint(0x0154);

    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0152));
    assert_eq!(dbg.gameboy().registers().a.get(), 5);

    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0154));
    assert_eq!(dbg.gameboy().registers().a.get(), 7);
}

#[test]
fn run_moves_past_the_current_address() {
    // JR -2: PC returns to 0x0150 every instruction.
    let mut dbg = debugger(&[0x18, 0xFE]);
    dbg.set_breakpoint(0x0150);

    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0150));
    let ticks = dbg.gameboy().ticks();
    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0150));
    assert_eq!(dbg.gameboy().ticks(), ticks + 1);
}

#[test]
fn tick_breakpoints_fire_once() {
    let mut dbg = debugger(&[0x18, 0xFE]);
    dbg.set_tick_breakpoint(3);
    dbg.set_tick_breakpoint(5);

    assert_eq!(dbg.run().unwrap(), StopReason::Tick(3));
    assert_eq!(dbg.gameboy().ticks(), 3);
    assert_eq!(dbg.run().unwrap(), StopReason::Tick(5));
    assert_eq!(dbg.gameboy().ticks(), 5);
}

#[test]
fn passed_counter_breakpoints_are_ignored() {
    let mut dbg = debugger(&[0x18, 0xFE]);
    for _ in 0..5 {
        dbg.step().unwrap();
    }

    dbg.set_tick_breakpoint(2);
    dbg.set_tick_breakpoint(5);
    dbg.set_cycle_breakpoint(1);
    assert_eq!(dbg.run().unwrap(), StopReason::NoBreakpoints);
    assert_eq!(dbg.gameboy().ticks(), 5);

    dbg.set_tick_breakpoint(7);
    assert_eq!(dbg.run().unwrap(), StopReason::Tick(7));
    assert_eq!(dbg.gameboy().ticks(), 7);
    assert_eq!(dbg.run().unwrap(), StopReason::NoBreakpoints);
}

#[test]
fn hits_on_the_same_instruction_are_all_reported() {
    // NOP at 0x0100, then JP lands on 0x0150 as tick 2 completes.
    let mut dbg = debugger(&[0x18, 0xFE]);
    dbg.set_breakpoint(0x0150);
    dbg.set_tick_breakpoint(2);

    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0150));
    assert_eq!(dbg.gameboy().ticks(), 2);
    assert_eq!(dbg.run().unwrap(), StopReason::Tick(2));
    assert_eq!(dbg.gameboy().ticks(), 2);
    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0150));
    assert_eq!(dbg.gameboy().ticks(), 3);
}

#[test]
fn cycle_breakpoints_crossed_together_are_reported_in_order() {
    // JP takes the counter from 4 to 20.
    let mut dbg = debugger(&[0x18, 0xFE]);
    dbg.set_cycle_breakpoint(12);
    dbg.set_cycle_breakpoint(10);

    assert_eq!(dbg.run().unwrap(), StopReason::Cycle(10));
    assert_eq!(dbg.run().unwrap(), StopReason::Cycle(12));
    assert_eq!(dbg.gameboy().ticks(), 2);
    assert_eq!(dbg.run().unwrap(), StopReason::NoBreakpoints);
}

#[test]
fn removed_breakpoints_are_not_reported_late() {
    let mut dbg = debugger(&[0x18, 0xFE]);
    dbg.set_breakpoint(0x0150);
    dbg.set_tick_breakpoint(2);

    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0150));
    dbg.remove_tick_breakpoint(2);
    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0150));
    assert_eq!(dbg.gameboy().ticks(), 3);
}

#[test]
fn stepping_drops_unreported_hits() {
    let mut dbg = debugger(&[0x18, 0xFE]);
    dbg.set_breakpoint(0x0150);
    dbg.set_tick_breakpoint(2);

    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0150));
    dbg.step().unwrap();
    assert_eq!(dbg.run().unwrap(), StopReason::Address(0x0150));
    assert_eq!(dbg.gameboy().ticks(), 4);
}

#[test]
fn cycle_breakpoints_fire_when_crossed() {
    // NOP (4) + JP (16) + LD A,d8 (8): 22 is passed on the third tick.
    let mut dbg = debugger(&[0x3E, 0x05, 0x18, 0xFE]);
    dbg.set_cycle_breakpoint(22);

    assert_eq!(dbg.run().unwrap(), StopReason::Cycle(22));
    assert_eq!(dbg.gameboy().ticks(), 3);
    assert_eq!(dbg.gameboy().cycles(), 28);
}

#[test]
fn illegal_opcode_stops_the_run() {
    let mut dbg = debugger(&[0xD3]);
    dbg.set_breakpoint(0x4000);

    assert_eq!(dbg.run().unwrap(), StopReason::Locked);
    assert!(dbg.gameboy().cpu().is_locked());
    assert!(dbg.step().is_err());
}

#[test]
fn peek_disassembles_without_executing() {
    let mut dbg = debugger(&[
        0x3E, 0x05, // LD A,$05
        0xC3, 0x34, 0x12, // JP $1234
        0x18, 0xFE, // JR $0155
        0xCB, 0x7C, // BIT 7,H
        0x76, // HALT
        0xD3, // hole
    ]);

    let lines = dbg.peek(0x0150, 6);
    let listing: Vec<_> = lines
        .values()
        .map(|line| (line.address, line.mnemonic.as_str(), line.length))
        .collect();
    assert_eq!(
        listing,
        [
            (0x0150, "LD A,$05", 2),
            (0x0152, "JP $1234", 3),
            (0x0155, "JR $0155", 2),
            (0x0157, "BIT 7,H", 2),
            (0x0159, "HALT", 1),
            (0x015A, "DB $D3", 1),
        ]
    );
    assert_eq!(lines[&0x0152].operand, Some(0x1234));
    assert_eq!(lines[&0x0155].operand, Some(0x0155));

    assert_eq!(dbg.gameboy().ticks(), 0);
    assert_eq!(dbg.gameboy().registers().pc.get(), 0x0100);
}

#[test]
fn immediates_are_substituted() {
    assert_eq!(line(&[0x01, 0x34, 0x12]).mnemonic, "LD BC,$1234");
    assert_eq!(line(&[0x08, 0x00, 0xC0]).mnemonic, "LD ($C000),SP");
    assert_eq!(line(&[0x36, 0x7F]).mnemonic, "LD (HL),$7F");
    assert_eq!(line(&[0xE0, 0x50]).mnemonic, "LDH ($50),A");
    assert_eq!(line(&[0xF0, 0x44]).mnemonic, "LDH A,($44)");
    assert_eq!(line(&[0xFE, 0x90]).mnemonic, "CP $90");
    assert_eq!(line(&[0x10, 0x00]).mnemonic, "STOP $00");
}

#[test]
fn signed_offsets_are_rendered_with_sign() {
    let ld = line(&[0xF8, 0xF8]);
    assert_eq!(ld.mnemonic, "LD HL,SP-$08");
    assert_eq!(ld.operand, Some(0xF8));
    assert_eq!(line(&[0xE8, 0x05]).mnemonic, "ADD SP,+$05");
    assert_eq!(line(&[0x20, 0x10]).mnemonic, "JR NZ,$0162");
    assert_eq!(line(&[0x38, 0x80]).mnemonic, "JR C,$00D2");
}

#[test]
fn register_block_mnemonics() {
    assert_eq!(line(&[0x46]).mnemonic, "LD B,(HL)");
    assert_eq!(line(&[0x7F]).mnemonic, "LD A,A");
    assert_eq!(line(&[0x88]).mnemonic, "ADC A,B");
    assert_eq!(line(&[0x90]).mnemonic, "SUB B");
    assert_eq!(line(&[0xBE]).mnemonic, "CP (HL)");
    assert_eq!(line(&[0x76]).mnemonic, "HALT");
}

#[test]
fn cb_mnemonics() {
    assert_eq!(line(&[0xCB, 0x00]).mnemonic, "RLC B");
    assert_eq!(line(&[0xCB, 0x37]).mnemonic, "SWAP A");
    assert_eq!(line(&[0xCB, 0x3E]).mnemonic, "SRL (HL)");
    assert_eq!(line(&[0xCB, 0x86]).mnemonic, "RES 0,(HL)");
    assert_eq!(line(&[0xCB, 0xFF]).mnemonic, "SET 7,A");
}

#[test]
fn every_opcode_decodes() {
    for opcode in 0..=0xFFu8 {
        let decoded = line(&[opcode, 0x01, 0x02]);
        assert!((1..=3).contains(&decoded.length), "{opcode:02X}");
        assert!(!decoded.mnemonic.is_empty());
        assert!(
            !decoded.mnemonic.contains("d8")
                && !decoded.mnemonic.contains("a8")
                && !decoded.mnemonic.contains("r8")
                && !decoded.mnemonic.contains("16"),
            "{opcode:02X}: {}",
            decoded.mnemonic
        );
        assert_eq!(decoded.bytes().len(), decoded.length as usize);
    }
}

#[test]
fn display_shows_address_bytes_and_mnemonic() {
    assert_eq!(line(&[0x3E, 0x05]).to_string(), "0150: 3E 05    LD A,$05");
    assert_eq!(line(&[0xC3, 0x34, 0x12]).to_string(), "0150: C3 34 12 JP $1234");
    assert_eq!(line(&[0x00]).to_string(), "0150: 00       NOP");
}
