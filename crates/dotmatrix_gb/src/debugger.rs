mod disassembly;

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use anyhow::Result;

use crate::machine::GameBoy;

pub use disassembly::InstructionLine;

/// Why [`Debugger::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// PC reached an address breakpoint.
    Address(u16),
    /// The tick counter reached a tick breakpoint.
    Tick(u64),
    /// The cycle counter reached a cycle breakpoint.
    Cycle(u64),
    /// The CPU executed an illegal opcode and cannot continue.
    Locked,
    /// No breakpoint can still be hit, so nothing was executed. Tick and
    /// cycle breakpoints at or below the current counter do not count.
    NoBreakpoints,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Address(addr) => write!(f, "breakpoint at 0x{addr:04X}"),
            StopReason::Tick(tick) => write!(f, "tick breakpoint {tick}"),
            StopReason::Cycle(cycle) => write!(f, "cycle breakpoint {cycle}"),
            StopReason::Locked => write!(f, "CPU locked"),
            StopReason::NoBreakpoints => write!(f, "no breakpoints ahead"),
        }
    }
}

/// Breakpoint debugger around a [`GameBoy`].
///
/// Address breakpoints stop when PC lands on them after an instruction.
/// Tick and cycle breakpoints stop on the instruction that makes the
/// counter reach or pass them, so each fires at most once. When one
/// instruction hits several breakpoints, the first is returned and the
/// rest are returned by the following `run` calls without executing.
pub struct Debugger {
    gameboy: GameBoy,
    breakpoints: BTreeSet<u16>,
    tick_breakpoints: BTreeSet<u64>,
    cycle_breakpoints: BTreeSet<u64>,
    /// Hits from the last instruction not yet reported.
    pending: VecDeque<StopReason>,
}

impl Debugger {
    pub fn new(gameboy: GameBoy) -> Self {
        Self {
            gameboy,
            breakpoints: BTreeSet::new(),
            tick_breakpoints: BTreeSet::new(),
            cycle_breakpoints: BTreeSet::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn gameboy(&self) -> &GameBoy {
        &self.gameboy
    }

    pub fn gameboy_mut(&mut self) -> &mut GameBoy {
        &mut self.gameboy
    }

    pub fn into_inner(self) -> GameBoy {
        self.gameboy
    }

    /// Returns `false` if the breakpoint was already set.
    pub fn set_breakpoint(&mut self, addr: u16) -> bool {
        self.breakpoints.insert(addr)
    }

    /// Returns `false` if there was no such breakpoint.
    pub fn remove_breakpoint(&mut self, addr: u16) -> bool {
        self.breakpoints.remove(&addr)
    }

    pub fn set_tick_breakpoint(&mut self, tick: u64) -> bool {
        self.tick_breakpoints.insert(tick)
    }

    pub fn remove_tick_breakpoint(&mut self, tick: u64) -> bool {
        self.tick_breakpoints.remove(&tick)
    }

    pub fn set_cycle_breakpoint(&mut self, cycle: u64) -> bool {
        self.cycle_breakpoints.insert(cycle)
    }

    pub fn remove_cycle_breakpoint(&mut self, cycle: u64) -> bool {
        self.cycle_breakpoints.remove(&cycle)
    }

    pub fn breakpoints(&self) -> &BTreeSet<u16> {
        &self.breakpoints
    }

    pub fn tick_breakpoints(&self) -> &BTreeSet<u64> {
        &self.tick_breakpoints
    }

    pub fn cycle_breakpoints(&self) -> &BTreeSet<u64> {
        &self.cycle_breakpoints
    }

    /// Whether `run` can still stop somewhere.
    fn has_reachable_breakpoints(&self) -> bool {
        let ticks = self.gameboy.ticks();
        let cycles = self.gameboy.cycles();
        !self.breakpoints.is_empty()
            || self.tick_breakpoints.range(ticks + 1..).next().is_some()
            || self.cycle_breakpoints.range(cycles + 1..).next().is_some()
    }

    fn is_set(&self, reason: StopReason) -> bool {
        match reason {
            StopReason::Address(addr) => self.breakpoints.contains(&addr),
            StopReason::Tick(tick) => self.tick_breakpoints.contains(&tick),
            StopReason::Cycle(cycle) => self.cycle_breakpoints.contains(&cycle),
            StopReason::Locked | StopReason::NoBreakpoints => true,
        }
    }

    /// Execute one tick and return its cycles.
    ///
    /// Hits left over from the last `run` are dropped.
    pub fn step(&mut self) -> Result<u32> {
        self.pending.clear();
        self.gameboy.tick()
    }

    /// Tick until a breakpoint is hit.
    ///
    /// At least one instruction is executed first, so calling `run` again
    /// while stopped on an address breakpoint moves past it. Returns
    /// [`StopReason::NoBreakpoints`] without executing anything if no
    /// breakpoint can be hit.
    pub fn run(&mut self) -> Result<StopReason> {
        while let Some(reason) = self.pending.pop_front() {
            if self.is_set(reason) {
                log::info!("GB DBG: {reason}");
                return Ok(reason);
            }
        }

        if !self.has_reachable_breakpoints() {
            return Ok(StopReason::NoBreakpoints);
        }

        loop {
            let ticks = self.gameboy.ticks();
            let cycles = self.gameboy.cycles();

            if let Err(err) = self.gameboy.tick() {
                if self.gameboy.cpu().is_locked() {
                    log::warn!("GB DBG: stopped, {err:#}");
                    return Ok(StopReason::Locked);
                }
                return Err(err);
            }

            self.pending = self.hits(ticks, cycles);
            if let Some(reason) = self.pending.pop_front() {
                log::info!("GB DBG: {reason}");
                return Ok(reason);
            }
        }
    }

    /// Every breakpoint the last instruction hit, address first.
    fn hits(&self, ticks_before: u64, cycles_before: u64) -> VecDeque<StopReason> {
        let mut hits = VecDeque::new();

        let pc = self.gameboy.registers().pc.get();
        if self.breakpoints.contains(&pc) {
            hits.push_back(StopReason::Address(pc));
        }

        let ticks = self.gameboy.ticks();
        hits.extend(
            self.tick_breakpoints
                .range(ticks_before + 1..=ticks)
                .map(|&tick| StopReason::Tick(tick)),
        );

        let cycles = self.gameboy.cycles();
        hits.extend(
            self.cycle_breakpoints
                .range(cycles_before + 1..=cycles)
                .map(|&cycle| StopReason::Cycle(cycle)),
        );
        hits
    }

    /// Disassemble `count` instructions starting at `addr`.
    ///
    /// Memory is read through the bus decode without executing anything.
    pub fn peek(&mut self, addr: u16, count: usize) -> BTreeMap<u16, InstructionLine> {
        let mut lines = BTreeMap::new();
        let mut addr = addr;
        for _ in 0..count {
            let bytes = [
                self.gameboy.read(addr),
                self.gameboy.read(addr.wrapping_add(1)),
                self.gameboy.read(addr.wrapping_add(2)),
            ];
            let line = InstructionLine::decode(addr, bytes);
            addr = line.next_address();
            lines.insert(line.address, line);
        }
        lines
    }
}

#[cfg(test)]
mod tests;
