use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use dotmatrix_gb::Debugger;

use crate::parse_address;

const PROMPT: &str = "(dmg) ";
const DEFAULT_PEEK_LINES: usize = 10;
const DEFAULT_MEM_BYTES: usize = 16;

const HELP: &str = "\
commands:
  step [n]          execute n instructions (default 1)
  run               run until a breakpoint
  break <addr>      set an address breakpoint
  delete <addr>     remove an address breakpoint
  tbreak <n>        break once n instructions have run
  cbreak <n>        break once n cycles have elapsed
  list              show all breakpoints
  peek [addr] [n]   disassemble n instructions (default: PC, 10)
  regs              show CPU registers
  mem <addr> [n]    dump n bytes (default 16)
  help              show this text
  quit              leave the debugger";

/// One line of debugger input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Step(u32),
    Run,
    Break(u16),
    Delete(u16),
    TickBreak(u64),
    CycleBreak(u64),
    List,
    Peek(Option<u16>, usize),
    Regs,
    Mem(u16, usize),
    Help,
    Quit,
}

fn count<T: FromStr>(arg: Option<&str>, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match arg {
        Some(text) => text
            .parse()
            .with_context(|| format!("invalid count '{text}'")),
        None => Ok(default),
    }
}

fn required<'a>(arg: Option<&'a str>, what: &str) -> Result<&'a str> {
    arg.ok_or_else(|| anyhow!("missing {what}"))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            bail!("empty command");
        };
        let args: Vec<&str> = words.collect();
        let first = args.first().copied();
        let second = args.get(1).copied();

        // Each command also reports how many arguments it takes.
        let (command, takes) = match name {
            "step" | "s" => (Command::Step(count(first, 1)?), 1),
            "run" | "r" => (Command::Run, 0),
            "break" | "b" => (
                Command::Break(parse_address(required(first, "address")?)?),
                1,
            ),
            "delete" | "d" => (
                Command::Delete(parse_address(required(first, "address")?)?),
                1,
            ),
            "tbreak" => (
                Command::TickBreak(count(Some(required(first, "tick count")?), 0)?),
                1,
            ),
            "cbreak" => (
                Command::CycleBreak(count(Some(required(first, "cycle count")?), 0)?),
                1,
            ),
            "list" | "l" => (Command::List, 0),
            "peek" | "p" => (
                Command::Peek(
                    first.map(parse_address).transpose()?,
                    count(second, DEFAULT_PEEK_LINES)?,
                ),
                2,
            ),
            "regs" => (Command::Regs, 0),
            "mem" | "m" => (
                Command::Mem(
                    parse_address(required(first, "address")?)?,
                    count(second, DEFAULT_MEM_BYTES)?,
                ),
                2,
            ),
            "help" | "h" | "?" => (Command::Help, 0),
            "quit" | "q" | "exit" => (Command::Quit, 0),
            other => bail!("unknown command '{other}' (try 'help')"),
        };

        if let Some(extra) = args.get(takes) {
            bail!("unexpected argument '{extra}' to '{name}'");
        }
        Ok(command)
    }
}

/// Line-oriented front end for a [`Debugger`].
pub struct Shell<W: Write> {
    debugger: Debugger,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(debugger: Debugger, out: W) -> Self {
        Self { debugger, out }
    }

    pub fn debugger(&self) -> &Debugger {
        &self.debugger
    }

    pub fn into_parts(self) -> (Debugger, W) {
        (self.debugger, self.out)
    }

    /// Read commands until `quit` or end of input. Bad commands and
    /// emulation errors are reported and the shell carries on.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(self.out)?;
                return Ok(());
            };
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let keep_going = match line.parse::<Command>() {
                Ok(command) => self.execute(command).or_else(|err| {
                    writeln!(self.out, "error: {err:#}")?;
                    Ok::<_, anyhow::Error>(true)
                })?,
                Err(err) => {
                    writeln!(self.out, "error: {err:#}")?;
                    true
                }
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    /// Execute one command. Returns `false` on `quit`.
    pub fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Step(n) => {
                for _ in 0..n {
                    self.debugger.step()?;
                }
                self.show_current()?;
            }
            Command::Run => {
                let reason = self.debugger.run()?;
                writeln!(self.out, "stopped: {reason}")?;
                self.show_current()?;
            }
            Command::Break(addr) => {
                if self.debugger.set_breakpoint(addr) {
                    writeln!(self.out, "breakpoint set at 0x{addr:04X}")?;
                } else {
                    writeln!(self.out, "breakpoint at 0x{addr:04X} already set")?;
                }
            }
            Command::Delete(addr) => {
                if self.debugger.remove_breakpoint(addr) {
                    writeln!(self.out, "breakpoint at 0x{addr:04X} removed")?;
                } else {
                    writeln!(self.out, "no breakpoint at 0x{addr:04X}")?;
                }
            }
            Command::TickBreak(tick) => {
                self.debugger.set_tick_breakpoint(tick);
                writeln!(self.out, "tick breakpoint set at {tick}")?;
            }
            Command::CycleBreak(cycle) => {
                self.debugger.set_cycle_breakpoint(cycle);
                writeln!(self.out, "cycle breakpoint set at {cycle}")?;
            }
            Command::List => self.list()?,
            Command::Peek(addr, lines) => {
                let addr = addr.unwrap_or_else(|| self.pc());
                for line in self.debugger.peek(addr, lines).values() {
                    writeln!(self.out, "  {line}")?;
                }
            }
            Command::Regs => self.regs()?,
            Command::Mem(addr, len) => self.mem(addr, len)?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn pc(&self) -> u16 {
        self.debugger.gameboy().registers().pc.get()
    }

    fn show_current(&mut self) -> Result<()> {
        let pc = self.pc();
        if let Some(line) = self.debugger.peek(pc, 1).remove(&pc) {
            writeln!(self.out, "=> {line}")?;
        }
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        let addresses: Vec<_> = self
            .debugger
            .breakpoints()
            .iter()
            .map(|addr| format!("0x{addr:04X}"))
            .collect();
        let ticks: Vec<_> = self
            .debugger
            .tick_breakpoints()
            .iter()
            .map(u64::to_string)
            .collect();
        let cycles: Vec<_> = self
            .debugger
            .cycle_breakpoints()
            .iter()
            .map(u64::to_string)
            .collect();

        writeln!(self.out, "address: {}", addresses.join(" "))?;
        writeln!(self.out, "tick:    {}", ticks.join(" "))?;
        writeln!(self.out, "cycle:   {}", cycles.join(" "))?;
        Ok(())
    }

    fn regs(&mut self) -> Result<()> {
        let gameboy = self.debugger.gameboy();
        let regs = gameboy.registers();
        let cpu = gameboy.cpu();
        writeln!(
            self.out,
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X}",
            regs.af(),
            regs.bc(),
            regs.de(),
            regs.hl(),
            regs.sp.get(),
            regs.pc.get()
        )?;
        writeln!(
            self.out,
            "IME={} HALT={} LY={} ticks={} cycles={} frames={}",
            u8::from(cpu.ime),
            u8::from(cpu.halted),
            gameboy.gpu().ly(),
            gameboy.ticks(),
            gameboy.cycles(),
            gameboy.frames()
        )?;
        Ok(())
    }

    fn mem(&mut self, addr: u16, len: usize) -> Result<()> {
        let gameboy = self.debugger.gameboy_mut();
        let bytes: Vec<u8> = (0..len)
            .map(|i| gameboy.read(addr.wrapping_add(i as u16)))
            .collect();

        for (row, chunk) in bytes.chunks(16).enumerate() {
            let hex: Vec<_> = chunk.iter().map(|b| format!("{b:02X}")).collect();
            writeln!(
                self.out,
                "{:04X}: {}",
                addr.wrapping_add((row * 16) as u16),
                hex.join(" ")
            )?;
        }
        Ok(())
    }
}
