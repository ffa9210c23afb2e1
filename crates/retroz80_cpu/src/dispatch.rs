use std::fmt;

use lazy_static::lazy_static;

use crate::cpu::{self, Cpu};
use crate::error::Z80Error;
use crate::memory::Memory;

/// Action bound to an opcode slot. Returns the T-states consumed.
pub type Exec = fn(&mut Cpu, &mut dyn Memory, u8) -> u32;

/// Opcode table selected by the prefix state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Prefix {
    #[default]
    Base,
    Cb,
    Dd,
    Ed,
    Fd,
}

impl Prefix {
    pub const ALL: [Prefix; 5] = [Prefix::Base, Prefix::Cb, Prefix::Dd, Prefix::Ed, Prefix::Fd];
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Prefix::Base => "base",
            Prefix::Cb => "CB",
            Prefix::Dd => "DD",
            Prefix::Ed => "ED",
            Prefix::Fd => "FD",
        };
        f.write_str(name)
    }
}

/// A predicate-guarded semantic unit.
///
/// `claims` decides which opcode bytes of a table the handler is bound to;
/// `run` executes one of them.
#[derive(Clone, Copy)]
pub struct Handler {
    name: &'static str,
    claims: fn(u8) -> bool,
    run: Exec,
}

impl Handler {
    pub fn new(name: &'static str, claims: fn(u8) -> bool, run: Exec) -> Self {
        Self { name, claims, run }
    }

    /// Bound to every slot no registered handler claims.
    pub(crate) fn unimplemented() -> Self {
        Self::new(UNIMPLEMENTED, |_| false, Cpu::exec_unimplemented)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn claims(&self, opcode: u8) -> bool {
        (self.claims)(opcode)
    }

    #[inline]
    pub(crate) fn run(&self, cpu: &mut Cpu, mem: &mut dyn Memory, opcode: u8) -> u32 {
        (self.run)(cpu, mem, opcode)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.name).finish()
    }
}

/// Name of the fail-fast handler placed in unclaimed slots.
pub const UNIMPLEMENTED: &str = "unimplemented";

/// 256 handler slots for one prefix context.
pub struct DispatchTable {
    prefix: Prefix,
    slots: [Handler; 256],
}

impl DispatchTable {
    /// Bind every opcode to the single handler that claims it.
    ///
    /// Handlers are tried in registration order. A second claim on a bound
    /// slot aborts the build with [`Z80Error::HandlerConflict`]; slots left
    /// unclaimed get the unimplemented handler.
    pub fn build(prefix: Prefix, handlers: &[Handler]) -> Result<Self, Z80Error> {
        let mut slots: [Option<Handler>; 256] = [None; 256];

        for opcode in 0..=255u8 {
            for handler in handlers.iter().filter(|h| h.claims(opcode)) {
                let slot = &mut slots[opcode as usize];
                if let Some(existing) = slot {
                    return Err(Z80Error::HandlerConflict {
                        table: prefix,
                        opcode,
                        existing: existing.name,
                        incoming: handler.name,
                    });
                }
                *slot = Some(*handler);
            }
        }

        let fallback = Handler::unimplemented();
        Ok(Self {
            prefix,
            slots: slots.map(|slot| slot.unwrap_or(fallback)),
        })
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    #[inline]
    pub fn get(&self, opcode: u8) -> &Handler {
        &self.slots[opcode as usize]
    }

    /// Opcodes bound to the unimplemented handler.
    pub fn holes(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=255u8).filter(|&op| self.get(op).name == UNIMPLEMENTED)
    }
}

/// The five tables shared by every CPU.
pub struct DispatchTables {
    base: DispatchTable,
    cb: DispatchTable,
    dd: DispatchTable,
    ed: DispatchTable,
    fd: DispatchTable,
}

impl DispatchTables {
    pub fn build() -> Result<Self, Z80Error> {
        let index = cpu::index_handlers();
        let tables = Self {
            base: DispatchTable::build(Prefix::Base, &cpu::base_handlers())?,
            cb: DispatchTable::build(Prefix::Cb, &cpu::cb_handlers())?,
            dd: DispatchTable::build(Prefix::Dd, &index)?,
            ed: DispatchTable::build(Prefix::Ed, &cpu::ed_handlers())?,
            fd: DispatchTable::build(Prefix::Fd, &index)?,
        };
        log::debug!(
            "Z80 dispatch tables built ({} ED opcodes left unimplemented)",
            tables.ed.holes().count()
        );
        Ok(tables)
    }

    #[inline]
    pub fn table(&self, prefix: Prefix) -> &DispatchTable {
        match prefix {
            Prefix::Base => &self.base,
            Prefix::Cb => &self.cb,
            Prefix::Dd => &self.dd,
            Prefix::Ed => &self.ed,
            Prefix::Fd => &self.fd,
        }
    }
}

lazy_static! {
    static ref SHARED_TABLES: Result<DispatchTables, Z80Error> = DispatchTables::build();
}

/// Process-wide tables, built on first use.
pub fn shared_tables() -> Result<&'static DispatchTables, Z80Error> {
    let tables: &'static Result<DispatchTables, Z80Error> = &SHARED_TABLES;
    tables.as_ref().map_err(Clone::clone)
}
