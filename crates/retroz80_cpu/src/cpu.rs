mod alu;
mod exec;
mod helpers;
mod interrupts;

pub(crate) use exec::{base_handlers, cb_handlers, ed_handlers, index_handlers};
pub use interrupts::{IM1_VECTOR, NMI_VECTOR};

use crate::device::Ports;
use crate::dispatch::{shared_tables, DispatchTables, Prefix};
use crate::error::Z80Error;
use crate::memory::Memory;
use crate::registers::Registers;

/// T-states charged per `execute()` call while halted.
pub const HALT_IDLE_T_STATES: u32 = 4;

/// Z80 interpreter.
///
/// One call to [`Cpu::execute`] fetches and completes exactly one
/// instruction (prefixes included) and adds its cost to a monotonic T-state
/// counter. The CPU owns its register file and I/O ports; memory is
/// borrowed per call so that machines can keep their own memory map.
pub struct Cpu {
    pub regs: Registers,
    pub ports: Ports,
    /// Total T-states since construction. Never decreases.
    t_states: u64,
    halted: bool,
    /// EI executed; IFF1/IFF2 are set once the following instruction ends.
    ei_pending: bool,
    /// Table the current opcode was dispatched from. DD/FD handlers read it
    /// to pick IX or IY.
    prefix: Prefix,
    /// PC of the first byte of the instruction being executed.
    instr_pc: u16,
    /// Set when an instruction fails; the CPU stays locked until reset.
    fault: Option<Z80Error>,
    tables: &'static DispatchTables,
}

impl Cpu {
    pub fn new() -> Result<Self, Z80Error> {
        let mut cpu = Self {
            regs: Registers::default(),
            ports: Ports::default(),
            t_states: 0,
            halted: false,
            ei_pending: false,
            prefix: Prefix::Base,
            instr_pc: 0,
            fault: None,
            tables: shared_tables()?,
        };
        cpu.apply_power_on_state();
        Ok(cpu)
    }

    /// Reset the CPU. Ports and the T-state counter are kept.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.halted = false;
        self.ei_pending = false;
        self.prefix = Prefix::Base;
        self.instr_pc = 0;
        self.fault = None;
        self.apply_power_on_state();
    }

    fn apply_power_on_state(&mut self) {
        self.regs.set_af(0xFFFF);
        self.regs.sp = 0xFFFF;
        self.regs.pc = 0x0000;
    }

    /// Fetch, decode and execute one instruction.
    ///
    /// Returns the T-states consumed. While halted no fetch happens and the
    /// call costs [`HALT_IDLE_T_STATES`]. After an unimplemented opcode the
    /// CPU is locked and every call returns the same error.
    pub fn execute(&mut self, mem: &mut dyn Memory) -> Result<u32, Z80Error> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        if self.halted {
            self.regs.bump_r();
            self.t_states += u64::from(HALT_IDLE_T_STATES);
            return Ok(HALT_IDLE_T_STATES);
        }

        let enable_after = self.ei_pending;
        self.instr_pc = self.regs.pc;
        let opcode = self.fetch_opcode(mem);
        let cycles = self.dispatch(mem, Prefix::Base, opcode);
        self.t_states += u64::from(cycles);

        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        if enable_after {
            self.apply_ei_delay();
        }
        Ok(cycles)
    }

    /// Run `opcode` through the handler bound in `table`.
    pub(crate) fn dispatch(&mut self, mem: &mut dyn Memory, table: Prefix, opcode: u8) -> u32 {
        let tables = self.tables;
        let handler = tables.table(table).get(opcode);
        self.prefix = table;
        let cycles = handler.run(self, mem, opcode);
        self.prefix = Prefix::Base;
        cycles
    }

    /// Stop the CPU with a fatal error.
    pub(crate) fn lock(&mut self, error: Z80Error) {
        log::error!("Z80 CPU locked: {error}");
        self.fault = Some(error);
    }

    pub fn t_states(&self) -> u64 {
        self.t_states
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn fault(&self) -> Option<&Z80Error> {
        self.fault.as_ref()
    }

    pub fn ei_pending(&self) -> bool {
        self.ei_pending
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("regs", &self.regs)
            .field("t_states", &self.t_states)
            .field("halted", &self.halted)
            .field("ei_pending", &self.ei_pending)
            .field("fault", &self.fault)
            .finish_non_exhaustive()
    }
}
