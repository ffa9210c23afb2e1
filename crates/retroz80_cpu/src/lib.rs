//! Zilog Z80 instruction core.
//!
//! The core fetches, decodes and executes one instruction per call through
//! five predicate-built dispatch tables (base, CB, DD, ED, FD). It keeps a
//! monotonic T-state counter and models EI/DI, HALT, IM 0/1/2 and NMI.
//! Memory and I/O devices are supplied by the embedding machine.

pub mod alu;
pub mod cpu;
pub mod daa;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod memory;
pub mod registers;

pub use cpu::{Cpu, HALT_IDLE_T_STATES, IM1_VECTOR, NMI_VECTOR};
pub use device::{InputDevice, OutputDevice, Ports, FLOATING_BUS};
pub use dispatch::{DispatchTable, DispatchTables, Handler, Prefix};
pub use error::Z80Error;
pub use memory::{Memory, NoListener, OverlayMemory, Ram, WriteListener, MEMORY_SIZE};
pub use registers::{Flags, InterruptMode, Registers};
