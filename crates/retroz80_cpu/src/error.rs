use thiserror::Error;

use crate::dispatch::Prefix;

/// Fatal conditions raised by the instruction core.
///
/// None of these are recovered inside the fetch/execute cycle. Once an
/// instruction fails, the CPU stays locked and keeps returning the same error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Z80Error {
    #[error("unimplemented opcode 0x{opcode:02X} in {table} table at PC=0x{pc:04X}")]
    UnimplementedOpcode { table: Prefix, opcode: u8, pc: u16 },

    #[error("{table} table opcode 0x{opcode:02X} claimed by both {existing} and {incoming}")]
    HandlerConflict {
        table: Prefix,
        opcode: u8,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("invalid register pair selector {0}")]
    InvalidRegisterSelector(u8),
}
