use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::registers::InterruptMode;

impl Cpu {
    pub(super) fn exec_nop(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        4
    }

    pub(super) fn exec_halt(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert_eq!(opcode, 0x76);
        // PC already points past HALT, so an interrupt returns to the next
        // instruction.
        self.halted = true;
        4
    }

    pub(super) fn exec_di_ei(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xF3 | 0xFB));
        if opcode == 0xF3 {
            self.regs.iff1 = false;
            self.regs.iff2 = false;
            self.ei_pending = false;
        } else {
            // IFF1/IFF2 are set after the *next* instruction completes.
            self.ei_pending = true;
        }
        4
    }

    /// ED 46/4E/56/5E/66/6E/76/7E. The undefined 4E/6E encodings select IM 0.
    pub(super) fn exec_im(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        self.regs.im = match (opcode >> 3) & 0x03 {
            2 => InterruptMode::Im1,
            3 => InterruptMode::Im2,
            _ => InterruptMode::Im0,
        };
        8
    }
}
