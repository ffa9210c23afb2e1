use crate::cpu::helpers::RegPair;
use crate::cpu::Cpu;
use crate::memory::Memory;

impl Cpu {
    pub(super) fn exec_inc_r(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let target = (opcode >> 3) & 0x07;
        let value = self.read_reg8(mem, target);
        let result = self.alu_inc8(value);
        self.write_reg8(mem, target, result);
        if target == 6 { 11 } else { 4 }
    }

    pub(super) fn exec_dec_r(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let target = (opcode >> 3) & 0x07;
        let value = self.read_reg8(mem, target);
        let result = self.alu_dec8(value);
        self.write_reg8(mem, target, result);
        if target == 6 { 11 } else { 4 }
    }

    /// INC rr / DEC rr. No flags are affected.
    pub(super) fn exec_incdec_rr(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        let Some(pair) = self.decode_pair((opcode >> 4) & 0x03, RegPair::Sp) else {
            return 0;
        };
        let value = self.read_pair(pair);
        let result = if opcode & 0x08 != 0 {
            value.wrapping_sub(1)
        } else {
            value.wrapping_add(1)
        };
        self.write_pair(pair, result);
        6
    }
}
