use crate::alu;
use crate::cpu::Cpu;
use crate::memory::Memory;

impl Cpu {
    /// CB 00-3F: RLC, RRC, RL, RR, SLA, SRA, SLL, SRL on r or (HL).
    pub(super) fn exec_cb_shift(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let z = opcode & 0x07;
        let value = self.read_reg8(mem, z);
        let result = self.alu_shift(opcode >> 3, value);
        self.write_reg8(mem, z, result);
        if z == 6 { 15 } else { 8 }
    }

    /// CB 40-7F: BIT b,r and BIT b,(HL).
    ///
    /// Bits 5/3 are copied from the tested value.
    pub(super) fn exec_cb_bit(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let z = opcode & 0x07;
        let value = self.read_reg8(mem, z);
        let flags = alu::bit(opcode >> 3, value, value, self.regs.flags());
        self.regs.set_flags(flags);
        if z == 6 { 12 } else { 8 }
    }

    /// CB 80-BF: RES b,r and CB C0-FF: SET b,r, plus the (HL) forms.
    pub(super) fn exec_cb_res_set(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let z = opcode & 0x07;
        let mask = 1u8 << ((opcode >> 3) & 0x07);
        let value = self.read_reg8(mem, z);
        let result = if opcode & 0x40 != 0 {
            value | mask
        } else {
            value & !mask
        };
        self.write_reg8(mem, z, result);
        if z == 6 { 15 } else { 8 }
    }
}
