use crate::cpu::Cpu;
use crate::memory::Memory;

impl Cpu {
    /// JP nn (0xC3) and JP cc,nn. Both forms cost 10 whether or not the
    /// jump is taken.
    pub(super) fn exec_jp(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let addr = self.fetch16(mem);
        if opcode == 0xC3 || self.condition(opcode >> 3) {
            self.regs.pc = addr;
        }
        10
    }

    pub(super) fn exec_jp_hl(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.pc = self.regs.hl();
        4
    }

    /// JR e (0x18) and JR NZ/Z/NC/C,e.
    pub(super) fn exec_jr(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let cond = opcode == 0x18 || self.condition((opcode >> 3) & 0x03);
        self.jr(mem, cond)
    }

    pub(super) fn exec_djnz(&mut self, mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.b = self.regs.b.wrapping_sub(1);
        let taken = self.regs.b != 0;
        // Same displacement handling as JR, one extra T-state each way.
        self.jr(mem, taken) + 1
    }

    /// CALL nn (0xCD) and CALL cc,nn.
    pub(super) fn exec_call(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let addr = self.fetch16(mem);
        if opcode == 0xCD || self.condition(opcode >> 3) {
            let ret = self.regs.pc;
            self.push16(mem, ret);
            self.regs.pc = addr;
            17
        } else {
            10
        }
    }

    pub(super) fn exec_ret(&mut self, mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.pc = self.pop16(mem);
        10
    }

    pub(super) fn exec_ret_cc(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        if self.condition(opcode >> 3) {
            self.regs.pc = self.pop16(mem);
            11
        } else {
            5
        }
    }

    pub(super) fn exec_rst(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let ret = self.regs.pc;
        self.push16(mem, ret);
        self.regs.pc = u16::from(opcode & 0x38);
        11
    }

    /// ED 45/4D/55/5D/65/6D/75/7D: RETN, with 4D being RETI. Both restore
    /// IFF1 from IFF2.
    pub(super) fn exec_retn(&mut self, mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.pc = self.pop16(mem);
        self.regs.iff1 = self.regs.iff2;
        14
    }
}
