use crate::cpu::Cpu;
use crate::memory::Memory;

impl Cpu {
    pub(super) fn exec_ex_af(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.ex_af();
        4
    }

    pub(super) fn exec_exx(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.exx();
        4
    }

    pub(super) fn exec_ex_de_hl(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        let de = self.regs.de();
        self.regs.set_de(self.regs.hl());
        self.regs.set_hl(de);
        4
    }

    pub(super) fn exec_ex_sp_hl(&mut self, mem: &mut dyn Memory, _opcode: u8) -> u32 {
        let sp = self.regs.sp;
        let top = mem.read16(sp);
        mem.write16(sp, self.regs.hl());
        self.regs.set_hl(top);
        19
    }
}
