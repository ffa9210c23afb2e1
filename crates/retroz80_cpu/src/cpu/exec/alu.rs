use crate::alu;
use crate::cpu::helpers::RegPair;
use crate::cpu::Cpu;
use crate::daa;
use crate::memory::Memory;
use crate::registers::Flags;

impl Cpu {
    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A,r and A,(HL)
    pub(super) fn exec_alu_reg(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!((0x80..=0xBF).contains(&opcode));
        let src = opcode & 0x07;
        let value = self.read_reg8(mem, src);
        self.alu_op(opcode >> 3, value);
        if src == 6 { 7 } else { 4 }
    }

    pub(super) fn exec_alu_imm(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let value = self.fetch8(mem);
        self.alu_op(opcode >> 3, value);
        7
    }

    pub(super) fn exec_add_hl(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        let Some(pair) = self.decode_pair((opcode >> 4) & 0x03, RegPair::Sp) else {
            return 0;
        };
        let rhs = self.read_pair(pair);
        let result = self.alu_add16(self.regs.hl(), rhs);
        self.regs.set_hl(result);
        11
    }

    /// ED 4A/5A/6A/7A: ADC HL,ss and ED 42/52/62/72: SBC HL,ss
    pub(super) fn exec_adc_sbc_hl(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        let Some(pair) = self.decode_pair((opcode >> 4) & 0x03, RegPair::Sp) else {
            return 0;
        };
        let rhs = self.read_pair(pair);
        let hl = self.regs.hl();
        let carry = self.regs.flag(Flags::C);
        let result = if opcode & 0x08 != 0 {
            alu::adc16(hl, rhs, carry)
        } else {
            alu::sbc16(hl, rhs, carry)
        };
        self.regs.set_hl(result.value);
        self.regs.set_flags(result.flags);
        15
    }

    pub(super) fn exec_rotate_a(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));
        let result = alu::rotate_accumulator(opcode >> 3, self.regs.a, self.regs.flags());
        self.store_accumulator(result);
        4
    }

    pub(super) fn exec_daa(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        let result = daa::daa(self.regs.a, self.regs.flags());
        self.store_accumulator(result);
        4
    }

    pub(super) fn exec_cpl(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.a = !self.regs.a;
        let kept = self.regs.flags() & (Flags::S | Flags::Z | Flags::PV | Flags::C);
        self.regs.set_flags(kept | Flags::H | Flags::N | Flags::undocumented(self.regs.a));
        4
    }

    /// SCF (0x37) and CCF (0x3F). CCF moves the old carry into H.
    pub(super) fn exec_scf_ccf(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        let old = self.regs.flags();
        let mut flags =
            (old & (Flags::S | Flags::Z | Flags::PV)) | Flags::undocumented(self.regs.a);
        if opcode == 0x37 {
            flags |= Flags::C;
        } else {
            flags.set(Flags::H, old.contains(Flags::C));
            flags.set(Flags::C, !old.contains(Flags::C));
        }
        self.regs.set_flags(flags);
        4
    }

    /// ED 44 and its mirrors: NEG.
    pub(super) fn exec_neg(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        let result = alu::sub8(0, self.regs.a, false);
        self.store_accumulator(result);
        8
    }

    /// ED 67: RRD / ED 6F: RLD. Rotates BCD digits between A and (HL).
    pub(super) fn exec_rld_rrd(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let hl = self.regs.hl();
        let value = mem.read8(hl);
        let a = self.regs.a;
        let (memory, acc) = if opcode == 0x6F {
            ((value << 4) | (a & 0x0F), (a & 0xF0) | (value >> 4))
        } else {
            ((a << 4) | (value >> 4), (a & 0xF0) | (value & 0x0F))
        };
        mem.write8(hl, memory);
        self.regs.a = acc;
        let carry = self.regs.flags() & Flags::C;
        self.regs.set_flags(Flags::sz53p(acc) | carry);
        18
    }
}
