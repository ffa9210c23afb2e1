use super::Cpu;
use crate::alu::{self, AluResult};
use crate::registers::Flags;

impl Cpu {
    /// One of the eight accumulator operations, selected by bits 5..3 of the
    /// opcode: ADD, ADC, SUB, SBC, AND, XOR, OR, CP.
    pub(super) fn alu_op(&mut self, operation: u8, value: u8) {
        let a = self.regs.a;
        let carry = self.regs.flag(Flags::C);
        let result = match operation & 0x07 {
            0 => alu::add8(a, value, false),
            1 => alu::add8(a, value, carry),
            2 => alu::sub8(a, value, false),
            3 => alu::sub8(a, value, carry),
            4 => alu::and8(a, value),
            5 => alu::xor8(a, value),
            6 => alu::or8(a, value),
            _ => {
                // CP leaves A untouched.
                self.regs.set_flags(alu::cp8(a, value));
                return;
            }
        };
        self.store_accumulator(result);
    }

    #[inline]
    pub(super) fn store_accumulator(&mut self, result: AluResult) {
        self.regs.a = result.value;
        self.regs.set_flags(result.flags);
    }

    /// INC helper for registers, (HL) and (IX+d). Carry is unchanged.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = alu::inc8(value);
        let carry = self.regs.flags() & Flags::C;
        self.regs.set_flags(result.flags | carry);
        result.value
    }

    /// DEC helper for registers, (HL) and (IX+d). Carry is unchanged.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = alu::dec8(value);
        let carry = self.regs.flags() & Flags::C;
        self.regs.set_flags(result.flags | carry);
        result.value
    }

    /// CB rotate/shift helper; `op` is bits 5..3 of the final opcode.
    #[inline]
    pub(super) fn alu_shift(&mut self, op: u8, value: u8) -> u8 {
        let result = alu::shift(op, value, self.regs.flag(Flags::C));
        self.regs.set_flags(result.flags);
        result.value
    }

    /// 16-bit add used by ADD HL,ss and ADD IX/IY,ss.
    #[inline]
    pub(super) fn alu_add16(&mut self, lhs: u16, rhs: u16) -> u16 {
        let result = alu::add16(lhs, rhs, self.regs.flags());
        self.regs.set_flags(result.flags);
        result.value
    }
}
