//! DD/FD-prefixed instructions.
//!
//! Each handler works on IX after DD and on IY after FD; `Cpu::index`
//! resolves which. Any opcode that does not reference H, L or (HL) is
//! bound to a pass-through that runs the unprefixed instruction.

use crate::alu;
use crate::cpu::helpers::RegPair;
use crate::cpu::Cpu;
use crate::dispatch::{Handler, Prefix};
use crate::memory::Memory;

fn is_add_index(op: u8) -> bool {
    op & 0xCF == 0x09
}

fn is_ld_index_nn(op: u8) -> bool {
    op == 0x21
}

fn is_ld_index_direct(op: u8) -> bool {
    op == 0x22 || op == 0x2A
}

fn is_incdec_index(op: u8) -> bool {
    op == 0x23 || op == 0x2B
}

/// INC/DEC/LD on IXh or IXl: 24, 25, 26, 2C, 2D, 2E.
fn is_half_unary(op: u8) -> bool {
    op & 0xF0 == 0x20 && matches!(op & 0x07, 4..=6)
}

/// INC (IX+d), DEC (IX+d), LD (IX+d),n.
fn is_indexed_unary(op: u8) -> bool {
    matches!(op, 0x34..=0x36)
}

/// LD r,(IX+d) and LD (IX+d),r.
fn is_ld_indexed(op: u8) -> bool {
    op & 0xC0 == 0x40 && op != 0x76 && (op & 0x07 == 6 || (op >> 3) & 0x07 == 6)
}

/// LD between registers where at least one side is IXh/IXl.
fn is_ld_half(op: u8) -> bool {
    let dst = (op >> 3) & 0x07;
    let src = op & 0x07;
    op & 0xC0 == 0x40
        && dst != 6
        && src != 6
        && (matches!(dst, 4 | 5) || matches!(src, 4 | 5))
}

fn is_alu_index(op: u8) -> bool {
    op & 0xC0 == 0x80 && matches!(op & 0x07, 4..=6)
}

fn is_index_cb(op: u8) -> bool {
    op == 0xCB
}

fn is_push_pop_index(op: u8) -> bool {
    op == 0xE1 || op == 0xE5
}

fn is_ex_sp_index(op: u8) -> bool {
    op == 0xE3
}

fn is_jp_index(op: u8) -> bool {
    op == 0xE9
}

fn is_ld_sp_index(op: u8) -> bool {
    op == 0xF9
}

/// Every opcode whose meaning changes under a DD/FD prefix.
const INDEX_FORMS: [fn(u8) -> bool; 14] = [
    is_add_index,
    is_ld_index_nn,
    is_ld_index_direct,
    is_incdec_index,
    is_half_unary,
    is_indexed_unary,
    is_ld_indexed,
    is_ld_half,
    is_alu_index,
    is_index_cb,
    is_push_pop_index,
    is_ex_sp_index,
    is_jp_index,
    is_ld_sp_index,
];

fn is_passthrough(op: u8) -> bool {
    !INDEX_FORMS.iter().any(|claims| claims(op))
}

pub(super) fn handlers() -> Vec<Handler> {
    vec![
        Handler::new("ADD IX,rr", is_add_index, Cpu::exec_add_index),
        Handler::new("LD IX,nn", is_ld_index_nn, Cpu::exec_ld_index_nn),
        Handler::new("LD (nn),IX", is_ld_index_direct, Cpu::exec_ld_index_direct),
        Handler::new("INC/DEC IX", is_incdec_index, Cpu::exec_incdec_index),
        Handler::new("INC/DEC/LD IXh/IXl", is_half_unary, Cpu::exec_half_unary),
        Handler::new("INC/DEC/LD (IX+d)", is_indexed_unary, Cpu::exec_indexed_unary),
        Handler::new("LD r,(IX+d)", is_ld_indexed, Cpu::exec_ld_indexed),
        Handler::new("LD IXh/IXl", is_ld_half, Cpu::exec_ld_half),
        Handler::new("ALU A,IX", is_alu_index, Cpu::exec_alu_index),
        Handler::new("DDCB", is_index_cb, Cpu::exec_index_cb),
        Handler::new("PUSH/POP IX", is_push_pop_index, Cpu::exec_push_pop_index),
        Handler::new("EX (SP),IX", is_ex_sp_index, Cpu::exec_ex_sp_index),
        Handler::new("JP (IX)", is_jp_index, Cpu::exec_jp_index),
        Handler::new("LD SP,IX", is_ld_sp_index, Cpu::exec_ld_sp_index),
        Handler::new("ignored prefix", is_passthrough, Cpu::exec_index_passthrough),
    ]
}

impl Cpu {
    pub(super) fn exec_add_index(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        let Some(pair) = self.decode_pair((opcode >> 4) & 0x03, RegPair::Sp) else {
            return 0;
        };
        let rhs = if pair == RegPair::Hl {
            self.index()
        } else {
            self.read_pair(pair)
        };
        let result = self.alu_add16(self.index(), rhs);
        self.set_index(result);
        15
    }

    pub(super) fn exec_ld_index_nn(&mut self, mem: &mut dyn Memory, _opcode: u8) -> u32 {
        let value = self.fetch16(mem);
        self.set_index(value);
        14
    }

    /// LD (nn),IX (0x22) and LD IX,(nn) (0x2A)
    pub(super) fn exec_ld_index_direct(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let addr = self.fetch16(mem);
        if opcode == 0x2A {
            let value = mem.read16(addr);
            self.set_index(value);
        } else {
            mem.write16(addr, self.index());
        }
        20
    }

    pub(super) fn exec_incdec_index(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        let value = if opcode == 0x2B {
            self.index().wrapping_sub(1)
        } else {
            self.index().wrapping_add(1)
        };
        self.set_index(value);
        10
    }

    /// INC/DEC/LD on the undocumented index halves.
    pub(super) fn exec_half_unary(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let target = (opcode >> 3) & 0x07;
        match opcode & 0x07 {
            4 => {
                let value = self.read_reg8_indexed(mem, target);
                let result = self.alu_inc8(value);
                self.write_reg8_indexed(mem, target, result);
                8
            }
            5 => {
                let value = self.read_reg8_indexed(mem, target);
                let result = self.alu_dec8(value);
                self.write_reg8_indexed(mem, target, result);
                8
            }
            _ => {
                let value = self.fetch8(mem);
                self.write_reg8_indexed(mem, target, value);
                11
            }
        }
    }

    /// INC (IX+d), DEC (IX+d), LD (IX+d),n. For LD the displacement comes
    /// before the immediate.
    pub(super) fn exec_indexed_unary(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let addr = self.indexed_address(mem);
        match opcode {
            0x34 => {
                let result = self.alu_inc8(mem.read8(addr));
                mem.write8(addr, result);
                23
            }
            0x35 => {
                let result = self.alu_dec8(mem.read8(addr));
                mem.write8(addr, result);
                23
            }
            _ => {
                let value = self.fetch8(mem);
                mem.write8(addr, value);
                19
            }
        }
    }

    /// LD r,(IX+d) / LD (IX+d),r. The register side is always the plain
    /// register set, so LD H,(IX+d) loads H.
    pub(super) fn exec_ld_indexed(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let addr = self.indexed_address(mem);
        if src == 6 {
            let value = mem.read8(addr);
            self.write_reg8(mem, dst, value);
        } else {
            let value = self.read_reg8(mem, src);
            mem.write8(addr, value);
        }
        19
    }

    pub(super) fn exec_ld_half(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let value = self.read_reg8_indexed(mem, opcode & 0x07);
        self.write_reg8_indexed(mem, (opcode >> 3) & 0x07, value);
        8
    }

    /// ALU A,IXh / A,IXl / A,(IX+d)
    pub(super) fn exec_alu_index(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let src = opcode & 0x07;
        if src == 6 {
            let addr = self.indexed_address(mem);
            let value = mem.read8(addr);
            self.alu_op(opcode >> 3, value);
            19
        } else {
            let value = self.read_reg8_indexed(mem, src);
            self.alu_op(opcode >> 3, value);
            8
        }
    }

    /// DDCB d op / FDCB d op: rotate, shift, BIT, RES and SET on (IX+d).
    ///
    /// The final opcode is read after the displacement and is not an M1
    /// fetch. Except for BIT, a register field other than 6 also receives
    /// the result.
    pub(super) fn exec_index_cb(&mut self, mem: &mut dyn Memory, _opcode: u8) -> u32 {
        let addr = self.indexed_address(mem);
        let op = self.fetch8(mem);
        let y = (op >> 3) & 0x07;
        let z = op & 0x07;
        let value = mem.read8(addr);

        let result = match op >> 6 {
            0 => self.alu_shift(y, value),
            1 => {
                let flags = alu::bit(y, value, (addr >> 8) as u8, self.regs.flags());
                self.regs.set_flags(flags);
                return 20;
            }
            2 => value & !(1 << y),
            _ => value | (1 << y),
        };

        mem.write8(addr, result);
        if z != 6 {
            self.write_reg8(mem, z, result);
        }
        23
    }

    /// POP IX (0xE1) and PUSH IX (0xE5)
    pub(super) fn exec_push_pop_index(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        if opcode == 0xE5 {
            let value = self.index();
            self.push16(mem, value);
            15
        } else {
            let value = self.pop16(mem);
            self.set_index(value);
            14
        }
    }

    pub(super) fn exec_ex_sp_index(&mut self, mem: &mut dyn Memory, _opcode: u8) -> u32 {
        let sp = self.regs.sp;
        let top = mem.read16(sp);
        mem.write16(sp, self.index());
        self.set_index(top);
        23
    }

    pub(super) fn exec_jp_index(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.pc = self.index();
        8
    }

    pub(super) fn exec_ld_sp_index(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.sp = self.index();
        10
    }

    /// The prefix has no effect on this opcode; run the unprefixed form for
    /// an extra 4 T-states.
    pub(super) fn exec_index_passthrough(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        if matches!(opcode, 0xDD | 0xFD) {
            // A second index prefix supersedes this one. Leave it for the
            // next execute() so chains of prefixes cannot nest, and undo the
            // refresh tick its fetch will repeat.
            self.regs.pc = self.regs.pc.wrapping_sub(1);
            self.regs.r = (self.regs.r & 0x80) | (self.regs.r.wrapping_sub(1) & 0x7F);
            return 4;
        }
        4 + self.dispatch(mem, Prefix::Base, opcode)
    }
}
