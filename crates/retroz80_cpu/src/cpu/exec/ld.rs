use crate::cpu::helpers::RegPair;
use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::registers::Flags;

impl Cpu {
    pub(super) fn exec_ld_rr_nn(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));
        let Some(pair) = self.decode_pair((opcode >> 4) & 0x03, RegPair::Sp) else {
            return 0;
        };
        let value = self.fetch16(mem);
        self.write_pair(pair, value);
        10
    }

    /// LD (BC),A / LD A,(BC) / LD (DE),A / LD A,(DE)
    pub(super) fn exec_ld_indirect_a(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x02 | 0x0A | 0x12 | 0x1A));
        let addr = if opcode & 0x10 != 0 {
            self.regs.de()
        } else {
            self.regs.bc()
        };
        if opcode & 0x08 != 0 {
            self.regs.a = mem.read8(addr);
        } else {
            mem.write8(addr, self.regs.a);
        }
        7
    }

    /// LD (nn),HL / LD HL,(nn) / LD (nn),A / LD A,(nn)
    pub(super) fn exec_ld_direct(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let addr = self.fetch16(mem);
        match opcode {
            0x22 => {
                mem.write16(addr, self.regs.hl());
                16
            }
            0x2A => {
                let value = mem.read16(addr);
                self.regs.set_hl(value);
                16
            }
            0x32 => {
                mem.write8(addr, self.regs.a);
                13
            }
            _ => {
                self.regs.a = mem.read8(addr);
                13
            }
        }
    }

    /// LD r,n and LD (HL),n
    pub(super) fn exec_ld_r_n(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let target = (opcode >> 3) & 0x07;
        let value = self.fetch8(mem);
        self.write_reg8(mem, target, value);
        if target == 6 { 10 } else { 7 }
    }

    /// LD r,r' including the (HL) forms. HALT (0x76) is bound elsewhere.
    pub(super) fn exec_ld_r_r(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!((0x40..=0x7F).contains(&opcode) && opcode != 0x76);
        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let value = self.read_reg8(mem, src);
        self.write_reg8(mem, dst, value);
        if dst == 6 || src == 6 { 7 } else { 4 }
    }

    pub(super) fn exec_ld_sp_hl(&mut self, _mem: &mut dyn Memory, _opcode: u8) -> u32 {
        self.regs.sp = self.regs.hl();
        6
    }

    /// ED 43/53/63/73: LD (nn),dd and ED 4B/5B/6B/7B: LD dd,(nn)
    pub(super) fn exec_ld_pair_direct(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let Some(pair) = self.decode_pair((opcode >> 4) & 0x03, RegPair::Sp) else {
            return 0;
        };
        let addr = self.fetch16(mem);
        if opcode & 0x08 != 0 {
            let value = mem.read16(addr);
            self.write_pair(pair, value);
        } else {
            mem.write16(addr, self.read_pair(pair));
        }
        20
    }

    /// ED 47: LD I,A / 4F: LD R,A / 57: LD A,I / 5F: LD A,R
    pub(super) fn exec_ld_special(&mut self, _mem: &mut dyn Memory, opcode: u8) -> u32 {
        match opcode {
            0x47 => self.regs.i = self.regs.a,
            0x4F => self.regs.r = self.regs.a,
            _ => {
                let value = if opcode == 0x57 { self.regs.i } else { self.regs.r };
                self.regs.a = value;
                // PV reports IFF2; carry survives.
                let mut flags = Flags::sz53(value) | (self.regs.flags() & Flags::C);
                flags.set(Flags::PV, self.regs.iff2);
                self.regs.set_flags(flags);
            }
        }
        9
    }
}
