use super::Cpu;
use crate::dispatch::Prefix;
use crate::error::Z80Error;
use crate::memory::Memory;
use crate::registers::Flags;

/// Register pair named by a 2-bit selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum RegPair {
    Bc,
    De,
    Hl,
    Sp,
    Af,
}

impl Cpu {
    /// Opcode fetch (M1): advances PC and the refresh counter.
    #[inline]
    pub(super) fn fetch_opcode(&mut self, mem: &mut dyn Memory) -> u8 {
        self.regs.bump_r();
        self.fetch8(mem)
    }

    #[inline]
    pub(super) fn fetch8(&mut self, mem: &mut dyn Memory) -> u8 {
        let value = mem.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    #[inline]
    pub(super) fn fetch16(&mut self, mem: &mut dyn Memory) -> u16 {
        let lo = self.fetch8(mem);
        let hi = self.fetch8(mem);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn push16(&mut self, mem: &mut dyn Memory, value: u16) {
        self.regs.sp = self.regs.sp.wrapping_sub(2);
        mem.write16(self.regs.sp, value);
    }

    #[inline]
    pub(super) fn pop16(&mut self, mem: &mut dyn Memory) -> u16 {
        let value = mem.read16(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    /// Read an 8-bit register or (HL) by index.
    ///
    /// 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    #[inline]
    pub(super) fn read_reg8(&mut self, mem: &mut dyn Memory, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => mem.read8(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    /// Write an 8-bit register or (HL) by index. Same encoding as `read_reg8`.
    #[inline]
    pub(super) fn write_reg8(&mut self, mem: &mut dyn Memory, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => mem.write8(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    /// IX or IY, depending on the active prefix.
    #[inline]
    pub(super) fn index(&self) -> u16 {
        match self.prefix {
            Prefix::Fd => self.regs.iy,
            _ => self.regs.ix,
        }
    }

    #[inline]
    pub(super) fn set_index(&mut self, value: u16) {
        match self.prefix {
            Prefix::Fd => self.regs.iy = value,
            _ => self.regs.ix = value,
        }
    }

    /// Register access inside DD/FD opcodes: H and L name the index halves.
    /// Index 6 is never passed here; memory forms use `indexed_address`.
    pub(super) fn read_reg8_indexed(&mut self, mem: &mut dyn Memory, index: u8) -> u8 {
        match (index & 0x07, self.prefix) {
            (4, Prefix::Fd) => self.regs.iyh(),
            (5, Prefix::Fd) => self.regs.iyl(),
            (4, _) => self.regs.ixh(),
            (5, _) => self.regs.ixl(),
            (other, _) => self.read_reg8(mem, other),
        }
    }

    pub(super) fn write_reg8_indexed(&mut self, mem: &mut dyn Memory, index: u8, value: u8) {
        let [hi, lo] = self.index().to_be_bytes();
        match index & 0x07 {
            4 => self.set_index(u16::from_be_bytes([value, lo])),
            5 => self.set_index(u16::from_be_bytes([hi, value])),
            other => self.write_reg8(mem, other, value),
        }
    }

    /// Fetch the signed displacement byte and form IX+d / IY+d.
    #[inline]
    pub(super) fn indexed_address(&mut self, mem: &mut dyn Memory) -> u16 {
        let displacement = self.fetch8(mem) as i8;
        self.index().wrapping_add_signed(i16::from(displacement))
    }

    /// Decode a 2-bit pair selector; `last` names what selector 3 means
    /// (SP for arithmetic and loads, AF for PUSH/POP).
    pub(super) fn decode_pair(&mut self, selector: u8, last: RegPair) -> Option<RegPair> {
        match selector {
            0 => Some(RegPair::Bc),
            1 => Some(RegPair::De),
            2 => Some(RegPair::Hl),
            3 => Some(last),
            _ => {
                self.lock(Z80Error::InvalidRegisterSelector(selector));
                None
            }
        }
    }

    pub(super) fn read_pair(&self, pair: RegPair) -> u16 {
        match pair {
            RegPair::Bc => self.regs.bc(),
            RegPair::De => self.regs.de(),
            RegPair::Hl => self.regs.hl(),
            RegPair::Sp => self.regs.sp,
            RegPair::Af => self.regs.af(),
        }
    }

    pub(super) fn write_pair(&mut self, pair: RegPair, value: u16) {
        match pair {
            RegPair::Bc => self.regs.set_bc(value),
            RegPair::De => self.regs.set_de(value),
            RegPair::Hl => self.regs.set_hl(value),
            RegPair::Sp => self.regs.sp = value,
            RegPair::Af => self.regs.set_af(value),
        }
    }

    /// Condition code by index: NZ, Z, NC, C, PO, PE, P, M.
    pub(super) fn condition(&self, cc: u8) -> bool {
        let flags = self.regs.flags();
        match cc & 0x07 {
            0 => !flags.contains(Flags::Z),
            1 => flags.contains(Flags::Z),
            2 => !flags.contains(Flags::C),
            3 => flags.contains(Flags::C),
            4 => !flags.contains(Flags::PV),
            5 => flags.contains(Flags::PV),
            6 => !flags.contains(Flags::S),
            _ => flags.contains(Flags::S),
        }
    }

    /// Relative jump helper used by JR and JR cc.
    ///
    /// The displacement is relative to the address after the operand.
    pub(super) fn jr(&mut self, mem: &mut dyn Memory, cond: bool) -> u32 {
        let offset = self.fetch8(mem) as i8;
        if cond {
            self.regs.pc = self.regs.pc.wrapping_add_signed(i16::from(offset));
            12
        } else {
            7
        }
    }

    /// Step a 16-bit pointer for block instructions.
    #[inline]
    pub(super) fn step_pointer(value: u16, decrement: bool) -> u16 {
        if decrement {
            value.wrapping_sub(1)
        } else {
            value.wrapping_add(1)
        }
    }
}
