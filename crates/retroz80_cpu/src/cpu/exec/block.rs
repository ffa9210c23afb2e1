use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::registers::Flags;

/// Cost of an iteration that rewinds PC to repeat.
const REPEAT_T_STATES: u32 = 21;
/// Cost of a single-shot form or of the final repeat iteration.
const FINAL_T_STATES: u32 = 16;

/// Opcode bit 3 selects decrementing forms (LDD, CPD, IND, OUTD).
#[inline]
fn decrements(opcode: u8) -> bool {
    opcode & 0x08 != 0
}

/// Opcode bit 4 selects repeating forms (LDIR, CPIR, INIR, OTIR).
#[inline]
fn repeats(opcode: u8) -> bool {
    opcode & 0x10 != 0
}

impl Cpu {
    /// Rewind PC over the two-byte ED opcode when the repeat condition holds.
    fn finish_block(&mut self, repeat: bool) -> u32 {
        if repeat {
            self.regs.pc = self.regs.pc.wrapping_sub(2);
            REPEAT_T_STATES
        } else {
            FINAL_T_STATES
        }
    }

    /// LDI / LDD / LDIR / LDDR: copy (HL) to (DE), step both, decrement BC.
    pub(super) fn exec_block_ld(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xA0 | 0xA8 | 0xB0 | 0xB8));
        let down = decrements(opcode);
        let hl = self.regs.hl();
        let de = self.regs.de();
        let value = mem.read8(hl);
        mem.write8(de, value);

        self.regs.set_hl(Self::step_pointer(hl, down));
        self.regs.set_de(Self::step_pointer(de, down));
        let bc = self.regs.bc().wrapping_sub(1);
        self.regs.set_bc(bc);

        // Bits 5/3 come from bit 1 and bit 3 of value + A.
        let n = value.wrapping_add(self.regs.a);
        let mut flags = self.regs.flags() & (Flags::S | Flags::Z | Flags::C);
        flags.set(Flags::PV, bc != 0);
        flags.set(Flags::Y, n & 0x02 != 0);
        flags.set(Flags::X, n & 0x08 != 0);
        self.regs.set_flags(flags);

        self.finish_block(repeats(opcode) && bc != 0)
    }

    /// CPI / CPD / CPIR / CPDR: compare A with (HL), step HL, decrement BC.
    ///
    /// PV reports BC != 0, not whether a match was found. The repeat forms
    /// stop on a match or when BC reaches zero.
    pub(super) fn exec_block_cp(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xA1 | 0xA9 | 0xB1 | 0xB9));
        let hl = self.regs.hl();
        let value = mem.read8(hl);
        let a = self.regs.a;
        let result = a.wrapping_sub(value);
        let half = (a & 0x0F) < (value & 0x0F);

        self.regs.set_hl(Self::step_pointer(hl, decrements(opcode)));
        let bc = self.regs.bc().wrapping_sub(1);
        self.regs.set_bc(bc);

        // Bits 5/3 come from bit 1 and bit 3 of result - H.
        let n = result.wrapping_sub(u8::from(half));
        let mut flags = (self.regs.flags() & Flags::C) | Flags::N;
        flags.set(Flags::S, result & 0x80 != 0);
        flags.set(Flags::Z, result == 0);
        flags.set(Flags::H, half);
        flags.set(Flags::PV, bc != 0);
        flags.set(Flags::Y, n & 0x02 != 0);
        flags.set(Flags::X, n & 0x08 != 0);
        self.regs.set_flags(flags);

        self.finish_block(repeats(opcode) && bc != 0 && result != 0)
    }

    /// INI / IND / INIR / INDR: read port C into (HL), step HL, decrement B.
    pub(super) fn exec_block_in(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xA2 | 0xAA | 0xB2 | 0xBA));
        let value = self.ports.read(self.regs.c, self.regs.bc());
        let hl = self.regs.hl();
        mem.write8(hl, value);
        self.regs.set_hl(Self::step_pointer(hl, decrements(opcode)));
        self.regs.b = self.regs.b.wrapping_sub(1);
        self.block_io_flags();
        self.finish_block(repeats(opcode) && self.regs.b != 0)
    }

    /// OUTI / OUTD / OTIR / OTDR: decrement B, write (HL) to port C, step HL.
    pub(super) fn exec_block_out(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xA3 | 0xAB | 0xB3 | 0xBB));
        let hl = self.regs.hl();
        let value = mem.read8(hl);
        self.regs.b = self.regs.b.wrapping_sub(1);
        self.ports.write(self.regs.c, value);
        self.regs.set_hl(Self::step_pointer(hl, decrements(opcode)));
        self.block_io_flags();
        self.finish_block(repeats(opcode) && self.regs.b != 0)
    }

    /// S, Z and bits 5/3 follow B; N is set; H, PV and C are kept.
    fn block_io_flags(&mut self) {
        let kept = self.regs.flags() & (Flags::H | Flags::PV | Flags::C);
        self.regs.set_flags(kept | Flags::sz53(self.regs.b) | Flags::N);
    }
}
