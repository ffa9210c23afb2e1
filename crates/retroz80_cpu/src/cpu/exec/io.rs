use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::registers::Flags;

impl Cpu {
    /// OUT (n),A (0xD3) and IN A,(n) (0xDB). The device sees A on the
    /// upper half of the address bus.
    pub(super) fn exec_io_immediate(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xD3 | 0xDB));
        let port = self.fetch8(mem);
        if opcode == 0xDB {
            let address = u16::from_be_bytes([self.regs.a, port]);
            self.regs.a = self.ports.read(port, address);
        } else {
            self.ports.write(port, self.regs.a);
        }
        11
    }

    /// ED 40-78: IN r,(C). ED 70 only updates flags.
    pub(super) fn exec_in_c(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let target = (opcode >> 3) & 0x07;
        let value = self.ports.read(self.regs.c, self.regs.bc());
        let carry = self.regs.flags() & Flags::C;
        self.regs.set_flags(Flags::sz53p(value) | carry);
        if target != 6 {
            self.write_reg8(mem, target, value);
        }
        12
    }

    /// ED 41-79: OUT (C),r. ED 71 writes zero.
    pub(super) fn exec_out_c(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        let source = (opcode >> 3) & 0x07;
        let value = if source == 6 {
            0
        } else {
            self.read_reg8(mem, source)
        };
        self.ports.write(self.regs.c, value);
        12
    }
}
