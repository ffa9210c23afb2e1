use crate::cpu::helpers::RegPair;
use crate::cpu::Cpu;
use crate::memory::Memory;

impl Cpu {
    pub(super) fn exec_push(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));
        let Some(pair) = self.decode_pair((opcode >> 4) & 0x03, RegPair::Af) else {
            return 0;
        };
        let value = self.read_pair(pair);
        self.push16(mem, value);
        11
    }

    pub(super) fn exec_pop(&mut self, mem: &mut dyn Memory, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));
        let Some(pair) = self.decode_pair((opcode >> 4) & 0x03, RegPair::Af) else {
            return 0;
        };
        let value = self.pop16(mem);
        self.write_pair(pair, value);
        10
    }
}
