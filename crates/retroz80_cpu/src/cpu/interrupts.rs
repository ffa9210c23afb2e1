use super::Cpu;
use crate::device::FLOATING_BUS;
use crate::memory::Memory;
use crate::registers::InterruptMode;

/// Restart address used by IM 0 (RST 38h on a floating bus) and IM 1.
pub const IM1_VECTOR: u16 = 0x0038;
/// Non-maskable interrupt entry point.
pub const NMI_VECTOR: u16 = 0x0066;

impl Cpu {
    /// Complete a pending EI once the instruction after it has finished.
    ///
    /// A DI in between clears `ei_pending`, which cancels the enable.
    pub(super) fn apply_ei_delay(&mut self) {
        if self.ei_pending {
            self.ei_pending = false;
            self.regs.iff1 = true;
            self.regs.iff2 = true;
        }
    }

    /// Offer a maskable interrupt to the CPU.
    ///
    /// The request is honoured only when IFF1 is set and no EI is still
    /// waiting on its following instruction; otherwise it is dropped
    /// (requests are not latched). Returns the T-states spent on the
    /// response, which are also added to the clock, or 0 if ignored.
    pub fn request_maskable_interrupt(&mut self, mem: &mut dyn Memory) -> u32 {
        if self.fault.is_some() || !self.regs.iff1 || self.ei_pending {
            log::trace!("Z80 maskable interrupt ignored at PC=0x{:04X}", self.regs.pc);
            return 0;
        }

        self.halted = false;
        self.regs.iff1 = false;
        self.regs.iff2 = false;
        self.regs.bump_r();

        let pc = self.regs.pc;
        self.push16(mem, pc);

        let cycles = match self.regs.im {
            InterruptMode::Im0 | InterruptMode::Im1 => {
                self.regs.pc = IM1_VECTOR;
                13
            }
            InterruptMode::Im2 => {
                let table = u16::from_be_bytes([self.regs.i, FLOATING_BUS]);
                self.regs.pc = mem.read16(table);
                19
            }
        };

        log::debug!(
            "Z80 interrupt: mode={:?} return=0x{:04X} vector=0x{:04X} sp=0x{:04X}",
            self.regs.im,
            pc,
            self.regs.pc,
            self.regs.sp,
        );
        self.t_states += u64::from(cycles);
        cycles
    }

    /// Deliver a non-maskable interrupt. IFF2 keeps the pre-NMI IFF1 so that
    /// RETN can restore it.
    pub fn request_nmi(&mut self, mem: &mut dyn Memory) -> u32 {
        if self.fault.is_some() {
            return 0;
        }

        self.halted = false;
        self.regs.iff1 = false;
        self.regs.bump_r();

        let pc = self.regs.pc;
        self.push16(mem, pc);
        self.regs.pc = NMI_VECTOR;

        log::debug!("Z80 NMI: return=0x{pc:04X}");
        self.t_states += 11;
        11
    }
}
