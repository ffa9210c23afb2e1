use thiserror::Error;

use retroz80_cpu::{Cpu, Z80Error};

use crate::config::MachineConfig;
use crate::memory::{spectrum_memory, DisplayWatch, SpectrumMemory};
use crate::snapshot::{Snapshot, SnapshotError};
use crate::{DISPLAY_END, DISPLAY_START};

#[derive(Debug, Error)]
pub enum MachineError {
    #[error(transparent)]
    Cpu(#[from] Z80Error),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("ROM image is {len} bytes but the ROM area holds {limit}")]
    RomTooLarge { len: usize, limit: usize },
}

/// 48K machine: the Z80 core, its memory map and the frame clock.
pub struct SpectrumMachine {
    cpu: Cpu,
    memory: SpectrumMemory,
    config: MachineConfig,
    frames: u64,
}

impl SpectrumMachine {
    pub fn new(config: MachineConfig) -> Result<Self, MachineError> {
        Ok(Self {
            cpu: Cpu::new()?,
            memory: spectrum_memory(&config),
            config,
            frames: 0,
        })
    }

    /// Reset the CPU. Memory, ROM included, is kept.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Install a ROM image at 0x0000, bypassing write protection.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), MachineError> {
        let limit = usize::from(self.memory.protect_below());
        if rom.len() > limit {
            return Err(MachineError::RomTooLarge {
                len: rom.len(),
                limit,
            });
        }
        self.memory.load(0x0000, rom);
        log::info!("Loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Parse a `.z80` file and restore the CPU and RAM from it.
    pub fn load_snapshot(&mut self, bytes: &[u8]) -> Result<(), MachineError> {
        let snapshot = Snapshot::parse(bytes)?;
        snapshot.apply(&mut self.cpu, &mut self.memory);
        Ok(())
    }

    /// Run one video frame: execute until the frame budget is spent, then
    /// offer the frame interrupt. Returns the T-states consumed, including
    /// the interrupt response.
    pub fn step_frame(&mut self) -> Result<u32, MachineError> {
        let budget = self.config.t_states_per_frame;
        let mut elapsed: u32 = 0;
        while elapsed < budget {
            elapsed = elapsed.saturating_add(self.cpu.execute(&mut self.memory)?);
        }
        elapsed = elapsed.saturating_add(self.cpu.request_maskable_interrupt(&mut self.memory));
        self.frames += 1;
        Ok(elapsed)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn memory(&self) -> &SpectrumMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut SpectrumMemory {
        &mut self.memory
    }

    /// Bitmap and attribute bytes, 0x4000-0x5AFF.
    pub fn display_file(&self) -> &[u8] {
        &self.memory.ram().as_slice()[usize::from(DISPLAY_START)..=usize::from(DISPLAY_END)]
    }

    pub fn display_watch(&mut self) -> &mut DisplayWatch {
        self.memory.listener_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retroz80_cpu::{InterruptMode, Memory, Prefix, IM1_VECTOR};

    fn machine(budget: u32) -> SpectrumMachine {
        let config = MachineConfig::builder().t_states_per_frame(budget).build();
        SpectrumMachine::new(config).unwrap()
    }

    #[test]
    fn frame_consumes_budget_then_interrupts() {
        let mut machine = machine(100);
        // EI; IM 1; loop: JR loop
        machine.load_rom(&[0xFB, 0xED, 0x56, 0x18, 0xFE]).unwrap();
        machine.memory_mut().load(IM1_VECTOR, &[0xFB, 0xC9]);
        machine.cpu_mut().regs.sp = 0x8000;

        let spent = machine.step_frame().unwrap();
        assert!(spent >= 100 + 13);
        assert_eq!(machine.frames(), 1);
        assert_eq!(machine.cpu().regs.im, InterruptMode::Im1);
        assert_eq!(machine.cpu().regs.pc, IM1_VECTOR);
        assert_eq!(machine.memory().read16(0x7FFE), 0x0003);
    }

    #[test]
    fn halted_program_still_advances_frames() {
        let mut machine = machine(1_000);
        machine.load_rom(&[0x76]).unwrap();
        let spent = machine.step_frame().unwrap();
        assert_eq!(spent, 1_000);
        assert!(machine.cpu().is_halted());
        assert_eq!(machine.cpu().t_states(), 1_000);
    }

    #[test]
    fn program_cannot_overwrite_rom_but_draws_to_screen() {
        let mut machine = machine(64);
        // LD A,0xAA; LD (0x0000),A; LD (0x4000),A; HALT
        machine.load_rom(&[0x3E, 0xAA, 0x32, 0x00, 0x00, 0x32, 0x00, 0x40, 0x76]).unwrap();
        machine.step_frame().unwrap();

        assert_eq!(machine.memory().read8(0x0000), 0x3E);
        assert_eq!(machine.display_file()[0], 0xAA);
        assert_eq!(machine.display_file().len(), 0x1B00);
        assert_eq!(machine.display_watch().take_dirty(), Some(0x4000..=0x4000));
    }

    #[test]
    fn cpu_fault_surfaces_as_machine_error() {
        let mut machine = machine(100);
        machine.load_rom(&[0xED, 0x00]).unwrap();
        match machine.step_frame() {
            Err(MachineError::Cpu(Z80Error::UnimplementedOpcode { table, opcode, pc })) => {
                assert_eq!(table, Prefix::Ed);
                assert_eq!(opcode, 0x00);
                assert_eq!(pc, 0x0000);
            }
            other => panic!("expected a CPU fault, got {other:?}"),
        }
        assert_eq!(machine.frames(), 0);
    }

    #[test]
    fn oversized_rom_is_rejected() {
        let mut machine = machine(100);
        let rom = vec![0u8; 0x4001];
        assert!(matches!(
            machine.load_rom(&rom),
            Err(MachineError::RomTooLarge { len: 0x4001, limit: 0x4000 })
        ));
    }

    #[test]
    fn rom_limit_follows_protected_area() {
        let config = MachineConfig::builder().rom_end(0x2000).build();
        let mut machine = SpectrumMachine::new(config).unwrap();
        assert!(machine.load_rom(&[0u8; 0x2000]).is_ok());
        assert!(matches!(
            machine.load_rom(&[0u8; 0x2001]),
            Err(MachineError::RomTooLarge { len: 0x2001, limit: 0x2000 })
        ));
    }

    #[test]
    fn snapshot_errors_propagate() {
        let mut machine = machine(100);
        assert!(matches!(
            machine.load_snapshot(&[0u8; 4]),
            Err(MachineError::Snapshot(SnapshotError::TooShort { len: 4 }))
        ));
    }
}
