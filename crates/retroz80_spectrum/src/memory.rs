use std::ops::RangeInclusive;

use retroz80_cpu::{OverlayMemory, WriteListener};

use crate::config::MachineConfig;

/// Memory map of the machine: ROM below `rom_end`, display writes watched.
pub type SpectrumMemory = OverlayMemory<DisplayWatch>;

pub fn spectrum_memory(config: &MachineConfig) -> SpectrumMemory {
    OverlayMemory::new(config.rom_end, config.display.clone(), DisplayWatch::default())
}

/// Collects writes to the display file so a renderer can redraw only the
/// region that changed since it last looked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayWatch {
    writes: u64,
    dirty: Option<(u16, u16)>,
}

impl DisplayWatch {
    /// Total display writes seen.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Smallest address range covering every write since the last take.
    pub fn dirty_range(&self) -> Option<RangeInclusive<u16>> {
        self.dirty.map(|(low, high)| low..=high)
    }

    /// Return the dirty range and clear it.
    pub fn take_dirty(&mut self) -> Option<RangeInclusive<u16>> {
        self.dirty.take().map(|(low, high)| low..=high)
    }
}

impl WriteListener for DisplayWatch {
    fn on_write(&mut self, addr: u16, _value: u8) {
        self.writes += 1;
        self.dirty = Some(match self.dirty {
            Some((low, high)) => (low.min(addr), high.max(addr)),
            None => (addr, addr),
        });
    }
}
