//! A 48K Spectrum-style machine built on the `retroz80_cpu` core.
//!
//! Provides the memory map (16 KiB ROM, watched display file), a `.z80`
//! version 1 snapshot loader and a frame driver that raises one maskable
//! interrupt per video frame.

pub mod config;
pub mod machine;
pub mod memory;
pub mod snapshot;

pub use config::MachineConfig;
pub use machine::{MachineError, SpectrumMachine};
pub use memory::{DisplayWatch, SpectrumMemory};
pub use snapshot::{Snapshot, SnapshotError};

/// Size of the ROM area at 0x0000. Writes below its end are dropped.
pub const ROM_SIZE: usize = 0x4000;
/// First byte of the display file (bitmap followed by attributes).
pub const DISPLAY_START: u16 = 0x4000;
/// Last byte of the attribute area.
pub const DISPLAY_END: u16 = 0x5AFF;

/// 3.5 MHz clock at 50 frames per second.
pub const T_STATES_PER_FRAME: u32 = 69_888;
pub const FRAME_RATE_HZ: u32 = 50;
