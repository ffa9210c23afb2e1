use std::ops::RangeInclusive;

use typed_builder::TypedBuilder;

use crate::{DISPLAY_END, DISPLAY_START, ROM_SIZE, T_STATES_PER_FRAME};

/// Machine parameters. Every field has a default, so
/// `MachineConfig::builder().build()` describes a stock 48K machine.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct MachineConfig {
    /// T-states executed before the per-frame interrupt is raised.
    #[builder(default = T_STATES_PER_FRAME)]
    pub t_states_per_frame: u32,
    /// Writes below this address are dropped.
    #[builder(default = ROM_SIZE as u16)]
    pub rom_end: u16,
    /// Writes in this range are reported to the display watch.
    #[builder(default = DISPLAY_START..=DISPLAY_END)]
    pub display: RangeInclusive<u16>,
    /// Pace frames to wall-clock time.
    #[builder(default = false)]
    pub realtime: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_48k_machine() {
        let config = MachineConfig::default();
        assert_eq!(config.t_states_per_frame, 69_888);
        assert_eq!(config.rom_end, 0x4000);
        assert_eq!(config.display, 0x4000..=0x5AFF);
        assert!(!config.realtime);
    }

    #[test]
    fn builder_overrides_single_fields() {
        let config = MachineConfig::builder()
            .t_states_per_frame(1_000)
            .realtime(true)
            .build();
        assert_eq!(config.t_states_per_frame, 1_000);
        assert!(config.realtime);
        assert_eq!(config.rom_end, 0x4000);
    }
}
