use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use retroz80_spectrum::{MachineConfig, SpectrumMachine, FRAME_RATE_HZ};

/// What to load and how long to run.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub rom: PathBuf,
    pub snapshot: Option<PathBuf>,
    /// Stop after this many frames. `None` runs until the CPU faults.
    pub frames: Option<u64>,
    pub realtime: bool,
}

/// Sleeps the host thread so that frames are released at a fixed rate.
pub struct FramePacer {
    frame: Duration,
    next: Instant,
}

impl FramePacer {
    pub fn new(rate_hz: u32) -> Self {
        let frame = Duration::from_secs(1) / rate_hz.max(1);
        Self {
            frame,
            next: Instant::now() + frame,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Block until the current frame's deadline, then arm the next one.
    /// A host that falls more than a frame behind starts over from now
    /// rather than racing to catch up.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next.checked_duration_since(now) {
            std::thread::sleep(remaining);
            self.next += self.frame;
        } else if now.duration_since(self.next) > self.frame {
            self.next = now + self.frame;
        } else {
            self.next += self.frame;
        }
    }
}

pub fn run(options: RunOptions) -> Result<()> {
    let rom = std::fs::read(&options.rom)
        .with_context(|| format!("failed to read ROM '{}'", options.rom.display()))?;

    let config = MachineConfig::builder().realtime(options.realtime).build();
    let mut machine = SpectrumMachine::new(config)?;
    machine.load_rom(&rom)?;

    if let Some(path) = &options.snapshot {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read snapshot '{}'", path.display()))?;
        machine
            .load_snapshot(&bytes)
            .with_context(|| format!("failed to load snapshot '{}'", path.display()))?;
        log::info!("Loaded snapshot '{}'", path.display());
    }

    let mut pacer = machine.config().realtime.then(|| FramePacer::new(FRAME_RATE_HZ));
    let started = Instant::now();
    while options.frames.map_or(true, |limit| machine.frames() < limit) {
        machine.step_frame()?;
        if let Some(pacer) = pacer.as_mut() {
            pacer.wait();
        }
    }

    log::info!(
        "Ran {} frames ({} T-states) in {:.2?}, PC=0x{:04X}",
        machine.frames(),
        machine.cpu().t_states(),
        started.elapsed(),
        machine.cpu().regs.pc,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_frame_length_follows_rate() {
        assert_eq!(FramePacer::new(50).frame_duration(), Duration::from_millis(20));
    }

    #[test]
    fn pacer_holds_frames_back() {
        let mut pacer = FramePacer::new(200);
        let started = Instant::now();
        pacer.wait();
        pacer.wait();
        assert!(started.elapsed() >= Duration::from_millis(9));
    }

    #[test]
    fn runs_a_rom_from_disk_for_fixed_frames() {
        let path = std::env::temp_dir().join(format!("retroz80-run-{}.rom", std::process::id()));
        // DI; HALT
        std::fs::write(&path, [0xF3, 0x76]).unwrap();

        let result = run(RunOptions {
            rom: path.clone(),
            frames: Some(3),
            ..RunOptions::default()
        });
        std::fs::remove_file(&path).unwrap();
        result.unwrap();
    }

    #[test]
    fn missing_rom_reports_path() {
        let err = run(RunOptions {
            rom: PathBuf::from("/nonexistent/retroz80.rom"),
            frames: Some(1),
            ..RunOptions::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/retroz80.rom"));
    }
}
