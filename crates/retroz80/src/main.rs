use std::path::PathBuf;

use retroz80::RunOptions;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(rom) = args.next() else {
        eprintln!(
            "Usage: retroz80 <rom> [snapshot.z80] [frames]\n\
             Set RETROZ80_REALTIME=1 to run at 50 frames per second."
        );
        std::process::exit(1);
    };

    let snapshot = args.next().filter(|arg| !arg.is_empty()).map(PathBuf::from);
    let frames = match args.next() {
        Some(count) => Some(count.parse::<u64>().map_err(|err| {
            anyhow::anyhow!("invalid frame count '{count}': {err}")
        })?),
        None => None,
    };
    let realtime = std::env::var("RETROZ80_REALTIME")
        .map(|value| !matches!(value.as_str(), "" | "0" | "false"))
        .unwrap_or(false);

    log::info!("Running ROM '{rom}'");
    retroz80::run(RunOptions {
        rom: PathBuf::from(rom),
        snapshot,
        frames,
        realtime,
    })
}
