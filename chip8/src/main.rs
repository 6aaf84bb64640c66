use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::error;

use emu8_core::constants::{DEFAULT_CLOCK_SPEED, DEFAULT_SCALE};
use emu8_core::{Compatibility, Config};

mod audio;
mod keymap;
mod run;

/// A Chip-8 emulator.
///
/// Keys 1234/QWER/ASDF/ZXCV are the keypad, hold Space to fast-forward and
/// press Escape to quit. Set RUST_LOG=trace to log every instruction.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(short, long, default_value_t = DEFAULT_CLOCK_SPEED,
          value_parser = clap::value_parser!(u32).range(1..=100_000))]
    clock_speed: u32,

    /// Window pixels per Chip-8 pixel
    #[arg(short, long, default_value_t = DEFAULT_SCALE,
          value_parser = clap::value_parser!(u32).range(1..=64))]
    scale: u32,

    /// Shift Vy rather than Vx and advance I on FX55/FX65, as the COSMAC VIP did
    #[arg(long)]
    vip_quirks: bool,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn options(self) -> run::Options {
        let compatibility = if self.vip_quirks {
            Compatibility::CosmacVip
        } else {
            Compatibility::Modern
        };
        run::Options {
            rom: self.rom,
            clock_speed: self.clock_speed,
            scale: self.scale,
            config: Config {
                compatibility,
                seed: self.seed,
            },
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version also come through here
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    let options = args.options();

    let result = run::load(&options).and_then(|chip8| run::run(chip8, &options));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
