use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};

use emu8_core::{Chip8, Config, Pacer, Scheduler, Speaker};
use emu8_display::{open_window, Display};

use crate::audio::{Beeper, Mute};
use crate::keymap::{translate, Action};

/// Everything needed to start a session
#[derive(Clone, Debug)]
pub struct Options {
    pub rom: PathBuf,
    pub clock_speed: u32,
    pub scale: u32,
    pub config: Config,
}

/// Builds a machine with the ROM at `options.rom` loaded
pub fn load(options: &Options) -> Result<Chip8> {
    let mut chip8 = Chip8::with_config(options.config);
    let file = File::open(&options.rom)
        .with_context(|| format!("unable to open ROM {}", options.rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8
        .load_rom(&mut reader)
        .with_context(|| format!("unable to load ROM {}", options.rom.display()))?;
    Ok(chip8)
}

/// Runs `chip8` in an SDL2 window until the user quits or the CPU faults
pub fn run(mut chip8: Chip8, options: &Options) -> Result<()> {
    // Get SDL2 context
    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let canvas = open_window(&sdl, options.scale)?;
    let creator = canvas.texture_creator();
    let mut display = Display::new(canvas, &creator)?;
    let mut speaker: Box<dyn Speaker> = match Beeper::new(&sdl) {
        Ok(beeper) => Box::new(beeper),
        Err(e) => {
            warn!("audio unavailable, running silently: {}", e);
            Box::new(Mute)
        }
    };
    let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;

    let mut scheduler = Scheduler::new(options.clock_speed);
    let mut pacer = Pacer::new(Instant::now());
    info!(
        "running at {} instructions per second ({:?})",
        scheduler.clock_speed(),
        chip8.config().compatibility
    );

    // Whether or not the frame rate should be respected
    let mut fast_forward = false;

    'event: loop {
        let mut keys = Vec::new();
        for event in events.poll_iter() {
            match translate(&event) {
                Some(Action::Quit) => break 'event,
                Some(Action::Key(key)) => keys.push(key),
                Some(Action::FastForward(on)) => fast_forward = on,
                None => continue,
            }
        }

        scheduler
            .run_frame(&mut chip8, keys, &mut display, speaker.as_mut())
            .with_context(|| {
                format!(
                    "emulation stopped at {:#05X} after {} unknown opcodes",
                    chip8.pc(),
                    chip8.unknown_opcode_count()
                )
            })?;

        if !fast_forward {
            pacer.wait();
        }
    }

    speaker.set_tone(false);
    info!("quit");
    Ok(())
}
