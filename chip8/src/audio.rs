use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use emu8_core::Speaker;

const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.15;

/// A square wave generator fed to the SDL2 audio thread
struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase < 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// Plays the Chip-8 tone through the default audio device
pub struct Beeper {
    device: AudioDevice<SquareWave>,
}

impl Beeper {
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let audio = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(44_100),
            channels: Some(1),
            samples: None,
        };
        let device = audio.open_playback(None, &desired, |spec| SquareWave {
            phase_inc: TONE_HZ / spec.freq as f32,
            phase: 0.0,
            volume: VOLUME,
        })?;
        Ok(Beeper { device })
    }
}

impl Speaker for Beeper {
    fn set_tone(&mut self, on: bool) {
        if on {
            self.device.resume();
        } else {
            self.device.pause();
        }
    }
}

/// Used when no audio device can be opened
pub struct Mute;

impl Speaker for Mute {
    fn set_tone(&mut self, _on: bool) {}
}
