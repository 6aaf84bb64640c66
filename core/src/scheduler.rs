use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::chip8::Chip8;
use crate::constants::TIMER_HZ;
use crate::error::FrameError;
use crate::frame_buffer::FrameBuffer;

/// Something that can show a frame buffer, e.g. a window.
pub trait Screen {
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), FrameError>;
}

/// Something that can sound the Chip-8 tone.
pub trait Speaker {
    fn set_tone(&mut self, on: bool);
}

/// A key going down or up on the hexadecimal keypad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: u8,
    pub pressed: bool,
}

/// What happened during one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Instruction slots used, including ones spent waiting for a key
    pub instructions: u32,
    pub presented: bool,
    pub tone: Option<bool>,
}

/// Spreads a clock speed over 60Hz frames.
///
/// Works in sixtieths of an instruction so rates that aren't a multiple of 60
/// never drift: after `f` frames exactly `floor(f * rate / 60)` instructions
/// have been handed out.
#[derive(Clone, Copy, Debug)]
pub struct Budget {
    rate: u32,
    remainder: u32,
}

impl Budget {
    pub fn new(rate: u32) -> Self {
        Budget { rate, remainder: 0 }
    }

    /// How many instructions the next frame should execute
    pub fn next_frame(&mut self) -> u32 {
        let total = u64::from(self.remainder) + u64::from(self.rate);
        let hz = u64::from(TIMER_HZ);
        self.remainder = (total % hz) as u32;
        (total / hz) as u32
    }
}

/// Keeps frames 1/60s apart in real time.
///
/// When a frame runs late the schedule restarts from now instead of running
/// extra frames to catch up.
#[derive(Clone, Copy, Debug)]
pub struct Pacer {
    period: Duration,
    deadline: Instant,
}

impl Pacer {
    pub fn new(now: Instant) -> Self {
        let period = Duration::from_secs(1) / TIMER_HZ;
        Pacer {
            period,
            deadline: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// How long to sleep before starting the next frame, given the current time
    pub fn delay_until_next(&mut self, now: Instant) -> Duration {
        let delay = if now < self.deadline {
            self.deadline - now
        } else {
            debug!("frame overran by {:?}", now - self.deadline);
            self.deadline = now;
            Duration::ZERO
        };
        self.deadline += self.period;
        delay
    }

    /// Sleeps until the next frame is due
    pub fn wait(&mut self) {
        let delay = self.delay_until_next(Instant::now());
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// # Scheduler
/// Ties the CPU to real time. Every frame it:
/// 1. applies queued key events
/// 2. executes this frame's share of the clock speed
/// 3. ticks the timers once
/// 4. presents the frame buffer if it changed
/// 5. forwards tone changes
pub struct Scheduler {
    clock_speed: u32,
    budget: Budget,
}

impl Scheduler {
    /// # Arguments
    /// * `clock_speed` instructions per second
    pub fn new(clock_speed: u32) -> Self {
        Scheduler {
            clock_speed,
            budget: Budget::new(clock_speed),
        }
    }

    pub fn clock_speed(&self) -> u32 {
        self.clock_speed
    }

    /// Runs a single frame.
    ///
    /// A stack fault stops the frame immediately; the timers are not ticked
    /// and nothing is presented.
    pub fn run_frame<I>(
        &mut self,
        chip8: &mut Chip8,
        events: I,
        screen: &mut dyn Screen,
        speaker: &mut dyn Speaker,
    ) -> Result<FrameReport, FrameError>
    where
        I: IntoIterator<Item = KeyEvent>,
    {
        for event in events {
            chip8.deliver_key(event.key, event.pressed);
        }

        let instructions = self.budget.next_frame();
        for _ in 0..instructions {
            chip8.step()?;
        }

        let tone = chip8.tick_timers();

        let presented = match chip8.take_frame() {
            Some(frame) => {
                screen.present(&frame)?;
                true
            }
            None => false,
        };

        if let Some(on) = tone {
            speaker.set_tone(on);
        }

        Ok(FrameReport {
            instructions,
            presented,
            tone,
        })
    }
}
