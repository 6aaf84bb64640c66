use std::collections::HashSet;
use std::io::Read;

use log::{info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::constants::{KEY_COUNT, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Fault, RomLoadError};
use crate::frame_buffer::FrameBuffer;
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::operations::execute;
use crate::state::{RunState, State};

/// What a single call to `Chip8::step` did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Step {
    /// The frame buffer changed
    pub redraw: bool,
    /// The fetched opcode wasn't recognised and was skipped
    pub unknown_opcode: Option<Opcode>,
    /// The CPU is suspended on FX0A; nothing was executed
    pub waiting: bool,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`, which only changes through the methods below
///  - the random number generator behind CXNN
///  - the tone state last reported to the audio device
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - advancing its timers
/// - taking snapshots of its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    config: Config,
    rng: StdRng,
    tone: bool,
    unknown_opcodes: u64,
    seen_unknown: HashSet<Opcode>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Chip8 {
            state: State::new(),
            config,
            rng,
            tone: false,
            unknown_opcodes: 0,
            seen_unknown: HashSet::new(),
        }
    }

    /// Copies `bytes` into memory starting at `offset`.
    ///
    /// Fails without writing anything if the bytes don't fit below 4K.
    pub fn load(&mut self, bytes: &[u8], offset: u16) -> Result<(), RomLoadError> {
        let start = offset as usize;
        let capacity = MEMORY_SIZE.saturating_sub(start);
        if start > MEMORY_SIZE || bytes.len() > capacity {
            return Err(RomLoadError::TooLarge {
                size: bytes.len(),
                offset,
                capacity,
            });
        }
        self.state.memory[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Load a rom from a source file at the conventional 0x200
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<usize, RomLoadError> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load(&rom, PROGRAM_START)?;
        info!("loaded {} byte ROM at {:#05X}", rom.len(), PROGRAM_START);
        Ok(rom.len())
    }

    /// Executes the instruction at the program counter.
    /// - does nothing while awaiting a keypress
    /// - skips unrecognised opcodes, counting them
    /// - on a stack fault the machine is left untouched
    pub fn step(&mut self) -> Result<Step, Fault> {
        if let RunState::WaitingForKey { .. } = self.state.run_state {
            return Ok(Step {
                waiting: true,
                ..Step::default()
            });
        }

        let op = self.get_op();
        let instruction = Instruction::decode(op);
        trace!(
            "{:03X} {} {} v{:02X?} i{:03X} sp{}",
            self.state.pc,
            op,
            instruction,
            self.state.v,
            self.state.i,
            self.state.sp
        );

        let pc = self.state.pc;
        execute(
            instruction,
            &mut self.state,
            &mut self.rng,
            self.config.compatibility,
        )?;

        let unknown_opcode = match instruction {
            Instruction::Unknown(op) => {
                self.record_unknown(op, pc);
                Some(op)
            }
            _ => None,
        };

        Ok(Step {
            redraw: instruction.requests_redraw(),
            unknown_opcode,
            waiting: false,
        })
    }

    fn record_unknown(&mut self, op: Opcode, pc: u16) {
        self.unknown_opcodes += 1;
        if self.seen_unknown.insert(op) {
            warn!("skipping unknown opcode {} at {:#05X}", op, pc);
        }
    }

    /// Sets the pressed status of a key.
    ///
    /// A press while the CPU waits on FX0A stores the key in the waiting
    /// register and moves past the FX0A.
    ///
    /// # Arguments
    /// * `key` the keypad index 0x0..=0xF
    /// * `pressed` whether the key went down or up
    pub fn deliver_key(&mut self, key: u8, pressed: bool) {
        if key as usize >= KEY_COUNT {
            warn!("ignoring event for key {:#04X} outside the keypad", key);
            return;
        }
        self.state.pressed_keys[key as usize] = pressed;

        if let (true, RunState::WaitingForKey { register }) = (pressed, self.state.run_state) {
            self.state.v[register as usize] = key;
            self.state.advance(2);
            self.state.run_state = RunState::Running;
        }
    }

    /// Counts both timers down by one, stopping at zero.
    ///
    /// Returns `Some(on)` when the tone should start or stop. A sound timer
    /// set since the last tick is heard for at least this tick, even when it
    /// runs out here.
    pub fn tick_timers(&mut self) -> Option<bool> {
        let started = std::mem::take(&mut self.state.sound_started);
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);

        let tone = started || self.state.sound_timer > 0;
        if tone != self.tone {
            self.tone = tone;
            Some(tone)
        } else {
            None
        }
    }

    /// Returns a copy of the FrameBuffer if the display should be redrawn,
    /// lowering the redraw flag
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn v(&self) -> &[u8; 16] {
        &self.state.v
    }

    pub fn i(&self) -> u16 {
        self.state.i
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn stack_depth(&self) -> usize {
        self.state.sp as usize
    }

    pub fn is_waiting(&self) -> bool {
        self.state.run_state != RunState::Running
    }

    /// How many unrecognised opcodes have been skipped so far
    pub fn unknown_opcode_count(&self) -> u64 {
        self.unknown_opcodes
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Opcode {
        let pc = self.state.pc;
        Opcode::from_bytes(self.state.read(pc), self.state.read(pc.wrapping_add(1)))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
