use crate::constants::{
    ADDRESS_MASK, FONT_BASE, KEY_COUNT, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, STACK_DEPTH,
};
use crate::error::Fault;
use crate::frame_buffer::FrameBuffer;

/// Whether the CPU is executing or suspended on FX0A
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Suspended until a key press is written into `V[register]`
    WaitingForKey { register: u8 },
}

/// The complete Chip-8 machine state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, kept within the 12-bit address space
///
/// Stack
/// - 16 return addresses; (sp) is the number currently saved, so 0..=16
///
/// Timers
/// - 2 8-bit timers (delay & sound), counted down at 60Hz
/// - (sound_started) raised by FX18 so even a 1-tick sound is heard
///
/// ## Memory
/// - 4096 bytes of addressable memory, font at 0x050, programs at 0x200
/// - 64x32 frame buffer plus a flag raised whenever it changes
///
/// ## Input
/// - 16 key flags for the keypad 0..F
/// - `run_state` records whether FX0A has suspended the CPU
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub sound_started: bool,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub pressed_keys: [bool; KEY_COUNT],
    pub run_state: RunState,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_BASE as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            sound_started: false,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            pressed_keys: [false; KEY_COUNT],
            run_state: RunState::Running,
        }
    }

    /// Reads a byte; the address wraps within 4K
    pub fn read(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDRESS_MASK) as usize]
    }

    /// Writes a byte; the address wraps within 4K
    pub fn write(&mut self, addr: u16, byte: u8) {
        self.memory[(addr & ADDRESS_MASK) as usize] = byte;
    }

    /// Moves the program counter forward by `by` bytes
    pub fn advance(&mut self, by: u16) {
        self.pc = self.pc.wrapping_add(by) & ADDRESS_MASK;
    }

    /// Moves the program counter forward one instruction, or two if `condition` holds
    pub fn skip_if(&mut self, condition: bool) {
        self.advance(if condition { 4 } else { 2 });
    }

    /// Saves a return address
    pub fn push(&mut self, addr: u16) -> Result<(), Fault> {
        let depth = self.sp as usize;
        if depth >= STACK_DEPTH {
            return Err(Fault::StackOverflow { pc: self.pc });
        }
        self.stack[depth] = addr;
        self.sp += 1;
        Ok(())
    }

    /// Takes the most recently saved return address
    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow { pc: self.pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.pressed_keys[(key & 0x0F) as usize]
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
