use std::io;

/// Failures while placing a ROM image into memory.
#[derive(thiserror::Error, Debug)]
pub enum RomLoadError {
    #[error("unable to read ROM")]
    Io(#[from] io::Error),
    #[error("ROM is {size} bytes but only {capacity} bytes fit at {offset:#05X}")]
    TooLarge {
        size: usize,
        offset: u16,
        capacity: usize,
    },
}

/// Conditions that stop the CPU.
///
/// A faulting instruction leaves the machine exactly as it was before the
/// instruction was fetched, so the stack is never partially written.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error(
        "stack overflow: CALL at {pc:#05X} with {depth} return addresses already saved",
        depth = crate::constants::STACK_DEPTH
    )]
    StackOverflow { pc: u16 },
    #[error("stack underflow: RET at {pc:#05X} with an empty stack")]
    StackUnderflow { pc: u16 },
}

/// Errors surfaced by a single scheduler frame.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error(transparent)]
    Fault(#[from] Fault),
    #[error("frontend failure: {0}")]
    Frontend(String),
}
