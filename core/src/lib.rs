pub use chip8::{Chip8, Step};
pub use config::{Compatibility, Config};
pub use error::{Fault, FrameError, RomLoadError};
pub use frame_buffer::FrameBuffer;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use scheduler::{Budget, FrameReport, KeyEvent, Pacer, Scheduler, Screen, Speaker};

mod chip8;
mod config;
pub mod constants;
mod error;
mod frame_buffer;
mod instruction;
mod opcode;
mod operations;
mod scheduler;
pub mod state;
