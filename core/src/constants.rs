/// Width of the Chip-8 display in pixels
pub const DISPLAY_WIDTH: usize = 64;

/// Height of the Chip-8 display in pixels
pub const DISPLAY_HEIGHT: usize = 32;

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Every computed address is masked to 12 bits
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// ROMs are loaded (and execution starts) here
pub const PROGRAM_START: u16 = 0x200;

/// Where the built-in hex digit sprites live
pub const FONT_BASE: u16 = 0x050;

/// Bytes per built-in digit sprite
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Maximum number of nested subroutine calls
pub const STACK_DEPTH: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Rate at which the timers count down and the display refreshes
pub const TIMER_HZ: u32 = 60;

/// Instructions per second when none is configured
pub const DEFAULT_CLOCK_SPEED: u32 = 500;

/// Window pixels per Chip-8 pixel when none is configured
pub const DEFAULT_SCALE: u32 = 10;

/// # Sprite sheet
/// The sixteen hex digits 0..F, five rows each, loaded at `FONT_BASE`.
///
/// Each row is the high nibble of a byte, e.g. `0`:
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
