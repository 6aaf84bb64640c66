use std::fmt;

use crate::opcode::Opcode;

/// A decoded Chip-8 instruction.
///
/// `x` and `y` name registers, `nn` is an immediate byte, `n` a nibble and
/// addresses are 12 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 0NNN; machine code routines are not emulated
    Sys(u16),
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipIfEqual { x: u8, nn: u8 },
    /// 4XNN
    SkipIfNotEqual { x: u8, nn: u8 },
    /// 5XY0
    SkipIfRegistersEqual { x: u8, y: u8 },
    /// 6XNN
    Load { x: u8, nn: u8 },
    /// 7XNN
    AddImmediate { x: u8, nn: u8 },
    /// 8XY0
    Move { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    Add { x: u8, y: u8 },
    /// 8XY5
    Sub { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8, y: u8 },
    /// 8XY7
    SubReverse { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0
    SkipIfRegistersNotEqual { x: u8, y: u8 },
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random { x: u8, nn: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipIfPressed { x: u8 },
    /// EXA1
    SkipIfNotPressed { x: u8 },
    /// FX07
    LoadDelay { x: u8 },
    /// FX0A
    WaitForKey { x: u8 },
    /// FX15
    SetDelay { x: u8 },
    /// FX18
    SetSound { x: u8 },
    /// FX1E
    AddIndex { x: u8 },
    /// FX29
    LoadFont { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    StoreRegisters { x: u8 },
    /// FX65
    LoadRegisters { x: u8 },
    /// Anything else
    Unknown(Opcode),
}

impl Instruction {
    /// Selects the Instruction for an Opcode. Never fails; unrecognised bit
    /// patterns become `Unknown`.
    pub fn decode(op: Opcode) -> Self {
        use Instruction::*;

        let (x, y, n, nn, nnn) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, ..) => Sys(nnn),
            (0x1, ..) => Jump(nnn),
            (0x2, ..) => Call(nnn),
            (0x3, ..) => SkipIfEqual { x, nn },
            (0x4, ..) => SkipIfNotEqual { x, nn },
            (0x5, .., 0x0) => SkipIfRegistersEqual { x, y },
            (0x6, ..) => Load { x, nn },
            (0x7, ..) => AddImmediate { x, nn },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => Add { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x, y },
            (0x8, .., 0x7) => SubReverse { x, y },
            (0x8, .., 0xE) => ShiftLeft { x, y },
            (0x9, .., 0x0) => SkipIfRegistersNotEqual { x, y },
            (0xA, ..) => LoadIndex(nnn),
            (0xB, ..) => JumpOffset(nnn),
            (0xC, ..) => Random { x, nn },
            (0xD, ..) => Draw { x, y, n },
            (0xE, .., 0x9, 0xE) => SkipIfPressed { x },
            (0xE, .., 0xA, 0x1) => SkipIfNotPressed { x },
            (0xF, .., 0x0, 0x7) => LoadDelay { x },
            (0xF, .., 0x0, 0xA) => WaitForKey { x },
            (0xF, .., 0x1, 0x5) => SetDelay { x },
            (0xF, .., 0x1, 0x8) => SetSound { x },
            (0xF, .., 0x1, 0xE) => AddIndex { x },
            (0xF, .., 0x2, 0x9) => LoadFont { x },
            (0xF, .., 0x3, 0x3) => StoreBcd { x },
            (0xF, .., 0x5, 0x5) => StoreRegisters { x },
            (0xF, .., 0x6, 0x5) => LoadRegisters { x },
            _ => Unknown(op),
        }
    }

    /// Whether executing this instruction changes the frame buffer
    pub fn requests_redraw(&self) -> bool {
        matches!(self, Instruction::ClearScreen | Instruction::Draw { .. })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Sys(addr) => write!(f, "SYS {:#05X}", addr),
            Jump(addr) => write!(f, "JP {:#05X}", addr),
            Call(addr) => write!(f, "CALL {:#05X}", addr),
            SkipIfEqual { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            SkipIfNotEqual { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            SkipIfRegistersEqual { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Load { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            AddImmediate { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Add { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipIfRegistersNotEqual { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(addr) => write!(f, "LD I, {:#05X}", addr),
            JumpOffset(addr) => write!(f, "JP V0, {:#05X}", addr),
            Random { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipIfPressed { x } => write!(f, "SKP V{:X}", x),
            SkipIfNotPressed { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitForKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "??? {}", op),
        }
    }
}
