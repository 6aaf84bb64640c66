use rand::rngs::StdRng;
use rand::Rng;

use crate::config::Compatibility;
use crate::constants::{ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_BASE, FONT_GLYPH_SIZE};
use crate::error::Fault;
use crate::instruction::Instruction;
use crate::state::{RunState, State};

/// Applies one decoded instruction to `state`.
///
/// On a fault nothing has been modified.
pub(crate) fn execute(
    instruction: Instruction,
    state: &mut State,
    rng: &mut StdRng,
    compatibility: Compatibility,
) -> Result<(), Fault> {
    use Instruction::*;

    match instruction {
        ClearScreen => clr(state),
        Return => rts(state)?,
        Sys(_) | Unknown(_) => state.advance(2),
        Jump(addr) => state.pc = addr,
        Call(addr) => call(state, addr)?,
        SkipIfEqual { x, nn } => state.skip_if(state.v[x as usize] == nn),
        SkipIfNotEqual { x, nn } => state.skip_if(state.v[x as usize] != nn),
        SkipIfRegistersEqual { x, y } => state.skip_if(state.v[x as usize] == state.v[y as usize]),
        Load { x, nn } => alu(state, x, |_| nn),
        AddImmediate { x, nn } => alu(state, x, |vx| vx.wrapping_add(nn)),
        Move { x, y } => {
            let vy = state.v[y as usize];
            alu(state, x, |_| vy)
        }
        Or { x, y } => {
            let vy = state.v[y as usize];
            alu(state, x, |vx| vx | vy)
        }
        And { x, y } => {
            let vy = state.v[y as usize];
            alu(state, x, |vx| vx & vy)
        }
        Xor { x, y } => {
            let vy = state.v[y as usize];
            alu(state, x, |vx| vx ^ vy)
        }
        Add { x, y } => addr(state, x, y),
        Sub { x, y } => sub(state, x, y),
        ShiftRight { x, y } => shr(state, x, y, compatibility),
        SubReverse { x, y } => subn(state, x, y),
        ShiftLeft { x, y } => shl(state, x, y, compatibility),
        SkipIfRegistersNotEqual { x, y } => {
            state.skip_if(state.v[x as usize] != state.v[y as usize])
        }
        LoadIndex(addr) => {
            state.i = addr;
            state.advance(2);
        }
        JumpOffset(addr) => state.pc = addr.wrapping_add(u16::from(state.v[0x0])) & ADDRESS_MASK,
        Random { x, nn } => {
            let rand_byte: u8 = rng.random();
            alu(state, x, |_| rand_byte & nn)
        }
        Draw { x, y, n } => draw(state, x, y, n),
        SkipIfPressed { x } => state.skip_if(state.is_key_pressed(state.v[x as usize])),
        SkipIfNotPressed { x } => state.skip_if(!state.is_key_pressed(state.v[x as usize])),
        LoadDelay { x } => {
            let dt = state.delay_timer;
            alu(state, x, |_| dt)
        }
        WaitForKey { x } => keyd(state, x),
        SetDelay { x } => {
            state.delay_timer = state.v[x as usize];
            state.advance(2);
        }
        SetSound { x } => {
            state.sound_timer = state.v[x as usize];
            state.sound_started = state.sound_timer > 0;
            state.advance(2);
        }
        AddIndex { x } => {
            state.i = state.i.wrapping_add(u16::from(state.v[x as usize])) & ADDRESS_MASK;
            state.advance(2);
        }
        LoadFont { x } => {
            state.i = (FONT_BASE + u16::from(state.v[x as usize]) * FONT_GLYPH_SIZE) & ADDRESS_MASK;
            state.advance(2);
        }
        StoreBcd { x } => bcd(state, x),
        StoreRegisters { x } => stor(state, x, compatibility),
        LoadRegisters { x } => read(state, x, compatibility),
    }
    Ok(())
}

/// Vx = f(Vx); flags untouched
fn alu(state: &mut State, x: u8, f: impl FnOnce(u8) -> u8) {
    state.v[x as usize] = f(state.v[x as usize]);
    state.advance(2);
}

/// Vx = result, then VF = flag, so the flag wins when x is F
fn alu_with_flag(state: &mut State, x: u8, result: u8, flag: bool) {
    state.v[x as usize] = result;
    state.v[0xF] = u8::from(flag);
    state.advance(2);
}

/// clear
fn clr(state: &mut State) {
    state.frame_buffer.clear();
    state.draw_flag = true;
    state.advance(2);
}

/// PC = STACK.pop()
fn rts(state: &mut State) -> Result<(), Fault> {
    state.pc = state.pop()? & ADDRESS_MASK;
    Ok(())
}

/// STACK.push(PC + 2); PC = addr
fn call(state: &mut State, addr: u16) -> Result<(), Fault> {
    let ret = state.pc.wrapping_add(2) & ADDRESS_MASK;
    state.push(ret)?;
    state.pc = addr;
    Ok(())
}

/// Vx += Vy; VF = carry
fn addr(state: &mut State, x: u8, y: u8) {
    let (res, carry) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    alu_with_flag(state, x, res, carry);
}

/// Vx -= Vy; VF = Vx > Vy
fn sub(state: &mut State, x: u8, y: u8) {
    let (vx, vy) = (state.v[x as usize], state.v[y as usize]);
    alu_with_flag(state, x, vx.wrapping_sub(vy), vx > vy);
}

/// Vx = Vy - Vx; VF = Vy > Vx
fn subn(state: &mut State, x: u8, y: u8) {
    let (vx, vy) = (state.v[x as usize], state.v[y as usize]);
    alu_with_flag(state, x, vy.wrapping_sub(vx), vy > vx);
}

fn shift_source(state: &State, x: u8, y: u8, compatibility: Compatibility) -> u8 {
    match compatibility {
        Compatibility::Modern => state.v[x as usize],
        Compatibility::CosmacVip => state.v[y as usize],
    }
}

/// Vx >>= 1; VF = bit shifted out
fn shr(state: &mut State, x: u8, y: u8, compatibility: Compatibility) {
    let source = shift_source(state, x, y, compatibility);
    alu_with_flag(state, x, source >> 1, source & 0x1 == 1);
}

/// Vx <<= 1; VF = bit shifted out
fn shl(state: &mut State, x: u8, y: u8, compatibility: Compatibility) {
    let source = shift_source(state, x, y, compatibility);
    alu_with_flag(state, x, source << 1, source & 0x80 != 0);
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels are erased
fn draw(state: &mut State, x: u8, y: u8, n: u8) {
    let origin_x = state.v[x as usize] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[y as usize] as usize % DISPLAY_HEIGHT;

    // Reset the flag (used for collision detection)
    state.v[0xF] = 0x0;

    for row in 0..n {
        let sprite = state.read(state.i.wrapping_add(u16::from(row)));
        let py = (origin_y + row as usize) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if sprite & (0x80 >> bit) == 0 {
                continue;
            }
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            if state.frame_buffer.xor_pixel(px, py) {
                state.v[0xF] = 0x1;
            }
        }
    }

    state.draw_flag = true;
    state.advance(2);
}

/// await keypress for Vx
fn keyd(state: &mut State, x: u8) {
    state.run_state = RunState::WaitingForKey { register: x };
}

/// mem[I..I+3] = bcd(Vx)
fn bcd(state: &mut State, x: u8) {
    let vx = state.v[x as usize];
    let i = state.i;
    state.write(i, vx / 100);
    state.write(i.wrapping_add(1), vx / 10 % 10);
    state.write(i.wrapping_add(2), vx % 10);
    state.advance(2);
}

/// mem[I..=I+x] = V0..=Vx
fn stor(state: &mut State, x: u8, compatibility: Compatibility) {
    for r in 0..=x {
        state.write(state.i.wrapping_add(u16::from(r)), state.v[r as usize]);
    }
    bump_index(state, x, compatibility);
    state.advance(2);
}

/// V0..=Vx = mem[I..=I+x]
fn read(state: &mut State, x: u8, compatibility: Compatibility) {
    for r in 0..=x {
        state.v[r as usize] = state.read(state.i.wrapping_add(u16::from(r)));
    }
    bump_index(state, x, compatibility);
    state.advance(2);
}

fn bump_index(state: &mut State, x: u8, compatibility: Compatibility) {
    if compatibility == Compatibility::CosmacVip {
        state.i = state.i.wrapping_add(u16::from(x) + 1) & ADDRESS_MASK;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::opcode::Opcode;

    fn run_with(op: u16, state: &mut State, compatibility: Compatibility) -> Result<(), Fault> {
        let mut rng = StdRng::seed_from_u64(0);
        execute(Instruction::decode(Opcode(op)), state, &mut rng, compatibility)
    }

    fn run(op: u16, state: &mut State) {
        run_with(op, state, Compatibility::Modern).unwrap();
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        state.frame_buffer.xor_pixel(0, 0);
        run(0x00E0, &mut state);
        assert_eq!(state.frame_buffer.lit_count(), 0);
        assert!(state.draw_flag);
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.push(0x0ABC).unwrap();
        run(0x00EE, &mut state);
        assert_eq!(state.sp, 0x0);
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_00ee_ret_empty_stack_faults() {
        let mut state = State::new();
        let result = run_with(0x00EE, &mut state, Compatibility::Modern);
        assert_eq!(result, Err(Fault::StackUnderflow { pc: 0x200 }));
        assert_eq!(state.pc, 0x200);
    }

    #[test]
    fn test_0nnn_sys_is_ignored() {
        let mut state = State::new();
        run(0x0123, &mut state);
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_1nnn_jp() {
        let mut state = State::new();
        run(0x1ABC, &mut state);
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        state.pc = 0x0ABC;
        run(0x2123, &mut state);
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.stack[0], 0x0ABE);
        assert_eq!(state.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_full_stack_faults() {
        let mut state = State::new();
        for n in 0..16 {
            state.push(0x300 + n * 2).unwrap();
        }
        let stack = state.stack;
        let result = run_with(0x2456, &mut state, Compatibility::Modern);
        assert_eq!(result, Err(Fault::StackOverflow { pc: 0x200 }));
        assert_eq!(state.stack, stack);
        assert_eq!(state.sp, 16);
        assert_eq!(state.pc, 0x200);

        // the stack is intact, so returning still works
        run(0x00EE, &mut state);
        assert_eq!(state.pc, 0x31E);
        assert_eq!(state.sp, 15);
    }

    #[test]
    fn test_3xnn_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        run(0x3111, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_3xnn_se_doesntskip() {
        let mut state = State::new();
        run(0x3111, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_4xnn_sne_skips() {
        let mut state = State::new();
        run(0x4111, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_4xnn_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        run(0x4111, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        run(0x5120, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        run(0x5120, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_6xnn_ld() {
        let mut state = State::new();
        run(0x6122, &mut state);
        assert_eq!(state.v[0x1], 0x22);
    }

    #[test]
    fn test_7xnn_add_wraps_without_flag() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0xF] = 0x7;
        run(0x7102, &mut state);
        assert_eq!(state.v[0x1], 0x01);
        assert_eq!(state.v[0xF], 0x7);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        run(0x8120, &mut state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        run(0x8121, &mut state);
        assert_eq!(state.v[0x1], 0x7);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        run(0x8122, &mut state);
        assert_eq!(state.v[0x1], 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        run(0x8123, &mut state);
        assert_eq!(state.v[0x1], 0x5);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = State::new();
        state.v[0x1] = 200;
        state.v[0x2] = 100;
        run(0x8124, &mut state);
        assert_eq!(state.v[0x1], 44);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut state = State::new();
        state.v[0x1] = 0xEE;
        state.v[0x2] = 0x11;
        state.v[0xF] = 0x1;
        run(0x8124, &mut state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_flag_wins_over_vf_result() {
        let mut state = State::new();
        state.v[0xF] = 0xFF;
        state.v[0x1] = 0x02;
        run(0x8F14, &mut state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 5;
        state.v[0x2] = 10;
        run(0x8125, &mut state);
        assert_eq!(state.v[0x1], 251);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 10;
        state.v[0x2] = 5;
        run(0x8125, &mut state);
        assert_eq!(state.v[0x1], 5);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_wraps_below_zero() {
        let mut state = State::new();
        state.v[0x1] = 100;
        state.v[0x2] = 200;
        run(0x8125, &mut state);
        assert_eq!(state.v[0x1], 156);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_equal_operands_clear_flag() {
        let mut state = State::new();
        state.v[0x1] = 7;
        state.v[0x2] = 7;
        run(0x8125, &mut state);
        assert_eq!(state.v[0x1], 0);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_reads_vf_operand_before_writing_flag() {
        let mut state = State::new();
        state.v[0x1] = 10;
        state.v[0xF] = 3;
        run(0x81F5, &mut state);
        assert_eq!(state.v[0x1], 7);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_lsb() {
        let mut state = State::new();
        state.v[0x1] = 0x5;
        run(0x8106, &mut state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_nolsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        run(0x8106, &mut state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_vip_reads_vy() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x6;
        run_with(0x8126, &mut state, Compatibility::CosmacVip).unwrap();
        assert_eq!(state.v[0x1], 0x3);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy7_subn_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x33;
        run(0x8127, &mut state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x12;
        state.v[0x2] = 0x11;
        run(0x8127, &mut state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        run(0x810E, &mut state);
        // 0xFF * 2 = 0x01FE
        assert_eq!(state.v[0x1], 0xFE);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_nomsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        run(0x810E, &mut state);
        assert_eq!(state.v[0x1], 0x8);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_vip_reads_vy() {
        let mut state = State::new();
        state.v[0x2] = 0x81;
        run_with(0x812E, &mut state, Compatibility::CosmacVip).unwrap();
        assert_eq!(state.v[0x1], 0x02);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        run(0x9120, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        run(0x9120, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_annn_ld() {
        let mut state = State::new();
        run(0xAABC, &mut state);
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = State::new();
        state.v[0x0] = 0x2;
        run(0xBABC, &mut state);
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_bnnn_jp_wraps() {
        let mut state = State::new();
        state.v[0x0] = 0xFF;
        run(0xBFFF, &mut state);
        assert_eq!(state.pc, 0x0FE);
    }

    #[test]
    fn test_cxnn_rnd_masks() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        run(0xC10F, &mut state);
        assert_eq!(state.v[0x1] & 0xF0, 0);
        run(0xC200, &mut state);
        assert_eq!(state.v[0x2], 0);
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        state.i = FONT_BASE;
        // Draw the 0 sprite with a 1x 1y offset
        run(0xD005, &mut state);
        let expected = [
            [1, 1, 1, 1],
            [1, 0, 0, 1],
            [1, 0, 0, 1],
            [1, 0, 0, 1],
            [1, 1, 1, 1],
        ];
        for (row, pixels) in expected.iter().enumerate() {
            for (col, &pixel) in pixels.iter().enumerate() {
                assert_eq!(state.frame_buffer.get(1 + col, 1 + row), pixel == 1);
            }
        }
        assert_eq!(state.frame_buffer.lit_count(), 14);
        assert_eq!(state.v[0xF], 0x0);
        assert!(state.draw_flag);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut state = State::new();
        state.i = FONT_BASE;
        state.frame_buffer.xor_pixel(0, 0);
        run(0xD001, &mut state);
        assert_eq!(state.v[0xF], 0x1)
    }

    #[test]
    fn test_dxyn_drw_xors() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300] = 0b1100_0000;
        // 0 1 0 1 -> Set
        state.frame_buffer.xor_pixel(1, 0);
        state.frame_buffer.xor_pixel(3, 0);
        // 1 1 0 0 -> Draw xor
        run(0xD001, &mut state);
        let row: Vec<bool> = (0..4).map(|x| state.frame_buffer.get(x, 0)).collect();
        assert_eq!(row, [true, false, false, true]);
    }

    #[test]
    fn test_dxyn_drw_twice_restores() {
        let mut state = State::new();
        state.i = FONT_BASE + 5 * 0xA;
        state.v[0x3] = 20;
        state.v[0x4] = 10;
        run(0xD345, &mut state);
        assert_eq!(state.v[0xF], 0x0);
        run(0xD345, &mut state);
        assert_eq!(state.v[0xF], 0x1);
        assert_eq!(state.frame_buffer.lit_count(), 0);
    }

    #[test]
    fn test_dxyn_drw_wraps_at_corner() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x302].copy_from_slice(&[0xFF, 0xFF]);
        state.v[0x0] = 63;
        state.v[0x1] = 31;
        run(0xD012, &mut state);
        assert!(state.frame_buffer.get(63, 31));
        assert!(state.frame_buffer.get(0, 0));
        assert!(state.frame_buffer.get(6, 0));
        assert!(state.frame_buffer.get(6, 31));
        assert!(!state.frame_buffer.get(7, 0));
        assert_eq!(state.frame_buffer.lit_count(), 16);
    }

    #[test]
    fn test_dxyn_drw_origin_wraps() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300] = 0x80;
        state.v[0x0] = 64 + 5;
        state.v[0x1] = 32 + 2;
        run(0xD011, &mut state);
        assert!(state.frame_buffer.get(5, 2));
    }

    #[test]
    fn test_dxyn_drw_zero_bits_leave_pixels() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300] = 0x00;
        state.frame_buffer.xor_pixel(2, 0);
        run(0xD001, &mut state);
        assert!(state.frame_buffer.get(2, 0));
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = State::new();
        state.pressed_keys[0xE] = true;
        state.v[0x1] = 0xE;
        run(0xE19E, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        let mut state = State::new();
        run(0xE19E, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        let mut state = State::new();
        run(0xE1A1, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = State::new();
        state.pressed_keys[0xE] = true;
        state.v[0x1] = 0xE;
        run(0xE1A1, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = State::new();
        state.delay_timer = 0xF;
        run(0xF107, &mut state);
        assert_eq!(state.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_ld_waits_without_advancing() {
        let mut state = State::new();
        run(0xF10A, &mut state);
        assert_eq!(state.run_state, RunState::WaitingForKey { register: 0x1 });
        assert_eq!(state.pc, 0x200);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        run(0xF115, &mut state);
        assert_eq!(state.delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        run(0xF118, &mut state);
        assert_eq!(state.sound_timer, 0xF);
        assert!(state.sound_started);
    }

    #[test]
    fn test_fx18_ld_zero_silences() {
        let mut state = State::new();
        state.sound_started = true;
        run(0xF118, &mut state);
        assert_eq!(state.sound_timer, 0);
        assert!(!state.sound_started);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = State::new();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        run(0xF11E, &mut state);
        assert_eq!(state.i, 0x2);
    }

    #[test]
    fn test_fx1e_add_wraps() {
        let mut state = State::new();
        state.i = 0xFFF;
        state.v[0x1] = 0x2;
        run(0xF11E, &mut state);
        assert_eq!(state.i, 0x001);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = State::new();
        state.v[0x1] = 0x2;
        run(0xF129, &mut state);
        assert_eq!(state.i, FONT_BASE + 0xA);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = State::new();
        // 0x7B -> 123
        state.v[0x1] = 0x7B;
        state.i = 0x300;
        run(0xF133, &mut state);
        assert_eq!(state.memory[0x300..0x303], [0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_fx33_ld_wraps_past_end_of_memory() {
        let mut state = State::new();
        state.v[0x1] = 255;
        state.i = 0xFFF;
        run(0xF133, &mut state);
        assert_eq!(state.memory[0xFFF], 2);
        assert_eq!(state.memory[0x000], 5);
        assert_eq!(state.memory[0x001], 5);
    }

    #[test]
    fn test_fx55_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        run(0xF455, &mut state);
        assert_eq!(state.memory[0x300..0x305], [0x1, 0x2, 0x3, 0x4, 0x5]);
        assert_eq!(state.memory[0x305], 0x0);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx55_ld_vip_moves_index() {
        let mut state = State::new();
        state.i = 0x300;
        run_with(0xF455, &mut state, Compatibility::CosmacVip).unwrap();
        assert_eq!(state.i, 0x305);
    }

    #[test]
    fn test_fx65_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x306].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5, 0x6]);
        run(0xF465, &mut state);
        assert_eq!(state.v[0x0..0x6], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx65_ld_vip_moves_index() {
        let mut state = State::new();
        state.i = 0x300;
        run_with(0xF065, &mut state, Compatibility::CosmacVip).unwrap();
        assert_eq!(state.i, 0x301);
    }

    #[test]
    fn test_unknown_advances() {
        let mut state = State::new();
        let before = state.v;
        run(0x5121, &mut state);
        assert_eq!(state.pc, 0x202);
        assert_eq!(state.v, before);
    }
}
