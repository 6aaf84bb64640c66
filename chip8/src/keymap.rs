use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use emu8_core::KeyEvent;

/// What a host event means to the emulator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Key(KeyEvent),
    FastForward(bool),
    Quit,
}

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// The COSMAC VIP layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: Keycode) -> Option<u8> {
    match key {
        Keycode::X => Some(0x0),
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::Z => Some(0xA),
        Keycode::C => Some(0xB),
        Keycode::Num4 => Some(0xC),
        Keycode::R => Some(0xD),
        Keycode::F => Some(0xE),
        Keycode::V => Some(0xF),
        _ => None,
    }
}

/// Sorts SDL events into keypad changes and emulator controls.
/// - Escape or closing the window quits
/// - holding Space runs without frame pacing
/// - auto-repeated key downs are dropped
pub fn translate(event: &Event) -> Option<Action> {
    match *event {
        Event::Quit { .. } => Some(Action::Quit),
        Event::KeyDown {
            keycode: Some(key),
            repeat: false,
            ..
        } => pressed(key, true),
        Event::KeyUp {
            keycode: Some(key), ..
        } => pressed(key, false),
        _ => None,
    }
}

fn pressed(key: Keycode, down: bool) -> Option<Action> {
    match (key, keymap(key)) {
        (_, Some(kc)) => Some(Action::Key(KeyEvent {
            key: kc,
            pressed: down,
        })),
        (Keycode::Space, _) => Some(Action::FastForward(down)),
        (Keycode::Escape, _) if down => Some(Action::Quit),
        _ => None,
    }
}
