//! Scancode translation table
//!
//! Maps kernel input-layer key codes to HID usages, partitioned by report
//! kind. Reference: USB HID Usage Tables 1.12, Section 10 (Keyboard/Keypad
//! Page 0x07) and Section 15 (Consumer Page 0x0C).

use evdev::Key;

use super::consumer;

/// USB HID keyboard usage IDs (Usage Page 0x07)
#[allow(dead_code)]
pub mod usb {
    // Letters A-Z (0x04 - 0x1D)
    pub const KEY_A: u8 = 0x04;
    pub const KEY_B: u8 = 0x05;
    pub const KEY_C: u8 = 0x06;
    pub const KEY_D: u8 = 0x07;
    pub const KEY_E: u8 = 0x08;
    pub const KEY_F: u8 = 0x09;
    pub const KEY_G: u8 = 0x0A;
    pub const KEY_H: u8 = 0x0B;
    pub const KEY_I: u8 = 0x0C;
    pub const KEY_J: u8 = 0x0D;
    pub const KEY_K: u8 = 0x0E;
    pub const KEY_L: u8 = 0x0F;
    pub const KEY_M: u8 = 0x10;
    pub const KEY_N: u8 = 0x11;
    pub const KEY_O: u8 = 0x12;
    pub const KEY_P: u8 = 0x13;
    pub const KEY_Q: u8 = 0x14;
    pub const KEY_R: u8 = 0x15;
    pub const KEY_S: u8 = 0x16;
    pub const KEY_T: u8 = 0x17;
    pub const KEY_U: u8 = 0x18;
    pub const KEY_V: u8 = 0x19;
    pub const KEY_W: u8 = 0x1A;
    pub const KEY_X: u8 = 0x1B;
    pub const KEY_Y: u8 = 0x1C;
    pub const KEY_Z: u8 = 0x1D;

    // Numbers 1-9, 0 (0x1E - 0x27)
    pub const KEY_1: u8 = 0x1E;
    pub const KEY_2: u8 = 0x1F;
    pub const KEY_3: u8 = 0x20;
    pub const KEY_4: u8 = 0x21;
    pub const KEY_5: u8 = 0x22;
    pub const KEY_6: u8 = 0x23;
    pub const KEY_7: u8 = 0x24;
    pub const KEY_8: u8 = 0x25;
    pub const KEY_9: u8 = 0x26;
    pub const KEY_0: u8 = 0x27;

    // Control keys
    pub const KEY_ENTER: u8 = 0x28;
    pub const KEY_ESCAPE: u8 = 0x29;
    pub const KEY_BACKSPACE: u8 = 0x2A;
    pub const KEY_TAB: u8 = 0x2B;
    pub const KEY_SPACE: u8 = 0x2C;
    pub const KEY_MINUS: u8 = 0x2D;
    pub const KEY_EQUAL: u8 = 0x2E;
    pub const KEY_LEFT_BRACKET: u8 = 0x2F;
    pub const KEY_RIGHT_BRACKET: u8 = 0x30;
    pub const KEY_BACKSLASH: u8 = 0x31;
    pub const KEY_HASH: u8 = 0x32; // Non-US # and ~
    pub const KEY_SEMICOLON: u8 = 0x33;
    pub const KEY_APOSTROPHE: u8 = 0x34;
    pub const KEY_GRAVE: u8 = 0x35;
    pub const KEY_COMMA: u8 = 0x36;
    pub const KEY_PERIOD: u8 = 0x37;
    pub const KEY_SLASH: u8 = 0x38;
    pub const KEY_CAPS_LOCK: u8 = 0x39;

    // Function keys F1-F12
    pub const KEY_F1: u8 = 0x3A;
    pub const KEY_F2: u8 = 0x3B;
    pub const KEY_F3: u8 = 0x3C;
    pub const KEY_F4: u8 = 0x3D;
    pub const KEY_F5: u8 = 0x3E;
    pub const KEY_F6: u8 = 0x3F;
    pub const KEY_F7: u8 = 0x40;
    pub const KEY_F8: u8 = 0x41;
    pub const KEY_F9: u8 = 0x42;
    pub const KEY_F10: u8 = 0x43;
    pub const KEY_F11: u8 = 0x44;
    pub const KEY_F12: u8 = 0x45;

    // Special keys
    pub const KEY_PRINT_SCREEN: u8 = 0x46;
    pub const KEY_SCROLL_LOCK: u8 = 0x47;
    pub const KEY_PAUSE: u8 = 0x48;
    pub const KEY_INSERT: u8 = 0x49;
    pub const KEY_HOME: u8 = 0x4A;
    pub const KEY_PAGE_UP: u8 = 0x4B;
    pub const KEY_DELETE: u8 = 0x4C;
    pub const KEY_END: u8 = 0x4D;
    pub const KEY_PAGE_DOWN: u8 = 0x4E;
    pub const KEY_RIGHT_ARROW: u8 = 0x4F;
    pub const KEY_LEFT_ARROW: u8 = 0x50;
    pub const KEY_DOWN_ARROW: u8 = 0x51;
    pub const KEY_UP_ARROW: u8 = 0x52;

    // Numpad
    pub const KEY_NUM_LOCK: u8 = 0x53;
    pub const KEY_NUMPAD_DIVIDE: u8 = 0x54;
    pub const KEY_NUMPAD_MULTIPLY: u8 = 0x55;
    pub const KEY_NUMPAD_MINUS: u8 = 0x56;
    pub const KEY_NUMPAD_PLUS: u8 = 0x57;
    pub const KEY_NUMPAD_ENTER: u8 = 0x58;
    pub const KEY_NUMPAD_1: u8 = 0x59;
    pub const KEY_NUMPAD_2: u8 = 0x5A;
    pub const KEY_NUMPAD_3: u8 = 0x5B;
    pub const KEY_NUMPAD_4: u8 = 0x5C;
    pub const KEY_NUMPAD_5: u8 = 0x5D;
    pub const KEY_NUMPAD_6: u8 = 0x5E;
    pub const KEY_NUMPAD_7: u8 = 0x5F;
    pub const KEY_NUMPAD_8: u8 = 0x60;
    pub const KEY_NUMPAD_9: u8 = 0x61;
    pub const KEY_NUMPAD_0: u8 = 0x62;
    pub const KEY_NUMPAD_DECIMAL: u8 = 0x63;

    // Additional keys
    pub const KEY_NON_US_BACKSLASH: u8 = 0x64;
    pub const KEY_APPLICATION: u8 = 0x65; // Context menu
    pub const KEY_POWER: u8 = 0x66;
    pub const KEY_NUMPAD_EQUAL: u8 = 0x67;

    // Function keys F13-F24
    pub const KEY_F13: u8 = 0x68;
    pub const KEY_F14: u8 = 0x69;
    pub const KEY_F15: u8 = 0x6A;
    pub const KEY_F16: u8 = 0x6B;
    pub const KEY_F17: u8 = 0x6C;
    pub const KEY_F18: u8 = 0x6D;
    pub const KEY_F19: u8 = 0x6E;
    pub const KEY_F20: u8 = 0x6F;
    pub const KEY_F21: u8 = 0x70;
    pub const KEY_F22: u8 = 0x71;
    pub const KEY_F23: u8 = 0x72;
    pub const KEY_F24: u8 = 0x73;

    // Modifiers (0xE0 - 0xE7)
    pub const KEY_LEFT_CTRL: u8 = 0xE0;
    pub const KEY_LEFT_SHIFT: u8 = 0xE1;
    pub const KEY_LEFT_ALT: u8 = 0xE2;
    pub const KEY_LEFT_META: u8 = 0xE3;
    pub const KEY_RIGHT_CTRL: u8 = 0xE4;
    pub const KEY_RIGHT_SHIFT: u8 = 0xE5;
    pub const KEY_RIGHT_ALT: u8 = 0xE6;
    pub const KEY_RIGHT_META: u8 = 0xE7;
}

/// Mouse button bitmask bits
pub mod button {
    pub const LEFT: u8 = 0x01;
    pub const RIGHT: u8 = 0x02;
    pub const MIDDLE: u8 = 0x04;
    pub const BACK: u8 = 0x08;
    pub const FORWARD: u8 = 0x10;
}

/// The HID usage a scancode translates to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HidUsage {
    /// Keyboard page usage ID (modifiers included, 0xE0-0xE7)
    Keyboard(u8),
    /// Mouse button bitmask bit
    MouseButton(u8),
    /// Bit position in the consumer-control bitmask report
    Consumer(u8),
}

/// Check if a keyboard usage ID is a modifier (0xE0-0xE7)
pub fn is_modifier(usage: u8) -> bool {
    (usb::KEY_LEFT_CTRL..=usb::KEY_RIGHT_META).contains(&usage)
}

/// Get the modifier bitmask bit for a modifier usage ID
pub fn modifier_bit(usage: u8) -> Option<u8> {
    if is_modifier(usage) {
        Some(1 << (usage - usb::KEY_LEFT_CTRL))
    } else {
        None
    }
}

/// Translate an evdev key code to its HID usage.
///
/// Returns `None` for codes with no HID equivalent (vendor-specific keys);
/// callers drop those events.
pub fn lookup(key: Key) -> Option<HidUsage> {
    use HidUsage::{Consumer, Keyboard, MouseButton};

    let usage = match key {
        // Letters
        Key::KEY_A => Keyboard(usb::KEY_A),
        Key::KEY_B => Keyboard(usb::KEY_B),
        Key::KEY_C => Keyboard(usb::KEY_C),
        Key::KEY_D => Keyboard(usb::KEY_D),
        Key::KEY_E => Keyboard(usb::KEY_E),
        Key::KEY_F => Keyboard(usb::KEY_F),
        Key::KEY_G => Keyboard(usb::KEY_G),
        Key::KEY_H => Keyboard(usb::KEY_H),
        Key::KEY_I => Keyboard(usb::KEY_I),
        Key::KEY_J => Keyboard(usb::KEY_J),
        Key::KEY_K => Keyboard(usb::KEY_K),
        Key::KEY_L => Keyboard(usb::KEY_L),
        Key::KEY_M => Keyboard(usb::KEY_M),
        Key::KEY_N => Keyboard(usb::KEY_N),
        Key::KEY_O => Keyboard(usb::KEY_O),
        Key::KEY_P => Keyboard(usb::KEY_P),
        Key::KEY_Q => Keyboard(usb::KEY_Q),
        Key::KEY_R => Keyboard(usb::KEY_R),
        Key::KEY_S => Keyboard(usb::KEY_S),
        Key::KEY_T => Keyboard(usb::KEY_T),
        Key::KEY_U => Keyboard(usb::KEY_U),
        Key::KEY_V => Keyboard(usb::KEY_V),
        Key::KEY_W => Keyboard(usb::KEY_W),
        Key::KEY_X => Keyboard(usb::KEY_X),
        Key::KEY_Y => Keyboard(usb::KEY_Y),
        Key::KEY_Z => Keyboard(usb::KEY_Z),

        // Number row
        Key::KEY_1 => Keyboard(usb::KEY_1),
        Key::KEY_2 => Keyboard(usb::KEY_2),
        Key::KEY_3 => Keyboard(usb::KEY_3),
        Key::KEY_4 => Keyboard(usb::KEY_4),
        Key::KEY_5 => Keyboard(usb::KEY_5),
        Key::KEY_6 => Keyboard(usb::KEY_6),
        Key::KEY_7 => Keyboard(usb::KEY_7),
        Key::KEY_8 => Keyboard(usb::KEY_8),
        Key::KEY_9 => Keyboard(usb::KEY_9),
        Key::KEY_0 => Keyboard(usb::KEY_0),

        // Control and punctuation
        Key::KEY_ENTER => Keyboard(usb::KEY_ENTER),
        Key::KEY_ESC => Keyboard(usb::KEY_ESCAPE),
        Key::KEY_BACKSPACE => Keyboard(usb::KEY_BACKSPACE),
        Key::KEY_TAB => Keyboard(usb::KEY_TAB),
        Key::KEY_SPACE => Keyboard(usb::KEY_SPACE),
        Key::KEY_MINUS => Keyboard(usb::KEY_MINUS),
        Key::KEY_EQUAL => Keyboard(usb::KEY_EQUAL),
        Key::KEY_LEFTBRACE => Keyboard(usb::KEY_LEFT_BRACKET),
        Key::KEY_RIGHTBRACE => Keyboard(usb::KEY_RIGHT_BRACKET),
        Key::KEY_BACKSLASH => Keyboard(usb::KEY_BACKSLASH),
        Key::KEY_SEMICOLON => Keyboard(usb::KEY_SEMICOLON),
        Key::KEY_APOSTROPHE => Keyboard(usb::KEY_APOSTROPHE),
        Key::KEY_GRAVE => Keyboard(usb::KEY_GRAVE),
        Key::KEY_COMMA => Keyboard(usb::KEY_COMMA),
        Key::KEY_DOT => Keyboard(usb::KEY_PERIOD),
        Key::KEY_SLASH => Keyboard(usb::KEY_SLASH),
        Key::KEY_CAPSLOCK => Keyboard(usb::KEY_CAPS_LOCK),

        // Function row
        Key::KEY_F1 => Keyboard(usb::KEY_F1),
        Key::KEY_F2 => Keyboard(usb::KEY_F2),
        Key::KEY_F3 => Keyboard(usb::KEY_F3),
        Key::KEY_F4 => Keyboard(usb::KEY_F4),
        Key::KEY_F5 => Keyboard(usb::KEY_F5),
        Key::KEY_F6 => Keyboard(usb::KEY_F6),
        Key::KEY_F7 => Keyboard(usb::KEY_F7),
        Key::KEY_F8 => Keyboard(usb::KEY_F8),
        Key::KEY_F9 => Keyboard(usb::KEY_F9),
        Key::KEY_F10 => Keyboard(usb::KEY_F10),
        Key::KEY_F11 => Keyboard(usb::KEY_F11),
        Key::KEY_F12 => Keyboard(usb::KEY_F12),
        Key::KEY_F13 => Keyboard(usb::KEY_F13),
        Key::KEY_F14 => Keyboard(usb::KEY_F14),
        Key::KEY_F15 => Keyboard(usb::KEY_F15),
        Key::KEY_F16 => Keyboard(usb::KEY_F16),
        Key::KEY_F17 => Keyboard(usb::KEY_F17),
        Key::KEY_F18 => Keyboard(usb::KEY_F18),
        Key::KEY_F19 => Keyboard(usb::KEY_F19),
        Key::KEY_F20 => Keyboard(usb::KEY_F20),
        Key::KEY_F21 => Keyboard(usb::KEY_F21),
        Key::KEY_F22 => Keyboard(usb::KEY_F22),
        Key::KEY_F23 => Keyboard(usb::KEY_F23),
        Key::KEY_F24 => Keyboard(usb::KEY_F24),

        // Navigation cluster
        Key::KEY_SYSRQ => Keyboard(usb::KEY_PRINT_SCREEN),
        Key::KEY_SCROLLLOCK => Keyboard(usb::KEY_SCROLL_LOCK),
        Key::KEY_INSERT => Keyboard(usb::KEY_INSERT),
        Key::KEY_HOME => Keyboard(usb::KEY_HOME),
        Key::KEY_PAGEUP => Keyboard(usb::KEY_PAGE_UP),
        Key::KEY_DELETE => Keyboard(usb::KEY_DELETE),
        Key::KEY_END => Keyboard(usb::KEY_END),
        Key::KEY_PAGEDOWN => Keyboard(usb::KEY_PAGE_DOWN),
        Key::KEY_RIGHT => Keyboard(usb::KEY_RIGHT_ARROW),
        Key::KEY_LEFT => Keyboard(usb::KEY_LEFT_ARROW),
        Key::KEY_DOWN => Keyboard(usb::KEY_DOWN_ARROW),
        Key::KEY_UP => Keyboard(usb::KEY_UP_ARROW),

        // Numpad
        Key::KEY_NUMLOCK => Keyboard(usb::KEY_NUM_LOCK),
        Key::KEY_KPSLASH => Keyboard(usb::KEY_NUMPAD_DIVIDE),
        Key::KEY_KPASTERISK => Keyboard(usb::KEY_NUMPAD_MULTIPLY),
        Key::KEY_KPMINUS => Keyboard(usb::KEY_NUMPAD_MINUS),
        Key::KEY_KPPLUS => Keyboard(usb::KEY_NUMPAD_PLUS),
        Key::KEY_KPENTER => Keyboard(usb::KEY_NUMPAD_ENTER),
        Key::KEY_KP1 => Keyboard(usb::KEY_NUMPAD_1),
        Key::KEY_KP2 => Keyboard(usb::KEY_NUMPAD_2),
        Key::KEY_KP3 => Keyboard(usb::KEY_NUMPAD_3),
        Key::KEY_KP4 => Keyboard(usb::KEY_NUMPAD_4),
        Key::KEY_KP5 => Keyboard(usb::KEY_NUMPAD_5),
        Key::KEY_KP6 => Keyboard(usb::KEY_NUMPAD_6),
        Key::KEY_KP7 => Keyboard(usb::KEY_NUMPAD_7),
        Key::KEY_KP8 => Keyboard(usb::KEY_NUMPAD_8),
        Key::KEY_KP9 => Keyboard(usb::KEY_NUMPAD_9),
        Key::KEY_KP0 => Keyboard(usb::KEY_NUMPAD_0),
        Key::KEY_KPDOT => Keyboard(usb::KEY_NUMPAD_DECIMAL),
        Key::KEY_KPEQUAL => Keyboard(usb::KEY_NUMPAD_EQUAL),

        // Misc
        Key::KEY_102ND => Keyboard(usb::KEY_NON_US_BACKSLASH),
        Key::KEY_COMPOSE => Keyboard(usb::KEY_APPLICATION),
        Key::KEY_POWER => Keyboard(usb::KEY_POWER),

        // Modifiers
        Key::KEY_LEFTCTRL => Keyboard(usb::KEY_LEFT_CTRL),
        Key::KEY_LEFTSHIFT => Keyboard(usb::KEY_LEFT_SHIFT),
        Key::KEY_LEFTALT => Keyboard(usb::KEY_LEFT_ALT),
        Key::KEY_LEFTMETA => Keyboard(usb::KEY_LEFT_META),
        Key::KEY_RIGHTCTRL => Keyboard(usb::KEY_RIGHT_CTRL),
        Key::KEY_RIGHTSHIFT => Keyboard(usb::KEY_RIGHT_SHIFT),
        Key::KEY_RIGHTALT => Keyboard(usb::KEY_RIGHT_ALT),
        Key::KEY_RIGHTMETA => Keyboard(usb::KEY_RIGHT_META),

        // Mouse buttons
        Key::BTN_LEFT => MouseButton(button::LEFT),
        Key::BTN_RIGHT => MouseButton(button::RIGHT),
        Key::BTN_MIDDLE => MouseButton(button::MIDDLE),
        Key::BTN_SIDE => MouseButton(button::BACK),
        Key::BTN_EXTRA => MouseButton(button::FORWARD),

        // Consumer control (multimedia) keys
        Key::KEY_PLAYPAUSE => Consumer(consumer::bit::PLAY_PAUSE),
        Key::KEY_NEXTSONG => Consumer(consumer::bit::NEXT_TRACK),
        Key::KEY_PREVIOUSSONG => Consumer(consumer::bit::PREV_TRACK),
        Key::KEY_STOPCD => Consumer(consumer::bit::STOP),
        Key::KEY_MUTE => Consumer(consumer::bit::MUTE),
        Key::KEY_VOLUMEUP => Consumer(consumer::bit::VOLUME_UP),
        Key::KEY_VOLUMEDOWN => Consumer(consumer::bit::VOLUME_DOWN),
        Key::KEY_HOMEPAGE => Consumer(consumer::bit::BROWSER_HOME),
        Key::KEY_BACK => Consumer(consumer::bit::BROWSER_BACK),
        Key::KEY_FORWARD => Consumer(consumer::bit::BROWSER_FORWARD),
        Key::KEY_SEARCH => Consumer(consumer::bit::BROWSER_SEARCH),
        Key::KEY_EJECTCD => Consumer(consumer::bit::EJECT),
        Key::KEY_BRIGHTNESSUP => Consumer(consumer::bit::BRIGHTNESS_UP),
        Key::KEY_BRIGHTNESSDOWN => Consumer(consumer::bit::BRIGHTNESS_DOWN),
        Key::KEY_CALC => Consumer(consumer::bit::CALCULATOR),
        Key::KEY_MAIL => Consumer(consumer::bit::EMAIL),

        _ => return None,
    };

    Some(usage)
}
