//! Consumer Control report bits
//!
//! The consumer gadget reports a 16-bit usage bitmask; each supported usage
//! owns one fixed bit, matching the gadget's report descriptor. The HID
//! usage IDs (Consumer Page 0x0C) behind each bit are noted for reference.

/// Bit positions in the consumer-control bitmask report
pub mod bit {
    /// Play/Pause (usage 0x00CD)
    pub const PLAY_PAUSE: u8 = 0;
    /// Scan Next Track (0x00B5)
    pub const NEXT_TRACK: u8 = 1;
    /// Scan Previous Track (0x00B6)
    pub const PREV_TRACK: u8 = 2;
    /// Stop (0x00B7)
    pub const STOP: u8 = 3;
    /// Mute (0x00E2)
    pub const MUTE: u8 = 4;
    /// Volume Increment (0x00E9)
    pub const VOLUME_UP: u8 = 5;
    /// Volume Decrement (0x00EA)
    pub const VOLUME_DOWN: u8 = 6;
    /// AC Home (0x0223)
    pub const BROWSER_HOME: u8 = 7;
    /// AC Back (0x0224)
    pub const BROWSER_BACK: u8 = 8;
    /// AC Forward (0x0225)
    pub const BROWSER_FORWARD: u8 = 9;
    /// AC Search (0x0221)
    pub const BROWSER_SEARCH: u8 = 10;
    /// Eject (0x00B8)
    pub const EJECT: u8 = 11;
    /// Display Brightness Increment (0x006F)
    pub const BRIGHTNESS_UP: u8 = 12;
    /// Display Brightness Decrement (0x0070)
    pub const BRIGHTNESS_DOWN: u8 = 13;
    /// AL Calculator (0x0192)
    pub const CALCULATOR: u8 = 14;
    /// AL Email Reader (0x018A)
    pub const EMAIL: u8 = 15;
}

/// Number of bits in the consumer report bitmask
pub const BIT_COUNT: u8 = 16;

/// Bitmask for a consumer bit position
pub fn mask(bit: u8) -> u16 {
    debug_assert!(bit < BIT_COUNT);
    1u16 << u16::from(bit & 0x0F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_bits_in_range() {
        let bits = [
            bit::PLAY_PAUSE,
            bit::NEXT_TRACK,
            bit::PREV_TRACK,
            bit::STOP,
            bit::MUTE,
            bit::VOLUME_UP,
            bit::VOLUME_DOWN,
            bit::BROWSER_HOME,
            bit::BROWSER_BACK,
            bit::BROWSER_FORWARD,
            bit::BROWSER_SEARCH,
            bit::EJECT,
            bit::BRIGHTNESS_UP,
            bit::BRIGHTNESS_DOWN,
            bit::CALCULATOR,
            bit::EMAIL,
        ];

        let mut seen = 0u16;
        for b in bits {
            assert!(b < BIT_COUNT);
            assert_eq!(seen & mask(b), 0, "bit {} assigned twice", b);
            seen |= mask(b);
        }
        assert_eq!(seen, u16::MAX);
    }
}
