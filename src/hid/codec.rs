//! HID report codec
//!
//! Accumulates decoded input events into per-kind report state and encodes
//! fixed-size wire reports at synchronization boundaries. Input devices
//! batch several field updates between sync markers (a diagonal mouse move
//! is two axis events), so state is folded in between flushes and a single
//! flush reflects the union of the batch.

use evdev::RelativeAxisType;
use tracing::{debug, trace};

use super::keymap::{self, HidUsage};
use super::{consumer, Report};
use crate::input::{SourceEvent, SourceEventKind};

/// USB HID keyboard report state (8 bytes on the wire)
///
/// Key slots are kept in press order, oldest first. The report never holds
/// the same usage ID twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    /// Modifier bitmask
    pub modifiers: u8,
    /// Pressed non-modifier keys, oldest first (0 = empty slot)
    pub keys: [u8; 6],
}

impl KeyboardReport {
    /// Track a key press. The 7th concurrent key evicts the oldest held one.
    /// Returns whether the report changed.
    pub fn press(&mut self, usage: u8) -> bool {
        if usage == 0 || self.keys.contains(&usage) {
            return false;
        }
        for slot in self.keys.iter_mut() {
            if *slot == 0 {
                *slot = usage;
                return true;
            }
        }
        // All six slots held: drop the oldest, append the new key
        self.keys.copy_within(1..6, 0);
        self.keys[5] = usage;
        true
    }

    /// Track a key release. Releasing an untracked usage is a no-op.
    /// Returns whether the report changed.
    pub fn release(&mut self, usage: u8) -> bool {
        let Some(pos) = self.keys.iter().position(|&k| k == usage) else {
            return false;
        };
        self.keys.copy_within(pos + 1..6, pos);
        self.keys[5] = 0;
        true
    }

    /// Release all keys and modifiers
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Encode to the wire layout: modifier, reserved, 6 usage bytes
    pub fn encode(&self) -> [u8; 8] {
        [
            self.modifiers,
            0,
            self.keys[0],
            self.keys[1],
            self.keys[2],
            self.keys[3],
            self.keys[4],
            self.keys[5],
        ]
    }
}

/// Mouse report state
///
/// Axis deltas accumulate between flushes; the button bitmask persists
/// until the buttons are released.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MouseState {
    pub buttons: u8,
    pub dx: i32,
    pub dy: i32,
    pub wheel: i32,
}

impl MouseState {
    pub fn press(&mut self, bit: u8) -> bool {
        let prev = self.buttons;
        self.buttons |= bit;
        self.buttons != prev
    }

    pub fn release(&mut self, bit: u8) -> bool {
        let prev = self.buttons;
        self.buttons &= !bit;
        self.buttons != prev
    }

    /// Encode to the wire layout, clamping deltas to the signed-byte range.
    /// Out-of-range samples are clamped, never rejected.
    pub fn encode(&self) -> [u8; 4] {
        [
            self.buttons,
            self.dx.clamp(-127, 127) as i8 as u8,
            self.dy.clamp(-127, 127) as i8 as u8,
            self.wheel.clamp(-127, 127) as i8 as u8,
        ]
    }

    /// Zero the per-flush deltas, keeping the button state
    pub fn reset_deltas(&mut self) {
        self.dx = 0;
        self.dy = 0;
        self.wheel = 0;
    }
}

/// Consumer-control report state (16-bit usage bitmask)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    pub bits: u16,
}

impl ConsumerReport {
    pub fn press(&mut self, bit: u8) -> bool {
        let prev = self.bits;
        self.bits |= consumer::mask(bit);
        self.bits != prev
    }

    pub fn release(&mut self, bit: u8) -> bool {
        let prev = self.bits;
        self.bits &= !consumer::mask(bit);
        self.bits != prev
    }

    /// Encode to the wire layout: little-endian bitmask
    pub fn encode(&self) -> [u8; 2] {
        self.bits.to_le_bytes()
    }
}

/// Per-device report codec
///
/// One instance per device relay; never shared. `handle` folds events into
/// state, `flush` emits the reports whose state changed since the last
/// flush, `reset` releases everything (sent on disconnect so the target
/// never sees stuck keys).
#[derive(Debug, Default)]
pub struct ReportCodec {
    keyboard: KeyboardReport,
    mouse: MouseState,
    consumer: ConsumerReport,
    keyboard_dirty: bool,
    mouse_dirty: bool,
    consumer_dirty: bool,
}

impl ReportCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the report state
    pub fn handle(&mut self, event: &SourceEvent) {
        match event.kind {
            SourceEventKind::Key { key, pressed } => match keymap::lookup(key) {
                Some(HidUsage::Keyboard(usage)) => {
                    let changed = if let Some(bit) = keymap::modifier_bit(usage) {
                        let prev = self.keyboard.modifiers;
                        if pressed {
                            self.keyboard.modifiers |= bit;
                        } else {
                            self.keyboard.modifiers &= !bit;
                        }
                        self.keyboard.modifiers != prev
                    } else if pressed {
                        self.keyboard.press(usage)
                    } else {
                        self.keyboard.release(usage)
                    };
                    self.keyboard_dirty |= changed;
                }
                Some(HidUsage::MouseButton(bit)) => {
                    let changed = if pressed {
                        self.mouse.press(bit)
                    } else {
                        self.mouse.release(bit)
                    };
                    self.mouse_dirty |= changed;
                }
                Some(HidUsage::Consumer(bit)) => {
                    let changed = if pressed {
                        self.consumer.press(bit)
                    } else {
                        self.consumer.release(bit)
                    };
                    self.consumer_dirty |= changed;
                }
                None => {
                    debug!(code = key.code(), "unsupported key, no HID mapping");
                }
            },
            SourceEventKind::Relative { axis, delta } => match axis {
                RelativeAxisType::REL_X => {
                    self.mouse.dx += delta;
                    self.mouse_dirty = true;
                }
                RelativeAxisType::REL_Y => {
                    self.mouse.dy += delta;
                    self.mouse_dirty = true;
                }
                RelativeAxisType::REL_WHEEL => {
                    self.mouse.wheel += delta;
                    self.mouse_dirty = true;
                }
                other => {
                    trace!(axis = ?other, delta, "ignoring unsupported relative axis");
                }
            },
            SourceEventKind::Sync | SourceEventKind::Other => {}
        }
    }

    /// Emit one report per kind whose state changed since the last flush.
    /// Mouse deltas are zeroed; held keys and buttons persist.
    pub fn flush(&mut self) -> Vec<Report> {
        let mut reports = Vec::new();
        if self.keyboard_dirty {
            reports.push(Report::Keyboard(self.keyboard.encode()));
            self.keyboard_dirty = false;
        }
        if self.mouse_dirty {
            reports.push(Report::Mouse(self.mouse.encode()));
            self.mouse.reset_deltas();
            self.mouse_dirty = false;
        }
        if self.consumer_dirty {
            reports.push(Report::Consumer(self.consumer.encode()));
            self.consumer_dirty = false;
        }
        reports
    }

    /// Clear all state, returning all-zero reports for the kinds that were
    /// holding keys or buttons so the target releases them.
    pub fn reset(&mut self) -> Vec<Report> {
        let mut reports = Vec::new();
        if self.keyboard != KeyboardReport::default() {
            self.keyboard.clear();
            reports.push(Report::Keyboard(self.keyboard.encode()));
        }
        if self.mouse.buttons != 0 {
            self.mouse = MouseState::default();
            reports.push(Report::Mouse(self.mouse.encode()));
        } else {
            self.mouse = MouseState::default();
        }
        if self.consumer.bits != 0 {
            self.consumer = ConsumerReport::default();
            reports.push(Report::Consumer(self.consumer.encode()));
        }
        self.keyboard_dirty = false;
        self.mouse_dirty = false;
        self.consumer_dirty = false;
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::SourceEvent;
    use evdev::Key;
    use std::time::SystemTime;

    fn key_event(key: Key, pressed: bool) -> SourceEvent {
        SourceEvent {
            timestamp: SystemTime::UNIX_EPOCH,
            kind: SourceEventKind::Key { key, pressed },
        }
    }

    fn rel_event(axis: RelativeAxisType, delta: i32) -> SourceEvent {
        SourceEvent {
            timestamp: SystemTime::UNIX_EPOCH,
            kind: SourceEventKind::Relative { axis, delta },
        }
    }

    fn decode_keyboard(bytes: &[u8; 8]) -> KeyboardReport {
        KeyboardReport {
            modifiers: bytes[0],
            keys: [bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7]],
        }
    }

    fn decode_mouse(bytes: &[u8; 4]) -> MouseState {
        MouseState {
            buttons: bytes[0],
            dx: i32::from(bytes[1] as i8),
            dy: i32::from(bytes[2] as i8),
            wheel: i32::from(bytes[3] as i8),
        }
    }

    #[test]
    fn test_fifo_eviction_past_six_keys() {
        let mut report = KeyboardReport::default();
        // Usages 0x04..=0x09 fill all six slots
        for usage in 0x04..=0x09u8 {
            assert!(report.press(usage));
        }
        assert_eq!(report.keys, [0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);

        // 7th key evicts the oldest (0x04)
        assert!(report.press(0x0A));
        assert_eq!(report.keys, [0x05, 0x06, 0x07, 0x08, 0x09, 0x0A]);
    }

    #[test]
    fn test_no_duplicate_usages() {
        let mut report = KeyboardReport::default();
        assert!(report.press(0x04));
        assert!(!report.press(0x04));
        assert_eq!(report.keys.iter().filter(|&&k| k == 0x04).count(), 1);
    }

    #[test]
    fn test_release_untracked_is_noop() {
        let mut report = KeyboardReport::default();
        report.press(0x04);
        let before = report.clone();
        assert!(!report.release(0x3A));
        assert_eq!(report, before);
    }

    #[test]
    fn test_release_compacts_slots() {
        let mut report = KeyboardReport::default();
        report.press(0x04);
        report.press(0x05);
        report.press(0x06);
        assert!(report.release(0x05));
        assert_eq!(report.keys, [0x04, 0x06, 0, 0, 0, 0]);
    }

    #[test]
    fn test_deltas_accumulate_and_clamp() {
        let mut codec = ReportCodec::new();
        codec.handle(&rel_event(RelativeAxisType::REL_X, 100));
        codec.handle(&rel_event(RelativeAxisType::REL_X, 100));
        codec.handle(&rel_event(RelativeAxisType::REL_Y, -3));
        codec.handle(&rel_event(RelativeAxisType::REL_Y, -4));
        codec.handle(&rel_event(RelativeAxisType::REL_WHEEL, 1));

        let reports = codec.flush();
        assert_eq!(reports.len(), 1);
        // 200 clamps to 127, -7 and 1 pass through
        assert_eq!(reports[0], Report::Mouse([0, 127, (-7i8) as u8, 1]));

        // Deltas are reset after the flush
        assert!(codec.flush().is_empty());
    }

    #[test]
    fn test_buttons_persist_across_flushes() {
        let mut codec = ReportCodec::new();
        codec.handle(&key_event(Key::BTN_LEFT, true));
        assert_eq!(codec.flush(), vec![Report::Mouse([0x01, 0, 0, 0])]);

        codec.handle(&rel_event(RelativeAxisType::REL_X, 5));
        assert_eq!(codec.flush(), vec![Report::Mouse([0x01, 5, 0, 0])]);

        codec.handle(&key_event(Key::BTN_LEFT, false));
        assert_eq!(codec.flush(), vec![Report::Mouse([0x00, 0, 0, 0])]);
    }

    #[test]
    fn test_modifier_bitmask() {
        let mut codec = ReportCodec::new();
        codec.handle(&key_event(Key::KEY_LEFTCTRL, true));
        codec.handle(&key_event(Key::KEY_LEFTSHIFT, true));
        codec.handle(&key_event(Key::KEY_A, true));

        let reports = codec.flush();
        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0],
            Report::Keyboard([0x03, 0, 0x04, 0, 0, 0, 0, 0])
        );

        codec.handle(&key_event(Key::KEY_LEFTSHIFT, false));
        assert_eq!(
            codec.flush(),
            vec![Report::Keyboard([0x01, 0, 0x04, 0, 0, 0, 0, 0])]
        );
    }

    #[test]
    fn test_consumer_bits_set_and_clear() {
        let mut codec = ReportCodec::new();
        codec.handle(&key_event(Key::KEY_VOLUMEUP, true));
        let expected = consumer::mask(consumer::bit::VOLUME_UP).to_le_bytes();
        assert_eq!(codec.flush(), vec![Report::Consumer(expected)]);

        codec.handle(&key_event(Key::KEY_VOLUMEUP, false));
        assert_eq!(codec.flush(), vec![Report::Consumer([0, 0])]);
    }

    #[test]
    fn test_unknown_scancode_changes_nothing() {
        let mut codec = ReportCodec::new();
        codec.handle(&key_event(Key::new(0x2bc), true));
        assert!(codec.flush().is_empty());
    }

    #[test]
    fn test_flush_emits_only_dirty_kinds() {
        let mut codec = ReportCodec::new();
        codec.handle(&key_event(Key::KEY_A, true));
        codec.handle(&rel_event(RelativeAxisType::REL_X, 2));

        let reports = codec.flush();
        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0], Report::Keyboard(_)));
        assert!(matches!(reports[1], Report::Mouse(_)));
    }

    #[test]
    fn test_keyboard_round_trip() {
        let mut report = KeyboardReport::default();
        report.modifiers = 0x05;
        report.press(0x04);
        report.press(0x2C);
        assert_eq!(decode_keyboard(&report.encode()), report);
    }

    #[test]
    fn test_mouse_round_trip() {
        let state = MouseState {
            buttons: 0x03,
            dx: -15,
            dy: 42,
            wheel: -1,
        };
        assert_eq!(decode_mouse(&state.encode()), state);
    }

    #[test]
    fn test_consumer_round_trip() {
        let report = ConsumerReport { bits: 0xA050 };
        let decoded = ConsumerReport {
            bits: u16::from_le_bytes(report.encode()),
        };
        assert_eq!(decoded, report);
    }

    #[test]
    fn test_reset_releases_active_state() {
        let mut codec = ReportCodec::new();
        codec.handle(&key_event(Key::KEY_A, true));
        codec.handle(&key_event(Key::BTN_LEFT, true));
        codec.handle(&key_event(Key::KEY_MUTE, true));
        codec.flush();

        let reports = codec.reset();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0], Report::Keyboard([0; 8]));
        assert_eq!(reports[1], Report::Mouse([0; 4]));
        assert_eq!(reports[2], Report::Consumer([0; 2]));

        // Nothing active, nothing to release
        assert!(codec.reset().is_empty());
    }
}
