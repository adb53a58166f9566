//! HID report translation and output
//!
//! This module turns decoded input events into fixed-size USB HID reports
//! and writes them to the gadget character devices:
//!
//! ```text
//! Input device --> SourceEvent --> ReportCodec --> Report --> GadgetSink --> Target PC
//!                                      |
//!                               [keymap lookup]
//! ```

pub mod codec;
pub mod consumer;
pub mod gadget;
pub mod keymap;

pub use codec::ReportCodec;
pub use gadget::{GadgetPaths, GadgetSinks, ReportSink};
pub use keymap::HidUsage;

/// Report kind, one per gadget endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Keyboard,
    Mouse,
    Consumer,
}

/// An encoded fixed-size HID report, ready for the wire.
///
/// Layouts:
/// - Keyboard: modifier byte, reserved byte, 6 usage-ID bytes
/// - Mouse: button bitmask, signed x, signed y, signed wheel
/// - Consumer: 16-bit little-endian usage bitmask
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Keyboard([u8; 8]),
    Mouse([u8; 4]),
    Consumer([u8; 2]),
}

impl Report {
    /// Which gadget endpoint this report targets
    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Keyboard(_) => ReportKind::Keyboard,
            Report::Mouse(_) => ReportKind::Mouse,
            Report::Consumer(_) => ReportKind::Consumer,
        }
    }

    /// Wire bytes of the report
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Report::Keyboard(b) => b,
            Report::Mouse(b) => b,
            Report::Consumer(b) => b,
        }
    }
}
