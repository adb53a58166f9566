//! Kernel input-device sources
//!
//! Wraps evdev devices behind a small trait seam so device relays can be
//! driven by scripted sources in tests. A source yields a lazy, unbounded
//! sequence of decoded events and reports device loss as an I/O error.

use std::path::PathBuf;
use std::time::SystemTime;

use async_trait::async_trait;
use evdev::{Device, EventStream, InputEvent, InputEventKind, Key, RelativeAxisType};

use crate::error::Result;

/// Metadata resolved from an opened input device
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Human-readable device name
    pub name: String,
    /// Physical address (for Bluetooth devices, the adapter MAC and channel)
    pub phys: String,
}

/// One decoded kernel input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceEvent {
    pub timestamp: SystemTime,
    pub kind: SourceEventKind,
}

/// Event classes the relay cares about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceEventKind {
    /// Key or button press/release
    Key { key: Key, pressed: bool },
    /// Relative axis motion (mouse x/y, wheel)
    Relative { axis: RelativeAxisType, delta: i32 },
    /// Synchronization marker delimiting a batch of updates
    Sync,
    /// Anything else (absolute axes, misc events); ignored downstream
    Other,
}

impl SourceEvent {
    /// Decode a raw evdev event. Key autorepeat (value 2) yields `None`;
    /// the USB host applies its own typematic repeat.
    pub fn from_evdev(event: &InputEvent) -> Option<Self> {
        let kind = match event.kind() {
            InputEventKind::Key(key) => match event.value() {
                0 => SourceEventKind::Key {
                    key,
                    pressed: false,
                },
                1 => SourceEventKind::Key { key, pressed: true },
                _ => return None,
            },
            InputEventKind::RelAxis(axis) => SourceEventKind::Relative {
                axis,
                delta: event.value(),
            },
            InputEventKind::Synchronization(_) => SourceEventKind::Sync,
            _ => SourceEventKind::Other,
        };
        Some(Self {
            timestamp: event.timestamp(),
            kind,
        })
    }
}

/// A stream of input events from one opened device
#[async_trait]
pub trait EventSource: Send {
    /// Wait for the next event. `Err` means the device is gone
    /// (unplugged, out of range, powered down).
    async fn next_event(&mut self) -> std::io::Result<SourceEvent>;
}

/// Opens an event source; called by the relay on every (re)connect attempt
#[async_trait]
pub trait SourceOpener: Send + Sync {
    async fn open(&self) -> Result<(DeviceInfo, Box<dyn EventSource>)>;
}

/// evdev-backed event source
pub struct EvdevSource {
    stream: EventStream,
}

#[async_trait]
impl EventSource for EvdevSource {
    async fn next_event(&mut self) -> std::io::Result<SourceEvent> {
        loop {
            let raw = self.stream.next_event().await?;
            if let Some(event) = SourceEvent::from_evdev(&raw) {
                return Ok(event);
            }
            // Dropped autorepeat, keep reading
        }
    }
}

/// Opens one evdev device by path
pub struct EvdevOpener {
    path: PathBuf,
}

impl EvdevOpener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SourceOpener for EvdevOpener {
    async fn open(&self) -> Result<(DeviceInfo, Box<dyn EventSource>)> {
        let device = Device::open(&self.path)?;
        let info = device_info(&device);
        let stream = device.into_event_stream()?;
        Ok((info, Box::new(EvdevSource { stream })))
    }
}

fn device_info(device: &Device) -> DeviceInfo {
    DeviceInfo {
        name: device.name().unwrap_or("unknown").to_string(),
        phys: device.physical_path().unwrap_or("unknown").to_string(),
    }
}

/// Enumerate available input devices for the device-listing mode
pub fn list_devices() -> Vec<(PathBuf, DeviceInfo)> {
    let mut devices: Vec<(PathBuf, DeviceInfo)> = evdev::enumerate()
        .map(|(path, device)| (path, device_info(&device)))
        .collect();
    devices.sort_by(|a, b| a.0.cmp(&b.0));
    devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::EventType;

    #[test]
    fn test_decode_key_press_and_release() {
        let down = InputEvent::new(EventType::KEY, Key::KEY_A.code(), 1);
        let up = InputEvent::new(EventType::KEY, Key::KEY_A.code(), 0);

        assert_eq!(
            SourceEvent::from_evdev(&down).unwrap().kind,
            SourceEventKind::Key {
                key: Key::KEY_A,
                pressed: true
            }
        );
        assert_eq!(
            SourceEvent::from_evdev(&up).unwrap().kind,
            SourceEventKind::Key {
                key: Key::KEY_A,
                pressed: false
            }
        );
    }

    #[test]
    fn test_autorepeat_is_dropped() {
        let repeat = InputEvent::new(EventType::KEY, Key::KEY_A.code(), 2);
        assert!(SourceEvent::from_evdev(&repeat).is_none());
    }

    #[test]
    fn test_decode_relative_and_sync() {
        let rel = InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, -7);
        assert_eq!(
            SourceEvent::from_evdev(&rel).unwrap().kind,
            SourceEventKind::Relative {
                axis: RelativeAxisType::REL_X,
                delta: -7
            }
        );

        let sync = InputEvent::new(EventType::SYNCHRONIZATION, 0, 0);
        assert_eq!(
            SourceEvent::from_evdev(&sync).unwrap().kind,
            SourceEventKind::Sync
        );
    }
}
