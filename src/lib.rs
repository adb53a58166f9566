//! bt2usb - Bluetooth to USB HID relay
//!
//! This crate relays input events from Bluetooth-paired keyboards, mice and
//! remote controls (exposed through the kernel's evdev layer) onto USB HID
//! gadget devices, so that the attached host sees them as directly connected
//! USB input devices.

pub mod config;
pub mod error;
pub mod hid;
pub mod input;
pub mod relay;

pub use error::{RelayError, Result};
