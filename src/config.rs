//! Runtime configuration
//!
//! Everything here is assembled from the command line; there is no config
//! file and no runtime reconfiguration. Changing the device set means
//! restarting the process.

use std::path::PathBuf;

use crate::hid::GadgetPaths;
use crate::relay::ReconnectPolicy;

/// Resolved relay configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Input device paths to relay (fixed for the process lifetime)
    pub device_paths: Vec<PathBuf>,
    /// Gadget output device paths
    pub gadgets: GadgetPaths,
    /// Reconnect backoff policy shared by all relays
    pub reconnect: ReconnectPolicy,
}

impl RelayConfig {
    pub fn new(device_paths: Vec<PathBuf>) -> Self {
        Self {
            device_paths,
            gadgets: GadgetPaths::default(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}
