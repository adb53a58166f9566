//! Device relay lifecycle
//!
//! One relay per configured input device, driving the pipeline:
//!
//! ```text
//! Input device --> events --> ReportCodec --> reports --> gadget sinks
//! ```
//!
//! A relay cycles `Connecting -> Relaying -> Disconnected -> Connecting`
//! for as long as its device comes and goes (power save, out of range,
//! replug), and only reaches the terminal `Stopped` state through
//! supervisor cancellation.

pub mod backoff;
pub mod supervisor;

pub use backoff::ReconnectPolicy;
pub use supervisor::RelaySupervisor;

use std::sync::Arc;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{RelayError, Result};
use crate::hid::{ReportCodec, ReportSink};
use crate::input::{DeviceInfo, EventSource, SourceEventKind, SourceOpener};

/// Relay lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Trying to open the input device, with backoff between attempts
    Connecting,
    /// Forwarding events from an open device
    Relaying,
    /// Device was lost; immediately re-enters Connecting (kept as a
    /// distinct state for logging)
    Disconnected,
    /// Terminal; reached only through cancellation
    Stopped,
}

/// Relays one input device onto the shared gadget sinks
pub struct DeviceRelay {
    path: String,
    opener: Box<dyn SourceOpener>,
    sink: Arc<dyn ReportSink>,
    policy: ReconnectPolicy,
    codec: ReportCodec,
    state: RelayState,
    retry_count: u32,
}

impl DeviceRelay {
    pub fn new(
        path: impl Into<String>,
        opener: Box<dyn SourceOpener>,
        sink: Arc<dyn ReportSink>,
        policy: ReconnectPolicy,
    ) -> Self {
        Self {
            path: path.into(),
            opener,
            sink,
            policy,
            codec: ReportCodec::new(),
            state: RelayState::Connecting,
            retry_count: 0,
        }
    }

    /// The configured device path; stable identity across reconnects
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    /// Drive the relay until cancelled.
    ///
    /// Transient device loss reconnects forever with bounded backoff; only
    /// configuration errors from the opener escalate to the supervisor.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        loop {
            self.set_state(RelayState::Connecting);
            let Some((info, mut source)) = self.connect(&cancel).await? else {
                self.set_state(RelayState::Stopped);
                info!(device = %self.path, "relay stopped");
                return Ok(());
            };

            info!(
                device = %self.path,
                name = %info.name,
                phys = %info.phys,
                "relaying input device"
            );
            self.set_state(RelayState::Relaying);
            self.retry_count = 0;
            self.codec = ReportCodec::new();

            let cancelled = self.relay_events(source.as_mut(), &info, &cancel).await;

            // Release anything still held so the target never sees stuck keys
            for report in self.codec.reset() {
                if let Err(e) = self.sink.send(&report) {
                    debug!(device = %self.path, error = %e, "failed to send release report");
                }
            }

            if cancelled {
                self.set_state(RelayState::Stopped);
                info!(device = %self.path, "relay stopped");
                return Ok(());
            }
            self.set_state(RelayState::Disconnected);
        }
    }

    /// Open the input source, backing off between failed attempts.
    /// Returns `None` when cancelled.
    async fn connect(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<Option<(DeviceInfo, Box<dyn EventSource>)>> {
        loop {
            let attempt = tokio::select! {
                _ = cancel.cancelled() => return Ok(None),
                result = self.opener.open() => result,
            };

            match attempt {
                Ok(opened) => return Ok(Some(opened)),
                Err(e @ RelayError::Config(_)) => return Err(e),
                Err(e) => {
                    self.retry_count += 1;
                    let delay = self.policy.delay(self.retry_count);
                    debug!(
                        device = %self.path,
                        attempt = self.retry_count,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "open failed, backing off"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => return Ok(None),
                        _ = sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// Pump events until the device is lost or cancellation is requested.
    /// Returns `true` when cancelled, `false` on device loss.
    async fn relay_events(
        &mut self,
        source: &mut dyn EventSource,
        info: &DeviceInfo,
        cancel: &CancellationToken,
    ) -> bool {
        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => return true,
                result = source.next_event() => match result {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(
                            device = %self.path,
                            name = %info.name,
                            error = %e,
                            "input device lost, reconnecting"
                        );
                        return false;
                    }
                },
            };

            match event.kind {
                SourceEventKind::Sync => {
                    for report in self.codec.flush() {
                        if let Err(e) = self.sink.send(&report) {
                            // Gadget failures are transient from this side
                            // (host unplugged, bus reset); keep relaying and
                            // the next flush self-heals.
                            error!(device = %self.path, error = %e, "failed to write HID report");
                        }
                    }
                }
                _ => self.codec.handle(&event),
            }
        }
    }

    fn set_state(&mut self, next: RelayState) {
        if self.state != next {
            debug!(device = %self.path, from = ?self.state, to = ?next, "relay state change");
            self.state = next;
        }
    }
}
