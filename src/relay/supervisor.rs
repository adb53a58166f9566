//! Relay supervisor
//!
//! Owns the fixed set of device relays and runs them as sibling tasks.
//! The first unrecoverable relay error cancels every sibling and is
//! surfaced to the caller; cooperative shutdown (token cancelled by the
//! signal handler) ends with success once all relays have stopped.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{DeviceRelay, ReconnectPolicy};
use crate::error::{RelayError, Result};
use crate::hid::ReportSink;
use crate::input::EvdevOpener;

pub struct RelaySupervisor {
    relays: Vec<DeviceRelay>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for RelaySupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySupervisor")
            .field("relays", &self.relays.len())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl RelaySupervisor {
    pub fn new(relays: Vec<DeviceRelay>, cancel: CancellationToken) -> Self {
        Self { relays, cancel }
    }

    /// Build one evdev-backed relay per configured device path
    pub fn with_devices(
        device_paths: &[PathBuf],
        sink: Arc<dyn ReportSink>,
        policy: ReconnectPolicy,
        cancel: CancellationToken,
    ) -> Result<Self> {
        if device_paths.is_empty() {
            return Err(RelayError::Config(
                "no input device paths configured".to_string(),
            ));
        }

        let relays = device_paths
            .iter()
            .map(|path| {
                DeviceRelay::new(
                    path.display().to_string(),
                    Box::new(EvdevOpener::new(path)),
                    sink.clone(),
                    policy,
                )
            })
            .collect();

        Ok(Self::new(relays, cancel))
    }

    /// Run every relay to completion.
    ///
    /// The join loop drains all tasks even after a failure, so every relay
    /// acknowledges its cancellation before this returns.
    pub async fn run(self) -> Result<()> {
        let mut tasks = JoinSet::new();
        for relay in self.relays {
            let cancel = self.cancel.child_token();
            tasks.spawn(relay.run(cancel));
        }
        info!(relays = tasks.len(), "relay supervisor started");

        let mut first_error: Option<RelayError> = None;
        while let Some(joined) = tasks.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => Err(RelayError::Internal(format!("relay task panicked: {e}"))),
            };
            if let Err(e) = result {
                warn!(error = %e, "relay failed, shutting down remaining relays");
                if first_error.is_none() {
                    first_error = Some(e);
                }
                self.cancel.cancel();
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("all relays stopped");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::Report;
    use crate::input::{DeviceInfo, EventSource, SourceEvent, SourceOpener};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Source that blocks forever (device connected, nothing typed)
    struct IdleSource;

    #[async_trait]
    impl EventSource for IdleSource {
        async fn next_event(&mut self) -> std::io::Result<SourceEvent> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    struct IdleOpener;

    #[async_trait]
    impl SourceOpener for IdleOpener {
        async fn open(&self) -> Result<(DeviceInfo, Box<dyn EventSource>)> {
            let info = DeviceInfo {
                name: "Idle Device".to_string(),
                phys: "00:11:22:33:44:55".to_string(),
            };
            Ok((info, Box::new(IdleSource)))
        }
    }

    /// Opener that fails with an unrecoverable configuration error
    struct BrokenOpener;

    #[async_trait]
    impl SourceOpener for BrokenOpener {
        async fn open(&self) -> Result<(DeviceInfo, Box<dyn EventSource>)> {
            Err(RelayError::Config("bad device path".to_string()))
        }
    }

    #[derive(Default)]
    struct NullSink {
        writes: Mutex<Vec<Vec<u8>>>,
    }

    impl ReportSink for NullSink {
        fn send(&self, report: &Report) -> Result<()> {
            self.writes.lock().push(report.as_bytes().to_vec());
            Ok(())
        }
    }

    fn idle_relay(path: &str, sink: Arc<dyn ReportSink>) -> DeviceRelay {
        DeviceRelay::new(
            path,
            Box::new(IdleOpener),
            sink,
            ReconnectPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_shutdown_stops_all_blocked_relays() {
        let sink: Arc<dyn ReportSink> = Arc::new(NullSink::default());
        let cancel = CancellationToken::new();

        let relays = vec![
            idle_relay("/dev/input/event1", sink.clone()),
            idle_relay("/dev/input/event2", sink.clone()),
            idle_relay("/dev/input/event3", sink.clone()),
        ];
        let supervisor = RelaySupervisor::new(relays, cancel.clone());

        let task = tokio::spawn(supervisor.run());
        tokio::task::yield_now().await;

        cancel.cancel();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_fatal_error_cancels_siblings() {
        let sink: Arc<dyn ReportSink> = Arc::new(NullSink::default());
        let cancel = CancellationToken::new();

        let relays = vec![
            idle_relay("/dev/input/event1", sink.clone()),
            DeviceRelay::new(
                "/dev/input/event2",
                Box::new(BrokenOpener),
                sink.clone(),
                ReconnectPolicy::default(),
            ),
        ];
        let supervisor = RelaySupervisor::new(relays, cancel.clone());

        // The broken relay fails immediately; the idle sibling must be
        // cancelled rather than keeping the supervisor alive forever.
        let err = supervisor.run().await.unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[tokio::test]
    async fn test_empty_device_list_is_a_config_error() {
        let sink: Arc<dyn ReportSink> = Arc::new(NullSink::default());
        let err = RelaySupervisor::with_devices(
            &[],
            sink,
            ReconnectPolicy::default(),
            CancellationToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }
}
