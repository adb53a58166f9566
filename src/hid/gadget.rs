//! USB gadget output sinks
//!
//! Wraps the HID gadget character devices created by the kernel's configfs
//! gadget (`/dev/hidgN`), one per report kind. Writes are flushed
//! immediately and serialized per device so reports from different relays
//! never interleave on the wire.
//!
//! Error recovery follows the usual gadget failure modes: EAGAIN means the
//! host is momentarily not polling the endpoint and the handle stays open;
//! ESHUTDOWN means the endpoint went away (cable pulled, bus reset) and the
//! handle is closed so the next send reopens it.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

use super::{Report, ReportKind};
use crate::error::{RelayError, Result};

/// Gadget character device paths, one per report kind
#[derive(Debug, Clone)]
pub struct GadgetPaths {
    pub keyboard: PathBuf,
    pub mouse: PathBuf,
    pub consumer: PathBuf,
}

impl Default for GadgetPaths {
    fn default() -> Self {
        Self {
            keyboard: PathBuf::from("/dev/hidg0"),
            mouse: PathBuf::from("/dev/hidg1"),
            consumer: PathBuf::from("/dev/hidg2"),
        }
    }
}

/// Where encoded reports go
///
/// Object-safe so tests can capture writes with a mock sink. Implementations
/// must accept whole reports only; a single `send` never tears.
pub trait ReportSink: Send + Sync {
    fn send(&self, report: &Report) -> Result<()>;
}

/// One gadget character device
#[derive(Debug)]
struct GadgetSink {
    path: PathBuf,
    dev: Mutex<Option<File>>,
}

impl GadgetSink {
    fn open(path: &Path) -> Result<Self> {
        let file = Self::open_device(path)?;
        info!("Gadget device opened: {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            dev: Mutex::new(Some(file)),
        })
    }

    fn open_device(path: &Path) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|e| {
                RelayError::Config(format!(
                    "Failed to open gadget device {}: {}",
                    path.display(),
                    e
                ))
            })
    }

    /// Write one whole report, flushed. The handle mutex serializes
    /// concurrent senders so buffers never interleave.
    fn send(&self, bytes: &[u8]) -> Result<()> {
        let mut dev = self.dev.lock();

        if dev.is_none() {
            if !self.path.exists() {
                return Err(RelayError::Gadget {
                    path: self.path.display().to_string(),
                    reason: "device node missing".to_string(),
                    error_code: "enoent".to_string(),
                });
            }
            let file = Self::open_device(&self.path)?;
            debug!("Reopened gadget device: {}", self.path.display());
            *dev = Some(file);
        }

        let Some(file) = dev.as_mut() else {
            return Err(RelayError::Internal(format!(
                "gadget handle missing for {}",
                self.path.display()
            )));
        };

        match file.write_all(bytes).and_then(|_| file.flush()) {
            Ok(()) => {
                trace!("Sent report to {}: {:02X?}", self.path.display(), bytes);
                Ok(())
            }
            Err(e) => {
                let error_code = errno_class(&e);
                if matches!(error_code, "eshutdown" | "enodev" | "enoent" | "enxio") {
                    // Endpoint is gone, reopen on the next send
                    debug!(
                        "Gadget {} write failed ({}), closing for recovery",
                        self.path.display(),
                        error_code
                    );
                    *dev = None;
                }
                Err(RelayError::Gadget {
                    path: self.path.display().to_string(),
                    reason: e.to_string(),
                    error_code: error_code.to_string(),
                })
            }
        }
    }
}

/// Classify an I/O error by errno for logging and recovery decisions
fn errno_class(e: &std::io::Error) -> &'static str {
    match e.raw_os_error() {
        Some(libc::EPIPE) => "epipe",
        Some(libc::ESHUTDOWN) => "eshutdown",
        Some(libc::EAGAIN) => "eagain",
        Some(libc::ENXIO) => "enxio",
        Some(libc::ENODEV) => "enodev",
        Some(libc::EIO) => "eio",
        Some(libc::ENOENT) => "enoent",
        _ => "io_error",
    }
}

/// The full set of gadget sinks, shared across all device relays
#[derive(Debug)]
pub struct GadgetSinks {
    keyboard: GadgetSink,
    mouse: GadgetSink,
    consumer: GadgetSink,
}

impl GadgetSinks {
    /// Open all three gadget devices. Missing device nodes are a fatal
    /// configuration error (the gadget function is not set up).
    pub fn open(paths: &GadgetPaths) -> Result<Self> {
        let missing: Vec<String> = [&paths.keyboard, &paths.mouse, &paths.consumer]
            .iter()
            .filter(|p| !p.exists())
            .map(|p| p.display().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RelayError::Config(format!(
                "Missing HID gadget devices: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            keyboard: GadgetSink::open(&paths.keyboard)?,
            mouse: GadgetSink::open(&paths.mouse)?,
            consumer: GadgetSink::open(&paths.consumer)?,
        })
    }

    fn sink_for(&self, kind: ReportKind) -> &GadgetSink {
        match kind {
            ReportKind::Keyboard => &self.keyboard,
            ReportKind::Mouse => &self.mouse,
            ReportKind::Consumer => &self.consumer,
        }
    }
}

impl ReportSink for GadgetSinks {
    fn send(&self, report: &Report) -> Result<()> {
        self.sink_for(report.kind()).send(report.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn temp_paths(dir: &tempfile::TempDir) -> GadgetPaths {
        let paths = GadgetPaths {
            keyboard: dir.path().join("hidg0"),
            mouse: dir.path().join("hidg1"),
            consumer: dir.path().join("hidg2"),
        };
        for p in [&paths.keyboard, &paths.mouse, &paths.consumer] {
            File::create(p).unwrap();
        }
        paths
    }

    #[test]
    fn test_open_fails_on_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let paths = GadgetPaths {
            keyboard: dir.path().join("hidg0"),
            mouse: dir.path().join("hidg1"),
            consumer: dir.path().join("hidg2"),
        };
        let err = GadgetSinks::open(&paths).unwrap_err();
        match err {
            RelayError::Config(msg) => {
                assert!(msg.contains("hidg0"));
                assert!(msg.contains("hidg2"));
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_send_writes_whole_report() {
        let dir = tempfile::tempdir().unwrap();
        let paths = temp_paths(&dir);
        let sinks = GadgetSinks::open(&paths).unwrap();

        let report = Report::Keyboard([0x02, 0, 0x04, 0, 0, 0, 0, 0]);
        sinks.send(&report).unwrap();

        let mut written = Vec::new();
        File::open(&paths.keyboard)
            .unwrap()
            .read_to_end(&mut written)
            .unwrap();
        assert_eq!(written, report.as_bytes());
    }

    #[test]
    fn test_send_dispatches_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let paths = temp_paths(&dir);
        let sinks = GadgetSinks::open(&paths).unwrap();

        sinks.send(&Report::Mouse([0x01, 5, 0, 0])).unwrap();
        sinks.send(&Report::Consumer([0x10, 0])).unwrap();

        let mut mouse = Vec::new();
        File::open(&paths.mouse)
            .unwrap()
            .read_to_end(&mut mouse)
            .unwrap();
        assert_eq!(mouse, [0x01, 5, 0, 0]);

        let mut cons = Vec::new();
        File::open(&paths.consumer)
            .unwrap()
            .read_to_end(&mut cons)
            .unwrap();
        assert_eq!(cons, [0x10, 0]);
    }

    #[test]
    fn test_errno_classification() {
        let e = std::io::Error::from_raw_os_error(libc::ESHUTDOWN);
        assert_eq!(errno_class(&e), "eshutdown");
        let e = std::io::Error::from_raw_os_error(libc::EAGAIN);
        assert_eq!(errno_class(&e), "eagain");
        let e = std::io::Error::new(std::io::ErrorKind::Other, "x");
        assert_eq!(errno_class(&e), "io_error");
    }
}
