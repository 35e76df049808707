//! Background sampling of a child process's resident memory.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Peak resident memory observed over a sampler's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryPeak {
    /// Largest resident set seen, in bytes.
    pub peak_bytes: u64,
    /// Number of successful samples.
    pub samples: u64,
}

impl MemoryPeak {
    /// Peak in MiB.
    pub fn megabytes(&self) -> f64 {
        self.peak_bytes as f64 / BYTES_PER_MB
    }
}

/// Samples the resident set of `pid` on a background thread until stopped.
///
/// A sample taken after the process has exited simply fails and is skipped,
/// so stopping the sampler after the child has been reaped is always safe.
#[derive(Debug)]
pub struct MemorySampler {
    stop: Arc<AtomicBool>,
    peak: Arc<AtomicU64>,
    samples: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl MemorySampler {
    /// Starts sampling immediately, then every `interval`.
    pub fn start(pid: u32, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let peak = Arc::new(AtomicU64::new(0));
        let samples = Arc::new(AtomicU64::new(0));
        let worker = {
            let stop = Arc::clone(&stop);
            let peak = Arc::clone(&peak);
            let samples = Arc::clone(&samples);
            // The stop flag is checked after every wake-up and before the
            // next read, so the reaped pid is never sampled again.
            move || {
                while !stop.load(Ordering::Acquire) {
                    if let Some(bytes) = resident_bytes(pid) {
                        peak.fetch_max(bytes, Ordering::Relaxed);
                        samples.fetch_add(1, Ordering::Relaxed);
                    }
                    thread::park_timeout(interval);
                }
            }
        };
        let handle = match thread::Builder::new()
            .name(format!("rss-sampler-{pid}"))
            .spawn(worker)
        {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(pid, error = %err, "memory sampler unavailable, peak memory will read 0");
                None
            }
        };
        Self {
            stop,
            peak,
            samples,
            handle,
        }
    }

    /// Stops the sampler and returns the observed peak.
    pub fn stop(mut self) -> MemoryPeak {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                warn!("memory sampler thread panicked");
            }
        }
        let peak = MemoryPeak {
            peak_bytes: self.peak.load(Ordering::Relaxed),
            samples: self.samples.load(Ordering::Relaxed),
        };
        debug!(
            peak_bytes = peak.peak_bytes,
            samples = peak.samples,
            "memory sampler stopped"
        );
        peak
    }
}

impl Drop for MemorySampler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

/// Current resident set of `pid` in bytes, `None` if it cannot be read.
#[cfg(target_os = "linux")]
pub fn resident_bytes(pid: u32) -> Option<u64> {
    let status = std::fs::read_to_string(format!("/proc/{pid}/status")).ok()?;
    parse_vm_rss(&status)
}

/// Current resident set of `pid` in bytes, `None` if it cannot be read.
#[cfg(not(target_os = "linux"))]
pub fn resident_bytes(_pid: u32) -> Option<u64> {
    None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}
