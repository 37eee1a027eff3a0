//! Transfer progress reporting for clone, fetch and push

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A progress update emitted by a remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent<'a> {
    /// Raw sideband text from the server ("Counting objects: ...").
    Remote(&'a [u8]),
    /// Objects received during clone or fetch.
    Fetch {
        received: usize,
        total: usize,
        bytes: usize,
    },
    /// Objects sent during push.
    Push {
        current: usize,
        total: usize,
        bytes: usize,
    },
}

/// Receives progress updates.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent<'_>);
}

impl<T: ProgressSink + ?Sized> ProgressSink for std::sync::Arc<T> {
    fn report(&self, event: ProgressEvent<'_>) {
        (**self).report(event)
    }
}

/// Remembers the last whole percentage shown for one transfer direction.
#[derive(Debug)]
struct Throttle {
    last_percent: AtomicUsize,
}

impl Default for Throttle {
    fn default() -> Self {
        Self {
            last_percent: AtomicUsize::new(usize::MAX),
        }
    }
}

impl Throttle {
    /// True when `current` of `total` lands on a percentage not shown yet.
    ///
    /// 100% is only reached once `current == total`, so completion is always
    /// reported, and a following transfer starts over from a lower value.
    fn advance(&self, current: usize, total: usize) -> bool {
        let percent = if total == 0 {
            100
        } else {
            current.saturating_mul(100) / total
        };
        self.last_percent.swap(percent, Ordering::Relaxed) != percent
    }
}

/// Streams progress to standard output.
///
/// Sideband text is written as received; object counts are printed at most
/// once per whole percent.
#[derive(Debug, Default)]
pub struct StdoutProgress {
    fetch: Throttle,
    push: Throttle,
}

impl StdoutProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for StdoutProgress {
    fn report(&self, event: ProgressEvent<'_>) {
        let line = match event {
            ProgressEvent::Remote(text) => {
                write_stdout(|out| out.write_all(text));
                return;
            }
            ProgressEvent::Fetch {
                received,
                total,
                bytes,
            } => self
                .fetch
                .advance(received, total)
                .then(|| format!("Receiving objects: {received}/{total} ({bytes} bytes)")),
            ProgressEvent::Push {
                current,
                total,
                bytes,
            } => self
                .push
                .advance(current, total)
                .then(|| format!("Writing objects: {current}/{total} ({bytes} bytes)")),
        };

        if let Some(line) = line {
            write_stdout(|out| writeln!(out, "{line}"));
        }
    }
}

fn write_stdout(write: impl FnOnce(&mut std::io::StdoutLock<'static>) -> std::io::Result<()>) {
    let mut out = std::io::stdout().lock();
    // stdout going away must not fail the transfer
    let _ = write(&mut out).and_then(|()| out.flush());
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn report(&self, _event: ProgressEvent<'_>) {}
}
