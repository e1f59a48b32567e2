//! Background rendering.
//!
//! Layout requests can arrive faster than they complete (a window being
//! resized). Every request is tagged with a [`Ticket`]; a result is only
//! accepted when its ticket is still the newest one issued, so an older
//! layout can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Sequence number of a layout request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues tickets and filters out stale results.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags a new request. Supersedes every ticket issued before.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Passes `value` through only if `ticket` is still the newest request.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_latest(ticket) {
            Some(value)
        } else {
            debug!(ticket = ticket.0, "dropping stale result");
            None
        }
    }
}

type Job<T> = Box<dyn FnOnce() -> T + Send + 'static>;

/// Runs jobs on a dedicated thread and keeps only the newest result.
///
/// Results are shared as immutable [`Arc`] snapshots.
pub struct RenderWorker<T> {
    tracker: Arc<RequestTracker>,
    jobs: Option<Sender<(Ticket, Job<T>)>>,
    results: Receiver<(Ticket, Arc<T>)>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + Sync + 'static> RenderWorker<T> {
    /// Spawns the worker thread.
    pub fn spawn() -> Self {
        let tracker = Arc::new(RequestTracker::new());
        let (job_tx, job_rx) = mpsc::channel::<(Ticket, Job<T>)>();
        let (result_tx, result_rx) = mpsc::channel();

        let worker_tracker = Arc::clone(&tracker);
        let handle = thread::spawn(move || {
            for (ticket, job) in job_rx {
                // Skip work that was superseded while queued
                if !worker_tracker.is_latest(ticket) {
                    debug!(ticket = ticket.value(), "skipping superseded job");
                    continue;
                }
                let value = Arc::new(job());
                if result_tx.send((ticket, value)).is_err() {
                    break;
                }
            }
        });

        Self {
            tracker,
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
        }
    }

    /// Queues a job. Any job or result with an older ticket becomes stale.
    pub fn submit<F>(&self, job: F) -> Ticket
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let ticket = self.tracker.issue();
        if let Some(jobs) = &self.jobs {
            if jobs.send((ticket, Box::new(job))).is_err() {
                warn!(ticket = ticket.value(), "render worker has stopped");
            }
        }
        ticket
    }

    /// The newest completed result, if one is waiting. Stale results are
    /// discarded.
    pub fn try_latest(&self) -> Option<(Ticket, Arc<T>)> {
        let mut newest = None;
        while let Ok((ticket, value)) = self.results.try_recv() {
            if let Some(value) = self.tracker.accept(ticket, value) {
                newest = Some((ticket, value));
            }
        }
        newest
    }

    /// Blocks until the result of the newest request arrives or `timeout`
    /// elapses.
    pub fn wait_latest(&self, timeout: Duration) -> Option<(Ticket, Arc<T>)> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.results.recv_timeout(remaining) {
                Ok((ticket, value)) => {
                    if let Some(value) = self.tracker.accept(ticket, value) {
                        return Some((ticket, value));
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }
}

impl<T> Drop for RenderWorker<T> {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("render worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    use crate::annotate::Annotations;
    use crate::model::{Alignment, DisplayConfig, RenderMode};
    use crate::render::{render, RenderedPanes};
    use crate::theme::Theme;

    #[test]
    fn test_tickets_increase() {
        let tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);
        assert!(tracker.is_latest(second));
        assert!(!tracker.is_latest(first));
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let tracker = RequestTracker::new();
        let old = tracker.issue();
        let new = tracker.issue();
        // Older request finishes last
        assert_eq!(tracker.accept(new, "new"), Some("new"));
        assert_eq!(tracker.accept(old, "old"), None);
    }

    #[test]
    fn test_tracker_across_threads() {
        let tracker = Arc::new(RequestTracker::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || (0..100).map(|_| tracker.issue()).collect::<Vec<_>>())
            })
            .collect();
        let mut all: Vec<Ticket> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 400);
        assert!(tracker.is_latest(*all.last().unwrap()));
    }

    #[test]
    fn test_worker_returns_newest_result() {
        let worker: RenderWorker<usize> = RenderWorker::spawn();
        let (gate_tx, gate_rx) = channel::<()>();

        // The first job blocks until released, so the second is queued behind it
        let first = worker.submit(move || {
            let _ = gate_rx.recv();
            1
        });
        let second = worker.submit(|| 2);
        assert!(second > first);
        // The worker may already have skipped the first job and dropped the gate
        let _ = gate_tx.send(());

        let (ticket, value) = worker.wait_latest(Duration::from_secs(5)).unwrap();
        assert_eq!(ticket, second);
        assert_eq!(*value, 2);
        assert!(worker.try_latest().is_none());
    }

    #[test]
    fn test_worker_renders_panes() {
        let worker: RenderWorker<RenderedPanes> = RenderWorker::spawn();
        let alignment =
            Alignment::from_pairs([("seq1", "MSLSQDA-TFVEL"), ("seq2", "MSLSQDATFV-EL")]);
        for width in [3, 4, 5] {
            let alignment = alignment.clone();
            worker.submit(move || {
                render(
                    &alignment,
                    &Theme::pale(),
                    &DisplayConfig::with_width(width),
                    &Annotations::default(),
                    RenderMode::Full,
                )
                .unwrap()
            });
        }
        let (_, panes) = worker.wait_latest(Duration::from_secs(5)).unwrap();
        // Width 5 gives three blocks of ruler + two sequences, plus two separators
        assert_eq!(panes.row_count(), 11);
    }
}
